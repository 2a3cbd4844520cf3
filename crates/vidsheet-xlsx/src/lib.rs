//! # vidsheet-xlsx
//!
//! A streaming XLSX writer tailored to vidsheet's output shape: many
//! worksheets of styled, valueless cells sharing one workbook-wide set
//! of solid-fill styles.
//!
//! The writer is append-only and forward-only by contract, not by
//! accident of implementation: rows, once emitted, can never be
//! revisited, and memory stays bounded no matter how many rows or
//! sheets have been written. Worksheet XML streams straight into the
//! zip container while the workbook metadata parts are deferred to
//! [`WorkbookWriter::close`], when the sheet list and style table are
//! complete.
//!
//! ## Example
//!
//! ```no_run
//! use vidsheet_core::Rgb;
//! use vidsheet_xlsx::WorkbookWriter;
//!
//! # fn main() -> Result<(), vidsheet_xlsx::XlsxError> {
//! let mut workbook = WorkbookWriter::create("out.xlsx")?;
//! let red = workbook.add_fill_style(Rgb::new(255, 0, 0));
//!
//! let mut sheet = workbook.add_sheet("0")?;
//! sheet.set_column_width(0, 1, 3.17)?;
//! sheet.write_blank(0, 0, red)?;
//! sheet.write_blank(0, 1, red)?;
//! sheet.finish()?;
//!
//! workbook.close()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod sheet;
pub mod styles;
pub mod workbook;

pub use error::{XlsxError, XlsxResult};
pub use sheet::SheetWriter;
pub use styles::FillId;
pub use workbook::WorkbookWriter;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
