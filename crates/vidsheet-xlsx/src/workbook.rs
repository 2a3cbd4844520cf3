//! Streaming XLSX workbook writer

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use tracing::debug;
use vidsheet_core::Rgb;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{XlsxError, XlsxResult};
use crate::sheet::SheetWriter;
use crate::styles::{FillId, FillTable};
use crate::MAX_SHEET_NAME_LEN;

/// Characters the XLSX specification forbids in sheet names.
const FORBIDDEN_NAME_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// An XLSX document being written front to back.
///
/// Worksheet XML is streamed into the zip container as cells arrive; the
/// metadata parts ([Content_Types].xml, relationships, workbook.xml,
/// styles.xml) are written by [`close`](Self::close), once the sheet
/// list and style table are final. XLSX consumers locate parts by name
/// through the zip central directory, so part order in the archive does
/// not matter.
pub struct WorkbookWriter<W: Write + Seek> {
    pub(crate) zip: ZipWriter<W>,
    pub(crate) sheet_open: bool,
    sheet_names: Vec<String>,
    fills: FillTable,
}

impl WorkbookWriter<BufWriter<File>> {
    /// Create a workbook file at the given path.
    pub fn create<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Seek> WorkbookWriter<W> {
    /// Start a workbook over an arbitrary writer.
    pub fn new(writer: W) -> Self {
        WorkbookWriter {
            zip: ZipWriter::new(writer),
            sheet_open: false,
            sheet_names: Vec::new(),
            fills: FillTable::new(),
        }
    }

    /// Register a solid-fill style and return its handle.
    ///
    /// Each call creates a new style; callers that want one style per
    /// distinct color deduplicate through a
    /// [`PaletteRegistry`](vidsheet_core::PaletteRegistry).
    pub fn add_fill_style(&mut self, color: Rgb) -> FillId {
        self.fills.add(color)
    }

    /// Number of registered fill styles.
    pub fn style_count(&self) -> usize {
        self.fills.len()
    }

    /// Number of sheets added so far.
    pub fn sheet_count(&self) -> usize {
        self.sheet_names.len()
    }

    /// Begin a new worksheet.
    ///
    /// Only one sheet can be open at a time; the previous
    /// [`SheetWriter`] must have been finished.
    pub fn add_sheet(&mut self, name: &str) -> XlsxResult<SheetWriter<'_, W>> {
        if self.sheet_open {
            return Err(XlsxError::SheetOpen);
        }
        self.validate_sheet_name(name)?;

        let index = self.sheet_names.len();
        self.zip.start_file(
            format!("xl/worksheets/sheet{}.xml", index + 1),
            SimpleFileOptions::default(),
        )?;
        self.sheet_names.push(name.to_string());
        self.sheet_open = true;
        debug!(sheet = name, "started worksheet");
        Ok(SheetWriter::new(self))
    }

    /// Finalize the document: write the metadata parts and the zip
    /// central directory, returning the underlying writer.
    pub fn close(mut self) -> XlsxResult<W> {
        if self.sheet_open {
            return Err(XlsxError::SheetOpen);
        }

        let content_types = self.content_types_xml();
        let workbook_xml = self.workbook_xml();
        let workbook_rels = self.workbook_rels_xml();
        let styles_xml = self.fills.to_styles_xml();

        self.write_part("[Content_Types].xml", &content_types)?;
        self.write_part("_rels/.rels", ROOT_RELS)?;
        self.write_part("xl/workbook.xml", &workbook_xml)?;
        self.write_part("xl/_rels/workbook.xml.rels", &workbook_rels)?;
        self.write_part("xl/styles.xml", &styles_xml)?;

        let writer = self.zip.finish()?;
        Ok(writer)
    }

    fn write_part(&mut self, name: &str, content: &str) -> XlsxResult<()> {
        self.zip.start_file(name, SimpleFileOptions::default())?;
        self.zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn validate_sheet_name(&self, name: &str) -> XlsxResult<()> {
        if name.is_empty() || name.len() > MAX_SHEET_NAME_LEN {
            return Err(XlsxError::InvalidSheetName(name.to_string()));
        }
        if name.contains(FORBIDDEN_NAME_CHARS) {
            return Err(XlsxError::InvalidSheetName(name.to_string()));
        }
        if self.sheet_names.iter().any(|n| n == name) {
            return Err(XlsxError::DuplicateSheetName(name.to_string()));
        }
        Ok(())
    }

    fn content_types_xml(&self) -> String {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        );

        for i in 0..self.sheet_names.len() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");
        content
    }

    fn workbook_xml(&self) -> String {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>"#,
        );

        for (i, name) in self.sheet_names.iter().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(name),
                i + 1,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );
        content
    }

    fn workbook_rels_xml(&self) -> String {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..self.sheet_names.len() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#,
            self.sheet_names.len() + 1
        ));
        content
    }
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn workbook() -> WorkbookWriter<Cursor<Vec<u8>>> {
        WorkbookWriter::new(Cursor::new(Vec::new()))
    }

    #[test]
    fn test_sheet_name_validation() {
        let mut wb = workbook();
        assert!(matches!(
            wb.add_sheet("").unwrap_err(),
            XlsxError::InvalidSheetName(_)
        ));
        assert!(matches!(
            wb.add_sheet("a/b").unwrap_err(),
            XlsxError::InvalidSheetName(_)
        ));
        assert!(matches!(
            wb.add_sheet(&"x".repeat(32)).unwrap_err(),
            XlsxError::InvalidSheetName(_)
        ));
    }

    #[test]
    fn test_duplicate_sheet_name_rejected() {
        let mut wb = workbook();
        wb.add_sheet("0").unwrap().finish().unwrap();
        assert!(matches!(
            wb.add_sheet("0").unwrap_err(),
            XlsxError::DuplicateSheetName(_)
        ));
    }

    #[test]
    fn test_only_one_sheet_open() {
        let mut wb = workbook();
        let sheet = wb.add_sheet("0").unwrap();
        drop(sheet); // never finished
        assert!(matches!(wb.add_sheet("1").unwrap_err(), XlsxError::SheetOpen));
    }

    #[test]
    fn test_close_with_open_sheet_fails() {
        let mut wb = workbook();
        let sheet = wb.add_sheet("0").unwrap();
        drop(sheet);
        assert!(matches!(wb.close().unwrap_err(), XlsxError::SheetOpen));
    }

    #[test]
    fn test_style_handles_are_sequential() {
        let mut wb = workbook();
        let a = wb.add_fill_style(Rgb::new(1, 1, 1));
        let b = wb.add_fill_style(Rgb::new(2, 2, 2));
        assert_ne!(a, b);
        assert_eq!(wb.style_count(), 2);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b&c>\"d'"), "a&lt;b&amp;c&gt;&quot;d&apos;");
    }
}
