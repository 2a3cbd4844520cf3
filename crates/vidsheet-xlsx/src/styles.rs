//! XLSX styles (styles.xml) generation
//!
//! Every style this writer produces is "blank cell with a solid
//! background fill", so the style table reduces to a list of fill colors.
//! Deduplication is deliberately not done here: the palette registry
//! upstream guarantees each distinct color is registered once, and the
//! table mirrors exactly what it was handed.

use vidsheet_core::Rgb;

/// Opaque handle to one registered fill style.
///
/// Returned by [`WorkbookWriter::add_fill_style`](crate::WorkbookWriter::add_fill_style)
/// and accepted by [`SheetWriter::write_blank`](crate::SheetWriter::write_blank).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FillId(pub(crate) u32);

impl FillId {
    /// The cellXfs index this fill resolves to (`s` attribute of a cell).
    /// Index 0 is the default xf; registered fills start at 1.
    pub(crate) fn xf_index(self) -> u32 {
        self.0 + 1
    }

    /// The fill-table index inside styles.xml. Excel reserves fills 0
    /// (none) and 1 (gray125), so registered fills start at 2.
    fn fill_index(self) -> u32 {
        self.0 + 2
    }
}

#[derive(Debug, Default)]
pub(crate) struct FillTable {
    fills: Vec<Rgb>,
}

impl FillTable {
    pub(crate) fn new() -> Self {
        FillTable { fills: Vec::new() }
    }

    pub(crate) fn add(&mut self, color: Rgb) -> FillId {
        let id = FillId(self.fills.len() as u32);
        self.fills.push(color);
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.fills.len()
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="1">
    <font><sz val="11"/><name val="Calibri"/></font>
  </fonts>"#,
        );

        // Fills: Excel requires the first two to be none and gray125
        xml.push_str(&format!("\n  <fills count=\"{}\">", self.fills.len() + 2));
        xml.push_str("\n    <fill><patternFill patternType=\"none\"/></fill>");
        xml.push_str("\n    <fill><patternFill patternType=\"gray125\"/></fill>");
        for color in &self.fills {
            xml.push_str(&format!(
                "\n    <fill><patternFill patternType=\"solid\"><fgColor rgb=\"FF{}\"/><bgColor indexed=\"64\"/></patternFill></fill>",
                color.to_hex()
            ));
        }
        xml.push_str("\n  </fills>");

        xml.push_str(
            r#"
  <borders count="1">
    <border><left/><right/><top/><bottom/><diagonal/></border>
  </borders>
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        // cellXfs: default xf plus one per registered fill
        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.fills.len() + 1));
        xml.push_str("\n    <xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/>");
        for i in 0..self.fills.len() {
            xml.push_str(&format!(
                "\n    <xf numFmtId=\"0\" fontId=\"0\" fillId=\"{}\" borderId=\"0\" xfId=\"0\" applyFill=\"1\"/>",
                FillId(i as u32).fill_index()
            ));
        }
        xml.push_str("\n  </cellXfs>");

        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
</styleSheet>"#,
        );

        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut table = FillTable::new();
        assert_eq!(table.add(Rgb::new(1, 2, 3)), FillId(0));
        assert_eq!(table.add(Rgb::new(4, 5, 6)), FillId(1));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_xf_and_fill_offsets() {
        // xf 0 and fills 0/1 are reserved by the format
        let id = FillId(0);
        assert_eq!(id.xf_index(), 1);
        assert_eq!(id.fill_index(), 2);
    }

    #[test]
    fn test_styles_xml_contains_solid_fills() {
        let mut table = FillTable::new();
        table.add(Rgb::new(0xAB, 0xCD, 0xEF));
        let xml = table.to_styles_xml();

        assert!(xml.contains("patternType=\"none\""));
        assert!(xml.contains("patternType=\"gray125\""));
        assert!(xml.contains("fgColor rgb=\"FFABCDEF\""));
        assert!(xml.contains("<fills count=\"3\">"));
        assert!(xml.contains("<cellXfs count=\"2\">"));
        assert!(xml.contains("fillId=\"2\" borderId=\"0\" xfId=\"0\" applyFill=\"1\""));
    }

    #[test]
    fn test_empty_table_still_valid() {
        let xml = FillTable::new().to_styles_xml();
        assert!(xml.contains("<fills count=\"2\">"));
        assert!(xml.contains("<cellXfs count=\"1\">"));
    }
}
