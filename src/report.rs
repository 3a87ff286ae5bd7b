use std::io::Write;

use crate::error::MolpropError;
use crate::style::{GREEN, RED, paint};
use crate::xref::SecondaryIdMap;

pub const NOT_FOUND_MARKER: &str = "***NO-COMPOUND-FOUND***";

/// Everything reported for one resolved compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundReport {
    pub cid: u64,
    pub secondary_ids: SecondaryIdMap,
    pub properties: Vec<(&'static str, String)>,
}

/// Writes item blocks to the report file and the live display.
///
/// Display lines are written as soon as they are produced. File lines are held until
/// [`ReportWriter::commit`], so an item dropped with [`ReportWriter::discard`] never reaches
/// the file.
pub struct ReportWriter<F: Write, D: Write> {
    file: F,
    display: D,
    color: bool,
    pending: String,
}

impl<F: Write, D: Write> ReportWriter<F, D> {
    pub fn new(file: F, display: D, color: bool) -> Self {
        Self {
            file,
            display,
            color,
            pending: String::new(),
        }
    }

    pub fn begin(&mut self, index: u64, label: &str) -> Result<(), MolpropError> {
        let tag = format!("Compound #{index}:");
        let shown = format!("{} {label}", paint(self.color, GREEN, &tag));
        self.emit(&format!("{tag} {label}"), &shown)
    }

    pub fn write_compound(&mut self, report: &CompoundReport) -> Result<(), MolpropError> {
        self.line(&format!("PUBCHEM ID: {}", report.cid))?;
        for (db, id) in &report.secondary_ids {
            self.line(&format!("{db} ID: {id}"))?;
        }
        for (name, value) in &report.properties {
            self.line(&format!("{name}: {value}"))?;
        }
        self.line("")
    }

    pub fn write_not_found(&mut self) -> Result<(), MolpropError> {
        let shown = paint(self.color, RED, NOT_FOUND_MARKER);
        self.emit(NOT_FOUND_MARKER, &shown)?;
        self.line("")
    }

    /// Appends the current item's block to the file and flushes it.
    pub fn commit(&mut self) -> Result<(), MolpropError> {
        self.file
            .write_all(self.pending.as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(|err| MolpropError::ReportWrite(err.to_string()))?;
        self.pending.clear();
        self.display
            .flush()
            .map_err(|err| MolpropError::ReportWrite(err.to_string()))
    }

    /// Drops the current item's block without touching the file.
    pub fn discard(&mut self) {
        self.pending.clear();
    }

    pub fn into_sinks(self) -> (F, D) {
        (self.file, self.display)
    }

    fn line(&mut self, text: &str) -> Result<(), MolpropError> {
        self.emit(text, text)
    }

    fn emit(&mut self, plain: &str, shown: &str) -> Result<(), MolpropError> {
        writeln!(self.display, "{shown}").map_err(|err| MolpropError::ReportWrite(err.to_string()))?;
        self.pending.push_str(plain);
        self.pending.push('\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::Database;

    use super::*;

    fn writer() -> ReportWriter<Vec<u8>, Vec<u8>> {
        ReportWriter::new(Vec::new(), Vec::new(), false)
    }

    #[test]
    fn compound_block_layout() {
        let mut report = writer();
        report.begin(1, "ethanol-test").unwrap();
        report
            .write_compound(&CompoundReport {
                cid: 702,
                secondary_ids: [(Database::Chebi, "CHEBI:16236".to_string())].into(),
                properties: vec![("molecular_formula", "C2H6O".to_string())],
            })
            .unwrap();
        report.commit().unwrap();

        let (file, display) = report.into_sinks();
        let file = String::from_utf8(file).unwrap();
        assert_eq!(
            file,
            "Compound #1: ethanol-test\nPUBCHEM ID: 702\nCHEBI ID: CHEBI:16236\nmolecular_formula: C2H6O\n\n"
        );
        assert_eq!(String::from_utf8(display).unwrap(), file);
    }

    #[test]
    fn not_found_block_keeps_empty_label() {
        let mut report = writer();
        report.begin(4, "").unwrap();
        report.write_not_found().unwrap();
        report.commit().unwrap();
        let (file, _) = report.into_sinks();
        assert_eq!(
            String::from_utf8(file).unwrap(),
            "Compound #4: \n***NO-COMPOUND-FOUND***\n\n"
        );
    }

    #[test]
    fn discarded_item_never_reaches_file() {
        let mut report = writer();
        report.begin(1, "kept").unwrap();
        report.write_not_found().unwrap();
        report.commit().unwrap();
        report.begin(2, "dropped").unwrap();
        report.discard();
        report.commit().unwrap();

        let (file, display) = report.into_sinks();
        let file = String::from_utf8(file).unwrap();
        assert!(!file.contains("dropped"));
        assert!(String::from_utf8(display).unwrap().contains("Compound #2: dropped"));
    }

    #[test]
    fn color_only_affects_display() {
        let mut report = ReportWriter::new(Vec::new(), Vec::new(), true);
        report.begin(1, "x").unwrap();
        report.write_not_found().unwrap();
        report.commit().unwrap();
        let (file, display) = report.into_sinks();
        assert!(!String::from_utf8(file).unwrap().contains('\x1b'));
        assert!(String::from_utf8(display).unwrap().contains("\x1b[31m"));
    }
}
