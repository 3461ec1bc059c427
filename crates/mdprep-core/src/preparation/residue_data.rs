use super::pka::PkaResults;
use crate::core::models::atom::Atom;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Protonation code assigned to residues that no preparation step has decided on.
pub const UNKNOWN_PROTONATION: &str = "UNK";

#[derive(Debug, Error)]
pub enum ResidueDataError {
    #[error("CSV export error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

/// Anything that identifies a residue by number, name and chain.
pub trait ResidueLike {
    fn resid(&self) -> i32;
    fn resname(&self) -> &str;
    fn chain(&self) -> char;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueKey {
    pub resid: i32,
    pub resname: String,
    pub chain: char,
}

impl ResidueKey {
    pub fn new(resid: i32, resname: impl Into<String>, chain: char) -> Self {
        Self {
            resid,
            resname: resname.into(),
            chain,
        }
    }
}

impl ResidueLike for ResidueKey {
    fn resid(&self) -> i32 {
        self.resid
    }
    fn resname(&self) -> &str {
        &self.resname
    }
    fn chain(&self) -> char {
        self.chain
    }
}

impl ResidueLike for Atom {
    fn resid(&self) -> i32 {
        self.resid
    }
    fn resname(&self) -> &str {
        &self.resname
    }
    fn chain(&self) -> char {
        self.chain
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResidueRecord {
    pub resid: i32,
    pub resname: String,
    pub chain: char,
    /// Predicted pKa, `NaN` when no prediction exists.
    pub pka: f64,
    pub protonation: String,
    pub patches: Vec<String>,
}

impl ResidueRecord {
    fn new(key: &ResidueKey) -> Self {
        Self {
            resid: key.resid,
            resname: key.resname.clone(),
            chain: key.chain,
            pka: f64::NAN,
            protonation: UNKNOWN_PROTONATION.to_string(),
            patches: Vec::new(),
        }
    }

    pub fn key(&self) -> ResidueKey {
        ResidueKey::new(self.resid, self.resname.clone(), self.chain)
    }
}

impl fmt::Display for ResidueRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4} {:>4} {} : pKa=",
            self.resname, self.resid, self.chain
        )?;
        if self.pka.is_nan() {
            f.write_str("nan")?;
        } else {
            write!(f, "{:.6}", self.pka)?;
        }
        write!(f, ", state={}, patches=[", self.protonation)?;
        for (i, patch) in self.patches.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{}'", patch)?;
        }
        f.write_str("]")
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    resid: i32,
    resname: &'a str,
    chain: char,
    pka: f64,
    protonation: &'a str,
    patches: String,
}

/// Per-residue results of the preparation steps (pKa, protonation state, patches).
///
/// Rows are keyed by `(resid, resname, chain)` and kept in first-seen order. A row is
/// created on first reference and never removed, so each key maps to exactly one row
/// for the lifetime of the table.
#[derive(Debug, Clone, Default)]
pub struct ResidueData {
    records: Vec<ResidueRecord>,
    index: HashMap<ResidueKey, usize>,
}

impl ResidueData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResidueRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResidueRecord> {
        self.records.iter()
    }

    /// Looks up a row without creating it.
    pub fn find(&self, resid: i32, resname: &str, chain: char) -> Option<&ResidueRecord> {
        self.index
            .get(&ResidueKey::new(resid, resname, chain))
            .map(|&i| &self.records[i])
    }

    /// All rows with the given residue number, across names and chains.
    pub fn by_resid(&self, resid: i32) -> impl Iterator<Item = &ResidueRecord> {
        self.records.iter().filter(move |r| r.resid == resid)
    }

    /// Returns the row index for the residue, appending a default row if none exists.
    pub fn find_or_create(&mut self, resid: i32, resname: &str, chain: char) -> usize {
        let key = ResidueKey::new(resid, resname, chain);
        if let Some(&index) = self.index.get(&key) {
            return index;
        }

        let index = self.records.len();
        debug!(
            "Adding residue row {} for {} {} {}",
            index, resname, resid, chain
        );
        self.records.push(ResidueRecord::new(&key));
        self.index.insert(key, index);
        debug_assert_eq!(self.records.len(), self.index.len());
        index
    }

    pub fn set_protonation<R: ResidueLike + ?Sized>(&mut self, residue: &R, protonation: &str) {
        debug!(
            "Setting protonation of {} {} {} to {}",
            residue.resname(),
            residue.resid(),
            residue.chain(),
            protonation
        );
        let index = self.find_or_create(residue.resid(), residue.resname(), residue.chain());
        self.records[index].protonation = protonation.to_string();
    }

    pub fn append_patch<R: ResidueLike + ?Sized>(&mut self, residue: &R, patch: &str) {
        let index = self.find_or_create(residue.resid(), residue.resname(), residue.chain());
        self.records[index].patches.push(patch.to_string());
    }

    /// Copies the predicted pKa of every group onto its residue row, creating rows as needed.
    pub fn import_pka_values(&mut self, results: &PkaResults) {
        for group in &results.groups {
            let index = self.find_or_create(group.resid(), group.resname(), group.chain());
            self.records[index].pka = group.pka;
        }
        debug!("Imported {} pKa value(s)", results.groups.len());
    }

    /// Writes the table as CSV with a header row. Patches are space-joined.
    pub fn write_csv_to<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_writer(writer);
        for record in &self.records {
            writer.serialize(CsvRow {
                resid: record.resid,
                resname: &record.resname,
                chain: record.chain,
                pka: record.pka,
                protonation: &record.protonation,
                patches: record.patches.join(" "),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), ResidueDataError> {
        let to_err = |source| ResidueDataError::Csv {
            path: path.to_string_lossy().to_string(),
            source,
        };
        let file = std::fs::File::create(path).map_err(|e| to_err(csv::Error::from(e)))?;
        self.write_csv_to(file).map_err(to_err)
    }
}

impl fmt::Display for ResidueData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{}", record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preparation::pka::PkaGroup;

    #[test]
    fn find_or_create_returns_same_index_for_same_key() {
        let mut data = ResidueData::new();
        let first = data.find_or_create(57, "HIS", 'A');
        let again = data.find_or_create(57, "HIS", 'A');
        assert_eq!(first, again);
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn distinct_keys_get_distinct_rows_in_insertion_order() {
        let mut data = ResidueData::new();
        assert_eq!(data.find_or_create(16, "ILE", 'A'), 0);
        assert_eq!(data.find_or_create(16, "ILE", 'B'), 1);
        assert_eq!(data.find_or_create(16, "VAL", 'A'), 2);
        let resnames: Vec<_> = data.iter().map(|r| r.resname.as_str()).collect();
        assert_eq!(resnames, ["ILE", "ILE", "VAL"]);
        assert_eq!(data.by_resid(16).count(), 3);
    }

    #[test]
    fn new_rows_have_default_fields() {
        let mut data = ResidueData::new();
        let index = data.find_or_create(1, "ALA", 'A');
        let record = data.get(index).unwrap();
        assert!(record.pka.is_nan());
        assert_eq!(record.protonation, "UNK");
        assert!(record.patches.is_empty());
    }

    #[test]
    fn patches_are_appended_in_order() {
        let mut data = ResidueData::new();
        let residue = ResidueKey::new(57, "HIS", 'A');
        data.append_patch(&residue, "PEPTIDE");
        data.append_patch(&residue, "HIP");
        assert_eq!(
            data.find(57, "HIS", 'A').unwrap().patches,
            vec!["PEPTIDE", "HIP"]
        );
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn set_protonation_creates_and_overwrites() {
        let mut data = ResidueData::new();
        let atom = Atom::new(1, "CA", "HIS", 57, 'A');
        data.set_protonation(&atom, "HID");
        data.set_protonation(&atom, "HIP");
        assert_eq!(data.len(), 1);
        assert_eq!(data.find(57, "HIS", 'A').unwrap().protonation, "HIP");
    }

    #[test]
    fn import_pka_values_sets_pka_on_matching_rows() {
        let mut data = ResidueData::new();
        data.find_or_create(189, "ASP", 'A');
        let results = PkaResults::new(vec![
            PkaGroup {
                resname: "ASP".to_string(),
                resid: 189,
                chain: 'A',
                pka: 4.94907929,
            },
            PkaGroup {
                resname: "TYR".to_string(),
                resid: 20,
                chain: 'A',
                pka: 9.590845,
            },
        ]);

        data.import_pka_values(&results);

        assert_eq!(data.len(), 2);
        let asp: Vec<_> = data.by_resid(189).map(|r| r.pka).collect();
        assert_eq!(asp, vec![4.94907929]);
        assert_eq!(data.get(1).unwrap().resname, "TYR");
    }

    #[test]
    fn display_matches_row_layout() {
        let mut data = ResidueData::new();
        let ile = ResidueKey::new(16, "ILE", 'A');
        data.set_protonation(&ile, "ILE");
        data.append_patch(&ile, "NTERM");
        let tyr = ResidueKey::new(20, "TYR", 'A');
        data.set_protonation(&tyr, "TYR");
        data.append_patch(&tyr, "PEPTIDE");
        data.import_pka_values(&PkaResults::new(vec![PkaGroup {
            resname: "TYR".to_string(),
            resid: 20,
            chain: 'A',
            pka: 9.590845,
        }]));

        let text = data.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            [
                " ILE   16 A : pKa=nan, state=ILE, patches=['NTERM']",
                " TYR   20 A : pKa=9.590845, state=TYR, patches=['PEPTIDE']",
            ]
        );
    }

    #[test]
    fn display_of_empty_patch_list() {
        let mut data = ResidueData::new();
        data.find_or_create(5, "GLY", 'B');
        assert_eq!(
            data.to_string(),
            " GLY    5 B : pKa=nan, state=UNK, patches=[]\n"
        );
    }

    #[test]
    fn csv_export_has_header_and_joined_patches() {
        let mut data = ResidueData::new();
        let his = ResidueKey::new(57, "HIS", 'A');
        data.set_protonation(&his, "HIP");
        data.append_patch(&his, "PEPTIDE");
        data.append_patch(&his, "HIP");

        let mut buf = Vec::new();
        data.write_csv_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "resid,resname,chain,pka,protonation,patches");
        assert!(lines[1].starts_with("57,HIS,A,"));
        assert!(lines[1].ends_with(",HIP,PEPTIDE HIP"));
    }

    #[test]
    fn write_csv_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("residues.csv");
        let mut data = ResidueData::new();
        data.find_or_create(1, "ALA", 'A');
        data.write_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn write_csv_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("residues.csv");
        let err = ResidueData::new().write_csv(&path).unwrap_err();
        assert!(err.to_string().contains("residues.csv"));
    }
}
