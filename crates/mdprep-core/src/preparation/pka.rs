use super::residue_data::ResidueLike;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const SUMMARY_MARKER: &str = "SUMMARY OF THIS PREDICTION";

#[derive(Debug, Error)]
pub enum PkaParseError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("No 'SUMMARY OF THIS PREDICTION' section found")]
    MissingSummary,
    #[error("Invalid summary row at line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },
}

/// A titratable group of the averaged conformation with its predicted pKa.
#[derive(Debug, Clone, PartialEq)]
pub struct PkaGroup {
    pub resname: String,
    pub resid: i32,
    pub chain: char,
    pub pka: f64,
}

impl ResidueLike for PkaGroup {
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

/// The per-group pKa predictions for a structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PkaResults {
    pub groups: Vec<PkaGroup>,
}

impl PkaResults {
    pub fn new(groups: Vec<PkaGroup>) -> Self {
        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Parses the summary block of a propKa `.pka` report.
    ///
    /// Rows are read from the line after the `SUMMARY OF THIS PREDICTION` marker until a
    /// dashed separator line or the end of input. The column header row is skipped.
    pub fn read_from(reader: impl BufRead) -> Result<Self, PkaParseError> {
        let mut groups = Vec::new();
        let mut in_summary = false;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = i + 1;
            let trimmed = line.trim();

            if !in_summary {
                in_summary = trimmed.starts_with(SUMMARY_MARKER);
                continue;
            }

            if trimmed.starts_with("---") {
                break;
            }
            if trimmed.is_empty() || trimmed.starts_with("Group") {
                continue;
            }

            groups.push(parse_summary_row(trimmed, line_num)?);
        }

        if !in_summary {
            return Err(PkaParseError::MissingSummary);
        }

        debug!("Read {} pKa group(s) from summary", groups.len());
        Ok(Self { groups })
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, PkaParseError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }
}

fn parse_summary_row(row: &str, line: usize) -> Result<PkaGroup, PkaParseError> {
    let invalid = |reason: String| PkaParseError::InvalidRow { line, reason };

    let fields: Vec<&str> = row.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(invalid(format!(
            "expected at least 4 fields, found {}",
            fields.len()
        )));
    }

    let resid = fields[1]
        .parse::<i32>()
        .map_err(|_| invalid(format!("invalid residue number '{}'", fields[1])))?;

    let mut chain_chars = fields[2].chars();
    let chain = match (chain_chars.next(), chain_chars.next()) {
        (Some(c), None) => c,
        _ => return Err(invalid(format!("invalid chain identifier '{}'", fields[2]))),
    };

    let pka = fields[3]
        .parse::<f64>()
        .map_err(|_| invalid(format!("invalid pKa value '{}'", fields[3])))?;

    Ok(PkaGroup {
        resname: fields[0].to_string(),
        resid,
        chain,
        pka,
    })
}
