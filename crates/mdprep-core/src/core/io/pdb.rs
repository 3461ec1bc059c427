use crate::core::io::traits::StructureFile;
use crate::core::models::atom::{Atom, RecordType};
use crate::core::models::molecule::{Molecule, MoleculeError};
use nalgebra::Point3;
use std::io::{self, BufRead};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Inconsistent model ending on line {line}: {source}")]
    Inconsistency {
        line: usize,
        #[source]
        source: MoleculeError,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: &'static str, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: &'static str, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: &'static str },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

const MIN_ATOM_LINE_LEN: usize = 54;

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_float(
    line: &str,
    line_num: usize,
    start: usize,
    end: usize,
    columns: &'static str,
) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns,
            value: value.into(),
        },
    })
}

/// Reader for the fixed-column Protein Data Bank format.
///
/// Each `MODEL` after the first contributes one extra frame to the molecule; those
/// models must list the same atoms in the same order as the first. Serial numbers that
/// do not fit the column (written as `*****` by some tools) fall back to sequential
/// numbering.
pub struct PdbFile;

impl PdbFile {
    fn parse_atom_line(
        line: &str,
        line_num: usize,
        fallback_serial: usize,
    ) -> Result<(Atom, Point3<f64>), PdbError> {
        if line.len() < MIN_ATOM_LINE_LEN {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::LineTooShort,
            });
        }

        let record = RecordType::from_str(slice_and_trim(line, 0, 6)).unwrap_or_default();
        let serial = slice_and_trim(line, 6, 11)
            .parse::<usize>()
            .unwrap_or(fallback_serial);

        let name = slice_and_trim(line, 12, 16);
        if name.is_empty() {
            return Err(PdbError::Parse {
                line: line_num,
                kind: PdbParseErrorKind::MissingRequiredField { columns: "13-16" },
            });
        }
        let resname = slice_and_trim(line, 17, 21);
        let chain = line.get(21..22).and_then(|s| s.chars().next()).unwrap_or(' ');

        let resid_str = slice_and_trim(line, 22, 26);
        let resid: i32 = resid_str.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidInt {
                columns: "23-26",
                value: resid_str.into(),
            },
        })?;
        let insertion = line
            .get(26..27)
            .and_then(|s| s.chars().next())
            .filter(|c| !c.is_whitespace());

        let x = parse_float(line, line_num, 30, 38, "31-38")?;
        let y = parse_float(line, line_num, 38, 46, "39-46")?;
        let z = parse_float(line, line_num, 46, 54, "47-54")?;

        let mut atom = Atom::new(serial, name, resname, resid, chain);
        atom.record = record;
        atom.insertion = insertion;
        atom.segid = slice_and_trim(line, 72, 76).to_string();
        atom.element = slice_and_trim(line, 76, 78).to_string();

        Ok((atom, Point3::new(x, y, z)))
    }
}

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Molecule, Self::Error> {
        let mut molecule = Molecule::new();
        let mut models_seen = 0usize;
        let mut pending_frame: Option<Vec<Point3<f64>>> = None;
        let mut last_line = 0usize;

        let flush = |molecule: &mut Molecule,
                     pending: &mut Option<Vec<Point3<f64>>>,
                     line: usize|
         -> Result<(), PdbError> {
            if let Some(coords) = pending.take() {
                molecule
                    .push_frame(coords)
                    .map_err(|source| PdbError::Inconsistency { line, source })?;
            }
            Ok(())
        };

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            last_line = line_num;

            match slice_and_trim(&line, 0, 6) {
                "MODEL" => {
                    models_seen += 1;
                    if models_seen > 1 {
                        flush(&mut molecule, &mut pending_frame, line_num)?;
                        pending_frame = Some(Vec::with_capacity(molecule.num_atoms()));
                    }
                }
                "ENDMDL" => flush(&mut molecule, &mut pending_frame, line_num)?,
                "ATOM" | "HETATM" => {
                    if models_seen > 1 && pending_frame.is_none() {
                        // Stray records between ENDMDL and the next MODEL.
                        continue;
                    }
                    let fallback_serial = molecule.num_atoms() + 1;
                    let (atom, position) =
                        Self::parse_atom_line(&line, line_num, fallback_serial)?;
                    match pending_frame.as_mut() {
                        Some(frame) => frame.push(position),
                        None => {
                            molecule.add_atom(atom, position);
                        }
                    }
                }
                "END" => break,
                _ => {}
            }
        }
        flush(&mut molecule, &mut pending_frame, last_line)?;

        if molecule.num_atoms() == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok(molecule)
    }
}
