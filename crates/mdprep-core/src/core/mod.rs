//! # Core Module
//!
//! Foundation types shared by every other layer of mdprep.
//!
//! ## Overview
//!
//! Nothing in here knows about protocols or metrics. The module provides:
//!
//! - **Resource lookup** ([`home`]) - Installation root, bundled data and native library directories
//! - **Molecular Representation** ([`models`]) - Atoms and multi-frame molecules
//! - **File I/O** ([`io`]) - Reading structure files into a [`models::molecule::Molecule`]
//! - **Atom Selection** ([`selection`]) - VMD-style selection strings resolved to atom indices
//! - **Identifiers** ([`utils`]) - Static residue and atom name tables
//!
//! ## Usage
//!
//! ```ignore
//! use mdprep::core::io::{pdb::PdbFile, traits::StructureFile};
//!
//! let molecule = PdbFile::read_from_path("structure.pdb")?;
//! let ca_atoms = molecule.indices("protein and name CA")?;
//! ```

pub mod home;
pub mod io;
pub mod models;
pub mod selection;
pub mod utils;
