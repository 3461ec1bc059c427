//! # Core Models Module
//!
//! Data structures describing a molecular system as read from a structure file.
//!
//! ## Overview
//!
//! The representation is flat: a [`molecule::Molecule`] is an ordered list
//! of [`atom::Atom`] records plus one coordinate set per frame. Atom indices are plain
//! 0-based positions, which is what selections resolve to and what the MD engine expects
//! in its force scripts.
//!
//! ## Key Components
//!
//! - [`atom`] - Per-atom topology fields (names, residue, chain, segment, element)
//! - [`molecule`] - Atom list, frames, selection and centroid helpers
//!
//! ## Usage
//!
//! ```ignore
//! use mdprep::core::models::{atom::Atom, molecule::Molecule};
//! use nalgebra::Point3;
//!
//! let mut mol = Molecule::new();
//! mol.add_atom(Atom::new(1, "CA", "ALA", 1, 'A'), Point3::new(0.0, 0.0, 0.0));
//! assert_eq!(mol.indices("name CA")?, vec![0]);
//! ```

pub mod atom;
pub mod molecule;
