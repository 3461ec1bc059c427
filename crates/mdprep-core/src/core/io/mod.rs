//! Provides input functionality for molecular structure files.
//!
//! Structure files are read into a [`Molecule`](crate::core::models::molecule::Molecule)
//! through the [`traits::StructureFile`] trait. Only the information needed to resolve
//! atom selections and per-frame coordinates is retained.

pub mod pdb;
pub mod traits;
