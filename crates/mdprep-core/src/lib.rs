//! # mdprep Core Library
//!
//! Building blocks for preparing and analysing molecular-dynamics simulations.
//!
//! ## Architectural Philosophy
//!
//! The library is split into a foundation layer and three feature layers that only
//! depend on the foundation:
//!
//! - **[`core`]: The Foundation.** Installation-relative resource lookup, the
//!   `Molecule` structure model, a PDB reader and the atom selection language.
//!
//! - **[`preparation`]: Protein Preparation Bookkeeping.** The `ResidueData` table that
//!   records pKa values, protonation states and patches decided for every residue, plus
//!   the propKa result set it imports from.
//!
//! - **[`projections`]: Trajectory Metrics.** The `Projection` trait that turns a
//!   trajectory into a fixed-shape per-frame table, with `NullProjection` as the template
//!   implementation.
//!
//! - **[`protocols`]: Simulation Setup.** The ACEMD engine configuration and the
//!   `Production` protocol, which renders the optional flat-bottom restraint script and
//!   emits a ready-to-run input directory.

pub mod core;
pub mod preparation;
pub mod projections;
pub mod protocols;
