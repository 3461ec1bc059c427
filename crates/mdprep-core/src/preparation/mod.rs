//! Residue-level bookkeeping for protein preparation.
//!
//! [`residue_data::ResidueData`] collects what each preparation step decided for a
//! residue: the predicted pKa, the protonation code and the list of force-field patches.
//! [`pka::PkaResults`] carries pKa predictions into that table.

pub mod pka;
pub mod residue_data;
