//! # Protocols Module
//!
//! Generates ready-to-run simulation directories for the ACEMD engine.
//!
//! ## Overview
//!
//! A protocol is a validated configuration object whose `write` method turns an input
//! directory (typically the output of an equilibration) into an output directory holding
//! the copied input files, the ACEMD `input` configuration and any Tcl force script.
//!
//! ## Key Components
//!
//! - [`production::Production`] - Production runs with an optional flat-bottom restraint
//! - [`acemd::Acemd`] - Typed ACEMD configuration and directory setup
//! - [`flatbottom`] - The restraint box and its Tcl script
//! - [`error`] - Configuration and protocol errors

pub mod acemd;
pub mod error;
pub mod flatbottom;
pub mod production;
