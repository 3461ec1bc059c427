//! # Projections Module
//!
//! Per-frame metrics over simulation trajectories.
//!
//! ## Overview
//!
//! A [`Projection`] is a stateless transform from a trajectory to a fixed-shape table
//! with one row per frame and one column per projected dimension. Column labels come
//! from [`Projection::mapping`], so a table can always be paired with the names of its
//! columns.
//!
//! Anything that can report a frame count implements [`Trajectory`]. When every
//! trajectory shares a single topology, the [`Molecule`] is handed to
//! [`Projection::precalculate`] once before projecting.
//!
//! ## Key Components
//!
//! - [`table`] - Row-major `f32` result table
//! - [`null`] - The zero-valued template projection
//!
//! ## Usage
//!
//! ```ignore
//! use mdprep::projections::{Projection, null::NullProjection};
//!
//! let projection = NullProjection::new(2);
//! let table = projection.project(&molecule);
//! assert_eq!(table.shape(), (molecule.num_frames(), 2));
//! ```

pub mod null;
pub mod table;

use crate::core::models::molecule::Molecule;
use table::ProjectionTable;

/// Source of frames for a projection.
pub trait Trajectory {
    fn num_frames(&self) -> usize;
}

impl Trajectory for Molecule {
    fn num_frames(&self) -> usize {
        Molecule::num_frames(self)
    }
}

pub trait Projection {
    /// Labels of the projected dimensions, one per table column.
    fn mapping(&self) -> Vec<String>;

    /// Hook called once with the shared topology before any trajectory is projected.
    ///
    /// Only invoked when all trajectories use the same topology. The default does nothing.
    fn precalculate(&mut self, _topology: &Molecule) {}

    /// Computes the metric for every frame of `trajectory`.
    fn project(&self, trajectory: &dyn Trajectory) -> ProjectionTable;
}

/// Projects a batch of trajectories that share one topology.
///
/// The projection's [`Projection::precalculate`] hook runs once before the first
/// trajectory is processed. Tables are returned in input order.
pub fn project_all(
    projection: &mut dyn Projection,
    topology: &Molecule,
    trajectories: &[&dyn Trajectory],
) -> Vec<ProjectionTable> {
    projection.precalculate(topology);
    trajectories
        .iter()
        .map(|trajectory| projection.project(*trajectory))
        .collect()
}
