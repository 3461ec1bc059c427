use super::table::ProjectionTable;
use super::{Projection, Trajectory};
use crate::core::models::molecule::Molecule;
use tracing::debug;

/// A placeholder metric that returns zero for every frame and dimension.
///
/// Useful as a starting point for new metrics, or to walk a set of simulations
/// without computing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullProjection {
    ndim: usize,
    precalculated: bool,
}

impl NullProjection {
    pub fn new(ndim: usize) -> Self {
        debug!("NullProjection initialized with {} dimension(s)", ndim);
        Self {
            ndim,
            precalculated: false,
        }
    }

    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// Whether [`Projection::precalculate`] has run.
    pub fn is_precalculated(&self) -> bool {
        self.precalculated
    }
}

impl Projection for NullProjection {
    fn mapping(&self) -> Vec<String> {
        (1..=self.ndim).map(|i| format!("Dummy{}", i)).collect()
    }

    fn precalculate(&mut self, topology: &Molecule) {
        debug!(
            "NullProjection precalculating for topology with {} atom(s)",
            topology.num_atoms()
        );
        self.precalculated = true;
    }

    fn project(&self, trajectory: &dyn Trajectory) -> ProjectionTable {
        ProjectionTable::zeros(trajectory.num_frames(), self.ndim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::projections::project_all;
    use nalgebra::Point3;

    struct FrameCount(usize);

    impl Trajectory for FrameCount {
        fn num_frames(&self) -> usize {
            self.0
        }
    }

    #[test]
    fn project_returns_zero_table_with_one_row_per_frame() {
        let projection = NullProjection::new(2);
        let table = projection.project(&FrameCount(6));
        assert_eq!(table.shape(), (6, 2));
        assert!(table.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn single_dimension_projection_has_one_column() {
        let projection = NullProjection::new(1);
        assert_eq!(projection.project(&FrameCount(6)).shape(), (6, 1));
    }

    #[test]
    fn mapping_labels_dimensions_from_one() {
        assert_eq!(NullProjection::new(2).mapping(), vec!["Dummy1", "Dummy2"]);
        assert!(NullProjection::new(0).mapping().is_empty());
    }

    #[test]
    fn project_accepts_molecule_frames() {
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new(1, "CA", "ALA", 1, 'A'), Point3::origin());
        mol.push_frame(vec![Point3::new(1.0, 0.0, 0.0)]).unwrap();
        mol.push_frame(vec![Point3::new(2.0, 0.0, 0.0)]).unwrap();

        let table = NullProjection::new(3).project(&mol);
        assert_eq!(table.shape(), (3, 3));
    }

    #[test]
    fn project_all_runs_precalculation_once_and_keeps_order() {
        let topology = Molecule::new();
        let mut projection = NullProjection::new(2);
        let short = FrameCount(2);
        let long = FrameCount(5);

        let tables = project_all(&mut projection, &topology, &[&short, &long]);

        assert!(projection.is_precalculated());
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].shape(), (2, 2));
        assert_eq!(tables[1].shape(), (5, 2));
    }
}
