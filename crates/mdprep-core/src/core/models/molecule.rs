use super::atom::Atom;
use crate::core::selection::{self, SelectionError};
use crate::core::utils::geometry;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Frame has {found} coordinates but the molecule has {expected} atoms")]
    FrameSizeMismatch { expected: usize, found: usize },
}

/// A molecular structure: a flat, ordered atom list plus one coordinate set per frame.
///
/// Atom indices are 0-based positions in the atom list and are the indices handed to
/// the MD engine. Frame 0 is filled while atoms are added; further frames are appended
/// whole with [`Molecule::push_frame`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    frames: Vec<Vec<Point3<f64>>>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an atom with its frame-0 position and returns its index.
    ///
    /// Atoms must all be added before the first [`Molecule::push_frame`] call.
    pub fn add_atom(&mut self, atom: Atom, position: Point3<f64>) -> usize {
        if self.frames.is_empty() {
            self.frames.push(Vec::new());
        }
        self.atoms.push(atom);
        self.frames[0].push(position);
        self.atoms.len() - 1
    }

    /// Appends a full coordinate set as a new frame.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::FrameSizeMismatch`] if `coords` does not hold exactly one
    /// position per atom.
    pub fn push_frame(&mut self, coords: Vec<Point3<f64>>) -> Result<(), MoleculeError> {
        if coords.len() != self.atoms.len() {
            return Err(MoleculeError::FrameSizeMismatch {
                expected: self.atoms.len(),
                found: coords.len(),
            });
        }
        self.frames.push(coords);
        Ok(())
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, frame: usize) -> Option<&[Point3<f64>]> {
        self.frames.get(frame).map(Vec::as_slice)
    }

    pub fn position(&self, index: usize, frame: usize) -> Option<&Point3<f64>> {
        self.frames.get(frame)?.get(index)
    }

    /// Resolves a selection expression to the ascending list of matching atom indices.
    pub fn indices(&self, expr: &str) -> Result<Vec<usize>, SelectionError> {
        let sel = selection::parse(expr)?;
        Ok(self
            .atoms
            .iter()
            .enumerate()
            .filter(|(index, atom)| sel.matches(*index, atom))
            .map(|(index, _)| index)
            .collect())
    }

    /// Geometric center of the given atoms in one frame.
    ///
    /// Returns `None` if `indices` is empty, the frame does not exist, or any index is
    /// out of range.
    pub fn centroid(&self, indices: &[usize], frame: usize) -> Option<Point3<f64>> {
        let coords = self.frames.get(frame)?;
        let points = indices
            .iter()
            .map(|&i| coords.get(i))
            .collect::<Option<Vec<_>>>()?;
        geometry::centroid(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_residue_molecule() -> Molecule {
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new(1, "N", "ALA", 1, 'A'), Point3::new(0.0, 0.0, 0.0));
        mol.add_atom(Atom::new(2, "CA", "ALA", 1, 'A'), Point3::new(1.0, 0.0, 0.0));
        mol.add_atom(Atom::new(3, "CA", "GLY", 2, 'A'), Point3::new(3.0, 0.0, 0.0));
        mol
    }

    #[test]
    fn new_molecule_has_no_frames() {
        let mol = Molecule::new();
        assert_eq!(mol.num_atoms(), 0);
        assert_eq!(mol.num_frames(), 0);
        assert!(mol.frame(0).is_none());
    }

    #[test]
    fn add_atom_fills_first_frame() {
        let mol = two_residue_molecule();
        assert_eq!(mol.num_atoms(), 3);
        assert_eq!(mol.num_frames(), 1);
        assert_eq!(mol.position(1, 0), Some(&Point3::new(1.0, 0.0, 0.0)));
        assert_eq!(mol.atom(2).map(|a| a.resname.as_str()), Some("GLY"));
    }

    #[test]
    fn push_frame_rejects_wrong_atom_count() {
        let mut mol = two_residue_molecule();
        let result = mol.push_frame(vec![Point3::origin(); 2]);
        assert_eq!(
            result,
            Err(MoleculeError::FrameSizeMismatch {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(mol.num_frames(), 1);
    }

    #[test]
    fn push_frame_appends_coordinates() {
        let mut mol = two_residue_molecule();
        mol.push_frame(vec![Point3::new(9.0, 9.0, 9.0); 3]).unwrap();
        assert_eq!(mol.num_frames(), 2);
        assert_eq!(mol.position(0, 1), Some(&Point3::new(9.0, 9.0, 9.0)));
    }

    #[test]
    fn indices_returns_matching_atoms_in_order() {
        let mol = two_residue_molecule();
        assert_eq!(mol.indices("name CA").unwrap(), vec![1, 2]);
        assert_eq!(mol.indices("resname ALA").unwrap(), vec![0, 1]);
        assert!(mol.indices("chain B").unwrap().is_empty());
    }

    #[test]
    fn centroid_uses_requested_frame() {
        let mut mol = two_residue_molecule();
        mol.push_frame(vec![
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
            Point3::new(0.0, 6.0, 0.0),
        ])
        .unwrap();

        let c0 = mol.centroid(&[1, 2], 0).unwrap();
        assert!((c0.x - 2.0).abs() < 1e-12);
        let c1 = mol.centroid(&[1, 2], 1).unwrap();
        assert!((c1.y - 5.0).abs() < 1e-12);
        assert!(mol.centroid(&[], 0).is_none());
        assert!(mol.centroid(&[5], 0).is_none());
    }
}
