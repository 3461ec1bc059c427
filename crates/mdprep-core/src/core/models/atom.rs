use crate::core::utils::identifiers;
use std::str::FromStr;

/// The PDB record an atom was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordType {
    /// Standard polymer atom (`ATOM`).
    #[default]
    Atom,
    /// Non-polymer atom such as ligands, ions and water (`HETATM`).
    Hetatm,
}

impl FromStr for RecordType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ATOM" => Ok(RecordType::Atom),
            "HETATM" => Ok(RecordType::Hetatm),
            _ => Err(()),
        }
    }
}

/// Topology-level description of one atom.
///
/// Coordinates are frame-dependent and therefore live in
/// [`Molecule`](super::molecule::Molecule), indexed by the atom's position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number from the source file.
    pub serial: usize,
    /// Atom name (e.g. "CA", "HB1").
    pub name: String,
    /// Residue name as written in the source file (e.g. "ALA", "HSP").
    pub resname: String,
    /// Residue sequence number.
    pub resid: i32,
    /// Insertion code, if any.
    pub insertion: Option<char>,
    /// Single-character chain identifier; a blank chain is stored as `' '`.
    pub chain: char,
    /// Segment identifier (may be empty).
    pub segid: String,
    /// Element symbol (may be empty when the source file omits it).
    pub element: String,
    pub record: RecordType,
}

impl Atom {
    pub fn new(serial: usize, name: &str, resname: &str, resid: i32, chain: char) -> Self {
        Self {
            serial,
            name: name.to_string(),
            resname: resname.to_string(),
            resid,
            insertion: None,
            chain,
            segid: String::new(),
            element: String::new(),
            record: RecordType::default(),
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        identifiers::is_hydrogen(&self.name, &self.element)
    }

    pub fn is_backbone(&self) -> bool {
        self.is_protein() && identifiers::is_backbone_atom(&self.name)
    }

    pub fn is_protein(&self) -> bool {
        identifiers::is_protein_residue(&self.resname)
    }

    pub fn is_water(&self) -> bool {
        identifiers::is_water_residue(&self.resname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let atom = Atom::new(7, "CA", "ALA", 12, 'A');
        assert_eq!(atom.serial, 7);
        assert_eq!(atom.name, "CA");
        assert_eq!(atom.resname, "ALA");
        assert_eq!(atom.resid, 12);
        assert_eq!(atom.chain, 'A');
        assert_eq!(atom.insertion, None);
        assert!(atom.segid.is_empty());
        assert!(atom.element.is_empty());
        assert_eq!(atom.record, RecordType::Atom);
    }

    #[test]
    fn classification_helpers_follow_residue_and_atom_names() {
        let ca = Atom::new(1, "CA", "GLY", 1, 'A');
        assert!(ca.is_protein());
        assert!(ca.is_backbone());
        assert!(!ca.is_hydrogen());

        let mut calcium = Atom::new(2, "CA", "CAL", 2, 'B');
        calcium.element = "CA".to_string();
        assert!(!calcium.is_protein());
        assert!(!calcium.is_backbone());

        let water_h = Atom::new(3, "H1", "HOH", 3, 'W');
        assert!(water_h.is_water());
        assert!(water_h.is_hydrogen());
    }

    #[test]
    fn record_type_parses_pdb_record_names() {
        assert_eq!(RecordType::from_str("ATOM"), Ok(RecordType::Atom));
        assert_eq!(RecordType::from_str("HETATM"), Ok(RecordType::Hetatm));
        assert_eq!(RecordType::from_str("ATOM  "), Ok(RecordType::Atom));
        assert_eq!(RecordType::from_str("CONECT"), Err(()));
    }
}
