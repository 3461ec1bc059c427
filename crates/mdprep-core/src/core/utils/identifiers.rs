use phf::{Set, phf_set};

static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "CA", "C", "O", "OXT", "OT1", "OT2",
};

// Standard amino acids plus the protonation and disulfide variants written by
// common force fields (CHARMM and AMBER naming).
static PROTEIN_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    "HSD", "HSE", "HSP", "HID", "HIE", "HIP", "CYX", "CYM", "ASH", "GLH",
    "LYN", "ARN", "ASPP", "GLUP", "LSN",
};

static WATER_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "TIP3", "TIP3P", "TIP4", "TIP4P", "SOL", "SPC", "H2O", "T3P",
};

pub fn is_backbone_atom(atom_name: &str) -> bool {
    BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

pub fn is_protein_residue(residue_name: &str) -> bool {
    PROTEIN_RESIDUE_NAMES.contains(residue_name.trim())
}

pub fn is_water_residue(residue_name: &str) -> bool {
    WATER_RESIDUE_NAMES.contains(residue_name.trim())
}

/// Decides whether an atom is a hydrogen, preferring the element column when present.
///
/// Without an element the first letter of the atom name decides, where a leading digit
/// (PDB names such as `1HB`) is skipped. Deuterium counts as hydrogen.
pub fn is_hydrogen(atom_name: &str, element: &str) -> bool {
    let element = element.trim();
    if !element.is_empty() {
        return element.eq_ignore_ascii_case("H") || element.eq_ignore_ascii_case("D");
    }
    let first_char = atom_name
        .trim()
        .chars()
        .find(|c| !c.is_ascii_digit())
        .map(|c| c.to_ascii_uppercase());
    matches!(first_char, Some('H') | Some('D'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_backbone_atom_recognizes_standard_backbone_atoms() {
        assert!(is_backbone_atom("N"));
        assert!(is_backbone_atom("CA"));
        assert!(is_backbone_atom("C"));
        assert!(is_backbone_atom("O"));
        assert!(is_backbone_atom("OXT"));
    }

    #[test]
    fn is_backbone_atom_is_case_sensitive_and_trims_whitespace() {
        assert!(!is_backbone_atom("ca"));
        assert!(is_backbone_atom(" CA "));
        assert!(!is_backbone_atom("CB"));
    }

    #[test]
    fn protein_residue_set_includes_protonation_variants() {
        assert!(is_protein_residue("ALA"));
        assert!(is_protein_residue("HSP"));
        assert!(is_protein_residue("CYX"));
        assert!(!is_protein_residue("HOH"));
        assert!(!is_protein_residue("LIG"));
    }

    #[test]
    fn water_residue_set_recognizes_common_models() {
        assert!(is_water_residue("HOH"));
        assert!(is_water_residue("TIP3"));
        assert!(!is_water_residue("ALA"));
    }

    #[test]
    fn is_hydrogen_uses_element_when_available() {
        assert!(is_hydrogen("HA", "H"));
        assert!(!is_hydrogen("HG", "HG"));
        assert!(is_hydrogen("X1", "D"));
    }

    #[test]
    fn is_hydrogen_falls_back_to_atom_name() {
        assert!(is_hydrogen("HA", ""));
        assert!(is_hydrogen("1HB", ""));
        assert!(is_hydrogen("D2", " "));
        assert!(!is_hydrogen("CA", ""));
        assert!(!is_hydrogen("OH", ""));
    }
}
