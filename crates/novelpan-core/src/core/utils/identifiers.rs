use phf::{Map, Set, phf_map, phf_set};

static STANDARD_RESIDUE_CODES: Set<char> = phf_set! {
    'A', 'R', 'N', 'D', 'C', 'Q', 'E', 'G', 'H', 'I',
    'L', 'K', 'M', 'F', 'P', 'S', 'T', 'W', 'Y', 'V',
};

static THREE_LETTER_CODES: Map<char, &'static str> = phf_map! {
    'A' => "ALA", 'R' => "ARG", 'N' => "ASN", 'D' => "ASP", 'C' => "CYS",
    'Q' => "GLN", 'E' => "GLU", 'G' => "GLY", 'H' => "HIS", 'I' => "ILE",
    'L' => "LEU", 'K' => "LYS", 'M' => "MET", 'F' => "PHE", 'P' => "PRO",
    'S' => "SER", 'T' => "THR", 'W' => "TRP", 'Y' => "TYR", 'V' => "VAL",
    'X' => "XAA",
};

/// Placeholder code for a residue of unknown identity.
pub const UNKNOWN_RESIDUE: char = 'X';

pub fn is_standard_residue(code: char) -> bool {
    STANDARD_RESIDUE_CODES.contains(&code)
}

/// Accepts the 20 standard residues plus the unknown placeholder `X`.
pub fn is_residue_code(code: char) -> bool {
    code == UNKNOWN_RESIDUE || is_standard_residue(code)
}

pub fn three_letter_code(code: char) -> Option<&'static str> {
    THREE_LETTER_CODES.get(&code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_standard_residue_recognizes_all_twenty_codes() {
        for code in "ACDEFGHIKLMNPQRSTVWY".chars() {
            assert!(is_standard_residue(code), "{code} should be standard");
        }
    }

    #[test]
    fn is_standard_residue_rejects_lowercase_and_ambiguity_codes() {
        assert!(!is_standard_residue('a'));
        assert!(!is_standard_residue('B'));
        assert!(!is_standard_residue('Z'));
        assert!(!is_standard_residue('X'));
    }

    #[test]
    fn is_residue_code_accepts_unknown_placeholder() {
        assert!(is_residue_code('X'));
        assert!(is_residue_code('L'));
        assert!(!is_residue_code('*'));
    }

    #[test]
    fn three_letter_code_maps_known_codes() {
        assert_eq!(three_letter_code('L'), Some("LEU"));
        assert_eq!(three_letter_code('W'), Some("TRP"));
        assert_eq!(three_letter_code('X'), Some("XAA"));
        assert_eq!(three_letter_code('B'), None);
    }
}
