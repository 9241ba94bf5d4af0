//! Taxpayer document (CPF/CNPJ) validation
//!
//! Both document kinds end with two check digits. Each check digit is the
//! weighted sum of the digits before it, reduced modulo 11:
//!
//! - **CPF** (11 digits): digits are weighted left to right, starting at
//!   `len + 1` and decreasing by one.
//! - **CNPJ** (14 digits): digits are weighted right to left with the cycle
//!   `2..=9, 2, 3, ...`.
//!
//! A remainder below 2 yields a check digit of `0`, otherwise `11 - remainder`.
//!
//! # Example
//!
//! ```
//! use agro_common::document::{is_valid_document, DocumentKind};
//!
//! assert_eq!(DocumentKind::classify("46751972059"), Some(DocumentKind::Cpf));
//! assert!(is_valid_document("83450822000100"));
//! assert!(!is_valid_document("83450822000109"));
//! ```

use serde::{Deserialize, Serialize};

/// Number of digits in a CPF
pub const CPF_LENGTH: usize = 11;

/// Number of digits in a CNPJ
pub const CNPJ_LENGTH: usize = 14;

/// Kind of taxpayer document, decided by its length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    /// Individual taxpayer (11 digits)
    Cpf,
    /// Company taxpayer (14 digits)
    Cnpj,
}

impl DocumentKind {
    /// Classify a document by shape alone.
    ///
    /// Returns `None` unless the input is exactly 11 or 14 ASCII digits.
    pub fn classify(document: &str) -> Option<Self> {
        if !document.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        match document.len() {
            CPF_LENGTH => Some(Self::Cpf),
            CNPJ_LENGTH => Some(Self::Cnpj),
            _ => None,
        }
    }

    fn weight(self, index: usize, sequence_len: usize) -> u32 {
        let weight = match self {
            Self::Cpf => sequence_len + 1 - index,
            Self::Cnpj if index >= 8 => (index - 6) % 10,
            Self::Cnpj => (index + 2) % 10,
        };
        weight as u32
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Cpf => write!(f, "CPF"),
            DocumentKind::Cnpj => write!(f, "CNPJ"),
        }
    }
}

/// Check whether `document` is a valid CPF or CNPJ.
///
/// Never panics. Anything that is not 11 or 14 ASCII digits is invalid, and
/// so is a document made of one repeated digit: those pass the checksum but
/// are never issued.
pub fn is_valid_document(document: &str) -> bool {
    let Some(kind) = DocumentKind::classify(document) else {
        return false;
    };

    if is_repeated_digit(document) {
        return false;
    }

    check_digits_match(kind, document)
}

/// Recompute both check digits and compare them with the trailing digits.
///
/// `document` must already be classified as `kind`.
fn check_digits_match(kind: DocumentKind, document: &str) -> bool {
    let digits: Vec<u32> = document.bytes().map(|b| u32::from(b - b'0')).collect();
    let first = digits.len() - 2;

    // The second digit is only computed once the first one matched.
    (first..digits.len()).all(|position| {
        compute_check_digit(kind, &digits[..position]) == digits[position]
    })
}

/// Compute the check digit that follows `sequence`.
fn compute_check_digit(kind: DocumentKind, sequence: &[u32]) -> u32 {
    let weighted: u32 = match kind {
        DocumentKind::Cpf => sequence
            .iter()
            .enumerate()
            .map(|(index, digit)| digit * kind.weight(index, sequence.len()))
            .sum(),
        DocumentKind::Cnpj => sequence
            .iter()
            .rev()
            .enumerate()
            .map(|(index, digit)| digit * kind.weight(index, sequence.len()))
            .sum(),
    };

    match weighted % 11 {
        remainder if remainder < 2 => 0,
        remainder => 11 - remainder,
    }
}

fn is_repeated_digit(document: &str) -> bool {
    let bytes = document.as_bytes();
    bytes.iter().all(|b| *b == bytes[0])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_cpf() {
        assert!(is_valid_document("46751972059"));
        assert!(is_valid_document("93419415044"));
        assert!(is_valid_document("52998224725"));
    }

    #[test]
    fn test_cpf_with_corrupted_last_digit() {
        assert!(!is_valid_document("46751972052"));
    }

    #[test]
    fn test_valid_cnpj() {
        assert!(is_valid_document("83450822000100"));
        assert!(is_valid_document("10859250000135"));
        assert!(is_valid_document("11222333000181"));
    }

    #[test]
    fn test_cnpj_with_corrupted_last_digit() {
        assert!(!is_valid_document("83450822000109"));
    }

    #[test]
    fn test_cnpj_with_corrupted_first_check_digit() {
        assert!(!is_valid_document("83450822000110"));
    }

    #[test]
    fn test_wrong_lengths() {
        assert!(!is_valid_document(""));
        assert!(!is_valid_document("4675197205"));
        assert!(!is_valid_document("467519720590"));
        assert!(!is_valid_document("8345082200010"));
        assert!(!is_valid_document("834508220001000"));
    }

    #[test]
    fn test_non_digit_characters() {
        assert!(!is_valid_document("467.519.720-59"));
        assert!(!is_valid_document("4675197205a"));
        assert!(!is_valid_document("83.450.822/0001-00"));
        assert!(!is_valid_document(" 4675197205"));
    }

    #[test]
    fn test_non_ascii_digits_are_rejected() {
        // Arabic-Indic digits are numeric but not ASCII
        assert!(!is_valid_document("٤٦٧٥١٩٧٢٠٥٩"));
    }

    #[test]
    fn test_repeated_digits_are_rejected() {
        for digit in '0'..='9' {
            let cpf: String = std::iter::repeat(digit).take(CPF_LENGTH).collect();
            let cnpj: String = std::iter::repeat(digit).take(CNPJ_LENGTH).collect();
            assert!(!is_valid_document(&cpf), "{} should be rejected", cpf);
            assert!(!is_valid_document(&cnpj), "{} should be rejected", cnpj);
        }
    }

    #[test]
    fn test_repeated_digits_satisfy_checksum() {
        assert!(check_digits_match(DocumentKind::Cpf, "00000000000"));
        assert!(check_digits_match(DocumentKind::Cpf, "11111111111"));
        assert!(check_digits_match(DocumentKind::Cnpj, "00000000000000"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(DocumentKind::classify("46751972059"), Some(DocumentKind::Cpf));
        assert_eq!(DocumentKind::classify("83450822000100"), Some(DocumentKind::Cnpj));
        assert_eq!(DocumentKind::classify("123"), None);
        assert_eq!(DocumentKind::classify("4675197205x"), None);
    }

    #[test]
    fn test_compute_check_digits() {
        assert_eq!(compute_check_digit(DocumentKind::Cpf, &[4, 6, 7, 5, 1, 9, 7, 2, 0]), 5);
        assert_eq!(
            compute_check_digit(DocumentKind::Cpf, &[4, 6, 7, 5, 1, 9, 7, 2, 0, 5]),
            9
        );
        assert_eq!(
            compute_check_digit(DocumentKind::Cnpj, &[8, 3, 4, 5, 0, 8, 2, 2, 0, 0, 0, 1]),
            0
        );
    }

    #[test]
    fn test_document_kind_display() {
        assert_eq!(DocumentKind::Cpf.to_string(), "CPF");
        assert_eq!(DocumentKind::Cnpj.to_string(), "CNPJ");
    }

    fn flip(document: &str, position: usize, delta: u8) -> String {
        let mut bytes = document.as_bytes().to_vec();
        bytes[position] = b'0' + (bytes[position] - b'0' + delta) % 10;
        String::from_utf8(bytes).unwrap()
    }

    fn cpf_from_base(base: &[u32]) -> String {
        let mut digits = base.to_vec();
        digits.push(compute_check_digit(DocumentKind::Cpf, &digits));
        digits.push(compute_check_digit(DocumentKind::Cpf, &digits));
        digits.iter().map(|d| char::from(b'0' + *d as u8)).collect()
    }

    proptest! {
        #[test]
        fn prop_generated_cpfs_are_valid(base in proptest::collection::vec(0u32..10, 9)) {
            let cpf = cpf_from_base(&base);
            prop_assume!(!is_repeated_digit(&cpf));
            prop_assert!(is_valid_document(&cpf));
        }

        #[test]
        fn prop_flipping_a_check_digit_invalidates_cpf(
            base in proptest::collection::vec(0u32..10, 9),
            position in 9usize..11,
            delta in 1u8..10,
        ) {
            let cpf = cpf_from_base(&base);
            prop_assert!(!is_valid_document(&flip(&cpf, position, delta)));
        }

        #[test]
        fn prop_never_panics(input in "\\PC{0,20}") {
            let _ = is_valid_document(&input);
        }
    }
}
