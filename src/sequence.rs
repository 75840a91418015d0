//! Sequence helpers: input **normalization**, optional **IUPAC validation** and
//! the **junction duplication** used to model a circular template.
//!
//! Pasted sequences arrive with spaces, line breaks and mixed case. Everything
//! downstream works on the normalized, uppercase form.
//!
//! # Examples
//! ```
//! use circprimer::sequence::{normalize, circularize};
//! assert_eq!(normalize("at gc\r\nAT"), "ATGCAT");
//! assert_eq!(circularize("ACGT"), "ACGTACGT");
//! ```
use bio::alphabets::dna;

/// Strip spaces and line-break characters and uppercase the remainder.
///
/// Only `' '`, `'\n'` and `'\r'` are removed; tabs and digits are kept so that
/// strict validation can point at them.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '\n' | '\r'))
        .flat_map(char::to_uppercase)
        .collect()
}

/// Concatenate a sequence with itself so the back-splice junction of a
/// circular molecule sits at offset `seq.len()`.
pub fn circularize(seq: &str) -> String {
    let mut out = String::with_capacity(seq.len() * 2);
    out.push_str(seq);
    out.push_str(seq);
    out
}

/// A symbol outside the IUPAC DNA alphabet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvalidSymbol {
    /// 0-based position in the normalized sequence.
    pub position: usize,
    /// The offending character.
    pub symbol: char,
}

/// Return the first symbol that is not an IUPAC nucleotide code, if any.
pub fn first_invalid_symbol(seq: &str) -> Option<InvalidSymbol> {
    let alphabet = dna::iupac_alphabet();
    if alphabet.is_word(seq.as_bytes()) {
        return None;
    }
    seq.char_indices()
        .find(|(_, c)| !c.is_ascii() || !alphabet.is_word([*c as u8]))
        .map(|(position, symbol)| InvalidSymbol { position, symbol })
}
