//! Engine **result set** and the primer pairs read from it.
//!
//! The engine answers with flat `TAG=VALUE` pairs; per-pair values are keyed by
//! index (`PRIMER_LEFT_0_SEQUENCE`, `PRIMER_PAIR_0_PRODUCT_SIZE`, ...).
use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Tag carrying the number of pairs returned.
pub const PAIR_COUNT_TAG: &str = "PRIMER_PAIR_NUM_RETURNED";
/// Tag set by Primer3 when the request itself was rejected.
pub const ERROR_TAG: &str = "PRIMER_ERROR";

/// A required result field was absent or could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResultSetError {
    #[error("engine result is missing {0}")]
    Missing(String),
    #[error("engine result {tag} has unparsable value {value:?}")]
    Invalid { tag: String, value: String },
}

/// Flat key/value output of one engine call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultSet(BTreeMap<String, String>);

impl ResultSet {
    pub fn insert(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.0.insert(tag.into(), value.into());
    }

    pub fn get(&self, tag: &str) -> Option<&str> { self.0.get(tag).map(String::as_str) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// `PRIMER_ERROR`, if the engine reported one.
    pub fn error(&self) -> Option<&str> { self.get(ERROR_TAG).filter(|e| !e.is_empty()) }

    /// Number of pairs returned; an absent tag counts as zero.
    pub fn pair_count(&self) -> Result<usize, ResultSetError> {
        match self.get(PAIR_COUNT_TAG) {
            None => Ok(0),
            Some(_) => self.parsed(PAIR_COUNT_TAG),
        }
    }

    /// Read pair `index` verbatim from its indexed fields.
    pub fn pair(&self, index: usize) -> Result<PrimerPair, ResultSetError> {
        Ok(PrimerPair {
            index,
            forward: self.oligo("LEFT", index)?,
            reverse: self.oligo("RIGHT", index)?,
            product_size: self.parsed(&format!("PRIMER_PAIR_{index}_PRODUCT_SIZE"))?,
        })
    }

    /// All returned pairs, in index order.
    pub fn pairs(&self) -> Result<Vec<PrimerPair>, ResultSetError> {
        (0..self.pair_count()?).map(|i| self.pair(i)).collect()
    }

    fn oligo(&self, side: &str, index: usize) -> Result<Oligo, ResultSetError> {
        Ok(Oligo {
            sequence: self.required(&format!("PRIMER_{side}_{index}_SEQUENCE"))?.to_string(),
            tm: self.parsed(&format!("PRIMER_{side}_{index}_TM"))?,
            gc_percent: self.parsed(&format!("PRIMER_{side}_{index}_GC_PERCENT"))?,
        })
    }

    fn required(&self, tag: &str) -> Result<&str, ResultSetError> {
        self.get(tag).ok_or_else(|| ResultSetError::Missing(tag.to_string()))
    }

    fn parsed<T: std::str::FromStr>(&self, tag: &str) -> Result<T, ResultSetError> {
        let value = self.required(tag)?;
        value.trim().parse().map_err(|_| ResultSetError::Invalid { tag: tag.to_string(), value: value.to_string() })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResultSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One primer of a pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Oligo {
    pub sequence: String,
    /// Melting temperature (°C).
    pub tm: f64,
    pub gc_percent: f64,
}

/// A forward/reverse pair and the product it amplifies.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrimerPair {
    /// 0-based index in the engine output.
    pub index: usize,
    pub forward: Oligo,
    pub reverse: Oligo,
    pub product_size: u32,
}
