//! The per-request **design task**: template, target window, product-size
//! ranges and the fixed primer constraints handed to the engine.
//!
//! A task is built once from a normalized sequence and a [`DesignMode`], sent
//! to the engine and dropped.
use core::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::mode::DesignMode;
use crate::sequence::circularize;

/// Sequence id used when the input carries none.
pub const DEFAULT_SEQUENCE_ID: &str = "Target";

/// An acceptable PCR product length, inclusive on both ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ProductSizeRange {
    pub min: u32,
    pub max: u32,
}

impl fmt::Display for ProductSizeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}-{}", self.min, self.max) }
}

/// Region (0-based start, length) that every returned pair must flank.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct SequenceTarget {
    pub start: usize,
    pub length: usize,
}

/// Primer constraints applied in every mode.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PrimerConstraints {
    /// Optimum primer length (nt). Default 20.
    pub opt_size: u32,
    /// Minimum primer length (nt). Default 18.
    pub min_size: u32,
    /// Maximum primer length (nt). Default 25.
    pub max_size: u32,
    /// Optimum melting temperature (°C). Default 60.0.
    pub opt_tm: f64,
    /// Minimum melting temperature (°C). Default 57.0.
    pub min_tm: f64,
    /// Maximum melting temperature (°C). Default 63.0.
    pub max_tm: f64,
    /// Minimum GC content (%). Default 40.0.
    pub min_gc: f64,
    /// Maximum GC content (%). Default 60.0.
    pub max_gc: f64,
    /// Longest allowed mono-nucleotide run. Default 5.
    pub max_poly_x: u32,
    /// Number of pairs to return. Default 5.
    pub num_return: u32,
}

impl Default for PrimerConstraints {
    fn default() -> Self {
        Self {
            opt_size: 20,
            min_size: 18,
            max_size: 25,
            opt_tm: 60.0,
            min_tm: 57.0,
            max_tm: 63.0,
            min_gc: 40.0,
            max_gc: 60.0,
            max_poly_x: 5,
            num_return: 5,
        }
    }
}

/// Everything the engine needs for one request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DesignTask {
    pub sequence_id: String,
    /// Template actually sent downstream (duplicated in junction modes).
    pub template: String,
    pub target: Option<SequenceTarget>,
    pub product_size_ranges: Vec<ProductSizeRange>,
    pub constraints: PrimerConstraints,
}

/// A task could not be assembled from the input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("sequence of {len} nt is too short for mode {}: the junction target needs at least {need} nt", .mode.number())]
    TooShortForJunction { mode: DesignMode, len: usize, need: usize },
}

impl DesignTask {
    /// Build the task for a **normalized** sequence.
    ///
    /// In junction modes the template is `seq + seq` and the target window is
    /// placed `back` bases before the join; in linear mode the sequence is used
    /// as is and no target is set.
    pub fn build(sequence_id: impl Into<String>, seq: &str, mode: DesignMode) -> Result<Self, TaskError> {
        let spec = mode.spec();
        let len = seq.len();
        let (template, target) = match spec.junction_window {
            Some((back, length)) => {
                let start = len
                    .checked_sub(back)
                    .ok_or(TaskError::TooShortForJunction { mode, len, need: back })?;
                (circularize(seq), Some(SequenceTarget { start, length }))
            }
            None => (seq.to_string(), None),
        };
        Ok(Self {
            sequence_id: sequence_id.into(),
            template,
            target,
            product_size_ranges: spec.product_sizes.to_vec(),
            constraints: PrimerConstraints::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: &str = "ATGCGTACGTTAGCCGATCGATCGGCTAGCTAGGCTAACG";

    #[test]
    fn mode1_duplicates_and_targets_the_join() {
        let t = DesignTask::build(DEFAULT_SEQUENCE_ID, S, DesignMode::CircularQpcr).unwrap();
        assert_eq!(t.template, format!("{S}{S}"));
        assert_eq!(t.template.len(), 2 * S.len());
        assert_eq!(t.target, Some(SequenceTarget { start: S.len() - 10, length: 20 }));
        assert_eq!(t.product_size_ranges, vec![ProductSizeRange { min: 80, max: 150 }]);
    }

    #[test]
    fn mode2_uses_narrow_window_and_two_ranges() {
        let t = DesignTask::build("x", S, DesignMode::CircularSanger).unwrap();
        assert_eq!(t.template, format!("{S}{S}"));
        assert_eq!(t.target, Some(SequenceTarget { start: S.len() - 5, length: 10 }));
        assert_eq!(t.product_size_ranges.len(), 2);
    }

    #[test]
    fn mode3_keeps_template_and_sets_no_target() {
        let t = DesignTask::build("x", S, DesignMode::Linear).unwrap();
        assert_eq!(t.template, S);
        assert_eq!(t.target, None);
        assert_eq!(t.product_size_ranges, vec![ProductSizeRange { min: 80, max: 200 }]);
    }

    #[test]
    fn constraints_are_fixed_in_every_mode() {
        for mode in [DesignMode::CircularQpcr, DesignMode::CircularSanger, DesignMode::Linear] {
            let t = DesignTask::build("x", S, mode).unwrap();
            assert_eq!(t.constraints, PrimerConstraints::default());
            assert_eq!(t.constraints.num_return, 5);
            assert_eq!(t.constraints.max_poly_x, 5);
        }
    }

    #[test]
    fn short_sequence_cannot_host_junction_target() {
        let err = DesignTask::build("x", "ACGTACG", DesignMode::CircularQpcr).unwrap_err();
        assert_eq!(err, TaskError::TooShortForJunction { mode: DesignMode::CircularQpcr, len: 7, need: 10 });
        assert_eq!(
            err.to_string(),
            "sequence of 7 nt is too short for mode 1: the junction target needs at least 10 nt"
        );
        // exactly `back` bases puts the window at offset 0
        let t = DesignTask::build("x", "ACGTA", DesignMode::CircularSanger).unwrap();
        assert_eq!(t.target, Some(SequenceTarget { start: 0, length: 10 }));
        assert!(DesignTask::build("x", "ACG", DesignMode::Linear).is_ok());
    }

    #[test]
    fn product_range_displays_as_primer3_interval() {
        assert_eq!(ProductSizeRange { min: 250, max: 600 }.to_string(), "250-600");
    }
}
