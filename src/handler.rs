//! The **request handler**: raw text and a mode in, an [`Outcome`] out.
//!
//! Each call is self-contained. Input is normalized, a [`DesignTask`] is built
//! for the mode, the engine is called at most once and its result set is read
//! into primer pairs. Failures never escape as errors; they become
//! [`Outcome::MissingInput`] or [`Outcome::Failed`] for the caller to show.
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::engine::PrimerEngine;
use crate::mode::DesignMode;
use crate::results::PrimerPair;
use crate::sequence::{first_invalid_symbol, normalize};
use crate::task::{DesignTask, DEFAULT_SEQUENCE_ID};

/// Knobs that change how a request is handled.
#[derive(Clone, Debug, Default)]
pub struct HandleOptions {
    /// Reject symbols outside the IUPAC DNA alphabet before calling the engine.
    pub strict: bool,
}

/// A single design request.
#[derive(Clone, Debug)]
pub struct DesignRequest {
    pub sequence_id: String,
    /// Sequence text as pasted; normalized by the handler.
    pub raw: String,
    pub mode: DesignMode,
}

impl DesignRequest {
    pub fn new(raw: impl Into<String>, mode: DesignMode) -> Self {
        Self { sequence_id: DEFAULT_SEQUENCE_ID.to_string(), raw: raw.into(), mode }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.sequence_id = id.into();
        self
    }
}

/// What the user gets back for one request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Nothing left after normalization; the engine was not called.
    MissingInput,
    /// The request could not be completed.
    Failed { message: String },
    /// The engine ran but returned zero pairs.
    NoPrimers { mode: DesignMode },
    /// One or more pairs were found.
    Designed { mode: DesignMode, pairs: Vec<PrimerPair> },
}

impl Outcome {
    /// `true` for outcomes the user has to act on (missing input, failures).
    pub fn is_error(&self) -> bool { matches!(self, Outcome::MissingInput | Outcome::Failed { .. }) }

    pub fn pairs(&self) -> &[PrimerPair] {
        match self {
            Outcome::Designed { pairs, .. } => pairs,
            _ => &[],
        }
    }
}

/// Handle one request against `engine`.
pub fn handle(request: &DesignRequest, opts: &HandleOptions, engine: &dyn PrimerEngine) -> Outcome {
    let seq = normalize(&request.raw);
    if seq.is_empty() {
        warn!(id = %request.sequence_id, "empty sequence after normalization");
        return Outcome::MissingInput;
    }

    if opts.strict {
        if let Some(bad) = first_invalid_symbol(&seq) {
            let message = format!("invalid nucleotide {:?} at position {}", bad.symbol, bad.position + 1);
            warn!(id = %request.sequence_id, reason = %message, "rejected sequence");
            return Outcome::Failed { message };
        }
    }

    let task = match DesignTask::build(request.sequence_id.clone(), &seq, request.mode) {
        Ok(t) => t,
        Err(e) => return Outcome::Failed { message: e.to_string() },
    };
    debug!(
        id = %task.sequence_id,
        mode = request.mode.number(),
        len = seq.len(),
        template_len = task.template.len(),
        target = ?task.target,
        "design task assembled"
    );

    let result = engine
        .design(&task)
        .map_err(|e| e.to_string())
        .and_then(|rs| rs.pairs().map_err(|e| e.to_string()));
    let pairs = match result {
        Ok(p) => p,
        Err(message) => {
            error!(id = %task.sequence_id, reason = %message, "primer design failed");
            return Outcome::Failed { message };
        }
    };

    if pairs.is_empty() {
        warn!(id = %task.sequence_id, "no primer pairs returned");
        Outcome::NoPrimers { mode: request.mode }
    } else {
        info!(id = %task.sequence_id, pairs = pairs.len(), "primer pairs designed");
        Outcome::Designed { mode: request.mode, pairs }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::engine::EngineError;
    use crate::results::tests::sample_result_set;
    use crate::results::ResultSet;
    use crate::task::SequenceTarget;

    /// Engine double: records every task and answers with a fixed result.
    pub(crate) struct RecordingEngine {
        pub(crate) calls: Mutex<Vec<DesignTask>>,
        answer: Box<dyn Fn() -> Result<ResultSet, EngineError> + Send + Sync>,
    }

    impl RecordingEngine {
        pub(crate) fn returning(n: usize) -> Self {
            Self { calls: Mutex::new(Vec::new()), answer: Box::new(move || Ok(sample_result_set(n))) }
        }

        pub(crate) fn failing(message: &'static str) -> Self {
            Self { calls: Mutex::new(Vec::new()), answer: Box::new(move || Err(EngineError::Reported(message.into()))) }
        }

        pub(crate) fn tasks(&self) -> Vec<DesignTask> { self.calls.lock().unwrap().clone() }
    }

    impl PrimerEngine for RecordingEngine {
        fn design(&self, task: &DesignTask) -> Result<ResultSet, EngineError> {
            self.calls.lock().unwrap().push(task.clone());
            (self.answer)()
        }
    }

    const S: &str = "atgcgtacgt tagccgatcg\natcggctagc tagg\r\nctaacg";
    const S_NORM: &str = "ATGCGTACGTTAGCCGATCGATCGGCTAGCTAGGCTAACG";

    #[test]
    fn whitespace_only_input_never_reaches_engine() {
        let engine = RecordingEngine::returning(2);
        for raw in ["", "   ", "\n\r\n", " \r \n "] {
            let out = handle(&DesignRequest::new(raw, DesignMode::Linear), &HandleOptions::default(), &engine);
            assert_eq!(out, Outcome::MissingInput);
        }
        assert!(engine.tasks().is_empty());
    }

    #[test]
    fn junction_mode_sends_duplicated_template() {
        let engine = RecordingEngine::returning(1);
        handle(&DesignRequest::new(S, DesignMode::CircularQpcr), &HandleOptions::default(), &engine);
        let tasks = engine.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].sequence_id, "Target");
        assert_eq!(tasks[0].template, format!("{S_NORM}{S_NORM}"));
        assert_eq!(tasks[0].target, Some(SequenceTarget { start: S_NORM.len() - 10, length: 20 }));
    }

    #[test]
    fn sanger_mode_sends_narrow_window_and_two_ranges() {
        let engine = RecordingEngine::returning(1);
        handle(&DesignRequest::new(S, DesignMode::CircularSanger).with_id("circ7"), &HandleOptions::default(), &engine);
        let tasks = engine.tasks();
        let t = &tasks[0];
        assert_eq!(t.sequence_id, "circ7");
        assert_eq!(t.template.len(), 2 * S_NORM.len());
        assert_eq!(t.target, Some(SequenceTarget { start: S_NORM.len() - 5, length: 10 }));
        assert_eq!(t.product_size_ranges.len(), 2);
    }

    #[test]
    fn linear_mode_sends_sequence_unchanged() {
        let engine = RecordingEngine::returning(1);
        handle(&DesignRequest::new(S, DesignMode::Linear), &HandleOptions::default(), &engine);
        let tasks = engine.tasks();
        let t = &tasks[0];
        assert_eq!(t.template, S_NORM);
        assert_eq!(t.target, None);
    }

    #[test]
    fn zero_pairs_is_a_warning_without_listings() {
        let engine = RecordingEngine::returning(0);
        let out = handle(&DesignRequest::new(S, DesignMode::Linear), &HandleOptions::default(), &engine);
        assert_eq!(out, Outcome::NoPrimers { mode: DesignMode::Linear });
        assert!(out.pairs().is_empty());
        assert!(!out.is_error());
    }

    #[test]
    fn every_returned_pair_is_listed() {
        let engine = RecordingEngine::returning(4);
        let out = handle(&DesignRequest::new(S, DesignMode::CircularQpcr), &HandleOptions::default(), &engine);
        let expected = sample_result_set(4).pairs().unwrap();
        assert_eq!(out.pairs().len(), 4);
        assert_eq!(out.pairs(), expected.as_slice());
    }

    #[test]
    fn engine_error_text_is_surfaced() {
        let engine = RecordingEngine::failing("SEQUENCE_TARGET beyond end of sequence");
        let out = handle(&DesignRequest::new(S, DesignMode::Linear), &HandleOptions::default(), &engine);
        assert_eq!(out, Outcome::Failed { message: "primer3 error: SEQUENCE_TARGET beyond end of sequence".into() });
        assert!(out.is_error());
    }

    #[test]
    fn strict_mode_rejects_non_nucleotides_before_engine() {
        let engine = RecordingEngine::returning(1);
        let opts = HandleOptions { strict: true };
        let out = handle(&DesignRequest::new("ACGT ACGX", DesignMode::Linear), &opts, &engine);
        assert_eq!(out, Outcome::Failed { message: "invalid nucleotide 'X' at position 8".into() });
        assert!(engine.tasks().is_empty());
        // the same input goes through when validation is off
        let out = handle(&DesignRequest::new("ACGT ACGX", DesignMode::Linear), &HandleOptions::default(), &engine);
        assert!(!out.is_error());
    }

    #[test]
    fn too_short_for_junction_fails_without_engine() {
        let engine = RecordingEngine::returning(1);
        let out = handle(&DesignRequest::new("ACGTAC", DesignMode::CircularQpcr), &HandleOptions::default(), &engine);
        assert!(matches!(out, Outcome::Failed { ref message } if message.contains("at least 10 nt")));
        assert!(engine.tasks().is_empty());
    }
}
