//! The external **primer-design engine**.
//!
//! [`PrimerEngine`] is the seam between request handling and primer
//! selection. [`Primer3Core`] drives the `primer3_core` executable over
//! Boulder-IO: one record in on stdin, one record out on stdout.
//!
//! ### Errors
//! Every way the engine can fail maps to an [`EngineError`]; its `Display`
//! text is what the user sees in a failed outcome.
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::boulder::{self, BoulderError};
use crate::results::ResultSet;
use crate::task::DesignTask;

/// Default executable name, looked up on `PATH`.
pub const DEFAULT_EXECUTABLE: &str = "primer3_core";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start {executable}: {source}")]
    Spawn { executable: String, #[source] source: std::io::Error },
    #[error("I/O error talking to primer3: {0}")]
    Io(#[from] std::io::Error),
    #[error("primer3 exited with {status}: {stderr}")]
    Exited { status: String, stderr: String },
    #[error("primer3 error: {0}")]
    Reported(String),
    #[error("malformed primer3 output: {0}")]
    Malformed(#[from] BoulderError),
}

/// Anything that can turn a design task into a result set.
///
/// Implementors are shared across the batch pool, hence `Send + Sync`.
pub trait PrimerEngine: Send + Sync {
    fn design(&self, task: &DesignTask) -> Result<ResultSet, EngineError>;
}

/// Settings for [`Primer3Core`].
#[derive(Clone, Debug)]
pub struct Primer3Config {
    /// Path or name of the `primer3_core` executable.
    pub executable: PathBuf,
    /// Extra command-line arguments, e.g. `-strict_tags`.
    pub args: Vec<OsString>,
    /// Directory holding Primer3's thermodynamic parameter files. Only needed
    /// for Primer3 builds without compiled-in parameters.
    pub thermo_params: Option<PathBuf>,
}

impl Default for Primer3Config {
    fn default() -> Self {
        Self { executable: PathBuf::from(DEFAULT_EXECUTABLE), args: Vec::new(), thermo_params: None }
    }
}

/// Engine backed by the `primer3_core` command-line program.
#[derive(Clone, Debug, Default)]
pub struct Primer3Core {
    config: Primer3Config,
}

impl Primer3Core {
    pub fn new(config: Primer3Config) -> Self { Self { config } }

    pub fn config(&self) -> &Primer3Config { &self.config }
}

impl PrimerEngine for Primer3Core {
    fn design(&self, task: &DesignTask) -> Result<ResultSet, EngineError> {
        let input = boulder::encode_task(task, self.config.thermo_params.as_deref());
        debug!(executable = %self.config.executable.display(), id = %task.sequence_id, bytes = input.len(), "running primer3");

        let mut child = Command::new(&self.config.executable)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                executable: self.config.executable.display().to_string(),
                source,
            })?;

        // primer3 reads the whole record before answering, so writing first is safe.
        // A write failure is held back: an engine that exits early explains why on stderr.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(input.as_bytes()),
            None => Ok(()),
        };
        let output = child.wait_with_output()?;

        if !output.status.success() {
            return Err(EngineError::Exited {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written?;

        let rs = boulder::parse_record(&String::from_utf8_lossy(&output.stdout))?;
        if let Some(e) = rs.error() {
            return Err(EngineError::Reported(e.to_string()));
        }
        Ok(rs)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::mode::DesignMode;

    /// A `sh` script standing in for primer3_core.
    fn script_engine(dir: &tempfile::TempDir, text: &str) -> Primer3Core {
        let script = dir.path().join("fake_primer3.sh");
        std::fs::write(&script, text).unwrap();
        Primer3Core::new(Primer3Config {
            executable: PathBuf::from("sh"),
            args: vec![script.into_os_string()],
            thermo_params: None,
        })
    }

    /// Like [`script_engine`], but stdin is first saved to `input.boulder`.
    fn fake_engine(dir: &tempfile::TempDir, body: &str) -> Primer3Core {
        let capture = dir.path().join("input.boulder");
        script_engine(dir, &format!("cat > '{}'\n{}\n", capture.display(), body))
    }

    fn task() -> DesignTask {
        DesignTask::build("Target", "ACGTACGTACGTACGTACGT", DesignMode::CircularQpcr).unwrap()
    }

    #[test]
    fn sends_encoded_task_and_parses_answer() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(&dir, "printf 'SEQUENCE_ID=Target\\nPRIMER_PAIR_NUM_RETURNED=0\\n=\\n'");
        let rs = engine.design(&task()).unwrap();
        assert_eq!(rs.pair_count(), Ok(0));
        let sent = std::fs::read_to_string(dir.path().join("input.boulder")).unwrap();
        assert_eq!(sent, boulder::encode_task(&task(), None));
    }

    #[test]
    fn reported_error_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(&dir, "printf 'PRIMER_ERROR=Target beyond end of sequence\\n=\\n'");
        let err = engine.design(&task()).unwrap_err();
        assert!(matches!(err, EngineError::Reported(ref m) if m == "Target beyond end of sequence"));
        assert_eq!(err.to_string(), "primer3 error: Target beyond end of sequence");
    }

    #[test]
    fn non_zero_exit_keeps_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(&dir, "echo 'thermodynamic parameters not found' >&2\nexit 3");
        match engine.design(&task()).unwrap_err() {
            EngineError::Exited { stderr, .. } => assert_eq!(stderr, "thermodynamic parameters not found"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn early_exit_without_reading_stdin_keeps_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let engine = script_engine(&dir, "echo 'unrecognized option -bogus' >&2\nexit 2\n");
        // larger than any pipe buffer, so the write cannot complete
        let seq = "ACGTTGCAAC".repeat(20_000);
        let big = DesignTask::build("Target", &seq, DesignMode::CircularQpcr).unwrap();
        match engine.design(&big).unwrap_err() {
            EngineError::Exited { stderr, .. } => assert_eq!(stderr, "unrecognized option -bogus"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn truncated_output_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(&dir, "printf 'SEQUENCE_ID=Target\\n'");
        assert!(matches!(engine.design(&task()).unwrap_err(), EngineError::Malformed(BoulderError::Unterminated)));
    }

    #[test]
    fn missing_executable_is_a_spawn_error() {
        let engine = Primer3Core::new(Primer3Config {
            executable: PathBuf::from("/nonexistent/primer3_core"),
            ..Primer3Config::default()
        });
        let err = engine.design(&task()).unwrap_err();
        assert!(matches!(err, EngineError::Spawn { .. }));
        assert!(err.to_string().starts_with("failed to start /nonexistent/primer3_core"));
    }
}
