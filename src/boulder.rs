//! Primer3 **Boulder-IO** codec.
//!
//! A Boulder-IO record is a list of `TAG=VALUE` lines terminated by a line
//! holding a single `=`. `primer3_core` reads one record per design task on
//! stdin and answers with one record on stdout, echoing the input tags and
//! adding its `PRIMER_*` output tags.
//!
//! # Examples
//! ```
//! use circprimer::boulder::parse_record;
//! let rs = parse_record("PRIMER_PAIR_NUM_RETURNED=0\n=\n").unwrap();
//! assert_eq!(rs.get("PRIMER_PAIR_NUM_RETURNED"), Some("0"));
//! ```
use std::fmt::Display;
use std::path::Path;

use thiserror::Error;

use crate::results::ResultSet;
use crate::task::DesignTask;

/// Malformed engine output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoulderError {
    #[error("line {line}: expected TAG=VALUE, got {text:?}")]
    MissingSeparator { line: usize, text: String },
    #[error("record is not terminated by '='")]
    Unterminated,
}

/// Encode a task as a single Boulder-IO record (including the `=` terminator).
///
/// `thermo_params` is forwarded as `PRIMER_THERMODYNAMIC_PARAMETERS_PATH`;
/// Primer3 expects a trailing path separator there.
pub fn encode_task(task: &DesignTask, thermo_params: Option<&Path>) -> String {
    let c = &task.constraints;
    let mut out = String::with_capacity(task.template.len() + 512);
    push_tag(&mut out, "SEQUENCE_ID", &task.sequence_id);
    push_tag(&mut out, "SEQUENCE_TEMPLATE", &task.template);
    if let Some(t) = task.target {
        push_tag(&mut out, "SEQUENCE_TARGET", format!("{},{}", t.start, t.length));
    }
    push_tag(&mut out, "PRIMER_NUM_RETURN", c.num_return);
    push_tag(&mut out, "PRIMER_OPT_SIZE", c.opt_size);
    push_tag(&mut out, "PRIMER_MIN_SIZE", c.min_size);
    push_tag(&mut out, "PRIMER_MAX_SIZE", c.max_size);
    push_tag(&mut out, "PRIMER_OPT_TM", format!("{:.1}", c.opt_tm));
    push_tag(&mut out, "PRIMER_MIN_TM", format!("{:.1}", c.min_tm));
    push_tag(&mut out, "PRIMER_MAX_TM", format!("{:.1}", c.max_tm));
    push_tag(&mut out, "PRIMER_MIN_GC", format!("{:.1}", c.min_gc));
    push_tag(&mut out, "PRIMER_MAX_GC", format!("{:.1}", c.max_gc));
    push_tag(&mut out, "PRIMER_MAX_POLY_X", c.max_poly_x);
    if !task.product_size_ranges.is_empty() {
        let ranges: Vec<String> = task.product_size_ranges.iter().map(|r| r.to_string()).collect();
        push_tag(&mut out, "PRIMER_PRODUCT_SIZE_RANGE", ranges.join(" "));
    }
    if let Some(p) = thermo_params {
        let mut dir = p.to_string_lossy().into_owned();
        if !dir.ends_with(std::path::MAIN_SEPARATOR) {
            dir.push(std::path::MAIN_SEPARATOR);
        }
        push_tag(&mut out, "PRIMER_THERMODYNAMIC_PARAMETERS_PATH", dir);
    }
    out.push_str("=\n");
    out
}

fn push_tag(out: &mut String, tag: &str, value: impl Display) {
    out.push_str(tag);
    out.push('=');
    out.push_str(&value.to_string());
    out.push('\n');
}

/// Parse the first Boulder-IO record in `text` into a flat result set.
///
/// Blank lines are skipped. Only the first `=` on a line separates tag from
/// value, so values may themselves contain `=`.
pub fn parse_record(text: &str) -> Result<ResultSet, BoulderError> {
    let mut rs = ResultSet::default();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line == "=" {
            return Ok(rs);
        }
        if line.is_empty() {
            continue;
        }
        match line.split_once('=') {
            Some((tag, value)) => rs.insert(tag, value),
            None => return Err(BoulderError::MissingSeparator { line: i + 1, text: line.to_string() }),
        }
    }
    Err(BoulderError::Unterminated)
}
