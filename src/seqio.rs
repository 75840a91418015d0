//! Input reading and **batch** handling.
//!
//! ### Design
//! - Text starting with `>` or `@` is parsed as **FASTA/FASTQ** with `needletail`;
//!   every record becomes one request named after its header's first token.
//! - Anything else is one **raw** pasted sequence named `Target`.
//! - Requests are independent; a batch runs on a local Rayon pool
//!   (`threads = None` uses all logical cores) and keeps input order.
//!
//! ### Example
//! ```
//! use circprimer::{mode::DesignMode, seqio};
//! let reqs = seqio::parse_requests(">a\nACGT\n>b desc\nTTGG\n", DesignMode::Linear).unwrap();
//! assert_eq!(reqs.len(), 2);
//! assert_eq!(reqs[1].sequence_id, "b");
//! ```
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use needletail::parse_fastx_reader;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::debug;

use crate::engine::PrimerEngine;
use crate::handler::{handle, DesignRequest, HandleOptions};
use crate::mode::DesignMode;
use crate::report::Report;

/// Input format detected from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat { Raw, Fasta, Fastq }

/// Detect the format of `text` from its first non-blank character.
pub fn detect_format(text: &str) -> InputFormat {
    match text.trim_start().as_bytes().first() {
        Some(b'>') => InputFormat::Fasta,
        Some(b'@') => InputFormat::Fastq,
        _ => InputFormat::Raw,
    }
}

/// Read input text from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

/// Split input text into design requests for `mode`.
pub fn parse_requests(text: &str, mode: DesignMode) -> Result<Vec<DesignRequest>> {
    let fmt = detect_format(text);
    if fmt == InputFormat::Raw {
        return Ok(vec![DesignRequest::new(text, mode)]);
    }

    let mut reader = parse_fastx_reader(std::io::Cursor::new(text.trim_start().as_bytes().to_vec()))
        .with_context(|| format!("parsing {:?} input", fmt))?;
    let mut out = Vec::new();
    while let Some(record) = reader.next() {
        let rec = record.context("malformed sequence record")?;
        let header = String::from_utf8_lossy(rec.id()).to_string();
        let id = header.split_whitespace().next().unwrap_or_default().to_string();
        let seq = String::from_utf8_lossy(&rec.seq()).to_string();
        out.push(DesignRequest::new(seq, mode).with_id(id));
    }
    debug!(format = ?fmt, records = out.len(), "parsed input");
    Ok(out)
}

/// Handle every request, in parallel, returning reports in input order.
pub fn handle_all(
    requests: &[DesignRequest],
    threads: Option<usize>,
    opts: &HandleOptions,
    engine: &dyn PrimerEngine,
) -> Result<Vec<Report>> {
    let n = threads.filter(|&t| t > 0).unwrap_or_else(num_cpus::get).max(1);
    let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
    debug!(threads = n, requests = requests.len(), "handling batch");

    let reports: Vec<Report> = pool.install(|| {
        requests
            .par_iter()
            .map(|r| Report { id: r.sequence_id.clone(), outcome: handle(r, opts, engine) })
            .collect()
    });
    Ok(reports)
}
