//! User-facing **reporting** of outcomes.
//!
//! - `text`: headline message, mode status and a forward | reverse block per pair
//! - `table` / `csv`: one row per pair via a polars `DataFrame`
//! - `json`: the serialized [`Report`] list
use std::io::Write;

use polars::prelude::*;
use serde::Serialize;

use crate::handler::Outcome;
use crate::mode::list_modes;
use crate::results::{Oligo, PrimerPair};

/// Output format selected on the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat { Text, Table, Csv, Json }

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("Unknown format: {} (expected text, table, csv or json)", other)),
        }
    }
}

/// Outcome of one request, labelled with its sequence id.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub id: String,
    pub outcome: Outcome,
}

/// Headline message for an outcome.
pub fn headline(outcome: &Outcome) -> String {
    match outcome {
        Outcome::MissingInput => "Error: please enter a sequence.".to_string(),
        Outcome::Failed { message } => format!("Error: primer design failed: {message}"),
        Outcome::NoPrimers { .. } => {
            "Warning: no suitable primers found; try relaxing the constraints or check the sequence length.".to_string()
        }
        Outcome::Designed { pairs, .. } if pairs.len() == 1 => "Found 1 primer pair.".to_string(),
        Outcome::Designed { pairs, .. } => format!("Found {} primer pairs.", pairs.len()),
    }
}

/// `Tm: 60.1°C | GC: 50.0%`
pub fn annotation(o: &Oligo) -> String { format!("Tm: {:.1}°C | GC: {:.1}%", o.tm, o.gc_percent) }

fn write_pair(out: &mut String, p: &PrimerPair) {
    let fwd_note = annotation(&p.forward);
    let width = ["Forward primer", p.forward.sequence.as_str(), fwd_note.as_str()]
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0)
        + 4;
    out.push_str(&format!("Option {} (product: {} bp)\n", p.index + 1, p.product_size));
    for (left, right) in [
        ("Forward primer", "Reverse primer".to_string()),
        (p.forward.sequence.as_str(), p.reverse.sequence.clone()),
        (fwd_note.as_str(), annotation(&p.reverse)),
    ] {
        let pad = width - left.chars().count();
        out.push_str(&format!("  {left}{}{right}\n", " ".repeat(pad)));
    }
}

/// Render one outcome as plain text.
pub fn render_outcome(outcome: &Outcome) -> String {
    let mut out = headline(outcome);
    out.push('\n');
    if let Outcome::Designed { mode, pairs } = outcome {
        out.push_str(mode.spec().status);
        out.push('\n');
        for p in pairs {
            out.push('\n');
            write_pair(&mut out, p);
        }
    }
    out
}

/// Render a list of reports as text; ids are shown only for batches.
pub fn render_text(reports: &[Report]) -> String {
    if let [single] = reports {
        return render_outcome(&single.outcome);
    }
    let mut out = String::new();
    for (i, r) in reports.iter().enumerate() {
        if i > 0 { out.push('\n'); }
        out.push_str(&format!("== {} ==\n", r.id));
        out.push_str(&render_outcome(&r.outcome));
    }
    out
}

fn status_str(o: &Outcome) -> &'static str {
    match o {
        Outcome::MissingInput => "missing_input",
        Outcome::Failed { .. } => "failed",
        Outcome::NoPrimers { .. } => "no_primers",
        Outcome::Designed { .. } => "designed",
    }
}

/// Round to one decimal exactly as `{:.1}` prints it, so table and text agree.
fn round1(x: f64) -> f64 { format!("{:.1}", x).parse().unwrap_or(x) }

/// `true` when any request ended in missing input or failure; a warning alone is not a failure.
pub fn exit_failed(reports: &[Report]) -> bool { reports.iter().any(|r| r.outcome.is_error()) }

/// One row per pair; requests without pairs get a single row with empty pair columns.
pub fn reports_frame(reports: &[Report]) -> PolarsResult<DataFrame> {
    let mut id = Vec::new();
    let mut status = Vec::new();
    let mut option = Vec::<Option<u32>>::new();
    let mut product = Vec::<Option<u32>>::new();
    let mut fwd = Vec::<Option<String>>::new();
    let mut fwd_tm = Vec::<Option<f64>>::new();
    let mut fwd_gc = Vec::<Option<f64>>::new();
    let mut rev = Vec::<Option<String>>::new();
    let mut rev_tm = Vec::<Option<f64>>::new();
    let mut rev_gc = Vec::<Option<f64>>::new();

    for r in reports {
        let pairs = r.outcome.pairs();
        if pairs.is_empty() {
            id.push(r.id.clone());
            status.push(status_str(&r.outcome).to_string());
            option.push(None);
            product.push(None);
            fwd.push(None);
            fwd_tm.push(None);
            fwd_gc.push(None);
            rev.push(None);
            rev_tm.push(None);
            rev_gc.push(None);
            continue;
        }
        for p in pairs {
            id.push(r.id.clone());
            status.push(status_str(&r.outcome).to_string());
            option.push(Some(p.index as u32 + 1));
            product.push(Some(p.product_size));
            fwd.push(Some(p.forward.sequence.clone()));
            fwd_tm.push(Some(round1(p.forward.tm)));
            fwd_gc.push(Some(round1(p.forward.gc_percent)));
            rev.push(Some(p.reverse.sequence.clone()));
            rev_tm.push(Some(round1(p.reverse.tm)));
            rev_gc.push(Some(round1(p.reverse.gc_percent)));
        }
    }

    df!(
        "id"           => id,
        "status"       => status,
        "option"       => option,
        "product_size" => product,
        "forward"      => fwd,
        "forward_tm"   => fwd_tm,
        "forward_gc"   => fwd_gc,
        "reverse"      => rev,
        "reverse_tm"   => rev_tm,
        "reverse_gc"   => rev_gc,
    )
}

/// Frame describing the available modes (for the `modes` subcommand).
pub fn modes_frame() -> PolarsResult<DataFrame> {
    let modes = list_modes();
    let ranges: Vec<String> = modes
        .iter()
        .map(|m| m.product_sizes.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(", "))
        .collect();
    df!(
        "mode"          => modes.iter().map(|m| m.number as u32).collect::<Vec<_>>(),
        "label"         => modes.iter().map(|m| m.label).collect::<Vec<_>>(),
        "circular"      => modes.iter().map(|m| m.mode.is_circular()).collect::<Vec<_>>(),
        "product_sizes" => ranges,
        "description"   => modes.iter().map(|m| m.help).collect::<Vec<_>>(),
    )
}

/// Write a frame as a table without truncating rows, columns or cell contents.
pub fn write_frame<W: Write>(w: &mut W, df: &DataFrame) -> std::io::Result<()> {
    // Read by polars' pretty-printer.
    std::env::set_var("POLARS_FMT_TABLE_FORMATTING", "UTF8_FULL");
    std::env::set_var("POLARS_FMT_MAX_COLS", "100000");
    std::env::set_var("POLARS_FMT_MAX_ROWS", "1000000");
    std::env::set_var("POLARS_FMT_STR_LEN", "100000");
    std::env::set_var("POLARS_TABLE_WIDTH", "65535");
    writeln!(w, "{}", df)
}

/// Write reports in `format` to `w`.
pub fn write_reports<W: Write>(w: &mut W, reports: &[Report], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => w.write_all(render_text(reports).as_bytes())?,
        OutputFormat::Table => {
            let df = reports_frame(reports)?;
            write_frame(w, &df)?;
        }
        OutputFormat::Csv => {
            let mut df = reports_frame(reports)?;
            CsvWriter::new(&mut *w).include_header(true).finish(&mut df)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *w, reports)?;
            writeln!(w)?;
        }
    }
    Ok(())
}
