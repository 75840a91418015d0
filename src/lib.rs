#![forbid(unsafe_code)]
//! # circprimer
//!
//! PCR primer design for **circRNA back-splice junctions** and ordinary linear
//! templates. Paste a sequence, pick a mode, get up to five primer pairs.
//! Primer selection itself is done by [Primer3](https://primer3.org); this
//! crate prepares the template and constraints and reads the answer back.
//!
//! ## Modes
//! - **1**: divergent qPCR primers across the junction (80-150 bp products)
//! - **2**: junction-spanning primers for Sanger sequencing (250-600 bp, falling back to 200-800 bp)
//! - **3**: conventional linear design (80-200 bp)
//!
//! In modes 1 and 2 the sequence is concatenated with itself so the junction
//! sits in the middle of the template, and a target window straddling it is
//! required inside every product.
//!
//! ## Examples
//! ```no_run
//! use circprimer::{design_primers, DesignMode, Primer3Core};
//! let engine = Primer3Core::default(); // runs `primer3_core` from PATH
//! let outcome = design_primers("ATGC...", DesignMode::CircularQpcr, &engine);
//! for pair in outcome.pairs() {
//!     println!("{} / {} ({} bp)", pair.forward.sequence, pair.reverse.sequence, pair.product_size);
//! }
//! ```
//!
//! ## Version
//! See [`VERSION`].

pub mod boulder;
pub mod engine;
pub mod handler;
pub mod mode;
pub mod report;
pub mod results;
pub mod seqio;
pub mod sequence;
pub mod task;

pub use engine::{EngineError, Primer3Config, Primer3Core, PrimerEngine};
pub use handler::{handle, DesignRequest, HandleOptions, Outcome};
pub use mode::DesignMode;
pub use results::{Oligo, PrimerPair};
pub use task::{DesignTask, PrimerConstraints};

/// Design primers for one pasted sequence with default options.
///
/// Shorthand for [`handle`] with a `Target` request and no strict validation.
pub fn design_primers(raw: &str, mode: DesignMode, engine: &dyn PrimerEngine) -> Outcome {
    handle(&DesignRequest::new(raw, mode), &HandleOptions::default(), engine)
}

/// Crate version string (from `CARGO_PKG_VERSION`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
