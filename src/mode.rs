//! Registry of the three **design modes**.
//!
//! Modes 1 and 2 target circRNA back-splice junctions: the template is the
//! sequence concatenated with itself and a target window straddles the join.
//! Mode 3 is conventional linear design on the sequence as given.
//!
//! | mode | template | target window        | product ranges          |
//! |------|----------|----------------------|-------------------------|
//! | 1    | S + S    | (L - 10, 20)         | 80-150                  |
//! | 2    | S + S    | (L - 5, 10)          | 250-600, then 200-800   |
//! | 3    | S        | none                 | 80-200                  |
use core::fmt;

use serde::Serialize;

use crate::task::ProductSizeRange;

/// Primer-design mode selected by the user.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignMode {
    /// Mode 1: divergent primers across the junction, short qPCR product.
    CircularQpcr,
    /// Mode 2: primers across the junction, long product for Sanger sequencing.
    CircularSanger,
    /// Mode 3: conventional linear design.
    Linear,
}

/// Static description of a mode: number, labels, and the template layout it implies.
#[derive(Clone, Debug)]
pub struct ModeSpec {
    pub mode: DesignMode,
    /// Number shown in the selector (1, 2 or 3).
    pub number: u8,
    /// Short display label.
    pub label: &'static str,
    /// One-line help text.
    pub help: &'static str,
    /// Message shown next to successful results.
    pub status: &'static str,
    /// `Some((back, width))` for junction modes: the window starts `back`
    /// bases before the join and spans `width` bases.
    pub junction_window: Option<(usize, usize)>,
    /// Acceptable product sizes, in the order the engine should try them.
    pub product_sizes: &'static [ProductSizeRange],
}

pub const MODES: &[ModeSpec] = &[
    ModeSpec {
        mode: DesignMode::CircularQpcr,
        number: 1,
        label: "1. circRNA divergent (qPCR)",
        help: "Simulates circularization; products of 80-150 bp.",
        status: "Mode 1: sequence concatenated to simulate circularization",
        junction_window: Some((10, 20)),
        product_sizes: &[ProductSizeRange { min: 80, max: 150 }],
    },
    ModeSpec {
        mode: DesignMode::CircularSanger,
        number: 2,
        label: "2. circRNA junction (Sanger sequencing)",
        help: "Simulates circularization; products of 250-600 bp.",
        status: "Mode 2: Sanger sequencing mode (long product)",
        junction_window: Some((5, 10)),
        product_sizes: &[
            ProductSizeRange { min: 250, max: 600 },
            ProductSizeRange { min: 200, max: 800 },
        ],
    },
    ModeSpec {
        mode: DesignMode::Linear,
        number: 3,
        label: "3. linear mRNA (qPCR)",
        help: "Conventional linear design.",
        status: "Mode 3: conventional linear primer design",
        junction_window: None,
        product_sizes: &[ProductSizeRange { min: 80, max: 200 }],
    },
];

impl DesignMode {
    /// Static registry entry for this mode.
    pub fn spec(self) -> &'static ModeSpec {
        match self {
            DesignMode::CircularQpcr => &MODES[0],
            DesignMode::CircularSanger => &MODES[1],
            DesignMode::Linear => &MODES[2],
        }
    }

    pub fn number(self) -> u8 { self.spec().number }

    /// `true` for modes that duplicate the template to model a circle.
    pub fn is_circular(self) -> bool { self.spec().junction_window.is_some() }

    /// Look a mode up by its selector number.
    pub fn from_number(n: u8) -> Option<Self> {
        MODES.iter().find(|m| m.number == n).map(|m| m.mode)
    }
}

impl fmt::Display for DesignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.spec().label) }
}

impl std::str::FromStr for DesignMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "qpcr" | "circ-qpcr" => Ok(Self::CircularQpcr),
            "2" | "sanger" | "circ-sanger" => Ok(Self::CircularSanger),
            "3" | "linear" => Ok(Self::Linear),
            other => Err(format!("Unknown mode: {} (expected 1, 2 or 3)", other)),
        }
    }
}

/// Return the static registry of modes.
pub fn list_modes() -> &'static [ModeSpec] { MODES }
