//! Non-fatal diagnostic warnings emitted during composition builds.
//!
//! Every recoverable condition (a missing audio measurement, an empty
//! script segment, a timeline that overruns the format ceiling) is
//! resolved at build time with a fallback and recorded here, so the
//! failure is visible without stopping the render.

use serde::{Deserialize, Serialize};

/// Category of a build-time warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A segment or phase lacked a measured audio duration and a
    /// fallback estimate was substituted.
    MissingMeasurement,
    /// Input text was empty; equal division was used instead of
    /// proportional distribution.
    EmptyInput,
    /// The computed timeline exceeded the format's duration ceiling and
    /// trailing content was truncated.
    OverCapacity,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::MissingMeasurement => write!(f, "missing measurement"),
            WarningKind::EmptyInput => write!(f, "empty input"),
            WarningKind::OverCapacity => write!(f, "over capacity"),
        }
    }
}

/// A single non-fatal warning recorded during a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Warning category.
    pub kind: WarningKind,
    /// Human-readable description of what was substituted or truncated.
    pub message: String,
}

/// Collector for build-time warnings.
///
/// Warnings are appended in build order and mirrored to `tracing` as
/// they are recorded. The collector is returned alongside the finished
/// composition so callers can surface it (log file, GUI, CI check).
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and mirror it to the tracing subscriber.
    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(kind = %kind, "{}", message);
        self.warnings.push(Warning { kind, message });
    }

    /// All warnings recorded so far, in order.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Whether any warning of the given kind was recorded.
    pub fn has(&self, kind: WarningKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }

    /// Number of warnings recorded.
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// True if no warnings were recorded.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Merge another collector's warnings into this one.
    pub fn extend(&mut self, other: Diagnostics) {
        self.warnings.extend(other.warnings);
    }
}
