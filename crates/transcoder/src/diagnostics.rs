//! Leveled diagnostics collected during extraction and translation.
//!
//! Nothing in the translator aborts on an unsupported construct: the node
//! degrades to empty text and one [`Diagnostic`] is recorded. Records are
//! forwarded to `tracing` as they are pushed, and kept so callers can gate
//! generated output on a clean run.

use serde::Serialize;
use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Debug => "debug",
            Level::Warning => "warning",
            Level::Error => "error",
        };
        f.write_str(s)
    }
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// Node kind absent from the translator's dispatch.
    UnsupportedConstruct,
    /// Operator tag absent from the resolution table or the token table.
    UnsupportedOperator,
    /// Chained comparison (`a < b < c`).
    UnsupportedComparisonShape,
    /// Dict entry without a key (`**mapping`).
    MalformedLiteral,
    /// A member could not be parsed into a function unit.
    ExtractionFailure,
    /// The client module was not discovered.
    MissingCollaborator,
    /// A token the node needs is absent from the token table.
    MissingToken,
    /// A module left out by discovery.
    SkippedModule,
}

impl DiagnosticKind {
    /// Level used when the kind is reported without an explicit one.
    pub fn default_level(self) -> Level {
        match self {
            DiagnosticKind::SkippedModule => Level::Warning,
            _ => Level::Error,
        }
    }
}

/// One leveled, human-readable record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}: {}", self.level, self.kind, self.message)
    }
}

/// Collector threaded through extraction and translation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and forward it to `tracing`.
    pub fn push(&mut self, level: Level, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        match level {
            Level::Debug => tracing::debug!(kind = ?kind, "{}", message),
            Level::Warning => tracing::warn!(kind = ?kind, "{}", message),
            Level::Error => tracing::error!(kind = ?kind, "{}", message),
        }
        self.records.push(Diagnostic {
            level,
            kind,
            message,
        });
    }

    /// Record at the kind's default level.
    pub fn report(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(kind.default_level(), kind, message);
    }

    pub fn debug(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(Level::Debug, kind, message);
    }

    pub fn warning(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(Level::Warning, kind, message);
    }

    pub fn error(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(Level::Error, kind, message);
    }

    /// Append records collected elsewhere. They were already forwarded to
    /// `tracing` when first pushed.
    pub fn extend(&mut self, other: Diagnostics) {
        self.records.extend(other.records);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.records.iter().filter(|d| d.kind == kind).count()
    }

    pub fn count_at(&self, level: Level) -> usize {
        self.records.iter().filter(|d| d.level == level).count()
    }

    /// No warnings and no errors. Debug records don't count.
    pub fn is_clean(&self) -> bool {
        self.records.iter().all(|d| d.level == Level::Debug)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.records
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
