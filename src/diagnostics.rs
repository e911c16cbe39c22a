//! Structured diagnostic events raised while consolidating a record.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Severity of a diagnostic. REJECT makes the whole record unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Reject => "REJECT",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// One locus tag carries different gene symbols.
    InconsistentLocusTagAndGene,
    /// One gene symbol carries different locus tags.
    MultipleGenesForLocus,
    /// Components of one gene were found on both strands.
    BothStrands,
    /// Merged features disagree on the `/pseudogene` value.
    InconsistentPseudogene,
    /// Merged features disagree on the `/map` value.
    DifferentMaplocs,
    /// A gene collected more than one external gene id.
    MultipleGeneIds,
    /// A gene collected more than one `/old_locus_tag`.
    MultipleOldLocusTags,
    /// An `/old_locus_tag` repeats the feature's own `/locus_tag`.
    RedundantOldLocusTag,
    /// A feature received an explicit gene cross-reference.
    GeneXrefAdded,
}

impl DiagnosticCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InconsistentLocusTagAndGene => "FEATURE.InconsistentLocusTagAndGene",
            Self::MultipleGenesForLocus => "GENEREF.MultipleGenesForLocus",
            Self::BothStrands => "GENEREF.BothStrands",
            Self::InconsistentPseudogene => "FEATURE.InconsistentPseudogene",
            Self::DifferentMaplocs => "GENEREF.DifferentMaplocs",
            Self::MultipleGeneIds => "FEATURE.MultipleGeneIds",
            Self::MultipleOldLocusTags => "FEATURE.MultipleOldLocusTags",
            Self::RedundantOldLocusTag => "FEATURE.RedundantOldLocusTag",
            Self::GeneXrefAdded => "GENEREF.GeneXrefAdded",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)
    }
}

/// Ordered sink of diagnostics. Every event is also logged through `tracing`.
#[derive(Debug, Default)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, code: DiagnosticCode, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Info => info!(code = code.as_str(), "{message}"),
            Severity::Warning => warn!(code = code.as_str(), "{message}"),
            Severity::Error | Severity::Reject => {
                error!(code = code.as_str(), severity = %severity, "{message}");
            }
        }
        self.events.push(Diagnostic {
            severity,
            code,
            message,
        });
    }

    pub fn info(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.push(Severity::Info, code, message);
    }

    pub fn warning(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.push(Severity::Warning, code, message);
    }

    pub fn error(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.push(Severity::Error, code, message);
    }

    pub fn reject(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.push(Severity::Reject, code, message);
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.events.iter().filter(|d| d.severity == severity).count()
    }

    #[must_use]
    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.events
    }
}
