//! Feature locations as handed over by the flat-file block parser.
//!
//! Coordinates are 0-based and inclusive on both ends.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::strand::Strand;

/// Namespace of a sequence identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeqIdKind {
    #[default]
    Genbank,
    Embl,
    Ddbj,
    Other,
}

/// A reference to a named sequence: accession plus optional version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeqRef {
    pub accession: String,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub kind: SeqIdKind,
}

impl SeqRef {
    pub fn new(accession: impl Into<String>, version: Option<u32>) -> Self {
        Self {
            accession: accession.into(),
            version,
            kind: SeqIdKind::default(),
        }
    }

    /// True when both refer to the same accession and version. The id kind is
    /// informational only.
    #[must_use]
    pub fn same_sequence(&self, other: &SeqRef) -> bool {
        self.accession == other.accession && self.version == other.version
    }
}

impl fmt::Display for SeqRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(v) => write!(f, "{}.{v}", self.accession),
            None => write!(f, "{}", self.accession),
        }
    }
}

/// One contiguous sub-interval of a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub seq: SeqRef,
    #[serde(default)]
    pub strand: Strand,
    pub from: u32,
    pub to: u32,
    #[serde(default)]
    pub open_left: bool,
    #[serde(default)]
    pub open_right: bool,
}

impl Interval {
    pub fn new(seq: SeqRef, strand: Strand, from: u32, to: u32) -> Self {
        Self {
            seq,
            strand,
            from,
            to,
            open_left: false,
            open_right: false,
        }
    }

    #[must_use]
    pub fn is_point(&self) -> bool {
        self.from == self.to
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.seq.accession.is_empty() {
            return Err(Error::Validation(format!(
                "interval {}..{} has no accession",
                self.from, self.to
            )));
        }
        if self.from > self.to {
            return Err(Error::Validation(format!(
                "interval on {} has from {} > to {}",
                self.seq, self.from, self.to
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let left = if self.open_left { "<" } else { "" };
        let right = if self.open_right { ">" } else { "" };
        if self.is_point() && !self.open_left && !self.open_right {
            write!(f, "{}:{}({})", self.seq, self.from, self.strand)
        } else {
            write!(
                f,
                "{}:{left}{}..{right}{}({})",
                self.seq, self.from, self.to, self.strand
            )
        }
    }
}

/// One element of a (possibly composite) location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LocationPart {
    Interval(Interval),
    /// The whole of the referenced sequence.
    Whole(SeqRef),
}

impl LocationPart {
    #[must_use]
    pub fn seq(&self) -> &SeqRef {
        match self {
            Self::Interval(interval) => &interval.seq,
            Self::Whole(seq) => seq,
        }
    }
}

/// An ordered list of location parts, as written in the flat file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(pub Vec<LocationPart>);

impl Location {
    #[must_use]
    pub fn single(interval: Interval) -> Self {
        Self(vec![LocationPart::Interval(interval)])
    }

    #[must_use]
    pub fn parts(&self) -> &[LocationPart] {
        &self.0
    }

    /// True when the location has more than one part.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.0.len() > 1
    }

    /// True when the parts reference more than one sequence.
    #[must_use]
    pub fn is_mixed(&self) -> bool {
        let Some(first) = self.0.first() else {
            return false;
        };
        self.0.iter().any(|p| !p.seq().same_sequence(first.seq()))
    }

    pub fn validate(&self) -> Result<(), Error> {
        for part in &self.0 {
            match part {
                LocationPart::Interval(interval) => interval.validate()?,
                LocationPart::Whole(seq) if seq.accession.is_empty() => {
                    return Err(Error::Validation(
                        "whole-sequence location has no accession".to_string(),
                    ));
                }
                LocationPart::Whole(_) => {}
            }
        }
        Ok(())
    }
}

/// Final location of a synthesized gene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "intervals", rename_all = "lowercase")]
pub enum GeneLocation {
    Point(Interval),
    Range(Interval),
    /// Ordered composite of ranges and points.
    Mix(Vec<Interval>),
}

impl GeneLocation {
    #[must_use]
    pub fn intervals(&self) -> &[Interval] {
        match self {
            Self::Point(interval) | Self::Range(interval) => std::slice::from_ref(interval),
            Self::Mix(intervals) => intervals,
        }
    }

    /// Render as a plain location, e.g. to feed a gene back through consolidation.
    #[must_use]
    pub fn to_location(&self) -> Location {
        Location(
            self.intervals()
                .iter()
                .cloned()
                .map(LocationPart::Interval)
                .collect(),
        )
    }
}

impl From<Location> for GeneLocation {
    /// Re-emit an exact location. Whole-sequence parts cannot be expressed
    /// without a length and are skipped.
    fn from(location: Location) -> Self {
        let mut intervals: Vec<Interval> = location
            .0
            .into_iter()
            .filter_map(|part| match part {
                LocationPart::Interval(interval) => Some(interval),
                LocationPart::Whole(_) => None,
            })
            .collect();
        if intervals.len() == 1 {
            let interval = intervals.remove(0);
            if interval.is_point() {
                Self::Point(interval)
            } else {
                Self::Range(interval)
            }
        } else {
            Self::Mix(intervals)
        }
    }
}

impl fmt::Display for GeneLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point(interval) | Self::Range(interval) => write!(f, "{interval}"),
            Self::Mix(intervals) => {
                write!(f, "join(")?;
                for (i, interval) in intervals.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{interval}")?;
                }
                write!(f, ")")
            }
        }
    }
}
