//! Gene identity and the orderings used to group candidates.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::feature::GeneRef;

use super::types::GeneCandidate;

/// ASCII case-insensitive comparison.
#[must_use]
pub fn cmp_nocase(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

#[must_use]
pub fn eq_nocase(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Absent values sort before present ones.
fn cmp_opt_nocase(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp_nocase(a, b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

fn eq_opt_nocase(a: Option<&str>, b: Option<&str>) -> bool {
    cmp_opt_nocase(a, b) == Ordering::Equal
}

/// Who a gene is: symbol, locus tag and synonyms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneIdentity {
    pub locus: Option<String>,
    pub locus_tag: Option<String>,
    /// Deduplicated case-sensitively; iteration order is sorted.
    pub synonyms: BTreeSet<String>,
}

impl GeneIdentity {
    pub fn new(locus: Option<&str>, locus_tag: Option<&str>) -> Self {
        Self {
            locus: locus.map(str::to_string),
            locus_tag: locus_tag.map(str::to_string),
            synonyms: BTreeSet::new(),
        }
    }

    pub fn from_gene_ref(gene_ref: &GeneRef) -> Self {
        Self {
            locus: gene_ref.locus.clone(),
            locus_tag: gene_ref.locus_tag.clone(),
            synonyms: gene_ref.synonyms.iter().cloned().collect(),
        }
    }

    /// Compare symbol (or the synonym set when neither side has a symbol),
    /// then locus tag.
    #[must_use]
    pub fn cmp_names(&self, other: &GeneIdentity) -> Ordering {
        let by_symbol = match (&self.locus, &other.locus) {
            (Some(a), Some(b)) => cmp_nocase(a, b),
            (None, None) => self.synonyms.iter().cmp(other.synonyms.iter()),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
        };
        by_symbol.then_with(|| {
            cmp_opt_nocase(self.locus_tag.as_deref(), other.locus_tag.as_deref())
        })
    }

    #[must_use]
    pub fn same_gene(&self, other: &GeneIdentity) -> bool {
        self.cmp_names(other) == Ordering::Equal
    }

    /// True when the descriptor names this gene: symbol and locus tag agree.
    #[must_use]
    pub fn matches_ref(&self, gene_ref: &GeneRef) -> bool {
        eq_opt_nocase(self.locus.as_deref(), gene_ref.locus.as_deref())
            && eq_opt_nocase(self.locus_tag.as_deref(), gene_ref.locus_tag.as_deref())
    }

    #[must_use]
    pub fn has_name(&self) -> bool {
        self.locus.is_some() || self.locus_tag.is_some()
    }
}

impl fmt::Display for GeneIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.locus, &self.locus_tag) {
            (Some(locus), Some(tag)) => write!(f, "{locus}/{tag}"),
            (Some(locus), None) => write!(f, "{locus}"),
            (None, Some(tag)) => write!(f, "{tag}"),
            (None, None) => {
                let synonyms: Vec<&str> = self.synonyms.iter().map(String::as_str).collect();
                write!(f, "[{}]", synonyms.join(","))
            }
        }
    }
}

/// Segment, then gene identity. Equal means "the same gene".
#[must_use]
pub fn identity_cmp(a: &GeneCandidate, b: &GeneCandidate) -> Ordering {
    a.segment
        .cmp(&b.segment)
        .then_with(|| a.identity.cmp_names(&b.identity))
}

/// Full sort order: identity, strand, leave, from, open-left (open first),
/// to, open-right.
#[must_use]
pub fn sort_cmp(a: &GeneCandidate, b: &GeneCandidate) -> Ordering {
    identity_cmp(a, b)
        .then_with(|| a.strand.cmp(&b.strand))
        .then_with(|| a.leave.cmp(&b.leave))
        .then_with(|| a.min.cmp(&b.min))
        .then_with(|| b.open_left.cmp(&a.open_left))
        .then_with(|| a.max.cmp(&b.max))
        .then_with(|| a.open_right.cmp(&b.open_right))
}

/// Stable sort: candidates comparing equal keep their input order.
pub fn sort_candidates(candidates: &mut [GeneCandidate]) {
    candidates.sort_by(sort_cmp);
}
