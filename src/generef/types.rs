//! Working and output types of the consolidation engine.

use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::feature::{GeneRef, Qualifier, RawFeature, keys};
use crate::feature_kind::FeatureKind;
use crate::location::{GeneLocation, Location};
use crate::record::InputRecord;
use crate::strand::Strand;

use super::fragment::LocationFragment;
use super::identity::GeneIdentity;

/// Position of a raw feature: 1-based segment number and index into that
/// segment's feature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FeatureRef {
    pub segment: u32,
    pub feature: usize,
}

/// One gene-bearing input feature, or several of them once merged.
#[derive(Debug, Clone)]
pub struct GeneCandidate {
    pub identity: GeneIdentity,
    /// `Some("")` is the "uniform/unset" value that clears any sibling value.
    pub pseudogene: Option<String>,
    pub gene_ids: Vec<String>,
    pub old_locus_tags: Vec<String>,
    pub maploc: Option<String>,

    pub segment: u32,
    pub strand: Strand,
    pub min: u32,
    pub max: u32,
    pub open_left: bool,
    pub open_right: bool,
    pub fragments: Vec<LocationFragment>,

    pub leave: bool,
    pub pseudo: bool,
    pub all_pseudo: bool,
    pub gene_feature: bool,
    pub to_delete: bool,

    /// Unconsumed qualifiers of the originating `gene` feature.
    pub carried_qualifiers: Vec<Qualifier>,
    /// Composite or mixed location of the originating feature, re-emitted as is.
    pub exact_location: Option<Location>,
    /// Every raw feature folded into this candidate.
    pub members: Vec<FeatureRef>,
}

impl GeneCandidate {
    pub fn new(identity: GeneIdentity, segment: u32, strand: Strand, min: u32, max: u32) -> Self {
        Self {
            identity,
            pseudogene: None,
            gene_ids: Vec::new(),
            old_locus_tags: Vec::new(),
            maploc: None,
            segment,
            strand,
            min,
            max,
            open_left: false,
            open_right: false,
            fragments: Vec::new(),
            leave: false,
            pseudo: false,
            all_pseudo: false,
            gene_feature: false,
            to_delete: false,
            carried_qualifiers: Vec::new(),
            exact_location: None,
            members: Vec::new(),
        }
    }

    /// Strictly before `other` on the sequence, without overlap.
    #[must_use]
    pub fn ends_before(&self, other: &GeneCandidate) -> bool {
        self.max < other.min
    }

    #[must_use]
    pub fn overlaps_range(&self, min: u32, max: u32) -> bool {
        self.min <= max && min <= self.max
    }

    /// Widen the aggregated bounds to cover `other`'s bounds.
    pub fn extend_bounds(&mut self, other: &GeneCandidate) {
        (self.min, self.open_left) =
            super::fragment::extend_left(self.min, self.open_left, other.min, other.open_left);
        (self.max, self.open_right) =
            super::fragment::extend_right(self.max, self.open_right, other.max, other.open_right);
    }
}

/// A synthesized gene annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneRecord {
    pub segment: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locus_tag: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maploc: Option<String>,
    pub pseudo: bool,
    /// Only ever non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pseudogene: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gene_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub old_locus_tags: Vec<String>,
    pub location: GeneLocation,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<Qualifier>,
    pub members: Vec<FeatureRef>,
}

impl GeneRecord {
    #[must_use]
    pub fn identity(&self) -> GeneIdentity {
        GeneIdentity {
            locus: self.locus.clone(),
            locus_tag: self.locus_tag.clone(),
            synonyms: self.synonyms.iter().cloned().collect(),
        }
    }

    #[must_use]
    pub fn gene_ref(&self) -> GeneRef {
        GeneRef {
            locus: self.locus.clone(),
            locus_tag: self.locus_tag.clone(),
            synonyms: self.synonyms.clone(),
        }
    }

    /// Render as a `gene` feature carrying every attribute as a qualifier.
    #[must_use]
    pub fn to_feature(&self) -> RawFeature {
        let mut feature = RawFeature::new(FeatureKind::Gene, self.location.to_location());
        feature.pseudo = self.pseudo;
        if let Some(locus) = &self.locus {
            feature.qualifiers.push(Qualifier::new(keys::GENE, locus));
        }
        if let Some(tag) = &self.locus_tag {
            feature.qualifiers.push(Qualifier::new(keys::LOCUS_TAG, tag));
        }
        for synonym in &self.synonyms {
            feature.qualifiers.push(Qualifier::new(keys::GENE_SYNONYM, synonym));
        }
        if let Some(maploc) = &self.maploc {
            feature.qualifiers.push(Qualifier::new(keys::MAP, maploc));
        }
        if let Some(pseudogene) = &self.pseudogene {
            feature.qualifiers.push(Qualifier::new(keys::PSEUDOGENE, pseudogene));
        }
        for id in &self.gene_ids {
            feature.qualifiers.push(Qualifier::new(keys::DB_XREF, id));
        }
        for alias in &self.old_locus_tags {
            feature.qualifiers.push(Qualifier::new(keys::OLD_LOCUS_TAG, alias));
        }
        feature.qualifiers.extend(self.qualifiers.iter().cloned());
        feature
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationStats {
    pub num_candidates: u32,
    pub num_pairwise_merges: u32,
    pub num_blocked_merges: u32,
    pub num_segment_merges: u32,
    pub num_contained: u32,
    pub num_without_location: u32,
    pub num_genes: u32,
    pub num_xrefs_added: u32,
    pub num_redundant_qualifiers: u32,
    pub num_unlinked_features: u32,
}

/// Result of consolidating one logical record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationOutcome {
    /// Synthesized genes in candidate order. Empty when the record is dropped.
    pub genes: Vec<GeneRecord>,
    /// Feature tables with consumed gene features removed and gene
    /// qualifiers resolved.
    pub segments: Vec<InputRecord>,
    pub diagnostics: Vec<Diagnostic>,
    /// A REJECT diagnostic was raised; the record is unusable.
    pub dropped: bool,
    pub stats: ConsolidationStats,
}
