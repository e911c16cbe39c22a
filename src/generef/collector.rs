//! Feature collector: one gene candidate per gene-bearing feature.

use tracing::debug;

use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::feature::{Qualifier, RawFeature, keys};
use crate::location::{Location, LocationPart, SeqRef};
use crate::record::InputRecord;
use crate::strand::Strand;

use super::fragment::{LocationFragment, Ordinal, extend_left, extend_right};
use super::identity::{GeneIdentity, eq_nocase};
use super::types::{FeatureRef, GeneCandidate};

/// A coding region on its own record, consulted by the CDS-in-between rule.
#[derive(Debug, Clone)]
pub struct CdsSpan {
    pub segment: u32,
    pub strand: Strand,
    pub min: u32,
    pub max: u32,
    /// The gene the coding region names, if any.
    pub identity: Option<GeneIdentity>,
}

#[derive(Debug, Default)]
pub struct Collection {
    pub candidates: Vec<GeneCandidate>,
    pub cds_spans: Vec<CdsSpan>,
    /// Non-gene features without gene qualifiers.
    pub num_unlinked: u32,
}

/// Known sequence lengths, used to expand whole-sequence markers.
struct SeqLengths(Vec<(SeqRef, u32)>);

impl SeqLengths {
    fn from_segments(segments: &[InputRecord]) -> Self {
        Self(
            segments
                .iter()
                .filter_map(|s| s.length.map(|len| (s.id.clone(), len)))
                .collect(),
        )
    }

    fn get(&self, seq: &SeqRef) -> Option<u32> {
        self.0
            .iter()
            .find(|(id, _)| is_same_record(id, seq))
            .map(|(_, len)| *len)
    }
}

/// Accessions must match; a missing version on either side matches any.
fn is_same_record(id: &SeqRef, seq: &SeqRef) -> bool {
    id.accession == seq.accession
        && match (id.version, seq.version) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
}

/// Walk every feature of every segment. Consumed gene-id cross-references
/// and legacy locus tags are removed from the features.
pub fn collect(
    segments: &mut [InputRecord],
    circular: bool,
    diagnostics: &mut Diagnostics,
) -> Collection {
    let lengths = SeqLengths::from_segments(segments);
    let mut collection = Collection::default();
    let mut group: u32 = 0;

    for (segment_index, record) in segments.iter_mut().enumerate() {
        let segment = segment_index as u32 + 1;
        let record_id = record.id.clone();
        for (feature_index, feature) in record.features.iter_mut().enumerate() {
            if feature.kind.is_no_gene() {
                continue;
            }
            group += 1;
            let fragments = build_fragments(&feature.location, &lengths, circular, group);
            let Some(bounds) = Bounds::on_record(&fragments, &record_id) else {
                continue;
            };

            let gene_ref = feature.gene_ref();
            if feature.kind.is_coding() {
                collection.cds_spans.push(CdsSpan {
                    segment,
                    strand: bounds.strand,
                    min: bounds.min,
                    max: bounds.max,
                    identity: gene_ref.as_ref().map(GeneIdentity::from_gene_ref),
                });
            }
            let Some(gene_ref) = gene_ref else {
                if !feature.kind.is_gene() {
                    collection.num_unlinked += 1;
                }
                continue;
            };

            let mut candidate = GeneCandidate::new(
                GeneIdentity::from_gene_ref(&gene_ref),
                segment,
                bounds.strand,
                bounds.min,
                bounds.max,
            );
            candidate.open_left = bounds.open_left;
            candidate.open_right = bounds.open_right;
            candidate.fragments = fragments;
            candidate.members.push(FeatureRef {
                segment,
                feature: feature_index,
            });
            fill_attributes(&mut candidate, feature, diagnostics);
            collection.candidates.push(candidate);
        }
    }

    debug!(
        candidates = collection.candidates.len(),
        cds = collection.cds_spans.len(),
        unlinked = collection.num_unlinked,
        "collected gene candidates"
    );
    collection
}

/// Qualifier-derived attributes and flags. Gene features hand over their
/// remaining qualifiers; other features keep theirs for the linker.
fn fill_attributes(
    candidate: &mut GeneCandidate,
    feature: &mut RawFeature,
    diagnostics: &mut Diagnostics,
) {
    let is_gene = feature.kind.is_gene();
    candidate.leave = feature.kind.is_leave();
    candidate.gene_feature = is_gene;

    for id in feature.take_qualifiers(Qualifier::is_gene_id_xref) {
        if let Some(id) = id.value {
            push_unique(&mut candidate.gene_ids, id);
        }
    }
    for alias in feature.take_qualifiers(|q| q.key == keys::OLD_LOCUS_TAG) {
        let Some(alias) = alias.value.filter(|v| !v.is_empty()) else {
            continue;
        };
        let redundant = candidate
            .identity
            .locus_tag
            .as_deref()
            .is_some_and(|tag| eq_nocase(tag, &alias));
        if redundant {
            diagnostics.warning(
                DiagnosticCode::RedundantOldLocusTag,
                format!(
                    "Redundant old_locus_tag {alias} matches locus_tag of gene {}",
                    candidate.identity
                ),
            );
            continue;
        }
        push_unique(&mut candidate.old_locus_tags, alias);
    }

    candidate.pseudogene = feature
        .qualifiers
        .iter()
        .find(|q| q.key == keys::PSEUDOGENE)
        .map(|q| q.value.clone().unwrap_or_default());
    candidate.maploc = feature.qualifier(keys::MAP).map(str::to_string);
    candidate.pseudo = (feature.pseudo && is_gene) || candidate.pseudogene.is_some();
    candidate.all_pseudo = feature.pseudo || candidate.pseudogene.is_some();

    if is_gene {
        candidate.carried_qualifiers = feature
            .qualifiers
            .iter()
            .filter(|q| {
                !matches!(
                    q.key.as_str(),
                    keys::GENE
                        | keys::LOCUS_TAG
                        | keys::GENE_SYNONYM
                        | keys::MAP
                        | keys::PSEUDOGENE
                )
            })
            .cloned()
            .collect();
        let location = &feature.location;
        let has_whole = location
            .parts()
            .iter()
            .any(|p| matches!(p, LocationPart::Whole(_)));
        if (location.is_composite() || location.is_mixed()) && !has_whole {
            candidate.exact_location = Some(location.clone());
        }
    }
}

pub(crate) fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Aggregated geometry of a feature on its own record.
struct Bounds {
    strand: Strand,
    min: u32,
    max: u32,
    open_left: bool,
    open_right: bool,
}

impl Bounds {
    fn on_record(fragments: &[LocationFragment], record_id: &SeqRef) -> Option<Self> {
        let mut local = fragments.iter().filter(|f| is_same_record(record_id, &f.seq));
        let first = local.next()?;
        let mut bounds = Bounds {
            strand: first.strand,
            min: first.min,
            max: first.max,
            open_left: first.open_left,
            open_right: first.open_right,
        };
        for fragment in local {
            (bounds.min, bounds.open_left) =
                extend_left(bounds.min, bounds.open_left, fragment.min, fragment.open_left);
            (bounds.max, bounds.open_right) =
                extend_right(bounds.max, bounds.open_right, fragment.max, fragment.open_right);
        }
        Some(bounds)
    }
}

/// One fragment per `(accession, version, strand)`, covering every part on
/// that key. On circular molecules a part moving backwards along the strand
/// starts a new fragment, so the wrap point survives as a fragment boundary.
fn build_fragments(
    location: &Location,
    lengths: &SeqLengths,
    circular: bool,
    group: u32,
) -> Vec<LocationFragment> {
    let mut fragments: Vec<LocationFragment> = Vec::new();
    // (fragment index, min of the last part added to it)
    let mut open_runs: Vec<(usize, u32)> = Vec::new();

    for (i, part) in location.parts().iter().enumerate() {
        let ordinal = Ordinal {
            group,
            index: i as u32 + 1,
        };
        let fragment = match part {
            LocationPart::Interval(interval) => LocationFragment::from_interval(interval, ordinal),
            LocationPart::Whole(seq) => {
                let Some(length) = lengths.get(seq).filter(|&len| len > 0) else {
                    continue;
                };
                LocationFragment {
                    seq: seq.clone(),
                    strand: Strand::Forward,
                    min: 0,
                    max: length - 1,
                    open_left: false,
                    open_right: false,
                    ordinal,
                }
            }
        };

        let run = open_runs
            .iter()
            .rposition(|&(idx, _)| fragments[idx].same_key(&fragment));
        let wraps = run.is_some_and(|r| {
            circular && steps_back(fragment.strand, open_runs[r].1, fragment.min)
        });
        match run {
            Some(r) if !wraps => {
                let (idx, _) = open_runs[r];
                open_runs[r].1 = fragment.min;
                fragments[idx].absorb(&fragment);
            }
            _ => {
                open_runs.push((fragments.len(), fragment.min));
                fragments.push(fragment);
            }
        }
    }
    fragments
}

fn steps_back(strand: Strand, prev_min: u32, next_min: u32) -> bool {
    if strand.is_reverse() {
        next_min > prev_min
    } else {
        next_min < prev_min
    }
}
