//! Gene annotation consolidation.
//!
//! Takes every raw feature of one logical record (a single record or all
//! segments of a segmented set), decides which features denote the same
//! gene, merges their locations and emits one gene record per gene. Non-gene
//! features keep or lose their gene qualifiers depending on whether their
//! location already implies the gene.
//!
//! The passes run in a fixed order:
//!
//! 1. collect candidates ([`collector`])
//! 2. stable sort ([`identity::sort_candidates`])
//! 3. locus tag pairing and strand checks ([`validate`])
//! 4. pairwise sweep ([`sweep`])
//! 5. circular reordering ([`circular`]), circular molecules only
//! 6. merging across segments ([`segmented`]), segmented sets only
//! 7. containment absorption ([`containment`])
//! 8. synthesis ([`synthesize`]) and the locus multiplicity check
//! 9. cross-reference linking ([`link`])

pub mod circular;
pub mod collector;
pub mod containment;
pub mod fragment;
pub mod identity;
pub mod link;
pub mod merge;
pub mod segmented;
pub mod sweep;
pub mod synthesize;
pub mod types;
pub mod validate;

use std::collections::HashSet;

use tracing::{debug, info};

pub use identity::GeneIdentity;
pub use types::{ConsolidationOutcome, ConsolidationStats, FeatureRef, GeneRecord};

use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::record::{ConsolidationOptions, InputRecord, RecordSet};

/// Consolidate the genes of one logical record.
///
/// `defaults` apply unless the record set carries its own options. Invalid
/// input is an error; naming conflicts are diagnostics, and a REJECT marks
/// the outcome as dropped with the input feature tables returned untouched.
pub fn consolidate(
    set: &RecordSet,
    defaults: &ConsolidationOptions,
) -> Result<ConsolidationOutcome, Error> {
    set.validate()?;
    let options = set.options.unwrap_or(*defaults);
    let mut diagnostics = Diagnostics::new();
    let mut stats = ConsolidationStats::default();
    let mut segments = set.segments.clone();

    let collection = collector::collect(&mut segments, options.circular, &mut diagnostics);
    let mut candidates = collection.candidates;
    stats.num_candidates = candidates.len() as u32;
    stats.num_unlinked_features = collection.num_unlinked;

    identity::sort_candidates(&mut candidates);
    if !validate::check_locus_tag_pairing(&mut candidates, &mut diagnostics) {
        return Ok(rejected(set, diagnostics, stats));
    }
    validate::check_strands(&candidates, &mut diagnostics);

    sweep::pairwise_sweep(
        &mut candidates,
        &collection.cds_spans,
        &options,
        &mut stats,
        &mut diagnostics,
    );
    debug!(candidates = candidates.len(), "pairwise sweep done");

    if options.circular {
        let wrapped = circular::circular_pass(&mut candidates);
        debug!(wrapped, "circular pass done");
    }
    if set.is_segmented() {
        stats.num_segment_merges = segmented::segment_pass(
            &mut candidates,
            set.segments.len() as u32,
            &mut diagnostics,
        );
        debug!(candidates = candidates.len(), "segment pass done");
    }
    stats.num_contained = containment::containment_pass(&mut candidates, &mut diagnostics);

    let (genes, without_location) = synthesize::synthesize(candidates, &mut diagnostics);
    stats.num_without_location = without_location;
    stats.num_genes = genes.len() as u32;
    if !validate::check_locus_multiplicity(
        &genes,
        options.allow_differing_locus_tags,
        &mut diagnostics,
    ) {
        return Ok(rejected(set, diagnostics, stats));
    }

    let counts = link::link_features(&mut segments, &genes, &mut diagnostics);
    stats.num_xrefs_added = counts.xrefs_added;
    stats.num_redundant_qualifiers = counts.redundant;
    remove_consumed_genes(&mut segments, &genes);

    info!(
        record = %set.segments[0].id,
        genes = stats.num_genes,
        candidates = stats.num_candidates,
        diagnostics = diagnostics.events().len(),
        "consolidated genes"
    );
    Ok(ConsolidationOutcome {
        genes,
        segments,
        diagnostics: diagnostics.into_vec(),
        dropped: false,
        stats,
    })
}

fn rejected(
    set: &RecordSet,
    diagnostics: Diagnostics,
    stats: ConsolidationStats,
) -> ConsolidationOutcome {
    info!(record = %set.segments[0].id, "record dropped");
    ConsolidationOutcome {
        genes: Vec::new(),
        segments: set.segments.clone(),
        diagnostics: diagnostics.into_vec(),
        dropped: true,
        stats,
    }
}

/// Explicit gene features folded into a synthesized gene are replaced by it.
fn remove_consumed_genes(segments: &mut [InputRecord], genes: &[GeneRecord]) {
    let consumed: HashSet<FeatureRef> = genes
        .iter()
        .flat_map(|g| g.members.iter().copied())
        .collect();
    for (segment_index, record) in segments.iter_mut().enumerate() {
        let segment = segment_index as u32 + 1;
        let features = std::mem::take(&mut record.features);
        record.features = features
            .into_iter()
            .enumerate()
            .filter(|(feature, f)| {
                !(f.kind.is_gene()
                    && consumed.contains(&FeatureRef {
                        segment,
                        feature: *feature,
                    }))
            })
            .map(|(_, f)| f)
            .collect();
    }
}
