//! Gene feature synthesis: one gene record per surviving candidate.

use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::location::GeneLocation;

use super::fragment::to_gene_location;
use super::types::{GeneCandidate, GeneRecord};

/// Build the gene records. Candidates without any location are skipped;
/// the second value counts them.
pub fn synthesize(
    candidates: Vec<GeneCandidate>,
    diagnostics: &mut Diagnostics,
) -> (Vec<GeneRecord>, u32) {
    let mut genes = Vec::with_capacity(candidates.len());
    let mut without_location = 0;
    for candidate in candidates {
        match synthesize_one(candidate, diagnostics) {
            Some(gene) => genes.push(gene),
            None => without_location += 1,
        }
    }
    (genes, without_location)
}

fn synthesize_one(candidate: GeneCandidate, diagnostics: &mut Diagnostics) -> Option<GeneRecord> {
    let location = candidate
        .exact_location
        .map(GeneLocation::from)
        .filter(|l| !l.intervals().is_empty())
        .or_else(|| to_gene_location(&candidate.fragments))?;

    let identity = candidate.identity;
    let describe = || {
        format!(
            "gene {} locus_tag {}",
            identity.locus.as_deref().unwrap_or("-"),
            identity.locus_tag.as_deref().unwrap_or("-")
        )
    };
    if candidate.gene_ids.len() > 1 {
        diagnostics.warning(
            DiagnosticCode::MultipleGeneIds,
            format!(
                "Multiple gene ids for {}: {}",
                describe(),
                candidate.gene_ids.join(", ")
            ),
        );
    }
    if candidate.old_locus_tags.len() > 1 {
        diagnostics.warning(
            DiagnosticCode::MultipleOldLocusTags,
            format!(
                "Multiple old_locus_tags for {}: {}",
                describe(),
                candidate.old_locus_tags.join(", ")
            ),
        );
    }

    let pseudo = candidate.pseudo || candidate.all_pseudo || candidate.pseudogene.is_some();
    Some(GeneRecord {
        segment: candidate.segment,
        locus: identity.locus,
        locus_tag: identity.locus_tag,
        synonyms: identity.synonyms.into_iter().collect(),
        maploc: candidate.maploc,
        pseudo,
        pseudogene: candidate.pseudogene.filter(|p| !p.is_empty()),
        gene_ids: candidate.gene_ids,
        old_locus_tags: candidate.old_locus_tags,
        location,
        qualifiers: candidate.carried_qualifiers,
        members: candidate.members,
    })
}
