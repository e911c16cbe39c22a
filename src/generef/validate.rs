//! Consistency checks over candidates and synthesized genes.

use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::strand::Strand;

use super::identity::{eq_nocase, identity_cmp, sort_candidates};
use super::types::{GeneCandidate, GeneRecord};

/// Push `value` unless an equal value (ignoring ASCII case) is present.
fn insert_nocase<'a>(values: &mut Vec<&'a str>, value: &'a str) {
    if !values.iter().any(|v| eq_nocase(v, value)) {
        values.push(value);
    }
}

/// Each locus tag must carry at most one gene symbol. A symbol spelled
/// exactly like its own tag says nothing and is cleared first, re-sorting
/// the list. Returns false when a REJECT was raised.
pub fn check_locus_tag_pairing(
    candidates: &mut Vec<GeneCandidate>,
    diagnostics: &mut Diagnostics,
) -> bool {
    let mut cleared = false;
    for candidate in candidates.iter_mut() {
        let identity = &mut candidate.identity;
        if identity.locus.is_some() && identity.locus == identity.locus_tag {
            identity.locus = None;
            cleared = true;
        }
    }
    if cleared {
        sort_candidates(candidates);
    }

    let mut tags: Vec<&str> = Vec::new();
    for tag in candidates.iter().filter_map(|c| c.identity.locus_tag.as_deref()) {
        insert_nocase(&mut tags, tag);
    }

    let mut consistent = true;
    for tag in tags {
        let mut symbols: Vec<&str> = Vec::new();
        for candidate in candidates.iter() {
            let identity = &candidate.identity;
            if let (Some(locus), Some(other)) = (&identity.locus, &identity.locus_tag)
                && eq_nocase(tag, other)
            {
                insert_nocase(&mut symbols, locus);
            }
        }
        if symbols.len() > 1 {
            diagnostics.reject(
                DiagnosticCode::InconsistentLocusTagAndGene,
                format!(
                    "Locus tag {tag} is used for different genes: {}",
                    symbols.join(", ")
                ),
            );
            consistent = false;
        }
    }
    consistent
}

/// Warn about a named gene found on both strands. Genes reported
/// individually are skipped. The list must be sorted.
pub fn check_strands(candidates: &[GeneCandidate], diagnostics: &mut Diagnostics) -> usize {
    let mut warned = 0;
    for group in candidates.chunk_by(|a, b| identity_cmp(a, b).is_eq()) {
        let mut named = group.iter().filter(|c| !c.leave && c.identity.has_name());
        let Some(first) = named.next() else {
            continue;
        };
        let forward = first.strand == Strand::Forward;
        if named.any(|c| (c.strand == Strand::Forward) != forward) {
            diagnostics.warning(
                DiagnosticCode::BothStrands,
                format!("Gene {} is used on both strands", first.identity),
            );
            warned += 1;
        }
    }
    warned
}

/// One gene symbol should not come with several locus tags. Raised as a
/// REJECT unless `allow_differing` downgrades it to a WARNING. Returns false
/// when a REJECT was raised.
pub fn check_locus_multiplicity(
    genes: &[GeneRecord],
    allow_differing: bool,
    diagnostics: &mut Diagnostics,
) -> bool {
    let mut symbols: Vec<&str> = Vec::new();
    for locus in genes.iter().filter_map(|g| g.locus.as_deref()) {
        insert_nocase(&mut symbols, locus);
    }

    let mut consistent = true;
    for symbol in symbols {
        let mut tags: Vec<&str> = Vec::new();
        for gene in genes {
            if let (Some(locus), Some(tag)) = (&gene.locus, &gene.locus_tag)
                && eq_nocase(symbol, locus)
            {
                insert_nocase(&mut tags, tag);
            }
        }
        if tags.len() < 2 {
            continue;
        }
        let message = format!(
            "Gene {symbol} has more than one locus tag: {}",
            tags.join(", ")
        );
        if allow_differing {
            diagnostics.warning(DiagnosticCode::MultipleGenesForLocus, message);
        } else {
            diagnostics.reject(DiagnosticCode::MultipleGenesForLocus, message);
            consistent = false;
        }
    }
    consistent
}
