//! Folding one gene candidate into another.

use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::location::{GeneLocation, Location};

use super::collector::push_unique;
use super::fragment::{self, LocationFragment, from_gene_location, location_contains};
use super::identity::eq_nocase;
use super::types::GeneCandidate;

/// How the donor's fragments join the target's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentMode {
    /// Fuse overlapping fragments; `join` also fuses adjacent ones.
    Merge { join: bool },
    /// Concatenate only.
    Collect,
}

/// Merge `donor` into `target`: bounds, fragments and every attribute.
/// Fragment order and the reused gene-feature data follow [`fragment::merge_order`].
pub fn merge_candidates(
    target: &mut GeneCandidate,
    donor: &GeneCandidate,
    mode: FragmentMode,
    diagnostics: &mut Diagnostics,
) {
    let donor_first = fragment::merge_order(&target.fragments, &donor.fragments);
    let (first, second) = if donor_first {
        (&donor.fragments, &target.fragments)
    } else {
        (&target.fragments, &donor.fragments)
    };
    let fragments = match mode {
        FragmentMode::Merge { join } => fragment::merge(first, second, join),
        FragmentMode::Collect => fragment::collect(first, second),
    };

    target.exact_location = if donor_first {
        pick_exact_location(donor, target)
    } else {
        pick_exact_location(target, donor)
    };
    if donor.gene_feature && (donor_first || !target.gene_feature) {
        target.carried_qualifiers = donor.carried_qualifiers.clone();
    }
    target.fragments = fragments;
    target.extend_bounds(donor);
    fold_attributes(target, donor, diagnostics);
}

/// An exact location survives only when its own intervals still cover the
/// other side. The aggregated fragments are not enough: they also span the
/// gaps between the parts of a composite location.
fn pick_exact_location(
    preferred: &GeneCandidate,
    other: &GeneCandidate,
) -> Option<Location> {
    if exact_location_covers(preferred, &other.fragments) {
        return preferred.exact_location.clone();
    }
    if exact_location_covers(other, &preferred.fragments) {
        return other.exact_location.clone();
    }
    None
}

pub(crate) fn exact_location_covers(
    candidate: &GeneCandidate,
    fragments: &[LocationFragment],
) -> bool {
    candidate.exact_location.as_ref().is_some_and(|exact| {
        let parts = from_gene_location(&GeneLocation::from(exact.clone()));
        location_contains(&parts, fragments)
    })
}

/// Union of names, ids and aliases plus the flag rules; geometry untouched.
pub fn fold_attributes(
    target: &mut GeneCandidate,
    donor: &GeneCandidate,
    diagnostics: &mut Diagnostics,
) {
    target
        .identity
        .synonyms
        .extend(donor.identity.synonyms.iter().cloned());
    for id in &donor.gene_ids {
        push_unique(&mut target.gene_ids, id.clone());
    }
    for alias in &donor.old_locus_tags {
        push_unique(&mut target.old_locus_tags, alias.clone());
    }

    if let Some(other) = &donor.maploc {
        if let Some(kept) = &target.maploc {
            if !eq_nocase(kept, other) {
                diagnostics.warning(
                    DiagnosticCode::DifferentMaplocs,
                    format!(
                        "Gene {} has different maplocs: {kept} and {other}",
                        target.identity
                    ),
                );
            }
        } else {
            target.maploc = Some(other.clone());
        }
    }

    target.pseudogene = merge_pseudogene(
        target.pseudogene.take(),
        donor.pseudogene.as_deref(),
        &target.identity.to_string(),
        diagnostics,
    );
    target.pseudo |= donor.pseudo;
    target.all_pseudo &= donor.all_pseudo;
    target.gene_feature |= donor.gene_feature;
    target.members.extend(donor.members.iter().copied());
}

/// An empty value on either side clears the other; differing values are an
/// error and are both cleared.
fn merge_pseudogene(
    kept: Option<String>,
    other: Option<&str>,
    gene: &str,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    match (kept, other) {
        (kept, None) => kept,
        (None, Some(other)) => Some(other.to_string()),
        (Some(kept), Some(other)) => {
            if kept.is_empty() || other.is_empty() {
                Some(String::new())
            } else if eq_nocase(&kept, other) {
                Some(kept)
            } else {
                diagnostics.error(
                    DiagnosticCode::InconsistentPseudogene,
                    format!("Gene {gene} has inconsistent pseudogene values: {kept} and {other}"),
                );
                Some(String::new())
            }
        }
    }
}
