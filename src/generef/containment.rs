//! Containment absorption: a candidate lying inside another candidate of
//! the same gene is folded into it.

use crate::diagnostics::Diagnostics;

use super::fragment::location_contains;
use super::merge::{exact_location_covers, fold_attributes};
use super::types::GeneCandidate;

fn same_gene_and_strand(a: &GeneCandidate, b: &GeneCandidate) -> bool {
    !a.leave
        && !b.leave
        && a.segment == b.segment
        && a.strand == b.strand
        && a.identity.same_gene(&b.identity)
}

/// Returns the number of candidates absorbed. When two locations are equal
/// the earlier candidate survives.
pub fn containment_pass(
    candidates: &mut Vec<GeneCandidate>,
    diagnostics: &mut Diagnostics,
) -> u32 {
    let mut absorbed = 0;
    let mut i = 0;
    while i < candidates.len() {
        let mut j = 0;
        while j < candidates.len() {
            if j == i
                || !same_gene_and_strand(&candidates[i], &candidates[j])
                || !location_contains(&candidates[i].fragments, &candidates[j].fragments)
            {
                j += 1;
                continue;
            }
            let inner = candidates.remove(j);
            if j < i {
                i -= 1;
            }
            absorb(&mut candidates[i], &inner, diagnostics);
            absorbed += 1;
        }
        i += 1;
    }
    absorbed
}

fn absorb(outer: &mut GeneCandidate, inner: &GeneCandidate, diagnostics: &mut Diagnostics) {
    if !exact_location_covers(outer, &inner.fragments) {
        outer.exact_location = None;
    }
    fold_attributes(outer, inner, diagnostics);
    if outer.min == inner.min {
        outer.open_left |= inner.open_left;
    }
    if outer.max == inner.max {
        outer.open_right |= inner.open_right;
    }
    for fragment in &mut outer.fragments {
        for other in &inner.fragments {
            if !other.same_key(fragment) {
                continue;
            }
            if other.min == fragment.min {
                fragment.open_left |= other.open_left;
            }
            if other.max == fragment.max {
                fragment.open_right |= other.open_right;
            }
        }
    }
}
