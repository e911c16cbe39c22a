//! Wraparound handling for genes on circular molecules.

use tracing::debug;

use super::fragment::{circular_format, confirm_circular, merge};
use super::types::GeneCandidate;

/// Put every candidate's fragments into canonical order. Fragments that do
/// not describe a single walk around the origin are fused like those of a
/// linear molecule. Returns the number of genes confirmed to wrap.
pub fn circular_pass(candidates: &mut [GeneCandidate]) -> usize {
    let mut wrapped = 0;
    for candidate in candidates.iter_mut() {
        let mut fragments = std::mem::take(&mut candidate.fragments);
        candidate.fragments = if confirm_circular(&mut fragments) {
            debug!(gene = %candidate.identity, "gene spans the origin");
            wrapped += 1;
            circular_format(fragments)
        } else {
            merge(&fragments, &[], false)
        };
    }
    wrapped
}
