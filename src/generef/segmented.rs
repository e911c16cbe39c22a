//! Merging genes that continue across the segments of a segmented set.

use tracing::debug;

use crate::diagnostics::Diagnostics;

use super::merge::fold_attributes;
use super::types::GeneCandidate;

fn continues(cur: &GeneCandidate, next: &GeneCandidate) -> bool {
    next.segment == cur.segment + 1
        && next.strand == cur.strand
        && !next.leave
        && !next.to_delete
        && cur.identity.same_gene(&next.identity)
}

/// Follow each gene through consecutive segments and merge every chain of
/// two or more. A chain touching every segment is merged into its first
/// member, a shorter one into its last. Returns the number of candidates
/// merged away.
pub fn segment_pass(
    candidates: &mut Vec<GeneCandidate>,
    segment_count: u32,
    diagnostics: &mut Diagnostics,
) -> u32 {
    let mut merged = 0;
    for start in 0..candidates.len() {
        if candidates[start].leave || candidates[start].to_delete {
            continue;
        }
        let mut chain = vec![start];
        while let Some(&last) = chain.last() {
            let found = candidates
                .iter()
                .enumerate()
                .find(|(j, c)| !chain.contains(j) && continues(&candidates[last], c))
                .map(|(j, _)| j);
            match found {
                Some(j) => chain.push(j),
                None => break,
            }
        }
        if chain.len() < 2 {
            continue;
        }

        let target = if chain.len() as u32 == segment_count {
            chain[0]
        } else {
            chain[chain.len() - 1]
        };
        debug!(
            gene = %candidates[target].identity,
            segments = chain.len(),
            "merging gene across segments"
        );
        merge_chain(candidates, &chain, target, diagnostics);
        merged += chain.len() as u32 - 1;
    }
    candidates.retain(|c| !c.to_delete);
    merged
}

fn merge_chain(
    candidates: &mut [GeneCandidate],
    chain: &[usize],
    target: usize,
    diagnostics: &mut Diagnostics,
) {
    let fragments = chain
        .iter()
        .flat_map(|&i| candidates[i].fragments.iter().cloned())
        .collect();
    let carried = chain
        .iter()
        .map(|&i| &candidates[i].carried_qualifiers)
        .find(|q| !q.is_empty())
        .cloned()
        .unwrap_or_default();

    for &donor in chain.iter().filter(|&&i| i != target) {
        let donor_candidate = candidates[donor].clone();
        fold_attributes(&mut candidates[target], &donor_candidate, diagnostics);
        candidates[donor].to_delete = true;
    }
    let target = &mut candidates[target];
    target.fragments = fragments;
    target.carried_qualifiers = carried;
    target.exact_location = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generef::types::test_support::candidate;
    use crate::location::SeqRef;
    use crate::strand::Strand;

    fn on_segment(name: &str, segment: u32) -> GeneCandidate {
        let mut c = candidate(name, segment, Strand::Forward, 10, 20);
        c.fragments[0].seq = SeqRef::new(format!("AB00000{segment}"), Some(1));
        c
    }

    fn accessions(c: &GeneCandidate) -> Vec<String> {
        c.fragments.iter().map(|f| f.seq.accession.clone()).collect()
    }

    #[test]
    fn full_chain_merges_into_first() {
        let mut candidates = vec![on_segment("g", 1), on_segment("g", 2), on_segment("g", 3)];
        let mut diagnostics = Diagnostics::new();
        assert_eq!(segment_pass(&mut candidates, 3, &mut diagnostics), 2);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].segment, 1);
        assert_eq!(accessions(&candidates[0]), vec!["AB000001", "AB000002", "AB000003"]);
    }

    #[test]
    fn partial_chain_merges_into_last() {
        let mut candidates = vec![on_segment("g", 1), on_segment("g", 2), on_segment("h", 3)];
        let mut diagnostics = Diagnostics::new();
        assert_eq!(segment_pass(&mut candidates, 3, &mut diagnostics), 1);
        assert_eq!(candidates.len(), 2);
        let g = candidates.iter().find(|c| c.identity.to_string() == "g").unwrap();
        assert_eq!(g.segment, 2);
        assert_eq!(accessions(g), vec!["AB000001", "AB000002"]);
    }

    #[test]
    fn gap_breaks_chain() {
        let mut candidates = vec![on_segment("g", 1), on_segment("g", 3)];
        let mut diagnostics = Diagnostics::new();
        assert_eq!(segment_pass(&mut candidates, 3, &mut diagnostics), 0);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn strand_must_match() {
        let mut reverse = on_segment("g", 2);
        reverse.strand = Strand::Reverse;
        let mut candidates = vec![on_segment("g", 1), reverse];
        let mut diagnostics = Diagnostics::new();
        assert_eq!(segment_pass(&mut candidates, 2, &mut diagnostics), 0);
    }
}
