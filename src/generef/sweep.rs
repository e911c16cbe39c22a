//! Pairwise sweep over the sorted candidate list.

use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::record::ConsolidationOptions;

use super::collector::CdsSpan;
use super::merge::{FragmentMode, merge_candidates};
use super::types::{ConsolidationStats, GeneCandidate};

/// Neighbors that name the same gene on the same strand of the same
/// segment, neither of them reported individually.
fn is_mergeable(cur: &GeneCandidate, next: &GeneCandidate) -> bool {
    cur.segment == next.segment
        && cur.strand == next.strand
        && !cur.leave
        && !next.leave
        && cur.identity.same_gene(&next.identity)
}

/// A candidate on the same strand of the same segment naming another gene.
fn is_unrelated(other: &GeneCandidate, cur: &GeneCandidate) -> bool {
    other.segment == cur.segment
        && other.strand == cur.strand
        && !other.identity.same_gene(&cur.identity)
}

/// Merge adjacent candidates naming the same gene unless something
/// unrelated lies between them. The list must be sorted.
pub fn pairwise_sweep(
    candidates: &mut Vec<GeneCandidate>,
    cds_spans: &[CdsSpan],
    options: &ConsolidationOptions,
    stats: &mut ConsolidationStats,
    diagnostics: &mut Diagnostics,
) {
    let mut i = 0;
    while i + 1 < candidates.len() {
        let (cur, next) = (&candidates[i], &candidates[i + 1]);
        if !is_mergeable(cur, next) {
            i += 1;
            continue;
        }
        if !options.simple_merge && is_blocked(&candidates[..], cur, next, cds_spans, options) {
            debug!(gene = %cur.identity, from = cur.max, to = next.min, "merge blocked");
            stats.num_blocked_merges += 1;
            i += 1;
            continue;
        }

        let mode = if options.circular {
            FragmentMode::Collect
        } else {
            FragmentMode::Merge {
                join: needs_join(&candidates[..], cur, next),
            }
        };
        let donor = candidates.remove(i + 1);
        merge_candidates(&mut candidates[i], &donor, mode, diagnostics);
        stats.num_pairwise_merges += 1;
    }
}

fn is_blocked(
    candidates: &[GeneCandidate],
    cur: &GeneCandidate,
    next: &GeneCandidate,
    cds_spans: &[CdsSpan],
    options: &ConsolidationOptions,
) -> bool {
    if !cur.ends_before(next) {
        return false;
    }
    let gene_between = candidates
        .iter()
        .any(|other| is_unrelated(other, cur) && other.min > cur.max && other.max < next.min);
    if gene_between {
        return true;
    }
    options.cds_blocking
        && cds_spans.iter().any(|span| {
            span.segment == cur.segment
                && span.strand == cur.strand
                && span.min > cur.max
                && span.max < next.min
                && !span
                    .identity
                    .as_ref()
                    .is_some_and(|identity| identity.same_gene(&cur.identity))
        })
}

/// An unrelated gene overlapping the combined range forces adjacent
/// fragments to be joined.
fn needs_join(candidates: &[GeneCandidate], cur: &GeneCandidate, next: &GeneCandidate) -> bool {
    let min = cur.min.min(next.min);
    let max = cur.max.max(next.max);
    candidates
        .iter()
        .any(|other| is_unrelated(other, cur) && other.overlaps_range(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generef::identity::sort_candidates;
    use crate::generef::types::test_support::candidate;
    use crate::strand::Strand;

    fn sweep(
        mut candidates: Vec<GeneCandidate>,
        options: ConsolidationOptions,
    ) -> Vec<GeneCandidate> {
        sweep_with_cds(&mut candidates, &[], options);
        candidates
    }

    fn sweep_with_cds(
        candidates: &mut Vec<GeneCandidate>,
        cds_spans: &[CdsSpan],
        options: ConsolidationOptions,
    ) -> ConsolidationStats {
        let mut stats = ConsolidationStats::default();
        let mut diagnostics = Diagnostics::new();
        sort_candidates(candidates);
        pairwise_sweep(candidates, cds_spans, &options, &mut stats, &mut diagnostics);
        stats
    }

    fn ranges(candidates: &[GeneCandidate]) -> Vec<(String, u32, u32)> {
        candidates
            .iter()
            .map(|c| (c.identity.to_string(), c.min, c.max))
            .collect()
    }

    #[test]
    fn same_gene_merged() {
        let merged = sweep(
            vec![
                candidate("g", 1, Strand::Forward, 10, 20),
                candidate("g", 1, Strand::Forward, 40, 50),
            ],
            ConsolidationOptions::default(),
        );
        assert_eq!(ranges(&merged), vec![("g".to_string(), 10, 50)]);
        assert_eq!(merged[0].fragments.len(), 2);
    }

    #[test]
    fn gene_in_between_blocks() {
        let candidates = vec![
            candidate("g", 1, Strand::Forward, 10, 20),
            candidate("g", 1, Strand::Forward, 40, 50),
            candidate("h", 1, Strand::Forward, 25, 30),
        ];
        let merged = sweep(candidates.clone(), ConsolidationOptions::default());
        assert_eq!(merged.len(), 3);

        let simple = ConsolidationOptions {
            simple_merge: true,
            ..Default::default()
        };
        assert_eq!(sweep(candidates, simple).len(), 2);
    }

    #[test]
    fn other_strand_does_not_block() {
        let merged = sweep(
            vec![
                candidate("g", 1, Strand::Forward, 10, 20),
                candidate("g", 1, Strand::Forward, 40, 50),
                candidate("h", 1, Strand::Reverse, 25, 30),
            ],
            ConsolidationOptions::default(),
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn cds_in_between_blocks_only_when_enabled() {
        let spans = vec![CdsSpan {
            segment: 1,
            strand: Strand::Forward,
            min: 25,
            max: 30,
            identity: None,
        }];
        let pair = || {
            vec![
                candidate("g", 1, Strand::Forward, 10, 20),
                candidate("g", 1, Strand::Forward, 40, 50),
            ]
        };

        let mut candidates = pair();
        sweep_with_cds(&mut candidates, &spans, ConsolidationOptions::default());
        assert_eq!(candidates.len(), 1);

        let mut candidates = pair();
        let options = ConsolidationOptions {
            cds_blocking: true,
            ..Default::default()
        };
        let stats = sweep_with_cds(&mut candidates, &spans, options);
        assert_eq!(candidates.len(), 2);
        assert_eq!(stats.num_blocked_merges, 1);
    }

    #[test]
    fn own_cds_does_not_block() {
        let mut candidates = vec![
            candidate("g", 1, Strand::Forward, 10, 20),
            candidate("g", 1, Strand::Forward, 40, 50),
        ];
        let spans = vec![CdsSpan {
            segment: 1,
            strand: Strand::Forward,
            min: 25,
            max: 30,
            identity: Some(candidates[0].identity.clone()),
        }];
        let options = ConsolidationOptions {
            cds_blocking: true,
            ..Default::default()
        };
        sweep_with_cds(&mut candidates, &spans, options);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn leave_candidates_never_merge() {
        let mut trna = candidate("t", 1, Strand::Forward, 10, 20);
        trna.leave = true;
        let merged = sweep(vec![trna.clone(), trna], ConsolidationOptions::default());
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn overlapping_unrelated_gene_joins_adjacent() {
        let merged = sweep(
            vec![
                candidate("g", 1, Strand::Forward, 10, 20),
                candidate("g", 1, Strand::Forward, 21, 30),
                candidate("h", 1, Strand::Forward, 15, 25),
            ],
            ConsolidationOptions::default(),
        );
        let g = merged.iter().find(|c| c.identity.to_string() == "g").unwrap();
        assert_eq!(g.fragments.len(), 1);
        assert_eq!((g.fragments[0].min, g.fragments[0].max), (10, 30));
    }

    #[test]
    fn circular_collects() {
        let options = ConsolidationOptions {
            circular: true,
            ..Default::default()
        };
        let merged = sweep(
            vec![
                candidate("g", 1, Strand::Forward, 0, 10),
                candidate("g", 1, Strand::Forward, 5, 100),
            ],
            options,
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].fragments.len(), 2);
    }

    #[test]
    fn chain_of_three_merges() {
        let merged = sweep(
            vec![
                candidate("g", 1, Strand::Forward, 60, 70),
                candidate("g", 1, Strand::Forward, 10, 20),
                candidate("g", 1, Strand::Forward, 15, 40),
            ],
            ConsolidationOptions::default(),
        );
        assert_eq!(ranges(&merged), vec![("g".to_string(), 10, 70)]);
        assert_eq!(merged[0].fragments.len(), 2);
    }
}
