//! Location fragment algebra: per-sequence sub-ranges of a gene and the
//! operations that fuse, concatenate and reorder them.

use crate::location::{GeneLocation, Interval, SeqRef};
use crate::strand::Strand;

/// Position of a fragment in the location it came from: `group` identifies
/// the source feature, `index` is 1-based within it. Only used to reorder
/// fragments of circular molecules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ordinal {
    pub group: u32,
    pub index: u32,
}

impl Ordinal {
    /// Tag of the fragment a confirmed circular location starts with.
    pub const START: Ordinal = Ordinal { group: 0, index: 1 };
}

/// One contiguous sub-range on one named sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFragment {
    pub seq: SeqRef,
    pub strand: Strand,
    pub min: u32,
    pub max: u32,
    pub open_left: bool,
    pub open_right: bool,
    pub ordinal: Ordinal,
}

impl LocationFragment {
    pub fn from_interval(interval: &Interval, ordinal: Ordinal) -> Self {
        Self {
            seq: interval.seq.clone(),
            strand: interval.strand,
            min: interval.from,
            max: interval.to,
            open_left: interval.open_left,
            open_right: interval.open_right,
            ordinal,
        }
    }

    #[must_use]
    pub fn to_interval(&self) -> Interval {
        Interval {
            seq: self.seq.clone(),
            strand: self.strand,
            from: self.min,
            to: self.max,
            open_left: self.open_left,
            open_right: self.open_right,
        }
    }

    /// Same accession, version and strand.
    #[must_use]
    pub fn same_key(&self, other: &LocationFragment) -> bool {
        self.strand == other.strand && self.seq.same_sequence(&other.seq)
    }

    #[must_use]
    pub fn contains(&self, other: &LocationFragment) -> bool {
        self.same_key(other) && self.min <= other.min && other.max <= self.max
    }

    /// Overlapping or sharing an end point; with `slack` 1, also adjacent.
    fn touches(&self, other: &LocationFragment, slack: u32) -> bool {
        self.same_key(other)
            && self.min <= other.max.saturating_add(slack)
            && other.min <= self.max.saturating_add(slack)
    }

    /// Widen to cover `other`. The start tag of a circular location survives.
    pub fn absorb(&mut self, other: &LocationFragment) {
        (self.min, self.open_left) =
            extend_left(self.min, self.open_left, other.min, other.open_left);
        (self.max, self.open_right) =
            extend_right(self.max, self.open_right, other.max, other.open_right);
        if other.ordinal == Ordinal::START {
            self.ordinal = Ordinal::START;
        }
    }

    fn open_flag_count(&self) -> u8 {
        u8::from(self.open_left) + u8::from(self.open_right)
    }
}

/// Lower bound after fusing two ranges. The open flag follows the bound that
/// wins; when both bounds are equal it is open if either side was.
#[must_use]
pub fn extend_left(min: u32, open: bool, other_min: u32, other_open: bool) -> (u32, bool) {
    match min.cmp(&other_min) {
        std::cmp::Ordering::Less => (min, open),
        std::cmp::Ordering::Greater => (other_min, other_open),
        std::cmp::Ordering::Equal => (min, open || other_open),
    }
}

/// Upper bound counterpart of [`extend_left`].
#[must_use]
pub fn extend_right(max: u32, open: bool, other_max: u32, other_open: bool) -> (u32, bool) {
    match max.cmp(&other_max) {
        std::cmp::Ordering::Greater => (max, open),
        std::cmp::Ordering::Less => (other_max, other_open),
        std::cmp::Ordering::Equal => (max, open || other_open),
    }
}

/// Union of two fragment lists. Fragments on the same sequence and strand
/// are fused while they overlap or touch (`join` also fuses adjacent ones),
/// until no further fusion is possible.
#[must_use]
pub fn merge(a: &[LocationFragment], b: &[LocationFragment], join: bool) -> Vec<LocationFragment> {
    let slack = u32::from(join);
    let mut fragments: Vec<LocationFragment> = a.iter().chain(b).cloned().collect();
    while let Some((keep, absorbed)) = find_fusible(&fragments, slack) {
        let absorbed = fragments.remove(absorbed);
        fragments[keep].absorb(&absorbed);
    }
    fragments
}

fn find_fusible(fragments: &[LocationFragment], slack: u32) -> Option<(usize, usize)> {
    for (i, a) in fragments.iter().enumerate() {
        for (j, b) in fragments.iter().enumerate().skip(i + 1) {
            if a.touches(b, slack) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Plain concatenation, used on circular molecules where wraparound makes
/// overlap meaningless until the circular pass has run.
#[must_use]
pub fn collect(a: &[LocationFragment], b: &[LocationFragment]) -> Vec<LocationFragment> {
    a.iter().chain(b).cloned().collect()
}

/// True when `b` should be placed before `a`: `b` references more sequences
/// that `a` does not than the other way round.
#[must_use]
pub fn merge_order(a: &[LocationFragment], b: &[LocationFragment]) -> bool {
    let only_a = count_exclusive_sequences(a, b);
    let only_b = count_exclusive_sequences(b, a);
    only_b > only_a
}

fn count_exclusive_sequences(side: &[LocationFragment], other: &[LocationFragment]) -> usize {
    let mut seen: Vec<&SeqRef> = Vec::new();
    for fragment in side {
        let shared = other.iter().any(|o| o.seq.same_sequence(&fragment.seq));
        if !shared && !seen.iter().any(|s| s.same_sequence(&fragment.seq)) {
            seen.push(&fragment.seq);
        }
    }
    seen.len()
}

/// True when every fragment of `inner` lies within a fragment of `outer`.
#[must_use]
pub fn location_contains(outer: &[LocationFragment], inner: &[LocationFragment]) -> bool {
    !inner.is_empty() && inner.iter().all(|f| outer.iter().any(|o| o.contains(f)))
}

/// Check that the fragments describe one walk around a circular molecule.
///
/// Within each source group, consecutive fragments on the same sequence and
/// strand must move in strand direction (`min` increasing on the forward
/// strand, decreasing on the reverse strand). One step backwards is the wrap
/// point; more than one in a group means the list is not circular-consistent.
/// At least one group must actually wrap.
///
/// On success the ordinals are reset: every fragment moves to group 0 and only
/// the first fragment of the first wrapping group keeps index 1.
pub fn confirm_circular(fragments: &mut [LocationFragment]) -> bool {
    let mut groups: Vec<u32> = Vec::new();
    for fragment in fragments.iter() {
        if !groups.contains(&fragment.ordinal.group) {
            groups.push(fragment.ordinal.group);
        }
    }

    let mut wrap_group: Option<u32> = None;
    for &group in &groups {
        let members: Vec<&LocationFragment> = fragments
            .iter()
            .filter(|f| f.ordinal.group == group)
            .collect();
        let breaks = members
            .windows(2)
            .filter(|pair| pair[0].same_key(pair[1]) && steps_back(pair[0], pair[1]))
            .count();
        match breaks {
            0 => {}
            1 => {
                wrap_group.get_or_insert(group);
            }
            _ => return false,
        }
    }

    let Some(wrap_group) = wrap_group else {
        return false;
    };
    let start = fragments
        .iter()
        .position(|f| f.ordinal.group == wrap_group)
        .unwrap_or(0);
    for (i, fragment) in fragments.iter_mut().enumerate() {
        fragment.ordinal = if i == start {
            Ordinal::START
        } else {
            Ordinal::default()
        };
    }
    true
}

fn steps_back(prev: &LocationFragment, next: &LocationFragment) -> bool {
    if prev.strand.is_reverse() {
        next.min > prev.min
    } else {
        next.min < prev.min
    }
}

/// Canonical order for a confirmed circular location: drop duplicate ranges
/// (keeping the more specific open-endedness), fuse overlaps, order along the
/// strand and rotate so the start fragment comes first.
#[must_use]
pub fn circular_format(fragments: Vec<LocationFragment>) -> Vec<LocationFragment> {
    let mut unique: Vec<LocationFragment> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        match unique
            .iter_mut()
            .find(|u| u.same_key(&fragment) && u.min == fragment.min && u.max == fragment.max)
        {
            Some(existing) => {
                if fragment.open_flag_count() > existing.open_flag_count() {
                    existing.open_left = fragment.open_left;
                    existing.open_right = fragment.open_right;
                }
                if fragment.ordinal == Ordinal::START {
                    existing.ordinal = Ordinal::START;
                }
            }
            None => unique.push(fragment),
        }
    }

    let mut fused = merge(&unique, &[], false);
    fused.sort_by(strand_order);
    if let Some(start) = fused.iter().position(|f| f.ordinal == Ordinal::START) {
        fused.rotate_left(start);
    }
    for (i, fragment) in fused.iter_mut().enumerate() {
        fragment.ordinal = Ordinal {
            group: 0,
            index: i as u32 + 1,
        };
    }
    fused
}

/// Total order for circular formatting: sequence and strand first, then
/// position along the strand.
fn strand_order(a: &LocationFragment, b: &LocationFragment) -> std::cmp::Ordering {
    (&a.seq.accession, a.seq.version, a.strand)
        .cmp(&(&b.seq.accession, b.seq.version, b.strand))
        .then_with(|| {
            if a.strand.is_reverse() {
                b.min.cmp(&a.min)
            } else {
                a.min.cmp(&b.min)
            }
        })
}

/// Final gene location: a point or range for a single fragment, otherwise an
/// ordered composite in fragment order.
#[must_use]
pub fn to_gene_location(fragments: &[LocationFragment]) -> Option<GeneLocation> {
    match fragments {
        [] => None,
        [single] if single.min == single.max => Some(GeneLocation::Point(single.to_interval())),
        [single] => Some(GeneLocation::Range(single.to_interval())),
        many => Some(GeneLocation::Mix(
            many.iter().map(LocationFragment::to_interval).collect(),
        )),
    }
}

/// One fragment per interval of a synthesized gene location.
#[must_use]
pub fn from_gene_location(location: &GeneLocation) -> Vec<LocationFragment> {
    location
        .intervals()
        .iter()
        .enumerate()
        .map(|(i, interval)| {
            LocationFragment::from_interval(
                interval,
                Ordinal {
                    group: 0,
                    index: i as u32 + 1,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(acc: &str, strand: Strand, min: u32, max: u32) -> LocationFragment {
        LocationFragment {
            seq: SeqRef::new(acc, Some(1)),
            strand,
            min,
            max,
            open_left: false,
            open_right: false,
            ordinal: Ordinal::default(),
        }
    }

    fn fwd(min: u32, max: u32) -> LocationFragment {
        frag("AB000001", Strand::Forward, min, max)
    }

    fn tagged(mut f: LocationFragment, group: u32, index: u32) -> LocationFragment {
        f.ordinal = Ordinal { group, index };
        f
    }

    fn ranges(fragments: &[LocationFragment]) -> Vec<(u32, u32)> {
        fragments.iter().map(|f| (f.min, f.max)).collect()
    }

    #[test]
    fn merge_fuses_overlapping() {
        let merged = merge(&[fwd(10, 20)], &[fwd(15, 30)], false);
        assert_eq!(ranges(&merged), vec![(10, 30)]);
    }

    #[test]
    fn merge_fuses_shared_end_point() {
        let merged = merge(&[fwd(10, 20)], &[fwd(20, 30)], false);
        assert_eq!(ranges(&merged), vec![(10, 30)]);
    }

    #[test]
    fn adjacent_fused_only_with_join() {
        assert_eq!(merge(&[fwd(10, 20)], &[fwd(21, 30)], false).len(), 2);
        assert_eq!(ranges(&merge(&[fwd(10, 20)], &[fwd(21, 30)], true)), vec![(10, 30)]);
        assert_eq!(merge(&[fwd(10, 20)], &[fwd(22, 30)], true).len(), 2);
    }

    #[test]
    fn merge_keeps_other_sequences_and_strands_apart() {
        let merged = merge(
            &[fwd(10, 20)],
            &[
                frag("AB000002", Strand::Forward, 10, 20),
                frag("AB000001", Strand::Reverse, 10, 20),
            ],
            true,
        );
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn merge_reaches_fixed_point() {
        // 40..50 only becomes fusible after 10..30 and 25..45 are fused.
        let merged = merge(&[fwd(10, 30), fwd(40, 50)], &[fwd(25, 45)], false);
        assert_eq!(ranges(&merged), vec![(10, 50)]);
    }

    #[test]
    fn absorbed_fragment_dropped() {
        let merged = merge(&[fwd(10, 50)], &[fwd(20, 30)], false);
        assert_eq!(ranges(&merged), vec![(10, 50)]);
    }

    #[test]
    fn open_flags_follow_the_bound() {
        let mut a = fwd(10, 20);
        a.open_left = true;
        let mut b = fwd(5, 30);
        b.open_right = true;
        let merged = merge(&[a.clone()], &[b], false);
        // a's left bound moved, so its open flag is lost; b's right bound won.
        assert!(!merged[0].open_left);
        assert!(merged[0].open_right);

        let merged = merge(&[a], &[fwd(10, 15)], false);
        assert!(merged[0].open_left, "bound unchanged keeps the open flag");
    }

    #[test]
    fn collect_concatenates() {
        let collected = collect(&[fwd(90, 100)], &[fwd(90, 100), fwd(0, 10)]);
        assert_eq!(collected.len(), 3);
    }

    #[test]
    fn merge_order_prefers_more_foreign_sequences() {
        let local = vec![fwd(10, 20)];
        let mixed = vec![fwd(10, 20), frag("AB000002", Strand::Forward, 1, 5)];
        assert!(merge_order(&local, &mixed));
        assert!(!merge_order(&mixed, &local));
        assert!(!merge_order(&local, &local));
    }

    #[test]
    fn containment() {
        assert!(location_contains(&[fwd(10, 50)], &[fwd(10, 50)]));
        assert!(location_contains(&[fwd(10, 50)], &[fwd(20, 30)]));
        assert!(!location_contains(&[fwd(10, 50)], &[fwd(20, 60)]));
        assert!(!location_contains(
            &[fwd(10, 50)],
            &[frag("AB000001", Strand::Reverse, 20, 30)]
        ));
        assert!(!location_contains(&[fwd(10, 50)], &[]));
    }

    #[test]
    fn circular_wrap_confirmed_and_ordered() {
        let mut fragments = vec![tagged(fwd(90, 100), 7, 1), tagged(fwd(0, 10), 7, 2)];
        assert!(confirm_circular(&mut fragments));
        let formatted = circular_format(fragments);
        assert_eq!(ranges(&formatted), vec![(90, 100), (0, 10)]);
        assert_eq!(formatted[0].ordinal, Ordinal::START);
        assert_eq!(formatted[1].ordinal.index, 2);
    }

    #[test]
    fn circular_duplicates_from_several_features() {
        // A CDS that does not wrap plus a gene that does.
        let mut fragments = vec![
            tagged(fwd(0, 10), 1, 1),
            tagged(fwd(90, 100), 2, 1),
            tagged(fwd(0, 10), 2, 2),
        ];
        fragments[0].open_right = true;
        assert!(confirm_circular(&mut fragments));
        let formatted = circular_format(fragments);
        assert_eq!(ranges(&formatted), vec![(90, 100), (0, 10)]);
        assert!(formatted[1].open_right, "more specific open-endedness kept");
    }

    #[test]
    fn circular_reverse_strand() {
        let rev = |min, max| frag("AB000001", Strand::Reverse, min, max);
        // Biological order on the reverse strand runs downwards; 0..10 comes
        // first, then the walk wraps to 90..100.
        let mut fragments = vec![tagged(rev(0, 10), 3, 1), tagged(rev(90, 100), 3, 2)];
        assert!(confirm_circular(&mut fragments));
        let formatted = circular_format(fragments);
        assert_eq!(ranges(&formatted), vec![(0, 10), (90, 100)]);
    }

    #[test]
    fn circular_format_ignores_input_order_across_strands() {
        let rev = |min, max| frag("AB000001", Strand::Reverse, min, max);
        let mut start = fwd(90, 100);
        start.ordinal = Ordinal::START;
        let one = vec![start.clone(), fwd(0, 10), rev(50, 60), rev(30, 40)];
        let two = vec![rev(30, 40), fwd(0, 10), rev(50, 60), start];
        let expected = vec![(90, 100), (50, 60), (30, 40), (0, 10)];
        assert_eq!(ranges(&circular_format(one)), expected);
        assert_eq!(ranges(&circular_format(two)), expected);
    }

    #[test]
    fn circular_rejects_double_break() {
        let mut fragments = vec![
            tagged(fwd(50, 60), 1, 1),
            tagged(fwd(10, 20), 1, 2),
            tagged(fwd(30, 40), 1, 3),
            tagged(fwd(0, 5), 1, 4),
        ];
        assert!(!confirm_circular(&mut fragments));
    }

    #[test]
    fn circular_requires_a_wrap() {
        let mut fragments = vec![tagged(fwd(10, 20), 1, 1), tagged(fwd(30, 40), 1, 2)];
        assert!(!confirm_circular(&mut fragments));
        assert_eq!(fragments[1].ordinal.index, 2, "ordinals untouched when not confirmed");
    }

    #[test]
    fn gene_location_shapes() {
        assert!(to_gene_location(&[]).is_none());
        assert!(matches!(to_gene_location(&[fwd(5, 5)]), Some(GeneLocation::Point(_))));
        assert!(matches!(to_gene_location(&[fwd(5, 9)]), Some(GeneLocation::Range(_))));
        let mix = to_gene_location(&[fwd(90, 100), fwd(0, 0)]).unwrap();
        assert_eq!(mix.intervals().len(), 2);
        assert_eq!(ranges(&from_gene_location(&mix)), vec![(90, 100), (0, 0)]);
    }
}
