//! Cross-reference linker: resolves the gene qualifiers left on non-gene
//! features against the synthesized genes.

use tracing::debug;

use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::feature::RawFeature;
use crate::location::LocationPart;
use crate::record::InputRecord;

use super::fragment::{LocationFragment, Ordinal, from_gene_location, location_contains};
use super::types::GeneRecord;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkCounts {
    pub xrefs_added: u32,
    pub redundant: u32,
}

fn feature_fragments(feature: &RawFeature) -> Vec<LocationFragment> {
    feature
        .location
        .parts()
        .iter()
        .filter_map(|part| match part {
            LocationPart::Interval(interval) => {
                Some(LocationFragment::from_interval(interval, Ordinal::default()))
            }
            LocationPart::Whole(_) => None,
        })
        .collect()
}

/// For every non-gene feature still naming a gene: drop the qualifiers when
/// its location places it inside exactly that gene and no other, otherwise
/// keep the stated gene as an explicit cross-reference when it lies inside
/// some gene. The `gene`, `locus_tag` and `gene_synonym` qualifiers are
/// removed in every case.
pub fn link_features(
    segments: &mut [InputRecord],
    genes: &[GeneRecord],
    diagnostics: &mut Diagnostics,
) -> LinkCounts {
    let gene_fragments: Vec<Vec<LocationFragment>> = genes
        .iter()
        .map(|g| from_gene_location(&g.location))
        .collect();
    let mut counts = LinkCounts::default();

    for record in segments.iter_mut() {
        for feature in record.features.iter_mut() {
            if feature.kind.is_gene() || feature.kind.is_no_gene() {
                continue;
            }
            let Some(gene_ref) = feature.gene_ref() else {
                continue;
            };
            let fragments = feature_fragments(feature);
            let matches: Vec<&GeneRecord> = genes
                .iter()
                .zip(&gene_fragments)
                .filter(|(_, outer)| location_contains(outer, &fragments))
                .map(|(gene, _)| gene)
                .collect();

            match matches.as_slice() {
                [] => {}
                [only] if only.identity().matches_ref(&gene_ref) => counts.redundant += 1,
                _ => {
                    let at = fragments
                        .first()
                        .map(|f| f.to_interval().to_string())
                        .unwrap_or_default();
                    let stated = gene_ref
                        .locus
                        .as_deref()
                        .or(gene_ref.locus_tag.as_deref())
                        .unwrap_or("-");
                    diagnostics.info(
                        DiagnosticCode::GeneXrefAdded,
                        format!(
                            "{} feature at {at} lies within {} gene(s); keeping gene xref {stated}",
                            feature.kind,
                            matches.len(),
                        ),
                    );
                    if !feature.xrefs.contains(&gene_ref) {
                        feature.xrefs.push(gene_ref);
                    }
                    counts.xrefs_added += 1;
                }
            }
            feature.remove_gene_qualifiers();
        }
    }

    debug!(
        xrefs = counts.xrefs_added,
        redundant = counts.redundant,
        "linked features to genes"
    );
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::keys;
    use crate::feature_kind::FeatureKind;
    use crate::location::{GeneLocation, Interval, Location, SeqRef};
    use crate::strand::Strand;

    const ACC: &str = "AB000001";

    fn iv(from: u32, to: u32) -> Interval {
        Interval::new(SeqRef::new(ACC, Some(1)), Strand::Forward, from, to)
    }

    fn gene(locus: &str, from: u32, to: u32) -> GeneRecord {
        GeneRecord {
            segment: 1,
            locus: Some(locus.to_string()),
            locus_tag: None,
            synonyms: Vec::new(),
            maploc: None,
            pseudo: false,
            pseudogene: None,
            gene_ids: Vec::new(),
            old_locus_tags: Vec::new(),
            location: GeneLocation::Range(iv(from, to)),
            qualifiers: Vec::new(),
            members: Vec::new(),
        }
    }

    fn segments_with(feature: RawFeature) -> Vec<InputRecord> {
        vec![InputRecord::new(SeqRef::new(ACC, Some(1)), vec![feature])]
    }

    fn cds(name: &str, from: u32, to: u32) -> RawFeature {
        RawFeature::new(FeatureKind::Cds, Location::single(iv(from, to)))
            .with_qualifier(keys::GENE, name)
            .with_qualifier("product", "kinase")
    }

    #[test]
    fn redundant_qualifiers_dropped() {
        let mut segments = segments_with(cds("a", 20, 30));
        let mut diagnostics = Diagnostics::new();
        let counts = link_features(&mut segments, &[gene("a", 10, 50)], &mut diagnostics);
        assert_eq!(counts.redundant, 1);
        let feature = &segments[0].features[0];
        assert!(!feature.has_qualifier(keys::GENE));
        assert!(feature.has_qualifier("product"));
        assert!(feature.xrefs.is_empty());
    }

    #[test]
    fn other_gene_gets_xref() {
        let mut segments = segments_with(cds("b", 20, 30));
        let mut diagnostics = Diagnostics::new();
        let counts = link_features(&mut segments, &[gene("a", 10, 50)], &mut diagnostics);
        assert_eq!(counts.xrefs_added, 1);
        let feature = &segments[0].features[0];
        assert_eq!(feature.xrefs[0].locus.as_deref(), Some("b"));
        assert!(!feature.has_qualifier(keys::GENE));
        assert_eq!(diagnostics.events()[0].code, DiagnosticCode::GeneXrefAdded);
    }

    #[test]
    fn ambiguous_containment_gets_xref() {
        let mut segments = segments_with(cds("a", 20, 30));
        let mut diagnostics = Diagnostics::new();
        let genes = [gene("a", 10, 50), gene("c", 15, 40)];
        let counts = link_features(&mut segments, &genes, &mut diagnostics);
        assert_eq!(counts.xrefs_added, 1);
    }

    #[test]
    fn outside_every_gene_just_stripped() {
        let mut segments = segments_with(cds("a", 200, 300));
        let mut diagnostics = Diagnostics::new();
        let counts = link_features(&mut segments, &[gene("a", 10, 50)], &mut diagnostics);
        assert_eq!(counts, LinkCounts::default());
        let feature = &segments[0].features[0];
        assert!(!feature.has_qualifier(keys::GENE));
        assert!(feature.xrefs.is_empty());
    }

    #[test]
    fn opposite_strand_does_not_match() {
        let mut feature = cds("a", 20, 30);
        feature.location = Location::single(Interval::new(
            SeqRef::new(ACC, Some(1)),
            Strand::Reverse,
            20,
            30,
        ));
        let mut segments = segments_with(feature);
        let mut diagnostics = Diagnostics::new();
        let counts = link_features(&mut segments, &[gene("a", 10, 50)], &mut diagnostics);
        assert_eq!(counts, LinkCounts::default());
    }
}
