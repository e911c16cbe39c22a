//! Raw features and qualifiers supplied by the flat-file block parser.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::feature_kind::FeatureKind;
use crate::location::Location;

/// Qualifier keys the consolidation engine reads or writes.
pub mod keys {
    pub const GENE: &str = "gene";
    pub const LOCUS_TAG: &str = "locus_tag";
    pub const GENE_SYNONYM: &str = "gene_synonym";
    pub const OLD_LOCUS_TAG: &str = "old_locus_tag";
    pub const DB_XREF: &str = "db_xref";
    pub const MAP: &str = "map";
    pub const PSEUDOGENE: &str = "pseudogene";
}

/// Prefix of `db_xref` values that carry an external gene id.
pub const GENE_ID_XREF_PREFIX: &str = "WormBase:WBGene";

/// A `/key=value` qualifier. Valueless qualifiers (e.g. `/pseudo`) have no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualifier {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Qualifier {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// An external gene id carried as `/db_xref`.
    #[must_use]
    pub fn is_gene_id_xref(&self) -> bool {
        self.key == keys::DB_XREF
            && self
                .value
                .as_deref()
                .is_some_and(|v| v.starts_with(GENE_ID_XREF_PREFIX))
    }
}

/// A gene identity descriptor, used for explicit gene cross-references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locus_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
}

/// One feature of the feature table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFeature {
    pub kind: FeatureKind,
    #[serde(default)]
    pub qualifiers: Vec<Qualifier>,
    pub location: Location,
    #[serde(default)]
    pub pseudo: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub xrefs: Vec<GeneRef>,
}

impl RawFeature {
    pub fn new(kind: FeatureKind, location: Location) -> Self {
        Self {
            kind,
            qualifiers: Vec::new(),
            location,
            pseudo: false,
            xrefs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_qualifier(mut self, key: &str, value: &str) -> Self {
        self.qualifiers.push(Qualifier::new(key, value));
        self
    }

    /// First non-empty value of `key`.
    #[must_use]
    pub fn qualifier(&self, key: &str) -> Option<&str> {
        self.qualifier_values(key).find(|v| !v.is_empty())
    }

    /// All values of `key`, in qualifier order. Valueless occurrences are skipped.
    pub fn qualifier_values<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> {
        self.qualifiers
            .iter()
            .filter(move |q| q.key == key)
            .filter_map(|q| q.value.as_deref())
    }

    #[must_use]
    pub fn has_qualifier(&self, key: &str) -> bool {
        self.qualifiers.iter().any(|q| q.key == key)
    }

    /// Remove and return every qualifier matching `pred`, keeping the order of the rest.
    pub fn take_qualifiers(&mut self, mut pred: impl FnMut(&Qualifier) -> bool) -> Vec<Qualifier> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.qualifiers.len());
        for qualifier in self.qualifiers.drain(..) {
            if pred(&qualifier) {
                taken.push(qualifier);
            } else {
                kept.push(qualifier);
            }
        }
        self.qualifiers = kept;
        taken
    }

    /// Drop the `gene`, `locus_tag` and `gene_synonym` qualifiers.
    pub fn remove_gene_qualifiers(&mut self) {
        self.qualifiers.retain(|q| {
            q.key != keys::GENE && q.key != keys::LOCUS_TAG && q.key != keys::GENE_SYNONYM
        });
    }

    /// Gene descriptor from this feature's own qualifiers, if it names a gene.
    #[must_use]
    pub fn gene_ref(&self) -> Option<GeneRef> {
        let locus = self.qualifier(keys::GENE).map(str::to_string);
        let locus_tag = self.qualifier(keys::LOCUS_TAG).map(str::to_string);
        if locus.is_none() && locus_tag.is_none() {
            return None;
        }
        let mut synonyms: Vec<String> = Vec::new();
        for synonym in self.qualifier_values(keys::GENE_SYNONYM) {
            if !synonym.is_empty() && !synonyms.iter().any(|s| s == synonym) {
                synonyms.push(synonym.to_string());
            }
        }
        Some(GeneRef {
            locus,
            locus_tag,
            synonyms,
        })
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.location
            .validate()
            .map_err(|e| Error::Validation(format!("{} feature: {e}", self.kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{Interval, SeqRef};
    use crate::strand::Strand;

    fn cds() -> RawFeature {
        RawFeature::new(
            FeatureKind::Cds,
            Location::single(Interval::new(
                SeqRef::new("AB000001", Some(1)),
                Strand::Forward,
                10,
                90,
            )),
        )
    }

    #[test]
    fn gene_ref_from_qualifiers() {
        let feature = cds()
            .with_qualifier(keys::GENE, "dnaA")
            .with_qualifier(keys::GENE_SYNONYM, "dnaH")
            .with_qualifier(keys::GENE_SYNONYM, "dnaH")
            .with_qualifier(keys::GENE_SYNONYM, "DNAH");
        let gene_ref = feature.gene_ref().unwrap();
        assert_eq!(gene_ref.locus.as_deref(), Some("dnaA"));
        assert_eq!(gene_ref.locus_tag, None);
        assert_eq!(gene_ref.synonyms, vec!["dnaH", "DNAH"]);
    }

    #[test]
    fn synonyms_alone_are_not_a_gene() {
        let feature = cds().with_qualifier(keys::GENE_SYNONYM, "x");
        assert!(feature.gene_ref().is_none());
    }

    #[test]
    fn empty_values_are_ignored() {
        let feature = cds()
            .with_qualifier(keys::GENE, "")
            .with_qualifier(keys::GENE, "abc");
        assert_eq!(feature.qualifier(keys::GENE), Some("abc"));
    }

    #[test]
    fn qualifier_value_outlives_the_key() {
        let feature = cds().with_qualifier("note", "kept");
        let value = {
            let key = String::from("note");
            feature.qualifier(&key)
        };
        assert_eq!(value, Some("kept"));
    }

    #[test]
    fn take_qualifiers_keeps_order() {
        let mut feature = cds()
            .with_qualifier("note", "a")
            .with_qualifier(keys::DB_XREF, "WormBase:WBGene00000001")
            .with_qualifier(keys::DB_XREF, "GeneID:123")
            .with_qualifier("note", "b");
        let taken = feature.take_qualifiers(Qualifier::is_gene_id_xref);
        assert_eq!(taken.len(), 1);
        let keys: Vec<&str> = feature.qualifiers.iter().map(|q| q.key.as_str()).collect();
        assert_eq!(keys, vec!["note", "db_xref", "note"]);
    }

    #[test]
    fn remove_gene_qualifiers() {
        let mut feature = cds()
            .with_qualifier(keys::GENE, "a")
            .with_qualifier(keys::LOCUS_TAG, "b")
            .with_qualifier(keys::GENE_SYNONYM, "c")
            .with_qualifier("product", "d");
        feature.remove_gene_qualifiers();
        assert_eq!(feature.qualifiers.len(), 1);
        assert_eq!(feature.qualifiers[0].key, "product");
    }
}
