//! Logical records: one or more segments plus record-level context.

use std::collections::HashSet;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::feature::RawFeature;
use crate::location::SeqRef;

/// Record-level context that steers consolidation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsolidationOptions {
    /// The molecule is circular (plasmid, organelle, bacterial chromosome).
    pub circular: bool,
    /// Division-specific mode (bacterial/synthetic divisions) in which a
    /// coding region lying between two same-named genes blocks their merge.
    pub cds_blocking: bool,
    /// Disable all blocking rules.
    pub simple_merge: bool,
    /// Downgrade "one gene symbol, several locus tags" from REJECT to WARNING.
    pub allow_differing_locus_tags: bool,
}

/// One physical record (segment) with its own accession and feature table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub id: SeqRef,
    /// Sequence length, needed to expand whole-sequence locations.
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub features: Vec<RawFeature>,
}

impl InputRecord {
    pub fn new(id: SeqRef, features: Vec<RawFeature>) -> Self {
        Self {
            id,
            length: None,
            features,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.id.accession.is_empty() {
            return Err(Error::Validation("record has no accession".to_string()));
        }
        if self.length == Some(0) {
            return Err(Error::Validation(format!(
                "record {} has zero length",
                self.id
            )));
        }
        for (i, feature) in self.features.iter().enumerate() {
            feature.validate().map_err(|e| {
                Error::Validation(format!("record {}, feature {}: {e}", self.id, i + 1))
            })?;
        }
        Ok(())
    }
}

/// A logical record: a single record, or every segment of a segmented set in
/// segment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    pub segments: Vec<InputRecord>,
    /// Overrides configured defaults when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ConsolidationOptions>,
}

impl RecordSet {
    pub fn single(record: InputRecord) -> Self {
        Self {
            segments: vec![record],
            options: None,
        }
    }

    /// Reads a JSON record set and validates it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let set: Self = serde_json::from_reader(reader)?;
        set.validate()?;
        Ok(set)
    }

    #[must_use]
    pub fn is_segmented(&self) -> bool {
        self.segments.len() > 1
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.segments.is_empty() {
            return Err(Error::Validation("record set has no segments".to_string()));
        }
        let mut seen = HashSet::new();
        for segment in &self.segments {
            segment.validate()?;
            if !seen.insert((&segment.id.accession, segment.id.version)) {
                return Err(Error::Validation(format!(
                    "segment {} appears more than once",
                    segment.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_kind::FeatureKind;
    use crate::location::{Interval, Location};
    use crate::strand::Strand;

    fn record(acc: &str) -> InputRecord {
        InputRecord::new(SeqRef::new(acc, Some(1)), Vec::new())
    }

    #[test]
    fn valid_single() {
        let set = RecordSet::single(record("AB000001"));
        assert!(set.validate().is_ok());
        assert!(!set.is_segmented());
    }

    #[test]
    fn empty_set_rejected() {
        let set = RecordSet {
            segments: Vec::new(),
            options: None,
        };
        assert!(set.validate().is_err());
    }

    #[test]
    fn duplicate_segment_rejected() {
        let set = RecordSet {
            segments: vec![record("AB000001"), record("AB000001")],
            options: None,
        };
        let err = set.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn bad_feature_location_reported_with_context() {
        let mut rec = record("AB000001");
        rec.features.push(RawFeature::new(
            FeatureKind::Cds,
            Location::single(Interval::new(rec.id.clone(), Strand::Forward, 50, 10)),
        ));
        let err = rec.validate().unwrap_err().to_string();
        assert!(err.contains("feature 1"), "{err}");
        assert!(err.contains("CDS"), "{err}");
    }

    #[test]
    fn reads_json_record_set() {
        let json = r#"{
            "segments": [{
                "id": { "accession": "AB000001", "version": 1 },
                "features": []
            }],
            "options": { "circular": true }
        }"#;
        let set = RecordSet::from_reader(json.as_bytes()).unwrap();
        assert_eq!(set.segments[0].id.accession, "AB000001");
        assert!(set.options.unwrap().circular);

        let err = RecordSet::from_reader(r#"{"segments": []}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        let err = RecordSet::from_reader("{".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn options_default_from_empty_json() {
        let options: ConsolidationOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ConsolidationOptions::default());
        let options: ConsolidationOptions =
            serde_json::from_str(r#"{"circular": true, "allowDifferingLocusTags": true}"#).unwrap();
        assert!(options.circular);
        assert!(options.allow_differing_locus_tags);
        assert!(!options.simple_merge);
    }
}
