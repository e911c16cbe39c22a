//! Flatgene: gene annotation consolidation for GenBank/EMBL/SwissProt/PRF flat-file records.

pub mod error;

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod feature;
pub mod feature_kind;
pub mod generef;
pub mod location;
pub mod record;
pub mod strand;
