//! FeatureKind enum covering the INSDC feature table keys seen in GenBank, EMBL,
//! SwissProt-derived and PRF flat files, including legacy keys.

use std::fmt;

use crate::error::Error;

/// Category that determines how a feature takes part in gene consolidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureCategory {
    /// Explicit `gene` feature.
    Gene,
    /// Protein coding region.
    CodingRegion,
    /// RNA product features.
    Rna,
    /// Repeat and mobile element features.
    Repeat,
    /// Signals, binding sites and other structural annotation.
    Structural,
    /// Never associated with a gene (`source`, gaps, operons).
    NoGene,
    /// Everything else.
    Other,
}

/// All recognized feature table keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FeatureKind {
    Allele,
    AssemblyGap,
    Attenuator,
    CaatSignal,
    Cds,
    CRegion,
    Centromere,
    Conflict,
    DLoop,
    DSegment,
    Enhancer,
    Exon,
    FivePrimeClip,
    FivePrimeUtr,
    Gap,
    GcSignal,
    Gene,
    IDna,
    Intron,
    JSegment,
    Ltr,
    MatPeptide,
    MinusTenSignal,
    MinusThirtyFiveSignal,
    MiscBinding,
    MiscDifference,
    MiscFeature,
    MiscRecomb,
    MiscRna,
    MiscSignal,
    MiscStructure,
    MobileElement,
    ModifiedBase,
    MRna,
    Mutation,
    NcRna,
    NRegion,
    OldSequence,
    Operon,
    OriT,
    PolyASignal,
    PolyASite,
    PrecursorRna,
    PrimTranscript,
    PrimerBind,
    Promoter,
    Propeptide,
    ProteinBind,
    Rbs,
    Regulatory,
    RepOrigin,
    RepeatRegion,
    RepeatUnit,
    RRna,
    Satellite,
    ScRna,
    SigPeptide,
    SnRna,
    SnoRna,
    Source,
    SRegion,
    StemLoop,
    Sts,
    TataSignal,
    Telomere,
    Terminator,
    ThreePrimeClip,
    ThreePrimeUtr,
    TmRna,
    TransitPeptide,
    TRna,
    Unsure,
    VRegion,
    VSegment,
    Variation,
}

impl FeatureKind {
    #[must_use]
    pub fn category(self) -> FeatureCategory {
        match self {
            Self::Gene => FeatureCategory::Gene,

            Self::Cds => FeatureCategory::CodingRegion,

            Self::MiscRna
            | Self::MRna
            | Self::NcRna
            | Self::PrecursorRna
            | Self::PrimTranscript
            | Self::RRna
            | Self::ScRna
            | Self::SnRna
            | Self::SnoRna
            | Self::TmRna
            | Self::TRna => FeatureCategory::Rna,

            Self::Ltr
            | Self::MobileElement
            | Self::RepeatRegion
            | Self::RepeatUnit
            | Self::Satellite => FeatureCategory::Repeat,

            Self::Attenuator
            | Self::CaatSignal
            | Self::Enhancer
            | Self::GcSignal
            | Self::MinusTenSignal
            | Self::MinusThirtyFiveSignal
            | Self::MiscBinding
            | Self::MiscSignal
            | Self::MiscStructure
            | Self::OriT
            | Self::PolyASignal
            | Self::PolyASite
            | Self::PrimerBind
            | Self::Promoter
            | Self::ProteinBind
            | Self::Rbs
            | Self::Regulatory
            | Self::RepOrigin
            | Self::StemLoop
            | Self::TataSignal
            | Self::Terminator => FeatureCategory::Structural,

            Self::AssemblyGap | Self::Gap | Self::Operon | Self::Source => FeatureCategory::NoGene,

            Self::Allele
            | Self::CRegion
            | Self::Centromere
            | Self::Conflict
            | Self::DLoop
            | Self::DSegment
            | Self::Exon
            | Self::FivePrimeClip
            | Self::FivePrimeUtr
            | Self::IDna
            | Self::Intron
            | Self::JSegment
            | Self::MatPeptide
            | Self::MiscDifference
            | Self::MiscFeature
            | Self::MiscRecomb
            | Self::ModifiedBase
            | Self::Mutation
            | Self::NRegion
            | Self::OldSequence
            | Self::Propeptide
            | Self::SigPeptide
            | Self::SRegion
            | Self::Sts
            | Self::Telomere
            | Self::ThreePrimeClip
            | Self::ThreePrimeUtr
            | Self::TransitPeptide
            | Self::Unsure
            | Self::VRegion
            | Self::VSegment
            | Self::Variation => FeatureCategory::Other,
        }
    }

    /// Features reported individually: never fused with a same-named sibling.
    #[must_use]
    pub fn is_leave(self) -> bool {
        matches!(
            self,
            Self::Ltr
                | Self::MobileElement
                | Self::RepeatRegion
                | Self::RepeatUnit
                | Self::Satellite
                | Self::StemLoop
                | Self::MiscStructure
                | Self::TRna
                | Self::RRna
                | Self::SnRna
                | Self::ScRna
                | Self::NcRna
        )
    }

    /// Features that never take part in gene consolidation or cross-linking.
    #[must_use]
    pub fn is_no_gene(self) -> bool {
        self.category() == FeatureCategory::NoGene
    }

    #[must_use]
    pub fn is_gene(self) -> bool {
        self == Self::Gene
    }

    #[must_use]
    pub fn is_coding(self) -> bool {
        self == Self::Cds
    }

    /// The feature table key as written in the flat file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allele => "allele",
            Self::AssemblyGap => "assembly_gap",
            Self::Attenuator => "attenuator",
            Self::CaatSignal => "CAAT_signal",
            Self::Cds => "CDS",
            Self::CRegion => "C_region",
            Self::Centromere => "centromere",
            Self::Conflict => "conflict",
            Self::DLoop => "D-loop",
            Self::DSegment => "D_segment",
            Self::Enhancer => "enhancer",
            Self::Exon => "exon",
            Self::FivePrimeClip => "5'clip",
            Self::FivePrimeUtr => "5'UTR",
            Self::Gap => "gap",
            Self::GcSignal => "GC_signal",
            Self::Gene => "gene",
            Self::IDna => "iDNA",
            Self::Intron => "intron",
            Self::JSegment => "J_segment",
            Self::Ltr => "LTR",
            Self::MatPeptide => "mat_peptide",
            Self::MinusTenSignal => "-10_signal",
            Self::MinusThirtyFiveSignal => "-35_signal",
            Self::MiscBinding => "misc_binding",
            Self::MiscDifference => "misc_difference",
            Self::MiscFeature => "misc_feature",
            Self::MiscRecomb => "misc_recomb",
            Self::MiscRna => "misc_RNA",
            Self::MiscSignal => "misc_signal",
            Self::MiscStructure => "misc_structure",
            Self::MobileElement => "mobile_element",
            Self::ModifiedBase => "modified_base",
            Self::MRna => "mRNA",
            Self::Mutation => "mutation",
            Self::NcRna => "ncRNA",
            Self::NRegion => "N_region",
            Self::OldSequence => "old_sequence",
            Self::Operon => "operon",
            Self::OriT => "oriT",
            Self::PolyASignal => "polyA_signal",
            Self::PolyASite => "polyA_site",
            Self::PrecursorRna => "precursor_RNA",
            Self::PrimTranscript => "prim_transcript",
            Self::PrimerBind => "primer_bind",
            Self::Promoter => "promoter",
            Self::Propeptide => "propeptide",
            Self::ProteinBind => "protein_bind",
            Self::Rbs => "RBS",
            Self::Regulatory => "regulatory",
            Self::RepOrigin => "rep_origin",
            Self::RepeatRegion => "repeat_region",
            Self::RepeatUnit => "repeat_unit",
            Self::RRna => "rRNA",
            Self::Satellite => "satellite",
            Self::ScRna => "scRNA",
            Self::SigPeptide => "sig_peptide",
            Self::SnRna => "snRNA",
            Self::SnoRna => "snoRNA",
            Self::Source => "source",
            Self::SRegion => "S_region",
            Self::StemLoop => "stem_loop",
            Self::Sts => "STS",
            Self::TataSignal => "TATA_signal",
            Self::Telomere => "telomere",
            Self::Terminator => "terminator",
            Self::ThreePrimeClip => "3'clip",
            Self::ThreePrimeUtr => "3'UTR",
            Self::TmRna => "tmRNA",
            Self::TransitPeptide => "transit_peptide",
            Self::TRna => "tRNA",
            Self::Unsure => "unsure",
            Self::VRegion => "V_region",
            Self::VSegment => "V_segment",
            Self::Variation => "variation",
        }
    }
}

/// All variants, used to resolve keys back to kinds.
const ALL_FEATURE_KINDS: [FeatureKind; 75] = [
    FeatureKind::Allele,
    FeatureKind::AssemblyGap,
    FeatureKind::Attenuator,
    FeatureKind::CaatSignal,
    FeatureKind::Cds,
    FeatureKind::CRegion,
    FeatureKind::Centromere,
    FeatureKind::Conflict,
    FeatureKind::DLoop,
    FeatureKind::DSegment,
    FeatureKind::Enhancer,
    FeatureKind::Exon,
    FeatureKind::FivePrimeClip,
    FeatureKind::FivePrimeUtr,
    FeatureKind::Gap,
    FeatureKind::GcSignal,
    FeatureKind::Gene,
    FeatureKind::IDna,
    FeatureKind::Intron,
    FeatureKind::JSegment,
    FeatureKind::Ltr,
    FeatureKind::MatPeptide,
    FeatureKind::MinusTenSignal,
    FeatureKind::MinusThirtyFiveSignal,
    FeatureKind::MiscBinding,
    FeatureKind::MiscDifference,
    FeatureKind::MiscFeature,
    FeatureKind::MiscRecomb,
    FeatureKind::MiscRna,
    FeatureKind::MiscSignal,
    FeatureKind::MiscStructure,
    FeatureKind::MobileElement,
    FeatureKind::ModifiedBase,
    FeatureKind::MRna,
    FeatureKind::Mutation,
    FeatureKind::NcRna,
    FeatureKind::NRegion,
    FeatureKind::OldSequence,
    FeatureKind::Operon,
    FeatureKind::OriT,
    FeatureKind::PolyASignal,
    FeatureKind::PolyASite,
    FeatureKind::PrecursorRna,
    FeatureKind::PrimTranscript,
    FeatureKind::PrimerBind,
    FeatureKind::Promoter,
    FeatureKind::Propeptide,
    FeatureKind::ProteinBind,
    FeatureKind::Rbs,
    FeatureKind::Regulatory,
    FeatureKind::RepOrigin,
    FeatureKind::RepeatRegion,
    FeatureKind::RepeatUnit,
    FeatureKind::RRna,
    FeatureKind::Satellite,
    FeatureKind::ScRna,
    FeatureKind::SigPeptide,
    FeatureKind::SnRna,
    FeatureKind::SnoRna,
    FeatureKind::Source,
    FeatureKind::SRegion,
    FeatureKind::StemLoop,
    FeatureKind::Sts,
    FeatureKind::TataSignal,
    FeatureKind::Telomere,
    FeatureKind::Terminator,
    FeatureKind::ThreePrimeClip,
    FeatureKind::ThreePrimeUtr,
    FeatureKind::TmRna,
    FeatureKind::TransitPeptide,
    FeatureKind::TRna,
    FeatureKind::Unsure,
    FeatureKind::VRegion,
    FeatureKind::VSegment,
    FeatureKind::Variation,
];

impl std::str::FromStr for FeatureKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // EMBL and older GenBank releases spell a few keys differently.
        let key = match s {
            "3'UTR" | "3_UTR" | "three_prime_UTR" => "3'UTR",
            "5'UTR" | "5_UTR" | "five_prime_UTR" => "5'UTR",
            "D_loop" => "D-loop",
            other => other,
        };
        ALL_FEATURE_KINDS
            .iter()
            .copied()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| Error::Parse(format!("unrecognized feature key: '{s}'")))
    }
}

impl TryFrom<String> for FeatureKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FeatureKind> for String {
    fn from(kind: FeatureKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
