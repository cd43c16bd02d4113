use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::annotation::FeatureData;

pub const DEFAULT_SCIENTIFIC_NAME: &str = "Unknown species";
pub const DEFAULT_DOMAIN: &str = "Unknown";
pub const DEFAULT_GENETIC_CODE: i64 = 11;
pub const DEFAULT_TAXONOMY: &str = "Unknown";
pub const DEFAULT_GC_CONTENT: f64 = 0.5;
pub const DEFAULT_SOURCE: &str = "KBase";
pub const DEFAULT_FUNCTION: &str = "Unknown";

// contig_id, start, strand, length
pub type Location = (String, i64, String, i64);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gto {
    pub id: String,
    pub scientific_name: String,
    pub domain: String,
    pub genetic_code: i64,
    pub dna_size: i64,
    pub num_contigs: i64,
    pub contig_lengths: Vec<i64>,
    pub contig_ids: Vec<String>,
    pub source: String,
    pub source_id: String,
    pub taxonomy: String,
    pub gc_content: f64,
    pub complete: i64,
    pub features: Vec<GtoFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GtoFeature {
    pub id: String,
    #[serde(rename = "type")]
    pub feature_type: String,
    pub function: String,
    pub location: Vec<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ontology_terms: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_translation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dna_sequence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dna_sequence_length: Option<i64>,
}

impl GtoFeature {
    pub fn from_source(id: &str, data: &FeatureData) -> Option<Self> {
        let feature_type = data.feature_type.clone()?;
        let location = data
            .feature_locations
            .iter()
            .flatten()
            .map(|loc| (loc.contig_id.clone(), loc.start, loc.strand.clone(), loc.length))
            .collect();

        Some(Self {
            id: id.to_string(),
            feature_type,
            function: data
                .feature_function
                .clone()
                .unwrap_or_else(|| DEFAULT_FUNCTION.to_string()),
            location,
            ontology_terms: data.feature_ontology_terms.clone(),
            protein_translation: data.feature_protein_translation.clone(),
            dna_sequence: data.feature_dna_sequence.clone(),
            md5: data.feature_md5.clone().filter(|md5| !md5.is_empty()),
            dna_sequence_length: data.feature_dna_sequence_length,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaxonSummary {
    pub scientific_name: String,
    pub domain: String,
    pub genetic_code: i64,
    pub taxonomy: String,
}

impl Default for TaxonSummary {
    fn default() -> Self {
        Self {
            scientific_name: DEFAULT_SCIENTIFIC_NAME.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            genetic_code: DEFAULT_GENETIC_CODE,
            taxonomy: DEFAULT_TAXONOMY.to_string(),
        }
    }
}

// The contig statistics are read from the taxon record, not the assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblySummary {
    pub dna_size: i64,
    pub num_contigs: i64,
    pub contig_lengths: Vec<i64>,
    pub contig_ids: Vec<String>,
    pub gc_content: f64,
    pub source: String,
    pub source_id: String,
}

impl AssemblySummary {
    pub fn unresolved(id: &str) -> Self {
        Self {
            dna_size: 0,
            num_contigs: 0,
            contig_lengths: Vec::new(),
            contig_ids: Vec::new(),
            gc_content: DEFAULT_GC_CONTENT,
            source: DEFAULT_SOURCE.to_string(),
            source_id: id.to_string(),
        }
    }
}

pub struct GtoBuilder {
    id: String,
    taxon: TaxonSummary,
    assembly: AssemblySummary,
    features: Vec<GtoFeature>,
}

impl GtoBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            taxon: TaxonSummary::default(),
            assembly: AssemblySummary::unresolved(id),
            features: Vec::new(),
        }
    }

    pub fn taxon(self, taxon: TaxonSummary) -> Self {
        Self { taxon, ..self }
    }

    pub fn assembly(self, assembly: AssemblySummary) -> Self {
        Self { assembly, ..self }
    }

    pub fn features(self, features: Vec<GtoFeature>) -> Self {
        Self { features, ..self }
    }

    pub fn build(self) -> Gto {
        let Self {
            id,
            taxon,
            assembly,
            features,
        } = self;
        Gto {
            id,
            scientific_name: taxon.scientific_name,
            domain: taxon.domain,
            genetic_code: taxon.genetic_code,
            dna_size: assembly.dna_size,
            num_contigs: assembly.num_contigs,
            contig_lengths: assembly.contig_lengths,
            contig_ids: assembly.contig_ids,
            source: assembly.source,
            source_id: assembly.source_id,
            taxonomy: taxon.taxonomy,
            gc_content: assembly.gc_content,
            complete: 1,
            features,
        }
    }
}

pub fn resolve<T, E, F>(field: &str, getter: F, default: T) -> T
where
    E: fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    match getter() {
        Ok(value) => value,
        Err(err) => {
            debug!(field, error = %err, "using default");
            default
        }
    }
}
