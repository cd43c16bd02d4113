use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GtoError;

pub type ExternalSourceInfo = Map<String, Value>;

pub trait GenomeAnnotation {
    type Taxon: Taxon;
    type Assembly: Assembly;

    fn get_taxon(&self) -> Result<Self::Taxon, GtoError>;
    fn get_assembly(&self) -> Result<Self::Assembly, GtoError>;
    fn get_features(&self) -> Result<BTreeMap<String, FeatureData>, GtoError>;
}

pub trait Taxon {
    fn scientific_name(&self) -> Result<String, GtoError>;
    fn domain(&self) -> Result<String, GtoError>;
    fn genetic_code(&self) -> Result<i64, GtoError>;
    fn scientific_lineage(&self) -> Result<Vec<String>, GtoError>;
    fn dna_size(&self) -> Result<i64, GtoError>;
    fn number_contigs(&self) -> Result<i64, GtoError>;
    fn contig_lengths(&self) -> Result<Vec<i64>, GtoError>;
    fn contig_ids(&self) -> Result<Vec<String>, GtoError>;
}

pub trait Assembly {
    fn gc_content(&self) -> Result<f64, GtoError>;
    fn external_source_info(&self) -> Result<ExternalSourceInfo, GtoError>;
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FeatureData {
    #[serde(default)]
    pub feature_type: Option<String>,
    #[serde(default)]
    pub feature_function: Option<String>,
    #[serde(default)]
    pub feature_ontology_terms: Option<Value>,
    #[serde(default)]
    pub feature_protein_translation: Option<String>,
    #[serde(default)]
    pub feature_dna_sequence: Option<String>,
    #[serde(default)]
    pub feature_locations: Option<Vec<FeatureLocation>>,
    #[serde(default)]
    pub feature_md5: Option<String>,
    #[serde(default)]
    pub feature_dna_sequence_length: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeatureLocation {
    pub contig_id: String,
    pub start: i64,
    pub strand: String,
    pub length: i64,
}

impl FeatureLocation {
    pub fn from_tuple(value: &Value) -> Result<Self, GtoError> {
        let invalid = || GtoError::InvalidField {
            field: "location".to_string(),
            expected: "a [contig_id, start, strand, length] tuple",
        };
        let parts = value.as_array().filter(|parts| parts.len() == 4).ok_or_else(invalid)?;
        Ok(Self {
            contig_id: parts[0].as_str().ok_or_else(invalid)?.to_string(),
            start: parts[1].as_i64().ok_or_else(invalid)?,
            strand: parts[2].as_str().ok_or_else(invalid)?.to_string(),
            length: parts[3].as_i64().ok_or_else(invalid)?,
        })
    }
}

pub(crate) fn field<'a>(record: &'a Value, key: &str) -> Result<&'a Value, GtoError> {
    match record.get(key) {
        Some(Value::Null) | None => Err(GtoError::MissingField(key.to_string())),
        Some(value) => Ok(value),
    }
}

pub(crate) fn str_field(record: &Value, key: &str) -> Result<String, GtoError> {
    field(record, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(key, "a string"))
}

pub(crate) fn int_field(record: &Value, key: &str) -> Result<i64, GtoError> {
    field(record, key)?
        .as_i64()
        .ok_or_else(|| invalid(key, "an integer"))
}

pub(crate) fn float_field(record: &Value, key: &str) -> Result<f64, GtoError> {
    field(record, key)?
        .as_f64()
        .ok_or_else(|| invalid(key, "a number"))
}

pub(crate) fn string_list(record: &Value, key: &str) -> Result<Vec<String>, GtoError> {
    field(record, key)?
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| invalid(key, "a list of strings"))
}

pub(crate) fn int_list(record: &Value, key: &str) -> Result<Vec<i64>, GtoError> {
    field(record, key)?
        .as_array()
        .and_then(|items| items.iter().map(Value::as_i64).collect::<Option<Vec<_>>>())
        .ok_or_else(|| invalid(key, "a list of integers"))
}

fn invalid(key: &str, expected: &'static str) -> GtoError {
    GtoError::InvalidField {
        field: key.to_string(),
        expected,
    }
}
