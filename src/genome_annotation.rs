use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::annotation::{
    Assembly, ExternalSourceInfo, FeatureData, FeatureLocation, GenomeAnnotation, Taxon,
    float_field, int_field, int_list, str_field, string_list,
};
use crate::error::GtoError;
use crate::workspace::{WorkspaceClient, WorkspaceObject};

pub const GENOME_ANNOTATION_TYPE: &str = "KBaseGenomeAnnotations.GenomeAnnotation";
pub const LEGACY_GENOME_TYPE: &str = "KBaseGenomes.Genome";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    GenomeAnnotation,
    LegacyGenome,
    Unsupported,
}

impl AnnotationKind {
    fn of(object: &WorkspaceObject) -> Self {
        if object.is_type(GENOME_ANNOTATION_TYPE) {
            AnnotationKind::GenomeAnnotation
        } else if object.is_type(LEGACY_GENOME_TYPE) {
            AnnotationKind::LegacyGenome
        } else {
            AnnotationKind::Unsupported
        }
    }
}

pub struct WorkspaceGenomeAnnotation<W: WorkspaceClient> {
    client: W,
    object: WorkspaceObject,
    kind: AnnotationKind,
}

impl<W: WorkspaceClient> WorkspaceGenomeAnnotation<W> {
    pub fn connect(client: W, reference: &str) -> Result<Self, GtoError> {
        let object = client.get_object(reference)?;
        let kind = AnnotationKind::of(&object);
        info!(
            reference,
            resolved = %object.reference,
            type_name = %object.type_name,
            "connected to genome annotation"
        );
        Ok(Self {
            client,
            object,
            kind,
        })
    }

    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    pub fn reference(&self) -> &str {
        &self.object.reference
    }

    fn unsupported(&self) -> GtoError {
        GtoError::UnsupportedType(self.object.type_name.clone())
    }

    fn child(&self, key: &str) -> Result<WorkspaceObject, GtoError> {
        let child_ref = str_field(&self.object.data, key)?;
        self.client.get_object(&self.object.child_path(&child_ref))
    }

    fn container_features(&self) -> Result<BTreeMap<String, FeatureData>, GtoError> {
        let containers = self
            .object
            .data
            .get("feature_container_references")
            .and_then(Value::as_object)
            .ok_or_else(|| GtoError::MissingField("feature_container_references".to_string()))?;

        let mut features = BTreeMap::new();
        for (feature_type, container_ref) in containers {
            let container_ref = container_ref.as_str().ok_or_else(|| GtoError::InvalidField {
                field: format!("feature_container_references.{feature_type}"),
                expected: "a reference string",
            })?;
            let container = self
                .client
                .get_object(&self.object.child_path(container_ref))?;
            let Some(records) = container.data.get("features").and_then(Value::as_object) else {
                debug!(feature_type = %feature_type, "feature container has no features");
                continue;
            };
            for (feature_id, record) in records {
                match feature_from_record(record, "locations") {
                    Ok(data) => {
                        features.insert(feature_id.clone(), data);
                    }
                    Err(err) => debug!(feature_id = %feature_id, error = %err, "skipping feature"),
                }
            }
        }
        Ok(features)
    }

    fn legacy_features(&self) -> Result<BTreeMap<String, FeatureData>, GtoError> {
        let records = self
            .object
            .data
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| GtoError::MissingField("features".to_string()))?;

        let mut features = BTreeMap::new();
        for record in records {
            let Some(feature_id) = record.get("id").and_then(Value::as_str) else {
                debug!("skipping feature without id");
                continue;
            };
            match feature_from_record(record, "location") {
                Ok(data) => {
                    features.insert(feature_id.to_string(), data);
                }
                Err(err) => debug!(feature_id, error = %err, "skipping feature"),
            }
        }
        Ok(features)
    }
}

impl<W: WorkspaceClient> GenomeAnnotation for WorkspaceGenomeAnnotation<W> {
    type Taxon = WorkspaceTaxon;
    type Assembly = WorkspaceAssembly;

    fn get_taxon(&self) -> Result<WorkspaceTaxon, GtoError> {
        match self.kind {
            AnnotationKind::GenomeAnnotation => Ok(WorkspaceTaxon {
                record: self.child("taxon_ref")?.data,
                lineage_key: "scientific_lineage",
            }),
            AnnotationKind::LegacyGenome => Ok(WorkspaceTaxon {
                record: self.object.data.clone(),
                lineage_key: "taxonomy",
            }),
            AnnotationKind::Unsupported => Err(self.unsupported()),
        }
    }

    fn get_assembly(&self) -> Result<WorkspaceAssembly, GtoError> {
        match self.kind {
            AnnotationKind::GenomeAnnotation => Ok(WorkspaceAssembly {
                record: self.child("assembly_ref")?.data,
            }),
            AnnotationKind::LegacyGenome => {
                let key = if self.object.data.get("assembly_ref").is_some() {
                    "assembly_ref"
                } else {
                    "contigset_ref"
                };
                Ok(WorkspaceAssembly {
                    record: self.child(key)?.data,
                })
            }
            AnnotationKind::Unsupported => Err(self.unsupported()),
        }
    }

    fn get_features(&self) -> Result<BTreeMap<String, FeatureData>, GtoError> {
        match self.kind {
            AnnotationKind::GenomeAnnotation => self.container_features(),
            AnnotationKind::LegacyGenome => self.legacy_features(),
            AnnotationKind::Unsupported => Err(self.unsupported()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkspaceTaxon {
    record: Value,
    lineage_key: &'static str,
}

impl Taxon for WorkspaceTaxon {
    fn scientific_name(&self) -> Result<String, GtoError> {
        str_field(&self.record, "scientific_name")
    }

    fn domain(&self) -> Result<String, GtoError> {
        str_field(&self.record, "domain")
    }

    fn genetic_code(&self) -> Result<i64, GtoError> {
        int_field(&self.record, "genetic_code")
    }

    fn scientific_lineage(&self) -> Result<Vec<String>, GtoError> {
        let lineage = str_field(&self.record, self.lineage_key)?;
        Ok(split_lineage(&lineage))
    }

    fn dna_size(&self) -> Result<i64, GtoError> {
        int_field(&self.record, "dna_size")
    }

    fn number_contigs(&self) -> Result<i64, GtoError> {
        int_field(&self.record, "num_contigs")
    }

    fn contig_lengths(&self) -> Result<Vec<i64>, GtoError> {
        int_list(&self.record, "contig_lengths")
    }

    fn contig_ids(&self) -> Result<Vec<String>, GtoError> {
        string_list(&self.record, "contig_ids")
    }
}

#[derive(Debug, Clone)]
pub struct WorkspaceAssembly {
    record: Value,
}

impl Assembly for WorkspaceAssembly {
    // Contig sets carry no gc_content; it is computed from their sequences.
    fn gc_content(&self) -> Result<f64, GtoError> {
        if self.record.get("gc_content").is_some() {
            return float_field(&self.record, "gc_content");
        }
        let contigs = self
            .record
            .get("contigs")
            .and_then(Value::as_array)
            .ok_or_else(|| GtoError::MissingField("gc_content".to_string()))?;
        contig_gc_content(contigs)
    }

    // Contig sets carry source/source_id instead of external_source*.
    fn external_source_info(&self) -> Result<ExternalSourceInfo, GtoError> {
        let record = self.record.as_object().ok_or_else(|| GtoError::InvalidField {
            field: "assembly".to_string(),
            expected: "an object",
        })?;
        let modern = record.contains_key("external_source")
            || record.contains_key("external_source_id");
        let (source_key, id_key) = if modern {
            ("external_source", "external_source_id")
        } else {
            ("source", "source_id")
        };

        let mut info = Map::new();
        if let Some(source) = record.get(source_key) {
            info.insert("external_source".to_string(), source.clone());
        }
        if let Some(source_id) = record.get(id_key) {
            info.insert("external_source_id".to_string(), source_id.clone());
        }
        Ok(info)
    }
}

fn contig_gc_content(contigs: &[Value]) -> Result<f64, GtoError> {
    let mut gc = 0u64;
    let mut total = 0u64;
    for contig in contigs {
        let sequence = contig
            .get("sequence")
            .and_then(Value::as_str)
            .ok_or_else(|| GtoError::MissingField("contigs.sequence".to_string()))?;
        for base in sequence.bytes() {
            match base.to_ascii_uppercase() {
                b'G' | b'C' => gc += 1,
                _ => {}
            }
            total += 1;
        }
    }
    if total == 0 {
        return Err(GtoError::MissingField("contigs.sequence".to_string()));
    }
    Ok(gc as f64 / total as f64)
}

pub fn split_lineage(lineage: &str) -> Vec<String> {
    lineage
        .split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn feature_from_record(record: &Value, locations_key: &str) -> Result<FeatureData, GtoError> {
    let opt_str = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);
    let feature_locations = record
        .get(locations_key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(FeatureLocation::from_tuple)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    Ok(FeatureData {
        feature_type: opt_str("type"),
        feature_function: opt_str("function"),
        feature_ontology_terms: record
            .get("ontology_terms")
            .filter(|value| !value.is_null())
            .cloned(),
        feature_protein_translation: opt_str("protein_translation"),
        feature_dna_sequence: opt_str("dna_sequence"),
        feature_locations,
        feature_md5: opt_str("md5"),
        feature_dna_sequence_length: record.get("dna_sequence_length").and_then(Value::as_i64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lineage_is_split_and_trimmed() {
        assert_eq!(
            split_lineage("Bacteria; Proteobacteria;; Gammaproteobacteria "),
            vec!["Bacteria", "Proteobacteria", "Gammaproteobacteria"]
        );
        assert!(split_lineage("").is_empty());
    }

    #[test]
    fn contig_set_source_fallback() {
        let assembly = WorkspaceAssembly {
            record: json!({ "source": "RefSeq", "source_id": "NC_000913" }),
        };
        let info = assembly.external_source_info().unwrap();
        assert_eq!(info["external_source"], "RefSeq");
        assert_eq!(info["external_source_id"], "NC_000913");
    }

    #[test]
    fn contig_set_gc_from_sequences() {
        let assembly = WorkspaceAssembly {
            record: json!({
                "source": "RefSeq",
                "contigs": [
                    { "id": "c1", "sequence": "GGGGCCCC" },
                    { "id": "c2", "sequence": "aatt" }
                ]
            }),
        };
        let gc = assembly.gc_content().unwrap();
        assert!((gc - 8.0 / 12.0).abs() < 1e-12);

        let empty = WorkspaceAssembly {
            record: json!({ "contigs": [] }),
        };
        assert!(matches!(empty.gc_content(), Err(GtoError::MissingField(_))));
    }
}
