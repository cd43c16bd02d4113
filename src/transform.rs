use serde_json::Value;
use tracing::debug;

use crate::annotation::{Assembly, ExternalSourceInfo, GenomeAnnotation, Taxon};
use crate::error::GtoError;
use crate::gto::{
    AssemblySummary, DEFAULT_DOMAIN, DEFAULT_GC_CONTENT, DEFAULT_GENETIC_CODE,
    DEFAULT_SCIENTIFIC_NAME, DEFAULT_SOURCE, DEFAULT_TAXONOMY, Gto, GtoBuilder, GtoFeature,
    TaxonSummary, resolve,
};

pub fn build_gto<G: GenomeAnnotation>(annotation: &G, id: &str) -> Gto {
    let taxon = match annotation.get_taxon() {
        Ok(taxon) => Some(taxon),
        Err(err) => {
            debug!(error = %err, "taxon unavailable");
            None
        }
    };
    let taxon_summary = taxon
        .as_ref()
        .map(summarize_taxon)
        .unwrap_or_default();

    let assembly_summary = match annotation.get_assembly() {
        Ok(assembly) => summarize_assembly(taxon.as_ref(), &assembly, id),
        Err(err) => {
            debug!(error = %err, "assembly unavailable");
            AssemblySummary::unresolved(id)
        }
    };

    let features = match annotation.get_features() {
        Ok(records) => records
            .iter()
            .filter_map(|(feature_id, data)| GtoFeature::from_source(feature_id, data))
            .collect(),
        Err(err) => {
            debug!(error = %err, "features unavailable");
            Vec::new()
        }
    };
    debug!(count = features.len(), "mapped features");

    GtoBuilder::new(id)
        .taxon(taxon_summary)
        .assembly(assembly_summary)
        .features(features)
        .build()
}

pub fn summarize_taxon<T: Taxon>(taxon: &T) -> TaxonSummary {
    TaxonSummary {
        scientific_name: resolve(
            "scientific_name",
            || taxon.scientific_name(),
            DEFAULT_SCIENTIFIC_NAME.to_string(),
        ),
        domain: resolve("domain", || taxon.domain(), DEFAULT_DOMAIN.to_string()),
        genetic_code: resolve("genetic_code", || taxon.genetic_code(), DEFAULT_GENETIC_CODE),
        taxonomy: resolve(
            "taxonomy",
            || taxon.scientific_lineage().map(|lineage| lineage.join(",")),
            DEFAULT_TAXONOMY.to_string(),
        ),
    }
}

pub fn summarize_assembly<T: Taxon, A: Assembly>(
    taxon: Option<&T>,
    assembly: &A,
    id: &str,
) -> AssemblySummary {
    let (source, source_id) = resolve(
        "source",
        || -> Result<(String, String), GtoError> {
            let info = assembly.external_source_info()?;
            let source = info_string(&info, "external_source")?;
            let source_id = resolve(
                "source_id",
                || info_string(&info, "external_source_id"),
                id.to_string(),
            );
            Ok((source, source_id))
        },
        (DEFAULT_SOURCE.to_string(), id.to_string()),
    );

    AssemblySummary {
        dna_size: taxon.map_or(0, |taxon| resolve("dna_size", || taxon.dna_size(), 0)),
        num_contigs: taxon.map_or(0, |taxon| {
            resolve("num_contigs", || taxon.number_contigs(), 0)
        }),
        contig_lengths: taxon.map_or_else(Vec::new, |taxon| {
            resolve("contig_lengths", || taxon.contig_lengths(), Vec::new())
        }),
        contig_ids: taxon.map_or_else(Vec::new, |taxon| {
            resolve("contig_ids", || taxon.contig_ids(), Vec::new())
        }),
        gc_content: resolve("gc_content", || assembly.gc_content(), DEFAULT_GC_CONTENT),
        source,
        source_id,
    }
}

fn info_string(info: &ExternalSourceInfo, key: &str) -> Result<String, GtoError> {
    match info.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(GtoError::InvalidField {
            field: key.to_string(),
            expected: "a string",
        }),
        None => Err(GtoError::MissingField(key.to_string())),
    }
}
