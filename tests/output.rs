use gto_extract::gto::{GtoBuilder, TaxonSummary};
use gto_extract::output::JsonOutput;

#[test]
fn status_line_follows_document() {
    let gto = GtoBuilder::new("genome.1").build();
    let mut buffer = Vec::new();
    JsonOutput::write_gto(&mut buffer, &gto, false).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "SUCCESS");
    let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(value["id"], "genome.1");
}

#[test]
fn non_ascii_is_not_escaped() {
    let gto = GtoBuilder::new("genome.1")
        .taxon(TaxonSummary {
            scientific_name: "Rhodococcus sp. Ω".to_string(),
            ..TaxonSummary::default()
        })
        .build();
    let mut buffer = Vec::new();
    JsonOutput::write_gto(&mut buffer, &gto, true).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    assert!(text.contains("Rhodococcus sp. Ω"));
    assert!(!text.contains("\\u"));
    assert!(text.ends_with("}\nSUCCESS\n"));
}
