use assert_matches::assert_matches;

use gto_extract::error::GtoError;
use gto_extract::workspace::{handle_status, parse_get_objects_response};

#[test]
fn parse_object_from_result() {
    let body = r#"{
        "version": "1.1",
        "id": "1",
        "result": [{
            "data": [{
                "data": { "scientific_name": "Escherichia coli" },
                "info": [5, "Ecoli_K12", "KBaseGenomes.Genome-8.2", "2016-03-01T17:03:19+0000",
                         3, "user", 1234, "genomes", "c0ffee", 1024, {}]
            }]
        }]
    }"#;
    let object = parse_get_objects_response("genomes/Ecoli_K12", body).unwrap();
    assert_eq!(object.reference, "1234/5/3");
    assert_eq!(object.type_name, "KBaseGenomes.Genome-8.2");
    assert_eq!(object.data["scientific_name"], "Escherichia coli");
}

#[test]
fn rpc_error_is_surfaced() {
    let body = r#"{
        "version": "1.1",
        "error": {
            "name": "JSONRPCError",
            "code": -32500,
            "message": "Object Ecoli_K12 cannot be accessed: User anonymous may not read workspace genomes",
            "error": "us.kbase.workspace.database.exceptions.InaccessibleObjectException"
        }
    }"#;
    let err = parse_get_objects_response("genomes/Ecoli_K12", body).unwrap_err();
    assert_matches!(err, GtoError::WorkspaceRpc { code: -32500, .. });
}

#[test]
fn empty_data_is_not_found() {
    let body = r#"{ "version": "1.1", "result": [{ "data": [] }] }"#;
    let err = parse_get_objects_response("genomes/none", body).unwrap_err();
    assert_matches!(err, GtoError::ObjectNotFound(reference) if reference == "genomes/none");
}

#[test]
fn malformed_info_is_rejected() {
    let body = r#"{ "result": [{ "data": [{ "data": {}, "info": [5, "x"] }] }] }"#;
    let err = parse_get_objects_response("genomes/x", body).unwrap_err();
    assert_matches!(err, GtoError::InvalidField { .. });
}

#[test]
fn server_fault_with_rpc_body_maps_to_rpc_error() {
    let body = r#"{"version":"1.1","error":{"name":"JSONRPCError","code":-32500,"message":"Object 7 does not exist"}}"#;
    let err = handle_status(500, body.to_string()).unwrap_err();
    assert_matches!(err, GtoError::WorkspaceRpc { code: -32500, message } if message == "Object 7 does not exist");
}

#[test]
fn non_rpc_failure_keeps_status() {
    let err = handle_status(502, "<html>Bad Gateway</html>".to_string()).unwrap_err();
    assert_matches!(err, GtoError::WorkspaceStatus { status: 502, .. });

    let body = handle_status(200, "{\"result\":[]}".to_string()).unwrap();
    assert_eq!(body, "{\"result\":[]}");
}
