use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GtoError {
    #[error("invalid {name} url: {value}")]
    InvalidUrl { name: &'static str, value: String },

    #[error("failed to read settings file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON settings: {0}")]
    ConfigParse(String),

    #[error("workspace request failed: {0}")]
    WorkspaceHttp(String),

    #[error("workspace returned status {status}: {message}")]
    WorkspaceStatus { status: u16, message: String },

    #[error("workspace error {code}: {message}")]
    WorkspaceRpc { code: i64, message: String },

    #[error("workspace object not found: {0}")]
    ObjectNotFound(String),

    #[error("unsupported workspace object type: {0}")]
    UnsupportedType(String),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("field {field} is not {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    #[error("failed to write output: {0}")]
    Output(String),
}
