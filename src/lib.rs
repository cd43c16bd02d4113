pub mod annotation;
pub mod config;
pub mod error;
pub mod genome_annotation;
pub mod gto;
pub mod output;
pub mod transform;
pub mod workspace;
