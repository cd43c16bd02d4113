use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use gto_extract::config::{ConfigLoader, ConnectionConfig};
use gto_extract::genome_annotation::WorkspaceGenomeAnnotation;
use gto_extract::output::JsonOutput;
use gto_extract::transform::build_gto;
use gto_extract::workspace::WorkspaceHttpClient;

#[derive(Parser)]
#[command(name = "gto-extract")]
#[command(about = "Export a KBase genome annotation as a genome typed object (GTO)")]
#[command(version)]
struct Cli {
    #[arg(help = "Workspace service URL")]
    workspace_url: String,

    #[arg(help = "Shock (file store) service URL")]
    shock_url: String,

    #[arg(help = "Handle service URL")]
    handle_url: String,

    #[arg(help = "Authentication token")]
    token: String,

    #[arg(value_name = "REF", help = "Genome annotation reference, e.g. 1234/5/6")]
    reference: String,

    #[arg(help = "Id written to the GTO")]
    id: String,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings_path = ConfigLoader::settings_path_from_env();
    let settings = ConfigLoader::resolve(settings_path.as_deref())?;
    let connection = ConnectionConfig::new(
        &cli.workspace_url,
        &cli.shock_url,
        &cli.handle_url,
        &cli.token,
    )?;
    debug!(
        shock_url = %connection.shock_url,
        handle_url = %connection.handle_url,
        "service endpoints"
    );

    let client = WorkspaceHttpClient::new(&connection, &settings)?;
    let annotation = WorkspaceGenomeAnnotation::connect(client, &cli.reference)?;
    let gto = build_gto(&annotation, &cli.id);
    info!(
        id = %gto.id,
        reference = annotation.reference(),
        features = gto.features.len(),
        "genome typed object assembled"
    );

    JsonOutput::print_gto(&gto, settings.pretty)?;
    Ok(())
}
