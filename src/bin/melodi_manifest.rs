use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing::info;
use tracing_subscriber::EnvFilter;

use melodi_manifest::catalog::CatalogHttpClient;
use melodi_manifest::config::StoreConfig;
use melodi_manifest::error::ManifestError;
use melodi_manifest::fetch::{HttpAssetFetcher, RetryPolicy};
use melodi_manifest::pipeline::App;
use melodi_manifest::store::S3ManifestStore;

/// Configuration is environment-driven only; the parser exists for
/// `--help` and `--version`.
#[derive(Parser)]
#[command(name = "melodi-manifest")]
#[command(about = "Builds the Melodi dataset manifest and publishes it to object storage")]
#[command(version, author)]
struct Cli {}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<ManifestError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &ManifestError) -> u8 {
    match error {
        ManifestError::MissingEnv(_) | ManifestError::StoreConfig(_) => 2,
        ManifestError::CatalogHttp(_)
        | ManifestError::CatalogStatus { .. }
        | ManifestError::CatalogParse(_) => 3,
        ManifestError::Serialize(_)
        | ManifestError::StoreWrite(_)
        | ManifestError::Filesystem(_) => 4,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Cli {} = Cli::parse();

    let store_config = StoreConfig::from_env().into_diagnostic()?;
    let catalog = CatalogHttpClient::new().into_diagnostic()?;
    let fetcher = HttpAssetFetcher::new(RetryPolicy::default()).into_diagnostic()?;
    let store = S3ManifestStore::new(&store_config).into_diagnostic()?;

    let summary = App::new(catalog, fetcher, store).run().into_diagnostic()?;
    info!(
        datasets = summary.datasets,
        available = summary.available,
        "manifest published"
    );
    Ok(())
}
