use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use outsig_core::{Config, RegistrySignatureStore, SignatureUpdater, UpdateOutcome};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "outsig")]
#[command(about = "Points the default Outlook signature at a new image")]
struct Args {
    /// Settings file with the replacement image path
    #[arg(short, long, default_value = "appsettings.json")]
    config: PathBuf,

    /// Replacement image path, overriding the settings file
    #[arg(short, long, env = "OUTSIG_IMAGE_PATH")]
    image_path: Option<String>,

    /// Print the signature manifest after the run
    #[arg(long)]
    print_manifest: bool,

    /// Wait for Enter before exiting (for double-click runs)
    #[arg(long)]
    pause: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("outsig=info".parse()?))
        .init();

    let args = Args::parse();

    info!("Starting Outlook signature update...");

    let config = match Config::load(&args.config) {
        Ok(c) => {
            info!("Loaded settings from {:?}", args.config);
            c
        }
        Err(e) => {
            warn!("Failed to load settings: {}, using defaults", e);
            Config::default()
        }
    };

    let new_image_path = config.resolve_image_path(args.image_path.as_deref());
    info!("Replacement image path: {new_image_path}");

    let signatures_dir = outsig_core::signatures_dir()?;
    let updater = SignatureUpdater::new(
        RegistrySignatureStore::new(),
        signatures_dir,
        new_image_path,
    );

    let code = match updater.run() {
        Ok(UpdateOutcome::NoSignature) => ExitCode::SUCCESS,
        Ok(UpdateOutcome::Updated {
            signature,
            html_patched,
            manifest_changed,
            manifest_xml,
        }) => {
            info!(
                "Signature '{signature}' processed (image patched: {html_patched}, manifest saved: {manifest_changed})"
            );
            if args.print_manifest {
                println!("{manifest_xml}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Signature update failed: {e}");
            ExitCode::FAILURE
        }
    };

    if args.pause {
        println!("Press Enter to exit...");
        let _ = std::io::stdin().read_line(&mut String::new());
    }

    Ok(code)
}
