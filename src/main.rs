use std::path::PathBuf;
use std::sync::Arc;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use phabshot::adapters::{
    ArboardClipboard, OsaConfirmationGate, OsaNotifier, OsaTrash, ReqwestHttpClient,
};
use phabshot::cli::{parse_args, CliCommand};
use phabshot::models::{Preferences, Settings};
use phabshot::pipeline::{ImageSource, UploadPipeline};
use phabshot::store::UploadStore;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Preferences file next to the store, `~/.phabshot/preferences.json`.
fn preferences_path() -> Option<PathBuf> {
    Some(dirs::home_dir()?.join(".phabshot").join("preferences.json"))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let command = parse_args(std::env::args());

    if command == CliCommand::Version {
        println!("phabshot {}", VERSION);
        return Ok(());
    }

    let store = Arc::new(
        UploadStore::open().ok_or_else(|| eyre!("could not determine the home directory"))?,
    );

    match command {
        CliCommand::Version => unreachable!("handled above"),
        CliCommand::ListUploads => {
            for image in store.images() {
                println!("{}\t{}\t{}", image.object_name, image.name, image.ph_id);
            }
        }
        CliCommand::ClearUploads => {
            store.clear_all();
            println!("Upload history and settings cleared.");
        }
        CliCommand::CopyReference { object_name } => {
            let image = store
                .images()
                .into_iter()
                .find(|image| image.object_name == object_name)
                .ok_or_else(|| eyre!("no upload named {} in the history", object_name))?;
            image
                .copy_reference(&ArboardClipboard)
                .map_err(|err| eyre!("clipboard: {}", err))?;
            println!("Copied {} to the clipboard.", image.object_name);
        }
        CliCommand::Configure { endpoint, token } => {
            store.set_settings(Settings {
                api_key: token,
                phab_endpoint: endpoint,
            });
            println!("Settings saved to {}.", store.path().display());
        }
        CliCommand::Upload { paths, screenshot } => {
            if paths.is_empty() {
                eprintln!("usage: phabshot [--screenshot] <image files...>");
                eprintln!("       phabshot --configure <endpoint> <api token>");
                eprintln!("       phabshot --list | --clear | --copy <object> | --version");
                return Ok(());
            }

            let prefs = preferences_path()
                .map(|path| Preferences::load(&path))
                .unwrap_or_default();

            let pipeline = Arc::new(UploadPipeline::new(
                Arc::new(ReqwestHttpClient::new()),
                Arc::clone(&store),
                prefs,
                Arc::new(ArboardClipboard),
                Arc::new(OsaNotifier),
                Arc::new(OsaConfirmationGate),
                Arc::new(OsaTrash),
            ));

            // Paths collected before startup are drained as independent
            // fire-and-forget tasks; the process waits for them to reach a
            // terminal state before exiting.
            let handles: Vec<_> = paths
                .into_iter()
                .map(|path| {
                    let pipeline = Arc::clone(&pipeline);
                    tokio::spawn(async move {
                        let _ = pipeline.run(ImageSource::Path(path), screenshot).await;
                    })
                })
                .collect();
            futures::future::join_all(handles).await;
        }
    }

    Ok(())
}
