//! tapguard: RFID access control with runtime master-card enrollment.
//!
//! ```bash
//! # Run the controller; type credentials as hex on stdin, one per line
//! tapguard run --master "01 02 03 04" --store door.eeprom
//!
//! # Show what a store image holds
//! tapguard list --store door.eeprom
//! ```

mod console;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use clap::{Args, Parser, Subcommand};
use tapguard_controller::{
    AccessController, ControlLoop, ControllerConfig, FeedbackPresenter, LoopConfig,
    PresenterConfig,
};
use tapguard_core::constants::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_UNLOCK_MS, ERASED_BYTE};
use tapguard_core::{CredentialId, SystemClock};
use tapguard_hardware::mock::{MemoryByteStore, MockReader, MockReaderHandle};
use tapguard_storage::{CredentialStore, DEFAULT_IMAGE_SIZE, FileByteStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::oneshot;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::console::{ConsoleBuzzer, ConsoleIndicator, ConsoleLock};

#[derive(Parser, Debug)]
#[command(
    name = "tapguard",
    version,
    about = "RFID access controller with master-card enrollment",
    long_about = "Grants or denies access to presented credentials.\n\n\
        Present the master credential once to enroll cards, twice within\n\
        three seconds to remove them. The authorized list persists in a\n\
        byte-store image file."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to the byte-store image holding the credential list
    #[arg(
        long,
        global = true,
        env = "TAPGUARD_STORE",
        default_value = "tapguard.eeprom"
    )]
    store: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the access controller, reading credentials from stdin
    Run(RunArgs),

    /// Print the stored credentials in storage order
    List,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Master credential as 8 hex digits (e.g. "01 02 03 04")
    #[arg(long, env = "TAPGUARD_MASTER")]
    master: CredentialId,

    /// Delay between reader polls
    #[arg(
        long,
        env = "TAPGUARD_POLL_INTERVAL_MS",
        default_value_t = DEFAULT_POLL_INTERVAL_MS
    )]
    poll_interval_ms: u64,

    /// How long the door stays unlocked after access is granted
    #[arg(long, env = "TAPGUARD_UNLOCK_MS", default_value_t = DEFAULT_UNLOCK_MS)]
    unlock_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(&cli.store, args).await,
        Command::List => list(&cli.store),
    }
}

async fn run(path: &Path, args: RunArgs) -> Result<()> {
    let device = FileByteStore::open(path)
        .with_context(|| format!("Failed to open byte store {}", path.display()))?;
    let store = CredentialStore::load(device).context("Failed to load credential store")?;

    let controller = AccessController::new(ControllerConfig::new(args.master), store);
    let presenter = FeedbackPresenter::new(
        ConsoleIndicator,
        ConsoleBuzzer,
        PresenterConfig::default(),
    );
    let poll_interval = Duration::from_millis(args.poll_interval_ms);
    let config = LoopConfig::default()
        .poll_interval(poll_interval)
        .unlock_duration(Duration::from_millis(args.unlock_ms));

    let (reader, handle) = MockReader::with_name("stdin".to_string());
    let mut control = ControlLoop::new(
        reader,
        controller,
        presenter,
        ConsoleLock,
        SystemClock::new(),
        config,
    );

    info!(
        version = tapguard_core::VERSION,
        store = %path.display(),
        master = %args.master,
        "Starting tapguard"
    );

    let (eof_tx, eof_rx) = oneshot::channel();
    let feeder = tokio::spawn(feed_stdin(handle.clone(), poll_interval * 2, eof_tx));

    let shutdown = async {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("Interrupted"),
            _ = eof_rx => {}
        }
    };
    let result = control.run(shutdown).await;

    feeder.abort();
    // Held until here so the reader never observes a closed channel mid-run.
    drop(handle);

    result.context("Control loop failed")
}

/// Forward each hex line on stdin to the reader.
///
/// Signals `done` once stdin closes, after `drain` so the last queued
/// credential still gets polled.
async fn feed_stdin(handle: MockReaderHandle, drain: Duration, done: oneshot::Sender<()>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                match input.parse::<CredentialId>() {
                    Ok(id) => {
                        if let Err(e) = handle.present(id).await {
                            error!(error = %e, "Reader no longer accepts credentials");
                            break;
                        }
                    }
                    Err(e) => warn!(input, error = %e, "Ignoring unparsable credential"),
                }
            }
            Ok(None) => {
                info!("stdin closed");
                tokio::time::sleep(drain).await;
                break;
            }
            Err(e) => {
                error!(error = %e, "Failed to read stdin");
                break;
            }
        }
    }

    let _ = done.send(());
}

/// Load a copy of the image at `path` without touching the file.
///
/// Short images are padded the way [`FileByteStore`] pads them, and a
/// corrupt count is only repaired in memory.
fn read_store(path: &Path) -> Result<CredentialStore<MemoryByteStore>> {
    ensure!(path.exists(), "Byte store {} does not exist", path.display());

    let mut image = std::fs::read(path)
        .with_context(|| format!("Failed to read byte store {}", path.display()))?;
    if image.len() < DEFAULT_IMAGE_SIZE {
        image.resize(DEFAULT_IMAGE_SIZE, ERASED_BYTE);
    }

    CredentialStore::load(MemoryByteStore::from_bytes(image))
        .context("Failed to load credential store")
}

fn list(path: &Path) -> Result<()> {
    let store = read_store(path)?;

    if store.is_empty() {
        println!("No credentials stored in {}", path.display());
        return Ok(());
    }

    println!(
        "{} of {} credentials in {}",
        store.len(),
        store.capacity(),
        path.display()
    );
    for (index, id) in store.iter().enumerate() {
        println!("{:>3}  {}", index, id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case("01 02 03 04")]
    #[case("01:02:03:04")]
    #[case("01020304")]
    fn test_parses_run_args(#[case] master: &str) {
        let cli = Cli::try_parse_from([
            "tapguard",
            "run",
            "--master",
            master,
            "--unlock-ms",
            "1500",
        ])
        .unwrap();

        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.master, CredentialId::new([1, 2, 3, 4]));
                assert_eq!(args.unlock_ms, 1500);
                assert_eq!(args.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
            }
            Command::List => panic!("expected run"),
        }
    }

    #[test]
    fn test_rejects_bad_master() {
        assert!(Cli::try_parse_from(["tapguard", "run", "--master", "xyz"]).is_err());
    }

    #[test]
    fn test_list_with_store_path() {
        let cli = Cli::try_parse_from(["tapguard", "list", "--store", "/tmp/door.eeprom"]).unwrap();
        assert!(matches!(cli.command, Command::List));
        assert_eq!(cli.store, PathBuf::from("/tmp/door.eeprom"));
    }

    #[test]
    fn test_read_store_lists_saved_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("door.eeprom");
        let mut store = CredentialStore::load(FileByteStore::open(&path).unwrap()).unwrap();
        store.add(CredentialId::new([0xAA, 0xBB, 0xCC, 0xDD])).unwrap();
        drop(store);

        let listed = read_store(&path).unwrap();

        assert_eq!(listed.as_slice(), &[CredentialId::new([0xAA, 0xBB, 0xCC, 0xDD])]);
    }

    #[test]
    fn test_list_leaves_corrupt_image_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("door.eeprom");
        let image = vec![0x7F; 40];
        std::fs::write(&path, &image).unwrap();

        list(&path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), image);
    }

    #[test]
    fn test_list_missing_store_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list(&dir.path().join("absent.eeprom")).is_err());
    }
}
