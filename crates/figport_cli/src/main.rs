use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use figport_core::{import_figma_file, BuildReport, CustomMap, ImportSettings, PrefabLibrary};
use figport_remote::{FigmaClient, FileCache, RemoteSettings, TelemetryClient, TelemetryOutcome};

#[derive(Parser)]
#[command(name = "figport")]
#[command(about = "Rebuild Figma documents as prefab-based scene graphs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Remote endpoint settings (TOML)
    #[arg(long, global = true)]
    remote: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a scene from a Figma file export
    Import {
        /// Figma JSON (a `GET /v1/files/:key` response)
        input: PathBuf,

        /// Custom map (TOML) substituting prefabs for instances
        #[arg(short, long)]
        map: Option<PathBuf>,

        /// Prefab library (JSON or TOML) the custom map refers to
        #[arg(short, long)]
        prefabs: Option<PathBuf>,

        /// Import settings (TOML)
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// Print the resulting hierarchy
        #[arg(long)]
        dump: bool,
    },
    /// Download a Figma file into the local cache
    Fetch {
        /// Figma file key
        key: String,
    },
    /// Manage cached Figma files
    Files {
        #[command(subcommand)]
        action: FilesAction,
    },
    /// Drive the simulation telemetry service
    Telemetry {
        #[command(subcommand)]
        action: TelemetryAction,
    },
}

#[derive(Subcommand)]
enum FilesAction {
    /// List cached file keys
    List,
    /// Delete a cached file and its sidecar
    Delete { key: String },
}

#[derive(Subcommand)]
enum TelemetryAction {
    /// Restart the simulation (stop, then start)
    Start,
    Stop,
    Pause,
    /// Print the current simulation state
    State,
    /// Print the simulation state repeatedly
    Poll {
        /// Milliseconds between requests
        #[arg(long, default_value = "1000")]
        interval_ms: u64,

        /// Number of requests
        #[arg(long, default_value = "10")]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logger("RUST_LOG").init();

    match cli.command {
        Commands::Import {
            input,
            map,
            prefabs,
            settings,
            dump,
        } => import(&input, map.as_deref(), prefabs.as_deref(), settings.as_deref(), dump),
        Commands::Fetch { key } => {
            let remote = remote_settings(cli.remote.as_deref())?;
            let client = FigmaClient::new(&remote)?;
            let path = client.fetch_and_cache(&key, &FileCache::new(&remote.cache_dir))?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Files { action } => {
            let remote = remote_settings(cli.remote.as_deref())?;
            let cache = FileCache::new(&remote.cache_dir);
            match action {
                FilesAction::List => {
                    for key in cache.list()? {
                        println!("{key}");
                    }
                }
                FilesAction::Delete { key } => {
                    if !cache.delete(&key)? {
                        bail!("{} is not in {}", key, cache.dir().display());
                    }
                }
            }
            Ok(())
        }
        Commands::Telemetry { action } => {
            let remote = remote_settings(cli.remote.as_deref())?;
            telemetry(&TelemetryClient::from_settings(&remote), action)
        }
    }
}

/// Logger reading its filter from `filter_var`, `info` when unset.
fn logger(filter_var: &str) -> env_logger::Builder {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(filter_var, "info"))
}

fn import(
    input: &Path,
    map_path: Option<&Path>,
    prefabs_path: Option<&Path>,
    settings_path: Option<&Path>,
    dump: bool,
) -> Result<()> {
    let settings = match settings_path {
        Some(path) => ImportSettings::load(path)?,
        None => ImportSettings::default(),
    };

    let library = match prefabs_path {
        Some(path) => PrefabLibrary::load(path)?,
        None => PrefabLibrary::new(),
    };

    let map = match map_path {
        Some(path) => CustomMap::load(path, &library)
            .with_context(|| format!("Failed to load custom map {}", path.display()))?,
        None => {
            log::info!("No custom map given; instances become placeholder groups");
            CustomMap::new()
        }
    };

    let (scene, report) = import_figma_file(input, &settings, &map)
        .with_context(|| format!("Failed to import {}", input.display()))?;

    print_report(&scene.name, &report);
    if dump {
        println!();
        print!("{}", scene.dump());
    }
    Ok(())
}

fn print_report(name: &str, report: &BuildReport) {
    println!("=== {} ===", name);
    println!("Nodes built: {}", report.nodes_built);
    println!("Prefab instances: {}", report.instances_substituted);

    if !report.lookup_misses.is_empty() {
        println!("Unmapped instances: {}", report.lookup_misses.len());
        for miss in &report.lookup_misses {
            let component = miss.component.as_deref().unwrap_or("?");
            println!("  {} ({}, component {}): {:?}", miss.node_name, miss.node_id, component, miss.reason);
        }
    }

    if !report.post_process_failures.is_empty() {
        println!("Skipped post-process steps: {}", report.post_process_failures.len());
        for (name, err) in &report.post_process_failures {
            println!("  {}: {}", name, err);
        }
    }
}

fn remote_settings(path: Option<&Path>) -> Result<RemoteSettings> {
    match path {
        Some(path) => RemoteSettings::load(path)
            .with_context(|| format!("Failed to load remote settings {}", path.display())),
        None => Ok(RemoteSettings::default()),
    }
}

fn telemetry(client: &TelemetryClient, action: TelemetryAction) -> Result<()> {
    let outcome = match action {
        TelemetryAction::Start => client.start_sim(),
        TelemetryAction::Stop => client.stop_sim(),
        TelemetryAction::Pause => client.pause_sim(),
        TelemetryAction::State => client.sim_state(),
        TelemetryAction::Poll { interval_ms, count } => {
            let mut failures = 0;
            client.poll_state(Duration::from_millis(interval_ms), count, |i, outcome| {
                println!("[{}] {}", i, outcome);
                if !outcome.is_success() {
                    failures += 1;
                }
            });
            if failures > 0 {
                bail!("{} of {} state requests failed", failures, count);
            }
            return Ok(());
        }
    };

    println!("{}", outcome);
    match outcome {
        TelemetryOutcome::Success(_) => Ok(()),
        other => bail!("{} request failed: {}", client.base_uri(), other),
    }
}
