mod commands;
mod logging;
mod progress;
mod prompt;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use fxcache_core::artifact::parse_revision;
use fxcache_core::{AppConfig, CacheEngine, KindFilter};
use progress::CliReporter;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    dotenv().ok();

    // Dropped after `run` returns, so the last log lines reach the file.
    let _guard = logging::init_logger();

    let config = match fxcache_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let args = Cli::parse();

    let Some(command) = args.command else {
        let _ = Cli::command().print_long_help();
        return ExitCode::SUCCESS;
    };

    let root = args
        .root
        .unwrap_or_else(|| PathBuf::from(&config.cache_root));

    match run(command, &config, &root) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &AppConfig, root: &Path) -> Result<()> {
    if !matches!(command, Commands::PrintConfig) {
        ensure_root(config, root)?;
    }

    let reporter = CliReporter::new();
    let engine = CacheEngine::new(config, &reporter);

    match command {
        Commands::Folders { filter, search } => {
            let filter = match filter {
                Some(f) => f.parse::<KindFilter>()?,
                None => config.default_filter,
            };
            let folders = engine.list_folders(root, filter)?;
            for folder in folders
                .iter()
                .filter(|f| matches_search(&f.to_string_lossy(), search.as_deref()))
            {
                println!("{}", folder.display());
            }
        }
        Commands::Sequences { folder, search } => {
            let sequences = engine.list_sequences(&root.join(folder))?;
            for seq in sequences {
                let line = seq.to_string();
                if !matches_search(&line, search.as_deref()) {
                    continue;
                }
                if seq.is_latest {
                    println!("{}", line.green());
                } else {
                    println!("{}", line);
                }
            }
        }
        Commands::Describe {
            folder,
            base_name,
            revision,
        } => {
            let revision = parse_revision(&revision)?;
            let meta = engine.describe(&root.join(folder), &base_name, revision)?;
            println!("{}", "Cache Metadata:".bold());
            println!("{}", meta);
        }
        Commands::Prune {
            folder,
            dry_run,
            yes,
        } => run_prune(&engine, &root.join(folder), dry_run, yes)?,
        Commands::Path { folder } => {
            let path = root.join(folder);
            let path = fs::canonicalize(&path)
                .with_context(|| format!("Cannot resolve {}", path.display()))?;
            println!("Selected Cache: {}", path.display());
        }
        Commands::PrintConfig => {
            println!("Configuration: {:#?}", config);
            println!("Active root: {}", root.display());
        }
    }

    Ok(())
}

fn run_prune(engine: &CacheEngine<'_>, folder: &Path, dry_run: bool, yes: bool) -> Result<()> {
    let plan = engine.plan_superseded(folder)?;
    if plan.is_empty() {
        info!("Nothing to prune in {}", folder.display());
        return Ok(());
    }

    for file in &plan.doomed {
        println!("{} {}", "old:".red(), file.path.display());
    }
    let reclaim_mb = plan.reclaimable_bytes() as f64 / (1024.0 * 1024.0);
    println!(
        "{} files, {} MB in superseded revisions",
        plan.doomed.len().to_string().red(),
        format!("{:.2}", reclaim_mb).red()
    );

    if dry_run {
        println!("Dry run mode: No files were deleted.");
        return Ok(());
    }
    if !yes && !prompt::prompt_confirm("Delete these old cache versions?", Some(false))? {
        return Ok(());
    }

    let report = engine.execute_plan(folder, &plan);
    for dir in &report.removed_dirs {
        println!("{} {}", "removed:".yellow(), dir.display());
    }
    for failure in &report.failures {
        warn!("{}", failure);
    }
    info!("{}", report);
    if !report.is_clean() {
        bail!("{} paths could not be removed", report.failures.len());
    }
    Ok(())
}

/// Directory-existence policy lives here, not in the scanner.
fn ensure_root(config: &AppConfig, root: &Path) -> Result<()> {
    if root.exists() {
        return Ok(());
    }
    if !config.create_missing_root {
        bail!("Cache root {} does not exist", root.display());
    }
    fs::create_dir_all(root)
        .with_context(|| format!("Cannot create cache root {}", root.display()))?;
    info!("Created cache root {}", root.display());
    Ok(())
}

fn matches_search(text: &str, search: Option<&str>) -> bool {
    match search {
        Some(needle) => text.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}
