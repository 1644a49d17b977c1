mod cli_args;
mod commands;
mod output;
mod selection;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use log;
use std::path::PathBuf;
use std::process;

use cli_args::{Cli, Commands, FilterOverrideOpts, ProjectConfigOpts};
use xdigest_core::{AppError, Config, FileSet, FilterConfig};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);
            // Selection and argument errors are always shown, even when quiet.
            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::EmptySelection) => 1,
        Some(AppError::Io(_)) => 2,
        Some(AppError::ScanTraversal { .. }) => 2,
        Some(AppError::FileRead { .. }) => 2,
        Some(AppError::FileWrite { .. }) => 2,
        Some(AppError::InvalidPath(_)) => 5,
        Some(AppError::Glob(_)) => 5,
        Some(AppError::InvalidArgument(_)) => 5,
        Some(AppError::TomlSerialize(_)) => 6,
        Some(AppError::JsonSerialize(_)) => 6,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            Cli::command().print_help()?;
        }
        Some(command) => match command {
            Commands::Generate(args) => {
                log::debug!("Executing 'generate' command...");
                commands::generate::handle_generate_command(args, quiet)?;
            }
            Commands::Search(args) => {
                log::debug!("Executing 'search' command...");
                commands::search::handle_search_command(args)?;
            }
            Commands::Tree(args) => {
                log::debug!("Executing 'tree' command...");
                commands::tree::handle_tree_command(args)?;
            }
            Commands::Debug(args) => {
                log::debug!("Executing 'debug' command...");
                commands::debug::handle_debug_command(args)?;
            }
            Commands::Completion(args) => {
                log::debug!("Executing 'completion' command...");
                commands::completion::handle_completion_command(&args, quiet)?;
            }
        },
    }
    Ok(())
}

fn merge_filter_overrides(mut filter: FilterConfig, opts: &FilterOverrideOpts) -> FilterConfig {
    log::trace!("Applying filter CLI overrides to config...");
    filter.allowed_extensions.extend(opts.allow_ext.iter().cloned());
    filter.blocked_filenames.extend(opts.block_name.iter().cloned());
    filter
        .blocked_name_contains
        .extend(opts.block_contains.iter().cloned());
    filter.excluded_dirs.extend(opts.exclude_dir.iter().cloned());
    filter.suggested_files.extend(opts.suggest.iter().cloned());
    filter
}

/// Built-in defaults (or empty sets with `--no-defaults`) plus the CLI
/// overrides.
pub fn build_config_for_command(
    project_opts: &ProjectConfigOpts,
    filter_opts: &FilterOverrideOpts,
) -> Config {
    let base_filter = if filter_opts.no_defaults {
        log::debug!("Built-in filter defaults disabled via CLI flag.");
        FilterConfig::empty()
    } else {
        FilterConfig::default()
    };

    let mut config = Config::default();
    config.general.project_name = project_opts.project_name.clone();
    config.filter = merge_filter_overrides(base_filter, filter_opts);
    log::trace!("Config after CLI overrides: {:?}", config);
    config
}

/// Resolves the project root, builds the config and scans once.
pub fn prepare_scan(
    project_opts: &ProjectConfigOpts,
    filter_opts: &FilterOverrideOpts,
) -> Result<(PathBuf, Config, FileSet)> {
    let project_root = Config::determine_project_root(project_opts.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = build_config_for_command(project_opts, filter_opts);
    let files = xdigest_core::scan(&project_root, &config.filter)
        .context("Failed to scan project files")?;
    Ok((project_root, config, files))
}
