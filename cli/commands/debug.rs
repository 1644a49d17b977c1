use crate::cli_args::DebugArgs;
use crate::output::{print_files_table, print_json};
use crate::prepare_scan;
use anyhow::{Context, Result};
use colored::*;
use log;
use serde::Serialize;
use toml;
use xdigest_core::{AppError, Config, FileSet};

#[derive(Debug, Serialize)]
struct DebugInfo<'a> {
    project_root: String,
    project_name: String,
    effective_config: &'a Config,
    candidate_files: &'a FileSet,
    suggested_files: Vec<&'a str>,
}

pub fn handle_debug_command(args: DebugArgs) -> Result<()> {
    let (project_root, config, files) = prepare_scan(&args.project_config, &args.filters)?;

    let debug_data = DebugInfo {
        project_root: project_root.to_string_lossy().to_string(),
        project_name: config.get_effective_project_name(&project_root),
        effective_config: &config,
        candidate_files: &files,
        suggested_files: files
            .iter()
            .filter(|p| config.filter.is_suggested(p.file_name()))
            .map(|p| p.as_str())
            .collect(),
    };

    if args.format_output.format.as_deref() == Some("json") {
        log::debug!("Debug: Printing structured output...");
        print_json(&debug_data, args.format_output.pretty)
    } else {
        log::debug!("Debug: Printing pretty output...");
        print_debug_info_pretty(&debug_data)
    }
}

fn print_debug_info_pretty(debug_info: &DebugInfo) -> Result<()> {
    println!(
        "{}",
        "\n--- Effective Configuration ---"
            .green()
            .bold()
            .underline()
    );
    println!("{:<16} {}", "Project root:".green(), debug_info.project_root.cyan());
    println!("{:<16} {}", "Project name:".green(), debug_info.project_name.cyan());
    let config_toml = toml::to_string_pretty(debug_info.effective_config)
        .map_err(AppError::from)
        .context("Failed to serialize effective config to TOML")?;
    println!("{}", config_toml);

    println!(
        "{}",
        format!(
            "\n--- Candidate Files ({}) ---",
            debug_info.candidate_files.len()
        )
        .green()
        .bold()
        .underline()
    );
    let rows: Vec<(String, bool)> = debug_info
        .candidate_files
        .iter()
        .map(|p| {
            (
                p.as_str().to_string(),
                debug_info.suggested_files.contains(&p.as_str()),
            )
        })
        .collect();
    print_files_table(&rows)?;

    println!("{}", "\n--- End Debug Info ---".green().bold());
    Ok(())
}
