use crate::cli_args::GenerateArgs;
use crate::output;
use crate::prepare_scan;
use crate::selection::Selection;
use anyhow::{Context, Result};
use byte_unit::{Byte, UnitType};
use colored::Colorize;
use log;
use xdigest_core::Document;

pub fn handle_generate_command(args: GenerateArgs, quiet: bool) -> Result<()> {
    let (project_root, config, files) = prepare_scan(&args.project_config, &args.filters)?;

    if files.is_empty() {
        if !quiet {
            println!("No valid files found.");
        }
        return Ok(());
    }

    let selection = Selection::from_opts(&files, &config.filter, &args.selection)
        .context("Failed to build file selection")?;
    let selected = selection
        .confirm()
        .context("Nothing to generate; use --all, --query or --pick to select files")?;
    log::info!(
        "Generating document for {} of {} files",
        selected.len(),
        files.len()
    );

    let document = Document::assemble(&selected, &project_root);
    let content = document.to_string();

    if !quiet && !document.read_failures().is_empty() {
        eprintln!(
            "\n{}",
            "⚠️ Warning: Some files could not be read:".yellow()
        );
        for failure in document.read_failures() {
            eprintln!(" - {}: {}", failure.path, failure.error);
        }
        eprintln!("---");
    }

    if args.stdout {
        log::debug!("Writing document to stdout...");
        return output::write_to_stdout(&content);
    }

    let project_name = config.get_effective_project_name(&project_root);
    let output_path = output::resolve_output_path(
        args.output.as_deref(),
        &project_root,
        &project_name,
    );
    log::info!("Saving document to file: {}", output_path.display());
    output::write_to_file(&output_path, &content).context("Failed to save document")?;

    if !quiet {
        let size = Byte::from_u64(content.len() as u64)
            .get_appropriate_unit(UnitType::Binary)
            .to_string();
        println!(
            "{} DONE! File generated: {} ({} files, {})",
            "✅".green(),
            output_path.display().to_string().blue(),
            document.file_count(),
            size
        );
    }
    Ok(())
}
