use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use xdigest_core::{self as core, AppError, FolderGroup, KeywordSet, MatchStrength};

use crate::selection::Selection;

pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%Hh%M";

// --- Public Output Functions ---

/// `<project>_DOCUMENTATION_<YYYY-MM-DD_HHhMM>.txt`
pub fn default_output_file_name(project_name: &str, now: &DateTime<Local>) -> String {
    format!(
        "{}_DOCUMENTATION_{}.txt",
        project_name,
        now.format(OUTPUT_TIMESTAMP_FORMAT)
    )
}

pub fn resolve_output_path(
    explicit: Option<&Path>,
    project_root: &Path,
    project_name: &str,
) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => project_root.join(default_output_file_name(project_name, &Local::now())),
    }
}

pub fn write_to_file(path: &Path, content: &str) -> core::Result<()> {
    let write_error = |source: io::Error| AppError::FileWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    let mut file = File::create(path).map_err(write_error)?;
    file.write_all(content.as_bytes()).map_err(write_error)?;
    Ok(())
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

pub fn print_json<T: Serialize>(data: &T, pretty: bool) -> Result<()> {
    let content = if pretty {
        serde_json::to_string_pretty(data)
    } else {
        serde_json::to_string(data)
    }
    .map_err(AppError::from)
    .context("Failed to serialize output to JSON")?;
    write_to_stdout(&content)
}

/// Folder headings followed by `[score] name` entries, coloured by match
/// strength. Pre-selected files are starred.
pub fn print_search_results(
    groups: &[FolderGroup],
    keywords: &KeywordSet,
    selection: &Selection,
) -> Result<()> {
    if groups.is_empty() {
        println!("{}", "(No matching files)".dimmed());
        return Ok(());
    }
    for group in groups {
        println!("{} {}", "📁".normal(), group.folder.bold());
        for entry in &group.entries {
            let label = format!("[{}] {}", entry.score, entry.path.file_name());
            let label = match MatchStrength::of(entry.score, keywords) {
                MatchStrength::Strong => label.green(),
                MatchStrength::Medium => label.blue(),
                MatchStrength::Weak | MatchStrength::Unranked => label.normal(),
            };
            let marker = if selection.is_selected(entry.path.as_str()) {
                "⭐".to_string()
            } else {
                "  ".to_string()
            };
            println!("  {} {}", marker, label);
        }
    }
    Ok(())
}

pub fn print_files_table(rows: &[(String, bool)]) -> Result<()> {
    if rows.is_empty() {
        println!("\n{}", "(No candidate files found)".yellow());
        return Ok(());
    }
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Path").fg(Color::Green),
        Cell::new("Suggested").fg(Color::Green),
    ]);
    for (path, suggested) in rows {
        table.add_row(vec![
            Cell::new(path).fg(Color::Cyan),
            Cell::new(if *suggested { "yes" } else { "" })
                .set_alignment(comfy_table::CellAlignment::Center),
        ]);
    }
    println!("{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_name_uses_project_and_minute_timestamp() {
        let now = Local.with_ymd_and_hms(2026, 10, 16, 9, 5, 42).unwrap();
        assert_eq!(
            default_output_file_name("backend", &now),
            "backend_DOCUMENTATION_2026-10-16_09h05.txt"
        );
    }

    #[test]
    fn explicit_output_path_wins() {
        let path = resolve_output_path(Some(Path::new("out/doc.txt")), Path::new("/p"), "p");
        assert_eq!(path, PathBuf::from("out/doc.txt"));

        let path = resolve_output_path(None, Path::new("/p"), "proj");
        assert!(path.starts_with("/p"));
        let file_name = path.file_name().unwrap().to_string_lossy();
        assert!(file_name.starts_with("proj_DOCUMENTATION_"));
        assert!(file_name.ends_with(".txt"));
    }

    #[test]
    fn write_to_file_creates_parent_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("nested/dir/doc.txt");
        write_to_file(&target, "hello").unwrap();
        assert_eq!(fs::read_to_string(target).unwrap(), "hello");
    }

    #[test]
    fn write_to_file_reports_blocked_parent_as_write_error() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("blocker"), "").unwrap();
        let target = temp.path().join("blocker/doc.txt");

        match write_to_file(&target, "hello") {
            Err(AppError::FileWrite { path, .. }) => assert_eq!(path, target),
            other => panic!("expected FileWrite, got {:?}", other),
        }
    }
}
