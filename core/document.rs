use crate::error::AppError;
use crate::tree;
use log;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const HEADER_RULE: &str =
    "================================================================================";
const SECTION_RULE: &str =
    "--------------------------------------------------------------------------------";
const FILE_RULE: &str =
    "################################################################################";

/// A file whose content could not be read while assembling.
#[derive(Debug)]
pub struct ReadFailure {
    pub path: String,
    pub error: AppError,
}

/// The assembled output: header, directory tree, then one section per file.
#[derive(Debug)]
pub struct Document {
    blocks: Vec<String>,
    file_count: usize,
    read_failures: Vec<ReadFailure>,
}

impl Document {
    /// Builds the document for `files`, reading each from `root_dir`.
    ///
    /// An unreadable file gets a placeholder in place of its content and
    /// assembly carries on with the next one.
    pub fn assemble<S: AsRef<str>>(files: &[S], root_dir: &Path) -> Self {
        log::debug!(
            "Assembling document for {} files from {}",
            files.len(),
            root_dir.display()
        );
        let mut blocks = vec![
            HEADER_RULE.to_string(),
            format!("SCAN SELECTED FILES - {} FILES", files.len()),
            format!("{HEADER_RULE}\n"),
            SECTION_RULE.to_string(),
            "📂 DIRECTORY TREE".to_string(),
            SECTION_RULE.to_string(),
            tree::render(&tree::build_tree(files)),
            "\n".to_string(),
        ];
        let mut read_failures = Vec::new();

        for (index, file) in files.iter().enumerate() {
            let rel_path = file.as_ref();
            blocks.push(FILE_RULE.to_string());
            blocks.push(format!("## FILE {}: {}", index + 1, base_name(rel_path)));
            blocks.push(format!("## Path: {rel_path}"));
            blocks.push(format!("{FILE_RULE}\n"));

            let full_path = root_dir.join(rel_path);
            match read_text(&full_path) {
                Ok(content) => blocks.push(content),
                Err(error) => {
                    log::warn!("Unable to read {}: {}", full_path.display(), error);
                    blocks.push(placeholder(&error));
                    read_failures.push(ReadFailure {
                        path: rel_path.to_string(),
                        error,
                    });
                }
            }
            blocks.push("\n\n".to_string());
        }

        log::info!(
            "Document assembled: {} files, {} unreadable",
            files.len(),
            read_failures.len()
        );
        Self {
            blocks,
            file_count: files.len(),
            read_failures,
        }
    }

    pub fn file_count(&self) -> usize {
        self.file_count
    }

    pub fn read_failures(&self) -> &[ReadFailure] {
        &self.read_failures
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.blocks.join("\n"))
    }
}

/// Assembles the document and returns it as one string.
pub fn assemble<S: AsRef<str>>(files: &[S], root_dir: &Path) -> String {
    Document::assemble(files, root_dir).to_string()
}

fn base_name(rel_path: &str) -> &str {
    rel_path.rsplit('/').next().unwrap_or(rel_path)
}

fn read_text(path: &Path) -> Result<String, AppError> {
    let file_read_error = |source: io::Error| AppError::FileRead {
        path: PathBuf::from(path),
        source,
    };
    let bytes = fs::read(path).map_err(file_read_error)?;
    // Non-UTF-8 content is reported, never converted.
    String::from_utf8(bytes)
        .map_err(|e| file_read_error(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn placeholder(error: &AppError) -> String {
    let reason = match error {
        AppError::FileRead { source, .. } => source.to_string(),
        other => other.to_string(),
    };
    format!("[Unable to read file: {reason}]")
}
