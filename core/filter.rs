use crate::config::FilterConfig;
use log;

/// Decides whether a file name is eligible for the candidate set.
///
/// Built once from a [`FilterConfig`]; every configured entry is lower-cased
/// up front so lookups only lower-case the candidate.
#[derive(Debug, Clone)]
pub struct FileFilter {
    blocked_filenames: Vec<String>,
    blocked_name_contains: Vec<String>,
    image_extensions: Vec<String>,
    allowed_extensions: Vec<String>,
}

fn lowered(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}

impl FileFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            blocked_filenames: lowered(&config.blocked_filenames),
            blocked_name_contains: lowered(&config.blocked_name_contains),
            image_extensions: lowered(&config.image_extensions),
            allowed_extensions: lowered(&config.allowed_extensions),
        }
    }

    /// Rules are checked in order and the first match wins: blocked name,
    /// blocked substring, image extension, then allowed extension.
    pub fn is_allowed(&self, filename: &str) -> bool {
        let name = filename.to_lowercase();

        if self.blocked_filenames.iter().any(|b| *b == name) {
            log::trace!("Rejected by blocked filename: {}", filename);
            return false;
        }
        if self
            .blocked_name_contains
            .iter()
            .any(|marker| name.contains(marker.as_str()))
        {
            log::trace!("Rejected by blocked substring: {}", filename);
            return false;
        }
        if self
            .image_extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
        {
            log::trace!("Rejected as image: {}", filename);
            return false;
        }
        // Literal suffix match so multi-part extensions like ".env.example" work.
        self.allowed_extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
