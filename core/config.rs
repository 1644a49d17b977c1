use crate::error::{AppError, Result};
use log;
#[cfg(feature = "serde_support")]
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};

pub const PROJECT_ROOT_ENV: &str = "PROJECT_ROOT";

pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
    ".ts",
    ".tsx",
    ".mjs",
    ".json",
    ".sql",
    ".css",
    ".env",
    ".env.example",
];
pub const DEFAULT_BLOCKED_FILENAMES: &[&str] = &[".gitignore", "package-lock.json"];
pub const DEFAULT_BLOCKED_NAME_CONTAINS: &[&str] = &["eslint.config", "tsconfig"];
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".svg", ".ico", ".webp"];
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules", "dist", ".next", "test", "__tests__"];
pub const DEFAULT_SUGGESTED_FILES: &[&str] = &[
    "supabase.sql",
    "supabase.service.ts",
    "api-client.ts",
    "auth.service.ts",
    "auth.module.ts",
    "auth.controller.ts",
    "order.controller.ts",
    "order.service.ts",
    "order.module.ts",
];

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
pub struct Config {
    pub general: GeneralConfig,
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
pub struct GeneralConfig {
    #[cfg_attr(
        feature = "serde_support",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub project_name: Option<String>,
}

/// Name sets consulted by the filter, the scanner and the selection layer.
///
/// Entries are matched case-insensitively; they are lower-cased when a
/// [`crate::filter::FileFilter`] is built from them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
pub struct FilterConfig {
    pub allowed_extensions: Vec<String>,
    pub blocked_filenames: Vec<String>,
    pub blocked_name_contains: Vec<String>,
    pub image_extensions: Vec<String>,
    pub excluded_dirs: Vec<String>,
    /// Only used for default pre-selection, never for eligibility.
    pub suggested_files: Vec<String>,
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: to_owned_list(DEFAULT_ALLOWED_EXTENSIONS),
            blocked_filenames: to_owned_list(DEFAULT_BLOCKED_FILENAMES),
            blocked_name_contains: to_owned_list(DEFAULT_BLOCKED_NAME_CONTAINS),
            image_extensions: to_owned_list(DEFAULT_IMAGE_EXTENSIONS),
            excluded_dirs: to_owned_list(DEFAULT_EXCLUDED_DIRS),
            suggested_files: to_owned_list(DEFAULT_SUGGESTED_FILES),
        }
    }
}

impl FilterConfig {
    /// A configuration with every set empty. Nothing is eligible until
    /// allowed extensions are added.
    pub fn empty() -> Self {
        Self {
            allowed_extensions: Vec::new(),
            blocked_filenames: Vec::new(),
            blocked_name_contains: Vec::new(),
            image_extensions: Vec::new(),
            excluded_dirs: Vec::new(),
            suggested_files: Vec::new(),
        }
    }

    pub fn is_excluded_dir(&self, dir_name: &str) -> bool {
        let lowered = dir_name.to_lowercase();
        self.excluded_dirs
            .iter()
            .any(|d| d.to_lowercase() == lowered)
    }

    pub fn is_suggested(&self, file_name: &str) -> bool {
        let lowered = file_name.to_lowercase();
        self.suggested_files
            .iter()
            .any(|s| s.to_lowercase() == lowered)
    }
}

impl Config {
    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_str_opt = cli_project_root
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env::var(PROJECT_ROOT_ENV).ok().filter(|s| !s.is_empty()));

        let path_to_resolve = match path_str_opt {
            Some(p_str) => PathBuf::from(shellexpand::tilde(&p_str).as_ref()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        log::trace!("Resolving project root from: {}", path_to_resolve.display());
        path_to_resolve
            .canonicalize()
            .map_err(|e| AppError::ScanTraversal {
                path: path_to_resolve.clone(),
                source: e,
            })
    }

    pub fn get_effective_project_name(&self, project_root: &Path) -> String {
        self.general.project_name.clone().unwrap_or_else(|| {
            project_root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "UnknownProject".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_config_matches_builtin_sets() {
        let cfg = FilterConfig::default();
        assert!(cfg.allowed_extensions.contains(&".env.example".to_string()));
        assert!(cfg.excluded_dirs.contains(&"node_modules".to_string()));
        assert_eq!(cfg.suggested_files.len(), DEFAULT_SUGGESTED_FILES.len());
    }

    #[test]
    fn excluded_dir_and_suggested_lookups_ignore_case() {
        let cfg = FilterConfig::default();
        assert!(cfg.is_excluded_dir("Node_Modules"));
        assert!(cfg.is_excluded_dir("TEST"));
        assert!(!cfg.is_excluded_dir("tests"));
        assert!(cfg.is_suggested("Auth.Service.ts"));
        assert!(!cfg.is_suggested("auth.service.tsx"));
    }

    #[test]
    fn project_name_falls_back_to_directory_name() {
        let mut config = Config::default();
        assert_eq!(
            config.get_effective_project_name(Path::new("/work/shop-backend")),
            "shop-backend"
        );
        config.general.project_name = Some("custom".to_string());
        assert_eq!(
            config.get_effective_project_name(Path::new("/work/shop-backend")),
            "custom"
        );
    }

    #[test]
    fn missing_project_root_is_a_traversal_error() {
        let missing = PathBuf::from("/definitely/not/here/xdigest");
        let err = Config::determine_project_root(Some(&missing)).unwrap_err();
        assert!(matches!(err, AppError::ScanTraversal { .. }));
    }
}
