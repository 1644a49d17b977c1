use globset::GlobSet;
use indexmap::IndexMap;
use log;
use xdigest_core::{self as core, AppError, CandidatePath, FileSet, FilterConfig, KeywordSet};

use crate::cli_args::SelectionOpts;

/// Inclusion map over a scanned file set.
///
/// Paths keep the file set order, which is also the order of the sections
/// in the generated document.
#[derive(Debug, Clone)]
pub struct Selection {
    included: IndexMap<CandidatePath, bool>,
}

impl Selection {
    /// Starts with every suggested file selected.
    pub fn new(files: &FileSet, config: &FilterConfig) -> Self {
        let included = files
            .iter()
            .map(|path| (path.clone(), config.is_suggested(path.file_name())))
            .collect();
        Self { included }
    }

    /// Applies the command-line selection flags on top of the suggested
    /// pre-selection. `--none` clears first, `--all`, `--query` and `--pick`
    /// add, and `--skip` removes single paths last.
    pub fn from_opts(
        files: &FileSet,
        config: &FilterConfig,
        opts: &SelectionOpts,
    ) -> core::Result<Self> {
        let mut selection = Self::new(files, config);
        if opts.none {
            selection.unselect_all();
        }
        if opts.all {
            selection.select_all();
        }
        if let Some(query) = opts.query.as_deref() {
            let added = selection.select_ranked(files, &KeywordSet::parse(query));
            log::info!("Query '{}' selected {} files", query, added);
        }
        if !opts.pick.is_empty() {
            let globs = core::build_glob_set(&opts.pick)?;
            let added = selection.select_matching(files, &globs);
            log::info!("Pick patterns selected {} files", added);
        }
        for path in &opts.skip {
            let normalized = path.replace('\\', "/");
            if !selection.set(&normalized, false) {
                log::warn!("--skip path is not a candidate file: {}", path);
            }
        }
        log::debug!(
            "Selection ready: {} of {} files",
            selection.selected_count(),
            selection.len()
        );
        Ok(selection)
    }

    pub fn len(&self) -> usize {
        self.included.len()
    }

    pub fn select_all(&mut self) {
        self.included.values_mut().for_each(|v| *v = true);
    }

    pub fn unselect_all(&mut self) {
        self.included.values_mut().for_each(|v| *v = false);
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.included.get(path).copied().unwrap_or(false)
    }

    /// Selects every file with a positive score. An empty query selects
    /// nothing. Returns how many files were newly selected.
    pub fn select_ranked(&mut self, files: &FileSet, keywords: &KeywordSet) -> usize {
        if keywords.is_empty() {
            return 0;
        }
        core::rank(files, keywords)
            .into_iter()
            .filter(|scored| self.mark(scored.path.as_str()))
            .count()
    }

    pub fn select_matching(&mut self, files: &FileSet, globs: &GlobSet) -> usize {
        files
            .matching(globs)
            .filter(|path| self.mark(path.as_str()))
            .count()
    }

    /// Includes or excludes one path. Returns false for paths outside the
    /// scanned set, which are left alone.
    pub fn set(&mut self, path: &str, included: bool) -> bool {
        match self.included.get_mut(path) {
            Some(flag) => {
                *flag = included;
                true
            }
            None => false,
        }
    }

    fn mark(&mut self, path: &str) -> bool {
        match self.included.get_mut(path) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    pub fn selected_count(&self) -> usize {
        self.included.values().filter(|v| **v).count()
    }

    pub fn selected(&self) -> Vec<CandidatePath> {
        self.included
            .iter()
            .filter(|(_, included)| **included)
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// Final list handed to the document assembler.
    pub fn confirm(&self) -> core::Result<Vec<CandidatePath>> {
        let selected = self.selected();
        if selected.is_empty() {
            return Err(AppError::EmptySelection);
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_set(paths: &[&str]) -> FileSet {
        FileSet::from_paths(paths.iter().map(|p| CandidatePath::new(*p).unwrap()))
    }

    fn names(paths: &[CandidatePath]) -> Vec<&str> {
        paths.iter().map(|p| p.as_str()).collect()
    }

    fn sample() -> FileSet {
        file_set(&[
            "src/auth/auth.service.ts",
            "src/auth/guards/roles.guard.ts",
            "src/order/order.service.ts",
            "src/main.ts",
            "supabase.sql",
        ])
    }

    #[test]
    fn suggested_files_start_selected() {
        let selection = Selection::new(&sample(), &FilterConfig::default());
        assert_eq!(
            names(&selection.selected()),
            vec![
                "src/auth/auth.service.ts",
                "src/order/order.service.ts",
                "supabase.sql"
            ]
        );
    }

    #[test]
    fn select_all_and_unselect_all() {
        let mut selection = Selection::new(&sample(), &FilterConfig::default());
        selection.select_all();
        assert_eq!(selection.selected_count(), 5);
        selection.unselect_all();
        assert_eq!(selection.selected_count(), 0);
    }

    #[test]
    fn ranked_selection_adds_positive_scores_only() {
        let files = sample();
        let mut selection = Selection::new(&files, &FilterConfig::empty());
        let added = selection.select_ranked(&files, &KeywordSet::parse("guard"));
        assert_eq!(added, 1);
        assert_eq!(
            names(&selection.selected()),
            vec!["src/auth/guards/roles.guard.ts"]
        );
        assert_eq!(selection.select_ranked(&files, &KeywordSet::parse("  ")), 0);
    }

    #[test]
    fn pick_patterns_select_directories() {
        let files = sample();
        let mut selection = Selection::new(&files, &FilterConfig::empty());
        let globs = core::build_glob_set(&["src/auth/".to_string()]).unwrap();
        assert_eq!(selection.select_matching(&files, &globs), 2);
        assert_eq!(selection.select_matching(&files, &globs), 0);
    }

    #[test]
    fn set_toggles_a_single_path() {
        let mut selection = Selection::new(&sample(), &FilterConfig::default());
        assert!(selection.set("src/main.ts", true));
        assert!(selection.set("supabase.sql", false));
        assert!(selection.is_selected("src/main.ts"));
        assert!(!selection.is_selected("supabase.sql"));
        assert_eq!(
            names(&selection.selected()),
            vec![
                "src/auth/auth.service.ts",
                "src/main.ts",
                "src/order/order.service.ts"
            ]
        );

        assert!(!selection.set("src/unknown.ts", true));
        assert!(!selection.is_selected("src/unknown.ts"));
        assert_eq!(selection.selected_count(), 3);
    }

    #[test]
    fn from_opts_combines_flags() {
        let files = sample();
        let opts = SelectionOpts {
            none: true,
            query: Some("order".to_string()),
            pick: vec!["*.sql".to_string()],
            ..Default::default()
        };
        let selection = Selection::from_opts(&files, &FilterConfig::default(), &opts).unwrap();
        assert_eq!(
            names(&selection.selected()),
            vec!["src/order/order.service.ts", "supabase.sql"]
        );
    }

    #[test]
    fn skip_wins_over_other_flags() {
        let files = sample();
        let opts = SelectionOpts {
            all: true,
            skip: vec!["src/main.ts".to_string(), "missing.ts".to_string()],
            ..Default::default()
        };
        let selection = Selection::from_opts(&files, &FilterConfig::default(), &opts).unwrap();
        assert_eq!(selection.selected_count(), 4);
        assert!(!selection.is_selected("src/main.ts"));
    }

    #[test]
    fn confirm_rejects_empty_selection() {
        let selection = Selection::new(&sample(), &FilterConfig::empty());
        assert!(matches!(selection.confirm(), Err(AppError::EmptySelection)));
    }
}
