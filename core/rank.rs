//! Keyword scoring of candidate paths.
//!
//! Every keyword contributes points by the most specific place it matches:
//! the file name, the folder, the full path, or, failing those, an in-order
//! subsequence of the full path. A query without keywords ranks every path
//! with [`UNRANKED_SCORE`].

use crate::scan::{CandidatePath, FileSet};
#[cfg(feature = "serde_support")]
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Score given to every path when the query has no keywords.
pub const UNRANKED_SCORE: u32 = 999;

pub const NAME_MATCH_POINTS: u32 = 6;
pub const FOLDER_MATCH_POINTS: u32 = 4;
pub const PATH_MATCH_POINTS: u32 = 2;
pub const FUZZY_MATCH_POINTS: u32 = 1;

pub const ROOT_FOLDER_LABEL: &str = "(root)";

/// Lower-cased query tokens in the order they were typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn parse(query: &str) -> Self {
        Self {
            keywords: query
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
pub struct ScoredPath {
    pub path: CandidatePath,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
#[cfg_attr(feature = "serde_support", serde(rename_all = "snake_case"))]
pub enum MatchStrength {
    Unranked,
    Strong,
    Medium,
    Weak,
}

impl MatchStrength {
    /// Strength of a score produced for `keywords`. Unranked only when there
    /// were no keywords, since a long query can legitimately sum to the
    /// sentinel value.
    pub fn of(score: u32, keywords: &KeywordSet) -> Self {
        if keywords.is_empty() {
            return MatchStrength::Unranked;
        }
        match score {
            s if s >= 8 => MatchStrength::Strong,
            s if s >= 4 => MatchStrength::Medium,
            _ => MatchStrength::Weak,
        }
    }
}

/// Entries sharing one folder, best match first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize))]
pub struct FolderGroup {
    pub folder: String,
    pub entries: Vec<ScoredPath>,
}

/// True when every char of `needle` appears in `haystack` in order.
pub fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut remaining = haystack.chars();
    needle
        .chars()
        .all(|wanted| remaining.by_ref().any(|c| c == wanted))
}

fn keyword_points(keyword: &str, name: &str, folder: &str, full: &str) -> u32 {
    if name.contains(keyword) {
        NAME_MATCH_POINTS
    } else if folder.contains(keyword) {
        FOLDER_MATCH_POINTS
    } else if full.contains(keyword) {
        PATH_MATCH_POINTS
    } else if is_subsequence(keyword, full) {
        FUZZY_MATCH_POINTS
    } else {
        0
    }
}

pub fn score(path: &CandidatePath, keywords: &KeywordSet) -> u32 {
    if keywords.is_empty() {
        return UNRANKED_SCORE;
    }
    let full = path.as_str().to_lowercase();
    let name = path.file_name().to_lowercase();
    let folder = path.folder().to_lowercase();

    keywords
        .iter()
        .map(|kw| keyword_points(kw, &name, &folder, &full))
        .sum()
}

/// Scores every path and drops those that matched nothing. Output keeps the
/// file set order.
pub fn rank(files: &FileSet, keywords: &KeywordSet) -> Vec<ScoredPath> {
    let ranked: Vec<ScoredPath> = files
        .iter()
        .filter_map(|path| {
            let score = score(path, keywords);
            (score > 0).then(|| ScoredPath {
                path: path.clone(),
                score,
            })
        })
        .collect();
    log::debug!(
        "Ranked {} of {} paths for {} keywords",
        ranked.len(),
        files.len(),
        keywords.len()
    );
    ranked
}

/// Higher score first, then ascending path.
pub fn compare_ranked(a: &ScoredPath, b: &ScoredPath) -> Ordering {
    b.score.cmp(&a.score).then_with(|| a.path.cmp(&b.path))
}

/// Groups ranked paths by folder. Groups are ordered by folder name and
/// entries by [`compare_ranked`]. Top-level files go under
/// [`ROOT_FOLDER_LABEL`].
pub fn group_by_folder(ranked: Vec<ScoredPath>) -> Vec<FolderGroup> {
    let mut grouped: BTreeMap<String, Vec<ScoredPath>> = BTreeMap::new();
    for entry in ranked {
        let folder = match entry.path.folder() {
            "" => ROOT_FOLDER_LABEL.to_string(),
            other => other.to_string(),
        };
        grouped.entry(folder).or_default().push(entry);
    }

    grouped
        .into_iter()
        .map(|(folder, mut entries)| {
            entries.sort_by(compare_ranked);
            FolderGroup { folder, entries }
        })
        .collect()
}
