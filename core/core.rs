pub mod config;
pub mod document;
pub mod error;
pub mod filter;
pub mod rank;
pub mod scan;
pub mod tree;

pub use config::{Config, FilterConfig, GeneralConfig};
pub use document::{Document, ReadFailure, assemble};
pub use error::{AppError, Result};
pub use filter::FileFilter;
pub use rank::{
    FolderGroup, KeywordSet, MatchStrength, ScoredPath, UNRANKED_SCORE, group_by_folder, rank,
    score,
};
pub use scan::{CandidatePath, FileSet, Scanner, build_glob_set, scan};
pub use tree::{TreeNode, build_tree, render};
