use crate::cli_args::TreeArgs;
use crate::output::write_to_stdout;
use crate::prepare_scan;
use anyhow::{Context, Result};
use colored::Colorize;
use log;
use xdigest_core::{self as core, KeywordSet};

pub fn handle_tree_command(args: TreeArgs) -> Result<()> {
    let (_project_root, _config, files) = prepare_scan(&args.project_config, &args.filters)?;

    let mut shown = files;
    if let Some(query) = args.query.as_deref() {
        let keywords = KeywordSet::parse(query);
        shown = shown.subset(|path| core::score(path, &keywords) > 0);
        log::info!("Query '{}' matched {} files", query, shown.len());
    }
    if !args.pick.is_empty() {
        let globs = core::build_glob_set(&args.pick).context("Invalid --pick pattern")?;
        shown = shown.subset(|path| globs.is_match(path.as_str()));
    }
    log::debug!("Previewing tree for {} files", shown.len());

    if shown.is_empty() {
        println!("{}", "(No matching files)".dimmed());
        return Ok(());
    }
    write_to_stdout(&core::build_tree(shown.as_slice()).render())
}
