use crate::cli_args::SearchArgs;
use crate::output::{print_json, print_search_results};
use crate::prepare_scan;
use crate::selection::Selection;
use anyhow::Result;
use log;
use xdigest_core::{self as core, KeywordSet};

pub fn handle_search_command(args: SearchArgs) -> Result<()> {
    let (_project_root, config, files) = prepare_scan(&args.project_config, &args.filters)?;

    let query = args.query.join(" ");
    let keywords = KeywordSet::parse(&query);
    log::debug!("Searching {} files for {:?}", files.len(), query);

    let groups = core::group_by_folder(core::rank(&files, &keywords));

    match args.format_output.format.as_deref() {
        Some("json") => print_json(&groups, args.format_output.pretty),
        _ => {
            let selection = Selection::new(&files, &config.filter);
            print_search_results(&groups, &keywords, &selection)
        }
    }
}
