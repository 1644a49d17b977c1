use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        help = "Specify the directory to scan (default: $PROJECT_ROOT or current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify the project name used for the output file (overrides dir name).",
        value_name = "NAME",
        help_heading = "Project Setup"
    )]
    pub project_name: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterOverrideOpts {
    #[arg(long = "allow-ext", value_name = "EXT", action = clap::ArgAction::Append, help = "Add an allowed file extension (e.g. '.rs', '.env.local').", help_heading = "File Filtering")]
    pub allow_ext: Vec<String>,

    #[arg(long = "block-name", value_name = "NAME", action = clap::ArgAction::Append, help = "Add a file name that is never included.", help_heading = "File Filtering")]
    pub block_name: Vec<String>,

    #[arg(long = "block-contains", value_name = "TEXT", action = clap::ArgAction::Append, help = "Exclude files whose name contains TEXT.", help_heading = "File Filtering")]
    pub block_contains: Vec<String>,

    #[arg(long = "exclude-dir", value_name = "DIR", action = clap::ArgAction::Append, help = "Add a directory name that is never descended into.", help_heading = "File Filtering")]
    pub exclude_dir: Vec<String>,

    #[arg(long = "suggest", value_name = "NAME", action = clap::ArgAction::Append, help = "Add a file name that is pre-selected by default.", help_heading = "File Filtering")]
    pub suggest: Vec<String>,

    #[arg(
        long,
        help = "Start from empty filter sets instead of the built-in defaults.",
        help_heading = "File Filtering"
    )]
    pub no_defaults: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SelectionOpts {
    #[arg(
        long,
        help = "Select every candidate file.",
        conflicts_with = "none",
        help_heading = "Selection"
    )]
    pub all: bool,

    #[arg(
        long,
        help = "Start with nothing selected (suggested files are not pre-selected).",
        help_heading = "Selection"
    )]
    pub none: bool,

    #[arg(
        short = 'k',
        long,
        value_name = "QUERY",
        help = "Select every file matching the free-text keyword query.",
        help_heading = "Selection"
    )]
    pub query: Option<String>,

    #[arg(long = "pick", value_name = "GLOB", action = clap::ArgAction::Append, help = "Select files matching a glob (a trailing '/' picks a directory).", help_heading = "Selection")]
    pub pick: Vec<String>,

    #[arg(long = "skip", value_name = "PATH", action = clap::ArgAction::Append, help = "Leave out one file by its relative path, after all other selection flags.", help_heading = "Selection")]
    pub skip: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FormatOutputOpts {
    #[arg(short = 'f', long, help = "Set the output format.", value_name = "FORMAT", value_parser = ["text", "json"], help_heading = "Output Formatting")]
    pub format: Option<String>,

    #[arg(
        long,
        help = "Pretty-print JSON output.",
        help_heading = "Output Formatting"
    )]
    pub pretty: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "xdigest",
    author,
    version,
    about = "Bundle selected project files into one annotated text document.",
    long_about = "xdigest scans a project for source files, ranks them against keyword queries, \nand writes the selected files into a single document with a directory tree \nand per-file headers, ready to share with a reviewer or an AI assistant.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  xdigest generate --query \"auth order\"\n  xdigest generate --pick 'src/auth/' --stdout\n  xdigest search auth guard\n  xdigest tree --query auth",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        visible_alias = "gen",
        about = "Build the document from the selected files."
    )]
    Generate(GenerateArgs),

    #[command(
        visible_alias = "s",
        about = "Rank candidate files against a keyword query."
    )]
    Search(SearchArgs),

    #[command(
        visible_alias = "t",
        about = "Preview the directory tree of the candidate files."
    )]
    Tree(TreeArgs),

    #[command(
        visible_alias = "d",
        about = "Show effective configuration and candidate files."
    )]
    Debug(DebugArgs),

    #[command(about = "Generate or save shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub filters: FilterOverrideOpts,
    #[clap(flatten)]
    pub selection: SelectionOpts,

    #[arg(
        long,
        help = "Print the document to standard output instead of saving it.",
        help_heading = "Output Control",
        conflicts_with = "output"
    )]
    pub stdout: bool,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Save the document to FILE (default: <project>_DOCUMENTATION_<timestamp>.txt).",
        help_heading = "Output Control"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub filters: FilterOverrideOpts,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,

    #[arg(help = "Keywords to rank by (no keywords lists every candidate).")]
    pub query: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub filters: FilterOverrideOpts,

    #[arg(
        short = 'k',
        long,
        value_name = "QUERY",
        help = "Only show files matching the keyword query.",
        help_heading = "Narrowing"
    )]
    pub query: Option<String>,

    #[arg(long = "pick", value_name = "GLOB", action = clap::ArgAction::Append, help = "Only show files matching a glob (a trailing '/' picks a directory).", help_heading = "Narrowing")]
    pub pick: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DebugArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub filters: FilterOverrideOpts,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_name = "SHELL",
        help = "Shell to generate completions for (fish, bash, zsh) [default: fish]"
    )]
    pub shell: Option<String>,
    #[arg(
        long,
        help = "Save completion script to the standard location for the shell."
    )]
    pub save: bool,
    #[arg(long, requires = "save", help = "Overwrite an existing completion file.")]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_collects_repeated_flags() {
        let cli = Cli::parse_from([
            "xdigest",
            "generate",
            "--pick",
            "src/auth/",
            "--pick",
            "*.sql",
            "--exclude-dir",
            "coverage",
            "-k",
            "auth order",
            "--stdout",
        ]);
        let Some(Commands::Generate(args)) = cli.command else {
            panic!("expected generate command");
        };
        assert_eq!(args.selection.pick, vec!["src/auth/", "*.sql"]);
        assert_eq!(args.filters.exclude_dir, vec!["coverage"]);
        assert_eq!(args.selection.query.as_deref(), Some("auth order"));
        assert!(args.stdout);
    }

    #[test]
    fn stdout_conflicts_with_output() {
        let result = Cli::try_parse_from(["xdigest", "generate", "--stdout", "-o", "out.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn search_takes_free_text_keywords() {
        let cli = Cli::parse_from(["xdigest", "s", "auth", "guard"]);
        let Some(Commands::Search(args)) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.query, vec!["auth", "guard"]);
    }
}
