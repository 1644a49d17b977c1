use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use colored::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use xdigest_core::AppError;

use crate::cli_args::{Cli, CompletionArgs};

fn parse_shell(shell_str: &str) -> Result<Shell, AppError> {
    match shell_str.to_lowercase().as_str() {
        "fish" => Ok(Shell::Fish),
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        _ => Err(AppError::InvalidArgument(format!(
            "Unsupported shell for completion: {}",
            shell_str
        ))),
    }
}

fn completion_target(shell: Shell, bin_name: &str) -> Option<PathBuf> {
    match shell {
        Shell::Fish => dirs::config_dir()
            .map(|p| p.join("fish").join("completions").join(format!("{}.fish", bin_name))),
        Shell::Bash => dirs::config_dir()
            .map(|p| p.join("bash_completion.d").join(format!("{}.bash", bin_name))),
        Shell::Zsh => dirs::data_local_dir()
            .map(|p| p.join("zsh").join("site-functions").join(format!("_{}", bin_name))),
        _ => None,
    }
}

pub fn handle_completion_command(args: &CompletionArgs, quiet: bool) -> Result<()> {
    let shell_str = args.shell.as_deref().unwrap_or("fish");
    let shell = parse_shell(shell_str)?;

    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    if !args.save {
        generate(shell, &mut command, bin_name, &mut io::stdout());
        return Ok(());
    }

    let target = completion_target(shell, &bin_name)
        .ok_or_else(|| anyhow::anyhow!("No standard completion directory for {}", shell_str))?;
    let mut script = Vec::new();
    generate(shell, &mut command, bin_name, &mut script);
    save_script(&target, &script, args.force)
        .with_context(|| format!("Failed to save {} completions", shell_str))?;

    if !quiet {
        println!(
            "{} {} completions saved to: {}",
            "✅".green(),
            shell_str.cyan(),
            target.display().to_string().blue()
        );
    }
    Ok(())
}

/// Writes the script, refusing to replace an existing file unless forced.
fn save_script(target: &Path, script: &[u8], force: bool) -> Result<(), AppError> {
    if target.exists() && !force {
        return Err(AppError::InvalidArgument(format!(
            "'{}' already exists; pass --force to overwrite",
            target.display()
        )));
    }
    let write_error = |source: io::Error| AppError::FileWrite {
        path: target.to_path_buf(),
        source,
    };
    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir).map_err(write_error)?;
    }
    fs::write(target, script).map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_shells_case_insensitively() {
        assert_eq!(parse_shell("Fish").unwrap(), Shell::Fish);
        assert_eq!(parse_shell("BASH").unwrap(), Shell::Bash);
        assert_eq!(parse_shell("zsh").unwrap(), Shell::Zsh);
        assert!(matches!(
            parse_shell("powershell"),
            Err(AppError::InvalidArgument(_))
        ));
    }

    #[test]
    fn existing_script_is_kept_without_force() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("fish/completions/xdigest.fish");

        save_script(&target, b"first", false).unwrap();
        assert!(matches!(
            save_script(&target, b"second", false),
            Err(AppError::InvalidArgument(_))
        ));
        assert_eq!(fs::read_to_string(&target).unwrap(), "first");

        save_script(&target, b"second", true).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
    }

    #[test]
    fn zsh_target_uses_underscore_prefix() {
        if let Some(path) = completion_target(Shell::Zsh, "xdigest") {
            assert_eq!(path.file_name().unwrap(), "_xdigest");
        }
    }
}
