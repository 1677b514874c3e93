//! Completions command - Print shell completion scripts for lbh

use std::io::{self, Write};

use clap::Command;
use clap_complete::{generate, shells};
use colored::Colorize;
use serde::Serialize;

use crate::output::{self, OutputConfig, OutputFormat, Outputter};

const BIN_NAME: &str = "lbh";

/// Supported shells for completion generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shell::Bash => write!(f, "bash"),
            Shell::Zsh => write!(f, "zsh"),
            Shell::Fish => write!(f, "fish"),
            Shell::PowerShell => write!(f, "powershell"),
        }
    }
}

/// How to install the completion script for a shell
#[derive(Debug, Serialize)]
pub struct CompletionInstructions {
    pub shell: String,
    pub steps: Vec<String>,
}

impl Outputter for CompletionInstructions {
    fn to_table(&self, _config: &OutputConfig) -> String {
        let mut output = format!(
            "{} completions for {}\n\n",
            BIN_NAME.cyan().bold(),
            self.shell.yellow()
        );
        for step in &self.steps {
            output.push_str(&format!("  {}\n", step));
        }
        output
    }
}

fn instructions(shell: Shell) -> Vec<String> {
    let steps: &[&str] = match shell {
        Shell::Bash => &[
            "# Add to ~/.bashrc:",
            "eval \"$(lbh completions bash)\"",
        ],
        Shell::Zsh => &[
            "# Save into a directory on fpath, before compinit runs:",
            "lbh completions zsh > ~/.zfunc/_lbh",
        ],
        Shell::Fish => &["lbh completions fish > ~/.config/fish/completions/lbh.fish"],
        Shell::PowerShell => &[
            "# Add to $PROFILE:",
            "Invoke-Expression (& lbh completions powershell | Out-String)",
        ],
    };
    steps.iter().map(|s| s.to_string()).collect()
}

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    match shell {
        Shell::Bash => generate(shells::Bash, cmd, BIN_NAME, out),
        Shell::Zsh => generate(shells::Zsh, cmd, BIN_NAME, out),
        Shell::Fish => generate(shells::Fish, cmd, BIN_NAME, out),
        Shell::PowerShell => generate(shells::PowerShell, cmd, BIN_NAME, out),
    }
}

/// Run the completions command.
///
/// Prints the script itself unless `show_instructions` is set.
pub fn run(
    shell: Shell,
    cmd: &mut Command,
    show_instructions: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if show_instructions {
        let info = CompletionInstructions {
            shell: shell.to_string(),
            steps: instructions(shell),
        };
        return output::print(&info, format);
    }
    write_completions(shell, cmd, &mut io::stdout());
    Ok(())
}
