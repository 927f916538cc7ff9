//! Shell completion generation command.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;

/// Name of the installed binary
const BIN_NAME: &str = "maitre";

/// Generate shell completion scripts
#[derive(Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Where the script usually goes for each shell.
    fn install_hint(&self) -> Option<&'static str> {
        match self.shell {
            Shell::Bash => Some("~/.local/share/bash-completion/completions/maitre"),
            Shell::Zsh => Some("~/.zsh/completions/_maitre (a directory on your $fpath)"),
            Shell::Fish => Some("~/.config/fish/completions/maitre.fish"),
            Shell::PowerShell => Some("$PROFILE"),
            _ => None,
        }
    }

    /// Execute the completions command.
    ///
    /// The script goes to stdout; installation hints go to stderr unless
    /// `--quiet` is set.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        if !global.quiet {
            eprintln!("# Generating {} completion script", self.shell);
            if let Some(target) = self.install_hint() {
                eprintln!("# Save it to {target}");
            }
        }

        let mut cmd = Cli::command();
        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());
        Ok(())
    }
}
