use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "voxnote")]
#[command(about = "Voice notes with AI structuring", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print version information
    Version,
    /// Inspect or configure the AI completion provider
    Provider(ProviderCliArgs),
    /// Search and view saved notes
    Notes(NotesCliArgs),
}

#[derive(ClapArgs, Debug)]
pub struct ProviderCliArgs {
    #[command(subcommand)]
    pub command: Option<ProviderCommand>,
}

#[derive(Subcommand, Debug)]
pub enum ProviderCommand {
    /// Show the current provider configuration
    Show,
    /// Run the interactive provider configuration wizard
    Configure {
        /// Show what would change without saving
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate the configured provider, optionally structuring sample text
    Test {
        /// Sample text to structure through the provider
        #[arg(long)]
        text: Option<String>,
    },
    /// Reset provider configuration to defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(ClapArgs, Debug)]
pub struct NotesCliArgs {
    /// Search query to filter notes by content
    #[arg(short, long)]
    pub query: Option<String>,
    /// Filter by start date (YYYY-MM-DD format)
    #[arg(long)]
    pub from: Option<String>,
    /// Filter by end date (YYYY-MM-DD format)
    #[arg(long)]
    pub to: Option<String>,
    /// Maximum number of results to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
    /// ID of a specific note to copy to clipboard
    #[arg(short, long)]
    pub copy: Option<String>,
    /// ID of a specific note to export as a text file
    #[arg(short, long)]
    pub export: Option<String>,
    /// Output path for --export (defaults to <title>.txt)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
