mod args;
mod notes;
mod provider;

pub use args::{Cli, CliCommand, NotesCliArgs, ProviderCliArgs, ProviderCommand};
pub use notes::handle_notes_command;
pub use provider::handle_provider_command;
