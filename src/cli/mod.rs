/// CLI argument parsing and command handling - Gateway
mod args;
mod commands;

pub use args::{Cli, Commands, TokenCommands};
pub use commands::{connect, handle_command, print_upload, show_version};
