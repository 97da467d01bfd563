//! CLI layer: clap definitions and one handler module per subcommand.

pub mod commands;
pub mod parser;
