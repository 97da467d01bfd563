use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;

/// Create the config file and the records directory layout.
pub fn handle(cli: &Cli) -> AppResult<()> {
    Config::init_all(cli.root.clone(), cli.test)?;
    Ok(())
}
