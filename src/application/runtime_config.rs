use std::path::PathBuf;

use supports_color::Stream;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub script: Option<PathBuf>,
    pub prompt: String,
    pub colorize: bool,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            script: cli.script,
            prompt: cli.prompt,
            colorize: !cli.no_color && supports_color::on(Stream::Stdout).is_some(),
        }
    }
}
