use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Interactive in-memory filesystem")]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Run the commands of this file instead of reading stdin
    #[clap(long, short)]
    pub script: Option<PathBuf>,

    /// Prompt printed before each interactive command
    #[clap(long, short, default_value = "> ")]
    pub prompt: String,

    #[clap(long)]
    pub no_color: bool,
}
