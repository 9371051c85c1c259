use std::io::{BufRead, Write};
use std::path::Path;

use memfs::shell::{Outcome, Shell};
use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        debug!("Loaded runtime config: {:?}", app_config);

        colored::control::set_override(app_config.colorize);
        let mut shell = Shell::new(app_config.colorize);
        let mut stdout = std::io::stdout().lock();

        match &app_config.script {
            Some(script) => Self::run_script(&mut shell, script, &mut stdout).await,
            None => {
                let stdin = std::io::stdin().lock();
                Self::run_interactive(&mut shell, &app_config.prompt, stdin, &mut stdout)
            }
        }
    }

    /// Executes every line of `script` until it ends or reaches `exit`.
    pub async fn run_script(
        shell: &mut Shell,
        script: &Path,
        out: &mut impl Write,
    ) -> Result<(), ApplicationError> {
        info!("Running script {}", script.display());
        let bytes = compio::fs::read(script).await.context(ScriptReadSnafu {
            file_path: script.display().to_string(),
        })?;
        let contents = String::from_utf8_lossy(&bytes);

        for line in contents.lines() {
            if !Self::emit(shell.execute(line), out)? {
                info!("Script requested exit");
                break;
            }
        }
        Ok(())
    }

    pub fn run_interactive(
        shell: &mut Shell,
        prompt: &str,
        mut input: impl BufRead,
        out: &mut impl Write,
    ) -> Result<(), ApplicationError> {
        let mut line = String::new();
        loop {
            write!(out, "{prompt}").context(StdoutSnafu)?;
            out.flush().context(StdoutSnafu)?;

            line.clear();
            if input.read_line(&mut line).context(StdinSnafu)? == 0 {
                debug!("Reached end of input");
                writeln!(out).context(StdoutSnafu)?;
                return Ok(());
            }
            if !Self::emit(shell.execute(&line), out)? {
                return Ok(());
            }
        }
    }

    /// Prints the outcome of a command; returns false once the shell should stop.
    fn emit(outcome: Outcome, out: &mut impl Write) -> Result<bool, ApplicationError> {
        match outcome {
            Outcome::Output(text) | Outcome::Failure(text) => {
                writeln!(out, "{text}").context(StdoutSnafu)?;
                Ok(true)
            }
            Outcome::Silent => Ok(true),
            Outcome::Exit => Ok(false),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Failed to read the script file: {}", file_path))]
    ScriptReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read from stdin"))]
    StdinError { source: std::io::Error },
    #[snafu(display("Failed to write to stdout"))]
    StdoutError { source: std::io::Error },
}
