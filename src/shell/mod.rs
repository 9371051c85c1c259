//! Line-oriented command shell driving a [`Tree`](crate::filesystem::Tree).

mod command;
#[allow(clippy::module_inception)]
mod shell;

pub use command::{Command, CommandError};
pub use shell::{Outcome, Shell, ShellError};
