use colored::Colorize;
use snafu::Snafu;
use tracing::{debug, error};

use crate::filesystem::projection::{self, ProjectionError};
use crate::filesystem::{NodeKind, SEPARATOR, Tree, TreeError};
use crate::shell::{Command, CommandError};

/// What the caller should do after a line has been executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Output(String),
    Failure(String),
    Silent,
    Exit,
}

/// Interactive front-end over a single [`Tree`].
#[derive(Debug, Default)]
pub struct Shell {
    tree: Tree,
    colorize: bool,
}

impl Shell {
    pub fn new(colorize: bool) -> Self {
        Shell {
            tree: Tree::new(),
            colorize,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn execute(&mut self, line: &str) -> Outcome {
        match self.try_execute(line) {
            Ok(outcome) => outcome,
            Err(e) => {
                if let ShellError::Tree { source } = &e
                    && source.is_internal()
                {
                    error!("Tree invariant violated: {}", source);
                }
                debug!("Command '{}' failed: {}", line.trim(), e);
                let message = e.to_string();
                if self.colorize {
                    Outcome::Failure(message.as_str().red().to_string())
                } else {
                    Outcome::Failure(message)
                }
            }
        }
    }

    fn try_execute(&mut self, line: &str) -> Result<Outcome, ShellError> {
        let command = Command::try_from(line)?;
        debug!("Executing {:?}", command);

        let outcome = match command {
            Command::Empty => Outcome::Silent,
            Command::List { path } => {
                let listing = self.tree.list(path)?;
                if listing.is_empty() {
                    Outcome::Silent
                } else {
                    let lines: Vec<String> = listing
                        .iter()
                        .map(|(name, kind)| self.format_entry(name, *kind))
                        .collect();
                    Outcome::Output(lines.join("\n"))
                }
            }
            Command::Link { src, dst } => {
                self.tree.link(src, dst)?;
                Outcome::Silent
            }
            Command::MakeDir { path } => {
                self.tree.make_dir(path)?;
                Outcome::Silent
            }
            Command::Touch { path } => {
                self.tree.touch(path)?;
                Outcome::Silent
            }
            Command::Remove { path } => {
                self.tree.remove(path)?;
                Outcome::Silent
            }
            Command::ChangeDir { path: Some(path) } => {
                self.tree.change_dir(path)?;
                Outcome::Silent
            }
            Command::ChangeDir { path: None } => Outcome::Silent,
            Command::PrintWorkingDir => Outcome::Output(self.tree.print_working_dir()?),
            Command::Write { path, data } => {
                self.tree.write(path, data.as_bytes())?;
                Outcome::Silent
            }
            Command::Read { path } => {
                let bytes = self.tree.read(path)?;
                Outcome::Output(String::from_utf8_lossy(&bytes).into_owned())
            }
            Command::Truncate { path } => {
                self.tree.truncate(path)?;
                Outcome::Silent
            }
            Command::Debug => Outcome::Output(projection::render(&self.tree)?),
            Command::Exit => Outcome::Exit,
        };
        Ok(outcome)
    }

    fn format_entry(&self, name: &str, kind: NodeKind) -> String {
        match kind {
            NodeKind::File => name.to_string(),
            NodeKind::Directory if self.colorize => {
                format!("{name}{SEPARATOR}").as_str().blue().bold().to_string()
            }
            NodeKind::Directory => format!("{name}{SEPARATOR}"),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ShellError {
    #[snafu(transparent)]
    Command { source: CommandError },
    #[snafu(transparent)]
    Tree { source: TreeError },
    #[snafu(transparent)]
    Projection { source: ProjectionError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[fixture]
    fn shell() -> Shell {
        Shell::new(false)
    }

    fn run(shell: &mut Shell, lines: &[&str]) -> Vec<Outcome> {
        lines.iter().map(|line| shell.execute(line)).collect()
    }

    fn output(text: &str) -> Outcome {
        Outcome::Output(text.to_string())
    }

    fn failure(text: &str) -> Outcome {
        Outcome::Failure(text.to_string())
    }

    #[rstest]
    fn example_session(mut shell: Shell) {
        let outcomes = run(&mut shell, &[
            "mkdir /a",
            "touch /a/f",
            "write /a/f hello",
            "read /a/f",
            "ls /a",
        ]);
        assert_eq!(outcomes, vec![
            Outcome::Silent,
            Outcome::Silent,
            Outcome::Silent,
            output("hello"),
            output("f"),
        ]);
    }

    #[rstest]
    fn listing_marks_directories(mut shell: Shell) {
        run(&mut shell, &["mkdir /d", "touch /f"]);
        assert_eq!(shell.execute("ls"), output("d/\nf"));
        assert_eq!(shell.execute("ls /d"), Outcome::Silent);
    }

    #[rstest]
    fn working_directory_commands(mut shell: Shell) {
        run(&mut shell, &["mkdir /a/b", "cd /a/b"]);
        assert_eq!(shell.execute("pwd"), output("/a/b"));
        assert_eq!(shell.execute("cd"), Outcome::Silent);
        assert_eq!(shell.execute("pwd"), output("/a/b"));
        run(&mut shell, &["cd ../.."]);
        assert_eq!(shell.execute("pwd"), output("/"));
    }

    #[rstest]
    fn links_share_contents(mut shell: Shell) {
        run(&mut shell, &["touch /src", "ln /src /dst", "write /dst shared data", "rm /src"]);
        assert_eq!(shell.execute("read /dst"), output("shared data"));
        assert_eq!(
            shell.execute("read /src"),
            failure("read: /src: No such file or directory")
        );
    }

    #[rstest]
    fn truncate_then_read_is_empty(mut shell: Shell) {
        run(&mut shell, &["touch f", "write f 0123456789"]);
        assert_eq!(shell.execute("truncate f"), Outcome::Silent);
        assert_eq!(shell.execute("read f"), output(""));
    }

    #[rstest]
    #[case("mkdir /a", "mkdir: /a: File exists")]
    #[case("cd /a/f", "cd: /a/f: Not a directory")]
    #[case("write /a x", "write: /a: Cannot write a directory")]
    #[case("read /a", "read: /a: Cannot read a directory")]
    #[case("truncate /a", "truncate: /a: Cannot truncate a directory")]
    #[case("ln /a /b", "ln: /a: Cannot link a directory")]
    #[case("rm /nope", "rm: /nope: No such file or directory")]
    #[case("ls /nope", "ls: /nope: No such file or directory")]
    #[case("touch /a/f/g", "touch: /a/f/g: Not a directory")]
    #[case("ln", "ln: Missing arguments <src> <dst>")]
    #[case("bogus", "unknown command: bogus")]
    fn errors_are_prefixed_with_command(
        mut shell: Shell,
        #[case] line: &str,
        #[case] message: &str,
    ) {
        run(&mut shell, &["mkdir /a", "touch /a/f"]);
        assert_eq!(shell.execute(line), failure(message));
    }

    #[rstest]
    fn debug_renders_tree(mut shell: Shell) {
        run(&mut shell, &["mkdir /a", "touch /a/f"]);
        let Outcome::Output(rendered) = shell.execute("debug") else {
            panic!("debug should produce output");
        };
        assert!(rendered.contains("children"));
        assert!(rendered.contains("type: file"));
    }

    #[rstest]
    fn exit_and_blank_lines(mut shell: Shell) {
        assert_eq!(shell.execute(""), Outcome::Silent);
        assert_eq!(shell.execute("exit"), Outcome::Exit);
    }

    #[rstest]
    fn failed_commands_leave_tree_unchanged(mut shell: Shell) {
        run(&mut shell, &["mkdir /a", "touch /f", "mkdir /f/x", "ln /f /a/..", "rm /"]);
        assert_eq!(shell.tree().node_count(), 3);
    }
}
