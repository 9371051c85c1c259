use snafu::Snafu;

/// A parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Empty,
    List { path: &'a str },
    Link { src: &'a str, dst: &'a str },
    MakeDir { path: &'a str },
    Touch { path: &'a str },
    Remove { path: &'a str },
    ChangeDir { path: Option<&'a str> },
    PrintWorkingDir,
    Write { path: &'a str, data: String },
    Read { path: &'a str },
    Truncate { path: &'a str },
    Debug,
    Exit,
}

impl<'a> TryFrom<&'a str> for Command<'a> {
    type Error = CommandError;

    fn try_from(line: &'a str) -> Result<Self, Self::Error> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = tokens.split_first() else {
            return Ok(Command::Empty);
        };

        let command = match name {
            "ls" => Command::List {
                path: args.first().copied().unwrap_or(""),
            },
            "ln" => match args {
                &[src, dst, ..] => Command::Link { src, dst },
                &[_] => return MissingArgumentSnafu { command: "ln", argument: "<dst>" }.fail(),
                &[] => {
                    return MissingArgumentsSnafu {
                        command: "ln",
                        arguments: "<src> <dst>",
                    }
                    .fail();
                }
            },
            "mkdir" => Command::MakeDir {
                path: required(args, "mkdir")?,
            },
            "touch" => Command::Touch {
                path: required(args, "touch")?,
            },
            "rm" => Command::Remove {
                path: required(args, "rm")?,
            },
            "cd" => Command::ChangeDir {
                path: args.first().copied(),
            },
            "pwd" => Command::PrintWorkingDir,
            "write" => match args {
                &[path, ref data @ ..] if !data.is_empty() => Command::Write {
                    path,
                    data: data.join(" "),
                },
                &[_] => {
                    return MissingArgumentSnafu {
                        command: "write",
                        argument: "<data>",
                    }
                    .fail();
                }
                _ => {
                    return MissingArgumentsSnafu {
                        command: "write",
                        arguments: "<path> <data>",
                    }
                    .fail();
                }
            },
            "read" => Command::Read {
                path: required(args, "read")?,
            },
            "truncate" => Command::Truncate {
                path: required(args, "truncate")?,
            },
            "debug" => Command::Debug,
            "exit" => Command::Exit,
            other => return UnknownSnafu { name: other }.fail(),
        };
        Ok(command)
    }
}

fn required<'a>(args: &[&'a str], command: &'static str) -> Result<&'a str, CommandError> {
    match args.first().copied() {
        Some(path) => Ok(path),
        None => MissingArgumentSnafu {
            command,
            argument: "<path>",
        }
        .fail(),
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum CommandError {
    #[snafu(display("{command}: Missing argument {argument}"))]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[snafu(display("{command}: Missing arguments {arguments}"))]
    MissingArguments {
        command: &'static str,
        arguments: &'static str,
    },
    #[snafu(display("unknown command: {name}"))]
    Unknown { name: String },
}
