//! Applications: the in-process programs a call can name.
//!
//! Each application receives a resolved, redirection-free argument vector,
//! read-only access to the [`Environment`], and two already-open streams.
//! Only [`EnvApplication`] implementations (`cd`) get `&mut Environment`.

/// `cat`: concatenate files or stdin.
pub mod cat;
/// `cut`: select byte or character ranges from each line.
pub mod cut;
/// `echo`: print arguments.
pub mod echo;
/// `mv`, `rm`, `mkdir`: filesystem mutation.
pub mod fileops;
/// `grep`: regex line filter.
pub mod grep;
/// `head`, `tail`: leading and trailing lines.
pub mod headtail;
/// `cd`, `pwd`, `ls`: directory navigation and listing.
pub mod navigation;
/// `paste`: merge corresponding lines.
pub mod paste;
/// `sort`, `uniq`: line ordering and de-duplication.
pub mod sortuniq;
/// `tee`: copy stdin to files and stdout.
pub mod tee;
/// `wc`: line, word and character counts.
pub mod wc;

use std::io::{Read, Write};

use thiserror::Error;

use crate::eval::Environment;

/// Failure reported by an application. The evaluator prefixes the
/// application name when surfacing it.
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad flags or operands.
    #[error("{0}")]
    Usage(String),

    #[error("{0}: No such file or directory")]
    NotFound(String),

    /// Any other failure touching a named path.
    #[error("{path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Attach the operand name to an I/O failure.
    pub fn file(path: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_string())
        } else {
            Self::File {
                path: path.to_string(),
                source,
            }
        }
    }
}

/// Everything an application sees for one invocation.
pub struct Context<'a> {
    pub args: &'a [String],
    pub env: &'a Environment,
    pub stdin: &'a mut dyn Read,
    pub stdout: &'a mut dyn Write,
}

/// An application that only reads the environment.
pub trait Application: Send + Sync {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError>;
}

/// An application that changes the environment.
pub trait EnvApplication: Send + Sync {
    fn run(
        &self,
        args: &[String],
        env: &mut Environment,
        stdout: &mut dyn Write,
    ) -> Result<(), AppError>;
}

/// A registry entry.
pub enum Registered {
    Stateless(Box<dyn Application>),
    Stateful(Box<dyn EnvApplication>),
}

/// Every builtin application with its name.
pub fn builtins() -> Vec<(&'static str, Registered)> {
    fn app(a: impl Application + 'static) -> Registered {
        Registered::Stateless(Box::new(a))
    }

    vec![
        ("cat", app(cat::Cat)),
        ("cd", Registered::Stateful(Box::new(navigation::Cd))),
        ("cut", app(cut::Cut)),
        ("echo", app(echo::Echo)),
        ("grep", app(grep::Grep)),
        ("head", app(headtail::Head)),
        ("ls", app(navigation::Ls)),
        ("mkdir", app(fileops::Mkdir)),
        ("mv", app(fileops::Mv)),
        ("paste", app(paste::Paste)),
        ("pwd", app(navigation::Pwd)),
        ("rm", app(fileops::Rm)),
        ("sort", app(sortuniq::Sort)),
        ("tail", app(headtail::Tail)),
        ("tee", app(tee::Tee)),
        ("uniq", app(sortuniq::Uniq)),
        ("wc", app(wc::Wc)),
    ]
}

/// Read all of stdin as text (invalid UTF-8 is replaced).
pub(crate) fn read_stdin(stdin: &mut dyn Read) -> Result<String, AppError> {
    let mut buf = Vec::new();
    stdin.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Read a file operand as text, or stdin when it is `-`.
pub(crate) fn read_source(
    env: &Environment,
    name: &str,
    stdin: &mut dyn Read,
) -> Result<String, AppError> {
    if name == "-" {
        return read_stdin(stdin);
    }
    let bytes = std::fs::read(env.resolve(name)).map_err(|e| AppError::file(name, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read an optional single file operand, defaulting to stdin.
pub(crate) fn read_input(
    env: &Environment,
    file: Option<&str>,
    stdin: &mut dyn Read,
) -> Result<String, AppError> {
    match file {
        Some(name) => read_source(env, name, stdin),
        None => read_stdin(stdin),
    }
}

/// Parse the value of a numeric flag such as `-n 5`.
pub(crate) fn parse_count(flag: &str, value: Option<&String>) -> Result<usize, AppError> {
    let value = value.ok_or_else(|| AppError::usage(format!("option requires an argument -- {flag}")))?;
    value
        .parse()
        .map_err(|_| AppError::usage(format!("invalid number: {value}")))
}

/// Operands after flags: at most one file for single-input applications.
pub(crate) fn at_most_one<'a>(files: &'a [String], app: &str) -> Result<Option<&'a str>, AppError> {
    match files {
        [] => Ok(None),
        [one] => Ok(Some(one.as_str())),
        _ => Err(AppError::usage(format!("{app} takes at most one file"))),
    }
}
