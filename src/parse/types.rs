//! Types produced by the lexer and command builder, consumed by the evaluator.

/// How a literal piece of a word was quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// Subject to substitution and globbing.
    Unquoted,
    /// `'...'` (or a backslash-escaped character): taken verbatim.
    Single,
    /// `"..."`: substitution allowed, globbing suppressed.
    Double,
}

/// One contiguous piece of a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Literal { text: String, quoting: Quoting },
    /// A backtick span. `quoted` is set when it appeared inside `"..."`,
    /// in which case its output is not word-split.
    Substitution { command: String, quoted: bool },
}

/// A shell word: adjacent quoted, unquoted and substituted pieces with no
/// unquoted whitespace between them, e.g. `ab"cd"*`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Word {
    pub parts: Vec<Part>,
}

impl Word {
    /// A word made of a single unquoted literal.
    pub fn unquoted(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Literal {
                text: text.into(),
                quoting: Quoting::Unquoted,
            }],
        }
    }

    /// Best-effort source rendering, used in log and error messages.
    pub fn display(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Part::Literal {
                    text,
                    quoting: Quoting::Unquoted,
                } => out.push_str(text),
                Part::Literal {
                    text,
                    quoting: Quoting::Single,
                } => {
                    out.push('\'');
                    out.push_str(text);
                    out.push('\'');
                }
                Part::Literal {
                    text,
                    quoting: Quoting::Double,
                } => {
                    out.push('"');
                    out.push_str(text);
                    out.push('"');
                }
                Part::Substitution { command, .. } => {
                    out.push('`');
                    out.push_str(command);
                    out.push('`');
                }
            }
        }
        out
    }
}

/// Direction of an I/O redirection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `<`: read stdin from a file
    In,
    /// `>`: write stdout to a file
    Out,
}

impl Direction {
    /// The operator's shell syntax.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::In => "<",
            Direction::Out => ">",
        }
    }
}

/// A lexical unit of a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(Word),
    /// Unquoted `<` or `>`.
    Redirect(Direction),
    /// Unquoted `|`.
    Pipe,
    /// Unquoted `;` (`newline: false`) or newline (`newline: true`).
    Separator { newline: bool },
}

/// Redirection targets attached to one call, before resolution.
///
/// Each direction holds at most one target. A repeated direction keeps the
/// first target and is recorded in `conflict`; the call fails with it when
/// evaluated, before any file is opened.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Redirections {
    pub input: Option<Word>,
    pub output: Option<Word>,
    /// The first direction that appeared twice.
    pub conflict: Option<Direction>,
}

impl Redirections {
    pub fn is_empty(&self) -> bool {
        self.input.is_none() && self.output.is_none() && self.conflict.is_none()
    }
}

/// One application invocation. The application name is the first
/// argument the words resolve to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallCommand {
    pub words: Vec<Word>,
    pub redirections: Redirections,
}

/// Stages connected by `|`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipeCommand {
    pub stages: Vec<CallCommand>,
}

/// Commands separated by `;` or newlines, run one after another. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceCommand {
    pub items: Vec<Command>,
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Call(CallCommand),
    Pipe(PipeCommand),
    Sequence(SequenceCommand),
}
