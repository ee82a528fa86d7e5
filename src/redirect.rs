//! I/O redirection: extraction of `<`/`>` operands and opening of the
//! replacement streams.

use std::fs::File;
use std::path::PathBuf;

use crate::error::{Result, ShellError};
use crate::eval::resolve::{ArgumentResolver, SubstitutionContext};
use crate::parse::{Direction, Redirections, Token, Word};

/// Separate a call's words from its redirections.
///
/// Each operator consumes the following word as its target. A second
/// redirection in the same direction is recorded as a conflict for
/// [`check`] to report. Pipe and separator tokens never reach this
/// function.
pub fn extract_redirections(tokens: Vec<Token>) -> Result<(Vec<Word>, Redirections)> {
    let mut words = Vec::new();
    let mut redirections = Redirections::default();
    let mut iter = tokens.into_iter();

    while let Some(token) = iter.next() {
        match token {
            Token::Word(word) => words.push(word),
            Token::Redirect(direction) => {
                let Some(Token::Word(target)) = iter.next() else {
                    return Err(ShellError::syntax(format!(
                        "missing file after '{}'",
                        direction.as_str()
                    )));
                };
                let slot = match direction {
                    Direction::In => &mut redirections.input,
                    Direction::Out => &mut redirections.output,
                };
                if slot.is_some() {
                    redirections.conflict.get_or_insert(direction);
                } else {
                    *slot = Some(target);
                }
            }
            Token::Pipe | Token::Separator { .. } => {
                return Err(ShellError::syntax("unexpected operator in command"));
            }
        }
    }

    Ok((words, redirections))
}

/// Fail if a direction was redirected twice. Runs before [`open`], so the
/// failure does not depend on whether any of the files exist.
pub fn check(redirections: &Redirections) -> Result<()> {
    match redirections.conflict {
        Some(direction) => Err(ShellError::Redirection(format!(
            "multiple redirection streams for '{}'",
            direction.as_str()
        ))),
        None => Ok(()),
    }
}

/// Files opened for one call. Dropping the value closes them, so every
/// exit path of the call releases its handles.
#[derive(Debug, Default)]
pub struct IoStreams {
    pub input: Option<File>,
    pub output: Option<File>,
}

/// Resolve each redirection target and open it.
///
/// Input is opened before output, so a missing input file leaves the
/// output target untouched.
pub fn open<C>(
    redirections: &Redirections,
    resolver: &ArgumentResolver,
    ctx: &mut C,
) -> Result<IoStreams>
where
    C: SubstitutionContext + ?Sized,
{
    let mut streams = IoStreams::default();

    if let Some(target) = &redirections.input {
        let path = resolve_target(target, resolver, ctx)?;
        let file = File::open(&path).map_err(|source| ShellError::RedirectOpen {
            path: path.display().to_string(),
            source,
        })?;
        streams.input = Some(file);
    }

    if let Some(target) = &redirections.output {
        let path = resolve_target(target, resolver, ctx)?;
        let file = File::create(&path).map_err(|source| ShellError::RedirectOpen {
            path: path.display().to_string(),
            source,
        })?;
        streams.output = Some(file);
    }

    Ok(streams)
}

/// A target must resolve to exactly one argument.
fn resolve_target<C>(target: &Word, resolver: &ArgumentResolver, ctx: &mut C) -> Result<PathBuf>
where
    C: SubstitutionContext + ?Sized,
{
    let mut args = resolver.resolve_one(target, ctx)?;
    if args.len() != 1 {
        return Err(ShellError::Redirection(format!(
            "ambiguous redirect: {}",
            target.display()
        )));
    }
    let name = args.remove(0);
    Ok(ctx.cwd().join(name))
}
