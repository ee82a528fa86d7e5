use super::tokenize::tokenize;
use super::types::{CallCommand, Command, PipeCommand, SequenceCommand, Token};
use crate::error::{Result, ShellError};
use crate::redirect::extract_redirections;

/// Split a token stream at sequence separators.
///
/// Blank lines are skipped and a trailing `;` is allowed, but a `;` with
/// no command before it (`; a`, `a ;; b`) is a syntax error.
fn split_sequence(tokens: Vec<Token>) -> Result<Vec<Vec<Token>>> {
    let mut groups = Vec::new();
    let mut buf = Vec::new();

    for token in tokens {
        match token {
            Token::Separator { newline } => {
                if !buf.is_empty() {
                    groups.push(std::mem::take(&mut buf));
                } else if !newline {
                    return Err(ShellError::syntax("unexpected ';'"));
                }
            }
            other => buf.push(other),
        }
    }

    if !buf.is_empty() {
        groups.push(buf);
    }
    Ok(groups)
}

/// Split one pipeline's tokens at `|`. Every stage must be non-empty.
fn split_pipeline(tokens: Vec<Token>) -> Result<Vec<Vec<Token>>> {
    let mut stages = Vec::new();
    let mut buf = Vec::new();

    for token in tokens {
        if token == Token::Pipe {
            if buf.is_empty() {
                return Err(ShellError::syntax("dangling pipe"));
            }
            stages.push(std::mem::take(&mut buf));
        } else {
            buf.push(token);
        }
    }

    if buf.is_empty() {
        return Err(ShellError::syntax("dangling pipe"));
    }
    stages.push(buf);
    Ok(stages)
}

fn build_call(tokens: Vec<Token>) -> Result<CallCommand> {
    let (words, redirections) = extract_redirections(tokens)?;
    if words.is_empty() {
        return Err(ShellError::syntax("missing command"));
    }
    Ok(CallCommand {
        words,
        redirections,
    })
}

fn build_pipeline(tokens: Vec<Token>) -> Result<Command> {
    let mut stages = split_pipeline(tokens)?
        .into_iter()
        .map(build_call)
        .collect::<Result<Vec<_>>>()?;

    if stages.len() == 1 {
        return Ok(Command::Call(stages.remove(0)));
    }
    Ok(Command::Pipe(PipeCommand { stages }))
}

/// Parse a full command line into a [`Command`] tree.
///
/// Returns `None` when the line holds no commands at all (blank input or
/// only newlines).
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let tokens = tokenize(line)?;
    let mut items = split_sequence(tokens)?
        .into_iter()
        .map(build_pipeline)
        .collect::<Result<Vec<_>>>()?;

    Ok(match items.len() {
        0 => None,
        1 => Some(items.remove(0)),
        _ => Some(Command::Sequence(SequenceCommand { items })),
    })
}
