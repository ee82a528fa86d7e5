//! Grep application - search for patterns in files

use regex::Regex;

use super::{AppError, Application, Context, read_source, read_stdin};

/// The grep application - print lines matching a regular expression.
///
/// Usage: grep PATTERN [FILE...]
///
/// With several files each match is prefixed with `FILE:`.
pub struct Grep;

impl Application for Grep {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        let Some((pattern, files)) = ctx.args.split_first() else {
            return Err(AppError::usage("missing pattern"));
        };
        let regex = Regex::new(pattern)
            .map_err(|e| AppError::usage(format!("invalid pattern: {e}")))?;

        if files.is_empty() {
            let text = read_stdin(ctx.stdin)?;
            for line in text.lines().filter(|l| regex.is_match(l)) {
                writeln!(ctx.stdout, "{line}")?;
            }
            return Ok(());
        }

        let prefix = files.len() > 1;
        for name in files {
            let text = read_source(ctx.env, name, ctx.stdin)?;
            for line in text.lines().filter(|l| regex.is_match(l)) {
                if prefix {
                    writeln!(ctx.stdout, "{name}:{line}")?;
                } else {
                    writeln!(ctx.stdout, "{line}")?;
                }
            }
        }
        Ok(())
    }
}
