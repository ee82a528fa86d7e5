//! Head and tail applications - leading and trailing lines

use super::{AppError, Application, Context, at_most_one, parse_count, read_input};

const DEFAULT_LINES: usize = 10;

/// Parse `[-n N] [FILE]`.
fn parse_args(args: &[String], app: &str) -> Result<(usize, Option<String>), AppError> {
    let mut count = DEFAULT_LINES;
    let mut files = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "-n" {
            count = parse_count("n", args.get(i + 1))?;
            i += 2;
        } else {
            files.push(args[i].clone());
            i += 1;
        }
    }
    let file = at_most_one(&files, app)?.map(str::to_string);
    Ok((count, file))
}

/// The head application - print the first lines of input.
///
/// Usage: head [-n N] [FILE]
pub struct Head;

impl Application for Head {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        let (count, file) = parse_args(ctx.args, "head")?;
        let text = read_input(ctx.env, file.as_deref(), ctx.stdin)?;
        for line in text.lines().take(count) {
            writeln!(ctx.stdout, "{line}")?;
        }
        Ok(())
    }
}

/// The tail application - print the last lines of input.
///
/// Usage: tail [-n N] [FILE]
pub struct Tail;

impl Application for Tail {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        let (count, file) = parse_args(ctx.args, "tail")?;
        let text = read_input(ctx.env, file.as_deref(), ctx.stdin)?;
        let lines: Vec<&str> = text.lines().collect();
        let start = lines.len().saturating_sub(count);
        for line in &lines[start..] {
            writeln!(ctx.stdout, "{line}")?;
        }
        Ok(())
    }
}
