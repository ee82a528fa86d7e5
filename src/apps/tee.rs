//! Tee application - copy stdin to stdout and files

use std::fs::OpenOptions;
use std::io::Write;

use super::{AppError, Application, Context, read_stdin};

/// The tee application.
///
/// Usage: tee [-a] FILE...
///
/// Files are truncated unless `-a` is given.
pub struct Tee;

impl Application for Tee {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        let (append, files) = match ctx.args.split_first() {
            Some((flag, rest)) if flag == "-a" => (true, rest),
            _ => (false, ctx.args),
        };

        let text = read_stdin(ctx.stdin)?;
        for name in files {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .append(append)
                .truncate(!append)
                .open(ctx.env.resolve(name))
                .map_err(|e| AppError::file(name, e))?;
            file.write_all(text.as_bytes())
                .map_err(|e| AppError::file(name, e))?;
        }
        ctx.stdout.write_all(text.as_bytes())?;
        Ok(())
    }
}
