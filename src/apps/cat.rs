use std::io::copy;

use super::{AppError, Application, Context};

/// The cat application - concatenate files to stdout.
///
/// Usage: cat [FILE...]
///
/// With no FILE, or when FILE is `-`, reads stdin. Content is copied
/// byte for byte.
pub struct Cat;

impl Application for Cat {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        if ctx.args.is_empty() {
            copy(&mut *ctx.stdin, &mut *ctx.stdout)?;
            return Ok(());
        }

        for name in ctx.args {
            if name == "-" {
                copy(&mut *ctx.stdin, &mut *ctx.stdout)?;
                continue;
            }
            let bytes = std::fs::read(ctx.env.resolve(name)).map_err(|e| AppError::file(name, e))?;
            ctx.stdout.write_all(&bytes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::testing::run;
    use crate::eval::Environment;

    #[test]
    fn cat_stdin() {
        let env = Environment::new("/");
        assert_eq!(run(&Cat, &env, &[], "hello\n").unwrap(), "hello\n");
    }

    #[test]
    fn cat_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), "A\n").unwrap();
        std::fs::write(dir.path().join("b"), "B\n").unwrap();
        let env = Environment::new(dir.path());
        assert_eq!(run(&Cat, &env, &["a", "-", "b"], "S\n").unwrap(), "A\nS\nB\n");
    }

    #[test]
    fn cat_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let env = Environment::new(dir.path());
        let err = run(&Cat, &env, &["nonexistent.txt"], "").unwrap_err();
        assert_eq!(err.to_string(), "nonexistent.txt: No such file or directory");
    }
}
