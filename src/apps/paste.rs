//! Paste application - merge corresponding lines of files

use super::{AppError, Application, Context, read_source, read_stdin};

/// The paste application - join line N of every input with tabs.
///
/// Usage: paste [FILE...]
///
/// Shorter inputs contribute empty fields once exhausted. `-` reads stdin.
pub struct Paste;

impl Application for Paste {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        let mut inputs = Vec::new();
        if ctx.args.is_empty() {
            inputs.push(read_stdin(ctx.stdin)?);
        } else {
            for name in ctx.args {
                inputs.push(read_source(ctx.env, name, ctx.stdin)?);
            }
        }

        let columns: Vec<Vec<&str>> = inputs.iter().map(|text| text.lines().collect()).collect();
        let rows = columns.iter().map(Vec::len).max().unwrap_or(0);

        for row in 0..rows {
            let fields: Vec<&str> = columns
                .iter()
                .map(|column| column.get(row).copied().unwrap_or(""))
                .collect();
            writeln!(ctx.stdout, "{}", fields.join("\t"))?;
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
    fn paste_stdin_is_identity() {
        let env = Environment::new("/");
        assert_eq!(run(&Paste, &env, &[], "a\nb\n").unwrap(), "a\nb\n");
    }

    #[test]
    fn paste_files_side_by_side() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("l"), "1\n2\n3\n").unwrap();
        std::fs::write(dir.path().join("r"), "a\nb\n").unwrap();
        let env = Environment::new(dir.path());
        assert_eq!(
            run(&Paste, &env, &["l", "r"], "").unwrap(),
            "1\ta\n2\tb\n3\t\n"
        );
    }

    #[test]
    fn paste_mixes_stdin_and_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("r"), "x\n").unwrap();
        let env = Environment::new(dir.path());
        assert_eq!(run(&Paste, &env, &["-", "r"], "in\n").unwrap(), "in\tx\n");
    }
}
