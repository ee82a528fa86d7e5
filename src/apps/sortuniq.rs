//! Line ordering (sort) and adjacent de-duplication (uniq)

use super::{AppError, Application, Context, at_most_one, read_input};

/// Split leading single-letter flags from operands.
fn split_flags(args: &[String], allowed: &str) -> Result<(Vec<char>, Vec<String>), AppError> {
    let mut flags = Vec::new();
    let mut rest = Vec::new();
    for arg in args {
        match arg.strip_prefix('-') {
            Some(letters) if !letters.is_empty() && rest.is_empty() => {
                for c in letters.chars() {
                    if !allowed.contains(c) {
                        return Err(AppError::usage(format!("invalid option -- '{c}'")));
                    }
                    flags.push(c);
                }
            }
            _ => rest.push(arg.clone()),
        }
    }
    Ok((flags, rest))
}

/// The sort application - sort lines lexicographically.
///
/// Usage: sort [-r] [FILE]
pub struct Sort;

impl Application for Sort {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        let (flags, files) = split_flags(ctx.args, "r")?;
        let file = at_most_one(&files, "sort")?;
        let text = read_input(ctx.env, file, ctx.stdin)?;

        let mut lines: Vec<&str> = text.lines().collect();
        lines.sort_unstable();
        if flags.contains(&'r') {
            lines.reverse();
        }

        for line in lines {
            writeln!(ctx.stdout, "{line}")?;
        }
        Ok(())
    }
}

/// The uniq application - collapse adjacent duplicate lines.
///
/// Usage: uniq [-i] [FILE]
///
/// With `-i` lines that differ only in case are duplicates; the first of
/// each run is printed.
pub struct Uniq;

impl Application for Uniq {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        let (flags, files) = split_flags(ctx.args, "i")?;
        let ignore_case = flags.contains(&'i');
        let file = at_most_one(&files, "uniq")?;
        let text = read_input(ctx.env, file, ctx.stdin)?;

        let key = |line: &str| {
            if ignore_case {
                line.to_lowercase()
            } else {
                line.to_string()
            }
        };

        let mut previous: Option<String> = None;
        for line in text.lines() {
            let current = key(line);
            if previous.as_ref() != Some(&current) {
                writeln!(ctx.stdout, "{line}")?;
                previous = Some(current);
            }
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
    fn sort_lines() {
        let env = Environment::new("/");
        assert_eq!(run(&Sort, &env, &[], "b\na\nc\n").unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn sort_reverse() {
        let env = Environment::new("/");
        assert_eq!(run(&Sort, &env, &["-r"], "b\na\nc\n").unwrap(), "c\nb\na\n");
    }

    #[test]
    fn sort_rejects_unknown_flag() {
        let env = Environment::new("/");
        assert!(matches!(
            run(&Sort, &env, &["-x"], ""),
            Err(AppError::Usage(_))
        ));
    }

    #[test]
    fn sort_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f"), "2\n1\n").unwrap();
        let env = Environment::new(dir.path());
        assert_eq!(run(&Sort, &env, &["f"], "").unwrap(), "1\n2\n");
    }

    #[test]
    fn uniq_adjacent_only() {
        let env = Environment::new("/");
        assert_eq!(
            run(&Uniq, &env, &[], "a\na\nb\na\n").unwrap(),
            "a\nb\na\n"
        );
    }

    #[test]
    fn uniq_ignore_case_keeps_first() {
        let env = Environment::new("/");
        assert_eq!(
            run(&Uniq, &env, &["-i"], "Hello\nhello\nHELLO\nworld\n").unwrap(),
            "Hello\nworld\n"
        );
    }
}
