//! Wc application - count lines, words and characters

use super::{AppError, Application, Context, read_source, read_stdin};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    lines: usize,
    words: usize,
    chars: usize,
}

impl Counts {
    fn of(text: &str) -> Self {
        Self {
            lines: text.matches('\n').count(),
            words: text.split_whitespace().count(),
            chars: text.chars().count(),
        }
    }

    fn add(&mut self, other: Counts) {
        self.lines += other.lines;
        self.words += other.words;
        self.chars += other.chars;
    }
}

#[derive(Debug, Clone, Copy)]
struct Selected {
    lines: bool,
    words: bool,
    chars: bool,
}

impl Selected {
    fn render(&self, counts: Counts, label: Option<&str>) -> String {
        let mut fields = Vec::new();
        if self.lines {
            fields.push(counts.lines.to_string());
        }
        if self.words {
            fields.push(counts.words.to_string());
        }
        if self.chars {
            fields.push(counts.chars.to_string());
        }
        if let Some(label) = label {
            fields.push(label.to_string());
        }
        fields.join("\t")
    }
}

/// The wc application - print newline, word and character counts.
///
/// Usage: wc [-l] [-w] [-m] [FILE...]
///
/// Without flags all three counts are printed. Fields are tab separated.
/// With several files a `total` line follows.
pub struct Wc;

impl Application for Wc {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        let mut selected = Selected {
            lines: false,
            words: false,
            chars: false,
        };
        let mut files = Vec::new();
        for arg in ctx.args {
            match arg.strip_prefix('-') {
                Some(letters) if !letters.is_empty() && files.is_empty() => {
                    for c in letters.chars() {
                        match c {
                            'l' => selected.lines = true,
                            'w' => selected.words = true,
                            'm' => selected.chars = true,
                            _ => return Err(AppError::usage(format!("invalid option -- '{c}'"))),
                        }
                    }
                }
                _ => files.push(arg.as_str()),
            }
        }
        if !(selected.lines || selected.words || selected.chars) {
            selected = Selected {
                lines: true,
                words: true,
                chars: true,
            };
        }

        if files.is_empty() {
            let counts = Counts::of(&read_stdin(ctx.stdin)?);
            writeln!(ctx.stdout, "{}", selected.render(counts, None))?;
            return Ok(());
        }

        let mut total = Counts::default();
        for name in &files {
            let counts = Counts::of(&read_source(ctx.env, name, ctx.stdin)?);
            total.add(counts);
            writeln!(ctx.stdout, "{}", selected.render(counts, Some(name)))?;
        }
        if files.len() > 1 {
            writeln!(ctx.stdout, "{}", selected.render(total, Some("total")))?;
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
    fn counts_of_text() {
        assert_eq!(
            Counts::of("one two\nthree\n"),
            Counts {
                lines: 2,
                words: 3,
                chars: 14
            }
        );
    }

    #[test]
    fn wc_all_counts_from_stdin() {
        let env = Environment::new("/");
        assert_eq!(run(&Wc, &env, &[], "a b\nc\n").unwrap(), "2\t3\t6\n");
    }

    #[test]
    fn wc_single_flags() {
        let env = Environment::new("/");
        assert_eq!(run(&Wc, &env, &["-l"], "a\nb\n").unwrap(), "2\n");
        assert_eq!(run(&Wc, &env, &["-w"], "a\n").unwrap(), "1\n");
        assert_eq!(run(&Wc, &env, &["-m"], "héllo").unwrap(), "5\n");
        assert_eq!(run(&Wc, &env, &["-lw"], "a b\n").unwrap(), "1\t2\n");
    }

    #[test]
    fn wc_several_files_with_total() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a"), "x\n").unwrap();
        std::fs::write(dir.path().join("b"), "y z\nw\n").unwrap();
        let env = Environment::new(dir.path());
        assert_eq!(
            run(&Wc, &env, &["-l", "a", "b"], "").unwrap(),
            "1\ta\n2\tb\n3\ttotal\n"
        );
    }

    #[test]
    fn wc_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let env = Environment::new(dir.path());
        assert!(matches!(
            run(&Wc, &env, &["nope"], ""),
            Err(AppError::NotFound(_))
        ));
    }
}
