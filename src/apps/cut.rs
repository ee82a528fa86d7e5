//! Cut application - select byte or character ranges from each line

use super::{AppError, Application, Context, at_most_one, read_input};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Bytes,
    Chars,
}

/// Inclusive, 1-based position range. Open ends use `usize::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

impl Span {
    fn contains(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }
}

fn position(text: &str) -> Result<usize, AppError> {
    let n: usize = text
        .parse()
        .map_err(|_| AppError::usage(format!("invalid position: {text}")))?;
    if n == 0 {
        return Err(AppError::usage("positions are numbered from 1"));
    }
    Ok(n)
}

/// Parse a LIST such as `1,3-5,7-` or `-2`.
fn parse_list(list: &str) -> Result<Vec<Span>, AppError> {
    let mut spans = Vec::new();
    for item in list.split(',') {
        let (start, end) = match item.split_once('-') {
            None => {
                let n = position(item)?;
                (n, n)
            }
            Some(("", "")) => return Err(AppError::usage("invalid range with no endpoint")),
            Some((a, "")) => (position(a)?, usize::MAX),
            Some(("", b)) => (1, position(b)?),
            Some((a, b)) => (position(a)?, position(b)?),
        };
        if start > end {
            return Err(AppError::usage(format!("invalid decreasing range: {item}")));
        }
        spans.push(Span { start, end });
    }
    Ok(spans)
}

/// Keep the elements whose 1-based position falls in any span, in order.
fn select<T: Copy>(items: impl Iterator<Item = T>, spans: &[Span]) -> Vec<T> {
    items
        .enumerate()
        .filter(|(i, _)| spans.iter().any(|s| s.contains(i + 1)))
        .map(|(_, item)| item)
        .collect()
}

/// The cut application - print selected parts of each line.
///
/// Usage: cut -b LIST [FILE] | cut -c LIST [FILE]
///
/// Overlapping ranges are merged; output keeps input order.
pub struct Cut;

impl Application for Cut {
    fn run(&self, ctx: Context<'_>) -> Result<(), AppError> {
        let mut selection: Option<(Unit, Vec<Span>)> = None;
        let mut files = Vec::new();
        let mut i = 0;
        while i < ctx.args.len() {
            let unit = match ctx.args[i].as_str() {
                "-b" => Some(Unit::Bytes),
                "-c" => Some(Unit::Chars),
                _ => None,
            };
            match unit {
                Some(unit) => {
                    if selection.is_some() {
                        return Err(AppError::usage("only one list may be specified"));
                    }
                    let list = ctx
                        .args
                        .get(i + 1)
                        .ok_or_else(|| AppError::usage("option requires an argument"))?;
                    selection = Some((unit, parse_list(list)?));
                    i += 2;
                }
                None => {
                    files.push(ctx.args[i].clone());
                    i += 1;
                }
            }
        }

        let (unit, spans) =
            selection.ok_or_else(|| AppError::usage("you must specify a list of bytes or characters"))?;
        let file = at_most_one(&files, "cut")?;
        let text = read_input(ctx.env, file, ctx.stdin)?;

        for line in text.lines() {
            match unit {
                Unit::Bytes => {
                    let bytes = select(line.bytes(), &spans);
                    writeln!(ctx.stdout, "{}", String::from_utf8_lossy(&bytes))?;
                }
                Unit::Chars => {
                    let chars: String = select(line.chars(), &spans).into_iter().collect();
                    writeln!(ctx.stdout, "{chars}")?;
                }
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
    fn parse_list_forms() {
        assert_eq!(
            parse_list("1,3-5,7-,-2").unwrap(),
            vec![
                Span { start: 1, end: 1 },
                Span { start: 3, end: 5 },
                Span {
                    start: 7,
                    end: usize::MAX
                },
                Span { start: 1, end: 2 },
            ]
        );
    }

    #[test]
    fn parse_list_rejects_bad_ranges() {
        assert!(parse_list("0").is_err());
        assert!(parse_list("5-3").is_err());
        assert!(parse_list("-").is_err());
        assert!(parse_list("a").is_err());
    }

    #[test]
    fn cut_chars_range() {
        let env = Environment::new("/");
        assert_eq!(run(&Cut, &env, &["-c", "1-3"], "abcdef\n").unwrap(), "abc\n");
    }

    #[test]
    fn cut_overlapping_ranges_merge_in_order() {
        let env = Environment::new("/");
        assert_eq!(
            run(&Cut, &env, &["-b", "4-,1,2-3,3"], "abcdef\nxy\n").unwrap(),
            "abcdef\nxy\n"
        );
        assert_eq!(run(&Cut, &env, &["-b", "5,1"], "abcdef\n").unwrap(), "ae\n");
    }

    #[test]
    fn cut_requires_list() {
        let env = Environment::new("/");
        assert!(run(&Cut, &env, &[], "abc\n").is_err());
        assert!(run(&Cut, &env, &["-b"], "abc\n").is_err());
    }

    #[test]
    fn cut_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("file.txt"), "abcdef\n").unwrap();
        let env = Environment::new(dir.path());
        assert_eq!(run(&Cut, &env, &["-c", "1-3", "file.txt"], "").unwrap(), "abc\n");
    }
}
