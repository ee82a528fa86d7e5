//! Argument resolution: command substitution, quote removal and globbing.
//!
//! Within one word the order is fixed: substitutions run first, unquoted
//! substitution output is word-split, and only then are fields holding an
//! unquoted `*` matched against the filesystem.

use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::error::Result;
use crate::parse::{Part, Quoting, Word};

/// What the resolver needs from the running shell.
pub trait SubstitutionContext {
    /// Directory that relative glob patterns are matched in.
    fn cwd(&self) -> &Path;

    /// Run `command` as a nested command line and return everything it
    /// wrote to stdout.
    fn substitute(&mut self, command: &str) -> Result<String>;
}

/// A field under construction. Each character remembers whether it came
/// from unquoted text and may therefore act as a glob metacharacter.
#[derive(Debug, Default)]
struct Field {
    chars: Vec<(char, bool)>,
    quoted: bool,
}

impl Field {
    fn push_str(&mut self, text: &str, globbable: bool) {
        self.chars.extend(text.chars().map(|c| (c, globbable)));
    }

    /// Empty unquoted fields vanish; `""` survives as an empty argument.
    fn keep(&self) -> bool {
        !self.chars.is_empty() || self.quoted
    }

    fn is_pattern(&self) -> bool {
        self.chars.iter().any(|&(c, globbable)| globbable && c == '*')
    }

    fn literal(&self) -> String {
        self.chars.iter().map(|&(c, _)| c).collect()
    }

    fn pattern(&self) -> String {
        let mut out = String::new();
        for &(c, globbable) in &self.chars {
            if globbable && c == '*' {
                out.push('*');
            } else {
                let mut buf = [0u8; 4];
                out.push_str(&Pattern::escape(c.encode_utf8(&mut buf)));
            }
        }
        out
    }
}

/// Remove exactly one trailing newline from captured output.
fn trim_newline(mut output: String) -> String {
    if output.ends_with('\n') {
        output.pop();
    }
    output
}

/// Splice unquoted substitution output into `fields`, splitting on whitespace.
fn split_into(fields: &mut Vec<Field>, text: &str) {
    for c in text.chars() {
        if c.is_whitespace() {
            if fields.last().is_some_and(Field::keep) {
                fields.push(Field::default());
            }
        } else if let Some(field) = fields.last_mut() {
            field.chars.push((c, true));
        }
    }
}

/// Expands words into final argument strings.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentResolver {
    options: MatchOptions,
}

impl Default for ArgumentResolver {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ArgumentResolver {
    /// `glob_hidden` lets `*` match names starting with a dot.
    pub fn new(glob_hidden: bool) -> Self {
        Self {
            options: MatchOptions {
                case_sensitive: true,
                require_literal_separator: true,
                require_literal_leading_dot: !glob_hidden,
            },
        }
    }

    /// Resolve one word into zero or more arguments.
    pub fn resolve_one<C>(&self, word: &Word, ctx: &mut C) -> Result<Vec<String>>
    where
        C: SubstitutionContext + ?Sized,
    {
        let mut fields = vec![Field::default()];

        for part in &word.parts {
            match part {
                Part::Literal { text, quoting } => {
                    let unquoted = *quoting == Quoting::Unquoted;
                    if let Some(field) = fields.last_mut() {
                        field.push_str(text, unquoted);
                        field.quoted |= !unquoted;
                    }
                }
                Part::Substitution { command, quoted } => {
                    let output = trim_newline(ctx.substitute(command)?);
                    if *quoted {
                        if let Some(field) = fields.last_mut() {
                            field.push_str(&output, false);
                            field.quoted = true;
                        }
                    } else {
                        split_into(&mut fields, &output);
                    }
                }
            }
        }

        let mut args = Vec::new();
        for field in fields.iter().filter(|f| f.keep()) {
            if field.is_pattern() {
                args.extend(self.expand(field, ctx.cwd()));
            } else {
                args.push(field.literal());
            }
        }
        Ok(args)
    }

    /// Resolve every word, concatenating the results in order.
    pub fn resolve_all<C>(&self, words: &[Word], ctx: &mut C) -> Result<Vec<String>>
    where
        C: SubstitutionContext + ?Sized,
    {
        let mut args = Vec::new();
        for word in words {
            args.extend(self.resolve_one(word, ctx)?);
        }
        Ok(args)
    }

    /// Match a field against the filesystem. No match, or a pattern the
    /// glob crate rejects, yields the literal text.
    fn expand(&self, field: &Field, cwd: &Path) -> Vec<String> {
        let literal = field.literal();
        let relative = !literal.starts_with('/');
        let pattern = if relative {
            let base = cwd.to_string_lossy();
            format!(
                "{}/{}",
                Pattern::escape(base.trim_end_matches('/')),
                field.pattern()
            )
        } else {
            field.pattern()
        };

        let Ok(paths) = glob::glob_with(&pattern, self.options) else {
            return vec![literal];
        };

        let mut matches: Vec<String> = paths
            .filter_map(|entry| entry.ok())
            .map(|path| {
                let shown = if relative {
                    path.strip_prefix(cwd).unwrap_or(&path)
                } else {
                    &path
                };
                shown.to_string_lossy().into_owned()
            })
            .collect();

        if matches.is_empty() {
            return vec![literal];
        }
        matches.sort();
        matches
    }
}
