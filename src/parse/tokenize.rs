use super::types::{Direction, Part, Quoting, Token, Word};
use crate::error::{Result, ShellError};

/// Accumulates the pieces of the word currently being lexed.
#[derive(Default)]
struct WordBuilder {
    parts: Vec<Part>,
    unquoted: String,
    started: bool,
}

impl WordBuilder {
    fn push_unquoted(&mut self, c: char) {
        self.unquoted.push(c);
        self.started = true;
    }

    fn flush_unquoted(&mut self) {
        if !self.unquoted.is_empty() {
            self.parts.push(Part::Literal {
                text: std::mem::take(&mut self.unquoted),
                quoting: Quoting::Unquoted,
            });
        }
    }

    fn push_part(&mut self, part: Part) {
        self.flush_unquoted();
        self.parts.push(part);
        self.started = true;
    }

    /// Emit the pending word, if any. `""` counts as a word.
    fn finish(&mut self, tokens: &mut Vec<Token>) {
        self.flush_unquoted();
        if self.started {
            tokens.push(Token::Word(Word {
                parts: std::mem::take(&mut self.parts),
            }));
        }
        self.started = false;
    }
}

fn closing(chars: &[char], from: usize, delim: char) -> Option<usize> {
    chars
        .get(from..)?
        .iter()
        .position(|&c| c == delim)
        .map(|p| from + p)
}

/// Split a command line into tokens, tracking quote state.
///
/// Operators (`<`, `>`, `|`, `;`, newline) are recognized only outside
/// quotes and backtick spans; they also end the current word.
pub fn tokenize(line: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    let mut tokens = Vec::new();
    let mut word = WordBuilder::default();
    let mut i = 0;

    while i < len {
        let c = chars[i];
        match c {
            '\n' => {
                word.finish(&mut tokens);
                tokens.push(Token::Separator { newline: true });
                i += 1;
            }
            c if c.is_whitespace() => {
                word.finish(&mut tokens);
                i += 1;
            }
            ';' => {
                word.finish(&mut tokens);
                tokens.push(Token::Separator { newline: false });
                i += 1;
            }
            '|' => {
                word.finish(&mut tokens);
                tokens.push(Token::Pipe);
                i += 1;
            }
            '<' | '>' => {
                word.finish(&mut tokens);
                let direction = if c == '<' { Direction::In } else { Direction::Out };
                tokens.push(Token::Redirect(direction));
                i += 1;
            }
            '\'' => {
                let end = closing(&chars, i + 1, '\'')
                    .ok_or_else(|| ShellError::syntax("unterminated single quote"))?;
                word.push_part(Part::Literal {
                    text: chars[i + 1..end].iter().collect(),
                    quoting: Quoting::Single,
                });
                i = end + 1;
            }
            '`' => {
                let end = closing(&chars, i + 1, '`')
                    .ok_or_else(|| ShellError::syntax("unterminated backtick substitution"))?;
                word.push_part(Part::Substitution {
                    command: chars[i + 1..end].iter().collect(),
                    quoted: false,
                });
                i = end + 1;
            }
            '"' => {
                i = lex_double_quoted(&chars, i + 1, &mut word)?;
            }
            '\\' if i + 1 < len => {
                // Escaped characters are literal, like a one-char single quote
                word.push_part(Part::Literal {
                    text: chars[i + 1].to_string(),
                    quoting: Quoting::Single,
                });
                i += 2;
            }
            _ => {
                word.push_unquoted(c);
                i += 1;
            }
        }
    }

    word.finish(&mut tokens);
    Ok(tokens)
}

/// Lex the body of a `"..."` span starting just after the opening quote.
/// Returns the index just past the closing quote.
fn lex_double_quoted(chars: &[char], mut i: usize, word: &mut WordBuilder) -> Result<usize> {
    let len = chars.len();
    let mut buf = String::new();

    while i < len {
        match chars[i] {
            '"' => {
                word.push_part(Part::Literal {
                    text: buf,
                    quoting: Quoting::Double,
                });
                return Ok(i + 1);
            }
            '\\' if i + 1 < len && matches!(chars[i + 1], '"' | '`' | '\\' | '$') => {
                buf.push(chars[i + 1]);
                i += 2;
            }
            '`' => {
                let end = closing(chars, i + 1, '`')
                    .ok_or_else(|| ShellError::syntax("unterminated backtick substitution"))?;
                if !buf.is_empty() {
                    word.push_part(Part::Literal {
                        text: std::mem::take(&mut buf),
                        quoting: Quoting::Double,
                    });
                }
                word.push_part(Part::Substitution {
                    command: chars[i + 1..end].iter().collect(),
                    quoted: true,
                });
                i = end + 1;
            }
            c => {
                buf.push(c);
                i += 1;
            }
        }
    }

    Err(ShellError::syntax("unterminated double quote"))
}
