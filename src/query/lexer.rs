//! Tokenizer for normalized query text.

use crate::query::ast::Operator;
use crate::types::{QueryError, Result};
use std::fmt;

/// Token kinds recognized in query text.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier or dotted path (`employees`, `employees.name`), also keywords
    Word(String),
    /// Numeric literal as written, grouping separators included
    Number(String),
    /// Quoted literal with the quotes removed
    Str(String),
    Comma,
    Semi,
    Op(Operator),
    /// Any other character; only the condition parser tolerates these
    Other(char),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(word) => write!(f, "'{}'", word),
            Self::Number(number) => write!(f, "number {}", number),
            Self::Str(text) => write!(f, "string '{}'", text),
            Self::Comma => f.write_str("','"),
            Self::Semi => f.write_str("';'"),
            Self::Op(op) => write!(f, "'{}'", op),
            Self::Other(c) => write!(f, "'{}'", c),
        }
    }
}

/// Token with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Split query text into tokens.
///
/// # Errors
///
/// Returns `QueryError::MalformedLiteral` for a quote without its closing
/// quote. Characters outside the grammar become [`TokenKind::Other`] and are
/// rejected by the parser wherever they are not skippable.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(c) = text[pos..].chars().next() {
        let start = pos;

        let kind = match c {
            c if c.is_whitespace() => {
                pos += c.len_utf8();
                continue;
            }
            ',' => {
                pos += 1;
                TokenKind::Comma
            }
            ';' => {
                pos += 1;
                TokenKind::Semi
            }
            '=' => {
                pos += 1;
                TokenKind::Op(Operator::Eq)
            }
            '<' | '>' => {
                let or_equal = bytes.get(pos + 1) == Some(&b'=');
                pos += if or_equal { 2 } else { 1 };
                TokenKind::Op(match (c, or_equal) {
                    ('<', true) => Operator::Le,
                    ('<', false) => Operator::Lt,
                    (_, true) => Operator::Ge,
                    (_, false) => Operator::Gt,
                })
            }
            '\'' | '"' => {
                let close = text[pos + 1..]
                    .find(c)
                    .ok_or(QueryError::MalformedLiteral(start))?;
                let content = &text[pos + 1..pos + 1 + close];
                pos += close + 2;
                TokenKind::Str(content.to_string())
            }
            c if c.is_ascii_digit() => {
                pos = scan_number(bytes, pos);
                TokenKind::Number(text[start..pos].to_string())
            }
            c if c.is_alphabetic() || c == '_' => {
                let len = text[pos..]
                    .find(|ch: char| !(ch.is_alphanumeric() || ch == '_' || ch == '.'))
                    .unwrap_or(text.len() - pos);
                pos += len;
                TokenKind::Word(text[start..pos].to_string())
            }
            other => {
                pos += other.len_utf8();
                TokenKind::Other(other)
            }
        };

        tokens.push(Token {
            kind,
            offset: start,
        });
    }

    Ok(tokens)
}

/// End of a numeric literal starting at `pos`.
///
/// Digits and dots are consumed directly; a run of commas and spaces is
/// consumed only when another digit follows it.
fn scan_number(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() {
        match bytes[pos] {
            b'0'..=b'9' | b'.' => pos += 1,
            b',' | b' ' => {
                let run = bytes[pos..]
                    .iter()
                    .take_while(|b| matches!(b, b',' | b' '))
                    .count();
                if bytes.get(pos + run).map_or(false, u8::is_ascii_digit) {
                    pos += run;
                } else {
                    break;
                }
            }
            _ => break,
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_statement_tokens() {
        assert_eq!(
            kinds("select t.a, t.b from t where t.a >= 10;"),
            vec![
                TokenKind::Word("select".into()),
                TokenKind::Word("t.a".into()),
                TokenKind::Comma,
                TokenKind::Word("t.b".into()),
                TokenKind::Word("from".into()),
                TokenKind::Word("t".into()),
                TokenKind::Word("where".into()),
                TokenKind::Word("t.a".into()),
                TokenKind::Op(Operator::Ge),
                TokenKind::Number("10".into()),
                TokenKind::Semi,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("< <= > >= ="),
            vec![
                TokenKind::Op(Operator::Lt),
                TokenKind::Op(Operator::Le),
                TokenKind::Op(Operator::Gt),
                TokenKind::Op(Operator::Ge),
                TokenKind::Op(Operator::Eq),
            ]
        );
        assert_eq!(
            kinds("t.a<=b.c"),
            vec![
                TokenKind::Word("t.a".into()),
                TokenKind::Op(Operator::Le),
                TokenKind::Word("b.c".into()),
            ]
        );
    }

    #[test]
    fn test_grouped_numbers() {
        assert_eq!(kinds("1,000,000.5"), vec![TokenKind::Number("1,000,000.5".into())]);
        assert_eq!(kinds("1 000"), vec![TokenKind::Number("1 000".into())]);
        assert_eq!(
            kinds("12 ;"),
            vec![TokenKind::Number("12".into()), TokenKind::Semi]
        );
        assert_eq!(
            kinds("1, x"),
            vec![
                TokenKind::Number("1".into()),
                TokenKind::Comma,
                TokenKind::Word("x".into()),
            ]
        );
    }

    #[test]
    fn test_quoted_literals_are_opaque() {
        let tokens = tokenize("x = 'from where, ;'").unwrap();
        assert_eq!(tokens[2].kind, TokenKind::Str("from where, ;".into()));
        assert_eq!(tokens[2].offset, 4);

        assert_eq!(kinds(r#""it's""#), vec![TokenKind::Str("it's".into())]);
    }

    #[test]
    fn test_unterminated_literal() {
        assert!(matches!(
            tokenize("x = \"open"),
            Err(QueryError::MalformedLiteral(4))
        ));
    }

    #[test]
    fn test_other_characters() {
        assert_eq!(
            kinds("select *"),
            vec![TokenKind::Word("select".into()), TokenKind::Other('*')]
        );
        assert_eq!(
            kinds("a != (b"),
            vec![
                TokenKind::Word("a".into()),
                TokenKind::Other('!'),
                TokenKind::Op(Operator::Eq),
                TokenKind::Other('('),
                TokenKind::Word("b".into()),
            ]
        );
    }
}
