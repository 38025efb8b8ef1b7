//! Statement and condition parser.
//!
//! Recursive descent over the token stream from [`tokenize`]. Grammar
//! (input is already normalized, so keywords are lower case):
//!
//! ```text
//! statement := "select" list "from" list [ ";" | "where" condition ]
//! list      := word { "," word }
//! condition := qualified op { skip } ( string | number | qualified ) [ ";" ]
//! op        := "=" | "<" | ">" | "<=" | ">="
//! skip      := op | "," | ";" | any other non-word character
//! ```
//!
//! So `t.a == 1`, `t.a = = 1` and `t.a = (1` all read as `t.a = 1`.

use crate::query::ast::{Condition, Operand, Statement};
use crate::query::lexer::{tokenize, Token, TokenKind};
use crate::types::{QueryError, Result};
use regex::Regex;
use serde_json::{Number, Value};
use std::sync::OnceLock;

const KEYWORDS: [&str; 3] = ["select", "from", "where"];

/// Shortest condition text accepted (`a.b=1` is the shortest useful one).
const MIN_CONDITION_LEN: usize = 3;

/// Parse a normalized `SELECT` statement.
///
/// # Errors
///
/// Returns `QueryError::InvalidSyntax` for any unrecognized shape,
/// including a failure inside the WHERE condition
///
/// # Example
///
/// ```rust
/// use percolate_query::query::parse_statement;
///
/// let stmt = parse_statement("select employees.id, employees.name from employees").unwrap();
/// assert_eq!(stmt.columns, vec!["employees.id", "employees.name"]);
/// assert_eq!(stmt.tables, vec!["employees"]);
/// assert!(stmt.condition.is_none());
/// ```
pub fn parse_statement(text: &str) -> Result<Statement> {
    Parser::new(text)
        .and_then(|mut parser| parser.statement())
        .map_err(into_syntax)
}

/// Parse a single comparison clause such as `monsters.id = employees.id`.
///
/// # Errors
///
/// Returns `QueryError::InvalidSyntax` if the clause is too short, has no
/// operator or left operand, or has a malformed right operand
pub fn parse_condition(text: &str) -> Result<Condition> {
    check_condition_len(text)?;
    Parser::new(text)
        .and_then(|mut parser| {
            let condition = parser.condition()?;
            parser.expect_end()?;
            Ok(condition)
        })
        .map_err(into_syntax)
}

fn into_syntax(err: QueryError) -> QueryError {
    match err {
        QueryError::MalformedLiteral(offset) => {
            QueryError::syntax(format!("unterminated quote at byte {}", offset))
        }
        other => other,
    }
}

fn check_condition_len(text: &str) -> Result<()> {
    if text.trim().len() < MIN_CONDITION_LEN {
        return Err(QueryError::syntax(format!(
            "condition '{}' is too short",
            text.trim()
        )));
    }
    Ok(())
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Result<Self> {
        Ok(Self {
            text,
            tokens: tokenize(text)?,
            pos: 0,
        })
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|token| &token.kind)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(TokenKind::Word(word)) if word == keyword)
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.at_keyword(keyword) {
            self.pos += 1;
            Ok(())
        } else {
            Err(QueryError::syntax(match self.peek() {
                Some(kind) => format!("expected '{}', found {}", keyword, kind),
                None => format!("expected '{}', found end of query", keyword),
            }))
        }
    }

    fn expect_end(&mut self) -> Result<()> {
        if let Some(TokenKind::Semi) = self.peek() {
            self.pos += 1;
        }
        match self.next() {
            None => Ok(()),
            Some(token) => Err(QueryError::syntax(format!(
                "unexpected {} at byte {}",
                token.kind, token.offset
            ))),
        }
    }

    fn statement(&mut self) -> Result<Statement> {
        if !self.at_keyword("select") {
            return Err(QueryError::syntax("query must start with SELECT"));
        }
        self.pos += 1;

        let columns = self.list("column")?;
        self.expect_keyword("from")?;
        let tables = self.list("table")?;

        let condition = if self.at_keyword("where") {
            let where_token = &self.tokens[self.pos];
            check_condition_len(&self.text[where_token.offset + "where".len()..])?;
            self.pos += 1;
            Some(self.condition()?)
        } else {
            None
        };
        self.expect_end()?;

        tracing::debug!(
            columns = columns.len(),
            tables = tables.len(),
            filtered = condition.is_some(),
            "Parsed statement"
        );

        Ok(Statement {
            columns,
            tables,
            condition,
        })
    }

    /// Comma-separated identifiers; at least one is required.
    fn list(&mut self, what: &str) -> Result<Vec<String>> {
        let mut items = Vec::new();
        loop {
            match self.next().map(|token| &token.kind) {
                Some(TokenKind::Word(word)) if !KEYWORDS.contains(&word.as_str()) => {
                    items.push(word.clone());
                }
                Some(kind) => {
                    return Err(QueryError::syntax(format!("expected {}, found {}", what, kind)))
                }
                None => {
                    return Err(QueryError::syntax(format!(
                        "expected {}, found end of query",
                        what
                    )))
                }
            }

            if let Some(TokenKind::Comma) = self.peek() {
                self.pos += 1;
            } else {
                return Ok(items);
            }
        }
    }

    /// Skip non-word, non-literal tokens between the operator and its operand.
    fn skip_to_operand(&mut self) {
        while let Some(TokenKind::Op(_) | TokenKind::Comma | TokenKind::Semi | TokenKind::Other(_)) =
            self.peek()
        {
            self.pos += 1;
        }
    }

    fn condition(&mut self) -> Result<Condition> {
        let (left_table, left_column) = match self.next().map(|token| &token.kind) {
            Some(TokenKind::Word(word)) => split_qualified(word).ok_or_else(|| {
                QueryError::syntax(format!("left operand '{}' is not table.column", word))
            })?,
            Some(TokenKind::Op(_)) => {
                return Err(QueryError::syntax("condition has no left operand"))
            }
            Some(kind) => {
                return Err(QueryError::syntax(format!(
                    "left operand must be table.column, found {}",
                    kind
                )))
            }
            None => return Err(QueryError::syntax("empty condition")),
        };

        let operator = match self.next().map(|token| &token.kind) {
            Some(TokenKind::Op(op)) => *op,
            _ => return Err(QueryError::syntax("missing comparison operator")),
        };
        self.skip_to_operand();

        let right = match self.next().map(|token| &token.kind) {
            Some(TokenKind::Str(text)) => Operand::Literal(Value::String(text.clone())),
            Some(TokenKind::Number(number)) => Operand::Literal(parse_number(number)?),
            Some(TokenKind::Word(word)) => {
                let (table, column) = split_qualified(word).ok_or_else(|| {
                    QueryError::syntax(format!(
                        "right operand '{}' is neither a literal nor table.column",
                        word
                    ))
                })?;
                Operand::Column { table, column }
            }
            Some(kind) => {
                return Err(QueryError::syntax(format!(
                    "invalid right operand {}",
                    kind
                )))
            }
            None => return Err(QueryError::syntax("condition has no right operand")),
        };

        Ok(Condition {
            left_table,
            left_column,
            operator,
            right,
        })
    }
}

/// Split `table.column` into its two non-empty parts.
fn split_qualified(word: &str) -> Option<(String, String)> {
    let mut parts = word.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(table), Some(column), None) if !table.is_empty() && !column.is_empty() => {
            Some((table.to_string(), column.to_string()))
        }
        _ => None,
    }
}

fn numeric_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(r"^\d[\d, ]*(\.\d+)?$").expect("valid numeric literal regex"))
}

/// Convert a numeric literal (with optional `,`/space grouping) to a JSON number.
fn parse_number(literal: &str) -> Result<Value> {
    if !numeric_shape().is_match(literal) {
        return Err(QueryError::syntax(format!("malformed number '{}'", literal)));
    }

    let digits: String = literal.chars().filter(|c| !matches!(c, ',' | ' ')).collect();
    if !digits.contains('.') {
        if let Ok(int) = digits.parse::<u64>() {
            return Ok(Value::Number(int.into()));
        }
    }

    digits
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| QueryError::syntax(format!("malformed number '{}'", literal)))
}
