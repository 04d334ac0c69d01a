//! Rule text parsing and antecedent expression trees.
//!
//! Grammar (keywords are case-insensitive, names are not):
//!
//! ```text
//! rule      := IF or_expr THEN name IS name
//! or_expr   := and_expr (OR and_expr)*
//! and_expr  := primary (AND primary)*
//! primary   := '(' or_expr ')' | name IS [NOT] name
//! ```
//!
//! Text is parsed once, at registration, into an [`Antecedent`] of names.
//! The engine then resolves names to indices, producing an [`Expr`] that is
//! evaluated every cycle with AND as minimum and OR as maximum.

use crate::fuzzy::error::FuzzyError;

/// `Variable IS Label`, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// Variable name
    pub variable: String,
    /// Label name
    pub label: String,
}

/// Parsed antecedent, still referring to variables and labels by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Antecedent {
    Is { clause: Clause, negated: bool },
    And(Box<Antecedent>, Box<Antecedent>),
    Or(Box<Antecedent>, Box<Antecedent>),
}

impl Antecedent {
    /// Maps every clause through `resolve`, keeping the tree shape.
    pub(crate) fn resolve<F>(&self, resolve: &F) -> Result<Expr, FuzzyError>
    where
        F: Fn(&Clause) -> Result<(usize, usize), FuzzyError>,
    {
        Ok(match self {
            Self::Is { clause, negated } => {
                let (variable, label) = resolve(clause)?;
                Expr::Atom {
                    variable,
                    label,
                    negated: *negated,
                }
            }
            Self::And(a, b) => Expr::And(Box::new(a.resolve(resolve)?), Box::new(b.resolve(resolve)?)),
            Self::Or(a, b) => Expr::Or(Box::new(a.resolve(resolve)?), Box::new(b.resolve(resolve)?)),
        })
    }
}

/// A rule as written: antecedent tree plus the `THEN` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    /// Condition tree
    pub antecedent: Antecedent,
    /// Output variable and label set by the rule
    pub consequent: Clause,
}

/// Antecedent with variables and labels resolved to database indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Atom {
        variable: usize,
        label: usize,
        negated: bool,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Truth value of the expression given per-variable fuzzified degrees.
    ///
    /// `degrees[v]` is `None` when variable `v` has no input; the index of the
    /// first such variable encountered is returned as the error.
    pub(crate) fn truth(&self, degrees: &[Option<Vec<f64>>]) -> Result<f64, usize> {
        match self {
            Self::Atom {
                variable,
                label,
                negated,
            } => {
                let mu = degrees
                    .get(*variable)
                    .and_then(Option::as_ref)
                    .ok_or(*variable)?[*label];
                Ok(if *negated { 1.0 - mu } else { mu })
            }
            Self::And(a, b) => Ok(a.truth(degrees)?.min(b.truth(degrees)?)),
            Self::Or(a, b) => Ok(a.truth(degrees)?.max(b.truth(degrees)?)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    If,
    Then,
    Is,
    Not,
    And,
    Or,
    LParen,
    RParen,
    Name(String),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

fn tokenize(rule: &str, text: &str) -> Result<Vec<Token>, FuzzyError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '(' || c == ')' {
            chars.next();
            let kind = if c == '(' { TokenKind::LParen } else { TokenKind::RParen };
            tokens.push(Token { kind, offset });
        } else if c.is_alphanumeric() || c == '_' {
            let mut word = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if c.is_alphanumeric() || c == '_' {
                    word.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            let kind = match word.to_ascii_uppercase().as_str() {
                "IF" => TokenKind::If,
                "THEN" => TokenKind::Then,
                "IS" => TokenKind::Is,
                "NOT" => TokenKind::Not,
                "AND" => TokenKind::And,
                "OR" => TokenKind::Or,
                _ => TokenKind::Name(word),
            };
            tokens.push(Token { kind, offset });
        } else {
            return Err(FuzzyError::RuleParse {
                rule: rule.to_owned(),
                offset,
                message: format!("unexpected character `{c}`"),
            });
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    rule: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
}

impl Parser<'_> {
    fn error(&self, message: impl Into<String>) -> FuzzyError {
        let offset = self.tokens.get(self.pos).map_or(self.end, |t| t.offset);
        FuzzyError::RuleParse {
            rule: self.rule.to_owned(),
            offset,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), FuzzyError> {
        if self.peek() == Some(kind) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn name(&mut self, what: &str) -> Result<String, FuzzyError> {
        if let Some(TokenKind::Name(name)) = self.peek() {
            let name = name.clone();
            self.pos += 1;
            Ok(name)
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn rule(&mut self) -> Result<ParsedRule, FuzzyError> {
        self.expect(&TokenKind::If, "IF")?;
        let antecedent = self.or_expr()?;
        self.expect(&TokenKind::Then, "THEN")?;
        let variable = self.name("output variable name")?;
        self.expect(&TokenKind::Is, "IS")?;
        let label = self.name("output label")?;
        if self.pos != self.tokens.len() {
            return Err(self.error("trailing input after consequent"));
        }
        Ok(ParsedRule {
            antecedent,
            consequent: Clause { variable, label },
        })
    }

    fn or_expr(&mut self) -> Result<Antecedent, FuzzyError> {
        let mut lhs = self.and_expr()?;
        while self.peek() == Some(&TokenKind::Or) {
            self.pos += 1;
            let rhs = self.and_expr()?;
            lhs = Antecedent::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Antecedent, FuzzyError> {
        let mut lhs = self.primary()?;
        while self.peek() == Some(&TokenKind::And) {
            self.pos += 1;
            let rhs = self.primary()?;
            lhs = Antecedent::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn primary(&mut self) -> Result<Antecedent, FuzzyError> {
        if self.peek() == Some(&TokenKind::LParen) {
            self.pos += 1;
            let inner = self.or_expr()?;
            self.expect(&TokenKind::RParen, "`)`")?;
            return Ok(inner);
        }

        let variable = self.name("variable name or `(`")?;
        self.expect(&TokenKind::Is, "IS")?;
        let negated = if self.peek() == Some(&TokenKind::Not) {
            self.pos += 1;
            true
        } else {
            false
        };
        let label = self.name("label")?;
        Ok(Antecedent::Is {
            clause: Clause { variable, label },
            negated,
        })
    }
}

/// Parses `IF ... THEN ...` rule text.
///
/// # Errors
///
/// Returns [`FuzzyError::RuleParse`] with the byte offset of the first
/// offending token.
pub fn parse_rule(rule: &str, text: &str) -> Result<ParsedRule, FuzzyError> {
    let tokens = tokenize(rule, text)?;
    let mut parser = Parser {
        rule,
        tokens,
        pos: 0,
        end: text.len(),
    };
    parser.rule()
}
