// VecDocs — filter.rs
// Boolean filter expressions used by search, query and delete.
// Author: d65v <https://github.com/d65v>
//
// Grammar (keywords are case-insensitive):
//
//   expr     := or
//   or       := and (("or" | "||") and)*
//   and      := unary (("and" | "&&") unary)*
//   unary    := ("not" | "!") unary | cmp
//   cmp      := operand (cmp_op operand)*           chained: 1 < x < 5
//             | operand ["not"] "in" list
//             | operand ["not"] "like" string
//   operand  := literal | list | path | call | "(" expr ")"
//   path     := ident ("[" (string | int) "]")*
//   call     := ident "(" [expr ("," expr)*] ")"

use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use crate::{Result, VecDocsError};

// ── AST ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    ArrayContains,
    ArrayContainsAll,
    ArrayContainsAny,
    ArrayLength,
}

impl Func {
    fn lookup(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "ARRAY_CONTAINS" | "JSON_CONTAINS" => Some(Func::ArrayContains),
            "ARRAY_CONTAINS_ALL" | "JSON_CONTAINS_ALL" => Some(Func::ArrayContainsAll),
            "ARRAY_CONTAINS_ANY" | "JSON_CONTAINS_ANY" => Some(Func::ArrayContainsAny),
            "ARRAY_LENGTH" => Some(Func::ArrayLength),
            _ => None,
        }
    }

    fn arity(&self) -> usize {
        match self {
            Func::ArrayLength => 1,
            _ => 2,
        }
    }
}

/// A path step after the field name: `["key"]` or `[0]`.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Value),
    List(Vec<Expr>),
    Field { name: String, path: Vec<PathSegment> },
    Call { func: Func, args: Vec<Expr> },
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare { op: CmpOp, left: Box<Expr>, right: Box<Expr> },
    In { expr: Box<Expr>, list: Vec<Expr>, negated: bool },
    Like { expr: Box<Expr>, pattern: Regex, negated: bool },
}

/// Looks up field values for one entity.
pub trait FieldResolver {
    /// Value of a schema field or dynamic key. `$meta` yields the whole
    /// dynamic object.
    fn resolve(&self, name: &str) -> Option<Value>;
}

/// A parsed filter. The empty expression matches every entity.
#[derive(Debug, Clone)]
pub struct Filter {
    source: String,
    root: Option<Expr>,
}

impl Filter {
    pub fn parse(source: &str) -> Result<Self> {
        let tokens = tokenize(source)?;
        let root = if tokens.is_empty() {
            None
        } else {
            let mut parser = Parser { tokens, pos: 0 };
            let expr = parser.parse_or()?;
            if let Some(tok) = parser.tokens.get(parser.pos) {
                return Err(VecDocsError::InvalidFilter {
                    pos: tok.pos,
                    msg: format!("unexpected {:?}", tok.kind),
                });
            }
            Some(expr)
        };
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of the top-level fields the expression reads.
    pub fn fields(&self) -> Vec<String> {
        fn walk(e: &Expr, out: &mut Vec<String>) {
            match e {
                Expr::Field { name, .. } => {
                    if !out.contains(name) {
                        out.push(name.clone());
                    }
                }
                Expr::List(items) | Expr::Call { args: items, .. } => {
                    items.iter().for_each(|i| walk(i, out))
                }
                Expr::Not(a) => walk(a, out),
                Expr::And(a, b) | Expr::Or(a, b) => {
                    walk(a, out);
                    walk(b, out);
                }
                Expr::Compare { left, right, .. } => {
                    walk(left, out);
                    walk(right, out);
                }
                Expr::In { expr, list, .. } => {
                    walk(expr, out);
                    list.iter().for_each(|i| walk(i, out));
                }
                Expr::Like { expr, .. } => walk(expr, out),
                Expr::Literal(_) => {}
            }
        }
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            walk(root, &mut out);
        }
        out
    }

    pub fn matches(&self, entity: &dyn FieldResolver) -> bool {
        match &self.root {
            None => true,
            Some(expr) => matches!(eval(expr, entity), Some(Value::Bool(true))),
        }
    }
}

// ── Tokenizer ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Minus,
    Cmp(CmpOp),
    And,
    Or,
    Not,
    In,
    Like,
    True,
    False,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

fn tokenize(src: &str) -> Result<Vec<Token>> {
    let chars: Vec<(usize, char)> = src.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    let err = |pos: usize, msg: String| VecDocsError::InvalidFilter { pos, msg };

    while i < chars.len() {
        let (pos, c) = chars[i];
        let next = chars.get(i + 1).map(|(_, c)| *c);

        let (kind, width) = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '(' => (TokenKind::LParen, 1),
            ')' => (TokenKind::RParen, 1),
            '[' => (TokenKind::LBracket, 1),
            ']' => (TokenKind::RBracket, 1),
            ',' => (TokenKind::Comma, 1),
            '-' => (TokenKind::Minus, 1),
            '=' if next == Some('=') => (TokenKind::Cmp(CmpOp::Eq), 2),
            '!' if next == Some('=') => (TokenKind::Cmp(CmpOp::Ne), 2),
            '!' => (TokenKind::Not, 1),
            '<' if next == Some('=') => (TokenKind::Cmp(CmpOp::Le), 2),
            '<' => (TokenKind::Cmp(CmpOp::Lt), 1),
            '>' if next == Some('=') => (TokenKind::Cmp(CmpOp::Ge), 2),
            '>' => (TokenKind::Cmp(CmpOp::Gt), 1),
            '&' if next == Some('&') => (TokenKind::And, 2),
            '|' if next == Some('|') => (TokenKind::Or, 2),
            '"' | '\'' => {
                let quote = c;
                let mut s = String::new();
                let mut j = i + 1;
                loop {
                    match chars.get(j) {
                        None => return Err(err(pos, "unterminated string".into())),
                        Some((_, '\\')) => {
                            let escaped = chars
                                .get(j + 1)
                                .map(|(_, c)| *c)
                                .ok_or_else(|| err(pos, "unterminated string".into()))?;
                            s.push(match escaped {
                                'n' => '\n',
                                't' => '\t',
                                other => other,
                            });
                            j += 2;
                        }
                        Some((_, ch)) if *ch == quote => break,
                        Some((_, ch)) => {
                            s.push(*ch);
                            j += 1;
                        }
                    }
                }
                (TokenKind::Str(s), j + 1 - i)
            }
            c if c.is_ascii_digit() => {
                let mut j = i;
                let (mut seen_dot, mut seen_exp) = (false, false);
                while let Some((_, ch)) = chars.get(j) {
                    if ch.is_ascii_digit() {
                        j += 1;
                    } else if *ch == '.' && !seen_dot && !seen_exp {
                        seen_dot = true;
                        j += 1;
                    } else if (*ch == 'e' || *ch == 'E') && !seen_exp {
                        seen_exp = true;
                        j += 1;
                        if let Some((_, '-')) | Some((_, '+')) = chars.get(j) {
                            j += 1;
                        }
                    } else {
                        break;
                    }
                }
                let is_float = seen_dot || seen_exp;
                let text: String = chars[i..j].iter().map(|(_, c)| *c).collect();
                let kind = if is_float {
                    TokenKind::Float(
                        text.parse()
                            .map_err(|_| err(pos, format!("bad number '{}'", text)))?,
                    )
                } else {
                    TokenKind::Int(
                        text.parse()
                            .map_err(|_| err(pos, format!("bad number '{}'", text)))?,
                    )
                };
                (kind, j - i)
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let mut j = i;
                while let Some((_, ch)) = chars.get(j) {
                    if ch.is_alphanumeric() || *ch == '_' || *ch == '$' {
                        j += 1;
                    } else {
                        break;
                    }
                }
                let word: String = chars[i..j].iter().map(|(_, c)| *c).collect();
                let kind = match word.to_ascii_lowercase().as_str() {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "not" => TokenKind::Not,
                    "in" => TokenKind::In,
                    "like" => TokenKind::Like,
                    "true" => TokenKind::True,
                    "false" => TokenKind::False,
                    _ => TokenKind::Ident(word),
                };
                (kind, j - i)
            }
            other => return Err(err(pos, format!("unexpected character '{}'", other))),
        };

        tokens.push(Token { kind, pos });
        i += width;
    }

    Ok(tokens)
}

// ── Parser ────────────────────────────────────────────────────────────────────

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.pos)
    }

    fn error<T>(&self, msg: impl Into<String>) -> Result<T> {
        Err(VecDocsError::InvalidFilter {
            pos: self.position(),
            msg: msg.into(),
        })
    }

    fn next(&mut self) -> Option<TokenKind> {
        let tok = self.tokens.get(self.pos).map(|t| t.kind.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.peek() == Some(&kind) {
            self.pos += 1;
            Ok(())
        } else {
            self.error(format!("expected {:?}", kind))
        }
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&TokenKind::Or) {
            self.pos += 1;
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        while self.peek() == Some(&TokenKind::And) {
            self.pos += 1;
            let right = self.parse_unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.peek() == Some(&TokenKind::Not) {
            self.pos += 1;
            let inner = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let first = self.parse_operand()?;

        // `x not in [...]` / `x not like "..."`
        let negated = self.peek() == Some(&TokenKind::Not)
            && matches!(self.peek_at(1), Some(TokenKind::In) | Some(TokenKind::Like));
        if negated {
            self.pos += 1;
        }

        match self.peek() {
            Some(TokenKind::In) => {
                self.pos += 1;
                let list = match self.parse_operand()? {
                    Expr::List(items) => items,
                    _ => return self.error("'in' needs a list"),
                };
                Ok(Expr::In {
                    expr: Box::new(first),
                    list,
                    negated,
                })
            }
            Some(TokenKind::Like) => {
                self.pos += 1;
                let pattern = match self.next() {
                    Some(TokenKind::Str(s)) => match like_regex(&s) {
                        Ok(re) => re,
                        Err(e) => return self.error(e.to_string()),
                    },
                    _ => return self.error("'like' needs a string pattern"),
                };
                Ok(Expr::Like {
                    expr: Box::new(first),
                    pattern,
                    negated,
                })
            }
            Some(TokenKind::Cmp(_)) => {
                let mut operands = vec![first];
                let mut ops = Vec::new();
                while let Some(TokenKind::Cmp(op)) = self.peek() {
                    ops.push(*op);
                    self.pos += 1;
                    operands.push(self.parse_operand()?);
                }
                // a < b < c  =>  (a < b) and (b < c)
                let mut expr: Option<Expr> = None;
                for (i, op) in ops.into_iter().enumerate() {
                    let cmp = Expr::Compare {
                        op,
                        left: Box::new(operands[i].clone()),
                        right: Box::new(operands[i + 1].clone()),
                    };
                    expr = Some(match expr {
                        None => cmp,
                        Some(prev) => Expr::And(Box::new(prev), Box::new(cmp)),
                    });
                }
                match expr {
                    Some(e) => Ok(e),
                    None => self.error("expected comparison"),
                }
            }
            _ => Ok(first),
        }
    }

    fn parse_operand(&mut self) -> Result<Expr> {
        match self.next() {
            Some(TokenKind::Int(v)) => Ok(Expr::Literal(Value::from(v))),
            Some(TokenKind::Float(v)) => Ok(Expr::Literal(Value::from(v))),
            Some(TokenKind::Str(s)) => Ok(Expr::Literal(Value::from(s))),
            Some(TokenKind::True) => Ok(Expr::Literal(Value::Bool(true))),
            Some(TokenKind::False) => Ok(Expr::Literal(Value::Bool(false))),
            Some(TokenKind::Minus) => match self.peek().cloned() {
                Some(TokenKind::Int(v)) => {
                    self.pos += 1;
                    Ok(Expr::Literal(Value::from(-v)))
                }
                Some(TokenKind::Float(v)) => {
                    self.pos += 1;
                    Ok(Expr::Literal(Value::from(-v)))
                }
                _ => self.error("'-' must precede a number"),
            },
            Some(TokenKind::LParen) => {
                let inner = self.parse_or()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            Some(TokenKind::LBracket) => {
                let mut items = Vec::new();
                if self.peek() != Some(&TokenKind::RBracket) {
                    loop {
                        items.push(self.parse_operand()?);
                        if self.peek() == Some(&TokenKind::Comma) {
                            self.pos += 1;
                        } else {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RBracket)?;
                Ok(Expr::List(items))
            }
            Some(TokenKind::Ident(name)) => {
                if self.peek() == Some(&TokenKind::LParen) {
                    return self.parse_call(&name);
                }
                let mut path = Vec::new();
                while self.peek() == Some(&TokenKind::LBracket) {
                    self.pos += 1;
                    let seg = match self.peek().cloned() {
                        Some(TokenKind::Str(k)) => PathSegment::Key(k),
                        Some(TokenKind::Int(i)) if i >= 0 => PathSegment::Index(i as usize),
                        _ => return self.error("expected a string key or index"),
                    };
                    self.pos += 1;
                    self.expect(TokenKind::RBracket)?;
                    path.push(seg);
                }
                Ok(Expr::Field { name, path })
            }
            Some(_) => {
                self.pos -= 1;
                self.error("expected an operand")
            }
            None => self.error("unexpected end of expression"),
        }
    }

    fn parse_call(&mut self, name: &str) -> Result<Expr> {
        let func = match Func::lookup(name) {
            Some(f) => f,
            None => {
                self.pos -= 1;
                return self.error(format!("unknown function '{}'", name));
            }
        };
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.peek() != Some(&TokenKind::RParen) {
            loop {
                args.push(self.parse_or()?);
                if self.peek() == Some(&TokenKind::Comma) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        if args.len() != func.arity() {
            return self.error(format!(
                "{} takes {} argument(s), got {}",
                name,
                func.arity(),
                args.len()
            ));
        }
        Ok(Expr::Call { func, args })
    }
}

/// Translate a `like` pattern: `%` matches any run, `_` a single char.
fn like_regex(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    let mut re = String::from("(?s)^");
    for c in pattern.chars() {
        match c {
            '%' => re.push_str(".*"),
            '_' => re.push('.'),
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    Regex::new(&re)
}

// ── Evaluation ────────────────────────────────────────────────────────────────

fn eval(expr: &Expr, entity: &dyn FieldResolver) -> Option<Value> {
    match expr {
        Expr::Literal(v) => Some(v.clone()),
        Expr::List(items) => Some(Value::Array(
            items.iter().map(|i| eval(i, entity).unwrap_or(Value::Null)).collect(),
        )),
        Expr::Field { name, path } => {
            let mut value = entity.resolve(name)?;
            for seg in path {
                value = match seg {
                    PathSegment::Key(k) => value.get(k.as_str())?.clone(),
                    PathSegment::Index(i) => value.get(*i)?.clone(),
                };
            }
            Some(value)
        }
        Expr::Not(inner) => match eval(inner, entity) {
            Some(Value::Bool(b)) => Some(Value::Bool(!b)),
            _ => Some(Value::Bool(false)),
        },
        Expr::And(a, b) => Some(Value::Bool(truthy(eval(a, entity)) && truthy(eval(b, entity)))),
        Expr::Or(a, b) => Some(Value::Bool(truthy(eval(a, entity)) || truthy(eval(b, entity)))),
        Expr::Compare { op, left, right } => {
            let (l, r) = (eval(left, entity)?, eval(right, entity)?);
            Some(Value::Bool(compare(*op, &l, &r)))
        }
        Expr::In { expr, list, negated } => {
            let v = eval(expr, entity)?;
            if v.is_null() {
                return Some(Value::Bool(false));
            }
            let found = list
                .iter()
                .filter_map(|item| eval(item, entity))
                .any(|item| values_equal(&v, &item));
            Some(Value::Bool(found != *negated))
        }
        Expr::Like { expr, pattern, negated } => match eval(expr, entity)? {
            Value::String(s) => Some(Value::Bool(pattern.is_match(&s) != *negated)),
            _ => Some(Value::Bool(false)),
        },
        Expr::Call { func, args } => eval_call(*func, args, entity),
    }
}

fn eval_call(func: Func, args: &[Expr], entity: &dyn FieldResolver) -> Option<Value> {
    let target = eval(&args[0], entity)?;
    let items = target.as_array()?;
    match func {
        Func::ArrayLength => Some(Value::from(items.len())),
        Func::ArrayContains => {
            let needle = eval(&args[1], entity)?;
            Some(Value::Bool(items.iter().any(|i| values_equal(i, &needle))))
        }
        Func::ArrayContainsAll | Func::ArrayContainsAny => {
            let needles = eval(&args[1], entity)?;
            let needles = needles.as_array()?;
            let contains = |n: &Value| items.iter().any(|i| values_equal(i, n));
            let ok = if func == Func::ArrayContainsAll {
                needles.iter().all(contains)
            } else {
                needles.iter().any(contains)
            };
            Some(Value::Bool(ok))
        }
    }
}

fn truthy(v: Option<Value>) -> bool {
    matches!(v, Some(Value::Bool(true)))
}

/// Equality that treats `1` and `1.0` as the same number.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn compare(op: CmpOp, l: &Value, r: &Value) -> bool {
    let ord = match (l, r) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => a.as_f64().zip(b.as_f64()).and_then(|(x, y)| x.partial_cmp(&y)),
        },
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) if matches!(op, CmpOp::Eq | CmpOp::Ne) => Some(a.cmp(b)),
        (Value::Null, _) | (_, Value::Null) => None,
        _ if matches!(op, CmpOp::Eq | CmpOp::Ne) => {
            return (l == r) == (op == CmpOp::Eq);
        }
        _ => None,
    };

    match ord {
        None => false,
        Some(o) => match op {
            CmpOp::Eq => o == Ordering::Equal,
            CmpOp::Ne => o != Ordering::Equal,
            CmpOp::Lt => o == Ordering::Less,
            CmpOp::Le => o != Ordering::Greater,
            CmpOp::Gt => o == Ordering::Greater,
            CmpOp::Ge => o != Ordering::Less,
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    struct Entity(Map<String, Value>);

    impl FieldResolver for Entity {
        fn resolve(&self, name: &str) -> Option<Value> {
            if name == "$meta" {
                return self.0.get("$meta").cloned();
            }
            self.0
                .get(name)
                .cloned()
                .or_else(|| self.0.get("$meta").and_then(|m| m.get(name)).cloned())
        }
    }

    fn entity() -> Entity {
        match json!({
            "id": 12,
            "title": "Top 10 Python tricks",
            "publication": "Towards Data Science",
            "reading_time": 11,
            "claps": 1800,
            "responses": 20,
            "score": 0.75,
            "color_coord": [7, 8, 9],
            "article_meta": {"claps": 40, "tags": ["rust", "db"], "reading_time": 6},
            "$meta": {"color": "red_7025", "size": 3}
        }) {
            Value::Object(m) => Entity(m),
            _ => unreachable!(),
        }
    }

    fn check(expr: &str) -> bool {
        Filter::parse(expr).unwrap().matches(&entity())
    }

    #[test]
    fn test_empty_matches_everything() {
        assert!(Filter::parse("").unwrap().is_empty());
        assert!(check("   "));
    }

    #[test]
    fn test_chained_range() {
        assert!(check("10 < id < 15"));
        assert!(!check("500 < id < 800"));
        assert!(check("10 < reading_time < 15"));
    }

    #[test]
    fn test_boolean_combinations() {
        assert!(check("claps > 1500 and responses > 15"));
        assert!(check("claps > 5000 or responses > 15"));
        assert!(!check("not (claps > 1500)"));
        assert!(check(
            "(publication == \"Towards Data Science\") and ((claps > 1500 and responses > 15) or (10 < reading_time < 15))"
        ));
        assert!(check("claps > 1500 && !(responses < 15)"));
    }

    #[test]
    fn test_in_and_not_in() {
        assert!(check("id in [11, 12, 13]"));
        assert!(!check("id in [5,6,7,8,9]"));
        assert!(!check("publication not in [\"Towards Data Science\", \"Personal Growth\"]"));
        assert!(check("publication not in ['The Startup']"));
    }

    #[test]
    fn test_like() {
        assert!(check("title like \"Top%\""));
        assert!(!check("title like \"%Java%\""));
        assert!(check("title like \"Top 1_ Python%\""));
        assert!(check("title not like \"Bottom%\""));
    }

    #[test]
    fn test_dynamic_and_meta_fields() {
        assert!(check("$meta[\"color\"] like \"red%\""));
        assert!(check("color like \"red%\""));
        assert!(!check("$meta[\"color\"] like \"brown_8%\""));
        assert!(check("size == 3"));
    }

    #[test]
    fn test_json_path() {
        assert!(check("article_meta['claps'] > 30 and article_meta['reading_time'] < 10"));
        assert!(check("article_meta[\"tags\"][0] == \"rust\""));
        assert!(check("JSON_CONTAINS(article_meta[\"tags\"], \"db\")"));
    }

    #[test]
    fn test_array_functions() {
        assert!(check("ARRAY_CONTAINS(color_coord, 8)"));
        assert!(check("ARRAY_CONTAINS_ALL(color_coord, [7, 8])"));
        assert!(!check("ARRAY_CONTAINS_ALL(color_coord, [7, 10])"));
        assert!(check("array_contains_any(color_coord, [1, 9])"));
        assert!(check("ARRAY_LENGTH(color_coord) == 3"));
    }

    #[test]
    fn test_numbers_mixed() {
        assert!(check("score > 0.5"));
        assert!(check("score < 7.5e-1 or score == 75e-2"));
        assert!(check("id == 12.0"));
        assert!(check("score < 1"));
        assert!(check("id > -1"));
    }

    #[test]
    fn test_missing_field_is_false() {
        assert!(!check("unknown > 1"));
        assert!(!check("unknown != 1"));
        assert!(!check("unknown in [1]"));
        assert!(!check("unknown not in [1]"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Filter::parse("id >"),
            Err(VecDocsError::InvalidFilter { .. })
        ));
        assert!(Filter::parse("title like 5").is_err());
        assert!(Filter::parse("id in 5").is_err());
        assert!(Filter::parse("\"open").is_err());
        assert!(Filter::parse("FOO(id)").is_err());
        assert!(Filter::parse("id == 1 )").is_err());
        match Filter::parse("id # 1") {
            Err(VecDocsError::InvalidFilter { pos, .. }) => assert_eq!(pos, 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_fields_listed() {
        let f = Filter::parse("claps > 1 and $meta[\"color\"] == 'x' or claps < 0").unwrap();
        assert_eq!(f.fields(), vec!["claps".to_string(), "$meta".to_string()]);
    }
}
