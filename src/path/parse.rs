//! Route pattern parser.
//!
//! Grammar (lowest precedence first):
//!
//! ```text
//! expressions := sequence ( '|' sequence )*
//! sequence    := term+                      -- right-nested Concat
//! term        := '/' | '.' | LITERAL | ':' NAME | '*' NAME | '(' expressions ')'
//! ```
//!
//! Slashes and dots are separate terminals, so `/widgets/:id` becomes
//! `"/" + "widgets" + "/" + id` once rendered.
use super::PathNode;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Slash,
    Dot,
    Literal(String),
    Symbol(String),
    Star(String),
    LParen,
    RParen,
    Or,
}

pub fn parse(pattern: &str) -> Result<PathNode> {
    let tokens = tokenize(pattern)?;
    let mut parser = Parser { pattern, tokens, pos: 0 };
    let node = parser.expressions()?;
    match parser.tokens.get(parser.pos) {
        None => Ok(node),
        Some((offset, _)) => Err(parser.error(*offset, "unbalanced `)`")),
    }
}

// ------------------------------ Tokenizer --------------------------------- //

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_special(c: char) -> bool {
    matches!(c, '/' | '.' | '(' | ')' | '|' | ':' | '*' | '\\')
}

fn tokenize(pattern: &str) -> Result<Vec<(usize, Token)>> {
    let syntax = |offset: usize, message: &str| Error::PathSyntax {
        pattern: pattern.to_string(),
        offset,
        message: message.to_string(),
    };

    let mut tokens = Vec::new();
    let mut chars = pattern.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        let token = match c {
            '/' => Token::Slash,
            '.' => Token::Dot,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '|' => Token::Or,
            ':' | '*' => {
                let mut name = String::new();
                while let Some(&(_, n)) = chars.peek() {
                    if !is_name_char(n) { break; }
                    name.push(n);
                    chars.next();
                }
                if name.is_empty() {
                    return Err(syntax(offset, "expected a segment name"));
                }
                if c == ':' { Token::Symbol(name) } else { Token::Star(name) }
            }
            _ => {
                let mut text = String::new();
                let mut current = (offset, c);
                loop {
                    match current {
                        (at, '\\') => match chars.next() {
                            Some((_, escaped)) => text.push(escaped),
                            None => return Err(syntax(at, "dangling escape")),
                        },
                        (_, ch) => text.push(ch),
                    }
                    match chars.peek() {
                        Some(&next) if next.1 == '\\' || !is_special(next.1) => {
                            current = next;
                            chars.next();
                        }
                        _ => break,
                    }
                }
                Token::Literal(text)
            }
        };
        tokens.push((offset, token));
    }
    Ok(tokens)
}

// ------------------------------- Parser ----------------------------------- //

struct Parser<'a> {
    pattern: &'a str,
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, offset: usize, message: &str) -> Error {
        Error::PathSyntax {
            pattern: self.pattern.to_string(),
            offset,
            message: message.to_string(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map(|(o, _)| *o).unwrap_or(self.pattern.len())
    }

    fn expressions(&mut self) -> Result<PathNode> {
        let mut alternatives = vec![self.sequence()?];
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            alternatives.push(self.sequence()?);
        }
        if alternatives.len() == 1 {
            Ok(alternatives.remove(0))
        } else {
            Ok(PathNode::Alternation { children: alternatives })
        }
    }

    fn sequence(&mut self) -> Result<PathNode> {
        let mut terms = Vec::new();
        while let Some(token) = self.peek() {
            if matches!(token, Token::Or | Token::RParen) { break; }
            terms.push(self.term()?);
        }
        let mut terms = terms.into_iter().rev();
        let last = terms.next().ok_or_else(|| self.error(self.offset(), "empty expression"))?;
        Ok(terms.fold(last, |right, left| PathNode::concat(left, right)))
    }

    fn term(&mut self) -> Result<PathNode> {
        let offset = self.offset();
        let Some((_, token)) = self.tokens.get(self.pos).cloned() else {
            return Err(self.error(offset, "unexpected end of pattern"));
        };
        self.pos += 1;
        match token {
            Token::Slash => Ok(PathNode::literal("/")),
            Token::Dot => Ok(PathNode::literal(".")),
            Token::Literal(text) => Ok(PathNode::Literal { text }),
            Token::Symbol(name) => Ok(PathNode::symbol(&name)),
            Token::Star(name) => Ok(PathNode::wildcard(&name)),
            Token::LParen => {
                let body = self.expressions()?;
                if self.peek() != Some(&Token::RParen) {
                    return Err(self.error(offset, "unclosed `(`"));
                }
                self.pos += 1;
                Ok(PathNode::group(body))
            }
            Token::RParen | Token::Or => Err(self.error(offset, "unexpected token")),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> PathNode { PathNode::literal(s) }

    #[test]
    fn slashes_and_literals_are_separate_terms() {
        let node = parse("/widgets/:id").unwrap();
        let expected = PathNode::concat(
            lit("/"),
            PathNode::concat(lit("widgets"), PathNode::concat(lit("/"), PathNode::symbol("id"))),
        );
        assert_eq!(node, expected);
    }

    #[test]
    fn optional_format_group() {
        let node = parse("/a(.:format)").unwrap();
        let expected = PathNode::concat(
            lit("/"),
            PathNode::concat(
                lit("a"),
                PathNode::group(PathNode::concat(lit("."), PathNode::symbol("format"))),
            ),
        );
        assert_eq!(node, expected);
    }

    #[test]
    fn wildcard_and_alternation() {
        assert_eq!(
            parse("/*path").unwrap(),
            PathNode::concat(lit("/"), PathNode::wildcard("path"))
        );
        assert_eq!(
            parse("(a|b)").unwrap(),
            PathNode::group(PathNode::Alternation { children: vec![lit("a"), lit("b")] })
        );
    }

    #[test]
    fn escaped_specials_are_literal() {
        assert_eq!(parse(r"\:x").unwrap(), lit(":x"));
        assert_eq!(parse(r"a\(b").unwrap(), lit("a(b"));
    }

    #[test]
    fn literal_runs_keep_dashes_and_digits() {
        assert_eq!(
            parse("/v1-beta").unwrap(),
            PathNode::concat(lit("/"), lit("v1-beta"))
        );
    }

    #[test]
    fn syntax_errors_carry_offsets() {
        for (pattern, offset) in [("/a(/:b", 2), ("/a)", 2), ("/:", 1), ("", 0), ("/a||b", 3)] {
            match parse(pattern) {
                Err(Error::PathSyntax { offset: at, .. }) => assert_eq!(at, offset, "{pattern}"),
                other => panic!("{pattern}: expected syntax error, got {other:?}"),
            }
        }
    }
}
