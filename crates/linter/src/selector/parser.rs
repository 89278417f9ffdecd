//! Selector pattern parser
//!
//! ```text
//! selector  := compound (combinator compound)*
//! combinator:= ws* '>' ws* | ws+
//! compound  := (type | '*')? attribute*
//! attribute := '[' ws* path ws* (op ws* literal ws*)? ']'
//! path      := segment ('.' segment)*
//! op        := '=' | '!=' | '>' | '<' | '>=' | '<='
//! literal   := quoted string | number | word
//! ```

use super::{Combinator, Compound, Literal, Operator, Predicate, Selector};
use crate::error::SelectorError;
use crate::index::NodeKind;

pub(super) fn parse(pattern: &str) -> Result<Selector, SelectorError> {
    let mut parser = Parser { pattern, pos: 0 };
    parser.skip_ws();
    let mut compounds = vec![parser.compound()?];
    let mut combinators = Vec::new();

    loop {
        let had_ws = parser.skip_ws();
        if parser.at_end() {
            break;
        }
        let combinator = if parser.eat('>') {
            parser.skip_ws();
            Combinator::Child
        } else if had_ws {
            Combinator::Descendant
        } else {
            return Err(parser.error("expected a combinator"));
        };
        combinators.push(combinator);
        compounds.push(parser.compound()?);
    }

    Ok(Selector {
        pattern: pattern.to_string(),
        compounds,
        combinators,
    })
}

struct Parser<'p> {
    pattern: &'p str,
    pos: usize,
}

impl<'p> Parser<'p> {
    fn rest(&self) -> &'p str {
        &self.pattern[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.pattern.len()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
        self.pos > start
    }

    fn error(&self, message: &str) -> SelectorError {
        SelectorError::Malformed {
            pattern: self.pattern.to_string(),
            position: self.pos,
            message: message.to_string(),
        }
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'p str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !accept(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.pattern[start..self.pos]
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.pos;
        let kind = if self.eat('*') {
            None
        } else {
            let name = self.take_while(is_name_char);
            if name.is_empty() {
                None
            } else if let Some(kind) = NodeKind::ALL
                .iter()
                .filter(|kind| **kind != NodeKind::Unknown)
                .find(|kind| kind.type_name() == name)
            {
                Some(kind.type_name())
            } else {
                return Err(SelectorError::UnknownKind {
                    pattern: self.pattern.to_string(),
                    kind: name.to_string(),
                });
            }
        };

        let mut predicates = Vec::new();
        while self.peek() == Some('[') {
            predicates.push(self.attribute()?);
        }

        if self.pos == start {
            return Err(self.error("expected a node type, `*` or `[`"));
        }
        Ok(Compound { kind, predicates })
    }

    fn attribute(&mut self) -> Result<Predicate, SelectorError> {
        self.eat('[');
        self.skip_ws();
        let path = self.path()?;
        self.skip_ws();

        if self.eat(']') {
            return Ok(Predicate { path, test: None });
        }

        let operator = self.operator()?;
        self.skip_ws();
        let literal = self.literal()?;
        self.skip_ws();
        if !self.eat(']') {
            return Err(self.error("expected `]`"));
        }
        Ok(Predicate {
            path,
            test: Some((operator, literal)),
        })
    }

    fn path(&mut self) -> Result<Vec<String>, SelectorError> {
        let mut segments = Vec::new();
        loop {
            let segment = self.take_while(is_name_char);
            if segment.is_empty() {
                return Err(self.error("expected an attribute name"));
            }
            segments.push(segment.to_string());
            if !self.eat('.') {
                return Ok(segments);
            }
        }
    }

    fn operator(&mut self) -> Result<Operator, SelectorError> {
        let operators = [
            ("!=", Operator::Ne),
            (">=", Operator::Ge),
            ("<=", Operator::Le),
            ("=", Operator::Eq),
            (">", Operator::Gt),
            ("<", Operator::Lt),
        ];
        for (text, operator) in operators {
            if self.rest().starts_with(text) {
                self.pos += text.len();
                return Ok(operator);
            }
        }
        Err(self.error("expected an operator"))
    }

    fn literal(&mut self) -> Result<Literal, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut value = String::new();
                loop {
                    match self.peek() {
                        None => return Err(self.error("unterminated string")),
                        Some('\\') => {
                            self.pos += 1;
                            let Some(escaped) = self.peek() else {
                                return Err(self.error("unterminated string"));
                            };
                            value.push(escaped);
                            self.pos += escaped.len_utf8();
                        }
                        Some(c) if c == quote => {
                            self.pos += 1;
                            return Ok(Literal::Str(value));
                        }
                        Some(c) => {
                            value.push(c);
                            self.pos += c.len_utf8();
                        }
                    }
                }
            }
            _ => {
                let word = self.take_while(|c| is_name_char(c) || matches!(c, '.' | '-' | '+'));
                if word.is_empty() {
                    return Err(self.error("expected a value"));
                }
                Ok(match word {
                    "true" => Literal::Bool(true),
                    "false" => Literal::Bool(false),
                    "null" => Literal::Null,
                    _ => word
                        .parse::<f64>()
                        .map_or_else(|_| Literal::Str(word.to_string()), Literal::Num),
                })
            }
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attribute_predicate() {
        let selector = parse("FunctionDeclaration[params.length>2]").unwrap();
        assert_eq!(selector.compounds.len(), 1);
        let compound = &selector.compounds[0];
        assert_eq!(compound.kind, Some("FunctionDeclaration"));
        assert_eq!(compound.predicates[0].path, vec!["params", "length"]);
        assert_eq!(
            compound.predicates[0].test,
            Some((Operator::Gt, Literal::Num(2.0)))
        );
    }

    #[test]
    fn test_parse_combinators() {
        let selector = parse("ArrowFunctionExpression > BlockStatement ReturnStatement").unwrap();
        assert_eq!(
            selector.combinators,
            vec![Combinator::Child, Combinator::Descendant]
        );
        let selector = parse("Program>ExpressionStatement").unwrap();
        assert_eq!(selector.combinators, vec![Combinator::Child]);
    }

    #[test]
    fn test_parse_literals() {
        let selector = parse(r#"*[name="a b"][async=true][x != null][kind=const]"#).unwrap();
        let tests: Vec<_> = selector.compounds[0]
            .predicates
            .iter()
            .map(|p| p.test.clone().unwrap().1)
            .collect();
        assert_eq!(
            tests,
            vec![
                Literal::Str("a b".to_string()),
                Literal::Bool(true),
                Literal::Null,
                Literal::Str("const".to_string()),
            ]
        );
    }

    #[test]
    fn test_presence_predicate() {
        let selector = parse("Property[computed]").unwrap();
        assert_eq!(selector.compounds[0].predicates[0].test, None);
    }

    #[test]
    fn test_malformed_positions() {
        let error = parse("FunctionDeclaration[params.length>").unwrap_err();
        assert_eq!(
            error,
            SelectorError::Malformed {
                pattern: "FunctionDeclaration[params.length>".to_string(),
                position: 34,
                message: "expected a value".to_string(),
            }
        );
        assert!(matches!(
            parse("Program >").unwrap_err(),
            SelectorError::Malformed { position: 9, .. }
        ));
        assert!(matches!(
            parse("Program[a=1").unwrap_err(),
            SelectorError::Malformed { .. }
        ));
        assert!(matches!(parse("").unwrap_err(), SelectorError::Malformed { .. }));
    }

    #[test]
    fn test_unknown_kind() {
        assert_eq!(
            parse("FunctionDecl").unwrap_err(),
            SelectorError::UnknownKind {
                pattern: "FunctionDecl".to_string(),
                kind: "FunctionDecl".to_string(),
            }
        );
    }

    #[test]
    fn test_unicode_whitespace_between_compounds() {
        let selector = parse("Program\u{a0}> ExpressionStatement").unwrap();
        assert_eq!(selector.combinators, vec![Combinator::Child]);
        let selector = parse("Program\u{3000}Identifier").unwrap();
        assert_eq!(selector.combinators, vec![Combinator::Descendant]);
        let selector = parse("Identifier[\u{a0}name\u{a0}=\u{a0}x\u{a0}]").unwrap();
        assert_eq!(selector.compounds[0].predicates[0].path, vec!["name"]);
    }

    #[test]
    fn test_non_ascii_is_malformed_not_a_panic() {
        assert!(matches!(
            parse("Program \u{2603}").unwrap_err(),
            SelectorError::Malformed { position: 8, .. }
        ));
    }

    #[test]
    fn test_placeholder_kind_is_not_selectable() {
        assert!(matches!(
            parse("Unknown").unwrap_err(),
            SelectorError::UnknownKind { .. }
        ));
        assert!(matches!(
            parse("Program > Unknown").unwrap_err(),
            SelectorError::UnknownKind { .. }
        ));
    }
}
