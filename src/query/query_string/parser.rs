//! Recursive descent parser for query strings
//!
//! # Grammar
//!
//! ```text
//! query       := or_expr
//! or_expr     := and_expr (OR and_expr)*
//! and_expr    := not_expr (AND? not_expr)*
//! not_expr    := (NOT | '-' | '+')? primary
//! primary     := match_all | field_query | grouped | value
//! match_all   := '*' (':' '*')?
//! field_query := TERM COLON (range | '*' | value)
//! range       := ('[' | '{') bound TO bound (']' | '}') boost?
//! value       := (TERM | NUMBER | QUOTED) boost?
//! boost       := CARET number?
//! grouped     := '(' or_expr ')'
//! ```

use super::lexer::{Lexer, Token};
use crate::error::QtyError;
use crate::query::ast::QueryNode;
use crate::query::nodes::{AllDocsQuery, BoolQuery, RangeQuery, TermQuery};
use crate::query::types::{MatchOperator, RangeBounds, RangeValue};
use crate::Result;

/// Default field to search when no field is specified
pub const DEFAULT_FIELD: &str = "content";

/// Boost applied when a caret carries no value
const DEFAULT_CARET_BOOST: f32 = 2.0;

/// Parser for Lucene-style query strings
pub struct QueryStringParser {
    lexer: Lexer,
    current_token: Token,
    /// Default field for unqualified terms
    default_field: String,
    /// Default operator between adjacent clauses
    default_operator: MatchOperator,
}

impl QueryStringParser {
    /// Create a new parser for the given query string
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token()?;

        Ok(Self {
            lexer,
            current_token,
            default_field: DEFAULT_FIELD.to_string(),
            default_operator: MatchOperator::Or,
        })
    }

    /// Set the default field for unqualified terms
    pub fn with_default_field(mut self, field: impl Into<String>) -> Self {
        self.default_field = field.into();
        self
    }

    /// Set the default operator between adjacent clauses
    pub fn with_default_operator(mut self, operator: MatchOperator) -> Self {
        self.default_operator = operator;
        self
    }

    /// Parse the query string into a query AST
    pub fn parse(&mut self) -> Result<Box<dyn QueryNode>> {
        if self.current_token == Token::Eof {
            return Err(QtyError::QueryParseError("Empty query".to_string()));
        }

        let query = self.parse_or_expr()?;

        if self.current_token != Token::Eof {
            return Err(QtyError::QueryParseError(format!(
                "Unexpected token after query: {:?}",
                self.current_token
            )));
        }

        Ok(query)
    }

    /// Parse: or_expr := and_expr (OR and_expr)*
    fn parse_or_expr(&mut self) -> Result<Box<dyn QueryNode>> {
        let mut clauses = vec![self.parse_and_expr()?];

        while self.current_token == Token::Or {
            self.advance()?;
            clauses.push(self.parse_and_expr()?);
        }

        Ok(Self::combine(clauses, MatchOperator::Or))
    }

    /// Parse: and_expr := not_expr (AND? not_expr)*
    ///
    /// Explicit AND and negations are always required; adjacent clauses
    /// without an operator are combined with the default operator.
    fn parse_and_expr(&mut self) -> Result<Box<dyn QueryNode>> {
        let mut explicit = vec![self.parse_not_expr()?];
        let mut implicit: Vec<Box<dyn QueryNode>> = Vec::new();

        loop {
            if self.current_token == Token::And {
                self.advance()?;
                if !implicit.is_empty() {
                    self.fold_implicit(&mut explicit, std::mem::take(&mut implicit));
                }
                explicit.push(self.parse_not_expr()?);
            } else if self.current_token == Token::Not || self.current_token == Token::Minus {
                explicit.push(self.parse_not_expr()?);
            } else if self.is_start_of_primary() {
                implicit.push(self.parse_not_expr()?);
            } else {
                break;
            }
        }

        if !implicit.is_empty() {
            self.fold_implicit(&mut explicit, implicit);
        }
        Ok(Self::combine(explicit, MatchOperator::And))
    }

    /// Merge the last explicit clause with the adjacent clauses that follow it
    fn fold_implicit(
        &self,
        explicit: &mut Vec<Box<dyn QueryNode>>,
        mut implicit: Vec<Box<dyn QueryNode>>,
    ) {
        if let Some(last) = explicit.pop() {
            implicit.insert(0, last);
        }
        explicit.push(Self::combine(implicit, self.default_operator));
    }

    /// Collapse clauses into one node
    fn combine(mut clauses: Vec<Box<dyn QueryNode>>, operator: MatchOperator) -> Box<dyn QueryNode> {
        if clauses.len() == 1 {
            if let Some(single) = clauses.pop() {
                return single;
            }
        }

        let mut query = BoolQuery::new();
        match operator {
            MatchOperator::And => query.must = clauses,
            MatchOperator::Or => query.should = clauses,
        }
        Box::new(query)
    }

    /// Parse: not_expr := (NOT | '-' | '+')? primary
    fn parse_not_expr(&mut self) -> Result<Box<dyn QueryNode>> {
        match self.current_token {
            Token::Not | Token::Minus => {
                self.advance()?;
                let inner = self.parse_primary()?;
                let mut query = BoolQuery::new();
                query.must_not.push(inner);
                Ok(Box::new(query))
            }
            Token::Plus => {
                self.advance()?;
                let inner = self.parse_primary()?;
                let mut query = BoolQuery::new();
                query.must.push(inner);
                Ok(Box::new(query))
            }
            _ => self.parse_primary(),
        }
    }

    /// Parse: primary := match_all | field_query | grouped | value
    fn parse_primary(&mut self) -> Result<Box<dyn QueryNode>> {
        match &self.current_token {
            Token::LeftParen => self.parse_grouped(),
            Token::Asterisk => {
                self.advance()?;
                if self.current_token == Token::Colon {
                    self.advance()?;
                    self.expect(Token::Asterisk)?;
                }
                let boost = self.parse_boost()?;
                Ok(Box::new(AllDocsQuery::new().with_boost(boost)))
            }
            Token::Term(term) => {
                let term = term.clone();
                self.advance()?;

                if self.current_token == Token::Colon {
                    self.advance()?;
                    self.parse_field_value(&term)
                } else {
                    let field = self.default_field.clone();
                    self.finish_value(&field, term)
                }
            }
            Token::Number(_) | Token::QuotedString(_) => {
                let field = self.default_field.clone();
                self.parse_field_value(&field)
            }
            _ => Err(QtyError::QueryParseError(format!(
                "Unexpected token: {:?}",
                self.current_token
            ))),
        }
    }

    /// Parse the value after `field:`
    fn parse_field_value(&mut self, field: &str) -> Result<Box<dyn QueryNode>> {
        match &self.current_token {
            Token::LeftBracket | Token::LeftBrace => self.parse_range_query(field),
            Token::Asterisk => {
                // field:* matches every document that has the field
                self.advance()?;
                let boost = self.parse_boost()?;
                Ok(Box::new(RangeQuery::new(field).with_boost(boost)))
            }
            Token::LeftParen => Err(QtyError::QueryParseError(format!(
                "Grouped clauses after '{}:' are not supported",
                field
            ))),
            Token::Term(term) | Token::QuotedString(term) => {
                let term = term.clone();
                self.advance()?;
                self.finish_value(field, term)
            }
            Token::Number(n) => {
                let term = n.to_string();
                self.advance()?;
                self.finish_value(field, term)
            }
            _ => Err(QtyError::QueryParseError(format!(
                "Expected value after field '{}:', got {:?}",
                field, self.current_token
            ))),
        }
    }

    /// Build a term query for `field:term` plus its optional boost
    fn finish_value(&mut self, field: &str, term: String) -> Result<Box<dyn QueryNode>> {
        if term.contains('*') || term.contains('?') {
            return Err(QtyError::QueryParseError(format!(
                "Wildcard terms are not supported: {}",
                term
            )));
        }
        let boost = self.parse_boost()?;
        Ok(Box::new(TermQuery::new(field, term).with_boost(boost)))
    }

    /// Parse: grouped := '(' or_expr ')'
    fn parse_grouped(&mut self) -> Result<Box<dyn QueryNode>> {
        self.expect(Token::LeftParen)?;
        let expr = self.parse_or_expr()?;
        self.expect(Token::RightParen)?;
        Ok(expr)
    }

    /// Parse an optional `^boost`; fuzzy/slop modifiers are rejected
    fn parse_boost(&mut self) -> Result<f32> {
        if let Token::Tilde(_) = self.current_token {
            return Err(QtyError::QueryParseError(
                "Fuzzy and proximity modifiers are not supported".to_string(),
            ));
        }

        if let Token::Caret(value) = &self.current_token {
            let boost = value.unwrap_or(DEFAULT_CARET_BOOST);
            self.advance()?;
            return Ok(boost);
        }
        Ok(1.0)
    }

    /// Parse range query: [low TO high] or {low TO high}
    fn parse_range_query(&mut self, field: &str) -> Result<Box<dyn QueryNode>> {
        let inclusive_lower = self.current_token == Token::LeftBracket;
        self.advance()?;

        let lower = self.parse_range_value()?;
        self.expect(Token::To)?;
        let upper = self.parse_range_value()?;

        let inclusive_upper = match self.current_token {
            Token::RightBracket => true,
            Token::RightBrace => false,
            _ => {
                return Err(QtyError::QueryParseError(
                    "Expected ']' or '}' at end of range".to_string(),
                ))
            }
        };
        self.advance()?;

        let boost = self.parse_boost()?;

        let (gte, gt) = if inclusive_lower {
            (lower, None)
        } else {
            (None, lower)
        };
        let (lte, lt) = if inclusive_upper {
            (upper, None)
        } else {
            (None, upper)
        };

        Ok(Box::new(RangeQuery::new(field).with_bounds(RangeBounds {
            gte,
            gt,
            lte,
            lt,
            boost,
        })))
    }

    /// Parse a single range bound; `*` is unbounded
    fn parse_range_value(&mut self) -> Result<Option<RangeValue>> {
        let value = match &self.current_token {
            Token::Asterisk => None,
            Token::Number(n) if n.fract() == 0.0 => Some(RangeValue::Long(*n as i64)),
            Token::Number(n) => Some(RangeValue::Double(*n)),
            Token::Term(s) | Token::QuotedString(s) => Some(match s.parse::<i64>() {
                Ok(i) => RangeValue::Long(i),
                Err(_) => RangeValue::String(s.clone()),
            }),
            _ => {
                return Err(QtyError::QueryParseError(format!(
                    "Expected range value, got: {:?}",
                    self.current_token
                )))
            }
        };
        self.advance()?;
        Ok(value)
    }

    /// Check if current token can start a primary expression
    fn is_start_of_primary(&self) -> bool {
        matches!(
            self.current_token,
            Token::Term(_)
                | Token::QuotedString(_)
                | Token::Number(_)
                | Token::LeftParen
                | Token::Plus
                | Token::Asterisk
        )
    }

    /// Advance to the next token
    fn advance(&mut self) -> Result<()> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    /// Expect a specific token and advance
    fn expect(&mut self, expected: Token) -> Result<()> {
        if std::mem::discriminant(&self.current_token) == std::mem::discriminant(&expected) {
            self.advance()
        } else {
            Err(QtyError::QueryParseError(format!(
                "Expected {:?}, got {:?}",
                expected, self.current_token
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::context::QueryContext;

    fn parse_query(input: &str) -> Result<Box<dyn QueryNode>> {
        QueryStringParser::new(input)?.parse()
    }

    fn matching_ids(query: &dyn QueryNode) -> Vec<u32> {
        let ctx = QueryContext::builder()
            .document(1, [("size", 41.0), ("capacity", 100.0)])
            .document(2, [("size", 42.0), ("capacity", 90.0)])
            .document(3, [("size", 43.0), ("capacity", 5.0)])
            .build();
        query.execute(&ctx).unwrap().iter().collect()
    }

    #[test]
    fn test_numeric_field_term() {
        let query = parse_query("size:42").unwrap();
        assert_eq!(query.query_type(), "term");
        assert_eq!(matching_ids(query.as_ref()), vec![1]);
    }

    #[test]
    fn test_boost() {
        let query = parse_query("size:42^2.0 ").unwrap();
        assert_eq!(query.query_type(), "term");
        assert_eq!(query.boost(), 2.0);

        let query = parse_query("size:42^").unwrap();
        assert_eq!(query.boost(), DEFAULT_CARET_BOOST);
    }

    #[test]
    fn test_match_all() {
        let query = parse_query("*:*").unwrap();
        assert_eq!(query.query_type(), "all_docs");
        assert_eq!(matching_ids(query.as_ref()), vec![0, 1, 2]);

        let query = parse_query("*").unwrap();
        assert_eq!(query.query_type(), "all_docs");
    }

    #[test]
    fn test_range_inclusive() {
        let query = parse_query("capacity:[90 TO 110]").unwrap();
        assert_eq!(query.query_type(), "range");
        assert_eq!(matching_ids(query.as_ref()), vec![0, 1]);
    }

    #[test]
    fn test_range_exclusive() {
        let query = parse_query("capacity:{90 TO 110}").unwrap();
        assert_eq!(matching_ids(query.as_ref()), vec![0]);
    }

    #[test]
    fn test_range_unbounded() {
        let query = parse_query("size:[* TO 42]").unwrap();
        assert_eq!(matching_ids(query.as_ref()), vec![0, 1]);

        let query = parse_query("size:[42 TO *]").unwrap();
        assert_eq!(matching_ids(query.as_ref()), vec![1, 2]);
    }

    #[test]
    fn test_field_exists() {
        let query = parse_query("weight:*").unwrap();
        assert_eq!(query.query_type(), "range");
        assert!(matching_ids(query.as_ref()).is_empty());
    }

    #[test]
    fn test_adjacent_clauses_default_or() {
        let query = parse_query("size:42^2.0 size:[41 TO 43] ").unwrap();
        assert_eq!(query.query_type(), "bool");
        assert_eq!(matching_ids(query.as_ref()), vec![0, 1, 2]);
    }

    #[test]
    fn test_adjacent_clauses_default_and() {
        let query = QueryStringParser::new("size:[41 TO 43] capacity:[80 TO 100]")
            .unwrap()
            .with_default_operator(MatchOperator::And)
            .parse()
            .unwrap();
        assert_eq!(matching_ids(query.as_ref()), vec![0, 1]);
    }

    #[test]
    fn test_boolean_operators() {
        let query = parse_query("size:41 OR size:43").unwrap();
        assert_eq!(matching_ids(query.as_ref()), vec![0, 2]);

        let query = parse_query("size:[41 TO 43] AND capacity:90").unwrap();
        assert_eq!(matching_ids(query.as_ref()), vec![1]);

        let query = parse_query("size:[41 TO 43] NOT size:42").unwrap();
        assert_eq!(matching_ids(query.as_ref()), vec![0, 2]);

        let query = parse_query("size:[41 TO 43] -capacity:5").unwrap();
        assert_eq!(matching_ids(query.as_ref()), vec![0, 1]);
    }

    #[test]
    fn test_grouped_query() {
        let query = parse_query("(size:41 OR size:42) AND capacity:[* TO 95]").unwrap();
        assert_eq!(query.query_type(), "bool");
        assert_eq!(matching_ids(query.as_ref()), vec![1]);
    }

    #[test]
    fn test_unqualified_terms_use_default_field() {
        let query = QueryStringParser::new("42")
            .unwrap()
            .with_default_field("size")
            .parse()
            .unwrap();
        assert_eq!(matching_ids(query.as_ref()), vec![1]);
    }

    #[test]
    fn test_unsupported_syntax() {
        assert!(parse_query("title:rust~2").is_err());
        assert!(parse_query("title:prog*").is_err());
    }

    #[test]
    fn test_malformed_queries() {
        assert!(parse_query("").is_err());
        assert!(parse_query("   ").is_err());
        assert!(parse_query("(size:42").is_err());
        assert!(parse_query("size:[1 TO 2").is_err());
        assert!(parse_query("size:").is_err());
        assert!(parse_query("*:size").is_err());
        assert!(parse_query("size:(42 43)").is_err());
    }
}
