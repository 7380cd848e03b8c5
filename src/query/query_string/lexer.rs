//! Lexer for query string syntax
//!
//! Tokenizes Lucene-style query strings into a stream of tokens.

use crate::error::QtyError;
use crate::Result;

/// Token types for query string parsing
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A term (unquoted word)
    Term(String),
    /// A quoted string
    QuotedString(String),
    /// A number (integer or decimal)
    Number(f64),

    /// AND operator
    And,
    /// OR operator
    Or,
    /// NOT operator
    Not,
    /// Colon separator (field:value)
    Colon,

    /// Asterisk (match-all, open range bound)
    Asterisk,
    /// Tilde with optional distance; recognised so it can be rejected clearly
    Tilde(Option<u32>),
    /// Caret for boosting with optional boost value
    Caret(Option<f32>),

    /// Left square bracket (inclusive range start)
    LeftBracket,
    /// Right square bracket (inclusive range end)
    RightBracket,
    /// Left curly brace (exclusive range start)
    LeftBrace,
    /// Right curly brace (exclusive range end)
    RightBrace,
    /// TO keyword for ranges
    To,

    /// Left parenthesis (grouping)
    LeftParen,
    /// Right parenthesis (grouping)
    RightParen,

    /// Plus sign (required clause)
    Plus,
    /// Minus sign (excluded clause)
    Minus,

    /// End of input
    Eof,
}

/// Lexer for tokenizing query strings
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    /// Create a new lexer for the given input string
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(Token::Eof);
        };

        if let Some(token) = Self::punctuation(ch) {
            self.advance();
            return Ok(token);
        }

        match ch {
            '~' => {
                self.advance();
                Ok(Token::Tilde(self.read_digits().parse().ok()))
            }
            '^' => {
                self.advance();
                Ok(Token::Caret(self.read_decimal().parse().ok()))
            }
            '"' | '\'' => {
                self.advance();
                self.read_quoted(ch)
            }
            _ if ch.is_ascii_digit() => self.read_numeric_or_term(),
            _ if Self::is_term_start(ch) => Ok(self.read_term()),
            _ => Err(QtyError::QueryParseError(format!(
                "Unexpected character at position {}: '{}'",
                self.position, ch
            ))),
        }
    }

    fn punctuation(ch: char) -> Option<Token> {
        let token = match ch {
            ':' => Token::Colon,
            '*' => Token::Asterisk,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '+' => Token::Plus,
            '-' => Token::Minus,
            _ => return None,
        };
        Some(token)
    }

    fn read_term(&mut self) -> Token {
        let mut term = String::new();
        while let Some(ch) = self.current_char().filter(|&c| Self::is_term_char(c)) {
            term.push(ch);
            self.advance();
        }

        // Keywords are case-insensitive
        match term.to_uppercase().as_str() {
            "AND" => Token::And,
            "OR" => Token::Or,
            "NOT" => Token::Not,
            "TO" => Token::To,
            _ => Token::Term(term),
        }
    }

    fn read_quoted(&mut self, quote: char) -> Result<Token> {
        let mut s = String::new();

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == quote {
                return Ok(Token::QuotedString(s));
            }
            if ch != '\\' {
                s.push(ch);
                continue;
            }
            match self.current_char() {
                Some(escaped) if escaped == quote || escaped == '\\' => s.push(escaped),
                Some('n') => s.push('\n'),
                Some('t') => s.push('\t'),
                Some(other) => {
                    s.push('\\');
                    s.push(other);
                }
                None => break,
            }
            self.advance();
        }

        Err(QtyError::QueryParseError(
            "Unterminated quoted string".to_string(),
        ))
    }

    /// Read a number, or a term that starts with digits (like `2024-01-15` or `4k`)
    fn read_numeric_or_term(&mut self) -> Result<Token> {
        let mut text = String::new();
        let mut has_dot = false;
        let mut is_term = false;

        while let Some(ch) = self.current_char() {
            let next_is_digit = self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false);
            if ch.is_ascii_digit() {
                text.push(ch);
            } else if ch == '.' && !has_dot && next_is_digit {
                has_dot = true;
                text.push(ch);
            } else if ch == '-' && next_is_digit {
                is_term = true;
                text.push(ch);
            } else if ch == '_' || ch.is_alphabetic() {
                is_term = true;
                text.push(ch);
            } else {
                break;
            }
            self.advance();
        }

        if is_term {
            return Ok(Token::Term(text));
        }
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| QtyError::QueryParseError(format!("Invalid number: {}", text)))
    }

    fn read_digits(&mut self) -> String {
        let mut digits = String::new();
        while let Some(ch) = self.current_char().filter(char::is_ascii_digit) {
            digits.push(ch);
            self.advance();
        }
        digits
    }

    fn read_decimal(&mut self) -> String {
        let mut number = self.read_digits();
        if self.current_char() == Some('.') {
            number.push('.');
            self.advance();
            number.push_str(&self.read_digits());
        }
        number
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().map(char::is_whitespace).unwrap_or(false) {
            self.advance();
        }
    }

    /// Check if a character can start a term
    fn is_term_start(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '@' || ch == '#'
    }

    /// Check if a character can be part of a term
    fn is_term_char(ch: char) -> bool {
        ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | '@' | '#' | '*' | '?')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token == Token::Eof {
                return out;
            }
            out.push(token);
        }
    }

    #[test]
    fn test_field_value() {
        assert_eq!(
            tokens("title:rust"),
            vec![
                Token::Term("title".to_string()),
                Token::Colon,
                Token::Term("rust".to_string()),
            ]
        );
    }

    #[test]
    fn test_boosted_numeric_clause() {
        assert_eq!(
            tokens("size:42^2.0 "),
            vec![
                Token::Term("size".to_string()),
                Token::Colon,
                Token::Number(42.0),
                Token::Caret(Some(2.0)),
            ]
        );
    }

    #[test]
    fn test_range() {
        assert_eq!(
            tokens("capacity:[90 TO 110]"),
            vec![
                Token::Term("capacity".to_string()),
                Token::Colon,
                Token::LeftBracket,
                Token::Number(90.0),
                Token::To,
                Token::Number(110.0),
                Token::RightBracket,
            ]
        );
    }

    #[test]
    fn test_exclusive_range() {
        assert_eq!(
            tokens("{10 TO 20}"),
            vec![
                Token::LeftBrace,
                Token::Number(10.0),
                Token::To,
                Token::Number(20.0),
                Token::RightBrace,
            ]
        );
    }

    #[test]
    fn test_match_all() {
        assert_eq!(
            tokens("*:*"),
            vec![Token::Asterisk, Token::Colon, Token::Asterisk]
        );
    }

    #[test]
    fn test_boolean_operators_case_insensitive() {
        assert_eq!(
            tokens("a and b OR c not d"),
            vec![
                Token::Term("a".to_string()),
                Token::And,
                Token::Term("b".to_string()),
                Token::Or,
                Token::Term("c".to_string()),
                Token::Not,
                Token::Term("d".to_string()),
            ]
        );
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(
            tokens(r#""hello \"world\"""#),
            vec![Token::QuotedString("hello \"world\"".to_string())]
        );
        assert_eq!(
            tokens("'single'"),
            vec![Token::QuotedString("single".to_string())]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("\"unterminated");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn test_numbers_and_digit_terms() {
        assert_eq!(
            tokens("42 3.5 2024-01-15 4k"),
            vec![
                Token::Number(42.0),
                Token::Number(3.5),
                Token::Term("2024-01-15".to_string()),
                Token::Term("4k".to_string()),
            ]
        );
    }

    #[test]
    fn test_minus_before_number() {
        assert_eq!(tokens("-10"), vec![Token::Minus, Token::Number(10.0)]);
    }

    #[test]
    fn test_tilde_and_caret_without_value() {
        assert_eq!(
            tokens("rust~ go^"),
            vec![
                Token::Term("rust".to_string()),
                Token::Tilde(None),
                Token::Term("go".to_string()),
                Token::Caret(None),
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("size:42 ; drop");
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        assert!(lexer.next_token().is_err());
    }
}
