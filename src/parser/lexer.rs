//! Lexer (tokenizer) for Peregrine source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the
//! parser. Indentation is made lexical here: block structure arrives at the
//! parser as explicit `Indent` / `Dedent` / `NewLine` tokens, so a line that
//! opens a block (ends with `:` and is followed by deeper indentation)
//! produces `Indent` directly, with no `NewLine` in between.
//!
//! `#` comments and blank lines produce no tokens at all.

use crate::parser::tokens::{keyword_kind, Token, TokenKind};
use std::fmt;

/// Lexer error type
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Token kinds that can end a value, used to decide whether a following
/// `-` is binary or unary.
fn ends_value(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::Integer
            | TokenKind::Decimal
            | TokenKind::String
            | TokenKind::True
            | TokenKind::False
            | TokenKind::None
            | TokenKind::Underscore
            | TokenKind::RParen
            | TokenKind::ListClose
            | TokenKind::DictClose
    )
}

/// Lexer for Peregrine source code
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Tokenize the entire input.
    ///
    /// The returned stream always ends with zero or more `Dedent` tokens
    /// followed by exactly one `Eof`, whether or not the input ends with a
    /// newline.
    pub fn tokenize(&self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut indents: Vec<usize> = vec![0];

        // A statement's trailing NewLine is only emitted once the next
        // content line is seen, because a following Indent replaces it.
        let mut pending_newline = false;
        let mut prev_line_no = 0;
        let mut prev_width = 0;
        let mut prev_statement = String::new();

        for (i, raw) in self.source.lines().enumerate() {
            let line_no = i + 1;

            let mut width = 0;
            let mut content_start = raw.len();
            for (at, ch) in raw.char_indices() {
                match ch {
                    ' ' => width += 1,
                    '\t' => width += 4,
                    _ => {
                        content_start = at;
                        break;
                    }
                }
            }

            let content = &raw[content_start..];
            if content.is_empty() || content.starts_with('#') {
                continue;
            }
            let statement = raw.trim().to_string();

            let top = *indents.last().unwrap_or(&0);
            if width > top {
                indents.push(width);
                tokens.push(Token::new(
                    TokenKind::Indent,
                    "",
                    line_no,
                    1,
                    statement.as_str(),
                ));
                pending_newline = false;
            } else {
                if pending_newline {
                    tokens.push(Token::new(
                        TokenKind::NewLine,
                        "",
                        prev_line_no,
                        prev_width + 1,
                        prev_statement.as_str(),
                    ));
                }
                while width < *indents.last().unwrap_or(&0) {
                    indents.pop();
                    tokens.push(Token::new(
                        TokenKind::Dedent,
                        "",
                        line_no,
                        1,
                        statement.as_str(),
                    ));
                }
                if width != *indents.last().unwrap_or(&0) {
                    return Err(LexError {
                        message: "dedent does not match any outer indentation level"
                            .to_string(),
                        line: line_no,
                        column: 1,
                    });
                }
            }

            self.lex_line(line_no, raw, &statement, &mut tokens)?;

            pending_newline = true;
            prev_line_no = line_no;
            prev_width = raw.chars().count();
            prev_statement = statement;
        }

        if pending_newline {
            tokens.push(Token::new(
                TokenKind::NewLine,
                "",
                prev_line_no,
                prev_width + 1,
                prev_statement.as_str(),
            ));
        }
        while indents.len() > 1 {
            indents.pop();
            tokens.push(Token::new(TokenKind::Dedent, "", prev_line_no + 1, 1, ""));
        }
        tokens.push(Token::new(TokenKind::Eof, "", prev_line_no + 1, 1, ""));

        Ok(tokens)
    }

    /// Lex the tokens of a single content line.
    fn lex_line(
        &self,
        line_no: usize,
        raw: &str,
        statement: &str,
        tokens: &mut Vec<Token>,
    ) -> Result<(), LexError> {
        let chars: Vec<char> = raw.chars().collect();
        let mut pos = 0;
        let mut prev_kind: Option<TokenKind> = None;

        macro_rules! push {
            ($kind:expr, $keyword:expr, $col:expr) => {{
                prev_kind = Some($kind);
                tokens.push(Token::new($kind, $keyword, line_no, $col, statement));
            }};
        }

        while pos < chars.len() {
            let ch = chars[pos];
            let col = pos + 1;

            if ch == ' ' || ch == '\t' {
                pos += 1;
                continue;
            }
            if ch == '#' {
                break;
            }

            // String literals; escapes pass through verbatim so that the
            // generator can re-quote the value unchanged.
            if ch == '"' || ch == '\'' {
                let quote = ch;
                pos += 1;
                let mut value = String::new();
                let mut closed = false;
                while pos < chars.len() {
                    let c = chars[pos];
                    if c == quote {
                        pos += 1;
                        closed = true;
                        break;
                    }
                    if c == '\\' {
                        value.push('\\');
                        pos += 1;
                        if pos < chars.len() {
                            value.push(chars[pos]);
                            pos += 1;
                        }
                        continue;
                    }
                    value.push(c);
                    pos += 1;
                }
                if !closed {
                    return Err(LexError {
                        message: "unterminated string literal".to_string(),
                        line: line_no,
                        column: col,
                    });
                }
                push!(TokenKind::String, value, col);
                continue;
            }

            // Numeric literals
            if ch.is_ascii_digit() {
                let start = pos;
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    pos += 1;
                }
                let mut kind = TokenKind::Integer;
                if pos + 1 < chars.len()
                    && chars[pos] == '.'
                    && chars[pos + 1].is_ascii_digit()
                {
                    kind = TokenKind::Decimal;
                    pos += 1;
                    while pos < chars.len() && chars[pos].is_ascii_digit() {
                        pos += 1;
                    }
                }
                let spelling: String = chars[start..pos].iter().collect();
                push!(kind, spelling, col);
                continue;
            }

            // Identifiers, keywords, and the two-word operators
            if ch.is_ascii_alphabetic() || ch == '_' {
                let start = pos;
                while pos < chars.len()
                    && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_')
                {
                    pos += 1;
                }
                let word: String = chars[start..pos].iter().collect();

                if word == "_" {
                    push!(TokenKind::Underscore, "_", col);
                    continue;
                }

                // f"..." and r"..." prefixes
                if (word == "f" || word == "r")
                    && pos < chars.len()
                    && (chars[pos] == '"' || chars[pos] == '\'')
                {
                    let kind = if word == "f" {
                        TokenKind::Format
                    } else {
                        TokenKind::Raw
                    };
                    push!(kind, word, col);
                    continue;
                }

                // `is not` and `not in` fuse into single tokens
                if word == "is" || word == "not" {
                    let follower = if word == "is" { "not" } else { "in" };
                    if let Some(end) = self.word_follows(&chars, pos, follower) {
                        let kind = if word == "is" {
                            TokenKind::IsNot
                        } else {
                            TokenKind::NotIn
                        };
                        push!(kind, format!("{} {}", word, follower), col);
                        pos = end;
                        continue;
                    }
                }

                match keyword_kind(&word) {
                    Some(kind) => push!(kind, word, col),
                    Option::None => push!(TokenKind::Identifier, word, col),
                }
                continue;
            }

            // Operators and punctuation
            let next = chars.get(pos + 1).copied();
            let (kind, keyword, len) = match ch {
                '+' if next == Some('=') => (TokenKind::PlusEq, "+=", 2),
                '+' => (TokenKind::Plus, "+", 1),
                '-' if next == Some('>') => (TokenKind::Arrow, "->", 2),
                '-' if next == Some('=') => (TokenKind::MinusEq, "-=", 2),
                '-' => {
                    if prev_kind.map(ends_value).unwrap_or(false) {
                        (TokenKind::Minus, "-", 1)
                    } else {
                        (TokenKind::Negative, "-", 1)
                    }
                }
                '*' if next == Some('*') => (TokenKind::Exponent, "**", 2),
                '*' if next == Some('=') => (TokenKind::TimesEq, "*=", 2),
                '*' => (TokenKind::Multiply, "*", 1),
                '/' if next == Some('/') => (TokenKind::FloorDiv, "//", 2),
                '/' if next == Some('=') => (TokenKind::DivEq, "/=", 2),
                '/' => (TokenKind::Divide, "/", 1),
                '%' if next == Some('=') => (TokenKind::ModEq, "%=", 2),
                '%' => (TokenKind::Modulo, "%", 1),
                '<' if next == Some('<') => (TokenKind::ShiftLeft, "<<", 2),
                '<' if next == Some('=') => (TokenKind::LessEq, "<=", 2),
                '<' => (TokenKind::Less, "<", 1),
                '>' if next == Some('>') => (TokenKind::ShiftRight, ">>", 2),
                '>' if next == Some('=') => (TokenKind::GreaterEq, ">=", 2),
                '>' => (TokenKind::Greater, ">", 1),
                '=' if next == Some('=') => (TokenKind::Equal, "==", 2),
                '=' => (TokenKind::Assign, "=", 1),
                '!' if next == Some('=') => (TokenKind::NotEqual, "!=", 2),
                '|' => (TokenKind::BitOr, "|", 1),
                '&' => (TokenKind::BitAnd, "&", 1),
                '^' => (TokenKind::BitXor, "^", 1),
                '~' => (TokenKind::BitNot, "~", 1),
                '.' => (TokenKind::Dot, ".", 1),
                ',' => (TokenKind::Comma, ",", 1),
                ':' => (TokenKind::Colon, ":", 1),
                '@' => (TokenKind::At, "@", 1),
                '(' => (TokenKind::LParen, "(", 1),
                ')' => (TokenKind::RParen, ")", 1),
                '[' => (TokenKind::ListOpen, "[", 1),
                ']' => (TokenKind::ListClose, "]", 1),
                '{' => (TokenKind::DictOpen, "{", 1),
                '}' => (TokenKind::DictClose, "}", 1),
                _ => {
                    return Err(LexError {
                        message: format!("unexpected character '{}'", ch),
                        line: line_no,
                        column: col,
                    });
                }
            };
            push!(kind, keyword, col);
            pos += len;
        }

        Ok(())
    }

    /// If the given bare word starts after optional spaces at `from`,
    /// return the position just past it.
    fn word_follows(&self, chars: &[char], from: usize, word: &str) -> Option<usize> {
        let mut at = from;
        while at < chars.len() && (chars[at] == ' ' || chars[at] == '\t') {
            at += 1;
        }
        let mut end = at;
        while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_')
        {
            end += 1;
        }
        let found: String = chars[at..end].iter().collect();
        if at > from && found == word {
            Some(end)
        } else {
            Option::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .expect("lexing failed")
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_flat_statement() {
        assert_eq!(
            kinds("x = 3"),
            vec![
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::NewLine,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_block_has_no_newline_before_indent() {
        assert_eq!(
            kinds("if x:\n    pass\n"),
            vec![
                TokenKind::If,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Indent,
                TokenKind::Pass,
                TokenKind::NewLine,
                TokenKind::Dedent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_missing_trailing_newline_matches_present() {
        assert_eq!(kinds("if x:\n    pass"), kinds("if x:\n    pass\n"));
    }

    #[test]
    fn test_nested_dedent_run() {
        let stream = kinds("if x:\n    if y:\n        pass\nz = 1\n");
        let dedents = stream
            .iter()
            .filter(|k| **k == TokenKind::Dedent)
            .count();
        assert_eq!(dedents, 2);
        // both blocks close before `z = 1` begins
        let assign_at = stream
            .iter()
            .position(|k| *k == TokenKind::Assign)
            .unwrap();
        assert_eq!(stream[assign_at - 2], TokenKind::Dedent);
        assert_eq!(stream[assign_at - 1], TokenKind::Identifier);
    }

    #[test]
    fn test_two_word_operators() {
        assert_eq!(
            kinds("a is not b")[1],
            TokenKind::IsNot,
        );
        assert_eq!(
            kinds("a not in b")[1],
            TokenKind::NotIn,
        );
        // `not` alone stays a prefix operator
        assert_eq!(kinds("not a")[0], TokenKind::Not);
    }

    #[test]
    fn test_unary_vs_binary_minus() {
        assert_eq!(kinds("a - b")[1], TokenKind::Minus);
        assert_eq!(kinds("-b")[0], TokenKind::Negative);
        assert_eq!(kinds("a * -b")[2], TokenKind::Negative);
    }

    #[test]
    fn test_format_and_raw_strings() {
        let toks = Lexer::new("f\"hi {x}\"").tokenize().unwrap();
        assert_eq!(toks[0].kind, TokenKind::Format);
        assert_eq!(toks[1].kind, TokenKind::String);
        assert_eq!(toks[1].keyword, "hi {x}");

        let toks = Lexer::new("r'\\d+'").tokenize().unwrap();
        assert_eq!(toks[0].kind, TokenKind::Raw);
        assert_eq!(toks[1].kind, TokenKind::String);
    }

    #[test]
    fn test_comments_and_blank_lines_vanish() {
        assert_eq!(
            kinds("# header\n\nx = 1  # trailing\n"),
            vec![
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Integer,
                TokenKind::NewLine,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_statement_text_is_carried() {
        let toks = Lexer::new("assert x == 1\n").tokenize().unwrap();
        assert_eq!(toks[0].kind, TokenKind::Assert);
        assert_eq!(toks[0].statement, "assert x == 1");
        assert_eq!(toks[0].line, 1);
    }

    #[test]
    fn test_inconsistent_dedent_is_an_error() {
        assert!(Lexer::new("if x:\n        pass\n    pass\n")
            .tokenize()
            .is_err());
    }
}
