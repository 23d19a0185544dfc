//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing
//! infrastructure: the token cursor, error accumulation, the statement
//! dispatch loop, and block parsing.
//!
//! # Parser Architecture
//!
//! The parser is a recursive descent statement parser whose expression
//! sub-parser is Pratt-style, organized as:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: def / class / union / enum / type / const / import /
//!   decorator parsing
//! - `statements`: control-flow and simple statements
//! - `expressions`: Pratt expression parsing with a precedence table
//!
//! Parser methods are split across multiple files using `impl Parser`
//! blocks, allowing each module to extend the Parser with related
//! functionality while sharing the cursor state.
//!
//! # Error handling
//!
//! Errors are recorded and parsing continues; there is no recovery beyond
//! that. [`Parser::parse`] returns the accumulated batch when it is
//! non-empty, and the driver aborts before code generation.

use crate::errors::{CompileError, Location};
use crate::parser::ast::AstNode;
use crate::parser::tokens::{Token, TokenKind};

/// Recursive descent parser over a lexed token stream.
///
/// Owns an index into the token vector and a cached copy of the current
/// token; lookahead is limited to one token ([`Parser::next`]).
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) index: usize,
    pub(crate) current: Token,
    pub(crate) filename: String,
    pub(crate) errors: Vec<CompileError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, filename: impl Into<String>) -> Self {
        let current = tokens.first().cloned().unwrap_or_default();
        Self {
            tokens,
            index: 0,
            current,
            filename: filename.into(),
            errors: Vec::new(),
        }
    }

    /// Parse the whole stream into a [`AstNode::Program`].
    ///
    /// Returns the accumulated error batch instead when any statement
    /// failed to parse; no partial tree escapes in that case.
    pub fn parse(mut self) -> Result<AstNode, Vec<CompileError>> {
        let token = self.tokens.first().cloned().unwrap_or_default();
        let mut statements = Vec::new();

        while self.current.kind != TokenKind::Eof && self.index < self.tokens.len() {
            statements.push(self.parse_statement());
            self.advance();
        }

        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        Ok(AstNode::Program { token, statements })
    }

    /// Dispatch on the current token to the matching statement rule.
    ///
    /// Anything that does not open a statement falls through to the
    /// expression parser; that fall-through also covers bare identifier
    /// statements.
    pub(crate) fn parse_statement(&mut self) -> AstNode {
        match self.current.kind {
            TokenKind::Const => self.parse_const_declaration(),
            TokenKind::At => self.parse_decorator(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::From | TokenKind::Import => self.parse_import(),
            TokenKind::Def => self.parse_function_def(),
            TokenKind::Match => self.parse_match(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Scope => self.parse_scope(),
            TokenKind::Type => self.parse_type_def(),
            TokenKind::Assert => self.parse_assert(),
            TokenKind::Raise => self.parse_raise(),
            TokenKind::With => self.parse_with(),
            TokenKind::Try => self.parse_try_except(),
            TokenKind::Class => self.parse_class(),
            TokenKind::Union => self.parse_union(),
            TokenKind::Enum => self.parse_enum(),
            TokenKind::Static => self.parse_static(),
            TokenKind::Inline => self.parse_inline(),
            TokenKind::Export => self.parse_export(),
            TokenKind::Break => {
                let token = self.current.clone();
                self.advance_on_new_line();
                AstNode::Break { token }
            }
            TokenKind::Continue => {
                let token = self.current.clone();
                self.advance_on_new_line();
                AstNode::Continue { token }
            }
            TokenKind::Pass => {
                let token = self.current.clone();
                self.advance_on_new_line();
                AstNode::Pass { token }
            }
            TokenKind::CppCode => {
                self.advance();
                let stmt = self.parse_cpp();
                self.advance_on_new_line();
                stmt
            }
            TokenKind::Identifier
                if self.next().kind == TokenKind::Identifier
                    || self.next().kind == TokenKind::Assign =>
            {
                self.parse_variable_statement()
            }
            TokenKind::Identifier if self.next().kind == TokenKind::Comma => {
                self.parse_multiple_assign()
            }
            TokenKind::Identifier if is_aug_assign_op(self.next().kind) => {
                self.parse_aug_assign()
            }
            _ => {
                // either an expression or invalid; the expression parser
                // records the error in the latter case
                self.parse_expression_lowest()
            }
        }
    }

    /// Parse an indented block. The cursor must be on the `Indent` token.
    pub(crate) fn parse_block_statement(&mut self) -> AstNode {
        let token = self.current.clone();
        self.advance();

        let mut statements = Vec::new();

        while self.current.kind != TokenKind::Dedent {
            if self.current.kind == TokenKind::Eof {
                let tok = self.current.clone();
                self.error(&tok, "expected end of indentation, got eof instead");
                break;
            }

            statements.push(self.parse_statement());
            self.advance();
        }

        AstNode::BlockStatement { token, statements }
    }

    // ===== Cursor helpers =====

    pub(crate) fn advance(&mut self) {
        self.index += 1;
        if self.index < self.tokens.len() {
            self.current = self.tokens[self.index].clone();
        }
    }

    /// Step over a trailing end-of-line marker, if one is next.
    pub(crate) fn advance_on_new_line(&mut self) {
        if self.next().kind == TokenKind::NewLine {
            self.advance();
        }
    }

    /// One-token lookahead; a zero token (kind `Eof`) past the end.
    pub(crate) fn next(&self) -> Token {
        self.tokens.get(self.index + 1).cloned().unwrap_or_default()
    }

    /// Verify the next token's kind, recording an error on mismatch, and
    /// advance unconditionally.
    pub(crate) fn expect(&mut self, expected: TokenKind) {
        let next = self.next();
        if next.kind != expected {
            self.error(
                &next,
                format!("expected {}, got {} instead", expected, next.kind),
            );
        }
        self.advance();
    }

    pub(crate) fn error(&mut self, token: &Token, message: impl Into<String>) {
        self.errors.push(CompileError::parse_error(
            message,
            Location {
                line: token.line,
                column: token.column,
                filename: self.filename.clone(),
                statement: token.statement.clone(),
            },
        ));
    }

    // ===== Small shared rules =====

    /// The current token as an identifier expression.
    pub(crate) fn parse_identifier(&mut self) -> AstNode {
        AstNode::IdentifierExpression {
            token: self.current.clone(),
            name: self.current.keyword.clone(),
        }
    }

    /// Like [`Parser::parse_identifier`] but records an error when the
    /// current token is not an identifier.
    pub(crate) fn parse_name(&mut self) -> AstNode {
        if self.current.kind != TokenKind::Identifier {
            let tok = self.current.clone();
            self.error(
                &tok,
                format!("expected an identifier, got {} instead", tok.kind),
            );
        }
        self.parse_identifier()
    }

    /// The current token as a type expression.
    pub(crate) fn parse_type(&mut self) -> AstNode {
        AstNode::TypeExpression {
            token: self.current.clone(),
            name: self.current.keyword.clone(),
            generic_types: Vec::new(),
        }
    }

    /// The raw C++ payload of a `cppcode` statement.
    pub(crate) fn parse_cpp(&mut self) -> AstNode {
        if self.current.kind != TokenKind::String {
            let tok = self.current.clone();
            self.error(
                &tok,
                format!("expected a string of C++ code, got {} instead", tok.kind),
            );
        }
        AstNode::InlineCppBlock {
            token: self.current.clone(),
            code: self.current.keyword.clone(),
        }
    }
}

pub(crate) fn is_aug_assign_op(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::TimesEq
            | TokenKind::DivEq
            | TokenKind::ModEq
    )
}
