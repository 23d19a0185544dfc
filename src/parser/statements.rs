//! Statement parsing implementation
//!
//! This module handles parsing of Peregrine statements:
//!
//! - Control flow: `if`/`elif`/`else`, `while`, `for … in`, `match`
//! - Blocks: `scope`
//! - Simple statements: `return`, `assert`, `raise`
//! - Resource and exception handling: `with … as`, `try`/`except`/`else`
//! - Assignment forms: `a, b = x, y` and `x op= value`
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct. Each routine leaves the cursor on the last token it
//! consumed (a `Dedent` for block statements, the trailing `NewLine` for
//! line statements); the statement loop in `parse.rs` advances past it.

use crate::parser::ast::{AstNode, ExceptClause};
use crate::parser::parse::Parser;
use crate::parser::tokens::TokenKind;

impl Parser {
    /// Parse `if cond: block [elif cond: block]* [else: block]`.
    pub(crate) fn parse_if(&mut self) -> AstNode {
        let token = self.current.clone();
        self.advance(); // skip the if token

        let condition = self.parse_expression_lowest();

        self.expect(TokenKind::Colon);
        self.expect(TokenKind::Indent);

        let body = self.parse_block_statement();

        let mut elifs = Vec::new();
        while self.next().kind == TokenKind::Elif {
            self.advance();
            self.advance();

            let elif_condition = self.parse_expression_lowest();

            self.expect(TokenKind::Colon);
            self.expect(TokenKind::Indent);

            let elif_body = self.parse_block_statement();
            elifs.push((elif_condition, elif_body));
        }

        let mut else_body = AstNode::NoLiteral;
        if self.next().kind == TokenKind::Else {
            self.advance();
            self.expect(TokenKind::Colon);
            self.expect(TokenKind::Indent);

            else_body = self.parse_block_statement();
        }

        AstNode::If {
            token,
            condition: Box::new(condition),
            body: Box::new(body),
            elifs,
            else_body: Box::new(else_body),
        }
    }

    /// Parse `scope: block`, a bare lexical scope.
    pub(crate) fn parse_scope(&mut self) -> AstNode {
        let token = self.current.clone();
        self.expect(TokenKind::Colon);
        self.expect(TokenKind::Indent);

        let body = self.parse_block_statement();
        AstNode::ScopeStatement {
            token,
            body: Box::new(body),
        }
    }

    pub(crate) fn parse_while(&mut self) -> AstNode {
        let token = self.current.clone();
        self.advance(); // skip the while token

        let condition = self.parse_expression_lowest();

        self.expect(TokenKind::Colon);
        self.expect(TokenKind::Indent);

        let body = self.parse_block_statement();

        AstNode::While {
            token,
            condition: Box::new(condition),
            body: Box::new(body),
        }
    }

    /// Parse `for v[, v…] in sequence: block`.
    pub(crate) fn parse_for(&mut self) -> AstNode {
        let token = self.current.clone();
        self.advance();

        let mut variables = vec![self.parse_name()];
        while self.next().kind == TokenKind::Comma {
            self.advance();
            self.advance();
            variables.push(self.parse_name());
        }

        self.expect(TokenKind::In);
        self.advance();

        let sequence = self.parse_expression_lowest();

        self.expect(TokenKind::Colon);
        self.expect(TokenKind::Indent);

        let body = self.parse_block_statement();

        AstNode::For {
            token,
            variables,
            sequence: Box::new(sequence),
            body: Box::new(body),
        }
    }

    pub(crate) fn parse_return(&mut self) -> AstNode {
        let token = self.current.clone();
        let mut value = AstNode::NoLiteral;

        if self.next().kind != TokenKind::NewLine {
            self.advance();
            value = self.parse_expression_lowest();
        } else {
            self.advance();
        }

        AstNode::Return {
            token,
            value: Box::new(value),
        }
    }

    /// Parse `match e[, e…]: (case p[, p…]: block)+ [default: block]`.
    ///
    /// A `_` in a case pattern list becomes a `NoLiteral` slot.
    pub(crate) fn parse_match(&mut self) -> AstNode {
        let token = self.current.clone();
        self.advance();

        let mut subjects = Vec::new();
        while self.current.kind != TokenKind::Colon {
            if self.current.kind == TokenKind::Eof {
                let tok = self.current.clone();
                self.error(&tok, "expected ':' after match subjects, got eof instead");
                break;
            }
            subjects.push(self.parse_expression_lowest());
            self.advance();
            if self.current.kind != TokenKind::Colon {
                self.advance();
            }
        }
        self.expect(TokenKind::Indent);

        let mut cases = Vec::new();
        while self.next().kind == TokenKind::Case {
            self.advance();
            self.advance();

            let mut patterns = Vec::new();
            while self.current.kind != TokenKind::Colon {
                if self.current.kind == TokenKind::Eof {
                    let tok = self.current.clone();
                    self.error(&tok, "expected ':' after case patterns, got eof instead");
                    break;
                }
                if self.current.kind == TokenKind::Underscore {
                    patterns.push(AstNode::NoLiteral);
                } else {
                    patterns.push(self.parse_expression_lowest());
                }
                self.advance();
                if self.current.kind != TokenKind::Colon {
                    self.advance();
                }
            }
            self.expect(TokenKind::Indent);

            let body = self.parse_block_statement();
            cases.push((patterns, body));
        }

        let mut default_body = AstNode::NoLiteral;
        if self.next().kind == TokenKind::Default {
            self.advance();
            self.expect(TokenKind::Colon);
            self.expect(TokenKind::Indent);

            default_body = self.parse_block_statement();
        }
        self.expect(TokenKind::Dedent);

        AstNode::MatchStatement {
            token,
            subjects,
            cases,
            default_body: Box::new(default_body),
        }
    }

    /// Parse `with e [as n][, e [as n]]…: block`.
    pub(crate) fn parse_with(&mut self) -> AstNode {
        let token = self.current.clone();

        let mut variables = Vec::new();
        let mut values = Vec::new();
        loop {
            self.advance();
            let value = self.parse_expression_lowest();

            let mut variable = AstNode::NoLiteral;
            if self.next().kind == TokenKind::As {
                self.advance();
                self.advance();
                variable = self.parse_name();
            }

            values.push(value);
            variables.push(variable);

            if self.next().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }

        self.expect(TokenKind::Colon);
        self.expect(TokenKind::Indent);

        let body = self.parse_block_statement();

        AstNode::With {
            token,
            variables,
            values,
            body: Box::new(body),
        }
    }

    /// Parse `try: block (except E[, E…] [as n]: block)* [else: block]`.
    pub(crate) fn parse_try_except(&mut self) -> AstNode {
        let token = self.current.clone();
        self.expect(TokenKind::Colon);
        self.expect(TokenKind::Indent);

        let body = self.parse_block_statement();

        let mut clauses = Vec::new();
        while self.next().kind == TokenKind::Except {
            self.advance();

            let mut exceptions = Vec::new();
            let mut name = AstNode::NoLiteral;

            if self.next().kind != TokenKind::Colon {
                self.advance();
                exceptions.push(self.parse_expression_lowest());
                while self.next().kind == TokenKind::Comma {
                    self.advance();
                    self.advance();
                    exceptions.push(self.parse_expression_lowest());
                }
                if self.next().kind == TokenKind::As {
                    self.advance();
                    self.advance();
                    name = self.parse_name();
                }
            }

            self.expect(TokenKind::Colon);
            self.expect(TokenKind::Indent);

            let clause_body = self.parse_block_statement();
            clauses.push(ExceptClause {
                exceptions,
                name,
                body: clause_body,
            });
        }

        let mut else_body = AstNode::NoLiteral;
        if self.next().kind == TokenKind::Else {
            self.advance();
            self.expect(TokenKind::Colon);
            self.expect(TokenKind::Indent);

            else_body = self.parse_block_statement();
        }

        if clauses.is_empty() && else_body.is_no_literal() {
            let tok = token.clone();
            self.error(&tok, "expected at least one except clause or an else block");
        }

        AstNode::TryExcept {
            token,
            body: Box::new(body),
            clauses,
            else_body: Box::new(else_body),
        }
    }

    pub(crate) fn parse_assert(&mut self) -> AstNode {
        let token = self.current.clone();
        self.advance();

        let condition = self.parse_expression_lowest();

        AstNode::Assert {
            token,
            condition: Box::new(condition),
        }
    }

    pub(crate) fn parse_raise(&mut self) -> AstNode {
        let token = self.current.clone();
        let mut value = AstNode::NoLiteral;

        if self.next().kind != TokenKind::NewLine {
            self.advance();
            value = self.parse_expression_lowest();
        } else {
            self.advance();
        }

        AstNode::Raise {
            token,
            value: Box::new(value),
        }
    }

    /// Parse `n1, n2[, …] = v1, v2[, …]`.
    pub(crate) fn parse_multiple_assign(&mut self) -> AstNode {
        let token = self.current.clone();

        let mut names = vec![self.parse_name()];
        while self.next().kind == TokenKind::Comma {
            self.advance();
            self.advance();
            names.push(self.parse_name());
        }

        self.expect(TokenKind::Assign);
        self.advance();

        let mut values = vec![self.parse_expression_lowest()];
        while self.next().kind == TokenKind::Comma {
            self.advance();
            self.advance();
            values.push(self.parse_expression_lowest());
        }

        AstNode::MultipleAssign {
            token,
            names,
            values,
        }
    }

    /// Parse `name op= value`, keeping the operator spelling as written.
    pub(crate) fn parse_aug_assign(&mut self) -> AstNode {
        let token = self.current.clone();
        let name = self.parse_identifier();

        self.advance();
        let op = self.current.keyword.clone();
        self.advance();

        let value = self.parse_expression_lowest();

        AstNode::AugAssign {
            token,
            name: Box::new(name),
            op,
            value: Box::new(value),
        }
    }
}
