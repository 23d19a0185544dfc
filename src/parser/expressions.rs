//! Expression parsing implementation
//!
//! Pratt parsing: a prefix rule keyed on the current token produces the
//! left operand, then infix rules run while the *next* token's precedence
//! is strictly greater than the current level. The strict `>` makes every
//! binary operator effectively left-associative, including `**`.
//!
//! # Precedence
//!
//! ```text
//! lowest < and_or < not < compare < bit_or < bit_xor < bit_and
//!        < bit_shift < sum_minus < mul_div < expo
//!        < prefix < dot_ref < list_access < call
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::parser::ast::AstNode;
use crate::parser::parse::Parser;
use crate::parser::tokens::TokenKind;

/// Operator binding strength, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
    Lowest,
    AndOr,
    Not,
    Compare,
    BitOr,
    BitXor,
    BitAnd,
    BitShift,
    SumMinus,
    MulDiv,
    Expo,
    Prefix,
    DotRef,
    ListAccess,
    Call,
}

/// The binding strength of a token when it appears in operator position;
/// `Lowest` for anything that is not an operator.
pub(crate) fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Negative | TokenKind::BitNot => Precedence::Prefix,
        TokenKind::And | TokenKind::Or => Precedence::AndOr,
        TokenKind::Not => Precedence::Not,
        TokenKind::NotEqual
        | TokenKind::IsNot
        | TokenKind::Is
        | TokenKind::NotIn
        | TokenKind::In
        | TokenKind::Greater
        | TokenKind::Less
        | TokenKind::GreaterEq
        | TokenKind::LessEq
        | TokenKind::Equal => Precedence::Compare,
        TokenKind::BitOr => Precedence::BitOr,
        TokenKind::BitXor => Precedence::BitXor,
        TokenKind::BitAnd => Precedence::BitAnd,
        TokenKind::ShiftLeft | TokenKind::ShiftRight => Precedence::BitShift,
        TokenKind::Plus | TokenKind::Minus => Precedence::SumMinus,
        TokenKind::Multiply
        | TokenKind::Divide
        | TokenKind::Modulo
        | TokenKind::FloorDiv => Precedence::MulDiv,
        TokenKind::Exponent => Precedence::Expo,
        TokenKind::Dot => Precedence::DotRef,
        TokenKind::ListOpen => Precedence::ListAccess,
        TokenKind::LParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

impl Parser {
    /// Parse a full expression from the lowest binding level.
    pub(crate) fn parse_expression_lowest(&mut self) -> AstNode {
        self.parse_expression(Precedence::Lowest)
    }

    pub(crate) fn parse_expression(&mut self, curr_precedence: Precedence) -> AstNode {
        let mut left = match self.current.kind {
            TokenKind::Integer => AstNode::IntegerLiteral {
                token: self.current.clone(),
                value: self.current.keyword.clone(),
            },
            TokenKind::Decimal => AstNode::DecimalLiteral {
                token: self.current.clone(),
                value: self.current.keyword.clone(),
            },
            TokenKind::None => AstNode::NoneLiteral {
                token: self.current.clone(),
            },
            TokenKind::Format => {
                self.advance(); // onto the string itself
                self.parse_string(true, false)
            }
            TokenKind::Raw => {
                self.advance(); // onto the string itself
                self.parse_string(false, true)
            }
            TokenKind::String => self.parse_string(false, false),
            TokenKind::True | TokenKind::False => AstNode::BoolLiteral {
                token: self.current.clone(),
                value: self.current.kind == TokenKind::True,
            },
            TokenKind::Identifier => self.parse_identifier(),
            TokenKind::LParen => self.parse_grouped_expr(),
            TokenKind::ListOpen => self.parse_list(),
            TokenKind::DictOpen => self.parse_dict(),
            TokenKind::Negative | TokenKind::Not | TokenKind::BitNot => {
                self.parse_prefix_expression()
            }
            _ => {
                let tok = self.current.clone();
                self.error(&tok, format!("{} is not an expression", tok.keyword));
                AstNode::NoLiteral
            }
        };

        while self.next_precedence() > curr_precedence {
            self.advance();

            left = match self.current.kind {
                TokenKind::LParen => self.parse_function_call(left),
                TokenKind::ListOpen => self.parse_list_or_dict_access(left),
                TokenKind::Dot => self.parse_dot_expression(left),
                _ => self.parse_binary_operation(left),
            };
        }

        if curr_precedence == Precedence::Lowest && self.next().kind == TokenKind::If {
            left = self.parse_ternary_if(left);
        }

        self.advance_on_new_line();

        left
    }

    fn next_precedence(&self) -> Precedence {
        precedence_of(self.next().kind)
    }

    fn parse_binary_operation(&mut self, left: AstNode) -> AstNode {
        let op = self.current.clone();
        let precedence = precedence_of(op.kind);

        self.advance();
        let right = self.parse_expression(precedence);

        AstNode::BinaryOperation {
            token: op.clone(),
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn parse_prefix_expression(&mut self) -> AstNode {
        let prefix = self.current.clone();
        let precedence = precedence_of(prefix.kind);

        self.advance();
        let right = self.parse_expression(precedence);

        AstNode::PrefixExpression {
            token: prefix.clone(),
            prefix,
            right: Box::new(right),
        }
    }

    /// Parse `callee(arg, …)`; the cursor is on `(`.
    fn parse_function_call(&mut self, left: AstNode) -> AstNode {
        let token = self.current.clone();
        let mut arguments = Vec::new();

        if self.next().kind != TokenKind::RParen {
            loop {
                self.advance();
                arguments.push(self.parse_call_argument());
                self.advance();
                if self.current.kind != TokenKind::Comma {
                    break;
                }
            }
        } else {
            self.advance();
        }

        if self.current.kind != TokenKind::RParen {
            let tok = self.current.clone();
            self.error(&tok, format!("expected ), got {} instead", tok.keyword));
        }

        self.advance_on_new_line();

        AstNode::FunctionCall {
            token,
            callee: Box::new(left),
            arguments,
        }
    }

    /// One call argument; `name=expr` becomes a keyword argument.
    fn parse_call_argument(&mut self) -> AstNode {
        if self.current.kind == TokenKind::Identifier
            && self.next().kind == TokenKind::Assign
        {
            let token = self.current.clone();
            let name = self.parse_identifier();
            self.advance();
            self.advance();
            let value = self.parse_expression_lowest();
            return AstNode::DefaultArg {
                token,
                name: Box::new(name),
                value: Box::new(value),
            };
        }
        self.parse_expression_lowest()
    }

    /// Parse `container[key]` or the slice form `container[a:b]`; the
    /// cursor is on `[`. A following `=` turns the whole access into an
    /// untyped assignment statement.
    fn parse_list_or_dict_access(&mut self, left: AstNode) -> AstNode {
        let token = self.current.clone();
        self.advance();

        let mut keys = vec![self.parse_expression_lowest()];
        if self.next().kind == TokenKind::Colon {
            self.advance();
            self.advance();
            keys.push(self.parse_expression_lowest());
        }

        self.expect(TokenKind::ListClose);

        let node = AstNode::ListOrDictAccess {
            token: token.clone(),
            container: Box::new(left),
            keys,
        };

        if self.next().kind != TokenKind::Assign {
            return node;
        }

        self.advance();
        self.advance();

        let value = self.parse_expression_lowest();
        self.advance_on_new_line();

        AstNode::VariableStatement {
            token,
            var_type: Box::new(AstNode::NoLiteral),
            name: Box::new(node),
            value: Box::new(value),
        }
    }

    fn parse_dot_expression(&mut self, left: AstNode) -> AstNode {
        let token = self.current.clone();
        self.advance();

        // TODO: validate that the referenced side is a name or call chain
        let referenced = self.parse_expression_lowest();

        AstNode::DotExpression {
            token,
            owner: Box::new(left),
            referenced: Box::new(referenced),
        }
    }

    /// Parse the `value if cond else other` form; the cursor sits on the
    /// last token of `value` and `if` is next.
    fn parse_ternary_if(&mut self, if_value: AstNode) -> AstNode {
        self.advance();
        let token = self.current.clone();
        self.advance();

        let condition = self.parse_expression(Precedence::Lowest);

        self.expect(TokenKind::Else);
        self.advance();

        let else_value = self.parse_expression(Precedence::Lowest);

        AstNode::TernaryIf {
            token,
            condition: Box::new(condition),
            if_value: Box::new(if_value),
            else_value: Box::new(else_value),
        }
    }

    /// Parse `(expr)` or the tuple form `(e1, e2, …)`; the cursor is on
    /// `(`.
    fn parse_grouped_expr(&mut self) -> AstNode {
        let token = self.current.clone();
        self.advance();

        let expr = self.parse_expression_lowest();

        if self.next().kind == TokenKind::Comma {
            let mut elements = vec![expr];
            while self.next().kind == TokenKind::Comma {
                self.advance();
                self.advance();
                elements.push(self.parse_expression_lowest());
            }
            self.expect(TokenKind::RParen);
            return AstNode::TupleExpr { token, elements };
        }

        self.expect(TokenKind::RParen);
        expr
    }

    /// Parse `[e1, e2, …]`; the cursor is on `[`.
    fn parse_list(&mut self) -> AstNode {
        let token = self.current.clone();
        let mut elements = Vec::new();

        if self.next().kind != TokenKind::ListClose {
            loop {
                self.advance();
                elements.push(self.parse_expression_lowest());
                self.advance();
                if self.current.kind != TokenKind::Comma {
                    break;
                }
            }
        } else {
            self.advance();
        }

        if self.current.kind != TokenKind::ListClose {
            let tok = self.current.clone();
            self.error(&tok, format!("expected ], got {} instead", tok.keyword));
        }

        AstNode::ListLiteral { token, elements }
    }

    /// Parse `{k1: v1, k2: v2, …}`; the cursor is on `{`.
    fn parse_dict(&mut self) -> AstNode {
        let token = self.current.clone();
        let mut elements = Vec::new();

        if self.next().kind != TokenKind::DictClose {
            loop {
                self.advance();
                let key = self.parse_expression_lowest();
                self.expect(TokenKind::Colon);
                self.advance();
                let value = self.parse_expression_lowest();
                elements.push((key, value));
                self.advance();
                if self.current.kind != TokenKind::Comma {
                    break;
                }
            }
        } else {
            self.advance();
        }

        if self.current.kind != TokenKind::DictClose {
            let tok = self.current.clone();
            self.error(&tok, format!("expected }}, got {} instead", tok.keyword));
        }

        AstNode::DictLiteral { token, elements }
    }

    fn parse_string(&mut self, formatted: bool, raw: bool) -> AstNode {
        AstNode::StringLiteral {
            token: self.current.clone(),
            value: self.current.keyword.clone(),
            formatted,
            raw,
        }
    }
}
