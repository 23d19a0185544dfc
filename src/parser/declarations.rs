//! Declaration parsing implementation
//!
//! This module handles parsing of Peregrine declarations:
//!
//! - Variables and constants: `int x = 3`, `x = 3`, `const float pi = 3.14`
//! - Functions: `def f(int a, b = 0) -> int:` (tuple return types allowed)
//! - Classes: `class Name(Parent):` with attribute/method classification
//! - Unions and enums
//! - Type aliases: `type Alias = int` and `type F = def (int) -> int`
//! - Imports: `import m [as a]` and `from m import s [as a], …`
//! - Decorator blocks and the `static`/`inline`/`export` wrappers
//!
//! All parsing methods are implemented as `pub(crate)` methods on the
//! [`Parser`] struct.

use crate::parser::ast::{AstNode, Param};
use crate::parser::parse::Parser;
use crate::parser::tokens::TokenKind;

impl Parser {
    /// Parse `[type] name [= value]`.
    ///
    /// Entered with the cursor on the first identifier; a second identifier
    /// next means the first one was a type.
    pub(crate) fn parse_variable_statement(&mut self) -> AstNode {
        let token = self.current.clone();
        let mut var_type = AstNode::NoLiteral;

        if self.next().kind == TokenKind::Identifier {
            var_type = self.parse_type();
            self.advance();
        }

        let name = self.parse_name();

        let mut value = AstNode::NoLiteral;
        if self.next().kind == TokenKind::Assign {
            self.advance();
            self.advance();
            value = self.parse_expression_lowest();
        } else {
            self.advance_on_new_line();
        }

        AstNode::VariableStatement {
            token,
            var_type: Box::new(var_type),
            name: Box::new(name),
            value: Box::new(value),
        }
    }

    /// Parse `const [type] name = value`.
    pub(crate) fn parse_const_declaration(&mut self) -> AstNode {
        let token = self.current.clone();
        self.expect(TokenKind::Identifier);

        let mut const_type = AstNode::NoLiteral;
        if self.next().kind == TokenKind::Identifier {
            const_type = self.parse_type();
            self.advance();
        }

        let name = self.parse_name();

        self.expect(TokenKind::Assign);
        self.advance();

        let value = self.parse_expression_lowest();

        AstNode::ConstDeclaration {
            token,
            const_type: Box::new(const_type),
            name: Box::new(name),
            value: Box::new(value),
        }
    }

    /// Parse `def name(type name [= default], …) [-> type]: block`.
    ///
    /// A missing return type defaults to `void`; a parenthesized return
    /// type list becomes a tuple and triggers the out-parameter lowering.
    pub(crate) fn parse_function_def(&mut self) -> AstNode {
        let token = self.current.clone();
        self.expect(TokenKind::Identifier);

        let name = self.parse_name();

        self.expect(TokenKind::LParen);

        let mut parameters = Vec::new();
        if self.next().kind != TokenKind::RParen {
            loop {
                self.advance();

                if self.current.kind != TokenKind::Identifier {
                    let tok = self.current.clone();
                    self.error(
                        &tok,
                        format!(
                            "expected {}, got {} instead",
                            TokenKind::Identifier,
                            tok.kind
                        ),
                    );
                }

                // `type name` when two identifiers follow, bare `name`
                // (rendered as auto) otherwise
                let mut p_type = AstNode::NoLiteral;
                if self.next().kind == TokenKind::Identifier {
                    p_type = self.parse_type();
                    self.expect(TokenKind::Identifier);
                }
                let p_name = self.parse_name();

                let mut default = AstNode::NoLiteral;
                if self.next().kind == TokenKind::Assign {
                    self.advance();
                    self.advance();
                    default = self.parse_expression_lowest();
                }

                parameters.push(Param {
                    p_type,
                    name: p_name,
                    default,
                });
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

        // returns void by default
        let mut return_type = AstNode::TypeExpression {
            token: self.current.clone(),
            name: "void".to_string(),
            generic_types: Vec::new(),
        };

        if self.next().kind == TokenKind::Arrow {
            self.advance();
            if self.next().kind == TokenKind::LParen {
                self.advance();
                return_type = self.parse_type_tuple();
            } else {
                self.expect(TokenKind::Identifier);
                return_type = self.parse_type();
            }
        }

        self.expect(TokenKind::Colon);
        self.expect(TokenKind::Indent);

        let body = self.parse_block_statement();

        AstNode::FunctionDefinition {
            token,
            name: Box::new(name),
            parameters,
            return_type: Box::new(return_type),
            body: Box::new(body),
        }
    }

    /// Parse a parenthesized `(type, type, …)` list; the cursor is on `(`.
    pub(crate) fn parse_type_tuple(&mut self) -> AstNode {
        let token = self.current.clone();
        let mut elements = Vec::new();

        if self.next().kind != TokenKind::RParen {
            loop {
                self.advance();
                if self.current.kind != TokenKind::Identifier {
                    let tok = self.current.clone();
                    self.error(
                        &tok,
                        format!("expected a type, got {} instead", tok.kind),
                    );
                }
                elements.push(self.parse_type());
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

        AstNode::TupleExpr { token, elements }
    }

    /// Parse `type Name = <type>` where `<type>` is a plain type or a
    /// `def (…) -> …` function type.
    pub(crate) fn parse_type_def(&mut self) -> AstNode {
        let token = self.current.clone();
        self.advance();

        let name = self.parse_name();

        self.expect(TokenKind::Assign);
        self.advance();

        let base = if self.current.kind == TokenKind::Identifier {
            self.parse_type()
        } else if self.current.kind == TokenKind::Def {
            self.parse_function_type()
        } else {
            let tok = self.current.clone();
            self.error(&tok, format!("expected a type, got {} instead", tok.kind));
            AstNode::NoLiteral
        };

        self.advance_on_new_line();

        AstNode::TypeDefinition {
            token,
            name: Box::new(name),
            base: Box::new(base),
        }
    }

    /// Parse `def (T1, T2, …) [-> T]` in a type position; the cursor is on
    /// `def`.
    pub(crate) fn parse_function_type(&mut self) -> AstNode {
        let token = self.current.clone();
        self.expect(TokenKind::LParen);

        let mut arg_types = Vec::new();
        while self.current.kind != TokenKind::RParen
            && self.current.kind != TokenKind::Eof
        {
            self.advance();
            if self.current.kind == TokenKind::Identifier {
                arg_types.push(self.parse_type());
            } else if self.current.kind == TokenKind::Comma {
                self.expect(TokenKind::Identifier);
                arg_types.push(self.parse_type());
            } else if self.current.kind == TokenKind::RParen {
                break;
            } else {
                let tok = self.current.clone();
                self.error(&tok, format!("expected a type, got {} instead", tok.kind));
                break;
            }
            self.advance();
        }

        let mut return_types = AstNode::TypeExpression {
            token: self.current.clone(),
            name: "void".to_string(),
            generic_types: Vec::new(),
        };
        if self.next().kind == TokenKind::Arrow {
            self.advance();
            if self.next().kind == TokenKind::LParen {
                self.advance();
                return_types = self.parse_type_tuple();
            } else {
                self.expect(TokenKind::Identifier);
                return_types = self.parse_type();
            }
        }

        AstNode::FunctionTypeExpr {
            token,
            arg_types,
            return_types: Box::new(return_types),
        }
    }

    /// Parse `import m [as a]` or `from m import s [as a], …`.
    pub(crate) fn parse_import(&mut self) -> AstNode {
        let token = self.current.clone();
        let has_from = self.current.kind == TokenKind::From;

        self.advance(); // skip from or import token

        let module_name = self.parse_name();
        let mut module_alias = AstNode::NoLiteral;
        let mut symbols = Vec::new();

        if !has_from {
            if self.next().kind == TokenKind::As {
                self.advance();
                self.advance();
                module_alias = self.parse_name();
            }
            self.advance_on_new_line();
            return AstNode::ImportStatement {
                token,
                module: (Box::new(module_name), Box::new(module_alias)),
                symbols,
            };
        }

        self.expect(TokenKind::Import);

        loop {
            self.advance();

            let symbol = self.parse_name();
            let mut alias = AstNode::NoLiteral;

            if self.next().kind == TokenKind::As {
                self.advance();
                self.advance();
                alias = self.parse_name();
            }

            symbols.push((symbol, alias));

            if self.next().kind == TokenKind::Comma {
                self.advance();
            }
            if self.current.kind != TokenKind::Comma {
                break;
            }
        }

        self.advance_on_new_line();
        AstNode::ImportStatement {
            token,
            module: (Box::new(module_name), Box::new(module_alias)),
            symbols,
        }
    }

    /// Parse one or more `@expr` lines followed by a (possibly `static`)
    /// function definition.
    pub(crate) fn parse_decorator(&mut self) -> AstNode {
        let token = self.current.clone();
        let mut decorators = Vec::new();

        while self.current.kind == TokenKind::At {
            self.expect(TokenKind::Identifier);
            decorators.push(self.parse_expression_lowest());
            self.advance();
        }

        let body = if self.current.kind == TokenKind::Static {
            self.parse_static()
        } else if self.current.kind == TokenKind::Def {
            self.parse_function_def()
        } else {
            let tok = self.current.clone();
            self.error(
                &tok,
                format!(
                    "expected a function definition after decorators, got {} instead",
                    tok.kind
                ),
            );
            AstNode::NoLiteral
        };

        AstNode::DecoratorStatement {
            token,
            decorators,
            body: Box::new(body),
        }
    }

    /// Parse `class Name[(P1, P2, …)]: block`, routing body statements
    /// into attributes, methods, and everything else.
    pub(crate) fn parse_class(&mut self) -> AstNode {
        let token = self.current.clone();
        self.expect(TokenKind::Identifier);

        let name = self.parse_name();

        let mut parents = Vec::new();
        if self.next().kind == TokenKind::LParen {
            self.advance();
            if self.next().kind != TokenKind::RParen {
                loop {
                    self.advance();
                    parents.push(self.parse_type());
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
        }

        self.expect(TokenKind::Colon);
        self.expect(TokenKind::Indent);
        self.advance();

        let mut attributes = Vec::new();
        let mut methods = Vec::new();
        let mut other = Vec::new();

        while self.current.kind != TokenKind::Dedent {
            if self.current.kind == TokenKind::Eof {
                let tok = self.current.clone();
                self.error(&tok, "expected end of indentation, got eof instead");
                break;
            }

            let stmt = self.parse_statement();
            match &stmt {
                AstNode::FunctionDefinition { .. } | AstNode::DecoratorStatement { .. } => {
                    methods.push(stmt)
                }
                AstNode::Static { body, .. }
                    if matches!(**body, AstNode::FunctionDefinition { .. }) =>
                {
                    methods.push(stmt)
                }
                AstNode::VariableStatement { .. } | AstNode::ConstDeclaration { .. } => {
                    attributes.push(stmt)
                }
                _ => other.push(stmt),
            }
            self.advance();
        }

        AstNode::ClassDefinition {
            token,
            name: Box::new(name),
            parents,
            attributes,
            methods,
            other,
        }
    }

    /// Parse `union Name:` followed by indented `type name` field lines.
    pub(crate) fn parse_union(&mut self) -> AstNode {
        let token = self.current.clone();
        self.expect(TokenKind::Identifier);

        let name = self.parse_name();

        self.expect(TokenKind::Colon);
        self.expect(TokenKind::Indent);
        self.advance();

        let mut fields = Vec::new();
        while self.current.kind != TokenKind::Dedent {
            if self.current.kind == TokenKind::Eof {
                let tok = self.current.clone();
                self.error(&tok, "expected end of indentation, got eof instead");
                break;
            }

            if self.current.kind != TokenKind::Identifier {
                let tok = self.current.clone();
                self.error(
                    &tok,
                    format!("expected a field type, got {} instead", tok.kind),
                );
            }
            let field_type = self.parse_type();
            self.expect(TokenKind::Identifier);
            let field_name = self.parse_name();

            fields.push((field_type, field_name));

            self.advance_on_new_line();
            self.advance();
        }

        AstNode::UnionLiteral {
            token,
            name: Box::new(name),
            fields,
        }
    }

    /// Parse `enum Name:` followed by indented `name [= init]` field lines.
    pub(crate) fn parse_enum(&mut self) -> AstNode {
        let token = self.current.clone();
        self.expect(TokenKind::Identifier);

        let name = self.parse_name();

        self.expect(TokenKind::Colon);
        self.expect(TokenKind::Indent);
        self.advance();

        let mut fields = Vec::new();
        while self.current.kind != TokenKind::Dedent {
            if self.current.kind == TokenKind::Eof {
                let tok = self.current.clone();
                self.error(&tok, "expected end of indentation, got eof instead");
                break;
            }

            let field_name = self.parse_name();
            let mut init = AstNode::NoLiteral;
            if self.next().kind == TokenKind::Assign {
                self.advance();
                self.advance();
                init = self.parse_expression_lowest();
            } else {
                self.advance_on_new_line();
            }

            fields.push((field_name, init));
            self.advance();
        }

        AstNode::EnumLiteral {
            token,
            name: Box::new(name),
            fields,
        }
    }

    /// Parse `static <def|declaration>`.
    pub(crate) fn parse_static(&mut self) -> AstNode {
        let token = self.current.clone();
        self.advance();

        let body = self.parse_statement();
        AstNode::Static {
            token,
            body: Box::new(body),
        }
    }

    /// Parse `inline def …`.
    pub(crate) fn parse_inline(&mut self) -> AstNode {
        let token = self.current.clone();
        self.advance();

        let body = if self.current.kind == TokenKind::Def {
            self.parse_function_def()
        } else {
            let tok = self.current.clone();
            self.error(
                &tok,
                format!("expected a function definition, got {} instead", tok.kind),
            );
            AstNode::NoLiteral
        };

        AstNode::Inline {
            token,
            body: Box::new(body),
        }
    }

    /// Parse `export def …`; the exported name keeps its spelling in the
    /// emitted C.
    pub(crate) fn parse_export(&mut self) -> AstNode {
        let token = self.current.clone();
        self.advance();

        let body = if self.current.kind == TokenKind::Def {
            self.parse_function_def()
        } else {
            let tok = self.current.clone();
            self.error(
                &tok,
                format!("expected a function definition, got {} instead", tok.kind),
            );
            AstNode::NoLiteral
        };

        AstNode::Export {
            token,
            body: Box::new(body),
        }
    }
}
