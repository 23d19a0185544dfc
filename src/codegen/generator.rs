//! Code generator core
//!
//! This module provides the [`Codegen`] struct: the emission sinks, the
//! scope/visibility state flags, and the main dispatch over AST nodes.
//! The lowerings themselves live in the sibling modules and extend
//! [`Codegen`] through `impl` blocks.
//!
//! # Emission model
//!
//! Output accumulates into a string buffer. Decorator lowering needs to
//! wrap a function body in decorator calls *after* the body has been
//! rendered, so [`Codegen::captured`] redirects emission into a fresh
//! buffer for the duration of a sub-traversal; `write` always targets the
//! innermost open capture.
//!
//! # Scope discipline
//!
//! Two invariants hold across every scoped construct, on all exit paths:
//! the symbol-map snapshot taken on entry is restored on exit
//! ([`Codegen::scoped_local`]), and the `is_ref` flag is reset for
//! argument positions ([`Codegen::scoped_ref_reset`]).

use crate::codegen::symbols::{global_name, MangleName};
use crate::parser::ast::AstNode;
use rustc_hash::FxHashSet;

/// The fixed head of every emitted translation unit.
const PRELUDE: &str = "#include <cstdio>\n#include <functional>\ntypedef enum{error________PEREGRINE____PEREGRINE____AssertionError,error________PEREGRINE____PEREGRINE____ZeroDivisionError} error;\n";

/// Emit a single C translation unit for the given program.
///
/// `filename` is the source file's path; it feeds the unit prefix of the
/// global mangling scheme and the assertion diagnostics.
pub fn generate(program: &AstNode, filename: &str) -> String {
    let mut generator = Codegen::new(filename);
    generator.write(PRELUDE);
    generator.emit(program);
    generator.finish()
}

/// Tree-walking C emitter.
pub struct Codegen {
    out: String,
    captures: Vec<String>,

    pub(crate) symbols: MangleName,
    /// Names declared as enums; consulted when lowering `E.X`.
    pub(crate) enums: FxHashSet<String>,
    /// The enum currently being initialized, so that bare identifiers in
    /// field initializers are qualified to sibling members.
    pub(crate) curr_enum: Option<String>,

    pub(crate) filename: String,
    pub(crate) unit: String,

    /// Inside a local (function/class) scope.
    pub(crate) local: bool,
    /// The identifier being visited introduces a new binding.
    pub(crate) is_define: bool,
    /// The identifier being visited is the right-hand side of a member
    /// access; suppresses symbol-map insertion.
    pub(crate) is_ref: bool,
    /// Already inside a function body; nested definitions lower to
    /// lambdas.
    pub(crate) is_func_def: bool,
    /// Inside a class body.
    pub(crate) is_class: bool,
    /// Inside a dot-expression chain.
    pub(crate) is_dot_exp: bool,
}

impl Codegen {
    pub fn new(filename: &str) -> Self {
        Self {
            out: String::new(),
            captures: Vec::new(),
            symbols: MangleName::new(),
            enums: FxHashSet::default(),
            curr_enum: None,
            filename: filename.to_string(),
            unit: global_name(filename),
            local: false,
            is_define: false,
            is_ref: false,
            is_func_def: false,
            is_class: false,
            is_dot_exp: false,
        }
    }

    fn finish(self) -> String {
        self.out
    }

    /// Append text to the innermost open capture, or to the main buffer.
    pub(crate) fn write(&mut self, code: &str) {
        match self.captures.last_mut() {
            Some(buffer) => buffer.push_str(code),
            None => self.out.push_str(code),
        }
    }

    /// Run `f` with emission redirected into a fresh buffer and return
    /// what it wrote.
    pub(crate) fn captured(&mut self, f: impl FnOnce(&mut Self)) -> String {
        self.captures.push(String::new());
        f(self);
        self.captures.pop().unwrap_or_default()
    }

    /// Run `f` in a local-mangle scope: `local` is forced on and the
    /// symbol-map snapshot taken here is restored afterwards.
    pub(crate) fn scoped_local(&mut self, f: impl FnOnce(&mut Self)) {
        let was_local = self.local;
        let snapshot = self.symbols.clone();
        self.local = true;
        f(self);
        self.local = was_local;
        self.symbols = snapshot;
    }

    /// Run `f` with `is_ref` cleared, restoring the previous value
    /// afterwards.
    pub(crate) fn scoped_ref_reset(&mut self, f: impl FnOnce(&mut Self)) {
        let was_ref = self.is_ref;
        self.is_ref = false;
        f(self);
        self.is_ref = was_ref;
    }

    /// Emit one AST node.
    pub(crate) fn emit(&mut self, node: &AstNode) {
        match node {
            AstNode::Program { statements, .. } => {
                for stmt in statements {
                    self.emit(stmt);
                    self.write(";\n");
                }
            }
            AstNode::BlockStatement { statements, .. } => {
                for stmt in statements {
                    self.write("    ");
                    self.emit(stmt);
                    self.write(";\n");
                }
            }
            AstNode::ScopeStatement { body, .. } => {
                self.write("{\n");
                self.emit(body);
                self.write("\n}");
            }

            AstNode::VariableStatement {
                var_type,
                name,
                value,
                ..
            } => self.emit_variable(var_type, name, value),
            AstNode::ConstDeclaration {
                const_type,
                name,
                value,
                ..
            } => self.emit_const(const_type, name, value),
            AstNode::TypeDefinition { name, base, .. } => {
                self.emit_type_definition(name, base)
            }
            AstNode::UnionLiteral { name, fields, .. } => self.emit_union(name, fields),
            AstNode::EnumLiteral { name, fields, .. } => self.emit_enum(name, fields),
            AstNode::ClassDefinition {
                name,
                parents,
                attributes,
                methods,
                other,
                ..
            } => self.emit_class(name, parents, attributes, methods, other),
            AstNode::FunctionDefinition {
                name,
                parameters,
                return_type,
                body,
                ..
            } => self.emit_function(name, parameters, return_type, body),

            AstNode::If {
                condition,
                body,
                elifs,
                else_body,
                ..
            } => self.emit_if(condition, body, elifs, else_body),
            AstNode::While {
                condition, body, ..
            } => {
                self.write("while (");
                self.emit(condition);
                self.write(") {\n");
                self.emit(body);
                self.write("}");
            }
            AstNode::For {
                variables,
                sequence,
                body,
                ..
            } => self.emit_for(variables, sequence, body),
            AstNode::MatchStatement {
                subjects,
                cases,
                default_body,
                ..
            } => self.emit_match(subjects, cases, default_body),
            AstNode::ImportStatement { .. } => {}
            AstNode::Return { value, .. } => self.emit_return(value),
            AstNode::Break { .. } => self.write("break"),
            AstNode::Continue { .. } => self.write("continue"),
            AstNode::Pass { .. } => {
                // a comment, because every statement gets a trailing ;
                self.write("\n//pass");
            }
            AstNode::Assert {
                token, condition, ..
            } => self.emit_assert(token, condition),
            AstNode::Raise { value, .. } => self.emit_raise(value),
            AstNode::Static { body, .. } => {
                self.write("static ");
                self.emit(body);
            }
            AstNode::Inline { body, .. } => {
                self.write("inline ");
                self.emit(body);
            }
            AstNode::Export { body, .. } => self.emit_export(body),
            AstNode::With {
                variables,
                values,
                body,
                ..
            } => self.emit_with(variables, values, body),
            AstNode::TryExcept {
                body,
                clauses,
                else_body,
                ..
            } => self.emit_try_except(body, clauses, else_body),
            AstNode::MultipleAssign { names, values, .. } => {
                self.emit_multiple_assign(names, values)
            }
            AstNode::AugAssign {
                name, op, value, ..
            } => {
                self.emit(name);
                self.write(op);
                self.emit(value);
            }
            AstNode::DecoratorStatement {
                decorators, body, ..
            } => self.emit_decorator(decorators, body),
            AstNode::CastStatement {
                cast_type, value, ..
            } => {
                self.write("(");
                self.emit(cast_type);
                self.write(")(");
                self.emit(value);
                self.write(")");
            }
            AstNode::InlineCppBlock { code, .. } => self.write(code),

            AstNode::BinaryOperation {
                op, left, right, ..
            } => self.emit_binary(op, left, right),
            AstNode::PrefixExpression { prefix, right, .. } => {
                self.write("(");
                self.write(&prefix.keyword);
                self.write(" ");
                self.emit(right);
                self.write(")");
            }
            AstNode::PostfixExpression { postfix, left, .. } => {
                self.emit(left);
                self.write(&postfix.keyword);
            }
            AstNode::FunctionCall {
                callee, arguments, ..
            } => self.emit_call(callee, arguments),
            AstNode::DotExpression {
                owner, referenced, ..
            } => self.emit_dot(owner, referenced),
            AstNode::ArrowExpression {
                owner, referenced, ..
            } => self.emit_arrow(owner, referenced),
            AstNode::ListOrDictAccess {
                container, keys, ..
            } => self.emit_subscript(container, keys),
            AstNode::TernaryIf {
                condition,
                if_value,
                else_value,
                ..
            } => {
                self.write("(");
                self.emit(condition);
                self.write(")?");
                self.emit(if_value);
                self.write(":");
                self.emit(else_value);
            }
            AstNode::DefaultArg { value, .. } => self.emit(value),
            AstNode::IdentifierExpression { name, .. } => self.emit_identifier(name),
            AstNode::TypeExpression {
                name,
                generic_types,
                ..
            } => self.emit_type_expression(name, generic_types),
            AstNode::ListTypeExpr { .. } => {}
            AstNode::DictTypeExpr { .. } => {}
            AstNode::FunctionTypeExpr {
                arg_types,
                return_types,
                ..
            } => self.emit_function_type(arg_types, return_types),
            AstNode::PointerTypeExpr { base, .. } => {
                self.emit(base);
                self.write("*");
            }
            AstNode::RefTypeExpr { base, .. } => {
                self.emit(base);
                self.write("&");
            }
            AstNode::ListLiteral { elements, .. } => self.emit_braced_list(elements),
            AstNode::DictLiteral { .. } => {}
            AstNode::TupleExpr { elements, .. } => self.emit_braced_list(elements),

            AstNode::IntegerLiteral { value, .. } => self.write(value),
            AstNode::DecimalLiteral { value, .. } => self.write(value),
            AstNode::StringLiteral { value, .. } => {
                self.write("\"");
                self.write(value);
                self.write("\"");
            }
            AstNode::BoolLiteral { value, .. } => {
                self.write(if *value { "true" } else { "false" })
            }
            AstNode::NoneLiteral { .. } => self.write("NULL"),
            AstNode::NoLiteral => {}
        }
    }
}

/// The component types/values of a tuple node; empty for anything else.
pub(crate) fn tuple_elements(node: &AstNode) -> &[AstNode] {
    match node {
        AstNode::TupleExpr { elements, .. } => elements,
        _ => &[],
    }
}
