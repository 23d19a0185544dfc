//! Function, decorator, and class lowerings
//!
//! The most involved translations live here: top-level functions (with
//! the tuple-return out-parameter form), nested functions as lambdas, the
//! buffered decorator chain, class bodies with magic-method alignment,
//! and `extern "C"` exports.

use crate::codegen::generator::{tuple_elements, Codegen};
use crate::parser::ast::{AstNode, Param};

impl Codegen {
    /// Render the parameter list: `auto` for untyped parameters, `=`
    /// defaults appended, names introduced as definitions.
    pub(crate) fn emit_func_params(&mut self, parameters: &[Param]) {
        for (i, param) in parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if param.p_type.is_no_literal() {
                self.write("auto");
            } else {
                self.emit(&param.p_type);
            }
            self.write(" ");
            self.is_define = true;
            self.emit(&param.name);
            self.is_define = false;
            if !param.default.is_no_literal() {
                self.write("=");
                self.emit(&param.default);
            }
        }
    }

    /// Append the out-parameters of the tuple-return lowering, one per
    /// component type, each defaulted to `NULL`.
    fn emit_return_out_params(&mut self, returns: &[AstNode]) {
        for (i, return_type) in returns.iter().enumerate() {
            self.emit(return_type);
            self.write(&format!("*____PEREGRINE____RETURN____{}=NULL", i));
            if i < returns.len() - 1 {
                self.write(",");
            }
        }
    }

    /// Top-level functions emit as plain C functions (`main` verbatim,
    /// with an unconditional `return 0`); functions inside a function
    /// body lower to capturing lambdas.
    pub(crate) fn emit_function(
        &mut self,
        name: &AstNode,
        parameters: &[Param],
        return_type: &AstNode,
        body: &AstNode,
    ) {
        let returns = tuple_elements(return_type);
        let function_name = name.identifier_name().unwrap_or_default().to_string();

        if !self.is_func_def {
            self.is_func_def = true;

            if function_name == "main" {
                // main always reports success
                self.write("int main (");
                self.symbols.set_global("main", "main");
                self.scoped_local(|generator| {
                    generator.emit_func_params(parameters);
                    generator.write(") {\n");
                    generator.emit(body);
                    generator.write("return 0;\n}");
                });
            } else {
                if returns.is_empty() {
                    self.emit(return_type);
                } else {
                    self.write("void");
                }
                self.write(" ");
                self.is_define = true;
                self.emit(name);
                self.is_define = false;
                self.write("(");
                self.scoped_local(|generator| {
                    generator.emit_func_params(parameters);
                    if !returns.is_empty() && !parameters.is_empty() {
                        generator.write(",");
                    }
                    generator.emit_return_out_params(returns);
                    generator.write(") {\n");
                    generator.emit(body);
                    generator.write("\n}");
                });
            }

            self.is_func_def = false;
        } else {
            self.scoped_local(|generator| {
                generator.write("auto ");
                generator.is_define = true;
                generator.emit(name);
                generator.is_define = false;
                generator.write("=[=](");
                generator.emit_func_params(parameters);
                if !returns.is_empty() && !parameters.is_empty() {
                    generator.write(",");
                }
                generator.emit_return_out_params(returns);
                generator.write(")mutable->");
                if returns.is_empty() {
                    generator.emit(return_type);
                } else {
                    generator.write("void");
                }
                generator.write(" {\n");
                generator.emit(body);
                generator.write("\n}");
            });
        }
    }

    /// Build the decorated function as a lambda in a capture buffer, fold
    /// the decorator expressions around it from last to first, then emit
    /// the finished chain through the outer sink.
    pub(crate) fn emit_decorator(&mut self, decorators: &[AstNode], body: &AstNode) {
        let (function, is_static) = match body {
            AstNode::Static { body: inner, .. } => (&**inner, true),
            _ => (body, false),
        };
        let AstNode::FunctionDefinition {
            name,
            parameters,
            return_type,
            body: function_body,
            ..
        } = function
        else {
            return;
        };

        let head = self.captured(|generator| {
            if is_static {
                generator.write("static ");
            }
            generator.write("auto ");
            generator.is_define = true;
            generator.emit(name);
            generator.is_define = false;
            generator.write("=");
        });

        let returns = tuple_elements(return_type);
        let mut chain = self.captured(|generator| {
            if generator.is_func_def {
                generator.write("[=](");
            } else {
                generator.write("[](");
            }
            generator.scoped_local(|generator| {
                generator.emit_func_params(parameters);
                if !returns.is_empty() && !parameters.is_empty() {
                    generator.write(",");
                }
                generator.emit_return_out_params(returns);
                generator.write(")mutable->");
                if returns.is_empty() {
                    generator.emit(return_type);
                } else {
                    generator.write("void");
                }
                generator.write("{\n");
                if !generator.is_func_def {
                    generator.is_func_def = true;
                    generator.emit(function_body);
                    generator.is_func_def = false;
                } else {
                    generator.emit(function_body);
                }
                generator.write("\n}");
            });
        });

        for decorator in decorators.iter().rev() {
            let callee = self.captured(|generator| generator.emit(decorator));
            chain = format!("{}({})", callee, chain);
        }

        self.write(&head);
        self.write(&chain);
    }

    /// `class Name : public P1, … { other; public: attrs; methods; };`
    pub(crate) fn emit_class(
        &mut self,
        name: &AstNode,
        parents: &[AstNode],
        attributes: &[AstNode],
        methods: &[AstNode],
        other: &[AstNode],
    ) {
        self.write("class ");
        self.is_define = true;
        self.emit(name);
        self.is_define = false;

        if !parents.is_empty() {
            self.write(":");
        }
        for (i, parent) in parents.iter().enumerate() {
            self.write("public ");
            self.emit(parent);
            if i < parents.len() - 1 {
                self.write(",");
            }
        }

        self.write("\n{");
        self.scoped_local(|generator| {
            for member in other {
                generator.emit(member);
                generator.write(";\n");
            }
            generator.write("public:\n");

            let was_class = generator.is_class;
            generator.is_class = true;
            for attribute in attributes {
                generator.emit(attribute);
                generator.write(";\n");
            }
            for method in methods {
                generator.emit_method(method);
                generator.write(";\n");
            }
            generator.is_class = was_class;

            generator.write("\n}");
        });
    }

    /// Emit one class method, first aligning dunder names with the
    /// protocol spellings the for/with/subscript lowerings call.
    fn emit_method(&mut self, method: &AstNode) {
        let function = match method {
            AstNode::Static { body, .. } => &**body,
            AstNode::DecoratorStatement { body, .. } => match &**body {
                AstNode::Static { body: inner, .. } => &**inner,
                decorated => decorated,
            },
            plain => plain,
        };

        if let AstNode::FunctionDefinition { name, .. } = function {
            if let Some(method_name) = name.identifier_name() {
                if method_name.starts_with("__") && method_name.ends_with("__") {
                    self.symbols.set_local(method_name);
                }
            }
        }

        self.emit(method);
    }

    /// Exported functions keep their spelling; the identity mapping stops
    /// later references from remangling them.
    pub(crate) fn emit_export(&mut self, body: &AstNode) {
        self.write("extern \"C\" ");
        if let AstNode::FunctionDefinition { name, .. } = body {
            if let Some(exported) = name.identifier_name() {
                self.symbols.set_global(exported, exported);
            }
        }
        self.emit(body);
    }

    /// `std::function<R(Args…)>`, with tuple returns becoming trailing
    /// pointer parameters of a `void` signature.
    pub(crate) fn emit_function_type(
        &mut self,
        arg_types: &[AstNode],
        return_types: &AstNode,
    ) {
        self.write("std::function<");

        let returns = tuple_elements(return_types);
        if returns.is_empty() {
            self.emit(return_types);
            self.write("(");
        } else {
            self.write("void(");
        }

        if !arg_types.is_empty() {
            for (i, arg_type) in arg_types.iter().enumerate() {
                if i > 0 {
                    self.write(",");
                }
                self.emit(arg_type);
            }
            if !returns.is_empty() {
                self.write(",");
            }
        }
        for (i, return_type) in returns.iter().enumerate() {
            self.emit(return_type);
            self.write("*");
            if i < returns.len() - 1 {
                self.write(",");
            }
        }

        self.write(")>");
    }
}
