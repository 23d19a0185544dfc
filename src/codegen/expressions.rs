//! Expression lowerings and name resolution at emission
//!
//! The identifier emitter is the heart of the mangling discipline; its
//! case order decides how shadowing, enum qualification, and member
//! references resolve, and must not be reordered.

use crate::codegen::generator::Codegen;
use crate::codegen::symbols::MANGLE_PREFIX;
use crate::parser::ast::AstNode;
use crate::parser::tokens::{Token, TokenKind};

impl Codegen {
    /// Resolve and write one identifier.
    ///
    /// Case order is load-bearing:
    /// 1. member reference (`is_ref`) → bare prefix mangling
    /// 2. enum initializer in flight → sibling qualification
    /// 3. unknown name → insert local or global, then emit
    /// 4. re-binding a known name (`is_define`) → shadow locally
    /// 5. otherwise → emit the looked-up mangling
    pub(crate) fn emit_identifier(&mut self, name: &str) {
        if self.is_ref {
            self.write(MANGLE_PREFIX);
            self.write(name);
            return;
        }

        if let Some(curr_enum) = self.curr_enum.clone() {
            let mangled = self.symbols.get(&curr_enum);
            self.write(&mangled);
            self.write("________PEREGRINE____PEREGRINE____");
            self.write(name);
            return;
        }

        if !self.symbols.contains(name) {
            if self.local {
                self.symbols.set_local(name);
            } else {
                let mangled = format!("{}{}{}", MANGLE_PREFIX, self.unit, name);
                self.symbols.set_global(name, &mangled);
            }
        } else if self.is_define && self.local {
            // re-binding in a nested scope shadows the known name; at the
            // top level the existing mapping (exports included) stands
            self.symbols.set_local(name);
        }

        let mangled = self.symbols.get(name);
        self.write(&mangled);
    }

    /// Types keep their spelling unless the name was bound (typedefs,
    /// classes, enums mangle; `int` stays `int`).
    pub(crate) fn emit_type_expression(&mut self, name: &str, generic_types: &[AstNode]) {
        if !self.symbols.contains(name) {
            self.write(name);
        } else {
            let mangled = self.symbols.get(name);
            self.write(&mangled);
        }

        if !generic_types.is_empty() {
            self.write("<");
            for (i, generic) in generic_types.iter().enumerate() {
                self.emit(generic);
                if i < generic_types.len() - 1 {
                    self.write(",");
                }
            }
            self.write(">");
        }
    }

    /// Binary operators mostly stay infix; `**`, `//`, `in`, and
    /// `not in` lower to runtime helpers or the container protocol.
    pub(crate) fn emit_binary(&mut self, op: &Token, left: &AstNode, right: &AstNode) {
        if op.keyword == "**" {
            self.write("_PEREGRINE_POWER(");
            self.emit(left);
            self.write(",");
            self.emit(right);
            self.write(")");
        } else if op.keyword == "//" {
            self.write("_PEREGRINE_FLOOR(");
            self.emit(left);
            self.write("/");
            self.emit(right);
            self.write(")");
        } else if op.kind == TokenKind::In {
            self.write("(");
            self.emit(right);
            self.write(".____PEREGRINE____PEREGRINE______contains__(");
            self.emit(left);
            self.write("))");
        } else if op.kind == TokenKind::NotIn {
            self.write("(not ");
            self.emit(right);
            self.write(".____PEREGRINE____PEREGRINE______contains__(");
            self.emit(left);
            self.write("))");
        } else {
            self.write("(");
            self.emit(left);
            self.write(" ");
            self.write(&op.keyword);
            self.write(" ");
            self.emit(right);
            self.write(")");
        }
    }

    pub(crate) fn emit_call(&mut self, callee: &AstNode, arguments: &[AstNode]) {
        self.emit(callee);
        self.write("(");
        self.scoped_ref_reset(|generator| {
            for (i, argument) in arguments.iter().enumerate() {
                if i > 0 {
                    generator.write(", ");
                }
                generator.emit(argument);
            }
        });
        self.write(")");
    }

    /// `c[k]` → `c.____getitem__(k)`; a slice passes its second index as
    /// a second argument.
    pub(crate) fn emit_subscript(&mut self, container: &AstNode, keys: &[AstNode]) {
        self.emit(container);
        self.write(".____PEREGRINE____PEREGRINE______getitem__(");
        self.scoped_ref_reset(|generator| {
            if let Some(first) = keys.first() {
                generator.emit(first);
            }
            if keys.len() == 2 {
                generator.write(",");
                generator.emit(&keys[1]);
            }
        });
        self.write(")");
    }

    pub(crate) fn emit_arrow(&mut self, owner: &AstNode, referenced: &AstNode) {
        let was_ref = self.is_ref;
        // TODO: this owner check is always true; decide which chain kinds
        // were meant to skip re-emitting the owner
        if !matches!(owner, AstNode::DotExpression { .. })
            || !matches!(owner, AstNode::ArrowExpression { .. })
        {
            self.is_ref = false;
            self.emit(owner);
        }
        self.write("->");
        self.is_ref = true;
        self.emit(referenced);
        self.is_ref = was_ref;
    }

    /// Member access, with one special case: `E.X` where `E` is a known
    /// enum qualifies to the enum-member mangling instead.
    pub(crate) fn emit_dot(&mut self, owner: &AstNode, referenced: &AstNode) {
        let was_ref = self.is_ref;
        self.is_ref = true;
        // TODO: this owner check is always true; decide which chain kinds
        // were meant to keep `is_ref` set
        if !matches!(owner, AstNode::DotExpression { .. })
            || !matches!(owner, AstNode::ArrowExpression { .. })
        {
            self.is_ref = false;
        }

        if !self.is_dot_exp {
            if let AstNode::IdentifierExpression { name, .. } = owner {
                let qualifies = self.enums.contains(name) && self.symbols.contains(name);
                if qualifies {
                    if let Some(member) = referenced.identifier_name() {
                        let mangled = self.symbols.get(name);
                        self.write(&mangled);
                        self.write("________PEREGRINE____PEREGRINE____");
                        self.write(member);
                        self.is_ref = was_ref;
                        return;
                    }
                }
                self.is_dot_exp = true;
                self.emit(owner);
                self.write(".");
                self.is_ref = true;
                self.emit(referenced);
            } else {
                if !matches!(owner, AstNode::DotExpression { .. }) {
                    self.is_dot_exp = true;
                }
                self.emit(owner);
                self.write(".");
                self.is_ref = true;
                self.emit(referenced);
            }
            self.is_dot_exp = false;
        } else {
            self.emit(owner);
            self.write(".");
            self.is_ref = true;
            self.emit(referenced);
        }

        self.is_ref = was_ref;
    }

    /// Braced initializer list, shared by list literals and standalone
    /// tuples.
    pub(crate) fn emit_braced_list(&mut self, elements: &[AstNode]) {
        self.write("{");
        for (i, element) in elements.iter().enumerate() {
            self.emit(element);
            if i < elements.len() - 1 {
                self.write(",");
            }
        }
        self.write("}");
    }
}
