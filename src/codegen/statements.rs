//! Statement lowerings
//!
//! Declarations, control flow, and the higher-level statement forms that
//! lower to structured C: iterator-protocol for-loops, match chains,
//! context managers, exception dispatch, and the assertion diagnostic.
//!
//! All methods extend [`Codegen`] and write through the current sink.

use crate::codegen::generator::{tuple_elements, Codegen};
use crate::parser::ast::{AstNode, ExceptClause};
use crate::parser::tokens::Token;

impl Codegen {
    /// `[type] name [= value]`; an untyped statement is a reassignment
    /// and does not introduce a binding.
    pub(crate) fn emit_variable(
        &mut self,
        var_type: &AstNode,
        name: &AstNode,
        value: &AstNode,
    ) {
        if !var_type.is_no_literal() {
            self.emit(var_type);
            self.is_define = true;
            self.write(" ");
        }

        self.emit(name);
        self.is_define = false;

        if !value.is_no_literal() {
            self.write(" = ");
            self.emit(value);
        }
    }

    pub(crate) fn emit_const(
        &mut self,
        const_type: &AstNode,
        name: &AstNode,
        value: &AstNode,
    ) {
        self.write("const ");
        if !const_type.is_no_literal() {
            self.emit(const_type);
        }
        self.write(" ");
        self.is_define = true;
        self.emit(name);
        self.is_define = false;
        self.write("=");
        self.emit(value);
    }

    pub(crate) fn emit_type_definition(&mut self, name: &AstNode, base: &AstNode) {
        self.write("typedef ");
        self.emit(base);
        self.write(" ");
        self.is_define = true;
        self.emit(name);
        self.is_define = false;
    }

    pub(crate) fn emit_if(
        &mut self,
        condition: &AstNode,
        body: &AstNode,
        elifs: &[(AstNode, AstNode)],
        else_body: &AstNode,
    ) {
        self.write("if (");
        self.emit(condition);
        self.write(") {\n");
        self.emit(body);
        self.write("}");

        if !elifs.is_empty() {
            self.write("\n");
            for (elif_condition, elif_body) in elifs {
                self.write("else if (");
                self.emit(elif_condition);
                self.write(") {\n");
                self.emit(elif_body);
                self.write("}");
            }
        }

        if matches!(else_body, AstNode::BlockStatement { .. }) {
            self.write("\nelse {\n");
            self.emit(else_body);
            self.write("}");
        }
    }

    /// Lower `for` onto the iterator protocol of a captured temporary.
    /// Multiple loop variables draw one item per iteration and split it
    /// through `____getitem__`.
    pub(crate) fn emit_for(
        &mut self,
        variables: &[AstNode],
        sequence: &AstNode,
        body: &AstNode,
    ) {
        self.write("{\nauto ____PEREGRINE____VALUE=");
        self.emit(sequence);
        self.write(";\n");
        self.write("for (size_t ____PEREGRINE____i=0;____PEREGRINE____i<____PEREGRINE____VALUE.____PEREGRINE____PEREGRINE______iter__();++____PEREGRINE____i){\n");

        if variables.len() == 1 {
            self.write("auto ");
            self.emit(&variables[0]);
            self.write("=____PEREGRINE____VALUE.____PEREGRINE____PEREGRINE______iterate__();\n");
        } else {
            self.write("auto ____PEREGRINE____TEMP=____PEREGRINE____VALUE.____PEREGRINE____PEREGRINE______iterate__();\n");
            for (i, variable) in variables.iter().enumerate() {
                self.write("auto ");
                self.emit(variable);
                self.write("=____PEREGRINE____TEMP.____PEREGRINE____PEREGRINE______getitem__(");
                self.write(&i.to_string());
                self.write(");\n");
            }
        }

        self.emit(body);
        self.write("\n}\n}");
    }

    /// Lower `match` to an if/else chain inside a breakable `while`.
    pub(crate) fn emit_match(
        &mut self,
        subjects: &[AstNode],
        cases: &[(Vec<AstNode>, AstNode)],
        default_body: &AstNode,
    ) {
        self.write("\nwhile (true) {\n");

        for (i, (patterns, case_body)) in cases.iter().enumerate() {
            if patterns.len() == 1 && patterns[0].is_no_literal() {
                if i == 0 {
                    self.emit(case_body);
                    self.write("\n");
                } else {
                    self.write("else {\n");
                    self.emit(case_body);
                    self.write("\n}\n");
                }
            } else if i == 0 {
                self.write("if (");
                self.emit_match_arg(subjects, patterns);
                self.write(") {\n");
                self.emit(case_body);
                self.write("\n}\n");
            } else {
                self.write("else if (");
                self.emit_match_arg(subjects, patterns);
                self.write(") {\n");
                self.emit(case_body);
                self.write("\n}\n");
            }
        }

        if !default_body.is_no_literal() {
            self.emit(default_body);
        }
        self.write("\nbreak;\n}");
    }

    /// Pair each subject with its pattern slot; `_` slots always hold.
    fn emit_match_arg(&mut self, subjects: &[AstNode], patterns: &[AstNode]) {
        for (i, pattern) in patterns.iter().enumerate() {
            if i > 0 {
                self.write(" and ");
            }
            if pattern.is_no_literal() {
                self.write("true");
                continue;
            }
            self.write("(");
            if let Some(subject) = subjects.get(i) {
                self.emit(subject);
            }
            self.write("==");
            self.emit(pattern);
            self.write(")");
        }
    }

    /// `return e` stays a return; `return (e0, e1, …)` writes through the
    /// out-parameters of the tuple-return lowering instead.
    pub(crate) fn emit_return(&mut self, value: &AstNode) {
        if !value.is_no_literal() {
            let components = tuple_elements(value);
            if components.is_empty() {
                self.write("return ");
                self.emit(value);
            } else {
                self.write("if (____PEREGRINE____RETURN____0!=NULL){\n");
                for (i, component) in components.iter().enumerate() {
                    self.write("    ");
                    self.write(&format!("*____PEREGRINE____RETURN____{}=", i));
                    self.emit(component);
                    self.write(";\n");
                }
                self.write("}\n");
            }
        } else {
            self.write("return ");
        }
    }

    /// `assert` fails loudly with the original line, file, and statement.
    pub(crate) fn emit_assert(&mut self, token: &Token, condition: &AstNode) {
        self.write("if(not ");
        self.emit(condition);
        self.write("){\n");
        let diagnostic = format!(
            "printf(\"AssertionError : in line {} in file {}\\n   {}\\n\");fflush(stdout);throw error________PEREGRINE____PEREGRINE____AssertionError;",
            token.line, self.filename, token.statement
        );
        self.write(&diagnostic);
        self.write("\n}");
    }

    pub(crate) fn emit_raise(&mut self, value: &AstNode) {
        self.write("throw ");
        if !value.is_no_literal() {
            self.emit(value);
        } else {
            self.write("0");
        }
    }

    /// Capture each resource in a numbered context variable, acquire via
    /// `____enter__`, release every context after the body.
    pub(crate) fn emit_with(
        &mut self,
        variables: &[AstNode],
        values: &[AstNode],
        body: &AstNode,
    ) {
        self.write("{\n");

        for (i, value) in values.iter().enumerate() {
            self.write("auto CONTEXT____MANAGER____PEREGRINE____");
            self.write(&i.to_string());
            self.write("=");
            self.emit(value);
            self.write(";\n");

            let bound = variables.get(i).filter(|v| !v.is_no_literal());
            if let Some(variable) = bound {
                self.write("auto ");
                self.emit(variable);
                self.write("=");
            }
            self.write(&format!("CONTEXT____MANAGER____PEREGRINE____{}", i));
            self.write(".____PEREGRINE____PEREGRINE______enter__()");
            self.write(";\n");
        }

        self.emit(body);

        for i in 0..values.len() {
            self.write(&format!("CONTEXT____MANAGER____PEREGRINE____{}", i));
            self.write(".____PEREGRINE____PEREGRINE______end__();\n");
        }
        self.write("\n}\n");
    }

    /// Catch a single `error` value and dispatch over the clause lists;
    /// an unmatched exception is rethrown.
    pub(crate) fn emit_try_except(
        &mut self,
        body: &AstNode,
        clauses: &[ExceptClause],
        else_body: &AstNode,
    ) {
        self.write("try{\n");
        self.emit(body);
        // TODO: catch a base exception type once one exists
        self.write("}\ncatch(error __PEREGRINE__exception){\n");

        for (i, clause) in clauses.iter().enumerate() {
            if i == 0 {
                self.write("if (");
            } else {
                self.write("else if (");
            }
            for (j, exception) in clause.exceptions.iter().enumerate() {
                self.write("__PEREGRINE__exception==");
                self.emit(exception);
                if j < clause.exceptions.len() - 1 {
                    self.write(" or ");
                }
            }
            self.write("){\n");
            if !clause.name.is_no_literal() {
                self.write("auto ");
                self.emit(&clause.name);
                self.write("=__PEREGRINE__exception;\n");
            }
            self.emit(&clause.body);
            self.write("}\n");
        }

        if !else_body.is_no_literal() {
            if !clauses.is_empty() {
                self.write("else{");
                self.emit(else_body);
                self.write("}\n");
            } else {
                self.emit(else_body);
            }
        } else if !clauses.is_empty() {
            self.write("else{");
            self.write("throw __PEREGRINE__exception;\n");
            self.write("}\n");
        } else {
            self.write("throw __PEREGRINE__exception;\n");
        }

        self.write("}");
    }

    /// Evaluate all right-hand sides into temporaries before any name is
    /// written, so `a, b = b, a` swaps.
    pub(crate) fn emit_multiple_assign(&mut self, names: &[AstNode], values: &[AstNode]) {
        // TODO: make it work with iterables and multi-valued function
        // returns
        self.write("{");
        for (i, value) in values.iter().enumerate() {
            self.write(&format!("auto _____PEREGRINE____temp____{}=", i));
            self.emit(value);
            self.write(";");
        }
        for (i, name) in names.iter().enumerate() {
            self.emit(name);
            self.write(&format!("=_____PEREGRINE____temp____{}", i));
            self.write(";");
        }
        self.write("}");
    }

    /// `typedef union { … } Name;` with field names mangled locally.
    pub(crate) fn emit_union(&mut self, name: &AstNode, fields: &[(AstNode, AstNode)]) {
        self.write("typedef union{\n");
        self.scoped_local(|generator| {
            for (field_type, field_name) in fields {
                generator.emit(field_type);
                generator.write(" ");
                generator.is_define = true;
                generator.emit(field_name);
                generator.is_define = false;
                generator.write(";\n");
            }
            generator.write("\n}");
        });
        self.is_define = true;
        self.emit(name);
        self.is_define = false;
    }

    /// `typedef enum { T____field [= init], … } T;`. Initializers run
    /// with `curr_enum` set so bare identifiers qualify to siblings.
    pub(crate) fn emit_enum(&mut self, name: &AstNode, fields: &[(AstNode, AstNode)]) {
        self.write("typedef enum{\n");

        let enum_name = name.identifier_name().unwrap_or_default().to_string();
        self.enums.insert(enum_name.clone());

        for (i, (field_name, init)) in fields.iter().enumerate() {
            self.emit(name);
            self.write("____");
            self.scoped_local(|generator| {
                generator.emit(field_name);
            });
            if !init.is_no_literal() {
                self.curr_enum = Some(enum_name.clone());
                self.write(" = ");
                self.emit(init);
                self.curr_enum = None;
            }
            if i != fields.len() - 1 {
                self.write(",\n");
            }
        }

        self.write("\n}");
        self.emit(name);
    }
}
