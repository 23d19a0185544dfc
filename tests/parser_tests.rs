use peregrine::parser::ast::AstNode;
use peregrine::parser::lexer::Lexer;
use peregrine::parser::parse::Parser;

fn parse(source: &str) -> Vec<AstNode> {
    let tokens = Lexer::new(source).tokenize().expect("lexing failed");
    let program = Parser::new(tokens, "test.pg")
        .parse()
        .expect("parsing failed");
    match program {
        AstNode::Program { statements, .. } => statements,
        _ => panic!("expected a program root"),
    }
}

#[test]
fn test_empty_program() {
    let statements = parse("");
    assert!(statements.is_empty());
}

#[test]
fn test_single_expression_statement() {
    let statements = parse("f(1)\n");
    assert_eq!(statements.len(), 1);
    assert!(matches!(statements[0], AstNode::FunctionCall { .. }));
}

#[test]
fn test_program_without_trailing_newline() {
    assert_eq!(parse("x = 1").len(), parse("x = 1\n").len());
}

#[test]
fn test_function_definition_shape() {
    let statements = parse("def add(int a, int b = 0) -> int:\n    return a + b\n");
    let AstNode::FunctionDefinition {
        name,
        parameters,
        return_type,
        body,
        ..
    } = &statements[0]
    else {
        panic!("expected a function definition");
    };

    assert_eq!(name.identifier_name(), Some("add"));
    assert_eq!(parameters.len(), 2);
    assert!(parameters[0].default.is_no_literal());
    assert!(!parameters[1].default.is_no_literal());
    assert!(matches!(
        **return_type,
        AstNode::TypeExpression { ref name, .. } if name == "int"
    ));

    let AstNode::BlockStatement { statements, .. } = &**body else {
        panic!("expected a block body");
    };
    assert_eq!(statements.len(), 1);
    assert!(matches!(statements[0], AstNode::Return { .. }));
}

#[test]
fn test_zero_parameter_function_defaults_to_void() {
    let statements = parse("def f():\n    pass\n");
    let AstNode::FunctionDefinition {
        parameters,
        return_type,
        ..
    } = &statements[0]
    else {
        panic!("expected a function definition");
    };
    assert!(parameters.is_empty());
    assert!(matches!(
        **return_type,
        AstNode::TypeExpression { ref name, .. } if name == "void"
    ));
}

#[test]
fn test_tuple_return_type() {
    let statements = parse("def f() -> (int, int):\n    return (1, 2)\n");
    let AstNode::FunctionDefinition {
        return_type, body, ..
    } = &statements[0]
    else {
        panic!("expected a function definition");
    };
    let AstNode::TupleExpr { elements, .. } = &**return_type else {
        panic!("expected a tuple return type");
    };
    assert_eq!(elements.len(), 2);

    let AstNode::BlockStatement { statements, .. } = &**body else {
        panic!("expected a block body");
    };
    let AstNode::Return { value, .. } = &statements[0] else {
        panic!("expected a return");
    };
    assert!(matches!(**value, AstNode::TupleExpr { .. }));
}

#[test]
fn test_if_elif_else() {
    let statements = parse(
        "if a:\n    pass\nelif b:\n    pass\nelif c:\n    pass\nelse:\n    pass\n",
    );
    let AstNode::If {
        elifs, else_body, ..
    } = &statements[0]
    else {
        panic!("expected an if statement");
    };
    assert_eq!(elifs.len(), 2);
    assert!(matches!(**else_body, AstNode::BlockStatement { .. }));
}

#[test]
fn test_for_single_variable() {
    let statements = parse("for i in xs:\n    pass\n");
    let AstNode::For { variables, .. } = &statements[0] else {
        panic!("expected a for statement");
    };
    assert_eq!(variables.len(), 1);
}

#[test]
fn test_for_destructuring_variables() {
    let statements = parse("for k, v in pairs:\n    pass\n");
    let AstNode::For { variables, .. } = &statements[0] else {
        panic!("expected a for statement");
    };
    assert_eq!(variables.len(), 2);
    assert_eq!(variables[0].identifier_name(), Some("k"));
    assert_eq!(variables[1].identifier_name(), Some("v"));
}

#[test]
fn test_match_with_wildcard_and_default() {
    let statements = parse(
        "match x, y:\n    case 1, _:\n        pass\n    case 2, 3:\n        pass\n    default:\n        pass\n",
    );
    let AstNode::MatchStatement {
        subjects,
        cases,
        default_body,
        ..
    } = &statements[0]
    else {
        panic!("expected a match statement");
    };
    assert_eq!(subjects.len(), 2);
    assert_eq!(cases.len(), 2);
    assert!(cases[0].0[1].is_no_literal());
    assert!(matches!(**default_body, AstNode::BlockStatement { .. }));
}

#[test]
fn test_import_forms() {
    let statements = parse("import math as m\nfrom utils import sin, cos as c\n");

    let AstNode::ImportStatement { module, symbols, .. } = &statements[0] else {
        panic!("expected an import statement");
    };
    assert_eq!(module.0.identifier_name(), Some("math"));
    assert_eq!(module.1.identifier_name(), Some("m"));
    assert!(symbols.is_empty());

    let AstNode::ImportStatement { module, symbols, .. } = &statements[1] else {
        panic!("expected an import statement");
    };
    assert_eq!(module.0.identifier_name(), Some("utils"));
    assert_eq!(symbols.len(), 2);
    assert!(symbols[0].1.is_no_literal());
    assert_eq!(symbols[1].1.identifier_name(), Some("c"));
}

#[test]
fn test_with_bindings() {
    let statements = parse("with open() as f, lock():\n    pass\n");
    let AstNode::With {
        variables, values, ..
    } = &statements[0]
    else {
        panic!("expected a with statement");
    };
    assert_eq!(values.len(), 2);
    assert_eq!(variables[0].identifier_name(), Some("f"));
    assert!(variables[1].is_no_literal());
}

#[test]
fn test_try_except_clauses() {
    let statements = parse(
        "try:\n    pass\nexcept IOError, OSError as e:\n    pass\nexcept ValueError:\n    pass\nelse:\n    pass\n",
    );
    let AstNode::TryExcept {
        clauses, else_body, ..
    } = &statements[0]
    else {
        panic!("expected a try statement");
    };
    assert_eq!(clauses.len(), 2);
    assert_eq!(clauses[0].exceptions.len(), 2);
    assert_eq!(clauses[0].name.identifier_name(), Some("e"));
    assert!(clauses[1].name.is_no_literal());
    assert!(matches!(**else_body, AstNode::BlockStatement { .. }));
}

#[test]
fn test_vacuous_try_is_an_error() {
    let tokens = Lexer::new("try:\n    pass\n").tokenize().unwrap();
    assert!(Parser::new(tokens, "test.pg").parse().is_err());
}

#[test]
fn test_decorator_chain_is_retained_in_order() {
    let statements = parse("@first\n@second\ndef g():\n    pass\n");
    let AstNode::DecoratorStatement {
        decorators, body, ..
    } = &statements[0]
    else {
        panic!("expected a decorator statement");
    };
    assert_eq!(decorators.len(), 2);
    assert_eq!(decorators[0].identifier_name(), Some("first"));
    assert_eq!(decorators[1].identifier_name(), Some("second"));
    assert!(matches!(**body, AstNode::FunctionDefinition { .. }));
}

#[test]
fn test_class_member_classification() {
    let statements = parse(
        "class Point(Base):\n    int x = 0\n    const int origin = 0\n    def __getitem__(int i) -> int:\n        return i\n    pass\n",
    );
    let AstNode::ClassDefinition {
        parents,
        attributes,
        methods,
        other,
        ..
    } = &statements[0]
    else {
        panic!("expected a class definition");
    };
    assert_eq!(parents.len(), 1);
    assert_eq!(attributes.len(), 2);
    assert_eq!(methods.len(), 1);
    assert_eq!(other.len(), 1);
}

#[test]
fn test_enum_fields_and_initializers() {
    let statements = parse("enum Color:\n    Red = 1\n    Green\n    Blue = Green\n");
    let AstNode::EnumLiteral { fields, .. } = &statements[0] else {
        panic!("expected an enum literal");
    };
    assert_eq!(fields.len(), 3);
    assert!(!fields[0].1.is_no_literal());
    assert!(fields[1].1.is_no_literal());
    assert_eq!(fields[2].1.identifier_name(), Some("Green"));
}

#[test]
fn test_union_fields() {
    let statements = parse("union Pack:\n    int small\n    float wide\n");
    let AstNode::UnionLiteral { fields, .. } = &statements[0] else {
        panic!("expected a union literal");
    };
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[1].1.identifier_name(), Some("wide"));
}

#[test]
fn test_const_and_type_definitions() {
    let statements = parse("const float pi = 3.14\ntype Callback = def (int) -> int\n");
    assert!(matches!(statements[0], AstNode::ConstDeclaration { .. }));

    let AstNode::TypeDefinition { base, .. } = &statements[1] else {
        panic!("expected a type definition");
    };
    let AstNode::FunctionTypeExpr { arg_types, .. } = &**base else {
        panic!("expected a function type");
    };
    assert_eq!(arg_types.len(), 1);
}

#[test]
fn test_multiple_and_augmented_assignment() {
    let statements = parse("a, b = 1, 2\nc += 3\n");

    let AstNode::MultipleAssign { names, values, .. } = &statements[0] else {
        panic!("expected a multiple assignment");
    };
    assert_eq!(names.len(), 2);
    assert_eq!(values.len(), 2);

    let AstNode::AugAssign { op, .. } = &statements[1] else {
        panic!("expected an augmented assignment");
    };
    assert_eq!(op, "+=");
}

#[test]
fn test_nested_functions_three_levels() {
    let statements = parse(
        "def outer():\n    def middle():\n        def inner():\n            pass\n",
    );
    let AstNode::FunctionDefinition { body, .. } = &statements[0] else {
        panic!("expected a function definition");
    };
    let AstNode::BlockStatement { statements, .. } = &**body else {
        panic!("expected a block");
    };
    let AstNode::FunctionDefinition { body, .. } = &statements[0] else {
        panic!("expected a nested function");
    };
    let AstNode::BlockStatement { statements, .. } = &**body else {
        panic!("expected a block");
    };
    assert!(matches!(statements[0], AstNode::FunctionDefinition { .. }));
}

#[test]
fn test_every_node_carries_its_token() {
    let statements = parse("x = 1\n");
    let AstNode::VariableStatement { name, value, .. } = &statements[0] else {
        panic!("expected a variable statement");
    };
    assert!(statements[0].token().is_some());
    assert!(name.token().is_some());
    assert!(value.token().is_some());
}

#[test]
fn test_error_batch_accumulates() {
    // two bad statements; parsing continues past the first
    let tokens = Lexer::new("x = *\ny = *\n").tokenize().unwrap();
    let errors = Parser::new(tokens, "test.pg")
        .parse()
        .expect_err("expected parse errors");
    assert!(errors.len() >= 2);
    assert_eq!(errors[0].location.filename, "test.pg");
    assert_eq!(errors[0].location.line, 1);
}
