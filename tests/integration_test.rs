// Integration tests for the full lex → parse → check pipeline

use matcheck::checker::{Diagnostic, Type};
use matcheck::parser::parse::{ParseError, Parser};
use matcheck::{analyze, printer, Checked};
use std::fs;
use std::path::Path;

fn checked(source: &str) -> Checked {
    analyze(source).outcome.expect("Parsing failed")
}

fn messages(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(|d| d.to_string()).collect()
}

#[test]
fn test_transpose_and_add_scenario() {
    let result = checked("a = [1,2;3,4]; b = a'; c = a + b;");

    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.symbols.type_of("a"), Some(Type::matrix(2, 2)));
    assert_eq!(result.symbols.type_of("b"), Some(Type::matrix(2, 2)));
    assert_eq!(result.symbols.type_of("c"), Some(Type::matrix(2, 2)));
}

#[test]
fn test_scalar_elementwise_scenario() {
    let result = checked("a = 5; b = [1,2,3]; c = a .* b;");

    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.symbols.type_of("c"), Some(Type::matrix(1, 3)));
}

#[test]
fn test_syntax_error_stops_pipeline() {
    let analysis = analyze("if (x > 0 { y = 1; }");

    let err = analysis.outcome.as_ref().expect_err("Parsing should fail");
    assert!(matches!(err, ParseError::UnexpectedToken { kind, .. } if *kind == "LBRACE"));
    assert_eq!(err.location().line, 1);
    assert!(analysis.diagnostics().is_empty());
    assert!(!analysis.is_clean());
}

#[test]
fn test_unexpected_end_of_input() {
    let analysis = analyze("while (1 < 2) {\n  x = 1;\n");

    let err = analysis.outcome.expect_err("Parsing should fail");
    assert!(err.to_string().starts_with("Unexpected end of input"));
}

#[test]
fn test_illegal_characters_are_skipped() {
    let analysis = analyze("a = 1 @ ;\nb = a $+ 2;");

    let lex: Vec<String> = analysis.lex_errors.iter().map(|e| e.to_string()).collect();
    assert_eq!(
        lex,
        vec![
            "Illegal character '@' at line 1, column 7",
            "Illegal character '$' at line 2, column 7",
        ]
    );

    let result = analysis.outcome.as_ref().expect("Parsing failed");
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.symbols.type_of("b"), Some(Type::Int));
    assert!(!analysis.is_clean());
}

#[test]
fn test_oversized_integer_keeps_int_type() {
    let analysis = analyze("x = 99999999999999999999;");

    assert_eq!(analysis.lex_errors.len(), 1);
    let result = analysis.outcome.as_ref().expect("Parsing failed");
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.symbols.type_of("x"), Some(Type::Int));
}

#[test]
fn test_trailing_dot_float_times_int() {
    let result = checked("a = 2.*3;");

    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.symbols.type_of("a"), Some(Type::Float));
}

#[test]
fn test_builtin_sized_by_int_variable() {
    let result = checked("n = 3;\nb = ones(n);\nc = b';");

    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert!(result.symbols.type_of("c").is_some_and(Type::is_matrix));
}

#[test]
fn test_scope_merge_after_if() {
    let result = checked("if (1 < 2) { x = 1; }\ny = x + 1;");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.symbols.type_of("x"), Some(Type::Int));
}

#[test]
fn test_break_gated_by_loop_depth() {
    let outside = checked("break;");
    let inside = checked("while (1 < 2) { break; }");

    assert_eq!(
        messages(&outside.diagnostics),
        vec!["Line 1: Instruction outside a loop: break"]
    );
    assert!(inside.diagnostics.is_empty());
}

#[test]
fn test_compound_assignment_to_undeclared() {
    let compound = checked("y += 1;");
    let plain = checked("y = 1;");

    assert_eq!(
        messages(&compound.diagnostics),
        vec!["Line 1: Variable does not exist: y"]
    );
    assert!(plain.diagnostics.is_empty());
    assert_eq!(plain.symbols.type_of("y"), Some(Type::Int));
}

#[test]
fn test_mismatch_result_cascades_downstream() {
    let result = checked("a = zeros(2, 3);\nb = zeros(3, 2);\nc = a + b;\nprint c;\nd = c';");

    assert_eq!(
        messages(&result.diagnostics),
        vec![
            "Line 3: Invalid dimensions for matrices (2x3) and (3x2)",
            "Line 4: print operation with unknown variable",
            "Line 5: Transpose operation with a non-matrix",
        ]
    );
    assert_eq!(result.symbols.type_of("c"), None);
}

#[test]
fn test_diagnostics_follow_source_order() {
    let result = checked("x = 1;\nbreak;\nz = x + \"s\";\n");

    let lines: Vec<usize> = result.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![2, 3]);
    assert_eq!(
        result.diagnostics[1].to_string(),
        "Line 3: Invalid operation: int + string"
    );
}

#[test]
fn test_repeated_analysis_is_independent() {
    let first = checked("a = 1; break;");
    let second = checked("a = 1; break;");

    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(first.symbols.len(), 1);
}

#[test]
fn test_tree_dump_is_deterministic() {
    let source = "for i = 1:3 { m = [i, 2; 3, 4]; print m'; }";
    let mut p1 = Parser::new(source);
    let mut p2 = Parser::new(source);
    let first = printer::render(&p1.parse_program().expect("Parsing failed"));
    let second = printer::render(&p2.parse_program().expect("Parsing failed"));

    assert_eq!(first, second);
    assert!(first.starts_with("FOR\n"));
}

#[test]
fn test_showcase_demo_is_clean() {
    let path = Path::new("demos/showcase.m");
    let source = fs::read_to_string(path).expect("Failed to read demo file");

    let analysis = analyze(&source);
    assert!(analysis.lex_errors.is_empty());
    let result = analysis.outcome.as_ref().expect("Parsing failed");

    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.symbols.type_of("C"), Some(Type::matrix(2, 3)));
    assert_eq!(result.symbols.type_of("E"), Some(Type::matrix(2, 3)));
    assert_eq!(result.symbols.type_of("v"), Some(Type::matrix(4, 1)));
    assert_eq!(result.symbols.type_of("scale"), Some(Type::Float));
    assert!(analysis.is_clean());
}

#[test]
fn test_mistakes_demo_reports_every_line() {
    let path = Path::new("demos/mistakes.m");
    let source = fs::read_to_string(path).expect("Failed to read demo file");

    let result = checked(&source);

    assert_eq!(
        messages(&result.diagnostics),
        vec![
            "Line 3: Incompatible size for matrix",
            "Line 4: Invalid dimensions for matrices (2x3) and (3x2)",
            "Line 5: Transpose operation with a non-matrix",
            "Line 6: Variable does not exist: x",
            "Line 7: Instruction outside a loop: break",
            "Line 8: Condition is not a boolean",
            "Line 9: Invalid range arguments",
            "Line 10: Not existing variable: missing",
            "Line 10: print operation with unknown variable",
        ]
    );
}
