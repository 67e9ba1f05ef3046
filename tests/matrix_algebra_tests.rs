use matcheck::analyze;
use matcheck::checker::{Shape, Type};

fn type_of(source: &str, name: &str) -> (Option<Type>, Vec<String>) {
    let analysis = analyze(source);
    let result = analysis.outcome.expect("Parsing failed");
    let diagnostics = result.diagnostics.iter().map(|d| d.message()).collect();
    (result.symbols.type_of(name), diagnostics)
}

#[test]
fn test_row_broadcast_either_order() {
    for (rows, cols) in [(2, 3), (5, 1), (12, 10)] {
        let setup = format!("r = ones(1, {cols}); m = zeros({rows}, {cols});");
        let left = format!("{setup} x = r + m;");
        let right = format!("{setup} x = m - r;");

        assert_eq!(type_of(&left, "x"), (Some(Type::matrix(rows, cols)), vec![]));
        assert_eq!(type_of(&right, "x"), (Some(Type::matrix(rows, cols)), vec![]));
    }
}

#[test]
fn test_incompatible_shapes() {
    let (ty, diags) = type_of("a = ones(2, 3); b = ones(3, 2); c = a * b;", "c");

    assert_eq!(ty, None);
    assert_eq!(diags, vec!["Invalid dimensions for matrices (2x3) and (3x2)"]);
}

#[test]
fn test_row_vector_needs_matching_columns() {
    let (ty, diags) = type_of("a = ones(1, 4); b = ones(3, 3); c = a + b;", "c");

    assert_eq!(ty, None);
    assert_eq!(diags, vec!["Invalid dimensions for matrices (1x4) and (3x3)"]);
}

#[test]
fn test_double_transpose_restores_shape() {
    let (ty, diags) = type_of("m = ones(3, 7); t = (m')';", "t");

    assert!(diags.is_empty());
    assert_eq!(ty.and_then(Type::shape), Some(Shape::new(3, 7)));
}

#[test]
fn test_transposed_operands_combine() {
    let (ty, diags) = type_of("a = [1, 2, 3]; b = [4; 5; 6]; c = a + b';", "c");

    assert!(diags.is_empty());
    assert_eq!(ty, Some(Type::matrix(1, 3)));
}

#[test]
fn test_float_promotion_through_compound_chain() {
    let source = "x = 1; x += 2; x *= 0.5; x -= 1;";

    assert_eq!(type_of(source, "x"), (Some(Type::Float), vec![]));
}

#[test]
fn test_elementwise_keeps_matrix_shape() {
    let (ty, diags) = type_of("m = eye(4, 4); s = 2.0; r = s ./ m .- 1;", "r");

    assert!(diags.is_empty());
    assert_eq!(ty, Some(Type::matrix(4, 4)));
}

#[test]
fn test_elementwise_rejects_two_matrices() {
    let (ty, diags) = type_of("a = ones(2, 2); b = a .* a;", "b");

    assert_eq!(ty, None);
    assert_eq!(diags, vec!["Element-wise with not a int or float"]);
}

#[test]
fn test_matrix_plus_scalar_is_rejected() {
    let (ty, diags) = type_of("a = ones(2, 2); b = a + 1;", "b");

    assert_eq!(ty, None);
    assert_eq!(diags, vec!["Binary operations with numerical value and matrix"]);
}

#[test]
fn test_negated_matrix_literal() {
    let (ty, diags) = type_of("m = -[1.5, 2; 3, 4; 5, 6];", "m");

    assert!(diags.is_empty());
    assert_eq!(ty, Some(Type::matrix(3, 2)));
}
