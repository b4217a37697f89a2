use super::parse;
use crate::formula::{Expr, Expression};

fn assert_fully_folded(tree: &Expr) {
    match &**tree {
        Expression::Constant(_) | Expression::Variable(_) => (),
        Expression::Binary(op, lhs, rhs) => {
            assert!(
                !(lhs.is_constant() && rhs.is_constant()),
                "unfolded {lhs} {op} {rhs}"
            );
            assert_fully_folded(lhs);
            assert_fully_folded(rhs);
        }
        Expression::Call(call) => {
            assert!(!call.args.iter().all(|arg| arg.is_constant()), "unfolded {}", call.name);
            call.args.iter().for_each(assert_fully_folded);
        }
    }
}

#[test]
fn parsed_trees_are_fully_folded() {
    let sources = [
        "t",
        "42",
        "t * ((t >> 12 | t >> 8) & 63 & t >> 4)",
        "sin(t * (3 + 4)) + cos(T >> (1 + 1)) * (2 * 8)",
        "(t * 5 & t >> 7) | (t * 3 & t >> 10) ^ srand(w + 1 * 0)",
        "tri(x + y * (z - z)) % (rand() + 1)",
        "abs(sin(1) - t) / (0 + (2 << 1))",
        "((x ^ 0) | (y & 0)) - (z << 16)",
    ];
    for source in sources {
        let tree = parse(source);
        assert_fully_folded(&tree);
        assert!(tree.is_fully_folded(), "{source} -> {tree}");
    }
}

#[test]
fn variables_in_tree_belong_to_namespace() {
    let tree = parse("sin(T) + t * w - x / y % z");
    let names: Vec<_> = tree.variables().into_iter().collect();
    assert_eq!(names, vec!["T", "t", "w", "x", "y", "z"]);
}
