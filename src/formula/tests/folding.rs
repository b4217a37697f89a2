use super::{eval_with, parse, parse_unfolded};
use crate::formula::{Bindings, Expr};

#[test]
fn constant_only_formulas_fold_to_one_constant() {
    for source in ["1+2*3", "sin(3) + cos(7) * tri(9)", "srand(42) >> 3", "abs(-9) % 4"] {
        assert!(parse(source).is_constant(), "{source} did not fold");
    }
}

#[test]
fn folded_value_matches_unfolded_evaluation() {
    let sources = [
        "1+2*3",
        "2147483647 + 1",
        "-2147483648 / -1",
        "7 % -3",
        "1 << 31",
        "-1 >> 20",
        "5 / 0",
        "5 % 0",
        "sin(200) ^ cos(-3)",
        "tri(1000) & 254 | 3",
        "abs(-2147483648)",
        "srand(srand(1) + 2)",
        "sin(abs(-300) * 7 - tri(5 << 2))",
        "(12 ^ 10) - (12 | 10) * (12 & 10)",
    ];
    for source in sources {
        let folded = parse(source).constant_value().unwrap();
        let unfolded = parse_unfolded(source).evaluate(&Bindings::new(), 1)[0];
        assert_eq!(folded, unfolded, "{source}");
    }
}

#[test]
fn division_by_literal_zero_folds_to_zero() {
    assert_eq!(parse("5/0"), Expr::constant(0));
    assert_eq!(parse("5%0"), Expr::constant(0));
    assert_eq!(parse("x/0"), Expr::constant(0));
    assert_eq!(parse("0%x"), Expr::constant(0));
}

#[test]
fn division_by_zero_variable_is_all_zero() {
    let x = vec![1, -7, 2147483647, 0, -2147483648];
    let zeros = vec![0; 5];
    assert_eq!(eval_with("t / y", &[("t", x.clone()), ("y", zeros.clone())], 5), zeros);
    assert_eq!(eval_with("t % y", &[("t", x), ("y", zeros.clone())], 5), zeros);
}

#[test]
fn shift_wraparound() {
    assert_eq!(parse("1<<16"), parse("1<<0"));
    assert_eq!(parse("1<<16"), Expr::constant(1));
    assert_eq!(parse("1<<17"), parse("1<<1"));
    assert_eq!(parse("1<<17"), Expr::constant(2));
}

#[test]
fn identity_shift_returns_left_operand() {
    assert_eq!(parse("t << 32"), Expr::variable("t"));
    assert_eq!(parse("t >> (8 + 8)"), Expr::variable("t"));
    assert_eq!(parse("t >> 17").to_string(), "(t >> 17)");
}

#[test]
fn identities_remove_nodes() {
    assert_eq!(parse("0 + t"), Expr::variable("t"));
    assert_eq!(parse("t + (3 - 3)"), Expr::variable("t"));
    assert_eq!(parse("t - 0"), Expr::variable("t"));
    assert_eq!(parse("(t | 0) ^ 0"), Expr::variable("t"));
    assert_eq!(parse("t * (1 - 1)"), Expr::constant(0));
    assert_eq!(parse("x & 0 | y"), Expr::variable("y"));
    assert_eq!(parse("0 << t"), Expr::constant(0));
    assert_eq!(parse("0 - t").to_string(), "(0 - t)");
}

#[test]
fn folding_happens_below_variables() {
    assert_eq!(parse("t * (2 + 3)").to_string(), "(t * 5)");
    assert_eq!(parse("sin(t + 64 * 2)").to_string(), "sin((t + 128))");
}

#[test]
fn partially_constant_expression_is_not_reassociated() {
    assert_eq!(parse("t + 1 + 2").to_string(), "((t + 1) + 2)");
}

#[test]
fn rand_without_arguments_is_frozen() {
    let tree = parse("rand()");
    let value = tree.constant_value().unwrap();
    assert!((0..=255).contains(&value));
    let block = tree.evaluate(&Bindings::new(), 16);
    assert!(block.iter().all(|v| *v == value));
}

#[test]
fn unfolded_rand_stays_live() {
    let tree = parse_unfolded("rand()");
    assert_eq!(tree.to_string(), "rand()");
    let block = tree.evaluate(&Bindings::new(), 256);
    assert!(block.iter().all(|v| (0..=255).contains(v)));
}
