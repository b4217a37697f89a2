use super::{eval, eval_with, parse_unfolded};

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(parse_unfolded("1+2*3").to_string(), "(1 + (2 * 3))");
    assert_eq!(eval("1+2*3", 1), vec![7]);
}

#[test]
fn shifts_bind_tightest() {
    assert_eq!(parse_unfolded("t*2<<3").to_string(), "(t * (2 << 3))");
    assert_eq!(parse_unfolded("t>>4+1").to_string(), "((t >> 4) + 1)");
}

#[test]
fn xor_binds_loosest() {
    assert_eq!(parse_unfolded("t^x&y").to_string(), "(t ^ (x & y))");
    assert_eq!(parse_unfolded("t&x^y|z").to_string(), "((t & x) ^ (y | z))");
}

#[test]
fn and_or_share_a_level() {
    assert_eq!(parse_unfolded("t|x&y").to_string(), "((t | x) & y)");
    assert_eq!(parse_unfolded("t&x|y").to_string(), "((t & x) | y)");
}

#[test]
fn operators_are_left_associative() {
    assert_eq!(parse_unfolded("t-x-y").to_string(), "((t - x) - y)");
    assert_eq!(parse_unfolded("t/x/y").to_string(), "((t / x) / y)");
    assert_eq!(parse_unfolded("t<<x>>y").to_string(), "((t << x) >> y)");
    assert_eq!(eval("100-10-1", 1), vec![89]);
    assert_eq!(eval("64/4/2", 1), vec![8]);
}

#[test]
fn parentheses_override_precedence() {
    assert_eq!(parse_unfolded("(1+2)*3").to_string(), "((1 + 2) * 3)");
    assert_eq!(eval("(1+2)*3", 1), vec![9]);
    assert_eq!(eval("((((((7))))))", 2), vec![7, 7]);
}

#[test]
fn negative_literals() {
    assert_eq!(eval("-5", 1), vec![-5]);
    assert_eq!(eval("3--2", 1), vec![5]);
    assert_eq!(eval("3 - 2", 1), vec![1]);
    assert_eq!(eval("3*-2", 1), vec![-6]);
}

#[test]
fn whitespace_and_comments_are_ignored() {
    let source = "
        // sawtooth
        t /* rising */ & 255
    ";
    let t: Vec<i32> = (250..260).collect();
    let expected: Vec<i32> = t.iter().map(|v| v & 255).collect();
    assert_eq!(eval_with(source, &[("t", t)], 10), expected);
    assert_eq!(eval("\t1\r\n+\n2", 1), vec![3]);
}

#[test]
fn classic_formula() {
    let t: Vec<i32> = (0..1024).collect();
    let expected: Vec<i32> = t.iter().map(|t| t * ((t >> 12 | t >> 8) & 63 & t >> 4)).collect();
    assert_eq!(
        eval_with("t * ((t >> 12 | t >> 8) & 63 & t >> 4)", &[("t", t)], 1024),
        expected
    );
}

#[test]
fn deep_nesting() {
    let depth = 200;
    let source = format!("{}t{}", "(".repeat(depth), "+1)".repeat(depth));
    assert_eq!(eval_with(&source, &[("t", vec![0, 10])], 2), vec![200, 210]);
}
