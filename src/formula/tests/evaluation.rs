use std::sync::Barrier;

use super::{eval, eval_with, parse, parse_unfolded};
use crate::formula::{Bindings, Expr, VariableNamespace, seed_random};

#[test]
fn constant_broadcasts_to_block_length() {
    assert_eq!(eval("42", 5), vec![42; 5]);
    assert!(eval("42", 0).is_empty());
}

#[test]
fn variables_are_read_elementwise() {
    let t: Vec<i32> = (0..8).collect();
    assert_eq!(eval_with("t * 2 + x", &[("t", t), ("x", vec![1; 8])], 8), vec![1, 3, 5, 7, 9, 11, 13, 15]);
}

#[test]
fn overflow_wraps() {
    assert_eq!(eval_with("t + 1", &[("t", vec![i32::MAX])], 1), vec![i32::MIN]);
    assert_eq!(eval_with("t * t", &[("t", vec![65536])], 1), vec![0]);
    assert_eq!(eval_with("t - 1", &[("t", vec![i32::MIN])], 1), vec![i32::MAX]);
}

#[test]
fn zero_guard_only_hits_zero_divisors() {
    let y = vec![3, 0, -2, 0];
    assert_eq!(eval_with("12 / y", &[("y", y.clone())], 4), vec![4, 0, -6, 0]);
    assert_eq!(eval_with("13 % y", &[("y", y)], 4), vec![1, 0, 1, 0]);
}

#[test]
fn runtime_shift_amounts_wrap() {
    let amounts = vec![0, 1, 15, 16, 17, -1];
    assert_eq!(
        eval_with("1 << x", &[("x", amounts.clone())], 6),
        vec![1, 2, 32768, 1, 2, 32768]
    );
    assert_eq!(
        eval_with("-65536 >> x", &[("x", amounts)], 6),
        vec![-65536, -32768, -2, -65536, -32768, -2]
    );
}

#[test]
fn right_shift_keeps_sign() {
    assert_eq!(eval_with("t >> 4", &[("t", vec![-1, -16, -17, 16])], 4), vec![-1, -1, -2, 1]);
}

#[test]
fn evaluation_is_consistent_across_block_boundaries() {
    let tree = parse("(t * 5 & t >> 7) | (t * 3 & t >> 10) ^ srand(t >> 4) % 7");
    let namespace = VariableNamespace::standard();
    let t: Vec<i32> = (-512..512).collect();

    let mut whole = namespace.zeroed_bindings(t.len());
    whole.insert("t".to_owned(), t.clone());
    let expected = tree.evaluate(&whole, t.len());

    let mut stitched = Vec::new();
    for chunk in t.chunks(100) {
        let mut bindings: Bindings = namespace.zeroed_bindings(chunk.len());
        bindings.insert("t".to_owned(), chunk.to_vec());
        stitched.extend(tree.evaluate(&bindings, chunk.len()));
    }
    assert_eq!(stitched, expected);
}

#[test]
fn unused_bindings_are_ignored() {
    let mut bindings = VariableNamespace::standard().zeroed_bindings(3);
    bindings.insert("unused".to_owned(), vec![9; 3]);
    assert_eq!(parse("x + 1").evaluate(&bindings, 3), vec![1, 1, 1]);
}

#[test]
fn tree_is_shareable_across_threads() {
    let tree = parse("t * 3 ^ t >> 2");
    let handles: Vec<_> = (0..4)
        .map(|offset| {
            let tree = tree.clone();
            std::thread::spawn(move || {
                let mut bindings = VariableNamespace::standard().zeroed_bindings(4);
                bindings.insert("t".to_owned(), vec![offset; 4]);
                tree.evaluate(&bindings, 4)
            })
        })
        .collect();
    for (offset, handle) in handles.into_iter().enumerate() {
        let t = offset as i32;
        assert_eq!(handle.join().unwrap(), vec![t * 3 ^ t >> 2; 4]);
    }
}

fn random_blocks(tree: &Expr, seed: u64) -> Vec<Vec<i32>> {
    seed_random(seed);
    (0..8).map(|_| tree.evaluate(&Bindings::new(), 256)).collect()
}

#[test]
fn random_sources_are_independent_per_thread() {
    let tree = parse_unfolded("rand() ^ rand()");
    assert!(!tree.is_constant());
    let seeds = [1u64, 2, 3, 4, 5, 6];
    let expected: Vec<_> = seeds.iter().map(|&seed| random_blocks(&tree, seed)).collect();

    let barrier = Barrier::new(seeds.len());
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = seeds
            .iter()
            .map(|&seed| {
                let (tree, barrier) = (tree.clone(), &barrier);
                scope.spawn(move || {
                    barrier.wait();
                    random_blocks(&tree, seed)
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    for (blocks, expected) in results.iter().zip(&expected) {
        assert_eq!(blocks, expected);
        assert!(blocks.iter().flatten().all(|v| (0..=255).contains(v)));
    }
    assert_ne!(expected[0], expected[1]);
}
