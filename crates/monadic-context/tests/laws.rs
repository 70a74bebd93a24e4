//! Property tests for the combinator algebra
//!
//! These tests verify the functor, applicative and monad laws for
//! `RequiresContext`, observed by running both sides against one context.

use monadic_context::algebra::{apply, asks_with, bind, map, then, traverse};
use monadic_context::{ask, asks, compose, of, pipe, pure, with_service, Context, RequiresContext, Tag};
use proptest::prelude::*;

fn make_test_context(value: i64) -> (Context, Tag<i64>) {
    let tag = Tag::new("test");
    (of(&tag, value), tag)
}

// ============================================================
// Functor laws
// ============================================================

proptest! {
    #[test]
    fn map_identity(x in any::<i64>()) {
        let (ctx, tag) = make_test_context(x);
        let ma = ask(&tag);
        let mb = map(|a: i64| a)(ma.clone());
        prop_assert_eq!(ctx.run(&mb), ctx.run(&ma));
    }

    #[test]
    fn map_composition(x in any::<i64>()) {
        let (ctx, tag) = make_test_context(x);
        let f = |a: i64| a.wrapping_mul(2);
        let g = |a: i64| a.wrapping_add(1);
        let ma = ask(&tag);

        // fmap (g . f) == fmap g . fmap f
        let left = map(compose!(f, g))(ma.clone());
        let right = compose!(map(f), map(g))(ma);
        prop_assert_eq!(ctx.run(&left), ctx.run(&right));
    }
}

// ============================================================
// Monad laws
// ============================================================

proptest! {
    #[test]
    fn bind_left_identity(x in any::<i64>()) {
        let (ctx, tag) = make_test_context(x);
        let action = with_service(&tag, |a: i64, b: i64| a.wrapping_add(b));

        // return x >>= f == f x
        let left = pipe!(pure(x), bind(action.clone()));
        let right = action(x);
        prop_assert_eq!(ctx.run(&left), ctx.run(&right));
    }

    #[test]
    fn bind_right_identity(x in any::<i64>()) {
        let (ctx, tag) = make_test_context(x);
        let ma = ask(&tag);

        // m >>= return == m
        let left = pipe!(ma.clone(), bind(pure));
        prop_assert_eq!(ctx.run(&left), ctx.run(&ma));
    }

    #[test]
    fn bind_associativity(x in any::<i64>()) {
        let (ctx, tag) = make_test_context(x);
        let ma = ask(&tag);
        let f = with_service(&tag, |_: i64, a: i64| a.wrapping_mul(2));
        let g = with_service(&tag, |_: i64, a: i64| a.wrapping_add(3));

        // (m >>= f) >>= g == m >>= (\x -> f x >>= g)
        let left = pipe!(ma.clone(), bind(f.clone()), bind(g.clone()));
        let right = pipe!(ma, bind(move |a| pipe!(f(a), bind(g.clone()))));
        prop_assert_eq!(ctx.run(&left), ctx.run(&right));
    }
}

// ============================================================
// Applicative and traversal
// ============================================================

proptest! {
    #[test]
    fn apply_pure_function(x in any::<i64>()) {
        let (ctx, tag) = make_test_context(x);
        let f = |a: i64| a.wrapping_mul(2);

        let result = apply(ask(&tag))(pure(f));
        prop_assert_eq!(ctx.run(&result), Ok(f(x)));
    }

    #[test]
    fn then_keeps_second(x in any::<i64>(), y in any::<i64>()) {
        let (ctx, tag) = make_test_context(x);
        let result = then(pure(y))(ask(&tag));
        prop_assert_eq!(ctx.run(&result), Ok(y));
    }

    #[test]
    fn asks_is_map_of_ask(x in any::<i64>()) {
        let (ctx, tag) = make_test_context(x);
        let inc = |a: i64| a.wrapping_add(1);
        prop_assert_eq!(ctx.run(&asks(&tag, inc)), ctx.run(&ask(&tag).map(inc)));
    }

    #[test]
    fn asks_with_matches_asks(x in any::<i64>()) {
        let (ctx, tag) = make_test_context(x);
        let neg = |a: i64| a.wrapping_neg();
        let result = pipe!(neg, asks_with(&tag));
        prop_assert_eq!(ctx.run(&result), ctx.run(&asks(&tag, neg)));
    }

    #[test]
    fn traverse_scales_in_order(values in prop::collection::vec(any::<i64>(), 1..10)) {
        let first = values[0];
        let (ctx, tag) = make_test_context(first);
        let transform = with_service(&tag, |a: i64, b: i64| a.wrapping_mul(b));

        let result = traverse(transform)(values.clone());
        let expected: Vec<i64> = values.iter().map(|v| v.wrapping_mul(first)).collect();
        prop_assert_eq!(ctx.run(&result), Ok(expected));
    }

    #[test]
    fn with_service_supplies_first_argument(x in any::<i64>(), y in any::<i64>()) {
        let (ctx, tag) = make_test_context(x);
        let add = with_service(&tag, |a: i64, b: i64| a.wrapping_add(b));
        prop_assert_eq!(ctx.run(&add(y)), Ok(x.wrapping_add(y)));
    }

    #[test]
    fn sequence_matches_traverse(values in prop::collection::vec(any::<i64>(), 0..10)) {
        let (ctx, tag) = make_test_context(7);
        let per_item = {
            let tag = tag.clone();
            move |v: i64| asks(&tag, move |s: i64| s.wrapping_sub(v))
        };
        let sequenced = RequiresContext::sequence(values.iter().copied().map(per_item.clone()));
        let traversed = RequiresContext::traverse(values, per_item);
        prop_assert_eq!(ctx.run(&sequenced), ctx.run(&traversed));
    }
}

#[test]
fn traverse_scales_shared_service() {
    let (ctx, tag) = make_test_context(10);
    let result = traverse(move |x: i64| asks(&tag, move |s| s * x))(vec![1, 2, 3]);
    assert_eq!(ctx.run(&result), Ok(vec![10, 20, 30]));
}

#[test]
fn compose_and_pipe_identity() {
    assert_eq!(compose!()(5), 5);
    assert_eq!(pipe!(5), 5);
    assert_eq!(monadic_context::compose(|x: i32| x, |x: i32| x)(5), 5);
}
