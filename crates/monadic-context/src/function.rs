//! Function composition helpers.
//!
//! Composition here runs left to right: `compose(f, g)` applies `f` first,
//! matching the order values flow through [`pipe`]. For more than two
//! functions use the [`compose!`](crate::compose!) and
//! [`pipe!`](crate::pipe!) macros.

/// Identity function.
#[inline]
pub fn identity<A>(x: A) -> A {
    x
}

/// Left-to-right composition: `compose(f, g)(x) == g(f(x))`.
#[inline]
pub fn compose<A, B, C, F, G>(f: F, g: G) -> impl Fn(A) -> C
where
    F: Fn(A) -> B,
    G: Fn(B) -> C,
{
    move |x| g(f(x))
}

/// Reverse application: `pipe(x, f) == f(x)`.
#[inline]
pub fn pipe<A, B, F>(x: A, f: F) -> B
where
    F: FnOnce(A) -> B,
{
    f(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        assert_eq!(identity(42), 42);
        assert_eq!(identity("hello"), "hello");
    }

    #[test]
    fn test_compose_left_to_right() {
        let add1 = |x: i32| x + 1;
        let mul2 = |x: i32| x * 2;
        assert_eq!(compose(add1, mul2)(3), 8); // (3 + 1) * 2
        assert_eq!(compose(mul2, add1)(3), 7); // 3 * 2 + 1
    }

    #[test]
    fn test_pipe() {
        assert_eq!(pipe(4, |x: i32| x * x), 16);
    }

    #[test]
    fn test_macros() {
        let add1 = |x: i32| x + 1;
        let mul2 = |x: i32| x * 2;
        let neg = |x: i32| -x;

        assert_eq!(crate::compose!()(5), 5);
        assert_eq!(crate::compose!(add1)(5), 6);
        assert_eq!(crate::compose!(add1, mul2, neg)(5), -12);
        assert_eq!(crate::pipe!(5), 5);
        assert_eq!(crate::pipe!(5, add1), 6);
        assert_eq!(crate::pipe!(5, add1, mul2, neg), -12);
    }
}
