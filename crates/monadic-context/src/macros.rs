//! Syntax helpers for building contexts and pipelines.

/// Compose functions left to right.
///
/// `compose!()` is the identity function and `compose!(f, g, h)` is
/// `|x| h(g(f(x)))`.
///
/// ```
/// use monadic_context::compose;
///
/// let f = compose!(|x: i32| x + 1, |x: i32| x * 10);
/// assert_eq!(f(2), 30);
/// assert_eq!(compose!()(7), 7);
/// ```
#[macro_export]
macro_rules! compose {
    () => {
        $crate::function::identity
    };
    ($f:expr $(,)?) => {
        $crate::function::compose($f, $crate::function::identity)
    };
    ($f:expr, $($rest:expr),+ $(,)?) => {
        $crate::function::compose($f, $crate::compose!($($rest),+))
    };
}

/// Thread a value through functions left to right.
///
/// `pipe!(x)` is `x` and `pipe!(x, f, g)` is `g(f(x))`.
///
/// ```
/// use monadic_context::pipe;
///
/// assert_eq!(pipe!(3, |x| x + 1, |x| x * 10), 40);
/// assert_eq!(pipe!("unchanged"), "unchanged");
/// ```
#[macro_export]
macro_rules! pipe {
    ($value:expr $(,)?) => {
        $value
    };
    ($value:expr, $f:expr $(, $rest:expr)* $(,)?) => {
        $crate::pipe!($crate::function::pipe($value, $f) $(, $rest)*)
    };
}

/// Build a [`Context`](crate::Context) from `tag => service` pairs.
///
/// Pairs are applied in order, so a repeated identity keeps its last
/// service.
///
/// ```
/// use monadic_context::{context, Tag};
///
/// const PORT: Tag<u16> = Tag::from_static("port");
/// const HOST: Tag<&str> = Tag::from_static("host");
///
/// let ctx = context! { PORT => 8080, HOST => "localhost" };
/// assert_eq!(ctx.get(&PORT).unwrap(), 8080);
/// assert!(context! {}.is_empty());
/// ```
#[macro_export]
macro_rules! context {
    () => {
        $crate::Context::empty()
    };
    ($($tag:expr => $service:expr),+ $(,)?) => {
        $crate::from_pairs([$(($tag).provide($service)),+])
    };
}

/// Write a chain of service requests in linear style.
///
/// Each `let name = use TAG;` suspends until `TAG` is resolved and binds
/// the service to `name`. Plain `let` bindings are evaluated in place. The
/// final expression is the result. The expansion is a
/// [`Suspended`](crate::Suspended), ready for [`requires`](crate::requires)
/// or [`RequiresContext::declare`](crate::RequiresContext::declare).
///
/// Later steps run inside `move` continuations, so non-`const` tags used
/// after the first request should be cloned into a plain `let` first.
///
/// ```
/// use monadic_context::{context, uses, RequiresContext, Tag};
///
/// const PORT: Tag<u16> = Tag::from_static("port");
/// const HOST: Tag<String> = Tag::from_static("host");
///
/// let url = RequiresContext::declare(|| uses! {
///     let port = use PORT;
///     let host = use HOST;
///     let scheme = "http";
///     format!("{scheme}://{host}:{port}")
/// });
///
/// let ctx = context! { PORT => 8080, HOST => "localhost".to_string() };
/// assert_eq!(ctx.run(&url).unwrap(), "http://localhost:8080");
/// ```
#[macro_export]
macro_rules! uses {
    (let $name:ident = use $tag:expr; $($rest:tt)+) => {
        $crate::use_service(&$tag).and_then(move |$name| $crate::uses!($($rest)+))
    };
    (let $name:pat = $value:expr; $($rest:tt)+) => {{
        let $name = $value;
        $crate::uses!($($rest)+)
    }};
    ($result:expr $(;)?) => {
        $crate::Suspended::done($result)
    };
}
