//! Context-requiring computations and their combinators.
//!
//! A [`RequiresContext<A>`] is a deferred function from [`Context`] to
//! `A`. Nothing is looked up until the computation is run, so a missing
//! service surfaces at the point it is referenced, not when the
//! computation is built.
//!
//! Each combinator comes in two shapes:
//!
//! - a method on [`RequiresContext`] taking the computation first
//!   (`ma.map(f)`, `ma.bind(f)`), convenient for chaining;
//! - a curried free function in this module taking the computation last
//!   (`map(f)(ma)`), convenient for building pipelines with
//!   [`pipe!`](crate::pipe!) and [`compose!`](crate::compose!).
//!
//! # Laws
//!
//! For any computation `ma` and context `c` satisfying it:
//!
//! - `ma.map(|x| x)` runs like `ma`
//! - `ma.map(f).map(g)` runs like `ma.map(|x| g(f(x)))`
//! - `pure(a).bind(f)` runs like `f(a)`
//! - `ma.bind(pure)` runs like `ma`
//! - `ma.bind(f).bind(g)` runs like `ma.bind(|x| f(x).bind(g))`
//!
//! # Example
//!
//! ```
//! use monadic_context::{ask, context, pipe, Tag};
//! use monadic_context::algebra::{bind, map};
//!
//! const RATE: Tag<u32> = Tag::from_static("rate");
//!
//! let cost = pipe!(
//!     ask(&RATE),
//!     map(|rate: u32| rate * 3),
//!     bind(|total: u32| monadic_context::pure(format!("{total} credits"))),
//! );
//!
//! let ctx = context! { RATE => 7 };
//! assert_eq!(ctx.run(&cost).unwrap(), "21 credits");
//! ```

use crate::context::Context;
use crate::error::ContextResult;
use crate::tag::Tag;
use std::fmt;
use std::sync::Arc;

type RunFn<A> = dyn Fn(&Context) -> ContextResult<A> + Send + Sync;

/// A computation that produces an `A` given a [`Context`].
///
/// Cloning shares the underlying function. Running never consumes the
/// computation, so one value can be run any number of times against any
/// number of contexts.
pub struct RequiresContext<A> {
    run_ctx: Arc<RunFn<A>>,
}

impl<A> Clone for RequiresContext<A> {
    fn clone(&self) -> Self {
        Self {
            run_ctx: Arc::clone(&self.run_ctx),
        }
    }
}

impl<A> fmt::Debug for RequiresContext<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequiresContext")
            .field("output", &std::any::type_name::<A>())
            .finish_non_exhaustive()
    }
}

impl<A: 'static> RequiresContext<A> {
    /// Wrap a function of the context.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Context) -> ContextResult<A> + Send + Sync + 'static,
    {
        Self {
            run_ctx: Arc::new(f),
        }
    }

    /// Run against a context. Same as [`Context::run`].
    pub fn run(&self, ctx: &Context) -> ContextResult<A> {
        (self.run_ctx)(ctx)
    }

    /// A computation that ignores the context and yields `a`.
    pub fn pure(a: A) -> Self
    where
        A: Clone + Send + Sync,
    {
        Self::new(move |_| Ok(a.clone()))
    }

    /// Apply `f` to the result.
    pub fn map<B, F>(self, f: F) -> RequiresContext<B>
    where
        B: 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        RequiresContext::new(move |ctx| self.run(ctx).map(&f))
    }

    /// Feed the result to `f` and run the computation it returns against the
    /// same context.
    pub fn bind<B, F>(self, f: F) -> RequiresContext<B>
    where
        B: 'static,
        F: Fn(A) -> RequiresContext<B> + Send + Sync + 'static,
    {
        RequiresContext::new(move |ctx| {
            let a = self.run(ctx)?;
            f(a).run(ctx)
        })
    }

    /// Alias for [`RequiresContext::bind`].
    pub fn and_then<B, F>(self, f: F) -> RequiresContext<B>
    where
        B: 'static,
        F: Fn(A) -> RequiresContext<B> + Send + Sync + 'static,
    {
        self.bind(f)
    }

    /// Run `self` and then `next`, keeping only `next`'s result.
    pub fn then<B: 'static>(self, next: RequiresContext<B>) -> RequiresContext<B> {
        next.map(|b| move |_: A| b).apply(self)
    }

    /// Run `self` and `other` in that order and combine their results.
    pub fn map2<B, C, F>(self, other: RequiresContext<B>, f: F) -> RequiresContext<C>
    where
        B: 'static,
        C: 'static,
        F: Fn(A, B) -> C + Send + Sync + 'static,
    {
        RequiresContext::new(move |ctx| {
            let a = self.run(ctx)?;
            let b = other.run(ctx)?;
            Ok(f(a, b))
        })
    }

    /// Run `self` and `other` in that order and pair their results.
    pub fn zip<B: 'static>(self, other: RequiresContext<B>) -> RequiresContext<(A, B)> {
        self.map2(other, |a, b| (a, b))
    }

    /// Run against a context derived from the one supplied.
    pub fn local<F>(self, f: F) -> Self
    where
        F: Fn(&Context) -> Context + Send + Sync + 'static,
    {
        Self::new(move |ctx| self.run(&f(ctx)))
    }

    /// Run with `service` supplied under `tag`, on top of whatever the
    /// caller's context holds.
    pub fn provide<T>(self, tag: &Tag<T>, service: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        let tag = tag.clone();
        self.local(move |ctx| ctx.extend(&tag, service.clone()))
    }

    /// Apply `f` to each element in order, running each resulting
    /// computation against the shared context. Stops at the first failure.
    pub fn traverse<X, F>(xs: impl IntoIterator<Item = X>, f: F) -> RequiresContext<Vec<A>>
    where
        X: Clone + Send + Sync + 'static,
        F: Fn(X) -> RequiresContext<A> + Send + Sync + 'static,
    {
        let xs: Vec<X> = xs.into_iter().collect();
        RequiresContext::new(move |ctx| {
            xs.iter()
                .cloned()
                .map(|x| f(x).run(ctx))
                .collect::<ContextResult<Vec<A>>>()
        })
    }

    /// Run each computation in order and collect the results.
    pub fn sequence(ms: impl IntoIterator<Item = RequiresContext<A>>) -> RequiresContext<Vec<A>> {
        let ms: Vec<RequiresContext<A>> = ms.into_iter().collect();
        RequiresContext::new(move |ctx| ms.iter().map(|m| m.run(ctx)).collect())
    }
}

impl<F: 'static> RequiresContext<F> {
    /// Run `ma`, then `self`, and apply the function `self` produced to the
    /// value `ma` produced. Each runs exactly once per run of the result.
    pub fn apply<A, B>(self, ma: RequiresContext<A>) -> RequiresContext<B>
    where
        A: 'static,
        B: 'static,
        F: FnOnce(A) -> B,
    {
        RequiresContext::new(move |ctx| {
            let a = ma.run(ctx)?;
            let f = self.run(ctx)?;
            Ok(f(a))
        })
    }
}

/// A computation that ignores the context and yields `a`.
pub fn pure<A>(a: A) -> RequiresContext<A>
where
    A: Clone + Send + Sync + 'static,
{
    RequiresContext::pure(a)
}

/// A computation that resolves `tag` and yields the service.
pub fn ask<T>(tag: &Tag<T>) -> RequiresContext<T>
where
    T: Clone + 'static,
{
    let tag = tag.clone();
    RequiresContext::new(move |ctx| ctx.get(&tag))
}

/// Resolve `tag` and transform the service with `f`.
pub fn asks<T, A, F>(tag: &Tag<T>, f: F) -> RequiresContext<A>
where
    T: Clone + 'static,
    A: 'static,
    F: Fn(T) -> A + Send + Sync + 'static,
{
    ask(tag).map(f)
}

/// Curried [`asks`]: `asks_with(&tag)(f)` is `asks(&tag, f)`.
///
/// The returned function is fixed to one transformer type, so each
/// closure passed to it needs its own `asks_with` call.
pub fn asks_with<T, A, F>(tag: &Tag<T>) -> impl Fn(F) -> RequiresContext<A> + Clone + Send + Sync
where
    T: Clone + 'static,
    A: 'static,
    F: Fn(T) -> A + Send + Sync + 'static,
{
    let tag = tag.clone();
    move |f| asks(&tag, f)
}

/// Curried [`RequiresContext::map`].
pub fn map<A, B, F>(f: F) -> impl Fn(RequiresContext<A>) -> RequiresContext<B> + Clone + Send + Sync
where
    A: 'static,
    B: 'static,
    F: Fn(A) -> B + Send + Sync + 'static,
{
    let f = Arc::new(f);
    move |ma| {
        let f = Arc::clone(&f);
        ma.map(move |a| f(a))
    }
}

/// Curried [`RequiresContext::bind`].
pub fn bind<A, B, F>(
    f: F,
) -> impl Fn(RequiresContext<A>) -> RequiresContext<B> + Clone + Send + Sync
where
    A: 'static,
    B: 'static,
    F: Fn(A) -> RequiresContext<B> + Send + Sync + 'static,
{
    let f = Arc::new(f);
    move |ma| {
        let f = Arc::clone(&f);
        ma.bind(move |a| f(a))
    }
}

/// Curried [`RequiresContext::apply`]: `apply(ma)(mab)` is `mab.apply(ma)`.
pub fn apply<A, B, F>(
    ma: RequiresContext<A>,
) -> impl Fn(RequiresContext<F>) -> RequiresContext<B> + Clone + Send + Sync
where
    A: 'static,
    B: 'static,
    F: FnOnce(A) -> B + 'static,
{
    move |mab| mab.apply(ma.clone())
}

/// Curried [`RequiresContext::then`]: `then(next)(ma)` runs `ma`, then
/// `next`, and yields `next`'s result.
pub fn then<A, B>(
    next: RequiresContext<B>,
) -> impl Fn(RequiresContext<A>) -> RequiresContext<B> + Clone + Send + Sync
where
    A: 'static,
    B: 'static,
{
    move |ma| ma.then(next.clone())
}

/// Curried [`RequiresContext::traverse`].
pub fn traverse<X, A, F>(f: F) -> impl Fn(Vec<X>) -> RequiresContext<Vec<A>> + Clone + Send + Sync
where
    X: Clone + Send + Sync + 'static,
    A: 'static,
    F: Fn(X) -> RequiresContext<A> + Send + Sync + 'static,
{
    let f = Arc::new(f);
    move |xs| {
        let f = Arc::clone(&f);
        RequiresContext::traverse(xs, move |x| f(x))
    }
}

/// Run each computation in order and collect the results.
pub fn sequence<A: 'static>(ms: Vec<RequiresContext<A>>) -> RequiresContext<Vec<A>> {
    RequiresContext::sequence(ms)
}

/// Curried [`RequiresContext::local`].
pub fn local<A, F>(f: F) -> impl Fn(RequiresContext<A>) -> RequiresContext<A> + Clone + Send + Sync
where
    A: 'static,
    F: Fn(&Context) -> Context + Send + Sync + 'static,
{
    let f = Arc::new(f);
    move |ma| {
        let f = Arc::clone(&f);
        ma.local(move |ctx| f(ctx))
    }
}

/// Lift a function whose first parameter is a service so that the service
/// is resolved from the context through `tag` at run time.
///
/// The remaining arguments are supplied when the returned function is
/// called; pass a tuple for more than one.
///
/// ```
/// use monadic_context::{with_service, Context, Tag};
///
/// const GREETING: Tag<String> = Tag::from_static("greeting");
///
/// let greet = with_service(&GREETING, |greeting: String, name: &'static str| {
///     format!("{greeting}, {name}!")
/// });
///
/// let ctx = Context::of(&GREETING, "Hello".to_string());
/// assert_eq!(ctx.run(&greet("world")).unwrap(), "Hello, world!");
/// ```
pub fn with_service<T, Args, A, F>(
    tag: &Tag<T>, f: F,
) -> impl Fn(Args) -> RequiresContext<A> + Clone + Send + Sync
where
    T: Clone + 'static,
    Args: Clone + Send + Sync + 'static,
    A: 'static,
    F: Fn(T, Args) -> A + Send + Sync + 'static,
{
    let tag = tag.clone();
    let f = Arc::new(f);
    move |args| {
        let tag = tag.clone();
        let f = Arc::clone(&f);
        RequiresContext::new(move |ctx| {
            let service = ctx.get(&tag)?;
            Ok(f(service, args.clone()))
        })
    }
}
