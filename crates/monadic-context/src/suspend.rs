//! Declaring services one request at a time.
//!
//! A [`Suspended<A>`] is a computation that is either finished
//! ([`Suspended::Done`]) or waiting on one service
//! ([`Suspended::Request`]). A request carries the identity it needs and a
//! continuation that accepts the resolved service and returns the next
//! step. [`use_service`] is the single-step request; [`Suspended::and_then`]
//! chains requests; [`requires`] turns a function producing a
//! `Suspended<A>` into a [`RequiresContext`] driven by a trampoline:
//!
//! 1. call the function to get the first step,
//! 2. on `Request`, resolve its identity in the context (failing with
//!    [`ContextError::MissingService`](crate::ContextError::MissingService)
//!    if absent) and resume the continuation with the service,
//! 3. on `Done`, yield the value.
//!
//! Steps are resolved strictly in the order they are requested. Nothing is
//! cached between requests and each run starts a fresh step sequence.
//!
//! The [`uses!`](crate::uses!) macro writes these chains in a linear style.
//!
//! # Example
//!
//! ```
//! use monadic_context::{context, requires, use_service, Tag};
//!
//! const PORT: Tag<u16> = Tag::from_static("port");
//! const HOST: Tag<String> = Tag::from_static("host");
//!
//! let build_url = requires(|scheme: &'static str| {
//!     use_service(&PORT).and_then(move |port| {
//!         use_service(&HOST).map(move |host| format!("{scheme}://{host}:{port}"))
//!     })
//! });
//!
//! let ctx = context! { PORT => 8080, HOST => "localhost".to_string() };
//! assert_eq!(ctx.run(&build_url("http")).unwrap(), "http://localhost:8080");
//! ```

use crate::algebra::RequiresContext;
use crate::context::{Context, Service};
use crate::error::ContextResult;
use crate::tag::{Tag, TagId};
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type Erased = Box<dyn Any>;
type Fetch = Box<dyn FnOnce(&Service) -> ContextResult<Erased>>;
type Continuation = Box<dyn FnOnce(Erased) -> Suspended<Erased>>;

/// One step of a computation that requests services as it goes.
pub enum Suspended<A> {
    /// The computation has produced its result.
    Done(A),
    /// The computation needs a service before it can continue.
    Request(ServiceRequest<A>),
}

/// The request a chain is blocked on.
struct Pending {
    id: TagId,
    expected: &'static str,
    fetch: Fetch,
}

/// A pending service request and the continuations waiting on it.
///
/// Continuations are queued in the order they run. Chaining onto a
/// request appends to the queue instead of wrapping the previous
/// continuation, so neither building nor resuming a chain recurses.
pub struct ServiceRequest<A> {
    pending: Pending,
    continuations: VecDeque<Continuation>,
    _output: PhantomData<fn() -> A>,
}

enum Progress {
    Finished(Erased),
    Blocked(Pending),
}

fn unerase<A: 'static>(value: Erased) -> A {
    match value.downcast::<A>() {
        Ok(a) => *a,
        Err(_) => unreachable!("continuation resumed with a value of another type"),
    }
}

/// Feed `value` through `queue` until it is empty or a continuation
/// requests another service. The new request's own continuations are
/// moved to the front of `queue`.
fn advance(mut value: Erased, queue: &mut VecDeque<Continuation>) -> Progress {
    while let Some(next) = queue.pop_front() {
        match next(value) {
            Suspended::Done(v) => value = v,
            Suspended::Request(req) => {
                let ServiceRequest {
                    pending,
                    continuations,
                    ..
                } = req;
                for k in continuations.into_iter().rev() {
                    queue.push_front(k);
                }
                return Progress::Blocked(pending);
            }
        }
    }
    Progress::Finished(value)
}

impl<A> ServiceRequest<A> {
    /// The identity being requested.
    #[must_use]
    pub fn id(&self) -> &TagId {
        &self.pending.id
    }

    /// Type name of the requested service.
    #[must_use]
    pub fn expected(&self) -> &'static str {
        self.pending.expected
    }

    fn retype<B>(self) -> ServiceRequest<B> {
        ServiceRequest {
            pending: self.pending,
            continuations: self.continuations,
            _output: PhantomData,
        }
    }
}

impl<A: 'static> ServiceRequest<A> {
    /// Continue with the resolved service, up to the next request.
    pub fn resume(self, service: &Service) -> ContextResult<Suspended<A>> {
        let ServiceRequest {
            pending,
            mut continuations,
            ..
        } = self;
        let value = (pending.fetch)(service)?;
        Ok(match advance(value, &mut continuations) {
            Progress::Finished(value) => Suspended::Done(unerase(value)),
            Progress::Blocked(pending) => Suspended::Request(ServiceRequest {
                pending,
                continuations,
                _output: PhantomData,
            }),
        })
    }
}

impl<A> fmt::Debug for ServiceRequest<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRequest")
            .field("id", &self.pending.id)
            .field("expected", &self.pending.expected)
            .field("continuations", &self.continuations.len())
            .finish()
    }
}

impl<A: fmt::Debug> fmt::Debug for Suspended<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done(a) => f.debug_tuple("Done").field(a).finish(),
            Self::Request(req) => f.debug_tuple("Request").field(req).finish(),
        }
    }
}

impl<A: 'static> Suspended<A> {
    /// A finished step.
    pub fn done(a: A) -> Self {
        Self::Done(a)
    }

    /// Whether this step has finished.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    fn erase(self) -> Suspended<Erased> {
        match self {
            Self::Done(a) => Suspended::Done(Box::new(a) as Erased),
            Self::Request(req) => Suspended::Request(req.retype()),
        }
    }

    /// Continue with `f` once this step has produced its value.
    ///
    /// On a pending request this only queues `f`; it runs when the driver
    /// reaches it.
    pub fn and_then<B, F>(self, f: F) -> Suspended<B>
    where
        B: 'static,
        F: FnOnce(A) -> Suspended<B> + 'static,
    {
        match self {
            Self::Done(a) => f(a),
            Self::Request(mut req) => {
                req.continuations
                    .push_back(Box::new(move |value: Erased| f(unerase(value)).erase()));
                Suspended::Request(req.retype())
            }
        }
    }

    /// Transform the eventual value.
    pub fn map<B, F>(self, f: F) -> Suspended<B>
    where
        B: 'static,
        F: FnOnce(A) -> B + 'static,
    {
        self.and_then(move |a| Suspended::Done(f(a)))
    }

    /// Drive the steps to completion against `ctx`.
    pub fn drive(self, ctx: &Context) -> ContextResult<A> {
        let ServiceRequest {
            mut pending,
            mut continuations,
            ..
        } = match self {
            Self::Done(a) => return Ok(a),
            Self::Request(req) => req,
        };
        let mut resolved = 0usize;
        loop {
            tracing::trace!(service = %pending.id, expected = pending.expected, "suspended on service");
            let service = ctx.lookup(&pending.id)?;
            let value = (pending.fetch)(service)?;
            resolved += 1;
            match advance(value, &mut continuations) {
                Progress::Finished(value) => {
                    tracing::trace!(resolved, "service requests complete");
                    return Ok(unerase(value));
                }
                Progress::Blocked(next) => pending = next,
            }
        }
    }
}

/// Suspend until the service behind `tag` is available, then yield it.
pub fn use_service<T>(tag: &Tag<T>) -> Suspended<T>
where
    T: Clone + 'static,
{
    let id = tag.id().clone();
    let label = id.clone();
    Suspended::Request(ServiceRequest {
        pending: Pending {
            id,
            expected: std::any::type_name::<T>(),
            fetch: Box::new(move |service: &Service| {
                service.downcast::<T>(&label).map(|v| Box::new(v) as Erased)
            }),
        },
        continuations: VecDeque::new(),
        _output: PhantomData,
    })
}

/// Turn a step-producing function into a function producing
/// context-requiring computations.
///
/// `f` is called afresh, with a clone of the arguments, every time the
/// returned computation runs. Use a tuple for several arguments and `()`
/// for none (or [`RequiresContext::declare`]).
pub fn requires<Args, A, F>(f: F) -> impl Fn(Args) -> RequiresContext<A> + Clone + Send + Sync
where
    Args: Clone + Send + Sync + 'static,
    A: 'static,
    F: Fn(Args) -> Suspended<A> + Send + Sync + 'static,
{
    let f = Arc::new(f);
    move |args| {
        let f = Arc::clone(&f);
        RequiresContext::new(move |ctx| f(args.clone()).drive(ctx))
    }
}

impl<A: 'static> RequiresContext<A> {
    /// A computation driven from a nullary step-producing function.
    pub fn declare<F>(f: F) -> Self
    where
        F: Fn() -> Suspended<A> + Send + Sync + 'static,
    {
        Self::new(move |ctx| f().drive(ctx))
    }
}
