//! Monadic Context
//!
//! Reader-style dependency injection: functions declare the services they
//! need and are run later against an explicit, immutable [`Context`]. There
//! is no global service registry and no implicit lookup; the caller always
//! hands the context to [`Context::run`].
//!
//! # Overview
//!
//! - [`tag`] - [`Tag<T>`], a typed identity for one service slot
//! - [`context`] - [`Context`], the persistent tag-to-service store
//! - [`algebra`] - [`RequiresContext<A>`] and its combinators
//!   (`pure`, `ask`, `asks`, `map`, `bind`, `apply`, `then`, `traverse`,
//!   `with_service`)
//! - [`suspend`] - [`requires`] / [`use_service`], requesting services one
//!   at a time
//! - [`function`] - `identity`, `compose`, `pipe`
//!
//! A computation that references a service the context lacks fails with
//! [`ContextError::MissingService`], naming the identity and listing what
//! the context does provide.
//!
//! # Example
//!
//! ```
//! use monadic_context::{context, requires, uses, Tag};
//!
//! const PORT: Tag<u16> = Tag::from_static("port");
//! const HOST: Tag<String> = Tag::from_static("host");
//!
//! let build_url = requires(|()| uses! {
//!     let port = use PORT;
//!     let host = use HOST;
//!     format!("http://{host}:{port}")
//! });
//!
//! let ctx = context! { PORT => 8080, HOST => "localhost".to_string() };
//! assert_eq!(ctx.run(&build_url(())).unwrap(), "http://localhost:8080");
//!
//! let partial = context! { PORT => 8080 };
//! assert!(partial.run(&build_url(())).unwrap_err().is_missing_service());
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]

#[macro_use]
mod macros;

pub mod algebra;
pub mod context;
pub mod error;
pub mod function;
pub mod suspend;
pub mod tag;

// Re-export main types at crate level
pub use algebra::{ask, asks, pure, with_service, RequiresContext};
pub use context::{from_dict, from_pairs, of, Context, Service, ServiceBinding};
pub use error::{ContextError, ContextResult};
pub use function::{compose, identity, pipe};
pub use suspend::{requires, use_service, ServiceRequest, Suspended};
pub use tag::{Tag, TagId, TagRegistry};
