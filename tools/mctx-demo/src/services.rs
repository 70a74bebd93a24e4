//! Service slots and the computations that consume them.

use crate::config::DemoConfig;
use monadic_context::{asks, from_pairs, uses, with_service, Context, RequiresContext, Tag};

/// URL scheme, e.g. `http`.
pub const SCHEME: Tag<String> = Tag::from_static("scheme");
/// Host name.
pub const HOST: Tag<String> = Tag::from_static("host");
/// TCP port.
pub const PORT: Tag<u16> = Tag::from_static("port");
/// Path appended to the URL; empty for none.
pub const PATH: Tag<String> = Tag::from_static("path");

/// Build a context from configuration, leaving out any identity in `skip`.
pub fn build_context(config: &DemoConfig, skip: &[String]) -> Context {
    let bindings = [
        SCHEME.provide(config.scheme.clone()),
        HOST.provide(config.host.clone()),
        PORT.provide(config.port),
        PATH.provide(config.path.clone().unwrap_or_default()),
    ];
    from_pairs(
        bindings
            .into_iter()
            .filter(|binding| !skip.iter().any(|id| id == binding.id().as_str())),
    )
}

/// `scheme://host:port`, requesting each service in turn.
pub fn base_url() -> RequiresContext<String> {
    RequiresContext::declare(|| uses! {
        let scheme = use SCHEME;
        let host = use HOST;
        let port = use PORT;
        format!("{scheme}://{host}:{port}")
    })
}

/// The full URL, with the configured path joined on.
pub fn full_url() -> RequiresContext<String> {
    let join = with_service(&PATH, |path: String, base: String| {
        if path.is_empty() {
            base
        } else {
            format!("{}/{}", base, path.trim_start_matches('/'))
        }
    });
    base_url().bind(join)
}

/// Whether the configured port is a privileged one.
pub fn privileged_port() -> RequiresContext<bool> {
    asks(&PORT, |port| port < 1024)
}
