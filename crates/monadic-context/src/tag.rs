//! Typed service identities.
//!
//! A [`Tag<T>`] names one service slot in a [`Context`](crate::Context) and
//! remembers, at the type level only, that the slot holds a `T`. Equality
//! and hashing look at the identity string alone.
//!
//! Identities come from two places:
//!
//! - explicit strings ([`Tag::new`], [`Tag::from_static`]), for slots shared
//!   deterministically across modules. Equal strings alias the same slot.
//! - the process-wide [`TagRegistry`] ([`Tag::fresh`]), an atomic counter
//!   that starts at zero and is never reset, so every fresh tag is distinct
//!   from every other fresh tag for the life of the process.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The untyped identity of a service slot.
///
/// Cheap to clone: static identities are a borrowed `str`, generated and
/// runtime identities share one allocation.
#[derive(Clone)]
pub struct TagId(Repr);

#[derive(Clone)]
enum Repr {
    Static(&'static str),
    Shared(Arc<str>),
}

impl TagId {
    /// Create an identity from a string literal. Usable in `const` items.
    #[must_use]
    pub const fn from_static(id: &'static str) -> Self {
        Self(Repr::Static(id))
    }

    /// The identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match &self.0 {
            Repr::Static(s) => s,
            Repr::Shared(s) => s,
        }
    }
}

impl PartialEq for TagId {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TagId {}

impl PartialOrd for TagId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TagId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Hash for TagId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Borrow<str> for TagId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&'static str> for TagId {
    fn from(id: &'static str) -> Self {
        Self::from_static(id)
    }
}

impl From<String> for TagId {
    fn from(id: String) -> Self {
        Self(Repr::Shared(id.into()))
    }
}

impl From<Arc<str>> for TagId {
    fn from(id: Arc<str>) -> Self {
        Self(Repr::Shared(id))
    }
}

/// Issues unique identities for tags created without an explicit one.
///
/// The counter starts at zero, only moves forward, and is safe to advance
/// from any number of threads. Generated identities are the decimal
/// rendering of the counter value, so an explicit identity such as `"0"`
/// can alias a generated one; pick non-numeric explicit identities.
#[derive(Debug)]
pub struct TagRegistry {
    next: AtomicU64,
}

static GLOBAL_REGISTRY: TagRegistry = TagRegistry::new();

impl TagRegistry {
    /// Create a registry whose first identity is `"0"`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// The registry backing [`Tag::fresh`].
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL_REGISTRY
    }

    /// Draw the next identity.
    pub fn next_id(&self) -> TagId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        TagId::from(n.to_string())
    }

    /// Number of identities issued so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A typed identifier for a service of type `T`.
///
/// `T` has no runtime representation; it only constrains what can be stored
/// under and read back through this tag.
///
/// # Example
///
/// ```
/// use monadic_context::Tag;
///
/// const PORT: Tag<u16> = Tag::from_static("port");
/// let host: Tag<String> = Tag::new("host");
/// let scratch: Tag<Vec<u8>> = Tag::fresh();
///
/// assert_eq!(PORT.id().as_str(), "port");
/// assert_ne!(host.id(), scratch.id());
/// ```
pub struct Tag<T> {
    id: TagId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Tag<T> {
    /// Create a tag with an explicit identity.
    ///
    /// No uniqueness check is made: tags built from equal identities refer
    /// to the same slot.
    #[must_use]
    pub fn new(id: impl Into<TagId>) -> Self {
        Self {
            id: id.into(),
            _marker: PhantomData,
        }
    }

    /// Create a tag from a string literal, for `const` and `static` items.
    #[must_use]
    pub const fn from_static(id: &'static str) -> Self {
        Self {
            id: TagId::from_static(id),
            _marker: PhantomData,
        }
    }

    /// Create a tag with a fresh identity from [`TagRegistry::global`].
    #[must_use]
    pub fn fresh() -> Self {
        Self::in_registry(TagRegistry::global())
    }

    /// Create a tag with a fresh identity from a specific registry.
    #[must_use]
    pub fn in_registry(registry: &TagRegistry) -> Self {
        Self {
            id: registry.next_id(),
            _marker: PhantomData,
        }
    }

    /// The tag's identity.
    #[must_use]
    pub fn id(&self) -> &TagId {
        &self.id
    }
}

impl<T> Default for Tag<T> {
    fn default() -> Self {
        Self::fresh()
    }
}

impl<T> Clone for Tag<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Tag<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Tag<T> {}

impl<T> Hash for Tag<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Tag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("id", &self.id)
            .field("service", &std::any::type_name::<T>())
            .finish()
    }
}
