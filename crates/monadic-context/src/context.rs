//! The immutable service store.
//!
//! A [`Context`] maps tag identities to type-erased service values. It is
//! never modified in place: [`Context::join`] and [`Context::extend`] build
//! a new context and leave their inputs untouched. Cloning a context is a
//! reference-count bump, so contexts can be handed to many computations and
//! threads freely.

use crate::algebra::RequiresContext;
use crate::error::{ContextError, ContextResult};
use crate::tag::{Tag, TagId};
use indexmap::IndexMap;
use rustc_hash::FxHasher;
use std::any::{type_name, Any};
use std::fmt;
use std::hash::BuildHasherDefault;
use std::sync::Arc;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// A stored service value together with the name of its type.
#[derive(Clone)]
pub struct Service {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Service {
    /// Wrap a value for storage.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Name of the stored value's type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the stored value as a `T`.
    ///
    /// `id` is only used to label the error.
    pub fn downcast_ref<T: 'static>(&self, id: &TagId) -> ContextResult<&T> {
        self.value
            .downcast_ref::<T>()
            .ok_or_else(|| ContextError::TypeMismatch {
                id: id.clone(),
                expected: type_name::<T>(),
                found: self.type_name,
            })
    }

    /// Clone the stored value out as a `T`.
    pub fn downcast<T: Clone + 'static>(&self, id: &TagId) -> ContextResult<T> {
        self.downcast_ref::<T>(id).cloned()
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// One `(tag, service)` pair with the service type erased.
///
/// Built with [`Tag::provide`] so that pairs of different service types can
/// go into a single [`from_pairs`] call.
#[derive(Clone, Debug)]
pub struct ServiceBinding {
    id: TagId,
    service: Service,
}

impl ServiceBinding {
    /// Pair a tag with its service.
    pub fn new<T: Send + Sync + 'static>(tag: &Tag<T>, service: T) -> Self {
        Self {
            id: tag.id().clone(),
            service: Service::new(service),
        }
    }

    /// The identity this binding fills.
    #[must_use]
    pub fn id(&self) -> &TagId {
        &self.id
    }
}

impl<T: Send + Sync + 'static> Tag<T> {
    /// Pair this tag with a service, for [`from_pairs`] and [`context!`](crate::context!).
    pub fn provide(&self, service: T) -> ServiceBinding {
        ServiceBinding::new(self, service)
    }
}

/// An immutable map from tag identity to service.
#[derive(Clone, Default)]
pub struct Context {
    entries: Arc<FxIndexMap<TagId, Service>>,
}

impl Context {
    /// A context with no services.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A context holding exactly one service.
    pub fn of<T: Send + Sync + 'static>(tag: &Tag<T>, service: T) -> Self {
        from_pairs([tag.provide(service)])
    }

    /// Union of `self` and `other`; `other` wins on identity collisions.
    #[must_use]
    pub fn join(&self, other: &Context) -> Context {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut entries = (*self.entries).clone();
        for (id, service) in other.entries.iter() {
            entries.insert(id.clone(), service.clone());
        }
        Self::from_entries(entries)
    }

    /// A copy of `self` with `service` added under `tag`, replacing any
    /// existing entry with the same identity.
    #[must_use]
    pub fn extend<T: Send + Sync + 'static>(&self, tag: &Tag<T>, service: T) -> Context {
        self.with_binding(tag.provide(service))
    }

    /// A copy of `self` with one more type-erased binding.
    #[must_use]
    pub fn with_binding(&self, binding: ServiceBinding) -> Context {
        let mut entries = (*self.entries).clone();
        entries.insert(binding.id, binding.service);
        Self::from_entries(entries)
    }

    /// Run a computation against this context.
    pub fn run<A: 'static>(&self, computation: &RequiresContext<A>) -> ContextResult<A> {
        computation.run(self)
    }

    /// Resolve the raw stored service for an identity.
    pub fn lookup(&self, id: &TagId) -> ContextResult<&Service> {
        match self.entries.get(id) {
            Some(service) => {
                tracing::trace!(service = %id, type_name = service.type_name, "resolved service");
                Ok(service)
            }
            None => {
                tracing::debug!(
                    service = %id,
                    available = self.entries.len(),
                    "service missing from context"
                );
                Err(ContextError::MissingService {
                    id: id.clone(),
                    available: self.ids().cloned().collect(),
                })
            }
        }
    }

    /// Resolve a service and clone it out.
    pub fn get<T: Clone + 'static>(&self, tag: &Tag<T>) -> ContextResult<T> {
        self.lookup(tag.id())?.downcast(tag.id())
    }

    /// Resolve a service by reference.
    pub fn get_ref<T: 'static>(&self, tag: &Tag<T>) -> ContextResult<&T> {
        self.lookup(tag.id())?.downcast_ref(tag.id())
    }

    /// Whether an entry exists for the tag's identity, regardless of type.
    #[must_use]
    pub fn contains<T>(&self, tag: &Tag<T>) -> bool {
        self.entries.contains_key(tag.id())
    }

    /// Identities in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &TagId> {
        self.entries.keys()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context holds no services.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn from_entries(entries: FxIndexMap<TagId, Service>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(id, s)| (id, s.type_name)))
            .finish()
    }
}

impl FromIterator<ServiceBinding> for Context {
    fn from_iter<I: IntoIterator<Item = ServiceBinding>>(iter: I) -> Self {
        from_pairs(iter)
    }
}

/// A context holding exactly one service. See [`Context::of`].
pub fn of<T: Send + Sync + 'static>(tag: &Tag<T>, service: T) -> Context {
    Context::of(tag, service)
}

/// Build a context from bindings, applied left to right; a later binding
/// replaces an earlier one with the same identity.
pub fn from_pairs<I>(pairs: I) -> Context
where
    I: IntoIterator<Item = ServiceBinding>,
{
    let mut entries: FxIndexMap<TagId, Service> = FxIndexMap::default();
    for binding in pairs {
        entries.insert(binding.id, binding.service);
    }
    Context::from_entries(entries)
}

/// Build a context from tag/service pairs of a single service type.
///
/// Entries are applied in the iteration order of `services`, which for hash
/// maps is unspecified. A map cannot hold the same tag twice, so the order
/// only matters if it contains distinct tags with equal identities.
pub fn from_dict<T, I>(services: I) -> Context
where
    T: Send + Sync + 'static,
    I: IntoIterator<Item = (Tag<T>, T)>,
{
    from_pairs(
        services
            .into_iter()
            .map(|(tag, service)| ServiceBinding::new(&tag, service)),
    )
}
