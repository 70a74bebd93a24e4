//! Integration tests for tags and the context store.

use monadic_context::{ask, context, from_dict, from_pairs, of, Context, Tag, TagId, TagRegistry};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::thread;

#[test]
fn test_tag_creation_methods() {
    let tag1: Tag<i32> = Tag::new("tag1");
    let tag2: Tag<&'static str> = Tag::from_static("tag2");

    let ctx = of(&tag1, 42).extend(&tag2, "hello");
    assert_eq!(ctx.run(&ask(&tag1)), Ok(42));
    assert_eq!(ctx.run(&ask(&tag2)), Ok("hello"));
}

#[test]
fn test_context_creation_methods() {
    let tag1: Tag<i32> = Tag::new("tag1");
    let tag2: Tag<i32> = Tag::new("tag2");

    let by_dict = from_dict(BTreeMap::from([("tag1", 42), ("tag2", 24)]).into_iter().map(
        |(id, v)| (Tag::new(id), v),
    ));
    assert_eq!(by_dict.run(&ask(&tag1)), Ok(42));
    assert_eq!(by_dict.run(&ask(&tag2)), Ok(24));

    let by_pairs = from_pairs([tag1.provide(24), tag2.provide(42)]);
    assert_eq!(by_pairs.run(&ask(&tag1)), Ok(24));
    assert_eq!(by_pairs.run(&ask(&tag2)), Ok(42));

    let by_macro = context! { tag1 => 24, tag2 => 42 };
    assert_eq!(by_macro.run(&ask(&tag1)), by_pairs.run(&ask(&tag1)));
    assert_eq!(by_macro.run(&ask(&tag2)), by_pairs.run(&ask(&tag2)));
}

#[test]
fn test_context_extension() {
    let tag1: Tag<i32> = Tag::new("tag1");
    let tag2: Tag<String> = Tag::new("tag2");
    let tag3: Tag<bool> = Tag::new("tag3");

    let context1 = of(&tag1, 42);
    let context2 = of(&tag2, "hello".to_string());

    let joined = context1.join(&context2);
    assert_eq!(joined.run(&ask(&tag1)), Ok(42));
    assert_eq!(joined.run(&ask(&tag2)), Ok("hello".to_string()));

    let extended = context1.extend(&tag3, true);
    assert_eq!(extended.run(&ask(&tag1)), Ok(42));
    assert_eq!(extended.run(&ask(&tag3)), Ok(true));
    assert!(!context1.contains(&tag3));
}

#[test]
fn test_override_semantics() {
    let a: Tag<i32> = Tag::new("a");
    assert_eq!(of(&a, 1).join(&of(&a, 2)).get(&a), Ok(2));
    assert_eq!(of(&a, 1).extend(&a, 9).get(&a), Ok(9));
}

#[test]
fn test_empty_context_missing_service() {
    let tag: Tag<i32> = Tag::new("nothing-here");
    let err = Context::empty().run(&ask(&tag)).unwrap_err();
    assert!(err.is_missing_service());
    assert_eq!(err.missing_id(), Some(&TagId::from("nothing-here")));
    assert!(err.to_string().contains("available services: []"));
}

#[test]
fn test_trait_object_services() {
    trait Clock: Send + Sync {
        fn now(&self) -> u64;
    }
    struct Fixed(u64);
    impl Clock for Fixed {
        fn now(&self) -> u64 {
            self.0
        }
    }

    let clock: Tag<Arc<dyn Clock>> = Tag::new("clock");
    let ctx = of(&clock, Arc::new(Fixed(1_700_000_000)) as Arc<dyn Clock>);
    let now = ask(&clock).map(|c| c.now());
    assert_eq!(ctx.run(&now), Ok(1_700_000_000));
}

#[test]
fn test_fresh_tags_unique_across_threads() {
    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(|| (0..256).map(|_| Tag::<u8>::fresh().id().clone()).collect::<Vec<_>>()))
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "duplicate generated identity");
        }
    }
    assert_eq!(seen.len(), 8 * 256);
}

#[test]
fn test_registry_is_monotonic() {
    let registry = TagRegistry::new();
    let ids: Vec<u64> = (0..10)
        .map(|_| Tag::<()>::in_registry(&registry).id().as_str().parse().unwrap())
        .collect();
    assert_eq!(ids, (0..10).collect::<Vec<u64>>());
}

#[test]
fn test_context_shared_between_threads() {
    let n: Tag<u32> = Tag::new("n");
    let ctx = of(&n, 5);
    let doubled = ask(&n).map(|v| v * 2);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ctx = ctx.clone();
            let doubled = doubled.clone();
            thread::spawn(move || ctx.run(&doubled))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Ok(10));
    }
}
