//! Per-type metadata cache.

use crate::{
    build::{BuildError, MetaBuilder},
    config::MappingConfig,
    model::{Interceptor, RecordMeta},
    traits::Record,
};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

///
/// RecordRegistry
///
/// Build-once cache of `RecordMeta` keyed by record type. Metadata is built
/// lazily on first use and then shared read-only.
///
/// Concurrent first use of the same type may build twice; the first insert
/// wins and every caller receives that same `Arc`.
///

#[derive(Default)]
pub struct RecordRegistry {
    config: MappingConfig,
    interceptors: HashMap<TypeId, Vec<Arc<dyn Interceptor>>>,
    metas: RwLock<HashMap<TypeId, Arc<RecordMeta>>>,
}

impl RecordRegistry {
    #[must_use]
    pub fn new(config: MappingConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Register an interceptor for `T`, applied when `T` is first built.
    #[must_use]
    pub fn with_interceptor<T: Record>(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors
            .entry(TypeId::of::<T>())
            .or_default()
            .push(interceptor);
        self
    }

    /// Cached metadata of `T`, building it on first use.
    pub fn get_or_build<T: Record>(&self) -> Result<Arc<RecordMeta>, BuildError> {
        if let Some(meta) = self.get::<T>() {
            tracing::trace!(entity = T::TYPE_NAME, "metadata cache hit");
            return Ok(meta);
        }

        let meta = Arc::new(self.builder::<T>().build::<T>()?);

        let mut metas = self.metas.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(metas.entry(TypeId::of::<T>()).or_insert(meta)))
    }

    #[must_use]
    pub fn get<T: Record>(&self) -> Option<Arc<RecordMeta>> {
        self.metas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .cloned()
    }

    /// Insert prebuilt metadata for `T`. An existing entry is kept and
    /// returned instead.
    pub fn register<T: Record>(&self, meta: RecordMeta) -> Arc<RecordMeta> {
        let mut metas = self.metas.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(metas.entry(TypeId::of::<T>()).or_insert_with(|| Arc::new(meta)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.metas.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn builder<T: Record>(&self) -> MetaBuilder<'_> {
        self.interceptors
            .get(&TypeId::of::<T>())
            .into_iter()
            .flatten()
            .fold(MetaBuilder::with_config(&self.config), |builder, i| {
                builder.interceptor(Arc::clone(i))
            })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{ConsistencyLevel, Event, InterceptError},
        test_fixtures::{Tweet, User},
        traits::DynRecord,
    };
    use std::thread;

    #[test]
    fn metadata_is_built_once_per_type() {
        let registry = RecordRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.get::<Tweet>().is_none());

        let first = registry.get_or_build::<Tweet>().expect("build");
        let second = registry.get_or_build::<Tweet>().expect("cached");
        assert!(Arc::ptr_eq(&first, &second));

        registry.get_or_build::<User>().expect("build");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn concurrent_first_use_resolves_to_one_meta() {
        let registry = RecordRegistry::default();

        let metas: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| registry.get_or_build::<Tweet>().expect("build")))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("thread"))
                .collect()
        });

        assert!(metas.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registered_metadata_is_kept() {
        let registry = RecordRegistry::default();
        let built = registry.get_or_build::<User>().expect("build");

        let other = MetaBuilder::new().build::<User>().expect("build");
        let kept = registry.register::<User>(other);
        assert!(Arc::ptr_eq(&built, &kept));
    }

    #[test]
    fn builds_with_the_registry_config() {
        let config =
            MappingConfig::from_toml_str("keyspace = \"app\"\n[consistency]\nwrite = \"ALL\"")
                .expect("config");
        let registry = RecordRegistry::new(config);

        let meta = registry.get_or_build::<User>().expect("build");
        assert_eq!(meta.config().qualified_table_name(), "app.users");
        assert_eq!(meta.config().write_consistency(), ConsistencyLevel::All);
        assert_eq!(registry.config().keyspace.as_deref(), Some("app"));
    }

    struct Noop;

    impl Interceptor for Noop {
        fn events(&self) -> &[Event] {
            &[Event::PostLoad]
        }

        fn on_event(&self, _: Event, _: &mut dyn DynRecord) -> Result<(), InterceptError> {
            Ok(())
        }
    }

    #[test]
    fn interceptors_apply_to_their_type_only() {
        let registry = RecordRegistry::default().with_interceptor::<User>(Arc::new(Noop));

        let users = registry.get_or_build::<User>().expect("build");
        let tweets = registry.get_or_build::<Tweet>().expect("build");

        assert!(users.interception().has(Event::PostLoad));
        assert!(!tweets.interception().has(Event::PostLoad));
    }
}
