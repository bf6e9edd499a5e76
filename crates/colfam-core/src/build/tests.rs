use super::*;
use crate::{
    config::MappingConfig,
    model::{ClusteringOrder, ConsistencyLevel, InsertStrategy, InterceptError},
    test_fixtures::{self, ClickCounter, ClickKey, Tweet, TweetKey, User},
    traits::{DynRecord, FieldValue},
    types::Counter,
};
use std::collections::BTreeSet;

fn page_key() -> RecordDescriptor {
    RecordDescriptor::new("PageKey", ClickKey::instantiate)
        .field(FieldDescriptor::new("page", FieldRole::Partition, String::shape()))
}

fn page_key_descriptor() -> KeyDescriptor {
    KeyDescriptor {
        type_name: "PageKey",
        descriptor: page_key,
        instantiate: ClickKey::instantiate,
    }
}

fn embedded_page_key(field: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        key: Some(page_key_descriptor()),
        ..FieldDescriptor::embedded_id::<ClickKey>(field)
    }
}

fn counter(field: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(field, FieldRole::Column, Counter::shape())
}

#[test]
fn compound_key_is_split_into_segments() {
    let meta = test_fixtures::tweet_meta();
    let id = meta.id_meta();
    let props = id.compound_key().expect("compound key");

    assert_eq!(id.kind(), ColumnKind::EmbeddedKey);
    assert_eq!(props.key_type_name(), "TweetKey");
    assert_eq!(props.partition().component_names(), vec!["user_id"]);
    assert_eq!(props.clustering().component_names(), vec!["name"]);
    assert_eq!(props.all_component_names(), vec!["user_id", "name"]);
    assert_eq!(
        props.clustering().iter().map(|c| c.structure().order()).collect::<Vec<_>>(),
        vec![ClusteringOrder::Desc]
    );
    assert!(props.all_components().all(|c| {
        c.kind() == ColumnKind::CompoundKeyComponent && c.owning_type_name() == "TweetKey"
    }));
}

#[test]
fn table_identity_and_defaults() {
    let meta = test_fixtures::tweet_meta();
    let config = meta.config();

    assert_eq!(config.table_name(), "tweet");
    assert_eq!(config.keyspace(), None);
    assert_eq!(config.comment(), "Create table for entity \"Tweet\"");
    assert_eq!(config.read_consistency(), ConsistencyLevel::One);
    assert_eq!(config.insert_strategy(), InsertStrategy::AllFields);
    assert!(!config.schema_update());
}

#[test]
fn table_name_defaults_to_lowercased_type_name() {
    let desc = RecordDescriptor {
        table: None,
        ..User::descriptor()
    };
    let meta = MetaBuilder::new().build_descriptor(desc).expect("build");
    assert_eq!(meta.config().table_name(), "user");
}

#[test]
fn column_names_fold_to_lowercase_on_the_wire() {
    let meta = test_fixtures::tweet_meta();
    let author = meta.column("author").expect("author");

    assert_eq!(author.column_name(), "authorName");
    assert_eq!(author.wire_column_name(), "authorname");
    assert!(author.structure().is_static());
    assert_eq!(meta.column("authorname").map(ColumnMeta::field_name), Some("author"));
}

#[test]
fn columns_keep_declaration_order() {
    let meta = test_fixtures::tweet_meta();
    let names: Vec<_> = meta.columns().keys().copied().collect();
    assert_eq!(names, vec!["content", "tags", "names", "author", "prefs"]);
}

#[test]
fn clustered_counter_is_detected_structurally() {
    assert!(test_fixtures::click_counter_meta().structure().is_clustered_counter());
    assert!(!test_fixtures::tweet_meta().structure().is_clustered_counter());
    assert!(!test_fixtures::user_meta().structure().is_clustered_counter());

    let two_counters = RecordDescriptor::new("Clicks", ClickCounter::instantiate)
        .field(FieldDescriptor::embedded_id::<ClickKey>("id"))
        .field(counter("clicks"))
        .field(counter("views"));
    let meta = MetaBuilder::new().build_descriptor(two_counters).expect("build");
    assert!(meta.structure().is_counter_table());
    assert!(!meta.structure().is_clustered_counter());

    let unclustered = RecordDescriptor::new("Clicks", ClickCounter::instantiate)
        .field(embedded_page_key("id"))
        .field(counter("clicks"));
    let meta = MetaBuilder::new().build_descriptor(unclustered).expect("build");
    assert!(!meta.structure().is_clustered());
    assert!(!meta.structure().is_clustered_counter());
}

#[test]
fn counters_and_regular_columns_cannot_share_an_entity() {
    let mixed = RecordDescriptor::new("Clicks", ClickCounter::instantiate)
        .field(FieldDescriptor::embedded_id::<ClickKey>("id"))
        .field(FieldDescriptor::new("label", FieldRole::Column, String::shape()))
        .field(counter("clicks"));
    let err = MetaBuilder::new().build_descriptor(mixed).unwrap_err();

    assert_eq!(
        err,
        BuildError::MixedCounterColumns {
            type_name: "Clicks",
            field: "clicks",
        }
    );
    assert_eq!(
        err.to_string(),
        "counter column 'clicks' of entity 'Clicks' requires every non-key column to be a counter"
    );

    let simple_id = User::descriptor().field(counter("visits"));
    assert!(matches!(
        MetaBuilder::new().build_descriptor(simple_id),
        Err(BuildError::MixedCounterColumns { field: "visits", .. })
    ));
}

#[test]
fn cached_views_split_counters() {
    let clicks = MetaBuilder::new()
        .build_descriptor(
            RecordDescriptor::new("Clicks", ClickCounter::instantiate)
                .field(FieldDescriptor::embedded_id::<ClickKey>("id"))
                .field(counter("clicks"))
                .field(counter("views")),
        )
        .expect("build");

    let counters: Vec<_> = clicks.counter_columns().map(ColumnMeta::field_name).collect();
    let without_counters: Vec<_> =
        clicks.columns_except_counters().map(ColumnMeta::field_name).collect();
    assert_eq!(counters, vec!["clicks", "views"]);
    assert_eq!(without_counters, vec!["id"]);
    assert_eq!(clicks.columns_except_id_and_counters().count(), 0);

    let tweets = test_fixtures::tweet_meta();
    assert_eq!(tweets.counter_columns().count(), 0);
    assert_eq!(
        tweets.columns_except_id_and_counters().count(),
        tweets.columns_except_counters().count() - 1
    );
}

#[test]
fn settings_resolve_table_then_record_then_global() {
    let config = MappingConfig::from_toml_str(
        r#"
        keyspace = "app"
        insert_strategy = "not_null_fields"

        [consistency]
        read = "QUORUM"
        write = "QUORUM"

        [tables.tweet]
        write = "LOCAL_QUORUM"
        "#,
    )
    .expect("config");

    let desc = Tweet::descriptor()
        .read(ConsistencyLevel::Two)
        .write(ConsistencyLevel::Three)
        .insert_strategy(InsertStrategy::AllFields);
    let meta = MetaBuilder::with_config(&config)
        .build_descriptor(desc)
        .expect("build");

    assert_eq!(meta.config().keyspace(), Some("app"));
    assert_eq!(meta.config().qualified_table_name(), "app.tweet");
    assert_eq!(meta.config().read_consistency(), ConsistencyLevel::Two);
    assert_eq!(meta.config().write_consistency(), ConsistencyLevel::LocalQuorum);
    assert_eq!(meta.config().insert_strategy(), InsertStrategy::AllFields);

    let users = MetaBuilder::with_config(&config).build::<User>().expect("build");
    assert_eq!(users.config().read_consistency(), ConsistencyLevel::Quorum);
    assert_eq!(users.config().insert_strategy(), InsertStrategy::NotNullFields);
}

#[test]
fn field_consistency_overrides_entity_consistency() {
    let mut desc = User::descriptor().read(ConsistencyLevel::Quorum);
    desc.fields[1] = desc.fields[1].clone().write(ConsistencyLevel::All);

    let meta = MetaBuilder::new().build_descriptor(desc).expect("build");
    let name = meta.column("name").expect("name");

    assert_eq!(name.consistency().read, ConsistencyLevel::Quorum);
    assert_eq!(name.consistency().write, ConsistencyLevel::All);
    assert_eq!(meta.id_meta().consistency().write, ConsistencyLevel::One);
}

#[test]
fn building_twice_yields_equal_metadata() {
    let a = test_fixtures::tweet_meta();
    let b = test_fixtures::tweet_meta();

    assert_eq!(a.id_meta(), b.id_meta());
    assert_eq!(a.all_columns().collect::<Vec<_>>(), b.all_columns().collect::<Vec<_>>());
}

#[test]
fn missing_and_duplicate_ids_are_rejected() {
    let no_id = RecordDescriptor::new("Nothing", User::instantiate)
        .field(FieldDescriptor::new("name", FieldRole::Column, String::shape()));
    assert_eq!(
        MetaBuilder::new().build_descriptor(no_id).unwrap_err(),
        BuildError::MissingId { type_name: "Nothing" }
    );

    let two_ids = User::descriptor().field(FieldDescriptor::new(
        "other",
        FieldRole::Id,
        String::shape(),
    ));
    assert!(matches!(
        MetaBuilder::new().build_descriptor(two_ids).unwrap_err(),
        BuildError::MultipleIds { first: "id", second: "other", .. }
    ));
}

#[test]
fn components_belong_inside_key_types() {
    let desc = User::descriptor().field(FieldDescriptor::new(
        "bucket",
        FieldRole::Partition,
        i32::shape(),
    ));
    assert!(matches!(
        MetaBuilder::new().build_descriptor(desc).unwrap_err(),
        BuildError::ComponentOutsideKey { field: "bucket", .. }
    ));
}

#[test]
fn key_types_need_a_partition_component() {
    fn clustering_only() -> RecordDescriptor {
        RecordDescriptor::new("DayKey", ClickKey::instantiate)
            .field(FieldDescriptor::new("day", FieldRole::Clustering, i32::shape()))
    }

    let desc = RecordDescriptor::new("Days", ClickCounter::instantiate).field(FieldDescriptor {
        key: Some(KeyDescriptor {
            type_name: "DayKey",
            descriptor: clustering_only,
            instantiate: ClickKey::instantiate,
        }),
        ..FieldDescriptor::embedded_id::<ClickKey>("id")
    });

    assert_eq!(
        MetaBuilder::new().build_descriptor(desc).unwrap_err(),
        BuildError::EmptyPartitionKey { key_type: "DayKey" }
    );
}

#[test]
fn key_types_reject_plain_columns_counters_and_collections() {
    fn with_column() -> RecordDescriptor {
        page_key().field(FieldDescriptor::new("note", FieldRole::Column, String::shape()))
    }
    fn with_counter() -> RecordDescriptor {
        page_key().field(FieldDescriptor::new("hits", FieldRole::Clustering, Counter::shape()))
    }
    fn with_set() -> RecordDescriptor {
        page_key().field(FieldDescriptor::new(
            "tags",
            FieldRole::Clustering,
            BTreeSet::<String>::shape(),
        ))
    }

    let build = |descriptor: fn() -> RecordDescriptor| {
        let desc = RecordDescriptor::new("Pages", ClickCounter::instantiate).field(FieldDescriptor {
            key: Some(KeyDescriptor {
                descriptor,
                ..page_key_descriptor()
            }),
            ..FieldDescriptor::embedded_id::<ClickKey>("id")
        });
        MetaBuilder::new().build_descriptor(desc).unwrap_err()
    };

    assert!(matches!(build(with_column), BuildError::KeyFieldRole { field: "note", .. }));
    assert!(matches!(build(with_counter), BuildError::CounterInKey { field: "hits", .. }));
    assert!(matches!(
        build(with_set),
        BuildError::CollectionInKey { kind: ColumnKind::Set, .. }
    ));
}

#[test]
fn static_columns_require_clustering() {
    let desc = User::descriptor().field(
        FieldDescriptor::new("region", FieldRole::Column, String::shape()).static_column(),
    );
    assert!(matches!(
        MetaBuilder::new().build_descriptor(desc).unwrap_err(),
        BuildError::StaticOnUnclustered { field: "region", .. }
    ));
}

#[test]
fn collections_and_counters_cannot_be_indexed() {
    let desc = User::descriptor().field(
        FieldDescriptor::new("labels", FieldRole::Column, BTreeSet::<String>::shape()).index(None),
    );
    assert!(matches!(
        MetaBuilder::new().build_descriptor(desc).unwrap_err(),
        BuildError::InvalidIndex { kind: ColumnKind::Set, .. }
    ));
}

#[test]
fn wire_names_must_be_unique() {
    let desc = Tweet::descriptor().field(
        FieldDescriptor::new("owner", FieldRole::Column, i64::shape()).column_name("USER_ID"),
    );
    assert_eq!(
        MetaBuilder::new().build_descriptor(desc).unwrap_err(),
        BuildError::DuplicateColumn {
            type_name: "Tweet",
            column: "user_id".to_string(),
        }
    );
}

#[test]
fn table_and_keyspace_names_are_validated() {
    assert!(validate_name("table", "tweets_2024").is_ok());
    assert!(validate_name("table", &"t".repeat(48)).is_ok());

    for (name, reason) in [
        ("", "must not be empty"),
        ("2024_tweets", "must start with a letter"),
        ("tweets-2024", "must contain only letters, digits and underscores"),
    ] {
        let err = validate_name("table", name).unwrap_err();
        assert!(err.to_string().ends_with(reason), "{name}: {err}");
    }

    let err = validate_name("keyspace", &"k".repeat(49)).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("invalid keyspace name '{}': must be at most 48 characters", "k".repeat(49))
    );

    let desc = User::descriptor().table("bad table");
    assert!(matches!(
        MetaBuilder::new().build_descriptor(desc).unwrap_err(),
        BuildError::InvalidName { what: "table", .. }
    ));
}

#[test]
fn embedded_key_fields_cannot_be_regular_columns() {
    let desc = User::descriptor().field(FieldDescriptor {
        role: FieldRole::Column,
        ..FieldDescriptor::embedded_id::<TweetKey>("key")
    });
    assert!(matches!(
        MetaBuilder::new().build_descriptor(desc).unwrap_err(),
        BuildError::EmbeddedKeyColumn { field: "key", .. }
    ));
}

struct Stamp(Vec<Event>);

impl Interceptor for Stamp {
    fn events(&self) -> &[Event] {
        &self.0
    }

    fn on_event(&self, _: Event, _: &mut dyn DynRecord) -> Result<(), InterceptError> {
        Ok(())
    }
}

#[test]
fn interceptors_are_grouped_by_event() {
    let meta = MetaBuilder::new()
        .interceptor(Arc::new(Stamp(vec![Event::PrePersist, Event::PreUpdate])))
        .interceptor(Arc::new(Stamp(vec![Event::PrePersist])))
        .build::<User>()
        .expect("build");

    assert_eq!(meta.interceptors[&Event::PrePersist].len(), 2);
    assert_eq!(meta.interceptors[&Event::PreUpdate].len(), 1);
    assert!(meta.interception().has(Event::PrePersist));
    assert!(!meta.interception().has(Event::PostLoad));
}
