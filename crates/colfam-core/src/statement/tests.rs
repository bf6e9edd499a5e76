use super::*;
use crate::{
    Error,
    build::{FieldDescriptor, FieldRole, KeyDescriptor, MetaBuilder, RecordDescriptor},
    model::{InsertStrategy, RecordMeta},
    query::Using,
    test_fixtures::{self, Tweet, TweetKey, User},
    traits::{FieldShape, FieldValue, Record},
};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

fn id_name_key() -> RecordDescriptor {
    RecordDescriptor::new("EntityKey", TweetKey::instantiate)
        .field(FieldDescriptor::new("id", FieldRole::Partition, i64::shape()))
        .field(FieldDescriptor::new("name", FieldRole::Clustering, String::shape()))
}

// Entity on table `table` keyed by (id, name) with one `names` column.
fn entity_with_names(shape: FieldShape) -> RecordMeta {
    let desc = RecordDescriptor::new("Entity", Tweet::instantiate)
        .table("table")
        .field(FieldDescriptor {
            key: Some(KeyDescriptor {
                type_name: "EntityKey",
                descriptor: id_name_key,
                instantiate: TweetKey::instantiate,
            }),
            ..FieldDescriptor::embedded_id::<TweetKey>("id")
        })
        .field(FieldDescriptor::new("names", FieldRole::Column, shape));

    MetaBuilder::new().build_descriptor(desc).expect("entity metadata")
}

fn names_update(shape: FieldShape, change: CollectionChange) -> Result<String, StatementError> {
    let meta = entity_with_names(shape);
    let names = meta.column("names").expect("names");

    names
        .statements()
        .generate_collection_update(Update::table("table"), change)
        .map(|update| update.to_string())
}

fn list() -> FieldShape {
    Vec::<String>::shape()
}

//
// primary key fragments
//

#[test]
fn insert_primary_key_lists_every_component() {
    let meta = entity_with_names(list());
    let insert = meta
        .id_meta()
        .statements()
        .prepare_insert_primary_key(Insert::into("table"), false);

    assert_eq!(insert.to_string(), "INSERT INTO table(id,name) VALUES (:id,:name);");
}

#[test]
fn insert_primary_key_for_static_columns_is_partition_only() {
    let meta = entity_with_names(list());
    let insert = meta
        .id_meta()
        .statements()
        .prepare_insert_primary_key(Insert::into("table"), true);

    assert_eq!(insert.to_string(), "INSERT INTO table(id) VALUES (:id);");
}

#[test]
fn simple_key_fragments_use_the_single_id() {
    let meta = test_fixtures::user_meta();
    let id = meta.id_meta().statements();

    assert_eq!(
        id.prepare_insert_primary_key(Insert::into("users"), false).to_string(),
        "INSERT INTO users(id) VALUES (:id);"
    );
    assert_eq!(
        id.prepare_select_field(Select::from("users")).to_string(),
        "SELECT id FROM users;"
    );
    assert_eq!(
        id.generate_where_clause_for_delete(Delete::from("users"), None).to_string(),
        "DELETE FROM users WHERE id=:id;"
    );
}

#[test]
fn where_clause_covers_every_component_unless_the_target_is_static() {
    let meta = test_fixtures::tweet_meta();
    let id = meta.id_meta().statements();
    let content = meta.column("content");
    let author = meta.column("author");

    assert_eq!(
        id.generate_where_clause_for_select(Select::from("tweet"), content).to_string(),
        "SELECT * FROM tweet WHERE user_id=:user_id AND name=:name;"
    );
    assert_eq!(
        id.generate_where_clause_for_select(Select::from("tweet"), author).to_string(),
        "SELECT * FROM tweet WHERE user_id=:user_id;"
    );
    assert_eq!(
        id.generate_where_clause_for_delete(Delete::from("tweet"), author).to_string(),
        "DELETE FROM tweet WHERE user_id=:user_id;"
    );

    let update = Update::table("tweet").with(Assignment::set("content", Term::marker("content")));
    assert_eq!(
        id.generate_where_clause_for_update(update, None).to_string(),
        "UPDATE tweet SET content=:content WHERE user_id=:user_id AND name=:name;"
    );
}

#[test]
fn select_fields_of_a_compound_key_are_its_components() {
    let meta = test_fixtures::tweet_meta();
    let select = meta.id_meta().statements().prepare_select_field(Select::from("tweet"));
    assert_eq!(select.to_string(), "SELECT user_id,name FROM tweet;");
}

#[test]
fn update_with_values_inlines_the_first_component() {
    let meta = test_fixtures::tweet_meta();
    let tweet = Tweet {
        id: test_fixtures::tweet_key(7, "a"),
        ..Tweet::default()
    };
    let update = Update::table("tweet").with(Assignment::set("content", Term::marker("content")));

    let (update, values) = meta
        .id_meta()
        .statements()
        .generate_where_clause_for_update_with_values(update, &tweet, false)
        .expect("encode");

    assert_eq!(
        update.to_string(),
        "UPDATE tweet SET content=:content WHERE user_id=7 AND name=:name;"
    );
    assert_eq!(values, vec![Value::BigInt(7), Value::from("a")]);
}

#[test]
fn update_with_values_for_static_columns_stops_at_the_partition() {
    let meta = test_fixtures::tweet_meta();
    let tweet = Tweet {
        id: test_fixtures::tweet_key(7, "a"),
        ..Tweet::default()
    };
    let update =
        Update::table("tweet").with(Assignment::set("authorname", Term::marker("authorname")));

    let (update, values) = meta
        .id_meta()
        .statements()
        .generate_where_clause_for_update_with_values(update, &tweet, true)
        .expect("encode");

    assert_eq!(
        update.to_string(),
        "UPDATE tweet SET authorname=:authorname WHERE user_id=7;"
    );
    assert_eq!(values, vec![Value::BigInt(7)]);
}

#[test]
fn update_with_values_for_a_simple_key_is_a_literal_equality() {
    let meta = test_fixtures::user_meta();
    let user = User {
        id: Uuid::nil(),
        ..User::default()
    };
    let update = Update::table("users").with(Assignment::set("name", Term::marker("name")));

    let (update, values) = meta
        .id_meta()
        .statements()
        .generate_where_clause_for_update_with_values(update, &user, false)
        .expect("encode");

    assert_eq!(
        update.to_string(),
        "UPDATE users SET name=:name WHERE id=00000000-0000-0000-0000-000000000000;"
    );
    assert_eq!(values, vec![Value::Uuid(Uuid::nil())]);
}

//
// collection fragments
//

#[test]
fn collection_fragments_have_one_exact_shape_each() {
    let set = BTreeSet::<String>::shape();
    let map = BTreeMap::<String, String>::shape();
    let cases = [
        (list(), CollectionChange::RemoveAll, "UPDATE table SET names=:names;"),
        (list(), CollectionChange::AppendToList, "UPDATE table SET names=names+:names;"),
        (list(), CollectionChange::PrependToList, "UPDATE table SET names=:names+names;"),
        (list(), CollectionChange::RemoveFromList, "UPDATE table SET names=names-:names;"),
        (list(), CollectionChange::SetAtIndex(2), "UPDATE table SET names[2]=?;"),
        (list(), CollectionChange::RemoveAtIndex(2), "UPDATE table SET names[2]=null;"),
        (set.clone(), CollectionChange::AddToSet, "UPDATE table SET names=names+:names;"),
        (set, CollectionChange::RemoveFromSet, "UPDATE table SET names=names-:names;"),
        (map.clone(), CollectionChange::AddToMap, "UPDATE table SET names=names+:names;"),
        (map, CollectionChange::RemoveFromMap, "UPDATE table SET names[:key]=:nullValue;"),
    ];

    for (shape, change, expected) in cases {
        assert_eq!(names_update(shape, change).expect(expected), expected);
    }
}

#[test]
fn changes_must_fit_the_collection_kind() {
    let err = names_update(list(), CollectionChange::AddToSet).unwrap_err();
    assert_eq!(err.to_string(), "change 'add to set' does not apply to list column 'names'");

    let err =
        names_update(BTreeSet::<String>::shape(), CollectionChange::SetAtIndex(0)).unwrap_err();
    assert!(matches!(err, StatementError::InvalidChange { kind: ColumnKind::Set, .. }));

    let err = names_update(String::shape(), CollectionChange::AppendToList).unwrap_err();
    assert_eq!(err.class(), ErrorClass::Unsupported);
}

//
// counters
//

#[test]
fn counters_are_never_removed() {
    let meta = test_fixtures::click_counter_meta();
    let clicks = meta.column("clicks").expect("clicks");

    let err = clicks
        .statements()
        .prepare_delete_field(Delete::from("click_counter"))
        .unwrap_err();
    assert!(matches!(err, StatementError::CounterRemoval { .. }));

    for change in [
        CollectionChange::RemoveAll,
        CollectionChange::RemoveFromSet,
        CollectionChange::RemoveFromList,
        CollectionChange::RemoveAtIndex(0),
        CollectionChange::RemoveFromMap,
    ] {
        let err = clicks
            .statements()
            .generate_collection_update(Update::table("click_counter"), change)
            .unwrap_err();
        assert!(matches!(err, StatementError::CounterRemoval { .. }), "{change}");
    }

    let err = meta.statements().delete_columns(&["clicks"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "counter column 'clicks' cannot be removed, only incremented or decremented"
    );
    assert_eq!(Error::from(err).class(), ErrorClass::Unsupported);
}

#[test]
fn counters_are_never_assigned() {
    let meta = test_fixtures::click_counter_meta();

    let err = meta.statements().update_columns(&["clicks"], None).unwrap_err();
    assert!(matches!(err, StatementError::CounterAssignment { .. }));
}

#[test]
fn counters_increment_and_decrement() {
    let meta = test_fixtures::click_counter_meta();

    assert_eq!(
        meta.statements().increment_counter("clicks").expect("increment").to_string(),
        "UPDATE click_counter SET clicks=clicks+:clicks WHERE page=:page AND day=:day;"
    );
    assert_eq!(
        meta.statements().decrement_counter("clicks").expect("decrement").to_string(),
        "UPDATE click_counter SET clicks=clicks-:clicks WHERE page=:page AND day=:day;"
    );

    let tweets = test_fixtures::tweet_meta();
    assert!(matches!(
        tweets.statements().increment_counter("content"),
        Err(StatementError::NotACounter { .. })
    ));
}

//
// record statements
//

#[test]
fn insert_binds_key_and_regular_columns() {
    let meta = test_fixtures::tweet_meta();
    assert_eq!(
        meta.statements().insert(None).to_string(),
        "INSERT INTO tweet(user_id,name,content,tags,names,authorname,prefs) \
         VALUES (:user_id,:name,:content,:tags,:names,:authorname,:prefs);"
    );

    let clicks = test_fixtures::click_counter_meta();
    assert_eq!(
        clicks.statements().insert(Some(Using::markers())).to_string(),
        "INSERT INTO click_counter(page,day) VALUES (:page,:day) USING TTL :ttl AND TIMESTAMP :timestamp;"
    );
}

#[test]
fn bind_insert_honours_the_insert_strategy() {
    let user = User {
        id: Uuid::nil(),
        name: "ada".into(),
        ..User::default()
    };

    let all = test_fixtures::user_meta();
    let bound = all.statements().bind_insert(&user, None).expect("bind");
    assert_eq!(
        bound.query,
        "INSERT INTO users(id,name,age,emails) VALUES (:id,:name,:age,:emails);"
    );
    assert_eq!(
        bound.values,
        vec![
            Value::Uuid(Uuid::nil()),
            Value::from("ada"),
            Value::Null,
            Value::List(Vec::new()),
        ]
    );

    let not_null = MetaBuilder::new()
        .build_descriptor(User::descriptor().insert_strategy(InsertStrategy::NotNullFields))
        .expect("build");
    let bound = not_null.statements().bind_insert(&user, None).expect("bind");
    assert_eq!(
        bound.query,
        "INSERT INTO users(id,name,emails) VALUES (:id,:name,:emails);"
    );
    assert_eq!(bound.values.len(), 3);
}

#[test]
fn select_and_delete_by_id() {
    let tweets = test_fixtures::tweet_meta();
    assert_eq!(
        tweets.statements().select_by_id().to_string(),
        "SELECT user_id,name,content,tags,names,authorname,prefs FROM tweet \
         WHERE user_id=:user_id AND name=:name;"
    );
    assert_eq!(
        tweets.statements().delete_by_id(None).to_string(),
        "DELETE FROM tweet WHERE user_id=:user_id AND name=:name;"
    );

    let clicks = test_fixtures::click_counter_meta();
    assert_eq!(
        clicks.statements().select_by_id().to_string(),
        "SELECT page,day,clicks FROM click_counter WHERE page=:page AND day=:day;"
    );
}

#[test]
fn update_columns_addresses_static_targets_by_partition() {
    let meta = test_fixtures::tweet_meta();
    let statements = meta.statements();

    assert_eq!(
        statements.update_columns(&["content", "tags"], None).expect("update").to_string(),
        "UPDATE tweet SET content=:content,tags=:tags WHERE user_id=:user_id AND name=:name;"
    );
    assert_eq!(
        statements.update_columns(&["author"], None).expect("update").to_string(),
        "UPDATE tweet SET authorname=:authorname WHERE user_id=:user_id;"
    );
    assert_eq!(
        statements
            .update_columns(&["content"], Some(Using::default().ttl(Term::marker("ttl"))))
            .expect("update")
            .to_string(),
        "UPDATE tweet USING TTL :ttl SET content=:content WHERE user_id=:user_id AND name=:name;"
    );
}

#[test]
fn column_lookups_are_validated() {
    let meta = test_fixtures::tweet_meta();
    let statements = meta.statements();

    assert!(matches!(
        statements.update_columns(&[], None),
        Err(StatementError::NoColumns { entity: "Tweet" })
    ));
    assert!(matches!(
        statements.update_columns(&["id"], None),
        Err(StatementError::KeyColumn { .. })
    ));
    let err = statements.delete_columns(&["nope"]).unwrap_err();
    assert_eq!(err.to_string(), "unknown column 'nope' on entity 'Tweet'");
    assert_eq!(err.class(), ErrorClass::Validation);
}

#[test]
fn delete_columns_and_collection_updates_target_one_row() {
    let meta = test_fixtures::tweet_meta();

    assert_eq!(
        meta.statements().delete_columns(&["tags", "names"]).expect("delete").to_string(),
        "DELETE tags,names FROM tweet WHERE user_id=:user_id AND name=:name;"
    );
    assert_eq!(
        meta.statements()
            .collection_update("tags", CollectionChange::AddToSet)
            .expect("update")
            .to_string(),
        "UPDATE tweet SET tags=tags+:tags WHERE user_id=:user_id AND name=:name;"
    );
}
