//! Hand-written records shared by the unit tests.
//!
//! The accessor tables mirror what `#[derive(Record)]` generates.

use crate::{
    build::{FieldDescriptor, FieldRole, MetaBuilder, RecordDescriptor},
    model::{ClusteringOrder, RecordMeta},
    traits::{AccessError, DynRecord, FieldValue, Record, downcast_key},
    types::Counter,
    value::Value,
};
use chrono::NaiveDate;
use std::{
    any::Any,
    collections::{BTreeMap, BTreeSet},
};
use uuid::Uuid;

macro_rules! accessors {
    ($ty:ty { $($field:ident),* $(,)? } $(, key = $key:ident)?) => {
        impl DynRecord for $ty {
            fn type_name(&self) -> &'static str {
                <Self as Record>::TYPE_NAME
            }

            fn get_field(&self, field: &str) -> Result<Value, AccessError> {
                match field {
                    $(stringify!($field) => Ok(self.$field.to_value()),)*
                    $(stringify!($key) => Err(AccessError::embedded_key(Self::TYPE_NAME, field)),)?
                    _ => Err(AccessError::unknown_field(Self::TYPE_NAME, field)),
                }
            }

            fn set_field(&mut self, field: &str, value: Value) -> Result<(), AccessError> {
                match field {
                    $(stringify!($field) => {
                        self.$field = FieldValue::from_value(value)
                            .map_err(|err| AccessError::field(Self::TYPE_NAME, field, err))?;
                        Ok(())
                    })*
                    $(stringify!($key) => Err(AccessError::embedded_key(Self::TYPE_NAME, field)),)?
                    _ => Err(AccessError::unknown_field(Self::TYPE_NAME, field)),
                }
            }

            $(
                fn get_key(&self, field: &str) -> Result<&dyn DynRecord, AccessError> {
                    if field == stringify!($key) {
                        Ok(&self.$key)
                    } else {
                        Err(AccessError::not_a_key_field(Self::TYPE_NAME, field))
                    }
                }

                fn set_key(
                    &mut self,
                    field: &str,
                    key: Box<dyn DynRecord>,
                ) -> Result<(), AccessError> {
                    if field == stringify!($key) {
                        self.$key = downcast_key(key)?;
                        Ok(())
                    } else {
                        Err(AccessError::not_a_key_field(Self::TYPE_NAME, field))
                    }
                }
            )?

            fn clone_record(&self) -> Box<dyn DynRecord> {
                Box::new(self.clone())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn Any> {
                self
            }
        }
    };
}

///
/// TweetKey
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct TweetKey {
    pub user_id: i64,
    pub name: String,
}

accessors!(TweetKey { user_id, name });

impl Record for TweetKey {
    const TYPE_NAME: &'static str = "TweetKey";

    fn descriptor() -> RecordDescriptor {
        RecordDescriptor::of::<Self>()
            .field(FieldDescriptor::new("user_id", FieldRole::Partition, i64::shape()))
            .field(
                FieldDescriptor::new("name", FieldRole::Clustering, String::shape())
                    .order(ClusteringOrder::Desc),
            )
    }
}

///
/// Tweet
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Tweet {
    pub id: TweetKey,
    pub content: String,
    pub tags: BTreeSet<String>,
    pub names: Vec<String>,
    pub author: Option<String>,
    pub prefs: BTreeMap<String, i32>,
}

accessors!(Tweet { content, tags, names, author, prefs }, key = id);

impl Record for Tweet {
    const TYPE_NAME: &'static str = "Tweet";

    fn descriptor() -> RecordDescriptor {
        RecordDescriptor::of::<Self>()
            .table("tweet")
            .field(FieldDescriptor::embedded_id::<TweetKey>("id"))
            .field(FieldDescriptor::new("content", FieldRole::Column, String::shape()).index(None))
            .field(
                FieldDescriptor::new("tags", FieldRole::Column, BTreeSet::<String>::shape())
                    .empty_if_null(),
            )
            .field(FieldDescriptor::new("names", FieldRole::Column, Vec::<String>::shape()))
            .field(
                FieldDescriptor::new("author", FieldRole::Column, Option::<String>::shape())
                    .column_name("authorName")
                    .static_column(),
            )
            .field(FieldDescriptor::new(
                "prefs",
                FieldRole::Column,
                BTreeMap::<String, i32>::shape(),
            ))
    }
}

///
/// ClickKey
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ClickKey {
    pub page: String,
    pub day: NaiveDate,
}

accessors!(ClickKey { page, day });

impl Record for ClickKey {
    const TYPE_NAME: &'static str = "ClickKey";

    fn descriptor() -> RecordDescriptor {
        RecordDescriptor::of::<Self>()
            .field(FieldDescriptor::new("page", FieldRole::Partition, String::shape()))
            .field(FieldDescriptor::new("day", FieldRole::Clustering, NaiveDate::shape()))
    }
}

///
/// ClickCounter
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ClickCounter {
    pub id: ClickKey,
    pub clicks: Counter,
}

accessors!(ClickCounter { clicks }, key = id);

impl Record for ClickCounter {
    const TYPE_NAME: &'static str = "ClickCounter";

    fn descriptor() -> RecordDescriptor {
        RecordDescriptor::of::<Self>()
            .table("click_counter")
            .field(FieldDescriptor::embedded_id::<ClickKey>("id"))
            .field(FieldDescriptor::new("clicks", FieldRole::Column, Counter::shape()))
    }
}

///
/// User
/// Simple primary key.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct User {
    pub id: Uuid,
    pub name: String,
    pub age: Option<i32>,
    pub emails: Vec<String>,
}

accessors!(User { id, name, age, emails });

impl Record for User {
    const TYPE_NAME: &'static str = "User";

    fn descriptor() -> RecordDescriptor {
        RecordDescriptor::of::<Self>()
            .table("users")
            .field(FieldDescriptor::new("id", FieldRole::Id, Uuid::shape()))
            .field(FieldDescriptor::new("name", FieldRole::Column, String::shape()))
            .field(FieldDescriptor::new("age", FieldRole::Column, Option::<i32>::shape()))
            .field(FieldDescriptor::new("emails", FieldRole::Column, Vec::<String>::shape()))
    }
}

pub(crate) fn tweet_meta() -> RecordMeta {
    MetaBuilder::new().build::<Tweet>().expect("tweet metadata")
}

pub(crate) fn click_counter_meta() -> RecordMeta {
    MetaBuilder::new()
        .build::<ClickCounter>()
        .expect("click counter metadata")
}

pub(crate) fn user_meta() -> RecordMeta {
    MetaBuilder::new().build::<User>().expect("user metadata")
}

pub(crate) fn tweet_key(user_id: i64, name: &str) -> TweetKey {
    TweetKey {
        user_id,
        name: name.to_string(),
    }
}
