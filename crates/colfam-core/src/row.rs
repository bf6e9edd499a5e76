//! Row extraction: turning a result row handed over by the driver layer into
//! decoded column values and hydrated records.

use crate::{
    Error,
    model::{ColumnMeta, Event, RecordMeta},
    traits::{AccessError, DynRecord, Record},
    transcode::TranscodeError,
    value::Value,
};
use indexmap::IndexMap;
use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

///
/// Row
///
/// One result row, addressed by wire column name. `None` means the column
/// is absent from the row.
///

pub trait Row {
    fn get(&self, column: &str) -> Option<&Value>;
}

impl<S: BuildHasher> Row for HashMap<String, Value, S> {
    fn get(&self, column: &str) -> Option<&Value> {
        HashMap::get(self, column)
    }
}

impl Row for BTreeMap<String, Value> {
    fn get(&self, column: &str) -> Option<&Value> {
        BTreeMap::get(self, column)
    }
}

impl<S: BuildHasher> Row for IndexMap<String, Value, S> {
    fn get(&self, column: &str) -> Option<&Value> {
        IndexMap::get(self, column)
    }
}

impl ColumnMeta {
    /// Decoded value of this column in `row`.
    ///
    /// An absent or null column yields the empty collection when the column
    /// allows it, and `None` otherwise.
    pub fn extract(&self, row: &dyn Row) -> Result<Option<Value>, TranscodeError> {
        match row.get(self.wire_column_name()) {
            Some(wire) if !wire.is_null() => self.transcoder().decode(wire).map(Some),
            _ if self.structure().empty_collection_if_null() => {
                Ok(self.structure().empty_collection())
            }
            _ => Ok(None),
        }
    }

    /// Decode this column from `row` into `record`, leaving the field
    /// untouched when there is nothing to write.
    pub fn extract_into(&self, row: &dyn Row, record: &mut dyn DynRecord) -> Result<(), Error> {
        if let Some(value) = self.extract(row)? {
            self.set_value(record, value)?;
        }

        Ok(())
    }
}

impl RecordMeta {
    #[must_use]
    pub const fn rows(&self) -> RecordRows<'_> {
        RecordRows { meta: self }
    }
}

///
/// RecordRows
///

#[derive(Clone, Copy)]
pub struct RecordRows<'a> {
    meta: &'a RecordMeta,
}

impl RecordRows<'_> {
    /// Decode the primary key columns of `row` into `record`.
    pub fn extract_key(&self, row: &dyn Row, record: &mut dyn DynRecord) -> Result<(), Error> {
        let id = self.meta.id_meta();

        let Some(props) = id.compound_key() else {
            return id.extract_into(row, record);
        };

        let wire = props
            .all_components()
            .map(|component| {
                row.get(component.wire_column_name())
                    .cloned()
                    .unwrap_or(Value::Null)
            })
            .collect::<Vec<_>>();

        let key = id.transcoder().decode_from_components(&wire)?;
        id.set_key(record, key)?;

        Ok(())
    }

    /// Build a record from `row`, then run the `PostLoad` interceptors.
    pub fn hydrate(&self, row: &dyn Row) -> Result<Box<dyn DynRecord>, Error> {
        let mut record = self.meta.values().instantiate();
        self.extract_key(row, record.as_mut())?;

        for column in self.meta.columns().values() {
            column.extract_into(row, record.as_mut())?;
        }

        self.meta
            .interception()
            .intercept(Event::PostLoad, record.as_mut())?;

        Ok(record)
    }

    /// Typed variant of [`Self::hydrate`].
    pub fn hydrate_as<T: Record>(&self, row: &dyn Row) -> Result<T, Error> {
        let record = self.hydrate(row)?;
        let type_name = record.type_name();

        record
            .into_any()
            .downcast::<T>()
            .map(|record| *record)
            .map_err(|_| {
                AccessError::WrongType {
                    expected: T::TYPE_NAME.to_string(),
                    actual: type_name.to_string(),
                }
                .into()
            })
    }
}
