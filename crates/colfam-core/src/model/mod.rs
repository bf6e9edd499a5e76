//! Metadata model: column and record descriptors plus the compound key
//! component system.

mod column;
mod components;
mod compound;
mod consistency;
mod interceptor;
mod kind;
mod record;


// re-exports
pub use column::{ClusteringOrder, ColumnMeta, ColumnStructure, IndexSpec};
pub use components::{
    ClusteringComponents, KeyComponents, KeySegment, PartitionComponents, ValidationError,
};
pub use compound::CompoundKeyProperties;
pub use consistency::{Consistency, ConsistencyLevel, ConsistencyParseError};
pub use interceptor::{Event, InterceptError, Interceptor};
pub use kind::ColumnKind;
pub use record::{
    InsertStrategy, RecordConfig, RecordInterception, RecordMeta, RecordStructure, RecordValues,
};
