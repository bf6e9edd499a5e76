use crate::{
    model::{ClusteringComponents, ColumnMeta, PartitionComponents},
    traits::{DynRecord, Instantiator},
    value::{CqlType, ValueType},
};

///
/// CompoundKeyProperties
///
/// Partition and clustering segments of one compound key type.
/// The canonical component order is partition components followed by
/// clustering components; every combined view below follows it.
///

#[derive(Clone, Debug)]
pub struct CompoundKeyProperties {
    key_type_name: &'static str,
    partition: PartitionComponents,
    clustering: ClusteringComponents,
    instantiate: Instantiator,
}

impl CompoundKeyProperties {
    #[must_use]
    pub const fn new(
        key_type_name: &'static str,
        partition: PartitionComponents,
        clustering: ClusteringComponents,
        instantiate: Instantiator,
    ) -> Self {
        Self {
            key_type_name,
            partition,
            clustering,
            instantiate,
        }
    }

    #[must_use]
    pub const fn key_type_name(&self) -> &'static str {
        self.key_type_name
    }

    #[must_use]
    pub const fn partition(&self) -> &PartitionComponents {
        &self.partition
    }

    #[must_use]
    pub const fn clustering(&self) -> &ClusteringComponents {
        &self.clustering
    }

    /// Default-construct an empty key instance.
    #[must_use]
    pub fn instantiate(&self) -> Box<dyn DynRecord> {
        (self.instantiate)()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.partition.len() + self.clustering.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn all_components(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.partition.iter().chain(self.clustering.iter())
    }

    #[must_use]
    pub fn all_component_names(&self) -> Vec<&str> {
        self.all_components().map(ColumnMeta::column_name).collect()
    }

    #[must_use]
    pub fn all_component_types(&self) -> Vec<&ValueType> {
        self.all_components().map(ColumnMeta::value_type).collect()
    }

    #[must_use]
    pub fn all_wire_component_names(&self) -> Vec<&str> {
        self.all_components()
            .map(ColumnMeta::wire_column_name)
            .collect()
    }

    #[must_use]
    pub fn all_wire_component_types(&self) -> Vec<CqlType> {
        self.all_components().filter_map(ColumnMeta::wire_type).collect()
    }

    /// Components to address: the partition segment alone, or all of them.
    pub fn components(&self, partition_only: bool) -> impl Iterator<Item = &ColumnMeta> {
        let clustering: &[ColumnMeta] = if partition_only {
            &[]
        } else {
            self.clustering.columns()
        };

        self.partition.iter().chain(clustering)
    }
}
