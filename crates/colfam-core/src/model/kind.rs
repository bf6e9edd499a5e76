use std::fmt;

///
/// ColumnKind
///
/// Closed classification of a mapped field. Codec selection, transcoding and
/// statement fragment shapes all match on it exhaustively.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ColumnKind {
    Scalar,
    List,
    Set,
    Map,
    Counter,
    /// A field holding a whole compound primary key.
    EmbeddedKey,
    /// One partition or clustering field inside a compound key type.
    CompoundKeyComponent,
}

impl ColumnKind {
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::List | Self::Set | Self::Map)
    }

    #[must_use]
    pub const fn is_counter(self) -> bool {
        matches!(self, Self::Counter)
    }

    #[must_use]
    pub const fn is_embedded_key(self) -> bool {
        matches!(self, Self::EmbeddedKey)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::List => "list",
            Self::Set => "set",
            Self::Map => "map",
            Self::Counter => "counter",
            Self::EmbeddedKey => "embedded key",
            Self::CompoundKeyComponent => "compound key component",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
