use crate::traits::{AccessError, DynRecord};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Event
/// Lifecycle points at which an entity's interceptors run.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Event {
    PrePersist,
    PostPersist,
    PreUpdate,
    PostUpdate,
    PreRemove,
    PostRemove,
    PostLoad,
}

impl Event {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PrePersist => "PRE_PERSIST",
            Self::PostPersist => "POST_PERSIST",
            Self::PreUpdate => "PRE_UPDATE",
            Self::PostUpdate => "POST_UPDATE",
            Self::PreRemove => "PRE_REMOVE",
            Self::PostRemove => "POST_REMOVE",
            Self::PostLoad => "POST_LOAD",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// InterceptError
///

#[derive(Debug, ThisError)]
pub enum InterceptError {
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("interceptor '{interceptor}' failed on {event} for '{type_name}': {source}")]
    Failed {
        interceptor: String,
        event: Event,
        type_name: &'static str,
        #[source]
        source: Box<Self>,
    },
}

impl InterceptError {
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

///
/// Interceptor
///
/// User hook run against a record at the lifecycle events it subscribes to.
/// Interceptors may mutate the record through its accessor table.
///

pub trait Interceptor: Send + Sync {
    fn name(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    fn events(&self) -> &[Event];

    fn on_event(&self, event: Event, record: &mut dyn DynRecord) -> Result<(), InterceptError>;
}
