/// Simulated time, in model time units. Continuous; starts at zero unless
/// the model is constructed with an explicit start time.
pub type SimTime = f64;

/// Handle to an actor slot in the model's arena.
///
/// Handles are plain indexes: collaborators (resources, queues, transports)
/// store `ActorId`s rather than references to each other, so the object
/// graph has no cycles. A handle is only meaningful for the model that
/// issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub(crate) usize);

impl ActorId {
    /// Raw arena index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

macro_rules! handle_type {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// Raw registration index.
            pub fn index(&self) -> usize {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

handle_type!(
    /// Handle to a registered resource.
    ResourceId,
    "resource"
);
handle_type!(
    /// Handle to a registered standalone wait queue.
    QueueId,
    "queue"
);
handle_type!(
    /// Handle to a registered source.
    SourceId,
    "source"
);
handle_type!(
    /// Handle to a registered sink.
    SinkId,
    "sink"
);
handle_type!(
    /// Handle to a registered transport.
    TransportId,
    "transport"
);
