pub mod coordinator;
pub mod error;
pub mod hydrate;
pub mod index;
pub mod interner;
pub mod matcher;
pub mod metrics;
pub mod snapshot;
pub mod topology;
pub mod traversal;

pub use coordinator::TopologyGuard;
pub use error::{GraphError, GraphResult, HydrationError, PatternError, SnapshotError};
pub use index::GraphIndex;
pub use interner::{Handle, Interner};
