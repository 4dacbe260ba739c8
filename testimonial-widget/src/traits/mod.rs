//! Host environment abstraction traits
//!
//! The runtime never touches a browser API directly. A platform adapter
//! implements these traits over the live DOM; tests implement them in memory.

mod host;
mod storage;

pub use host::{
    AttributeSource, FrameSpec, HostElement, HostPage, IsolatedRoot, IsolationSupport,
};
pub use storage::{InMemoryStorage, KeyValueStorage, StorageError};
