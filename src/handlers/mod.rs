//! Event handlers for the relay pipeline
//!
//! ## Key Components
//!
//! - [`EventHandler`] - Trait every platform-invoked function implements
//! - [`VillageHandler`] - Storage notification → stamped document → queue
//! - [`TowerHandler`] - Queue batch → HTTP endpoint, aggregate pass/fail
//! - [`HandlerRegistry`] - Lookup of handlers by name
//! - [`InvocationResult`] - `{statusCode, body}` response envelope
//!
//! ## Example
//!
//! ```rust,ignore
//! use seven_seas::handlers::{Collaborators, HandlerRegistry};
//!
//! let collaborators = Collaborators::connect(&config).await?;
//! let registry = HandlerRegistry::with_collaborators(&config, collaborators);
//! let result = registry.get("tower")?.handle(event).await;
//! ```

mod registry;
mod tower;
mod traits;
mod types;
mod village;

pub use registry::{Collaborators, HandlerRegistry, RegistryError};
pub use tower::TowerHandler;
pub use traits::EventHandler;
pub use types::{
    BucketRef, Clock, Document, EVENTS, FixedClock, InvocationResult, LocalClock, ObjectRef,
    QueueEvent, SERVICES_VISITED, StorageDetail, StorageEvent, WRITING_RECURSION_EVENT,
    record_body, stamp_document,
};
pub use village::VillageHandler;
