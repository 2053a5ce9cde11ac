pub mod config;
pub mod delivery;
pub mod error;
pub mod handlers;
pub mod messaging;
pub mod observability;
pub mod runtime;
pub mod storage;
