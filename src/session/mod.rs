// file: src/session/mod.rs
// description: session persistence module exports
// reference: internal module structure

pub mod storage;
pub mod store;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{EMAIL_KEY, SessionStore, TENANT_KEY, TOKEN_KEY};
