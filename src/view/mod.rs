// file: src/view/mod.rs
// description: dashboard view state machine exports
// reference: internal module structure

pub mod controller;
pub mod phase;

pub use controller::{
    Dashboard, Outcome, Pending, QueryTicket, UploadTicket, ViewSettings,
};
pub use phase::{Phase, Rejection};
