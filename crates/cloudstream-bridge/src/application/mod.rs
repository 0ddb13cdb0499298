//! Application layer: command dispatch and asynchronous event pushes.
//!
//! [`dispatcher::dispatch`] is the single entry point: one raw JSON request
//! in, at most one SDK call, at most one JSON response out through the
//! session's [`events::Responder`]. SDK-originated events flow the other way
//! through the process-wide [`events::CallbackSlots`].

pub mod dispatcher;
pub mod events;

pub use dispatcher::{dispatch, DispatchContext};
pub use events::{CallbackSlots, Responder};
