//! Core: event stream, state machine, and the loop that ties them together

pub mod app;
pub mod events;
pub mod state;
