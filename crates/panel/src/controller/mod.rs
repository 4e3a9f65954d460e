//! Controller layer: panel inputs, reducer-like state transitions, and command routing.

pub mod events;
pub mod orchestration;
pub mod reducer;
