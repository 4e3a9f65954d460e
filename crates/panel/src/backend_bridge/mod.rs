//! Host-facing bridge: trigger definitions and the runtime that executes panel effects.

pub mod commands;
pub mod runtime;
