//! UI layer: pure view rendering and HTML helpers.

pub mod html;
pub mod render;

pub use render::{render, render_body};
