pub mod backend_bridge;
pub mod controller;
pub mod host;
pub mod ui;

pub use backend_bridge::{
    commands::{parse_panel_message, PanelMessage, Trigger},
    runtime::PanelRuntime,
};
pub use controller::{
    events::{Notice, NoticeLevel, PanelInput},
    reducer::{transition, Effect, PanelState, ViewState},
};
pub use host::PanelHost;
