//! Contract the embedding editor implements for the panel.

use crate::controller::events::Notice;

pub trait PanelHost {
    /// Replaces the panel content with a complete document.
    fn render(&mut self, document: &str);

    /// Shows a transient notification outside the panel.
    fn notify(&mut self, notice: &Notice);

    fn focus(&mut self) {}

    fn write_clipboard(&mut self, text: &str) -> Result<(), String>;
}
