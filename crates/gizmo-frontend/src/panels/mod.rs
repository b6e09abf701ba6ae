//! UI panels

mod object_list;
mod viewport;

pub use object_list::ObjectListPanel;
pub use viewport::ViewportPanel;

use crate::app_state::SharedAppState;

/// A dockable UI panel.
pub trait Panel {
    fn name(&self) -> &str;
    fn ui(&mut self, ui: &mut egui::Ui, app_state: &SharedAppState);
}
