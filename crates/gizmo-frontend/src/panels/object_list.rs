//! Object list panel - sidebar synced to the selection store

use crate::app_state::SharedAppState;
use crate::panels::Panel;

/// Sidebar listing every selectable object; clicking a row selects it.
pub struct ObjectListPanel;

impl ObjectListPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ObjectListPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Panel for ObjectListPanel {
    fn name(&self) -> &str {
        "Objects"
    }

    fn ui(&mut self, ui: &mut egui::Ui, app_state: &SharedAppState) {
        // Snapshot the store, then release the state lock before any
        // selection change kicks off the relay's subscriptions.
        let store = app_state.lock().store.clone();
        let objects = store.objects();
        let selected = store.selected();

        ui.heading("Scene Objects");
        ui.separator();

        if objects.is_empty() {
            ui.weak("No objects in the scene.");
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for object in &objects {
                let is_selected = selected == Some(object.id);
                if ui.selectable_label(is_selected, &object.name).clicked() {
                    store.set_selected(Some(object.id));
                }
            }
        });

        ui.separator();
        if ui.button("Clear selection").clicked() {
            store.set_selected(None);
        }
    }
}
