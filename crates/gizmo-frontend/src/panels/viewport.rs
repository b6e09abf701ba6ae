//! Viewport panel - renders the 3D scene and routes pointer input

use crate::viewport_state::SharedViewportState;

/// Pointer id reported for the primary pointer device.
const PRIMARY_POINTER_ID: u64 = 1;

/// Central 3D view.
///
/// Pointer routing: a primary press on a gizmo handle starts a handle
/// drag; a primary click picks (attaching the gizmo); any other primary
/// or secondary drag orbits the camera; scrolling zooms.
pub struct ViewportPanel {
    gizmo_drag: bool,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self { gizmo_drag: false }
    }

    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        viewport: &SharedViewportState,
        render_state: &egui_wgpu::RenderState,
    ) {
        let available = ui.available_size();
        let (rect, response) = ui.allocate_exact_size(available, egui::Sense::click_and_drag());

        let width = rect.width().max(1.0) as u32;
        let height = rect.height().max(1.0) as u32;

        let mut viewport = viewport.lock();

        let texture_id = {
            let mut egui_renderer = render_state.renderer.write();
            viewport.ensure_texture(width, height, &mut egui_renderer)
        };

        let local = |pos: egui::Pos2| (pos.x - rect.min.x, pos.y - rect.min.y);

        if response.clicked() {
            // A click without a drag: pick (and attach) whatever is under
            // the pointer.
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = local(pos);
                viewport.renderer.pointer_pressed(x, y, PRIMARY_POINTER_ID);
                viewport.renderer.pointer_released();
            }
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = local(pos);
                self.gizmo_drag = viewport.renderer.pointer_pressed(x, y, PRIMARY_POINTER_ID);
            }
        } else if response.dragged_by(egui::PointerButton::Primary) {
            if self.gizmo_drag {
                if let Some(pos) = response.interact_pointer_pos() {
                    let (x, y) = local(pos);
                    viewport.renderer.pointer_moved(x, y);
                }
            } else {
                let delta = response.drag_delta();
                viewport.renderer.camera_mut().orbit(delta.x, delta.y);
            }
        } else if response.dragged_by(egui::PointerButton::Secondary) {
            let delta = response.drag_delta();
            viewport.renderer.camera_mut().orbit(delta.x, delta.y);
        } else if let Some(pos) = response.hover_pos() {
            // Hover highlight on the handles.
            let (x, y) = local(pos);
            viewport.renderer.pointer_moved(x, y);
        }

        if response.drag_stopped() {
            viewport.renderer.pointer_released();
            self.gizmo_drag = false;
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                viewport.renderer.camera_mut().zoom(scroll / 50.0);
            }
        }

        viewport.render();

        ui.painter().image(
            texture_id,
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }
}

impl Default for ViewportPanel {
    fn default() -> Self {
        Self::new()
    }
}
