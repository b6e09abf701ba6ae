//! Application shell

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use gizmo_core::{DragEvent, SelectionStore, SharedRig, relay};

use crate::app_state::{AppState, SharedAppState};
use crate::config::{ConfigManager, UiTheme};
use crate::panels::{ObjectListPanel, Panel, ViewportPanel};
use crate::scene_setup;
use crate::viewport_state::{SharedViewportState, ViewportState};

pub struct GizmoDemoApp {
    app_state: SharedAppState,
    viewport: SharedViewportState,
    object_list: ObjectListPanel,
    viewport_panel: ViewportPanel,
}

impl GizmoDemoApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let render_state = cc
            .wgpu_render_state
            .as_ref()
            .expect("the gizmo demo requires the wgpu backend");
        let device = render_state.device.clone();
        let queue = render_state.queue.clone();
        let format = render_state.target_format;

        let config_manager = ConfigManager::new();
        let config = config_manager.config().clone();

        cc.egui_ctx.set_visuals(match config.ui.theme {
            UiTheme::Dark => egui::Visuals::dark(),
            UiTheme::Light => egui::Visuals::light(),
        });

        let mut viewport_state = ViewportState::new(device, queue, format, &config.renderer);

        // Scene bootstrap: boxes in, store synced.
        let store = SelectionStore::new();
        let refs = scene_setup::populate_scene(&mut viewport_state.renderer, &config.scene);
        store.set_objects(refs);

        // One rig per scene, wired through the process-wide relay.
        let gizmo = viewport_state.renderer.gizmo();
        let shared_relay = relay::acquire(store.clone(), move || {
            let rig: SharedRig = gizmo;
            rig
        });

        // Telemetry consumer: one log line per throttle window while a
        // handle is dragged.
        let drag_log = shared_relay.lock().subscribe(
            |event: &DragEvent| {
                tracing::info!(
                    handle = ?event.handle,
                    delta = %event.delta,
                    distance = event.drag_distance,
                    "gizmo drag"
                );
            },
            Some(Duration::from_millis(config.drag_log_throttle_ms)),
        );

        let mut app_state = AppState::new(store, config_manager);
        app_state.relay = Some(shared_relay);
        app_state.drag_log = Some(drag_log);

        Self {
            app_state: Arc::new(Mutex::new(app_state)),
            viewport: Arc::new(Mutex::new(viewport_state)),
            object_list: ObjectListPanel::new(),
            viewport_panel: ViewportPanel::new(),
        }
    }
}

impl eframe::App for GizmoDemoApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        // Keep the 3D highlight in sync with the store.
        {
            let selected = self.app_state.lock().store.selected();
            self.viewport.lock().renderer.set_selected(selected);
        }

        egui::SidePanel::left("object_list")
            .default_width(200.0)
            .show(ctx, |ui| self.object_list.ui(ui, &self.app_state));

        let render_state = frame
            .wgpu_render_state()
            .expect("the gizmo demo requires the wgpu backend")
            .clone();
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.viewport_panel.ui(ui, &self.viewport, &render_state)
            });

        // Continuous repaint keeps the render loop going.
        ctx.request_repaint();
    }

    fn on_exit(&mut self) {
        let mut state = self.app_state.lock();
        if let Some(shared_relay) = state.relay.take() {
            shared_relay.lock().dispose();
        }
        state.config.save_if_dirty();
        tracing::info!("Gizmo Demo shut down");
    }
}
