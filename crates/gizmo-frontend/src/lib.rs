//! Gizmo Demo Frontend
//!
//! egui-based application shell: a 3D viewport with selectable boxes, an
//! object list synced to the selection store, and a throttled drag-event
//! log consumer.

mod app;
mod app_state;
mod config;
mod panels;
mod scene_setup;
mod viewport_state;

pub use app::GizmoDemoApp;
