//! Gizmo Demo Core
//!
//! Engine-independent state and event plumbing for the gizmo demo:
//! - SelectionStore: subscription store for the object list and selection
//! - GizmoRelay: forwards manipulation-drag events to consumers, throttled
//! - ManipulatorRig: boundary trait implemented by the rendering layer

pub mod events;
pub mod relay;
pub mod rig;
pub mod store;
pub mod throttle;

pub use events::*;
pub use relay::*;
pub use rig::*;
pub use store::*;
pub use throttle::*;
