//! Boundary trait for the engine's manipulation handle set

use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::events::{DragEvent, GizmoHandle, Observable};

/// The engine-facing surface of a manipulation handle set.
///
/// Implemented by the rendering layer; the relay only talks to this trait,
/// which keeps the store/relay pairing testable with a rig double.
pub trait ManipulatorRig: Send {
    /// Enables or disables the translation handle group.
    fn set_translation_enabled(&mut self, enabled: bool);

    /// Enables or disables the rotation handle group.
    fn set_rotation_enabled(&mut self, enabled: bool);

    /// When enabled, clicking a pickable object attaches the handles to it
    /// and clicking empty space detaches them.
    fn set_pointer_attach_enabled(&mut self, enabled: bool);

    /// The drag observable of one of the six handles.
    fn drag_observable(&mut self, handle: GizmoHandle) -> &mut Observable<DragEvent>;

    /// Raised with the new target whenever the attachment changes.
    fn attachment_observable(&mut self) -> &mut Observable<Option<Uuid>>;

    /// Attaches the handles to `target`, or detaches on `None`.
    ///
    /// Implementations must suppress the attachment notification when the
    /// target is already attached.
    fn attach(&mut self, target: Option<Uuid>);

    /// The currently attached object, if any.
    fn attached(&self) -> Option<Uuid>;

    /// Releases the rig; it detaches and stops raising events.
    fn dispose(&mut self);
}

/// Shared rig handle, as held by the relay and the rendering layer.
pub type SharedRig = Arc<Mutex<dyn ManipulatorRig>>;
