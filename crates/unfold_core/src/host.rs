//! Layout host interface
//!
//! Widgets never perform layout themselves. They read measurements from and
//! push requests to a host through [`LayoutHost`], which a rendering backend
//! (or the headless [`ViewTree`](crate::tree::ViewTree)) implements.

use slotmap::new_key_type;

use crate::events::Event;

new_key_type! {
    /// Identifier of a view owned by the host
    pub struct ViewId;
    /// Identifier of a size-changed subscription
    pub struct SubscriptionId;
}

/// Height request meaning "size to content, then report back"
pub const AUTO_HEIGHT: f32 = -1.0;

/// The operations a widget may perform against the rendering/layout system.
///
/// Heights are in logical pixels. A rendered height of `-1.0` means the view
/// has not been laid out by its parent yet.
pub trait LayoutHost {
    /// Append `child` to the end of `parent`'s child list
    fn add_child(&mut self, parent: ViewId, child: ViewId);

    /// Insert `child` into `parent`'s child list at `index` (clamped)
    fn insert_child(&mut self, parent: ViewId, index: usize, child: ViewId);

    /// Remove `child` from `parent`, returning whether it was present
    fn remove_child(&mut self, parent: ViewId, child: ViewId) -> bool;

    /// Parent link used for ancestor traversal
    fn parent(&self, view: ViewId) -> Option<ViewId>;

    /// Whether `view` is a top-level page/window root
    fn is_page(&self, view: ViewId) -> bool;

    /// Last rendered height, `-1.0` when unresolved
    fn height(&self, view: ViewId) -> f32;

    /// Last rendered width, `-1.0` when unresolved
    fn width(&self, view: ViewId) -> f32;

    /// Sum of top and bottom padding
    fn vertical_padding(&self, view: ViewId) -> f32;

    fn height_request(&self, view: ViewId) -> f32;

    /// Request a content height; [`AUTO_HEIGHT`] sizes to content
    fn set_height_request(&mut self, view: ViewId, height: f32);

    fn is_visible(&self, view: ViewId) -> bool;

    fn set_visible(&mut self, view: ViewId, visible: bool);

    /// Rotation in degrees around the view's center
    fn set_rotation(&mut self, view: ViewId, degrees: f32);

    /// Clip children to the view's bounds while its height animates
    fn set_clip_to_bounds(&mut self, view: ViewId, clip: bool);

    /// Subscribe to size changes of `view`
    ///
    /// Every change produces an [`EventData::SizeChanged`](crate::events::EventData)
    /// event carrying the returned id until [`unsubscribe`](Self::unsubscribe).
    fn subscribe_size_changed(&mut self, view: ViewId) -> SubscriptionId;

    fn unsubscribe(&mut self, subscription: SubscriptionId);

    /// Route taps on `view` to `owner` as [`Event::tap`] events
    fn add_tap_recognizer(&mut self, view: ViewId, owner: ViewId);

    fn remove_tap_recognizer(&mut self, view: ViewId, owner: ViewId);

    /// Take all notifications queued since the last call
    fn drain_events(&mut self) -> Vec<Event>;
}
