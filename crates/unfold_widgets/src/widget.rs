//! Base widget trait

use unfold_core::{Event, LayoutHost, ViewId};

use crate::context::WidgetContext;

/// Base trait for all widgets
pub trait Widget<H: LayoutHost> {
    /// The view the widget occupies in the host tree
    fn id(&self) -> ViewId;

    /// Handle an event; widgets ignore events that are not theirs
    fn handle_event(&mut self, ctx: &mut WidgetContext<H>, event: &Event);
}
