//! Tap gesture routing

use unfold_core::{LayoutHost, ViewId, AUTO_HEIGHT};

use super::ExpandableRecord;
use crate::context::WidgetContext;

/// Keeps the expandable's single tap recognizer on exactly one view
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureRouter {
    attached_to: Option<ViewId>,
}

impl GestureRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The view currently carrying the recognizer
    pub fn target(&self) -> Option<ViewId> {
        self.attached_to
    }

    /// Move the recognizer to `target`, removing it from the previous view
    pub fn attach<H: LayoutHost>(&mut self, host: &mut H, owner: ViewId, target: Option<ViewId>) {
        if self.attached_to == target {
            return;
        }
        self.detach(host, owner);

        if let Some(target) = target {
            host.add_tap_recognizer(target, owner);
            self.attached_to = Some(target);
        }
    }

    pub fn detach<H: LayoutHost>(&mut self, host: &mut H, owner: ViewId) {
        if let Some(previous) = self.attached_to.take() {
            host.remove_tap_recognizer(previous, owner);
        }
    }
}

/// Force every enclosing expandable's secondary view back to auto height.
///
/// Walks parent links from `owner` up to, but not including, the page. An
/// outer expandable holds its secondary view at the height it measured last,
/// which goes stale as soon as an inner one changes size.
///
/// Returns how many ancestors were reset.
pub fn remeasure_ancestors<H: LayoutHost>(ctx: &mut WidgetContext<H>, owner: ViewId) -> usize {
    let mut reset = 0;
    let mut current = ctx.host().parent(owner);

    while let Some(ancestor) = current {
        if ctx.host().is_page(ancestor) {
            break;
        }

        let secondary = ctx
            .get_widget_state::<ExpandableRecord>(ancestor)
            .and_then(|record| record.secondary);
        if let Some(secondary) = secondary {
            tracing::debug!(?ancestor, ?secondary, "ancestor expandable set to auto height");
            ctx.host_mut().set_height_request(secondary, AUTO_HEIGHT);
            reset += 1;
        }

        current = ctx.host().parent(ancestor);
    }
    reset
}
