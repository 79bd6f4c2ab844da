//! Widget context
//!
//! Owns the layout host and the animation scheduler, and keeps a typed state
//! record per registered widget view. The record doubles as a type tag:
//! looking up `get_widget_state::<T>(view)` tells whether `view` belongs to a
//! widget of kind `T`.

use std::any::Any;

use rustc_hash::{FxHashMap, FxHashSet};
use unfold_animation::AnimationScheduler;
use unfold_core::{Event, LayoutHost, ViewId};

use crate::widget::Widget;

pub struct WidgetContext<H: LayoutHost> {
    host: H,
    scheduler: AnimationScheduler,
    widget_states: FxHashMap<ViewId, Box<dyn Any>>,
    dirty: FxHashSet<ViewId>,
}

impl<H: LayoutHost> WidgetContext<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            scheduler: AnimationScheduler::new(),
            widget_states: FxHashMap::default(),
            dirty: FxHashSet::default(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut AnimationScheduler {
        &mut self.scheduler
    }

    /// Borrow the host and scheduler together
    pub fn parts_mut(&mut self) -> (&mut H, &mut AnimationScheduler) {
        (&mut self.host, &mut self.scheduler)
    }

    /// Register a widget view with its initial state record
    pub fn register_widget<T: 'static>(&mut self, id: ViewId, state: T) {
        self.widget_states.insert(id, Box::new(state));
    }

    pub fn is_registered(&self, id: ViewId) -> bool {
        self.widget_states.contains_key(&id)
    }

    pub fn unregister_widget(&mut self, id: ViewId) {
        self.widget_states.remove(&id);
        self.dirty.remove(&id);
    }

    pub fn set_widget_state<T: 'static>(&mut self, id: ViewId, state: T) {
        self.widget_states.insert(id, Box::new(state));
    }

    /// Get a widget's state record, if `id` is registered with type `T`
    pub fn get_widget_state<T: 'static>(&self, id: ViewId) -> Option<&T> {
        self.widget_states.get(&id)?.downcast_ref()
    }

    pub fn get_widget_state_mut<T: 'static>(&mut self, id: ViewId) -> Option<&mut T> {
        self.widget_states.get_mut(&id)?.downcast_mut()
    }

    /// Flag a widget whose geometry changed
    pub fn mark_dirty(&mut self, id: ViewId) {
        self.dirty.insert(id);
    }

    pub fn take_dirty(&mut self) -> Vec<ViewId> {
        self.dirty.drain().collect()
    }

    /// Advance animations and collect every pending notification.
    ///
    /// Completion events come first, followed by host notifications.
    pub fn tick(&mut self, dt_ms: f32) -> Vec<Event> {
        let mut events = self.scheduler.tick(dt_ms, &mut self.host);
        events.extend(self.host.drain_events());
        events
    }

    /// Collect pending notifications without advancing time
    pub fn poll_events(&mut self) -> Vec<Event> {
        let mut events = self.scheduler.drain_events();
        events.extend(self.host.drain_events());
        events
    }
}

/// Deliver `events` to every widget, in order
pub fn dispatch<H: LayoutHost>(
    ctx: &mut WidgetContext<H>,
    widgets: &mut [&mut dyn Widget<H>],
    events: &[Event],
) {
    for event in events {
        for widget in widgets.iter_mut() {
            widget.handle_event(ctx, event);
        }
    }
}
