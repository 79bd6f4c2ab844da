//! Expandable container
//!
//! A composite view with a primary (header) view that is always shown and a
//! secondary (body) view built on demand from a template. Expanding and
//! collapsing animate the secondary view's height; tapping the touch handler
//! view (the primary view unless another one is set) toggles the state.
//!
//! The expandable never lays anything out itself. It reads rendered heights
//! from the host, writes height requests, and relies on the host to report
//! size changes so that content of unknown height can be measured first.
//!
//! # Example
//!
//! ```rust
//! use unfold_core::{LayoutHost, ViewNode, ViewTree};
//! use unfold_widgets::{dispatch, expandable, DataTemplate, ExpandStatus, WidgetContext};
//!
//! let mut tree = ViewTree::new();
//! let page = tree.page();
//! let view = tree.create(ViewNode::stack());
//! let header = tree.create(ViewNode::leaf(32.0));
//! tree.add_child(page, view);
//!
//! let mut ctx = WidgetContext::new(tree);
//! let mut panel = expandable()
//!     .primary(header)
//!     .height(120.0)
//!     .template(DataTemplate::new(|tree: &mut ViewTree| {
//!         Some(tree.create(ViewNode::leaf(120.0)))
//!     }))
//!     .build(&mut ctx, view);
//! ctx.host_mut().layout(page, 320.0);
//!
//! panel.set_expanded(&mut ctx, true);
//! for _ in 0..30 {
//!     let mut events = ctx.tick(16.0);
//!     ctx.host_mut().layout(page, 320.0);
//!     events.extend(ctx.poll_events());
//!     dispatch(&mut ctx, &mut [&mut panel], &events);
//! }
//!
//! assert_eq!(panel.status(), ExpandStatus::Expanded);
//! assert_eq!(ctx.host().height(view), 152.0);
//! ```

mod config;
mod content;
mod gesture;
mod height;
mod status;
mod template;
mod transition;

use std::any::Any;
use std::sync::Arc;

use unfold_core::{Event, EventData, LayoutHost, SubscriptionId, ViewId};

use crate::context::WidgetContext;
use crate::widget::Widget;

pub use config::{ConfigError, ExpandableConfig};
pub use content::{Rebuild, SecondaryContent};
pub use gesture::{remeasure_ancestors, GestureRouter};
pub use height::{HeightTracker, UNKNOWN_HEIGHT};
pub use status::ExpandStatus;
pub use template::{BindingContext, ContentFactory, DataTemplate, TemplateSelector};
pub use transition::{
    Statuses, TransitionEngine, TransitionState, TransitionTargets, EXPAND_ANIMATION,
    ROTATE_ANIMATION,
};

use transition::indicator_angle;

/// Value handed to the command on every tap
pub type CommandParameter = Arc<dyn Any + Send + Sync>;

/// Invoked on every tap, before the expanded state toggles
pub type Command = Box<dyn FnMut(Option<&CommandParameter>) + Send>;

type StatusCallback = Box<dyn FnMut(ExpandStatus) + Send>;
type TapCallback = Box<dyn FnMut() + Send>;
type ExpandedCallback = Box<dyn FnMut(bool) + Send>;

/// State registered in the [`WidgetContext`] for every expandable view.
///
/// Lets nested expandables find the secondary view of an enclosing one.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpandableRecord {
    pub secondary: Option<ViewId>,
}

/// Expandable widget
pub struct Expandable<H: LayoutHost> {
    /// Composite view holding primary and secondary
    id: ViewId,
    primary: Option<ViewId>,
    touch_handler: Option<ViewId>,
    content: SecondaryContent<H>,
    engine: TransitionEngine,
    gesture: GestureRouter,
    config: ExpandableConfig,
    expanded: bool,
    binding: Option<BindingContext>,
    /// Own size subscription, used to spot width changes
    size_subscription: Option<SubscriptionId>,
    last_width: f32,
    command: Option<Command>,
    command_parameter: Option<CommandParameter>,
    on_status_changed: Option<StatusCallback>,
    on_tapped: Option<TapCallback>,
    on_expanded_changed: Option<ExpandedCallback>,
}

impl<H: LayoutHost> Expandable<H> {
    /// Create an expandable occupying `id`
    pub fn new(ctx: &mut WidgetContext<H>, id: ViewId) -> Self {
        Self::with_config(ctx, id, ExpandableConfig::default())
    }

    /// Create an expandable with custom config
    pub fn with_config(ctx: &mut WidgetContext<H>, id: ViewId, config: ExpandableConfig) -> Self {
        ctx.register_widget(id, ExpandableRecord::default());
        let size_subscription = ctx.host_mut().subscribe_size_changed(id);

        Self {
            id,
            primary: None,
            touch_handler: None,
            content: SecondaryContent::new(),
            engine: TransitionEngine::new(),
            gesture: GestureRouter::new(),
            config,
            expanded: false,
            binding: None,
            size_subscription: Some(size_subscription),
            last_width: ctx.host().width(id),
            command: None,
            command_parameter: None,
            on_status_changed: None,
            on_tapped: None,
            on_expanded_changed: None,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn primary_view(&self) -> Option<ViewId> {
        self.primary
    }

    pub fn secondary_view(&self) -> Option<ViewId> {
        self.content.view()
    }

    pub fn touch_handler_view(&self) -> Option<ViewId> {
        self.touch_handler
    }

    pub fn template(&self) -> Option<&DataTemplate<H>> {
        self.content.template()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn status(&self) -> ExpandStatus {
        self.engine.status()
    }

    pub fn config(&self) -> &ExpandableConfig {
        &self.config
    }

    pub fn binding_context(&self) -> Option<&BindingContext> {
        self.binding.as_ref()
    }

    /// Height remembered from the last collapse, [`UNKNOWN_HEIGHT`] if none
    pub fn last_visible_height(&self) -> f32 {
        self.engine.last_visible_height()
    }

    pub fn transition_state(&self) -> &TransitionState {
        self.engine.state()
    }

    /// Replace the primary view; it always sits first in the child list
    pub fn set_primary_view(&mut self, ctx: &mut WidgetContext<H>, view: Option<ViewId>) {
        if self.primary == view {
            return;
        }
        let host = ctx.host_mut();
        if let Some(old) = self.primary.take() {
            host.remove_child(self.id, old);
        }
        if let Some(view) = view {
            host.insert_child(self.id, 0, view);
        }
        self.primary = view;
        self.attach_gesture(ctx);
    }

    /// Route taps from `view` instead of the primary view; `None` restores it
    pub fn set_touch_handler_view(&mut self, ctx: &mut WidgetContext<H>, view: Option<ViewId>) {
        self.touch_handler = view;
        self.attach_gesture(ctx);
    }

    /// Replace the secondary template and rebuild the content
    pub fn set_template(&mut self, ctx: &mut WidgetContext<H>, template: Option<DataTemplate<H>>) {
        self.content.set_template(template);
        self.rebuild(ctx, true);
        self.transition(ctx);
    }

    pub fn set_expanded(&mut self, ctx: &mut WidgetContext<H>, expanded: bool) {
        if self.expanded == expanded {
            return;
        }
        self.expanded = expanded;
        self.rebuild(ctx, false);
        self.transition(ctx);
    }

    pub fn toggle(&mut self, ctx: &mut WidgetContext<H>) {
        self.set_expanded(ctx, !self.expanded);
    }

    /// Re-measure the secondary view without changing the expanded state.
    ///
    /// Use after the content changed size on its own.
    pub fn force_update_size(&mut self, ctx: &mut WidgetContext<H>) {
        self.engine.invalidate_height();
        self.transition(ctx);
    }

    /// Rebind to a new data item: forgets measurements and rebuilds content
    pub fn set_binding_context(
        &mut self,
        ctx: &mut WidgetContext<H>,
        binding: Option<BindingContext>,
    ) {
        self.binding = binding;
        self.engine.invalidate_height();
        self.rebuild(ctx, true);
        self.transition(ctx);
    }

    /// Replace the configuration; takes effect with the next transition
    pub fn set_config(&mut self, config: ExpandableConfig) {
        self.config = config;
    }

    pub fn set_touch_to_expand(&mut self, enabled: bool) {
        self.config.touch_to_expand = enabled;
    }

    pub fn set_command(&mut self, command: Option<Command>, parameter: Option<CommandParameter>) {
        self.command = command;
        self.command_parameter = parameter;
    }

    /// Detach from the host: animations, subscriptions, gesture and content
    pub fn dispose(&mut self, ctx: &mut WidgetContext<H>) {
        let indicator = self.targets().indicator;
        let (host, scheduler) = ctx.parts_mut();

        if let Some(view) = self.content.view() {
            self.engine.cancel(scheduler, view, indicator);
        }
        self.gesture.detach(host, self.id);
        if let Some(subscription) = self.size_subscription.take() {
            host.unsubscribe(subscription);
        }
        self.content.clear(host, self.id);

        ctx.unregister_widget(self.id);
        tracing::debug!(view = ?self.id, "expandable disposed");
    }

    fn touch_target(&self) -> Option<ViewId> {
        self.touch_handler.or(self.primary)
    }

    fn attach_gesture(&mut self, ctx: &mut WidgetContext<H>) {
        let previous = self.gesture.target();
        let target = self.touch_target();

        if previous != target && self.config.rotate_indicator {
            let (host, scheduler) = ctx.parts_mut();
            if let Some(previous) = previous {
                scheduler.abort(previous, ROTATE_ANIMATION);
                host.set_rotation(previous, 0.0);
            }
            if let Some(target) = target {
                host.set_rotation(target, indicator_angle(self.expanded));
            }
        }
        self.gesture.attach(ctx.host_mut(), self.id, target);
    }

    fn targets(&self) -> TransitionTargets {
        TransitionTargets {
            owner: self.id,
            indicator: self
                .config
                .rotate_indicator
                .then(|| self.touch_target())
                .flatten(),
        }
    }

    fn rebuild(&mut self, ctx: &mut WidgetContext<H>, force: bool) {
        let previous = self.content.view();
        let indicator = self.targets().indicator;
        let (host, scheduler) = ctx.parts_mut();
        let outcome = self.content.rebuild(
            host,
            self.id,
            self.binding.as_ref(),
            self.expanded,
            force,
        );
        if matches!(outcome, Rebuild::Replaced | Rebuild::Cleared) {
            // The outgoing view may still be mid-transition
            if let Some(previous) = previous {
                self.engine.cancel(scheduler, previous, indicator);
            }
            let secondary = self.content.view();
            if let Some(record) = ctx.get_widget_state_mut::<ExpandableRecord>(self.id) {
                record.secondary = secondary;
            }
        }
    }

    fn transition(&mut self, ctx: &mut WidgetContext<H>) {
        let targets = self.targets();
        let (host, scheduler) = ctx.parts_mut();
        let statuses = self.engine.run(
            host,
            scheduler,
            &mut self.content,
            targets,
            self.expanded,
            &self.config,
        );
        self.emit(ctx, statuses);
    }

    fn emit(&mut self, ctx: &mut WidgetContext<H>, statuses: Statuses) {
        if statuses.is_empty() {
            return;
        }
        ctx.mark_dirty(self.id);
        for status in statuses {
            tracing::debug!(view = ?self.id, ?status, "expand status changed");
            if let Some(callback) = self.on_status_changed.as_mut() {
                callback(status);
            }
        }
    }

    fn handle_tap(&mut self, ctx: &mut WidgetContext<H>) {
        remeasure_ancestors(ctx, self.id);

        if let Some(command) = self.command.as_mut() {
            command(self.command_parameter.as_ref());
        }
        if let Some(callback) = self.on_tapped.as_mut() {
            callback();
        }

        if self.config.touch_to_expand {
            let expanded = !self.expanded;
            self.set_expanded(ctx, expanded);
            if let Some(callback) = self.on_expanded_changed.as_mut() {
                callback(expanded);
            }
        }
    }

    fn handle_size_changed(&mut self, ctx: &mut WidgetContext<H>, subscription: SubscriptionId) {
        if self.content.is_measurement(subscription) {
            let targets = self.targets();
            let (host, scheduler) = ctx.parts_mut();
            let statuses =
                self.engine
                    .on_measured(host, scheduler, &mut self.content, targets, &self.config);
            self.emit(ctx, statuses);
            return;
        }

        if self.size_subscription != Some(subscription) {
            return;
        }
        let width = ctx.host().width(self.id);
        let previous = std::mem::replace(&mut self.last_width, width);
        if previous > 0.0 && (width - previous).abs() > f32::EPSILON {
            tracing::debug!(view = ?self.id, previous, width, "container width changed");
            self.force_update_size(ctx);
        }
    }
}

impl<H: LayoutHost> Widget<H> for Expandable<H> {
    fn id(&self) -> ViewId {
        self.id
    }

    fn handle_event(&mut self, ctx: &mut WidgetContext<H>, event: &Event) {
        match event.data {
            EventData::Tap if event.target == self.id => self.handle_tap(ctx),
            EventData::SizeChanged { subscription, .. } => {
                self.handle_size_changed(ctx, subscription)
            }
            EventData::AnimationFinished {
                name,
                generation,
                interrupted,
            } if name == EXPAND_ANIMATION && self.content.view() == Some(event.target) => {
                let statuses = self.engine.on_animation_finished(
                    ctx.host_mut(),
                    event.target,
                    generation,
                    interrupted,
                );
                self.emit(ctx, statuses);
            }
            _ => {}
        }
    }
}

/// Create an expandable builder
pub fn expandable<H: LayoutHost>() -> ExpandableBuilder<H> {
    ExpandableBuilder::new()
}

/// Builder for creating expandables
pub struct ExpandableBuilder<H: LayoutHost> {
    config: ExpandableConfig,
    primary: Option<ViewId>,
    touch_handler: Option<ViewId>,
    template: Option<DataTemplate<H>>,
    expanded: bool,
    binding: Option<BindingContext>,
    command: Option<Command>,
    command_parameter: Option<CommandParameter>,
    on_status_changed: Option<StatusCallback>,
    on_tapped: Option<TapCallback>,
    on_expanded_changed: Option<ExpandedCallback>,
}

impl<H: LayoutHost> Default for ExpandableBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: LayoutHost> ExpandableBuilder<H> {
    pub fn new() -> Self {
        Self {
            config: ExpandableConfig::default(),
            primary: None,
            touch_handler: None,
            template: None,
            expanded: false,
            binding: None,
            command: None,
            command_parameter: None,
            on_status_changed: None,
            on_tapped: None,
            on_expanded_changed: None,
        }
    }

    pub fn config(mut self, config: ExpandableConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the explicit expanded height
    pub fn height(mut self, height: f32) -> Self {
        self.config.height = height;
        self
    }

    pub fn primary(mut self, view: ViewId) -> Self {
        self.primary = Some(view);
        self
    }

    pub fn touch_handler(mut self, view: ViewId) -> Self {
        self.touch_handler = Some(view);
        self
    }

    pub fn template(mut self, template: DataTemplate<H>) -> Self {
        self.template = Some(template);
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn binding_context(mut self, binding: BindingContext) -> Self {
        self.binding = Some(binding);
        self
    }

    pub fn command<F>(mut self, command: F) -> Self
    where
        F: FnMut(Option<&CommandParameter>) + Send + 'static,
    {
        self.command = Some(Box::new(command));
        self
    }

    pub fn command_parameter(mut self, parameter: CommandParameter) -> Self {
        self.command_parameter = Some(parameter);
        self
    }

    pub fn on_status_changed<F: FnMut(ExpandStatus) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_status_changed = Some(Box::new(callback));
        self
    }

    pub fn on_tapped<F: FnMut() + Send + 'static>(mut self, callback: F) -> Self {
        self.on_tapped = Some(Box::new(callback));
        self
    }

    pub fn on_expanded_changed<F: FnMut(bool) + Send + 'static>(mut self, callback: F) -> Self {
        self.on_expanded_changed = Some(Box::new(callback));
        self
    }

    /// Build the expandable on the composite view `id`
    pub fn build(self, ctx: &mut WidgetContext<H>, id: ViewId) -> Expandable<H> {
        let mut expandable = Expandable::with_config(ctx, id, self.config);
        expandable.binding = self.binding;
        expandable.command = self.command;
        expandable.command_parameter = self.command_parameter;
        expandable.on_status_changed = self.on_status_changed;
        expandable.on_tapped = self.on_tapped;
        expandable.on_expanded_changed = self.on_expanded_changed;

        expandable.set_primary_view(ctx, self.primary);
        expandable.set_touch_handler_view(ctx, self.touch_handler);
        expandable.content.set_template(self.template);
        expandable.expanded = self.expanded;

        expandable.rebuild(ctx, false);
        expandable.transition(ctx);
        expandable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unfold_core::{ViewNode, ViewTree};

    fn setup() -> (WidgetContext<ViewTree>, ViewId, ViewId) {
        let mut tree = ViewTree::new();
        let page = tree.page();
        let view = tree.create(ViewNode::stack());
        let header = tree.create(ViewNode::leaf(24.0));
        tree.add_child(page, view);
        (WidgetContext::new(tree), view, header)
    }

    fn body() -> DataTemplate<ViewTree> {
        DataTemplate::new(|tree: &mut ViewTree| Some(tree.create(ViewNode::leaf(60.0))))
    }

    #[test]
    fn test_collapsed_build_is_lazy() {
        let (mut ctx, view, header) = setup();
        let panel = expandable().primary(header).template(body()).build(&mut ctx, view);

        assert_eq!(panel.secondary_view(), None);
        assert_eq!(ctx.host().children(view), &[header]);
        assert_eq!(ctx.host().node(header).unwrap().tap_owners(), &[view]);
        assert_eq!(
            ctx.get_widget_state::<ExpandableRecord>(view).map(|r| r.secondary),
            Some(None)
        );
    }

    #[test]
    fn test_new_template_builds_hidden_content() {
        let (mut ctx, view, header) = setup();
        let mut panel = expandable().primary(header).build(&mut ctx, view);

        panel.set_template(&mut ctx, Some(body()));

        let secondary = panel.secondary_view().unwrap();
        assert!(!ctx.host().is_visible(secondary));
        assert_eq!(ctx.host().children(view), &[header, secondary]);
        assert_eq!(panel.status(), ExpandStatus::Collapsed);
        assert_eq!(
            ctx.get_widget_state::<ExpandableRecord>(view).and_then(|r| r.secondary),
            Some(secondary)
        );
    }

    #[test]
    fn test_primary_stays_first() {
        let (mut ctx, view, header) = setup();
        let mut panel = expandable()
            .primary(header)
            .template(body())
            .expanded(true)
            .height(60.0)
            .build(&mut ctx, view);
        let secondary = panel.secondary_view().unwrap();

        let replacement = ctx.host_mut().create(ViewNode::leaf(30.0));
        panel.set_primary_view(&mut ctx, Some(replacement));

        assert_eq!(ctx.host().children(view), &[replacement, secondary]);
        assert_eq!(ctx.host().parent(header), None);
        assert!(ctx.host().node(header).unwrap().tap_owners().is_empty());
        assert_eq!(ctx.host().node(replacement).unwrap().tap_owners(), &[view]);
    }

    #[test]
    fn test_touch_handler_takes_over_recognizer() {
        let (mut ctx, view, header) = setup();
        let chevron = ctx.host_mut().create(ViewNode::leaf(12.0));
        ctx.host_mut().add_child(header, chevron);
        let mut panel = expandable().primary(header).build(&mut ctx, view);

        panel.set_touch_handler_view(&mut ctx, Some(chevron));
        assert!(ctx.host().node(header).unwrap().tap_owners().is_empty());
        assert_eq!(ctx.host().node(chevron).unwrap().tap_owners(), &[view]);

        panel.set_touch_handler_view(&mut ctx, None);
        assert_eq!(ctx.host().node(header).unwrap().tap_owners(), &[view]);
        assert_eq!(panel.touch_handler_view(), None);
    }

    #[test]
    fn test_set_expanded_same_value_is_ignored() {
        let (mut ctx, view, header) = setup();
        let mut panel = expandable().primary(header).template(body()).build(&mut ctx, view);

        panel.set_expanded(&mut ctx, false);
        assert_eq!(panel.secondary_view(), None);
        assert!(ctx.take_dirty().is_empty());
    }

    #[test]
    fn test_status_changes_mark_widget_dirty() {
        let (mut ctx, view, header) = setup();
        let mut panel = expandable()
            .primary(header)
            .template(body())
            .height(60.0)
            .build(&mut ctx, view);

        panel.set_expanded(&mut ctx, true);
        assert_eq!(panel.status(), ExpandStatus::Expanded);
        assert_eq!(ctx.take_dirty(), vec![view]);
    }
}
