//! Expand/collapse transitions
//!
//! Each request aborts the running transition, works out start and end
//! heights for the secondary view and then either animates between them,
//! snaps (while the container has no height yet), or waits for the secondary
//! view to report its natural height.

use smallvec::SmallVec;
use unfold_animation::{AnimatedProperty, AnimationRequest, AnimationScheduler, Easing};
use unfold_core::{LayoutHost, ViewId, AUTO_HEIGHT};

use super::config::ExpandableConfig;
use super::content::SecondaryContent;
use super::height::HeightTracker;
use super::status::{status_machine, ExpandStatus, StatusMachine, StatusTrigger};

/// Animation name for the secondary view's height
pub const EXPAND_ANIMATION: &str = "expandAnimation";
/// Animation name for the indicator rotation
pub const ROTATE_ANIMATION: &str = "rotateAnimation";

const MIN_DURATION_MS: u32 = 1;
/// Height differences below this are treated as "already there"
const HEIGHT_EPSILON: f32 = 0.5;

/// Statuses entered by one step, in order
pub type Statuses = SmallVec<[ExpandStatus; 2]>;

/// Views taking part in a transition
#[derive(Clone, Copy, Debug)]
pub struct TransitionTargets {
    /// The expandable's composite view
    pub owner: ViewId,
    /// Rotated alongside the height when set
    pub indicator: Option<ViewId>,
}

/// Values of the current (or last) transition
#[derive(Clone, Copy, Debug, Default)]
pub struct TransitionState {
    pub start_height: f32,
    pub end_height: f32,
    pub is_animating: bool,
    pub should_skip_animation: bool,
    expanding: bool,
    generation: Option<u64>,
}

pub struct TransitionEngine {
    state: TransitionState,
    tracker: HeightTracker,
    status: StatusMachine,
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self {
            state: TransitionState::default(),
            tracker: HeightTracker::new(),
            status: status_machine(),
        }
    }
}

impl TransitionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> ExpandStatus {
        self.status.current_state()
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn last_visible_height(&self) -> f32 {
        self.tracker.last_known()
    }

    /// Forget the remembered height so the next expansion re-measures
    pub fn invalidate_height(&mut self) {
        self.tracker.invalidate();
    }

    /// Start a transition towards `expanding`
    pub fn run<H: LayoutHost>(
        &mut self,
        host: &mut H,
        scheduler: &mut AnimationScheduler,
        content: &mut SecondaryContent<H>,
        targets: TransitionTargets,
        expanding: bool,
        config: &ExpandableConfig,
    ) -> Statuses {
        let Some(view) = content.view() else {
            return Statuses::new();
        };

        content.detach_measurement_listener(host);
        let was_animating = self.cancel(scheduler, view, targets.indicator);

        let visible = host.is_visible(view);
        let measured = if visible {
            measure(host, view, config)
        } else {
            None
        };
        let configured = config.configured_height();

        self.state.start_height = measured.unwrap_or(0.0);
        self.state.expanding = expanding;

        if expanding {
            host.set_visible(view, true);
            let end = self.tracker.reference(configured);
            if end <= 0.0 {
                tracing::debug!(?view, "secondary height unknown, waiting for measurement");
                host.set_height_request(view, AUTO_HEIGHT);
                content.attach_measurement_listener(host);
                return Statuses::new();
            }
            self.state.end_height = end;
        } else {
            if !visible {
                host.set_height_request(view, 0.0);
                return self.status.send(StatusTrigger::Settle).into_iter().collect();
            }
            if let (Some(height), false) = (measured, was_animating) {
                self.tracker.record_visible_height(height, configured);
            }
            self.state.end_height = 0.0;
        }

        self.animate(host, scheduler, view, targets, config)
    }

    /// Resume a deferred expansion once the secondary view has been measured.
    ///
    /// A zero or unresolved measurement keeps the listener attached.
    pub fn on_measured<H: LayoutHost>(
        &mut self,
        host: &mut H,
        scheduler: &mut AnimationScheduler,
        content: &mut SecondaryContent<H>,
        targets: TransitionTargets,
        config: &ExpandableConfig,
    ) -> Statuses {
        let Some(view) = content.view() else {
            return Statuses::new();
        };
        if !self.state.expanding {
            content.detach_measurement_listener(host);
            return Statuses::new();
        }
        let Some(height) = measure(host, view, config).filter(|h| *h > 0.0) else {
            return Statuses::new();
        };

        content.detach_measurement_listener(host);
        host.set_height_request(view, self.state.start_height);
        self.state.end_height = height;

        tracing::debug!(?view, height, "secondary view measured");
        self.animate(host, scheduler, view, targets, config)
    }

    /// Finish the height animation identified by `generation`.
    ///
    /// Interrupted or superseded runs are ignored.
    pub fn on_animation_finished<H: LayoutHost>(
        &mut self,
        host: &mut H,
        view: ViewId,
        generation: u64,
        interrupted: bool,
    ) -> Statuses {
        if interrupted || self.state.generation != Some(generation) {
            return Statuses::new();
        }

        self.state.generation = None;
        self.state.is_animating = false;

        if !self.state.expanding {
            host.set_visible(view, false);
        }
        self.status.send(StatusTrigger::Settle).into_iter().collect()
    }

    /// Abort any running transition, returning whether one was in flight
    pub fn cancel(
        &mut self,
        scheduler: &mut AnimationScheduler,
        view: ViewId,
        indicator: Option<ViewId>,
    ) -> bool {
        let was_animating = scheduler.abort(view, EXPAND_ANIMATION);
        if let Some(indicator) = indicator {
            scheduler.abort(indicator, ROTATE_ANIMATION);
        }
        self.state.is_animating = false;
        self.state.generation = None;
        was_animating
    }

    fn animate<H: LayoutHost>(
        &mut self,
        host: &mut H,
        scheduler: &mut AnimationScheduler,
        view: ViewId,
        targets: TransitionTargets,
        config: &ExpandableConfig,
    ) -> Statuses {
        let expanding = self.state.expanding;
        let start = self.state.start_height.max(0.0);
        let end = self.state.end_height.max(0.0);
        self.state.start_height = start;
        self.state.end_height = end;

        let settled = if expanding {
            ExpandStatus::Expanded
        } else {
            ExpandStatus::Collapsed
        };
        if (end - start).abs() < HEIGHT_EPSILON && self.status.is_in(settled) {
            host.set_height_request(view, end);
            host.set_visible(view, expanding);
            return Statuses::new();
        }

        let trigger = if expanding {
            StatusTrigger::BeginExpand
        } else {
            StatusTrigger::BeginCollapse
        };
        let mut emitted: Statuses = self.status.send(trigger).into_iter().collect();

        self.state.should_skip_animation = host.height(targets.owner) < 0.0;
        if self.state.should_skip_animation {
            tracing::debug!(?view, end, "container unresolved, snapping");
            host.set_height_request(view, end);
            host.set_visible(view, expanding);
            if let Some(indicator) = targets.indicator {
                host.set_rotation(indicator, indicator_angle(expanding));
            }
            emitted.extend(self.status.send(StatusTrigger::Settle));
            return emitted;
        }

        let duration_ms = self.duration_ms(config, start, end);
        let handle = scheduler.commit(
            AnimationRequest::new(view, EXPAND_ANIMATION, AnimatedProperty::HeightRequest)
                .from_to(start, end)
                .duration(duration_ms)
                .easing(config.easing_for(expanding)),
        );

        if let Some(indicator) = targets.indicator {
            scheduler.commit(
                AnimationRequest::new(indicator, ROTATE_ANIMATION, AnimatedProperty::Rotation)
                    .from_to(indicator_angle(!expanding), indicator_angle(expanding))
                    .duration(duration_ms)
                    .easing(Easing::BounceIn),
            );
        }

        self.state.generation = Some(handle.generation);
        self.state.is_animating = true;

        tracing::debug!(?view, start, end, duration_ms, expanding, "transition started");
        emitted
    }

    /// Configured duration, scaled by the share of the full height travelled
    fn duration_ms(&self, config: &ExpandableConfig, start: f32, end: f32) -> u32 {
        let base = config.duration_ms(self.state.expanding);
        if !config.proportional_duration {
            return base.max(MIN_DURATION_MS);
        }

        let reference = self.tracker.reference(config.configured_height());
        if reference <= 0.0 {
            return base.max(MIN_DURATION_MS);
        }

        let fraction = ((end - start).abs() / reference).min(1.0);
        ((base as f32 * fraction).round() as u32).max(MIN_DURATION_MS)
    }
}

/// Rendered height of `view` without padding, `None` while unresolved
fn measure<H: LayoutHost>(host: &H, view: ViewId, config: &ExpandableConfig) -> Option<f32> {
    let height = host.height(view);
    if height < 0.0 {
        return None;
    }
    let padding = if config.subtract_padding {
        host.vertical_padding(view)
    } else {
        0.0
    };
    Some((height - padding).max(0.0))
}

/// Indicator angle in degrees for the given state
pub(crate) fn indicator_angle(expanded: bool) -> f32 {
    if expanded {
        180.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expandable::template::DataTemplate;
    use unfold_core::{ViewNode, ViewTree};

    struct Rig {
        tree: ViewTree,
        scheduler: AnimationScheduler,
        content: SecondaryContent<ViewTree>,
        targets: TransitionTargets,
    }

    fn rig(laid_out: bool) -> Rig {
        let mut tree = ViewTree::new();
        let page = tree.page();
        let owner = tree.create(ViewNode::stack());
        let header = tree.create(ViewNode::leaf(20.0));
        tree.add_child(page, owner);
        tree.add_child(owner, header);

        let mut content = SecondaryContent::new();
        content.set_template(Some(DataTemplate::new(|tree: &mut ViewTree| {
            Some(tree.create(ViewNode::leaf(60.0)))
        })));
        content.rebuild(&mut tree, owner, None, true, false);

        if laid_out {
            tree.layout(page, 100.0);
        }
        Rig {
            tree,
            scheduler: AnimationScheduler::new(),
            content,
            targets: TransitionTargets {
                owner,
                indicator: None,
            },
        }
    }

    impl Rig {
        fn run(
            &mut self,
            engine: &mut TransitionEngine,
            expanding: bool,
            config: &ExpandableConfig,
        ) -> Statuses {
            engine.run(
                &mut self.tree,
                &mut self.scheduler,
                &mut self.content,
                self.targets,
                expanding,
                config,
            )
        }

        fn view(&self) -> ViewId {
            self.content.view().unwrap()
        }
    }

    #[test]
    fn test_no_content_is_a_no_op() {
        let mut tree = ViewTree::new();
        let owner = tree.create(ViewNode::stack());
        let mut content = SecondaryContent::new();
        let mut scheduler = AnimationScheduler::new();
        let mut engine = TransitionEngine::new();

        let statuses = engine.run(
            &mut tree,
            &mut scheduler,
            &mut content,
            TransitionTargets {
                owner,
                indicator: None,
            },
            true,
            &ExpandableConfig::default(),
        );

        assert!(statuses.is_empty());
        assert_eq!(engine.status(), ExpandStatus::Collapsed);
    }

    #[test]
    fn test_unknown_height_defers_expansion() {
        let mut rig = rig(true);
        let mut engine = TransitionEngine::new();
        let config = ExpandableConfig::default();

        assert!(rig.run(&mut engine, true, &config).is_empty());
        let view = rig.view();
        assert!(rig.tree.is_visible(view));
        assert_eq!(rig.tree.height_request(view), AUTO_HEIGHT);
        assert!(rig.content.is_measuring());
        assert!(!rig.scheduler.has_active_animations());
    }

    #[test]
    fn test_unresolved_container_snaps() {
        let mut rig = rig(false);
        let mut engine = TransitionEngine::new();
        let config = ExpandableConfig::new().height(50.0);

        let statuses = rig.run(&mut engine, true, &config);
        assert_eq!(statuses.as_slice(), &[ExpandStatus::Expanding, ExpandStatus::Expanded]);
        assert!(engine.state().should_skip_animation);
        assert_eq!(rig.tree.height_request(rig.view()), 50.0);
        assert!(!rig.scheduler.has_active_animations());
    }

    #[test]
    fn test_padding_beyond_rendered_height_clamps_start() {
        let mut rig = rig(true);
        let view = rig.view();
        let page = rig.tree.parent(rig.targets.owner).unwrap();
        rig.tree.set_visible(view, true);
        rig.tree.layout(page, 100.0);
        assert_eq!(rig.tree.height(view), 0.0);

        // Padding changed since the last layout pass
        rig.tree.set_padding(view, 8.0, 8.0);
        let config = ExpandableConfig::new().height(50.0);
        assert_eq!(measure(&rig.tree, view, &config), Some(0.0));

        let mut engine = TransitionEngine::new();
        rig.run(&mut engine, true, &config);
        assert_eq!(engine.state().start_height, 0.0);
        assert_eq!(engine.state().end_height, 50.0);
        assert_eq!(rig.scheduler.value(view, EXPAND_ANIMATION), Some(0.0));

        while rig.scheduler.has_active_animations() {
            rig.scheduler.tick(16.0, &mut rig.tree);
            assert!(rig.tree.height_request(view) >= 0.0);
        }
        assert_eq!(rig.tree.height_request(view), 50.0);
    }

    #[test]
    fn test_superseded_completion_is_ignored() {
        let mut rig = rig(true);
        let mut engine = TransitionEngine::new();
        let config = ExpandableConfig::new().height(50.0);

        rig.run(&mut engine, true, &config);
        let stale = engine.state().generation.unwrap();
        rig.run(&mut engine, false, &config);

        let view = rig.view();
        assert!(engine
            .on_animation_finished(&mut rig.tree, view, stale, false)
            .is_empty());
        assert_eq!(engine.status(), ExpandStatus::Collapsing);
    }

    #[test]
    fn test_partial_collapse_is_proportionally_shorter() {
        let mut engine = TransitionEngine::new();
        let config = ExpandableConfig::new().height(100.0).collapse_duration(200);

        engine.state.expanding = false;
        assert_eq!(engine.duration_ms(&config, 100.0, 0.0), 200);
        assert_eq!(engine.duration_ms(&config, 25.0, 0.0), 50);
        assert_eq!(engine.duration_ms(&config, 0.1, 0.0), MIN_DURATION_MS);

        let fixed = config.clone().proportional_duration(false);
        assert_eq!(engine.duration_ms(&fixed, 25.0, 0.0), 200);
    }
}
