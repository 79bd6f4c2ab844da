//! Animation scheduler
//!
//! Manages all active animations and writes their values to the host each
//! frame. Animations are addressed by `(target view, name)`: committing under
//! a name that is already running aborts the previous run first, so at most
//! one animation per name and target is ever active.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use unfold_core::{Event, LayoutHost, ViewId};

use crate::easing::Easing;
use crate::tween::Tween;

new_key_type! {
    pub struct AnimationId;
}

/// The view property an animation writes to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatedProperty {
    HeightRequest,
    Rotation,
}

impl AnimatedProperty {
    fn apply<H: LayoutHost + ?Sized>(self, host: &mut H, view: ViewId, value: f32) {
        match self {
            AnimatedProperty::HeightRequest => host.set_height_request(view, value),
            AnimatedProperty::Rotation => host.set_rotation(view, value),
        }
    }
}

/// Everything needed to commit an animation
#[derive(Clone, Copy, Debug)]
pub struct AnimationRequest {
    pub target: ViewId,
    pub name: &'static str,
    pub property: AnimatedProperty,
    pub from: f32,
    pub to: f32,
    pub duration_ms: u32,
    pub easing: Easing,
}

impl AnimationRequest {
    pub fn new(target: ViewId, name: &'static str, property: AnimatedProperty) -> Self {
        Self {
            target,
            name,
            property,
            from: 0.0,
            to: 0.0,
            duration_ms: 250,
            easing: Easing::Linear,
        }
    }

    pub fn from_to(mut self, from: f32, to: f32) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// Returned by [`AnimationScheduler::commit`]; matches the completion event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationHandle {
    pub id: AnimationId,
    pub target: ViewId,
    pub name: &'static str,
    pub generation: u64,
}

struct ActiveAnimation {
    target: ViewId,
    name: &'static str,
    property: AnimatedProperty,
    tween: Tween,
    generation: u64,
}

/// The animation scheduler that ticks all active animations
#[derive(Default)]
pub struct AnimationScheduler {
    animations: SlotMap<AnimationId, ActiveAnimation>,
    next_generation: u64,
    pending: Vec<Event>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an animation, superseding any run with the same target and name
    pub fn commit(&mut self, request: AnimationRequest) -> AnimationHandle {
        self.abort(request.target, request.name);

        self.next_generation += 1;
        let generation = self.next_generation;

        let mut tween = Tween::new(request.from, request.to, request.duration_ms, request.easing);
        tween.start();

        let id = self.animations.insert(ActiveAnimation {
            target: request.target,
            name: request.name,
            property: request.property,
            tween,
            generation,
        });

        tracing::trace!(
            name = request.name,
            from = request.from,
            to = request.to,
            duration_ms = tween.duration_ms(),
            generation,
            "animation committed"
        );

        AnimationHandle {
            id,
            target: request.target,
            name: request.name,
            generation,
        }
    }

    /// Abort the named animation on `target`.
    ///
    /// Returns whether one was running. The aborted run still reports an
    /// interrupted completion through the event queue.
    pub fn abort(&mut self, target: ViewId, name: &'static str) -> bool {
        let Some(id) = self.find(target, name) else {
            return false;
        };
        if let Some(animation) = self.animations.remove(id) {
            self.pending.push(Event::animation_finished(
                animation.target,
                animation.name,
                animation.generation,
                true,
            ));
        }
        true
    }

    pub fn is_running(&self, target: ViewId, name: &'static str) -> bool {
        self.find(target, name).is_some()
    }

    /// Current value of the named animation, if running
    pub fn value(&self, target: ViewId, name: &'static str) -> Option<f32> {
        self.find(target, name)
            .and_then(|id| self.animations.get(id))
            .map(|a| a.tween.value())
    }

    /// Tick all animations, writing frames to `host`.
    ///
    /// Returns the completion events queued since the last drain, including
    /// runs finished by this tick.
    pub fn tick<H: LayoutHost + ?Sized>(&mut self, dt_ms: f32, host: &mut H) -> Vec<Event> {
        let mut finished: SmallVec<[AnimationId; 4]> = SmallVec::new();

        for (id, animation) in self.animations.iter_mut() {
            animation.tween.tick(dt_ms);
            animation
                .property
                .apply(host, animation.target, animation.tween.value());

            if !animation.tween.is_playing() {
                finished.push(id);
            }
        }

        for id in finished {
            if let Some(animation) = self.animations.remove(id) {
                self.pending.push(Event::animation_finished(
                    animation.target,
                    animation.name,
                    animation.generation,
                    false,
                ));
            }
        }

        self.drain_events()
    }

    /// Take queued completion events without advancing time
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }

    /// Check if any animations are still active
    pub fn has_active_animations(&self) -> bool {
        !self.animations.is_empty()
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    fn find(&self, target: ViewId, name: &'static str) -> Option<AnimationId> {
        self.animations
            .iter()
            .find(|(_, a)| a.target == target && a.name == name)
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unfold_core::{EventData, ViewNode, ViewTree};

    const HEIGHT: &str = "height";

    fn finished(events: &[Event]) -> Vec<(u64, bool)> {
        events
            .iter()
            .filter_map(|e| match e.data {
                EventData::AnimationFinished {
                    generation,
                    interrupted,
                    ..
                } => Some((generation, interrupted)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_frames_are_written_to_host() {
        let mut tree = ViewTree::new();
        let view = tree.create(ViewNode::leaf(0.0));
        let mut scheduler = AnimationScheduler::new();

        let handle = scheduler.commit(
            AnimationRequest::new(view, HEIGHT, AnimatedProperty::HeightRequest)
                .from_to(0.0, 100.0)
                .duration(100),
        );

        assert!(scheduler.tick(50.0, &mut tree).is_empty());
        assert!((tree.height_request(view) - 50.0).abs() < 1e-3);

        let events = scheduler.tick(60.0, &mut tree);
        assert_eq!(tree.height_request(view), 100.0);
        assert_eq!(finished(&events), vec![(handle.generation, false)]);
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_commit_supersedes_same_name() {
        let mut tree = ViewTree::new();
        let view = tree.create(ViewNode::leaf(0.0));
        let mut scheduler = AnimationScheduler::new();

        let first = scheduler.commit(
            AnimationRequest::new(view, HEIGHT, AnimatedProperty::HeightRequest).from_to(0.0, 10.0),
        );
        let second = scheduler.commit(
            AnimationRequest::new(view, HEIGHT, AnimatedProperty::HeightRequest).from_to(10.0, 0.0),
        );

        assert_eq!(scheduler.animation_count(), 1);
        assert_eq!(
            finished(&scheduler.drain_events()),
            vec![(first.generation, true)]
        );
        assert!(second.generation > first.generation);
    }

    #[test]
    fn test_abort_by_name() {
        let mut tree = ViewTree::new();
        let view = tree.create(ViewNode::leaf(0.0));
        let mut scheduler = AnimationScheduler::new();

        scheduler.commit(AnimationRequest::new(view, HEIGHT, AnimatedProperty::HeightRequest));
        scheduler.commit(
            AnimationRequest::new(view, "spin", AnimatedProperty::Rotation).from_to(0.0, 180.0),
        );

        assert!(scheduler.abort(view, HEIGHT));
        assert!(!scheduler.abort(view, HEIGHT));
        assert!(!scheduler.is_running(view, HEIGHT));
        assert!(scheduler.is_running(view, "spin"));

        let events = scheduler.tick(1000.0, &mut tree);
        assert_eq!(events.len(), 2);
        assert_eq!(tree.node(view).map(|n| n.rotation()), Some(180.0));
    }
}
