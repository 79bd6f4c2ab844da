//! Event types
//!
//! Notifications flowing from the host and the animation scheduler back to
//! widgets. Everything is delivered on the UI thread, in queue order.

use crate::host::{SubscriptionId, ViewId};

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    /// A tap recognizer fired; the target is the recognizer's owner
    pub const TAP: EventType = 1;
    /// A subscribed view changed size
    pub const SIZE_CHANGED: EventType = 2;
    /// A committed animation finished or was aborted
    pub const ANIMATION_FINISHED: EventType = 3;
}

/// A UI event with associated data
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub target: ViewId,
    pub data: EventData,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Tap,
    SizeChanged {
        subscription: SubscriptionId,
        width: f32,
        height: f32,
    },
    AnimationFinished {
        /// Name the animation was committed under
        name: &'static str,
        /// Commit generation, unique per scheduler
        generation: u64,
        /// True when a newer commit or an explicit abort ended the run
        interrupted: bool,
    },
}

impl Event {
    pub fn tap(owner: ViewId) -> Self {
        Self {
            event_type: event_types::TAP,
            target: owner,
            data: EventData::Tap,
        }
    }

    pub fn size_changed(view: ViewId, subscription: SubscriptionId, width: f32, height: f32) -> Self {
        Self {
            event_type: event_types::SIZE_CHANGED,
            target: view,
            data: EventData::SizeChanged {
                subscription,
                width,
                height,
            },
        }
    }

    pub fn animation_finished(
        target: ViewId,
        name: &'static str,
        generation: u64,
        interrupted: bool,
    ) -> Self {
        Self {
            event_type: event_types::ANIMATION_FINISHED,
            target,
            data: EventData::AnimationFinished {
                name,
                generation,
                interrupted,
            },
        }
    }
}
