//! Unfold Animation System
//!
//! Eased tweens and the scheduler that drives them.
//!
//! # Features
//!
//! - **Easing**: named interpolation curves, plus caller-supplied functions
//! - **Tweens**: fixed-duration interpolation between two values
//! - **Scheduler**: animations committed by `(view, name)`, aborted by name,
//!   writing frames straight to a [`LayoutHost`](unfold_core::LayoutHost)

pub mod easing;
pub mod scheduler;
pub mod tween;

pub use easing::Easing;
pub use scheduler::{AnimatedProperty, AnimationHandle, AnimationRequest, AnimationScheduler};
pub use tween::Tween;
