//! Fixed-duration tweens

use crate::easing::Easing;

/// Interpolates from one value to another over a duration
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: u32,
    easing: Easing,
    current_time: f32,
    playing: bool,
}

impl Tween {
    /// Create a stopped tween; a zero duration is treated as 1ms
    pub fn new(from: f32, to: f32, duration_ms: u32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(1),
            easing,
            current_time: 0.0,
            playing: false,
        }
    }

    pub fn start(&mut self) {
        self.current_time = 0.0;
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the tween has run its full duration
    pub fn is_finished(&self) -> bool {
        self.current_time >= self.duration_ms as f32
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn progress(&self) -> f32 {
        (self.current_time / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    /// Get the current interpolated value
    pub fn value(&self) -> f32 {
        let eased = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    /// Advance the tween by delta time (in milliseconds)
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.playing {
            return;
        }

        self.current_time += dt_ms.max(0.0);

        if self.is_finished() {
            self.current_time = self.duration_ms as f32;
            self.playing = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_tween() {
        let mut tween = Tween::new(0.0, 100.0, 200, Easing::Linear);
        tween.start();

        tween.tick(50.0);
        assert!((tween.value() - 25.0).abs() < 1e-4);
        assert!(tween.is_playing());

        tween.tick(500.0);
        assert_eq!(tween.value(), 100.0);
        assert!(!tween.is_playing());
        assert!(tween.is_finished());
    }

    #[test]
    fn test_unstarted_tween_does_not_advance() {
        let mut tween = Tween::new(10.0, 0.0, 100, Easing::Linear);
        tween.tick(50.0);
        assert_eq!(tween.value(), 10.0);
    }

    #[test]
    fn test_zero_duration_is_floored() {
        let mut tween = Tween::new(0.0, 1.0, 0, Easing::Linear);
        assert_eq!(tween.duration_ms(), 1);
        tween.start();
        tween.tick(1.0);
        assert_eq!(tween.value(), 1.0);
    }
}
