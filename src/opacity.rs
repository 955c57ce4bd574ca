use std::time::{Duration, Instant};

/// Linear fade of the widget opacity between hover and rest.
#[derive(Debug, Clone)]
pub struct OpacityTransition {
    from: f32,
    to: f32,
    duration: Duration,
    started: Option<Instant>,
}

impl OpacityTransition {
    pub fn new(initial: f32, duration: Duration) -> Self {
        Self {
            from: initial,
            to: initial,
            duration,
            started: None,
        }
    }

    /// Start fading toward `target` from wherever the fade currently is.
    pub fn start(&mut self, target: f32, now: Instant) {
        let target = target.clamp(0.0, 1.0);
        if target == self.to {
            return;
        }
        self.from = self.value_at(now);
        self.to = target;
        self.started = Some(now);
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn value_at(&self, now: Instant) -> f32 {
        let Some(started) = self.started else {
            return self.to;
        };
        if self.duration.is_zero() {
            return self.to;
        }
        let t = now.saturating_duration_since(started).as_secs_f32() / self.duration.as_secs_f32();
        if t >= 1.0 {
            self.to
        } else {
            self.from + (self.to - self.from) * t
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.started
            .is_some_and(|s| now.saturating_duration_since(s) < self.duration)
    }
}
