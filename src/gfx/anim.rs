use serde::{Deserialize, Serialize};

/// Easing curves, named after the tween presets used on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ease {
    None,
    Power1Out,
    Power2Out,
    BackOut(f32),
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::None => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::BackOut(overshoot) => {
                let u = t - 1.0;
                1.0 + (overshoot + 1.0) * u * u * u + overshoot * u * u
            }
        }
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[derive(Debug, Clone)]
pub struct Timeline {
    pub start_time: f32,
    pub duration: f32,
    pub current_time: f32,
}

impl Timeline {
    pub fn new(duration: f32) -> Self {
        Self {
            start_time: 0.0,
            duration,
            current_time: 0.0,
        }
    }

    /// Starts the timeline at `now`; a `delay` pushes the start into the future.
    pub fn start(&mut self, now: f32, delay: f32) {
        self.start_time = now + delay.max(0.0);
        self.current_time = now;
    }

    pub fn update(&mut self, now: f32) {
        self.current_time = now;
    }

    pub fn progress(&self) -> f32 {
        let elapsed = self.current_time - self.start_time;
        if self.duration <= 0.0 {
            return if elapsed >= 0.0 { 1.0 } else { 0.0 };
        }
        (elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    pub fn eased_progress(&self, ease: Ease) -> f32 {
        ease.apply(self.progress())
    }
}

/// Duration, delay and curve of one animated write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub duration: f32,
    pub delay: f32,
    pub ease: Ease,
}

impl Motion {
    pub const INSTANT: Motion = Motion {
        duration: 0.0,
        delay: 0.0,
        ease: Ease::None,
    };

    pub fn new(duration: f32, ease: Ease) -> Self {
        Self {
            duration,
            delay: 0.0,
            ease,
        }
    }

    pub fn delayed(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }
}

/// A single scalar animated from `from` to `to` along a [`Timeline`].
#[derive(Debug, Clone)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub ease: Ease,
    pub timeline: Timeline,
}

impl Tween {
    /// A tween that already sits at `value`.
    pub fn settled(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            ease: Ease::None,
            timeline: Timeline::new(0.0),
        }
    }

    pub fn new(from: f32, to: f32, motion: Motion, now: f32) -> Self {
        let mut timeline = Timeline::new(motion.duration);
        timeline.start(now, motion.delay);
        Self {
            from,
            to,
            ease: motion.ease,
            timeline,
        }
    }

    pub fn update(&mut self, now: f32) {
        self.timeline.update(now);
    }

    pub fn value(&self) -> f32 {
        lerp(self.from, self.to, self.timeline.eased_progress(self.ease))
    }

    pub fn is_complete(&self) -> bool {
        self.timeline.is_complete()
    }
}
