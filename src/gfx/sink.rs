//! Output side of every effect: where computed visibility, fill and pose land.

use super::anim::{lerp, Ease, Motion, Tween};
use crate::config::{FadeTiming, FillTiming};
use log::trace;
use std::collections::HashMap;

/// Identifies one animated element on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Step(usize),
    Line { step: usize, line: usize },
    Reveal(usize),
    RevealItem { reveal: usize, item: usize },
    Parallax(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visibility {
    pub opacity: f32,
    pub visible: bool,
}

impl Visibility {
    pub const SHOWN: Visibility = Visibility {
        opacity: 1.0,
        visible: true,
    };
    pub const HIDDEN: Visibility = Visibility {
        opacity: 0.0,
        visible: false,
    };
}

/// Offset, scale and opacity of a revealed or parallaxed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl Pose {
    pub const REST: Pose = Pose {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };

    pub fn lerp(a: Pose, b: Pose, t: f32) -> Pose {
        Pose {
            x: lerp(a.x, b.x, t),
            y: lerp(a.y, b.y, t),
            scale: lerp(a.scale, b.scale, t),
            opacity: lerp(a.opacity, b.opacity, t),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::REST
    }
}

/// Write contract between the effects and whatever renders them.
/// Smoothing of the written values is entirely up to the implementation.
pub trait EffectSink {
    fn set_visibility(&mut self, element: ElementRef, visibility: Visibility);

    fn set_fill_fraction(&mut self, element: ElementRef, fraction: f32);

    fn set_pose(&mut self, _element: ElementRef, _pose: Pose, _motion: Motion) {}
}

impl<S: EffectSink + ?Sized> EffectSink for &mut S {
    fn set_visibility(&mut self, element: ElementRef, visibility: Visibility) {
        (**self).set_visibility(element, visibility)
    }

    fn set_fill_fraction(&mut self, element: ElementRef, fraction: f32) {
        (**self).set_fill_fraction(element, fraction)
    }

    fn set_pose(&mut self, element: ElementRef, pose: Pose, motion: Motion) {
        (**self).set_pose(element, pose, motion)
    }
}

#[derive(Debug, Clone)]
struct PoseTween {
    from: Pose,
    to: Pose,
    tween: Tween,
}

impl PoseTween {
    fn value(&self) -> Pose {
        // The scalar tween runs 0 -> 1 and carries the eased progress.
        Pose::lerp(self.from, self.to, self.tween.value())
    }
}

/// Retained-mode sink that eases every element toward its last written target.
///
/// Step hides are instant and step shows fade in using the step timing; full
/// fills ease in, empty fills snap and partial fills track linearly. The first
/// write to an element snaps, like an initial `set` before any scrolling.
pub struct AnimatedSink {
    step_fade: FadeTiming,
    line_fill: FillTiming,
    now: f32,
    visible: HashMap<ElementRef, bool>,
    opacity: HashMap<ElementRef, Tween>,
    fill: HashMap<ElementRef, Tween>,
    poses: HashMap<ElementRef, PoseTween>,
}

impl AnimatedSink {
    pub fn new(step_fade: FadeTiming, line_fill: FillTiming) -> Self {
        Self {
            step_fade,
            line_fill,
            now: 0.0,
            visible: HashMap::new(),
            opacity: HashMap::new(),
            fill: HashMap::new(),
            poses: HashMap::new(),
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.step_fade, config.line_fill)
    }

    pub fn now(&self) -> f32 {
        self.now
    }

    /// Steps every running tween to `now` (seconds, monotonic).
    pub fn advance(&mut self, now: f32) {
        self.now = now;
        for tween in self.opacity.values_mut().chain(self.fill.values_mut()) {
            tween.update(now);
        }
        for pose in self.poses.values_mut() {
            pose.tween.update(now);
        }
    }

    pub fn is_visible(&self, element: ElementRef) -> bool {
        self.visible.get(&element).copied().unwrap_or(false)
    }

    pub fn opacity(&self, element: ElementRef) -> f32 {
        self.opacity.get(&element).map(Tween::value).unwrap_or(0.0)
    }

    pub fn fill(&self, element: ElementRef) -> f32 {
        self.fill.get(&element).map(Tween::value).unwrap_or(0.0)
    }

    pub fn pose(&self, element: ElementRef) -> Pose {
        self.poses
            .get(&element)
            .map(PoseTween::value)
            .unwrap_or(Pose::REST)
    }

    /// True once no tween has anything left to do.
    pub fn is_idle(&self) -> bool {
        self.opacity
            .values()
            .chain(self.fill.values())
            .all(Tween::is_complete)
            && self.poses.values().all(|p| p.tween.is_complete())
    }

    fn fill_motion(&self, target: f32) -> Motion {
        if target >= 1.0 {
            Motion::new(self.line_fill.complete_duration, self.line_fill.complete_ease)
        } else if target <= 0.0 {
            Motion::INSTANT
        } else {
            Motion::new(self.line_fill.partial_duration, Ease::None)
        }
    }
}

impl EffectSink for AnimatedSink {
    fn set_visibility(&mut self, element: ElementRef, visibility: Visibility) {
        let previous = self.visible.insert(element, visibility.visible);
        let already_heading_there = self
            .opacity
            .get(&element)
            .is_some_and(|running| running.to == visibility.opacity);

        let tween = match previous {
            None => Tween::settled(visibility.opacity),
            Some(_) if !visibility.visible => Tween::settled(visibility.opacity),
            Some(true) if already_heading_there => return,
            // Shown elements restart from transparent, then fade in after the delay.
            Some(_) => Tween::new(0.0, visibility.opacity, self.step_fade.motion(), self.now),
        };
        trace!("{element:?} -> {visibility:?}");
        self.opacity.insert(element, tween);
    }

    fn set_fill_fraction(&mut self, element: ElementRef, fraction: f32) {
        let target = fraction.clamp(0.0, 1.0);
        let current = match self.fill.get(&element) {
            // Same destination as the tween in flight: let it run.
            Some(running) if running.to == target => return,
            Some(running) => running.value(),
            None => 0.0,
        };
        let tween = Tween::new(current, target, self.fill_motion(target), self.now);
        self.fill.insert(element, tween);
    }

    fn set_pose(&mut self, element: ElementRef, pose: Pose, motion: Motion) {
        let now = self.now;
        let from = match self.poses.get(&element) {
            Some(running) if running.to == pose => return,
            Some(running) => running.value(),
            None => pose,
        };
        let tween = Tween::new(0.0, 1.0, motion, now);
        self.poses.insert(element, PoseTween { from, to: pose, tween });
    }
}
