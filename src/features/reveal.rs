//! One-shot reveal animations and scroll-linked parallax.
//!
//! A reveal plays once its container crosses the reveal line and reverses when
//! it goes back above it. Both run off a zero-length trigger range, so the
//! progress they receive is either 0 or 1.

use super::ScrollEffect;
use crate::config::RevealConfig;
use crate::gfx::anim::{Ease, Motion};
use crate::gfx::sink::{EffectSink, ElementRef, Pose};
use log::debug;

const SCALE_FROM: f32 = 0.8;
const SCALE_OVERSHOOT: f32 = 1.2;
const STAGGER_DISTANCE: f32 = 40.0;
const STAGGER_DURATION: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealKind {
    FadeUp,
    FadeLeft,
    FadeRight,
    Scale,
    Stagger { items: usize },
}

impl RevealKind {
    /// Parses the `data-animate` attribute value.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim() {
            "fade-up" => Some(RevealKind::FadeUp),
            "fade-left" => Some(RevealKind::FadeLeft),
            "fade-right" => Some(RevealKind::FadeRight),
            "scale" => Some(RevealKind::Scale),
            _ => None,
        }
    }

    pub fn hidden_pose(self, distance: f32) -> Pose {
        let hidden = Pose {
            opacity: 0.0,
            ..Pose::REST
        };
        match self {
            RevealKind::FadeUp => Pose { y: distance, ..hidden },
            RevealKind::FadeLeft => Pose { x: -distance, ..hidden },
            RevealKind::FadeRight => Pose { x: distance, ..hidden },
            RevealKind::Scale => Pose {
                scale: SCALE_FROM,
                ..hidden
            },
            RevealKind::Stagger { .. } => Pose {
                y: STAGGER_DISTANCE,
                ..hidden
            },
        }
    }

    pub fn motion(self, config: &RevealConfig) -> Motion {
        match self {
            RevealKind::FadeUp | RevealKind::FadeLeft | RevealKind::FadeRight => {
                Motion::new(config.duration, Ease::Power2Out)
            }
            RevealKind::Scale => Motion::new(config.duration, Ease::BackOut(SCALE_OVERSHOOT)),
            RevealKind::Stagger { .. } => Motion::new(STAGGER_DURATION, Ease::Power2Out),
        }
    }
}

pub struct RevealEffect {
    id: usize,
    kind: RevealKind,
    config: RevealConfig,
    played: bool,
}

impl RevealEffect {
    pub fn new(id: usize, kind: RevealKind, config: &RevealConfig) -> Self {
        Self {
            id,
            kind,
            config: config.clone(),
            played: false,
        }
    }

    pub fn kind(&self) -> RevealKind {
        self.kind
    }

    pub fn is_played(&self) -> bool {
        self.played
    }

    fn write(&self, pose: Pose, motion: Motion, reverse: bool, sink: &mut dyn EffectSink) {
        match self.kind {
            RevealKind::Stagger { items } => {
                for item in 0..items {
                    let order = if reverse { items - 1 - item } else { item };
                    let delay = order as f32 * self.config.stagger;
                    sink.set_pose(
                        ElementRef::RevealItem {
                            reveal: self.id,
                            item,
                        },
                        pose,
                        motion.delayed(motion.delay + delay),
                    );
                }
            }
            _ => sink.set_pose(ElementRef::Reveal(self.id), pose, motion),
        }
    }
}

impl ScrollEffect for RevealEffect {
    fn name(&self) -> &'static str {
        "reveal"
    }

    fn mount(&mut self, sink: &mut dyn EffectSink) {
        let hidden = self.kind.hidden_pose(self.config.distance);
        self.write(hidden, Motion::INSTANT, false, sink);
    }

    fn on_progress(&mut self, progress: f32, sink: &mut dyn EffectSink) {
        let reached = progress > 0.0;
        if reached == self.played {
            return;
        }
        self.played = reached;
        let motion = self.kind.motion(&self.config);
        if reached {
            debug!("reveal {} plays ({:?})", self.id, self.kind);
            self.write(Pose::REST, motion, false, sink);
        } else {
            debug!("reveal {} reverses", self.id);
            let hidden = self.kind.hidden_pose(self.config.distance);
            self.write(hidden, motion, true, sink);
        }
    }
}

/// Reads a `data-parallax-speed` value, falling back to `default` when absent or malformed.
pub fn parse_speed(attr: Option<&str>, default: f32) -> f32 {
    attr.and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Moves an element up by `speed` viewport heights as it crosses the viewport.
pub struct Parallax {
    id: usize,
    speed: f32,
    viewport_height: f32,
}

impl Parallax {
    pub fn new(id: usize, speed: f32, viewport_height: f32) -> Self {
        Self {
            id,
            speed,
            viewport_height,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn offset(&self, progress: f32) -> f32 {
        -self.viewport_height * self.speed * progress.clamp(0.0, 1.0)
    }
}

impl ScrollEffect for Parallax {
    fn name(&self) -> &'static str {
        "parallax"
    }

    fn mount(&mut self, sink: &mut dyn EffectSink) {
        sink.set_pose(ElementRef::Parallax(self.id), Pose::REST, Motion::INSTANT);
    }

    fn on_progress(&mut self, progress: f32, sink: &mut dyn EffectSink) {
        let pose = Pose {
            y: self.offset(progress),
            ..Pose::REST
        };
        sink.set_pose(ElementRef::Parallax(self.id), pose, Motion::INSTANT);
    }

    fn resize(&mut self, viewport_height: f32) {
        self.viewport_height = viewport_height;
    }
}
