//! Scroll-driven page effects: a stepped procedure whose active step and
//! line fills follow one container's scroll progress, plus reveal and
//! parallax effects built on the same provider and sink contracts.

pub mod app;
pub mod config;
pub mod features;
pub mod gfx;
pub mod scroll;

pub use app::{Container, Page, UiEvent, Viewport};
pub use config::Config;
pub use features::stepper::{MethodSteps, StepLayout};
pub use gfx::sink::{AnimatedSink, EffectSink, ElementRef, Pose, Visibility};
pub use scroll::{Bounds, ScrollProvider, ScrollTrigger, Subscription};
