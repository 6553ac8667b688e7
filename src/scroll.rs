//! Scroll-position providers.
//!
//! A provider turns the document scroll offset into a normalized progress
//! value for one container and pushes it to its subscribers. [`ScrollTrigger`]
//! is the provider used by [`crate::app::Page`]; anything else that can call
//! back with a progress value can implement [`ScrollProvider`].

use anyhow::{bail, Result};
use log::debug;
use std::str::FromStr;

/// Which edge of the container an anchor refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementEdge {
    Top,
    Center,
    Bottom,
}

/// Which line of the viewport an anchor refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEdge {
    Top,
    Center,
    Bottom,
    /// Fraction of the viewport height from its top, `"85%"` is `Percent(0.85)`.
    Percent(f32),
}

/// A trigger boundary such as `"top center"`: progress starts (or ends) when
/// the container's top edge meets the viewport's center line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub element: ElementEdge,
    pub viewport: ViewportEdge,
}

impl Anchor {
    pub fn new(element: ElementEdge, viewport: ViewportEdge) -> Self {
        Self { element, viewport }
    }

    /// Document scroll offset at which this anchor is reached.
    pub fn scroll_offset(&self, container: Bounds, viewport_height: f32) -> f32 {
        let element = match self.element {
            ElementEdge::Top => 0.0,
            ElementEdge::Center => container.height * 0.5,
            ElementEdge::Bottom => container.height,
        };
        let viewport = match self.viewport {
            ViewportEdge::Top => 0.0,
            ViewportEdge::Center => viewport_height * 0.5,
            ViewportEdge::Bottom => viewport_height,
            ViewportEdge::Percent(f) => viewport_height * f,
        };
        container.top + element - viewport
    }
}

impl FromStr for Anchor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let (Some(element), Some(viewport), None) = (parts.next(), parts.next(), parts.next())
        else {
            bail!("expected \"<element edge> <viewport edge>\", got {s:?}");
        };

        let element = match element {
            "top" => ElementEdge::Top,
            "center" => ElementEdge::Center,
            "bottom" => ElementEdge::Bottom,
            other => bail!("unknown element edge {other:?}"),
        };
        let viewport = match viewport {
            "top" => ViewportEdge::Top,
            "center" => ViewportEdge::Center,
            "bottom" => ViewportEdge::Bottom,
            pct if pct.ends_with('%') => {
                let value: f32 = pct.trim_end_matches('%').parse()?;
                ViewportEdge::Percent(value / 100.0)
            }
            other => bail!("unknown viewport edge {other:?}"),
        };

        Ok(Self { element, viewport })
    }
}

/// Vertical extent of a container in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }
}

/// Handle returned by [`ScrollProvider::subscribe`]; hand it back to stop listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

pub type ProgressCallback = Box<dyn FnMut(f32)>;

pub trait ScrollProvider {
    fn subscribe(&mut self, on_update: ProgressCallback) -> Subscription;

    /// Drops the callback; returns false when the subscription was not live.
    fn unsubscribe(&mut self, subscription: Subscription) -> bool;
}

/// Maps the scroll offset to progress between a start and an end anchor of one container.
pub struct ScrollTrigger {
    container: Bounds,
    viewport_height: f32,
    start: Anchor,
    end: Anchor,
    scrub: f32,
    markers: bool,
    target: f32,
    progress: Option<f32>,
    listeners: Vec<(Subscription, ProgressCallback)>,
    next_id: u64,
}

impl ScrollTrigger {
    pub fn new(container: Bounds, viewport_height: f32, start: Anchor, end: Anchor) -> Self {
        Self {
            container,
            viewport_height,
            start,
            end,
            scrub: 0.0,
            markers: false,
            target: 0.0,
            progress: None,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Lag progress behind the scroll position by roughly `seconds`; see [`ScrollTrigger::advance`].
    pub fn with_scrub(mut self, seconds: f32) -> Self {
        self.scrub = seconds.max(0.0);
        self
    }

    pub fn with_markers(mut self, markers: bool) -> Self {
        self.markers = markers;
        self
    }

    /// Scroll offsets at which progress is 0 and 1.
    pub fn range(&self) -> (f32, f32) {
        (
            self.start.scroll_offset(self.container, self.viewport_height),
            self.end.scroll_offset(self.container, self.viewport_height),
        )
    }

    /// Last progress delivered to subscribers.
    pub fn progress(&self) -> Option<f32> {
        self.progress
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn progress_at(&self, scroll_y: f32) -> f32 {
        let (start, end) = self.range();
        let span = end - start;
        if span <= 0.0 {
            return if scroll_y >= start { 1.0 } else { 0.0 };
        }
        ((scroll_y - start) / span).clamp(0.0, 1.0)
    }

    /// Records a new scroll offset. Without scrub, subscribers are notified right
    /// away when progress changed; with scrub, [`ScrollTrigger::advance`] catches up.
    pub fn scroll_to(&mut self, scroll_y: f32) {
        self.target = self.progress_at(scroll_y);
        if self.markers {
            let (start, end) = self.range();
            debug!(
                "trigger markers: start={start:.1} end={end:.1} scroll={scroll_y:.1} target={:.3}",
                self.target
            );
        }
        if self.scrub <= 0.0 || self.progress.is_none() {
            self.emit(self.target);
        }
    }

    /// Moves scrubbed progress toward the scroll target by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let Some(current) = self.progress else {
            return;
        };
        if self.scrub <= 0.0 || current == self.target {
            return;
        }
        let step = (dt / self.scrub).min(1.0);
        let mut next = current + (self.target - current) * step;
        if (self.target - next).abs() < 1e-4 {
            next = self.target;
        }
        self.emit(next);
    }

    /// Geometry changed (resize, layout shift): recompute and notify unconditionally.
    pub fn refresh(&mut self, container: Bounds, viewport_height: f32, scroll_y: f32) {
        self.container = container;
        self.viewport_height = viewport_height;
        self.target = self.progress_at(scroll_y);
        self.progress = None;
        self.emit(self.target);
    }

    fn emit(&mut self, progress: f32) {
        if self.progress == Some(progress) {
            return;
        }
        self.progress = Some(progress);
        for (_, on_update) in self.listeners.iter_mut() {
            on_update(progress);
        }
    }
}

impl ScrollProvider for ScrollTrigger {
    fn subscribe(&mut self, on_update: ProgressCallback) -> Subscription {
        let subscription = Subscription(self.next_id);
        self.next_id += 1;
        self.listeners.push((subscription, on_update));
        subscription
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _)| *s != subscription);
        self.listeners.len() != before
    }
}
