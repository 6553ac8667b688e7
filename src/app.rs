use crate::config::Config;
use crate::features::reveal::{parse_speed, Parallax, RevealEffect, RevealKind};
use crate::features::stepper::{MethodSteps, StepLayout};
use crate::features::{subscribe_effect, SharedEffect, SharedSink};
use crate::gfx::sink::EffectSink;
use crate::scroll::{Anchor, Bounds, ElementEdge, ScrollProvider, ScrollTrigger, Subscription, ViewportEdge};
use anyhow::Result;
use log::{debug, info, warn};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub enum UiEvent {
    Scroll { delta: f32 },
    ScrollTo { y: f32 },
    Resize { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A page region found by element discovery.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub name: String,
    pub bounds: Bounds,
}

impl Container {
    pub fn new(name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }
}

struct Section {
    container: String,
    bounds: Bounds,
    trigger: ScrollTrigger,
    subscription: Subscription,
    effect: SharedEffect,
}

/// Composition root: owns the sink, one trigger per mounted container, and the
/// latch that keeps each container from being set up twice.
pub struct Page<S: EffectSink + 'static> {
    config: Config,
    viewport: Viewport,
    scroll_y: f32,
    time: f32,
    sink: Rc<RefCell<S>>,
    initialized: HashSet<String>,
    sections: Vec<Section>,
    next_effect_id: usize,
    torn_down: bool,
}

impl<S: EffectSink + 'static> Page<S> {
    pub fn new(config: Config, viewport: Viewport, sink: S) -> Self {
        Self {
            config,
            viewport,
            scroll_y: 0.0,
            time: 0.0,
            sink: Rc::new(RefCell::new(sink)),
            initialized: HashSet::new(),
            sections: Vec::new(),
            next_effect_id: 0,
            torn_down: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn sink(&self) -> Ref<'_, S> {
        self.sink.borrow()
    }

    pub fn sink_mut(&self) -> RefMut<'_, S> {
        self.sink.borrow_mut()
    }

    pub fn is_desktop(&self) -> bool {
        self.config.is_desktop(self.viewport.width)
    }

    pub fn is_initialized(&self, container: &str) -> bool {
        self.initialized.contains(container)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Sets up the stepped procedure on `container`.
    ///
    /// Returns `Ok(None)` without touching the sink when the viewport is not
    /// desktop-wide, the container is missing, it has no steps, or it was
    /// already initialized.
    pub fn mount_method_steps(
        &mut self,
        container: Option<&Container>,
        layout: StepLayout,
    ) -> Result<Option<Rc<RefCell<MethodSteps>>>> {
        if !self.is_desktop() {
            info!(
                "viewport {}px is narrower than {}px; stepped procedure skipped",
                self.viewport.width, self.config.desktop_min_width
            );
            return Ok(None);
        }
        let Some(container) = container else {
            info!("no method container found; stepped procedure skipped");
            return Ok(None);
        };
        if layout.is_empty() {
            info!("{} has no steps; nothing to animate", container.name);
            return Ok(None);
        }
        let (start, end) = self.config.trigger.anchors()?;
        if !self.claim(&container.name) {
            return Ok(None);
        }

        let steps = Rc::new(RefCell::new(MethodSteps::new(layout)));
        let trigger = self.trigger(container.bounds, start, end, self.config.trigger.scrub);
        self.attach(container, steps.clone(), trigger);
        info!(
            "{}: {} steps mounted",
            container.name,
            steps.borrow().layout().total_steps()
        );
        Ok(Some(steps))
    }

    /// Fades `container` in once it crosses the reveal line.
    pub fn mount_reveal(&mut self, container: &Container, kind: RevealKind) -> Result<bool> {
        let anchor = self.config.reveal.start_anchor()?;
        if !self.claim(&container.name) {
            return Ok(false);
        }
        let id = self.next_id();
        let effect = Rc::new(RefCell::new(RevealEffect::new(id, kind, &self.config.reveal)));
        let trigger = self.trigger(container.bounds, anchor, anchor, 0.0);
        self.attach(container, effect, trigger);
        Ok(true)
    }

    /// Scroll-linked vertical drift while `container` crosses the viewport.
    pub fn mount_parallax(&mut self, container: &Container, speed_attr: Option<&str>) -> Result<bool> {
        if !self.claim(&container.name) {
            return Ok(false);
        }
        let speed = parse_speed(speed_attr, self.config.parallax.default_speed);
        let id = self.next_id();
        let effect = Rc::new(RefCell::new(Parallax::new(id, speed, self.viewport.height as f32)));
        let start = Anchor::new(ElementEdge::Top, ViewportEdge::Bottom);
        let end = Anchor::new(ElementEdge::Bottom, ViewportEdge::Top);
        let trigger = self.trigger(container.bounds, start, end, 0.0);
        self.attach(container, effect, trigger);
        Ok(true)
    }

    fn claim(&mut self, container: &str) -> bool {
        if self.torn_down {
            warn!("page torn down; {container} not mounted");
            return false;
        }
        if !self.initialized.insert(container.to_string()) {
            debug!("{container} already initialized");
            return false;
        }
        true
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_effect_id;
        self.next_effect_id += 1;
        id
    }

    fn trigger(&self, bounds: Bounds, start: Anchor, end: Anchor, scrub: f32) -> ScrollTrigger {
        ScrollTrigger::new(bounds, self.viewport.height as f32, start, end)
            .with_scrub(scrub)
            .with_markers(self.config.markers)
    }

    fn attach(&mut self, container: &Container, effect: SharedEffect, mut trigger: ScrollTrigger) {
        effect.borrow_mut().mount(&mut *self.sink.borrow_mut());

        let sink: SharedSink = self.sink.clone();
        let subscription = subscribe_effect(effect.clone(), sink, &mut trigger);
        trigger.scroll_to(self.scroll_y);
        debug!(
            "{} attached to {} (range {:?})",
            effect.borrow().name(),
            container.name,
            trigger.range()
        );

        self.sections.push(Section {
            container: container.name.clone(),
            bounds: container.bounds,
            trigger,
            subscription,
            effect,
        });
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Scroll { delta } => self.scroll_to(self.scroll_y + delta),
            UiEvent::ScrollTo { y } => self.scroll_to(y),
            UiEvent::Resize { width, height } => self.resize(Viewport::new(width, height)),
        }
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.scroll_y = y.max(0.0);
        for section in self.sections.iter_mut() {
            section.trigger.scroll_to(self.scroll_y);
        }
    }

    /// Advances the clock; scrubbed triggers catch up with the scroll position.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        for section in self.sections.iter_mut() {
            section.trigger.advance(dt);
        }
    }

    /// New viewport size. Already mounted sections are kept and re-measured;
    /// the desktop gate only applies to future mounts.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let height = viewport.height as f32;
        for section in self.sections.iter_mut() {
            section.effect.borrow_mut().resize(height);
            section.trigger.refresh(section.bounds, height, self.scroll_y);
        }
        debug!("viewport resized to {}x{}", viewport.width, viewport.height);
    }

    /// Stops listening everywhere; later scrolls write nothing.
    pub fn teardown(&mut self) {
        for mut section in self.sections.drain(..) {
            section.trigger.unsubscribe(section.subscription);
            debug!("{} detached", section.container);
        }
        self.torn_down = true;
        info!("page torn down");
    }
}
