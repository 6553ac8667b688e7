pub mod reveal;
pub mod stepper;

use crate::gfx::sink::EffectSink;
use crate::scroll::{ScrollProvider, Subscription};
use std::cell::RefCell;
use std::rc::Rc;

/// Anything driven by a container's scroll progress.
pub trait ScrollEffect {
    fn name(&self) -> &'static str;
    /// Initial writes, before any progress arrives.
    fn mount(&mut self, sink: &mut dyn EffectSink);
    fn on_progress(&mut self, progress: f32, sink: &mut dyn EffectSink);
    fn resize(&mut self, _viewport_height: f32) {}
}

pub type SharedEffect = Rc<RefCell<dyn ScrollEffect>>;
pub type SharedSink = Rc<RefCell<dyn EffectSink>>;

/// Routes every progress tick from `provider` into `effect`, writing to `sink`.
pub fn subscribe_effect(
    effect: SharedEffect,
    sink: SharedSink,
    provider: &mut dyn ScrollProvider,
) -> Subscription {
    provider.subscribe(Box::new(move |progress| {
        effect
            .borrow_mut()
            .on_progress(progress, &mut *sink.borrow_mut());
    }))
}
