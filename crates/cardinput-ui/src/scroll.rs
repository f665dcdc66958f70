//! # Scroll container state
//!
//! The form scrolls its fields programmatically so the focused one stays in
//! view. The container is reached through [`ScrollHandle`], an imperative
//! `scroll_to` that returns immediately: animated requests start a [`Tween`]
//! that later `tick()`s advance, and a newer request replaces whatever was
//! in flight. Nothing waits for an animation to finish.
//!
//! `ScrollState` also accepts user drags through `scroll_by`, but only while
//! `scroll_enabled` is set. Programmatic scrolling ignores that flag.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cardinput_core::{AnimationSpec, Axis, Clock, SystemClock, Tween};

pub trait ScrollHandle {
    /// Scrolls horizontally to content offset `x`.
    fn scroll_to(&self, x: f32, animated: bool);
}

pub struct ScrollState {
    axis: Axis,
    scroll_enabled: Cell<bool>,
    offset: Cell<f32>,
    viewport: Cell<f32>,
    content: Cell<f32>,
    tween: RefCell<Option<Tween>>,
    spec: AnimationSpec,
    clock: Rc<dyn Clock>,
}

impl ScrollState {
    pub fn new(axis: Axis) -> Self {
        Self::with_clock(axis, Rc::new(SystemClock))
    }

    pub fn with_clock(axis: Axis, clock: Rc<dyn Clock>) -> Self {
        Self {
            axis,
            scroll_enabled: Cell::new(false),
            offset: Cell::new(0.0),
            viewport: Cell::new(0.0),
            content: Cell::new(0.0),
            tween: RefCell::new(None),
            spec: AnimationSpec::default(),
            clock,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn set_scroll_enabled(&self, enabled: bool) {
        self.scroll_enabled.set(enabled);
    }

    pub fn scroll_enabled(&self) -> bool {
        self.scroll_enabled.get()
    }

    pub fn set_viewport(&self, extent: f32) {
        self.viewport.set(extent.max(0.0));
        self.clamp();
    }

    pub fn set_content(&self, extent: f32) {
        self.content.set(extent.max(0.0));
        self.clamp();
    }

    pub fn max_offset(&self) -> f32 {
        (self.content.get() - self.viewport.get()).max(0.0)
    }

    pub fn get(&self) -> f32 {
        self.offset.get()
    }

    /// Jumps without animation, cancelling any running tween.
    pub fn set_offset(&self, off: f32) {
        self.tween.borrow_mut().take();
        self.offset.set(off.clamp(0.0, self.max_offset()));
    }

    fn clamp(&self) {
        let max = self.max_offset();
        self.offset.set(self.offset.get().clamp(0.0, max));
    }

    /// Where the running animation will end, if one is running.
    pub fn target(&self) -> Option<f32> {
        self.tween
            .borrow()
            .as_ref()
            .map(|t| t.to.clamp(0.0, self.max_offset()))
    }

    pub fn is_animating(&self) -> bool {
        self.tween.borrow().is_some()
    }

    /// User drag. Consumes `delta` within bounds and returns the leftover.
    pub fn scroll_by(&self, delta: f32) -> f32 {
        if !self.scroll_enabled.get() {
            return delta;
        }
        self.tween.borrow_mut().take();
        let before = self.offset.get();
        let after = (before + delta).clamp(0.0, self.max_offset());
        self.offset.set(after);
        delta - (after - before)
    }

    /// Advances a running animation; returns true while it is still running.
    pub fn tick(&self) -> bool {
        let running = *self.tween.borrow();
        let Some(tw) = running else {
            return false;
        };
        let now = self.clock.now();
        let max = self.max_offset();
        self.offset.set(tw.value_at(now).clamp(0.0, max));
        if tw.is_finished_at(now) {
            self.tween.borrow_mut().take();
            false
        } else {
            true
        }
    }
}

impl ScrollHandle for ScrollState {
    fn scroll_to(&self, x: f32, animated: bool) {
        if self.axis != Axis::Horizontal {
            log::trace!("scroll_to({x}) ignored by a vertical container");
            return;
        }
        if animated {
            let from = self.offset.get();
            let tw = Tween::new(from, x, self.clock.now(), self.spec);
            // supersedes any animation still in flight
            *self.tween.borrow_mut() = Some(tw);
        } else {
            self.set_offset(x);
        }
    }
}
