//! Per-view frame scheduling.
//!
//! A [`FrameLoop`] owns one view and one painter and drives them in two
//! phases per tick:
//!
//! ```text
//! tick(now) ── compute: view.advance(now) ── paint: painter.paint(&view, now)
//! ```
//!
//! Compute runs exactly once before paint, so every position written in a
//! frame derives from the same rotation/progress values. A view that is not
//! mounted yet reports `false` from `advance`; the frame is skipped but the
//! loop keeps scheduling.
//!
//! Teardown goes through a [`CancelHandle`]. Once cancelled, the loop neither
//! computes nor paints again. A [`Mounted`] guard cancels on drop, so a view
//! that goes away cannot leave its loop running.

use crate::orbit::OrbitalView;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The compute phase of a frame.
pub trait Animate {
    /// Update state to `now`. Returns `false` if there is nothing to paint.
    fn advance(&mut self, now: f64) -> bool;
}

impl Animate for OrbitalView {
    fn advance(&mut self, now: f64) -> bool {
        OrbitalView::advance(self, now)
    }
}

/// The paint phase of a frame.
pub trait Paint<V> {
    fn paint(&mut self, view: &V, now: f64);
}

/// Shared cancellation flag of a frame loop.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// RAII guard that cancels its loop on drop.
#[derive(Debug)]
pub struct Mounted(CancelHandle);

impl Drop for Mounted {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Compute and paint both ran.
    Painted,
    /// The view had nothing to paint; the loop stays scheduled.
    Skipped,
    /// The loop is cancelled and must not be scheduled again.
    Cancelled,
}

/// One compute-then-paint loop over a single view.
#[derive(Debug)]
pub struct FrameLoop<V, P> {
    view: V,
    painter: P,
    cancel: CancelHandle,
    painted: usize,
}

impl<V: Animate, P: Paint<V>> FrameLoop<V, P> {
    pub fn new(view: V, painter: P) -> Self {
        Self {
            view,
            painter,
            cancel: CancelHandle::default(),
            painted: 0,
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// A guard that stops this loop when dropped.
    pub fn mount_guard(&self) -> Mounted {
        Mounted(self.cancel_handle())
    }

    /// Run one frame at `now`.
    pub fn tick(&mut self, now: f64) -> Tick {
        if self.cancel.is_cancelled() {
            return Tick::Cancelled;
        }
        if !self.view.advance(now) {
            return Tick::Skipped;
        }
        self.painter.paint(&self.view, now);
        self.painted += 1;
        Tick::Painted
    }

    /// Tick once per clock reading until the clock runs out or the loop is
    /// cancelled. Returns the number of frames painted by this call.
    pub fn run<I: IntoIterator<Item = f64>>(&mut self, clock: I) -> usize {
        let before = self.painted;
        for now in clock {
            if self.tick(now) == Tick::Cancelled {
                break;
            }
        }
        self.painted - before
    }

    pub fn painted(&self) -> usize {
        self.painted
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn painter(&self) -> &P {
        &self.painter
    }

    pub fn into_parts(self) -> (V, P) {
        (self.view, self.painter)
    }
}

/// Clock readings `start, start + step, ...` up to and including `end`.
///
/// `end` itself is always the last reading. A non-positive step yields only
/// `start` and `end`.
pub fn frame_clock(start: f64, end: f64, step: f64) -> Vec<f64> {
    let mut ticks = vec![start];
    if step > 0.0 {
        let n = ((end - start) / step).floor().max(0.0) as usize;
        ticks.extend((1..=n).map(|k| start + k as f64 * step).filter(|&t| t < end));
    }
    if end > start {
        ticks.push(end);
    }
    ticks
}
