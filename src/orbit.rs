//! Orbital animation engine for the galaxy portfolio.
//!
//! Items are split by input order into concentric orbit buckets. Every orbit
//! shares one global rotation value, scaled by the orbit's speed multiplier:
//!
//! ```text
//! angle  = index_in_orbit / orbit_size * 360 + rotation * speed
//! radius = orbit_radius * expand_progress
//! (x, y) = (radius * cos(angle), radius * sin(angle))
//! ```
//!
//! [`OrbitalView`] owns all mutable state of one mounted galaxy: the
//! monotonic clock of the last frame, the rotation accumulator, the expand-in
//! progress and the hover/pause flag. Each call to [`OrbitalView::advance`]
//! updates that state exactly once; [`OrbitalView::frame`] derives positions
//! from it without mutating anything, so compute and paint always agree.

use crate::config::{GalaxyConfig, OrbitSpec};
use std::ops::Range;

/// A non-empty orbit bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    /// Position among the drawn (non-empty) orbits, innermost first.
    pub index: usize,
    pub radius: f64,
    pub speed: f64,
    pub color: String,
    /// Item indices on this orbit.
    pub items: Range<usize>,
}

impl Orbit {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Static placement of one item, assigned once at mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSlot {
    pub item: usize,
    pub orbit: usize,
    pub radius: f64,
    pub speed: f64,
    pub index_in_orbit: usize,
    pub orbit_size: usize,
}

/// Split `count` items into orbit buckets by input order.
///
/// Each bucket takes `size` items (or every remaining item when `size` is
/// `None`). Items left over once every bucket is full go to the last
/// bucket, so every item lands on exactly one orbit. Empty buckets are
/// skipped entirely.
pub fn partition(count: usize, buckets: &[OrbitSpec]) -> Vec<Orbit> {
    let mut orbits = Vec::new();
    let mut start = 0;
    let last = buckets.len().saturating_sub(1);
    for (i, spec) in buckets.iter().enumerate() {
        let remaining = count - start;
        let take = if i == last {
            remaining
        } else {
            spec.size.unwrap_or(remaining).min(remaining)
        };
        if take == 0 {
            continue;
        }
        orbits.push(Orbit {
            index: orbits.len(),
            radius: spec.radius,
            speed: spec.speed,
            color: spec.color.clone(),
            items: start..start + take,
        });
        start += take;
    }
    orbits
}

/// Per-item slots of a partition, in item order.
pub fn slots(orbits: &[Orbit]) -> Vec<OrbitSlot> {
    orbits
        .iter()
        .flat_map(|o| {
            o.items.clone().enumerate().map(move |(k, item)| OrbitSlot {
                item,
                orbit: o.index,
                radius: o.radius,
                speed: o.speed,
                index_in_orbit: k,
                orbit_size: o.len(),
            })
        })
        .collect()
}

/// Cubic ease-out on `t` clamped to `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    1.0 - (1.0 - t).powi(3)
}

/// Normalize degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Angle of a slot in degrees for a global rotation value.
pub fn slot_angle(slot: &OrbitSlot, rotation: f64) -> f64 {
    let base = slot.index_in_orbit as f64 / slot.orbit_size.max(1) as f64 * 360.0;
    normalize_degrees(base + rotation * slot.speed)
}

/// Polar to cartesian, angle in degrees.
pub fn polar(angle: f64, radius: f64) -> (f64, f64) {
    let rad = angle.to_radians();
    (radius * rad.cos(), radius * rad.sin())
}

/// Where one item is drawn in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetPosition {
    pub item: usize,
    pub orbit: usize,
    pub angle: f64,
    pub radius: f64,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

/// A decorative particle riding an orbit ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingParticle {
    pub angle: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub orbit: usize,
    /// Full orbit radius; rings are not scaled by the expand progress.
    pub radius: f64,
    pub color: String,
    pub particles: Vec<RingParticle>,
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitFrame {
    pub rotation: f64,
    pub expand_progress: f64,
    pub paused: bool,
    pub planets: Vec<PlanetPosition>,
    pub rings: Vec<Ring>,
}

/// Animation state of one mounted galaxy.
#[derive(Debug, Clone)]
pub struct OrbitalView {
    orbits: Vec<Orbit>,
    slots: Vec<OrbitSlot>,
    base_speed: f64,
    frame_interval_ms: f64,
    expand_duration_ms: f64,
    hover_scale: f64,
    ring_particles: usize,
    mounted_at: Option<f64>,
    last_tick: Option<f64>,
    /// Unbounded; each angle is normalized on the way out.
    rotation: f64,
    expand_progress: f64,
    hovered: Option<usize>,
}

impl OrbitalView {
    /// A view over `count` items, not yet mounted.
    pub fn new(count: usize, config: &GalaxyConfig) -> Self {
        let orbits = partition(count, &config.orbits);
        let slots = slots(&orbits);
        Self {
            orbits,
            slots,
            base_speed: config.base_speed,
            frame_interval_ms: config.frame_interval_ms,
            expand_duration_ms: config.expand_duration_ms,
            hover_scale: config.hover_scale,
            ring_particles: config.ring_particles,
            mounted_at: None,
            last_tick: None,
            rotation: 0.0,
            expand_progress: 0.0,
            hovered: None,
        }
    }

    /// Start the expand-in clock at `now` (ms).
    pub fn mount(&mut self, now: f64) {
        self.mounted_at = Some(now);
        self.last_tick = Some(now);
        self.expand_progress = 0.0;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted_at.is_some()
    }

    /// Advance the state to `now`. Returns `false` (and changes nothing)
    /// before [`mount`](Self::mount).
    ///
    /// A clock that runs backwards is treated as a zero-length frame.
    pub fn advance(&mut self, now: f64) -> bool {
        let (Some(mounted_at), Some(last)) = (self.mounted_at, self.last_tick) else {
            return false;
        };
        let dt = (now - last).max(0.0);
        self.last_tick = Some(now.max(last));

        self.expand_progress = if self.expand_duration_ms > 0.0 {
            ease_out_cubic((now - mounted_at) / self.expand_duration_ms)
        } else {
            1.0
        };
        if !self.is_paused() {
            self.rotation += self.base_speed * (dt / self.frame_interval_ms);
        }
        true
    }

    /// Set the hovered item. Any hover pauses every orbit.
    ///
    /// Indices past the item count clear the hover.
    pub fn set_hovered(&mut self, item: Option<usize>) {
        self.hovered = item.filter(|&i| i < self.slots.len());
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn is_paused(&self) -> bool {
        self.hovered.is_some()
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn expand_progress(&self) -> f64 {
        self.expand_progress
    }

    pub fn orbits(&self) -> &[Orbit] {
        &self.orbits
    }

    pub fn slots(&self) -> &[OrbitSlot] {
        &self.slots
    }

    /// Degrees of global rotation per millisecond while running.
    pub fn degrees_per_ms(&self) -> f64 {
        self.base_speed / self.frame_interval_ms
    }

    /// Position of one slot at an arbitrary rotation and progress.
    pub fn position(&self, slot: &OrbitSlot, rotation: f64, progress: f64) -> PlanetPosition {
        let angle = slot_angle(slot, rotation);
        let radius = slot.radius * progress;
        let (x, y) = polar(angle, radius);
        let scale = if self.hovered == Some(slot.item) {
            self.hover_scale
        } else {
            1.0
        };
        PlanetPosition {
            item: slot.item,
            orbit: slot.orbit,
            angle,
            radius,
            x,
            y,
            scale,
        }
    }

    /// Ring particles of one orbit at a rotation value.
    pub fn ring(&self, orbit: &Orbit, rotation: f64) -> Ring {
        let n = self.ring_particles;
        let particles = (0..n)
            .map(|i| {
                let angle =
                    normalize_degrees(i as f64 / n as f64 * 360.0 + rotation * orbit.speed * 2.0);
                let (x, y) = polar(angle, orbit.radius);
                RingParticle { angle, x, y }
            })
            .collect();
        Ring {
            orbit: orbit.index,
            radius: orbit.radius,
            color: orbit.color.clone(),
            particles,
        }
    }

    /// Derive the current frame from the view state.
    pub fn frame(&self) -> OrbitFrame {
        OrbitFrame {
            rotation: self.rotation,
            expand_progress: self.expand_progress,
            paused: self.is_paused(),
            planets: self
                .slots
                .iter()
                .map(|s| self.position(s, self.rotation, self.expand_progress))
                .collect(),
            rings: self
                .orbits
                .iter()
                .map(|o| self.ring(o, self.rotation))
                .collect(),
        }
    }
}
