//! Orbit animation baked into CSS keyframes.
//!
//! The published site has no script, so the galaxy is animated by sampling
//! an [`OrbitalView`] at build time:
//!
//! ```text
//! t = 0 .. expand_ms         FrameLoop ticks every frame_interval_ms;
//!                             KeyframePainter records each planet
//!                             → @keyframes planet-in-N (linear, fill both)
//! t = expand_ms ..           one revolution per planet, starting from the
//!                             rotation reached at the end of the expand
//!                             → @keyframes planet-orbit-N (infinite)
//! rings                       rigid spin at twice the orbit speed
//!                             → @keyframes ring-spin, per-ring duration
//! ```
//!
//! Every stop is written as `rotate(a) translateX(r) rotate(-a)`. Browsers
//! interpolate matching transform lists function by function, so planets
//! travel along the circle between stops instead of cutting chords.
//!
//! Hovering any planet pauses every animation on the page
//! (`animation-play-state: paused` under `:has(.planet:hover)`), matching the
//! view's global pause.

use crate::animation::{FrameLoop, Paint, frame_clock};
use crate::config::GalaxyConfig;
use crate::orbit::{OrbitalView, slot_angle};
use std::fmt::Write;

/// One keyframe stop of a planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stop {
    /// Offset within the animation, 0–100.
    pub percent: f64,
    /// Degrees, unwrapped so consecutive stops never jump backwards.
    pub angle: f64,
    pub radius: f64,
}

/// Records every painted frame of an [`OrbitalView`].
#[derive(Debug, Default)]
pub struct KeyframePainter {
    /// `(time, per-item (angle, radius))` for each painted frame.
    frames: Vec<(f64, Vec<(f64, f64)>)>,
}

impl Paint<OrbitalView> for KeyframePainter {
    fn paint(&mut self, view: &OrbitalView, now: f64) {
        let frame = view.frame();
        self.frames.push((
            now,
            frame.planets.iter().map(|p| (p.angle, p.radius)).collect(),
        ));
    }
}

impl KeyframePainter {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Stops of one item over the recorded window `[start, end]`.
    pub fn stops(&self, item: usize, start: f64, end: f64) -> Vec<Stop> {
        let span = end - start;
        let mut stops: Vec<Stop> = self
            .frames
            .iter()
            .filter_map(|(t, planets)| {
                let &(angle, radius) = planets.get(item)?;
                let percent = if span > 0.0 {
                    ((t - start) / span * 100.0).clamp(0.0, 100.0)
                } else {
                    100.0
                };
                Some(Stop {
                    percent,
                    angle,
                    radius,
                })
            })
            .collect();
        unwrap_angles(&mut stops);
        stops
    }
}

/// Make angles monotonic non-decreasing by adding whole turns.
fn unwrap_angles(stops: &mut [Stop]) {
    for i in 1..stops.len() {
        while stops[i].angle < stops[i - 1].angle - 180.0 {
            stops[i].angle += 360.0;
        }
    }
}

/// Sampled animation of one planet.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetAnimation {
    pub item: usize,
    pub orbit: usize,
    pub expand: Vec<Stop>,
    pub revolution: Vec<Stop>,
    /// Duration of one revolution.
    pub period_ms: f64,
}

/// Rigid spin of one orbit ring.
#[derive(Debug, Clone, PartialEq)]
pub struct RingAnimation {
    pub orbit: usize,
    pub radius: f64,
    pub color: String,
    /// Particle angles at rotation zero.
    pub particle_angles: Vec<f64>,
    pub period_ms: f64,
}

/// Everything the galaxy page needs to animate `count` items.
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyKeyframes {
    pub expand_ms: f64,
    pub hover_scale: f64,
    pub planets: Vec<PlanetAnimation>,
    pub rings: Vec<RingAnimation>,
}

/// Milliseconds for a full turn at `degrees_per_ms * multiplier`.
/// `None` for a stationary orbit.
fn turn_period(degrees_per_ms: f64, multiplier: f64) -> Option<f64> {
    let rate = degrees_per_ms * multiplier;
    (rate.abs() > f64::EPSILON).then(|| 360.0 / rate.abs())
}

/// Sample the galaxy animation for `count` items.
pub fn sample(count: usize, config: &GalaxyConfig) -> GalaxyKeyframes {
    let expand_ms = config.expand_duration_ms;
    let mut view = OrbitalView::new(count, config);
    view.mount(0.0);

    let mut frame_loop = FrameLoop::new(view, KeyframePainter::default());
    let ticks = frame_clock(0.0, expand_ms, config.frame_interval_ms);
    {
        let _mounted = frame_loop.mount_guard();
        frame_loop.run(ticks);
    }
    let (view, painter) = frame_loop.into_parts();
    tracing::debug!(frames = painter.frame_count(), items = count, "sampled galaxy expand");

    let r0 = view.rotation();
    let deg_per_ms = view.degrees_per_ms();
    let samples = config.keyframe_samples.max(2);

    let planets = view
        .slots()
        .iter()
        .map(|slot| {
            let expand = painter.stops(slot.item, 0.0, expand_ms);
            let (revolution, period_ms) = match turn_period(deg_per_ms, slot.speed) {
                Some(period) => {
                    let start = slot_angle(slot, r0);
                    let dir = slot.speed.signum();
                    let stops = (0..=samples)
                        .map(|k| {
                            let f = k as f64 / samples as f64;
                            Stop {
                                percent: f * 100.0,
                                angle: start + dir * f * 360.0,
                                radius: slot.radius,
                            }
                        })
                        .collect();
                    (stops, period)
                }
                None => (Vec::new(), 0.0),
            };
            PlanetAnimation {
                item: slot.item,
                orbit: slot.orbit,
                expand,
                revolution,
                period_ms,
            }
        })
        .collect();

    let rings = view
        .orbits()
        .iter()
        .map(|orbit| {
            let ring = view.ring(orbit, 0.0);
            RingAnimation {
                orbit: orbit.index,
                radius: orbit.radius,
                color: orbit.color.clone(),
                particle_angles: ring.particles.iter().map(|p| p.angle).collect(),
                period_ms: turn_period(deg_per_ms, orbit.speed * 2.0).unwrap_or(0.0),
            }
        })
        .collect();

    GalaxyKeyframes {
        expand_ms,
        hover_scale: config.hover_scale,
        planets,
        rings,
    }
}

/// Format a number for CSS: at most three decimals, no trailing zeros.
pub fn css_number(value: f64) -> String {
    let s = format!("{value:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// `rotate(a) translateX(r) rotate(-a)`.
pub fn polar_transform(angle: f64, radius: f64) -> String {
    let a = css_number(angle);
    format!(
        "rotate({a}deg) translateX({}px) rotate({}deg)",
        css_number(radius),
        css_number(-angle)
    )
}

fn write_keyframes(css: &mut String, name: &str, stops: &[Stop]) {
    let _ = writeln!(css, "@keyframes {name} {{");
    for s in stops {
        let _ = writeln!(
            css,
            "  {}% {{ transform: {}; }}",
            css_number(s.percent),
            polar_transform(s.angle, s.radius)
        );
    }
    css.push_str("}\n");
}

impl GalaxyKeyframes {
    /// Per-page stylesheet for the galaxy.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        let expand = css_number(self.expand_ms);

        for p in &self.planets {
            let in_name = format!("planet-in-{}", p.item);
            write_keyframes(&mut css, &in_name, &p.expand);

            let mut animations = Vec::new();
            if !p.expand.is_empty() {
                animations.push(format!("{in_name} {expand}ms linear both"));
            }
            if !p.revolution.is_empty() {
                let orbit_name = format!("planet-orbit-{}", p.item);
                write_keyframes(&mut css, &orbit_name, &p.revolution);
                animations.push(format!(
                    "{orbit_name} {}ms linear {expand}ms infinite",
                    css_number(p.period_ms)
                ));
            }
            if let Some(last) = p.expand.last().or(p.revolution.first()) {
                let _ = writeln!(
                    css,
                    "#planet-{} {{ transform: {}; animation: {}; }}",
                    p.item,
                    polar_transform(last.angle, last.radius),
                    if animations.is_empty() {
                        "none".to_string()
                    } else {
                        animations.join(", ")
                    }
                );
            }
        }

        css.push_str("@keyframes ring-spin { to { transform: rotate(360deg); } }\n");
        for r in &self.rings {
            if r.period_ms > 0.0 {
                let _ = writeln!(
                    css,
                    "#ring-{} {{ animation: ring-spin {}ms linear infinite; }}",
                    r.orbit,
                    css_number(r.period_ms)
                );
            }
        }

        let _ = writeln!(
            css,
            ".planet:hover .planet-body {{ transform: scale({}); }}",
            css_number(self.hover_scale)
        );
        css.push_str(
            ".galaxy:has(.planet:hover) .planet,\n\
             .galaxy:has(.planet:hover) .ring { animation-play-state: paused; }\n",
        );
        css.push_str(
            "@media (prefers-reduced-motion: reduce) {\n  \
             .galaxy .planet, .galaxy .ring { animation: none; }\n}\n",
        );
        css
    }
}
