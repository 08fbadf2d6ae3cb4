//! Deterministic star field for the cosmic background.
//!
//! Stars come from a seeded sine hash rather than an RNG so every build of a
//! page produces the same sky: star `i` reads five consecutive seeds
//! starting at `3i + 1`.

/// `frac(sin(seed * 9999) * 10000)`, in `[0, 1)`.
pub fn seeded_random(seed: f64) -> f64 {
    let x = (seed * 9999.0).sin() * 10000.0;
    let f = x - x.floor();
    // Guard the rounding edge where the fraction comes out as exactly 1.0
    if f >= 1.0 { 0.0 } else { f }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarSize {
    Small,
    Medium,
    Large,
}

impl StarSize {
    pub fn css_class(self) -> &'static str {
        match self {
            StarSize::Small => "star-sm",
            StarSize::Medium => "star-md",
            StarSize::Large => "star-lg",
        }
    }
}

/// One twinkling star. Positions are percentages of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub size: StarSize,
    /// Twinkle delay in seconds.
    pub delay: f64,
    /// Twinkle period in seconds, between 2 and 5.
    pub duration: f64,
}

/// Generate `count` stars.
pub fn stars(count: usize) -> Vec<Star> {
    (0..count)
        .map(|i| {
            let seed = (i * 3) as f64;
            let size_roll = seeded_random(seed + 3.0);
            let size = if size_roll > 0.9 {
                StarSize::Large
            } else if size_roll > 0.6 {
                StarSize::Medium
            } else {
                StarSize::Small
            };
            Star {
                x: seeded_random(seed + 1.0) * 100.0,
                y: seeded_random(seed + 2.0) * 100.0,
                size,
                delay: seeded_random(seed + 4.0) * 5.0,
                duration: 2.0 + seeded_random(seed + 5.0) * 3.0,
            }
        })
        .collect()
}

/// A large blurred glow drifting behind the stars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orb {
    pub x: f64,
    pub y: f64,
    pub size: u32,
    pub color: &'static str,
    pub blur: u32,
    pub duration: u32,
    pub delay: u32,
}

/// The fixed background orbs.
pub const ORBS: [Orb; 4] = [
    Orb {
        x: 15.0,
        y: 20.0,
        size: 300,
        color: "rgba(123, 44, 191, 0.15)",
        blur: 80,
        duration: 20,
        delay: 0,
    },
    Orb {
        x: 75.0,
        y: 60.0,
        size: 250,
        color: "rgba(233, 69, 96, 0.12)",
        blur: 70,
        duration: 25,
        delay: 5,
    },
    Orb {
        x: 50.0,
        y: 80.0,
        size: 200,
        color: "rgba(0, 217, 255, 0.1)",
        blur: 60,
        duration: 18,
        delay: 3,
    },
    Orb {
        x: 85.0,
        y: 15.0,
        size: 180,
        color: "rgba(245, 208, 66, 0.08)",
        blur: 50,
        duration: 22,
        delay: 8,
    },
];
