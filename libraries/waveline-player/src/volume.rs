//! Volume control with snap-to-rail
//!
//! Volume is a 0-100 level. Inputs within 2 units of either end snap to that
//! end, which also bounds every input into 0-100.

/// Distance from either rail inside which input snaps to the rail
pub const SNAP_DEAD_ZONE: f64 = 2.0;

pub const MIN_VOLUME: f64 = 0.0;
pub const MAX_VOLUME: f64 = 100.0;

/// Apply the snap dead zone to a raw volume input
///
/// `v - 2 <= 0` snaps to 0, `v + 2 >= 100` snaps to 100, anything between
/// passes through.
pub fn snap(input: f64) -> f64 {
    if input.is_nan() || input - SNAP_DEAD_ZONE <= MIN_VOLUME {
        MIN_VOLUME
    } else if input + SNAP_DEAD_ZONE >= MAX_VOLUME {
        MAX_VOLUME
    } else {
        input
    }
}

/// Volume level plus the level to restore on unmute
#[derive(Debug, Clone)]
pub struct Volume {
    level: f64,
    before_mute: Option<f64>,
    fallback: f64,
}

impl Volume {
    /// Create volume controller at `level`
    ///
    /// `level` is also what unmute restores when nothing was remembered.
    pub fn new(level: f64) -> Self {
        let level = snap(level);
        Self {
            level,
            before_mute: None,
            fallback: level,
        }
    }

    /// Set volume level, snapping near the rails
    pub fn set_level(&mut self, input: f64) {
        self.level = snap(input);
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Gain for the waveform engine (0.0 - 1.0)
    pub fn gain(&self) -> f64 {
        self.level / MAX_VOLUME
    }

    /// Remember `level` as the level to restore on unmute
    pub fn remember(&mut self, level: f64) {
        self.before_mute = Some(level);
    }

    pub fn before_mute(&self) -> Option<f64> {
        self.before_mute
    }

    pub fn is_muted(&self) -> bool {
        self.level == MIN_VOLUME
    }

    /// Toggle mute state
    ///
    /// An audible level is remembered and replaced by silence. At silence the
    /// remembered level (or the initial level if none) comes back.
    pub fn toggle_mute(&mut self) {
        if self.level > MIN_VOLUME {
            self.before_mute = Some(self.level);
            self.level = MIN_VOLUME;
        } else {
            let restore = self.before_mute.unwrap_or(self.fallback);
            self.set_level(restore);
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(75.0)
    }
}
