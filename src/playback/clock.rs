use crate::foundation::core::TimeMs;

/// Lower bound of the speed multiplier.
pub const SPEED_MIN: f64 = 0.25;
/// Upper bound of the speed multiplier.
pub const SPEED_MAX: f64 = 3.0;
/// Step applied by skip-back/skip-forward, in milliseconds.
pub const SKIP_STEP_MS: f64 = 1000.0;

/// Observable clock state, derived from `(playing, current)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ClockState {
    /// Not playing, at time zero.
    Stopped,
    /// Not playing, holding a nonzero time.
    Paused,
    /// Advancing on ticks.
    Playing,
}

/// The playback clock: authoritative current time, play/pause mode, speed.
///
/// The state machine is deliberately small: `playing` plus a clamped
/// `current` time; [`ClockState`] is derived so contradictory combinations
/// (e.g. "stopped at t=500") are unrepresentable. Ticks consume measured
/// wall-clock deltas supplied by the caller; the clock itself never reads a
/// time source.
#[derive(Clone, Debug)]
pub struct PlaybackClock {
    total: TimeMs,
    current: TimeMs,
    playing: bool,
    speed: f64,
}

impl PlaybackClock {
    /// A stopped clock over a replay of length `total`.
    pub fn new(total: TimeMs) -> Self {
        Self {
            total: TimeMs(total.0.max(0.0)),
            current: TimeMs::ZERO,
            playing: false,
            speed: 1.0,
        }
    }

    /// Replay length the clock wraps at.
    pub fn total(&self) -> TimeMs {
        self.total
    }

    /// Current playback time, always in `[0, total]`.
    pub fn current(&self) -> TimeMs {
        self.current
    }

    /// Current speed multiplier.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Whether the clock advances on ticks.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Derived observable state.
    pub fn state(&self) -> ClockState {
        if self.playing {
            ClockState::Playing
        } else if self.current == TimeMs::ZERO {
            ClockState::Stopped
        } else {
            ClockState::Paused
        }
    }

    /// Stopped|Paused -> Playing, time unchanged. Returns whether the mode
    /// changed (false while already playing).
    pub fn play(&mut self) -> bool {
        if self.playing {
            return false;
        }
        self.playing = true;
        true
    }

    /// Playing -> Paused, time unchanged. Returns whether the mode changed.
    pub fn pause(&mut self) -> bool {
        if !self.playing {
            return false;
        }
        self.playing = false;
        true
    }

    /// Any state -> Stopped, time forced to zero.
    pub fn reset(&mut self) {
        self.playing = false;
        self.current = TimeMs::ZERO;
    }

    /// Jump to `target`, clamped into `[0, total]`. Mode unchanged.
    /// Non-finite targets are ignored.
    pub fn scrub(&mut self, target: TimeMs) {
        if !target.0.is_finite() {
            return;
        }
        self.current = target.clamp(TimeMs::ZERO, self.total);
    }

    /// Jump backwards by [`SKIP_STEP_MS`], clamped at zero.
    pub fn skip_back(&mut self) {
        self.scrub(TimeMs(self.current.0 - SKIP_STEP_MS));
    }

    /// Jump forwards by [`SKIP_STEP_MS`], clamped at `total`.
    pub fn skip_forward(&mut self) {
        self.scrub(TimeMs(self.current.0 + SKIP_STEP_MS));
    }

    /// Clamp `speed` into `[SPEED_MIN, SPEED_MAX]`. Mode and time unchanged.
    /// NaN is ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_nan() {
            return;
        }
        self.speed = speed.clamp(SPEED_MIN, SPEED_MAX);
    }

    /// Advance by `elapsed_real_ms * speed`. Only meaningful while Playing;
    /// ignored otherwise.
    ///
    /// `elapsed_real_ms` must be the measured wall-clock delta since the
    /// previous tick, so it is never negative; an assumed fixed step drifts
    /// whenever the host scheduler misses its cadence. Negative or non-finite
    /// deltas are ignored. Reaching or passing `total` wraps the time to zero
    /// and keeps playing (looping replay); a zero-length replay pins the time
    /// at zero.
    pub fn tick(&mut self, elapsed_real_ms: f64) {
        if !self.playing || !elapsed_real_ms.is_finite() || elapsed_real_ms < 0.0 {
            return;
        }
        let next = self.current.0 + elapsed_real_ms * self.speed;
        self.current = if next >= self.total.0 {
            TimeMs::ZERO
        } else {
            TimeMs(next)
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
