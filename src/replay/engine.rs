use std::time::Instant;

use crate::compile::heatmap::HeatmapAccumulator;
use crate::compile::plan::compile_frame_with_cache;
use crate::eval::view::FrameView;
use crate::foundation::core::TimeMs;
use crate::foundation::error::GazelineResult;
use crate::playback::clock::PlaybackClock;
use crate::playback::state::{Layer, LayerToggles, PlaybackState};
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::session::ingest::LoadedSession;
use crate::session::model::{GazeSession, SourceFile};
use crate::session::stats::SessionStats;
use crate::session::tokens::TokenMap;

/// A discrete replay command.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Start advancing from the current time.
    Play,
    /// Hold the current time.
    Pause,
    /// Stop and force the time to zero.
    Reset,
    /// Jump to a time, clamped into the replay.
    Scrub(TimeMs),
    /// Jump back one skip step.
    SkipBack,
    /// Jump forward one skip step.
    SkipForward,
    /// Change the speed multiplier, clamped.
    SetSpeed(f64),
    /// Flip one layer's visibility.
    Toggle(Layer),
}

/// What the host must do with its frame-callback request after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheduling {
    /// Begin requesting frame callbacks.
    Start,
    /// Cancel any outstanding frame-callback request.
    Cancel,
    /// Leave the request as it is.
    Unchanged,
}

/// Outcome of a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Redraw immediately, without waiting for the next scheduled frame.
    pub redraw: bool,
    /// Start, cancel, or keep the host frame-callback request.
    pub scheduling: Scheduling,
}

/// Outcome of one host frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTick {
    /// Whether the clock consumed this callback. A consumed callback is
    /// always followed by a redraw.
    pub ticked: bool,
    /// Whether the host should request another callback.
    pub request_next: bool,
}

/// Drives a loaded session: owns the clock, layer toggles, and heatmap
/// cache, and translates commands plus frame callbacks into
/// recompute-and-draw passes.
///
/// The engine never queues renders. A slow frame simply means the next
/// callback recomputes from the then-current time; there is no backlog to
/// drain.
pub struct ReplayEngine {
    source: SourceFile,
    tokens: TokenMap,
    session: GazeSession,
    clock: PlaybackClock,
    toggles: LayerToggles,
    heatmap: HeatmapAccumulator,
    last_frame: Option<Instant>,
}

impl ReplayEngine {
    /// Engine over a loaded session, stopped at time zero with default
    /// layer toggles.
    pub fn new(loaded: LoadedSession) -> Self {
        let LoadedSession {
            source,
            tokens,
            session,
        } = loaded;
        let clock = PlaybackClock::new(session.total_duration());
        let heatmap = HeatmapAccumulator::new(session.canvas());
        Self {
            source,
            tokens,
            session,
            clock,
            toggles: LayerToggles::default(),
            heatmap,
            last_frame: None,
        }
    }

    /// Apply one command and report what the host does next.
    ///
    /// Time-changing and toggle commands request an immediate redraw; play
    /// and pause do not (the frame-callback machinery or the paused surface
    /// already shows the right pixels). Only transitions into and out of
    /// Playing touch the scheduling request.
    #[tracing::instrument(skip(self))]
    pub fn command(&mut self, cmd: Command) -> CommandOutcome {
        match cmd {
            Command::Play => {
                if self.clock.play() {
                    // Forget the previous callback instant so the first tick
                    // after resume measures a zero delta instead of the
                    // whole pause.
                    self.last_frame = None;
                    CommandOutcome {
                        redraw: false,
                        scheduling: Scheduling::Start,
                    }
                } else {
                    CommandOutcome {
                        redraw: false,
                        scheduling: Scheduling::Unchanged,
                    }
                }
            }
            Command::Pause => CommandOutcome {
                redraw: false,
                scheduling: if self.clock.pause() {
                    Scheduling::Cancel
                } else {
                    Scheduling::Unchanged
                },
            },
            Command::Reset => {
                let was_playing = self.clock.is_playing();
                self.clock.reset();
                CommandOutcome {
                    redraw: true,
                    scheduling: if was_playing {
                        Scheduling::Cancel
                    } else {
                        Scheduling::Unchanged
                    },
                }
            }
            Command::Scrub(target) => {
                self.clock.scrub(target);
                CommandOutcome {
                    redraw: true,
                    scheduling: Scheduling::Unchanged,
                }
            }
            Command::SkipBack => {
                self.clock.skip_back();
                CommandOutcome {
                    redraw: true,
                    scheduling: Scheduling::Unchanged,
                }
            }
            Command::SkipForward => {
                self.clock.skip_forward();
                CommandOutcome {
                    redraw: true,
                    scheduling: Scheduling::Unchanged,
                }
            }
            Command::SetSpeed(speed) => {
                self.clock.set_speed(speed);
                CommandOutcome {
                    redraw: true,
                    scheduling: Scheduling::Unchanged,
                }
            }
            Command::Toggle(layer) => {
                self.toggles.toggle(layer);
                CommandOutcome {
                    redraw: true,
                    scheduling: Scheduling::Unchanged,
                }
            }
        }
    }

    /// One host frame callback at wall-clock `now`.
    ///
    /// While playing, consumes the measured delta since the previous
    /// callback (zero for the first after play) and advances the clock. A
    /// stale callback arriving while not playing mutates nothing.
    pub fn on_frame(&mut self, now: Instant) -> FrameTick {
        if !self.clock.is_playing() {
            return FrameTick {
                ticked: false,
                request_next: false,
            };
        }
        let elapsed_ms = match self.last_frame {
            Some(prev) => now.saturating_duration_since(prev).as_secs_f64() * 1000.0,
            None => 0.0,
        };
        self.last_frame = Some(now);
        self.clock.tick(elapsed_ms);
        FrameTick {
            ticked: true,
            request_next: true,
        }
    }

    /// Compile the current frame, threading the heatmap cache, and execute
    /// it on `backend`.
    pub fn render_frame(&mut self, backend: &mut dyn RenderBackend) -> GazelineResult<FrameRGBA> {
        let state = self.playback();
        let plan = compile_frame_with_cache(
            &self.session,
            &self.source,
            &self.tokens,
            &state,
            &mut self.heatmap,
        );
        backend.render_plan(&plan)
    }

    /// Snapshot of the current playback state.
    pub fn playback(&self) -> PlaybackState {
        PlaybackState {
            current: self.clock.current(),
            playing: self.clock.is_playing(),
            speed: self.clock.speed(),
            toggles: self.toggles,
        }
    }

    /// Frame view at the current playback time.
    pub fn view(&self) -> FrameView<'_> {
        FrameView::at(&self.session, self.clock.current())
    }

    /// The loaded gaze session.
    pub fn session(&self) -> &GazeSession {
        &self.session
    }

    /// Summary statistics of the loaded session.
    pub fn stats(&self) -> SessionStats {
        SessionStats::of(&self.session)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/replay/engine.rs"]
mod tests;
