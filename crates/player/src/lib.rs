//! Playback state machine for the MyVoice Studio client.
//!
//! Models the audio-player logic free of any UI: a queue of demo ids, the
//! current phase, shuffle/repeat flags, and the transitions driven by user
//! actions (`open`, `play`, `pause`, `seek`, `next`, `prev`) and audio
//! element events (`on_loaded_metadata`, `on_time_update`, `on_ended`).
//!
//! Phases: `Idle → Loaded → Playing ⇄ Paused`, with `Ended` only as a
//! transient outcome of a track running out while repeat is off and the
//! queue is empty of alternatives. Shuffle and repeat are independent flags,
//! not phases.

use myvoice_core::DemoId;
use rand::Rng;

/// Playback phase of the bound track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// No track bound.
    Idle,
    /// Track bound, not yet started (or stopped at the start).
    Loaded,
    Playing,
    Paused,
    /// Track ran out and nothing advanced (empty queue edge case).
    Ended,
}

/// The player state machine.
#[derive(Clone, Debug)]
pub struct Player {
    queue: Vec<DemoId>,
    current: Option<usize>,
    phase: PlaybackPhase,
    shuffle: bool,
    repeat: bool,
    /// Playback position in seconds.
    position: f64,
    /// Track duration in seconds, known once metadata has loaded.
    duration: Option<f64>,
}

impl Player {
    /// Create an idle player over a queue of track ids.
    pub fn new(queue: Vec<DemoId>) -> Self {
        Self {
            queue,
            current: None,
            phase: PlaybackPhase::Idle,
            shuffle: false,
            repeat: false,
            position: 0.0,
            duration: None,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// The currently bound track id, if any.
    pub fn current_track(&self) -> Option<DemoId> {
        self.current.map(|i| self.queue[i])
    }

    /// Replace the queue, keeping the bound track when it survives.
    pub fn set_queue(&mut self, queue: Vec<DemoId>) {
        let bound = self.current_track();
        self.queue = queue;
        self.current = bound.and_then(|id| self.queue.iter().position(|t| *t == id));
        if self.current.is_none() {
            self.phase = PlaybackPhase::Idle;
            self.position = 0.0;
            self.duration = None;
        }
    }

    /// Bind a track by id. Returns false for ids not in the queue.
    ///
    /// Reopening the already-bound track is a pure UI sync: position, phase
    /// and duration are untouched, so playback never audibly restarts.
    /// Opening a different track rebinds: position zero, duration unknown,
    /// phase Loaded.
    pub fn open(&mut self, id: DemoId) -> bool {
        let Some(index) = self.queue.iter().position(|t| *t == id) else {
            return false;
        };

        if self.current == Some(index) && self.phase != PlaybackPhase::Idle {
            return true;
        }

        self.bind(index);
        true
    }

    /// Start or resume playback of the bound track.
    pub fn play(&mut self) {
        if self.current.is_some() {
            self.phase = PlaybackPhase::Playing;
        }
    }

    /// Pause playback.
    pub fn pause(&mut self) {
        if self.phase == PlaybackPhase::Playing {
            self.phase = PlaybackPhase::Paused;
        }
    }

    /// Scrub to a position in seconds. A no-op until duration is known;
    /// never changes phase.
    pub fn seek(&mut self, secs: f64) {
        if let Some(duration) = self.duration {
            self.position = secs.clamp(0.0, duration);
        }
    }

    /// Track metadata arrived: duration is now known.
    pub fn on_loaded_metadata(&mut self, duration: f64) {
        self.duration = Some(duration.max(0.0));
    }

    /// Playback clock advanced.
    pub fn on_time_update(&mut self, position: f64) {
        self.position = position.max(0.0);
    }

    /// The bound track ran out.
    ///
    /// With repeat set the same track restarts from zero and stays Playing.
    /// Otherwise the player advances per the shuffle policy and starts the
    /// next track.
    pub fn on_ended(&mut self) {
        self.on_ended_with(&mut rand::rng());
    }

    /// `on_ended` with an explicit random source.
    pub fn on_ended_with<R: Rng>(&mut self, rng: &mut R) {
        if self.repeat {
            self.position = 0.0;
            self.phase = PlaybackPhase::Playing;
            return;
        }
        self.advance_with(rng);
    }

    /// Skip to the next track per the shuffle policy and start playing.
    pub fn next(&mut self) {
        self.advance_with(&mut rand::rng());
    }

    /// `next` with an explicit random source.
    pub fn next_with<R: Rng>(&mut self, rng: &mut R) {
        self.advance_with(rng);
    }

    /// Skip to the previous track (sequential wraparound) and start playing.
    pub fn prev(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let index = match self.current {
            Some(current) => (current + self.queue.len() - 1) % self.queue.len(),
            None => 0,
        };
        self.bind(index);
        self.phase = PlaybackPhase::Playing;
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
    }

    fn advance_with<R: Rng>(&mut self, rng: &mut R) {
        if self.queue.is_empty() {
            self.phase = PlaybackPhase::Ended;
            return;
        }
        let index = match self.current {
            Some(current) if self.shuffle => {
                random_index_excluding(rng, current, self.queue.len())
            }
            Some(current) => (current + 1) % self.queue.len(),
            None => 0,
        };
        self.bind(index);
        self.phase = PlaybackPhase::Playing;
    }

    fn bind(&mut self, index: usize) {
        self.current = Some(index);
        self.position = 0.0;
        self.duration = None;
        self.phase = PlaybackPhase::Loaded;
    }
}

/// Uniform random index in `0..len`, never equal to `exclude` when there is
/// more than one choice.
pub fn random_index_excluding<R: Rng>(rng: &mut R, exclude: usize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let mut index = exclude;
    while index == exclude {
        index = rng.random_range(0..len);
    }
    index
}
