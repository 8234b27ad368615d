//! Sound and celebration triggers
//!
//! The core only fires these; playback and confetti drawing belong to the
//! platform layer, which implements `Feedback`.

use std::cell::RefCell;

use crate::settings::Settings;

/// Feedback signal types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Press landed on target
    Hit,
    /// Press missed, round over
    Miss,
    /// Round placed in the top of the leaderboard
    Celebrate,
}

/// Fire-and-forget audio/visual triggers
pub trait Feedback {
    fn play_hit(&self);
    fn play_miss(&self);
    fn celebrate(&self);
}

/// Does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFeedback;

impl Feedback for SilentFeedback {
    fn play_hit(&self) {}
    fn play_miss(&self) {}
    fn celebrate(&self) {}
}

/// Reports every signal through the `log` facade (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn play_hit(&self) {
        log::debug!("♪ hitmarker");
    }

    fn play_miss(&self) {
        log::info!("♪ miss");
    }

    fn celebrate(&self) {
        log::info!("🎉 confetti!");
    }
}

/// Remembers signals in order, for tests and replays
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    signals: RefCell<Vec<Signal>>,
}

impl RecordingFeedback {
    pub fn signals(&self) -> Vec<Signal> {
        self.signals.borrow().clone()
    }

    fn record(&self, signal: Signal) {
        self.signals.borrow_mut().push(signal);
    }
}

impl Feedback for RecordingFeedback {
    fn play_hit(&self) {
        self.record(Signal::Hit);
    }

    fn play_miss(&self) {
        self.record(Signal::Miss);
    }

    fn celebrate(&self) {
        self.record(Signal::Celebrate);
    }
}

/// Applies player settings in front of another `Feedback`
#[derive(Debug)]
pub struct GatedFeedback<F> {
    inner: F,
    settings: Settings,
}

impl<F: Feedback> GatedFeedback<F> {
    pub fn new(inner: F, settings: Settings) -> Self {
        Self { inner, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    fn sound_on(&self) -> bool {
        self.settings.effective_volume() > 0.0
    }
}

impl<F: Feedback> Feedback for GatedFeedback<F> {
    fn play_hit(&self) {
        if self.sound_on() {
            self.inner.play_hit();
        }
    }

    fn play_miss(&self) {
        if self.sound_on() {
            self.inner.play_miss();
        }
    }

    fn celebrate(&self) {
        if self.settings.effective_confetti() {
            self.inner.celebrate();
        }
    }
}
