//! # Playback
//!
//! The single periodic timer behind interactive playback.
//!
//! [`Playback`] is the pure clock state (current tick, delay, running and
//! looping flags). [`Ticker`] is the thread that wakes up every `delay` and
//! emits a tick on a channel; it owns no animation state.

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, trace};

use crate::error::{AnimatorError, Result};
use crate::model::{AnimatorModel, RenderedShape};

const MIN_DELAY: Duration = Duration::from_millis(1);
/// Slowest playback: one tick an hour.
const MAX_DELAY: Duration = Duration::from_secs(60 * 60);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playback {
    tick: u32,
    delay: Duration,
    running: bool,
    looping: bool,
}

impl Playback {
    /// A paused clock at tick 1 running at `speed` ticks per second.
    pub fn new(speed: u32) -> Result<Self> {
        if speed == 0 {
            return Err(AnimatorError::InvalidSpeed);
        }
        Ok(Self {
            tick: 1,
            delay: Duration::from_millis(1000 / speed as u64).max(MIN_DELAY),
            running: false,
            looping: false,
        })
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn restart(&mut self) {
        self.tick = 1;
    }

    pub fn speed_up(&mut self) {
        self.delay = (self.delay / 2).max(MIN_DELAY);
    }

    pub fn slow_down(&mut self) {
        self.delay = self
            .delay
            .checked_mul(2)
            .map_or(MAX_DELAY, |d| d.min(MAX_DELAY));
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Handles one timer tick.
    ///
    /// Returns the frame to display, or `None` while paused. When looping
    /// and the clock has run past the last keyframe, it wraps back to tick 1
    /// and the first frame is shown.
    pub fn advance(&mut self, model: &AnimatorModel) -> Option<Vec<RenderedShape>> {
        if !self.running {
            return None;
        }
        if self.looping && model.is_animation_done(self.tick) {
            debug!(from = self.tick, "looping back to tick 1");
            self.tick = 1;
        }
        let frame = model.tween(self.tick);
        trace!(tick = self.tick, shapes = frame.len(), "advance");
        self.tick = self.tick.saturating_add(1);
        Some(frame)
    }
}

enum TickerControl {
    SetDelay(Duration),
    Stop,
}

/// Background thread emitting `()` on a channel every `delay`.
pub struct Ticker {
    control: Sender<TickerControl>,
    ticks: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(delay: Duration) -> Self {
        let (control_tx, control_rx) = unbounded();
        // A single slot: ticks are dropped rather than queued while the consumer is busy.
        let (tick_tx, tick_rx) = bounded(1);

        let handle = thread::spawn(move || {
            let mut delay = delay;
            loop {
                match control_rx.recv_timeout(delay) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Err(TrySendError::Disconnected(_)) = tick_tx.try_send(()) {
                            break;
                        }
                    }
                    Ok(TickerControl::SetDelay(d)) => {
                        debug!(?d, "ticker delay changed");
                        delay = d;
                    }
                    Ok(TickerControl::Stop) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            control: control_tx,
            ticks: tick_rx,
            handle: Some(handle),
        }
    }

    pub fn ticks(&self) -> &Receiver<()> {
        &self.ticks
    }

    pub fn set_delay(&self, delay: Duration) {
        let _ = self.control.send(TickerControl::SetDelay(delay));
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        let _ = self.control.send(TickerControl::Stop);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
