//! The capture loop feeding the gesture processor.
//!
//! A [`PerceptionSource`] runs on its own thread at whatever cadence the
//! capture device allows. [`PerceptionRuntime::stop`] joins that thread, so by
//! the time it returns the source has been closed and no further observations
//! reach the [`SignalCell`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::PerceptionError;
use crate::gesture::{GestureProcessor, LandmarkFrame};
use crate::signal::{Observation, SignalCell};

/// How long one poll may block before the loop rechecks its stop flag.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Anything that can deliver hand landmark frames.
pub trait PerceptionSource: Send + 'static {
    /// Acquire the capture device and any inference backend.
    fn open(&mut self) -> Result<(), PerceptionError>;

    /// Wait up to `timeout` for the next frame. `Ok(None)` means nothing new
    /// arrived; an empty frame means no hand was found.
    fn next_frame(&mut self, timeout: Duration) -> Result<Option<LandmarkFrame>, PerceptionError>;

    /// Release everything acquired in [`open`](Self::open). Called exactly
    /// once per successful open, on the capture thread.
    fn close(&mut self);
}

struct Session {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Owns the capture thread for at most one perception session.
pub struct PerceptionRuntime {
    cell: SignalCell,
    alpha: f32,
    session: Option<Session>,
}

impl PerceptionRuntime {
    pub fn new(cell: SignalCell, alpha: f32) -> Self {
        Self {
            cell,
            alpha,
            session: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| !s.handle.is_finished())
    }

    /// Start capturing from `source`. A session already running is stopped first.
    pub fn start<S: PerceptionSource>(&mut self, source: S) {
        self.stop();
        let stop = Arc::new(AtomicBool::new(false));
        let processor = GestureProcessor::with_alpha(self.cell.clone(), self.alpha);
        let stop_flag = Arc::clone(&stop);
        let spawned = thread::Builder::new()
            .name("perception".into())
            .spawn(move || capture_loop(source, processor, stop_flag));
        match spawned {
            Ok(handle) => {
                log::info!("[perception] started");
                self.session = Some(Session { stop, handle });
            }
            Err(e) => log::warn!("[perception] could not spawn capture thread: {e}"),
        }
    }

    /// Stop capturing and release the source. Safe to call repeatedly.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        session.stop.store(true, Ordering::SeqCst);
        if session.handle.join().is_err() {
            log::warn!("[perception] capture thread panicked");
        }
        // Hand consumers back to the idle signal.
        self.cell.apply(&Observation::FALLBACK, self.alpha);
        log::info!("[perception] stopped");
    }
}

impl Drop for PerceptionRuntime {
    fn drop(&mut self) {
        self.stop();
    }
}

fn capture_loop<S: PerceptionSource>(
    mut source: S,
    mut processor: GestureProcessor,
    stop: Arc<AtomicBool>,
) {
    if let Err(e) = source.open() {
        log::warn!("[perception] {e}; continuing without gesture input");
        return;
    }
    while !stop.load(Ordering::SeqCst) {
        match source.next_frame(POLL_TIMEOUT) {
            Ok(Some(frame)) => {
                // A frame that lands after stop was requested is dropped.
                if stop.load(Ordering::SeqCst) {
                    break;
                }
                processor.process(&frame);
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("[perception] {e}; gesture input disabled");
                processor.push(&Observation::FALLBACK);
                break;
            }
        }
    }
    source.close();
}

/// Replays a fixed list of frames, one per poll, then reports nothing new.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    frames: VecDeque<LandmarkFrame>,
    frame_interval: Duration,
    opened: bool,
    closed: Option<Arc<AtomicBool>>,
}

impl ScriptedSource {
    pub fn new<I: IntoIterator<Item = LandmarkFrame>>(frames: I) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Pause between frames, to mimic a capture device's cadence.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Flag raised when the source is closed.
    pub fn close_flag(&mut self) -> Arc<AtomicBool> {
        Arc::clone(self.closed.get_or_insert_with(Default::default))
    }
}

impl PerceptionSource for ScriptedSource {
    fn open(&mut self) -> Result<(), PerceptionError> {
        self.opened = true;
        Ok(())
    }

    fn next_frame(&mut self, timeout: Duration) -> Result<Option<LandmarkFrame>, PerceptionError> {
        if !self.opened {
            return Err(PerceptionError::Capture("source not opened".into()));
        }
        match self.frames.pop_front() {
            Some(frame) => {
                if !self.frame_interval.is_zero() {
                    thread::sleep(self.frame_interval.min(timeout));
                }
                Ok(Some(frame))
            }
            None => {
                thread::sleep(timeout);
                Ok(None)
            }
        }
    }

    fn close(&mut self) {
        self.opened = false;
        if let Some(flag) = &self.closed {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

/// A source whose device can never be opened.
#[derive(Clone, Debug)]
pub struct UnavailableSource {
    pub reason: String,
}

impl UnavailableSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl PerceptionSource for UnavailableSource {
    fn open(&mut self) -> Result<(), PerceptionError> {
        Err(PerceptionError::Unavailable(self.reason.clone()))
    }

    fn next_frame(&mut self, _timeout: Duration) -> Result<Option<LandmarkFrame>, PerceptionError> {
        Err(PerceptionError::Unavailable(self.reason.clone()))
    }

    fn close(&mut self) {}
}
