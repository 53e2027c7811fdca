//! Gesture input: hand readings, sources and the producer thread.
//!
//! A [`GestureSource`] produces readings at its own cadence (one per video
//! frame for a camera tracker, one per pointer event for the simulator). A
//! [`GestureProducer`] drives a source on its own thread and publishes each
//! reading into a [`LatestCell`] that the scene drains once per frame.
//!
//! Stopping the producer only stops new readings; whatever the scene last
//! applied stays in effect.

use crate::config::SceneConfig;
use crate::error::GestureError;
use crate::signal::LatestCell;
use glam::{Vec2, Vec3};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// One classified hand reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    /// Thumb and index finger are touching.
    pub pinching: bool,
    /// Index fingertip x in camera image coordinates, `0..=1`.
    pub pointer_x: f32,
}

impl GestureSample {
    /// Create a sample.
    pub fn new(pinching: bool, pointer_x: f32) -> Self {
        Self {
            pinching,
            pointer_x,
        }
    }

    /// Check that the pointer coordinate is usable.
    pub fn validate(&self) -> Result<(), GestureError> {
        if !self.pointer_x.is_finite() {
            return Err(GestureError::NonFinite { field: "pointer_x" });
        }
        if !(0.0..=1.0).contains(&self.pointer_x) {
            return Err(GestureError::OutOfRange {
                field: "pointer_x",
                value: self.pointer_x,
            });
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmarks and pinch classification
// ════════════════════════════════════════════════════════════════════════════

/// Number of landmarks reported per hand.
pub const LANDMARK_COUNT: usize = 21;
/// Landmark index of the thumb tip.
pub const THUMB_TIP: usize = 4;
/// Landmark index of the index fingertip.
pub const INDEX_TIP: usize = 8;

/// Landmarks of one detected hand in normalized image coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Vec3; LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Wrap a full set of landmarks.
    pub fn new(points: [Vec3; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build from a slice; `None` unless exactly [`LANDMARK_COUNT`] points are given.
    pub fn from_slice(points: &[Vec3]) -> Option<Self> {
        let points: [Vec3; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self { points })
    }

    /// Thumb tip position.
    pub fn thumb_tip(&self) -> Vec3 {
        self.points[THUMB_TIP]
    }

    /// Index fingertip position.
    pub fn index_tip(&self) -> Vec3 {
        self.points[INDEX_TIP]
    }
}

/// Turns landmarks into a [`GestureSample`].
#[derive(Clone, Copy, Debug)]
pub struct PinchClassifier {
    /// Image-plane thumb-to-index distance below which the hand is pinching.
    pub threshold: f32,
}

impl PinchClassifier {
    /// Create a classifier with the given pinch threshold.
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Classifier using the scene's `pinch_threshold`.
    pub fn from_config(config: &SceneConfig) -> Self {
        Self::new(config.pinch_threshold)
    }

    /// Classify one hand. Depth is ignored.
    pub fn classify(&self, hand: &HandLandmarks) -> GestureSample {
        let thumb = hand.thumb_tip();
        let index = hand.index_tip();
        let distance = Vec2::new(thumb.x, thumb.y).distance(Vec2::new(index.x, index.y));

        GestureSample::new(distance < self.threshold, index.x)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sources
// ════════════════════════════════════════════════════════════════════════════

/// Result of polling a [`GestureSource`] once.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceEvent {
    /// A hand was seen.
    Detected(GestureSample),
    /// A frame arrived (or the wait timed out) without a hand.
    NoHand,
    /// The source has shut down for good.
    Closed,
}

/// Anything that can deliver gesture readings.
///
/// `poll` may block until the next reading, but must return periodically
/// (with [`SourceEvent::NoHand`] if nothing happened) so the producer can
/// notice a stop request.
pub trait GestureSource: Send + 'static {
    fn poll(&mut self) -> SourceEvent;
}

/// One frame from an external hand-landmark detector.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackerFrame {
    /// A hand was detected in the frame.
    Hand(HandLandmarks),
    /// The frame contained no hand.
    NoHand,
    /// The camera or detector has stopped.
    Ended,
}

/// External landmark detector, called once per available video frame.
pub trait HandTracker: Send + 'static {
    fn next_frame(&mut self) -> TrackerFrame;
}

/// Adapts a [`HandTracker`] into a [`GestureSource`] through a [`PinchClassifier`].
pub struct TrackerSource<T: HandTracker> {
    tracker: T,
    classifier: PinchClassifier,
}

impl<T: HandTracker> TrackerSource<T> {
    /// Wrap `tracker`.
    pub fn new(tracker: T, classifier: PinchClassifier) -> Self {
        Self {
            tracker,
            classifier,
        }
    }
}

impl<T: HandTracker> GestureSource for TrackerSource<T> {
    fn poll(&mut self) -> SourceEvent {
        match self.tracker.next_frame() {
            TrackerFrame::Hand(hand) => SourceEvent::Detected(self.classifier.classify(&hand)),
            TrackerFrame::NoHand => SourceEvent::NoHand,
            TrackerFrame::Ended => SourceEvent::Closed,
        }
    }
}

/// Raw pointer event forwarded from the viewer window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    /// Cursor moved; `x` is normalized window x, `0` at the left edge.
    Moved { x: f32 },
    /// Button went down.
    Pressed,
    /// Button went up.
    Released,
    /// Cursor left the window.
    Left,
}

/// Thumb-to-index gap of the simulated hand while the button is up.
pub const OPEN_HAND_GAP: f32 = 0.25;

/// Simulated hand driven by the pointer: button held closes the thumb onto
/// the index finger.
///
/// The simulated landmarks go through the same [`PinchClassifier`] a camera
/// tracker would use. Window x is flipped into camera image x, as a front
/// camera would see a hand moving with the pointer.
///
/// Dropping the sending half closes the source on its next poll.
pub struct PointerSource {
    rx: Receiver<PointerInput>,
    idle: Duration,
    classifier: PinchClassifier,
    button_down: bool,
    pointer_x: Option<f32>,
}

impl PointerSource {
    /// Read pointer events from `rx`.
    pub fn new(rx: Receiver<PointerInput>, classifier: PinchClassifier) -> Self {
        Self {
            rx,
            idle: Duration::from_millis(50),
            classifier,
            button_down: false,
            pointer_x: None,
        }
    }

    fn hand(&self, x: f32) -> HandLandmarks {
        let gap = if self.button_down { 0.0 } else { OPEN_HAND_GAP };
        let mut points = [Vec3::new(x, 0.5, 0.0); LANDMARK_COUNT];
        points[THUMB_TIP] = Vec3::new(x - gap, 0.5, 0.0);
        HandLandmarks::new(points)
    }
}

impl GestureSource for PointerSource {
    fn poll(&mut self) -> SourceEvent {
        match self.rx.recv_timeout(self.idle) {
            Ok(input) => {
                match input {
                    PointerInput::Moved { x } => self.pointer_x = Some(1.0 - x),
                    PointerInput::Pressed => self.button_down = true,
                    PointerInput::Released => self.button_down = false,
                    PointerInput::Left => self.pointer_x = None,
                }
                match self.pointer_x {
                    Some(x) => SourceEvent::Detected(self.classifier.classify(&self.hand(x))),
                    None => SourceEvent::NoHand,
                }
            }
            Err(RecvTimeoutError::Timeout) => SourceEvent::NoHand,
            Err(RecvTimeoutError::Disconnected) => SourceEvent::Closed,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Producer thread
// ════════════════════════════════════════════════════════════════════════════

/// Handle to a gesture source running on its own thread.
///
/// Dropping the handle stops and joins the thread.
pub struct GestureProducer {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    feed: Arc<LatestCell<GestureSample>>,
}

impl GestureProducer {
    /// Start polling `source` on a new thread.
    pub fn spawn<S: GestureSource>(mut source: S) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let feed = LatestCell::shared();

        let handle = {
            let stop = Arc::clone(&stop);
            let feed = Arc::clone(&feed);
            thread::Builder::new()
                .name("gesture".into())
                .spawn(move || {
                    while !stop.load(Ordering::Acquire) {
                        match source.poll() {
                            SourceEvent::Detected(sample) => feed.publish(sample),
                            SourceEvent::NoHand => {}
                            SourceEvent::Closed => {
                                log::info!("Gesture source closed");
                                break;
                            }
                        }
                    }
                })?
        };

        log::info!("Gesture producer started");
        Ok(Self {
            stop,
            handle: Some(handle),
            feed,
        })
    }

    /// The cell readings are published into.
    pub fn feed(&self) -> Arc<LatestCell<GestureSample>> {
        Arc::clone(&self.feed)
    }

    /// Whether the producer thread is still polling.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Ask the thread to stop and wait for it.
    ///
    /// Waits for the source's current poll to return, so close a blocking
    /// source first (for [`PointerSource`], drop its sender).
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Gesture producer panicked");
            }
            log::info!("Gesture producer stopped");
        }
    }
}

impl Drop for GestureProducer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
