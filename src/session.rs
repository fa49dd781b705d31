//! Live capture session: score frames as they arrive, keep the best one.
//!
//! The session owns no devices. Frames come from a [`FrameSource`],
//! finished frames go to a [`FrameSink`], and per-frame status goes to a
//! [`FrameDisplay`], so the whole loop runs against scripted
//! collaborators in tests and against a real camera in production.
//!
//! Per frame the loop classifies pose, measures sharpness, fuses the two
//! into one score and offers the frame to the best-frame tracker. The
//! loop ends on an end-of-stream from the source or an explicit quit
//! signal, and always finishes with an export of whatever best frame
//! exists. Capture and detector failures are fatal and propagate to the
//! caller without retry.

use crate::config::{CaptureConfig, FrameSieveConfig, ScoringConfig};
use crate::errors::SieveError;
use crate::export::{best_frame_name, burst_frame_name, session_stamp, FrameSink};
use crate::pose::{LandmarkDetector, PoseClassifier};
use crate::scoring::{fuse_record, ScoreHistory, ScoreStats};
use crate::sharpness::{is_blurry, sharpness_score};
use crate::tracker::BestFrameTracker;
use crate::types::{CameraFrame, ScoreRecord};
use chrono::Utc;
use serde::Serialize;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

/// Pull-style frame supplier.
///
/// `Ok(None)` is a clean end of stream. An `Err` means the source broke
/// and the session must stop; sources do not retry internally.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<CameraFrame>, SieveError>;
}

/// User controls a live session reacts to between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Export the current best frame without stopping.
    SaveBest,
    /// Stop the session after the final best-frame export.
    Quit,
}

/// Everything the session produces for one processed frame.
#[derive(Debug, Clone)]
pub struct Tick {
    /// 1-based index of the frame within this session.
    pub sequence: u64,
    /// Copy of the frame with landmark overlays, for display only.
    pub annotated: CameraFrame,
    pub record: ScoreRecord,
    /// Hands that survived the confidence filter.
    pub hand_count: usize,
    pub is_blurry: bool,
    /// Best fused score seen so far, including this frame.
    pub best_score: f64,
    /// Whether this frame just became the retained best.
    pub new_best: bool,
}

/// Per-frame status consumer. Purely presentational; the session never
/// depends on what a display does with a tick.
pub trait FrameDisplay {
    fn show(&mut self, tick: &Tick);
}

/// Display that drops every tick. For headless runs and tests.
pub struct NullDisplay;

impl FrameDisplay for NullDisplay {
    fn show(&mut self, _tick: &Tick) {}
}

/// Display that logs one status line per frame.
pub struct ConsoleDisplay;

impl FrameDisplay for ConsoleDisplay {
    fn show(&mut self, tick: &Tick) {
        let blur_tag = if tick.is_blurry { " [BLURRY]" } else { "" };
        let best_tag = if tick.new_best { " *" } else { "" };
        log::info!(
            "frame {:>4} | sharpness {:>7.1}{} | pose {} ({:.2}) | fused {:>7.1} | best {:>7.1}{}",
            tick.sequence,
            tick.record.sharpness,
            blur_tag,
            tick.record.pose.state,
            tick.record.pose.confidence,
            tick.record.fused,
            tick.best_score,
            best_tag
        );
    }
}

/// End-of-session result.
///
/// Score statistics cover the retained history window, not every frame
/// the session ever saw.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub frames_processed: u64,
    /// Best fused score, or the empty sentinel if no frame was seen.
    pub best_score: f64,
    /// Where the final best-frame export landed, if anything was kept.
    pub saved_path: Option<String>,
    pub sharpness: Option<ScoreStats>,
    pub fused: Option<ScoreStats>,
}

/// The live scoring loop and the state it carries across frames.
pub struct LiveSession {
    scoring: ScoringConfig,
    classifier: PoseClassifier,
    tracker: BestFrameTracker,
    history: ScoreHistory,
    frames_processed: u64,
}

impl LiveSession {
    pub fn new(config: &FrameSieveConfig, detector: Box<dyn LandmarkDetector>) -> Self {
        let classifier = PoseClassifier::new(detector, config.scoring.hand_confidence_threshold)
            .with_spread_threshold(config.scoring.spread_threshold);
        Self {
            scoring: config.scoring.clone(),
            classifier,
            tracker: BestFrameTracker::new(),
            history: ScoreHistory::new(config.selection.buffer_size),
            frames_processed: 0,
        }
    }

    /// Score one frame and offer it to the tracker.
    ///
    /// The tracker sees the unannotated frame; overlays exist only on
    /// the display copy carried by the returned tick.
    pub fn process(&mut self, frame: &CameraFrame) -> Result<Tick, SieveError> {
        let observation = self.classifier.classify(frame)?;
        let sharpness = sharpness_score(frame);
        let record = fuse_record(sharpness, observation.signal, &self.scoring);

        let new_best = self.tracker.update(frame, record.fused);
        self.history.push(record);
        self.frames_processed += 1;

        Ok(Tick {
            sequence: self.frames_processed,
            annotated: observation.annotated,
            record,
            hand_count: observation.hand_count,
            is_blurry: is_blurry(sharpness, self.scoring.blur_threshold),
            best_score: self.tracker.best_score(),
            new_best,
        })
    }

    /// Export the current best frame through `sink`.
    ///
    /// Returns the sink identifier of the stored copy, or `None` when no
    /// frame has been retained yet.
    pub fn save_best<K: FrameSink + ?Sized>(
        &self,
        sink: &mut K,
    ) -> Result<Option<String>, SieveError> {
        match self.tracker.peek() {
            Some((frame, score)) => {
                let name = best_frame_name(Utc::now());
                let stored_as = sink.store(&name, frame)?;
                log::info!("Saved best frame (score {:.2}) as {}", score, stored_as);
                Ok(Some(stored_as))
            }
            None => {
                log::warn!("No best frame to save yet");
                Ok(None)
            }
        }
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn best_score(&self) -> f64 {
        self.tracker.best_score()
    }

    fn summary(&self, saved_path: Option<String>) -> SessionSummary {
        SessionSummary {
            frames_processed: self.frames_processed,
            best_score: self.tracker.best_score(),
            saved_path,
            sharpness: self.history.sharpness_stats(),
            fused: self.history.fused_stats(),
        }
    }

    /// Run the loop to completion.
    ///
    /// Each iteration drains pending control signals, then pulls and
    /// processes one frame. The source paces the loop; control polling
    /// never blocks. On quit or end of stream the best frame is exported
    /// and a summary returned. Source and detector errors propagate
    /// immediately without a final export.
    pub fn run<S, K, D>(
        &mut self,
        source: &mut S,
        sink: &mut K,
        display: &mut D,
        controls: Option<&Receiver<ControlSignal>>,
    ) -> Result<SessionSummary, SieveError>
    where
        S: FrameSource + ?Sized,
        K: FrameSink + ?Sized,
        D: FrameDisplay + ?Sized,
    {
        log::info!(
            "Live session started (detector: {})",
            self.classifier.detector_name()
        );

        'session: loop {
            if let Some(controls) = controls {
                loop {
                    match controls.try_recv() {
                        Ok(ControlSignal::Quit) => break 'session,
                        Ok(ControlSignal::SaveBest) => {
                            self.save_best(sink)?;
                        }
                        Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                    }
                }
            }

            match source.next_frame()? {
                Some(frame) => {
                    let tick = self.process(&frame)?;
                    display.show(&tick);
                }
                None => break,
            }
        }

        let saved = self.save_best(sink)?;
        let summary = self.summary(saved);
        log::info!(
            "Live session finished: {} frames processed, best score {:.2}",
            summary.frames_processed,
            summary.best_score
        );
        Ok(summary)
    }
}

/// Outcome of a capture burst.
#[derive(Debug, Clone, Serialize)]
pub struct BurstReport {
    /// Timestamp tag shared by every stored frame name.
    pub session: String,
    pub requested: u32,
    /// Sink identifiers in capture order.
    pub stored: Vec<String>,
}

/// Capture a fixed-size burst of frames into `sink`.
///
/// The sink is cleared first. A configured number of warm-up frames is
/// pulled and discarded so auto-exposure can settle, then frames are
/// stored at a fixed cadence under names sharing one session stamp. An
/// early end of stream shortens the burst; a source error aborts it.
pub fn capture_burst<S, K>(
    source: &mut S,
    sink: &mut K,
    capture: &CaptureConfig,
) -> Result<BurstReport, SieveError>
where
    S: FrameSource + ?Sized,
    K: FrameSink + ?Sized,
{
    let session = session_stamp(Utc::now());
    log::info!(
        "Burst {}: {} warm-up frames, {} captures at {} ms",
        session,
        capture.warmup_frames,
        capture.burst_count,
        capture.burst_interval_ms
    );

    sink.clear()?;

    for _ in 0..capture.warmup_frames {
        if source.next_frame()?.is_none() {
            log::warn!("Source ended during warm-up");
            return Ok(BurstReport {
                session,
                requested: capture.burst_count,
                stored: Vec::new(),
            });
        }
    }

    let interval = Duration::from_millis(capture.burst_interval_ms);
    let mut stored = Vec::with_capacity(capture.burst_count as usize);
    for index in 0..capture.burst_count {
        match source.next_frame()? {
            Some(frame) => {
                let name = burst_frame_name(&session, index);
                let stored_as = sink.store(&name, &frame)?;
                log::debug!("Captured {}", stored_as);
                stored.push(stored_as);
            }
            None => {
                log::warn!(
                    "Source ended after {} of {} frames",
                    index,
                    capture.burst_count
                );
                break;
            }
        }
        if index + 1 < capture.burst_count && !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    log::info!("Burst {} complete: {} frames stored", session, stored.len());
    Ok(BurstReport {
        session,
        requested: capture.burst_count,
        stored,
    })
}
