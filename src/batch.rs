//! Batch selection over an already-captured frame collection.
//!
//! This is the offline half of the pipeline: point it at a directory of
//! burst frames, it scores every decodable image by sharpness, ranks
//! them, and exports the top N through a [`FrameSink`]. Scoring here is
//! sharpness-only; pose fusion belongs to the live session, where a
//! detector is attached.
//!
//! A run that scores zero frames is a failure ([`BatchError::NoInput`]).
//! A run that scores some frames but fewer than N is a success with a
//! shorter selection.

use crate::errors::SieveError;
use crate::export::{ranked_frame_name, FrameSink};
use crate::scoring::{score_stats, ScoreStats};
use crate::sharpness::sharpness_score;
use crate::types::CameraFrame;
use serde::Serialize;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions considered candidate frames during a directory scan.
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Failure of a whole selection run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Zero frames survived scanning and decoding. Distinct from a
    /// short selection, which is reported as success.
    #[error("No input: no frames could be scored")]
    NoInput,
    /// The input directory itself could not be enumerated.
    #[error("Failed to read input directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A pipeline failure, typically export.
    #[error("{0}")]
    Sieve(#[from] SieveError),
}

/// One input frame with its sharpness score attached.
#[derive(Debug, Clone)]
pub struct ScoredFrame {
    /// File name the frame came from, used to build export names.
    pub source_id: String,
    pub sharpness: f64,
    pub frame: CameraFrame,
}

/// One exported entry of a finished selection.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionEntry {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub source_id: String,
    pub sharpness: f64,
    /// Sink identifier of the stored copy.
    pub stored_as: String,
}

/// Outcome of a selection run.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionReport {
    /// Frames that decoded and were scored.
    pub considered: usize,
    /// Candidate files that failed to decode and were skipped.
    pub skipped: usize,
    /// Exported entries in rank order.
    pub selected: Vec<SelectionEntry>,
    /// Sharpness statistics over every considered frame.
    pub stats: Option<ScoreStats>,
}

/// Per-file sharpness, reported by [`directory_stats`].
#[derive(Debug, Clone, Serialize)]
pub struct FrameScore {
    pub source_id: String,
    pub sharpness: f64,
}

/// Scan-only report: scores without any export.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryStats {
    pub considered: usize,
    pub skipped: usize,
    /// Per-frame scores in scan order.
    pub frames: Vec<FrameScore>,
    pub stats: ScoreStats,
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.iter().any(|known| *known == ext)
        })
        .unwrap_or(false)
}

/// List candidate image files under `dir`, sorted by file name.
///
/// Lexicographic order makes reruns deterministic and keeps burst
/// sequence numbers in capture order.
pub fn list_image_files(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let entries = fs::read_dir(dir).map_err(|source| BatchError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| BatchError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_image_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Decode one image file into an RGB frame.
pub fn load_frame(path: &Path) -> Result<CameraFrame, SieveError> {
    let image = image::open(path)
        .map_err(|e| SieveError::Decode(format!("{}: {}", path.display(), e)))?;
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(CameraFrame::new(rgb.into_raw(), width, height, "batch".to_string()))
}

/// Scan `dir`, decode every candidate and score it by sharpness.
///
/// Unreadable files are logged and skipped rather than failing the run.
/// Returns the scored frames in scan order plus the skip count.
pub fn score_directory(dir: &Path) -> Result<(Vec<ScoredFrame>, usize), BatchError> {
    let files = list_image_files(dir)?;
    let mut scored = Vec::with_capacity(files.len());
    let mut skipped = 0usize;

    for path in files {
        let source_id = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        match load_frame(&path) {
            Ok(frame) => {
                let sharpness = sharpness_score(&frame);
                log::debug!("Scored {}: sharpness {:.2}", source_id, sharpness);
                scored.push(ScoredFrame {
                    source_id,
                    sharpness,
                    frame,
                });
            }
            Err(err) => {
                log::warn!("Skipping unreadable frame {}: {}", source_id, err);
                skipped += 1;
            }
        }
    }

    Ok((scored, skipped))
}

/// Order frames by descending sharpness.
///
/// The sort is stable, so equal scores keep their scan order and reruns
/// over the same input produce the same ranking.
pub fn rank_frames(mut scored: Vec<ScoredFrame>) -> Vec<ScoredFrame> {
    scored.sort_by(|a, b| b.sharpness.partial_cmp(&a.sharpness).unwrap_or(Ordering::Equal));
    scored
}

/// Rank scored frames and export the top `top_n` through `sink`.
///
/// The sink is cleared first so a fresh selection never mixes with a
/// stale one. If a store fails partway, the sink is cleared again on a
/// best-effort basis before the error propagates, so the destination is
/// never left holding a partial selection.
pub fn select_scored<S: FrameSink + ?Sized>(
    scored: Vec<ScoredFrame>,
    sink: &mut S,
    top_n: usize,
) -> Result<SelectionReport, BatchError> {
    if scored.is_empty() {
        return Err(BatchError::NoInput);
    }

    let considered = scored.len();
    let scores: Vec<f64> = scored.iter().map(|s| s.sharpness).collect();
    let stats = score_stats(&scores);

    let ranked = rank_frames(scored);
    let keep = top_n.min(ranked.len());

    sink.clear().map_err(BatchError::Sieve)?;

    let mut selected = Vec::with_capacity(keep);
    for (index, entry) in ranked.iter().take(keep).enumerate() {
        let rank = index + 1;
        let name = ranked_frame_name(rank, &entry.source_id);
        match sink.store(&name, &entry.frame) {
            Ok(stored_as) => {
                log::info!("Selected {} (sharpness {:.2})", stored_as, entry.sharpness);
                selected.push(SelectionEntry {
                    rank,
                    source_id: entry.source_id.clone(),
                    sharpness: entry.sharpness,
                    stored_as,
                });
            }
            Err(err) => {
                if let Err(clear_err) = sink.clear() {
                    log::warn!("Could not clear partial selection: {}", clear_err);
                }
                return Err(BatchError::Sieve(err));
            }
        }
    }

    Ok(SelectionReport {
        considered,
        skipped: 0,
        selected,
        stats,
    })
}

/// Full batch run: scan `input_dir`, score, rank and export the top
/// `top_n` frames through `sink`.
pub fn select_best_frames<S: FrameSink + ?Sized>(
    input_dir: &Path,
    sink: &mut S,
    top_n: usize,
) -> Result<SelectionReport, BatchError> {
    log::info!(
        "Selecting up to {} frames from {}",
        top_n,
        input_dir.display()
    );

    let (scored, skipped) = score_directory(input_dir)?;
    let mut report = select_scored(scored, sink, top_n)?;
    report.skipped = skipped;

    if let Some(stats) = &report.stats {
        log::info!(
            "Scored {} frames: mean {:.2}, max {:.2}, min {:.2}",
            stats.samples,
            stats.mean,
            stats.max,
            stats.min
        );
    }
    log::info!(
        "Selection complete: {} of {} frames exported",
        report.selected.len(),
        report.considered
    );

    Ok(report)
}

/// Score a directory without exporting anything.
pub fn directory_stats(dir: &Path) -> Result<DirectoryStats, BatchError> {
    let (scored, skipped) = score_directory(dir)?;
    if scored.is_empty() {
        return Err(BatchError::NoInput);
    }

    let scores: Vec<f64> = scored.iter().map(|s| s.sharpness).collect();
    let stats = score_stats(&scores).ok_or(BatchError::NoInput)?;
    let frames = scored
        .into_iter()
        .map(|s| FrameScore {
            source_id: s.source_id,
            sharpness: s.sharpness,
        })
        .collect();

    Ok(DirectoryStats {
        considered: scores.len(),
        skipped,
        frames,
        stats,
    })
}
