//! End-to-end batch selection over real directories
//!
//! Writes synthetic frames to disk as PNG files, runs the full
//! scan/score/rank/export flow against a directory sink, and checks
//! what actually lands on the filesystem.

use framesieve::batch::{directory_stats, select_best_frames, BatchError};
use framesieve::export::DirectorySink;
use framesieve::testing::{box_blur, checkerboard_frame, flat_frame};
use framesieve::types::CameraFrame;
use std::fs;
use std::path::Path;

fn write_png(dir: &Path, name: &str, frame: &CameraFrame) {
    let img = image::RgbImage::from_raw(frame.width, frame.height, frame.data.clone()).unwrap();
    img.save(dir.join(name)).unwrap();
}

/// Input set whose rank order (sharp > medium > soft) reverses the file
/// name order, so tests can tell ranking from scanning.
fn populate_input(dir: &Path) {
    let sharp = checkerboard_frame(32, 32, 1);
    write_png(dir, "aaa_soft.png", &box_blur(&sharp, 2));
    write_png(dir, "bbb_medium.png", &box_blur(&sharp, 1));
    write_png(dir, "ccc_sharp.png", &sharp);
}

fn stored_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod selection_tests {
    use super::*;

    #[test]
    fn test_top_two_land_on_disk_in_rank_order() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("input");
        let output = workspace.path().join("output");
        fs::create_dir(&input).unwrap();
        populate_input(&input);

        let mut sink = DirectorySink::create(&output, 95).unwrap();
        let report = select_best_frames(&input, &mut sink, 2).unwrap();

        assert_eq!(report.considered, 3);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.selected.len(), 2);
        assert_eq!(report.selected[0].source_id, "ccc_sharp.png");
        assert_eq!(report.selected[1].source_id, "bbb_medium.png");
        assert!(report.selected[0].sharpness > report.selected[1].sharpness);

        assert_eq!(
            stored_file_names(&output),
            vec![
                "selected_01_ccc_sharp.png".to_string(),
                "selected_02_bbb_medium.png".to_string(),
            ]
        );
        for entry in &report.selected {
            assert!(Path::new(&entry.stored_as).exists());
        }
    }

    #[test]
    fn test_asking_for_more_than_available_selects_all() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("input");
        let output = workspace.path().join("output");
        fs::create_dir(&input).unwrap();
        populate_input(&input);

        let mut sink = DirectorySink::create(&output, 95).unwrap();
        let report = select_best_frames(&input, &mut sink, 10).unwrap();

        assert_eq!(report.selected.len(), 3);
        assert_eq!(stored_file_names(&output).len(), 3);
    }

    #[test]
    fn test_undecodable_files_are_skipped_not_fatal() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("input");
        let output = workspace.path().join("output");
        fs::create_dir(&input).unwrap();
        populate_input(&input);
        fs::write(input.join("zzz_corrupt.jpg"), b"not an image").unwrap();

        let mut sink = DirectorySink::create(&output, 95).unwrap();
        let report = select_best_frames(&input, &mut sink, 10).unwrap();

        assert_eq!(report.considered, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.selected.len(), 3);
    }

    #[test]
    fn test_stale_output_is_cleared_before_export() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("input");
        let output = workspace.path().join("output");
        fs::create_dir(&input).unwrap();
        fs::create_dir(&output).unwrap();
        fs::write(output.join("selected_01_stale.png"), b"old run").unwrap();
        populate_input(&input);

        let mut sink = DirectorySink::create(&output, 95).unwrap();
        select_best_frames(&input, &mut sink, 1).unwrap();

        let names = stored_file_names(&output);
        assert_eq!(names, vec!["selected_01_ccc_sharp.png".to_string()]);
    }
}

#[cfg(test)]
mod failure_tests {
    use super::*;

    #[test]
    fn test_directory_without_frames_is_no_input() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("input");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("notes.txt"), b"not a frame").unwrap();

        let mut sink = DirectorySink::create(workspace.path().join("output"), 95).unwrap();
        let err = select_best_frames(&input, &mut sink, 3).unwrap_err();
        assert!(matches!(err, BatchError::NoInput));
    }

    #[test]
    fn test_missing_input_directory_is_read_dir_error() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("does_not_exist");

        let mut sink = DirectorySink::create(workspace.path().join("output"), 95).unwrap();
        let err = select_best_frames(&input, &mut sink, 3).unwrap_err();
        match err {
            BatchError::ReadDir { path, .. } => assert_eq!(path, input),
            other => panic!("expected ReadDir, got {:?}", other),
        }
    }
}

#[cfg(test)]
mod stats_tests {
    use super::*;

    #[test]
    fn test_directory_stats_scores_in_scan_order() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("input");
        fs::create_dir(&input).unwrap();
        populate_input(&input);

        let stats = directory_stats(&input).unwrap();
        assert_eq!(stats.considered, 3);
        assert_eq!(stats.skipped, 0);

        let ids: Vec<&str> = stats.frames.iter().map(|f| f.source_id.as_str()).collect();
        assert_eq!(ids, vec!["aaa_soft.png", "bbb_medium.png", "ccc_sharp.png"]);

        assert_eq!(stats.stats.samples, 3);
        let max_by_scan = stats
            .frames
            .iter()
            .map(|f| f.sharpness)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(stats.stats.max, max_by_scan);
    }

    #[test]
    fn test_stats_on_flat_frames_are_degenerate() {
        let workspace = tempfile::tempdir().unwrap();
        let input = workspace.path().join("input");
        fs::create_dir(&input).unwrap();
        write_png(&input, "flat_a.png", &flat_frame(16, 16, 100));
        write_png(&input, "flat_b.png", &flat_frame(16, 16, 200));

        let stats = directory_stats(&input).unwrap();
        assert_eq!(stats.stats.min, 0.0);
        assert_eq!(stats.stats.max, 0.0);
        assert_eq!(stats.stats.mean, 0.0);
    }
}
