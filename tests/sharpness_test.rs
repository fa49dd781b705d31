//! Sharpness scoring against synthetic frames
//!
//! Exercises the variance-of-Laplacian score on generated patterns whose
//! relative focus quality is known by construction.

use framesieve::sharpness::{is_blurry, sharpness_score};
use framesieve::testing::{box_blur, checkerboard_frame, flat_frame, gradient_frame, noise_frame};

#[cfg(test)]
mod pattern_tests {
    use super::*;

    #[test]
    fn test_flat_frames_score_zero() {
        for value in [0u8, 128, 255] {
            assert_eq!(sharpness_score(&flat_frame(32, 32, value)), 0.0);
        }
    }

    #[test]
    fn test_checkerboard_scores_high() {
        let score = sharpness_score(&checkerboard_frame(32, 32, 1));
        assert!(score > 100_000.0, "cell-1 checker scored {}", score);
    }

    #[test]
    fn test_linear_gradient_has_no_edges() {
        // 255 / (16 - 1) divides evenly, so the ramp is exactly linear and
        // the Laplacian response vanishes everywhere.
        let score = sharpness_score(&gradient_frame(16, 16));
        assert!(score < 1e-6, "gradient scored {}", score);
    }

    #[test]
    fn test_noise_scores_between_flat_and_checker() {
        let noise = sharpness_score(&noise_frame(32, 32, 7));
        let checker = sharpness_score(&checkerboard_frame(32, 32, 1));
        assert!(noise > 0.0);
        assert!(noise < checker, "noise {} vs checker {}", noise, checker);
    }
}

#[cfg(test)]
mod blur_tests {
    use super::*;

    #[test]
    fn test_blur_ladder_is_monotonic() {
        let sharp = checkerboard_frame(32, 32, 1);
        let soft = box_blur(&sharp, 1);
        let softer = box_blur(&sharp, 2);

        let s0 = sharpness_score(&sharp);
        let s1 = sharpness_score(&soft);
        let s2 = sharpness_score(&softer);

        assert!(s0 > s1, "radius 1 should soften: {} vs {}", s0, s1);
        assert!(s1 > s2, "radius 2 should soften more: {} vs {}", s1, s2);
    }

    #[test]
    fn test_blur_preserves_geometry() {
        let sharp = checkerboard_frame(16, 8, 2);
        let soft = box_blur(&sharp, 1);
        assert_eq!(soft.width, 16);
        assert_eq!(soft.height, 8);
        assert_eq!(soft.data.len(), sharp.data.len());
    }
}

#[cfg(test)]
mod threshold_tests {
    use super::*;

    #[test]
    fn test_blur_threshold_is_exclusive() {
        assert!(is_blurry(99.9, 100.0));
        assert!(!is_blurry(100.0, 100.0));
        assert!(!is_blurry(100.1, 100.0));
    }

    #[test]
    fn test_flat_frame_is_always_blurry() {
        let score = sharpness_score(&flat_frame(32, 32, 90));
        assert!(is_blurry(score, 100.0));
    }

    #[test]
    fn test_checkerboard_is_never_blurry() {
        let score = sharpness_score(&checkerboard_frame(32, 32, 1));
        assert!(!is_blurry(score, 100.0));
    }
}
