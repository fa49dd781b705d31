//! Sharpness estimation.
//!
//! Scores focus quality as the variance of a Laplacian edge response over
//! the luminance plane. Flat or defocused frames produce a small response
//! everywhere and score near zero; well-focused frames have strong local
//! edges and score high. The score is an open-ended scalar: only relative
//! ordering between frames is meaningful.

use crate::assert_invariant;
use crate::types::CameraFrame;

/// Compute the sharpness score of a frame.
///
/// Converts the frame to luminance, applies a 4-connected Laplacian kernel
/// to every interior pixel, and returns the population variance of the
/// response. Pure and stateless, O(W * H).
///
/// Frames smaller than 3x3 have no kernel interior and score 0.0.
///
/// # Panics
/// The frame must have non-zero dimensions and a complete RGB8 buffer;
/// anything else is a caller logic error, not a recoverable condition.
pub fn sharpness_score(frame: &CameraFrame) -> f64 {
    assert_invariant!(
        frame.width > 0 && frame.height > 0,
        "Sharpness input must have non-zero dimensions",
        "sharpness_score"
    );

    let width = frame.width as usize;
    let height = frame.height as usize;

    assert_invariant!(
        frame.data.len() >= width * height * 3,
        "Sharpness input must carry a full RGB8 buffer",
        "sharpness_score"
    );

    // No interior pixels for the kernel
    if width < 3 || height < 3 {
        return 0.0;
    }

    let luma = luminance_plane(&frame.data, width, height);

    let mut responses = Vec::with_capacity((width - 2) * (height - 2));
    for y in 1..(height - 1) {
        for x in 1..(width - 1) {
            let center = luma[y * width + x];
            let neighbors = luma[(y - 1) * width + x]
                + luma[(y + 1) * width + x]
                + luma[y * width + x - 1]
                + luma[y * width + x + 1];
            responses.push(4.0 * center - neighbors);
        }
    }

    variance(&responses)
}

/// Whether a score falls below the configured blur threshold.
pub fn is_blurry(score: f64, blur_threshold: f64) -> bool {
    score < blur_threshold
}

fn luminance_plane(data: &[u8], width: usize, height: usize) -> Vec<f64> {
    let mut luma = Vec::with_capacity(width * height);
    for i in 0..(width * height) {
        let p = i * 3;
        luma.push(luminance(&data[p..p + 3]));
    }
    luma
}

/// Convert RGB to luminance
fn luminance(rgb: &[u8]) -> f64 {
    0.299 * rgb[0] as f64 + 0.587 * rgb[1] as f64 + 0.114 * rgb[2] as f64
}

fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_frame(width: u32, height: u32, value: u8) -> CameraFrame {
        let data = vec![value; (width * height * 3) as usize];
        CameraFrame::new(data, width, height, "test".to_string())
    }

    fn checker_frame(width: u32, height: u32) -> CameraFrame {
        let mut data = vec![0u8; (width * height * 3) as usize];
        for y in 0..height {
            for x in 0..width {
                let value = if (x + y) % 2 == 0 { 255 } else { 0 };
                let idx = ((y * width + x) * 3) as usize;
                data[idx] = value;
                data[idx + 1] = value;
                data[idx + 2] = value;
            }
        }
        CameraFrame::new(data, width, height, "test".to_string())
    }

    #[test]
    fn test_luminance_weights() {
        let rgb = [100u8, 150, 200];
        let expected = 0.299 * 100.0 + 0.587 * 150.0 + 0.114 * 200.0;
        assert!((luminance(&rgb) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_flat_frame_scores_zero() {
        let score = sharpness_score(&flat_frame(16, 16, 128));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_checker_sharper_than_flat() {
        let flat = sharpness_score(&flat_frame(16, 16, 128));
        let checker = sharpness_score(&checker_frame(16, 16));
        assert!(checker > flat, "checker {} vs flat {}", checker, flat);
    }

    #[test]
    fn test_sub_kernel_frame_scores_zero() {
        assert_eq!(sharpness_score(&flat_frame(2, 2, 40)), 0.0);
        assert_eq!(sharpness_score(&checker_frame(1, 1)), 0.0);
    }

    #[test]
    #[should_panic(expected = "non-zero dimensions")]
    fn test_zero_size_frame_is_a_logic_error() {
        let frame = CameraFrame::new(Vec::new(), 0, 0, "test".to_string());
        sharpness_score(&frame);
    }

    #[test]
    fn test_variance_of_constant_is_zero() {
        assert_eq!(variance(&[3.0, 3.0, 3.0]), 0.0);
        assert_eq!(variance(&[]), 0.0);
    }

    #[test]
    fn test_blurry_threshold() {
        assert!(is_blurry(99.9, 100.0));
        assert!(!is_blurry(100.0, 100.0));
    }

    #[test]
    fn contract_scoring_runs_its_guards() {
        let _ = sharpness_score(&checker_frame(8, 8));
        crate::invariant_ppt::contract_test(
            "sharpness scoring",
            &[
                "Sharpness input must have non-zero dimensions",
                "Sharpness input must carry a full RGB8 buffer",
            ],
        );
    }
}
