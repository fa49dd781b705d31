//! Deterministic synthetic frames and landmark sets.
//!
//! Every generator here is pure: the same arguments always produce the
//! same pixels, so sharpness scores computed over them are stable across
//! runs and platforms. The patterns are chosen for their known ordering
//! under the Laplacian measure: flat scores zero, a smooth ramp scores
//! near zero, checkerboard and noise score high, and [`box_blur`] moves
//! any frame down the scale.

use crate::pose::landmarks::{HandLandmarks, Landmark, LANDMARK_COUNT, THUMB_TIP};
use crate::types::CameraFrame;

fn frame_from_pixels(data: Vec<u8>, width: u32, height: u32) -> CameraFrame {
    CameraFrame::new(data, width, height, "synthetic".to_string())
}

/// Uniform frame with every channel set to `value`. Sharpness zero.
pub fn flat_frame(width: u32, height: u32, value: u8) -> CameraFrame {
    let data = vec![value; (width * height * 3) as usize];
    frame_from_pixels(data, width, height)
}

/// Smooth horizontal luminance ramp. Near-zero sharpness.
pub fn gradient_frame(width: u32, height: u32) -> CameraFrame {
    let mut data = vec![0u8; (width * height * 3) as usize];
    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 3) as usize;
            let value = if width > 1 {
                ((x * 255) / (width - 1)) as u8
            } else {
                0
            };
            data[idx] = value;
            data[idx + 1] = value;
            data[idx + 2] = value;
        }
    }
    frame_from_pixels(data, width, height)
}

/// Black-and-white checkerboard with `cell`-pixel squares.
///
/// Small cells put most of the energy at the highest spatial frequency
/// the sensor can hold, which is where the Laplacian responds hardest.
pub fn checkerboard_frame(width: u32, height: u32, cell: u32) -> CameraFrame {
    let cell = cell.max(1);
    let mut data = vec![0u8; (width * height * 3) as usize];
    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 3) as usize;
            let on = ((x / cell) + (y / cell)) % 2 == 0;
            let value = if on { 255 } else { 0 };
            data[idx] = value;
            data[idx + 1] = value;
            data[idx + 2] = value;
        }
    }
    frame_from_pixels(data, width, height)
}

/// Per-pixel pseudo-random noise from a seeded xorshift generator.
pub fn noise_frame(width: u32, height: u32, seed: u64) -> CameraFrame {
    let mut state = seed.max(1);
    let mut data = vec![0u8; (width * height * 3) as usize];
    for byte in data.iter_mut() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        *byte = (state & 0xFF) as u8;
    }
    frame_from_pixels(data, width, height)
}

/// Mean filter over a `(2 * radius + 1)` square window, edges clamped.
///
/// Attenuates the high-frequency content the sharpness measure keys on,
/// so for any textured input `sharpness(box_blur(f)) < sharpness(f)`.
pub fn box_blur(frame: &CameraFrame, radius: u32) -> CameraFrame {
    let width = frame.width as i64;
    let height = frame.height as i64;
    let radius = radius as i64;
    let mut data = vec![0u8; frame.data.len()];

    for y in 0..height {
        for x in 0..width {
            let mut sums = [0u64; 3];
            let mut count = 0u64;
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let sy = (y + dy).clamp(0, height - 1);
                    let sx = (x + dx).clamp(0, width - 1);
                    let idx = ((sy * width + sx) * 3) as usize;
                    sums[0] += frame.data[idx] as u64;
                    sums[1] += frame.data[idx + 1] as u64;
                    sums[2] += frame.data[idx + 2] as u64;
                    count += 1;
                }
            }
            let idx = ((y * width + x) * 3) as usize;
            for channel in 0..3 {
                data[idx + channel] = (sums[channel] / count) as u8;
            }
        }
    }

    frame_from_pixels(data, frame.width, frame.height)
        .with_sequence(frame.sequence)
}

/// Landmark set with an exact mean pairwise fingertip spread.
///
/// Four fingertips coincide at a base point and the thumb tip sits
/// `2.5 * spread` away along x, which makes the mean over all ten tip
/// pairs come out to exactly `spread`. Valid for spreads up to 0.28;
/// beyond that the thumb would leave normalized coordinates.
pub fn hand_with_spread(spread: f32, score: f32) -> HandLandmarks {
    debug_assert!((0.0..=0.28).contains(&spread));
    let base = Landmark::new(0.25, 0.5);
    let mut landmarks = [base; LANDMARK_COUNT];
    landmarks[THUMB_TIP] = Landmark::new(base.x + 2.5 * spread, base.y);
    HandLandmarks::new(landmarks, score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sharpness::sharpness_score;

    #[test]
    fn generators_are_deterministic() {
        assert_eq!(noise_frame(32, 32, 7).data, noise_frame(32, 32, 7).data);
        assert_eq!(
            checkerboard_frame(16, 16, 2).data,
            checkerboard_frame(16, 16, 2).data
        );
    }

    #[test]
    fn pattern_sharpness_ordering_holds() {
        let flat = sharpness_score(&flat_frame(32, 32, 128));
        let ramp = sharpness_score(&gradient_frame(32, 32));
        let checker = sharpness_score(&checkerboard_frame(32, 32, 1));
        assert_eq!(flat, 0.0);
        assert!(checker > ramp);
        assert!(checker > 1000.0, "checkerboard scored {}", checker);
    }

    #[test]
    fn blur_reduces_sharpness() {
        let sharp = checkerboard_frame(32, 32, 2);
        let blurred = box_blur(&sharp, 1);
        assert!(sharpness_score(&blurred) < sharpness_score(&sharp));
    }

    #[test]
    fn spread_constructions_are_exact() {
        for spread in [0.0f32, 0.05, 0.15, 0.20] {
            let hand = hand_with_spread(spread, 0.9);
            assert!((hand.fingertip_spread() - spread).abs() < 1e-6);
        }
    }
}
