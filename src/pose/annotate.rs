//! Landmark overlay rendering.
//!
//! Draws detected hands onto a copy of the frame for live preview. The
//! overlay is presentational only; scoring never looks at annotated
//! pixels.

use crate::pose::landmarks::{HandLandmarks, Landmark, HAND_SKELETON};
use crate::types::CameraFrame;

const BONE_COLOR: [u8; 3] = [60, 220, 60];
const LANDMARK_COLOR: [u8; 3] = [255, 60, 60];
const LANDMARK_RADIUS: i32 = 2;

/// Return a copy of `frame` with every hand's skeleton and keypoints
/// drawn on it. The input frame is untouched.
pub fn annotate_frame(frame: &CameraFrame, hands: &[HandLandmarks]) -> CameraFrame {
    let mut annotated = frame.clone();

    for hand in hands {
        for (a, b) in HAND_SKELETON {
            let from = to_pixel(&hand.landmarks[a], frame.width, frame.height);
            let to = to_pixel(&hand.landmarks[b], frame.width, frame.height);
            draw_segment(&mut annotated.data, frame.width, frame.height, from, to);
        }
        for landmark in &hand.landmarks {
            let (x, y) = to_pixel(landmark, frame.width, frame.height);
            draw_dot(&mut annotated.data, frame.width, frame.height, x, y);
        }
    }

    annotated
}

fn to_pixel(landmark: &Landmark, width: u32, height: u32) -> (i32, i32) {
    let x = (landmark.x * width.saturating_sub(1) as f32).round() as i32;
    let y = (landmark.y * height.saturating_sub(1) as f32).round() as i32;
    (x, y)
}

fn put_pixel(data: &mut [u8], width: u32, height: u32, x: i32, y: i32, color: [u8; 3]) {
    if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
        return;
    }
    let idx = ((y as u32 * width + x as u32) * 3) as usize;
    if idx + 3 <= data.len() {
        data[idx..idx + 3].copy_from_slice(&color);
    }
}

fn draw_dot(data: &mut [u8], width: u32, height: u32, x: i32, y: i32) {
    for dy in -LANDMARK_RADIUS..=LANDMARK_RADIUS {
        for dx in -LANDMARK_RADIUS..=LANDMARK_RADIUS {
            put_pixel(data, width, height, x + dx, y + dy, LANDMARK_COLOR);
        }
    }
}

fn draw_segment(data: &mut [u8], width: u32, height: u32, from: (i32, i32), to: (i32, i32)) {
    let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).max(1);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = (from.0 as f32 + t * (to.0 - from.0) as f32).round() as i32;
        let y = (from.1 as f32 + t * (to.1 - from.1) as f32).round() as i32;
        put_pixel(data, width, height, x, y, BONE_COLOR);
    }
}
