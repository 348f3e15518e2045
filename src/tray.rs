//! Tray icon drawing. The icon color follows the countdown: red while
//! studying, green on a break, grey while paused.

use crate::models::{Phase, RunStatus};
use thiserror::Error;
use tray_icon::Icon;

pub const ICON_SIZE: u32 = 22;

const STUDY_RGB: [u8; 3] = [220, 50, 47];
const BREAK_RGB: [u8; 3] = [76, 175, 80];
const PAUSED_RGB: [u8; 3] = [140, 140, 140];
const STEM_RGB: [u8; 3] = [76, 153, 0];

#[derive(Error, Debug)]
pub enum TrayError {
    #[error("Failed to load icon: {0}")]
    IconLoad(#[from] tray_icon::BadIcon),
}

/// Builds the tray icon for the current countdown.
pub fn countdown_icon(status: RunStatus, phase: Phase) -> Result<Icon, TrayError> {
    let rgba = countdown_rgba(status, phase);
    Ok(Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE)?)
}

fn body_color(status: RunStatus, phase: Phase) -> [u8; 3] {
    match (status, phase) {
        (RunStatus::Paused, _) => PAUSED_RGB,
        (_, Phase::Study) => STUDY_RGB,
        (_, Phase::Break) => BREAK_RGB,
    }
}

/// RGBA pixels of a tomato: an anti-aliased disc with a stem on top.
fn countdown_rgba(status: RunStatus, phase: Phase) -> Vec<u8> {
    let size = ICON_SIZE;
    let [r, g, b] = body_color(status, phase);
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);

    let center = size as f32 / 2.0;
    let radius = center - 2.0;

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let distance = (dx * dx + dy * dy).sqrt();

            let alpha = if distance <= radius {
                255
            } else if distance <= radius + 1.0 {
                ((radius + 1.0 - distance) * 255.0) as u8
            } else {
                0
            };
            if alpha == 0 {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
            } else {
                rgba.extend_from_slice(&[r, g, b, alpha]);
            }
        }
    }

    let stem_center = size / 2;
    for y in 2..5 {
        for x in (stem_center - 1)..=(stem_center + 1) {
            let idx = ((y * size + x) * 4) as usize;
            rgba[idx..idx + 4].copy_from_slice(&[STEM_RGB[0], STEM_RGB[1], STEM_RGB[2], 255]);
        }
    }

    rgba
}
