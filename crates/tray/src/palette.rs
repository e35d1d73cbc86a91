//! Status colors and the circle icon drawn in the menu bar.

use cse_status_protocol::Outcome;

/// Fixed four-color palette for the status icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    /// Market open (green).
    Open,
    /// Market closed (red).
    Closed,
    /// Any failed poll (orange).
    Error,
    /// Waiting for a result, or an unrecognized status (yellow).
    Checking,
}

impl StatusColor {
    /// Picks the color for a classified outcome.
    pub fn for_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Open(_) => Self::Open,
            Outcome::Closed(_) => Self::Closed,
            Outcome::Unknown(_) => Self::Checking,
            Outcome::NetworkError(_) | Outcome::ServerError(_) | Outcome::ParseError(_) => {
                Self::Error
            }
        }
    }

    /// sRGB components.
    pub const fn rgb(self) -> [u8; 3] {
        match self {
            Self::Open => [52, 199, 89],
            Self::Closed => [255, 69, 58],
            Self::Error => [255, 149, 0],
            Self::Checking => [255, 204, 0],
        }
    }
}

/// Raw RGBA bitmap, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Renders a filled, anti-aliased circle of `color` on a transparent square.
pub fn circle_icon(color: StatusColor, size: u32) -> IconImage {
    let size = size.max(1);
    let [r, g, b] = color.rgb();
    let radius = size as f32 / 2.0;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - radius;
            let dy = y as f32 + 0.5 - radius;
            let dist = (dx * dx + dy * dy).sqrt();
            // One-pixel coverage ramp across the edge.
            let coverage = (radius - dist + 0.5).clamp(0.0, 1.0);
            rgba.extend_from_slice(&[r, g, b, (coverage * 255.0).round() as u8]);
        }
    }

    IconImage {
        rgba,
        width: size,
        height: size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cse_status_protocol::{NetworkReason, ParseFailure};

    fn alpha_at(icon: &IconImage, x: u32, y: u32) -> u8 {
        icon.rgba[((y * icon.width + x) * 4 + 3) as usize]
    }

    #[test]
    fn outcome_colors() {
        assert_eq!(
            StatusColor::for_outcome(&Outcome::Open("Open".into())),
            StatusColor::Open
        );
        assert_eq!(
            StatusColor::for_outcome(&Outcome::Closed("Closed".into())),
            StatusColor::Closed
        );
        assert_eq!(
            StatusColor::for_outcome(&Outcome::Unknown("Halted".into())),
            StatusColor::Checking
        );
        for outcome in [
            Outcome::NetworkError(NetworkReason::Timeout),
            Outcome::ServerError(500),
            Outcome::ParseError(ParseFailure::Malformed),
        ] {
            assert_eq!(StatusColor::for_outcome(&outcome), StatusColor::Error);
        }
    }

    #[test]
    fn palette_values() {
        assert_eq!(StatusColor::Open.rgb(), [52, 199, 89]);
        assert_eq!(StatusColor::Closed.rgb(), [255, 69, 58]);
        assert_eq!(StatusColor::Error.rgb(), [255, 149, 0]);
        assert_eq!(StatusColor::Checking.rgb(), [255, 204, 0]);
    }

    #[test]
    fn circle_icon_dimensions() {
        let icon = circle_icon(StatusColor::Open, 16);
        assert_eq!(icon.width, 16);
        assert_eq!(icon.height, 16);
        assert_eq!(icon.rgba.len(), 16 * 16 * 4);
    }

    #[test]
    fn circle_icon_is_opaque_center_transparent_corners() {
        let icon = circle_icon(StatusColor::Closed, 20);
        assert_eq!(alpha_at(&icon, 10, 10), 255);
        assert_eq!(alpha_at(&icon, 0, 0), 0);
        assert_eq!(alpha_at(&icon, 19, 19), 0);
        assert_eq!(&icon.rgba[..3], &[255, 69, 58]);
    }

    #[test]
    fn circle_icon_edges_are_antialiased() {
        let icon = circle_icon(StatusColor::Error, 20);
        let partial = icon
            .rgba
            .chunks_exact(4)
            .filter(|px| px[3] > 0 && px[3] < 255)
            .count();
        assert!(partial > 0);
    }

    #[test]
    fn zero_size_is_clamped() {
        let icon = circle_icon(StatusColor::Checking, 0);
        assert_eq!(icon.width, 1);
        assert_eq!(icon.rgba.len(), 4);
    }
}
