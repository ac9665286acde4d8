//! Raw resistive-touch readings to screen pixels.
//!
//! The controller reports ADC counts along its own fixed axes. Which raw
//! axis feeds screen X, and in which direction, depends on how the panel is
//! rotated, and the usable ADC window differs per unit. Both are supplied
//! as calibration data; nothing here tries to infer them.

use embedded_graphics::prelude::Point;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Display orientation, numbered like the panel driver's `setRotation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    Portrait,
    #[default]
    Landscape,
    PortraitFlipped,
    LandscapeFlipped,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Portrait,
        Rotation::Landscape,
        Rotation::PortraitFlipped,
        Rotation::LandscapeFlipped,
    ];

    pub fn is_landscape(&self) -> bool {
        matches!(self, Rotation::Landscape | Rotation::LandscapeFlipped)
    }

    /// Effective (width, height) of a panel with the given native size.
    pub fn apply(&self, native_width: u32, native_height: u32) -> (u32, u32) {
        if self.is_landscape() {
            (native_height, native_width)
        } else {
            (native_width, native_height)
        }
    }
}

/// Raw counts observed at the two screen edges of one axis.
///
/// `raw_low` is the reading at pixel 0 and `raw_high` the reading at the far
/// edge. `raw_low > raw_high` describes an axis that decreases on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisCalibration {
    pub raw_low: i32,
    pub raw_high: i32,
}

impl AxisCalibration {
    pub const fn new(raw_low: i32, raw_high: i32) -> Self {
        Self { raw_low, raw_high }
    }

    /// Signed raw distance from pixel 0 to the far edge.
    pub fn span(&self) -> i64 {
        self.raw_high as i64 - self.raw_low as i64
    }

    /// Returns the pixel and whether it had to be clamped.
    pub fn map(&self, raw: i32, dimension: u32) -> (i32, bool) {
        let max = dimension.saturating_sub(1) as i64;
        let span = self.span();
        if span == 0 {
            return (0, true);
        }
        let outside = if span > 0 {
            raw < self.raw_low || raw > self.raw_high
        } else {
            raw > self.raw_low || raw < self.raw_high
        };
        // raw_high itself scales to `dimension` and lands on the last pixel.
        let scaled = (raw as i64 - self.raw_low as i64) * dimension as i64 / span;
        (scaled.clamp(0, max) as i32, outside)
    }

    /// Raw reading that maps onto `pixel`, used by the simulator.
    pub fn unmap(&self, pixel: i32, dimension: u32) -> i32 {
        if dimension == 0 {
            return self.raw_low;
        }
        let span = self.span();
        // Aim at the middle of the pixel so integer division lands on it.
        let num = (2 * pixel as i64 + 1) * span;
        let offset = num / (2 * dimension as i64);
        (self.raw_low as i64 + offset) as i32
    }
}

/// Calibration for one rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationCalibration {
    /// Screen X is driven by the controller's raw Y when set.
    pub swap_axes: bool,
    pub x: AxisCalibration,
    pub y: AxisCalibration,
}

/// Per-rotation calibration table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchCalibration {
    pub portrait: RotationCalibration,
    pub landscape: RotationCalibration,
    pub portrait_flipped: RotationCalibration,
    pub landscape_flipped: RotationCalibration,
}

impl TouchCalibration {
    pub fn for_rotation(&self, rotation: Rotation) -> &RotationCalibration {
        match rotation {
            Rotation::Portrait => &self.portrait,
            Rotation::Landscape => &self.landscape,
            Rotation::PortraitFlipped => &self.portrait_flipped,
            Rotation::LandscapeFlipped => &self.landscape_flipped,
        }
    }
}

impl Default for TouchCalibration {
    /// Hand-tuned counts for an XPT2046 on a 2.8" 240x320 panel.
    fn default() -> Self {
        Self {
            portrait: RotationCalibration {
                swap_axes: false,
                x: AxisCalibration::new(210, 3760),
                y: AxisCalibration::new(240, 3840),
            },
            landscape: RotationCalibration {
                swap_axes: true,
                x: AxisCalibration::new(260, 3820),
                y: AxisCalibration::new(3720, 190),
            },
            portrait_flipped: RotationCalibration {
                swap_axes: false,
                x: AxisCalibration::new(3750, 220),
                y: AxisCalibration::new(3850, 230),
            },
            landscape_flipped: RotationCalibration {
                swap_axes: true,
                x: AxisCalibration::new(3830, 250),
                y: AxisCalibration::new(200, 3730),
            },
        }
    }
}

/// One controller sample, in ADC counts along the controller's axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTouch {
    pub x: i32,
    pub y: i32,
}

/// Touch controller capability.
pub trait TouchInput {
    fn is_touched(&mut self) -> bool;
    fn raw(&mut self) -> RawTouch;

    /// Sample only while touched.
    fn sample(&mut self) -> Option<RawTouch> {
        if self.is_touched() {
            Some(self.raw())
        } else {
            None
        }
    }
}

/// A panel nobody touches (headless rendering).
#[derive(Debug, Clone, Copy, Default)]
pub struct Untouched;

impl TouchInput for Untouched {
    fn is_touched(&mut self) -> bool {
        false
    }

    fn raw(&mut self) -> RawTouch {
        RawTouch { x: 0, y: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub point: Point,
    /// The raw reading was outside the calibrated window.
    pub clamped: bool,
}

/// Affine raw → screen transform for the active rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchMapper {
    calibration: RotationCalibration,
    width: u32,
    height: u32,
}

impl TouchMapper {
    /// `width`/`height` are the effective (rotated) screen dimensions.
    pub fn new(calibration: &TouchCalibration, rotation: Rotation, width: u32, height: u32) -> Self {
        Self {
            calibration: *calibration.for_rotation(rotation),
            width,
            height,
        }
    }

    pub fn map(&self, raw: RawTouch) -> TouchPoint {
        let (raw_x, raw_y) = if self.calibration.swap_axes {
            (raw.y, raw.x)
        } else {
            (raw.x, raw.y)
        };
        let (x, cx) = self.calibration.x.map(raw_x, self.width);
        let (y, cy) = self.calibration.y.map(raw_y, self.height);
        let clamped = cx || cy;
        if clamped {
            debug!(raw_x = raw.x, raw_y = raw.y, x, y, "touch outside calibrated range; clamped");
        }
        TouchPoint {
            point: Point::new(x, y),
            clamped,
        }
    }

    /// Inverse of [`TouchMapper::map`] for in-range pixels.
    pub fn unmap(&self, point: Point) -> RawTouch {
        let raw_x = self.calibration.x.unmap(point.x, self.width);
        let raw_y = self.calibration.y.unmap(point.y, self.height);
        if self.calibration.swap_axes {
            RawTouch { x: raw_y, y: raw_x }
        } else {
            RawTouch { x: raw_x, y: raw_y }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(rotation: Rotation) -> TouchMapper {
        let (w, h) = rotation.apply(240, 320);
        TouchMapper::new(&TouchCalibration::default(), rotation, w, h)
    }

    fn raw_for(cal: &RotationCalibration, screen_x: i32, screen_y: i32) -> RawTouch {
        if cal.swap_axes {
            RawTouch { x: screen_y, y: screen_x }
        } else {
            RawTouch { x: screen_x, y: screen_y }
        }
    }

    #[test]
    fn calibrated_bounds_hit_screen_edges_for_every_rotation() {
        let table = TouchCalibration::default();
        for rotation in Rotation::ALL {
            let cal = table.for_rotation(rotation);
            let m = mapper(rotation);
            let (w, h) = rotation.apply(240, 320);

            let low = m.map(raw_for(cal, cal.x.raw_low, cal.y.raw_low));
            assert_eq!(low.point, Point::new(0, 0), "{rotation:?}");
            assert!(!low.clamped);

            let high = m.map(raw_for(cal, cal.x.raw_high, cal.y.raw_high));
            assert_eq!(
                high.point,
                Point::new(w as i32 - 1, h as i32 - 1),
                "{rotation:?}"
            );
            assert!(!high.clamped);
        }
    }

    #[test]
    fn readings_beyond_bounds_clamp() {
        let m = mapper(Rotation::Portrait);
        let below = m.map(RawTouch { x: 0, y: 0 });
        assert_eq!(below.point, Point::new(0, 0));
        assert!(below.clamped);

        let above = m.map(RawTouch { x: 4095, y: 4095 });
        assert_eq!(above.point, Point::new(239, 319));
        assert!(above.clamped);
    }

    #[test]
    fn decreasing_axis_clamps_on_both_sides() {
        let axis = AxisCalibration::new(3700, 200);
        assert_eq!(axis.map(4000, 240), (0, true));
        assert_eq!(axis.map(100, 240), (239, true));
        assert_eq!(axis.map(1950, 240).0, 120);
    }

    #[test]
    fn full_width_axis_does_not_overflow() {
        let axis = AxisCalibration::new(i32::MIN, i32::MAX);
        assert_eq!(axis.span(), u32::MAX as i64);
        assert_eq!(axis.map(0, 240), (120, false));
        assert_eq!(axis.map(i32::MIN, 240), (0, false));
        assert_eq!(axis.map(i32::MAX, 240), (239, false));
        assert_eq!(axis.map(axis.unmap(120, 240), 240).0, 120);
        assert_eq!(axis.map(axis.unmap(239, 240), 240).0, 239);
    }

    #[test]
    fn landscape_swaps_axes() {
        let m = mapper(Rotation::Landscape);
        // Raw Y drives screen X in landscape.
        let left = m.map(RawTouch { x: 2000, y: 260 });
        let right = m.map(RawTouch { x: 2000, y: 3820 });
        assert_eq!(left.point.x, 0);
        assert_eq!(right.point.x, 319);
    }

    #[test]
    fn unmap_round_trips_every_corner() {
        for rotation in Rotation::ALL {
            let m = mapper(rotation);
            let (w, h) = rotation.apply(240, 320);
            for p in [
                Point::new(0, 0),
                Point::new(w as i32 - 1, 0),
                Point::new(0, h as i32 - 1),
                Point::new(w as i32 / 2, h as i32 / 3),
            ] {
                assert_eq!(m.map(m.unmap(p)).point, p, "{rotation:?} {p:?}");
            }
        }
    }

    #[test]
    fn effective_size_follows_rotation() {
        assert_eq!(Rotation::Portrait.apply(240, 320), (240, 320));
        assert_eq!(Rotation::Landscape.apply(240, 320), (320, 240));
        assert_eq!(Rotation::LandscapeFlipped.apply(240, 320), (320, 240));
    }
}
