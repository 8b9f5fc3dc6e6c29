//! The shared transform stack for one image in one cell.

use crate::geometry::{draw_size, BaseFit};
use crate::grid::CellRect;
use crate::transform::Transform;
use crate::PAN_UNIT;

/// Where and how an image lands inside a cell.
///
/// Source positions are normalised: `(0, 0)` is the top-left corner of the
/// source image and `(1, 1)` the bottom-right, independent of resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPlacement {
    /// Cell centre in canvas pixels
    pub center: (f64, f64),
    /// Pan in canvas pixels
    pub pan: (f64, f64),
    /// Clockwise rotation in radians
    pub rotation: f64,
    /// Uniform zoom factor
    pub scale: f64,
    /// Unscaled draw size in the image's own frame
    pub draw: BaseFit,
    cos: f64,
    sin: f64,
}

impl CellPlacement {
    /// Build the placement of an `image_size` image in `rect`.
    ///
    /// Returns `None` when the cell or the image has no area.
    pub fn new(image_size: (u32, u32), rect: CellRect, transform: &Transform) -> Option<Self> {
        let cell = rect.size();
        if !cell.is_usable() || image_size.0 == 0 || image_size.1 == 0 {
            return None;
        }

        let draw = draw_size(
            image_size.0 as f64,
            image_size.1 as f64,
            cell,
            transform.rotation,
        );
        let rotation = transform.rotation.to_radians();

        Some(Self {
            center: rect.center(),
            pan: (
                transform.offset_x * PAN_UNIT * draw.width,
                transform.offset_y * PAN_UNIT * draw.height,
            ),
            rotation,
            scale: transform.scale(),
            draw,
            cos: rotation.cos(),
            sin: rotation.sin(),
        })
    }

    /// Canvas position of normalised source position `(u, v)`.
    pub fn from_image(&self, u: f64, v: f64) -> (f64, f64) {
        let sx = (u - 0.5) * self.draw.width * self.scale;
        let sy = (v - 0.5) * self.draw.height * self.scale;
        let rx = sx * self.cos - sy * self.sin;
        let ry = sx * self.sin + sy * self.cos;
        (
            self.center.0 + self.pan.0 + rx,
            self.center.1 + self.pan.1 + ry,
        )
    }

    /// Normalised source position shown at canvas position `(x, y)`.
    ///
    /// Values outside `[0, 1)` mean the point is not covered by the image.
    #[inline]
    pub fn to_image(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.center.0 - self.pan.0;
        let dy = y - self.center.1 - self.pan.1;
        let rx = dx * self.cos + dy * self.sin;
        let ry = -dx * self.sin + dy * self.cos;
        (
            rx / (self.scale * self.draw.width) + 0.5,
            ry / (self.scale * self.draw.height) + 0.5,
        )
    }

    /// Source positions under the corners of `rect`, clockwise from top-left.
    pub fn visible_region(&self, rect: CellRect) -> [(f64, f64); 4] {
        let right = rect.x + rect.width;
        let bottom = rect.y + rect.height;
        [
            self.to_image(rect.x, rect.y),
            self.to_image(right, rect.y),
            self.to_image(right, bottom),
            self.to_image(rect.x, bottom),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(w: f64, h: f64) -> CellRect {
        CellRect { x: 0.0, y: 0.0, width: w, height: h }
    }

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_identity_centered_crop() {
        // 200x100 in a 100x100 cell: fits height, middle half visible
        let p = CellPlacement::new((200, 100), rect(100.0, 100.0), &Transform::new()).unwrap();
        let region = p.visible_region(rect(100.0, 100.0));
        assert!(close(region[0], (0.25, 0.0)));
        assert!(close(region[2], (0.75, 1.0)));
    }

    #[test]
    fn test_pan_is_fraction_of_draw_size() {
        let mut t = Transform::new();
        t.offset_x = 100.0; // 10% of draw width
        let p = CellPlacement::new((200, 100), rect(100.0, 100.0), &t).unwrap();
        assert!((p.pan.0 - 20.0).abs() < 1e-9);

        // Pan does not depend on zoom
        t.zoom = 200.0;
        let zoomed = CellPlacement::new((200, 100), rect(100.0, 100.0), &t).unwrap();
        assert_eq!(zoomed.pan, p.pan);
    }

    #[test]
    fn test_rotation_is_clockwise() {
        let mut t = Transform::new();
        t.rotation = 90.0;
        let p = CellPlacement::new((100, 100), rect(100.0, 100.0), &t).unwrap();
        // Top-left of the source ends up at the top-right of the cell
        assert!(close(p.from_image(0.0, 0.0), (100.0, 0.0)));
    }

    #[test]
    fn test_round_trip_through_placement() {
        let t = Transform { zoom: 137.0, offset_x: -33.0, offset_y: 12.0, rotation: 270.0 };
        let p = CellPlacement::new((640, 480), rect(300.0, 200.0), &t).unwrap();
        let (x, y) = p.from_image(0.3, 0.8);
        assert!(close(p.to_image(x, y), (0.3, 0.8)));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(CellPlacement::new((0, 10), rect(10.0, 10.0), &Transform::new()).is_none());
        assert!(CellPlacement::new((10, 10), rect(0.0, 10.0), &Transform::new()).is_none());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
