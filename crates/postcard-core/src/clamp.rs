//! The single gateway for transform mutations.
//!
//! Every change to a stored [`Transform`] goes through [`apply_update`]:
//! the update is merged, pan bounds are computed from the merged value for
//! every cell showing the image, and the offsets are clamped before the
//! result is written back. This keeps the "image always covers its cell"
//! invariant true at rest, not just when rendering.

use serde::{Deserialize, Serialize};

use crate::geometry::{max_offsets, CellSize, PanBounds};
use crate::photo::ImageId;
use crate::transform::{Transform, TransformMap, TransformUpdate};

/// How to combine bounds when one image occupies several cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClampPolicy {
    /// Use the first cell (in grid order) that shows the image.
    FirstMatch,
    /// Use the tightest bound over every cell that shows the image.
    #[default]
    Tightest,
}

/// Pan bounds for an image given the sizes of the cells it occupies.
///
/// `cells` lists the measured size of each occupied cell in grid order
/// (`None` when not yet measured). An unknown image or an image in no
/// cell is unbounded.
pub fn bounds_for(
    natural_size: Option<(u32, u32)>,
    transform: &Transform,
    cells: &[Option<CellSize>],
    policy: ClampPolicy,
) -> PanBounds {
    let Some((w, h)) = natural_size else {
        return PanBounds::UNBOUNDED;
    };
    let bounds_in = |cell: &Option<CellSize>| max_offsets(w as f64, h as f64, *cell, transform);

    match policy {
        ClampPolicy::FirstMatch => cells.first().map(bounds_in).unwrap_or_default(),
        ClampPolicy::Tightest => cells
            .iter()
            .map(bounds_in)
            .fold(PanBounds::UNBOUNDED, PanBounds::intersect),
    }
}

/// Clamp a transform's offsets into `bounds`.
pub fn clamp_offsets(transform: Transform, bounds: PanBounds) -> Transform {
    let (offset_x, offset_y) = bounds.clamp(transform.offset_x, transform.offset_y);
    Transform {
        offset_x,
        offset_y,
        ..transform
    }
}

/// Merge `update` into the transform for `image_id`, clamp, store and return it.
///
/// The stored transform is created from defaults if the image has none yet.
pub fn apply_update(
    transforms: &mut TransformMap,
    image_id: &ImageId,
    natural_size: Option<(u32, u32)>,
    update: &TransformUpdate,
    cells: &[Option<CellSize>],
    policy: ClampPolicy,
) -> Transform {
    let merged = transforms.get_or_default(image_id).merged(update);
    let bounds = bounds_for(natural_size, &merged, cells, policy);
    let clamped = clamp_offsets(merged, bounds);
    transforms.insert(image_id.clone(), clamped);
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: (u32, u32) = (4000, 3000);

    fn scenario_cell() -> Option<CellSize> {
        Some(CellSize::new(1255.0, 1615.0))
    }

    #[test]
    fn test_offset_clamped_to_bound() {
        let mut map = TransformMap::new();
        let id = ImageId::from("photo");
        let t = apply_update(
            &mut map,
            &id,
            Some(SCENARIO),
            &TransformUpdate::offsets(1000.0, 50.0),
            &[scenario_cell()],
            ClampPolicy::Tightest,
        );
        assert!((t.offset_x - 449.1667).abs() < 0.001, "offset_x was {}", t.offset_x);
        assert_eq!(t.offset_y, 0.0);
        assert_eq!(map.get_or_default(&id), t);
    }

    #[test]
    fn test_negative_offset_clamped() {
        let mut map = TransformMap::new();
        let id = ImageId::from("photo");
        let t = apply_update(
            &mut map,
            &id,
            Some(SCENARIO),
            &TransformUpdate::offsets(-1000.0, 0.0),
            &[scenario_cell()],
            ClampPolicy::Tightest,
        );
        assert!((t.offset_x + 449.1667).abs() < 0.001);
    }

    #[test]
    fn test_zoom_out_reclamps_existing_offset() {
        let mut map = TransformMap::new();
        let id = ImageId::from("photo");
        let cells = [scenario_cell()];
        apply_update(&mut map, &id, Some(SCENARIO), &TransformUpdate::zoom(200.0), &cells, ClampPolicy::Tightest);
        let panned = apply_update(
            &mut map,
            &id,
            Some(SCENARIO),
            &TransformUpdate::offsets(0.0, 700.0),
            &cells,
            ClampPolicy::Tightest,
        );
        assert_eq!(panned.offset_y, 700.0);

        // Zooming back to 100% leaves no vertical slack
        let zoomed_out = apply_update(&mut map, &id, Some(SCENARIO), &TransformUpdate::zoom(100.0), &cells, ClampPolicy::Tightest);
        assert_eq!(zoomed_out.offset_y, 0.0);
    }

    #[test]
    fn test_unmeasured_cell_leaves_offsets() {
        let mut map = TransformMap::new();
        let id = ImageId::from("photo");
        let t = apply_update(
            &mut map,
            &id,
            Some(SCENARIO),
            &TransformUpdate::offsets(1000.0, -1000.0),
            &[None],
            ClampPolicy::Tightest,
        );
        assert_eq!((t.offset_x, t.offset_y), (1000.0, -1000.0));
    }

    #[test]
    fn test_missing_image_is_not_clamped() {
        let mut map = TransformMap::new();
        let id = ImageId::from("ghost");
        let t = apply_update(
            &mut map,
            &id,
            None,
            &TransformUpdate::offsets(5000.0, 0.0),
            &[scenario_cell()],
            ClampPolicy::Tightest,
        );
        assert_eq!(t.offset_x, 5000.0);
    }

    #[test]
    fn test_policies_differ_across_cells() {
        // Square first cell leaves horizontal slack; wide second cell leaves none.
        let cells = [Some(CellSize::new(100.0, 100.0)), Some(CellSize::new(400.0, 100.0))];
        let t = Transform::new();

        let first = bounds_for(Some((200, 100)), &t, &cells, ClampPolicy::FirstMatch);
        assert_eq!(first.max_x, 50.0);

        let tight = bounds_for(Some((200, 100)), &t, &cells, ClampPolicy::Tightest);
        assert_eq!(tight.max_x, 0.0);
    }

    #[test]
    fn test_tightest_ignores_unmeasured_cells() {
        let cells = [None, Some(CellSize::new(100.0, 100.0))];
        let bounds = bounds_for(Some((200, 100)), &Transform::new(), &cells, ClampPolicy::Tightest);
        assert_eq!(bounds.max_x, 50.0);

        let first = bounds_for(Some((200, 100)), &Transform::new(), &cells, ClampPolicy::FirstMatch);
        assert!(first.is_unbounded());
    }

    #[test]
    fn test_no_cells_is_unbounded() {
        let bounds = bounds_for(Some((200, 100)), &Transform::new(), &[], ClampPolicy::FirstMatch);
        assert!(bounds.is_unbounded());
    }

    #[test]
    fn test_rotation_update_uses_merged_transform() {
        // 200x100 in a square cell: horizontal slack at 0 degrees, none at 90
        let mut map = TransformMap::new();
        let id = ImageId::from("photo");
        let cells = [Some(CellSize::new(100.0, 100.0))];
        apply_update(&mut map, &id, Some((200, 100)), &TransformUpdate::offsets(50.0, 0.0), &cells, ClampPolicy::Tightest);

        let turned = apply_update(&mut map, &id, Some((200, 100)), &TransformUpdate::rotation(90.0), &cells, ClampPolicy::Tightest);
        assert_eq!(turned.rotation, 90.0);
        assert_eq!(turned.offset_x, 0.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
