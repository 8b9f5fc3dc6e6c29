//! Editing session state.
//!
//! [`Editor`] owns the imported photos, the grid, the per-image transforms
//! and the padding, and routes every transform change through
//! [`apply_update`]. The storage backend is injected; each state change is
//! written to it straight away and a failed write is logged, never returned.

use crate::clamp::{apply_update, bounds_for, ClampPolicy};
use crate::compose::{self, preview_style, ExportConfig, ExportedImage, PreviewStyle};
use crate::error::EditorError;
use crate::geometry::CellSize;
use crate::grid::{Grid, GridError, PaddingSpec, Rgb, CELL_COUNT};
use crate::interact::{nudge_update, Direction, DragSession, NudgeStep, PointerButton};
use crate::persist::{Settings, Store, StoredImage};
use crate::photo::{ImageId, ImageSet, Photo};
use crate::transform::{Transform, TransformMap, TransformUpdate};

pub struct Editor<S: Store> {
    store: S,
    images: ImageSet,
    grid: Grid,
    transforms: TransformMap,
    padding: PaddingSpec,
    /// Measured on-screen size of each cell, `None` until laid out
    cell_sizes: [Option<CellSize>; CELL_COUNT],
    selected: Option<usize>,
    drag: Option<DragSession>,
    policy: ClampPolicy,
}

impl<S: Store> Editor<S> {
    /// Start an empty session backed by `store`. Nothing is loaded from it.
    pub fn new(store: S) -> Self {
        Self {
            store,
            images: ImageSet::new(),
            grid: Grid::new(),
            transforms: TransformMap::new(),
            padding: PaddingSpec::default(),
            cell_sizes: [None; CELL_COUNT],
            selected: None,
            drag: None,
            policy: ClampPolicy::default(),
        }
    }

    /// Resume the session saved in `store`.
    ///
    /// Photos that no longer decode are dropped; unreadable settings fall
    /// back to defaults. Both are logged and neither fails the restore.
    pub fn restore(store: S) -> Self {
        let mut editor = Self::new(store);

        match editor.store.load_images() {
            Ok(stored) => {
                for image in stored {
                    match Photo::decode(image.id.clone(), image.name, image.bytes) {
                        Ok(photo) => editor.images.insert(photo),
                        Err(e) => log::warn!("dropping saved image {}: {e}", image.id),
                    }
                }
            }
            Err(e) => log::warn!("could not load saved images: {e}"),
        }

        match editor.store.load_settings() {
            Ok(Some(settings)) => {
                editor.grid = settings.grid();
                editor.transforms = settings.image_transforms;
                editor.padding = settings.global_padding;
            }
            Ok(None) => {}
            Err(e) => log::warn!("could not load saved settings, using defaults: {e}"),
        }

        for photo in editor.images.iter() {
            editor.transforms.ensure(&photo.id);
        }
        log::debug!(
            "restored {} images, {} transforms",
            editor.images.len(),
            editor.transforms.len()
        );
        editor
    }

    /// Use `policy` when an image sits in more than one cell.
    pub fn with_policy(mut self, policy: ClampPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn images(&self) -> &ImageSet {
        &self.images
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn transforms(&self) -> &TransformMap {
        &self.transforms
    }

    pub fn padding(&self) -> &PaddingSpec {
        &self.padding
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn policy(&self) -> ClampPolicy {
        self.policy
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Stored transform for `id` (default if none).
    pub fn transform(&self, id: &ImageId) -> Transform {
        self.transforms.get_or_default(id)
    }

    /// Current state as a settings record.
    pub fn settings(&self) -> Settings {
        Settings::capture(&self.grid, &self.transforms, &self.padding)
    }

    // ------------------------------------------------------------------
    // Images and grid
    // ------------------------------------------------------------------

    /// Decode and add a photo, placing it in the first empty cell if any.
    pub fn import_image(&mut self, name: &str, bytes: Vec<u8>) -> Result<ImageId, EditorError> {
        let id = self
            .images
            .allocate_id(|id| self.transforms.contains(id) || !self.grid.cells_containing(id).is_empty());
        let photo = Photo::decode(id.clone(), name, bytes)?;
        log::debug!("imported {name} as {id} ({:?})", photo.natural_size());

        self.images.insert(photo);
        self.transforms.ensure(&id);
        if let Some(cell) = self.grid.first_empty() {
            self.grid.assign(cell, id.clone())?;
            self.reclamp(&id);
        }

        self.persist_images();
        self.persist();
        Ok(id)
    }

    /// Reload a previously saved photo under its saved id.
    ///
    /// Grid cells and transforms that already refer to `id` are reattached to
    /// it. The photo is not placed in a new cell.
    pub fn restore_image(&mut self, id: ImageId, name: &str, bytes: Vec<u8>) -> Result<(), EditorError> {
        let photo = Photo::decode(id.clone(), name, bytes)?;
        log::debug!("restored {name} as {id} ({:?})", photo.natural_size());

        self.images.insert(photo);
        self.transforms.ensure(&id);
        self.reclamp(&id);

        self.persist_images();
        self.persist();
        Ok(())
    }

    /// Every loaded photo as it would be written to storage.
    pub fn stored_images(&self) -> Vec<StoredImage> {
        self.images
            .iter()
            .map(|photo| StoredImage {
                id: photo.id.clone(),
                name: photo.name.clone(),
                bytes: photo.source.clone(),
            })
            .collect()
    }

    /// Show image `id` in `cell`.
    pub fn assign(&mut self, cell: usize, id: ImageId) -> Result<(), EditorError> {
        if !self.images.contains(&id) {
            return Err(EditorError::UnknownImage(id));
        }
        self.grid.assign(cell, id.clone())?;
        self.transforms.ensure(&id);
        // The new cell may be tighter than the ones the image already had
        self.reclamp(&id);
        self.persist();
        Ok(())
    }

    /// Empty `cell`. The removed image keeps its transform.
    pub fn clear(&mut self, cell: usize) -> Result<Option<ImageId>, EditorError> {
        let removed = self.grid.clear(cell)?;
        if self.selected == Some(cell) {
            self.selected = None;
        }
        if removed.is_some() {
            self.persist();
        }
        Ok(removed)
    }

    /// Select a cell for keyboard and toolbar edits, or deselect with `None`.
    pub fn select(&mut self, cell: Option<usize>) -> Result<(), EditorError> {
        if let Some(index) = cell {
            if index >= CELL_COUNT {
                return Err(GridError::CellOutOfRange(index).into());
            }
        }
        self.selected = cell;
        Ok(())
    }

    /// Record the measured on-screen size of `cell`.
    pub fn set_cell_size(&mut self, cell: usize, size: Option<CellSize>) -> Result<(), EditorError> {
        let slot = self
            .cell_sizes
            .get_mut(cell)
            .ok_or(GridError::CellOutOfRange(cell))?;
        *slot = size;

        if let Some(id) = self.grid.get(cell).cloned() {
            if self.reclamp(&id) {
                self.persist();
            }
        }
        Ok(())
    }

    pub fn cell_size(&self, cell: usize) -> Option<CellSize> {
        self.cell_sizes.get(cell).copied().flatten()
    }

    // ------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------

    /// Merge `update` into the transform of `id`, clamped for every cell it occupies.
    pub fn update_transform(&mut self, id: &ImageId, update: &TransformUpdate) -> Transform {
        let cells = self.cells_for(id);
        let natural = self.images.get(id).map(Photo::natural_size);
        let transform = apply_update(&mut self.transforms, id, natural, update, &cells, self.policy);
        self.persist();
        transform
    }

    /// Image shown in the selected cell.
    fn selected_image(&self) -> Option<ImageId> {
        self.selected.and_then(|cell| self.grid.get(cell)).cloned()
    }

    /// Set the zoom of the selected image.
    pub fn zoom_selected(&mut self, zoom: f64) -> Option<Transform> {
        let id = self.selected_image()?;
        Some(self.update_transform(&id, &TransformUpdate::zoom(zoom)))
    }

    /// Rotate the selected image by `delta` degrees (normally ±90).
    pub fn rotate_selected(&mut self, delta: f64) -> Option<Transform> {
        let id = self.selected_image()?;
        let rotation = self.transform(&id).rotated_by(delta);
        Some(self.update_transform(&id, &TransformUpdate::rotation(rotation)))
    }

    /// Pan the selected image one keyboard step.
    pub fn nudge_selected(&mut self, direction: Direction, coarse: bool) -> Option<Transform> {
        let id = self.selected_image()?;
        let update = nudge_update(&self.transform(&id), direction, NudgeStep::from_shift(coarse));
        Some(self.update_transform(&id, &update))
    }

    /// Put the selected image back to zoom 100, no pan, no rotation.
    pub fn reset_selected(&mut self) -> Option<Transform> {
        let id = self.selected_image()?;
        let defaults = Transform::default();
        let update = TransformUpdate {
            zoom: Some(defaults.zoom),
            offset_x: Some(defaults.offset_x),
            offset_y: Some(defaults.offset_y),
            rotation: Some(defaults.rotation),
        };
        Some(self.update_transform(&id, &update))
    }

    // ------------------------------------------------------------------
    // Dragging
    // ------------------------------------------------------------------

    /// Start panning the selected image. Returns whether a drag started.
    ///
    /// A drag already in progress is dropped without committing.
    pub fn begin_drag(&mut self, button: PointerButton, pointer: (f64, f64)) -> bool {
        self.drag = self.selected_image().and_then(|id| {
            let transform = self.transform(&id);
            DragSession::begin(id, button, pointer, &transform)
        });
        self.drag.is_some()
    }

    /// Follow the pointer. Returns the live offsets, or `None` if not dragging.
    ///
    /// The stored transform is not changed until [`Editor::end_drag`].
    pub fn drag_move(&mut self, pointer: (f64, f64)) -> Option<(f64, f64)> {
        let drag = self.drag.as_ref()?;
        let id = drag.image_id();
        let bounds = bounds_for(
            self.images.get(id).map(Photo::natural_size),
            &self.transforms.get_or_default(id),
            &self.cells_for(id),
            self.policy,
        );
        self.drag.as_mut().map(|drag| drag.pointer_move(pointer, bounds))
    }

    /// Release the pointer, committing the drag as one clamped update.
    pub fn end_drag(&mut self) -> Option<Transform> {
        let (id, update) = self.drag.take()?.finish();
        Some(self.update_transform(&id, &update))
    }

    /// Abandon the drag without touching the stored transform.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    // ------------------------------------------------------------------
    // Padding
    // ------------------------------------------------------------------

    /// Set the padding width in export pixels. Negative or non-finite widths are ignored.
    pub fn set_padding_width(&mut self, width: f64) {
        if !width.is_finite() || width < 0.0 {
            log::debug!("ignoring padding width {width}");
            return;
        }
        self.padding.width = width;
        self.persist();
    }

    /// Set the padding colour from `#rrggbb` or `#rgb`.
    pub fn set_padding_color(&mut self, color: &str) -> Result<(), EditorError> {
        self.padding.color = color.parse::<Rgb>()?;
        self.persist();
        Ok(())
    }

    /// Set the printed cut guide margin.
    pub fn set_cut_margin(&mut self, margin: f64) {
        if !margin.is_finite() || margin < 0.0 {
            log::debug!("ignoring cut margin {margin}");
            return;
        }
        self.padding.cut_margin = margin;
        self.persist();
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Preview style for the image in `cell`, or `None` for an empty cell
    /// or an image that is not loaded.
    ///
    /// While the image is being dragged the live drag offsets are shown.
    pub fn preview(&self, cell: usize) -> Option<PreviewStyle> {
        let id = self.grid.get(cell)?;
        let photo = self.images.get(id)?;
        let mut transform = self.transform(id);
        if let Some(drag) = self.drag.as_ref().filter(|d| d.image_id() == id) {
            (transform.offset_x, transform.offset_y) = drag.current();
        }
        Some(preview_style(photo.natural_size(), self.cell_size(cell), &transform))
    }

    /// Render and encode the postcard.
    pub fn export(&self, config: &ExportConfig, timestamp_ms: u64) -> Result<ExportedImage, EditorError> {
        let exported = compose::export(
            &self.grid,
            &self.images,
            &self.transforms,
            &self.padding,
            config,
            timestamp_ms,
        )?;
        Ok(exported)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Measured sizes of every cell showing `id`, in grid order.
    fn cells_for(&self, id: &ImageId) -> Vec<Option<CellSize>> {
        self.grid
            .cells_containing(id)
            .into_iter()
            .map(|cell| self.cell_sizes[cell])
            .collect()
    }

    /// Re-apply the bounds to `id` after its cells changed. Returns whether it moved.
    fn reclamp(&mut self, id: &ImageId) -> bool {
        let before = self.transforms.get_or_default(id);
        let cells = self.cells_for(id);
        let natural = self.images.get(id).map(Photo::natural_size);
        let after = apply_update(
            &mut self.transforms,
            id,
            natural,
            &TransformUpdate::default(),
            &cells,
            self.policy,
        );
        before != after
    }

    fn persist(&mut self) {
        let settings = self.settings();
        if let Err(e) = self.store.save_settings(&settings) {
            log::warn!("failed to save settings: {e}");
        }
    }

    fn persist_images(&mut self) {
        let images = self.stored_images();
        if let Err(e) = self.store.save_images(&images) {
            log::warn!("failed to save images: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodedImage;
    use crate::encode::encode_png;
    use crate::persist::{MemoryStore, StoreError};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DecodedImage::filled(width, height, [10, 120, 200]);
        encode_png(&img.pixels, width, height).unwrap()
    }

    /// Editor with one 4000x3000 photo in cell 0 measured at 1255x1615.
    fn scenario() -> (Editor<MemoryStore>, ImageId) {
        let mut editor = Editor::new(MemoryStore::new());
        let id = ImageId::from("wide");
        let image = DecodedImage::filled(4000, 3000, [90, 90, 90]);
        editor.images.insert(Photo::new(id.clone(), "wide.jpg", image, Vec::new()));
        editor.assign(0, id.clone()).unwrap();
        editor.set_cell_size(0, Some(CellSize::new(1255.0, 1615.0))).unwrap();
        editor.select(Some(0)).unwrap();
        (editor, id)
    }

    /// Store whose writes always fail.
    #[derive(Default)]
    struct BrokenStore;

    impl Store for BrokenStore {
        fn save_images(&mut self, _: &[StoredImage]) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }

        fn load_images(&self) -> Result<Vec<StoredImage>, StoreError> {
            Err(StoreError::Unavailable("closed".into()))
        }

        fn save_settings(&mut self, _: &Settings) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }

        fn load_settings(&self) -> Result<Option<Settings>, StoreError> {
            Err(StoreError::Unavailable("closed".into()))
        }
    }

    #[test]
    fn test_import_fills_cells_in_order() {
        let mut editor = Editor::new(MemoryStore::new());
        let a = editor.import_image("a.png", png(4, 4)).unwrap();
        let b = editor.import_image("b.png", png(4, 4)).unwrap();
        assert_ne!(a, b);
        assert_eq!(editor.grid().get(0), Some(&a));
        assert_eq!(editor.grid().get(1), Some(&b));
        assert!(editor.transforms().contains(&a));
        assert_eq!(editor.store().load_images().unwrap().len(), 2);
    }

    #[test]
    fn test_import_when_grid_full() {
        let mut editor = Editor::new(MemoryStore::new());
        for i in 0..4 {
            editor.import_image(&format!("{i}.png"), png(2, 2)).unwrap();
        }
        let extra = editor.import_image("extra.png", png(2, 2)).unwrap();
        assert!(editor.images().contains(&extra));
        assert!(editor.grid().cells_containing(&extra).is_empty());
    }

    #[test]
    fn test_import_rejects_garbage() {
        let mut editor = Editor::new(MemoryStore::new());
        let result = editor.import_image("notes.txt", b"hello".to_vec());
        assert!(matches!(result, Err(EditorError::Decode(_))));
        assert!(editor.images().is_empty());
        assert_eq!(editor.grid().first_empty(), Some(0));
    }

    #[test]
    fn test_offset_clamped_on_update() {
        let (mut editor, id) = scenario();
        let t = editor.update_transform(&id, &TransformUpdate::offsets(1000.0, 50.0));
        assert!((t.offset_x - 449.1667).abs() < 0.001);
        assert_eq!(t.offset_y, 0.0);
    }

    #[test]
    fn test_clear_keeps_transform() {
        let (mut editor, id) = scenario();
        editor.update_transform(&id, &TransformUpdate::zoom(150.0));
        assert_eq!(editor.clear(0).unwrap(), Some(id.clone()));
        assert_eq!(editor.grid().get(0), None);
        assert_eq!(editor.transforms().get(&id).map(|t| t.zoom), Some(150.0));
        assert_eq!(editor.selected(), None);

        // Placing it again brings the same transform back
        editor.assign(2, id.clone()).unwrap();
        assert_eq!(editor.transform(&id).zoom, 150.0);
    }

    #[test]
    fn test_assign_unknown_image() {
        let mut editor = Editor::new(MemoryStore::new());
        let result = editor.assign(0, ImageId::from("nope"));
        assert!(matches!(result, Err(EditorError::UnknownImage(_))));
    }

    #[test]
    fn test_cell_out_of_range() {
        let (mut editor, id) = scenario();
        assert!(matches!(editor.assign(4, id), Err(EditorError::Grid(GridError::CellOutOfRange(4)))));
        assert!(editor.select(Some(9)).is_err());
        assert!(editor.set_cell_size(4, None).is_err());
    }

    #[test]
    fn test_rotate_four_times_returns_to_start() {
        let (mut editor, _) = scenario();
        for expected in [90.0, 180.0, 270.0, 0.0] {
            assert_eq!(editor.rotate_selected(90.0).unwrap().rotation, expected);
        }
        assert_eq!(editor.rotate_selected(-90.0).unwrap().rotation, 270.0);
    }

    #[test]
    fn test_rotation_reclamps_offsets() {
        let (mut editor, id) = scenario();
        editor.update_transform(&id, &TransformUpdate::offsets(400.0, 0.0));
        // At 90 degrees the 3000-wide side fits the cell width: no horizontal slack left
        let t = editor.rotate_selected(90.0).unwrap();
        assert!(t.offset_x < 400.0);
    }

    #[test]
    fn test_nudge_selected() {
        let (mut editor, _) = scenario();
        assert_eq!(editor.nudge_selected(Direction::Right, true).unwrap().offset_x, 10.0);
        assert_eq!(editor.nudge_selected(Direction::Left, false).unwrap().offset_x, 9.0);
        // No vertical slack at zoom 100
        assert_eq!(editor.nudge_selected(Direction::Down, true).unwrap().offset_y, 0.0);
    }

    #[test]
    fn test_selection_required_for_edits() {
        let (mut editor, _) = scenario();
        editor.select(None).unwrap();
        assert!(editor.rotate_selected(90.0).is_none());
        assert!(editor.nudge_selected(Direction::Up, false).is_none());
        assert!(!editor.begin_drag(PointerButton::Primary, (0.0, 0.0)));

        editor.select(Some(3)).unwrap();
        assert!(editor.zoom_selected(120.0).is_none());
    }

    #[test]
    fn test_drag_commits_once_on_release() {
        let (mut editor, id) = scenario();
        assert!(editor.begin_drag(PointerButton::Primary, (500.0, 500.0)));

        let live = editor.drag_move((700.0, 600.0)).unwrap();
        assert_eq!(live, (100.0, 0.0));
        // Still the stored value until release
        assert_eq!(editor.transform(&id).offset_x, 0.0);
        assert!(editor.preview(0).unwrap().transform_css.contains("translate(10%, 0%)"));

        let live = editor.drag_move((5000.0, 500.0)).unwrap();
        assert!((live.0 - 449.1667).abs() < 0.001);

        let committed = editor.end_drag().unwrap();
        assert_eq!(committed.offset_x, live.0);
        assert!(!editor.is_dragging());
        assert!(editor.end_drag().is_none());
        assert!(editor.drag_move((0.0, 0.0)).is_none());
    }

    #[test]
    fn test_drag_secondary_button_ignored() {
        let (mut editor, _) = scenario();
        assert!(!editor.begin_drag(PointerButton::from(2), (0.0, 0.0)));
        assert!(!editor.is_dragging());
    }

    #[test]
    fn test_cancel_drag_keeps_stored_offsets() {
        let (mut editor, id) = scenario();
        editor.begin_drag(PointerButton::Primary, (0.0, 0.0));
        editor.drag_move((200.0, 0.0));
        editor.cancel_drag();
        assert_eq!(editor.transform(&id).offset_x, 0.0);
        assert!(!editor.is_dragging());
    }

    #[test]
    fn test_shared_image_uses_tightest_cell() {
        let (mut editor, id) = scenario();
        editor.assign(1, id.clone()).unwrap();
        // A wide second cell: the 4:3 image fits its width, so no horizontal slack
        editor.set_cell_size(1, Some(CellSize::new(2000.0, 500.0))).unwrap();
        let t = editor.update_transform(&id, &TransformUpdate::offsets(300.0, 0.0));
        assert_eq!(t.offset_x, 0.0);
    }

    #[test]
    fn test_first_match_policy_uses_first_cell() {
        let (editor, id) = scenario();
        let mut editor = editor.with_policy(ClampPolicy::FirstMatch);
        editor.assign(1, id.clone()).unwrap();
        editor.set_cell_size(1, Some(CellSize::new(2000.0, 500.0))).unwrap();
        let t = editor.update_transform(&id, &TransformUpdate::offsets(300.0, 0.0));
        assert_eq!(t.offset_x, 300.0);
    }

    #[test]
    fn test_remeasured_cell_reclamps() {
        let (mut editor, id) = scenario();
        editor.update_transform(&id, &TransformUpdate::offsets(400.0, 0.0));
        editor.set_cell_size(0, Some(CellSize::new(2000.0, 1000.0))).unwrap();
        assert_eq!(editor.transform(&id).offset_x, 0.0);
    }

    #[test]
    fn test_padding_setters() {
        let mut editor = Editor::new(MemoryStore::new());
        editor.set_padding_width(25.0);
        editor.set_padding_width(-1.0);
        assert_eq!(editor.padding().width, 25.0);

        editor.set_padding_color("#000").unwrap();
        assert_eq!(editor.padding().color, Rgb([0, 0, 0]));
        assert!(editor.set_padding_color("black").is_err());

        editor.set_cut_margin(0.0);
        assert_eq!(editor.padding().cut_margin, 0.0);
        assert!(editor.store().settings_json().unwrap().contains("\"color\":\"#000000\""));
    }

    #[test]
    fn test_preview_of_empty_cell() {
        let (editor, _) = scenario();
        assert!(editor.preview(1).is_none());
        let style = editor.preview(0).unwrap();
        assert_eq!(style.height_css(), "1615px");
    }

    #[test]
    fn test_restore_round_trip() {
        let mut editor = Editor::new(MemoryStore::new());
        let id = editor.import_image("small.png", png(40, 30)).unwrap();
        editor.set_cell_size(0, Some(CellSize::new(20.0, 20.0))).unwrap();
        let update = TransformUpdate {
            zoom: Some(125.0),
            offset_x: Some(2.0),
            rotation: Some(90.0),
            ..Default::default()
        };
        editor.update_transform(&id, &update);
        editor.set_padding_width(12.0);

        let restored = Editor::restore(editor.store().clone());
        assert_eq!(restored.grid(), editor.grid());
        assert_eq!(restored.transforms(), editor.transforms());
        assert_eq!(restored.padding(), editor.padding());
        assert_eq!(restored.images().get(&id).unwrap().natural_size(), (40, 30));
    }

    #[test]
    fn test_import_after_restore_avoids_saved_ids() {
        let mut store = MemoryStore::new();
        store.set_settings_json(
            r#"{"gridItems": [{"imageId": "img-0"}, {}, {}, {}],
                "imageTransforms": {"img-0": {"zoom": 180, "rotation": 90}}}"#,
        );
        let mut editor = Editor::restore(store);
        assert!(editor.images().is_empty());

        let fresh = editor.import_image("fresh.png", png(8, 6)).unwrap();
        assert_ne!(fresh, ImageId::from("img-0"));
        assert_eq!(editor.grid().cells_containing(&fresh), vec![1]);
        assert_eq!(editor.transform(&fresh), Transform::default());
        // The saved entry is left alone for its photo to come back
        assert_eq!(editor.transform(&ImageId::from("img-0")).zoom, 180.0);
    }

    #[test]
    fn test_restore_image_reattaches_saved_state() {
        let mut editor = Editor::new(MemoryStore::new());
        let id = editor.import_image("a.png", png(40, 30)).unwrap();
        editor.assign(3, id.clone()).unwrap();
        editor.update_transform(&id, &TransformUpdate::zoom(140.0));
        let saved = editor.stored_images();
        let json = editor.store().settings_json().unwrap().to_string();

        // Settings only, as a page that keeps photos elsewhere would start
        let mut store = MemoryStore::new();
        store.set_settings_json(json);
        let mut restored = Editor::restore(store);
        assert!(restored.images().is_empty());

        for image in saved {
            restored.restore_image(image.id, &image.name, image.bytes).unwrap();
        }
        assert_eq!(restored.grid().cells_containing(&id), vec![0, 3]);
        assert_eq!(restored.transform(&id).zoom, 140.0);
        assert_eq!(restored.images().get(&id).unwrap().natural_size(), (40, 30));
        assert_eq!(restored.store().load_images().unwrap().len(), 1);
    }

    #[test]
    fn test_restore_image_rejects_garbage() {
        let mut editor = Editor::new(MemoryStore::new());
        let result = editor.restore_image(ImageId::from("img-0"), "x", vec![0, 1, 2]);
        assert!(matches!(result, Err(EditorError::Decode(_))));
        assert!(editor.images().is_empty());
    }

    #[test]
    fn test_restore_defaults_on_bad_settings() {
        let mut store = MemoryStore::new();
        store.set_settings_json("{broken");
        let editor = Editor::restore(store);
        assert_eq!(editor.settings(), Settings::default());
    }

    #[test]
    fn test_restore_keeps_good_fields_next_to_bad_ones() {
        let mut store = MemoryStore::new();
        store.set_settings_json(
            r#"{"gridItems": [{"imageId": "img-0"}],
                "imageTransforms": {"img-0": {"zoom": "120", "offsetX": 3}},
                "globalPadding": {"width": null, "cutMargin": 8}}"#,
        );
        let editor = Editor::restore(store);
        let id = ImageId::from("img-0");
        assert_eq!(editor.grid().get(0), Some(&id));
        assert_eq!(editor.transform(&id), Transform { offset_x: 3.0, ..Transform::default() });
        assert_eq!(editor.padding().width, 10.0);
        assert_eq!(editor.padding().cut_margin, 8.0);
    }

    #[test]
    fn test_store_failures_do_not_surface() {
        let mut editor = Editor::restore(BrokenStore);
        let id = editor.import_image("a.png", png(8, 8)).unwrap();
        editor.set_padding_width(4.0);
        editor.assign(3, id).unwrap();
        assert_eq!(editor.padding().width, 4.0);
    }

    #[test]
    fn test_export_through_editor() {
        let (editor, _) = scenario();
        let config = ExportConfig { width: 64, height: 64, ..ExportConfig::default() };
        let exported = editor.export(&config, 7).unwrap();
        assert_eq!(exported.filename, "postcard-7.png");
        assert!(!exported.bytes.is_empty());
    }
}
