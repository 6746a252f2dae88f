//! Sprite atlas slicing

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Vector2;

/// How a source image is cut into a grid of equal-size slots.
///
/// Slicing starts at `start_offset` and steps by `tile_size + tile_gap`
/// on each axis. A tile size below 1 on either axis yields zero slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlicingSettings {
    pub start_offset: Vector2,
    pub tile_gap: Vector2,
    pub tile_size: Vector2,
}

impl Default for SlicingSettings {
    fn default() -> Self {
        Self {
            start_offset: Vector2::ZERO,
            tile_gap: Vector2::ZERO,
            tile_size: Vector2::new(16, 16),
        }
    }
}

/// Pixel rectangle of one atlas slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Errors from atlas slicing and slot lookups.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The source image has not been loaded, so dimensions are unknown.
    #[error("atlas '{0}' image is not loaded yet")]
    NotLoaded(String),
    /// Slot geometry was requested before the atlas was sliced.
    #[error("atlas '{0}' has not been sliced yet")]
    NotSliced(String),
    #[error("atlas '{atlas}' has no slot {index}")]
    SlotOutOfRange { atlas: String, index: u32 },
}

/// Image dimensions become known only once the host has loaded the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageState {
    #[default]
    NotLoaded,
    Loaded {
        dimensions: Vector2,
    },
}

/// Memoized result of a slicing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Sliced {
    columns: u32,
    rows: u32,
    slots: Vec<SlotRect>,
}

/// One source image plus the settings that cut it into tile slots.
///
/// Identity is the string `id`; uniqueness is enforced by the owning
/// [`TileRegistry`](crate::TileRegistry) when the atlas is registered.
/// The slot list is computed lazily on the first [`slice`](Self::slice)
/// call and cached until the settings or the image change.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteAtlas {
    id: String,
    source: String,
    settings: SlicingSettings,
    image: ImageState,
    sliced: Option<Sliced>,
}

impl SpriteAtlas {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        settings: SlicingSettings,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            settings,
            image: ImageState::NotLoaded,
            sliced: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn settings(&self) -> SlicingSettings {
        self.settings
    }

    /// Replace the slicing settings, invalidating any cached slot list.
    pub fn set_settings(&mut self, settings: SlicingSettings) {
        self.settings = settings;
        self.sliced = None;
    }

    /// Record the image dimensions reported by the host loader.
    ///
    /// Also invalidates the cached slot list: a reload may have changed
    /// the image.
    pub fn mark_loaded(&mut self, dimensions: Vector2) {
        self.image = ImageState::Loaded { dimensions };
        self.sliced = None;
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.image, ImageState::Loaded { .. })
    }

    /// Pixel dimensions of the source image.
    pub fn dimensions(&self) -> Result<Vector2, AtlasError> {
        match self.image {
            ImageState::Loaded { dimensions } => Ok(dimensions),
            ImageState::NotLoaded => Err(AtlasError::NotLoaded(self.id.clone())),
        }
    }

    /// Cut the image into slots, row-major. Memoized: a second call
    /// returns the cached list without recomputing.
    pub fn slice(&mut self) -> Result<&[SlotRect], AtlasError> {
        let dimensions = self.dimensions()?;
        let sliced = self
            .sliced
            .get_or_insert_with(|| compute_slots(dimensions, self.settings));
        Ok(&sliced.slots)
    }

    fn layout(&self) -> Result<&Sliced, AtlasError> {
        self.sliced
            .as_ref()
            .ok_or_else(|| AtlasError::NotSliced(self.id.clone()))
    }

    /// Number of slots per row, known after the first [`slice`](Self::slice).
    pub fn columns(&self) -> Result<u32, AtlasError> {
        Ok(self.layout()?.columns)
    }

    pub fn rows(&self) -> Result<u32, AtlasError> {
        Ok(self.layout()?.rows)
    }

    pub fn slot_count(&self) -> Result<u32, AtlasError> {
        let layout = self.layout()?;
        Ok(layout.columns * layout.rows)
    }

    /// Pixel rectangle for a slot, converting the flat index through the
    /// resolved slot-count-per-row. Requires a completed slice pass.
    pub fn tile_rect(&self, index: u32) -> Result<SlotRect, AtlasError> {
        let layout = self.layout()?;
        if layout.columns == 0 || index >= layout.columns * layout.rows {
            return Err(AtlasError::SlotOutOfRange {
                atlas: self.id.clone(),
                index,
            });
        }
        let col = (index % layout.columns) as i32;
        let row = (index / layout.columns) as i32;
        let s = self.settings;
        Ok(SlotRect {
            x: s.start_offset.x + (s.tile_size.x + s.tile_gap.x) * col,
            y: s.start_offset.y + (s.tile_size.y + s.tile_gap.y) * row,
            w: s.tile_size.x,
            h: s.tile_size.y,
        })
    }
}

fn compute_slots(dimensions: Vector2, settings: SlicingSettings) -> Sliced {
    let size = settings.tile_size;
    let step = Vector2::new(size.x + settings.tile_gap.x, size.y + settings.tile_gap.y);
    // A non-positive tile size yields no slots; a non-positive step
    // (gap more negative than the tile size) would never advance.
    if size.x < 1 || size.y < 1 || step.x < 1 || step.y < 1 {
        return Sliced {
            columns: 0,
            rows: 0,
            slots: Vec::new(),
        };
    }

    let mut slots = Vec::new();
    let mut columns = 0u32;
    let mut rows = 0u32;
    let mut y = settings.start_offset.y;
    while y + size.y <= dimensions.y {
        let mut count_x = 0u32;
        let mut x = settings.start_offset.x;
        while x + size.x <= dimensions.x {
            slots.push(SlotRect {
                x,
                y,
                w: size.x,
                h: size.y,
            });
            count_x += 1;
            x += step.x;
        }
        columns = count_x;
        rows += 1;
        y += step.y;
    }
    if columns == 0 {
        // Rows with zero columns contain no slots at all.
        rows = 0;
    }
    Sliced {
        columns,
        rows,
        slots,
    }
}
