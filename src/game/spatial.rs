//! Uniform bucket grid over world space
//!
//! The world rectangle is divided into `width × height` buckets. Every live
//! cell sits in exactly one bucket, the one its position quantizes to.
//! Cells never move, so the bucket is computed once on insertion and again
//! on removal.

use smallvec::SmallVec;

use crate::game::state::{Cell, CellId};
use crate::util::vec2::Vec2;

/// Inline capacity for bucket storage (cells per bucket, typically low)
const BUCKET_INLINE_CAPACITY: usize = 4;

/// Bucket coordinates `(x, y)`; may fall outside the grid before bounds checks
pub type BucketCoord = (i32, i32);

/// Grid errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("bucket ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },
    #[error("grid and cell list disagree: {0}")]
    Inconsistent(String),
}

/// Entry stored in a bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEntry {
    pub id: CellId,
    pub position: Vec2,
}

type Bucket = SmallVec<[GridEntry; BUCKET_INLINE_CAPACITY]>;

/// Quantize a world position into bucket coordinates
///
/// Scales `position / world_size` by the grid dimensions and truncates toward
/// zero. Positions outside `[0, world_size)` give coordinates outside the grid;
/// callers bounds-check before indexing.
#[inline]
pub fn bucket_coordinates_for(position: Vec2, world_size: Vec2, grid_size: (usize, usize)) -> BucketCoord {
    (
        (position.x / world_size.x * grid_size.0 as f32) as i32,
        (position.y / world_size.y * grid_size.1 as f32) as i32,
    )
}

/// Uniform bucket grid indexing cells by quantized position
#[derive(Debug, Clone)]
pub struct Grid {
    world_size: Vec2,
    width: usize,
    height: usize,
    /// Row-major buckets, `y * width + x`
    buckets: Vec<Bucket>,
}

impl Grid {
    pub fn new(world_size: Vec2, width: usize, height: usize) -> Self {
        Self {
            world_size,
            width,
            height,
            buckets: vec![Bucket::new(); width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn world_size(&self) -> Vec2 {
        self.world_size
    }

    /// Bucket coordinates for a world position (unchecked)
    #[inline]
    pub fn bucket_for(&self, position: Vec2) -> BucketCoord {
        bucket_coordinates_for(position, self.world_size, (self.width, self.height))
    }

    /// World-space center of a bucket
    pub fn bucket_center(&self, (x, y): BucketCoord) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) * self.world_size.x / self.width as f32,
            (y as f32 + 0.5) * self.world_size.y / self.height as f32,
        )
    }

    #[inline]
    pub fn in_bounds(&self, (x, y): BucketCoord) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn index(&self, coord: BucketCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.1 as usize * self.width + coord.0 as usize)
        } else {
            None
        }
    }

    /// Append a cell to the bucket its position quantizes to
    pub fn insert(&mut self, cell: &Cell) -> Result<BucketCoord, GridError> {
        let coord = self.bucket_for(cell.position);
        let idx = self
            .index(coord)
            .ok_or(GridError::OutOfBounds { x: coord.0, y: coord.1 })?;
        self.buckets[idx].push(GridEntry {
            id: cell.id,
            position: cell.position,
        });
        Ok(coord)
    }

    /// Remove a cell from its bucket
    /// Returns true if the cell was found and removed; a miss is a silent no-op
    pub fn remove(&mut self, cell: &Cell) -> bool {
        let coord = self.bucket_for(cell.position);
        let Some(idx) = self.index(coord) else {
            return false;
        };
        let bucket = &mut self.buckets[idx];
        if let Some(pos) = bucket.iter().position(|e| e.id == cell.id) {
            // Keep bucket order stable so window snapshots list cells oldest first
            bucket.remove(pos);
            true
        } else {
            false
        }
    }

    /// Entries of one bucket, `None` when off-grid
    pub fn bucket(&self, coord: BucketCoord) -> Option<&[GridEntry]> {
        self.index(coord).map(|idx| self.buckets[idx].as_slice())
    }

    /// Snapshot the cell positions of every bucket within `radius` buckets of `center`
    ///
    /// The result has the grid's shape. Slots inside the window and on the grid
    /// hold a copy of their bucket's positions (possibly empty); every other
    /// slot is left unset.
    pub fn windowed_query(&self, center: BucketCoord, radius: usize) -> VisibilityWindow {
        let mut window = VisibilityWindow::empty(self.width, self.height);
        let r = radius.min(i32::MAX as usize) as i32;

        // Window intersected with the grid; index() still guards every access
        let x_min = center.0.saturating_sub(r).max(0);
        let x_max = center.0.saturating_add(r).min(self.width as i32 - 1);
        let y_min = center.1.saturating_sub(r).max(0);
        let y_max = center.1.saturating_add(r).min(self.height as i32 - 1);

        for x in x_min..=x_max {
            for y in y_min..=y_max {
                if let Some(idx) = self.index((x, y)) {
                    let positions: Box<[Vec2]> =
                        self.buckets[idx].iter().map(|e| e.position).collect();
                    window.slots[idx] = Some(positions);
                }
            }
        }

        window
    }

    /// Cell count of every bucket as `((x, y), count)`, row-major
    pub fn occupancy(&self) -> impl Iterator<Item = (BucketCoord, usize)> + '_ {
        self.buckets.iter().enumerate().map(move |(idx, bucket)| {
            (((idx % self.width) as i32, (idx / self.width) as i32), bucket.len())
        })
    }

    /// Total cells in the grid
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.is_empty())
    }

    /// Verify that `cells` and the grid hold exactly the same cells, each in
    /// the bucket its position quantizes to
    pub fn check_consistency(&self, cells: &[Cell]) -> Result<(), GridError> {
        for cell in cells {
            let coord = self.bucket_for(cell.position);
            let bucket = self
                .bucket(coord)
                .ok_or(GridError::OutOfBounds { x: coord.0, y: coord.1 })?;
            let hits = bucket.iter().filter(|e| e.id == cell.id).count();
            if hits != 1 {
                return Err(GridError::Inconsistent(format!(
                    "cell {} appears {} times in bucket ({}, {})",
                    cell.id, hits, coord.0, coord.1
                )));
            }
        }

        let total = self.len();
        if total != cells.len() {
            return Err(GridError::Inconsistent(format!(
                "grid holds {} entries but the cell list holds {}",
                total,
                cells.len()
            )));
        }

        Ok(())
    }

    /// Get statistics about the grid
    pub fn stats(&self) -> GridStats {
        GridStats {
            non_empty_buckets: self.buckets.iter().filter(|b| !b.is_empty()).count(),
            total_cells: self.len(),
            max_per_bucket: self.buckets.iter().map(|b| b.len()).max().unwrap_or(0),
        }
    }
}

/// Statistics about the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridStats {
    pub non_empty_buckets: usize,
    pub total_cells: usize,
    pub max_per_bucket: usize,
}

/// Grid-shaped snapshot of bucket contents around one creature
///
/// Owned copies only: later grid mutation never shows through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityWindow {
    width: usize,
    height: usize,
    slots: Vec<Option<Box<[Vec2]>>>,
}

impl VisibilityWindow {
    /// Window of the given shape with every slot unset
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            slots: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Positions seen in bucket `(x, y)`; `None` if the slot is unset or off-grid
    pub fn get(&self, (x, y): BucketCoord) -> Option<&[Vec2]> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.slots[y as usize * self.width + x as usize].as_deref()
    }

    pub fn is_visible(&self, coord: BucketCoord) -> bool {
        self.get(coord).is_some()
    }

    /// Number of set slots
    pub fn visible_bucket_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Every cell position in every set slot
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.slots
            .iter()
            .flatten()
            .flat_map(|positions| positions.iter().copied())
    }

    /// Closest visible cell position to `point`
    pub fn nearest_to(&self, point: Vec2) -> Option<Vec2> {
        self.positions().min_by(|a, b| {
            point
                .distance_sq_to(*a)
                .partial_cmp(&point.distance_sq_to(*b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}
