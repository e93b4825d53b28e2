//! Uniform broad-phase grid over the unit square.
//!
//! Each cell stores the slot of at most one resident particle. The spacing is
//! chosen so a cell's diagonal equals the particle radius, which keeps
//! "one particle per cell" a sound approximation for collision broad-phasing.
//! Overlapping particles share a cell and only one of them is discoverable.

use crate::math::{in_unit_domain, Vec2};

/// Cell value meaning "no resident particle".
pub const EMPTY: u32 = u32::MAX;

/// Cell side length for particles of the given radius.
pub fn grid_spacing(radius: f32) -> f32 {
    radius / std::f32::consts::SQRT_2
}

/// Integer cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: u32,
    pub y: u32,
}

impl CellCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn axis(&self, k: usize) -> u32 {
        if k == 0 {
            self.x
        } else {
            self.y
        }
    }
}

/// Square cell → particle-slot lookup table.
#[derive(Debug, Clone)]
pub struct GridIndex {
    spacing: f32,
    size: usize,
    cells: Vec<u32>,
}

impl GridIndex {
    /// Empty grid sized for particles of `radius`.
    ///
    /// `radius` must be positive and finite; the driver validates this.
    pub fn for_radius(radius: f32) -> Self {
        let spacing = grid_spacing(radius);
        let size = (1.0 / spacing) as usize + 1;
        Self {
            spacing,
            size,
            cells: vec![EMPTY; size * size],
        }
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Number of cells along each side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell holding `p`, or `None` when `p` is outside `[0, 1)²`.
    pub fn cell_of(&self, p: Vec2) -> Option<CellCoord> {
        if !in_unit_domain(p) {
            return None;
        }
        let gx = (p.x / self.spacing) as usize;
        let gy = (p.y / self.spacing) as usize;
        (gx < self.size && gy < self.size).then(|| CellCoord::new(gx as u32, gy as u32))
    }

    /// Cell holding `p` with coordinates clamped onto the table, so particles
    /// that drifted out of the domain map to the nearest border cell.
    pub fn clamped_cell_of(&self, p: Vec2) -> CellCoord {
        let max = (self.size - 1) as i64;
        // `as` saturates and maps NaN to 0
        let gx = ((p.x / self.spacing).floor() as i64).clamp(0, max);
        let gy = ((p.y / self.spacing).floor() as i64).clamp(0, max);
        CellCoord::new(gx as u32, gy as u32)
    }

    #[inline]
    fn offset(&self, cell: CellCoord) -> Option<usize> {
        let (x, y) = (cell.x as usize, cell.y as usize);
        (x < self.size && y < self.size).then_some(x * self.size + y)
    }

    /// Resident slot of `cell`, if any.
    pub fn get(&self, cell: CellCoord) -> Option<u32> {
        self.offset(cell)
            .map(|o| self.cells[o])
            .filter(|&slot| slot != EMPTY)
    }

    /// Store `slot` in `cell`; writes outside the table are ignored.
    pub fn set(&mut self, cell: CellCoord, slot: u32) {
        if let Some(o) = self.offset(cell) {
            self.cells[o] = slot;
        }
    }

    pub fn clear_cell(&mut self, cell: CellCoord) {
        self.set(cell, EMPTY);
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Recompute every cell from `positions`.
    ///
    /// Slots are written in increasing order, so colocated particles resolve
    /// to the largest slot. Positions outside `[0, 1)²` are left ungridded.
    pub fn rebuild(&mut self, positions: &[Vec2]) {
        self.clear();
        let mut skipped = 0usize;
        for (i, &p) in positions.iter().enumerate() {
            match self.cell_of(p) {
                Some(cell) => self.set(cell, i as u32),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::trace!(skipped, "particles outside the domain left ungridded");
        }
    }

    /// Number of non-empty cells.
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY).count()
    }

    /// Resident slots in the `(2 * reach + 1)²` window around `center`.
    pub fn neighbors(&self, center: CellCoord, reach: u32) -> impl Iterator<Item = u32> + '_ {
        let max = (self.size - 1) as u32;
        let xs = center.x.saturating_sub(reach)..=center.x.saturating_add(reach).min(max);
        xs.flat_map(move |x| {
            let ys = center.y.saturating_sub(reach)..=center.y.saturating_add(reach).min(max);
            ys.filter_map(move |y| self.get(CellCoord::new(x, y)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: f32 = 0.002;

    #[test]
    fn test_dimensions_follow_radius() {
        let grid = GridIndex::for_radius(RADIUS);
        let spacing = RADIUS / 2f32.sqrt();
        assert!((grid.spacing() - spacing).abs() < 1e-9);
        assert_eq!(grid.size(), (1.0 / spacing) as usize + 1);
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_cell_of_rejects_out_of_domain() {
        let grid = GridIndex::for_radius(RADIUS);
        assert!(grid.cell_of(Vec2::new(1.0, 0.5)).is_none());
        assert!(grid.cell_of(Vec2::new(0.5, -0.0001)).is_none());
        assert!(grid.cell_of(Vec2::new(0.999_99, 0.999_99)).is_some());
    }

    #[test]
    fn test_clamped_cell_stays_on_table() {
        let grid = GridIndex::for_radius(RADIUS);
        let max = grid.size() as u32 - 1;
        assert_eq!(grid.clamped_cell_of(Vec2::new(-0.3, 1.7)), CellCoord::new(0, max));
        assert_eq!(grid.clamped_cell_of(Vec2::new(f32::NAN, 0.0)), CellCoord::new(0, 0));
    }

    #[test]
    fn test_same_cell_keeps_larger_index() {
        let mut grid = GridIndex::for_radius(RADIUS);
        let a = Vec2::new(0.5, 0.5);
        let b = a + Vec2::splat(grid.spacing() * 0.1);
        let cell = grid.cell_of(a).unwrap();
        assert_eq!(grid.cell_of(b), Some(cell));

        grid.rebuild(&[a, b]);
        assert_eq!(grid.get(cell), Some(1));
        assert_eq!(grid.occupied(), 1);

        grid.rebuild(&[b, a]);
        assert_eq!(grid.get(cell), Some(1));
    }

    #[test]
    fn test_rebuild_consistency() {
        let mut grid = GridIndex::for_radius(RADIUS);
        let positions: Vec<Vec2> = (0..500)
            .map(|i| {
                let t = i as f32 * 0.618_034;
                Vec2::new(t.fract(), (t * 1.7).fract())
            })
            .chain([Vec2::new(1.2, 0.3), Vec2::new(0.3, -0.2)])
            .collect();
        grid.rebuild(&positions);

        for &p in &positions {
            let Some(cell) = grid.cell_of(p) else { continue };
            let resident = grid.get(cell).expect("in-domain particle must be gridded");
            assert_eq!(grid.cell_of(positions[resident as usize]), Some(cell));
        }
    }

    #[test]
    fn test_rebuild_discards_stale_entries() {
        let mut grid = GridIndex::for_radius(RADIUS);
        grid.rebuild(&[Vec2::new(0.1, 0.1), Vec2::new(0.9, 0.9)]);
        grid.rebuild(&[Vec2::new(0.9, 0.9)]);
        assert_eq!(grid.occupied(), 1);
        assert_eq!(grid.get(grid.cell_of(Vec2::new(0.9, 0.9)).unwrap()), Some(0));
    }

    #[test]
    fn test_neighbors_window() {
        let mut grid = GridIndex::for_radius(RADIUS);
        grid.set(CellCoord::new(0, 0), 3);
        grid.set(CellCoord::new(2, 2), 4);
        grid.set(CellCoord::new(5, 5), 5);

        let mut found: Vec<u32> = grid.neighbors(CellCoord::new(1, 1), 1).collect();
        found.sort_unstable();
        assert_eq!(found, vec![3, 4]);

        let mut found: Vec<u32> = grid.neighbors(CellCoord::new(0, 0), 2).collect();
        found.sort_unstable();
        assert_eq!(found, vec![3, 4]);
    }

    #[test]
    fn test_out_of_table_writes_ignored() {
        let mut grid = GridIndex::for_radius(0.2);
        let size = grid.size() as u32;
        grid.set(CellCoord::new(size, 0), 1);
        assert_eq!(grid.occupied(), 0);
        assert_eq!(grid.get(CellCoord::new(size, 0)), None);
    }
}
