//! The spatial grid: a fixed 2D array of cells, each holding the product
//! entries relevant to that cell sorted by popularity descending.

use shopgrid_core::GridConfig;

/// One copy of a product placed in a grid cell. A single source product is
/// copied into every cell of the clipped 3x3 neighborhood around its shop's
/// cell, so it can legitimately appear in up to 9 cells.
#[derive(Debug, Clone)]
pub struct ProductEntry {
    pub product_id: String,
    pub shop_id: String,
    pub title: String,
    pub popularity: f64,
    pub quantity: u32,
}

/// Row-major `lat_count x lng_count` array of cells. Built once at load time;
/// cell order never changes afterwards.
#[derive(Debug)]
pub struct Grid {
    config: GridConfig,
    cells: Vec<Vec<ProductEntry>>,
}

impl Grid {
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        let cells = vec![Vec::new(); config.lat_count * config.lng_count];
        Self { config, cells }
    }

    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// The pre-sorted entry list for cell `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid; callers obtain coordinates
    /// from [`GridConfig::cell_for`], which only yields in-bounds cells.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> &[ProductEntry] {
        assert!(x < self.config.lat_count && y < self.config.lng_count);
        &self.cells[x * self.config.lng_count + y]
    }

    /// Push a copy of `entry` into every cell of the 3x3 neighborhood around
    /// `(x, y)`, clipped at the grid edges.
    pub(crate) fn insert_around(&mut self, x: usize, y: usize, entry: &ProductEntry) {
        let x_end = (x + 1).min(self.config.lat_count - 1);
        let y_end = (y + 1).min(self.config.lng_count - 1);
        for i in x.saturating_sub(1)..=x_end {
            for j in y.saturating_sub(1)..=y_end {
                self.cells[i * self.config.lng_count + j].push(entry.clone());
            }
        }
    }

    /// Sort every cell by popularity descending. The sort is stable, so equal
    /// popularity keeps insertion (load) order.
    pub(crate) fn sort_cells(&mut self) {
        for cell in &mut self.cells {
            cell.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
        }
    }

    /// Number of cells holding at least one entry.
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Total entry copies across all cells (counts duplicates).
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, popularity: f64) -> ProductEntry {
        ProductEntry {
            product_id: id.to_string(),
            shop_id: "s1".to_string(),
            title: format!("product {id}"),
            popularity,
            quantity: 1,
        }
    }

    fn small_grid() -> Grid {
        Grid::new(GridConfig {
            lat_start: 0.0,
            lat_inc: 1.0,
            lat_count: 4,
            lng_start: 0.0,
            lng_inc: 1.0,
            lng_count: 4,
        })
    }

    #[test]
    fn interior_insert_lands_in_nine_cells() {
        let mut grid = small_grid();
        grid.insert_around(1, 1, &entry("p1", 0.5));
        assert_eq!(grid.entry_count(), 9);
        assert_eq!(grid.occupied_cells(), 9);
        for i in 0..=2 {
            for j in 0..=2 {
                assert_eq!(grid.cell(i, j).len(), 1, "cell ({i}, {j})");
            }
        }
        assert!(grid.cell(3, 3).is_empty());
    }

    #[test]
    fn corner_insert_is_clipped_to_four_cells() {
        let mut grid = small_grid();
        grid.insert_around(0, 0, &entry("p1", 0.5));
        assert_eq!(grid.entry_count(), 4);
        assert_eq!(grid.cell(0, 0).len(), 1);
        assert_eq!(grid.cell(1, 1).len(), 1);
        assert!(grid.cell(2, 0).is_empty());
    }

    #[test]
    fn far_corner_insert_is_clipped_to_four_cells() {
        let mut grid = small_grid();
        grid.insert_around(3, 3, &entry("p1", 0.5));
        assert_eq!(grid.entry_count(), 4);
        assert_eq!(grid.cell(3, 3).len(), 1);
        assert_eq!(grid.cell(2, 2).len(), 1);
    }

    #[test]
    fn edge_insert_is_clipped_to_six_cells() {
        let mut grid = small_grid();
        grid.insert_around(0, 1, &entry("p1", 0.5));
        assert_eq!(grid.entry_count(), 6);
    }

    #[test]
    fn cells_sort_by_popularity_descending() {
        let mut grid = small_grid();
        grid.insert_around(1, 1, &entry("low", 0.1));
        grid.insert_around(1, 1, &entry("high", 0.9));
        grid.insert_around(1, 1, &entry("mid", 0.5));
        grid.sort_cells();
        let titles: Vec<&str> = grid
            .cell(1, 1)
            .iter()
            .map(|e| e.product_id.as_str())
            .collect();
        assert_eq!(titles, vec!["high", "mid", "low"]);
    }

    #[test]
    fn equal_popularity_keeps_insertion_order() {
        let mut grid = small_grid();
        grid.insert_around(1, 1, &entry("first", 0.5));
        grid.insert_around(1, 1, &entry("second", 0.5));
        grid.insert_around(1, 1, &entry("third", 0.5));
        grid.sort_cells();
        let ids: Vec<&str> = grid
            .cell(1, 1)
            .iter()
            .map(|e| e.product_id.as_str())
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn single_cell_grid_takes_one_copy() {
        let mut grid = Grid::new(GridConfig {
            lat_start: 0.0,
            lat_inc: 1.0,
            lat_count: 1,
            lng_start: 0.0,
            lng_inc: 1.0,
            lng_count: 1,
        });
        grid.insert_around(0, 0, &entry("p1", 0.5));
        assert_eq!(grid.entry_count(), 1);
    }
}
