/// Geometry of the spatial grid: a fixed lat/lng bounding box cut into
/// `lat_count * lng_count` rectangular cells.
///
/// Both load-time placement and query-time lookup go through
/// [`GridConfig::cell_for`], so a product is always found in the same cell a
/// query for its location resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub lat_start: f64,
    pub lat_inc: f64,
    pub lat_count: usize,
    pub lng_start: f64,
    pub lng_inc: f64,
    pub lng_count: usize,
}

impl GridConfig {
    /// Bounding box of the reference deployment, determined by analyzing the
    /// locations of its shops.
    #[must_use]
    pub fn reference_deployment() -> Self {
        Self {
            lat_start: 59.166,
            lat_inc: 0.01799,
            lat_count: 18,
            lng_start: 17.866,
            lng_inc: 0.0351,
            lng_count: 10,
        }
    }

    /// Map a coordinate pair to its cell, or `None` when the point falls
    /// outside the grid's bounding box.
    ///
    /// Pure and O(1): `x = floor((lat - lat_start) / lat_inc)`, likewise for
    /// longitude.
    #[must_use]
    pub fn cell_for(&self, lat: f64, lng: f64) -> Option<(usize, usize)> {
        let x = (lat - self.lat_start) / self.lat_inc;
        let y = (lng - self.lng_start) / self.lng_inc;
        #[allow(clippy::cast_precision_loss)]
        let (x_max, y_max) = (self.lat_count as f64, self.lng_count as f64);
        if x < 0.0 || x >= x_max || y < 0.0 || y >= y_max {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cell = (x.floor() as usize, y.floor() as usize);
        Some(cell)
    }
}
