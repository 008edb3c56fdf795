/// Uniform grid over the world bounds for proximity queries.
///
/// Entities are bucketed by cell using the offset-array layout of compressed
/// sparse rows: `cell_offsets[i]..cell_offsets[i + 1]` is the slice of
/// `entity_indices` that falls into cell `i`. Indices refer to the slice that
/// was passed to [`SpatialHash::build`].
///
/// Queries return every index in the cells overlapping the query square, so
/// callers still filter by exact distance.
///
/// # Examples
/// ```
/// use ecosim_core::spatial_hash::SpatialHash;
///
/// let mut spatial = SpatialHash::new(10.0, 100.0, 100.0);
/// spatial.build(&[(15.0, 15.0), (25.0, 25.0), (85.0, 85.0)]);
///
/// let mut nearby = Vec::new();
/// spatial.query_into(15.0, 15.0, 20.0, &mut nearby);
/// assert!(nearby.contains(&0));
/// assert!(!nearby.contains(&2));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SpatialHash {
    pub cell_size: f32,
    pub width: f32,
    pub height: f32,
    pub cols: usize,
    pub rows: usize,
    pub cell_offsets: Vec<usize>,
    pub entity_indices: Vec<usize>,
}

impl SpatialHash {
    pub fn new(cell_size: f32, width: f32, height: f32) -> Self {
        let cols = ((width / cell_size).ceil() as usize).max(1);
        let rows = ((height / cell_size).ceil() as usize).max(1);
        Self {
            cell_size,
            width,
            height,
            cols,
            rows,
            cell_offsets: vec![0; cols * rows + 1],
            entity_indices: Vec::new(),
        }
    }

    /// Flat cell index for a world coordinate.
    ///
    /// Non-finite and out-of-bounds coordinates have no cell. The far edges
    /// (`x == width`, `y == height`) belong to the last column/row.
    #[inline]
    pub fn get_cell_idx(&self, x: f32, y: f32) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        if x < 0.0 || y < 0.0 || x > self.width || y > self.height {
            return None;
        }
        let cx = ((x / self.cell_size) as usize).min(self.cols - 1);
        let cy = ((y / self.cell_size) as usize).min(self.rows - 1);
        Some(cy * self.cols + cx)
    }

    pub fn build(&mut self, positions: &[(f32, f32)]) {
        let cell_count = self.cols * self.rows;

        let mut counts = vec![0usize; cell_count];
        for &(x, y) in positions {
            if let Some(idx) = self.get_cell_idx(x, y) {
                counts[idx] += 1;
            }
        }

        self.cell_offsets.resize(cell_count + 1, 0);
        let mut total = 0;
        for (i, &count) in counts.iter().enumerate() {
            self.cell_offsets[i] = total;
            total += count;
        }
        self.cell_offsets[cell_count] = total;

        self.entity_indices.clear();
        self.entity_indices.resize(total, 0);

        let mut cursor = self.cell_offsets[..cell_count].to_vec();
        for (entity_idx, &(x, y)) in positions.iter().enumerate() {
            if let Some(cell_idx) = self.get_cell_idx(x, y) {
                self.entity_indices[cursor[cell_idx]] = entity_idx;
                cursor[cell_idx] += 1;
            }
        }
    }

    /// Inclusive range of cell coordinates covered by a query square, or
    /// `None` if the square misses the grid entirely.
    fn cell_range(&self, x: f32, y: f32, radius: f32) -> Option<(usize, usize, usize, usize)> {
        if !x.is_finite() || !y.is_finite() || !radius.is_finite() {
            return None;
        }
        let min_cx = ((x - radius) / self.cell_size).floor();
        let max_cx = ((x + radius) / self.cell_size).floor();
        let min_cy = ((y - radius) / self.cell_size).floor();
        let max_cy = ((y + radius) / self.cell_size).floor();

        let last_col = (self.cols - 1) as f32;
        let last_row = (self.rows - 1) as f32;
        if max_cx < 0.0 || max_cy < 0.0 || min_cx > last_col || min_cy > last_row {
            return None;
        }
        Some((
            min_cx.max(0.0) as usize,
            max_cx.min(last_col) as usize,
            min_cy.max(0.0) as usize,
            max_cy.min(last_row) as usize,
        ))
    }

    pub fn query_callback<F>(&self, x: f32, y: f32, radius: f32, mut callback: F)
    where
        F: FnMut(usize),
    {
        let Some((min_cx, max_cx, min_cy, max_cy)) = self.cell_range(x, y, radius) else {
            return;
        };
        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                let cell_idx = cy * self.cols + cx;
                let start = self.cell_offsets[cell_idx];
                let end = self.cell_offsets[cell_idx + 1];
                for &entity_idx in &self.entity_indices[start..end] {
                    callback(entity_idx);
                }
            }
        }
    }

    pub fn count_nearby(&self, x: f32, y: f32, radius: f32) -> usize {
        let Some((min_cx, max_cx, min_cy, max_cy)) = self.cell_range(x, y, radius) else {
            return 0;
        };
        let mut count = 0;
        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                let cell_idx = cy * self.cols + cx;
                count += self.cell_offsets[cell_idx + 1] - self.cell_offsets[cell_idx];
            }
        }
        count
    }

    #[inline]
    pub fn query_into(&self, x: f32, y: f32, radius: f32, result: &mut Vec<usize>) {
        result.clear();
        self.query_callback(x, y, radius, |idx| result.push(idx));
    }
}
