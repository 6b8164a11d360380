//! Tile range covering a viewport.

use crate::coord::TileCoordinate;
use crate::projection::Projection;
use crate::viewport::Viewport;

/// Inclusive rectangular range of tiles at one zoom level.
///
/// No clamping is applied: at extreme pan positions either corner may lie
/// outside the `2^z × 2^z` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    top_left: TileCoordinate,
    bottom_right: TileCoordinate,
}

impl TileRange {
    /// Creates a range from its two inclusive corner tiles.
    ///
    /// Both corners must share a zoom level; the top-left zoom wins.
    pub fn new(top_left: TileCoordinate, bottom_right: TileCoordinate) -> Self {
        Self {
            top_left,
            bottom_right: TileCoordinate {
                z: top_left.z,
                ..bottom_right
            },
        }
    }

    /// Computes the range of tiles visible in `viewport`.
    ///
    /// Both canvas corners are projected to geographic locations and
    /// converted to tile indices.
    pub fn for_viewport(viewport: &Viewport, projection: &dyn Projection) -> Self {
        let zoom = viewport.zoom();

        let top_left_location = projection.project(viewport.top_left(), zoom);
        let bottom_right_location = projection.project(viewport.bottom_right(), zoom);

        Self::new(
            TileCoordinate::from_location(top_left_location, zoom),
            TileCoordinate::from_location(bottom_right_location, zoom),
        )
    }

    pub fn top_left(&self) -> TileCoordinate {
        self.top_left
    }

    pub fn bottom_right(&self) -> TileCoordinate {
        self.bottom_right
    }

    pub fn zoom(&self) -> u8 {
        self.top_left.z
    }

    /// Number of tile columns in the range.
    pub fn columns(&self) -> usize {
        (self.bottom_right.x as i64 - self.top_left.x as i64 + 1).max(0) as usize
    }

    /// Number of tile rows in the range.
    pub fn rows(&self) -> usize {
        (self.bottom_right.y as i64 - self.top_left.y as i64 + 1).max(0) as usize
    }

    pub fn len(&self) -> usize {
        self.columns() * self.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the range row by row, west to east within each row.
    pub fn iter(&self) -> TileRangeIter {
        TileRangeIter {
            range: *self,
            index: 0,
        }
    }
}

impl IntoIterator for &TileRange {
    type Item = TileCoordinate;
    type IntoIter = TileRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Row-major iterator over a [`TileRange`].
#[derive(Debug, Clone)]
pub struct TileRangeIter {
    range: TileRange,
    index: usize,
}

impl Iterator for TileRangeIter {
    type Item = TileCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.range.len() {
            return None;
        }
        let columns = self.range.columns();
        let i = (self.index % columns) as i32;
        let j = (self.index / columns) as i32;
        self.index += 1;

        Some(TileCoordinate {
            x: self.range.top_left.x + i,
            y: self.range.top_left.y + j,
            z: self.range.zoom(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.range.len() - self.index.min(self.range.len());
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileRangeIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::PixelPoint;
    use crate::projection::MercatorProjection;

    fn range(x0: i32, y0: i32, x1: i32, y1: i32) -> TileRange {
        TileRange::new(TileCoordinate::new(x0, y0, 5), TileCoordinate::new(x1, y1, 5))
    }

    #[test]
    fn test_dimensions() {
        let r = range(3, 7, 5, 8);
        assert_eq!(r.columns(), 3);
        assert_eq!(r.rows(), 2);
        assert_eq!(r.len(), 6);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let r = range(5, 5, 4, 5);
        assert_eq!(r.columns(), 0);
        assert!(r.is_empty());
        assert_eq!(r.iter().count(), 0);
    }

    #[test]
    fn test_iteration_is_row_major() {
        let tiles: Vec<_> = range(0, 0, 1, 1).iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(tiles, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_iteration_with_negative_indices() {
        let tiles: Vec<_> = range(-1, -1, 0, -1).iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(tiles, vec![(-1, -1), (0, -1)]);
    }

    #[test]
    fn test_exact_size() {
        let mut iter = range(0, 0, 2, 1).iter();
        assert_eq!(iter.len(), 6);
        iter.next();
        assert_eq!(iter.len(), 5);
    }

    #[test]
    fn test_for_viewport_at_world_origin() {
        let proj = MercatorProjection::new();
        let vp = Viewport::new(300, 200, 2, PixelPoint::new(0.0, 0.0)).unwrap();
        let r = TileRange::for_viewport(&vp, &proj);
        assert_eq!(r.top_left(), TileCoordinate::new(0, 0, 2));
        assert_eq!(r.bottom_right(), TileCoordinate::new(1, 0, 2));
    }

    #[test]
    fn test_for_viewport_on_tile_boundaries() {
        let proj = MercatorProjection::new();
        let vp = Viewport::new(256, 256, 14, PixelPoint::new(256.0, 256.0)).unwrap();
        let r = TileRange::for_viewport(&vp, &proj);
        assert_eq!(r.top_left(), TileCoordinate::new(1, 1, 14));
        assert_eq!(r.bottom_right(), TileCoordinate::new(2, 2, 14));

        // Every row-aligned top edge starts at its own row
        for row in (0..(1 << 14)).step_by(61) {
            let offset = PixelPoint::new(512.0, row as f64 * 256.0);
            let vp = Viewport::new(256, 100, 14, offset).unwrap();
            assert_eq!(TileRange::for_viewport(&vp, &proj).top_left().y, row, "row {}", row);
        }
    }

    #[test]
    fn test_for_viewport_is_not_clamped() {
        let proj = MercatorProjection::new();
        // Pan half a tile west of the antimeridian
        let vp = Viewport::new(256, 256, 2, PixelPoint::new(-128.0, 300.0)).unwrap();
        let r = TileRange::for_viewport(&vp, &proj);
        assert_eq!(r.top_left().x, -1);
        assert_eq!(r.bottom_right().x, 0);
    }
}
