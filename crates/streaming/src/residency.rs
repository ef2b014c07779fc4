use foundation::TileCoordinate;

/// Tiles entering and leaving view between two camera frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileSetDiff {
    pub to_add: Vec<TileCoordinate>,
    pub to_remove: Vec<TileCoordinate>,
}

impl TileSetDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes which of `new_tiles` are not in `active`, and which of `active`
/// are no longer in `new_tiles`. Tiles match on `(level, x, y)`.
///
/// Duplicates within `new_tiles` are reported once.
pub fn diff_tiles(active: &[TileCoordinate], new_tiles: &[TileCoordinate]) -> TileSetDiff {
    let mut to_add: Vec<TileCoordinate> = Vec::new();
    let mut to_remove: Vec<TileCoordinate> = active.to_vec();
    let mut kept: Vec<TileCoordinate> = Vec::new();

    for tile in new_tiles {
        if let Some(i) = to_remove.iter().position(|a| a.matches(tile)) {
            kept.push(to_remove.swap_remove(i));
        } else if !kept.iter().chain(to_add.iter()).any(|a| a.matches(tile)) {
            to_add.push(*tile);
        }
    }

    TileSetDiff { to_add, to_remove }
}

/// Ordered list of the tiles currently considered loaded.
#[derive(Debug, Clone, Default)]
pub struct ActiveTileSet {
    tiles: Vec<TileCoordinate>,
}

impl ActiveTileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tiles(&self) -> &[TileCoordinate] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, tile: &TileCoordinate) -> bool {
        self.tiles.iter().any(|t| t.matches(tile))
    }

    /// Diffs `new_tiles` against the active set and applies the result.
    ///
    /// Added tiles become active immediately, before any data for them has
    /// arrived, so a follow-up frame never requests them again.
    pub fn update(&mut self, new_tiles: &[TileCoordinate]) -> TileSetDiff {
        let diff = diff_tiles(&self.tiles, new_tiles);
        self.tiles
            .retain(|t| !diff.to_remove.iter().any(|r| r.matches(t)));
        self.tiles.extend(diff.to_add.iter().copied());
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::{ActiveTileSet, diff_tiles};
    use foundation::{GeographicTilingScheme, TileCoordinate};
    use std::collections::HashSet;

    fn tiles(coords: &[(u32, u32, u32)]) -> Vec<TileCoordinate> {
        let scheme = GeographicTilingScheme::new();
        coords
            .iter()
            .map(|&(level, x, y)| scheme.tile(level, x, y))
            .collect()
    }

    fn set(tiles: &[TileCoordinate]) -> HashSet<TileCoordinate> {
        tiles.iter().copied().collect()
    }

    #[test]
    fn adds_into_empty_set() {
        let t1 = tiles(&[(3, 4, 2)]);
        let diff = diff_tiles(&[], &t1);
        assert_eq!(diff.to_add, t1);
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn added_and_kept_cover_new_and_removed_is_difference() {
        let a = tiles(&[(2, 0, 0), (2, 1, 0), (2, 2, 1), (3, 5, 5)]);
        let b = tiles(&[(2, 1, 0), (2, 2, 1), (2, 3, 1), (4, 0, 0)]);
        let diff = diff_tiles(&a, &b);

        let kept: HashSet<_> = set(&a).intersection(&set(&b)).copied().collect();
        let covered: HashSet<_> = set(&diff.to_add).union(&kept).copied().collect();
        assert_eq!(covered, set(&b));

        let removed: HashSet<_> = set(&a).difference(&set(&b)).copied().collect();
        assert_eq!(set(&diff.to_remove), removed);
    }

    #[test]
    fn matching_ignores_bbox() {
        let a = tiles(&[(1, 1, 0)]);
        let mut b = a.clone();
        b[0].bbox.west += 1.0;
        assert!(diff_tiles(&a, &b).is_empty());
    }

    #[test]
    fn duplicates_in_one_frame_are_added_once() {
        let b = tiles(&[(5, 1, 1), (5, 1, 1), (5, 2, 1)]);
        let diff = diff_tiles(&[], &b);
        assert_eq!(diff.to_add, tiles(&[(5, 1, 1), (5, 2, 1)]));

        let a = tiles(&[(5, 1, 1)]);
        let diff = diff_tiles(&a, &b);
        assert_eq!(diff.to_add, tiles(&[(5, 2, 1)]));
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn update_is_idempotent() {
        let mut active = ActiveTileSet::new();
        let frame = tiles(&[(4, 3, 2), (4, 4, 2)]);

        let first = active.update(&frame);
        assert_eq!(first.to_add.len(), 2);
        assert_eq!(active.len(), 2);

        let second = active.update(&frame);
        assert!(second.is_empty());
        assert_eq!(active.tiles(), frame.as_slice());
    }

    #[test]
    fn update_drops_tiles_that_left_view() {
        let mut active = ActiveTileSet::new();
        active.update(&tiles(&[(4, 3, 2), (4, 4, 2)]));

        let diff = active.update(&tiles(&[(4, 4, 2), (4, 5, 2)]));
        assert_eq!(diff.to_add, tiles(&[(4, 5, 2)]));
        assert_eq!(diff.to_remove, tiles(&[(4, 3, 2)]));
        assert_eq!(active.tiles(), tiles(&[(4, 4, 2), (4, 5, 2)]).as_slice());
        assert!(!active.contains(&tiles(&[(4, 3, 2)])[0]));
    }
}
