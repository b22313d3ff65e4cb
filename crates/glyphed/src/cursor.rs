//! Cursors and the multi-cursor set.
//!
//! Every cursor is an anchor ([`Cursor::start`]) plus a moving point
//! ([`Cursor::end`]); the selection is the half-open range between the two in
//! buffer order, and a cursor whose ends coincide is a plain caret. The
//! [`CursorSet`] keeps the whole collection consistent: after any public
//! mutation cursors are sorted top-to-bottom by selection start and
//! overlapping or coincident cursors have been merged.

use crate::coords::Coordinate;

/// One caret or selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Interactive start: the anchor that stays put while the selection grows.
    pub start: Coordinate,
    /// Interactive end: the moving point, where the caret is drawn.
    pub end: Coordinate,
}

impl Cursor {
    /// A caret (empty selection) at `position`.
    pub fn at(position: Coordinate) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// The selection's first position in buffer order.
    pub fn selection_start(&self) -> Coordinate {
        self.start.min(self.end)
    }

    /// The selection's last position in buffer order (exclusive).
    pub fn selection_end(&self) -> Coordinate {
        self.start.max(self.end)
    }

    /// Returns `true` when the cursor selects a non-empty range.
    pub fn has_selection(&self) -> bool {
        self.start != self.end
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::at(Coordinate::default())
    }
}

/// Ordered collection of cursors; never empty.
///
/// The set tracks which cursor was added last so commands like "add cursor at
/// next occurrence" can keep extending from it even after sorting reshuffles
/// the indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorSet {
    cursors: Vec<Cursor>,
    last_added: usize,
}

impl CursorSet {
    /// A set with a single caret at the buffer origin.
    pub fn new() -> Self {
        Self {
            cursors: vec![Cursor::default()],
            last_added: 0,
        }
    }

    /// Number of cursors.
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    /// Always `false`; a set holds at least one cursor.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All cursors, in their current order.
    pub fn iter(&self) -> impl Iterator<Item = &Cursor> {
        self.cursors.iter()
    }

    /// Cursor at `index`.
    pub fn get(&self, index: usize) -> &Cursor {
        &self.cursors[index]
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut Cursor {
        &mut self.cursors[index]
    }

    /// The current cursor: the one high-level commands treat as primary.
    pub fn current(&self) -> &Cursor {
        self.cursors.last().expect("cursor set is never empty")
    }

    /// Index of the current cursor.
    pub fn current_index(&self) -> usize {
        self.cursors.len() - 1
    }

    /// Index of the cursor added most recently, falling back to 0 when the
    /// set shrank past it.
    pub fn last_added_index(&self) -> usize {
        if self.last_added >= self.cursors.len() {
            0
        } else {
            self.last_added
        }
    }

    /// Append a new caret; it becomes the current and last-added cursor.
    pub fn add(&mut self, cursor: Cursor) {
        self.cursors.push(cursor);
        self.last_added = self.cursors.len() - 1;
    }

    /// Drop every cursor but the first.
    pub fn clear_extras(&mut self) {
        self.cursors.truncate(1);
        self.last_added = 0;
    }

    /// Collapse every selection to its end, keeping all carets.
    pub fn clear_selections(&mut self) {
        for cursor in &mut self.cursors {
            let end = cursor.selection_end();
            cursor.start = end;
            cursor.end = end;
        }
    }

    /// Returns `true` when at least one cursor selects text.
    pub fn any_has_selection(&self) -> bool {
        self.cursors.iter().any(Cursor::has_selection)
    }

    /// Returns `true` when every cursor selects text.
    pub fn all_have_selection(&self) -> bool {
        self.cursors.iter().all(Cursor::has_selection)
    }

    /// Sort cursors top-to-bottom by selection start, tracking where the
    /// last-added cursor lands.
    pub fn sort_top_to_bottom(&mut self) {
        let last_added_end = self.cursors[self.last_added_index()].end;
        self.cursors
            .sort_by(|a, b| a.selection_start().cmp(&b.selection_start()));
        for (i, cursor) in self.cursors.iter().enumerate().rev() {
            if cursor.end == last_added_end {
                self.last_added = i;
            }
        }
    }

    /// Merge cursors whose selections overlap or touch (the earlier cursor
    /// absorbs the later range) or, when no cursor has a selection, whose
    /// carets coincide. Requires the set to be sorted top-to-bottom first.
    pub fn merge_overlapping(&mut self) {
        let mut removed = vec![false; self.cursors.len()];
        if self.any_has_selection() {
            for c in (1..self.cursors.len()).rev() {
                let prev = self.cursors[c - 1];
                let cur = self.cursors[c];
                if prev.selection_end() >= cur.selection_end() {
                    removed[c] = true;
                } else if prev.selection_end() >= cur.selection_start() {
                    let merged_start = prev.selection_start();
                    let merged_end = cur.selection_end();
                    self.cursors[c - 1].start = merged_start;
                    self.cursors[c - 1].end = merged_end;
                    removed[c] = true;
                }
            }
        } else {
            for c in (1..self.cursors.len()).rev() {
                if self.cursors[c - 1].end == self.cursors[c].end {
                    removed[c] = true;
                }
            }
        }

        let mut index = 0;
        self.cursors.retain(|_| {
            let keep = !removed[index];
            index += 1;
            keep
        });
        // A stale `last_added` resolves to 0 via `last_added_index`.
    }

    /// Set the position of cursor `index`, optionally collapsing its
    /// selection onto the new position.
    pub fn set_position(&mut self, index: usize, position: Coordinate, clear_selection: bool) {
        let cursor = &mut self.cursors[index];
        if clear_selection {
            cursor.start = position;
        }
        cursor.end = position;
    }

    /// Overall bounds of all selections, if any cursor selects text.
    pub fn selection_bounds(&self) -> Option<(Coordinate, Coordinate)> {
        let mut bounds: Option<(Coordinate, Coordinate)> = None;
        for cursor in &self.cursors {
            if !cursor.has_selection() {
                continue;
            }
            let (start, end) = (cursor.selection_start(), cursor.selection_end());
            bounds = Some(match bounds {
                None => (start, end),
                Some((lo, hi)) => (lo.min(start), hi.max(end)),
            });
        }
        bounds
    }
}

impl Default for CursorSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(sl: usize, sc: usize, el: usize, ec: usize) -> Cursor {
        Cursor {
            start: Coordinate::new(sl, sc),
            end: Coordinate::new(el, ec),
        }
    }

    #[test]
    fn test_sort_tracks_last_added() {
        let mut set = CursorSet::new();
        set.get_mut(0).start = Coordinate::new(5, 0);
        set.get_mut(0).end = Coordinate::new(5, 0);
        set.add(Cursor::at(Coordinate::new(1, 0)));
        assert_eq!(set.last_added_index(), 1);

        set.sort_top_to_bottom();
        assert_eq!(set.get(0).end, Coordinate::new(1, 0));
        assert_eq!(set.last_added_index(), 0);
    }

    #[test]
    fn test_merge_coincident_carets() {
        let mut set = CursorSet::new();
        set.add(Cursor::at(Coordinate::new(0, 0)));
        set.sort_top_to_bottom();
        set.merge_overlapping();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_merge_overlapping_selections_absorbs_later() {
        let mut set = CursorSet::new();
        *set.get_mut(0) = sel(0, 0, 0, 5);
        set.add(sel(0, 3, 0, 8));
        set.sort_top_to_bottom();
        set.merge_overlapping();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).selection_start(), Coordinate::new(0, 0));
        assert_eq!(set.get(0).selection_end(), Coordinate::new(0, 8));
    }

    #[test]
    fn test_merge_contained_selection_is_dropped() {
        let mut set = CursorSet::new();
        *set.get_mut(0) = sel(0, 0, 0, 9);
        set.add(sel(0, 2, 0, 4));
        set.sort_top_to_bottom();
        set.merge_overlapping();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).selection_end(), Coordinate::new(0, 9));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut set = CursorSet::new();
        *set.get_mut(0) = sel(0, 0, 0, 5);
        set.add(sel(0, 4, 1, 2));
        set.add(sel(2, 0, 2, 0));
        set.sort_top_to_bottom();
        set.merge_overlapping();
        let once = set.clone();
        set.sort_top_to_bottom();
        set.merge_overlapping();
        assert_eq!(set, once);
    }

    #[test]
    fn test_touching_selections_merge() {
        // The earlier selection's end coincides with the later's start.
        let mut set = CursorSet::new();
        *set.get_mut(0) = sel(0, 0, 0, 3);
        set.add(sel(0, 3, 0, 6));
        set.sort_top_to_bottom();
        set.merge_overlapping();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).selection_start(), Coordinate::new(0, 0));
        assert_eq!(set.get(0).selection_end(), Coordinate::new(0, 6));
    }
}
