use thiserror::Error;

use crate::task::Task;

/// A user-typed number outside the currently visible range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid task index {given} (visible tasks: {visible})")]
pub struct IndexError {
    /// The number the user typed.
    pub given: usize,
    /// How many tasks were visible when the number was resolved.
    pub visible: usize,
}

/// Derived, ephemeral mapping from 1-based display numbers to storage
/// positions. Rebuilt from the current collection on every operation;
/// never cached across operations.
///
/// Ordering: active & not-done positions first in storage order, then,
/// only when `show_done` was requested, active & done positions in storage
/// order. Inactive records never appear, so the numbering the user sees
/// skips them entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleIndex {
    positions: Vec<usize>,
}

impl VisibleIndex {
    /// Build the index for the given collection and view mode.
    #[must_use]
    pub fn build(tasks: &[Task], show_done: bool) -> Self {
        let mut positions: Vec<usize> = tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.active && !task.done)
            .map(|(position, _)| position)
            .collect();
        if show_done {
            positions.extend(
                tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, task)| task.active && task.done)
                    .map(|(position, _)| position),
            );
        }
        Self { positions }
    }

    /// Number of visible tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when nothing is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Storage positions in display order; entry `k` carries display number
    /// `k + 1`.
    #[must_use]
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Translate a 1-based user number into a storage position.
    ///
    /// Every mutation routes through here rather than re-deriving
    /// visibility locally, so view numbering and mutation addressing can
    /// never drift apart.
    ///
    /// # Errors
    /// Returns [`IndexError`] unless `1 <= number <= len()`.
    pub fn resolve(&self, number: usize) -> Result<usize, IndexError> {
        if number == 0 || number > self.positions.len() {
            return Err(IndexError {
                given: number,
                visible: self.positions.len(),
            });
        }
        Ok(self.positions[number - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(active: bool, done: bool, text: &str) -> Task {
        Task {
            active,
            done,
            text: text.to_owned(),
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(true, false, "buy milk"),
            task(false, true, "old task"),
            task(true, true, "write report"),
        ]
    }

    #[test]
    fn default_view_hides_done_and_inactive() {
        let index = VisibleIndex::build(&sample(), false);
        assert_eq!(index.positions(), &[0]);
    }

    #[test]
    fn include_done_appends_done_tasks_after_open_ones() {
        let index = VisibleIndex::build(&sample(), true);
        assert_eq!(index.positions(), &[0, 2]);
    }

    #[test]
    fn default_view_is_prefix_of_include_done_view() {
        let tasks = vec![
            task(true, true, "a"),
            task(true, false, "b"),
            task(false, false, "c"),
            task(true, true, "d"),
            task(true, false, "e"),
        ];
        let narrow = VisibleIndex::build(&tasks, false);
        let wide = VisibleIndex::build(&tasks, true);
        assert_eq!(&wide.positions()[..narrow.len()], narrow.positions());
    }

    #[test]
    fn resolve_accepts_only_the_visible_range() {
        let index = VisibleIndex::build(&sample(), true);
        assert_eq!(index.resolve(1), Ok(0));
        assert_eq!(index.resolve(2), Ok(2));
        assert_eq!(index.resolve(0), Err(IndexError { given: 0, visible: 2 }));
        assert_eq!(index.resolve(3), Err(IndexError { given: 3, visible: 2 }));
    }

    #[test]
    fn toggling_done_does_not_move_other_positions_in_a_precomputed_index() {
        let mut tasks = sample();
        let index = VisibleIndex::build(&tasks, true);
        let before: Vec<usize> = index.positions().to_vec();
        let position = index.resolve(1).map_or(usize::MAX, |p| p);
        tasks[position].done = true;
        // The index computed before the mutation still maps every other
        // number to the same storage position.
        assert_eq!(index.positions(), before.as_slice());
    }

    #[test]
    fn empty_collection_resolves_nothing() {
        let index = VisibleIndex::build(&[], true);
        assert!(index.is_empty());
        assert_eq!(index.resolve(1), Err(IndexError { given: 1, visible: 0 }));
    }
}
