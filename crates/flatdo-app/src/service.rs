//! The operations engine: every user-facing command is one
//! load → resolve → mutate → save pass over the stored collection.

use std::fmt;

use flatdo_core::{IndexError, ListFull, Task, TaskList, TextError, VisibleIndex, validate_text};
use flatdo_store_file::{FileStore, StoreError};
use serde::Serialize;
use thiserror::Error;

/// Storage abstraction so the operations engine can be unit-tested.
pub trait TaskStore {
    /// Read the persisted collection; absent storage yields an empty list.
    ///
    /// # Errors
    /// Returns [`StoreError`] when storage exists but cannot be read.
    fn load(&self) -> Result<TaskList, StoreError>;

    /// Replace the persisted collection.
    ///
    /// # Errors
    /// Returns [`StoreError`] when storage cannot be written; previously
    /// persisted content must remain intact.
    fn save(&self, list: &TaskList) -> Result<(), StoreError>;

    /// Raw stored lines for display, `None` when storage is absent.
    ///
    /// # Errors
    /// Returns [`StoreError`] when storage exists but cannot be read.
    fn raw_lines(&self) -> Result<Option<Vec<String>>, StoreError>;
}

impl TaskStore for FileStore {
    fn load(&self) -> Result<TaskList, StoreError> {
        Self::load(self)
    }

    fn save(&self, list: &TaskList) -> Result<(), StoreError> {
        Self::save(self, list)
    }

    fn raw_lines(&self) -> Result<Option<Vec<String>>, StoreError> {
        Self::raw_lines(self)
    }
}

/// Failures surfaced by [`TaskService`] operations.
///
/// Index, text, and capacity failures are recoverable and rendered as
/// status text; store failures mean the operation aborted with prior
/// persisted state intact.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The user number does not resolve in the current visible range.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// The submitted text violates the wire-format constraints.
    #[error(transparent)]
    Text(#[from] TextError),

    /// The collection is at capacity.
    #[error(transparent)]
    Full(#[from] ListFull),

    /// Storage could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// True for failures the user fixes by re-issuing the command, as
    /// opposed to storage being unavailable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Index(_) | Self::Text(_) | Self::Full(_))
    }
}

/// Result of one successful operation, rendered as status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpOutcome {
    /// A task was appended.
    Added,
    /// Empty input; nothing was touched.
    IgnoredEmpty,
    /// Completion flag flipped to the contained value.
    Toggled {
        /// New value of the completion flag.
        done: bool,
    },
    /// Task text replaced.
    Edited,
    /// Empty replacement text; nothing was touched.
    EditCancelled,
    /// Task hidden from every view but retained in the file.
    SoftDeleted,
    /// Task removed from the file entirely.
    HardDeleted,
    /// Collection replaced with empty.
    Cleared,
}

impl fmt::Display for OpOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Added => "Task added",
            Self::IgnoredEmpty => "Empty task ignored",
            Self::Toggled { done: true } => "Task marked completed",
            Self::Toggled { done: false } => "Task marked open",
            Self::Edited => "Task updated",
            Self::EditCancelled => "Edit cancelled",
            Self::SoftDeleted => "Task deleted",
            Self::HardDeleted => "Task permanently deleted",
            Self::Cleared => "All task data cleared",
        };
        f.write_str(text)
    }
}

/// One row of the user-facing view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    /// 1-based display number the user types to address this task.
    pub number: usize,
    /// Completion flag.
    pub done: bool,
    /// Task text.
    pub text: String,
}

/// Service façade that encapsulates all task-related side effects.
pub struct TaskService<S> {
    store: S,
}

impl<S> TaskService<S> {
    /// Wrap a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: TaskStore> TaskService<S> {
    /// Append a new open task. Input is trimmed; empty input is ignored
    /// without touching storage.
    ///
    /// # Errors
    /// [`ServiceError::Text`] on invalid text, [`ServiceError::Full`] at
    /// capacity, [`ServiceError::Store`] on storage failure.
    pub fn add(&self, text: &str) -> Result<OpOutcome, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(OpOutcome::IgnoredEmpty);
        }
        let task = Task::new(text)?;
        let mut list = self.store.load()?;
        list.push(task)?;
        self.store.save(&list)?;
        Ok(OpOutcome::Added)
    }

    /// Flip the completion flag of the numbered task.
    ///
    /// # Errors
    /// [`ServiceError::Index`] on a bad number, [`ServiceError::Store`] on
    /// storage failure.
    pub fn toggle(&self, number: usize) -> Result<OpOutcome, ServiceError> {
        let mut list = self.store.load()?;
        let done = {
            let task = Self::resolve_mut(&mut list, number)?;
            task.done = !task.done;
            task.done
        };
        self.store.save(&list)?;
        Ok(OpOutcome::Toggled { done })
    }

    /// Replace the text of the numbered task. Empty replacement text
    /// cancels the edit without touching storage.
    ///
    /// # Errors
    /// [`ServiceError::Index`] on a bad number, [`ServiceError::Text`] on
    /// invalid text, [`ServiceError::Store`] on storage failure.
    pub fn edit(&self, number: usize, new_text: &str) -> Result<OpOutcome, ServiceError> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Ok(OpOutcome::EditCancelled);
        }
        validate_text(new_text)?;
        let mut list = self.store.load()?;
        let task = Self::resolve_mut(&mut list, number)?;
        task.text = new_text.to_owned();
        self.store.save(&list)?;
        Ok(OpOutcome::Edited)
    }

    /// Hide the numbered task from every view. The record keeps its slot in
    /// the file; nothing in this service re-activates it.
    ///
    /// # Errors
    /// [`ServiceError::Index`] on a bad number, [`ServiceError::Store`] on
    /// storage failure.
    pub fn soft_delete(&self, number: usize) -> Result<OpOutcome, ServiceError> {
        let mut list = self.store.load()?;
        let task = Self::resolve_mut(&mut list, number)?;
        task.active = false;
        self.store.save(&list)?;
        Ok(OpOutcome::SoftDeleted)
    }

    /// Remove the numbered task from the file, shifting later records one
    /// position earlier.
    ///
    /// # Errors
    /// [`ServiceError::Index`] on a bad number, [`ServiceError::Store`] on
    /// storage failure.
    pub fn hard_delete(&self, number: usize) -> Result<OpOutcome, ServiceError> {
        let mut list = self.store.load()?;
        let index = VisibleIndex::build(list.tasks(), true);
        let position = index.resolve(number)?;
        if list.remove(position).is_none() {
            return Err(IndexError {
                given: number,
                visible: index.len(),
            }
            .into());
        }
        self.store.save(&list)?;
        Ok(OpOutcome::HardDeleted)
    }

    /// Replace the persisted collection with empty. Idempotent; callers are
    /// responsible for confirming first.
    ///
    /// # Errors
    /// [`ServiceError::Store`] on storage failure.
    pub fn clear_all(&self) -> Result<OpOutcome, ServiceError> {
        self.store.save(&TaskList::default())?;
        Ok(OpOutcome::Cleared)
    }

    /// The ordered view for the given mode: open tasks first in stored
    /// order, then, iff `show_done`, completed tasks in stored order.
    ///
    /// # Errors
    /// [`ServiceError::Store`] on storage failure.
    pub fn current_view(&self, show_done: bool) -> Result<Vec<TaskRow>, ServiceError> {
        let list = self.store.load()?;
        let index = VisibleIndex::build(list.tasks(), show_done);
        let rows = index
            .positions()
            .iter()
            .enumerate()
            .filter_map(|(k, &position)| {
                list.get(position).map(|task| TaskRow {
                    number: k + 1,
                    done: task.done,
                    text: task.text.clone(),
                })
            })
            .collect();
        Ok(rows)
    }

    /// The persisted file's raw lines, unparsed. `None` when the file is
    /// absent, which is a normal reported outcome.
    ///
    /// # Errors
    /// [`ServiceError::Store`] on storage failure.
    pub fn raw_view(&self) -> Result<Option<Vec<String>>, ServiceError> {
        Ok(self.store.raw_lines()?)
    }

    // Mutations always resolve against the include-done index so a
    // completed task stays addressable even while the default view hides
    // it. The index is rebuilt fresh per call; a view-mode index is never
    // reused for a mutation.
    fn resolve_mut(list: &mut TaskList, number: usize) -> Result<&mut Task, ServiceError> {
        let index = VisibleIndex::build(list.tasks(), true);
        let position = index.resolve(number)?;
        list.get_mut(position).ok_or_else(|| {
            IndexError {
                given: number,
                visible: index.len(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatdo_core::MAX_TASKS;
    use flatdo_store_file::encode_line;
    use std::cell::{Cell, RefCell};
    use std::io;
    use std::path::PathBuf;

    #[derive(Default)]
    struct MemStore {
        list: RefCell<TaskList>,
        exists: Cell<bool>,
        fail_writes: Cell<bool>,
    }

    impl MemStore {
        fn seeded(lines: &[(bool, bool, &str)]) -> Self {
            let mut list = TaskList::default();
            for &(active, done, text) in lines {
                list.push(Task {
                    active,
                    done,
                    text: text.to_owned(),
                })
                .ok();
            }
            let store = Self::default();
            *store.list.borrow_mut() = list;
            store.exists.set(true);
            store
        }

        fn texts(&self) -> Vec<String> {
            self.list
                .borrow()
                .tasks()
                .iter()
                .map(|task| task.text.clone())
                .collect()
        }
    }

    impl TaskStore for MemStore {
        fn load(&self) -> Result<TaskList, StoreError> {
            Ok(self.list.borrow().clone())
        }

        fn save(&self, list: &TaskList) -> Result<(), StoreError> {
            if self.fail_writes.get() {
                return Err(StoreError::Write {
                    path: PathBuf::from("mem"),
                    source: io::Error::from(io::ErrorKind::PermissionDenied),
                });
            }
            *self.list.borrow_mut() = list.clone();
            self.exists.set(true);
            Ok(())
        }

        fn raw_lines(&self) -> Result<Option<Vec<String>>, StoreError> {
            if !self.exists.get() {
                return Ok(None);
            }
            Ok(Some(
                self.list.borrow().tasks().iter().map(encode_line).collect(),
            ))
        }
    }

    fn three_record_service() -> TaskService<MemStore> {
        TaskService::new(MemStore::seeded(&[
            (true, false, "buy milk"),
            (false, true, "old task"),
            (true, true, "write report"),
        ]))
    }

    #[test]
    fn view_hides_done_by_default_and_appends_them_when_asked() -> Result<(), ServiceError> {
        let service = three_record_service();
        let narrow = service.current_view(false)?;
        assert_eq!(narrow.len(), 1);
        assert_eq!(narrow[0].number, 1);
        assert_eq!(narrow[0].text, "buy milk");

        let wide = service.current_view(true)?;
        let texts: Vec<&str> = wide.iter().map(|row| row.text.as_str()).collect();
        assert_eq!(texts, vec!["buy milk", "write report"]);
        assert_eq!(wide[1].number, 2);
        Ok(())
    }

    #[test]
    fn toggle_resolves_against_the_include_done_index() -> Result<(), ServiceError> {
        let service = three_record_service();
        service.toggle(1)?;
        // "buy milk" is now done, so the default view is empty.
        assert!(service.current_view(false)?.is_empty());
        // And it can be un-toggled through the same numbering.
        let outcome = service.toggle(1)?;
        assert_eq!(outcome, OpOutcome::Toggled { done: false });
        assert_eq!(service.current_view(false)?.len(), 1);
        Ok(())
    }

    #[test]
    fn add_trims_and_ignores_empty_input_without_io() -> Result<(), ServiceError> {
        let store = MemStore::default();
        let service = TaskService::new(store);
        assert_eq!(service.add("   ")?, OpOutcome::IgnoredEmpty);
        assert!(service.raw_view()?.is_none());

        assert_eq!(service.add("  walk dog  ")?, OpOutcome::Added);
        assert_eq!(service.store().texts(), vec!["walk dog"]);
        Ok(())
    }

    #[test]
    fn add_rejects_separator_text_and_a_full_list() {
        let service = TaskService::new(MemStore::default());
        let err = service.add("a|b");
        assert!(matches!(err, Err(ServiceError::Text(TextError::SeparatorForbidden))));

        let mut seed = Vec::new();
        for _ in 0..MAX_TASKS {
            seed.push((true, false, "filler"));
        }
        let full = TaskService::new(MemStore::seeded(&seed));
        let err = full.add("one more");
        assert!(matches!(err, Err(ServiceError::Full(ListFull { capacity: MAX_TASKS }))));
        assert_eq!(full.store().texts().len(), MAX_TASKS);
    }

    #[test]
    fn edit_replaces_text_and_empty_input_cancels() -> Result<(), ServiceError> {
        let service = three_record_service();
        assert_eq!(service.edit(2, "")?, OpOutcome::EditCancelled);
        assert_eq!(service.store().texts()[2], "write report");

        service.edit(2, "ship report")?;
        assert_eq!(service.store().texts()[2], "ship report");
        Ok(())
    }

    #[test]
    fn soft_delete_retains_the_record_but_hides_it_everywhere() -> Result<(), ServiceError> {
        let service = three_record_service();
        service.soft_delete(1)?;
        assert_eq!(service.store().texts().len(), 3);
        assert!(service.current_view(false)?.is_empty());
        let wide = service.current_view(true)?;
        assert_eq!(wide.len(), 1);
        assert_eq!(wide[0].text, "write report");
        Ok(())
    }

    #[test]
    fn hard_delete_removes_exactly_one_and_shifts_the_tail() -> Result<(), ServiceError> {
        let service = three_record_service();
        // Include-done numbering: 1 = "buy milk", 2 = "write report".
        service.hard_delete(2)?;
        let texts = service.store().texts();
        assert_eq!(texts, vec!["buy milk", "old task"]);
        Ok(())
    }

    #[test]
    fn out_of_range_numbers_fail_with_the_visible_count() {
        let service = three_record_service();
        let err = service.toggle(3);
        let Err(ServiceError::Index(index_err)) = err else {
            panic!("expected index error");
        };
        assert_eq!(index_err, IndexError { given: 3, visible: 2 });
        assert!(matches!(service.soft_delete(0), Err(ServiceError::Index(_))));
        assert!(matches!(service.hard_delete(9), Err(ServiceError::Index(_))));
    }

    #[test]
    fn clear_all_is_idempotent() -> Result<(), ServiceError> {
        let service = three_record_service();
        assert_eq!(service.clear_all()?, OpOutcome::Cleared);
        assert!(service.store().texts().is_empty());
        assert_eq!(service.clear_all()?, OpOutcome::Cleared);
        assert_eq!(service.raw_view()?, Some(Vec::new()));
        Ok(())
    }

    #[test]
    fn failed_save_leaves_stored_state_unchanged() {
        let service = three_record_service();
        service.store().fail_writes.set(true);
        let err = service.toggle(1);
        assert!(matches!(err, Err(ServiceError::Store(_))));
        assert!(err.is_err_and(|e| !e.is_recoverable()));
        service.store().fail_writes.set(false);
        let rows = service
            .current_view(false)
            .unwrap_or_else(|e| panic!("view must load: {e}"));
        assert_eq!(rows.len(), 1, "the toggle must not have been persisted");
    }
}
