use thiserror::Error;

/// Hard upper bound on stored records. The loader stops here and the list
/// refuses to grow past it.
pub const MAX_TASKS: usize = 100;

/// Longest accepted task text, in characters.
pub const MAX_TEXT_LEN: usize = 255;

/// Field separator of the wire format. The format has no escaping, so the
/// separator is forbidden inside task text.
pub const FIELD_SEPARATOR: char = '|';

/// Reasons a task text is rejected before it ever reaches storage.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextError {
    /// The text is empty after trimming.
    #[error("task text must not be empty")]
    Empty,
    /// The text exceeds [`MAX_TEXT_LEN`] characters.
    #[error("task text exceeds {MAX_TEXT_LEN} characters")]
    TooLong,
    /// The text contains the wire-format field separator.
    #[error("task text must not contain '{FIELD_SEPARATOR}'")]
    SeparatorForbidden,
    /// The text contains a line break.
    #[error("task text must not contain a line break")]
    LineBreakForbidden,
}

/// Check a candidate task text against the wire-format constraints.
///
/// # Errors
/// Returns a [`TextError`] naming the first violated constraint.
pub fn validate_text(text: &str) -> Result<(), TextError> {
    if text.is_empty() {
        return Err(TextError::Empty);
    }
    if text.chars().count() > MAX_TEXT_LEN {
        return Err(TextError::TooLong);
    }
    if text.contains(FIELD_SEPARATOR) {
        return Err(TextError::SeparatorForbidden);
    }
    if text.contains('\n') || text.contains('\r') {
        return Err(TextError::LineBreakForbidden);
    }
    Ok(())
}

/// One stored task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// `false` marks the record soft-deleted: it stays in the file at its
    /// original position but never appears in a view or in the numbering.
    pub active: bool,
    /// Completion flag. Does not affect visibility unless the view excludes
    /// completed tasks.
    pub done: bool,
    /// Single-line task text, constrained by [`validate_text`].
    pub text: String,
}

impl Task {
    /// Create a fresh task (`active`, not `done`) from validated text.
    ///
    /// # Errors
    /// Returns a [`TextError`] when the text violates the wire-format
    /// constraints.
    pub fn new(text: impl Into<String>) -> Result<Self, TextError> {
        let text = text.into();
        validate_text(&text)?;
        Ok(Self {
            active: true,
            done: false,
            text,
        })
    }
}

/// Returned by [`TaskList::push`] when the list is at capacity.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("task list is full ({capacity} records)")]
pub struct ListFull {
    /// Configured capacity of the rejecting list.
    pub capacity: usize,
}

/// Ordered sequence of task records with an enforced capacity.
///
/// Order is insertion order is file order, and it is the only identity a
/// record has. Positions are stable within one load/save cycle; only
/// [`TaskList::remove`] shifts later records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
    capacity: usize,
}

impl Default for TaskList {
    fn default() -> Self {
        Self::with_capacity(MAX_TASKS)
    }
}

impl TaskList {
    /// Create an empty list that refuses to grow past `capacity`.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            tasks: Vec::new(),
            capacity,
        }
    }

    /// Configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored records, soft-deleted ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// True when another push would be rejected.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.tasks.len() >= self.capacity
    }

    /// All records in storage order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Record at the given storage position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Task> {
        self.tasks.get(position)
    }

    /// Mutable record at the given storage position.
    pub fn get_mut(&mut self, position: usize) -> Option<&mut Task> {
        self.tasks.get_mut(position)
    }

    /// Append a record at the end.
    ///
    /// # Errors
    /// Returns [`ListFull`] when the list is at capacity; the list is left
    /// unchanged.
    pub fn push(&mut self, task: Task) -> Result<(), ListFull> {
        if self.is_full() {
            return Err(ListFull {
                capacity: self.capacity,
            });
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Remove the record at `position`, shifting every later record one
    /// position earlier.
    pub fn remove(&mut self, position: usize) -> Option<Task> {
        if position < self.tasks.len() {
            Some(self.tasks.remove(position))
        } else {
            None
        }
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_is_active_and_not_done() -> Result<(), TextError> {
        let task = Task::new("buy milk")?;
        assert!(task.active);
        assert!(!task.done);
        assert_eq!(task.text, "buy milk");
        Ok(())
    }

    #[test]
    fn text_constraints_are_enforced() {
        assert_eq!(validate_text(""), Err(TextError::Empty));
        assert_eq!(validate_text("a|b"), Err(TextError::SeparatorForbidden));
        assert_eq!(validate_text("a\nb"), Err(TextError::LineBreakForbidden));
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        assert_eq!(validate_text(&long), Err(TextError::TooLong));
        let max = "x".repeat(MAX_TEXT_LEN);
        assert_eq!(validate_text(&max), Ok(()));
    }

    #[test]
    fn push_rejects_when_full() -> Result<(), TextError> {
        let mut list = TaskList::with_capacity(2);
        list.push(Task::new("one")?).ok();
        list.push(Task::new("two")?).ok();
        assert!(list.is_full());
        let err = list.push(Task::new("three")?);
        assert_eq!(err, Err(ListFull { capacity: 2 }));
        assert_eq!(list.len(), 2);
        Ok(())
    }

    #[test]
    fn remove_compacts_and_preserves_earlier_records() -> Result<(), TextError> {
        let mut list = TaskList::default();
        for text in ["one", "two", "three"] {
            list.push(Task::new(text)?).ok();
        }
        let removed = list.remove(1);
        assert_eq!(removed.map(|t| t.text), Some("two".to_owned()));
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).map(|t| t.text.as_str()), Some("one"));
        assert_eq!(list.get(1).map(|t| t.text.as_str()), Some("three"));
        assert!(list.remove(5).is_none());
        Ok(())
    }
}
