//! Domain types & indexing logic for flatdo tasks.

/// Task record and bounded task list.
pub mod task;
/// Derived user-facing ordering.
pub mod visibility;

pub use task::{FIELD_SEPARATOR, ListFull, MAX_TASKS, MAX_TEXT_LEN, Task, TaskList, TextError, validate_text};
pub use visibility::{IndexError, VisibleIndex};
