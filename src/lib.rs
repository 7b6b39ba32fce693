// Taskpad - persistent task-list state management

pub mod filter;
pub mod notify;
pub mod storage;
pub mod store;
pub mod task;

// Re-export main types for convenience
pub use filter::StatusFilter;
pub use notify::{Notifier, NotifyKind, SilentNotifier, TermNotifier};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{BLOB_KEY, EditState, TaskStore};
pub use task::{Stats, Task};
