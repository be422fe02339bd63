pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskChanges, TaskInput, TaskStatus};
pub use user::{NewUser, User};
