pub mod task;
pub mod user;

pub use task::{NewTask, Task, TaskChanges, TaskFilter, TaskPriority, TaskStatus};
pub use user::{NewUser, User, UserChanges, UserView};
