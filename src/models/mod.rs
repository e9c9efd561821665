pub mod todo;
pub mod user;

pub use todo::{Todo, TodoInput};
pub use user::{NewUser, PasswordChangeRequest, Role, User, UserResponse};
