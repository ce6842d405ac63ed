pub mod result;
pub mod user;

pub use result::{NewResult, ResultRecord};
pub use user::{hash_password, NewUser, User};
