//! Database repositories.

mod user;

pub use user::UserRepository;
