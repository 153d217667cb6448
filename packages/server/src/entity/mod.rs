pub mod movie;
pub mod role;
pub mod score;
pub mod user;
pub mod user_role;
