pub mod authorize;
pub mod todos;
