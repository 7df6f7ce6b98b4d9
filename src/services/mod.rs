pub mod attachments;
pub mod authorizer;
pub mod cache;
