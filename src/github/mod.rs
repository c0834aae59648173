pub mod client;
pub mod comment;
