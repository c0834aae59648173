pub mod digest;
pub mod extract;
pub mod finding;
pub mod html;
pub mod merger;
