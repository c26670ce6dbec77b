pub mod article;
pub mod color;
pub mod dom;
pub mod types;
pub mod util;
