pub mod domain;
pub mod handlers;

pub use domain::util::str_to_rgb;
pub use handlers::async_script::update_async_script;
