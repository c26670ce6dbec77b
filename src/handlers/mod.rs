pub mod async_script;
pub mod dom_updater;
pub mod markdown;
