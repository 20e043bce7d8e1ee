pub mod handlers;
pub mod mapping;
pub mod store;
