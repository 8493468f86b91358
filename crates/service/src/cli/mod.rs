pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Health, Resolve, Serve, Submit, Version};
