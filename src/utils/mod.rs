pub mod file_ops;
pub mod logger;
pub mod paths;
pub mod platform;
