pub mod codec;
pub mod config;
pub mod device;
pub mod error;
