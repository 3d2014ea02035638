//! 配置管理

mod loader;
mod structs;

pub use structs::*;
