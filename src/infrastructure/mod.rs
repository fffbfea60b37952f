//! 基础设施层：配置、日志、内存存储

pub mod config;
pub mod logger;
pub mod store;

pub use config::{load_config, Config, ConfigError};
pub use logger::Logger;
pub use store::{MemoryTable, StoreError};
