//! 基础设施层：文件存储与日志

pub mod json_store;
pub mod logger;
