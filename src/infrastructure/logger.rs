//! 日志基础设施

use tracing_subscriber::{fmt, EnvFilter};

pub struct Logger;

impl Logger {
    /// 初始化全局日志，`RUST_LOG` 环境变量优先于配置的级别
    pub fn init(level: &str) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        // 重复初始化（例如测试中）时忽略错误
        let _ = fmt().with_env_filter(filter).with_target(false).try_init();
    }
}
