//! 共享库
//!
//! 包含进度引擎及未来服务进程共用的基础设施代码：
//! 配置加载、数据库连接、日志初始化、测试工具。

pub mod config;
pub mod database;
pub mod observability;
pub mod test_utils;

pub use config::{AppConfig, DatabaseConfig, EngineConfig, ObservabilityConfig};
pub use database::Database;
