//! 进度与成就引擎
//!
//! K-12 数字素养平台的进度记录与徽章成就核心。被排除在外的 Web API 层
//! 通过 `CompletionService::record_completion` 提交完成事件，本引擎负责：
//!
//! - **进度记录**：按 (learner, content) 自然键 upsert，完成态单调不回退
//! - **积分账本**：学习者积分的唯一写入口，存储层原子累加
//! - **徽章目录**：部署期播种的徽章定义与封闭的解锁条件枚举
//! - **资格评估**：对照累计进度计算新满足的徽章，单徽章故障隔离
//! - **发放账本**：(learner, badge) 至多一次发放，徽章积分至多累计一次
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 数据库仓储层
//! - `catalog`: 徽章目录内存快照
//! - `ledger`: 积分账本
//! - `evaluator`: 资格评估器
//! - `service`: 业务服务层（完成事件编排、发放、读侧查询）
//! - `bootstrap`: Postgres 实现的引擎装配
//!
//! ## 并发纪律
//!
//! 同一学习者的并发请求是唯一的竞争点。正确性不依赖应用层锁：
//! 进度与发放都收敛在自然键唯一约束上，完成态翻转在进度行的行锁下
//! 串行判定，积分走存储层原子累加。

pub mod bootstrap;
pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod ledger;
pub mod models;
pub mod repository;
pub mod service;

pub use bootstrap::ProgressEngine;
pub use catalog::BadgeCatalog;
pub use error::{ProgressError, Result};
pub use evaluator::EligibilityEvaluator;
pub use ledger::PointsLedger;
pub use models::*;
pub use repository::{
    AwardRepository, AwardRepositoryTrait, BadgeRepository, BadgeRepositoryTrait,
    ContentUnitRepository, ContentUnitRepositoryTrait, LearnerRepository, LearnerRepositoryTrait,
    ProgressRepository, ProgressRepositoryTrait,
};
pub use service::{
    AwardOutcome, AwardService, CompletionService, ProgressQueryService,
    dto::{AwardedBadge, CompletionRequest, CompletionResponse},
};
