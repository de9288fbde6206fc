//! 业务服务层
//!
//! - `CompletionService`：完成事件编排（入口）
//! - `AwardService`：徽章发放（至多一次）
//! - `ProgressQueryService`：看板读侧查询
//! - `dto`：对外请求/响应结构

pub mod award_service;
pub mod completion_service;
pub mod dto;
pub mod query_service;

pub use award_service::{AwardOutcome, AwardService};
pub use completion_service::CompletionService;
pub use query_service::ProgressQueryService;
