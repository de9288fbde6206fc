//! 进度记录实体定义
//!
//! 每个 (learner_id, content_unit_id) 组合至多一条记录，
//! 由自然键上的唯一约束保证。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 进度记录
///
/// 记录一名学习者对一个内容单元的交互状态。字段演进规则：
/// - `score` / `time_spent_seconds`：仅在输入提供时更新，且耗时单调不减
/// - `completed`：单调，一旦为 true 不再回退
/// - `completed_at`：在未完成到完成的翻转时写入一次，此后不再覆盖
/// - `updated_at`：每次写入都会更新
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub learner_id: i64,
    pub content_unit_id: i64,
    /// 得分（0-100），首次尝试前为空
    pub score: Option<i32>,
    /// 累计耗时（秒），单调不减
    pub time_spent_seconds: i32,
    /// 是否已完成（单调）
    pub completed: bool,
    /// 完成时间，在完成态翻转时写入一次
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 完成事件携带的字段变更
///
/// 所有字段均可省略，省略表示"保持原值"，而不是"重置为零"。
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct CompletionChanges {
    pub score: Option<i32>,
    pub time_spent_seconds: Option<i32>,
    pub completed: Option<bool>,
}

/// 进度 upsert 的结果
///
/// `completed_transitioned` 标记本次调用是否把 completed 从 false 翻转为 true。
/// 积分累计只在翻转时发生，重复提交同一完成事件不会重复计分。
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionUpsert {
    pub record: ProgressRecord,
    pub completed_transitioned: bool,
}
