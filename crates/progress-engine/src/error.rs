//! 进度引擎错误类型
//!
//! 定义引擎的业务错误和系统错误。引擎只需区分三类失败：
//! 调用方错误（参数校验）、引用缺失（实体不存在）、可重试的系统错误。

use thiserror::Error;

/// 进度引擎错误类型
#[derive(Debug, Error)]
pub enum ProgressError {
    // === 引用缺失 ===
    #[error("学习者不存在: {0}")]
    LearnerNotFound(i64),

    #[error("内容单元不存在: {0}")]
    ContentUnitNotFound(i64),

    #[error("徽章不存在: {0}")]
    BadgeNotFound(i64),

    // === 调用方错误 ===
    #[error("参数校验失败: {0}")]
    Validation(String),

    // === 徽章目录数据错误 ===
    #[error("不支持的徽章条件: badge_id={badge_id}, {reason}")]
    UnsupportedCriterion { badge_id: i64, reason: String },

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 进度引擎 Result 类型别名
pub type Result<T> = std::result::Result<T, ProgressError>;

impl ProgressError {
    /// 检查是否为可重试的错误
    ///
    /// 完成事件的整条流水线在重试下是安全的（进度 upsert 幂等、
    /// 发放至多一次、积分只在完成态翻转时累计），因此调用方可以
    /// 对此类错误整体重试 record_completion。
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_)
        )
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LearnerNotFound(_) => "LEARNER_NOT_FOUND",
            Self::ContentUnitNotFound(_) => "CONTENT_UNIT_NOT_FOUND",
            Self::BadgeNotFound(_) => "BADGE_NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UnsupportedCriterion { .. } => "UNSUPPORTED_CRITERION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
