//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{
    AwardRecord, BadgeDefinition, CompletionChanges, CompletionUpsert, ContentKind, ContentUnit,
    Learner, ProgressRecord,
};

/// 学习者仓储接口
///
/// `add_points` 是学习者积分的唯一写入口（存储层原子累加）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LearnerRepositoryTrait: Send + Sync {
    async fn get_learner(&self, id: i64) -> Result<Option<Learner>>;

    /// 原子累加积分，返回累加后的总分；学习者不存在时报 LearnerNotFound
    async fn add_points(&self, learner_id: i64, delta: i64) -> Result<i64>;
}

/// 内容单元仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentUnitRepositoryTrait: Send + Sync {
    async fn get_content_unit(&self, id: i64) -> Result<Option<ContentUnit>>;
}

/// 进度仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepositoryTrait: Send + Sync {
    /// 插入或合并进度记录，翻转判定在行锁下完成（见实现）
    async fn upsert_completion(
        &self,
        learner_id: i64,
        content_unit_id: i64,
        changes: CompletionChanges,
        now: DateTime<Utc>,
    ) -> Result<CompletionUpsert>;

    async fn get_progress(
        &self,
        learner_id: i64,
        content_unit_id: i64,
    ) -> Result<Option<ProgressRecord>>;

    async fn list_progress(&self, learner_id: i64) -> Result<Vec<ProgressRecord>>;

    /// 已完成记录数（可按内容类型过滤），供 minCompletedLessons 条件使用
    async fn count_completed(&self, learner_id: i64, kind: Option<ContentKind>) -> Result<i64>;

    /// 已完成记录中的最高得分（可按内容类型过滤），供 minScoreOnAnyLesson 条件使用
    async fn max_completed_score(
        &self,
        learner_id: i64,
        kind: Option<ContentKind>,
    ) -> Result<Option<i32>>;
}

/// 徽章目录仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeRepositoryTrait: Send + Sync {
    async fn list_badges(&self) -> Result<Vec<BadgeDefinition>>;
    async fn get_badge(&self, id: i64) -> Result<Option<BadgeDefinition>>;
}

/// 发放记录仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AwardRepositoryTrait: Send + Sync {
    /// 条件插入：记录已存在时返回 None（至多一次发放的存储层保证）
    async fn insert_award_if_absent(
        &self,
        learner_id: i64,
        badge_id: i64,
        awarded_at: DateTime<Utc>,
    ) -> Result<Option<AwardRecord>>;

    async fn get_award(&self, learner_id: i64, badge_id: i64) -> Result<Option<AwardRecord>>;

    async fn list_awards(&self, learner_id: i64) -> Result<Vec<AwardRecord>>;

    async fn list_awarded_badge_ids(&self, learner_id: i64) -> Result<Vec<i64>>;
}
