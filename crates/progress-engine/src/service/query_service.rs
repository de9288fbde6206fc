//! 进度查询服务
//!
//! 看板与成就页的读侧入口：积分余额、已获徽章、进度列表。
//! 纯读查询，不产生任何状态变更。

use std::sync::Arc;

use tracing::warn;

use crate::catalog::BadgeCatalog;
use crate::error::{ProgressError, Result};
use crate::models::ProgressRecord;
use crate::repository::{AwardRepositoryTrait, LearnerRepositoryTrait, ProgressRepositoryTrait};
use crate::service::dto::AwardedBadge;

/// 进度查询服务
pub struct ProgressQueryService<P, L, A>
where
    P: ProgressRepositoryTrait,
    L: LearnerRepositoryTrait,
    A: AwardRepositoryTrait,
{
    progress: Arc<P>,
    learners: Arc<L>,
    awards: Arc<A>,
    catalog: Arc<BadgeCatalog>,
}

impl<P, L, A> ProgressQueryService<P, L, A>
where
    P: ProgressRepositoryTrait,
    L: LearnerRepositoryTrait,
    A: AwardRepositoryTrait,
{
    pub fn new(
        progress: Arc<P>,
        learners: Arc<L>,
        awards: Arc<A>,
        catalog: Arc<BadgeCatalog>,
    ) -> Self {
        Self {
            progress,
            learners,
            awards,
            catalog,
        }
    }

    /// 学习者当前积分余额
    pub async fn points_balance(&self, learner_id: i64) -> Result<i64> {
        let learner = self
            .learners
            .get_learner(learner_id)
            .await?
            .ok_or(ProgressError::LearnerNotFound(learner_id))?;
        Ok(learner.points)
    }

    /// 学习者已获得的徽章（含展示元数据）
    ///
    /// 发放记录引用了目录中不存在的徽章时记录警告并跳过，
    /// 不让历史脏数据破坏成就页。
    pub async fn achievements(&self, learner_id: i64) -> Result<Vec<AwardedBadge>> {
        let records = self.awards.list_awards(learner_id).await?;

        let mut achievements = Vec::with_capacity(records.len());
        for record in &records {
            match self.catalog.get(record.badge_id) {
                Some(badge) => achievements.push(AwardedBadge::from_award(&badge, record)),
                None => {
                    warn!(
                        learner_id,
                        badge_id = record.badge_id,
                        "发放记录引用了目录中不存在的徽章"
                    );
                }
            }
        }

        Ok(achievements)
    }

    /// 学习者的全部进度记录
    pub async fn progress_overview(&self, learner_id: i64) -> Result<Vec<ProgressRecord>> {
        self.progress.list_progress(learner_id).await
    }
}
