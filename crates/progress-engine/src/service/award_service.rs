//! 徽章发放服务
//!
//! 处理 (learner, badge) 维度的发放，核心约束是至多一次：
//! 记录已存在时是无操作（返回既有记录），不报错也不重复累计积分。

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use crate::catalog::BadgeCatalog;
use crate::error::{ProgressError, Result};
use crate::ledger::PointsLedger;
use crate::models::AwardRecord;
use crate::repository::{AwardRepositoryTrait, LearnerRepositoryTrait};

/// 发放结果
///
/// `newly_awarded` 标记本次调用是否真正创建了发放记录。
/// 重复发放（含并发竞争中输掉的一方）返回既有记录且为 false。
#[derive(Debug, Clone)]
pub struct AwardOutcome {
    pub record: AwardRecord,
    pub newly_awarded: bool,
}

/// 徽章发放服务
pub struct AwardService<A, L>
where
    A: AwardRepositoryTrait,
    L: LearnerRepositoryTrait,
{
    awards: Arc<A>,
    ledger: Arc<PointsLedger<L>>,
    catalog: Arc<BadgeCatalog>,
}

impl<A, L> AwardService<A, L>
where
    A: AwardRepositoryTrait,
    L: LearnerRepositoryTrait,
{
    pub fn new(awards: Arc<A>, ledger: Arc<PointsLedger<L>>, catalog: Arc<BadgeCatalog>) -> Self {
        Self {
            awards,
            ledger,
            catalog,
        }
    }

    /// 发放徽章
    ///
    /// 条件插入决出唯一赢家，只有赢家累计徽章积分，
    /// 因此重复评估无论发生多少次都不会重复计分。
    #[instrument(skip(self))]
    pub async fn award(&self, learner_id: i64, badge_id: i64) -> Result<AwardOutcome> {
        let badge = self
            .catalog
            .get(badge_id)
            .ok_or(ProgressError::BadgeNotFound(badge_id))?;

        let inserted = self
            .awards
            .insert_award_if_absent(learner_id, badge_id, Utc::now())
            .await?;

        match inserted {
            Some(record) => {
                self.ledger.accrue(learner_id, badge.points).await?;
                info!(
                    learner_id,
                    badge_id,
                    badge_name = %badge.name,
                    badge_points = badge.points,
                    "徽章发放成功"
                );
                Ok(AwardOutcome {
                    record,
                    newly_awarded: true,
                })
            }
            None => {
                // 记录已存在：回读并按无操作返回
                let record = self
                    .awards
                    .get_award(learner_id, badge_id)
                    .await?
                    .ok_or_else(|| {
                        ProgressError::Internal(format!(
                            "发放记录冲突后回读失败: learner_id={}, badge_id={}",
                            learner_id, badge_id
                        ))
                    })?;
                Ok(AwardOutcome {
                    record,
                    newly_awarded: false,
                })
            }
        }
    }
}
