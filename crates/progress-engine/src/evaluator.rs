//! 资格评估器
//!
//! 对照徽章目录逐一检查学习者的累计进度，返回当前满足条件
//! 且尚未发放的徽章集合。单个徽章的条件数据损坏不阻断整轮评估。

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{instrument, warn};

use crate::catalog::BadgeCatalog;
use crate::error::Result;
use crate::models::{BadgeCriterion, BadgeDefinition};
use crate::repository::{AwardRepositoryTrait, ProgressRepositoryTrait};

/// 资格评估器
///
/// 评估必须足够廉价以便每个完成事件都调用一次：
/// 目录走内存快照，进度走聚合查询，已发放徽章直接跳过。
pub struct EligibilityEvaluator<P, A>
where
    P: ProgressRepositoryTrait,
    A: AwardRepositoryTrait,
{
    progress: Arc<P>,
    awards: Arc<A>,
    catalog: Arc<BadgeCatalog>,
}

impl<P, A> EligibilityEvaluator<P, A>
where
    P: ProgressRepositoryTrait,
    A: AwardRepositoryTrait,
{
    pub fn new(progress: Arc<P>, awards: Arc<A>, catalog: Arc<BadgeCatalog>) -> Self {
        Self {
            progress,
            awards,
            catalog,
        }
    }

    /// 评估学习者当前新满足的徽章
    ///
    /// 返回值是集合语义，不保证顺序。已发放的徽章无论条件是否
    /// 仍然成立都不会再出现在结果中。
    #[instrument(skip(self))]
    pub async fn evaluate(&self, learner_id: i64) -> Result<Vec<BadgeDefinition>> {
        let awarded: HashSet<i64> = self
            .awards
            .list_awarded_badge_ids(learner_id)
            .await?
            .into_iter()
            .collect();

        let mut eligible = Vec::new();

        for badge in self.catalog.all().iter() {
            if awarded.contains(&badge.id) {
                continue;
            }

            // 条件数据损坏按徽章隔离，评估继续
            let criterion = match badge.parse_criterion() {
                Ok(criterion) => criterion,
                Err(e) => {
                    warn!(badge_id = badge.id, error = %e, "徽章条件无法解析，本轮跳过");
                    continue;
                }
            };

            if self.criterion_holds(learner_id, &criterion).await? {
                eligible.push(badge.clone());
            }
        }

        Ok(eligible)
    }

    /// 检查单个条件是否成立
    async fn criterion_holds(&self, learner_id: i64, criterion: &BadgeCriterion) -> Result<bool> {
        match *criterion {
            BadgeCriterion::MinCompletedLessons {
                count,
                content_kind,
            } => {
                let completed = self
                    .progress
                    .count_completed(learner_id, content_kind)
                    .await?;
                Ok(completed >= count)
            }
            BadgeCriterion::MinScoreOnAnyLesson {
                threshold,
                content_kind,
            } => {
                let best = self
                    .progress
                    .max_completed_score(learner_id, content_kind)
                    .await?;
                Ok(best.is_some_and(|score| score >= threshold))
            }
            // 连续活跃天数尚无评估算法（日历边界与时区语义未定义），
            // 始终视为未达成
            BadgeCriterion::ConsecutiveActiveDays { .. } => Ok(false),
        }
    }
}
