//! 领域模型定义
//!
//! 包含进度引擎的全部实体：学习者、内容单元、进度记录、徽章定义与发放记录。

mod badge;
mod content;
mod learner;
mod progress;

pub use badge::{AwardRecord, BadgeCriterion, BadgeDefinition};
pub use content::{ContentKind, ContentUnit};
pub use learner::Learner;
pub use progress::{CompletionChanges, CompletionUpsert, ProgressRecord};
