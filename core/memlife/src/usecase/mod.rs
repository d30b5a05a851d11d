//! ユースケース（pending キュー・抽出・完了・期限切れ整理）

pub(crate) mod completion;
pub(crate) mod extraction;
pub(crate) mod janitor;
pub(crate) mod pending;

pub(crate) use completion::{CompletionOutcome, CompletionUseCase};
pub(crate) use extraction::ExtractionUseCase;
pub(crate) use janitor::{JanitorOutcome, JanitorReport, JanitorUseCase};
pub(crate) use pending::PendingUseCase;
