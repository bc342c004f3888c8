pub mod outcome;
pub mod question;

pub use outcome::{ActionEffect, MatchOutcome, Presentation, SaveOutcome, StoreWrite, SyncAction};
pub use question::{ObservedQuestion, QuestionKind, RawPage, RemoteRecord, QUESTION_NOT_FOUND};
