pub mod classifier;
pub mod decision;
pub mod extractor;
pub mod matcher;
pub mod page_presenter;
pub mod page_source;
pub mod presenter;
pub mod query;

pub use classifier::{PhraseClassifier, TypeClassifier};
pub use decision::{decide, decide_write};
pub use extractor::{extract, QuestionExtractor};
pub use matcher::interpret;
pub use page_presenter::PagePresenter;
pub use page_source::{BrowserPageSource, PageSource};
pub use presenter::{LogPresenter, Notice, ResultPresenter};
pub use query::build_search_key;
