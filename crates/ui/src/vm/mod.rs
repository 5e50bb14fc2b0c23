mod history_vm;
mod quiz_vm;
mod time_fmt;
mod topic_vm;

pub use history_vm::{HistoryRowVm, map_history_rows};
pub use quiz_vm::{OptionVm, QuestionVm, ResultVm, map_question, map_result};
pub use time_fmt::{format_date, format_seconds};
pub use topic_vm::{TopicCardVm, featured_topics, map_topic_cards};
