use quiz_core::model::QuizHistoryEntry;

use super::time_fmt::{format_date, format_seconds};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRowVm {
    pub topic_name: String,
    pub score: String,
    pub average: String,
    pub date: String,
}

#[must_use]
pub fn map_history_rows(entries: &[QuizHistoryEntry]) -> Vec<HistoryRowVm> {
    entries
        .iter()
        .map(|entry| HistoryRowVm {
            topic_name: entry.topic_name.clone(),
            score: format!("{}/{}", entry.correct_answers, entry.total_questions),
            average: format_seconds(entry.average_response_time),
            date: format_date(entry.completed_at),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::TopicId;
    use quiz_core::time::fixed_now;

    #[test]
    fn maps_score_and_average() {
        let rows = map_history_rows(&[QuizHistoryEntry {
            topic_id: TopicId::new(1),
            topic_name: "RAG Systems".into(),
            total_questions: 10,
            correct_answers: 7,
            average_response_time: 4.5,
            completed_at: fixed_now(),
        }]);
        assert_eq!(
            rows,
            vec![HistoryRowVm {
                topic_name: "RAG Systems".into(),
                score: "7/10".into(),
                average: "4.5s".into(),
                date: "2023-11-14".into(),
            }]
        );
    }
}
