use quiz_core::model::Topic;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicCardVm {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub difficulty_label: String,
}

impl TopicCardVm {
    fn from_topic(topic: &Topic) -> Self {
        Self {
            id: topic.id.value(),
            name: topic.name.clone(),
            description: topic.description.clone(),
            difficulty_label: format!("Difficulty: {}", topic.difficulty),
        }
    }
}

#[must_use]
pub fn map_topic_cards(topics: &[Topic]) -> Vec<TopicCardVm> {
    topics.iter().map(TopicCardVm::from_topic).collect()
}

const FEATURED: [(u64, &str, &str, u8); 5] = [
    (
        1,
        "RAG Systems",
        "Learn about Retrieval Augmented Generation and how it enhances LLM capabilities.",
        3,
    ),
    (
        2,
        "Vector Databases",
        "Understand vector databases and their role in modern AI applications.",
        4,
    ),
    (
        3,
        "LLM Validation",
        "Master techniques for validating and evaluating LLM performance.",
        3,
    ),
    (
        4,
        "LLM Fine-tuning",
        "Learn how to fine-tune LLMs for specific tasks and domains.",
        5,
    ),
    (
        5,
        "LLM Orchestration",
        "Explore methods for orchestrating multiple LLMs in complex applications.",
        4,
    ),
];

/// Fixed showcase on the home page; ids match the seeded topic catalogue.
#[must_use]
pub fn featured_topics() -> Vec<TopicCardVm> {
    FEATURED
        .iter()
        .map(|(id, name, description, level)| TopicCardVm {
            id: *id,
            name: (*name).to_string(),
            description: (*description).to_string(),
            difficulty_label: format!("Difficulty: {level}/5"),
        })
        .collect()
}
