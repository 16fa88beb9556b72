use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One search result row, as shown in the main list.
///
/// All optional fields stay `Option` end to end: the Stack Exchange API may
/// omit any of them, and `visited`/`answered` are genuinely tri-state
/// (true / false / unknown). Rows are built once via the fluent setters when
/// a result batch arrives and are not mutated afterwards — marking a row
/// visited constructs a replacement row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionRow {
    pub visited: Option<bool>,
    pub question_id: Option<i64>,
    pub title: String,
    pub tags: Option<Vec<String>>,
    pub votes: Option<i64>,
    pub answers: Option<i64>,
    pub views: Option<i64>,
    pub answered: Option<bool>,
    pub creation_date: Option<DateTime<Utc>>,
    pub link: String,
    pub owner_profile_image_url: String,
    pub owner_display_name: String,
}

impl QuestionRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(mut self, visited: Option<bool>) -> Self {
        self.visited = visited;
        self
    }

    pub fn question_id(mut self, question_id: Option<i64>) -> Self {
        self.question_id = question_id;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn tags(mut self, tags: Option<Vec<String>>) -> Self {
        self.tags = tags;
        self
    }

    pub fn votes(mut self, votes: Option<i64>) -> Self {
        self.votes = votes;
        self
    }

    pub fn answers(mut self, answers: Option<i64>) -> Self {
        self.answers = answers;
        self
    }

    pub fn views(mut self, views: Option<i64>) -> Self {
        self.views = views;
        self
    }

    pub fn answered(mut self, answered: Option<bool>) -> Self {
        self.answered = answered;
        self
    }

    pub fn creation_date(mut self, creation_date: Option<DateTime<Utc>>) -> Self {
        self.creation_date = creation_date;
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn owner_profile_image_url(mut self, url: impl Into<String>) -> Self {
        self.owner_profile_image_url = url.into();
        self
    }

    pub fn owner_display_name(mut self, name: impl Into<String>) -> Self {
        self.owner_display_name = name.into();
        self
    }
}
