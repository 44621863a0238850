use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Envelope returned by the categories endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryData {
    pub trivia_categories: Vec<Category>,
}

impl CategoryData {
    pub fn find(&self, id: i64) -> Option<&Category> {
        self.trivia_categories.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.find(id).is_some()
    }
}
