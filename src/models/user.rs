use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub created_at: String,
}

impl User {
    /// Avatar initials: first letter of each word, or just the first letter of a single word.
    pub fn initials(&self) -> String {
        let words: Vec<&str> = self.display_name.split(' ').collect();
        if words.len() < 2 {
            return self
                .display_name
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_default();
        }
        words
            .iter()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}
