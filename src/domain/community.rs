// Community exchange post domain model
use super::action::RowAction;
use super::filter::{parse_choice, unknown_control, FilterControls, FilterError, UnknownValue};
use super::reported::{string_or_number, Reported};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Active,
    Closed,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Active => "active",
            PostStatus::Closed => "closed",
        }
    }
}

impl FromStr for PostStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(PostStatus::Active),
            "closed" => Ok(PostStatus::Closed),
            _ => Err(UnknownValue::new("post status", s)),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityPost {
    #[serde(deserialize_with = "string_or_number")]
    pub post_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub resident_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Reported<PostStatus>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl CommunityPost {
    pub fn actions(&self) -> Vec<RowAction> {
        match self.status {
            Reported::Known(PostStatus::Active) => vec![RowAction::Close, RowAction::Delete],
            _ => vec![RowAction::Delete],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommunityFilter {
    pub status: Option<PostStatus>,
    /// Categories are free text on the backend ("furniture", "food", ...)
    pub category: Option<String>,
}

impl CommunityFilter {
    pub fn matches(&self, post: &CommunityPost) -> bool {
        if self.status.is_some_and(|status| !post.status.is(status)) {
            return false;
        }
        match &self.category {
            Some(category) => post.category.as_deref() == Some(category.as_str()),
            None => true,
        }
    }
}

impl FilterControls for CommunityFilter {
    fn controls() -> &'static [&'static str] {
        &["status", "category"]
    }

    fn apply(&mut self, control: &str, value: &str) -> Result<(), FilterError> {
        match control {
            "status" => self.status = parse_choice(value)?,
            "category" => {
                let value = value.trim();
                self.category = if value.is_empty() || value.eq_ignore_ascii_case("all") {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => return Err(unknown_control::<Self>(control)),
        }
        Ok(())
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(status: PostStatus, category: &str) -> CommunityPost {
        CommunityPost {
            post_id: "c1".to_string(),
            title: Some("Free Chair".to_string()),
            resident_name: Some("Alice".to_string()),
            category: Some(category.to_string()),
            status: status.into(),
            created_at: None,
        }
    }

    #[test]
    fn test_closing_is_one_way() {
        assert_eq!(
            post(PostStatus::Active, "furniture").actions(),
            vec![RowAction::Close, RowAction::Delete]
        );
        assert_eq!(
            post(PostStatus::Closed, "furniture").actions(),
            vec![RowAction::Delete]
        );
    }

    #[test]
    fn test_numeric_id_and_unlisted_status() {
        let post: CommunityPost =
            serde_json::from_str(r#"{"post_id":7,"title":"Lamp","status":"Archived"}"#).unwrap();
        assert_eq!(post.post_id, "7");
        assert_eq!(post.status, Reported::Other("Archived".to_string()));
        assert_eq!(post.actions(), vec![RowAction::Delete]);
    }

    #[test]
    fn test_category_filter_is_exact() {
        let mut filter = CommunityFilter::default();
        filter.apply("category", "food").unwrap();
        assert!(filter.matches(&post(PostStatus::Active, "food")));
        assert!(!filter.matches(&post(PostStatus::Active, "furniture")));

        filter.apply("status", "closed").unwrap();
        assert!(!filter.matches(&post(PostStatus::Active, "food")));
        assert_eq!(
            filter.query_pairs(),
            vec![("status", "closed".to_string()), ("category", "food".to_string())]
        );

        filter.apply("category", "").unwrap();
        assert_eq!(filter.category, None);
    }
}
