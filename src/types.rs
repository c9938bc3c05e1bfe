//! Common types and data structures

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Favorite entry as returned by the API. Only `recipeId` is guaranteed,
/// everything else is carried through untouched for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteRecord(pub Map<String, Value>);

impl FavoriteRecord {
    pub fn recipe_id(&self) -> Option<&Value> {
        self.0.get("recipeId")
    }
}

/// A favorite ready for the grid: every original field plus `id`,
/// which mirrors `recipeId` so cards can be keyed by it.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub id: Value,
    pub fields: Map<String, Value>,
}

impl From<FavoriteRecord> for DisplayItem {
    fn from(record: FavoriteRecord) -> Self {
        let id = record.recipe_id().cloned().unwrap_or(Value::Null);
        Self {
            id,
            fields: record.0,
        }
    }
}

impl DisplayItem {
    /// Stable key for the card, `None` when the record had no `recipeId`
    pub fn key(&self) -> Option<String> {
        match &self.id {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        if field == "id" {
            return Some(&self.id);
        }
        self.fields.get(field)
    }

    pub fn title(&self) -> &str {
        self.str_field("title").unwrap_or("Untitled recipe")
    }

    pub fn image_url(&self) -> Option<&str> {
        self.str_field("image").filter(|url| !url.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    /// `cookTime` is sometimes a number of minutes, sometimes preformatted text
    pub fn cook_time(&self) -> Option<String> {
        match self.fields.get("cookTime")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(format!("{} min", n)),
            _ => None,
        }
    }

    pub fn servings(&self) -> Option<String> {
        match self.fields.get("servings")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }
}

/// What the favorites screen is currently showing
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState {
    Loading,
    Error(String),
    Ready(Vec<DisplayItem>),
}

/// Which path issued a favorites request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// First load on mount, bounded by the request timeout
    Initial,
    /// "Try Again", no timeout and no cancellation
    Retry,
}

/// A favorites fetch the screen wants performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub kind: LoadKind,
    pub user_id: String,
}

/// Blocking dialog raised by the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
        }
    }
}
