use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::protocol::CatDescriptor;

macro_rules! id_newtype {
    ($name:ident, $inner:ty) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype!(ItemId, String);
id_newtype!(SessionId, Uuid);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// One card of the deck. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub image_url: String,
    pub tags: Vec<String>,
    /// Raw timestamp as reported by the source; empty for placeholders.
    pub created_at: String,
    pub media_type: String,
}

impl Item {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        if self.created_at.is_empty() {
            return None;
        }
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

impl From<CatDescriptor> for Item {
    fn from(value: CatDescriptor) -> Self {
        Self {
            id: ItemId(value.id),
            image_url: value.url,
            tags: value.tags,
            created_at: value.created_at,
            media_type: value.mime_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Like,
    Dislike,
    Cancel,
}

impl From<SwipeDirection> for Decision {
    fn from(value: SwipeDirection) -> Self {
        match value {
            SwipeDirection::Right => Decision::Like,
            SwipeDirection::Left => Decision::Dislike,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Active,
    Summary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(created_at: &str) -> Item {
        Item {
            id: ItemId("abc".to_string()),
            image_url: "https://cataas.com/cat/abc".to_string(),
            tags: vec!["orange".to_string()],
            created_at: created_at.to_string(),
            media_type: "image/jpeg".to_string(),
        }
    }

    #[test]
    fn parses_rfc3339_created_at() {
        let parsed = item("2022-11-20T10:05:33.021Z")
            .created_at_utc()
            .expect("timestamp");
        assert_eq!(parsed.to_rfc3339(), "2022-11-20T10:05:33.021+00:00");
    }

    #[test]
    fn empty_or_garbage_created_at_is_none() {
        assert!(item("").created_at_utc().is_none());
        assert!(item("yesterday").created_at_utc().is_none());
    }

    #[test]
    fn button_directions_map_to_decisive_decisions() {
        assert_eq!(Decision::from(SwipeDirection::Right), Decision::Like);
        assert_eq!(Decision::from(SwipeDirection::Left), Decision::Dislike);
    }
}
