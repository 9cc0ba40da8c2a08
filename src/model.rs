//! Data models for archived Twitter/X data.
//!
//! Three layers: export documents as found in `twitter-meta/*.json`
//! (`TweetDoc`/`UserDoc`), stored rows joined with author/user display
//! fields (`TweetRow`/`UserRow`), and the nested render-ready view
//! produced by the relationship resolver (`TweetView`).

use serde::{Deserialize, Serialize};

// =============================================================================
// Export documents (ingestion input)
// =============================================================================

/// One per-tweet export document. Only `tweet_id` is required; every
/// other key falls back to a neutral default.
#[derive(Debug, Clone, Deserialize)]
pub struct TweetDoc {
    pub tweet_id: i64,
    #[serde(default)]
    pub retweet_id: i64,
    #[serde(default)]
    pub quote_id: i64,
    #[serde(default)]
    pub reply_id: i64,
    #[serde(default)]
    pub conversation_id: i64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub sensitive_flags: Vec<String>,
    #[serde(default)]
    pub favorite_count: i64,
    #[serde(default)]
    pub quote_count: i64,
    #[serde(default)]
    pub reply_count: i64,
    #[serde(default)]
    pub retweet_count: i64,
    #[serde(default)]
    pub bookmark_count: i64,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    /// Original poster. For retweets this differs from `user`.
    #[serde(default)]
    pub author: Option<UserDoc>,
    /// Feed owner / retweeter.
    #[serde(default)]
    pub user: Option<UserDoc>,
}

/// Embedded author/user sub-object of an export document.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDoc {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub profile_banner: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub favourites_count: i64,
    #[serde(default)]
    pub followers_count: i64,
    #[serde(default)]
    pub friends_count: i64,
    #[serde(default)]
    pub listed_count: i64,
    #[serde(default)]
    pub media_count: i64,
    #[serde(default)]
    pub statuses_count: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

// =============================================================================
// Stored rows
// =============================================================================

/// A tweet row joined with author and user display fields.
///
/// `author_id` is the original poster; `user_id` is the feed owner. The
/// three forward pointers use 0 for "no relation".
#[derive(Debug, Clone, Default, Serialize)]
pub struct TweetRow {
    pub tweet_id: i64,
    pub retweet_id: i64,
    pub quote_id: i64,
    pub reply_id: i64,
    pub conversation_id: i64,
    pub date: Option<String>,
    pub lang: Option<String>,
    pub source: Option<String>,
    pub sensitive: bool,
    pub sensitive_flags: Vec<String>,
    pub favorite_count: i64,
    pub quote_count: i64,
    pub reply_count: i64,
    pub retweet_count: i64,
    pub bookmark_count: i64,
    pub view_count: i64,
    pub content: Option<String>,
    pub media_files: Vec<String>,
    pub hashtags: Vec<String>,
    pub author_id: Option<i64>,
    pub user_id: Option<i64>,
    // Joined display fields
    pub author_name: Option<String>,
    pub author_nick: Option<String>,
    pub author_avatar: Option<String>,
    pub author_banner: Option<String>,
    pub user_name: Option<String>,
    pub user_nick: Option<String>,
    pub user_avatar: Option<String>,
    pub user_banner: Option<String>,
}

impl TweetRow {
    /// Relation flags come from forward-pointer presence alone.
    #[must_use]
    pub const fn is_retweet(&self) -> bool {
        self.retweet_id > 0
    }

    #[must_use]
    pub const fn is_quote(&self) -> bool {
        self.quote_id > 0
    }

    #[must_use]
    pub const fn is_reply(&self) -> bool {
        self.reply_id > 0
    }
}

/// A user row.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserRow {
    pub user_id: i64,
    pub name: Option<String>,
    pub nick: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub verified: bool,
    pub protected: bool,
    pub profile_banner: Option<String>,
    pub profile_image: Option<String>,
    pub favourites_count: i64,
    pub followers_count: i64,
    pub friends_count: i64,
    pub listed_count: i64,
    pub media_count: i64,
    pub statuses_count: i64,
    pub description: Option<String>,
    pub url: Option<String>,
}

/// A media file record derived from filesystem presence.
#[derive(Debug, Clone, Serialize)]
pub struct MediaFileRow {
    pub id: i64,
    pub tweet_id: i64,
    pub file_name: String,
    pub file_type: String,
    pub file_path: String,
}

// =============================================================================
// View model
// =============================================================================

/// Nested view of a tweet with its resolved relationships.
///
/// Forward pointers resolve into `retweet`/`quote`/`reply`; the reverse
/// lookups fill `quoted_by`/`replied_by` only when the base tweet is not
/// itself the quoting/replying side. A dangling pointer leaves the field
/// `None` rather than erroring.
#[derive(Debug, Clone, Serialize)]
pub struct TweetView {
    #[serde(flatten)]
    pub tweet: TweetRow,
    pub retweet: Option<Box<TweetRow>>,
    pub quote: Option<Box<TweetRow>>,
    pub reply: Option<Box<TweetRow>>,
    pub quoted_by: Option<Box<TweetRow>>,
    pub replied_by: Option<Box<TweetRow>>,
}

impl TweetView {
    #[must_use]
    pub fn bare(tweet: TweetRow) -> Self {
        Self {
            tweet,
            retweet: None,
            quote: None,
            reply: None,
            quoted_by: None,
            replied_by: None,
        }
    }
}

// =============================================================================
// Stats
// =============================================================================

/// Aggregate counts for the stats page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsOverview {
    pub total_tweets: i64,
    pub total_users: i64,
    pub total_media: i64,
    pub total_retweets: i64,
    pub total_replies: i64,
    pub total_quotes: i64,
}

/// A user together with their tweet count, for the most-active list.
#[derive(Debug, Clone, Serialize)]
pub struct TopUser {
    #[serde(flatten)]
    pub user: UserRow,
    pub tweet_count: i64,
}

/// Pagination info computed from a total count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: i64,
    pub per_page: u32,
}

impl PageInfo {
    /// Ceiling-divide the total count into pages.
    #[must_use]
    pub fn new(current_page: u32, per_page: u32, total_count: i64) -> Self {
        let per = i64::from(per_page.max(1));
        let total_pages = u32::try_from((total_count + per - 1) / per).unwrap_or(u32::MAX);
        Self {
            current_page: current_page.max(1),
            total_pages,
            total_count,
            per_page: per_page.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_requires_only_tweet_id() {
        let doc: TweetDoc = serde_json::from_str(r#"{"tweet_id": 42}"#).unwrap();
        assert_eq!(doc.tweet_id, 42);
        assert_eq!(doc.retweet_id, 0);
        assert!(doc.author.is_none());
        assert!(doc.hashtags.is_empty());
    }

    #[test]
    fn doc_missing_tweet_id_fails() {
        assert!(serde_json::from_str::<TweetDoc>(r#"{"content": "hi"}"#).is_err());
    }

    #[test]
    fn relation_flags_from_pointers() {
        let row = TweetRow {
            retweet_id: 9,
            ..TweetRow::default()
        };
        assert!(row.is_retweet());
        assert!(!row.is_quote());
        assert!(!row.is_reply());
    }

    #[test]
    fn page_info_ceiling() {
        assert_eq!(PageInfo::new(1, 20, 0).total_pages, 0);
        assert_eq!(PageInfo::new(1, 20, 20).total_pages, 1);
        assert_eq!(PageInfo::new(1, 20, 21).total_pages, 2);
        assert_eq!(PageInfo::new(0, 20, 5).current_page, 1);
    }
}
