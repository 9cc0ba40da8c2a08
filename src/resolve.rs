//! Relationship resolution for tweet display.
//!
//! Expands a stored row into a view with its retweeted, quoted and
//! replied-to targets attached, plus reverse lookups for original
//! tweets. Dangling pointers resolve to nothing rather than erroring.

use crate::error::Result;
use crate::model::{TweetRow, TweetView};
use crate::storage::Storage;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    storage: &'a Storage,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Attach related tweets to a row.
    ///
    /// Forward pointers (`retweet_id`, `quote_id`, `reply_id`) fetch
    /// their targets when set. Reverse lookups run only for original
    /// tweets: a tweet that quotes nothing gets its first quoter, one
    /// that replies to nothing gets its first replier.
    ///
    /// # Errors
    ///
    /// Returns an error when a lookup query fails. A pointer at a tweet
    /// absent from the archive is not an error and resolves to `None`.
    pub fn resolve(&self, tweet: TweetRow) -> Result<TweetView> {
        let mut view = TweetView::bare(tweet);

        if view.tweet.retweet_id > 0 {
            view.retweet = self.fetch(view.tweet.retweet_id)?;
        }
        if view.tweet.quote_id > 0 {
            view.quote = self.fetch(view.tweet.quote_id)?;
        } else {
            view.quoted_by = self
                .storage
                .first_quoting(view.tweet.tweet_id)?
                .map(Box::new);
        }
        if view.tweet.reply_id > 0 {
            view.reply = self.fetch(view.tweet.reply_id)?;
        } else {
            view.replied_by = self
                .storage
                .first_replying(view.tweet.tweet_id)?
                .map(Box::new);
        }

        Ok(view)
    }

    /// Resolve a whole page of rows.
    ///
    /// # Errors
    ///
    /// Returns an error when a lookup query fails.
    pub fn resolve_all(&self, tweets: Vec<TweetRow>) -> Result<Vec<TweetView>> {
        tweets.into_iter().map(|t| self.resolve(t)).collect()
    }

    fn fetch(&self, tweet_id: i64) -> Result<Option<Box<TweetRow>>> {
        let row = self.storage.tweet_by_id(tweet_id)?;
        if row.is_none() {
            debug!("Related tweet {tweet_id} not in archive");
        }
        Ok(row.map(Box::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TweetDoc;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> Storage {
        Storage::open(dir.path().join("test.db")).unwrap()
    }

    fn insert(storage: &Storage, tweet_id: i64, extra: serde_json::Value) {
        let mut value = serde_json::json!({
            "tweet_id": tweet_id,
            "date": "2023-06-15 10:30:00",
            "content": format!("tweet {tweet_id}"),
        });
        if let (Some(map), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                map.insert(k.clone(), v.clone());
            }
        }
        let doc: TweetDoc = serde_json::from_value(value).unwrap();
        storage.upsert_tweet(&doc, &[]).unwrap();
    }

    #[test]
    fn forward_pointers_fetch_targets() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        insert(&storage, 1, serde_json::json!({}));
        insert(&storage, 2, serde_json::json!({"retweet_id": 1}));
        insert(&storage, 3, serde_json::json!({"quote_id": 1, "reply_id": 1}));

        let resolver = Resolver::new(&storage);

        let rt = resolver
            .resolve(storage.tweet_by_id(2).unwrap().unwrap())
            .unwrap();
        assert_eq!(rt.retweet.as_ref().map(|t| t.tweet_id), Some(1));

        let qr = resolver
            .resolve(storage.tweet_by_id(3).unwrap().unwrap())
            .unwrap();
        assert_eq!(qr.quote.as_ref().map(|t| t.tweet_id), Some(1));
        assert_eq!(qr.reply.as_ref().map(|t| t.tweet_id), Some(1));
    }

    #[test]
    fn dangling_pointer_resolves_to_none() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        insert(&storage, 1, serde_json::json!({"retweet_id": 999}));

        let view = Resolver::new(&storage)
            .resolve(storage.tweet_by_id(1).unwrap().unwrap())
            .unwrap();
        assert!(view.retweet.is_none());
    }

    #[test]
    fn reverse_lookup_only_for_originals() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        insert(&storage, 1, serde_json::json!({}));
        insert(&storage, 2, serde_json::json!({"quote_id": 1}));
        insert(&storage, 3, serde_json::json!({"reply_id": 1}));
        // quotes something itself, so no quoted_by lookup
        insert(&storage, 4, serde_json::json!({"quote_id": 2}));
        insert(&storage, 5, serde_json::json!({"quote_id": 4}));

        let resolver = Resolver::new(&storage);

        let original = resolver
            .resolve(storage.tweet_by_id(1).unwrap().unwrap())
            .unwrap();
        assert_eq!(original.quoted_by.as_ref().map(|t| t.tweet_id), Some(2));
        assert_eq!(original.replied_by.as_ref().map(|t| t.tweet_id), Some(3));

        let quoting = resolver
            .resolve(storage.tweet_by_id(4).unwrap().unwrap())
            .unwrap();
        assert!(quoting.quoted_by.is_none());
        assert_eq!(quoting.quote.as_ref().map(|t| t.tweet_id), Some(2));
    }

    #[test]
    fn resolve_all_preserves_order() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        insert(&storage, 1, serde_json::json!({}));
        insert(&storage, 2, serde_json::json!({}));

        let rows = vec![
            storage.tweet_by_id(2).unwrap().unwrap(),
            storage.tweet_by_id(1).unwrap().unwrap(),
        ];
        let views = Resolver::new(&storage).resolve_all(rows).unwrap();
        let ids: Vec<i64> = views.iter().map(|v| v.tweet.tweet_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
