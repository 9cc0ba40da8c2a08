//! `SQLite` storage for archived tweet data.
//!
//! Every operation opens a short-lived connection against the stored
//! path, runs its statements, and drops it. That keeps the handle `Sync`
//! for the web layer and matches the one-connection-per-call execution
//! model of the rest of the system.

use crate::error::{Result, XvError};
use crate::model::{MediaFileRow, StatsOverview, TopUser, TweetDoc, TweetRow, UserDoc, UserRow};
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Joined tweet selection shared by every read query. Column order is
/// what `map_tweet_row` expects.
const TWEET_SELECT: &str = "
    SELECT
        t.tweet_id, t.retweet_id, t.quote_id, t.reply_id, t.conversation_id,
        t.date, t.lang, t.source, t.sensitive, t.sensitive_flags,
        t.favorite_count, t.quote_count, t.reply_count, t.retweet_count,
        t.bookmark_count, t.view_count, t.content, t.media_files, t.hashtags,
        t.author_id, t.user_id,
        a.name, a.nick, a.profile_image, a.profile_banner,
        u.name, u.nick, u.profile_image, u.profile_banner
    FROM tweets t
    LEFT JOIN users a ON t.author_id = a.user_id
    LEFT JOIN users u ON t.user_id = u.user_id
";

const USER_SELECT: &str = "
    SELECT user_id, name, nick, location, date, verified, protected,
           profile_banner, profile_image, favourites_count, followers_count,
           friends_count, listed_count, media_count, statuses_count,
           description, url
    FROM users
";

/// `SQLite` storage manager.
#[derive(Debug, Clone)]
pub struct Storage {
    db_path: PathBuf,
}

impl Storage {
    /// Open or create the database at the given path and ensure the
    /// schema exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let storage = Self {
            db_path: db_path.as_ref().to_path_buf(),
        };
        let conn = storage.connect()?;
        create_schema(&conn)?;
        debug!("Database ready at {}", storage.db_path.display());
        Ok(storage)
    }

    /// Open an existing database, failing fast when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`XvError::DatabaseNotFound`] when the file does not exist.
    pub fn open_existing(db_path: impl AsRef<Path>) -> Result<Self> {
        let path = db_path.as_ref();
        if !path.exists() {
            return Err(XvError::database_not_found(path));
        }
        Self::open(path)
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a fresh connection with the standard pragmas.
    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            ",
        )?;
        Ok(conn)
    }

    // =========================================================================
    // Writes (ingestion)
    // =========================================================================

    /// Upsert a user sub-object. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn upsert_user(&self, user: &UserDoc) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "
            INSERT OR REPLACE INTO users (
                user_id, name, nick, location, date, verified, protected,
                profile_banner, profile_image, favourites_count, followers_count,
                friends_count, listed_count, media_count, statuses_count,
                description, url
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                user.id,
                user.name,
                user.nick,
                user.location,
                user.date,
                i32::from(user.verified),
                i32::from(user.protected),
                user.profile_banner,
                user.profile_image,
                user.favourites_count,
                user.followers_count,
                user.friends_count,
                user.listed_count,
                user.media_count,
                user.statuses_count,
                user.description,
                user.url,
            ],
        )?;
        Ok(())
    }

    /// Upsert a tweet row keyed by `tweet_id`, serializing the resolved
    /// media filenames and hashtags alongside it.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn upsert_tweet(&self, doc: &TweetDoc, media_files: &[String]) -> Result<()> {
        let author_id = doc.author.as_ref().map(|a| a.id);
        let user_id = doc.user.as_ref().map(|u| u.id);

        let conn = self.connect()?;
        conn.execute(
            "
            INSERT OR REPLACE INTO tweets (
                tweet_id, retweet_id, quote_id, reply_id, conversation_id,
                date, lang, source, sensitive, sensitive_flags,
                favorite_count, quote_count, reply_count, retweet_count,
                bookmark_count, view_count, content, media_files, hashtags,
                author_id, user_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                doc.tweet_id,
                doc.retweet_id,
                doc.quote_id,
                doc.reply_id,
                doc.conversation_id,
                doc.date,
                doc.lang,
                doc.source,
                i32::from(doc.sensitive),
                serde_json::to_string(&doc.sensitive_flags).unwrap_or_else(|_| "[]".to_string()),
                doc.favorite_count,
                doc.quote_count,
                doc.reply_count,
                doc.retweet_count,
                doc.bookmark_count,
                doc.view_count,
                doc.content,
                serde_json::to_string(media_files).unwrap_or_else(|_| "[]".to_string()),
                serde_json::to_string(&doc.hashtags).unwrap_or_else(|_| "[]".to_string()),
                author_id,
                user_id,
            ],
        )?;
        Ok(())
    }

    /// Replace the media file records for a tweet. Delete-then-insert so
    /// re-ingesting the same input never accumulates duplicate rows.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails.
    pub fn replace_media_files(&self, tweet_id: i64, media_files: &[String]) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM media_files WHERE tweet_id = ?", params![tweet_id])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO media_files (tweet_id, file_name, file_type, file_path)
                 VALUES (?, ?, ?, ?)",
            )?;
            for name in media_files {
                let file_type = Path::new(name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_lowercase)
                    .map(|e| format!(".{e}"))
                    .unwrap_or_default();
                stmt.execute(params![tweet_id, name, file_type, format!("img/{name}")])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // =========================================================================
    // Reads (query surface)
    // =========================================================================

    /// Total tweet count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_tweets(&self) -> Result<i64> {
        let conn = self.connect()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM tweets", [], |row| row.get(0))?)
    }

    /// Total distinct user count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_users(&self) -> Result<i64> {
        let conn = self.connect()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
    }

    /// Total media file record count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_media(&self) -> Result<i64> {
        let conn = self.connect()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM media_files", [], |row| row.get(0))?)
    }

    /// One timeline page, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn timeline(&self, page: u32, per_page: u32) -> Result<Vec<TweetRow>> {
        let offset = i64::from(page.max(1) - 1) * i64::from(per_page);
        let conn = self.connect()?;
        let sql = format!("{TWEET_SELECT} ORDER BY t.date DESC LIMIT ? OFFSET ?");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![i64::from(per_page), offset], map_tweet_row)?
            .filter_map(std::result::Result::ok)
            .collect();
        Ok(rows)
    }

    /// Tweets where the subject appears as author or feed owner, newest
    /// first, paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn profile_tweets(&self, user_id: i64, page: u32, per_page: u32) -> Result<Vec<TweetRow>> {
        let offset = i64::from(page.max(1) - 1) * i64::from(per_page);
        let conn = self.connect()?;
        let sql = format!(
            "{TWEET_SELECT} WHERE t.user_id = ?1 OR t.author_id = ?1
             ORDER BY t.date DESC LIMIT ?2 OFFSET ?3"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id, i64::from(per_page), offset], map_tweet_row)?
            .filter_map(std::result::Result::ok)
            .collect();
        Ok(rows)
    }

    /// Count for [`Storage::profile_tweets`] pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_profile_tweets(&self, user_id: i64) -> Result<i64> {
        let conn = self.connect()?;
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM tweets WHERE user_id = ?1 OR author_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?)
    }

    /// Fetch a single joined tweet row by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn tweet_by_id(&self, tweet_id: i64) -> Result<Option<TweetRow>> {
        let conn = self.connect()?;
        let sql = format!("{TWEET_SELECT} WHERE t.tweet_id = ?");
        let result = conn.query_row(&sql, params![tweet_id], map_tweet_row);
        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// First tweet (by row order) whose `quote_id` points at the target.
    /// Ambiguous when several do; showing one is the accepted behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn first_quoting(&self, tweet_id: i64) -> Result<Option<TweetRow>> {
        self.first_pointing_at("quote_id", tweet_id)
    }

    /// First tweet (by row order) whose `reply_id` points at the target.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn first_replying(&self, tweet_id: i64) -> Result<Option<TweetRow>> {
        self.first_pointing_at("reply_id", tweet_id)
    }

    fn first_pointing_at(&self, column: &str, tweet_id: i64) -> Result<Option<TweetRow>> {
        let conn = self.connect()?;
        let sql = format!("{TWEET_SELECT} WHERE t.{column} = ? ORDER BY t.rowid LIMIT 1");
        let result = conn.query_row(&sql, params![tweet_id], map_tweet_row);
        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Recent tweets replying to or quoting the target, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn related_tweets(&self, tweet_id: i64, limit: u32) -> Result<Vec<TweetRow>> {
        let conn = self.connect()?;
        let sql = format!(
            "{TWEET_SELECT} WHERE t.reply_id = ?1 OR t.quote_id = ?1
             ORDER BY t.date DESC LIMIT ?2"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![tweet_id, i64::from(limit)], map_tweet_row)?
            .filter_map(std::result::Result::ok)
            .collect();
        Ok(rows)
    }

    /// Search by content substring and/or exact year/month of the stored
    /// timestamp. All present filters are ANDed; when every filter is
    /// absent, no query runs and the result is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn search_tweets(
        &self,
        query: Option<&str>,
        year: Option<&str>,
        month: Option<&str>,
        limit: u32,
    ) -> Result<Vec<TweetRow>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<String> = Vec::new();

        if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
            clauses.push("t.content LIKE ?");
            args.push(format!("%{q}%"));
        }
        if let Some(y) = year.map(str::trim).filter(|y| !y.is_empty()) {
            clauses.push("strftime('%Y', t.date) = ?");
            args.push(y.to_string());
        }
        if let Some(m) = month.map(str::trim).filter(|m| !m.is_empty()) {
            clauses.push("strftime('%m', t.date) = ?");
            // Stored month component is zero-padded.
            let padded = m
                .parse::<u32>()
                .map_or_else(|_| m.to_string(), |n| format!("{n:02}"));
            args.push(padded);
        }

        if clauses.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.connect()?;
        let sql = format!(
            "{TWEET_SELECT} WHERE {} ORDER BY t.date DESC LIMIT {limit}",
            clauses.join(" AND ")
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(args), map_tweet_row)?
            .filter_map(std::result::Result::ok)
            .collect();
        Ok(rows)
    }

    /// Media file records attached to a tweet, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn media_files_for_tweet(&self, tweet_id: i64) -> Result<Vec<MediaFileRow>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, tweet_id, file_name, file_type, file_path
             FROM media_files WHERE tweet_id = ? ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![tweet_id], |row| {
                Ok(MediaFileRow {
                    id: row.get(0)?,
                    tweet_id: row.get(1)?,
                    file_name: row.get(2)?,
                    file_type: row.get(3)?,
                    file_path: row.get(4)?,
                })
            })?
            .filter_map(std::result::Result::ok)
            .collect();
        Ok(rows)
    }

    /// Fetch a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn user_by_id(&self, user_id: i64) -> Result<Option<UserRow>> {
        let conn = self.connect()?;
        let sql = format!("{USER_SELECT} WHERE user_id = ?");
        let result = conn.query_row(&sql, params![user_id], map_user_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Aggregate totals for the stats page. Relation counts use the
    /// forward-pointer rule, consistent with the per-tweet flags.
    ///
    /// # Errors
    ///
    /// Returns an error if any count fails.
    pub fn stats_overview(&self) -> Result<StatsOverview> {
        let conn = self.connect()?;
        let count = |sql: &str| -> Result<i64> {
            Ok(conn.query_row(sql, [], |row| row.get(0))?)
        };
        Ok(StatsOverview {
            total_tweets: count("SELECT COUNT(*) FROM tweets")?,
            total_users: count("SELECT COUNT(*) FROM users")?,
            total_media: count("SELECT COUNT(*) FROM media_files")?,
            total_retweets: count("SELECT COUNT(*) FROM tweets WHERE retweet_id > 0")?,
            total_replies: count("SELECT COUNT(*) FROM tweets WHERE reply_id > 0")?,
            total_quotes: count("SELECT COUNT(*) FROM tweets WHERE quote_id > 0")?,
        })
    }

    /// Most-active users by tweets surfaced in their feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn top_users(&self, limit: u32) -> Result<Vec<TopUser>> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT u.user_id, u.name, u.nick, u.location, u.date, u.verified,
                    u.protected, u.profile_banner, u.profile_image,
                    u.favourites_count, u.followers_count, u.friends_count,
                    u.listed_count, u.media_count, u.statuses_count,
                    u.description, u.url,
                    COUNT(t.tweet_id) AS tweet_count
             FROM users u
             JOIN tweets t ON u.user_id = t.user_id
             GROUP BY u.user_id
             ORDER BY tweet_count DESC
             LIMIT {limit}"
        );
        let mut stmt = conn.prepare(&sql)?;
        let users = stmt
            .query_map([], |row| {
                Ok(TopUser {
                    user: map_user_row(row)?,
                    tweet_count: row.get(17)?,
                })
            })?
            .filter_map(std::result::Result::ok)
            .collect();
        Ok(users)
    }

    /// Most-favorited tweets.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn top_tweets(&self, limit: u32) -> Result<Vec<TweetRow>> {
        let conn = self.connect()?;
        let sql = format!("{TWEET_SELECT} ORDER BY t.favorite_count DESC LIMIT {limit}");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], map_tweet_row)?
            .filter_map(std::result::Result::ok)
            .collect();
        Ok(rows)
    }

    /// Media-bearing tweets for a user, paginated, with the total count
    /// for the fragment response.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn media_tweets_for_user(
        &self,
        user_id: i64,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<TweetRow>, i64)> {
        let conn = self.connect()?;
        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM tweets
             WHERE (user_id = ?1 OR author_id = ?1)
               AND media_files IS NOT NULL AND media_files != '[]'",
            params![user_id],
            |row| row.get(0),
        )?;

        let offset = i64::from(page.max(1) - 1) * i64::from(per_page);
        let sql = format!(
            "{TWEET_SELECT}
             WHERE (t.user_id = ?1 OR t.author_id = ?1)
               AND t.media_files IS NOT NULL AND t.media_files != '[]'
             ORDER BY t.date DESC LIMIT ?2 OFFSET ?3"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id, i64::from(per_page), offset], map_tweet_row)?
            .filter_map(std::result::Result::ok)
            .collect();
        Ok((rows, total))
    }
}

fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY,
            name TEXT,
            nick TEXT,
            location TEXT,
            date TEXT,
            verified INTEGER DEFAULT 0,
            protected INTEGER DEFAULT 0,
            profile_banner TEXT,
            profile_image TEXT,
            favourites_count INTEGER DEFAULT 0,
            followers_count INTEGER DEFAULT 0,
            friends_count INTEGER DEFAULT 0,
            listed_count INTEGER DEFAULT 0,
            media_count INTEGER DEFAULT 0,
            statuses_count INTEGER DEFAULT 0,
            description TEXT,
            url TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS tweets (
            tweet_id INTEGER PRIMARY KEY,
            retweet_id INTEGER DEFAULT 0,
            quote_id INTEGER DEFAULT 0,
            reply_id INTEGER DEFAULT 0,
            conversation_id INTEGER DEFAULT 0,
            date TEXT,
            lang TEXT,
            source TEXT,
            sensitive INTEGER DEFAULT 0,
            sensitive_flags TEXT,
            favorite_count INTEGER DEFAULT 0,
            quote_count INTEGER DEFAULT 0,
            reply_count INTEGER DEFAULT 0,
            retweet_count INTEGER DEFAULT 0,
            bookmark_count INTEGER DEFAULT 0,
            view_count INTEGER DEFAULT 0,
            content TEXT,
            media_files TEXT,
            hashtags TEXT,
            author_id INTEGER,
            user_id INTEGER,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (author_id) REFERENCES users (user_id),
            FOREIGN KEY (user_id) REFERENCES users (user_id)
        );
        CREATE INDEX IF NOT EXISTS idx_tweets_date ON tweets(date);
        CREATE INDEX IF NOT EXISTS idx_tweets_reply_id ON tweets(reply_id);
        CREATE INDEX IF NOT EXISTS idx_tweets_quote_id ON tweets(quote_id);
        CREATE INDEX IF NOT EXISTS idx_tweets_user_id ON tweets(user_id);
        CREATE INDEX IF NOT EXISTS idx_tweets_author_id ON tweets(author_id);

        CREATE TABLE IF NOT EXISTS media_files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tweet_id INTEGER,
            file_name TEXT,
            file_type TEXT,
            file_path TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (tweet_id) REFERENCES tweets (tweet_id)
        );
        CREATE INDEX IF NOT EXISTS idx_media_tweet_id ON media_files(tweet_id);
        ",
    )?;
    Ok(())
}

/// Parse a JSON-text column into a string list. Malformed or NULL
/// fragments read as empty, never as an error.
fn json_list(value: Option<String>) -> Vec<String> {
    value
        .as_deref()
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

fn map_tweet_row(row: &Row<'_>) -> rusqlite::Result<TweetRow> {
    Ok(TweetRow {
        tweet_id: row.get(0)?,
        retweet_id: row.get::<_, Option<i64>>(1)?.unwrap_or(0),
        quote_id: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
        reply_id: row.get::<_, Option<i64>>(3)?.unwrap_or(0),
        conversation_id: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
        date: row.get(5)?,
        lang: row.get(6)?,
        source: row.get(7)?,
        sensitive: row.get::<_, Option<i64>>(8)?.unwrap_or(0) != 0,
        sensitive_flags: json_list(row.get(9)?),
        favorite_count: row.get::<_, Option<i64>>(10)?.unwrap_or(0),
        quote_count: row.get::<_, Option<i64>>(11)?.unwrap_or(0),
        reply_count: row.get::<_, Option<i64>>(12)?.unwrap_or(0),
        retweet_count: row.get::<_, Option<i64>>(13)?.unwrap_or(0),
        bookmark_count: row.get::<_, Option<i64>>(14)?.unwrap_or(0),
        view_count: row.get::<_, Option<i64>>(15)?.unwrap_or(0),
        content: row.get(16)?,
        media_files: json_list(row.get(17)?),
        hashtags: json_list(row.get(18)?),
        author_id: row.get(19)?,
        user_id: row.get(20)?,
        author_name: row.get(21)?,
        author_nick: row.get(22)?,
        author_avatar: row.get(23)?,
        author_banner: row.get(24)?,
        user_name: row.get(25)?,
        user_nick: row.get(26)?,
        user_avatar: row.get(27)?,
        user_banner: row.get(28)?,
    })
}

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        user_id: row.get(0)?,
        name: row.get(1)?,
        nick: row.get(2)?,
        location: row.get(3)?,
        date: row.get(4)?,
        verified: row.get::<_, Option<i64>>(5)?.unwrap_or(0) != 0,
        protected: row.get::<_, Option<i64>>(6)?.unwrap_or(0) != 0,
        profile_banner: row.get(7)?,
        profile_image: row.get(8)?,
        favourites_count: row.get::<_, Option<i64>>(9)?.unwrap_or(0),
        followers_count: row.get::<_, Option<i64>>(10)?.unwrap_or(0),
        friends_count: row.get::<_, Option<i64>>(11)?.unwrap_or(0),
        listed_count: row.get::<_, Option<i64>>(12)?.unwrap_or(0),
        media_count: row.get::<_, Option<i64>>(13)?.unwrap_or(0),
        statuses_count: row.get::<_, Option<i64>>(14)?.unwrap_or(0),
        description: row.get(15)?,
        url: row.get(16)?,
    })
}
