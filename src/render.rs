//! Presentation formatting: local image resolution, media path
//! normalization, and tweet text markup.
//!
//! Avatar and banner resolution recomputes the expected local filename
//! from the user id and remote URL on every call and checks the disk,
//! falling back to a placeholder (avatar) or nothing (banner).

use crate::model::{TweetRow, TweetView};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};

pub const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/48x48/cccccc/666666?text=?";

static SPACES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://(?:x\.com|twitter\.com)/i/spaces/[A-Za-z0-9]+[^\s<"]*"#)
        .unwrap_or_else(|e| panic!("invalid spaces regex: {e}"))
});
static YOUTUBE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"https?://(?:www\.)?(?:youtube\.com/watch\?v=([A-Za-z0-9_-]{5,})|youtu\.be/([A-Za-z0-9_-]{5,}))[^\s<"]*"#,
    )
    .unwrap_or_else(|e| panic!("invalid youtube regex: {e}"))
});
static TCO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://t\.co/[A-Za-z0-9]+")
        .unwrap_or_else(|e| panic!("invalid t.co regex: {e}"))
});
// No lookbehind in the regex crate: capture the preceding character and
// re-emit it, so URLs already inside href=\"...\" (preceded by a quote)
// are never rewritten twice.
static BARE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(^|[\s>])(https?://[^\s<"]+)"#)
        .unwrap_or_else(|e| panic!("invalid url regex: {e}"))
});

/// Minimal HTML escaping for user-supplied text.
#[must_use]
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Compact display form of a counter: 1.2K, 3.4M.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_count(count: i64) -> String {
    if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

/// Relative display form of a stored timestamp. Unparseable input is
/// returned unchanged.
#[must_use]
pub fn relative_date(date: &str) -> String {
    let Ok(parsed) = chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S") else {
        return date.to_string();
    };
    let now = chrono::Local::now().naive_local();
    let diff = now - parsed;

    let days = diff.num_days();
    if days > 365 {
        format!("{} years ago", days / 365)
    } else if days > 30 {
        format!("{} months ago", days / 30)
    } else if days > 0 {
        format!("{days} days ago")
    } else if diff.num_hours() > 0 {
        format!("{} hours ago", diff.num_hours())
    } else if diff.num_minutes() > 0 {
        format!("{} minutes ago", diff.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Rewrite a stored media filename to its canonical `img/`-prefixed
/// relative form. Idempotent.
#[must_use]
pub fn normalize_media_path(path: &str) -> String {
    let clean = path.trim_start_matches('/');
    if clean.starts_with("img/") {
        clean.to_string()
    } else {
        format!("img/{clean}")
    }
}

/// Transform raw tweet text into display markup.
///
/// Passes run in fixed order: whitespace collapse and line joining,
/// audio-space badges, video embeds, short-link markers, then the
/// remaining bare URLs. Each later pass must leave earlier rewrites
/// alone.
#[must_use]
pub fn format_content(content: &str) -> String {
    let mut text = content
        .lines()
        .map(|line| {
            let collapsed: Vec<&str> = line.split_whitespace().collect();
            escape(&collapsed.join(" "))
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<String>>()
        .join("<br>");

    text = SPACES_RE
        .replace_all(&text, |caps: &Captures<'_>| {
            format!(
                "<a href=\"{}\" class=\"spaces-link\" target=\"_blank\">\u{1f399} Space</a>",
                &caps[0]
            )
        })
        .into_owned();

    text = YOUTUBE_RE
        .replace_all(&text, |caps: &Captures<'_>| {
            let id = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            format!(
                "<div class=\"video-embed\" data-state=\"loading\">\
                 <iframe src=\"https://www.youtube.com/embed/{id}\" \
                 loading=\"lazy\" allowfullscreen></iframe>\
                 <span class=\"video-fallback\">video unavailable</span></div>"
            )
        })
        .into_owned();

    text = TCO_RE
        .replace_all(&text, |caps: &Captures<'_>| {
            format!(
                "<a href=\"{}\" class=\"tco-link\" target=\"_blank\">view link</a>",
                &caps[0]
            )
        })
        .into_owned();

    text = BARE_URL_RE
        .replace_all(&text, |caps: &Captures<'_>| {
            format!(
                "{}<a href=\"{}\" class=\"external-link\" target=\"_blank\">{}</a>",
                &caps[1], &caps[2], &caps[2]
            )
        })
        .into_owned();

    text
}

/// Per-request formatter bound to the archive's avatar directory.
#[derive(Debug, Clone)]
pub struct Formatter {
    avatar_dir: PathBuf,
}

impl Formatter {
    #[must_use]
    pub fn new(avatar_dir: impl Into<PathBuf>) -> Self {
        Self {
            avatar_dir: avatar_dir.into(),
        }
    }

    /// Local avatar path when the expected cached file exists, the
    /// fixed placeholder otherwise.
    #[must_use]
    pub fn local_avatar(&self, user_id: Option<i64>, remote: Option<&str>) -> String {
        self.local_image("avatar", user_id, remote)
            .unwrap_or_else(|| PLACEHOLDER_AVATAR.to_string())
    }

    /// Local banner path when the expected cached file exists. Banners
    /// have no placeholder.
    #[must_use]
    pub fn local_banner(&self, user_id: Option<i64>, remote: Option<&str>) -> Option<String> {
        self.local_image("banner", user_id, remote)
    }

    fn local_image(&self, kind: &str, user_id: Option<i64>, remote: Option<&str>) -> Option<String> {
        let user_id = user_id?;
        let remote = remote.filter(|u| !u.is_empty())?;
        let path = remote.split(['?', '#']).next().unwrap_or(remote);
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let file_name = format!("{kind}_{user_id}{extension}");
        if self.avatar_dir.join(&file_name).exists() {
            Some(format!("/avatar/{file_name}"))
        } else {
            None
        }
    }

    /// Rewrite a row's image references and media paths for display.
    pub fn apply_row(&self, row: &mut TweetRow) {
        row.author_avatar =
            Some(self.local_avatar(row.author_id, row.author_avatar.as_deref()));
        row.user_avatar = Some(self.local_avatar(row.user_id, row.user_avatar.as_deref()));
        row.author_banner = self.local_banner(row.author_id, row.author_banner.as_deref());
        row.user_banner = self.local_banner(row.user_id, row.user_banner.as_deref());
        row.media_files = row
            .media_files
            .iter()
            .map(|p| normalize_media_path(p))
            .collect();
    }

    /// Apply [`Formatter::apply_row`] to a view and every embedded
    /// relation.
    pub fn apply_view(&self, view: &mut TweetView) {
        self.apply_row(&mut view.tweet);
        for related in [
            &mut view.retweet,
            &mut view.quote,
            &mut view.reply,
            &mut view.quoted_by,
            &mut view.replied_by,
        ]
        .into_iter()
        .flatten()
        {
            self.apply_row(related);
        }
    }
}
