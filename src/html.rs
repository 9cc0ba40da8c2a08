//! Server-rendered page and fragment builders.
//!
//! A single HTML shell is compiled in and filled by substitution; every
//! page body is assembled from tweet cards built out of formatter
//! output.

use crate::model::{PageInfo, StatsOverview, TopUser, TweetRow, TweetView, UserRow};
use crate::render::{escape, format_content, format_count, relative_date};
use crate::translate::SUPPORTED_LANGUAGES;

const SHELL: &str = include_str!("page.html");

/// Fill the shell with a title and body.
#[must_use]
pub fn render_page(title: &str, body: &str) -> String {
    SHELL
        .replace("{{title}}", &escape(title))
        .replace("{{body}}", body)
}

/// Display identity for a row: prefer the author, fall back to the
/// feed owner.
fn identity(row: &TweetRow) -> (String, String, String, Option<i64>) {
    if row.author_id.is_some() {
        (
            row.author_name.clone().unwrap_or_default(),
            row.author_nick.clone().unwrap_or_default(),
            row.author_avatar.clone().unwrap_or_default(),
            row.author_id,
        )
    } else {
        (
            row.user_name.clone().unwrap_or_default(),
            row.user_nick.clone().unwrap_or_default(),
            row.user_avatar.clone().unwrap_or_default(),
            row.user_id,
        )
    }
}

fn language_select() -> String {
    let options: String = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| format!("<option value=\"{code}\">{name}</option>"))
        .collect();
    format!("<select class=\"lang\">{options}</select>")
}

fn card_head(row: &TweetRow) -> String {
    let (name, nick, avatar, user_id) = identity(row);
    let date = row
        .date
        .as_deref()
        .map(relative_date)
        .unwrap_or_default();
    let name_html = user_id.map_or_else(
        || escape(&name),
        |id| format!("<a href=\"/user/{id}\">{}</a>", escape(&name)),
    );
    format!(
        "<div class=\"tweet-head\">\
         <img class=\"avatar\" src=\"{}\" alt=\"\">\
         <div><div class=\"name\">{name_html}</div>\
         <span class=\"nick\">@{}</span> \
         <span class=\"date\" title=\"{}\">{date}</span></div></div>",
        escape(&avatar),
        escape(&nick),
        escape(row.date.as_deref().unwrap_or("")),
    )
}

fn media_gallery(files: &[String]) -> String {
    if files.is_empty() {
        return String::new();
    }
    let items: String = files
        .iter()
        .map(|file| {
            let src = format!("/{}", escape(file));
            if file.to_lowercase().ends_with(".mp4") {
                format!("<video controls preload=\"metadata\" src=\"{src}\"></video>")
            } else {
                format!("<img loading=\"lazy\" src=\"{src}\" alt=\"\">")
            }
        })
        .collect();
    format!("<div class=\"tweet-media\">{items}</div>")
}

fn stats_row(row: &TweetRow) -> String {
    format!(
        "<div class=\"tweet-stats\">\
         <span>&#x1f4ac; {}</span><span>&#x1f501; {}</span>\
         <span>&#x2764; {}</span><span>&#x1f441; {}</span></div>",
        format_count(row.reply_count),
        format_count(row.retweet_count),
        format_count(row.favorite_count),
        format_count(row.view_count),
    )
}

/// Small nested card for a related tweet.
fn embed_card(row: &TweetRow, label: &str) -> String {
    let content = row.content.as_deref().map(format_content).unwrap_or_default();
    format!(
        "<div class=\"tweet-embed\"><div class=\"label\">{label}</div>\
         {}<div class=\"tweet-body\">{content}</div>{}</div>",
        card_head(row),
        media_gallery(&row.media_files),
    )
}

/// Full card for one resolved tweet view.
#[must_use]
pub fn tweet_card(view: &TweetView) -> String {
    let row = &view.tweet;
    let content = row.content.as_deref().map(format_content).unwrap_or_default();

    let mut related = String::new();
    if let Some(rt) = &view.retweet {
        related.push_str(&embed_card(rt, "Retweeted"));
    }
    if let Some(q) = &view.quote {
        related.push_str(&embed_card(q, "Quoting"));
    }
    if let Some(r) = &view.reply {
        related.push_str(&embed_card(r, "Replying to"));
    }
    if let Some(qb) = &view.quoted_by {
        related.push_str(&embed_card(qb, "Quoted by"));
    }
    if let Some(rb) = &view.replied_by {
        related.push_str(&embed_card(rb, "Replied by"));
    }

    format!(
        "<article class=\"card\">{}\
         <div class=\"tweet-body\"><a href=\"/tweet/{}\">&#x1f517;</a> {content}</div>\
         {}{related}{}\
         <div class=\"translate-row\">{}\
         <button type=\"button\" onclick=\"translateTweet(this)\">Translate</button></div>\
         <div class=\"translation\"></div></article>",
        card_head(row),
        row.tweet_id,
        media_gallery(&row.media_files),
        stats_row(row),
        language_select(),
    )
}

fn card_list(views: &[TweetView], empty_message: &str) -> String {
    if views.is_empty() {
        format!("<p class=\"empty\">{}</p>", escape(empty_message))
    } else {
        views.iter().map(tweet_card).collect()
    }
}

/// Previous/next pagination links. `base` already carries a `?`.
#[must_use]
pub fn pagination(base: &str, info: &PageInfo) -> String {
    if info.total_pages <= 1 {
        return String::new();
    }
    let mut nav = String::from("<nav class=\"pagination\">");
    if info.current_page > 1 {
        nav.push_str(&format!(
            "<a href=\"{base}page={}\">&laquo; newer</a>",
            info.current_page - 1
        ));
    }
    nav.push_str(&format!(
        "<span class=\"current\">{} / {}</span>",
        info.current_page, info.total_pages
    ));
    if info.current_page < info.total_pages {
        nav.push_str(&format!(
            "<a href=\"{base}page={}\">older &raquo;</a>",
            info.current_page + 1
        ));
    }
    nav.push_str("</nav>");
    nav
}

#[must_use]
pub fn timeline_page(views: &[TweetView], info: &PageInfo) -> String {
    let body = format!(
        "{}{}",
        card_list(views, "Nothing in the archive yet."),
        pagination("/?", info)
    );
    render_page("Timeline", &body)
}

#[must_use]
pub fn profile_page(user: &UserRow, views: &[TweetView], info: &PageInfo, banner: Option<&str>, avatar: &str) -> String {
    let banner_html = banner
        .map(|b| format!("<img class=\"banner\" src=\"{}\" alt=\"\">", escape(b)))
        .unwrap_or_default();
    let head = format!(
        "<div class=\"card\">{banner_html}\
         <div class=\"profile-head\"><img class=\"avatar\" src=\"{}\" alt=\"\">\
         <h2>{}</h2><div class=\"profile-meta\">@{} &middot; {} followers &middot; \
         {} following &middot; {} tweets</div><p>{}</p></div></div>",
        escape(avatar),
        escape(user.name.as_deref().unwrap_or("")),
        escape(user.nick.as_deref().unwrap_or("")),
        format_count(user.followers_count),
        format_count(user.friends_count),
        format_count(user.statuses_count),
        escape(user.description.as_deref().unwrap_or("")),
    );

    let media_section = format!(
        "<div class=\"section-title\">Media</div>\
         <div id=\"media-grid\" class=\"card\" data-user=\"{0}\" data-page=\"0\"></div>\
         <script>\
         async function loadMedia() {{\
           const grid = document.getElementById('media-grid');\
           const page = Number(grid.dataset.page) + 1;\
           const resp = await fetch('/api/user/' + grid.dataset.user + '/media?page=' + page);\
           const data = await resp.json();\
           if (data.success) {{ grid.insertAdjacentHTML('beforeend', data.html); grid.dataset.page = page; }}\
         }}\
         loadMedia();\
         </script>",
        user.user_id
    );

    let title = format!("{} (@{})", user.name.as_deref().unwrap_or(""), user.nick.as_deref().unwrap_or(""));
    let body = format!(
        "{head}{}{}{media_section}",
        card_list(views, "No tweets for this user."),
        pagination(&format!("/user/{}?", user.user_id), info)
    );
    render_page(&title, &body)
}

#[must_use]
pub fn tweet_page(view: &TweetView, related: &[TweetView]) -> String {
    let mut body = tweet_card(view);
    if !related.is_empty() {
        body.push_str("<div class=\"section-title\">Replies and quotes</div>");
        body.push_str(&card_list(related, ""));
    }
    render_page("Tweet", &body)
}

#[must_use]
pub fn search_page(query: &str, year: &str, month: &str, views: &[TweetView]) -> String {
    let filters: Vec<String> = [("q", query), ("year", year), ("month", month)]
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| format!("{k}={}", escape(v)))
        .collect();
    let heading = if filters.is_empty() {
        "<p class=\"empty\">Enter a search term or a year/month filter.</p>".to_string()
    } else {
        format!(
            "<div class=\"section-title\">Results for {}</div>",
            escape(&filters.join(", "))
        )
    };
    let body = format!("{heading}{}", card_list(views, "No matching tweets."));
    render_page("Search", &body)
}

#[must_use]
pub fn stats_page(stats: &StatsOverview, top_users: &[(TopUser, String)], top_tweets: &[TweetView]) -> String {
    let grid = format!(
        "<div class=\"card stats-grid\">\
         <div class=\"stat\"><div class=\"value\">{}</div><div class=\"key\">tweets</div></div>\
         <div class=\"stat\"><div class=\"value\">{}</div><div class=\"key\">users</div></div>\
         <div class=\"stat\"><div class=\"value\">{}</div><div class=\"key\">media files</div></div>\
         <div class=\"stat\"><div class=\"value\">{}</div><div class=\"key\">retweets</div></div>\
         <div class=\"stat\"><div class=\"value\">{}</div><div class=\"key\">replies</div></div>\
         <div class=\"stat\"><div class=\"value\">{}</div><div class=\"key\">quotes</div></div>\
         </div>",
        format_count(stats.total_tweets),
        format_count(stats.total_users),
        format_count(stats.total_media),
        format_count(stats.total_retweets),
        format_count(stats.total_replies),
        format_count(stats.total_quotes),
    );

    let users: String = top_users
        .iter()
        .map(|(entry, avatar)| {
            format!(
                "<div class=\"tweet-head\" style=\"margin-bottom:10px\">\
                 <img class=\"avatar\" src=\"{}\" alt=\"\">\
                 <div><div class=\"name\"><a href=\"/user/{}\">{}</a></div>\
                 <span class=\"nick\">@{} &middot; {} tweets</span></div></div>",
                escape(avatar),
                entry.user.user_id,
                escape(entry.user.name.as_deref().unwrap_or("")),
                escape(entry.user.nick.as_deref().unwrap_or("")),
                format_count(entry.tweet_count),
            )
        })
        .collect();

    let body = format!(
        "{grid}<div class=\"section-title\">Most active users</div>\
         <div class=\"card\">{users}</div>\
         <div class=\"section-title\">Most liked tweets</div>{}",
        card_list(top_tweets, "No tweets yet."),
    );
    render_page("Stats", &body)
}

#[must_use]
pub fn not_found_page(message: &str) -> String {
    let body = format!(
        "<div class=\"card\"><h2>Not found</h2><p>{}</p>\
         <p><a href=\"/\">Back to the timeline</a></p></div>",
        escape(message)
    );
    render_page("Not found", &body)
}

/// Media grid fragment for one page of a user's media tweets.
#[must_use]
pub fn media_fragment(views: &[TweetView]) -> String {
    views
        .iter()
        .flat_map(|view| view.tweet.media_files.iter())
        .map(|file| {
            let src = format!("/{}", escape(file));
            if file.to_lowercase().ends_with(".mp4") {
                format!("<video controls preload=\"metadata\" src=\"{src}\"></video>")
            } else {
                format!("<img loading=\"lazy\" src=\"{src}\" alt=\"\">")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(content: &str) -> TweetView {
        let mut row = TweetRow::default();
        row.tweet_id = 1;
        row.content = Some(content.to_string());
        row.date = Some("2023-06-15 10:30:00".to_string());
        TweetView::bare(row)
    }

    #[test]
    fn shell_substitution_fills_title_and_body() {
        let page = render_page("My <Title>", "<p>hello</p>");
        assert!(page.contains("<title>My &lt;Title&gt;</title>"));
        assert!(page.contains("<p>hello</p>"));
        assert!(!page.contains("{{body}}"));
    }

    #[test]
    fn card_includes_markup_and_translate_controls() {
        let card = tweet_card(&view("hello http://t.co/x1 world"));
        assert!(card.contains("view link"));
        assert!(card.contains("translateTweet"));
        assert!(card.contains("/tweet/1"));
    }

    #[test]
    fn embedded_relation_is_rendered() {
        let mut v = view("top");
        let mut inner = TweetRow::default();
        inner.tweet_id = 2;
        inner.content = Some("inner".to_string());
        v.quote = Some(Box::new(inner));
        let card = tweet_card(&v);
        assert!(card.contains("Quoting"));
        assert!(card.contains("inner"));
    }

    #[test]
    fn pagination_hides_for_single_page() {
        let one = PageInfo::new(1, 20, 5);
        assert!(pagination("/?", &one).is_empty());

        let many = PageInfo::new(2, 20, 65);
        let nav = pagination("/?", &many);
        assert!(nav.contains("page=1"));
        assert!(nav.contains("page=3"));
        assert!(nav.contains("2 / 4"));
    }

    #[test]
    fn media_fragment_distinguishes_video() {
        let mut v = view("x");
        v.tweet.media_files = vec!["img/1_a.jpg".to_string(), "img/1_b.mp4".to_string()];
        let fragment = media_fragment(&[v]);
        assert!(fragment.contains("<img"));
        assert!(fragment.contains("<video"));
    }
}
