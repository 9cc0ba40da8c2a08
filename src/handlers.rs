//! Request handlers for the page routes and the JSON API.

use crate::error::{Result, XvError};
use crate::html;
use crate::model::{PageInfo, TweetRow, TweetView};
use crate::resolve::Resolver;
use crate::server::AppContext;
use crate::translate::{Detection, Translation, SUPPORTED_LANGUAGES};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub content: String,
    pub target_lang: Option<String>,
    pub source_lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub content: String,
}

/// Resolve relations and apply display formatting to a list of rows.
fn present(ctx: &AppContext, rows: Vec<TweetRow>) -> Result<Vec<TweetView>> {
    let resolver = Resolver::new(&ctx.storage);
    let mut views = resolver.resolve_all(rows)?;
    for view in &mut views {
        ctx.formatter.apply_view(view);
    }
    Ok(views)
}

pub async fn timeline(
    State(ctx): State<AppContext>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>> {
    let total = ctx.storage.count_tweets()?;
    let info = PageInfo::new(query.page.unwrap_or(1), ctx.view.per_page, total);
    let rows = ctx.storage.timeline(info.current_page, info.per_page)?;
    let views = present(&ctx, rows)?;
    Ok(Html(html::timeline_page(&views, &info)))
}

pub async fn profile(
    State(ctx): State<AppContext>,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>> {
    let user = ctx
        .storage
        .user_by_id(user_id)?
        .ok_or_else(|| XvError::not_found("user", user_id))?;

    let total = ctx.storage.count_profile_tweets(user_id)?;
    let info = PageInfo::new(query.page.unwrap_or(1), ctx.view.per_page, total);
    let rows = ctx
        .storage
        .profile_tweets(user_id, info.current_page, info.per_page)?;
    let views = present(&ctx, rows)?;

    let avatar = ctx
        .formatter
        .local_avatar(Some(user_id), user.profile_image.as_deref());
    let banner = ctx
        .formatter
        .local_banner(Some(user_id), user.profile_banner.as_deref());
    Ok(Html(html::profile_page(
        &user,
        &views,
        &info,
        banner.as_deref(),
        &avatar,
    )))
}

pub async fn tweet_detail(
    State(ctx): State<AppContext>,
    Path(tweet_id): Path<i64>,
) -> Result<Html<String>> {
    let row = ctx
        .storage
        .tweet_by_id(tweet_id)?
        .ok_or_else(|| XvError::not_found("tweet", tweet_id))?;

    let resolver = Resolver::new(&ctx.storage);
    let mut view = resolver.resolve(row)?;
    ctx.formatter.apply_view(&mut view);

    let related_rows = ctx
        .storage
        .related_tweets(tweet_id, ctx.view.related_limit)?;
    let related = present(&ctx, related_rows)?;
    Ok(Html(html::tweet_page(&view, &related)))
}

pub async fn search(
    State(ctx): State<AppContext>,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>> {
    let rows = ctx.storage.search_tweets(
        query.q.as_deref(),
        query.year.as_deref(),
        query.month.as_deref(),
        ctx.view.search_limit,
    )?;
    let views = present(&ctx, rows)?;
    Ok(Html(html::search_page(
        query.q.as_deref().unwrap_or(""),
        query.year.as_deref().unwrap_or(""),
        query.month.as_deref().unwrap_or(""),
        &views,
    )))
}

pub async fn stats(State(ctx): State<AppContext>) -> Result<Html<String>> {
    let overview = ctx.storage.stats_overview()?;
    let top_users: Vec<_> = ctx
        .storage
        .top_users(10)?
        .into_iter()
        .map(|entry| {
            let avatar = ctx
                .formatter
                .local_avatar(Some(entry.user.user_id), entry.user.profile_image.as_deref());
            (entry, avatar)
        })
        .collect();
    let top_rows = ctx.storage.top_tweets(10)?;
    let top_tweets = present(&ctx, top_rows)?;
    Ok(Html(html::stats_page(&overview, &top_users, &top_tweets)))
}

pub async fn translate(
    State(ctx): State<AppContext>,
    Json(request): Json<TranslateRequest>,
) -> Json<Translation> {
    let target = request.target_lang.as_deref().unwrap_or("zh");
    let source = request.source_lang.as_deref().unwrap_or("auto");
    Json(ctx.translator.translate(&request.content, target, source).await)
}

pub async fn detect(
    State(ctx): State<AppContext>,
    Json(request): Json<DetectRequest>,
) -> Json<Detection> {
    Json(ctx.translator.detect_language(&request.content).await)
}

pub async fn languages() -> Json<serde_json::Value> {
    let table: serde_json::Map<String, serde_json::Value> = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| ((*code).to_string(), json!(name)))
        .collect();
    Json(json!({ "success": true, "languages": table }))
}

pub async fn user_media(
    State(ctx): State<AppContext>,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<serde_json::Value>> {
    let page = query.page.unwrap_or(1);
    let (rows, total) = ctx
        .storage
        .media_tweets_for_user(user_id, page, ctx.view.per_page)?;
    let views = present(&ctx, rows)?;
    Ok(Json(json!({
        "success": true,
        "html": html::media_fragment(&views),
        "total": total,
    })))
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(html::not_found_page("That page does not exist.")),
    )
        .into_response()
}
