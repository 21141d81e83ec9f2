use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use axum_template::RenderHtml;
use serde::Serialize;
use snafu::ResultExt;
use tracing::instrument;

use super::error::*;
use super::form::VideoForm;
use super::templates::{DETAIL, EDIT, LIST};
use super::{App, Result};
use crate::model::{Video, VideoId};
use crate::session::Profile;

#[derive(Debug, Serialize)]
struct ListPage {
    videos: Vec<Video>,
    mine: bool,
    profile: Option<Profile>,
}

#[derive(Debug, Serialize)]
struct DetailPage {
    created_by: String,
    video: Video,
    profile: Option<Profile>,
}

#[derive(Debug, Serialize)]
struct EditPage {
    heading: &'static str,
    action: String,
    video: Video,
    profile: Option<Profile>,
}

/// `302 Found` pointing at `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

fn parse_id(id: &str) -> Result<VideoId> {
    id.parse().context(BadVideoIdSnafu { id })
}

pub async fn root() -> Response {
    found("/videos")
}

pub async fn health() -> &'static str {
    "ok"
}

#[instrument(skip_all)]
pub async fn list(State(app): State<App>, jar: SignedCookieJar) -> Result<impl IntoResponse> {
    let videos = app.videos().list_videos().await.context(ListVideosSnafu)?;

    let page = ListPage {
        videos,
        mine: false,
        profile: Profile::from_jar(&jar),
    };
    Ok(RenderHtml(LIST, app.engine, page))
}

#[instrument(skip_all)]
pub async fn list_mine(State(app): State<App>, jar: SignedCookieJar) -> Result<Response> {
    let Some(profile) = Profile::from_jar(&jar) else {
        return Ok(found("/videos"));
    };

    let videos = app
        .videos()
        .list_videos_created_by(&profile.id)
        .await
        .context(ListVideosSnafu)?;

    let page = ListPage {
        videos,
        mine: true,
        profile: Some(profile),
    };
    Ok(RenderHtml(LIST, app.engine, page).into_response())
}

#[instrument(skip(app, jar))]
pub async fn detail(
    State(app): State<App>,
    jar: SignedCookieJar,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;
    let video = app.videos().get_video(id).await.context(FindVideoSnafu)?;

    let page = DetailPage {
        created_by: video.created_by_display_name().to_string(),
        video,
        profile: Profile::from_jar(&jar),
    };
    Ok(RenderHtml(DETAIL, app.engine, page))
}

#[instrument(skip_all)]
pub async fn add_form(State(app): State<App>, jar: SignedCookieJar) -> impl IntoResponse {
    let page = EditPage {
        heading: "Add video",
        action: "/videos".to_string(),
        video: Video::default(),
        profile: Profile::from_jar(&jar),
    };
    RenderHtml(EDIT, app.engine, page)
}

#[instrument(skip(app, jar))]
pub async fn edit_form(
    State(app): State<App>,
    jar: SignedCookieJar,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;
    let video = app.videos().get_video(id).await.context(FindVideoSnafu)?;

    let page = EditPage {
        heading: "Edit video",
        action: format!("/videos/{id}"),
        video,
        profile: Profile::from_jar(&jar),
    };
    Ok(RenderHtml(EDIT, app.engine, page))
}

#[instrument(skip_all)]
pub async fn create(
    State(app): State<App>,
    jar: SignedCookieJar,
    multipart: Multipart,
) -> Result<Response> {
    let profile = Profile::from_jar(&jar);
    let video = VideoForm::from_multipart(multipart)
        .await
        .context(ParseFormSnafu)?
        .into_video(app.media(), profile.as_ref())
        .await
        .context(ParseFormSnafu)?;

    let id = app.videos().add_video(&video).await.context(SaveVideoSnafu)?;

    tracing::info!(id, title = %video.title, "video added");
    Ok(found(&format!("/videos/{id}")))
}

#[instrument(skip(app, jar, multipart))]
pub async fn update(
    State(app): State<App>,
    jar: SignedCookieJar,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let id = parse_id(&id)?;
    let profile = Profile::from_jar(&jar);
    let mut video = VideoForm::from_multipart(multipart)
        .await
        .context(ParseFormSnafu)?
        .into_video(app.media(), profile.as_ref())
        .await
        .context(ParseFormSnafu)?;
    video.id = id;

    app.videos()
        .update_video(&video)
        .await
        .context(UpdateVideoSnafu)?;

    Ok(found(&format!("/videos/{id}")))
}

#[instrument(skip(app))]
pub async fn delete(State(app): State<App>, Path(id): Path<String>) -> Result<Response> {
    let id = parse_id(&id)?;
    app.videos().delete_video(id).await.context(DeleteVideoSnafu)?;

    Ok(found("/videos"))
}

pub async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    (Profile::clear(jar), found("/videos"))
}
