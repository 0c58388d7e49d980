use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use snafu::{OptionExt, ResultExt};
use tracing::instrument;

use super::validation::{ValidationError, VideoArgs};
use super::{
    App, InvalidArgumentsSnafu, InvalidVideoIdSnafu, NoSuchVideoSnafu, Result, VideoIdTakenSnafu,
    VideoNotFoundSnafu,
};
use crate::model::{Video, VideoId};

fn parse_id(text: &str) -> Result<VideoId> {
    text.parse().ok().context(InvalidVideoIdSnafu { text })
}

#[instrument(skip(app))]
pub async fn read(State(app): State<App>, Path(video_id): Path<String>) -> Result<Json<Video>> {
    let id = parse_id(&video_id)?;

    let video = Video::find(id, &app)
        .await?
        .context(VideoNotFoundSnafu { id })?;

    Ok(Json(video))
}

/// A taken id is reported ahead of invalid arguments.
#[instrument(skip(app, args))]
pub async fn create(
    State(app): State<App>, Path(video_id): Path<String>,
    args: Result<VideoArgs, ValidationError>,
) -> Result<(StatusCode, Json<Video>)> {
    let id = parse_id(&video_id)?;

    let args = match args.and_then(VideoArgs::new_video) {
        Ok(args) => args,
        Err(error) => {
            if Video::find(id, &app).await?.is_some() {
                return VideoIdTakenSnafu { id }.fail();
            }
            return Err(error).context(InvalidArgumentsSnafu);
        }
    };

    let video = Video::insert(id, args, &app).await?;
    tracing::info!(id, "created video");

    Ok((StatusCode::CREATED, Json(video)))
}

/// A missing video is reported ahead of invalid arguments.
#[instrument(skip(app, args))]
pub async fn update(
    State(app): State<App>, Path(video_id): Path<String>,
    args: Result<VideoArgs, ValidationError>,
) -> Result<Json<Video>> {
    let id = parse_id(&video_id)?;

    let patch = match args.and_then(VideoArgs::video_patch) {
        Ok(patch) => patch,
        Err(error) => {
            if Video::find(id, &app).await?.is_none() {
                return NoSuchVideoSnafu { id }.fail();
            }
            return Err(error).context(InvalidArgumentsSnafu);
        }
    };

    let video = Video::update(id, patch, &app).await?;
    tracing::info!(id, "updated video");

    Ok(Json(video))
}

#[instrument(skip(app))]
pub async fn remove(State(app): State<App>, Path(video_id): Path<String>) -> Result<StatusCode> {
    let id = parse_id(&video_id)?;

    Video::delete(id, &app).await?;
    tracing::info!(id, "deleted video");

    Ok(StatusCode::NO_CONTENT)
}
