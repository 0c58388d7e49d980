//! Turns request bodies into typed arguments.
//!
//! Bodies are JSON objects or url-encoded forms. A missing body counts as no
//! arguments, a `null` value counts as an absent field and unknown fields are
//! ignored. Integers may be sent as numbers or as decimal text, which is the
//! only way a form can carry them. Parsing stops at the first invalid argument.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, FormRejection, JsonRejection};
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::Value;
use snafu::{OptionExt, ResultExt, Snafu};

use super::ApiError;
use crate::model::{NewVideo, VideoPatch, MAX_NAME_LENGTH};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ValidationError {
    #[snafu(display("cannot read the request body: {source}"))]
    ReadBody { source: BytesRejection },

    #[snafu(display("request body must be a JSON object: {source}"))]
    MalformedJson { source: JsonRejection },

    #[snafu(display("request body must be a url-encoded form: {source}"))]
    MalformedForm { source: FormRejection },

    #[snafu(display("{help}"))]
    MissingField {
        field: &'static str,
        help: &'static str,
    },

    #[snafu(display("{field} must be {expected}"))]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[snafu(display("Video needs a name"))]
    EmptyName,

    #[snafu(display("name is {length} characters long, at most {max} are allowed"))]
    NameTooLong { length: usize, max: usize },
}

impl ValidationError {
    /// The argument that failed validation, if the error is about one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingField { field, .. }
            | ValidationError::InvalidType { field, .. } => Some(*field),
            ValidationError::EmptyName | ValidationError::NameTooLong { .. } => Some("name"),
            ValidationError::ReadBody { .. }
            | ValidationError::MalformedJson { .. }
            | ValidationError::MalformedForm { .. } => None,
        }
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        ApiError::InvalidArguments { source: self }.into_response()
    }
}

/// Video arguments as the client sent them, before any type checks.
#[derive(Debug, Default, Deserialize)]
pub struct VideoArgs {
    pub name: Option<Value>,
    pub views: Option<Value>,
    pub likes: Option<Value>,
}

#[async_trait]
impl<S> FromRequest<S> for VideoArgs
where
    S: Send + Sync,
{
    type Rejection = ValidationError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&request) {
            let Form(args) = Form::<VideoArgs>::from_request(request, state)
                .await
                .context(MalformedFormSnafu)?;
            return Ok(args);
        }

        let body = Bytes::from_request(request, state)
            .await
            .context(ReadBodySnafu)?;

        if body.iter().all(|byte| byte.is_ascii_whitespace()) {
            return Ok(VideoArgs::default());
        }

        let Json(args) = Json::<VideoArgs>::from_bytes(&body).context(MalformedJsonSnafu)?;
        Ok(args)
    }
}

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

impl VideoArgs {
    /// Arguments for creating a video: `name`, `views` and `likes` are required.
    pub fn new_video(self) -> Result<NewVideo, ValidationError> {
        let name = text("name", self.name)?.context(MissingFieldSnafu {
            field: "name",
            help: "Video needs a name",
        })?;
        let name = check_name(name)?;

        let views = integer("views", self.views)?.context(MissingFieldSnafu {
            field: "views",
            help: "Video needs views",
        })?;

        let likes = integer("likes", self.likes)?.context(MissingFieldSnafu {
            field: "likes",
            help: "Video needs likes",
        })?;

        Ok(NewVideo::new(name, views, likes))
    }

    /// Arguments for a partial update: every field is optional.
    pub fn video_patch(self) -> Result<VideoPatch, ValidationError> {
        Ok(VideoPatch {
            name: text("name", self.name)?.map(check_name).transpose()?,
            views: integer("views", self.views)?,
            likes: integer("likes", self.likes)?,
        })
    }
}

fn text(field: &'static str, value: Option<Value>) -> Result<Option<String>, ValidationError> {
    match value {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(_) => InvalidTypeSnafu {
            field,
            expected: "a string",
        }
        .fail(),
    }
}

fn integer(field: &'static str, value: Option<Value>) -> Result<Option<i64>, ValidationError> {
    let number = match value {
        None => return Ok(None),
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        Some(_) => None,
    };

    number
        .context(InvalidTypeSnafu {
            field,
            expected: "an integer",
        })
        .map(Some)
}

fn check_name(name: String) -> Result<String, ValidationError> {
    if name.is_empty() {
        return EmptyNameSnafu.fail();
    }

    let length = name.chars().count();
    if length > MAX_NAME_LENGTH {
        return NameTooLongSnafu {
            length,
            max: MAX_NAME_LENGTH,
        }
        .fail();
    }

    Ok(name)
}
