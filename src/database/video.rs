use serde::Deserialize;
use snafu::{Location, OptionExt, ResultExt, Snafu};
use surrealdb::sql::{Id, Thing};

use super::Database;
use crate::model::{NewVideo, Video, VideoId, VideoPatch};

pub const VIDEO_TABLE: &str = "video";

/// The `WHERE` clause is false for a record that does not exist yet, which
/// stops `UPDATE` from creating it.
const UPDATE_VIDEO: &str =
    "UPDATE type::thing('video', $id) MERGE $patch WHERE id != NONE RETURN AFTER";

const DELETE_VIDEO: &str = "DELETE type::thing('video', $id) RETURN BEFORE";

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("video id taken"))]
    Conflict { id: VideoId },

    #[snafu(display("video {id} does not exist"))]
    NotFound { id: VideoId },

    #[snafu(display("failed to query the database at {location}: {source}"))]
    Query {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to parse the database response at {location}: response is empty"))]
    EmptyResponse {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("record `{thing}` does not have a numeric id"))]
    MalformedRecord { thing: String },
}

/// A row of the `video` table as SurrealDB returns it, keyed by a record id
/// rather than a bare integer.
#[derive(Debug, Deserialize)]
struct VideoRecord {
    id: Thing,
    name: String,
    views: i64,
    likes: i64,
}

impl TryFrom<VideoRecord> for Video {
    type Error = StoreError;

    fn try_from(record: VideoRecord) -> Result<Self> {
        let id = match &record.id.id {
            Id::Number(id) => *id,
            _ => {
                return MalformedRecordSnafu {
                    thing: record.id.to_string(),
                }
                .fail()
            }
        };

        Ok(Video {
            id,
            name: record.name,
            views: record.views,
            likes: record.likes,
        })
    }
}

/// Creating a record id that is already taken fails inside the datastore.
/// Embedded engines report it as [surrealdb::error::Db::RecordExists]. Remote
/// engines only forward the rendered message of a failed query, so for them
/// the message is the only signal.
fn is_record_exists(error: &surrealdb::Error) -> bool {
    match error {
        surrealdb::Error::Db(surrealdb::error::Db::RecordExists { .. }) => true,
        surrealdb::Error::Api(surrealdb::error::Api::Query(message)) => {
            message.contains("already exists")
        }
        _ => false,
    }
}

/// Statements that touch no record can answer with `NONE` instead of an
/// empty list, so rows are read as optional and the gaps dropped.
fn first_record(response: &mut surrealdb::Response) -> Result<Option<VideoRecord>> {
    let records: Vec<Option<VideoRecord>> = response.take(0).context(QuerySnafu)?;
    Ok(records.into_iter().flatten().next())
}

impl Video {
    #[tracing::instrument(skip(db))]
    pub async fn find<'a>(id: VideoId, db: impl Into<&'a Database>) -> Result<Option<Video>> {
        let record = db
            .into()
            .select::<Option<VideoRecord>>((VIDEO_TABLE, id))
            .await
            .context(QuerySnafu)?;

        record.map(Video::try_from).transpose()
    }

    /// Creates the record `video:<id>`. The uniqueness check and the write are
    /// a single statement, so of several concurrent inserts for one id exactly
    /// one succeeds and the rest get [StoreError::Conflict].
    #[tracing::instrument(skip(db))]
    pub async fn insert<'a>(
        id: VideoId, video: NewVideo, db: impl Into<&'a Database>,
    ) -> Result<Video> {
        let created = db
            .into()
            .create::<Option<VideoRecord>>((VIDEO_TABLE, id))
            .content(video)
            .await;

        let record = match created {
            Ok(record) => record.context(EmptyResponseSnafu)?,
            Err(error) if is_record_exists(&error) => return ConflictSnafu { id }.fail(),
            Err(error) => return Err(error).context(QuerySnafu),
        };

        Video::try_from(record)
    }

    /// Merges the supplied fields into an existing record. Never creates one.
    #[tracing::instrument(skip(db))]
    pub async fn update<'a>(
        id: VideoId, patch: VideoPatch, db: impl Into<&'a Database>,
    ) -> Result<Video> {
        let db = db.into();

        if patch.is_empty() {
            return Video::find(id, db).await?.context(NotFoundSnafu { id });
        }

        let mut response = db
            .query(UPDATE_VIDEO)
            .bind(("id", id))
            .bind(("patch", patch))
            .await
            .context(QuerySnafu)?;

        let record = first_record(&mut response)?.context(NotFoundSnafu { id })?;
        Video::try_from(record)
    }

    /// Removes the record and returns what it held.
    #[tracing::instrument(skip(db))]
    pub async fn delete<'a>(id: VideoId, db: impl Into<&'a Database>) -> Result<Video> {
        let mut response = db
            .into()
            .query(DELETE_VIDEO)
            .bind(("id", id))
            .await
            .context(QuerySnafu)?;

        let record = first_record(&mut response)?.context(NotFoundSnafu { id })?;
        Video::try_from(record)
    }
}
