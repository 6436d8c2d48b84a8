use crate::error::Result;
use futures::TryStreamExt as _;
use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::Pool;
use tracing::debug;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing '{0}' in request body")]
    MissingField(&'static str),
    #[error("Rating must be a number between 1 and 5")]
    InvalidRating,
    #[error("Request body must contain either 'title', 'url', 'description', or 'rating'")]
    EmptyUpdate,
}

/// Rating as sent by clients, either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingInput(Value);

impl RatingInput {
    pub fn new(value: impl Into<Value>) -> Self {
        RatingInput(value.into())
    }

    /// Integer value of the rating, `None` if it is not an integer.
    pub fn value(&self) -> Option<i64> {
        match &self.0 {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.value()
            .is_some_and(|r| (MIN_RATING..=MAX_RATING).contains(&r))
    }

    fn is_truthy(&self) -> bool {
        match &self.0 {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64() != Some(0.0),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }
}

fn default_rating() -> Option<RatingInput> {
    Some(RatingInput::new(MIN_RATING))
}

/// Payload for a new bookmark.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateBookmark {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_rating")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub rating: Option<RatingInput>,
}

impl CreateBookmark {
    /// Walks `title`, `url`, `description`, `rating` in this order and
    /// returns the first failure. At every field presence is checked first,
    /// then the rating range, so a present `title` with a bad rating is an
    /// invalid rating even when `url` is missing.
    pub fn check(&self) -> Result<(), ValidationError> {
        let fields = [
            ("title", self.title.is_some()),
            ("url", self.url.is_some()),
            ("description", self.description.is_some()),
            ("rating", self.rating.is_some()),
        ];
        let bad_rating = self.rating.as_ref().is_some_and(|r| !r.is_valid());

        for (name, present) in fields {
            if !present {
                return Err(ValidationError::MissingField(name));
            }
            if bad_rating {
                return Err(ValidationError::InvalidRating);
            }
        }
        Ok(())
    }
}

impl Validate for CreateBookmark {
    type Context = ();

    fn validate_into(
        &self,
        _ctx: &Self::Context,
        parent: &mut dyn FnMut() -> garde::Path,
        report: &mut garde::Report,
    ) {
        if let Err(e) = self.check() {
            report.append(parent(), garde::Error::new(e.to_string()));
        }
    }
}

/// Partial update, only truthy fields are applied.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateBookmark {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub rating: Option<RatingInput>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl UpdateBookmark {
    pub fn title(&self) -> Option<&str> {
        non_empty(&self.title)
    }

    pub fn url(&self) -> Option<&str> {
        non_empty(&self.url)
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(&self.description)
    }

    pub fn rating(&self) -> Option<&RatingInput> {
        self.rating.as_ref().filter(|r| r.is_truthy())
    }

    pub fn is_empty(&self) -> bool {
        self.title().is_none()
            && self.url().is_none()
            && self.description().is_none()
            && self.rating().is_none()
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }
        match self.rating() {
            Some(rating) if !rating.is_valid() => Err(ValidationError::InvalidRating),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub rating: i64,
}

pub type BookmarkRepository = BookmarkRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct BookmarkRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> BookmarkRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Inserts a validated payload and returns the stored record.
    pub async fn create(&self, payload: CreateBookmark) -> Result<Bookmark> {
        let rating = payload.rating.as_ref().and_then(RatingInput::value);
        let result = sqlx::query(
            "INSERT INTO bookmarks (title, url, description, rating) VALUES (?, ?, ?, ?)",
        )
        .bind(&payload.title)
        .bind(&payload.url)
        .bind(&payload.description)
        .bind(rating)
        .execute(&self.executor)
        .await?;

        let id = result.last_insert_rowid();
        let record = sqlx::query_as::<_, Bookmark>("SELECT * FROM bookmarks WHERE id = ?")
            .bind(id)
            .fetch_one(&self.executor)
            .await?;
        Ok(record)
    }

    pub async fn list_all(&self) -> Result<Vec<Bookmark>> {
        let records = sqlx::query_as::<_, Bookmark>("SELECT * FROM bookmarks ORDER BY id")
            .fetch(&self.executor)
            .try_collect::<Vec<_>>()
            .await?;
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Bookmark>> {
        let record = sqlx::query_as::<_, Bookmark>("SELECT * FROM bookmarks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.executor)
            .await?;
        Ok(record)
    }

    /// Returns number of affected rows, 0 if there is no such bookmark.
    pub async fn update(&self, id: i64, payload: UpdateBookmark) -> Result<u64> {
        let rating = payload.rating().and_then(RatingInput::value);
        let result = sqlx::query(
            "UPDATE bookmarks SET title = COALESCE(?, title), url = COALESCE(?, url), \
            description = COALESCE(?, description), rating = COALESCE(?, rating) WHERE id = ?",
        )
        .bind(payload.title())
        .bind(payload.url())
        .bind(payload.description())
        .bind(rating)
        .bind(id)
        .execute(&self.executor)
        .await?;

        debug!("Updated {} rows for bookmark {id}", result.rows_affected());
        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: i64) -> Result<u64> {
        let res = sqlx::query("DELETE FROM bookmarks WHERE id = ?")
            .bind(id)
            .execute(&self.executor)
            .await?;
        Ok(res.rows_affected())
    }

    pub async fn delete_all(&self) -> Result<u64> {
        let res = sqlx::query("DELETE FROM bookmarks")
            .execute(&self.executor)
            .await?;
        Ok(res.rows_affected())
    }
}
