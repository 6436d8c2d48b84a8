use crate::repository_from_request;
use bookmarks_dal::bookmark::BookmarkRepository;

use crate::state::AppState;
use axum::routing::get;

repository_from_request!(BookmarkRepository);

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(paths(
    crud_api::list,
    crud_api::get,
    crud_api::create,
    crud_api::update,
    crud_api::delete
))]
struct ModuleDocs;

#[cfg(feature = "openapi")]
pub fn api_docs() -> utoipa::openapi::OpenApi {
    use utoipa::OpenApi as _;
    ModuleDocs::openapi()
}

pub mod crud_api {
    use axum::{body::Bytes, extract::Path, response::IntoResponse, Json};
    use bookmarks_dal::bookmark::{Bookmark, BookmarkRepository, CreateBookmark, UpdateBookmark};
    use http::StatusCode;
    use tracing::{error, info};

    use crate::{
        error::{ApiError, ApiResult},
        sanitize::{sanitize, sanitize_all},
        validate::Garde,
    };

    async fn existing(repository: &BookmarkRepository, id: i64) -> ApiResult<Bookmark> {
        repository.get(id).await?.ok_or_else(|| {
            error!("Bookmark with id {id} not found.");
            ApiError::ResourceNotFound
        })
    }

    fn parse_patch(body: &[u8]) -> ApiResult<UpdateBookmark> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(UpdateBookmark::default());
        }
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidPayload(e.to_string()))
    }

    #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "", tag = "Bookmark", operation_id = "listBookmarks",
        responses((status = StatusCode::OK, description = "All bookmarks", body = Vec<Bookmark>))))]
    pub async fn list(repository: BookmarkRepository) -> ApiResult<impl IntoResponse> {
        let records = repository.list_all().await?;
        Ok((StatusCode::OK, Json(sanitize_all(records))))
    }

    #[cfg_attr(feature = "openapi",  utoipa::path(get, path = "/{id}", tag = "Bookmark", operation_id = "getBookmark",
        params(("id" = i64, Path, description = "Bookmark id")),
        responses((status = StatusCode::OK, description = "Get one", body = Bookmark),
            (status = StatusCode::NOT_FOUND, description = "No such bookmark"))))]
    pub async fn get(
        Path(id): Path<i64>,
        repository: BookmarkRepository,
    ) -> ApiResult<impl IntoResponse> {
        let record = existing(&repository, id).await?;

        Ok((StatusCode::OK, Json(sanitize(record))))
    }

    #[cfg_attr(feature = "openapi",  utoipa::path(post, path = "", tag = "Bookmark", operation_id = "createBookmark",
        request_body = CreateBookmark,
        responses((status = StatusCode::CREATED, description = "Created Bookmark", body = Bookmark),
            (status = StatusCode::BAD_REQUEST, description = "Missing field or invalid rating"))))]
    pub async fn create(
        repository: BookmarkRepository,
        Garde(Json(payload)): Garde<Json<CreateBookmark>>,
    ) -> ApiResult<impl IntoResponse> {
        let record = repository.create(payload).await?;
        info!("Bookmark with id {} created.", record.id);

        Ok((StatusCode::CREATED, Json(sanitize(record))))
    }

    /// The body is parsed only after the bookmark is known to exist.
    #[cfg_attr(feature = "openapi",  utoipa::path(patch, path = "/{id}", tag = "Bookmark", operation_id = "updateBookmark",
        params(("id" = i64, Path, description = "Bookmark id")),
        request_body = UpdateBookmark,
        responses((status = StatusCode::NO_CONTENT, description = "Updated"),
            (status = StatusCode::BAD_REQUEST, description = "No updatable field in body"),
            (status = StatusCode::NOT_FOUND, description = "No such bookmark"))))]
    pub async fn update(
        Path(id): Path<i64>,
        repository: BookmarkRepository,
        body: Bytes,
    ) -> ApiResult<impl IntoResponse> {
        existing(&repository, id).await?;
        let payload = parse_patch(&body)?;
        payload.check()?;

        repository.update(id, payload).await?;
        info!("Bookmark with id {id} updated.");

        Ok(StatusCode::NO_CONTENT)
    }

    #[cfg_attr(feature = "openapi",  utoipa::path(delete, path = "/{id}", tag = "Bookmark", operation_id = "deleteBookmark",
        params(("id" = i64, Path, description = "Bookmark id")),
        responses((status = StatusCode::NO_CONTENT, description = "Deleted"),
            (status = StatusCode::NOT_FOUND, description = "No such bookmark"))))]
    pub async fn delete(
        Path(id): Path<i64>,
        repository: BookmarkRepository,
    ) -> ApiResult<impl IntoResponse> {
        existing(&repository, id).await?;
        repository.delete(id).await?;
        info!("Bookmark with id {id} deleted.");

        Ok(StatusCode::NO_CONTENT)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_patch() {
            assert!(parse_patch(b"").unwrap().is_empty());
            assert!(parse_patch(b"  \n").unwrap().is_empty());

            let patch = parse_patch(br#"{"title":"new","ignored":1}"#).unwrap();
            assert_eq!(patch.title(), Some("new"));

            assert!(matches!(
                parse_patch(b"{not json"),
                Err(ApiError::InvalidPayload(_))
            ));
        }
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(crud_api::list).post(crud_api::create))
        .route(
            "/{id}",
            get(crud_api::get)
                .patch(crud_api::update)
                .delete(crud_api::delete),
        )
}
