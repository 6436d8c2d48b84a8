use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use garde::{Report, Validate};
use std::error::Error;
use std::ops::Deref;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor running garde validation on the extracted value.
///
/// Any rejection is rendered in the same error envelope as other API errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Garde<E>(pub E);

impl<E> Deref for Garde<E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug)]
pub enum ValidationRejection<V, E> {
    /// Extracted value failed validation
    Valid(V),
    /// Inner extractor failed
    Inner(E),
}

/// Message of the innermost useful error, for JSON rejections this is the
/// serde message with the path to the offending field.
fn inner_message(error: &dyn Error) -> String {
    error
        .source()
        .map(|source| source.to_string())
        .unwrap_or_else(|| error.to_string())
}

impl<V: Into<ApiError>, E: Error> IntoResponse for ValidationRejection<V, E> {
    fn into_response(self) -> Response {
        let error: ApiError = match self {
            ValidationRejection::Valid(v) => v.into(),
            ValidationRejection::Inner(e) => ApiError::InvalidPayload(inner_message(&e)),
        };
        error.into_response()
    }
}

pub type GardeRejection<E> = ValidationRejection<Report, E>;

impl<E> From<Report> for GardeRejection<E> {
    fn from(value: Report) -> Self {
        Self::Valid(value)
    }
}

impl<Extractor, T> FromRequest<AppState> for Garde<Extractor>
where
    T: Validate<Context = ()>,
    Extractor: Deref<Target = T> + FromRequest<AppState>,
    <Extractor as FromRequest<AppState>>::Rejection: Error,
{
    type Rejection = GardeRejection<<Extractor as FromRequest<AppState>>::Rejection>;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let inner = Extractor::from_request(req, state)
            .await
            .map_err(GardeRejection::Inner)?;

        inner.deref().validate()?;
        Ok(Garde(inner))
    }
}
