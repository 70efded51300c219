//! Defines the 404 page and its route handler.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The requested resource does not exist.
#[derive(Debug, Default)]
pub struct NotFoundError;

impl IntoResponse for NotFoundError {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            Html(
                error_view(
                    "Página não encontrada",
                    "404",
                    "Página não encontrada.",
                    "Verifique o endereço e tente novamente.",
                )
                .into_string(),
            ),
        )
            .into_response()
    }
}

/// The fallback handler for unknown routes.
pub async fn get_404_not_found() -> Response {
    NotFoundError.into_response()
}
