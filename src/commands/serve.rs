use std::net::SocketAddr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::info;
use urlencoding::encode;

use crate::controllers::paste;
use crate::types::api::{
    CreateParams, CreatedPaste, ErrorDetail, PasteContent, PasteMeta, ViewParams,
};
use crate::types::{ContentView, DeniedReason, InfoView};
use crate::App;

pub async fn run(app: App) -> anyhow::Result<()> {
    app.database.initialize().await?;

    let addr = SocketAddr::from(([127, 0, 0, 1], app.config.port));
    info!("listening on {addr}");

    axum::Server::bind(&addr)
        .serve(router(app).into_make_service())
        .await?;

    Ok(())
}

pub fn router(app: App) -> Router {
    Router::new()
        .route("/create", post(create_paste))
        .route("/create/", post(create_paste))
        .route("/view/:url_id", get(view_paste))
        .route("/info/:url_id", get(paste_info))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

async fn create_paste(
    State(app): State<App>,
    Query(params): Query<CreateParams>,
) -> crate::AppResult<Json<CreatedPaste>> {
    let paste = paste::create(&app, params.into()).await?;

    let url = format!(
        "{base_url}view/{url_id}",
        base_url = app.config.base_url,
        url_id = encode(&paste.url_id)
    );

    Ok(Json(CreatedPaste {
        url,
        url_id: paste.url_id,
    }))
}

async fn view_paste(
    State(app): State<App>,
    Path(url_id): Path<String>,
    Query(params): Query<ViewParams>,
) -> crate::AppResult<Response> {
    let view = paste::view_content(&app, &url_id, params.password.as_deref()).await?;

    Ok(match view {
        ContentView::Content {
            content,
            owner_label,
        } => Json(PasteContent {
            content,
            user_id: owner_label,
        })
        .into_response(),
        ContentView::Denied(reason) => denied(reason),
        ContentView::NotFound => not_found(),
    })
}

async fn paste_info(
    State(app): State<App>,
    Path(url_id): Path<String>,
) -> crate::AppResult<Response> {
    Ok(match paste::view_info(&app, &url_id).await? {
        InfoView::Info(info) => Json(PasteMeta::from(info)).into_response(),
        InfoView::NotFound => not_found(),
    })
}

fn denied(reason: DeniedReason) -> Response {
    let body = ErrorDetail {
        detail: reason.message().to_owned(),
        reason: Some(reason),
    };
    (StatusCode::FORBIDDEN, Json(body)).into_response()
}

fn not_found() -> Response {
    let body = ErrorDetail {
        detail: "Paste not found".to_owned(),
        reason: None,
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
