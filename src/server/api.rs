use crate::mediator::{ ChatMediator, MediatorError };
use crate::models::chat::{ ChatRequest, ChatResponse, ErrorResponse };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::post,
    Router,
    Json,
    extract::{ State, rejection::JsonRejection },
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, error };

#[derive(Clone)]
struct AppState {
    mediator: Arc<ChatMediator>,
}

pub async fn start_http_server(
    http_port: u16,
    mediator: Arc<ChatMediator>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = format!("0.0.0.0:{}", http_port).parse::<SocketAddr>()?;
    info!("Starting HTTP API server on: http://{}", addr);

    let app = router(mediator);

    tokio::spawn(async move {
        match tokio::net::TcpListener::bind(addr).await {
            Ok(listener) => {
                if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                    error!("HTTP server error: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            }
        }
    });

    info!("HTTP server started");
    Ok(())
}

pub(crate) fn router(mediator: Arc<ChatMediator>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .fallback(not_found_handler)
        .layer(cors)
        .with_state(AppState { mediator })
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>
) -> Response {
    let Json(req) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            error!("Rejected chat request body: {}", rejection);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: rejection.to_string() }),
            ).into_response();
        }
    };

    match state.mediator.mediate(req.messages).await {
        Ok(envelope) => (StatusCode::OK, Json(ChatResponse { message: envelope })).into_response(),
        Err(e @ MediatorError::EmptyConversation) =>
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e.to_string() })).into_response(),
        Err(e) => {
            error!("Error in /api/chat: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: e.to_string() }),
            ).into_response()
        }
    }
}

async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse { error: "Not found".to_string() })).into_response()
}
