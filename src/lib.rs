pub mod app_state;
pub mod config;
pub mod encode;
pub mod error;
pub mod fal;
pub mod middleware;
pub mod routes;
pub mod ui;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Extension};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tracing::info;

//
// Re-export
//
pub use app_state::AppState;
pub use config::Config;
pub use encode::{MAX_UPLOAD_BYTES, Upload};
pub use error::{ApiError, ErrorResponse};
pub use fal::{
    AURA_SR_MODEL, FalClient, FalError, LUMA_DREAM_MACHINE_MODEL, Text2VideoInput, UpscaleInput,
};
pub use routes::{Text2VideoRequest, Text2VideoResponse, UpscaleResponse};
pub use ui::{ComparisonSlider, UpscalerPage, VidifyPage};

pub async fn run(config: Config) {
    let listen_on_port = config.listen_on_port;

    let state = AppState::new(&config).expect("Failed to create app state");

    // CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/image-upscale", post(routes::upscale_image))
        .route("/api/text2video", post(routes::text_to_video))
        .route("/healthz", get(routes::healthz))
        // The body limit sits above the 10 MB upload cap plus multipart
        // framing, so oversized uploads reach the handler's own validation
        // and get a 400 instead of a bare 413
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024))
        .layer(axum::middleware::from_fn(middleware::log_request_outcome))
        .layer(cors)
        .layer(Extension(state));

    let addr = format!("0.0.0.0:{listen_on_port}");
    info!("Listening on {addr}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
