use anyhow::Result;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post},
    Extension, Router,
};
use sqlx::PgPool;
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;
use utoipa_swagger_ui::SwaggerUi;

use crate::{auth::SharedResolver, festival::SharedFestivalService};

pub mod handlers;
mod openapi;
pub mod response;

pub use openapi::openapi;

use handlers::{festivals, health};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Collaborators the router needs at runtime.
#[derive(Clone)]
pub struct AppState {
    pub festivals: SharedFestivalService,
    pub resolver: SharedResolver,
    /// Present when festivals are stored in Postgres; drives the health check.
    pub pool: Option<PgPool>,
}

/// Route table: method + path to handler, nothing inferred.
#[must_use]
pub fn router() -> Router {
    let festival_routes = Router::new()
        .route(
            "/festivals",
            post(festivals::create_festival).get(festivals::list_festivals),
        )
        .route(
            "/festivals/:festival_id",
            get(festivals::get_festival)
                .put(festivals::update_festival)
                .delete(festivals::delete_festival),
        );

    Router::new()
        .nest("/api", festival_routes)
        .route("/health", get(health::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi()))
}

/// Router with the festival service and principal resolver attached.
#[must_use]
pub fn app(festivals: SharedFestivalService, resolver: SharedResolver) -> Router {
    router()
        .layer(Extension(festivals))
        .layer(Extension(resolver))
}

/// Start the server
/// # Errors
/// Return error if failed to bind or serve
pub async fn new(port: u16, state: AppState, cors_origin: Option<HeaderValue>) -> Result<()> {
    let mut app = app(state.festivals, state.resolver);

    if let Some(pool) = state.pool {
        app = app.layer(Extension(pool));
    }

    if let Some(origin) = cors_origin {
        let cors = CorsLayer::new()
            .allow_headers([CONTENT_TYPE, AUTHORIZATION])
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_origin(AllowOrigin::exact(origin))
            .allow_credentials(true);
        app = app.layer(cors);
    }

    let app = app.layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static(REQUEST_ID_HEADER),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                REQUEST_ID_HEADER,
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span)),
    );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gracefully shutdown");

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
