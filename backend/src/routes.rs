// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, quiz, results},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public routes: categories, questions by category, result submission, admin login.
/// * Admin routes sit behind `auth_middleware` (401) then `admin_middleware` (403).
/// * Global middleware: Trace, CORS.
/// * When `STATIC_DIR` is configured the built frontend is served as the fallback.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    // Auth runs first (outermost), then the role check.
    let admin_gate = ServiceBuilder::new()
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(middleware::from_fn(admin_middleware));

    let category_routes = Router::new().route("/", get(quiz::list_categories));

    let question_routes = Router::new()
        .route("/{category}", get(quiz::list_questions))
        .merge(
            Router::new()
                .route("/", post(admin::create_question))
                .route(
                    "/{category}/{id}",
                    put(admin::update_question).delete(admin::delete_question),
                )
                .layer(admin_gate.clone()),
        );

    let result_routes = Router::new()
        .route("/", post(quiz::submit_result))
        .merge(
            Router::new()
                .route(
                    "/",
                    get(results::list_results).delete(results::delete_all_results),
                )
                .route("/{id}", delete(results::delete_result))
                .layer(admin_gate),
        );

    let admin_routes = Router::new().route("/login", post(auth::login));

    let mut app = Router::new()
        .nest("/api/categories", category_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/results", result_routes)
        .nest("/api/admin", admin_routes);

    if let Some(dir) = &state.config.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
