use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use hopehire_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    events, middleware, routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    // Badge listener: turns notification change events into cache
    // invalidations, resyncing after any missed window.
    {
        let hub = app_state.events.clone();
        let cache = app_state.cache.clone();
        tokio::spawn(async move {
            events::run_badge_listener(hub, cache).await;
        });
    }

    let app = build_router(app_state, config.api_rps);

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(app_state: AppState, api_rps: u32) -> Router {
    let base_routes = Router::new().route("/health", get(routes::health::health));

    // Signup/signin and the setup bootstrap take no bearer token; they
    // carry the rate limiter instead.
    let public_api = Router::new()
        .route("/api/auth/signup", post(routes::auth::signup))
        .route("/api/auth/signin", post(routes::auth::signin))
        .route(
            "/api/auth/password-reset/request",
            post(routes::auth::request_password_reset),
        )
        .route(
            "/api/auth/password-reset/confirm",
            post(routes::auth::confirm_password_reset),
        )
        .route("/api/setup/demo-users", post(routes::setup::create_demo_users))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::RateLimiter::new(api_rps),
            middleware::rate_limit::rps_middleware,
        ));

    let session_api = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route(
            "/api/messages/unread-count",
            get(routes::messages::unread_count),
        )
        .route("/api/messages", post(routes::messages::send_message))
        .route(
            "/api/messages/:counterpart_id",
            get(routes::messages::get_thread),
        )
        .route(
            "/api/messages/:counterpart_id/read",
            post(routes::messages::acknowledge_read),
        )
        .route("/api/meetings", post(routes::meetings::schedule_meeting))
        .route(
            "/api/meetings/with/:counterpart_id",
            get(routes::meetings::list_meetings),
        )
        .route(
            "/api/meetings/with/:counterpart_id/booked-slots",
            get(routes::meetings::booked_slots),
        )
        .route(
            "/api/meetings/:id/status",
            post(routes::meetings::update_status),
        )
        .route(
            "/api/notifications",
            get(routes::notifications::list_notifications),
        )
        .route(
            "/api/notifications/unread-count",
            get(routes::notifications::unread_count),
        )
        .route(
            "/api/notifications/read",
            post(routes::notifications::mark_all_read),
        )
        .route(
            "/api/companies",
            get(routes::jobs::list_companies).post(routes::jobs::create_company),
        )
        .route("/api/companies/:id", get(routes::jobs::get_company))
        .route(
            "/api/jobs",
            get(routes::jobs::list_jobs).post(routes::jobs::create_job),
        )
        .route(
            "/api/jobs/:id",
            get(routes::jobs::get_job).patch(routes::jobs::update_job),
        )
        .route(
            "/api/jobs/:id/applications",
            get(routes::applications::list_for_job),
        )
        .route("/api/applications", post(routes::applications::apply))
        .route(
            "/api/applications/mine",
            get(routes::applications::list_mine),
        )
        .route(
            "/api/applications/:id/status",
            post(routes::applications::update_status),
        )
        .route(
            "/api/resumes",
            post(routes::resumes::submit_resume),
        )
        .route("/api/resumes/mine", get(routes::resumes::my_resume))
        .layer(from_fn(middleware::auth::require_auth));

    let reviewer_api = Router::new()
        .route("/api/resumes/pending", get(routes::resumes::pending_resumes))
        .route(
            "/api/resumes/:id/review",
            post(routes::resumes::review_resume),
        )
        .layer(from_fn(middleware::auth::require_reviewer));

    base_routes
        .merge(public_api)
        .merge(session_api)
        .merge(reviewer_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
}
