//! StudyHub server entry point.

use std::sync::Arc;

use axum::{Router, middleware};
use studyhub_api::{middleware::AppState, router as api_router};
use studyhub_common::Config;
use studyhub_core::{
    AuthService, BookmarkService, CommentService, CourseService, DashboardService, EmailService,
    LikeService, QuestionService, ReportService, UserService,
};
use studyhub_db::repositories::{
    BookmarkRepository, CommentRepository, CourseRepository, LikeRepository, QuestionRepository,
    ReportRepository, StatsRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studyhub=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting StudyHub server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = studyhub_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    studyhub_db::migrate(&db).await?;

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let course_repo = CourseRepository::new(Arc::clone(&db));
    let question_repo = QuestionRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let bookmark_repo = BookmarkRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let stats_repo = StatsRepository::new(Arc::clone(&db));

    // Initialize services
    let email_service = EmailService::new(config.mail.clone());
    let auth_service = AuthService::new(user_repo.clone(), email_service, &config);
    let user_service = UserService::new(user_repo);
    let course_service = CourseService::new(course_repo.clone());
    let question_service = QuestionService::new(question_repo.clone(), course_repo);
    let comment_service = CommentService::new(comment_repo.clone(), question_repo.clone());
    let like_service = LikeService::new(like_repo, question_repo.clone(), comment_repo.clone());
    let bookmark_service = BookmarkService::new(bookmark_repo, question_repo.clone());
    let report_service = ReportService::new(report_repo, question_repo, comment_repo);
    let dashboard_service = DashboardService::new(stats_repo);

    // Create app state
    let state = AppState {
        auth_service,
        user_service,
        course_service,
        question_service,
        comment_service,
        like_service,
        bookmark_service,
        report_service,
        dashboard_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            studyhub_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
