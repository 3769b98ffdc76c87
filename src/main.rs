use axum::{routing::get, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use orgmgmt_api_rust::database::manager::DatabaseManager;
use orgmgmt_api_rust::middleware::auth::jwt_auth_middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = orgmgmt_api_rust::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting organization management API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("ORGMGMT_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Organization management API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router {
    use axum::routing::{delete, post};
    use orgmgmt_api_rust::handlers::{assignments, departments, organizations, teams};

    Router::new()
        // Organizations: POST and the exists probe are public bootstrap paths;
        // the auth layer below only rejects tokens that are present but bad
        .route(
            "/api/organizations",
            get(organizations::list).post(organizations::create),
        )
        .route("/api/organizations/:id/exists", get(organizations::exists))
        .route(
            "/api/organizations/:id",
            get(organizations::get_by_id)
                .put(organizations::update)
                .delete(organizations::delete_by_id),
        )
        .route("/api/organizations/:id/children", get(organizations::children))
        // Membership: {department, team} x {user, survey}. The first segment
        // is :id everywhere so the router's parameter names stay consistent
        .route(
            "/api/organizations/:id/departments/:department_id/assign-user/:user_id",
            post(assignments::assign_user_to_department),
        )
        .route(
            "/api/organizations/:id/departments/:department_id/remove-user/:user_id",
            delete(assignments::remove_user_from_department),
        )
        .route(
            "/api/organizations/:id/teams/:team_id/assign-user/:user_id",
            post(assignments::assign_user_to_team),
        )
        .route(
            "/api/organizations/:id/teams/:team_id/remove-user/:user_id",
            delete(assignments::remove_user_from_team),
        )
        .route(
            "/api/organizations/:id/departments/:department_id/assign-survey/:survey_id",
            post(assignments::assign_survey_to_department),
        )
        .route(
            "/api/organizations/:id/departments/:department_id/remove-survey/:survey_id",
            delete(assignments::remove_survey_from_department),
        )
        .route(
            "/api/organizations/:id/teams/:team_id/assign-survey/:survey_id",
            post(assignments::assign_survey_to_team),
        )
        .route(
            "/api/organizations/:id/teams/:team_id/remove-survey/:survey_id",
            delete(assignments::remove_survey_from_team),
        )
        // Departments
        .route("/api/departments", get(departments::list).post(departments::create))
        .route(
            "/api/departments/:id",
            get(departments::get_by_id)
                .put(departments::update)
                .delete(departments::delete_by_id),
        )
        // Teams
        .route("/api/teams", get(teams::list).post(teams::create))
        .route(
            "/api/teams/:id",
            get(teams::get_by_id).put(teams::update).delete(teams::delete_by_id),
        )
        .route("/api/teams/department/:department_id", get(teams::list_by_department))
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
