use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod avatar;
pub mod cache;
pub mod config;
pub mod csv_import;
pub mod db;
pub mod entities;
pub mod error;
pub mod routes;
pub mod search;
pub mod services;
pub mod validation;

use crate::cache::QueryCache;
use crate::config::Config;
use crate::routes::{
    avatar as avatar_routes, bulk, directory, incubators, investors, mentors, overview, startups, tools,
};

/// Shared handler state: the connection pool and the list cache.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub cache: Arc<QueryCache>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        Self {
            db,
            cache: Arc::new(QueryCache::new(config.cache_ttl)),
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Service is healthy")
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "VentureHub API",
        version = "0.1.0",
        description = "Directory of investors, startups, mentors and tools"
    ),
    paths(
        health_check,
        overview::get_overview,
        investors::list_investors,
        investors::investor_stats,
        investors::get_investor,
        investors::create_investor,
        investors::update_investor,
        investors::delete_investor,
        startups::list_startups,
        startups::top_startups,
        startups::get_startup,
        startups::create_startup,
        startups::update_startup,
        startups::delete_startup,
        mentors::list_mentors,
        mentors::mentor_stats,
        mentors::get_mentor,
        mentors::create_mentor,
        mentors::update_mentor,
        mentors::delete_mentor,
        tools::list_tools,
        tools::get_tool,
        tools::create_tool,
        tools::update_tool,
        tools::delete_tool,
        incubators::list_incubators,
        incubators::get_incubator,
        bulk::csv_template,
        bulk::csv_preview,
        bulk::csv_import,
        directory::investor_directory,
        avatar_routes::get_avatar
    ),
    components(schemas(
        entities::investor::Model,
        entities::startup::Model,
        entities::mentor::Model,
        entities::tool::Model,
        entities::incubator::Model,
        entities::VerificationStatus,
        entities::StartupStatus,
        entities::ToolStatus,
        entities::DayOfWeek,
        entities::Tags,
        services::investors::InvestorForm,
        services::startups::StartupForm,
        services::mentors::MentorForm,
        services::mentors::MentorProfile,
        services::mentors::TimeSlot,
        services::tools::ToolForm,
        services::ProfileStats,
        services::Overview,
        csv_import::CsvKind,
        csv_import::CsvPreview,
        bulk::ImportResult,
        directory::InvestorCard,
        avatar::Avatar,
        avatar::AvatarColor,
        search::StatusFilter,
        search::SortField,
        search::SortOrder,
        error::FieldError
    ))
)]
pub struct ApiDoc;

/// Create the application with all routes and middleware
pub fn create_app(state: AppState, config: &Config) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/overview", get(overview::get_overview))
        .route(
            "/investors",
            get(investors::list_investors).post(investors::create_investor),
        )
        .route("/investors/stats", get(investors::investor_stats))
        .route(
            "/investors/{id}",
            get(investors::get_investor)
                .put(investors::update_investor)
                .delete(investors::delete_investor),
        )
        .route(
            "/startups",
            get(startups::list_startups).post(startups::create_startup),
        )
        .route("/startups/top", get(startups::top_startups))
        .route(
            "/startups/{id}",
            get(startups::get_startup)
                .put(startups::update_startup)
                .delete(startups::delete_startup),
        )
        .route(
            "/mentors",
            get(mentors::list_mentors).post(mentors::create_mentor),
        )
        .route("/mentors/stats", get(mentors::mentor_stats))
        .route(
            "/mentors/{id}",
            get(mentors::get_mentor)
                .put(mentors::update_mentor)
                .delete(mentors::delete_mentor),
        )
        .route("/tools", get(tools::list_tools).post(tools::create_tool))
        .route(
            "/tools/{id}",
            get(tools::get_tool)
                .put(tools::update_tool)
                .delete(tools::delete_tool),
        )
        .route("/incubators", get(incubators::list_incubators))
        .route("/incubators/{id}", get(incubators::get_incubator))
        .route("/{entity}/csv/template", get(bulk::csv_template))
        .route("/{entity}/csv/preview", axum::routing::post(bulk::csv_preview))
        .route("/{entity}/csv/import", axum::routing::post(bulk::csv_import))
        .route("/directory/investors", get(directory::investor_directory))
        .route("/avatar", get(avatar_routes::get_avatar))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state);

    // Rate limiting applies to the API only, never to the docs
    let api_routes = if config.rate_limit_per_minute > 0 {
        let per_request = Duration::from_secs(60) / config.rate_limit_per_minute;
        match GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .period(per_request)
            .burst_size(config.rate_limit_burst.max(1))
            .finish()
        {
            Some(governor_conf) => api_routes.layer(GovernorLayer {
                config: Arc::new(governor_conf),
            }),
            None => {
                tracing::warn!("invalid rate limit settings; rate limiting disabled");
                api_routes
            }
        }
    } else {
        api_routes
    };

    let docs_router = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(api_routes)
        .merge(docs_router)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
