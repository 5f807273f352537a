use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, patch, post, MethodRouter},
    Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::models::*;
use crate::database::{Entity, MySqlService};
use crate::filter::FilterData;
use crate::handlers::protected::{blogs, clients, crud};
use crate::handlers::public;
use crate::middleware::require_auth;

/// Shared, read-only handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: MySqlService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let db = MySqlService::new(config.database.clone());
        Self {
            config: Arc::new(config),
            db,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_public_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/token", post(public::auth::user_token))
        .route("/auth/client-token", post(public::auth::client_token))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(client_routes())
        .merge(portfolio_routes())
        .merge(blog_routes())
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/clients", get(clients::list).post(clients::create))
        .route("/auth/clients/:id/deactivate", patch(clients::deactivate))
}

fn portfolio_routes() -> Router<AppState> {
    Router::new()
        .route("/companies", collection::<CompanyCreate, CompanyFilter>())
        .route("/companies/:id", item::<CompanyCreate>().patch(crud::patch::<CompanyUpdate>))
        .route("/technologies", collection::<TechnologyCreate, TechnologyFilter>())
        .route("/technologies/:id", item::<TechnologyCreate>().patch(crud::patch::<TechnologyUpdate>))
        .route(
            "/experiences",
            collection::<ProfessionalExperienceCreate, ProfessionalExperienceFilter>(),
        )
        .route(
            "/experiences/:id",
            item::<ProfessionalExperienceCreate>().patch(crud::patch::<ProfessionalExperienceUpdate>),
        )
        .route("/projects", collection::<ProjectCreate, ProjectFilter>())
        .route("/projects/:id", item::<ProjectCreate>().patch(crud::patch::<ProjectUpdate>))
        .route("/project-tasks", collection::<ProjectTaskCreate, ProjectTaskFilter>())
        .route("/project-tasks/:id", item::<ProjectTaskCreate>().patch(crud::patch::<ProjectTaskUpdate>))
        .route("/responsibilities", collection::<ResponsibilityCreate, ResponsibilityFilter>())
        .route(
            "/responsibilities/:id",
            item::<ResponsibilityCreate>().patch(crud::patch::<ResponsibilityUpdate>),
        )
        // Join tables: replace or delete, no sparse update
        .route("/company-experiences", collection::<CompanyExperienceCreate, CompanyExperienceFilter>())
        .route("/company-experiences/:id", item::<CompanyExperienceCreate>())
        .route(
            "/technology-experiences",
            collection::<TechnologyExperienceCreate, TechnologyExperienceFilter>(),
        )
        .route("/technology-experiences/:id", item::<TechnologyExperienceCreate>())
        .route("/technology-projects", collection::<TechnologyProjectCreate, TechnologyProjectFilter>())
        .route("/technology-projects/:id", item::<TechnologyProjectCreate>())
}

fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", collection::<BlogCreate, crud::NoFilters>())
        .route("/blogs/search", get(blogs::search))
        .route("/blogs/:id", item::<BlogCreate>().patch(crud::patch::<BlogUpdate>))
        .route("/blogs/:id/publish", patch(blogs::publish))
}

/// `GET` list + `POST` create
fn collection<E, F>() -> MethodRouter<AppState>
where
    E: Entity,
    F: DeserializeOwned + Into<FilterData> + Send + 'static,
{
    get(crud::list::<E, F>).post(crud::create::<E>)
}

/// `GET` / `PUT` / `DELETE` by id
fn item<E: Entity>() -> MethodRouter<AppState> {
    get(crud::get::<E>).put(crud::replace::<E>).delete(crud::delete::<E>)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.cors_allows_any() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}
