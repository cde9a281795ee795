//! zuruu-lambda
//!
//! HTTP surface of the flow functions: the flow catalog, flow invocation,
//! the local tools and the session store, served by axum on Lambda.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{delete, get, post, put};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        // Flow catalog and invocation
        .route("/flows", get(routes::flows::list_flows))
        .route("/flows/{id}", get(routes::flows::get_flow_detail))
        .route("/flows/{id}", post(routes::flows::invoke_flow))
        // Local tools
        .route("/tools/adherence", post(routes::tools::adherence_summary))
        .route("/tools/convert", post(routes::tools::convert_units))
        // Session
        .route("/session", get(routes::session::get_session))
        .route("/session/mode", put(routes::session::set_mode))
        .route("/session/patients", get(routes::session::list_patients))
        .route("/session/patients", post(routes::session::save_patient))
        .route(
            "/session/patients/{id}",
            delete(routes::session::delete_patient),
        )
        .route(
            "/session/active-user",
            put(routes::session::set_active_user),
        )
        .route(
            "/session/active-user",
            delete(routes::session::clear_active_user),
        )
        .route(
            "/session/active-patient",
            get(routes::session::active_patient),
        )
        .route(
            "/session/prescription",
            put(routes::session::set_prescription),
        )
        .route(
            "/session/prescription",
            delete(routes::session::clear_prescription),
        )
        .route(
            "/session/prescription/consume",
            post(routes::session::consume_prescription),
        )
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
