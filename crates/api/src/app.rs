use std::time::Duration;

use async_graphql::{http::GraphiQLSource, EmptySubscription, ObjectType, Schema};
use async_graphql_axum::GraphQL;
use axum::{
    extract::State,
    response::Html,
    routing::{get, post_service},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::state::AppState;

/// Build the Axum router with the health endpoint and GraphQL.
/// Generic over the schema roots so tests can plug in their own.
pub fn build_router<Q, M>(state: AppState, schema: Schema<Q, M, EmptySubscription>) -> Router
where
    Q: ObjectType + Send + Sync + 'static,
    M: ObjectType + Send + Sync + 'static,
{
    Router::new()
        // Liveness check; also proves DB connectivity.
        .route("/health", get(health))
        .route("/graphiql", get(graphiql))
        .route("/graphql", post_service(GraphQL::new(schema)))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
}

async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    infra::db::ping(&state.db).await?;
    Ok("ok")
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
