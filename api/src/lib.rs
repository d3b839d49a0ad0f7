use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

pub mod error;
pub mod handlers;
pub mod middleware_hooks;
pub mod models;
pub mod server;
pub mod test_data;

#[cfg(test)]
mod test_support;

// Re-export server functions for convenience
pub use server::{start_server_with_config, ApiConfig};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn database::ResourceStore>,
    pub board: content::Board,
    /// Mount the development login route
    pub dev_login: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn database::ResourceStore>, authz: Arc<authz::AuthzEngine>) -> Self {
        Self {
            board: content::Board::new(store.clone(), authz),
            store,
            dev_login: false,
        }
    }

    pub fn with_dev_login(mut self, enabled: bool) -> Self {
        self.dev_login = enabled;
        self
    }
}

/// Create the main router with all routes and middleware
pub fn create_router<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let api_v1 = Router::new().route("/health", get(handlers::health::health_check));

    let board = Router::new()
        .route("/articles", get(handlers::articles::list_articles))
        .route(
            "/articles/new",
            get(handlers::articles::new_article_form).post(handlers::articles::create_article),
        )
        .route(
            "/articles/:id",
            get(handlers::articles::show_article).post(handlers::comments::post_comment),
        )
        .route(
            "/articles/:id/edit",
            get(handlers::articles::edit_article_form).post(handlers::articles::update_article),
        )
        .route(
            "/articles/:id/delete",
            post(handlers::articles::delete_article),
        )
        .route(
            "/comments/:id/edit",
            get(handlers::comments::edit_comment_form).post(handlers::comments::update_comment),
        )
        .route(
            "/comments/:id/delete",
            post(handlers::comments::delete_comment),
        )
        .route("/logout", post(handlers::session::logout));

    let login = get(handlers::session::login_page);
    let board = if state.dev_login {
        board.route("/login", login.post(handlers::session::dev_login))
    } else {
        board.route("/login", login)
    };

    Router::new()
        .merge(board)
        .nest("/api/v1", api_v1)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middleware_hooks::request_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middleware_hooks::response_middleware,
        ))
        .layer(sessions)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
