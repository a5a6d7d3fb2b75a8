//! Application state shared across HTTP handlers.

use crate::auth::TokenService;
use crate::cdn::MediaStorage;
use crate::engine::Engine;
use crate::store::Stores;
use axum::extract::FromRef;
use std::sync::Arc;

/// Shared resources for every handler, cloned cheaply per request.
#[derive(Clone)]
pub struct AppState {
    /// The booking & settlement engine
    pub engine: Engine,
    /// Token issue/validation
    pub tokens: TokenService,
    /// CDN object storage for media uploads
    pub storage: Arc<dyn MediaStorage>,
}

impl AppState {
    /// Creates the application state.
    #[must_use]
    pub const fn new(engine: Engine, tokens: TokenService, storage: Arc<dyn MediaStorage>) -> Self {
        Self {
            engine,
            tokens,
            storage,
        }
    }

    /// Store handles.
    #[must_use]
    pub const fn stores(&self) -> &Stores {
        self.engine.stores()
    }
}

// Lets the auth extractors pull the token service straight from state.
impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
