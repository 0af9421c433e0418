use std::sync::Arc;

use crate::application::{AuthService, BoardService};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<BoardService>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(board: BoardService, auth: AuthService) -> Self {
        Self {
            board: Arc::new(board),
            auth: Arc::new(auth),
        }
    }
}
