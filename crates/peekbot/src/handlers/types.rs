//! Handler types and dependencies

use std::sync::Arc;

use teloxide::prelude::*;

use peekcore::publish::TelegraphClient;
use peekcore::thumbs::ThumbStore;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub http: reqwest::Client,
    pub telegraph: Arc<TelegraphClient>,
    pub thumbs: Arc<ThumbStore>,
    pub bot_username: Option<String>,
    pub bot_id: UserId,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(
        http: reqwest::Client,
        telegraph: Arc<TelegraphClient>,
        thumbs: Arc<ThumbStore>,
        bot_username: Option<String>,
        bot_id: UserId,
    ) -> Self {
        Self {
            http,
            telegraph,
            thumbs,
            bot_username,
            bot_id,
        }
    }
}
