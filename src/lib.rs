use std::sync::Arc;

use cache::{ExpiringStore, TokenCache};
use config::Config;
use utils::TokenCodec;

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod result;
pub mod router;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tokens: TokenCache,
    pub codec: TokenCodec,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ExpiringStore>) -> Self {
        let codec = TokenCodec::new(&config.access_token_secret, &config.renewal_token_secret);
        Self {
            config,
            tokens: TokenCache::new(store),
            codec,
        }
    }
}
