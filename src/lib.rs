pub mod config;
pub mod error;
pub mod feeds;
pub mod handler;
pub mod notify;
pub mod region;
pub mod server;

use crate::config::{Config, Credential};
use crate::feeds::trends::GoogleTrendsFetcher;
use crate::handler::EventHandler;
use crate::notify::slack::SlackNotifier;
use std::sync::Arc;

/// Wire the production fetcher and notifier into a handler.
pub fn build_handler(config: &Config, credential: Credential) -> EventHandler {
    let fetcher = GoogleTrendsFetcher::new(
        config.feed_url_template.clone(),
        config.filter_to_today,
        config.request_timeout(),
    );
    let notifier = SlackNotifier::new(
        config.post_url.clone(),
        credential,
        config.request_timeout(),
    );

    EventHandler::new(
        Arc::new(fetcher),
        Arc::new(notifier),
        config.region_strategy,
        config.presentation,
    )
}
