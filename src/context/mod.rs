pub mod analytics_client;
pub mod config;

use analytics_client::{AnalyticsClient, ApiError};
use config::AppConfig;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    analytics_client: Arc<dyn AnalyticsClient>,
    config: Arc<AppConfig>,
}

impl AppContext {
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::new()
    }

    pub fn analytics_client(&self) -> Arc<dyn AnalyticsClient> {
        Arc::clone(&self.analytics_client)
    }

    pub fn config(&self) -> Arc<AppConfig> {
        Arc::clone(&self.config)
    }
}

pub struct AppContextBuilder {
    analytics_client: Option<Arc<dyn AnalyticsClient>>,
    config: Option<AppConfig>,
}

impl AppContextBuilder {
    pub fn new() -> Self {
        Self {
            analytics_client: None,
            config: None,
        }
    }

    pub fn with_analytics_client(mut self, analytics_client: Arc<dyn AnalyticsClient>) -> Self {
        self.analytics_client = Some(analytics_client);
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context, creating the HTTP client from the config unless one was injected
    pub fn build(self) -> Result<AppContext, ApiError> {
        let config = Arc::new(self.config.unwrap_or_default());

        let analytics_client = match self.analytics_client {
            Some(client) => client,
            None => Arc::new(analytics_client::DefaultAnalyticsClient::new(&config.api)?),
        };

        Ok(AppContext {
            analytics_client,
            config,
        })
    }
}

impl Default for AppContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
