//! Test utilities for ev-analytics unit tests.
//!
//! Provides fake AnalyticsClient implementations (NoOpAnalyticsClient,
//! FailingAnalyticsClient, TrackedAnalyticsClient) and sample data builders.

pub mod analytics_clients;

pub use analytics_clients::{
    FailingAnalyticsClient, NoOpAnalyticsClient, TrackedAnalyticsClient, sample_metadata,
};
