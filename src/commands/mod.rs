use crate::context::AppContext;
use async_trait::async_trait;
use std::error::Error;

pub mod create;
pub mod dashboard;
pub mod data;
pub mod metadata;
pub mod status;

pub use create::CreateCommand;
pub use dashboard::DashboardCommand;
pub use data::DataCommand;
pub use metadata::MetadataCommand;
pub use status::StatusCommand;

#[async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>>;
}
