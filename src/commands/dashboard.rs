use super::Command;
use crate::context::AppContext;
use crate::task::FilterParams;
use crate::tui::run_dashboard;
use crate::workflow::TaskWorkflow;
use async_trait::async_trait;
use std::error::Error;

pub struct DashboardCommand {
    /// Makes to filter new tasks on; empty means the configured defaults
    pub makes: Vec<String>,
}

#[async_trait]
impl Command for DashboardCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        let config = ctx.config();
        let filter = FilterParams::from_makes_or(&self.makes, &config.filter.makes);

        run_dashboard(
            TaskWorkflow::new(ctx),
            filter,
            config.api.base_url.clone(),
        )
        .await
        .map_err(|e| e as Box<dyn Error>)
    }
}
