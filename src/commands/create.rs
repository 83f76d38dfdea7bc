use super::Command;
use crate::context::AppContext;
use crate::render::render_report;
use crate::task::FilterParams;
use crate::workflow::{TaskWorkflow, ViewState};
use async_trait::async_trait;
use std::error::Error;

pub struct CreateCommand {
    /// Makes to filter on; empty means the configured defaults
    pub makes: Vec<String>,
}

impl CreateCommand {
    pub fn filter(&self, ctx: &AppContext) -> FilterParams {
        FilterParams::from_makes_or(&self.makes, &ctx.config().filter.makes)
    }
}

#[async_trait]
impl Command for CreateCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        let filter = self.filter(ctx);
        let workflow = TaskWorkflow::new(ctx);
        let mut state = ViewState::new();

        workflow.create_task(&mut state, &filter).await?;

        print!("{}", render_report(&state));
        if let Some(task_id) = state.task_id() {
            println!("\nCheck progress with: eva status {task_id}");
        }
        Ok(())
    }
}
