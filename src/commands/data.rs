use super::Command;
use crate::context::AppContext;
use crate::render::render_report;
use crate::workflow::{TaskWorkflow, ViewState};
use async_trait::async_trait;
use std::error::Error;

/// Fetch a task's rows directly, without checking its status first
pub struct DataCommand {
    pub task_id: String,
    pub json: bool,
}

#[async_trait]
impl Command for DataCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        let workflow = TaskWorkflow::new(ctx);
        let mut state = ViewState::for_task(&self.task_id);

        let count = workflow.fetch_data(&mut state).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&state.rows)?);
        } else if count == 0 {
            println!("Task {} has no rows", self.task_id);
        } else {
            print!("{}", render_report(&state));
        }
        Ok(())
    }
}
