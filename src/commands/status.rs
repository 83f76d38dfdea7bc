use super::Command;
use crate::context::AppContext;
use crate::render::render_report;
use crate::workflow::{StatusCheck, TaskWorkflow, ViewState};
use async_trait::async_trait;
use std::error::Error;

pub struct StatusCommand {
    pub task_id: String,
}

#[async_trait]
impl Command for StatusCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        let workflow = TaskWorkflow::new(ctx);
        let mut state = ViewState::for_task(&self.task_id);

        let outcome = workflow.check_status(&mut state).await?;
        print!("{}", render_report(&state));

        match outcome {
            StatusCheck::InProgress(status) => {
                println!("\nTask {} is {status}; check again later.", self.task_id);
            }
            StatusCheck::Failed => {
                return Err(format!("Task {} failed on the server", self.task_id).into());
            }
            StatusCheck::DataLoaded { .. } | StatusCheck::AlreadyLoaded => {}
        }
        Ok(())
    }
}
