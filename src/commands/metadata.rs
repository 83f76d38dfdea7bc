use super::Command;
use crate::context::AppContext;
use crate::render::render_metadata;
use crate::workflow::{MetadataState, TaskWorkflow, ViewState};
use async_trait::async_trait;
use std::error::Error;

pub struct MetadataCommand {
    pub json: bool,
}

#[async_trait]
impl Command for MetadataCommand {
    async fn execute(&self, ctx: &AppContext) -> Result<(), Box<dyn Error>> {
        let workflow = TaskWorkflow::new(ctx);
        let mut state = ViewState::new();
        workflow.load_metadata(&mut state).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(state.metadata.entries())?);
            return Ok(());
        }

        match &state.metadata {
            MetadataState::Loaded(entries) if entries.is_empty() => {
                println!("No metadata available");
            }
            metadata => print!("{}", render_metadata(metadata).trim_start()),
        }

        Ok(())
    }
}
