//! Prompts command implementation.

use crate::cli::{Output, PromptsAction};
use crate::config::{Prompts, Settings, AGENTS_FILE, TASKS_FILE};
use anyhow::{Context, Result};

/// Run the prompts command.
pub fn run_prompts(action: &PromptsAction, settings: &Settings) -> Result<()> {
    let prompts = Prompts::load(
        settings.prompts_dir().as_deref(),
        Some(&settings.prompts.variables),
    )
    .context("Failed to load prompts")?;

    match action {
        PromptsAction::Show => {
            let agents = toml::to_string_pretty(&prompts.agents)
                .map_err(|e| anyhow::anyhow!("Failed to serialize agents: {}", e))?;
            let tasks = toml::to_string_pretty(&prompts.tasks)
                .map_err(|e| anyhow::anyhow!("Failed to serialize tasks: {}", e))?;
            println!("# {}\n{}\n# {}\n{}", AGENTS_FILE, agents, TASKS_FILE, tasks);
        }

        PromptsAction::Export { dir } => {
            let dir = Settings::expand_path(dir);
            prompts.export(&dir)?;
            Output::success(&format!("Wrote {} and {} to {}", AGENTS_FILE, TASKS_FILE, dir.display()));
            Output::info("Point prompts.custom_dir at this directory to use your edits.");
        }
    }

    Ok(())
}
