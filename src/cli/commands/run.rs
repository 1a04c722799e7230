//! Run command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::comments::{self, Comment};
use crate::config::Settings;
use crate::pipeline::{format_ideas, OutputFormat, Pipeline};
use crate::youtube::{extract_video_id, YoutubeClient};
use anyhow::{Context, Result};
use tracing::info;

/// Options for a pipeline run.
#[derive(Debug, Default)]
pub struct RunOptions {
    pub comments: Option<String>,
    pub video: Option<String>,
    pub max_comments: Option<usize>,
    pub output: Option<String>,
    pub format: String,
    pub model: Option<String>,
    pub show_stages: bool,
}

/// Run the full pipeline and emit the scored ideas.
pub async fn run_pipeline(options: RunOptions, mut settings: Settings) -> Result<()> {
    let format: OutputFormat = options.format.parse().map_err(anyhow::Error::msg)?;

    if let Some(model) = &options.model {
        settings.llm.model = model.clone();
    }

    if let Err(e) = preflight::check(Operation::Run, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'ideacrew doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let comments = load_comments(&options, &settings).await?;
    if comments.is_empty() {
        Output::warning("No comments to process.");
    } else {
        Output::info(&format!("Processing {} comments", comments.len()));
    }

    let pipeline = Pipeline::from_settings(&settings)?;

    let spinner = Output::spinner("Starting crew...");
    let result = pipeline
        .run_with_progress(&comments, |stage| spinner.set_message(stage.label()))
        .await;
    spinner.finish_and_clear();

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            if e.is_schema_failure() {
                Output::error("The scoring agent returned output that does not fit the idea list schema.");
                Output::info("Try a stronger model with --model, or adjust the score_ideas task prompt.");
            } else {
                Output::error(&format!("Pipeline failed: {}", e));
            }
            return Err(e.into());
        }
    };

    if options.show_stages {
        for report in &output.stages {
            Output::stage_report(report);
        }
        eprintln!();
    }

    let rendered = format_ideas(&output.ideas, format)?;
    match &options.output {
        Some(path) => {
            std::fs::write(path, &rendered).with_context(|| format!("Failed to write {}", path))?;
            Output::success(&format!("Wrote {} ideas to {}", output.ideas.len(), path));
        }
        None => println!("{}", rendered),
    }

    Output::ideas_summary(&output.ideas);
    Ok(())
}

async fn load_comments(options: &RunOptions, settings: &Settings) -> Result<Vec<Comment>> {
    let mut comments = match (&options.comments, &options.video) {
        (Some(path), _) => {
            info!("Loading comments from {}", path);
            let path = Settings::expand_path(path);
            comments::load_from_file(&path, None)?
        }
        (None, Some(input)) => {
            let video_id = extract_video_id(input)
                .with_context(|| format!("Not a YouTube URL or video ID: {}", input))?;
            let limit = options.max_comments.unwrap_or(settings.youtube.max_comments);
            let client = YoutubeClient::from_settings(&settings.youtube)?;

            let spinner = Output::spinner(&format!("Fetching comments for {}...", video_id));
            let fetched = client.fetch_comments(&video_id, limit).await;
            spinner.finish_and_clear();
            fetched?
        }
        (None, None) => anyhow::bail!("Provide --comments <file> or --video <url|id>"),
    };

    if let Some(max) = options.max_comments {
        comments.truncate(max);
    }
    Ok(comments)
}
