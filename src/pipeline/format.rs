//! Output formatting for the final idea list (JSON, TOML, Markdown).

use super::model::VideoIdeasList;
use crate::error::{IdeacrewError, Result};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Toml,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "toml" => Ok(OutputFormat::Toml),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}. Use json, toml, or markdown.", s)),
        }
    }
}

/// Format the idea list for output.
///
/// TOML integers are signed 64-bit, so a `view_count` above `i64::MAX`
/// cannot be written as TOML. JSON has no such limit.
pub fn format_ideas(ideas: &VideoIdeasList, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ideas)?),
        OutputFormat::Toml => toml::to_string_pretty(ideas)
            .map_err(|e| IdeacrewError::Output(format!("cannot encode ideas as TOML: {}", e))),
        OutputFormat::Markdown => Ok(format_markdown(ideas)),
    }
}

/// Human-readable report, highest score first.
fn format_markdown(ideas: &VideoIdeasList) -> String {
    let mut out = String::from("# Video Ideas\n");

    if ideas.is_empty() {
        out.push_str("\nNo video ideas were produced.\n");
        return out;
    }

    for (i, idea) in ideas.ranked().iter().enumerate() {
        out.push_str(&format!(
            "\n## {}. {} (score {})\n\n{}\n\n- Comment: `{}` on video `{}`\n",
            i + 1,
            idea.video_title,
            idea.score,
            idea.description,
            idea.comment_id,
            idea.video_id
        ));

        if idea.research.is_empty() {
            out.push_str("- Research: no comparable videos found\n");
        } else {
            out.push_str("- Research:\n");
            for item in &idea.research {
                out.push_str(&format!(
                    "  - [{}]({}) ({} views)\n",
                    item.title, item.url, item.view_count
                ));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::model::{ResearchItem, VideoIdea};

    fn sample() -> VideoIdeasList {
        VideoIdeasList {
            video_ideas: vec![
                VideoIdea {
                    score: 6,
                    video_title: "Sourdough in a cold kitchen".to_string(),
                    description: "Keeping a starter alive in winter.".to_string(),
                    video_id: "abcdefghijk".to_string(),
                    comment_id: "c4".to_string(),
                    research: Vec::new(),
                },
                VideoIdea {
                    score: 9,
                    video_title: "Topic X explained".to_string(),
                    description: "A primer on topic X.".to_string(),
                    video_id: "abcdefghijk".to_string(),
                    comment_id: "c2".to_string(),
                    research: vec![ResearchItem {
                        title: "Topic X intro".to_string(),
                        url: "https://www.youtube.com/watch?v=xxxxxxxxxxx".to_string(),
                        view_count: 120_000,
                    }],
                },
            ],
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let ideas = sample();
        let text = format_ideas(&ideas, OutputFormat::Json).unwrap();
        let back: VideoIdeasList = serde_json::from_str(&text).unwrap();
        assert_eq!(back, ideas);
    }

    #[test]
    fn test_toml_round_trip() {
        let ideas = sample();
        let text = format_ideas(&ideas, OutputFormat::Toml).unwrap();
        assert!(text.contains("[[video_ideas]]"));
        let back: VideoIdeasList = toml::from_str(&text).unwrap();
        assert_eq!(back, ideas);
    }

    #[test]
    fn test_toml_rejects_view_counts_beyond_i64() {
        let mut ideas = sample();
        ideas.video_ideas[1].research[0].view_count = u64::MAX;

        let err = format_ideas(&ideas, OutputFormat::Toml).unwrap_err();
        assert!(matches!(err, IdeacrewError::Output(_)));
        assert_eq!(err.kind(), crate::error::ErrorKind::Input);

        // JSON carries the same list fine
        let text = format_ideas(&ideas, OutputFormat::Json).unwrap();
        assert!(text.contains(&u64::MAX.to_string()));
    }

    #[test]
    fn test_markdown_is_ranked() {
        let text = format_ideas(&sample(), OutputFormat::Markdown).unwrap();
        let first = text.find("Topic X explained").unwrap();
        let second = text.find("Sourdough in a cold kitchen").unwrap();
        assert!(first < second);
        assert!(text.contains("(120000 views)"));
        assert!(text.contains("no comparable videos found"));
    }

    #[test]
    fn test_markdown_empty() {
        let text = format_ideas(&VideoIdeasList::default(), OutputFormat::Markdown).unwrap();
        assert!(text.contains("No video ideas"));
    }
}
