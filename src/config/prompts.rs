//! Agent and task prompt templates.
//!
//! Every agent is described by a role, a goal and a backstory; every task by a
//! description and the output it is expected to produce. The defaults below can
//! be replaced by placing `agents.toml` and/or `tasks.toml` in the custom
//! prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// File name for agent overrides inside the custom prompts directory.
pub const AGENTS_FILE: &str = "agents.toml";
/// File name for task overrides inside the custom prompts directory.
pub const TASKS_FILE: &str = "tasks.toml";

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub agents: AgentPrompts,
    pub tasks: TaskPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Persona of a single agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPrompt {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

/// Instructions for a single task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPrompt {
    pub description: String,
    pub expected_output: String,
}

/// Personas for the four pipeline agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPrompts {
    pub comment_filter: AgentPrompt,
    pub idea_generator: AgentPrompt,
    pub researcher: AgentPrompt,
    pub scorer: AgentPrompt,
}

impl Default for AgentPrompts {
    fn default() -> Self {
        Self {
            comment_filter: AgentPrompt {
                role: "YouTube Comment Curator".to_string(),
                goal: "Keep only the comments that reveal what viewers want to see next on {{channel_name}}.".to_string(),
                backstory: "You have moderated large creator communities for years. You can tell a genuine \
                    content request or a thoughtful question apart from praise, jokes, self-promotion and spam \
                    at a glance, and you never invent comments that were not in front of you."
                    .to_string(),
            },
            idea_generator: AgentPrompt {
                role: "Video Idea Strategist".to_string(),
                goal: "Turn audience requests into concrete, clickable video ideas for {{channel_name}}.".to_string(),
                backstory: "You plan content calendars for creators in {{niche}}. You think in titles and \
                    hooks, and every idea you pitch is anchored to the viewer comment that inspired it."
                    .to_string(),
            },
            researcher: AgentPrompt {
                role: "YouTube Market Researcher".to_string(),
                goal: "Find out how existing videos on each idea perform so the idea can be judged on evidence.".to_string(),
                backstory: "You are an analyst who lives in YouTube search results. You look at what already \
                    exists, how many views it drew and where the gaps are, and you report only what the search \
                    tool actually returned."
                    .to_string(),
            },
            scorer: AgentPrompt {
                role: "Video Idea Evaluator".to_string(),
                goal: "Score every researched idea so the best ones rise to the top.".to_string(),
                backstory: "You have green-lit hundreds of videos. You weigh audience demand, competition and \
                    originality, and you always return your verdict in the exact structure requested."
                    .to_string(),
            },
        }
    }
}

/// Instructions for the four pipeline tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPrompts {
    pub filter_comments: TaskPrompt,
    pub generate_ideas: TaskPrompt,
    pub research_ideas: TaskPrompt,
    pub score_ideas: TaskPrompt,
}

impl Default for TaskPrompts {
    fn default() -> Self {
        Self {
            filter_comments: TaskPrompt {
                description: r#"Review the viewer comments in the context. Each comment has an id, the video it was posted on and its text.

Keep comments that:
- ask for a topic, tutorial, follow-up or comparison
- raise a question the creator could answer in a video
- describe a problem the audience is struggling with

Reject comments that are:
- generic praise or thanks ("Great video!", "first")
- spam, links, self-promotion or giveaways
- off-topic or abusive

Only use comment ids that appear in the context."#
                    .to_string(),
                expected_output: r#"A JSON object and nothing else:
{"comment_ids": ["<id of a kept comment>", ...]}
Use an empty array if no comment is worth keeping."#
                    .to_string(),
            },
            generate_ideas: TaskPrompt {
                description: r#"Using the filtered comments in the context, propose video ideas.

Rules:
- Every idea must be inspired by exactly one comment and name that comment's id
- Only use comment ids that appear in the context
- Titles should be specific and clickable, under 80 characters
- Descriptions should explain the angle of the video in one or two sentences
- At most one idea per comment"#
                    .to_string(),
                expected_output: r#"A JSON object and nothing else:
{"ideas": [{"comment_id": "<comment id>", "video_title": "<title>", "description": "<angle>"}]}"#
                    .to_string(),
            },
            research_ideas: TaskPrompt {
                description: r#"Research the video idea in the context. Search results for the idea's title are already included.
If a different phrasing would find better comparable videos, call the search tool with it (at most {{max_results}} results are kept per idea).

Then summarize what you found: how popular comparable videos are, and whether there is room for a new one."#
                    .to_string(),
                expected_output: "Two to four sentences of research notes in plain text. Do not repeat the raw result list.".to_string(),
            },
            score_ideas: TaskPrompt {
                description: r#"Score each researched video idea in the context from {{min_score}} (weak) to {{max_score}} (must make).

Consider:
- how clearly the originating comment shows demand
- how well comparable videos perform (view counts)
- how crowded the topic already is

Copy video_id, comment_id and research exactly as given for each idea. You may polish the title and description."#
                    .to_string(),
                expected_output: r#"A JSON object and nothing else:
{"video_ideas": [{"score": <integer>, "video_title": "<title>", "description": "<description>", "video_id": "<video id>", "comment_id": "<comment id>", "research": [{"title": "<title>", "url": "<url>", "view_count": <integer>}]}]}
Include every idea from the context exactly once."#
                    .to_string(),
            },
        }
    }
}

/// Fallbacks for the variables the default personas mention.
fn default_variables() -> HashMap<String, String> {
    [("channel_name", "the channel"), ("niche", "the channel's niche")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Prompts {
    /// Load prompts from the defaults, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&Path>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts {
            variables: default_variables(),
            ..Prompts::default()
        };

        if let Some(vars) = custom_variables {
            prompts
                .variables
                .extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        if let Some(dir) = custom_dir {
            let agents_path = dir.join(AGENTS_FILE);
            if agents_path.exists() {
                let content = std::fs::read_to_string(&agents_path)?;
                prompts.agents = toml::from_str(&content)?;
            }

            let tasks_path = dir.join(TASKS_FILE);
            if tasks_path.exists() {
                let content = std::fs::read_to_string(&tasks_path)?;
                prompts.tasks = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Write the current prompts as override files into `dir`.
    pub fn export(&self, dir: &Path) -> crate::error::Result<()> {
        std::fs::create_dir_all(dir)?;
        let agents = toml::to_string_pretty(&self.agents)
            .map_err(|e| crate::error::IdeacrewError::Config(e.to_string()))?;
        let tasks = toml::to_string_pretty(&self.tasks)
            .map_err(|e| crate::error::IdeacrewError::Config(e.to_string()))?;
        std::fs::write(dir.join(AGENTS_FILE), agents)?;
        std::fs::write(dir.join(TASKS_FILE), tasks)?;
        Ok(())
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// Render every field of an agent persona with the custom variables.
    pub fn render_agent(&self, agent: &AgentPrompt) -> AgentPrompt {
        let vars = HashMap::new();
        AgentPrompt {
            role: self.render_with_custom(&agent.role, &vars),
            goal: self.render_with_custom(&agent.goal, &vars),
            backstory: self.render_with_custom(&agent.backstory, &vars),
        }
    }

    /// Render a task with custom variables plus task-specific ones.
    pub fn render_task(&self, task: &TaskPrompt, vars: &HashMap<String, String>) -> TaskPrompt {
        TaskPrompt {
            description: self.render_with_custom(&task.description, vars),
            expected_output: self.render_with_custom(&task.expected_output, vars),
        }
    }
}
