//! Doctor command - verify API keys and configuration.

use crate::cli::Output;
use crate::config::{Settings, AGENTS_FILE, TASKS_FILE};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &std::path::Path) -> anyhow::Result<()> {
    Output::header("Ideacrew Doctor");
    println!();
    println!("Checking API keys and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_checks = vec![
        check_llm_key(settings),
        CheckResult::ok("Model", &settings.llm.model),
        check_youtube_key(settings),
    ];
    for check in &api_checks {
        check.print();
    }
    checks.extend(api_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_checks = vec![
        check_config_file(config_path),
        check_settings(settings),
        check_prompts_dir(settings),
    ];
    for check in &config_checks {
        check.print();
    }
    checks.extend(config_checks);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before running the crew.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Ideacrew is ready to use.");
    }

    Ok(())
}

/// Show only the start and end of a secret.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn check_llm_key(settings: &Settings) -> CheckResult {
    let endpoint = settings.llm.base_url.as_deref();
    match (settings.llm.api_key.as_deref(), endpoint) {
        (Some(key), _) if !key.trim().is_empty() => {
            let where_ = endpoint.unwrap_or("api.openai.com");
            CheckResult::ok(
                "OPENAI_API_KEY",
                &format!("configured ({}) for {}", mask(key), where_),
            )
        }
        (_, Some(base)) => CheckResult::warning(
            "OPENAI_API_KEY",
            &format!("not set, using custom endpoint {}", base),
            "Fine for local servers; set OPENAI_API_KEY if the endpoint needs one",
        ),
        _ => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...' (or add it to .env)",
        ),
    }
}

fn check_youtube_key(settings: &Settings) -> CheckResult {
    match settings.youtube.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => {
            CheckResult::ok("YOUTUBE_API_KEY", &format!("configured ({})", mask(key)))
        }
        _ => CheckResult::error(
            "YOUTUBE_API_KEY",
            "not set",
            "Create a YouTube Data API v3 key and export YOUTUBE_API_KEY",
        ),
    }
}

fn check_config_file(config_path: &std::path::Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: ideacrew config edit",
        )
    }
}

fn check_settings(settings: &Settings) -> CheckResult {
    match settings.validate() {
        Ok(()) => CheckResult::ok(
            "Pipeline settings",
            &format!(
                "scores {}..={}, up to {} research results per idea",
                settings.pipeline.min_score,
                settings.pipeline.max_score,
                settings.pipeline.max_research_results
            ),
        ),
        Err(e) => CheckResult::error("Pipeline settings", &e.to_string(), "Fix the [pipeline] section"),
    }
}

fn check_prompts_dir(settings: &Settings) -> CheckResult {
    let Some(dir) = settings.prompts_dir() else {
        return CheckResult::ok("Prompts", "built-in defaults");
    };

    if !dir.is_dir() {
        return CheckResult::error(
            "Prompts",
            &format!("{} does not exist", dir.display()),
            "Create it with: ideacrew prompts export <dir>",
        );
    }

    let overrides: Vec<&str> = [AGENTS_FILE, TASKS_FILE]
        .into_iter()
        .filter(|f| dir.join(f).exists())
        .collect();

    if overrides.is_empty() {
        CheckResult::warning(
            "Prompts",
            &format!("{} has no overrides", dir.display()),
            "Add agents.toml or tasks.toml, or remove prompts.custom_dir",
        )
    } else {
        CheckResult::ok(
            "Prompts",
            &format!("{} ({})", dir.display(), overrides.join(", ")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("short"), "*****");
        assert_eq!(mask("sk-abcdefghijklmnop1234"), "sk-abcd...1234");
    }

    #[test]
    fn test_missing_keys_are_errors() {
        let settings = Settings::default();
        assert_eq!(check_llm_key(&settings).status, CheckStatus::Error);
        assert_eq!(check_youtube_key(&settings).status, CheckStatus::Error);
    }

    #[test]
    fn test_prompts_dir_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TASKS_FILE), "").unwrap();

        let mut settings = Settings::default();
        settings.prompts.custom_dir = Some(dir.path().display().to_string());

        let result = check_prompts_dir(&settings);
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.contains(TASKS_FILE));
    }
}
