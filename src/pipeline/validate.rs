//! Validation of the scorer's structured output.
//!
//! The scorer must return a document that deserializes into
//! [`VideoIdeasList`] and that accounts for every researched idea exactly once.
//! Anything else is a schema-validation failure.

use super::model::{ResearchItem, ResearchedIdea, VideoIdeasList};
use crate::error::{IdeacrewError, Result};
use crate::llm::extract_json;
use std::collections::{HashMap, HashSet};

/// Constraints applied on top of the structural schema.
#[derive(Debug, Clone, Copy)]
pub struct ScoreRules {
    pub min_score: i64,
    pub max_score: i64,
    pub max_research_results: usize,
}

/// Parse and validate scorer output against the ideas that were researched.
pub fn validate_scored(
    content: &str,
    researched: &[ResearchedIdea],
    rules: &ScoreRules,
) -> Result<VideoIdeasList> {
    let json_str = extract_json(content);

    let value: serde_json::Value = serde_json::from_str(json_str).map_err(|e| {
        IdeacrewError::SchemaValidation {
            violations: vec![format!("output is not a JSON document: {}", e)],
        }
    })?;

    let list: VideoIdeasList =
        serde_json::from_value(value).map_err(|e| IdeacrewError::SchemaValidation {
            violations: vec![format!("output does not match VideoIdeasList: {}", e)],
        })?;

    let violations = check_constraints(&list, researched, rules);
    if violations.is_empty() {
        Ok(list)
    } else {
        Err(IdeacrewError::SchemaValidation { violations })
    }
}

fn check_constraints(
    list: &VideoIdeasList,
    researched: &[ResearchedIdea],
    rules: &ScoreRules,
) -> Vec<String> {
    let mut violations = Vec::new();

    // How many researched ideas each (video_id, comment_id) pair stands for,
    // and the evidence gathered for it, by URL.
    let mut expected: HashMap<(&str, &str), usize> = HashMap::new();
    let mut evidence: HashMap<(&str, &str), HashMap<&str, &ResearchItem>> = HashMap::new();
    for r in researched {
        let key = (r.idea.video_id.as_str(), r.idea.comment_id.as_str());
        *expected.entry(key).or_default() += 1;
        evidence
            .entry(key)
            .or_default()
            .extend(r.research.iter().map(|item| (item.url.as_str(), item)));
    }

    let mut seen: HashMap<(&str, &str), usize> = HashMap::new();

    for (i, idea) in list.video_ideas.iter().enumerate() {
        let at = format!("video_ideas[{}]", i);

        if idea.score < rules.min_score || idea.score > rules.max_score {
            violations.push(format!(
                "{}.score: {} is outside {}..={}",
                at, idea.score, rules.min_score, rules.max_score
            ));
        }

        if idea.video_title.trim().is_empty() {
            violations.push(format!("{}.video_title is empty", at));
        }

        if idea.research.len() > rules.max_research_results {
            violations.push(format!(
                "{}.research has {} items, more than {}",
                at,
                idea.research.len(),
                rules.max_research_results
            ));
        }

        let key = (idea.video_id.as_str(), idea.comment_id.as_str());
        match evidence.get(&key) {
            None => violations.push(format!(
                "{}: (video_id '{}', comment_id '{}') does not match any researched idea",
                at, idea.video_id, idea.comment_id
            )),
            Some(gathered) => {
                *seen.entry(key).or_default() += 1;
                let mut listed = HashSet::new();
                for item in &idea.research {
                    if !listed.insert(item.url.as_str()) {
                        violations.push(format!("{}.research: {} is listed twice", at, item.url));
                    }
                    match gathered.get(item.url.as_str()) {
                        None => violations.push(format!(
                            "{}.research: {} was not found during research",
                            at, item.url
                        )),
                        Some(&found) if found != item => violations.push(format!(
                            "{}.research: {} differs from the evidence gathered for it",
                            at, item.url
                        )),
                        Some(_) => {}
                    }
                }
            }
        }
    }

    let mut keys: Vec<_> = expected.keys().copied().collect();
    keys.sort();
    for key in keys {
        let want = expected[&key];
        let got = seen.get(&key).copied().unwrap_or(0);
        if got != want {
            violations.push(format!(
                "idea for comment '{}' on video '{}' scored {} time(s), expected {}",
                key.1, key.0, got, want
            ));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::Comment;
    use crate::pipeline::model::CandidateIdea;
    use serde_json::json;

    const RULES: ScoreRules = ScoreRules {
        min_score: 1,
        max_score: 10,
        max_research_results: 2,
    };

    fn researched() -> Vec<ResearchedIdea> {
        vec![ResearchedIdea {
            idea: CandidateIdea::from_comment(&Comment::new("c2", "v1", "Please cover topic X"), "Topic X", "d"),
            research: vec![ResearchItem {
                title: "Topic X intro".to_string(),
                url: "https://www.youtube.com/watch?v=xxxxxxxxxxx".to_string(),
                view_count: 1200,
            }],
            notes: String::new(),
        }]
    }

    fn scored(score: serde_json::Value, research: serde_json::Value) -> String {
        json!({"video_ideas": [{
            "score": score,
            "video_title": "Topic X explained",
            "description": "d",
            "video_id": "v1",
            "comment_id": "c2",
            "research": research
        }]})
        .to_string()
    }

    fn evidence() -> serde_json::Value {
        json!([{"title": "Topic X intro", "url": "https://www.youtube.com/watch?v=xxxxxxxxxxx", "view_count": 1200}])
    }

    #[test]
    fn test_valid_output_passes() {
        let list = validate_scored(&scored(json!(8), evidence()), &researched(), &RULES).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.video_ideas[0].score, 8);
    }

    #[test]
    fn test_wrong_type_is_schema_failure() {
        let err = validate_scored(&scored(json!("eight"), evidence()), &researched(), &RULES).unwrap_err();
        assert!(err.is_schema_failure());
    }

    #[test]
    fn test_missing_field_is_schema_failure() {
        let content = r#"{"video_ideas": [{"score": 5, "video_title": "t", "video_id": "v1", "comment_id": "c2", "research": []}]}"#;
        let err = validate_scored(content, &researched(), &RULES).unwrap_err();
        assert!(err.is_schema_failure());
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_negative_view_count_is_schema_failure() {
        let research = json!([{"title": "t", "url": "https://www.youtube.com/watch?v=xxxxxxxxxxx", "view_count": -1}]);
        let err = validate_scored(&scored(json!(5), research), &researched(), &RULES).unwrap_err();
        assert!(err.is_schema_failure());
    }

    #[test]
    fn test_not_json_is_schema_failure() {
        let err = validate_scored("I think they are all great.", &researched(), &RULES).unwrap_err();
        assert!(err.is_schema_failure());
    }

    #[test]
    fn test_out_of_range_score() {
        let err = validate_scored(&scored(json!(11), evidence()), &researched(), &RULES).unwrap_err();
        match err {
            IdeacrewError::SchemaValidation { violations } => {
                assert_eq!(violations, vec!["video_ideas[0].score: 11 is outside 1..=10".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_untraceable_and_missing_ideas() {
        let content = json!({"video_ideas": [{
            "score": 5, "video_title": "t", "description": "d",
            "video_id": "v1", "comment_id": "c9", "research": []
        }]})
        .to_string();

        let err = validate_scored(&content, &researched(), &RULES).unwrap_err();
        let IdeacrewError::SchemaValidation { violations } = err else {
            panic!("expected schema failure");
        };
        assert_eq!(violations.len(), 2);
        assert!(violations[0].contains("does not match any researched idea"));
        assert!(violations[1].contains("scored 0 time(s), expected 1"));
    }

    #[test]
    fn test_invented_evidence_is_rejected() {
        let research = json!([{"title": "Fake", "url": "https://example.com/fake", "view_count": 5}]);
        let err = validate_scored(&scored(json!(5), research), &researched(), &RULES).unwrap_err();
        assert!(err.to_string().contains("was not found during research"));
    }

    #[test]
    fn test_rewritten_evidence_is_rejected() {
        let research = json!([
            {"title": "Invented title", "url": "https://www.youtube.com/watch?v=xxxxxxxxxxx", "view_count": 999999999},
            {"title": "Topic X intro", "url": "https://www.youtube.com/watch?v=xxxxxxxxxxx", "view_count": 1200}
        ]);
        let err = validate_scored(&scored(json!(5), research), &researched(), &RULES).unwrap_err();
        let IdeacrewError::SchemaValidation { violations } = err else {
            panic!("expected schema failure");
        };
        assert_eq!(violations.len(), 2);
        assert!(violations[0].contains("differs from the evidence gathered"));
        assert!(violations[1].contains("is listed twice"));
    }

    #[test]
    fn test_empty_list_for_no_ideas() {
        let list = validate_scored(r#"{"video_ideas": []}"#, &[], &RULES).unwrap();
        assert!(list.is_empty());
    }
}
