use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MAX_SKILLS: usize = 5;
pub const MAX_MISSING_KEYWORDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Chat,
    ResumeAnalysis,
}

/// Input to one orchestration call. `source_text` is only read by synthesis.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    kind: GenerationKind,
    prompt_text: String,
    source_text: String,
}

impl GenerationRequest {
    pub fn chat(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: GenerationKind::Chat,
            prompt_text: message.clone(),
            source_text: message,
        }
    }

    pub fn resume_analysis(prompt_text: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            kind: GenerationKind::ResumeAnalysis,
            prompt_text: prompt_text.into(),
            source_text: source_text.into(),
        }
    }

    pub fn kind(&self) -> GenerationKind {
        self.kind
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(String),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAttempt {
    pub model_id: String,
    pub outcome: AttemptOutcome,
}

impl ModelAttempt {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Success(_))
    }
}

/// Result of one orchestration call, with the per-model trail for diagnostics.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub was_synthesized: bool,
    pub attempts: Vec<ModelAttempt>,
}

impl Generation {
    /// Error detail of the last failed attempt, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.attempts.iter().rev().find_map(|a| match &a.outcome {
            AttemptOutcome::Failure(detail) => Some(detail.as_str()),
            AttemptOutcome::Success(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevel {
    pub name: String,
    pub level: u8,
}

/// Resume analysis returned to the client. Always fully populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub score: u8,
    pub skills: Vec<SkillLevel>,
    pub missing_keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestion: String,
}

impl AnalysisResult {
    /// Builds a result from whatever object the model produced.
    ///
    /// Missing or mistyped fields become empty values; numbers are clamped to
    /// 0..=100 and the skill / keyword lists are capped.
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        let skills = obj
            .get("skills")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(skill_from_value).take(MAX_SKILLS).collect())
            .unwrap_or_default();

        let mut missing_keywords: Vec<String> = Vec::new();
        for keyword in string_list(obj.get("missingKeywords")) {
            if missing_keywords.len() == MAX_MISSING_KEYWORDS {
                break;
            }
            if !missing_keywords
                .iter()
                .any(|k| k.eq_ignore_ascii_case(&keyword))
            {
                missing_keywords.push(keyword);
            }
        }

        AnalysisResult {
            score: obj.get("score").map(clamp_percent).unwrap_or(0),
            skills,
            missing_keywords,
            strengths: string_list(obj.get("strengths")),
            weaknesses: string_list(obj.get("weaknesses")),
            suggestion: obj
                .get("suggestion")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string(),
        }
    }
}

fn skill_from_value(value: &Value) -> Option<SkillLevel> {
    let (name, level) = match value {
        Value::String(name) => (name.as_str(), 0),
        Value::Object(obj) => (
            obj.get("name").and_then(Value::as_str)?,
            obj.get("level").map(clamp_percent).unwrap_or(0),
        ),
        _ => return None,
    };
    let name = name.trim();
    (!name.is_empty()).then(|| SkillLevel {
        name: name.to_string(),
        level,
    })
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Numbers and numeric strings, rounded and clamped to 0..=100. Anything else is 0.
fn clamp_percent(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_object_defaults_everything() {
        let result = AnalysisResult::from_object(&Map::new());
        assert_eq!(result.score, 0);
        assert!(result.skills.is_empty());
        assert!(result.missing_keywords.is_empty());
        assert!(result.strengths.is_empty());
        assert!(result.weaknesses.is_empty());
        assert_eq!(result.suggestion, "");
    }

    #[test]
    fn test_scores_are_clamped() {
        let result = AnalysisResult::from_object(&object(json!({
            "score": 140,
            "skills": [{"name": "Rust", "level": -3}, {"name": "Go", "level": 77.6}]
        })));
        assert_eq!(result.score, 100);
        assert_eq!(result.skills[0].level, 0);
        assert_eq!(result.skills[1].level, 78);
    }

    #[test]
    fn test_numeric_string_score_is_accepted() {
        let result = AnalysisResult::from_object(&object(json!({"score": "72%"})));
        assert_eq!(result.score, 72);
    }

    #[test]
    fn test_lists_are_capped_and_deduplicated() {
        let result = AnalysisResult::from_object(&object(json!({
            "skills": ["A", "B", "C", "D", "E", "F", "G"],
            "missingKeywords": ["Docker", "docker", "AWS", "CI/CD", "Kubernetes"]
        })));
        assert_eq!(result.skills.len(), MAX_SKILLS);
        assert_eq!(result.missing_keywords, vec!["Docker", "AWS", "CI/CD"]);
    }

    #[test]
    fn test_malformed_entries_are_dropped() {
        let result = AnalysisResult::from_object(&object(json!({
            "skills": [{"level": 50}, 42, {"name": "  "}, {"name": "SQL", "level": 60}],
            "strengths": ["Clear", 7, null, ""],
            "suggestion": 12
        })));
        assert_eq!(
            result.skills,
            vec![SkillLevel {
                name: "SQL".to_string(),
                level: 60
            }]
        );
        assert_eq!(result.strengths, vec!["Clear"]);
        assert_eq!(result.suggestion, "");
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = AnalysisResult::from_object(&object(json!({"missingKeywords": ["AWS"]})));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["missingKeywords"], json!(["AWS"]));
        assert!(value.get("missing_keywords").is_none());
    }
}
