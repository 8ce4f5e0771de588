//! Mock Synthesis — the deterministic stand-in used when every model fails.
//!
//! All rules are tabulated below and evaluated by `synthesize`. No randomness,
//! no network: the same resume text always produces the same result.

use crate::analysis::models::{AnalysisResult, SkillLevel, MAX_MISSING_KEYWORDS, MAX_SKILLS};

/// Technical terms recognised in a resume, in reporting order.
/// Matched as whole words, see `mentions_term`.
pub const SKILL_VOCABULARY: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "TypeScript",
    "React",
    "Node.js",
    "SQL",
    "C++",
    "Docker",
    "Kubernetes",
    "AWS",
    "Git",
    "Machine Learning",
    "Rust",
    "Golang",
    "HTML",
    "CSS",
    "Linux",
];

/// Reported when no vocabulary term is present.
pub const GENERIC_SKILLS: &[&str] = &["Technical Communication", "Project Management"];

/// Improvement areas suggested when absent from the resume.
pub const IMPROVEMENT_AREAS: &[&str] = &[
    "Docker",
    "AWS",
    "CI/CD",
    "System Design",
    "Unit Testing",
    "Kubernetes",
    "REST APIs",
];

const BASE_SCORE: u32 = 65;
const CHARS_PER_POINT: usize = 200;
const MAX_LENGTH_BONUS: u32 = 25;
const MAX_SCORE: u32 = 98;
const SECTION_BONUSES: &[(&str, u32)] = &[("education", 5), ("experience", 5)];

const FIRST_SKILL_LEVEL: u8 = 80;
const SKILL_LEVEL_STEP: u8 = 2;

/// Strength sets keyed on whether the resume has a skills section.
const STRENGTHS_WITH_SKILLS: &[&str] = &["Dedicated skills section", "Clear technical focus"];
const STRENGTHS_DEFAULT: &[&str] = &["Clear structure", "Relevant project experience"];
const WEAKNESSES: &[&str] = &[
    "Limited quantified achievements",
    "Could highlight more cloud-native experience",
];

pub const CHAT_FALLBACK_REPLY: &str = "I'm currently unable to reach the AI service, but I can \
    still offer general placement advice: practice coding problems daily, prepare a clear \
    'tell me about yourself' answer, and quantify the achievements on your resume.";

pub fn synthesize(source_text: &str) -> AnalysisResult {
    let haystack = source_text.to_lowercase();
    let contains = |term: &str| haystack.contains(&term.to_lowercase());
    let mentions = |term: &str| mentions_term(&haystack, term);

    let mut skill_names: Vec<&str> = SKILL_VOCABULARY
        .iter()
        .copied()
        .filter(|&term| mentions(term))
        .take(MAX_SKILLS)
        .collect();
    if skill_names.is_empty() {
        skill_names = GENERIC_SKILLS.to_vec();
    }

    let skills: Vec<SkillLevel> = skill_names
        .iter()
        .zip((FIRST_SKILL_LEVEL..).step_by(SKILL_LEVEL_STEP as usize))
        .map(|(name, level)| SkillLevel {
            name: name.to_string(),
            level,
        })
        .collect();

    let missing_keywords: Vec<String> = IMPROVEMENT_AREAS
        .iter()
        .filter(|&&area| !mentions(area))
        .take(MAX_MISSING_KEYWORDS)
        .map(|area| area.to_string())
        .collect();

    let strengths = if contains("skills") {
        STRENGTHS_WITH_SKILLS
    } else {
        STRENGTHS_DEFAULT
    };

    let suggestion = suggestion(&skill_names, missing_keywords.first().map(String::as_str));

    AnalysisResult {
        score: synthesized_score(source_text, &contains),
        skills,
        missing_keywords,
        strengths: to_strings(strengths),
        weaknesses: to_strings(WEAKNESSES),
        suggestion,
    }
}

/// True when `term` occurs in the lowercased `haystack` with no letter or
/// digit directly before or after it.
fn mentions_term(haystack: &str, term: &str) -> bool {
    let needle = term.to_lowercase();
    haystack.match_indices(needle.as_str()).any(|(start, found)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + found.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn synthesized_score(source_text: &str, contains: &impl Fn(&str) -> bool) -> u8 {
    let length_bonus = (source_text.chars().count() / CHARS_PER_POINT) as u32;
    let section_bonus: u32 = SECTION_BONUSES
        .iter()
        .filter(|&&(word, _)| contains(word))
        .map(|(_, bonus)| bonus)
        .sum();
    let score = BASE_SCORE + length_bonus.min(MAX_LENGTH_BONUS) + section_bonus;
    score.min(MAX_SCORE) as u8
}

fn suggestion(skill_names: &[&str], first_missing: Option<&str>) -> String {
    let top = skill_names
        .iter()
        .take(2)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    match first_missing {
        Some(keyword) => format!(
            "Your resume highlights {top}. Consider adding experience with {keyword} to strengthen your profile."
        ),
        None => format!(
            "Your resume highlights {top}. Consider strengthening your profile further with measurable project outcomes."
        ),
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
