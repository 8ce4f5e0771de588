// Prompt templates sent to the generation model.

/// Resume text beyond this many characters is not sent to the model.
pub const MAX_RESUME_CHARS: usize = 4000;

pub const RESUME_ANALYSIS_PROMPT: &str = r#"You are an expert AI Resume Analyzer for software engineering placements.
Analyze the following resume text and provide a strict JSON output.

Resume Text:
{resume_text}

Output Format (JSON strictly):
{
    "score": <integer_0_to_100>,
    "skills": [ {"name": "<skill_name>", "level": <integer_0_to_100>}, ... ],
    "missingKeywords": ["<keyword1>", "<keyword2>", ...],
    "strengths": ["<strength1>", ...],
    "weaknesses": ["<weakness1>", ...],
    "suggestion": "<comprehensive_feedback_string>"
}"#;

/// Builds the resume analysis prompt, truncating the resume on a char boundary.
pub fn resume_analysis_prompt(resume_text: &str) -> String {
    let truncated = match resume_text.char_indices().nth(MAX_RESUME_CHARS) {
        Some((idx, _)) => &resume_text[..idx],
        None => resume_text,
    };
    RESUME_ANALYSIS_PROMPT.replace("{resume_text}", truncated)
}
