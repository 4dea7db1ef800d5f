// Prompt constants for interview question generation and applicant feedback.

/// System prompt for question generation: JSON array only.
pub const QUESTIONS_SYSTEM: &str = "You are an experienced technical recruiter writing \
    interview questions. \
    You MUST respond with valid JSON only, a JSON array of question objects. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Replace: {count}, {job_role}, {existing_json}
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Write {count} new interview questions for the role: {job_role}

The interview already contains these questions. Do NOT repeat or paraphrase any of them:
{existing_json}

Return a JSON ARRAY with this EXACT shape:
[
  {"question": "Describe a time you debugged a production outage.", "difficulty": "Intermediate"}
]

Rules:
1. `difficulty` must be exactly one of "Easy", "Intermediate", "Advanced"
2. Mix difficulties across the set
3. Each question is a single sentence or two, answerable verbally in a few minutes
4. Questions must be specific to the role, not generic personality questions"#;

/// System prompt for applicant feedback: one JSON object only.
pub const FEEDBACK_SYSTEM: &str = "You are a senior hiring manager assessing a completed \
    interview. Be fair, specific and evidence-based; judge only what the answers show. \
    You MUST respond with valid JSON only, a single JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Replace: {applicant_name}, {job_role}, {responses_json}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"Assess applicant {applicant_name} for the role: {job_role}

Interview transcript (question, answer, difficulty), in order:
{responses_json}

An answer of "No response provided" means the applicant skipped the question; treat it as a gap.

Return a JSON object with this EXACT schema:
{
  "overallScore": 72,
  "recommendation": "One or two sentences: hire / consider / do not proceed, and why.",
  "personalityProfile": {
    "traits": ["analytical", "calm under pressure"],
    "communicationStyle": "Concise and structured",
    "confidence": 65
  },
  "performanceAnalysis": {
    "strengths": ["..."],
    "weaknesses": ["..."],
    "technicalSkills": ["..."]
  },
  "improvementSuggestions": ["..."]
}

`overallScore` and `confidence` are integers from 0 to 100."#;
