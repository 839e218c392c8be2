// Resume parsing LLM prompt templates.

pub const RESUME_PARSE_SYSTEM: &str = "\
You are a precise resume data extractor for a recruiting platform in Germany. \
Respond with valid JSON only, with no markdown fences and no explanations. \
Only report what the resume states. Use null for anything that is not stated.";

pub const RESUME_PARSE_PROMPT: &str = r#"Extract the candidate's profile from the resume text below.

RESUME TEXT:
{resume_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "full_name": "string" | null,
  "title": "string" | null,
  "skills": ["string"],
  "city": "string" | null,
  "country": "string" | null,
  "german_level": "none" | "basic" | "intermediate" | "fluent" | "native" | null,
  "experience_level": "junior" | "mid" | "senior" | "lead" | null,
  "linkedin_url": "string" | null,
  "github_url": "string" | null
}

Rules:
- skills: technologies, tools and methods, one per item, no duplicates
- german_level: only when the resume states German proficiency
- experience_level: infer from total years of professional experience
  (under 2 = junior, 2 to 5 = mid, 5 to 10 = senior, over 10 = lead)"#;
