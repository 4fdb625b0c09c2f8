//! Prompt templates sent to the text generation service.
//!
//! Templates are deterministic: the same sanitized inputs always produce the
//! same prompt. Every template ends with the raw-JSON instruction so replies
//! can be parsed without markdown fences in the common case.

/// Number of question/answer pairs requested per mock interview.
pub const DEFAULT_QUESTION_COUNT: usize = 5;

const RAW_JSON_INSTRUCTION: &str =
    "Respond with raw JSON only. Do not wrap the JSON in code fences and do not add any text before or after it.";

/// A single prompt for the generation service. Derived per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Prompt asking for interview questions with reference answers.
pub fn questions_prompt(role: &str, stack: &str, years: u32) -> GenerationRequest {
    questions_prompt_with_count(role, stack, years, DEFAULT_QUESTION_COUNT)
}

pub fn questions_prompt_with_count(
    role: &str,
    stack: &str,
    years: u32,
    count: usize,
) -> GenerationRequest {
    GenerationRequest::new(format!(
        "Job position: {role}\n\
         Job description and tech stack: {stack}\n\
         Years of experience: {years}\n\n\
         Based on this information, write {count} technical interview questions \
         suited to the candidate's level, each with a concise model answer.\n\
         Return a JSON object of the form \
         {{\"questions\": [{{\"question\": \"...\", \"answer\": \"...\"}}]}}.\n\
         {RAW_JSON_INSTRUCTION}"
    ))
}

/// Prompt asking for feedback on an answer to a stored interview question.
pub fn answer_feedback_prompt(question: &str, reference_answer: &str, user_answer: &str) -> GenerationRequest {
    GenerationRequest::new(format!(
        "Interview question: {question}\n\
         Reference answer: {reference_answer}\n\
         Candidate answer: {user_answer}\n\n\
         Compare the candidate answer with the reference answer and evaluate it.\n\
         {}",
        feedback_contract()
    ))
}

/// Prompt asking for feedback on free-form caller text.
pub fn feedback_prompt(text: &str) -> GenerationRequest {
    GenerationRequest::new(format!(
        "Evaluate the following interview response:\n{text}\n\n{}",
        feedback_contract()
    ))
}

fn feedback_contract() -> String {
    format!(
        "Return a JSON object of the form \
         {{\"rating\": <integer 1-10>, \"feedback\": \"...\", \
         \"strengths\": [\"...\"], \"improvements\": [\"...\"]}}.\n\
         {RAW_JSON_INSTRUCTION}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn questions_prompt_embeds_inputs() {
        let request = questions_prompt("Backend Engineer", "Rust, Postgres", 4);
        assert!(request.prompt.contains("Job position: Backend Engineer"));
        assert!(request.prompt.contains("Rust, Postgres"));
        assert!(request.prompt.contains("Years of experience: 4"));
        assert!(request.prompt.contains("write 5 technical"));
        assert!(request.prompt.ends_with(RAW_JSON_INSTRUCTION));
    }

    #[test]
    fn prompts_are_deterministic() {
        assert_eq!(
            questions_prompt("Dev", "Go", 1),
            questions_prompt("Dev", "Go", 1)
        );
        assert_eq!(feedback_prompt("some answer"), feedback_prompt("some answer"));
    }

    #[test]
    fn feedback_prompts_describe_contract() {
        let by_answer = answer_feedback_prompt("What is ownership?", "Single owner", "GC");
        assert!(by_answer.prompt.contains("Candidate answer: GC"));
        assert!(by_answer.prompt.contains("\"rating\""));

        let free = feedback_prompt("I would use a hash map");
        assert!(free.prompt.contains("I would use a hash map"));
        assert!(free.prompt.contains("\"improvements\""));
    }
}
