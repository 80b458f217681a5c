//! Teaching-material generation from aggregated page text.
//!
//! One request with a fixed tone-setting instruction. Unlike classification,
//! failures here propagate — the caller must not write an output file when
//! generation fails.

use tracing::{debug, instrument};

use coursesmith_shared::Result;

use crate::LlmClient;

/// Tone and audience directive for the generated material.
fn material_system_prompt(subject: &str) -> String {
    format!(
        "You are a funny and kind teacher creating engaging and easy-to-understand \
         learning materials for 11-year-olds to learn {subject}. \
         Use lots of examples and quizzes."
    )
}

/// User prompt embedding the course name and the aggregated page text.
fn material_user_prompt(course_name: &str, subject: &str, details: &str) -> String {
    format!(
        "You are reviewing a {subject} teaching website called {course_name}.\n\
         Here are the contents of its landing page and relevant pages:\n\
         {details}\n\
         Use this information to create teaching material."
    )
}

/// Generate Markdown teaching material from aggregated page text.
///
/// `details` is expected to already be truncated to the configured prompt
/// budget. Returns the model's raw response text.
#[instrument(skip(client, details), fields(details_len = details.len()))]
pub async fn generate_material(
    client: &LlmClient,
    course_name: &str,
    subject: &str,
    details: &str,
) -> Result<String> {
    let system = material_system_prompt(subject);
    let user = material_user_prompt(course_name, subject, details);

    let material = client.chat(&system, &user).await?;
    debug!(material_len = material.len(), "material generated");
    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn prompts_mention_course_and_subject() {
        let system = material_system_prompt("Rust");
        assert!(system.contains("learn Rust"));

        let user = material_user_prompt("LearnRust", "Rust", "Webpage Title: Home");
        assert!(user.contains("called LearnRust"));
        assert!(user.contains("Webpage Title: Home"));
    }

    #[tokio::test]
    async fn generation_returns_material() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({"model": "gpt-4o-mini"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(crate::tests::chat_body(
                "# Welcome!\n\nLet's learn together.",
            )))
            .mount(&server)
            .await;

        let client = LlmClient::new(server.uri(), "sk-test-abcdefghij", "gpt-4o-mini").unwrap();
        let material = generate_material(&client, "LearnPython", "Python", "some details")
            .await
            .unwrap();

        assert!(material.starts_with("# Welcome!"));
    }

    #[tokio::test]
    async fn generation_failure_propagates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = LlmClient::new(server.uri(), "sk-test-abcdefghij", "gpt-4o-mini").unwrap();
        let result = generate_material(&client, "LearnPython", "Python", "details").await;
        assert!(result.is_err());
    }
}
