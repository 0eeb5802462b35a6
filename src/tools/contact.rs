//! Contact tool - submits the contact form to the backend

use super::{Tool, ToolContext, ToolOutput};
use crate::backend;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Contact form tool
pub struct ContactTool;

#[derive(Debug, Deserialize, Serialize)]
struct ContactForm {
    name: String,
    email: String,
    message: String,
}

impl ContactForm {
    fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.message]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ContactReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Interpret the contact endpoint's reply
fn interpret_reply(status: u16, body: &str) -> Result<(), String> {
    match serde_json::from_str::<ContactReply>(body) {
        Ok(reply) if reply.success => Ok(()),
        Ok(reply) => Err(reply
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "Failed to send message".to_string())),
        Err(_) if !backend::is_success(status) => Err(backend::status_error_message(status, body)),
        Err(e) => Err(format!("Failed to send message: {e}")),
    }
}

#[async_trait]
impl Tool for ContactTool {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn description(&self) -> String {
        "Send a message to the site owners through the contact form.".to_string()
    }

    fn usage(&self) -> &'static str {
        "/contact <name> | <email> | <message>"
    }

    async fn run(&self, input: Value, ctx: ToolContext) -> ToolOutput {
        let form: ContactForm = match serde_json::from_value(input) {
            Ok(f) => f,
            Err(e) => return ToolOutput::error(format!("Invalid input: {e}")),
        };
        if !form.is_complete() {
            return ToolOutput::error("Please fill in your name, email and message.");
        }

        let response = match ctx.http().post(&ctx.contact_url).json(&form).send().await {
            Ok(r) => r,
            Err(e) => return ToolOutput::error(format!("Error: {e}")),
        };
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        match interpret_reply(status, &body) {
            Ok(()) => ToolOutput::success("Message sent successfully!"),
            Err(message) => ToolOutput::error(format!("Error: {message}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context_for(server: &MockServer) -> (tempfile::TempDir, ToolContext) {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = super::super::test_context(dir.path());
        ctx.contact_url = format!("{}/api/contact", server.uri());
        (dir, ctx)
    }

    #[test]
    fn test_success_reply() {
        assert_eq!(interpret_reply(200, r#"{"success":true}"#), Ok(()));
    }

    #[test]
    fn test_failure_reply_uses_server_error() {
        assert_eq!(
            interpret_reply(400, r#"{"success":false,"error":"Invalid email"}"#),
            Err("Invalid email".to_string())
        );
        assert_eq!(
            interpret_reply(200, r#"{"success":false}"#),
            Err("Failed to send message".to_string())
        );
    }

    #[test]
    fn test_unparseable_reply() {
        assert_eq!(
            interpret_reply(502, "Bad Gateway"),
            Err("HTTP error! status: 502".to_string())
        );
        assert!(interpret_reply(200, "ok")
            .unwrap_err()
            .starts_with("Failed to send message"));
    }

    #[tokio::test]
    async fn test_incomplete_form_rejected_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        let output = ContactTool
            .run(
                json!({"name": "Ada", "email": "  ", "message": "hi"}),
                super::super::test_context(dir.path()),
            )
            .await;
        assert!(!output.success);
        assert_eq!(output.output, "Please fill in your name, email and message.");
    }

    #[tokio::test]
    async fn test_form_posted_to_contact_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/contact"))
            .and(body_json(json!({
                "name": "Ada",
                "email": "ada@example.com",
                "message": "Loved the summarizer",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        let (_dir, ctx) = context_for(&server);

        let output = ContactTool
            .run(
                json!({"name": "Ada", "email": "ada@example.com", "message": "Loved the summarizer"}),
                ctx,
            )
            .await;

        assert!(output.success, "{}", output.output);
        assert_eq!(output.output, "Message sent successfully!");
    }

    #[tokio::test]
    async fn test_server_rejection_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "error": "Invalid email",
            })))
            .mount(&server)
            .await;
        let (_dir, ctx) = context_for(&server);

        let output = ContactTool
            .run(json!({"name": "Ada", "email": "nope", "message": "hi"}), ctx)
            .await;

        assert!(!output.success);
        assert_eq!(output.output, "Error: Invalid email");
    }
}
