use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::JiraSettings;
use crate::domain::ticket::{Ticket, TicketDraft};
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub struct JiraClient {
    http: Client,
    settings: JiraSettings,
}

impl JiraClient {
    pub fn new(settings: JiraSettings) -> Self {
        Self {
            http: Client::new(),
            settings,
        }
    }

    fn auth_header(user: &str, token: &str) -> String {
        let credentials = format!("{user}:{token}");
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn issue_endpoint(base_url: &str) -> String {
        format!("{}/rest/api/3/issue", base_url.trim_end_matches('/'))
    }

    fn browse_url(base_url: &str, key: &str) -> String {
        format!("{}/browse/{}", base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn create_ticket(&self, draft: TicketDraft) -> AppResult<Ticket> {
        let settings = &self.settings;
        let request_body = JiraCreateIssueRequest::new(
            &settings.project_key,
            &settings.issue_type,
            &draft.summary,
            &draft.description,
        );

        debug!(
            project = %settings.project_key,
            issue_type = %settings.issue_type,
            summary = %draft.summary,
            "creating Jira issue"
        );

        let response = self
            .http
            .post(Self::issue_endpoint(&settings.base_url))
            .header(
                AUTHORIZATION,
                Self::auth_header(&settings.user, &settings.api_token),
            )
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::Network(format!("failed to call Jira: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::HttpStatus {
                service: "Jira",
                status: status.as_u16(),
                body,
            });
        }

        let payload: JiraCreateIssueResponse = response.json().await.map_err(|err| {
            AppError::MalformedResponse(format!("failed to parse Jira response: {err}"))
        })?;

        let key = payload.key.trim().to_string();
        if key.is_empty() {
            return Err(AppError::MalformedResponse(
                "Jira response did not include an issue key".to_string(),
            ));
        }

        info!(key = %key, "Jira issue created");
        let url = Some(Self::browse_url(&settings.base_url, &key));
        Ok(Ticket { key, url })
    }
}

#[derive(Serialize)]
struct JiraCreateIssueRequest {
    fields: JiraCreateIssueFields,
}

impl JiraCreateIssueRequest {
    fn new(project_key: &str, issue_type: &str, summary: &str, description: &str) -> Self {
        Self {
            fields: JiraCreateIssueFields {
                project: JiraProject {
                    key: project_key.to_string(),
                },
                summary: summary.to_string(),
                description: JiraDescription::single_paragraph(description),
                issuetype: JiraIssueType {
                    name: issue_type.to_string(),
                },
            },
        }
    }
}

#[derive(Serialize)]
struct JiraCreateIssueFields {
    project: JiraProject,
    summary: String,
    description: JiraDescription,
    issuetype: JiraIssueType,
}

#[derive(Serialize)]
struct JiraProject {
    key: String,
}

#[derive(Serialize)]
struct JiraIssueType {
    name: String,
}

/// Atlassian document: one paragraph holding the description verbatim.
#[derive(Serialize)]
struct JiraDescription {
    #[serde(rename = "type")]
    doc_type: &'static str,
    version: u8,
    content: Vec<JiraDocNode>,
}

impl JiraDescription {
    fn single_paragraph(description: &str) -> Self {
        Self {
            doc_type: "doc",
            version: 1,
            content: vec![JiraDocNode::paragraph(description.to_string())],
        }
    }
}

#[derive(Serialize)]
struct JiraDocNode {
    #[serde(rename = "type")]
    node_type: &'static str,
    content: Vec<JiraDocText>,
}

impl JiraDocNode {
    fn paragraph(text: String) -> Self {
        Self {
            node_type: "paragraph",
            content: vec![JiraDocText::text(text)],
        }
    }
}

#[derive(Serialize)]
struct JiraDocText {
    #[serde(rename = "type")]
    text_type: &'static str,
    text: String,
}

impl JiraDocText {
    fn text(text: String) -> Self {
        Self {
            text_type: "text",
            text,
        }
    }
}

#[derive(Deserialize)]
struct JiraCreateIssueResponse {
    key: String,
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn settings(base_url: &str) -> JiraSettings {
        JiraSettings {
            base_url: base_url.to_string(),
            user: "dev@acme.io".to_string(),
            api_token: "secret".to_string(),
            project_key: "JS".to_string(),
            issue_type: "Service Request".to_string(),
        }
    }

    #[test]
    fn serializes_issue_body() {
        let body = JiraCreateIssueRequest::new(
            "JS",
            "Service Request",
            "Login Bug",
            "Users cannot log in.\n\nSecond line.",
        );
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "fields": {
                    "project": {"key": "JS"},
                    "summary": "Login Bug",
                    "description": {
                        "type": "doc",
                        "version": 1,
                        "content": [{
                            "type": "paragraph",
                            "content": [{"type": "text", "text": "Users cannot log in.\n\nSecond line."}]
                        }]
                    },
                    "issuetype": {"name": "Service Request"}
                }
            })
        );
    }

    #[test]
    fn encodes_basic_auth() {
        assert_eq!(
            JiraClient::auth_header("user", "token"),
            "Basic dXNlcjp0b2tlbg=="
        );
    }

    #[tokio::test]
    async fn creates_issue_and_returns_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/3/issue")
            .match_header("accept", "application/json")
            .match_header("content-type", "application/json")
            .match_header(
                "authorization",
                JiraClient::auth_header("dev@acme.io", "secret").as_str(),
            )
            .match_body(Matcher::PartialJson(json!({
                "fields": {
                    "project": {"key": "JS"},
                    "summary": "Login Bug",
                    "issuetype": {"name": "Service Request"}
                }
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"10001","key":"JS-42","self":"https://acme/rest/api/3/issue/10001"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = JiraClient::new(settings(&server.url()));
        let ticket = client
            .create_ticket(TicketDraft::new("Login Bug", "Users cannot log in."))
            .await
            .unwrap();

        assert_eq!(ticket.key, "JS-42");
        assert_eq!(
            ticket.url.as_deref(),
            Some(format!("{}/browse/JS-42", server.url()).as_str())
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn passes_empty_strings_through() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/api/3/issue")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({"fields": {"summary": ""}})),
                Matcher::Regex(r#""text":"""#.to_string()),
            ]))
            .with_status(201)
            .with_body(r#"{"key":"JS-1"}"#)
            .create_async()
            .await;

        let client = JiraClient::new(settings(&server.url()));
        let ticket = client.create_ticket(TicketDraft::new("", "")).await.unwrap();
        assert_eq!(ticket.key, "JS-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn reports_http_status_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/3/issue")
            .with_status(401)
            .with_body("Unauthorized")
            .create_async()
            .await;

        let client = JiraClient::new(settings(&server.url()));
        let err = client
            .create_ticket(TicketDraft::new("Login Bug", "Users cannot log in."))
            .await
            .unwrap_err();

        match err {
            AppError::HttpStatus { status, body, .. } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Unauthorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/api/3/issue")
            .with_status(201)
            .with_body(r#"{"id":"10001"}"#)
            .create_async()
            .await;

        let client = JiraClient::new(settings(&server.url()));
        let err = client
            .create_ticket(TicketDraft::new("Login Bug", "Users cannot log in."))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn connection_failure_becomes_failed_outcome() {
        let client = JiraClient::new(settings("http://127.0.0.1:1"));
        let outcome = client
            .submit(TicketDraft::new("Login Bug", "Users cannot log in."))
            .await;

        let rendered = outcome.to_string();
        assert!(rendered.starts_with("❌ Error creating Jira ticket:"));
        assert!(rendered.contains("failed to call Jira"));
    }
}
