use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::domain::argument::ToolArgument;
use crate::domain::chat::{ChatMessage, ToolCall};
use crate::domain::ticket::IssueOutcome;
use crate::error::AppResult;
use crate::services::LanguageModelService;
use crate::workflow::ticket::{CREATE_TICKET_TOOL, GuardedTicketTool};

pub const MAX_AGENT_STEPS: usize = 6;

const SYSTEM_PROMPT: &str = "You are an assistant that files Jira tickets. \
When the user asks for a ticket, call the CreateJiraTicket tool once with a plain-text \
summary and description taken from the request. Never call the tool a second time in \
the same conversation. After the tool returns, reply to the user with its result.";

/// Something the agent did during a run, kept for display.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentStep {
    Thought(String),
    ToolCall { name: String, arguments: Value },
    Observation { name: String, result: String },
}

#[derive(Debug, Clone)]
pub struct AgentReport {
    pub steps: Vec<AgentStep>,
    pub answer: String,
    /// Ticket created during the run, otherwise the latest failed attempt.
    pub outcome: Option<IssueOutcome>,
}

/// Tool-use loop for a single user request.
pub struct Agent {
    language_model: Arc<dyn LanguageModelService>,
    tool: GuardedTicketTool,
}

impl Agent {
    pub fn new(language_model: Arc<dyn LanguageModelService>, tool: GuardedTicketTool) -> Self {
        Self {
            language_model,
            tool,
        }
    }

    /// Handles one request. Each call is a new run, so the guard starts `Fresh`.
    pub async fn run(&self, request: &str) -> AppResult<AgentReport> {
        self.tool.reset();
        info!(request = %request, "starting run");

        let tools = [GuardedTicketTool::definition()];
        let mut messages = vec![
            ChatMessage::System(SYSTEM_PROMPT.to_string()),
            ChatMessage::User(request.to_string()),
        ];
        let mut steps = Vec::new();
        let mut outcome = None;
        let mut last_observation = None;

        for step in 0..MAX_AGENT_STEPS {
            let turn = self.language_model.complete(&messages, &tools).await?;
            debug!(step, tool_calls = turn.tool_calls.len(), "model replied");

            let content = turn.content.trim().to_string();
            if !turn.has_tool_calls() {
                let answer = if content.is_empty() {
                    last_observation.unwrap_or_else(|| "No ticket was requested.".to_string())
                } else {
                    content
                };
                self.log_finished(&outcome);
                return Ok(AgentReport {
                    steps,
                    answer,
                    outcome,
                });
            }

            if !content.is_empty() {
                steps.push(AgentStep::Thought(content.clone()));
            }
            messages.push(ChatMessage::Assistant {
                content,
                tool_calls: turn.tool_calls.clone(),
            });

            for call in turn.tool_calls {
                steps.push(AgentStep::ToolCall {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                });

                let (result, attempt) = self.dispatch(&call).await;
                record_attempt(&mut outcome, attempt);

                steps.push(AgentStep::Observation {
                    name: call.name.clone(),
                    result: result.clone(),
                });
                messages.push(ChatMessage::Tool {
                    call_id: call.id,
                    name: call.name,
                    content: result.clone(),
                });
                last_observation = Some(result);
            }
        }

        warn!(max_steps = MAX_AGENT_STEPS, "agent stopped without a final answer");
        self.log_finished(&outcome);
        let answer = last_observation.unwrap_or_else(|| {
            format!("Agent stopped after {MAX_AGENT_STEPS} steps without a final answer.")
        });
        Ok(AgentReport {
            steps,
            answer,
            outcome,
        })
    }

    fn log_finished(&self, outcome: &Option<IssueOutcome>) {
        info!(
            ticket = outcome.as_ref().and_then(IssueOutcome::issue_key).unwrap_or("none"),
            guard_used = self.tool.is_used(),
            "run finished"
        );
    }

    async fn dispatch(&self, call: &ToolCall) -> (String, Option<IssueOutcome>) {
        if call.name != CREATE_TICKET_TOOL {
            warn!(tool = %call.name, "model requested an unknown tool");
            return (
                format!(
                    "Unknown tool '{}'. The only available tool is {CREATE_TICKET_TOOL}.",
                    call.name
                ),
                None,
            );
        }

        let Value::Object(args) = &call.arguments else {
            return (invalid_arguments("arguments must be a JSON object"), None);
        };
        if let Some(raw) = args.get("raw_arguments").and_then(Value::as_str) {
            return (
                invalid_arguments(&format!("could not parse arguments as JSON: {raw}")),
                None,
            );
        }

        let outcome = self
            .tool
            .create(argument(args, "summary"), argument(args, "description"))
            .await;
        (outcome.to_string(), Some(outcome))
    }
}

// A created ticket is never overwritten; a failure can be superseded by a
// later success when the policy releases the claim.
fn record_attempt(outcome: &mut Option<IssueOutcome>, attempt: Option<IssueOutcome>) {
    let Some(attempt) = attempt else {
        return;
    };
    if matches!(attempt, IssueOutcome::Skipped { .. }) {
        return;
    }
    if !matches!(outcome, Some(IssueOutcome::Created { .. })) {
        *outcome = Some(attempt);
    }
}

fn argument(args: &Map<String, Value>, name: &str) -> ToolArgument {
    args.get(name)
        .cloned()
        .map(ToolArgument::from)
        .unwrap_or_else(|| ToolArgument::Text(String::new()))
}

fn invalid_arguments(reason: &str) -> String {
    format!(
        "Invalid {CREATE_TICKET_TOOL} call: {reason}. \
         Provide an object with string fields \"summary\" and \"description\"."
    )
}
