use std::io::{self, Write};

use crate::context::AppContext;
use crate::domain::ticket::IssueOutcome;
use crate::error::AppResult;
use crate::workflow::agent::{Agent, AgentStep};

const PROMPT_HINT: &str = "Enter your request (e.g. 'Create a Jira ticket with summary Login Bug \
and description Users cannot log in.')";

pub async fn run(ctx: &AppContext, request: Option<String>) -> AppResult<()> {
    let agent = ctx.new_agent()?;
    match request {
        Some(request) => run_once(&agent, &request).await,
        None => run_interactive(&agent).await,
    }
}

async fn run_once(agent: &Agent, request: &str) -> AppResult<()> {
    let report = agent.run(request).await?;

    for step in &report.steps {
        println!("{}", render_step(step));
    }
    println!();
    println!("{}", report.answer);
    if let Some(IssueOutcome::Created { ticket }) = &report.outcome {
        if let Some(url) = &ticket.url {
            println!("View ticket: {url}");
        }
    }
    Ok(())
}

async fn run_interactive(agent: &Agent) -> AppResult<()> {
    println!("Jira Ticket Agent");
    println!("{PROMPT_HINT}");
    println!("Submit an empty line or 'exit' to quit.");

    let stdin = io::stdin();
    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let request = input.trim();
        if request.is_empty() || matches!(request, "exit" | "quit") {
            break;
        }

        if let Err(err) = run_once(agent, request).await {
            eprintln!("Error: {err}");
        }
    }
    Ok(())
}

fn render_step(step: &AgentStep) -> String {
    match step {
        AgentStep::Thought(text) => format!("Thought: {text}"),
        AgentStep::ToolCall { name, arguments } => format!("Action: {name} {arguments}"),
        AgentStep::Observation { result, .. } => format!("Observation: {result}"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn renders_steps() {
        let call = AgentStep::ToolCall {
            name: "CreateJiraTicket".to_string(),
            arguments: json!({"summary": "Login Bug"}),
        };
        assert_eq!(
            render_step(&call),
            r#"Action: CreateJiraTicket {"summary":"Login Bug"}"#
        );
        assert_eq!(
            render_step(&AgentStep::Thought("filing it".to_string())),
            "Thought: filing it"
        );
    }
}
