pub mod jira;
pub mod llm;
