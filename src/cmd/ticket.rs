use crate::context::AppContext;
use crate::domain::ticket::IssueOutcome;

#[derive(Debug, Clone)]
pub struct TicketCommandArgs {
    pub summary: String,
    pub description: String,
}

pub async fn run(ctx: &AppContext, args: TicketCommandArgs) -> IssueOutcome {
    ctx.new_ticket_tool()
        .create(args.summary.into(), args.description.into())
        .await
}
