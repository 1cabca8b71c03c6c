//! Suggestion triage command implementations.

use crate::cli::{SuggestionIdArgs, SuggestionsArgs};
use crate::error::Result;
use crate::output::Formatter;
use engagerr_sdk::{ContentRelationships, SuggestionOutcome};

/// Execute the suggestions command.
///
/// A failed fetch prints an empty list after the error notification.
pub async fn execute_suggestions(
    args: SuggestionsArgs,
    sdk: &ContentRelationships,
    formatter: &Formatter,
) -> Result<()> {
    let suggestions = sdk.get_relationship_suggestions(&args.content_id).await;
    println!("{}", formatter.format_suggestions(&suggestions)?);
    Ok(())
}

/// Execute the approve command.
pub async fn execute_approve(
    args: SuggestionIdArgs,
    sdk: &ContentRelationships,
    formatter: &Formatter,
) -> Result<()> {
    let outcome = sdk.approve_relationship_suggestion(&args.id).await?;
    print_outcome(&outcome, formatter)
}

/// Execute the reject command.
pub async fn execute_reject(
    args: SuggestionIdArgs,
    sdk: &ContentRelationships,
    formatter: &Formatter,
) -> Result<()> {
    let outcome = sdk.reject_relationship_suggestion(&args.id).await?;
    print_outcome(&outcome, formatter)
}

fn print_outcome(outcome: &SuggestionOutcome, formatter: &Formatter) -> Result<()> {
    match outcome {
        SuggestionOutcome::Approved(relationship) => {
            println!("{}", formatter.format_relationship(relationship)?);
        }
        SuggestionOutcome::Rejected => {}
        SuggestionOutcome::AlreadyResolved => {
            println!(
                "{}",
                formatter.warning("Suggestion was already resolved; refresh to see its current state")
            );
        }
    }
    Ok(())
}
