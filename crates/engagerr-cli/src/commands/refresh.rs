//! Refresh and types command implementations.

use crate::cli::RefreshArgs;
use crate::error::Result;
use crate::output::Formatter;
use engagerr_sdk::ContentRelationships;

/// Execute the refresh command.
pub async fn execute_refresh(
    args: RefreshArgs,
    sdk: &ContentRelationships,
    formatter: &Formatter,
) -> Result<()> {
    let snapshot = sdk.refresh_relationship_data(&args.content_id).await?;
    println!("{}", formatter.format_snapshot(&snapshot)?);
    Ok(())
}

/// Execute the types command.
pub fn execute_types(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_types()?);
    Ok(())
}
