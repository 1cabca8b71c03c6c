//! Family and graph command implementations.

use crate::cli::{FamilyArgs, GraphArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use engagerr_sdk::ContentRelationships;

/// Execute the family command.
pub async fn execute_family(
    args: FamilyArgs,
    sdk: &ContentRelationships,
    formatter: &Formatter,
) -> Result<()> {
    let family = sdk
        .get_content_family(&args.root_id)
        .await
        .ok_or_else(|| CliError::Reported("Loading the content family".to_string()))?;

    println!("{}", formatter.format_family(&family)?);
    Ok(())
}

/// Execute the graph command.
pub async fn execute_graph(
    args: GraphArgs,
    sdk: &ContentRelationships,
    formatter: &Formatter,
) -> Result<()> {
    let graph = sdk
        .get_visualization_data(&args.family_id)
        .await
        .ok_or_else(|| CliError::Reported("Loading the visualization".to_string()))?;

    println!("{}", formatter.format_graph(&graph)?);
    Ok(())
}
