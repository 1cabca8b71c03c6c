//! Relationships command implementation.

use crate::cli::{RelationshipAction, RelationshipsArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use engagerr_domain::{CreateRelationshipRequest, UpdateRelationshipRequest};
use engagerr_sdk::ContentRelationships;
use std::fs;
use std::io::{self, Read, Write};

/// Execute the relationships command.
pub async fn execute_relationships(
    args: RelationshipsArgs,
    sdk: &ContentRelationships,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        RelationshipAction::List { content_id } => {
            let relationships = sdk.get_relationships(&content_id).await?;
            println!("{}", formatter.format_relationships(&relationships)?);
        }
        RelationshipAction::Create {
            source,
            target,
            kind,
        } => {
            let request = CreateRelationshipRequest::new(source, target, kind.into());
            let relationship = sdk.create_relationship(request).await?;
            println!("{}", formatter.format_relationship(&relationship)?);
        }
        RelationshipAction::Import { file, stdin } => {
            let json_data = if stdin {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else if let Some(file_path) = file {
                fs::read_to_string(file_path)?
            } else {
                return Err(CliError::InvalidInput(
                    "Must specify either --file or --stdin".to_string(),
                ));
            };
            import_relationships(&json_data, sdk, formatter).await?;
        }
        RelationshipAction::Update {
            id,
            kind,
            source,
            target,
        } => {
            let patch = UpdateRelationshipRequest {
                source_content_id: source,
                target_content_id: target,
                relationship_type: kind.map(Into::into),
            };
            if patch.is_empty() {
                return Err(CliError::InvalidInput(
                    "Specify at least one of --type, --source or --target".to_string(),
                ));
            }
            let relationship = sdk.update_relationship(&id, patch).await?;
            println!("{}", formatter.format_relationship(&relationship)?);
        }
        RelationshipAction::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete relationship {}?", id))? {
                println!("{}", formatter.info("Operation cancelled"));
                return Ok(());
            }
            sdk.delete_relationship(&id).await?;
        }
    }

    Ok(())
}

/// Parse a JSON array of create requests.
fn parse_requests(json_data: &str) -> Result<Vec<CreateRelationshipRequest>> {
    let requests: Vec<CreateRelationshipRequest> = serde_json::from_str(json_data)?;
    if requests.is_empty() {
        return Err(CliError::InvalidInput("No relationships provided".to_string()));
    }
    Ok(requests)
}

/// Create each relationship in turn. Failures are reported by the SDK and
/// do not stop the remaining requests.
async fn import_relationships(
    json_data: &str,
    sdk: &ContentRelationships,
    formatter: &Formatter,
) -> Result<()> {
    let requests = parse_requests(json_data)?;
    let total = requests.len();

    let mut created = 0;
    for request in requests {
        if sdk.create_relationship(request).await.is_ok() {
            created += 1;
        }
    }

    println!("{}", formatter.bulk_result("Created", created));
    if created < total {
        println!(
            "{}",
            formatter.warning(&format!("{} relationship(s) could not be created", total - created))
        );
        return Err(CliError::Reported("Import".to_string()));
    }
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}
