//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use engagerr_domain::RelationshipType;

/// Engagerr CLI - Manage content relationships across platforms.
#[derive(Debug, Parser)]
#[command(name = "engagerr")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Override the profile's API URL
    #[arg(long, global = true, env = "ENGAGERR_API_URL")]
    pub api_url: Option<String>,

    /// Override the profile's creator
    #[arg(long, global = true, env = "ENGAGERR_CREATOR_ID")]
    pub creator: Option<String>,

    /// Override the profile's bearer token
    #[arg(long = "auth-token", global = true, env = "ENGAGERR_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Log SDK requests and cache activity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, create, update or delete relationships
    #[command(alias = "rel")]
    Relationships(RelationshipsArgs),

    /// Show the family rooted at a content item
    Family(FamilyArgs),

    /// Show the visualization graph of a family
    Graph(GraphArgs),

    /// List pending relationship suggestions
    Suggestions(SuggestionsArgs),

    /// Approve a relationship suggestion
    Approve(SuggestionIdArgs),

    /// Reject a relationship suggestion
    Reject(SuggestionIdArgs),

    /// Refetch relationships, family and suggestions of a content item
    Refresh(RefreshArgs),

    /// List relationship types and their labels
    Types,

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// Arguments for the relationships command.
#[derive(Debug, Parser)]
pub struct RelationshipsArgs {
    #[command(subcommand)]
    pub action: RelationshipAction,
}

/// Relationship actions.
#[derive(Debug, Subcommand)]
pub enum RelationshipAction {
    /// List relationships touching a content item
    List {
        /// Content ID
        content_id: String,
    },

    /// Create a relationship
    Create {
        /// Source content ID
        source: String,
        /// Target content ID
        target: String,
        /// Relationship type
        #[arg(short = 't', long = "type", value_enum)]
        kind: RelationshipTypeArg,
    },

    /// Create relationships from a JSON array
    Import {
        /// JSON file containing relationships
        #[arg(long)]
        file: Option<String>,

        /// Read the JSON array from stdin
        #[arg(long)]
        stdin: bool,
    },

    /// Change an existing relationship
    Update {
        /// Relationship ID
        id: String,
        /// New relationship type
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<RelationshipTypeArg>,
        /// New source content ID
        #[arg(long)]
        source: Option<String>,
        /// New target content ID
        #[arg(long)]
        target: Option<String>,
    },

    /// Delete a relationship
    Delete {
        /// Relationship ID
        id: String,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Arguments for the family command.
#[derive(Debug, Parser)]
pub struct FamilyArgs {
    /// Root content ID
    pub root_id: String,
}

/// Arguments for the graph command.
#[derive(Debug, Parser)]
pub struct GraphArgs {
    /// Family (root content) ID
    pub family_id: String,
}

/// Arguments for the suggestions command.
#[derive(Debug, Parser)]
pub struct SuggestionsArgs {
    /// Content ID
    pub content_id: String,
}

/// Arguments naming one suggestion.
#[derive(Debug, Parser)]
pub struct SuggestionIdArgs {
    /// Suggestion ID
    pub id: String,
}

/// Arguments for the refresh command.
#[derive(Debug, Parser)]
pub struct RefreshArgs {
    /// Content ID
    pub content_id: String,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// API base URL
        #[arg(short, long)]
        url: String,
        /// Creator ID
        #[arg(short = 'i', long = "creator-id")]
        creator_id: String,
        /// Bearer token
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

/// Relationship type argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum RelationshipTypeArg {
    /// Source is the parent of target
    Parent,
    /// Source is a child of target
    Child,
    /// Source is derived from target
    Derivative,
    /// Source repurposes target for another platform
    Repurposed,
    /// Source reacts to target
    Reaction,
    /// Source references target
    Reference,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<RelationshipTypeArg> for RelationshipType {
    fn from(kind: RelationshipTypeArg) -> Self {
        match kind {
            RelationshipTypeArg::Parent => RelationshipType::Parent,
            RelationshipTypeArg::Child => RelationshipType::Child,
            RelationshipTypeArg::Derivative => RelationshipType::Derivative,
            RelationshipTypeArg::Repurposed => RelationshipType::Repurposed,
            RelationshipTypeArg::Reaction => RelationshipType::Reaction,
            RelationshipTypeArg::Reference => RelationshipType::Reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_command() {
        let cli = Cli::parse_from([
            "engagerr",
            "relationships",
            "create",
            "c2",
            "c1",
            "--type",
            "derivative",
        ]);
        match cli.command {
            Command::Relationships(RelationshipsArgs {
                action: RelationshipAction::Create { source, target, kind },
            }) => {
                assert_eq!(source, "c2");
                assert_eq!(target, "c1");
                assert_eq!(RelationshipType::from(kind), RelationshipType::Derivative);
            }
            _ => panic!("Expected Create command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["engagerr", "family", "c1", "--format", "json", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(matches!(cli.command, Command::Family(FamilyArgs { ref root_id }) if root_id == "c1"));
    }

    #[test]
    fn test_profile_set_token() {
        let cli = Cli::parse_from([
            "engagerr", "profile", "set", "prod", "--url", "https://api.example.com",
            "--creator-id", "u9", "--token", "abc",
        ]);
        match cli.command {
            Command::Profile(ProfileArgs {
                action: ProfileAction::Set { creator_id, token, .. },
            }) => {
                assert_eq!(creator_id, "u9");
                assert_eq!(token.as_deref(), Some("abc"));
            }
            _ => panic!("Expected profile set"),
        }
    }

    #[test]
    fn test_rel_alias_and_delete_flag() {
        let cli = Cli::parse_from(["engagerr", "rel", "delete", "r1", "-y"]);
        match cli.command {
            Command::Relationships(RelationshipsArgs {
                action: RelationshipAction::Delete { id, yes },
            }) => {
                assert_eq!(id, "r1");
                assert!(yes);
            }
            _ => panic!("Expected Delete command"),
        }
    }
}
