//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the profile command, saving changes to `path`.
pub fn execute_profile(
    args: ProfileArgs,
    config: &mut Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ProfileAction::List => list_profiles(config, formatter),
        ProfileAction::Show => show_active_profile(config, formatter),
        ProfileAction::Switch { name } => switch_profile(config, path, name, formatter),
        ProfileAction::Set {
            name,
            url,
            creator_id,
            token,
        } => {
            let profile = Profile {
                api_url: url,
                creator_id,
                token,
            };
            set_profile(config, path, name, profile, formatter)
        }
        ProfileAction::Delete { name } => delete_profile(config, path, name, formatter),
    }
}

fn print_profile(profile: &Profile, indent: &str) {
    println!("{}URL: {}", indent, profile.api_url);
    println!("{}Creator: {}", indent, profile.creator_id);
    if profile.token.is_some() {
        println!("{}Token: ********", indent);
    }
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) -> Result<()> {
    if config.profiles.is_empty() {
        println!("{}", formatter.info("No profiles configured"));
        return Ok(());
    }

    println!("Available profiles:");
    for (name, profile) in &config.profiles {
        if name == &config.active_profile {
            println!("* {}", formatter.success(name));
        } else {
            println!("  {}", name);
        }
        print_profile(profile, "    ");
    }

    Ok(())
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    println!("Active profile: {}", formatter.success(&config.active_profile));
    print_profile(profile, "  ");

    Ok(())
}

/// Switch to a different profile.
fn switch_profile(config: &mut Config, path: &Path, name: String, formatter: &Formatter) -> Result<()> {
    config.switch_profile(name.clone())?;
    config.save_to(path)?;
    println!(
        "{}",
        formatter.success(&format!("Switched to profile '{}'", name))
    );
    Ok(())
}

/// Create or update a profile.
fn set_profile(
    config: &mut Config,
    path: &Path,
    name: String,
    profile: Profile,
    formatter: &Formatter,
) -> Result<()> {
    if profile.creator_id.trim().is_empty() {
        return Err(CliError::InvalidInput("Creator ID must not be empty".to_string()));
    }

    let action = if config.profiles.contains_key(&name) {
        "Updated"
    } else {
        "Created"
    };

    config.set_profile(name.clone(), profile);
    config.save_to(path)?;

    println!(
        "{}",
        formatter.success(&format!("{} profile '{}'", action, name))
    );

    Ok(())
}

/// Delete a profile.
fn delete_profile(config: &mut Config, path: &Path, name: String, formatter: &Formatter) -> Result<()> {
    if name == config.active_profile {
        return Err(CliError::NotPermitted(
            "Cannot delete the active profile".to_string(),
        ));
    }

    if config.profiles.remove(&name).is_some() {
        config.save_to(path)?;
        println!(
            "{}",
            formatter.success(&format!("Deleted profile '{}'", name))
        );
    } else {
        println!(
            "{}",
            formatter.warning(&format!("Profile '{}' does not exist", name))
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    fn local(creator: &str) -> Profile {
        Profile {
            api_url: "http://localhost:8080".to_string(),
            creator_id: creator.to_string(),
            token: None,
        }
    }

    #[test]
    fn test_set_and_switch_profile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        let formatter = Formatter::new(OutputFormat::Table, false);

        set_profile(&mut config, &path, "test".to_string(), local("u1"), &formatter).unwrap();
        assert!(config.profiles.contains_key("test"));

        switch_profile(&mut config, &path, "test".to_string(), &formatter).unwrap();
        assert_eq!(config.active_profile, "test");

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.active_profile, "test");
    }

    #[test]
    fn test_empty_creator_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = set_profile(&mut config, &path, "bad".to_string(), local(" "), &formatter);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_delete_active_profile() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = delete_profile(
            &mut config,
            &dir.path().join("config.toml"),
            "default".to_string(),
            &formatter,
        );
        assert!(result.is_err());
    }
}
