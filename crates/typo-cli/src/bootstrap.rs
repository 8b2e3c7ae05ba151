use anyhow::Context;

use crate::cli::GlobalFlags;

/// Load layered configuration and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<typo_config::TypoConfig> {
    let mut config = typo_config::TypoConfig::load_with_dotenv()
        .context("failed to load typo configuration")?;
    apply_overrides(&mut config, flags);

    if !config.database.is_configured() {
        anyhow::bail!(
            "no change-log store configured. Pass --database or set TYPO_DATABASE__PATH."
        );
    }
    Ok(config)
}

fn apply_overrides(config: &mut typo_config::TypoConfig, flags: &GlobalFlags) {
    if let Some(path) = &flags.database {
        config.database.path.clone_from(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;

    fn flags(database: Option<&str>) -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            quiet: false,
            verbose: false,
            database: database.map(String::from),
        }
    }

    #[test]
    fn database_flag_overrides_config_path() {
        let mut config = typo_config::TypoConfig::default();
        config.database.path = "from-config.db".into();

        apply_overrides(&mut config, &flags(Some("/tmp/override.db")));

        assert_eq!(config.database.path, "/tmp/override.db");
    }

    #[test]
    fn missing_flag_keeps_config_path() {
        let mut config = typo_config::TypoConfig::default();
        config.database.path = "from-config.db".into();

        apply_overrides(&mut config, &flags(None));

        assert_eq!(config.database.path, "from-config.db");
    }
}
