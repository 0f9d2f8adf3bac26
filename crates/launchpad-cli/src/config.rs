use std::collections::HashSet;
use std::fs;
use std::path::Path;

use launchpad_core::serde_helpers::pubkey_serde;
use launchpad_core::{
    is_cluster_supported, TemplateId, TemplateKind, DEFAULT_SERVICE_FEE, MAX_SERVICE_FEE,
    SUPPORTED_CLUSTERS,
};
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::error::{CliError, CliResult};

/// Operator configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LaunchpadConfig {
    /// Cluster the factory is operated on
    pub cluster: String,

    /// Factory owner at bootstrap; also the default caller for admin commands
    #[serde(with = "pubkey_serde")]
    pub owner: Pubkey,

    /// Destination of withdrawn service fees
    #[serde(with = "pubkey_serde")]
    pub fee_recipient: Pubkey,

    /// Service fee per deployment (lamports)
    #[serde(default = "default_service_fee")]
    pub service_fee: u64,

    /// JSON snapshot of factory and ledger state
    pub state_path: String,

    /// Templates deployed and registered at bootstrap
    pub templates: Vec<TemplateConfig>,
}

/// Template registered at bootstrap
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TemplateConfig {
    /// Registry id, e.g. `BASIC_TEMPLATE`
    pub id: TemplateId,

    /// Behaviour deployed behind the id
    pub kind: TemplateKind,
}

fn default_service_fee() -> u64 {
    DEFAULT_SERVICE_FEE
}

impl LaunchpadConfig {
    /// Load configuration from TOML file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        let config: LaunchpadConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save(&self, path: &Path) -> CliResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| CliError::io(path, e))?;
        Ok(())
    }

    pub fn validate(&self) -> CliResult<()> {
        if !is_cluster_supported(&self.cluster) {
            return Err(CliError::invalid_config(
                "cluster",
                &self.cluster,
                &SUPPORTED_CLUSTERS.join(" | "),
            ));
        }

        if self.owner == Pubkey::default() {
            return Err(CliError::invalid_config("owner", self.owner, "non-null address"));
        }

        if self.fee_recipient == Pubkey::default() {
            return Err(CliError::invalid_config(
                "fee_recipient",
                self.fee_recipient,
                "non-null address",
            ));
        }

        if self.service_fee > MAX_SERVICE_FEE {
            return Err(CliError::invalid_config(
                "service_fee",
                self.service_fee,
                &format!("at most {}", MAX_SERVICE_FEE),
            ));
        }

        if self.state_path.trim().is_empty() {
            return Err(CliError::invalid_config("state_path", "empty", "file path"));
        }

        if self.templates.is_empty() {
            return Err(CliError::invalid_config("templates", "empty", "at least one template"));
        }

        let mut seen = HashSet::new();
        for template in &self.templates {
            if !seen.insert(template.id) {
                return Err(CliError::invalid_config("templates.id", template.id, "unique ids"));
            }
        }

        Ok(())
    }

    /// Snapshot path, resolved against the config file's directory when relative
    pub fn resolve_state_path(&self, config_path: &Path) -> std::path::PathBuf {
        let state_path = Path::new(&self.state_path);
        if state_path.is_absolute() {
            return state_path.to_path_buf();
        }
        config_path
            .parent()
            .map(|dir| dir.join(state_path))
            .unwrap_or_else(|| state_path.to_path_buf())
    }
}

impl Default for LaunchpadConfig {
    fn default() -> Self {
        Self {
            cluster: "localnet".to_string(),
            owner: Pubkey::new_from_array([1; 32]),
            fee_recipient: Pubkey::new_from_array([2; 32]),
            service_fee: DEFAULT_SERVICE_FEE,
            state_path: "launchpad-state.json".to_string(),
            templates: [
                TemplateKind::Basic,
                TemplateKind::Mintable,
                TemplateKind::FullFeatured,
            ]
            .into_iter()
            .map(|kind| TemplateConfig {
                id: kind.default_template_id(),
                kind,
            })
            .collect(),
        }
    }
}

/// Create example configuration file
pub fn create_example_config(path: &Path) -> CliResult<()> {
    let example_config = LaunchpadConfig {
        cluster: "devnet".to_string(),
        ..LaunchpadConfig::default()
    };
    example_config.save(path)
}
