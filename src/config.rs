use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

/// Top-level configuration loaded from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WellbotConfig {
    pub gateway: GatewayConfig,
    pub knowledge: KnowledgeConfig,
    pub dialogue: DialogueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Permissive CORS for browser chat widgets.
    #[serde(default = "default_cors")]
    pub cors: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            cors: default_cors(),
        }
    }
}

fn default_port() -> u16 {
    7300
}
fn default_bind() -> String {
    "127.0.0.1".into()
}
fn default_cors() -> bool {
    true
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct KnowledgeConfig {
    /// JSON knowledge base on disk. The builtin data is used when unset.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DialogueConfig {
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    #[serde(default = "default_symptom_list_cap")]
    pub symptom_list_cap: usize,
    /// Fixed seed for phrase selection; entropy when unset.
    pub rng_seed: Option<u64>,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
            symptom_list_cap: default_symptom_list_cap(),
            rng_seed: None,
        }
    }
}

fn default_max_candidates() -> usize {
    3
}
fn default_symptom_list_cap() -> usize {
    12
}

/// Load configuration from file or use defaults.
///
/// Search order:
/// 1. `WELLBOT_CONFIG` env var
/// 2. `~/.wellbot/config.toml`
/// 3. Zero-config defaults (no file needed)
pub fn load() -> anyhow::Result<WellbotConfig> {
    let path = config_path();

    if path.exists() {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
        let config = parse(&content)
            .map_err(|e| anyhow::anyhow!("invalid config at {}: {e}", path.display()))?;

        info!("loaded config from {}", path.display());
        Ok(config)
    } else {
        info!("no config file found, using zero-config defaults");
        Ok(WellbotConfig::default())
    }
}

/// Parse and validate a TOML document.
pub fn parse(content: &str) -> anyhow::Result<WellbotConfig> {
    let config: WellbotConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("WELLBOT_CONFIG") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".wellbot").join("config.toml")
}

/// Validate the config and return clear error messages.
fn validate(config: &WellbotConfig) -> anyhow::Result<()> {
    if config.dialogue.max_candidates == 0 {
        anyhow::bail!("dialogue.max_candidates must be > 0");
    }

    if config.dialogue.symptom_list_cap == 0 {
        anyhow::bail!("dialogue.symptom_list_cap must be > 0");
    }

    if let Some(path) = &config.knowledge.path {
        if path.trim().is_empty() {
            anyhow::bail!("knowledge.path must not be empty when set");
        }
    }

    Ok(())
}
