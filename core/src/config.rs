use crate::model::{Level, Role};
use serde::{Deserialize, Serialize};

/// Role and level given to employees created from a pasted name list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkDefaults {
    pub role: Role,
    pub level: Level,
}

impl Default for BulkDefaults {
    fn default() -> Self {
        Self {
            role: Role::Modulo,
            level: Level::NivelBasico,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct DeskConfigFile {
    #[serde(default)]
    bulk_defaults: BulkDefaults,
    #[serde(default = "default_summary_roles")]
    summary_roles: Vec<Role>,
    #[serde(default)]
    excluded_office_markers: Vec<String>,
}

fn default_summary_roles() -> Vec<Role> {
    vec![
        Role::Supervision,
        Role::Modulo,
        Role::Tablet,
        Role::Anfitrion,
        Role::Filtro,
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskConfig {
    pub bulk_defaults: BulkDefaults,
    /// Roles listed, in this order, in staffing tables and daily snapshots.
    pub summary_roles: Vec<Role>,
    /// Case-insensitive office name fragments kept out of the prolonged-absence
    /// report (mobile units).
    pub excluded_office_markers: Vec<String>,
}

impl DeskConfig {
    /// Load from the data/ directory.
    /// In tests, use DeskConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/desk/desk_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: DeskConfigFile = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;

        if file.summary_roles.is_empty() {
            anyhow::bail!("{path}: summary_roles must list at least one role");
        }

        log::debug!(
            "config: {} summary roles, {} excluded office markers",
            file.summary_roles.len(),
            file.excluded_office_markers.len()
        );
        Ok(Self {
            bulk_defaults: file.bulk_defaults,
            summary_roles: file.summary_roles,
            excluded_office_markers: file.excluded_office_markers,
        })
    }

    /// Built-in configuration matching data/desk/desk_config.json.
    pub fn default_test() -> Self {
        Self {
            bulk_defaults: BulkDefaults::default(),
            summary_roles: default_summary_roles(),
            excluded_office_markers: vec!["unidad móvil".to_string(), "unidad movil".to_string()],
        }
    }
}
