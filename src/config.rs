//! Loading platform configuration (export defaults + optional lesson bank)
//! from TOML.
//!
//! See `PlatformConfig` and `ExportDefaults` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::TargetGroup;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct PlatformConfig {
    #[serde(default)]
    pub export: ExportDefaults,
    #[serde(default)]
    pub lessons: Vec<LessonCfg>,
}

/// Lesson entry accepted in TOML configuration. Slides are loosely typed
/// tables; they are normalized into the slide sum type on load.
#[derive(Clone, Debug, Deserialize)]
pub struct LessonCfg {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub target_group: Option<TargetGroup>,
    #[serde(default)]
    pub teacher_notes: Option<String>,
    #[serde(default)]
    pub slides: Vec<serde_json::Value>,
}

/// Defaults applied when an export request omits options. Override them in
/// TOML to brand the packages.
#[derive(Clone, Debug, Deserialize)]
pub struct ExportDefaults {
    pub package_name: String,
    pub course_title: String,
    pub include_teacher_notes: bool,
    pub include_answer_keys: bool,
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            package_name: "curriculum".into(),
            course_title: "English Course".into(),
            include_teacher_notes: true,
            include_answer_keys: true,
        }
    }
}

/// Attempt to load `PlatformConfig` from PLATFORM_CONFIG_PATH. On any
/// parsing/IO error, returns None.
pub fn load_platform_config_from_env() -> Option<PlatformConfig> {
    let path = std::env::var("PLATFORM_CONFIG_PATH").ok()?;
    match std::fs::read_to_string(&path) {
        Ok(s) => match toml::from_str::<PlatformConfig>(&s) {
            Ok(cfg) => {
                info!(target: "lingora_backend", %path, "Loaded platform config (TOML)");
                Some(cfg)
            }
            Err(e) => {
                error!(target: "lingora_backend", %path, error = %e, "Failed to parse TOML config");
                None
            }
        },
        Err(e) => {
            error!(target: "lingora_backend", %path, error = %e, "Failed to read TOML config file");
            None
        }
    }
}
