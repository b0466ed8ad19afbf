use once_cell::sync::Lazy;
use regex::Regex;

use crate::{config::Config, hass::HomeAssistant};

const FRIGATE_PLATFORM: &str = "frigate";

static CAMERA_UNIQUE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":camera:(?P<camera>[^:]+)$").expect("valid unique id pattern"));

/// Outcome of resolving the backend camera name, kept for the lifetime of a
/// configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CameraName {
    Unresolved,
    Failed,
    Resolved(String),
}

impl CameraName {
    pub fn name(&self) -> Option<&str> {
        match self {
            CameraName::Resolved(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, CameraName::Unresolved)
    }
}

impl Default for CameraName {
    fn default() -> Self {
        Self::Unresolved
    }
}

type Strategy = fn(&Config, &dyn HomeAssistant) -> Option<String>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("configuration", from_config),
    ("entity registry", from_registry),
    ("entity id", from_entity_id),
];

/// Try every strategy in turn, the first that yields a name wins.
pub fn resolve(config: &Config, hass: &dyn HomeAssistant) -> CameraName {
    for (source, strategy) in STRATEGIES {
        if let Some(name) = strategy(config, hass) {
            log::info!("camera name {:?} from {}", name, source);
            return CameraName::Resolved(name);
        }
    }
    log::warn!("could not determine the camera name");
    CameraName::Failed
}

fn from_config(config: &Config, _hass: &dyn HomeAssistant) -> Option<String> {
    config
        .frigate
        .camera_name
        .clone()
        .filter(|name| !name.is_empty())
}

fn from_registry(config: &Config, hass: &dyn HomeAssistant) -> Option<String> {
    let entity_id = config.camera_entity.as_deref()?;
    let entry = match hass.entity_registry_entry(entity_id) {
        Ok(entry) => entry,
        Err(err) => {
            log::debug!("registry lookup for {} failed: {}", entity_id, err);
            return None;
        }
    };
    if entry.platform != FRIGATE_PLATFORM {
        return None;
    }
    CAMERA_UNIQUE_ID
        .captures(&entry.unique_id)
        .and_then(|captures| captures.name("camera"))
        .map(|camera| camera.as_str().to_string())
}

fn from_entity_id(config: &Config, _hass: &dyn HomeAssistant) -> Option<String> {
    let entity_id = config.camera_entity.as_deref()?;
    entity_id
        .split('.')
        .nth(1)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
