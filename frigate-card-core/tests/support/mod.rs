#![allow(dead_code)]

use std::{cell::RefCell, collections::HashMap, sync::Arc};

use frigate_card_core::{
    action::ActionConfig,
    card::Card,
    config::DashboardMode,
    error::Error,
    hass::{EntityRegistryEntry, EntityState, HassState, HomeAssistant},
    host::Host,
};
use serde_json::Value;

/// A host that records everything the card asks of it.
pub struct RecordingHost {
    pub registry: HashMap<String, EntityRegistryEntry>,
    pub signing: bool,
    pub signed: RefCell<Vec<String>>,
    pub opened: Vec<String>,
    pub downloads: Vec<String>,
    pub forwarded: Vec<ActionConfig>,
    pub fullscreen_enabled: bool,
    pub fullscreen: bool,
    pub edit_mode: bool,
    pub mode: DashboardMode,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            registry: HashMap::new(),
            signing: true,
            signed: RefCell::new(Vec::new()),
            opened: Vec::new(),
            downloads: Vec::new(),
            forwarded: Vec::new(),
            fullscreen_enabled: false,
            fullscreen: false,
            edit_mode: false,
            mode: DashboardMode::Storage,
        }
    }

    pub fn with_registry_entry(mut self, entity_id: &str, platform: &str, unique_id: &str) -> Self {
        self.registry.insert(
            entity_id.to_string(),
            EntityRegistryEntry {
                entity_id: entity_id.to_string(),
                unique_id: unique_id.to_string(),
                platform: platform.to_string(),
            },
        );
        self
    }
}

impl HomeAssistant for RecordingHost {
    fn entity_registry_entry(&self, entity_id: &str) -> Result<EntityRegistryEntry, Error> {
        self.registry
            .get(entity_id)
            .cloned()
            .ok_or(Error::UnexpectedResponse)
    }

    fn sign_path(&self, path: &str) -> Result<String, Error> {
        self.signed.borrow_mut().push(path.to_string());
        if self.signing {
            Ok(format!("http://hass.local{}&authSig=secret", path))
        } else {
            Err(Error::UnexpectedResponse)
        }
    }
}

impl Host for RecordingHost {
    fn open_url(&mut self, url: &str) {
        self.opened.push(url.to_string());
    }

    fn download(&mut self, url: &str) {
        self.downloads.push(url.to_string());
    }

    fn fullscreen_enabled(&self) -> bool {
        self.fullscreen_enabled
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    fn handle_action(&mut self, action: &ActionConfig) {
        self.forwarded.push(action.clone());
    }

    fn set_edit_mode(&mut self, enabled: bool) {
        self.edit_mode = enabled;
    }

    fn dashboard_mode(&self) -> DashboardMode {
        self.mode
    }
}

pub fn configured(raw: Value) -> Card<RecordingHost> {
    configured_with(RecordingHost::new(), raw)
}

pub fn configured_with(host: RecordingHost, raw: Value) -> Card<RecordingHost> {
    let mut card = Card::new(host);
    card.set_config(&raw).unwrap();
    card
}

pub fn entity(state: &str) -> EntityState {
    EntityState {
        state: state.to_string(),
        ..EntityState::default()
    }
}

/// Host state with a motion sensor, a temperature sensor and a camera.
pub fn hass(motion: &str, temperature: &str) -> Arc<HassState> {
    Arc::new(
        HassState::new()
            .with_entity("binary_sensor.motion", entity(motion))
            .with_entity("sensor.temperature", entity(temperature))
            .with_entity("camera.front_door", entity("streaming")),
    )
}
