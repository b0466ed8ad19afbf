use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ureq::{
    http::{Response, StatusCode},
    Agent, Body,
};
use url::Url;

use crate::{error::Error, util::default_ureq_agent_builder};

/// State of a single Home Assistant entity.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct EntityState {
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub last_changed: String,
}

/// The states object pushed by the host, keyed by entity id.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct HassState {
    pub states: HashMap<String, EntityState>,
}

impl HassState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, entity_id: &str, state: EntityState) -> Self {
        self.states.insert(entity_id.to_string(), state);
        self
    }

    pub fn get(&self, entity_id: &str) -> Option<&EntityState> {
        self.states.get(entity_id)
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = &String> {
        self.states.keys()
    }

    /// Whether any of `entities` differs between `self` and `old`.
    pub fn changed_since(&self, old: &HassState, entities: &[String]) -> bool {
        entities
            .iter()
            .any(|entity| self.states.get(entity) != old.states.get(entity))
    }
}

/// An entry from the entity registry.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EntityRegistryEntry {
    pub entity_id: String,
    pub unique_id: String,
    pub platform: String,
}

/// Requests the card sends to Home Assistant.  Failures are never fatal to
/// the card.
pub trait HomeAssistant {
    fn entity_registry_entry(&self, entity_id: &str) -> Result<EntityRegistryEntry, Error>;

    /// Sign a path so it can be fetched without further authentication.
    fn sign_path(&self, path: &str) -> Result<String, Error>;
}

#[derive(Deserialize)]
struct StateRecord {
    entity_id: String,
    #[serde(flatten)]
    state: EntityState,
}

/// Client for the Home Assistant REST API.  The REST API offers neither the
/// entity registry nor path signing, both report `Error::Unsupported`.
pub struct RestClient {
    agent: Agent,
    base: Url,
    token: String,
}

impl RestClient {
    pub fn new(base: &str, token: String, proxy_url: Option<&str>) -> Result<Self, Error> {
        Ok(Self {
            agent: default_ureq_agent_builder(proxy_url).build().into(),
            base: Url::parse(base)?,
            token,
        })
    }

    fn get(&self, path: &str) -> Result<Response<Body>, Error> {
        let url = self.base.join(path)?;
        let response = self
            .agent
            .get(url.as_str())
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .call()?;
        match response.status() {
            StatusCode::OK => Ok(response),
            status => {
                log::error!("unexpected status {} for {}", status, url);
                Err(Error::UnexpectedResponse)
            }
        }
    }

    /// Fetch the current state of every entity.
    pub fn states(&self) -> Result<HassState, Error> {
        let mut response = self.get("api/states")?;
        let records: Vec<StateRecord> = response
            .body_mut()
            .read_json()
            .map_err(|err| Error::JsonError(Box::new(err)))?;
        Ok(HassState {
            states: records
                .into_iter()
                .map(|record| (record.entity_id, record.state))
                .collect(),
        })
    }
}

impl HomeAssistant for RestClient {
    fn entity_registry_entry(&self, _entity_id: &str) -> Result<EntityRegistryEntry, Error> {
        Err(Error::Unsupported("entity registry over REST"))
    }

    fn sign_path(&self, _path: &str) -> Result<String, Error> {
        Err(Error::Unsupported("path signing over REST"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(value: &str, changed: &str) -> EntityState {
        EntityState {
            state: value.to_string(),
            attributes: Map::new(),
            last_changed: changed.to_string(),
        }
    }

    #[test]
    fn detects_state_changes_of_watched_entities() {
        let old = HassState::new()
            .with_entity("binary_sensor.motion", state("off", "t1"))
            .with_entity("sensor.temp", state("20", "t1"));
        let new = HassState::new()
            .with_entity("binary_sensor.motion", state("off", "t1"))
            .with_entity("sensor.temp", state("21", "t2"));

        assert!(new.changed_since(&old, &["sensor.temp".to_string()]));
        assert!(!new.changed_since(&old, &["binary_sensor.motion".to_string()]));
        assert!(!new.changed_since(&old, &[]));
    }

    #[test]
    fn attribute_and_timestamp_changes_count() {
        let old = HassState::new().with_entity("camera.door", state("idle", "t1"));
        let mut with_attr = state("idle", "t1");
        with_attr.attributes.insert("motion".to_string(), json!(true));
        let new = HassState::new().with_entity("camera.door", with_attr);
        assert!(new.changed_since(&old, &["camera.door".to_string()]));

        let touched = HassState::new().with_entity("camera.door", state("idle", "t2"));
        assert!(touched.changed_since(&old, &["camera.door".to_string()]));
    }

    #[test]
    fn appearing_entity_counts_as_change() {
        let old = HassState::new();
        let new = HassState::new().with_entity("camera.door", state("idle", "t1"));
        assert!(new.changed_since(&old, &["camera.door".to_string()]));
    }

    #[test]
    fn state_records_deserialize() {
        let record: StateRecord = serde_json::from_value(json!({
            "entity_id": "camera.door",
            "state": "streaming",
            "attributes": {"friendly_name": "Door"},
            "last_changed": "2022-01-05T10:00:00+00:00",
            "last_updated": "2022-01-05T10:00:00+00:00",
        }))
        .unwrap();
        assert_eq!(record.entity_id, "camera.door");
        assert_eq!(record.state.state, "streaming");
        assert_eq!(record.state.attributes["friendly_name"], json!("Door"));
    }

    #[test]
    fn rest_client_does_not_offer_registry() {
        let client = RestClient::new("http://localhost:8123/", "token".to_string(), None).unwrap();
        assert!(matches!(
            client.entity_registry_entry("camera.door"),
            Err(Error::Unsupported(_))
        ));
        assert!(RestClient::new("not a url", "token".to_string(), None).is_err());
    }
}
