use std::{collections::BTreeSet, sync::Arc};

use crate::hass::HassState;

/// Card properties whose change may require a re-render.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CardProperty {
    Hass,
    Config,
    View,
    ConditionState,
    Message,
    MediaShowInfo,
}

/// Properties changed since the last render decision.  When the host state
/// changed, the snapshot it replaced is kept for comparison.
#[derive(Clone, Debug, Default)]
pub struct PropertyChanges {
    changed: BTreeSet<CardProperty>,
    previous_hass: Option<Arc<HassState>>,
}

impl PropertyChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, property: CardProperty) {
        self.changed.insert(property);
    }

    /// Record a host state change.  Only the first replaced snapshot is kept,
    /// later ones are intermediate.
    pub fn mark_hass(&mut self, previous: Option<Arc<HassState>>) {
        if !self.changed.contains(&CardProperty::Hass) {
            self.previous_hass = previous;
        }
        self.changed.insert(CardProperty::Hass);
    }

    pub fn len(&self) -> usize {
        self.changed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn contains(&self, property: CardProperty) -> bool {
        self.changed.contains(&property)
    }

    pub fn previous_hass(&self) -> Option<&HassState> {
        self.previous_hass.as_deref()
    }
}

/// What the gate needs to know about the card at decision time.
#[derive(Copy, Clone, Debug, Default)]
pub struct GateInputs {
    pub config_loaded: bool,
    pub update_force: bool,
    pub interaction_active: bool,
    pub media_playing: bool,
}

/// Decides whether a batch of property changes warrants a re-render.  The
/// host pushes state very frequently and most of it is irrelevant, while a
/// re-render interrupts playing video and gallery browsing.
#[derive(Clone, Debug, Default)]
pub struct UpdateGate {
    entities: Vec<String>,
}

impl UpdateGate {
    pub fn new(entities: Vec<String>) -> Self {
        Self { entities }
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn should_update(
        &self,
        inputs: GateInputs,
        changes: &PropertyChanges,
        hass: Option<&HassState>,
    ) -> bool {
        if !inputs.config_loaded {
            return false;
        }
        if changes.len() > 1 {
            return true;
        }
        if !changes.contains(CardProperty::Hass) {
            return true;
        }
        let Some(old) = changes.previous_hass() else {
            return true;
        };
        if !inputs.update_force && (inputs.interaction_active || inputs.media_playing) {
            return false;
        }
        match hass {
            Some(new) => new.changed_since(old, &self.entities),
            None => false,
        }
    }
}
