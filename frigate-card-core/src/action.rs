use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::view::ViewKind;

/// A Home Assistant action configuration.  Card actions travel as
/// `fire-dom-event` actions carrying a `frigate_card_action` field.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ActionConfig {
    Toggle {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        entity: Option<String>,
    },
    MoreInfo {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        entity: Option<String>,
    },
    Navigate {
        navigation_path: String,
    },
    Url {
        url_path: String,
    },
    CallService {
        service: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        service_data: Option<Value>,
    },
    #[serde(rename = "none")]
    NoAction,
    FireDomEvent {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frigate_card_action: Option<String>,
    },
}

impl ActionConfig {
    pub fn card(action: CardAction) -> Self {
        Self::FireDomEvent {
            frigate_card_action: Some(action.as_str().to_string()),
        }
    }

    /// The raw card action name, if this action is addressed to the card.
    pub fn card_action(&self) -> Option<&str> {
        match self {
            Self::FireDomEvent {
                frigate_card_action: Some(action),
            } => Some(action),
            _ => None,
        }
    }

    pub fn is_action(&self) -> bool {
        !matches!(self, Self::NoAction)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CardAction {
    Frigate,
    Clip,
    Clips,
    Image,
    Live,
    Snapshot,
    Snapshots,
    Download,
    FrigateUi,
    Fullscreen,
}

impl CardAction {
    pub fn as_str(self) -> &'static str {
        match self {
            CardAction::Frigate => "frigate",
            CardAction::Clip => "clip",
            CardAction::Clips => "clips",
            CardAction::Image => "image",
            CardAction::Live => "live",
            CardAction::Snapshot => "snapshot",
            CardAction::Snapshots => "snapshots",
            CardAction::Download => "download",
            CardAction::FrigateUi => "frigate_ui",
            CardAction::Fullscreen => "fullscreen",
        }
    }

    /// The view this action navigates to, for the plain view actions.
    pub fn target_view(self) -> Option<ViewKind> {
        match self {
            CardAction::Clip => Some(ViewKind::Clip),
            CardAction::Clips => Some(ViewKind::Clips),
            CardAction::Image => Some(ViewKind::Image),
            CardAction::Live => Some(ViewKind::Live),
            CardAction::Snapshot => Some(ViewKind::Snapshot),
            CardAction::Snapshots => Some(ViewKind::Snapshots),
            _ => None,
        }
    }
}

impl fmt::Display for CardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frigate" => Ok(CardAction::Frigate),
            "clip" => Ok(CardAction::Clip),
            "clips" => Ok(CardAction::Clips),
            "image" => Ok(CardAction::Image),
            "live" => Ok(CardAction::Live),
            "snapshot" => Ok(CardAction::Snapshot),
            "snapshots" => Ok(CardAction::Snapshots),
            "download" => Ok(CardAction::Download),
            "frigate_ui" => Ok(CardAction::FrigateUi),
            "fullscreen" => Ok(CardAction::Fullscreen),
            _ => Err(()),
        }
    }
}

/// A gesture reported by the action handler on the card surface.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Interaction {
    Tap,
    Hold,
    DoubleTap,
}

impl FromStr for Interaction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tap" => Ok(Interaction::Tap),
            "hold" => Ok(Interaction::Hold),
            "double_tap" => Ok(Interaction::DoubleTap),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Actions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tap_action: Option<ActionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_action: Option<ActionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_tap_action: Option<ActionConfig>,
}

impl Actions {
    /// Overlay `specific` on top of `self`, field by field.
    pub fn merged_with(&self, specific: Option<&Actions>) -> Actions {
        match specific {
            None => self.clone(),
            Some(specific) => Actions {
                tap_action: specific.tap_action.clone().or_else(|| self.tap_action.clone()),
                hold_action: specific
                    .hold_action
                    .clone()
                    .or_else(|| self.hold_action.clone()),
                double_tap_action: specific
                    .double_tap_action
                    .clone()
                    .or_else(|| self.double_tap_action.clone()),
            },
        }
    }

    pub fn get(&self, interaction: Interaction) -> Option<&ActionConfig> {
        match interaction {
            Interaction::Tap => self.tap_action.as_ref(),
            Interaction::Hold => self.hold_action.as_ref(),
            Interaction::DoubleTap => self.double_tap_action.as_ref(),
        }
    }

    pub fn has_hold(&self) -> bool {
        self.hold_action.as_ref().is_some_and(ActionConfig::is_action)
    }

    pub fn has_double_tap(&self) -> bool {
        self.double_tap_action
            .as_ref()
            .is_some_and(ActionConfig::is_action)
    }
}
