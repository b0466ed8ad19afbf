use std::sync::Arc;

use itertools::Itertools;
use serde::Serialize;
use serde_json::Value;

use crate::{
    media::BrowseMediaQuery,
    menu::MenuButton,
    message::Message,
    view::ViewKind,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuPosition {
    Above,
    Below,
}

/// The main content shown inside the card.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Message,
    Image,
    Gallery,
    Viewer,
    Live,
}

/// Everything a renderer needs to draw the card in its current state.
#[derive(Clone, Debug, Serialize)]
pub struct RenderPlan {
    pub view: ViewKind,
    pub media_title: Option<String>,
    /// `None` until the host has pushed its first state.
    pub panel: Option<Panel>,
    /// Live is kept loaded in the background while another panel shows.
    pub live_preload: bool,
    pub message: Option<Message>,
    /// Top padding in percent of the width that enforces the aspect ratio.
    pub padding: Option<f64>,
    pub menu_position: MenuPosition,
    pub hover_menu: bool,
    pub buttons: Vec<Arc<MenuButton>>,
    pub query: Option<BrowseMediaQuery>,
    pub live_query: Option<BrowseMediaQuery>,
    pub elements: Vec<Value>,
}

impl RenderPlan {
    /// One line summary, used by the command line runner.
    pub fn summary(&self) -> String {
        let panel = match (self.panel, &self.message) {
            (Some(Panel::Message), Some(message)) => message.to_string(),
            (Some(panel), _) => format!("{:?}", panel).to_lowercase(),
            (None, _) => "waiting for state".to_string(),
        };
        let buttons = self
            .buttons
            .iter()
            .map(|button| {
                let icon = button.icon.as_deref().unwrap_or("?");
                if button.emphasize {
                    format!("[{}]", icon)
                } else {
                    icon.to_string()
                }
            })
            .join(" ");
        format!("{} | {} | menu: {}", self.view, panel, buttons)
    }
}
