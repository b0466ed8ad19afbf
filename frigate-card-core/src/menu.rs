use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    action::{ActionConfig, CardAction},
    config::MenuButtonsConfig,
    view::{View, ViewKind},
};

/// Icon value the menu renders as the Frigate logo.
pub const FRIGATE_BUTTON_MENU_ICON: &str = "frigate";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum MenuButtonKind {
    #[serde(rename = "custom:frigate-card-menu-icon")]
    Icon,
    #[serde(rename = "custom:frigate-card-menu-state-icon")]
    StateIcon,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MenuButton {
    #[serde(rename = "type")]
    pub kind: MenuButtonKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub emphasize: bool,
    #[serde(default)]
    pub tap_action: Option<ActionConfig>,
    #[serde(default)]
    pub hold_action: Option<ActionConfig>,
    #[serde(default)]
    pub double_tap_action: Option<ActionConfig>,
}

impl MenuButton {
    fn card(title: &str, icon: &str, tap: CardAction) -> Self {
        Self {
            kind: MenuButtonKind::Icon,
            title: Some(title.to_string()),
            icon: Some(icon.to_string()),
            entity: None,
            emphasize: false,
            tap_action: Some(ActionConfig::card(tap)),
            hold_action: None,
            double_tap_action: None,
        }
    }

    fn on_hold(mut self, hold: CardAction) -> Self {
        self.hold_action = Some(ActionConfig::card(hold));
        self
    }

    fn emphasized(mut self, emphasize: bool) -> Self {
        self.emphasize = emphasize;
        self
    }
}

/// Everything besides configuration that decides which buttons are shown.
#[derive(Copy, Clone, Debug)]
pub struct MenuContext<'a> {
    pub view: &'a View,
    pub has_frigate_url: bool,
    pub fullscreen_enabled: bool,
    pub fullscreen: bool,
}

/// Built-in buttons in display order.
pub fn card_buttons(config: &MenuButtonsConfig, ctx: MenuContext) -> Vec<MenuButton> {
    let view = ctx.view;
    let mut buttons = Vec::new();

    if config.frigate {
        buttons.push(MenuButton::card(
            "Frigate menu / Default view",
            FRIGATE_BUTTON_MENU_ICON,
            CardAction::Frigate,
        ));
    }
    if config.live {
        buttons.push(
            MenuButton::card("Live view", "mdi:cctv", CardAction::Live)
                .emphasized(view.is(ViewKind::Live)),
        );
    }
    if config.clips {
        buttons.push(
            MenuButton::card("Clips gallery", "mdi:filmstrip", CardAction::Clips)
                .on_hold(CardAction::Clip)
                .emphasized(view.is(ViewKind::Clips)),
        );
    }
    if config.snapshots {
        buttons.push(
            MenuButton::card("Snapshots gallery", "mdi:camera", CardAction::Snapshots)
                .on_hold(CardAction::Snapshot)
                .emphasized(view.is(ViewKind::Snapshots)),
        );
    }
    if config.image {
        buttons.push(
            MenuButton::card("Static image", "mdi:image", CardAction::Image)
                .emphasized(view.is(ViewKind::Image)),
        );
    }
    if config.download && view.is_viewer_view() {
        buttons.push(MenuButton::card("Download", "mdi:download", CardAction::Download));
    }
    if config.frigate_ui && ctx.has_frigate_url {
        buttons.push(MenuButton::card("Frigate user interface", "mdi:web", CardAction::FrigateUi));
    }
    if config.fullscreen && ctx.fullscreen_enabled {
        let icon = if ctx.fullscreen {
            "mdi:fullscreen-exit"
        } else {
            "mdi:fullscreen"
        };
        buttons.push(MenuButton::card("Fullscreen", icon, CardAction::Fullscreen));
    }
    buttons
}

/// Extra buttons registered by picture elements.  Buttons are identified by
/// the allocation they live in, not by value.
#[derive(Clone, Debug, Default)]
pub struct MenuState {
    dynamic: Vec<Arc<MenuButton>>,
}

impl MenuState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `button`, unless that very button is registered already.
    pub fn add(&mut self, button: Arc<MenuButton>) -> bool {
        if self.dynamic.iter().any(|known| Arc::ptr_eq(known, &button)) {
            return false;
        }
        self.dynamic.push(button);
        true
    }

    pub fn remove(&mut self, button: &Arc<MenuButton>) -> bool {
        let before = self.dynamic.len();
        self.dynamic.retain(|known| !Arc::ptr_eq(known, button));
        self.dynamic.len() != before
    }

    pub fn dynamic(&self) -> &[Arc<MenuButton>] {
        &self.dynamic
    }

    /// The full ordered menu: built-in buttons, then registered ones.
    pub fn compose(&self, config: &MenuButtonsConfig, ctx: MenuContext) -> Vec<Arc<MenuButton>> {
        card_buttons(config, ctx)
            .into_iter()
            .map(Arc::new)
            .chain(self.dynamic.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx(view: &View) -> MenuContext<'_> {
        MenuContext {
            view,
            has_frigate_url: false,
            fullscreen_enabled: false,
            fullscreen: false,
        }
    }

    fn tap_actions(buttons: &[MenuButton]) -> Vec<&str> {
        buttons
            .iter()
            .filter_map(|button| button.tap_action.as_ref()?.card_action())
            .collect()
    }

    fn dynamic(icon: &str) -> Arc<MenuButton> {
        Arc::new(MenuButton {
            kind: MenuButtonKind::Icon,
            title: None,
            icon: Some(icon.to_string()),
            entity: None,
            emphasize: false,
            tap_action: None,
            hold_action: None,
            double_tap_action: None,
        })
    }

    #[test]
    fn default_buttons_for_live_view() {
        let view = View::new(ViewKind::Live);
        let buttons = card_buttons(&MenuButtonsConfig::default(), ctx(&view));
        assert_eq!(tap_actions(&buttons), ["frigate", "live", "clips", "snapshots"]);
        assert!(buttons[1].emphasize);
        assert!(!buttons[2].emphasize);
        assert_eq!(buttons[0].icon.as_deref(), Some(FRIGATE_BUTTON_MENU_ICON));
        assert_eq!(buttons[2].hold_action, Some(ActionConfig::card(CardAction::Clip)));
    }

    #[test]
    fn every_button_in_order() {
        let config = MenuButtonsConfig {
            image: true,
            ..MenuButtonsConfig::default()
        };
        let view = View::new(ViewKind::Snapshot);
        let buttons = card_buttons(
            &config,
            MenuContext {
                view: &view,
                has_frigate_url: true,
                fullscreen_enabled: true,
                fullscreen: true,
            },
        );
        assert_eq!(
            tap_actions(&buttons),
            [
                "frigate",
                "live",
                "clips",
                "snapshots",
                "image",
                "download",
                "frigate_ui",
                "fullscreen"
            ]
        );
        assert_eq!(buttons[7].icon.as_deref(), Some("mdi:fullscreen-exit"));
        assert!(buttons.iter().all(|button| !button.emphasize));
    }

    #[test]
    fn preconditions_hide_buttons() {
        let config = MenuButtonsConfig {
            live: false,
            ..MenuButtonsConfig::default()
        };
        let view = View::new(ViewKind::Clips);
        let buttons = card_buttons(&config, ctx(&view));
        assert_eq!(tap_actions(&buttons), ["frigate", "clips", "snapshots"]);
        assert!(buttons[1].emphasize);
    }

    #[test]
    fn registering_twice_keeps_one_copy() {
        let first = dynamic("mdi:alarm");
        let second = dynamic("mdi:alarm");
        let mut menu = MenuState::new();
        assert!(menu.add(first.clone()));
        assert!(menu.add(second.clone()));
        assert!(!menu.add(first.clone()));
        assert_eq!(menu.dynamic().len(), 2);
        assert!(Arc::ptr_eq(&menu.dynamic()[0], &first));
        assert!(Arc::ptr_eq(&menu.dynamic()[1], &second));
    }

    #[test]
    fn removal_matches_identity() {
        let first = dynamic("mdi:alarm");
        let lookalike = dynamic("mdi:alarm");
        let mut menu = MenuState::new();
        menu.add(first.clone());
        assert!(!menu.remove(&lookalike));
        assert!(menu.remove(&first));
        assert!(menu.dynamic().is_empty());
    }

    #[test]
    fn dynamic_buttons_follow_card_buttons() {
        let extra = dynamic("mdi:alarm");
        let mut menu = MenuState::new();
        menu.add(extra.clone());
        let view = View::new(ViewKind::Live);
        let buttons = menu.compose(&MenuButtonsConfig::default(), ctx(&view));
        assert_eq!(buttons.len(), 5);
        assert!(Arc::ptr_eq(&buttons[4], &extra));
    }

    #[test]
    fn buttons_deserialize_from_elements() {
        let button: MenuButton = serde_json::from_value(json!({
            "type": "custom:frigate-card-menu-state-icon",
            "entity": "light.porch",
            "tap_action": {"action": "toggle"},
        }))
        .unwrap();
        assert_eq!(button.kind, MenuButtonKind::StateIcon);
        assert_eq!(button.entity.as_deref(), Some("light.porch"));
        assert_eq!(
            button.tap_action,
            Some(ActionConfig::Toggle { entity: None })
        );
    }
}
