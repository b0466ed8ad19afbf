use crate::{action::ActionConfig, config::DashboardMode, hass::HomeAssistant};

/// The dashboard embedding the card.
pub trait Host: HomeAssistant {
    fn open_url(&mut self, url: &str);

    /// Fetch an already signed URL as a download.
    fn download(&mut self, url: &str);

    fn fullscreen_enabled(&self) -> bool;

    fn is_fullscreen(&self) -> bool;

    fn toggle_fullscreen(&mut self);

    /// Perform an action that is not addressed to the card.
    fn handle_action(&mut self, action: &ActionConfig);

    fn set_edit_mode(&mut self, enabled: bool);

    fn dashboard_mode(&self) -> DashboardMode;
}
