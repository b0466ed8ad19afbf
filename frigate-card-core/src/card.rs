use std::{mem, sync::Arc, time::Instant};

use serde_json::Value;

use crate::{
    action::{ActionConfig, Actions, CardAction, Interaction},
    camera::{self, CameraName},
    condition::{self, ConditionState},
    config::{self, AspectRatioMode, Config, ConfigError},
    gate::{CardProperty, GateInputs, PropertyChanges, UpdateGate},
    hass::HassState,
    host::Host,
    media::{BrowseMediaQuery, MediaShowInfo, MediaType},
    menu::{MenuButton, MenuContext, MenuState},
    message::{self, Message},
    nav::NavStack,
    render::{MenuPosition, Panel, RenderPlan},
    timer::{IdleTimer, TimerToken},
    view::{View, ViewKind},
};

const DEFAULT_ASPECT_RATIO_PADDING: f64 = 9.0 / 16.0 * 100.0;
const DEFAULT_CARD_SIZE: f64 = 6.0;
const CARD_SIZE_UNIT: f64 = 50.0;

/// The card controller.  Owns the current view, configuration and all
/// transient state, and talks to the dashboard through `H`.
pub struct Card<H> {
    host: H,
    config: Option<Config>,
    gate: UpdateGate,
    hass: Option<Arc<HassState>>,
    view: View,
    history: NavStack,
    condition_state: ConditionState,
    message: message::MessageSlot,
    media_show_info: Option<MediaShowInfo>,
    media_playing: bool,
    camera_name: CameraName,
    menu: MenuState,
    timer: IdleTimer,
    changes: PropertyChanges,
}

impl<H: Host> Card<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            config: None,
            gate: UpdateGate::default(),
            hass: None,
            view: View::default(),
            history: NavStack::new(),
            condition_state: ConditionState::default(),
            message: message::MessageSlot::default(),
            media_show_info: None,
            media_playing: false,
            camera_name: CameraName::Unresolved,
            menu: MenuState::new(),
            timer: IdleTimer::new(),
            changes: PropertyChanges::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    /// Validate and install a new configuration.  A refused configuration
    /// leaves the card as it was.
    pub fn set_config(&mut self, raw: &Value) -> Result<(), ConfigError> {
        let config = match config::parse(raw, self.host.dashboard_mode()) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{}", err);
                return Err(err);
            }
        };
        if config.test_gui {
            self.host.set_edit_mode(true);
        }

        let mut entities = config.view.update_entities.clone();
        entities.extend(config.camera_entity.iter().cloned());
        self.gate = UpdateGate::new(entities);
        self.camera_name = CameraName::Unresolved;

        let update_force = config.view.update_force;
        log::info!(
            "configured for {}",
            config.camera_entity.as_deref().unwrap_or("no camera entity")
        );
        self.config = Some(config);
        self.changes.mark(CardProperty::Config);

        if update_force {
            self.reset_interaction_timer();
        }
        self.change_view(None);
        Ok(())
    }

    /// Take a new host state.  Returns whether the card should re-render.
    pub fn apply_hass(&mut self, hass: Arc<HassState>) -> bool {
        let previous = self.hass.replace(hass);
        self.changes.mark_hass(previous);
        self.flush_update()
    }

    pub fn hass(&self) -> Option<&HassState> {
        self.hass.as_deref()
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Decide on the property changes collected since the last decision.
    pub fn flush_update(&mut self) -> bool {
        let changes = mem::take(&mut self.changes);
        let inputs = GateInputs {
            config_loaded: self.config.is_some(),
            update_force: self
                .config
                .as_ref()
                .is_some_and(|config| config.view.update_force),
            interaction_active: self.timer.is_active(),
            media_playing: self.media_playing,
        };
        let update = self
            .gate
            .should_update(inputs, &changes, self.hass.as_deref());
        log::trace!("update {} for {:?}", update, changes);
        update
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Navigate on the card's own behalf.  `None` means the configured
    /// default view.  History is discarded.
    pub fn change_view(&mut self, view: Option<View>) {
        let view = view.unwrap_or_else(|| View::new(self.default_view()));
        self.history.clear();
        self.set_view(view);
    }

    /// Navigate on behalf of a nested component.  The current view can be
    /// returned to with `navigate_back`.
    pub fn request_view_change(&mut self, view: View) {
        self.history.push(self.view.clone());
        self.set_view(view);
    }

    pub fn navigate_back(&mut self) -> bool {
        match self.history.pop() {
            Some(view) => {
                self.set_view(view);
                true
            }
            None => false,
        }
    }

    pub fn previous_view(&self) -> Option<&View> {
        self.history.peek()
    }

    fn default_view(&self) -> ViewKind {
        self.config
            .as_ref()
            .map(|config| config.view.default)
            .unwrap_or_default()
    }

    fn set_view(&mut self, view: View) {
        log::debug!("view: {} -> {}", self.view.view, view.view);
        if self.message.clear() {
            self.changes.mark(CardProperty::Message);
        }
        self.view = view;
        self.changes.mark(CardProperty::View);
        self.generate_condition_state();
    }

    fn generate_condition_state(&mut self) {
        self.condition_state = ConditionState::new(&self.view, self.is_fullscreen());
        self.changes.mark(CardProperty::ConditionState);
    }

    pub fn condition_state(&self) -> &ConditionState {
        &self.condition_state
    }

    pub fn is_fullscreen(&self) -> bool {
        self.host.fullscreen_enabled() && self.host.is_fullscreen()
    }

    /// The host entered or left fullscreen.
    pub fn fullscreen_changed(&mut self) {
        self.generate_condition_state();
    }

    /// Run a card action by name.  Unknown names are ignored.
    pub fn handle_card_action(&mut self, name: &str) {
        let Ok(action) = name.parse::<CardAction>() else {
            log::warn!("unknown card action: {}", name);
            return;
        };
        self.route(action);
        self.reset_interaction_timer();
    }

    fn route(&mut self, action: CardAction) {
        log::debug!("card action: {}", action);
        match action {
            CardAction::Frigate => self.change_view(None),
            CardAction::Download => self.download(),
            CardAction::FrigateUi => {
                if let Some(url) = self.frigate_url() {
                    self.host.open_url(&url);
                }
            }
            CardAction::Fullscreen => {
                if self.host.fullscreen_enabled() {
                    self.host.toggle_fullscreen();
                    self.fullscreen_changed();
                }
            }
            action => {
                if let Some(kind) = action.target_view() {
                    self.change_view(Some(View::new(kind)));
                }
            }
        }
    }

    /// Card actions are handled here, anything else goes to the host.
    pub fn handle_action(&mut self, action: &ActionConfig) {
        match action.card_action() {
            Some(name) => self.handle_card_action(name),
            None if action.is_action() => self.host.handle_action(action),
            None => {}
        }
    }

    /// A gesture on the card surface.
    pub fn handle_interaction(&mut self, interaction: Interaction) {
        let actions = self.merged_actions();
        if let Some(action) = actions.get(interaction) {
            self.handle_action(action);
        }
        self.reset_interaction_timer();
    }

    /// Card-wide actions overlaid with those of the current view's section.
    pub fn merged_actions(&self) -> Actions {
        let Some(config) = &self.config else {
            return Actions::default();
        };
        let specific = if self.view.is(ViewKind::Live) {
            Some(&config.live.actions)
        } else if self.view.is_gallery_view() {
            Some(&config.event_gallery.actions)
        } else if self.view.is_viewer_view() {
            Some(&config.event_viewer.actions)
        } else if self.view.is(ViewKind::Image) {
            Some(&config.image.actions)
        } else {
            None
        };
        config.view.actions.merged_with(specific)
    }

    fn download_path(&self, config: &Config) -> Result<String, &'static str> {
        let media = self.view.media().ok_or(message::NO_MEDIA)?;
        let event_id = media.event_id().ok_or(message::NO_EVENT_ID)?;
        let file = if self.view.is_clip_related_view() {
            "clip.mp4"
        } else {
            "snapshot.jpg"
        };
        Ok(format!(
            "/api/frigate/{}/notifications/{}/{}?download=true",
            config.frigate.client_id, event_id, file
        ))
    }

    /// Download the media shown in the viewer.
    pub fn download(&mut self) {
        let Some(config) = &self.config else {
            return;
        };
        if !self.view.is_viewer_view() {
            return;
        }
        let path = match self.download_path(config) {
            Ok(path) => path,
            Err(text) => {
                self.set_message(Message::error(text));
                return;
            }
        };
        match self.host.sign_path(&path) {
            Ok(url) => self.host.download(&url),
            Err(err) => {
                log::error!("failed to sign {}: {}", path, err);
                self.set_message(Message::error(message::SIGN_FAILED));
            }
        }
    }

    /// Deep link into the Frigate UI for the current context.
    pub fn frigate_url(&self) -> Option<String> {
        let url = self.config.as_ref()?.frigate.url.as_deref()?;
        let Some(camera) = self.camera_name.name() else {
            return Some(url.to_string());
        };
        let base = url.trim_end_matches('/');
        if self.view.is(ViewKind::Live) {
            Some(format!("{}/cameras/{}", base, camera))
        } else {
            Some(format!("{}/events?camera={}", base, camera))
        }
    }

    pub fn camera_name(&self) -> &CameraName {
        &self.camera_name
    }

    /// Resolve the camera name once per configuration.  Waits for the first
    /// host state, as the registry is only reachable through it.
    pub fn resolve_camera_name(&mut self) -> &CameraName {
        if self.camera_name.is_unresolved() && self.hass.is_some() {
            if let Some(config) = &self.config {
                self.camera_name = camera::resolve(config, &self.host);
            }
        }
        &self.camera_name
    }

    pub fn browse_media_query(&self, media_type: Option<MediaType>) -> Option<BrowseMediaQuery> {
        let config = self.config.as_ref()?;
        let camera_name = self.camera_name.name()?;
        let media_type = match media_type {
            Some(media_type) => media_type,
            None if self.view.is_clip_related_view() => MediaType::Clips,
            None if self.view.is_snapshot_related_view() => MediaType::Snapshots,
            None => return None,
        };
        Some(BrowseMediaQuery {
            media_type,
            client_id: config.frigate.client_id.clone(),
            camera_name: camera_name.to_string(),
            label: config.frigate.label.clone(),
            zone: config.frigate.zone.clone(),
        })
    }

    /// Returns whether the message was taken.
    pub fn set_message(&mut self, message: Message) -> bool {
        let taken = self.message.set(message);
        if taken {
            self.changes.mark(CardProperty::Message);
        }
        taken
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.get()
    }

    /// A media item finished loading.  Returns whether the gallery needs a
    /// refresh for the new dimensions.
    pub fn media_show(&mut self, info: MediaShowInfo) -> bool {
        if !info.is_valid() {
            log::trace!("ignoring media dimensions {}x{}", info.width, info.height);
            return false;
        }
        let refresh = self.view.is_gallery_view() && self.media_show_info != Some(info);
        self.media_show_info = Some(info);
        if refresh {
            self.changes.mark(CardProperty::MediaShowInfo);
        }
        refresh
    }

    pub fn media_show_info(&self) -> Option<MediaShowInfo> {
        self.media_show_info
    }

    pub fn play(&mut self) {
        self.media_playing = true;
    }

    pub fn pause(&mut self) {
        self.media_playing = false;
    }

    pub fn is_media_playing(&self) -> bool {
        self.media_playing
    }

    fn is_aspect_ratio_enforced(&self, mode: AspectRatioMode) -> bool {
        !(self.is_fullscreen()
            || mode == AspectRatioMode::Unconstrained
            || (mode == AspectRatioMode::Dynamic && self.view.is_media_view()))
    }

    /// Top padding, in percent of the width, that gives the card its aspect
    /// ratio.  `None` when the ratio is not enforced.
    pub fn aspect_ratio_padding(&self) -> Option<f64> {
        let config = self.config.as_ref()?;
        let mode = config.dimensions.aspect_ratio_mode;
        if !self.is_aspect_ratio_enforced(mode) {
            return None;
        }
        if let (AspectRatioMode::Dynamic, Some(info)) = (mode, self.media_show_info) {
            return Some(f64::from(info.height) / f64::from(info.width) * 100.0);
        }
        match config.dimensions.aspect_ratio {
            Some(ratio) if ratio.width() > 0.0 => Some(ratio.height() / ratio.width() * 100.0),
            _ => Some(DEFAULT_ASPECT_RATIO_PADDING),
        }
    }

    /// Size of the card in dashboard rows of 50 pixels.
    pub fn card_size(&self) -> f64 {
        match self.media_show_info {
            Some(info) => f64::from(info.height) / CARD_SIZE_UNIT,
            None => DEFAULT_CARD_SIZE,
        }
    }

    pub fn menu_buttons(&self) -> Vec<Arc<MenuButton>> {
        let Some(config) = &self.config else {
            return Vec::new();
        };
        let fullscreen_enabled = self.host.fullscreen_enabled();
        self.menu.compose(
            &config.menu.buttons,
            MenuContext {
                view: &self.view,
                has_frigate_url: config.frigate.url.is_some(),
                fullscreen_enabled,
                fullscreen: fullscreen_enabled && self.host.is_fullscreen(),
            },
        )
    }

    pub fn add_menu_button(&mut self, button: Arc<MenuButton>) -> bool {
        self.menu.add(button)
    }

    pub fn remove_menu_button(&mut self, button: &Arc<MenuButton>) -> bool {
        self.menu.remove(button)
    }

    pub fn reset_interaction_timer(&mut self) {
        let Some(timeout) = self.config.as_ref().and_then(|config| config.view.timeout()) else {
            return;
        };
        let token = self.timer.reset(Instant::now(), timeout);
        log::trace!("idle timer {:?} armed for {:?}", token, timeout);
    }

    pub fn is_interaction_active(&self) -> bool {
        self.timer.is_active()
    }

    pub fn timer_token(&self) -> Option<TimerToken> {
        self.timer.token()
    }

    pub fn timer_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// An expiry was delivered.  Stale tokens are ignored.
    pub fn handle_timer(&mut self, token: TimerToken) -> bool {
        if !self.timer.expire(token) {
            return false;
        }
        self.idle_timeout();
        true
    }

    /// Fire the idle timer if its deadline has passed.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        if self.timer.poll(now).is_none() {
            return false;
        }
        self.idle_timeout();
        true
    }

    fn idle_timeout(&mut self) {
        log::debug!("idle, returning to the default view");
        self.change_view(None);
        if self
            .config
            .as_ref()
            .is_some_and(|config| config.view.update_force)
        {
            self.reset_interaction_timer();
        }
    }

    /// Snapshot of what should be drawn.  `None` before the first valid
    /// configuration.
    pub fn render_plan(&mut self) -> Option<RenderPlan> {
        self.config.as_ref()?;
        let has_hass = self.hass.is_some();
        if has_hass && self.resolve_camera_name().name().is_none() {
            self.message.set(Message::error(message::NO_CAMERA_NAME));
        }
        let config = self.config.as_ref()?;

        let message = self.message.get().cloned();
        let panel = has_hass.then(|| {
            if message.is_some() {
                Panel::Message
            } else if self.view.is(ViewKind::Image) {
                Panel::Image
            } else if self.view.is_gallery_view() {
                Panel::Gallery
            } else if self.view.is_viewer_view() {
                Panel::Viewer
            } else {
                Panel::Live
            }
        });
        let live_preload = has_hass && config.live.preload && panel != Some(Panel::Live);
        let live_query = if panel == Some(Panel::Live) || live_preload {
            self.browse_media_query(Some(config.live.controls.thumbnails.media))
        } else {
            None
        };
        let elements = config
            .elements
            .as_deref()
            .map(|elements| condition::visible_elements(elements, &self.condition_state))
            .unwrap_or_default();

        Some(RenderPlan {
            view: self.view.view,
            media_title: self.view.media().map(|media| media.title.clone()),
            panel,
            live_preload,
            message,
            padding: self.aspect_ratio_padding(),
            menu_position: if config.menu.mode == config::MenuMode::Above {
                MenuPosition::Above
            } else {
                MenuPosition::Below
            },
            hover_menu: config.menu.mode.is_hover(),
            buttons: self.menu_buttons(),
            query: self.browse_media_query(None),
            live_query,
            elements,
        })
    }

    /// The card is going away.
    pub fn teardown(&mut self) {
        self.timer.cancel();
        log::debug!("card torn down");
    }
}
