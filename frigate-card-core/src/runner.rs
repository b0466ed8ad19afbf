use std::{sync::Arc, time::Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use serde_json::Value;

use crate::{
    action::{ActionConfig, Interaction},
    card::Card,
    config::ConfigError,
    hass::HassState,
    host::Host,
    media::MediaShowInfo,
    menu::MenuButton,
    message::Message,
    render::RenderPlan,
    view::View,
};

/// Everything that can happen to a card from the outside.
#[derive(Debug)]
pub enum CardEvent {
    Config(Value),
    Hass(Arc<HassState>),
    Interaction(Interaction),
    CardAction(String),
    Action(ActionConfig),
    ChangeView(View),
    Back,
    MediaShow(MediaShowInfo),
    Play,
    Pause,
    Message(Message),
    MenuAdd(Arc<MenuButton>),
    MenuRemove(Arc<MenuButton>),
    FullscreenChanged,
    Shutdown,
}

enum Flow {
    Continue,
    Shutdown,
    Refused(ConfigError),
}

/// Drive `card` from `events` until the channel closes or a `Shutdown`
/// arrives.  While the idle timer is armed the wait is bounded by its
/// deadline.  `render` is called whenever the card decides to re-render.
///
/// A refused configuration stops the card and is handed back to the caller
/// so its message can be shown.
pub fn run<H, F>(
    card: &mut Card<H>,
    events: &Receiver<CardEvent>,
    mut render: F,
) -> Result<(), ConfigError>
where
    H: Host,
    F: FnMut(&RenderPlan),
{
    let result = loop {
        // An expired deadline must fire before any queued event is seen.
        if card.poll_timer(Instant::now()) && card.flush_update() {
            emit(card, &mut render);
        }

        let event = match card.timer_deadline() {
            None => match events.recv() {
                Ok(event) => event,
                Err(_) => break Ok(()),
            },
            Some(deadline) => {
                let timeout = deadline.saturating_duration_since(Instant::now());
                match events.recv_timeout(timeout) {
                    Ok(event) => event,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break Ok(()),
                }
            }
        };

        let update = match event {
            CardEvent::Hass(hass) => card.apply_hass(hass),
            event => match handle(card, event) {
                Flow::Continue => card.has_pending_changes() && card.flush_update(),
                Flow::Shutdown => break Ok(()),
                Flow::Refused(err) => break Err(err),
            },
        };
        if update {
            emit(card, &mut render);
        }
    };
    card.teardown();
    result
}

fn emit<H: Host, F: FnMut(&RenderPlan)>(card: &mut Card<H>, render: &mut F) {
    if let Some(plan) = card.render_plan() {
        render(&plan);
    }
}

fn handle<H: Host>(card: &mut Card<H>, event: CardEvent) -> Flow {
    match event {
        CardEvent::Config(raw) => {
            if let Err(err) = card.set_config(&raw) {
                return Flow::Refused(err);
            }
        }
        CardEvent::Hass(hass) => {
            card.apply_hass(hass);
        }
        CardEvent::Interaction(interaction) => card.handle_interaction(interaction),
        CardEvent::CardAction(name) => card.handle_card_action(&name),
        CardEvent::Action(action) => card.handle_action(&action),
        CardEvent::ChangeView(view) => card.request_view_change(view),
        CardEvent::Back => {
            if !card.navigate_back() {
                log::info!("no previous view");
            }
        }
        CardEvent::MediaShow(info) => {
            card.media_show(info);
        }
        CardEvent::Play => card.play(),
        CardEvent::Pause => card.pause(),
        CardEvent::Message(message) => {
            card.set_message(message);
        }
        CardEvent::MenuAdd(button) => {
            card.add_menu_button(button);
        }
        CardEvent::MenuRemove(button) => {
            card.remove_menu_button(&button);
        }
        CardEvent::FullscreenChanged => card.fullscreen_changed(),
        CardEvent::Shutdown => return Flow::Shutdown,
    }
    Flow::Continue
}
