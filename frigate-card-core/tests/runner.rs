mod support;

use std::{thread, time::Duration};

use crossbeam_channel::unbounded;
use frigate_card_core::{
    action::Interaction,
    card::Card,
    render::Panel,
    runner::{self, CardEvent},
    view::ViewKind,
};
use serde_json::json;

use support::{hass, RecordingHost};

#[test]
fn renders_accepted_events_until_shutdown() {
    let (sender, receiver) = unbounded();
    sender
        .send(CardEvent::Config(json!({
            "camera_entity": "camera.front_door",
            "view": {"update_entities": ["binary_sensor.motion"]},
        })))
        .unwrap();
    sender.send(CardEvent::Hass(hass("off", "20"))).unwrap();
    sender.send(CardEvent::Hass(hass("off", "21"))).unwrap();
    sender
        .send(CardEvent::CardAction("clips".to_string()))
        .unwrap();
    sender.send(CardEvent::Play).unwrap();
    sender.send(CardEvent::Shutdown).unwrap();
    sender
        .send(CardEvent::CardAction("snapshots".to_string()))
        .unwrap();

    let mut card = Card::new(RecordingHost::new());
    let mut plans = Vec::new();
    runner::run(&mut card, &receiver, |plan| plans.push(plan.clone())).unwrap();

    let views: Vec<_> = plans.iter().map(|plan| (plan.view, plan.panel)).collect();
    assert_eq!(
        views,
        [
            (ViewKind::Live, None),
            (ViewKind::Live, Some(Panel::Live)),
            (ViewKind::Clips, Some(Panel::Gallery)),
        ]
    );
    assert_eq!(card.view().view, ViewKind::Clips);
}

#[test]
fn refused_configuration_is_returned() {
    let (sender, receiver) = unbounded();
    sender
        .send(CardEvent::Config(json!({"view": {"default": "nowhere"}})))
        .unwrap();
    sender.send(CardEvent::Hass(hass("off", "20"))).unwrap();
    drop(sender);

    let mut card = Card::new(RecordingHost::new());
    let mut renders = 0;
    let err = runner::run(&mut card, &receiver, |_| renders += 1).unwrap_err();
    assert_eq!(renders, 0);
    assert!(card.config().is_none());
    assert!(err.hints.contains("view -> default"));
    assert!(err.to_string().contains("view -> default"));
}

#[test]
fn expired_timer_fires_before_queued_events() {
    let (sender, receiver) = unbounded();
    sender
        .send(CardEvent::Config(json!({
            "camera_entity": "camera.front_door",
            "view": {"timeout": 0.001, "update_entities": ["binary_sensor.motion"]},
        })))
        .unwrap();
    sender.send(CardEvent::Hass(hass("off", "20"))).unwrap();
    sender
        .send(CardEvent::CardAction("clips".to_string()))
        .unwrap();
    sender.send(CardEvent::Hass(hass("on", "20"))).unwrap();
    sender.send(CardEvent::Shutdown).unwrap();

    let mut card = Card::new(RecordingHost::new());
    let mut plans = Vec::new();
    runner::run(&mut card, &receiver, |plan| {
        if plan.view == ViewKind::Clips {
            // Outlast the idle timeout while the next events wait in the queue.
            thread::sleep(Duration::from_millis(50));
        }
        plans.push(plan.view);
    })
    .unwrap();

    assert_eq!(
        plans,
        [
            ViewKind::Live,
            ViewKind::Live,
            ViewKind::Clips,
            ViewKind::Live,
            ViewKind::Live,
        ]
    );
    assert_eq!(card.view().view, ViewKind::Live);
}

#[test]
fn idle_timeout_returns_to_default_view() {
    let (sender, receiver) = unbounded();
    sender
        .send(CardEvent::Config(json!({"view": {"timeout": 0.05}})))
        .unwrap();
    sender.send(CardEvent::Hass(hass("off", "20"))).unwrap();
    sender.send(CardEvent::Interaction(Interaction::Tap)).unwrap();
    sender
        .send(CardEvent::CardAction("snapshots".to_string()))
        .unwrap();

    let worker = thread::spawn(move || {
        let mut card = Card::new(RecordingHost::new());
        let mut plans = Vec::new();
        runner::run(&mut card, &receiver, |plan| plans.push(plan.view)).unwrap();
        (card.is_interaction_active(), plans)
    });

    thread::sleep(Duration::from_millis(500));
    sender.send(CardEvent::Shutdown).unwrap();
    let (timer_active, plans) = worker.join().unwrap();

    assert_eq!(plans.last(), Some(&ViewKind::Live));
    assert!(plans.contains(&ViewKind::Snapshots));
    assert!(!timer_active);
}
