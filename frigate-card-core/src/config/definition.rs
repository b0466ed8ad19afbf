use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::schema::{optional, required, Field, Schema};

pub const DEFAULT_VIEWS: &[&str] = &["live", "clips", "clip", "snapshots", "snapshot", "image"];

pub const VIEW_NAMES: &[&str] = &[
    "live",
    "clips",
    "snapshots",
    "clip",
    "clip-specific",
    "snapshot",
    "snapshot-specific",
    "image",
];

pub const MENU_MODES: &[&str] = &[
    "none",
    "hidden-top",
    "hidden-left",
    "hidden-bottom",
    "hidden-right",
    "overlay-top",
    "overlay-left",
    "overlay-bottom",
    "overlay-right",
    "hover-top",
    "hover-left",
    "hover-bottom",
    "hover-right",
    "above",
    "below",
];

pub const ASPECT_RATIO_MODES: &[&str] = &["dynamic", "static", "unconstrained"];

pub const THUMBNAIL_MEDIA: &[&str] = &["clips", "snapshots"];

const MENU_BUTTONS: &[&str] = &[
    "frigate",
    "live",
    "clips",
    "snapshots",
    "image",
    "download",
    "frigate_ui",
    "fullscreen",
];

pub static ASPECT_RATIO_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*[:/]\s*(\d+(?:\.\d+)?)\s*$").expect("valid ratio pattern")
});

/// The whole card configuration.
pub static CARD_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    Schema::Object(vec![
        optional("camera_entity", Schema::String),
        optional(
            "frigate",
            Schema::Object(vec![
                optional("camera_name", Schema::String),
                optional("client_id", Schema::String),
                optional("url", Schema::String),
                optional("label", Schema::String),
                optional("zone", Schema::String),
            ]),
        ),
        optional(
            "view",
            Schema::Object(vec![
                optional("default", Schema::Enum(DEFAULT_VIEWS)),
                optional("timeout", Schema::number_min(0.0)),
                optional("update_entities", Schema::array(Schema::String)),
                optional("update_force", Schema::Bool),
                optional("actions", actions()),
            ]),
        ),
        optional(
            "menu",
            Schema::Object(vec![
                optional("mode", Schema::Enum(MENU_MODES)),
                optional(
                    "buttons",
                    Schema::Object(
                        MENU_BUTTONS
                            .iter()
                            .map(|name| optional(*name, Schema::Bool))
                            .collect(),
                    ),
                ),
                optional("button_size", Schema::String),
            ]),
        ),
        optional(
            "live",
            Schema::Object(vec![
                optional("preload", Schema::Bool),
                optional("actions", actions()),
                optional(
                    "controls",
                    Schema::Object(vec![optional(
                        "thumbnails",
                        Schema::Object(vec![optional("media", Schema::Enum(THUMBNAIL_MEDIA))]),
                    )]),
                ),
            ]),
        ),
        optional(
            "event_viewer",
            Schema::Object(vec![optional("actions", actions())]),
        ),
        optional(
            "event_gallery",
            Schema::Object(vec![optional("actions", actions())]),
        ),
        optional(
            "image",
            Schema::Object(vec![
                optional("src", Schema::String),
                optional("actions", actions()),
            ]),
        ),
        optional(
            "dimensions",
            Schema::Object(vec![
                optional("aspect_ratio_mode", Schema::Enum(ASPECT_RATIO_MODES)),
                optional(
                    "aspect_ratio",
                    Schema::Union(vec![
                        Schema::Tuple(vec![Schema::number_min(0.0), Schema::number_min(0.0)]),
                        Schema::String.refine(aspect_ratio_text),
                    ]),
                ),
            ]),
        ),
        optional("elements", Schema::array(Schema::Ref(&ELEMENT))),
        optional("test_gui", Schema::Bool),
    ])
});

/// A single picture element, discriminated by its `type`.
pub static ELEMENT: Lazy<Schema> = Lazy::new(|| {
    Schema::Union(vec![
        element(
            "state-badge",
            vec![required("entity", Schema::String)],
        ),
        element(
            "state-icon",
            with_actions(vec![
                required("entity", Schema::String),
                optional("icon", Schema::String),
                optional("state_color", Schema::Bool),
            ]),
        ),
        element(
            "state-label",
            vec![
                required("entity", Schema::String),
                optional("attribute", Schema::String),
                optional("prefix", Schema::String),
                optional("suffix", Schema::String),
            ],
        ),
        element(
            "service-button",
            vec![
                required("service", Schema::String),
                optional("service_data", Schema::Any),
            ],
        ),
        element(
            "icon",
            with_actions(vec![
                required("icon", Schema::String),
                optional("entity", Schema::String),
            ]),
        ),
        element(
            "image",
            with_actions(vec![
                optional("entity", Schema::String),
                optional("image", Schema::String),
                optional("camera_image", Schema::String),
            ]),
        ),
        element(
            "conditional",
            vec![
                required(
                    "conditions",
                    Schema::array(Schema::Object(vec![
                        required("entity", Schema::String),
                        optional("state", Schema::String),
                        optional("state_not", Schema::String),
                    ])),
                ),
                required("elements", Schema::array(Schema::Ref(&ELEMENT))),
            ],
        ),
        element(
            "custom:frigate-card-menu-icon",
            with_actions(vec![required("icon", Schema::String)]),
        ),
        element(
            "custom:frigate-card-menu-state-icon",
            with_actions(vec![
                required("entity", Schema::String),
                optional("icon", Schema::String),
                optional("state_color", Schema::Bool),
            ]),
        ),
        element(
            "custom:frigate-card-conditional",
            vec![
                required(
                    "conditions",
                    Schema::Object(vec![
                        optional("view", Schema::array(Schema::Enum(VIEW_NAMES))),
                        optional("fullscreen", Schema::Bool),
                    ]),
                ),
                required("elements", Schema::array(Schema::Ref(&ELEMENT))),
            ],
        ),
    ])
});

fn element(kind: &'static str, fields: Vec<Field>) -> Schema {
    let mut all = vec![
        required("type", Schema::Literal(kind)),
        optional("title", Schema::String),
        optional("style", Schema::record(Schema::Any)),
    ];
    all.extend(fields);
    Schema::Object(all)
}

fn with_actions(mut fields: Vec<Field>) -> Vec<Field> {
    fields.push(optional("tap_action", action()));
    fields.push(optional("hold_action", action()));
    fields.push(optional("double_tap_action", action()));
    fields
}

fn actions() -> Schema {
    Schema::Object(with_actions(Vec::new()))
}

fn action() -> Schema {
    let action = |name: &'static str, fields: Vec<Field>| {
        let mut all = vec![required("action", Schema::Literal(name))];
        all.extend(fields);
        Schema::Object(all)
    };
    Schema::Union(vec![
        action("toggle", vec![optional("entity", Schema::String)]),
        action("more-info", vec![optional("entity", Schema::String)]),
        action(
            "navigate",
            vec![required("navigation_path", Schema::String)],
        ),
        action("url", vec![required("url_path", Schema::String)]),
        action(
            "call-service",
            vec![
                required("service", Schema::String),
                optional("service_data", Schema::Any),
            ],
        ),
        action("none", Vec::new()),
        action(
            "fire-dom-event",
            vec![optional("frigate_card_action", Schema::String)],
        ),
    ])
}

fn aspect_ratio_text(value: &Value) -> Result<(), String> {
    match value.as_str() {
        Some(text) if ASPECT_RATIO_TEXT.is_match(text) => Ok(()),
        _ => Err("aspect ratio must look like '16:9'".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_configuration_is_valid() {
        assert!(CARD_SCHEMA
            .parse(&json!({"camera_entity": "camera.front_door"}))
            .is_ok());
        assert!(CARD_SCHEMA.parse(&json!({})).is_ok());
    }

    #[test]
    fn full_configuration_is_valid() {
        let config = json!({
            "camera_entity": "camera.front_door",
            "frigate": {"url": "http://frigate:5000", "client_id": "frigate", "label": "person"},
            "view": {
                "default": "clips",
                "timeout": 30,
                "update_entities": ["binary_sensor.motion"],
                "update_force": true,
                "actions": {"tap_action": {"action": "fire-dom-event", "frigate_card_action": "live"}},
            },
            "menu": {"mode": "above", "buttons": {"image": true, "fullscreen": false}},
            "live": {"preload": true, "controls": {"thumbnails": {"media": "snapshots"}}},
            "dimensions": {"aspect_ratio_mode": "static", "aspect_ratio": "4:3"},
            "elements": [
                {"type": "state-badge", "entity": "sensor.temp", "style": {"left": "10%"}},
                {
                    "type": "custom:frigate-card-conditional",
                    "conditions": {"view": ["clip-specific"], "fullscreen": true},
                    "elements": [{"type": "icon", "icon": "mdi:cctv"}],
                },
            ],
            "test_gui": false,
        });
        assert!(CARD_SCHEMA.parse(&config).is_ok(), "{:?}", CARD_SCHEMA.parse(&config));
    }

    #[test]
    fn aspect_ratio_accepts_pairs_and_text() {
        let check = |ratio: Value| {
            CARD_SCHEMA
                .parse(&json!({"dimensions": {"aspect_ratio": ratio}}))
                .is_ok()
        };
        assert!(check(json!([16, 9])));
        assert!(check(json!("16:9")));
        assert!(check(json!(" 4 / 3 ")));
        assert!(!check(json!("wide")));
        assert!(!check(json!([16])));
    }

    #[test]
    fn unknown_view_is_rejected() {
        assert!(CARD_SCHEMA
            .parse(&json!({"view": {"default": "clip-specific"}}))
            .is_err());
    }
}
