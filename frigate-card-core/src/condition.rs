use serde::Deserialize;
use serde_json::Value;

use crate::view::{View, ViewKind};

const CONDITIONAL_ELEMENT: &str = "custom:frigate-card-conditional";

/// Contextual state that conditional elements are evaluated against.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConditionState {
    pub view: View,
    pub fullscreen: bool,
}

impl ConditionState {
    pub fn new(view: &View, fullscreen: bool) -> Self {
        Self {
            view: view.clone(),
            fullscreen,
        }
    }
}

/// Conditions of a `custom:frigate-card-conditional` element.  Every condition
/// present must hold.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Conditions {
    pub view: Option<Vec<ViewKind>>,
    pub fullscreen: Option<bool>,
}

impl Conditions {
    pub fn evaluate(&self, state: &ConditionState) -> bool {
        let view_matches = match &self.view {
            Some(views) => views.contains(&state.view.view),
            None => true,
        };
        let fullscreen_matches = match self.fullscreen {
            Some(fullscreen) => fullscreen == state.fullscreen,
            None => true,
        };
        view_matches && fullscreen_matches
    }
}

#[derive(Deserialize)]
struct ConditionalElement {
    conditions: Conditions,
    #[serde(default)]
    elements: Vec<Value>,
}

/// Flatten the card's picture elements down to the ones currently visible.
/// Card conditionals whose conditions hold are replaced by their children,
/// every other element passes through as is.
pub fn visible_elements(elements: &[Value], state: &ConditionState) -> Vec<Value> {
    let mut visible = Vec::new();
    collect_visible(elements, state, &mut visible);
    visible
}

fn collect_visible(elements: &[Value], state: &ConditionState, out: &mut Vec<Value>) {
    for element in elements {
        if element.get("type").and_then(Value::as_str) != Some(CONDITIONAL_ELEMENT) {
            out.push(element.clone());
            continue;
        }
        match ConditionalElement::deserialize(element) {
            Ok(conditional) => {
                if conditional.conditions.evaluate(state) {
                    collect_visible(&conditional.elements, state, out);
                }
            }
            Err(err) => log::warn!("skipping malformed conditional element: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(kind: ViewKind, fullscreen: bool) -> ConditionState {
        ConditionState::new(&View::new(kind), fullscreen)
    }

    #[test]
    fn empty_conditions_always_hold() {
        assert!(Conditions::default().evaluate(&state(ViewKind::Live, false)));
    }

    #[test]
    fn view_condition_matches_listed_views() {
        let conditions = Conditions {
            view: Some(vec![ViewKind::Clip, ViewKind::ClipSpecific]),
            fullscreen: None,
        };
        assert!(conditions.evaluate(&state(ViewKind::ClipSpecific, false)));
        assert!(!conditions.evaluate(&state(ViewKind::Clips, false)));
    }

    #[test]
    fn all_conditions_must_hold() {
        let conditions = Conditions {
            view: Some(vec![ViewKind::Live]),
            fullscreen: Some(true),
        };
        assert!(conditions.evaluate(&state(ViewKind::Live, true)));
        assert!(!conditions.evaluate(&state(ViewKind::Live, false)));
        assert!(!conditions.evaluate(&state(ViewKind::Image, true)));
    }

    #[test]
    fn conditionals_are_flattened() {
        let elements = vec![
            json!({"type": "state-badge", "entity": "sensor.temp"}),
            json!({
                "type": "custom:frigate-card-conditional",
                "conditions": {"view": ["live"]},
                "elements": [
                    {"type": "icon", "icon": "mdi:cctv"},
                    {
                        "type": "custom:frigate-card-conditional",
                        "conditions": {"fullscreen": true},
                        "elements": [{"type": "icon", "icon": "mdi:fullscreen"}],
                    },
                ],
            }),
        ];

        let live = visible_elements(&elements, &state(ViewKind::Live, false));
        assert_eq!(
            live,
            vec![
                json!({"type": "state-badge", "entity": "sensor.temp"}),
                json!({"type": "icon", "icon": "mdi:cctv"}),
            ]
        );

        let fullscreen = visible_elements(&elements, &state(ViewKind::Live, true));
        assert_eq!(fullscreen.len(), 3);

        let clips = visible_elements(&elements, &state(ViewKind::Clips, true));
        assert_eq!(clips, vec![json!({"type": "state-badge", "entity": "sensor.temp"})]);
    }
}
