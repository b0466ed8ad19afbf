pub mod definition;
pub mod hints;
pub mod schema;
pub mod upgrade;

use std::{collections::BTreeSet, fmt, fs::File, io::BufReader, path::Path, time::Duration};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{json, ser::PrettyFormatter, Value};

use crate::{action::Actions, error::Error, media::MediaType, view::ViewKind};

use self::definition::{ASPECT_RATIO_TEXT, CARD_SCHEMA};

const INVALID_CONFIGURATION: &str = "Invalid configuration";
const INVALID_CONFIGURATION_NO_HINT: &str = "No hint available";
const UPGRADE_AVAILABLE: &str = "An automated card configuration upgrade is available";

/// How the hosting dashboard stores its configuration.  Upgrades can only be
/// applied for dashboards managed through the UI.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DashboardMode {
    Storage,
    Yaml,
}

/// A configuration the card refused.  `message` is meant to be shown to the
/// user as is.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigError {
    pub message: String,
    pub hints: BTreeSet<String>,
    pub upgradeable: bool,
}

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl ConfigError {
    fn new(hints: BTreeSet<String>, upgradeable: bool, mode: DashboardMode) -> Self {
        let mut message = String::new();
        if upgradeable && mode != DashboardMode::Yaml {
            message.push_str(UPGRADE_AVAILABLE);
            message.push_str(". ");
        }
        message.push_str(INVALID_CONFIGURATION);
        message.push_str(": ");
        if hints.is_empty() {
            message.push_str(INVALID_CONFIGURATION_NO_HINT);
        } else {
            message.push_str(&render_hints(&hints));
        }
        Self {
            message,
            hints,
            upgradeable,
        }
    }
}

fn render_hints(hints: &BTreeSet<String>) -> String {
    let mut out = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b" "));
    match hints.serialize(&mut ser) {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(err) => {
            log::error!("failed to render configuration hints: {}", err);
            hints.iter().join(", ")
        }
    }
}

/// Validate a raw configuration value and produce the typed configuration.
pub fn parse(raw: &Value, mode: DashboardMode) -> Result<Config, ConfigError> {
    if !raw.is_object() {
        return Err(ConfigError::new(BTreeSet::new(), false, mode));
    }
    let upgradeable = upgrade::is_upgradeable(raw);
    if let Err(err) = CARD_SCHEMA.parse(raw) {
        let hints = hints::parse_error_paths(&err).unwrap_or_default();
        for issue in &err.issues {
            log::debug!("configuration issue at {:?}: {}", hints::path_string(&issue.path), issue);
        }
        return Err(ConfigError::new(hints, upgradeable, mode));
    }
    serde_json::from_value(raw.clone()).map_err(|err| {
        log::error!("validated configuration failed to deserialize: {}", err);
        ConfigError::new(BTreeSet::new(), upgradeable, mode)
    })
}

/// Read a raw configuration from a JSON file.
pub fn read_raw(path: &Path) -> Result<Value, Error> {
    log::info!("loading config: {:?}", path);
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// A minimal configuration using the first camera entity available.
pub fn stub(entities: &[String]) -> Value {
    match entities.iter().find(|entity| entity.starts_with("camera.")) {
        Some(camera) => json!({ "camera_entity": camera }),
        None => json!({}),
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub camera_entity: Option<String>,
    pub frigate: FrigateConfig,
    pub view: ViewConfig,
    pub menu: MenuConfig,
    pub live: LiveConfig,
    pub event_viewer: ActionsConfig,
    pub event_gallery: ActionsConfig,
    pub image: ImageConfig,
    pub dimensions: DimensionsConfig,
    pub elements: Option<Vec<Value>>,
    pub test_gui: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct FrigateConfig {
    pub camera_name: Option<String>,
    pub client_id: String,
    pub url: Option<String>,
    pub label: Option<String>,
    pub zone: Option<String>,
}

impl Default for FrigateConfig {
    fn default() -> Self {
        Self {
            camera_name: None,
            client_id: "frigate".to_string(),
            url: None,
            label: None,
            zone: None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewConfig {
    pub default: ViewKind,
    /// Seconds of inactivity before the card returns to the default view.
    pub timeout: Option<f64>,
    pub update_entities: Vec<String>,
    pub update_force: bool,
    pub actions: Actions,
}

impl ViewConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
            .filter(|secs| *secs > 0.0 && secs.is_finite())
            .map(Duration::from_secs_f64)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MenuConfig {
    pub mode: MenuMode,
    pub buttons: MenuButtonsConfig,
    pub button_size: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuMode {
    None,
    HiddenTop,
    HiddenLeft,
    HiddenBottom,
    HiddenRight,
    OverlayTop,
    OverlayLeft,
    OverlayBottom,
    OverlayRight,
    HoverTop,
    HoverLeft,
    HoverBottom,
    HoverRight,
    Above,
    Below,
}

impl MenuMode {
    pub fn is_hover(self) -> bool {
        matches!(
            self,
            MenuMode::HoverTop | MenuMode::HoverLeft | MenuMode::HoverBottom | MenuMode::HoverRight
        )
    }
}

impl Default for MenuMode {
    fn default() -> Self {
        Self::HiddenTop
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MenuButtonsConfig {
    pub frigate: bool,
    pub live: bool,
    pub clips: bool,
    pub snapshots: bool,
    pub image: bool,
    pub download: bool,
    pub frigate_ui: bool,
    pub fullscreen: bool,
}

impl Default for MenuButtonsConfig {
    fn default() -> Self {
        Self {
            frigate: true,
            live: true,
            clips: true,
            snapshots: true,
            image: false,
            download: true,
            frigate_ui: true,
            fullscreen: true,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LiveConfig {
    pub preload: bool,
    pub actions: Actions,
    pub controls: LiveControlsConfig,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LiveControlsConfig {
    pub thumbnails: ThumbnailsConfig,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ThumbnailsConfig {
    pub media: MediaType,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ActionsConfig {
    pub actions: Actions,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageConfig {
    pub src: Option<String>,
    pub actions: Actions,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DimensionsConfig {
    pub aspect_ratio_mode: AspectRatioMode,
    pub aspect_ratio: Option<AspectRatio>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatioMode {
    Dynamic,
    Static,
    Unconstrained,
}

impl Default for AspectRatioMode {
    fn default() -> Self {
        Self::Dynamic
    }
}

/// Width and height, given either as `[16, 9]` or as `"16:9"`.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "RawAspectRatio")]
pub struct AspectRatio(pub [f64; 2]);

impl AspectRatio {
    pub fn width(&self) -> f64 {
        self.0[0]
    }

    pub fn height(&self) -> f64 {
        self.0[1]
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAspectRatio {
    Pair([f64; 2]),
    Text(String),
}

impl TryFrom<RawAspectRatio> for AspectRatio {
    type Error = String;

    fn try_from(raw: RawAspectRatio) -> Result<Self, Self::Error> {
        match raw {
            RawAspectRatio::Pair(pair) => Ok(AspectRatio(pair)),
            RawAspectRatio::Text(text) => {
                let captures = ASPECT_RATIO_TEXT
                    .captures(&text)
                    .ok_or_else(|| format!("invalid aspect ratio {text:?}"))?;
                let part = |index: usize| {
                    captures[index]
                        .parse::<f64>()
                        .map_err(|err| format!("invalid aspect ratio {text:?}: {err}"))
                };
                Ok(AspectRatio([part(1)?, part(2)?]))
            }
        }
    }
}
