use serde_json::{Map, Value};

/// Flat keys used by the first configuration layout, and where each one lives
/// now.
const MOVED_KEYS: &[(&str, &[&str])] = &[
    ("frigate_url", &["frigate", "url"]),
    ("frigate_client_id", &["frigate", "client_id"]),
    ("frigate_camera_name", &["frigate", "camera_name"]),
    ("label", &["frigate", "label"]),
    ("zone", &["frigate", "zone"]),
    ("view_default", &["view", "default"]),
    ("view_timeout", &["view", "timeout"]),
    ("update_entities", &["view", "update_entities"]),
    ("menu_mode", &["menu", "mode"]),
    ("live_preload", &["live", "preload"]),
];

/// Whether `raw` still uses a deprecated layout that `upgrade` can fix.
pub fn is_upgradeable(raw: &Value) -> bool {
    let Some(config) = raw.as_object() else {
        return false;
    };
    MOVED_KEYS
        .iter()
        .any(|(old, new)| {
            config.contains_key(*old) && lookup(config, new).is_none() && can_insert(config, new)
        })
}

/// Move deprecated keys to their current location.  A value already present
/// at the new location always wins over the deprecated one.
pub fn upgrade(raw: &Value) -> Value {
    let Some(config) = raw.as_object() else {
        return raw.clone();
    };
    let mut upgraded = config.clone();
    for (old, new) in MOVED_KEYS {
        if !upgraded.contains_key(*old) {
            continue;
        }
        if lookup(&upgraded, new).is_some() {
            log::info!("dropping deprecated {:?}, {:?} is already set", old, new.join("."));
            upgraded.remove(*old);
            continue;
        }
        if !can_insert(&upgraded, new) {
            log::warn!("leaving deprecated {:?}, cannot move it to {:?}", old, new.join("."));
            continue;
        }
        let Some(value) = upgraded.remove(*old) else {
            continue;
        };
        log::info!("moving deprecated {:?} to {:?}", old, new.join("."));
        insert(&mut upgraded, new, value);
    }
    Value::Object(upgraded)
}

fn lookup<'a>(config: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;
    let mut section = config;
    for key in parents {
        section = section.get(*key)?.as_object()?;
    }
    section.get(*last)
}

/// Whether every parent along `path` is either missing or a section.
fn can_insert(config: &Map<String, Value>, path: &[&str]) -> bool {
    let Some((_, parents)) = path.split_last() else {
        return false;
    };
    let mut section = config;
    for key in parents {
        match section.get(*key) {
            None => return true,
            Some(Value::Object(map)) => section = map,
            Some(_) => return false,
        }
    }
    true
}

fn insert(config: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut section = config;
    for key in parents {
        let entry = section
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            log::warn!("cannot move into {:?}, it is not a section", key);
            return;
        }
        section = match entry.as_object_mut() {
            Some(map) => map,
            None => return,
        };
    }
    section.insert(last.to_string(), value);
}
