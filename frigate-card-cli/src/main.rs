use frigate_card_core::{
    action::{ActionConfig, Interaction},
    card::Card,
    config::{self, upgrade, DashboardMode},
    error::Error,
    hass::{EntityRegistryEntry, HassState, HomeAssistant, RestClient},
    host::Host,
    runner::{self, CardEvent},
};
use crossbeam_channel::{unbounded, Sender};
use std::{env, io, io::BufRead, path::Path, sync::Arc, thread, time::Duration};

const STATE_POLL_INTERVAL: Duration = Duration::from_secs(5);

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let result = match args.get(1).map(String::as_str) {
        Some("upgrade") => match args.get(2) {
            Some(path) => print_upgraded(Path::new(path)),
            None => usage(),
        },
        Some(path) => start(Path::new(path)),
        None => usage(),
    };
    if let Err(err) = result {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn usage() -> Result<(), Error> {
    eprintln!("usage: frigate-card-cli <config.json>");
    eprintln!("       frigate-card-cli upgrade <config.json>");
    Ok(())
}

fn print_upgraded(path: &Path) -> Result<(), Error> {
    let raw = config::read_raw(path)?;
    if !upgrade::is_upgradeable(&raw) {
        log::info!("configuration is up to date");
    }
    let upgraded = upgrade::upgrade(&raw);
    config::parse(&upgraded, DashboardMode::Yaml)?;
    println!("{}", serde_json::to_string_pretty(&upgraded)?);
    Ok(())
}

fn start(path: &Path) -> Result<(), Error> {
    let raw = config::read_raw(path)?;
    config::parse(&raw, DashboardMode::Yaml)?;
    let client = rest_client_from_env()?;

    let (sender, receiver) = unbounded();
    sender
        .send(CardEvent::Config(raw))
        .map_err(|_| Error::UnexpectedResponse)?;

    let _state_thread = thread::spawn({
        let sender = sender.clone();
        let client = rest_client_from_env()?;
        move || poll_states(client, sender)
    });

    let _ui_thread = thread::spawn({
        let sender = sender.clone();
        move || read_commands(sender)
    });
    drop(sender);

    let mut card = Card::new(CliHost {
        client,
        fullscreen: false,
    });
    runner::run(&mut card, &receiver, |plan| println!("{}", plan.summary()))?;

    Ok(())
}

fn rest_client_from_env() -> Result<Option<RestClient>, Error> {
    match (env::var("HASS_URL"), env::var("HASS_TOKEN")) {
        (Ok(url), Ok(token)) => {
            let proxy = env::var("HTTPS_PROXY").ok();
            Ok(Some(RestClient::new(&url, token, proxy.as_deref())?))
        }
        _ => Ok(None),
    }
}

fn poll_states(client: Option<RestClient>, sender: Sender<CardEvent>) {
    let Some(client) = client else {
        log::info!("HASS_URL or HASS_TOKEN not set, running without live state");
        let _ = sender.send(CardEvent::Hass(Arc::new(HassState::new())));
        return;
    };
    loop {
        match client.states() {
            Ok(states) => {
                if sender.send(CardEvent::Hass(Arc::new(states))).is_err() {
                    break;
                }
            }
            Err(err) => log::error!("failed to fetch states: {}", err),
        }
        thread::sleep(STATE_POLL_INTERVAL);
    }
}

fn read_commands(sender: Sender<CardEvent>) {
    for line in io::stdin().lock().lines() {
        let event = match line.as_ref().map(|s| s.trim()) {
            Ok("quit") | Ok("q") => CardEvent::Shutdown,
            Ok("back") => CardEvent::Back,
            Ok("play") => CardEvent::Play,
            Ok("pause") => CardEvent::Pause,
            Ok("") => continue,
            Ok(command) => match command.parse::<Interaction>() {
                Ok(interaction) => CardEvent::Interaction(interaction),
                Err(_) => CardEvent::CardAction(command.to_string()),
            },
            Err(err) => {
                log::error!("failed to read command: {}", err);
                break;
            }
        };
        let shutdown = matches!(event, CardEvent::Shutdown);
        if sender.send(event).is_err() || shutdown {
            break;
        }
    }
    let _ = sender.send(CardEvent::Shutdown);
}

/// Stands in for the dashboard, logging what it is asked to do.
struct CliHost {
    client: Option<RestClient>,
    fullscreen: bool,
}

impl HomeAssistant for CliHost {
    fn entity_registry_entry(&self, entity_id: &str) -> Result<EntityRegistryEntry, Error> {
        match &self.client {
            Some(client) => client.entity_registry_entry(entity_id),
            None => Err(Error::Unsupported("entity registry without Home Assistant")),
        }
    }

    fn sign_path(&self, path: &str) -> Result<String, Error> {
        match &self.client {
            Some(client) => client.sign_path(path),
            None => Err(Error::Unsupported("path signing without Home Assistant")),
        }
    }
}

impl Host for CliHost {
    fn open_url(&mut self, url: &str) {
        log::info!("open: {}", url);
    }

    fn download(&mut self, url: &str) {
        log::info!("download: {}", url);
    }

    fn fullscreen_enabled(&self) -> bool {
        true
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        log::info!("fullscreen: {}", self.fullscreen);
    }

    fn handle_action(&mut self, action: &ActionConfig) {
        log::info!("host action: {:?}", action);
    }

    fn set_edit_mode(&mut self, enabled: bool) {
        log::info!("edit mode: {}", enabled);
    }

    fn dashboard_mode(&self) -> DashboardMode {
        DashboardMode::Yaml
    }
}
