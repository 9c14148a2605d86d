//! Device command surface and the in-memory stand-in used when no hardware
//! driver is attached.

use av_core::{CoreError, Result as CoreErrorResult, StatusProvider, StatusSnapshot};

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

/// Executes audited device commands.
///
/// `command` is the audit command type (`player.play`,
/// `controls.volume.set`, ...); `payload` is the request body, if any.
#[async_trait]
pub trait DeviceCommands: Send + Sync {
    async fn execute(&self, command: &str, payload: Option<&Value>) -> CoreErrorResult<Value>;
}

const PRESETS: &[(u64, &str)] = &[(1, "Sunday Mass"), (2, "Wedding"), (3, "Funeral")];
const SOURCES: &[&str] = &["USB", "CD", "AUX"];
const SONG_COUNT: u64 = 3;
const REPEAT_MODES: &[&str] = &["none", "song", "group"];

#[derive(Debug, Clone, Serialize)]
struct PlayerState {
    state: &'static str,
    source: String,
    song_id: u64,
    repeat: String,
}

#[derive(Debug, Clone, Serialize)]
struct RecorderState {
    state: &'static str,
    started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
struct LastCommand {
    command: String,
    at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
struct MockState {
    preset_id: u64,
    player: PlayerState,
    recorder: RecorderState,
    controls: BTreeMap<String, Value>,
    last_command: Option<LastCommand>,
}

/// In-memory device. Commands mutate its state and every snapshot reflects
/// the latest command.
pub struct MockDevice {
    state: Mutex<MockState>,
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDevice {
    pub fn new() -> Self {
        let controls = BTreeMap::from([
            (String::from("volume"), json!(50)),
            (String::from("mute"), json!(false)),
        ]);

        Self {
            state: Mutex::new(MockState {
                preset_id: 1,
                player: PlayerState {
                    state: "stopped",
                    source: String::from("USB"),
                    song_id: 1,
                    repeat: String::from("none"),
                },
                recorder: RecorderState {
                    state: "stopped",
                    started_at: None,
                },
                controls,
                last_command: None,
            }),
        }
    }

    fn lock(&self) -> CoreErrorResult<MutexGuard<'_, MockState>> {
        self.state
            .lock()
            .map_err(|_| CoreError::device("mock device state poisoned"))
    }
}

#[async_trait]
impl StatusProvider for MockDevice {
    async fn snapshot(&self) -> CoreErrorResult<StatusSnapshot> {
        let state = self.lock()?;
        serde_json::to_value(&*state).map_err(|e| CoreError::device(e.to_string()))
    }
}

#[async_trait]
impl DeviceCommands for MockDevice {
    async fn execute(&self, command: &str, payload: Option<&Value>) -> CoreErrorResult<Value> {
        let mut state = self.lock()?;

        let result = match command {
            "presets.load" => {
                let id = required_u64(payload, "id")?;
                let (_, name) = PRESETS
                    .iter()
                    .find(|(preset, _)| *preset == id)
                    .ok_or_else(|| CoreError::validation(format!("unknown preset {id}")))?;
                state.preset_id = id;
                json!({ "preset_id": id, "name": name })
            }
            "player.source.select" => {
                let source = required_str(payload, "source")?;
                if !SOURCES.contains(&source) {
                    return Err(CoreError::validation(format!("unknown source {source}")));
                }
                state.player.source = source.to_string();
                json!({ "source": source })
            }
            "player.song.select" => {
                let id = required_u64(payload, "song_id")?;
                if id == 0 || id > SONG_COUNT {
                    return Err(CoreError::validation(format!("unknown song {id}")));
                }
                state.player.song_id = id;
                json!({ "song_id": id })
            }
            "player.play" => set_player(&mut state, "playing"),
            "player.pause" => set_player(&mut state, "paused"),
            "player.stop" => set_player(&mut state, "stopped"),
            "player.next" => {
                state.player.song_id = state.player.song_id % SONG_COUNT + 1;
                json!({ "song_id": state.player.song_id })
            }
            "player.previous" => {
                state.player.song_id = (state.player.song_id + SONG_COUNT - 2) % SONG_COUNT + 1;
                json!({ "song_id": state.player.song_id })
            }
            "player.repeat" => {
                let mode = required_str(payload, "mode")?;
                if !REPEAT_MODES.contains(&mode) {
                    return Err(CoreError::validation(format!("unknown repeat mode {mode}")));
                }
                state.player.repeat = mode.to_string();
                json!({ "repeat": mode })
            }
            "recorder.start" => {
                if state.recorder.state == "recording" {
                    return Err(CoreError::device("recorder already running"));
                }
                state.recorder = RecorderState {
                    state: "recording",
                    started_at: Some(Utc::now()),
                };
                json!({ "state": "recording" })
            }
            "recorder.stop" => {
                state.recorder = RecorderState {
                    state: "stopped",
                    started_at: None,
                };
                json!({ "state": "stopped" })
            }
            other => control_command(&mut state, other, payload)?,
        };

        state.last_command = Some(LastCommand {
            command: command.to_string(),
            at: Utc::now(),
        });

        Ok(result)
    }
}

fn set_player(state: &mut MockState, player_state: &'static str) -> Value {
    state.player.state = player_state;
    json!({ "state": player_state })
}

/// `controls.<id>.set` stores `payload.value`; `controls.<id>.get` reads it back
fn control_command(
    state: &mut MockState,
    command: &str,
    payload: Option<&Value>,
) -> CoreErrorResult<Value> {
    let unknown = || CoreError::validation(format!("unknown command {command}"));

    let rest = command.strip_prefix("controls.").ok_or_else(unknown)?;
    let (id, action) = rest.rsplit_once('.').ok_or_else(unknown)?;

    match action {
        "set" => {
            let value = payload
                .and_then(|p| p.get("value"))
                .cloned()
                .ok_or_else(|| CoreError::validation("missing field value"))?;
            state.controls.insert(id.to_string(), value.clone());
            Ok(json!({ "id": id, "value": value }))
        }
        "get" => state
            .controls
            .get(id)
            .map(|value| json!({ "id": id, "value": value }))
            .ok_or_else(|| CoreError::validation(format!("unknown control {id}"))),
        _ => Err(unknown()),
    }
}

fn required_u64(payload: Option<&Value>, field: &str) -> CoreErrorResult<u64> {
    payload
        .and_then(|p| p.get(field))
        .and_then(Value::as_u64)
        .ok_or_else(|| CoreError::validation(format!("missing or invalid field {field}")))
}

fn required_str<'a>(payload: Option<&'a Value>, field: &str) -> CoreErrorResult<&'a str> {
    payload
        .and_then(|p| p.get(field))
        .and_then(Value::as_str)
        .ok_or_else(|| CoreError::validation(format!("missing or invalid field {field}")))
}
