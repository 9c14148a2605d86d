//! Naming and classification of device commands for the audit trail.

const DEVICE_PREFIX: &str = "/api/device/";

/// Fixed device routes and the command type recorded for them
const COMMAND_ROUTES: &[(&str, &str)] = &[
    ("presets/load", "presets.load"),
    ("player/source", "player.source.select"),
    ("player/song", "player.song.select"),
    ("player/play", "player.play"),
    ("player/pause", "player.pause"),
    ("player/stop", "player.stop"),
    ("player/next", "player.next"),
    ("player/previous", "player.previous"),
    ("player/repeat", "player.repeat"),
    ("recorder/start", "recorder.start"),
    ("recorder/stop", "recorder.stop"),
];

const LOCAL_ADDRESSES: &[&str] = &["127.0.0.1", "::1", "localhost"];

/// Map a request method and path to its audit command type.
///
/// `POST /api/device/player/play` -> `player.play`,
/// `POST /api/device/controls/volume` -> `controls.volume.set`,
/// anything unrecognised -> `unknown`.
pub fn command_type(method: &str, path: &str) -> String {
    let Some(route) = path.strip_prefix(DEVICE_PREFIX) else {
        return String::from("unknown");
    };
    let route = route.trim_end_matches('/');

    if let Some((_, name)) = COMMAND_ROUTES.iter().find(|(r, _)| *r == route) {
        return (*name).to_string();
    }

    match route.split_once('/') {
        Some(("controls", control_id)) if !control_id.is_empty() && !control_id.contains('/') => {
            if method.eq_ignore_ascii_case("POST") {
                format!("controls.{control_id}.set")
            } else {
                format!("controls.{control_id}.get")
            }
        }
        _ => String::from("unknown"),
    }
}

/// Only device command endpoints (and the status query) are audited
pub fn should_audit(path: &str) -> bool {
    let Some(route) = path.strip_prefix(DEVICE_PREFIX) else {
        return false;
    };
    let route = route.trim_end_matches('/');

    route == "status"
        || COMMAND_ROUTES.iter().any(|(r, _)| *r == route)
        || matches!(
            route.split_once('/'),
            Some(("controls", id)) if !id.is_empty() && !id.contains('/')
        )
}

/// Anything that is not loopback counts as remote access.
// TODO: treat the configured LAN ranges as local once they are part of the server config
pub fn is_remote_access(client_ip: &str) -> bool {
    !LOCAL_ADDRESSES.contains(&client_ip)
}
