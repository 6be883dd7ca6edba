use liar_cli::run;
use serde_json::Value;
use serial_test::serial;

const VARS: &[&str] = &[
    "LIAR_CONFIG",
    "LIAR_SEED",
    "LIAR_PLAYERS",
    "LIAR_BOTS",
    "LIAR_GAMES",
];

fn clear_env() {
    for var in VARS {
        unsafe {
            std::env::remove_var(var);
        }
    }
}

fn cfg_json() -> (i32, Value) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["liar", "cfg"], &mut out, &mut err);
    let json = serde_json::from_slice(&out).unwrap_or(Value::Null);
    (code, json)
}

#[test]
#[serial]
fn cfg_shows_defaults() {
    clear_env();
    let (code, json) = cfg_json();
    assert_eq!(code, 0);
    assert_eq!(json["players"]["value"], 4);
    assert_eq!(json["players"]["source"], "default");
    assert_eq!(json["games"]["value"], 1);
    assert_eq!(json["seed"]["value"], Value::Null);
    assert_eq!(json["bots"]["value"], serde_json::json!([]));
}

#[test]
#[serial]
fn env_overrides_file() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("liar.toml");
    std::fs::write(&path, "players = 3\nseed = 456\nbots = [\"heuristic\"]\n").unwrap();
    unsafe {
        std::env::set_var("LIAR_CONFIG", &path);
        std::env::set_var("LIAR_SEED", "789");
    }

    let (code, json) = cfg_json();
    clear_env();
    assert_eq!(code, 0);
    assert_eq!(json["players"]["value"], 3);
    assert_eq!(json["players"]["source"], "file");
    assert_eq!(json["bots"]["value"][0], "heuristic");
    assert_eq!(json["seed"]["value"], 789);
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["games"]["source"], "default");
}

#[test]
#[serial]
fn command_line_overrides_env() {
    clear_env();
    unsafe {
        std::env::set_var("LIAR_PLAYERS", "6");
        std::env::set_var("LIAR_BOTS", "heuristic,random");
    }
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(
        ["liar", "sim", "--players", "2", "--seed", "3"],
        &mut out,
        &mut err,
    );
    clear_env();
    assert_eq!(code, 0, "{}", String::from_utf8_lossy(&err));
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Wins (heuristic): "));
    assert!(text.contains("Wins (random): "));
    assert!(!text.contains("  Place 3: "));
}

#[test]
#[serial]
fn invalid_env_value_fails() {
    clear_env();
    unsafe {
        std::env::set_var("LIAR_GAMES", "many");
    }
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(["liar", "cfg"], &mut out, &mut err);
    clear_env();
    assert_eq!(code, 2);
    assert!(String::from_utf8(err).unwrap().contains("Invalid games"));
}

#[test]
#[serial]
fn env_bot_names_are_validated() {
    clear_env();
    unsafe {
        std::env::set_var("LIAR_BOTS", "random oracle");
    }
    let (code, _) = cfg_json();
    clear_env();
    assert_eq!(code, 2);
}
