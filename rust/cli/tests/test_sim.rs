use liar_cli::run;

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let mut argv = vec!["liar"];
    argv.extend_from_slice(args);
    let code = run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

#[test]
fn sim_prints_summary() {
    let (code, out, err) = run_cli(&[
        "sim", "--players", "4", "--bots", "heuristic", "random", "--seed", "1", "--games", "3",
    ]);
    assert_eq!(code, 0, "stderr: {err}");
    assert!(out.contains("Simulated: 3 games (seed 1)"));
    assert!(out.contains("=== Summary ==="));
    assert!(out.contains("Wins (heuristic): "));
    assert!(out.contains("Wins (random): "));
    assert!(out.contains("Average game length (plays): "));
    assert!(out.contains("Average pile pickup size: "));
    assert!(out.contains("  Place 4: "));
    assert!(out.contains("Challenge rates:"));
}

#[test]
fn sim_is_deterministic_for_a_seed() {
    let args = ["sim", "--players", "3", "--seed", "99", "--games", "2", "--verbose"];
    let (code_a, out_a, _) = run_cli(&args);
    let (code_b, out_b, _) = run_cli(&args);
    assert_eq!(code_a, 0);
    assert_eq!(code_b, 0);
    assert_eq!(out_a, out_b);
    assert!(out_a.contains("=== Game 1 (seed "));
    assert!(out_a.contains("Game starts"));
    assert!(out_a.contains("Game over: "));
}

#[test]
fn sim_saves_verifiable_replays_per_game() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("replays/run.json");
    let base = base.to_string_lossy().into_owned();
    let (code, _, err) = run_cli(&[
        "sim",
        "--players",
        "3",
        "--bots",
        "heuristic",
        "--seed",
        "5",
        "--games",
        "2",
        "--save-replay",
        &base,
    ]);
    assert_eq!(code, 0, "stderr: {err}");

    for game in 1..=2 {
        let path = dir.path().join(format!("replays/run_game{game}.json"));
        assert!(path.exists(), "missing {}", path.display());
        let (code, out, err) = run_cli(&["verify", "--input", &path.to_string_lossy()]);
        assert_eq!(code, 0, "stderr: {err}");
        assert!(out.starts_with("Verify: OK (3 players, "));
    }
    assert!(!dir.path().join("replays/run.json").exists());
}

#[test]
fn single_game_replay_keeps_the_given_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("one.json");
    let (code, _, _) = run_cli(&[
        "sim",
        "--players",
        "2",
        "--seed",
        "8",
        "--save-replay",
        &path.to_string_lossy(),
    ]);
    assert_eq!(code, 0);
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["metadata"]["player_count"], 2);
    assert_eq!(json["metadata"]["bot_types"][0], "random");
    assert_eq!(json["events"][0]["type"], "GAME_START");
}

#[test]
fn sim_rejects_bad_tables() {
    let (code, _, err) = run_cli(&["sim", "--players", "7", "--seed", "1"]);
    assert_eq!(code, 2);
    assert!(err.contains("players must be between 2 and 6"));

    let (code, _, err) = run_cli(&["sim", "--bots", "oracle", "--seed", "1"]);
    assert_eq!(code, 2);
    assert!(err.contains("unknown bot type 'oracle'"));

    let (code, _, err) = run_cli(&[
        "sim", "--players", "2", "--bots", "random", "random", "random",
    ]);
    assert_eq!(code, 2);
    assert!(err.contains("3 bot types given for 2 players"));

    let (code, _, _) = run_cli(&["sim", "--games", "0"]);
    assert_eq!(code, 2);
}
