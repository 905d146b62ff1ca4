//! Integration tests for the UCI front-end

use eightpiece::config::EngineConfig;
use eightpiece::piece::Variant;
use eightpiece::uci::{process_uci_line, run_uci_session, UciEngine, UciOptions, UciState};
use std::io::Cursor;
use std::time::{Duration, Instant};

fn engine() -> UciEngine {
    eightpiece::init();
    UciEngine::new()
}

#[test]
fn test_uci_engine_lifecycle() {
    let mut engine = engine();
    assert_eq!(engine.state(), UciState::Init);

    let responses = process_uci_line("uci", &mut engine);
    assert!(responses[0].contains("id name"));
    assert!(responses[1].contains("id author"));
    assert_eq!(responses.last().unwrap(), "uciok");
    assert_eq!(engine.state(), UciState::Ready);

    assert_eq!(process_uci_line("isready", &mut engine), vec!["readyok"]);
    process_uci_line("quit", &mut engine);
    assert!(!engine.is_running());
}

#[test]
fn test_variant_switch_resets_position() {
    let mut engine = engine();
    assert_eq!(engine.position().variant(), Variant::EightPiece);
    process_uci_line("setoption name UCI_Variant value Standard", &mut engine);
    assert_eq!(engine.position().variant(), Variant::Standard);
    process_uci_line("position startpos moves e2e4 e7e5 g1f3", &mut engine);
    assert_eq!(engine.position().ply(), 3);
    process_uci_line("ucinewgame", &mut engine);
    assert_eq!(engine.position().ply(), 0);
    assert_eq!(engine.position().current().to_fen(), Variant::Standard.start_fen());
}

#[test]
fn test_go_depth_in_eightpiece() {
    let mut engine = engine();
    process_uci_line("position startpos moves e2e4", &mut engine);
    assert!(process_uci_line("go depth 2", &mut engine).is_empty());
    let out = engine.wait_for_bestmove();
    let infos: Vec<&String> = out.iter().filter(|l| l.starts_with("info depth")).collect();
    assert_eq!(infos.len(), 2);
    assert!(infos[1].contains(" score cp "));
    let best = out.last().unwrap();
    assert!(best.starts_with("bestmove "));
    let mv = best.split_whitespace().nth(1).unwrap();
    assert!(engine.position().legal_moves().iter().any(|m| m.to_uci() == mv));
}

#[test]
fn test_multipv_lines() {
    let mut engine = engine();
    process_uci_line("setoption name UCI_Variant value Standard", &mut engine);
    process_uci_line("setoption name MultiPV value 2", &mut engine);
    process_uci_line("go depth 1", &mut engine);
    let out = engine.wait_for_bestmove();
    assert!(out[0].starts_with("info multipv 1 depth 1 "));
    assert!(out[1].starts_with("info multipv 2 depth 1 "));
}

#[test]
fn test_config_feeds_engine() {
    eightpiece::init();
    let cfg = EngineConfig::from_toml_str("variant = \"standard\"\nmax_depth = 2\n").unwrap();
    let mut options = UciOptions::default();
    cfg.apply(&mut options).unwrap();
    let mut engine = UciEngine::with_options(options);
    assert_eq!(engine.position().variant(), Variant::Standard);
    process_uci_line("go", &mut engine);
    let out = engine.wait_for_bestmove();
    assert_eq!(out.iter().filter(|l| l.starts_with("info depth")).count(), 2);
}

#[test]
fn test_stop_during_deep_search() {
    let mut engine = engine();
    process_uci_line("setoption name UCI_Variant value Standard", &mut engine);
    process_uci_line("go depth 30", &mut engine);
    std::thread::sleep(Duration::from_millis(200));
    let asked = Instant::now();
    let out = process_uci_line("stop", &mut engine);
    assert!(asked.elapsed() < Duration::from_secs(2));
    assert!(out.last().unwrap().starts_with("bestmove "));
    assert_eq!(engine.state(), UciState::Ready);
}

#[test]
fn test_session_streams_search_output() {
    eightpiece::init();
    let input = "setoption name UCI_Variant value Standard\nposition fen k7/8/1K6/8/8/8/8/7R w - - 0 1\ngo depth 3\nisready\n";
    let mut output = Vec::new();
    run_uci_session(UciOptions::default(), Cursor::new(input), &mut output).unwrap();
    let text = String::from_utf8(output).unwrap();
    assert!(text.lines().any(|l| l == "readyok"));
    assert!(text.lines().any(|l| l.starts_with("info depth 1 ")));
    let best: Vec<&str> = text.lines().filter(|l| l.starts_with("bestmove")).collect();
    assert_eq!(best, vec!["bestmove h1h8"]);
}

#[test]
fn test_unknown_command_is_reported() {
    let mut engine = engine();
    let out = process_uci_line("flip", &mut engine);
    assert_eq!(out, vec!["info string unknown command: flip"]);
    assert!(engine.is_running());
}
