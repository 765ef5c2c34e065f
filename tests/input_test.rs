//! Gesture keymap and handler tests

use resreport::input::{
    create_default_keymap, create_keymap, GestureHandler, HandlerAction, KeyAction,
};
use resreport::resources::report::MSG_NO_PROCESS;
use resreport::speech::Synth;
use resreport::state::config::Config;
use resreport::state::State;
use resreport::Result;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Synth that records what it was asked to say
#[derive(Clone, Default)]
struct RecordingSynth {
    spoken: Arc<Mutex<Vec<String>>>,
    cancels: Arc<Mutex<usize>>,
}

impl Synth for RecordingSynth {
    fn set_rate(&mut self, _rate: u8) -> Result<()> {
        Ok(())
    }

    fn set_volume(&mut self, _volume: u8) -> Result<()> {
        Ok(())
    }

    fn set_voice_idx(&mut self, _idx: usize) -> Result<()> {
        Ok(())
    }

    fn speak(&mut self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        *self.cancels.lock().unwrap() += 1;
        Ok(())
    }
}

fn config_with(contents: Option<&str>) -> (TempDir, Config) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("resreport.cfg");
    if let Some(text) = contents {
        fs::write(&path, text).expect("write config");
    }
    let config = Config::load_from(&path).expect("load config");
    (dir, config)
}

#[test]
fn test_default_keymap() {
    let keymap = create_default_keymap();

    assert_eq!(keymap.get(&b"\x1b(".to_vec()), Some(&KeyAction::ReportCpuCores));
    assert_eq!(keymap.get(&b"\x1b)".to_vec()), Some(&KeyAction::ReportMemory));
    assert_eq!(keymap.get(&b"\x1bx".to_vec()), Some(&KeyAction::Silence));

    // Average CPU has no default gesture
    assert!(!keymap.values().any(|a| *a == KeyAction::ReportAverageCpu));
    assert_eq!(keymap.len(), 3);
}

#[test]
fn test_keymap_from_default_config_matches_builtin() {
    let (_dir, config) = config_with(None);
    assert_eq!(create_keymap(&config), create_default_keymap());
}

#[test]
fn test_keymap_overrides() {
    let (_dir, config) = config_with(Some(
        "[keys]\ncpu_cores = alt+c\nmemory =\naverage_cpu = alt+a\n",
    ));
    let keymap = create_keymap(&config);

    assert_eq!(keymap.get(&b"\x1bc".to_vec()), Some(&KeyAction::ReportCpuCores));
    assert_eq!(keymap.get(&b"\x1ba".to_vec()), Some(&KeyAction::ReportAverageCpu));
    // Explicitly emptied
    assert!(!keymap.values().any(|a| *a == KeyAction::ReportMemory));
    // Not mentioned, keeps its default
    assert_eq!(keymap.get(&b"\x1bx".to_vec()), Some(&KeyAction::Silence));
    // Old default for cpu_cores is gone
    assert_eq!(keymap.get(&b"\x1b(".to_vec()), None);
}

#[test]
fn test_invalid_gesture_leaves_action_unbound() {
    let (_dir, config) = config_with(Some("[keys]\nmemory = alt+nope\n"));
    let keymap = create_keymap(&config);

    assert!(!keymap.values().any(|a| *a == KeyAction::ReportMemory));
}

fn state_with_recorder() -> (TempDir, State, RecordingSynth) {
    let (dir, config) = config_with(None);
    let synth = RecordingSynth::default();
    let state = State::with_parts(config, Box::new(synth.clone())).expect("state");
    (dir, state, synth)
}

#[test]
fn test_unbound_key_passes_through() {
    let (_dir, mut state, synth) = state_with_recorder();
    let mut handler = GestureHandler::new(create_default_keymap());

    let action = handler
        .process_key(b"ls\r", &mut state, || panic!("focus must not be resolved"))
        .unwrap();

    assert_eq!(action, HandlerAction::Passthrough);
    assert!(synth.spoken.lock().unwrap().is_empty());
}

#[test]
fn test_memory_gesture_speaks_report() {
    let (_dir, mut state, synth) = state_with_recorder();
    let mut handler = GestureHandler::new(create_default_keymap());
    let me = std::process::id();

    let action = handler
        .process_key(b"\x1b)", &mut state, || Ok(Some(me)))
        .unwrap();

    assert_eq!(action, HandlerAction::Handled);
    let spoken = synth.spoken.lock().unwrap();
    assert_eq!(spoken.len(), 1);
    assert!(spoken[0].ends_with("of physical ram"), "got: {}", spoken[0]);
}

#[test]
fn test_gesture_without_focus_speaks_unavailable() {
    let (_dir, mut state, synth) = state_with_recorder();
    let mut handler = GestureHandler::new(create_default_keymap());

    let action = handler
        .process_key(b"\x1b(", &mut state, || Ok(None))
        .unwrap();

    assert_eq!(action, HandlerAction::Handled);
    assert_eq!(*synth.spoken.lock().unwrap(), vec![MSG_NO_PROCESS.to_string()]);
}

#[test]
fn test_silence_gesture_cancels() {
    let (_dir, mut state, synth) = state_with_recorder();
    let mut handler = GestureHandler::new(create_default_keymap());

    let action = handler
        .process_key(b"\x1bx", &mut state, || panic!("focus must not be resolved"))
        .unwrap();

    assert_eq!(action, HandlerAction::Handled);
    assert_eq!(*synth.cancels.lock().unwrap(), 1);
    assert!(synth.spoken.lock().unwrap().is_empty());
}
