mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
    ExecutableCommand,
};
use rand::thread_rng;

use sky_raid::abilities::{activate, Ability};
use sky_raid::compute::{fire_beam, fire_fan, init_state, tick};
use sky_raid::entities::{GameState, GameStatus, MoveKeys};

use display::Viewport;

const FRAME: Duration = Duration::from_millis(20); // 50 FPS

// ── Feedback beats ────────────────────────────────────────────────────────────
// The only two places the loop deliberately blocks: a short flash when the
// EMP fires and a pause on defeat.  Both run between frames, never inside
// the simulation tick.

const EMP_FLASH_PAUSE: Duration = Duration::from_millis(50);
const DEFEAT_PAUSE: Duration = Duration::from_secs(2);

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 5 frames (100 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 5;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn is_move_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right
    )
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs one session to completion (defeat or quit).
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which keys are still "fresh"
/// (within `HOLD_WINDOW` frames) and feed the result to the simulation as a
/// held-key snapshot, so arrows, boost and Z can all be held at once.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after `HOLD_WINDOW` frames of
///   silence, which is shorter than the OS repeat interval, so the key stays
///   live while it is actively generating repeats.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    // Last frame a movement event arrived with Shift down.
    let mut boost_seen: Option<u64> = None;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                // Press: record key + handle one-shot actions
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    if is_move_key(code) && modifiers.contains(KeyModifiers::SHIFT) {
                        boost_seen = Some(frame);
                    }
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c')
                            if modifiers.contains(KeyModifiers::CONTROL) =>
                        {
                            return Ok(());
                        }
                        KeyCode::Char(' ') => {
                            // Z held turns the shot into the fan
                            *state = if is_held(&key_frame, &KeyCode::Char('z'), frame) {
                                fire_fan(state)
                            } else {
                                fire_beam(state)
                            };
                        }
                        KeyCode::Char('e') | KeyCode::Char('E') => {
                            if let Some(next) = activate(state, Ability::Emp) {
                                *state = next;
                                // Blocking feedback beat: flash, hold, resume
                                display::emp_flash(out, Viewport::current()?)?;
                                thread::sleep(EMP_FLASH_PAUSE);
                            }
                        }
                        KeyCode::Char('s') | KeyCode::Char('S') => {
                            if let Some(next) = activate(state, Ability::Shield) {
                                *state = next;
                            }
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') => {
                            if let Some(next) = activate(state, Ability::Hyper) {
                                *state = next;
                            }
                        }
                        KeyCode::Char('g') | KeyCode::Char('G') => {
                            if let Some(next) = activate(state, Ability::GravityWell) {
                                *state = next;
                            }
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                    if is_move_key(code) && modifiers.contains(KeyModifiers::SHIFT) {
                        boost_seen = Some(frame);
                    }
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Held-key snapshot → simulation tick ───────────────────────────────
        let keys = MoveKeys {
            up: is_held(&key_frame, &KeyCode::Up, frame),
            down: is_held(&key_frame, &KeyCode::Down, frame),
            left: is_held(&key_frame, &KeyCode::Left, frame),
            right: is_held(&key_frame, &KeyCode::Right, frame),
            boost: boost_seen
                .map_or(false, |last| frame.saturating_sub(last) <= HOLD_WINDOW),
        };

        *state = tick(state, &keys, &mut rng);

        display::render(out, state, Viewport::current()?)?;

        if state.status == GameStatus::GameOver {
            // Blocking feedback beat: leave the defeat frame on screen
            thread::sleep(DEFEAT_PAUSE);
            return Ok(());
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::init();
    log::info!("sky_raid starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let mut state = init_state();
    let result = game_loop(&mut out, &mut state, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    log::info!("session over, final score {}", state.score.value);
    println!("Final score: {}", state.score.value);
    result
}
