// Keyboard teleop: W/S drive, A/D turn, M precision mode, ]/[ speed coefficient, Q quit
// Publishes gamepad-shaped controller state so the runtime can't tell it from a real pad.
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::{Duration, Instant};
use tracing::info;

use magnus_drive_runtime::config::TOPIC_INPUT_CONTROLLER;
use magnus_drive_runtime::messages::ControllerState;
use magnus_drive_runtime::profile::{Button, DEFAULT_BINDINGS};

const STICK: f64 = 0.6; // stick deflection per key
// Center sticks and release buttons after this much time with no input
const INPUT_TIMEOUT_MS: u64 = 100;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_INPUT_CONTROLLER).await?;

    info!("Controls: W/S=drive, A/D=turn, M=precision mode, ]/[=coefficient, Q=quit");

    enable_raw_mode()?;
    let result = run_teleop(&publisher).await;
    disable_raw_mode()?;

    result
}

async fn run_teleop(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut state = ControllerState::default();
    let mut last_input = Instant::now();

    loop {
        // Poll for key with 20ms timeout (50Hz effective rate)
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;

                match code {
                    // Forward is a negative stick value
                    KeyCode::Char('w') if pressed => state.left_y = -STICK,
                    KeyCode::Char('s') if pressed => state.left_y = STICK,
                    KeyCode::Char('a') if pressed => state.right_x = -STICK,
                    KeyCode::Char('d') if pressed => state.right_x = STICK,

                    KeyCode::Char('m') if pressed => hold(&mut state, DEFAULT_BINDINGS.mode_switch),
                    KeyCode::Char(']') if pressed => hold(&mut state, DEFAULT_BINDINGS.increment),
                    KeyCode::Char('[') if pressed => hold(&mut state, DEFAULT_BINDINGS.decrement),

                    // Quit
                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
                if pressed {
                    last_input = Instant::now();
                }
            }
        }

        if last_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS) {
            state = ControllerState::default();
        }

        // Always publish at ~50Hz
        publisher.put(serde_json::to_string(&state)?).await?;
    }

    Ok(())
}

fn hold(state: &mut ControllerState, button: Button) {
    if !state.is_pressed(button) {
        state.pressed.push(button);
    }
}
