use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use gigboard_core::{update, AppState, Msg};
use gigboard_engine::EngineHandle;
use gigboard_logging::{board_info, set_session_epoch};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::commands::{self, Command, HELP_TEXT};
use super::ui::render;
use super::{logging, persistence};

/// Everything the main loop reacts to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AppEvent {
    Msg(Msg),
    Notice(String),
    Help,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let work_dir = std::env::current_dir().context("cannot determine working directory")?;
    let config = AppConfig::load(&work_dir)?;
    logging::initialize(config.log_destination);
    board_info!(
        "Starting board: table={} page_size={}",
        config.table,
        config.page_size
    );

    let session_dir = config.remember_session.then(|| work_dir.clone());
    let mut engine_config = config.engine_config();
    engine_config.initial_session = session_dir
        .as_deref()
        .and_then(persistence::load_session);
    let engine = EngineHandle::new(engine_config).context("failed to build backend client")?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(engine, event_tx.clone(), session_dir);

    let _ = event_tx.send(AppEvent::Msg(Msg::Started));
    // A redirect fragment may be handed over on the command line.
    if let Some(fragment) = std::env::args().nth(1) {
        let _ = event_tx.send(AppEvent::Msg(Msg::AuthCallbackReceived(fragment)));
    }
    spawn_input_thread(event_tx);

    let mut state = AppState::with_settings(config.board_settings());
    print_lines(&render::render(&state.view()));

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Msg(msg) => {
                let (next, effects) = update(state, msg);
                state = next;
                set_session_epoch(state.session().epoch());
                runner.enqueue(effects);
            }
            AppEvent::Notice(text) => println!("{text}"),
            AppEvent::Help => println!("{HELP_TEXT}"),
            AppEvent::Quit => break,
        }
        if state.consume_dirty() {
            print_lines(&render::render(&state.view()));
        }
    }

    board_info!("Board closed");
    Ok(())
}

fn spawn_input_thread(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let events = match commands::parse(&line) {
                Command::Msgs(msgs) => msgs.into_iter().map(AppEvent::Msg).collect(),
                Command::Help => vec![AppEvent::Help],
                Command::Quit => vec![AppEvent::Quit],
                Command::Invalid(text) => vec![AppEvent::Notice(text)],
            };
            for event in events {
                if event_tx.send(event).is_err() {
                    return;
                }
            }
        }
        let _ = event_tx.send(AppEvent::Quit);
    });
}

fn print_lines(lines: &[String]) {
    let mut out = io::stdout().lock();
    for line in lines {
        let _ = writeln!(out, "{line}");
    }
    let _ = out.flush();
}
