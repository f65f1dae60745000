use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use gigboard_core::{AuthAction, Effect, LoadedPage, Msg};
use gigboard_engine::{AuthOp, EngineEvent, EngineHandle, Page};
use gigboard_logging::{board_debug, board_info, board_warn};

use super::app::AppEvent;
use super::persistence;

const EVENT_POLL: Duration = Duration::from_millis(100);

/// Runs core effects on the engine and feeds engine events back as messages.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    /// `session_dir` is where the auth session is kept between runs, if at all.
    pub(crate) fn new(
        engine: EngineHandle,
        event_tx: mpsc::Sender<AppEvent>,
        session_dir: Option<PathBuf>,
    ) -> Self {
        let runner = Self { engine };
        runner.spawn_event_loop(event_tx, session_dir);
        runner
    }

    pub(crate) fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadCurrentUser => self.engine.load_current_user(),
                Effect::SignIn { email, password } => {
                    board_info!("SignIn email={}", email);
                    self.engine.sign_in(email, password);
                }
                Effect::SignUp { email, password } => {
                    board_info!("SignUp email={}", email);
                    self.engine.sign_up(email, password);
                }
                Effect::RequestPasswordReset { email } => {
                    board_info!("RequestPasswordReset email={}", email);
                    self.engine.request_password_reset(email);
                }
                Effect::UpdatePassword { password } => self.engine.update_password(password),
                Effect::RestoreSession { access_token } => {
                    self.engine.restore_session(access_token)
                }
                Effect::SignOut => self.engine.sign_out(),
                Effect::FetchPage(request) => {
                    board_debug!(
                        "FetchPage page={} offset={} limit={}",
                        request.page_index,
                        request.offset,
                        request.limit
                    );
                    self.engine.fetch_page(
                        request.epoch,
                        request.page_index,
                        request.offset,
                        request.limit,
                    );
                }
            }
        }
    }

    fn spawn_event_loop(&self, event_tx: mpsc::Sender<AppEvent>, session_dir: Option<PathBuf>) {
        let engine = self.engine.clone();
        thread::spawn(move || {
            forward_events(
                || engine.recv_timeout(EVENT_POLL),
                || {
                    if let Some(dir) = session_dir.as_deref() {
                        persistence::save_session(dir, engine.session().as_ref());
                    }
                },
                &event_tx,
            );
            board_info!("Engine event loop stopped");
        });
    }
}

/// Pumps engine events into the app channel until either side goes away.
///
/// `on_identity` runs before an identity change is forwarded.
fn forward_events(
    mut next_event: impl FnMut() -> Result<EngineEvent, RecvTimeoutError>,
    mut on_identity: impl FnMut(),
    event_tx: &mpsc::Sender<AppEvent>,
) {
    loop {
        let event = match next_event() {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                board_warn!("Engine stopped sending events");
                return;
            }
        };
        if matches!(event, EngineEvent::IdentityChanged(_)) {
            on_identity();
        }
        if event_tx.send(AppEvent::Msg(map_event(event))).is_err() {
            return;
        }
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::IdentityChanged(user) => Msg::IdentityChanged(user),
        EngineEvent::AuthCompleted { op, result } => Msg::AuthCompleted {
            action: map_op(op),
            result: result.map_err(|err| {
                board_warn!("{:?} failed: {}", op, err);
                err.message
            }),
        },
        EngineEvent::PageFetched {
            epoch,
            page_index,
            result,
        } => Msg::PageLoaded {
            epoch,
            page_index,
            result: match result {
                Ok(page) => Ok(loaded_page(page)),
                Err(err) => {
                    board_warn!("Page {} failed: {}", page_index, err);
                    Err(err.message)
                }
            },
        },
    }
}

fn map_op(op: AuthOp) -> AuthAction {
    match op {
        AuthOp::SignIn => AuthAction::SignIn,
        AuthOp::SignUp => AuthAction::SignUp,
        AuthOp::PasswordReset => AuthAction::PasswordReset,
        AuthOp::PasswordUpdate => AuthAction::PasswordUpdate,
        AuthOp::SignOut => AuthAction::SignOut,
    }
}

/// Rejected rows still count towards the page size when deciding whether
/// more pages exist.
fn loaded_page(page: Page) -> LoadedPage {
    let rows_received = page.records.len() + page.rejected;
    LoadedPage {
        records: page.records,
        rows_received,
    }
}
