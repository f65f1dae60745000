use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use gigboard_logging::{board_error, board_info, board_warn};

use crate::coerce::ColumnMap;
use crate::identity::{GoTrueIdentityProvider, IdentityProvider, SessionStore};
use crate::table::{PageFetcher, RestTableReader};
use crate::{AuthOp, AuthSession, BackendSettings, EngineEvent, FetchError};

/// Default table holding the job rows.
pub const DEFAULT_TABLE: &str = "Allgigs_All_vacancies_NEW";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub backend: BackendSettings,
    pub table: String,
    pub columns: ColumnMap,
    /// Session persisted by a previous run, if any.
    pub initial_session: Option<AuthSession>,
}

impl EngineConfig {
    pub fn new(backend: BackendSettings) -> Self {
        Self {
            backend,
            table: DEFAULT_TABLE.to_string(),
            columns: ColumnMap::default(),
            initial_session: None,
        }
    }
}

enum EngineCommand {
    LoadCurrentUser,
    SignIn { email: String, password: String },
    SignUp { email: String, password: String },
    RequestPasswordReset { email: String },
    UpdatePassword { password: String },
    RestoreSession { access_token: String },
    SignOut,
    FetchPage {
        epoch: u64,
        page_index: u32,
        offset: usize,
        limit: usize,
    },
}

/// Handle to the background thread that talks to the hosted backend.
///
/// Commands are fire-and-forget; outcomes come back as [`EngineEvent`]s.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
    session: SessionStore,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, FetchError> {
        let session = SessionStore::new(config.initial_session);
        let identity = GoTrueIdentityProvider::new(&config.backend, session.clone())?;
        let reader = RestTableReader::new(&config.backend, session.clone())?;
        let pages = PageFetcher::new(Arc::new(reader), config.table, config.columns);
        Ok(Self::with_services(Arc::new(identity), pages, session))
    }

    /// Builds a handle over caller-supplied collaborators.
    pub fn with_services(
        identity: Arc<dyn IdentityProvider>,
        pages: PageFetcher,
        session: SessionStore,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    board_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let identity = identity.clone();
                let pages = pages.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(identity.as_ref(), &pages, command, event_tx).await;
                });
            }
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
            session,
        }
    }

    pub fn load_current_user(&self) {
        self.send(EngineCommand::LoadCurrentUser);
    }

    pub fn sign_in(&self, email: impl Into<String>, password: impl Into<String>) {
        self.send(EngineCommand::SignIn {
            email: email.into(),
            password: password.into(),
        });
    }

    pub fn sign_up(&self, email: impl Into<String>, password: impl Into<String>) {
        self.send(EngineCommand::SignUp {
            email: email.into(),
            password: password.into(),
        });
    }

    pub fn request_password_reset(&self, email: impl Into<String>) {
        self.send(EngineCommand::RequestPasswordReset {
            email: email.into(),
        });
    }

    pub fn update_password(&self, password: impl Into<String>) {
        self.send(EngineCommand::UpdatePassword {
            password: password.into(),
        });
    }

    pub fn restore_session(&self, access_token: impl Into<String>) {
        self.send(EngineCommand::RestoreSession {
            access_token: access_token.into(),
        });
    }

    pub fn sign_out(&self) {
        self.send(EngineCommand::SignOut);
    }

    pub fn fetch_page(&self, epoch: u64, page_index: u32, offset: usize, limit: usize) {
        self.send(EngineCommand::FetchPage {
            epoch,
            page_index,
            offset,
            limit,
        });
    }

    /// The session currently held by the engine, for persistence.
    pub fn session(&self) -> Option<AuthSession> {
        self.session.get()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .try_recv()
            .ok()
    }

    /// Waits up to `timeout` for the next event.
    ///
    /// `Disconnected` means the engine thread has stopped and no further
    /// events will arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        self.event_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv_timeout(timeout)
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            board_warn!("Engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    identity: &dyn IdentityProvider,
    pages: &PageFetcher,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let emit = |event: EngineEvent| {
        let _ = event_tx.send(event);
    };
    match command {
        EngineCommand::LoadCurrentUser => match identity.current_user().await {
            Ok(user) => emit(EngineEvent::IdentityChanged(user)),
            Err(err) => {
                board_warn!("Could not load current user: {}", err);
                emit(EngineEvent::IdentityChanged(None));
            }
        },
        EngineCommand::SignIn { email, password } => {
            let result = identity.sign_in(&email, &password).await;
            match result {
                Ok(user) => {
                    emit(EngineEvent::AuthCompleted {
                        op: AuthOp::SignIn,
                        result: Ok(()),
                    });
                    emit(EngineEvent::IdentityChanged(Some(user)));
                }
                Err(err) => emit(EngineEvent::AuthCompleted {
                    op: AuthOp::SignIn,
                    result: Err(err),
                }),
            }
        }
        EngineCommand::SignUp { email, password } => {
            match identity.sign_up(&email, &password).await {
                Ok(user) => {
                    emit(EngineEvent::AuthCompleted {
                        op: AuthOp::SignUp,
                        result: Ok(()),
                    });
                    if let Some(user) = user {
                        emit(EngineEvent::IdentityChanged(Some(user)));
                    }
                }
                Err(err) => emit(EngineEvent::AuthCompleted {
                    op: AuthOp::SignUp,
                    result: Err(err),
                }),
            }
        }
        EngineCommand::RequestPasswordReset { email } => {
            let result = identity.request_password_reset(&email).await;
            emit(EngineEvent::AuthCompleted {
                op: AuthOp::PasswordReset,
                result,
            });
        }
        EngineCommand::UpdatePassword { password } => {
            let result = identity.update_password(&password).await;
            emit(EngineEvent::AuthCompleted {
                op: AuthOp::PasswordUpdate,
                result,
            });
        }
        EngineCommand::RestoreSession { access_token } => {
            match identity.restore_session(&access_token).await {
                Ok(user) => {
                    board_info!("Restored session for user {}", user.id);
                    emit(EngineEvent::IdentityChanged(Some(user)));
                }
                Err(err) => emit(EngineEvent::AuthCompleted {
                    op: AuthOp::SignIn,
                    result: Err(err),
                }),
            }
        }
        EngineCommand::SignOut => {
            let result = identity.sign_out().await;
            if let Err(err) = &result {
                board_warn!("Sign-out request failed, dropping session anyway: {}", err);
            }
            emit(EngineEvent::AuthCompleted {
                op: AuthOp::SignOut,
                result,
            });
            emit(EngineEvent::IdentityChanged(None));
        }
        EngineCommand::FetchPage {
            epoch,
            page_index,
            offset,
            limit,
        } => {
            let result = pages.fetch_range(offset, limit).await;
            emit(EngineEvent::PageFetched {
                epoch,
                page_index,
                result,
            });
        }
    }
}
