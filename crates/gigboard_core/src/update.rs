use crate::session::{parse_callback, CallbackKind};
use crate::{AppState, AuthAction, AuthMessage, AuthMode, Effect, Msg};

const CONFIRMED_MESSAGE: &str = "Your email has been confirmed! You can now log in.";
const RECOVERY_MESSAGE: &str = "Please set your new password.";
const REDIRECT_MESSAGE: &str = "Redirecting...";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![Effect::LoadCurrentUser],
        Msg::AuthModeSelected(mode) => {
            let auth = state.auth_mut();
            if auth.mode != mode {
                auth.mode = mode;
                auth.message = None;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::EmailChanged(email) => {
            state.auth_mut().email = email;
            state.mark_dirty();
            Vec::new()
        }
        Msg::PasswordChanged(password) => {
            state.auth_mut().password = password;
            Vec::new()
        }
        Msg::AuthSubmitted => submit_auth(&mut state),
        Msg::AuthCompleted { action, result } => {
            let auth = state.auth_mut();
            if auth.pending == Some(action) {
                auth.pending = None;
            }
            auth.message = Some(match result {
                Ok(()) => {
                    auth.password.clear();
                    if action == AuthAction::PasswordUpdate {
                        auth.recovering = false;
                        auth.new_password.clear();
                    }
                    AuthMessage::info(action.success_message())
                }
                Err(message) if action == AuthAction::PasswordUpdate => {
                    AuthMessage::error(format!("Error updating password: {message}"))
                }
                Err(message) => AuthMessage::error(message),
            });
            state.mark_dirty();
            Vec::new()
        }
        Msg::AuthCallbackReceived(fragment) => {
            let callback = parse_callback(&fragment);
            let auth = state.auth_mut();
            match callback.kind {
                CallbackKind::Recovery => {
                    auth.recovering = true;
                    auth.message = Some(AuthMessage::info(RECOVERY_MESSAGE));
                }
                CallbackKind::SignupConfirmed => {
                    auth.mode = AuthMode::Login;
                    auth.message = Some(AuthMessage::info(CONFIRMED_MESSAGE));
                }
                CallbackKind::Other => {
                    auth.message = Some(AuthMessage::info(REDIRECT_MESSAGE));
                }
            }
            state.mark_dirty();
            callback
                .access_token
                .map(|access_token| Effect::RestoreSession { access_token })
                .into_iter()
                .collect()
        }
        Msg::NewPasswordChanged(password) => {
            state.auth_mut().new_password = password;
            Vec::new()
        }
        Msg::NewPasswordSubmitted => {
            let auth = state.auth_mut();
            if !auth.recovering || auth.pending.is_some() {
                return (state, Vec::new());
            }
            state.mark_dirty();
            let auth = state.auth_mut();
            if auth.new_password.is_empty() {
                auth.message = Some(AuthMessage::error("Password is required."));
                return (state, Vec::new());
            }
            auth.pending = Some(AuthAction::PasswordUpdate);
            auth.message = Some(AuthMessage::info("Updating password..."));
            vec![Effect::UpdatePassword {
                password: auth.new_password.clone(),
            }]
        }
        Msg::IdentityChanged(user) => {
            if !state.change_identity(user) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            if state.session().is_signed_in() {
                let epoch = state.session().epoch();
                state
                    .pagination_mut()
                    .request_first(epoch)
                    .map(Effect::FetchPage)
                    .into_iter()
                    .collect()
            } else {
                Vec::new()
            }
        }
        Msg::LogoutClicked => {
            let signing_out = state.auth().pending == Some(AuthAction::SignOut);
            if state.session().is_signed_in() && !signing_out {
                state.auth_mut().pending = Some(AuthAction::SignOut);
                vec![Effect::SignOut]
            } else {
                Vec::new()
            }
        }
        Msg::SearchInputChanged(text) => {
            state.filter_mut().set_draft(text);
            state.mark_dirty();
            Vec::new()
        }
        Msg::SearchCommitted => {
            state.filter_mut().commit_draft();
            state.mark_dirty();
            Vec::new()
        }
        Msg::PillRemoved(pill) => {
            if state.filter_mut().remove_pill(&pill) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::LocationSelected(location) => {
            if state.filter_mut().set_location(location) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::MatchModeSelected(mode) => {
            if state.set_match_mode(mode) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::LoadMoreClicked => request_page(&mut state, false),
        Msg::RefreshClicked => request_page(&mut state, true),
        Msg::PageLoaded {
            epoch,
            page_index,
            result,
        } => {
            if epoch != state.session().epoch() || !state.pagination().is_awaiting(page_index) {
                return (state, Vec::new());
            }
            match result {
                Ok(page) => {
                    state.merge_page(page_index, page);
                }
                Err(message) => {
                    state.pagination_mut().fail();
                    state.set_last_error(Some(message));
                }
            }
            state.mark_dirty();
            Vec::new()
        }
    };

    (state, effects)
}

fn submit_auth(state: &mut AppState) -> Vec<Effect> {
    let auth = state.auth_mut();
    if auth.pending.is_some() {
        return Vec::new();
    }
    let email = auth.email.trim().to_string();
    let needs_password = auth.mode != AuthMode::ForgotPassword;
    let problem = if email.is_empty() {
        Some("Email is required.")
    } else if needs_password && auth.password.is_empty() {
        Some("Password is required.")
    } else {
        None
    };
    if let Some(problem) = problem {
        auth.message = Some(AuthMessage::error(problem));
        state.mark_dirty();
        return Vec::new();
    }

    auth.message = None;
    let password = auth.password.clone();
    let (action, effect) = match auth.mode {
        AuthMode::Login => (AuthAction::SignIn, Effect::SignIn { email, password }),
        AuthMode::SignUp => (AuthAction::SignUp, Effect::SignUp { email, password }),
        AuthMode::ForgotPassword => (
            AuthAction::PasswordReset,
            Effect::RequestPasswordReset { email },
        ),
    };
    auth.pending = Some(action);
    state.mark_dirty();
    vec![effect]
}

fn request_page(state: &mut AppState, from_start: bool) -> Vec<Effect> {
    if !state.session().is_signed_in() {
        return Vec::new();
    }
    let epoch = state.session().epoch();
    let pagination = state.pagination_mut();
    let request = if from_start {
        pagination.request_first(epoch)
    } else {
        pagination.request_next(epoch)
    };
    match request {
        Some(request) => {
            state.mark_dirty();
            vec![Effect::FetchPage(request)]
        }
        None => Vec::new(),
    }
}
