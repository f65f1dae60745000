use gigboard_core::{
    parse_callback, update, AppState, AuthAction, AuthMode, CallbackKind, Effect, JobRecord,
    LoadedPage, LocationCategory, Msg, Screen, User,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    gigboard_logging::initialize_for_tests();
}

fn alice() -> User {
    User {
        id: "u-1".to_string(),
        email: Some("alice@example.com".to_string()),
    }
}

fn fill_form(state: AppState, mode: AuthMode, email: &str, password: &str) -> AppState {
    let (state, _) = update(state, Msg::AuthModeSelected(mode));
    let (state, _) = update(state, Msg::EmailChanged(email.to_string()));
    let (state, _) = update(state, Msg::PasswordChanged(password.to_string()));
    state
}

#[test]
fn startup_asks_for_current_user() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Started);
    assert_eq!(effects, vec![Effect::LoadCurrentUser]);
    assert_eq!(state.view().screen, Screen::SignedOut);
}

#[test]
fn login_submits_credentials_once() {
    init_logging();
    let state = fill_form(AppState::new(), AuthMode::Login, " alice@example.com ", "hunter2");

    let (state, effects) = update(state, Msg::AuthSubmitted);
    assert_eq!(
        effects,
        vec![Effect::SignIn {
            email: "alice@example.com".to_string(),
            password: "hunter2".to_string(),
        }]
    );
    assert!(state.view().auth.busy);

    let (state, effects) = update(state, Msg::AuthSubmitted);
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::AuthCompleted {
            action: AuthAction::SignIn,
            result: Ok(()),
        },
    );
    let view = state.view();
    assert!(!view.auth.busy);
    assert_eq!(view.auth.message.unwrap().text, "Logged in!");
}

#[test]
fn failed_login_shows_provider_message_and_stays_usable() {
    init_logging();
    let state = fill_form(AppState::new(), AuthMode::Login, "a@b.c", "wrong");
    let (state, _) = update(state, Msg::AuthSubmitted);
    let (state, _) = update(
        state,
        Msg::AuthCompleted {
            action: AuthAction::SignIn,
            result: Err("Invalid login credentials".to_string()),
        },
    );
    let message = state.view().auth.message.unwrap();
    assert!(message.is_error);
    assert_eq!(message.text, "Invalid login credentials");

    let (_state, effects) = update(state, Msg::AuthSubmitted);
    assert_eq!(effects.len(), 1);
}

#[test]
fn sign_up_and_reset_map_to_their_effects() {
    init_logging();
    let state = fill_form(AppState::new(), AuthMode::SignUp, "new@example.com", "pw");
    let (state, effects) = update(state, Msg::AuthSubmitted);
    assert_eq!(
        effects,
        vec![Effect::SignUp {
            email: "new@example.com".to_string(),
            password: "pw".to_string(),
        }]
    );
    let (state, _) = update(
        state,
        Msg::AuthCompleted {
            action: AuthAction::SignUp,
            result: Ok(()),
        },
    );
    assert_eq!(
        state.view().auth.message.unwrap().text,
        "Check your email to confirm your account!"
    );

    let state = fill_form(state, AuthMode::ForgotPassword, "new@example.com", "");
    let (_state, effects) = update(state, Msg::AuthSubmitted);
    assert_eq!(
        effects,
        vec![Effect::RequestPasswordReset {
            email: "new@example.com".to_string(),
        }]
    );
}

#[test]
fn missing_fields_are_reported_inline() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::AuthSubmitted);
    assert!(effects.is_empty());
    assert_eq!(state.view().auth.message.unwrap().text, "Email is required.");

    let state = fill_form(state, AuthMode::Login, "a@b.c", "");
    let (state, effects) = update(state, Msg::AuthSubmitted);
    assert!(effects.is_empty());
    assert_eq!(state.view().auth.message.unwrap().text, "Password is required.");
}

#[test]
fn logout_clears_records_and_filters() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::IdentityChanged(Some(alice())));
    let request = match &effects[..] {
        [Effect::FetchPage(request)] => *request,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            epoch: request.epoch,
            page_index: 0,
            result: Ok(LoadedPage::new(vec![JobRecord::new("1").with_title("Go Developer")])),
        },
    );
    let (state, _) = update(state, Msg::SearchInputChanged("go".to_string()));
    let (state, _) = update(state, Msg::SearchCommitted);
    let (state, _) = update(state, Msg::LocationSelected(LocationCategory::Remote));
    assert_eq!(state.view().screen, Screen::Board);
    assert_eq!(
        state.view().user_email.as_deref(),
        Some("alice@example.com")
    );

    let (state, effects) = update(state, Msg::LogoutClicked);
    assert_eq!(effects, vec![Effect::SignOut]);
    let (state, effects) = update(state, Msg::LogoutClicked);
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::IdentityChanged(None));
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.screen, Screen::SignedOut);
    assert_eq!(view.loaded_count, 0);
    assert!(view.pills.is_empty());
    assert_eq!(view.location, LocationCategory::All);
    assert!(!view.auth.busy);
}

#[test]
fn same_identity_twice_is_not_a_change() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::IdentityChanged(Some(alice())));
    assert_eq!(effects.len(), 1);
    let epoch = state.session().epoch();

    let (state, effects) = update(state, Msg::IdentityChanged(Some(alice())));
    assert!(effects.is_empty());
    assert_eq!(state.session().epoch(), epoch);
}

#[test]
fn search_commit_builds_pills_and_filters_view() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::IdentityChanged(Some(alice())));
    let request = match &effects[..] {
        [Effect::FetchPage(request)] => *request,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            epoch: request.epoch,
            page_index: 0,
            result: Ok(LoadedPage::new(vec![
                JobRecord::new("1")
                    .with_title("Go Developer")
                    .with_location("Remote"),
                JobRecord::new("2")
                    .with_title("Java Developer")
                    .with_location("Berlin"),
            ])),
        },
    );
    assert_eq!(state.view().visible_count, 2);

    let (state, _) = update(state, Msg::SearchInputChanged("  Go ".to_string()));
    let (state, _) = update(state, Msg::SearchCommitted);
    let (state, _) = update(state, Msg::SearchInputChanged("go".to_string()));
    let (state, _) = update(state, Msg::SearchCommitted);
    let view = state.view();
    assert_eq!(view.pills, vec!["go".to_string()]);
    assert_eq!(view.draft, "");
    let ids: Vec<_> = view.jobs.iter().map(|card| card.id.as_str()).collect();
    assert_eq!(ids, vec!["1"]);

    let (state, _) = update(state, Msg::LocationSelected(LocationCategory::Onsite));
    assert!(state.view().jobs.is_empty());

    let (state, _) = update(state, Msg::PillRemoved("go".to_string()));
    let ids: Vec<_> = state
        .view()
        .jobs
        .iter()
        .map(|card| card.id.clone())
        .collect();
    assert_eq!(ids, vec!["2"]);
}

#[test]
fn recovery_callback_switches_to_password_form() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::AuthCallbackReceived("#access_token=abc&type=recovery".to_string()),
    );
    assert_eq!(
        effects,
        vec![Effect::RestoreSession {
            access_token: "abc".to_string(),
        }]
    );
    assert_eq!(state.view().screen, Screen::SetPassword);

    let (state, effects) = update(state, Msg::NewPasswordSubmitted);
    assert!(effects.is_empty());
    assert!(state.view().auth.message.unwrap().is_error);

    let (state, _) = update(state, Msg::NewPasswordChanged("s3cret".to_string()));
    let (state, effects) = update(state, Msg::NewPasswordSubmitted);
    assert_eq!(
        effects,
        vec![Effect::UpdatePassword {
            password: "s3cret".to_string(),
        }]
    );

    let (state, _) = update(
        state,
        Msg::AuthCompleted {
            action: AuthAction::PasswordUpdate,
            result: Err("weak password".to_string()),
        },
    );
    assert_eq!(
        state.view().auth.message.unwrap().text,
        "Error updating password: weak password"
    );
    assert_eq!(state.view().screen, Screen::SetPassword);

    let (state, _) = update(state, Msg::NewPasswordSubmitted);
    let (state, _) = update(
        state,
        Msg::AuthCompleted {
            action: AuthAction::PasswordUpdate,
            result: Ok(()),
        },
    );
    assert_eq!(state.view().auth.message.unwrap().text, "Password updated!");
    assert_eq!(state.view().screen, Screen::SignedOut);
}

#[test]
fn callback_fragments_are_classified() {
    assert_eq!(parse_callback("type=signup").kind, CallbackKind::SignupConfirmed);
    assert_eq!(
        parse_callback("https://host/auth/callback#type=recovery&access_token=t").access_token,
        Some("t".to_string())
    );
    let other = parse_callback("");
    assert_eq!(other.kind, CallbackKind::Other);
    assert_eq!(other.access_token, None);
}
