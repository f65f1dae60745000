use url::form_urlencoded;

/// The signed-in identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
}

/// Who is signed in, plus a counter bumped on every identity change.
///
/// Fetches carry the epoch they were issued under so that results arriving
/// after a login/logout can be recognised and dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    user: Option<User>,
    epoch: u64,
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Installs `user`. Returns true if the identity actually changed.
    pub fn set_user(&mut self, user: Option<User>) -> bool {
        let same = match (&self.user, &user) {
            (Some(current), Some(next)) => current.id == next.id,
            (None, None) => true,
            _ => false,
        };
        self.user = user;
        if !same {
            self.epoch += 1;
        }
        !same
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    SignUp,
    ForgotPassword,
}

/// Identity provider operations whose outcome is reported back to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignIn,
    SignUp,
    PasswordReset,
    PasswordUpdate,
    SignOut,
}

impl AuthAction {
    pub fn success_message(self) -> &'static str {
        match self {
            AuthAction::SignIn => "Logged in!",
            AuthAction::SignUp => "Check your email to confirm your account!",
            AuthAction::PasswordReset => "Password reset email sent!",
            AuthAction::PasswordUpdate => "Password updated!",
            AuthAction::SignOut => "Logged out.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthMessage {
    pub text: String,
    pub is_error: bool,
}

impl AuthMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// State of the login / sign-up / recovery form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
    pub new_password: String,
    pub recovering: bool,
    pub pending: Option<AuthAction>,
    pub message: Option<AuthMessage>,
}

impl AuthForm {
    /// Keeps the typed email but forgets secrets and transient status.
    pub fn reset_secrets(&mut self) {
        self.password.clear();
        self.new_password.clear();
        self.pending = None;
    }
}

/// What an auth redirect fragment asks the client to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackKind {
    Recovery,
    SignupConfirmed,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCallback {
    pub kind: CallbackKind,
    pub access_token: Option<String>,
}

/// Parses the fragment of an auth redirect, e.g. `#access_token=..&type=recovery`.
pub fn parse_callback(fragment: &str) -> AuthCallback {
    let trimmed = fragment.trim();
    let trimmed = trimmed
        .rsplit_once('#')
        .map(|(_, tail)| tail)
        .unwrap_or(trimmed);

    let mut kind = CallbackKind::Other;
    let mut access_token = None;
    for (key, value) in form_urlencoded::parse(trimmed.as_bytes()) {
        match key.as_ref() {
            "type" => {
                kind = match value.as_ref() {
                    "recovery" => CallbackKind::Recovery,
                    "signup" => CallbackKind::SignupConfirmed,
                    _ => CallbackKind::Other,
                }
            }
            "access_token" if !value.is_empty() => access_token = Some(value.into_owned()),
            _ => {}
        }
    }
    AuthCallback { kind, access_token }
}
