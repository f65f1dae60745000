use crate::PageRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadCurrentUser,
    SignIn { email: String, password: String },
    SignUp { email: String, password: String },
    RequestPasswordReset { email: String },
    UpdatePassword { password: String },
    /// Adopt the session carried by an auth redirect.
    RestoreSession { access_token: String },
    SignOut,
    FetchPage(PageRequest),
}
