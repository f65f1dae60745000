#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// App finished booting; ask the provider who is signed in.
    Started,
    /// User switched between login, sign-up and forgot-password.
    AuthModeSelected(crate::AuthMode),
    EmailChanged(String),
    PasswordChanged(String),
    /// User submitted the auth form in its current mode.
    AuthSubmitted,
    /// Identity provider answered an auth request.
    AuthCompleted {
        action: crate::AuthAction,
        result: Result<(), String>,
    },
    /// Browser landed on the auth redirect with this URL fragment.
    AuthCallbackReceived(String),
    NewPasswordChanged(String),
    NewPasswordSubmitted,
    /// Login/logout notification from the identity provider.
    IdentityChanged(Option<crate::User>),
    LogoutClicked,
    /// User edited the search box.
    SearchInputChanged(String),
    /// User pressed Enter in the search box.
    SearchCommitted,
    PillRemoved(String),
    LocationSelected(crate::LocationCategory),
    MatchModeSelected(crate::MatchMode),
    LoadMoreClicked,
    RefreshClicked,
    /// Remote table answered a page request.
    PageLoaded {
        epoch: u64,
        page_index: u32,
        result: Result<crate::LoadedPage, String>,
    },
}
