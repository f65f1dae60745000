//! Parses typed input lines into core messages.

use gigboard_core::fuzzy::DEFAULT_THRESHOLD;
use gigboard_core::{AuthMode, LocationCategory, MatchMode, Msg};

pub(crate) const HELP_TEXT: &str = "\
Commands:
  login | signup | forgot       switch the auth form mode
  email <address>               set the email field
  password <secret>             set the password field
  submit                        submit the auth form
  callback <fragment>           paste an auth redirect fragment (#type=...&access_token=...)
  newpass <secret>              set a new password after a recovery link
  search <terms>                add a search pill
  unpill <term>                 remove a search pill
  location all|remote|onsite    filter by location
  match fuzzy [threshold] | match substring
  more                          load the next page
  refresh                       reload from the first page
  logout                        sign out
  help                          show this text
  quit                          exit";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    Msgs(Vec<Msg>),
    Help,
    Quit,
    /// Input that could not be understood; carries a message for the user.
    Invalid(String),
}

pub(crate) fn parse(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Msgs(Vec::new());
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let msgs = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => return Command::Help,
        "quit" | "exit" | "q" => return Command::Quit,
        "login" => vec![Msg::AuthModeSelected(AuthMode::Login)],
        "signup" => vec![Msg::AuthModeSelected(AuthMode::SignUp)],
        "forgot" => vec![Msg::AuthModeSelected(AuthMode::ForgotPassword)],
        "email" => vec![Msg::EmailChanged(rest.to_string())],
        "password" => vec![Msg::PasswordChanged(rest.to_string())],
        "submit" => vec![Msg::AuthSubmitted],
        "callback" => vec![Msg::AuthCallbackReceived(rest.to_string())],
        "newpass" => vec![
            Msg::NewPasswordChanged(rest.to_string()),
            Msg::NewPasswordSubmitted,
        ],
        "search" => vec![
            Msg::SearchInputChanged(rest.to_string()),
            Msg::SearchCommitted,
        ],
        "unpill" => vec![Msg::PillRemoved(rest.to_lowercase())],
        "location" => match rest.to_ascii_lowercase().as_str() {
            "all" => vec![Msg::LocationSelected(LocationCategory::All)],
            "remote" => vec![Msg::LocationSelected(LocationCategory::Remote)],
            "onsite" | "on-site" => vec![Msg::LocationSelected(LocationCategory::Onsite)],
            other => return Command::Invalid(format!("Unknown location `{other}`")),
        },
        "match" => match parse_match(rest) {
            Some(mode) => vec![Msg::MatchModeSelected(mode)],
            None => return Command::Invalid(format!("Unknown match mode `{rest}`")),
        },
        "more" => vec![Msg::LoadMoreClicked],
        "refresh" => vec![Msg::RefreshClicked],
        "logout" => vec![Msg::LogoutClicked],
        other => return Command::Invalid(format!("Unknown command `{other}`, try `help`")),
    };
    Command::Msgs(msgs)
}

fn parse_match(rest: &str) -> Option<MatchMode> {
    let mut parts = rest.split_whitespace();
    match parts.next()?.to_ascii_lowercase().as_str() {
        "substring" => Some(MatchMode::Substring),
        "fuzzy" => {
            let threshold = match parts.next() {
                Some(raw) => raw.parse::<f64>().ok().filter(|t| (0.0..=1.0).contains(t))?,
                None => DEFAULT_THRESHOLD,
            };
            Some(MatchMode::Fuzzy { threshold })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use gigboard_core::{AuthMode, LocationCategory, MatchMode, Msg};

    use super::{parse, Command};

    #[test]
    fn search_sets_draft_then_commits() {
        assert_eq!(
            parse("search  Rust Developer "),
            Command::Msgs(vec![
                Msg::SearchInputChanged("Rust Developer".to_string()),
                Msg::SearchCommitted,
            ])
        );
    }

    #[test]
    fn auth_commands() {
        assert_eq!(
            parse("signup"),
            Command::Msgs(vec![Msg::AuthModeSelected(AuthMode::SignUp)])
        );
        assert_eq!(
            parse("email a@b.c"),
            Command::Msgs(vec![Msg::EmailChanged("a@b.c".to_string())])
        );
        assert_eq!(
            parse("callback #type=recovery&access_token=t"),
            Command::Msgs(vec![Msg::AuthCallbackReceived(
                "#type=recovery&access_token=t".to_string()
            )])
        );
    }

    #[test]
    fn location_and_match_modes() {
        assert_eq!(
            parse("location Remote"),
            Command::Msgs(vec![Msg::LocationSelected(LocationCategory::Remote)])
        );
        assert_eq!(
            parse("match fuzzy 0.25"),
            Command::Msgs(vec![Msg::MatchModeSelected(MatchMode::Fuzzy {
                threshold: 0.25
            })])
        );
        assert_eq!(
            parse("match substring"),
            Command::Msgs(vec![Msg::MatchModeSelected(MatchMode::Substring)])
        );
        assert!(matches!(parse("match fuzzy 7"), Command::Invalid(_)));
        assert!(matches!(parse("location moon"), Command::Invalid(_)));
    }

    #[test]
    fn control_words() {
        assert_eq!(parse("  "), Command::Msgs(Vec::new()));
        assert_eq!(parse("quit"), Command::Quit);
        assert_eq!(parse("help"), Command::Help);
        assert!(matches!(parse("dance"), Command::Invalid(_)));
    }
}
