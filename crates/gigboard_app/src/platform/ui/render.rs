use gigboard_core::{
    AppViewModel, AuthFormView, AuthMode, JobCardView, LocationCategory, MatchMode, Screen,
};

const TITLE: &str = "Freelance Job Board";
const SUMMARY_WIDTH: usize = 160;

/// Renders the view model as plain text lines for the terminal.
pub(crate) fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![String::new(), format!("=== {TITLE} ===")];
    match view.screen {
        Screen::SignedOut => render_auth(&view.auth, &mut lines),
        Screen::SetPassword => {
            lines.push("Set a new password with `newpass <secret>`.".to_string());
            push_message(&view.auth, &mut lines);
        }
        Screen::Board => render_board(view, &mut lines),
    }
    lines
}

fn render_auth(auth: &AuthFormView, lines: &mut Vec<String>) {
    let (heading, action) = match auth.mode {
        AuthMode::Login => ("Login", "Login"),
        AuthMode::SignUp => ("Sign Up", "Sign Up"),
        AuthMode::ForgotPassword => ("Forgot Password", "Send Reset Email"),
    };
    lines.push(format!("[{heading}]"));
    let email = if auth.email.is_empty() {
        "(not set)"
    } else {
        auth.email.as_str()
    };
    lines.push(format!("Email: {email}"));
    if auth.busy {
        lines.push("Processing...".to_string());
    } else {
        lines.push(format!("`submit` to {action}"));
    }
    push_message(auth, lines);
}

fn push_message(auth: &AuthFormView, lines: &mut Vec<String>) {
    if let Some(message) = &auth.message {
        let prefix = if message.is_error { "! " } else { "" };
        lines.push(format!("{prefix}{}", message.text));
    }
}

fn render_board(view: &AppViewModel, lines: &mut Vec<String>) {
    if let Some(email) = &view.user_email {
        lines.push(format!("Signed in as {email}"));
    }
    lines.push(format!("{TITLE}: {} curated positions", view.visible_count));
    lines.push(filter_line(view));

    if view.loading && view.loaded_count == 0 {
        lines.push("Loading amazing jobs...".to_string());
        lines.push("Please wait while we fetch the latest opportunities".to_string());
        return;
    }

    for job in &view.jobs {
        render_card(job, lines);
    }

    if let Some(error) = &view.last_error {
        lines.push(format!("! Could not load jobs: {error}"));
    }
    let footer = if view.loading {
        "Loading more...".to_string()
    } else if view.has_more {
        format!("{} loaded, `more` for the next page", view.loaded_count)
    } else {
        format!("{} loaded, end of list", view.loaded_count)
    };
    lines.push(footer);
}

fn filter_line(view: &AppViewModel) -> String {
    let pills = if view.pills.is_empty() {
        "none".to_string()
    } else {
        view.pills
            .iter()
            .map(|pill| format!("[{pill} x]"))
            .collect::<Vec<_>>()
            .join(" ")
    };
    let location = match view.location {
        LocationCategory::All => "all",
        LocationCategory::Remote => "remote",
        LocationCategory::Onsite => "onsite",
    };
    let mode = match view.match_mode {
        MatchMode::Substring => "substring".to_string(),
        MatchMode::Fuzzy { threshold } => format!("fuzzy {threshold:.2}"),
    };
    format!("Search: {pills} | Location: {location} | Match: {mode}")
}

fn render_card(job: &JobCardView, lines: &mut Vec<String>) {
    lines.push(String::new());
    lines.push(format!("#{} {}", job.short_id, job.title));
    lines.push(format!(
        "    {} | {} | {} | Posted {}",
        job.company, job.location, job.rate, job.posted
    ));
    if !job.summary.is_empty() {
        lines.push(format!("    {}", truncate(&job.summary, SUMMARY_WIDTH)));
    }
    if let Some(link) = &job.link {
        lines.push(format!("    {link}"));
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
