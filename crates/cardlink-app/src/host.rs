//! Console implementations of the host capabilities.
//!
//! The dashboard frontend normally provides the window, the confirmation
//! dialog and date rendering. Here they print to the terminal.

use std::io::Write;

use async_trait::async_trait;
use cardlink_action::{HostWindow, Prompt, Signal, SignalTarget};
use cardlink_core::locale::{DateFormat, TimeFormat};
use cardlink_core::{FrontendLocale, LocaleFormatter};
use chrono::{DateTime, Utc};

/// Window that prints history changes, opened URLs and signals.
pub struct ConsoleWindow;

impl SignalTarget for ConsoleWindow {
    fn dispatch(&self, signal: Signal) {
        println!("window signal {}", describe_signal(&signal));
    }
}

impl HostWindow for ConsoleWindow {
    fn push_state(&self, path: &str) {
        tracing::debug!(path, "History push");
        println!("history push {}", path);
    }

    fn replace_state(&self, path: &str) {
        tracing::debug!(path, "History replace");
        println!("history replace {}", path);
    }

    fn open_window(&self, url: &str) {
        println!("open {}", url);
    }
}

pub fn describe_signal(signal: &Signal) -> String {
    match &signal.detail {
        Some(detail) => format!("{} {}", signal.name, detail),
        None => signal.name.clone(),
    }
}

/// Prompt that always gives the same answer.
pub struct FixedPrompt(pub bool);

#[async_trait]
impl Prompt for FixedPrompt {
    async fn confirm(&self, text: &str) -> bool {
        println!("{} [{}]", text, if self.0 { "yes" } else { "no" });
        self.0
    }
}

/// Prompt that asks on the terminal.
pub struct StdinPrompt;

#[async_trait]
impl Prompt for StdinPrompt {
    async fn confirm(&self, text: &str) -> bool {
        let text = text.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            print!("{} [y/N] ", text);
            let _ = std::io::stdout().flush();
            let mut line = String::new();
            match std::io::stdin().read_line(&mut line) {
                Ok(_) => is_affirmative(&line),
                Err(_) => false,
            }
        })
        .await;
        answer.unwrap_or(false)
    }
}

fn is_affirmative(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Renders timestamps with chrono patterns chosen from the locale profile.
pub struct ChronoFormatter;

impl LocaleFormatter for ChronoFormatter {
    fn format_date(&self, at: &DateTime<Utc>, locale: &FrontendLocale) -> String {
        let pattern = match locale.date_format {
            Some(DateFormat::Mdy) => "%B %-d, %Y",
            Some(DateFormat::Ymd) => "%Y %B %-d",
            _ => "%-d %B %Y",
        };
        at.format(pattern).to_string()
    }

    fn format_time(&self, at: &DateTime<Utc>, locale: &FrontendLocale) -> String {
        match locale.time_format {
            Some(TimeFormat::AmPm) => at.format("%-I:%M %p").to_string(),
            _ => at.format("%H:%M").to_string(),
        }
    }
}
