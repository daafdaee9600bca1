//! Terminal interface — form prompts, waiting spinner and result rendering.
//!
//! Uses `console` for styled output and line input, `indicatif` for the
//! waiting spinner, and `arboard` for the copy-to-clipboard affordances.

use std::fmt::Display;

use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{ArticleContent, Language, Platform};
use crate::error::BylineError;
use crate::session::{FormState, SessionRecord};

/// Spinner shown while a submission or wait is in flight.
pub struct WaitProgress {
    pb: ProgressBar,
}

impl WaitProgress {
    pub fn start() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message("Submitting form...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    /// Switch the message once the article is accepted and we are waiting on
    /// the status stream.
    pub fn listening(&self) {
        self.pb
            .set_message("Your article is preparing, it will be ready in just a few moments...");
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

/// Action chosen from the post-result menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    CopyTitle,
    CopyContent,
    Refresh,
    Quit,
}

pub fn prompt_platform(term: &Term) -> Result<Platform, BylineError> {
    prompt_choice(term, "Platform", &Platform::ALL)
}

pub fn prompt_language(term: &Term) -> Result<Language, BylineError> {
    prompt_choice(term, "Language", &Language::ALL)
}

fn prompt_choice<T: Copy + Display>(
    term: &Term,
    label: &str,
    options: &[T],
) -> Result<T, BylineError> {
    loop {
        term.write_line(&format!("{label}:"))?;
        for (index, option) in options.iter().enumerate() {
            term.write_line(&format!("  {}. {option}", index + 1))?;
        }
        term.write_str(&format!("Select a {}: ", label.to_lowercase()))?;
        let line = term.read_line()?;
        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=options.len()).contains(&choice) => return Ok(options[choice - 1]),
            _ => term.write_line("Invalid choice, try again.")?,
        }
    }
}

pub fn prompt_title(term: &Term) -> Result<String, BylineError> {
    loop {
        term.write_str("Title / description: ")?;
        let line = term.read_line()?;
        if !line.trim().is_empty() {
            return Ok(line);
        }
        term.write_line("The title must not be empty.")?;
    }
}

/// Show the filled form and ask for the go-ahead. No network call happens
/// unless this answers true.
pub fn confirm_submission(term: &Term, form: &FormState) -> Result<bool, BylineError> {
    let bold = Style::new().bold();
    term.write_line("")?;
    term.write_line(&format!("  Platform: {}", display_option(form.platform)))?;
    term.write_line(&format!("  Language: {}", display_option(form.language)))?;
    term.write_line(&format!("  Title:    {}", form.title.trim()))?;
    term.write_str(&format!(
        "{} ",
        bold.apply_to("Are you sure you want to submit this form? [y/N]")
    ))?;
    let line = term.read_line()?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn display_option<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Neutral placeholder shown before anything has been submitted.
pub fn render_placeholder(term: &Term) -> Result<(), BylineError> {
    let dim = Style::new().dim();
    term.write_line(&format!(
        "{}",
        dim.apply_to("Your article preview will appear here once it's ready.")
    ))?;
    term.write_line("")?;
    Ok(())
}

pub fn render_ready(term: &Term, content: &ArticleContent) -> Result<(), BylineError> {
    let green = Style::new().green().bold();
    let title = Style::new().bold();
    term.write_line("")?;
    term.write_line(&format!("{} Article ready", green.apply_to("✓")))?;
    term.write_line("")?;
    term.write_line(&format!("{}", title.apply_to(&content.title)))?;
    term.write_line("")?;
    term.write_line(&content.content)?;
    term.write_line("")?;
    Ok(())
}

pub fn render_errored(term: &Term, article_id: Option<&str>) -> Result<(), BylineError> {
    let red = Style::new().red().bold();
    term.write_line("")?;
    term.write_line(&format!(
        "{} The wait was abandoned and no article arrived. Check the service and refresh to try again.",
        red.apply_to("✗")
    ))?;
    if let Some(id) = article_id {
        term.write_line(&format!("  (submission id: {id})"))?;
    }
    term.write_line("")?;
    Ok(())
}

/// Print the completion summary as pretty JSON.
pub fn print_record(term: &Term, record: &SessionRecord) -> Result<(), BylineError> {
    let dim = Style::new().dim();
    term.write_line(&format!("{}", dim.apply_to("─── Session ───")))?;
    term.write_line(&serde_json::to_string_pretty(record).unwrap_or_default())?;
    Ok(())
}

/// Post-result menu. Copy actions are only offered when content is shown.
pub fn result_menu(term: &Term, can_copy: bool) -> Result<MenuAction, BylineError> {
    let hint = if can_copy {
        "[t] copy title  [c] copy content  [r] refresh  [q] quit"
    } else {
        "[r] refresh  [q] quit"
    };
    loop {
        term.write_str(&format!("{hint}: "))?;
        let line = term.read_line()?;
        match line.trim() {
            "t" if can_copy => return Ok(MenuAction::CopyTitle),
            "c" if can_copy => return Ok(MenuAction::CopyContent),
            "r" => return Ok(MenuAction::Refresh),
            "q" | "" => return Ok(MenuAction::Quit),
            _ => {}
        }
    }
}

pub fn copy_to_clipboard(text: &str) -> Result<(), BylineError> {
    arboard::Clipboard::new()
        .and_then(|mut clipboard| clipboard.set_text(text.to_string()))
        .map_err(|err| BylineError::Clipboard(err.to_string()))
}
