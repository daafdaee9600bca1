mod api;
mod cli;
mod config;
mod error;
mod flow;
mod session;
mod ui;

use clap::Parser;
use console::Term;
use log::LevelFilter;
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode};

use crate::api::{ArticleClient, Language, Platform};
use crate::cli::{Cli, Command};
use crate::config::BylineConfig;
use crate::flow::SubmissionFlow;
use crate::session::Phase;
use crate::ui::MenuAction;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = BylineConfig::load()?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }

    match cli.command {
        Command::Submit {
            title,
            platform,
            language,
            yes,
        } => {
            run_submit(
                config,
                platform.map(Into::into),
                language.map(Into::into),
                title,
                yes,
            )
            .await
        }
    }
}

/// Warn by default so the spinner stays clean; `--verbose` opens it up.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(
        level,
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

async fn run_submit(
    config: BylineConfig,
    platform: Option<Platform>,
    language: Option<Language>,
    title: Option<String>,
    yes: bool,
) -> anyhow::Result<()> {
    let term = Term::stdout();
    let client = ArticleClient::new(config.base_url.clone(), config.request_timeout());
    let mut flow = SubmissionFlow::new(client);

    // Command-line values only seed the first round; a refresh starts blank.
    let mut preset = Some((platform, language, title));

    loop {
        ui::render_placeholder(&term)?;

        let (platform, language, title) = preset.take().unwrap_or_default();
        let form = flow.form_mut();
        form.platform = Some(match platform {
            Some(p) => p,
            None => ui::prompt_platform(&term)?,
        });
        form.language = Some(match language {
            Some(l) => l,
            None => ui::prompt_language(&term)?,
        });
        form.title = match title {
            Some(t) if !t.trim().is_empty() => t,
            _ => ui::prompt_title(&term)?,
        };

        if !yes && !ui::confirm_submission(&term, flow.session().form())? {
            term.write_line("Submission cancelled.")?;
            return Ok(());
        }

        let progress = ui::WaitProgress::start();
        flow.submit().await;
        if flow.session().is_busy() {
            progress.listening();
            flow.wait_for_article().await;
        }
        progress.finish();

        let can_copy = match flow.session().phase() {
            Phase::Ready { content, .. } => {
                ui::render_ready(&term, content)?;
                true
            }
            Phase::Errored { .. } => {
                ui::render_errored(&term, flow.session().article_id())?;
                false
            }
            // Submission failed; the error is already in the log.
            _ => {
                term.write_line("The submission did not go through. Please try again.")?;
                return Ok(());
            }
        };
        if let Some(record) = flow.record() {
            ui::print_record(&term, &record)?;
        }

        loop {
            match ui::result_menu(&term, can_copy)? {
                MenuAction::CopyTitle => {
                    if let Some(content) = flow.session().content() {
                        ui::copy_to_clipboard(&content.title)?;
                        term.write_line("Title copied.")?;
                    }
                }
                MenuAction::CopyContent => {
                    if let Some(content) = flow.session().content() {
                        ui::copy_to_clipboard(&content.content)?;
                        term.write_line("Content copied.")?;
                    }
                }
                MenuAction::Refresh => {
                    flow.refresh();
                    break;
                }
                MenuAction::Quit => return Ok(()),
            }
        }
    }
}
