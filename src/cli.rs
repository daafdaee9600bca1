//! Command-line interface, clap derive style.

use clap::{Parser, Subcommand, ValueEnum};

use crate::api::{Language, Platform};

/// byline — console front-end for an asynchronous article generation service.
#[derive(Debug, Parser)]
#[command(name = "byline", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the article service (overrides config file and environment).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable verbose logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a title for article generation and wait for the result.
    Submit {
        /// Title / description of the article. Prompted when omitted.
        title: Option<String>,

        /// Target platform. Prompted when omitted.
        #[arg(long)]
        platform: Option<PlatformArg>,

        /// Target language. Prompted when omitted.
        #[arg(long)]
        language: Option<LanguageArg>,

        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Platform as accepted on the command line, mapped to the wire enum.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PlatformArg {
    Facebook,
    Twitter,
    #[value(name = "linkedin")]
    LinkedIn,
    #[value(name = "tiktok")]
    TikTok,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Facebook => Platform::Facebook,
            PlatformArg::Twitter => Platform::Twitter,
            PlatformArg::LinkedIn => Platform::LinkedIn,
            PlatformArg::TikTok => Platform::TikTok,
        }
    }
}

/// Language as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LanguageArg {
    English,
    Sinhala,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::English => Language::English,
            LanguageArg::Sinhala => Language::Sinhala,
        }
    }
}
