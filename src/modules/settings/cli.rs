// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use clap::{Parser, ValueEnum};
use std::{path::PathBuf, sync::LazyLock};

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::new_for_test);

/// Connection security for the outgoing SMTP session.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum SmtpEncryption {
    Ssl,
    StartTls,
    None,
}

#[derive(Debug, Parser)]
#[clap(
    name = "bulkmailer",
    about = "Sends personalized bulk email to recipients from a CSV or spreadsheet file,
    substituting per-recipient placeholders into a shared template and reporting per-recipient results.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// bulkmailer log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for bulkmailer"
    )]
    pub bulkmailer_log_level: String,

    #[clap(
        long,
        default_value = "false",
        env,
        help = "Write logs to daily rolling files instead of stdout"
    )]
    pub bulkmailer_log_to_file: bool,

    #[clap(long, default_value = "true", env, help = "Enable ANSI formatted logs")]
    pub bulkmailer_ansi_logs: bool,

    #[clap(
        long,
        default_value = "logs",
        env,
        help = "Directory that receives rolling log files"
    )]
    pub bulkmailer_log_dir: PathBuf,

    #[clap(
        long,
        default_value = "7",
        env,
        help = "Set the maximum number of rolling log files to keep"
    )]
    pub bulkmailer_max_log_files: usize,

    #[clap(
        long,
        env,
        help = "Set the number of workers for sending mail (defaults to the CPU count)"
    )]
    pub bulkmailer_send_workers: Option<usize>,

    #[clap(long, env, help = "SMTP server host used to deliver the batch")]
    pub bulkmailer_smtp_host: Option<String>,

    #[clap(long, default_value = "465", env, help = "SMTP server port")]
    pub bulkmailer_smtp_port: u16,

    #[clap(
        long,
        value_enum,
        default_value = "ssl",
        env,
        help = "Connection security for the SMTP session"
    )]
    pub bulkmailer_smtp_encryption: SmtpEncryption,

    #[clap(long, env, help = "SMTP username")]
    pub bulkmailer_smtp_username: Option<String>,

    #[clap(long, env, help = "SMTP password")]
    pub bulkmailer_smtp_password: Option<String>,

    #[clap(long, env, help = "Sender address for every message in the batch")]
    pub bulkmailer_from: Option<String>,

    #[clap(long, env, help = "Display name shown next to the sender address")]
    pub bulkmailer_from_name: Option<String>,

    /// Subject template; `{{field}}` placeholders resolve per recipient.
    #[clap(long, help = "Subject template, with {{field}} placeholders")]
    pub subject: Option<String>,

    /// Body template; `{{field}}` placeholders resolve per recipient.
    #[clap(long, help = "Body template, with {{field}} placeholders")]
    pub body: Option<String>,

    #[clap(long, help = "Read the body template from a file instead of --body")]
    pub body_file: Option<PathBuf>,

    #[clap(
        long,
        help = "CSV or spreadsheet recipient file; the header row names the placeholder fields"
    )]
    pub recipients_file: Option<PathBuf>,

    #[clap(
        long,
        help = "Inline comma-separated recipient addresses, used when no recipient file is given"
    )]
    pub to: Option<String>,

    #[clap(long, help = "Tagline rendered under the message body")]
    pub tagline: Option<String>,

    #[clap(long, help = "Image embedded inline in every message")]
    pub image: Option<PathBuf>,
}

impl Settings {
    pub fn send_workers(&self) -> usize {
        self.bulkmailer_send_workers
            .unwrap_or_else(num_cpus::get)
            .max(1)
    }

    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Self {
            bulkmailer_log_level: "info".to_string(),
            bulkmailer_log_to_file: false,
            bulkmailer_ansi_logs: false,
            bulkmailer_log_dir: PathBuf::from("logs"),
            bulkmailer_max_log_files: 7,
            bulkmailer_send_workers: Some(4),
            bulkmailer_smtp_host: None,
            bulkmailer_smtp_port: 465,
            bulkmailer_smtp_encryption: SmtpEncryption::Ssl,
            bulkmailer_smtp_username: None,
            bulkmailer_smtp_password: None,
            bulkmailer_from: Some("sender@example.com".to_string()),
            bulkmailer_from_name: None,
            subject: None,
            body: None,
            body_file: None,
            recipients_file: None,
            to: None,
            tagline: None,
            image: None,
        }
    }
}
