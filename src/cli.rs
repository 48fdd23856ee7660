use std::fmt;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::level_filters::LevelFilter;

/// Request a Sosreport collection on a Kubernetes/OpenShift cluster.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "sosreport-cli")]
#[command(about = "Request Sosreport diagnostic collection on cluster nodes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Run Sosreport on this node only
    #[arg(long = "node", default_value = "")]
    pub node_name: String,

    /// Run Sosreport on this role only
    #[arg(long, default_value = "")]
    pub role: String,

    /// Specify an upload method
    #[arg(long, value_enum, default_value_t = UploadMethod::None)]
    pub upload_method: UploadMethod,

    /// Specify a case number for a support case to upload to
    #[arg(long, default_value = "")]
    pub case_number: String,

    /// Obfuscate sosreport contents
    #[arg(long)]
    pub obfuscate: bool,

    /// Specify an NFS share to upload to
    #[arg(long, default_value = "")]
    pub nfs_share: String,

    /// Specify NFS mount options
    #[arg(long, default_value = "")]
    pub nfs_options: String,

    /// Specify an FTP server to upload to
    #[arg(long, default_value = "")]
    pub ftp_server: String,

    /// Username for the support portal or FTP
    #[arg(long, default_value = "")]
    pub username: String,

    /// Password for the support portal or FTP
    #[arg(long, default_value = "")]
    pub password: String,

    /// Log level for this application
    #[arg(long, value_parser = parse_log_level, default_value = "info")]
    pub log_level: LogLevel,

    /// Dry run - generate YAML only
    #[arg(long)]
    pub dry_run: bool,

    /// Write YAML files to this directory (current directory otherwise)
    #[arg(long)]
    pub yaml_dir: Option<PathBuf>,

    /// Namespace to create objects in (kubeconfig context namespace otherwise)
    #[arg(long)]
    pub namespace: Option<String>,
}

/* ============================= UPLOAD METHOD ============================= */

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMethod {
    #[default]
    None,
    Case,
    Ftp,
    Nfs,
}

impl UploadMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadMethod::None => "none",
            UploadMethod::Case => "case",
            UploadMethod::Ftp => "ftp",
            UploadMethod::Nfs => "nfs",
        }
    }
}

impl fmt::Display for UploadMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/* ============================= LOG LEVEL ============================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Panic,
    Fatal,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Map a level name to a `LogLevel`. Unknown or empty names fall back to `Info`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "panic" => LogLevel::Panic,
            "fatal" => LogLevel::Fatal,
            "error" => LogLevel::Error,
            "warn" | "warning" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }

    /// `tracing` has no levels above ERROR, so panic and fatal collapse into it.
    pub fn as_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Panic | LogLevel::Fatal | LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Panic => "panic",
            LogLevel::Fatal => "fatal",
            LogLevel::Error => "error",
            LogLevel::Warn => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(name)
    }
}

fn parse_log_level(s: &str) -> Result<LogLevel, std::convert::Infallible> {
    Ok(LogLevel::from_name(s))
}

/* ============================= FLAG DUMP ============================= */

impl Cli {
    /// Render all flags as `Name: value` lines for debug output.
    pub fn print_flags(&self) -> String {
        let password = if self.password.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        let yaml_dir = self
            .yaml_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        [
            ("NodeName", self.node_name.clone()),
            ("Role", self.role.clone()),
            ("UploadMethod", self.upload_method.to_string()),
            ("CaseNumber", self.case_number.clone()),
            ("Obfuscate", self.obfuscate.to_string()),
            ("NfsShare", self.nfs_share.clone()),
            ("NfsOptions", self.nfs_options.clone()),
            ("FtpServer", self.ftp_server.clone()),
            ("Username", self.username.clone()),
            ("Password", password.to_string()),
            ("LogLevel", self.log_level.to_string()),
            ("DryRun", self.dry_run.to_string()),
            ("YamlDir", yaml_dir),
            ("Namespace", self.namespace.clone().unwrap_or_default()),
        ]
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

/* ============================= TESTS ============================= */
