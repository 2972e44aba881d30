//! Command line flags and the immutable run configuration built from them.

use clap::Parser;
use std::fmt;
use std::path::PathBuf;

/// Environment variable consulted when `-u` is empty.
pub const USERNAME_VAR: &str = "USERNAME";
/// Environment variable consulted when `-p` is empty.
pub const PASSWORD_VAR: &str = "PASSWORD";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Username for the mail account
    #[arg(short, long, default_value = "")]
    pub username: String,

    /// Password (or app password) for the mail account
    #[arg(short, long, default_value = "")]
    pub password: String,

    /// Destination directory for the IMAP structure
    #[arg(short, long)]
    pub destdir: Option<PathBuf>,

    /// IMAP server to connect to over TLS
    #[arg(long, default_value = "imap.gmail.com")]
    pub host: String,

    /// Port of the IMAP server
    #[arg(long, default_value_t = 993)]
    pub port: u16,

    /// Log every protocol line sent and received (credentials are redacted)
    #[arg(long)]
    pub trace: bool,
}

/// Everything a run needs, assembled once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub destdir: PathBuf,
    pub trace: bool,
}

impl Config {
    /// Fold parsed flags and the environment into a `Config`.
    ///
    /// Empty `-u`/`-p` flags fall back to `USERNAME`/`PASSWORD` from `env`; a missing variable
    /// leaves the credential empty. Returns `None` when no destination directory was given.
    pub fn resolve<F>(args: Args, env: F) -> Option<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let destdir = args.destdir?;
        let or_env = |flag: String, var: &str| {
            if flag.is_empty() {
                env(var).unwrap_or_default()
            } else {
                flag
            }
        };

        Some(Config {
            username: or_env(args.username, USERNAME_VAR),
            password: or_env(args.password, PASSWORD_VAR),
            host: args.host,
            port: args.port,
            destdir,
            trace: args.trace,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("destdir", &self.destdir)
            .field("trace", &self.trace)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(var: &str) -> Option<String> {
        match var {
            "USERNAME" => Some("env-user@example.org".to_string()),
            "PASSWORD" => Some("env-secret".to_string()),
            _ => None,
        }
    }

    #[test]
    fn empty_flags_fall_back_to_env() {
        let args = Args::parse_from(["imap-inspect", "-d", "out"]);
        let config = Config::resolve(args, env).unwrap();
        assert_eq!(config.username, "env-user@example.org");
        assert_eq!(config.password, "env-secret");
        assert_eq!(config.host, "imap.gmail.com");
        assert_eq!(config.port, 993);
        assert_eq!(config.destdir, PathBuf::from("out"));
    }

    #[test]
    fn flags_win_over_env() {
        let args = Args::parse_from(["imap-inspect", "-u", "me", "-p", "pw", "-d", "out"]);
        let config = Config::resolve(args, env).unwrap();
        assert_eq!(config.username, "me");
        assert_eq!(config.password, "pw");
    }

    #[test]
    fn missing_destdir_means_no_run() {
        let args = Args::parse_from(["imap-inspect", "-u", "me"]);
        assert!(Config::resolve(args, env).is_none());
    }

    #[test]
    fn missing_env_leaves_credentials_empty() {
        let args = Args::parse_from(["imap-inspect", "-d", "out", "--host", "localhost"]);
        let config = Config::resolve(args, |_| None).unwrap();
        assert_eq!(config.username, "");
        assert_eq!(config.password, "");
        assert_eq!(config.host, "localhost");
    }

    #[test]
    fn debug_redacts_password() {
        let args = Args::parse_from(["imap-inspect", "-p", "hunter2", "-d", "out"]);
        let config = Config::resolve(args, env).unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
