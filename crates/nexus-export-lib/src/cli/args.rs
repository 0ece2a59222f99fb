use crate::error::NexusExportError;
use crate::export::FailurePolicy;
use clap::{ArgAction, Parser};
use tracing::Level;
use tracing_subscriber::EnvFilter;

pub const PASSWORD_ENV_VAR: &str = "NEXUS_PASSWORD";

/// Dependencies that are too chatty below `warn`.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "hyper_util=warn", "reqwest=warn"];

#[derive(Debug, Clone, Default)]
pub struct ExportCommand {
    pub server: String,
    pub repository: String,
    pub output_dir: Option<String>,
    pub username: Option<String>,
    /// Taken from the environment, never from the command line
    pub password: Option<String>,
    pub no_verify: bool,
    pub mirror: bool,
    pub insecure: bool,
    pub on_asset_error: Option<FailurePolicy>,
    pub config_path: Option<String>,
}

pub struct Args {
    pub command: ExportCommand,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "nexus-export",
    version,
    about = "Download all assets of a Nexus 3 repository, following the repository's path layout"
)]
struct Cli {
    #[arg(help = "Root URL of the Nexus 3 server, e.g. https://repo.example.com")]
    server: String,

    #[arg(help = "Name of the repository to export, e.g. maven-releases")]
    repo: String,

    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        help = "Directory to store the assets in (default: the repository name)"
    )]
    output_dir: Option<String>,

    #[arg(
        short = 'u',
        long = "username",
        value_name = "USERNAME",
        help = "HTTP Basic Auth username; the password is read from NEXUS_PASSWORD or prompted for"
    )]
    username: Option<String>,

    #[arg(
        short = 'n',
        long = "no-verify",
        help = "Disable SHA-1 verification of downloaded assets"
    )]
    no_verify: bool,

    #[arg(
        short = 'm',
        long = "mirror",
        help = "Skip assets that already exist locally with the size reported by the server"
    )]
    mirror: bool,

    #[arg(
        long = "on-asset-error",
        value_enum,
        value_name = "POLICY",
        help = "What to do when an asset fails to download or verify [default: abort]"
    )]
    on_asset_error: Option<FailurePolicy>,

    #[arg(long = "insecure", help = "Accept invalid TLS certificates")]
    insecure: bool,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Optional config file with defaults for the options above"
    )]
    config: Option<String>,

    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count,
        conflicts_with = "quiet"
    )]
    verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Only print warnings and errors"
    )]
    quiet: bool,
}

/// Parses the process arguments and installs the global subscriber.
///
/// `--help` and `--version` print and exit with 0. Usage errors are printed
/// and returned as [`NexusExportError::CliArgumentValidation`].
pub fn parse_args() -> Result<Args, NexusExportError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            return Err(usage_error(err));
        }
    };

    let args = Args::from_cli(cli, std::env::var(PASSWORD_ENV_VAR).ok());
    init_logging(args.log_level, std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());
    Ok(args)
}

pub fn usage_error(err: clap::Error) -> NexusExportError {
    let rendered = err.render().to_string();
    let details = rendered
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("invalid arguments")
        .trim()
        .trim_start_matches("error: ")
        .to_string();
    NexusExportError::CliArgumentValidation { details }
}

/// Parses arguments without touching the environment or the global subscriber.
pub fn try_parse_args_from<I, T>(itr: I, password: Option<String>) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Ok(Args::from_cli(Cli::try_parse_from(itr)?, password))
}

fn init_logging(log_level: Level, rust_log: Option<&str>) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    for directive in dependency_caps(rust_log) {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Caps for chatty dependencies, minus any target `RUST_LOG` already configures.
fn dependency_caps(rust_log: Option<&str>) -> Vec<&'static str> {
    let configured: Vec<&str> = rust_log
        .unwrap_or_default()
        .split(',')
        .filter_map(|directive| directive.split('=').next())
        .map(|target| target.split('[').next().unwrap_or_default().trim())
        .filter(|target| !target.is_empty())
        .collect();

    QUIET_DEPENDENCIES
        .iter()
        .copied()
        .filter(|cap| {
            let target = cap.split('=').next().unwrap_or_default();
            !configured.contains(&target)
        })
        .collect()
}

impl Args {
    fn from_cli(cli: Cli, password: Option<String>) -> Self {
        let log_level = match (cli.quiet, cli.verbose) {
            (true, _) => Level::WARN,
            (false, 0) => Level::INFO,
            (false, 1) => Level::DEBUG,
            (false, _) => Level::TRACE,
        };

        let command = ExportCommand {
            server: cli.server,
            repository: cli.repo,
            output_dir: cli.output_dir,
            username: cli.username,
            password,
            no_verify: cli.no_verify,
            mirror: cli.mirror,
            insecure: cli.insecure,
            on_asset_error: cli.on_asset_error,
            config_path: cli.config,
        };

        Args { command, log_level }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_CONFIGURATION;

    #[test]
    fn test_positional_arguments_and_defaults() {
        let args = try_parse_args_from(["nexus-export", "repo.example.com", "maven-releases"], None)
            .unwrap();
        let command = args.command;

        assert_eq!(command.server, "repo.example.com");
        assert_eq!(command.repository, "maven-releases");
        assert_eq!(command.output_dir, None);
        assert_eq!(command.username, None);
        assert!(!command.no_verify);
        assert!(!command.mirror);
        assert_eq!(command.on_asset_error, None);
        assert_eq!(args.log_level, Level::INFO);
    }

    #[test]
    fn test_short_flags() {
        let args = try_parse_args_from(
            [
                "nexus-export",
                "https://nexus",
                "demo",
                "-o",
                "out",
                "-u",
                "deploy",
                "-n",
                "-m",
                "--on-asset-error",
                "skip",
                "-vv",
            ],
            Some("s3cret".to_string()),
        )
        .unwrap();
        let command = args.command;

        assert_eq!(command.output_dir.as_deref(), Some("out"));
        assert_eq!(command.username.as_deref(), Some("deploy"));
        assert_eq!(command.password.as_deref(), Some("s3cret"));
        assert!(command.no_verify);
        assert!(command.mirror);
        assert_eq!(command.on_asset_error, Some(FailurePolicy::Skip));
        assert_eq!(args.log_level, Level::TRACE);
    }

    #[test]
    fn test_quiet_lowers_log_level() {
        let args = try_parse_args_from(["nexus-export", "nexus", "demo", "-q"], None).unwrap();
        assert_eq!(args.log_level, Level::WARN);
    }

    #[test]
    fn test_missing_repository_is_rejected() {
        assert!(try_parse_args_from(["nexus-export", "nexus"], None).is_err());
    }

    #[test]
    fn test_usage_errors_map_to_configuration_exit_code() {
        let err = try_parse_args_from(
            ["nexus-export", "nexus", "demo", "--on-asset-error", "bogus"],
            None,
        )
        .err()
        .unwrap();
        let err = usage_error(err);
        assert!(matches!(err, NexusExportError::CliArgumentValidation { .. }), "{err}");
        assert_eq!(err.exit_code(), EXIT_CONFIGURATION);

        let err = usage_error(try_parse_args_from(["nexus-export"], None).err().unwrap());
        assert_eq!(err.exit_code(), EXIT_CONFIGURATION);
    }

    #[test]
    fn test_help_is_not_a_usage_error() {
        let err = try_parse_args_from(["nexus-export", "--help"], None).err().unwrap();
        assert!(!err.use_stderr());
    }

    #[test]
    fn test_rust_log_overrides_dependency_caps() {
        assert_eq!(dependency_caps(None), QUIET_DEPENDENCIES);
        assert_eq!(dependency_caps(Some("debug")), QUIET_DEPENDENCIES);
        assert_eq!(
            dependency_caps(Some("info,reqwest=debug")),
            ["hyper=warn", "hyper_util=warn"]
        );
        assert_eq!(
            dependency_caps(Some("hyper=trace, hyper_util")),
            ["reqwest=warn"]
        );
    }

    #[test]
    fn test_password_is_not_an_argument() {
        assert!(
            try_parse_args_from(["nexus-export", "nexus", "demo", "--password", "x"], None)
                .is_err()
        );
    }
}
