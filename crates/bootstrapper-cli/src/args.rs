//! Command-line flags and their conversion into the run configuration.

use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};

use bootstrapper_common::config::{BootstrapperConfig, ConfigureConfig, MoveConfig};
use bootstrapper_common::constants::DEFAULT_INSTALL_PATH;

/// Bootstrapper: copies the agent into a shared volume and configures it.
#[derive(Parser, Debug)]
#[command(name = "bootstrapper", version, about, long_about = None)]
pub struct Cli {
    /// Base path where to copy the agent from.
    #[arg(long)]
    pub source: PathBuf,

    /// Base path where to copy the agent to.
    #[arg(long)]
    pub target: PathBuf,

    /// (Optional) Work directory; when set, the copy is staged there and
    /// renamed onto the target.
    #[arg(long)]
    pub work: Option<PathBuf>,

    /// (Optional) Comma-separated technologies to copy, based on the manifest.
    #[arg(long)]
    pub technology: Option<String>,

    /// (Optional) Base path where to look for the configuration inputs.
    #[arg(long = "input-directory")]
    pub input_directory: Option<PathBuf>,

    /// (Optional) Base path where to put the configuration files.
    #[arg(long = "config-directory")]
    pub config_directory: Option<PathBuf>,

    /// (Optional) Base path where the agent is mounted in the workload.
    #[arg(long, default_value = DEFAULT_INSTALL_PATH)]
    pub install_path: String,

    /// (Optional) Configure the agent for fullstack monitoring.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value = "false",
        action = ArgAction::Set
    )]
    pub fullstack: bool,

    /// Tenant the agent communicates with. Required with --fullstack.
    #[arg(long)]
    pub tenant: Option<String>,

    /// (Optional) Pod attribute in key=value format. Repeatable.
    #[arg(long = "attribute", value_name = "KEY=VALUE")]
    pub attributes: Vec<String>,

    /// (Optional) Container attributes in JSON format. Repeatable.
    #[arg(long = "attribute-container", value_name = "JSON")]
    pub container_attributes: Vec<String>,

    /// (Optional) Enables debug logs.
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value = "false",
        action = ArgAction::Set
    )]
    pub debug: bool,

    /// (Optional) Logs errors instead of failing the run.
    #[arg(
        long = "suppress-error",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        default_value = "false",
        action = ArgAction::Set
    )]
    pub suppress_error: bool,

    /// Stray arguments; accepted and ignored.
    #[arg(hide = true)]
    pub rest: Vec<String>,
}

impl Cli {
    /// Parses `args` after dropping flags the bootstrapper does not know.
    ///
    /// Exits the process on missing required flags, like `Parser::parse`.
    pub fn parse_lenient<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self::parse_from(filter_unknown_flags(args))
    }

    /// Long names of every flag the parser accepts.
    fn known_flags() -> Vec<String> {
        let command = Self::command();
        command
            .get_arguments()
            .filter_map(clap::Arg::get_long)
            .map(str::to_string)
            .chain(["help".to_string(), "version".to_string()])
            .collect()
    }
}

/// Drops unknown `--flags` from `args`.
///
/// An unknown flag without `=` also takes the next token with it, unless
/// that token is itself a flag. The first element is the program name and
/// is always kept, as is everything after `--`.
pub fn filter_unknown_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let known = Cli::known_flags();
    let mut args = args.into_iter().peekable();
    let mut kept: Vec<String> = args.next().into_iter().collect();

    while let Some(arg) = args.next() {
        if arg == "--" {
            kept.push(arg);
            kept.extend(args.by_ref());
            break;
        }

        let Some(flag) = arg.strip_prefix("--") else {
            kept.push(arg);
            continue;
        };
        let (name, inline_value) = match flag.split_once('=') {
            Some((name, _)) => (name, true),
            None => (flag, false),
        };
        if known.iter().any(|k| k == name) {
            kept.push(arg);
            continue;
        }

        if !inline_value && args.peek().is_some_and(|next| !next.starts_with('-')) {
            let _ = args.next();
        }
    }

    kept
}

fn non_empty_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

impl From<Cli> for BootstrapperConfig {
    fn from(cli: Cli) -> Self {
        Self {
            source: cli.source,
            target: cli.target,
            debug: cli.debug,
            suppress_errors: cli.suppress_error,
            mover: MoveConfig {
                work: non_empty_path(cli.work),
                technology: cli.technology.filter(|t| !t.is_empty()),
            },
            configure: ConfigureConfig {
                input_dir: non_empty_path(cli.input_directory),
                config_dir: non_empty_path(cli.config_directory),
                install_path: cli.install_path,
                fullstack: cli.fullstack,
                tenant: cli.tenant,
                pod_attributes: cli.attributes,
                container_attributes: cli.container_attributes,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        std::iter::once("bootstrapper")
            .chain(raw.iter().copied())
            .map(ToString::to_string)
            .collect()
    }

    fn parse(raw: &[&str]) -> Cli {
        Cli::try_parse_from(filter_unknown_flags(args(raw))).expect("parse")
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn minimal_flags_use_defaults() {
        let cli = parse(&["--source=/src", "--target", "/dst"]);
        let config = BootstrapperConfig::from(cli);

        assert_eq!(config.source, PathBuf::from("/src"));
        assert_eq!(config.target, PathBuf::from("/dst"));
        assert!(!config.debug);
        assert!(!config.suppress_errors);
        assert_eq!(config.mover, MoveConfig::default());
        assert_eq!(config.configure, ConfigureConfig::default());
    }

    #[test]
    fn all_flags_are_mapped() {
        let cli = parse(&[
            "--source=/src",
            "--target=/dst",
            "--work=/work",
            "--technology=java,php",
            "--input-directory=/input",
            "--config-directory=/config",
            "--install-path=/opt/agent",
            "--fullstack",
            "--tenant=abc",
            "--attribute=k8s.pod.name=pod",
            "--attribute",
            "beep=boop",
            "--attribute-container={\"k8s.container.name\":\"app\"}",
            "--debug",
            "--suppress-error=true",
        ]);
        let config = BootstrapperConfig::from(cli);

        assert!(config.debug);
        assert!(config.suppress_errors);
        assert_eq!(config.mover.work, Some(PathBuf::from("/work")));
        assert_eq!(config.mover.technology.as_deref(), Some("java,php"));
        assert_eq!(config.configure.input_dir, Some(PathBuf::from("/input")));
        assert_eq!(config.configure.config_dir, Some(PathBuf::from("/config")));
        assert_eq!(config.configure.install_path, "/opt/agent");
        assert!(config.configure.fullstack);
        assert_eq!(config.configure.tenant(), Some("abc"));
        assert_eq!(config.configure.pod_attributes, ["k8s.pod.name=pod", "beep=boop"]);
        assert_eq!(config.configure.container_attributes.len(), 1);
    }

    #[test]
    fn bool_flags_accept_explicit_values() {
        let cli = parse(&["--source=/s", "--target=/t", "--debug=false", "--fullstack=true"]);
        assert!(!cli.debug);
        assert!(cli.fullstack);
    }

    #[test]
    fn empty_optional_values_are_unset() {
        let cli = parse(&[
            "--source=/s",
            "--target=/t",
            "--work=",
            "--technology=",
            "--config-directory=",
        ]);
        let config = BootstrapperConfig::from(cli);

        assert!(config.mover.work.is_none());
        assert!(config.mover.technology.is_none());
        assert!(config.configure.config_dir.is_none());
    }

    #[test]
    fn unknown_flags_are_dropped() {
        let filtered = filter_unknown_flags(args(&[
            "--source=/s",
            "--unknown",
            "value",
            "--other=x",
            "--bare",
            "--target=/t",
        ]));

        assert_eq!(filtered, args(&["--source=/s", "--target=/t"]));
    }

    #[test]
    fn unknown_flag_does_not_take_a_known_flag() {
        let cli = parse(&["--unknown", "--source", "/s", "--target=/t"]);
        assert_eq!(cli.source, PathBuf::from("/s"));
    }

    #[test]
    fn stray_arguments_are_ignored() {
        let cli = parse(&["--source=/s", "--target=/t", "stray", "another"]);
        assert_eq!(cli.rest, ["stray", "another"]);
        assert_eq!(cli.target, PathBuf::from("/t"));
    }

    #[test]
    fn missing_required_flag_is_an_error() {
        let result = Cli::try_parse_from(filter_unknown_flags(args(&[
            "--source=/s",
            "--suppress-error",
        ])));
        assert!(result.is_err());
    }
}
