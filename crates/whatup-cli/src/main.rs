//! whatup - check installed Helm releases for newer chart versions

use clap::Parser;
use miette::Result;
use std::path::PathBuf;
use whatup_core::{Settings, VersionMatch};
use whatup_kube::{Driver, TransportOptions};
use whatup_repo::{HelmPaths, IndexOrdering};

mod check;
mod config;
mod display;
mod error;
mod exit_codes;
mod logging;

use config::{OutputFormat, ReleaseInput, RunConfig};
use error::CliError;

#[derive(Parser, Debug)]
#[command(name = "whatup")]
#[command(author = "whatup Contributors")]
#[command(version)]
#[command(about = "Check if installed Helm releases have newer chart versions", long_about = None)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Include development versions: entries marked `apiVersion: prerelease`
    /// and any semver pre-release such as 1.1.0-rc.1
    #[arg(short, long)]
    devel: bool,

    /// Treat installed versions newer than the latest as up to date
    #[arg(long)]
    semver: bool,

    /// Enable TLS overrides for the cluster connection
    #[arg(long)]
    tls: bool,

    /// Path to the TLS CA certificate file
    #[arg(long, value_name = "PATH")]
    tls_ca_cert: Option<PathBuf>,

    /// Path to the TLS client certificate file
    #[arg(long, value_name = "PATH")]
    tls_cert: Option<PathBuf>,

    /// Path to the TLS client key file
    #[arg(long, value_name = "PATH")]
    tls_key: Option<PathBuf>,

    /// Server name used to verify the API server certificate
    #[arg(long, value_name = "NAME")]
    tls_hostname: Option<String>,

    /// Verify the API server certificate
    #[arg(long)]
    tls_verify: bool,

    /// Kubeconfig context to use
    #[arg(long, env = "HELM_KUBECONTEXT", value_name = "CONTEXT")]
    kube_context: Option<String>,

    /// Helm storage driver (secret or configmap)
    #[arg(long, env = "HELM_DRIVER", default_value = "secret")]
    driver: String,

    /// Path to repositories.yaml
    #[arg(long, value_name = "PATH")]
    repository_config: Option<PathBuf>,

    /// Directory holding cached repository indices
    #[arg(long, value_name = "DIR")]
    repository_cache: Option<PathBuf>,

    /// Additional index file to consult (repeatable)
    #[arg(long = "index-file", value_name = "PATH")]
    index_files: Vec<PathBuf>,

    /// Read releases from a YAML/JSON file instead of the cluster
    #[arg(long, value_name = "PATH")]
    releases_file: Option<PathBuf>,

    /// Re-sort index entries by version instead of trusting file order
    #[arg(long)]
    resort_indices: bool,

    /// Exit with status 2 when an outdated release is found
    #[arg(long)]
    fail_on_outdated: bool,

    /// Enable debug output
    #[arg(long, env = "HELM_DEBUG", value_parser = clap::builder::FalseyValueParser::new())]
    debug: bool,
}

impl Cli {
    /// Resolve flags and environment into the run configuration
    fn into_config(self) -> error::Result<RunConfig> {
        let paths = HelmPaths::resolve(self.repository_config, self.repository_cache)?;

        let releases = match self.releases_file {
            Some(path) => ReleaseInput::File(path),
            None => ReleaseInput::Cluster {
                driver: self.driver.parse::<Driver>()?,
                transport: TransportOptions {
                    tls: self.tls,
                    tls_ca_cert: self.tls_ca_cert,
                    tls_cert: self.tls_cert,
                    tls_key: self.tls_key,
                    tls_hostname: self.tls_hostname,
                    tls_verify: self.tls_verify,
                    // Helm exports an empty HELM_KUBECONTEXT when no context is chosen
                    kube_context: self.kube_context.filter(|c| !c.is_empty()),
                },
            },
        };

        let version_match = if self.semver {
            VersionMatch::Semver
        } else {
            VersionMatch::Exact
        };

        Ok(RunConfig {
            output: self.output,
            settings: Settings::new(self.devel, version_match),
            paths,
            index_files: self.index_files,
            ordering: if self.resort_indices {
                IndexOrdering::Resort
            } else {
                IndexOrdering::Trust
            },
            releases,
            fail_on_outdated: self.fail_on_outdated,
            styled: console::colors_enabled(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap's own exit code would collide with OUTDATED
            let _ = err.print();
            std::process::exit(if err.use_stderr() {
                exit_codes::USAGE_ERROR
            } else {
                exit_codes::SUCCESS
            });
        }
    };
    logging::init(cli.debug);

    let code = match cli.into_config() {
        Ok(config) => match check::run(&config).await {
            Ok(outdated) if outdated && config.fail_on_outdated => exit_codes::OUTDATED,
            Ok(_) => exit_codes::SUCCESS,
            Err(err) => report(err),
        },
        Err(err) => report(err),
    };

    if code != exit_codes::SUCCESS {
        std::process::exit(code);
    }
    Ok(())
}

/// Print an error with its diagnostic and return its exit code
fn report(err: CliError) -> i32 {
    let code = err.exit_code();
    eprintln!("{:?}", miette::Report::new(err));
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("whatup").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--repository-config", "/r.yaml", "--repository-cache", "/c"]);
        assert_eq!(cli.output, OutputFormat::Table);
        assert!(!cli.devel);

        let config = cli.into_config().unwrap();
        assert_eq!(config.settings, Settings::default());
        assert_eq!(config.ordering, IndexOrdering::Trust);
        assert_eq!(config.paths.repository_config, PathBuf::from("/r.yaml"));
        assert!(matches!(config.releases, ReleaseInput::Cluster { .. }));
    }

    #[test]
    fn test_output_aliases() {
        assert_eq!(parse(&["-o", "yml"]).output, OutputFormat::Yaml);
        assert_eq!(parse(&["--output", "json"]).output, OutputFormat::Json);
        assert_eq!(parse(&["-o", "short"]).output, OutputFormat::Short);
        assert!(Cli::try_parse_from(["whatup", "-o", "xml"]).is_err());
    }

    #[test]
    fn test_full_config() {
        let config = parse(&[
            "-d",
            "--semver",
            "--resort-indices",
            "--fail-on-outdated",
            "--repository-config",
            "/r.yaml",
            "--repository-cache",
            "/c",
            "--index-file",
            "/a.yaml",
            "--index-file",
            "/b.yaml",
            "--releases-file",
            "/releases.yaml",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.settings, Settings::new(true, VersionMatch::Semver));
        assert_eq!(config.ordering, IndexOrdering::Resort);
        assert!(config.fail_on_outdated);
        assert_eq!(
            config.index_files,
            vec![PathBuf::from("/a.yaml"), PathBuf::from("/b.yaml")]
        );
        assert_eq!(
            config.releases,
            ReleaseInput::File(PathBuf::from("/releases.yaml"))
        );
    }

    #[test]
    fn test_transport_options() {
        let config = parse(&[
            "--repository-config",
            "/r.yaml",
            "--repository-cache",
            "/c",
            "--driver",
            "configmap",
            "--tls",
            "--tls-verify",
            "--tls-ca-cert",
            "/ca.pem",
            "--tls-hostname",
            "api.internal",
            "--kube-context",
            "prod",
        ])
        .into_config()
        .unwrap();

        let ReleaseInput::Cluster { driver, transport } = config.releases else {
            panic!("expected cluster input");
        };
        assert_eq!(driver, Driver::ConfigMap);
        assert!(transport.tls && transport.tls_verify);
        assert_eq!(transport.tls_ca_cert, Some(PathBuf::from("/ca.pem")));
        assert_eq!(transport.tls_hostname.as_deref(), Some("api.internal"));
        assert_eq!(transport.kube_context.as_deref(), Some("prod"));
    }

    #[test]
    fn test_empty_kube_context_is_unset() {
        let config = parse(&[
            "--repository-config",
            "/r.yaml",
            "--repository-cache",
            "/c",
            "--kube-context",
            "",
        ])
        .into_config()
        .unwrap();

        let ReleaseInput::Cluster { transport, .. } = config.releases else {
            panic!("expected cluster input");
        };
        assert_eq!(transport.kube_context, None);
    }

    #[test]
    fn test_unsupported_driver() {
        let err = parse(&[
            "--repository-config",
            "/r.yaml",
            "--repository-cache",
            "/c",
            "--driver",
            "sql",
        ])
        .into_config()
        .unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USAGE_ERROR);
    }
}
