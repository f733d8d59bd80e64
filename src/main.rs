use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use version_check::catalog::loader::load_catalog;
use version_check::config::{ServerConfig, load_config};
use version_check::http::response::{ResponseFormat, render_body};
use version_check::http::server::{AppState, serve};
use version_check::logging::init_logging;
use version_check::version::checker::check_version;
use version_check::version::types::{ReleaseChannel, VersionDescriptor};

#[derive(Parser)]
#[command(name = "version-check")]
#[command(version, about = "Tells programs whether a newer release exists")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the check endpoints over HTTP
    Serve(ServeArgs),
    /// Check a single release against a catalog file
    Check(CheckArgs),
    /// Load a catalog file and list its releases
    Validate {
        /// Catalog file (.toml, .json or name=version lines)
        #[arg(long)]
        catalog: PathBuf,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Catalog file, overrides the config file
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Listen address, overrides the config file
    #[arg(long)]
    bind: Option<String>,
    /// Answer GET queries on /check and /program
    #[arg(long)]
    allow_get: bool,
    /// Write logs to this file instead of stdout
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl ServeArgs {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(catalog) = self.catalog {
            config.catalog = catalog;
        }
        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = Some(log_file);
        }
        config.allow_get |= self.allow_get;
        config.json_logs |= self.json_logs;
        Ok(config)
    }
}

#[derive(Args)]
struct CheckArgs {
    /// Catalog file (.toml, .json or name=version lines)
    #[arg(long)]
    catalog: PathBuf,
    /// Program name as listed in the catalog
    program: String,
    /// Version the client runs, e.g. 1.2
    version: String,
    /// Build number the client runs
    #[arg(long, default_value_t = 0)]
    build: u64,
    /// Channel the client runs: STABLE, RC, BETA or ALPHA
    #[arg(long, default_value = "STABLE")]
    channel: String,
    /// Consider releases on channels other than stable
    #[arg(long)]
    unstable: bool,
    /// Print the JSON body instead of the plain-text one
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => run_server(args.into_config()?),
        Command::Check(args) => run_check(args),
        Command::Validate { catalog } => run_validate(&catalog),
    }
}

fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let _guard = init_logging(config.log_file.as_deref(), config.json_logs)?;

    let catalog = load_catalog(&config.catalog)
        .with_context(|| format!("failed to load catalog {:?}", config.catalog))?;
    let state = AppState::new(catalog, config.allow_get);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(serve(&config.bind, state))
}

fn run_check(args: CheckArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(&args.catalog)?;
    let channel: ReleaseChannel = args.channel.parse()?;
    let client = VersionDescriptor::new(args.version.parse()?, args.build, channel);

    let result = check_version(&catalog, &args.program, &client, args.unstable)?;
    let format = if args.json {
        ResponseFormat::Json
    } else {
        ResponseFormat::Text
    };
    println!("{}", render_body(&result, format)?);
    Ok(())
}

fn run_validate(path: &Path) -> anyhow::Result<()> {
    let catalog = load_catalog(path)?;

    for (program, entry) in catalog.programs() {
        let releases: Vec<String> = entry.releases().map(|r| r.to_string()).collect();
        println!("{}: {}", program, releases.join(", "));
    }
    println!("{} programs OK", catalog.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use version_check::config::DEFAULT_BIND_ADDR;

    fn serve_config(args: &[&str]) -> anyhow::Result<ServerConfig> {
        let cli = Cli::try_parse_from(["version-check", "serve"].iter().chain(args))?;
        let Command::Serve(serve_args) = cli.command else {
            panic!("expected the serve subcommand");
        };
        serve_args.into_config()
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn flags_override_config_file() {
        let file = write_config(
            r#"
bind = "127.0.0.1:7000"
catalog = "/srv/catalog.toml"
log_file = "/var/log/version-check.log"
"#,
        );
        let path = file.path().to_str().unwrap();

        let config = serve_config(&[
            "--config",
            path,
            "--bind",
            "0.0.0.0:9000",
            "--allow-get",
            "--json-logs",
        ])
        .unwrap();

        assert_eq!(config.bind, "0.0.0.0:9000");
        assert_eq!(config.catalog, PathBuf::from("/srv/catalog.toml"));
        assert_eq!(
            config.log_file,
            Some(PathBuf::from("/var/log/version-check.log"))
        );
        assert!(config.allow_get);
        assert!(config.json_logs);
    }

    #[test]
    fn config_file_values_survive_absent_flags() {
        let file = write_config("allow_get = true\njson_logs = true\n");
        let path = file.path().to_str().unwrap();

        let config = serve_config(&["--config", path, "--catalog", "releases.json"]).unwrap();

        assert_eq!(config.bind, DEFAULT_BIND_ADDR);
        assert_eq!(config.catalog, PathBuf::from("releases.json"));
        assert!(config.allow_get);
        assert!(config.json_logs);
    }

    #[test]
    fn defaults_apply_without_config_file() {
        let config = serve_config(&[]).unwrap();

        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let result = serve_config(&["--config", "/nonexistent/version-check.toml"]);

        assert!(result.is_err());
    }
}
