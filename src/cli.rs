//! CLI argument parsing and dispatch

use anyhow::Result;
use clap::Parser;

use launchctl::config::Config;
use launchctl::defaults;
use launchctl::http::ReqwestTransport;
use launchctl::output::{self, ColorChoice, ConsoleProgress, OutputConfig};
use launchctl::phases::{orchestrator, Context};
use launchctl::repository::DefaultGitOperations;
use launchctl::template::TemplateSyntax;

/// Environment variable overriding `--log-level`, in env_logger syntax.
const LOG_ENV: &str = "LAUNCHCTL_LOG";

/// launchctl - Bootstrap a GitHub repository and deployment project from a template
///
/// Requires GITHUB_TOKEN, plus DENO_DEPLOY_TOKEN for *deno flavours or
/// CLOUDFLARE_ACCOUNT_ID and CLOUDFLARE_API_TOKEN for *cloudflare flavours.
#[derive(Parser, Debug)]
#[command(name = "launchctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Template flavour, e.g. svelte-deno or astro-cloudflare
    flavour: String,

    /// Name of the new GitHub repository
    project_name: String,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,

    /// Placeholder delimiters used by the template's workflow file
    #[arg(
        long,
        value_name = "SYNTAX",
        value_enum,
        env = "LAUNCHCTL_TEMPLATE_SYNTAX",
        default_value_t = TemplateSyntax::Braces
    )]
    template_syntax: TemplateSyntax,

    /// GitHub account owning the template repositories
    #[arg(
        long,
        value_name = "OWNER",
        env = "LAUNCHCTL_TEMPLATE_OWNER",
        default_value = defaults::TEMPLATE_OWNER
    )]
    template_owner: String,
}

impl Cli {
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::from_choice(self.color)
    }

    fn init_logging(&self) {
        let _ = env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .parse_env(LOG_ENV)
            .format_timestamp(None)
            .try_init();
    }

    /// Execute the bootstrap and print its summary.
    pub fn execute(self, out: &OutputConfig) -> Result<()> {
        self.init_logging();

        let config = Config::from_env(&self.flavour, &self.project_name)?
            .with_template_owner(self.template_owner)
            .with_template_syntax(self.template_syntax);
        log::debug!("{:?}", config);
        println!("{}", output::banner_line(out));

        let http = ReqwestTransport::new()?;
        let git = DefaultGitOperations;
        let progress = ConsoleProgress::new(out.clone());
        let ctx = Context::new(&config, &http, &git, &progress);

        let summary = orchestrator::execute(&ctx)?;
        for line in output::summary_lines(out, &summary) {
            println!("{}", line);
        }
        Ok(())
    }
}
