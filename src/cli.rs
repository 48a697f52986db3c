use std::path::{Path, PathBuf};

mod terminal;

use anyhow::Context;
use clap::ArgAction;
use license_page::{Error, Generator, Summary};
use tracing::instrument;

use terminal::Colorize;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// The path to the root of the project
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Where to write the page, relative to the root [default: licenses.html]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// The manifest to read, relative to the root [default: package.json]
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// The directory dependencies are installed into, relative to the root
    /// [default: `node_modules`]
    #[arg(long, value_name = "PATH")]
    modules_dir: Option<PathBuf>,

    /// The page title [default: Package Licenses]
    #[arg(long)]
    title: Option<String>,

    /// Leave development dependencies out of the page
    #[arg(long)]
    no_dev: bool,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let generator = self.generator()?;
        let summary = generator
            .generate()
            .map_err(|error| describe_failure(error, &generator.config().manifest))?;

        println!("{}", success_message(&generator.config().output).success());
        if let Some(message) = missing_message(summary) {
            println!("{}", message.warning());
        }
        Ok(())
    }

    /// Builds the generator: config file first, then command line overrides.
    #[instrument(level = "debug", skip(self))]
    fn generator(&self) -> anyhow::Result<Generator> {
        let mut generator = Generator::open(&self.root).context("failed to load configuration")?;

        let config = generator.config_mut();
        if let Some(output) = &self.output {
            config.output.clone_from(output);
        }
        if let Some(manifest) = &self.manifest {
            config.manifest.clone_from(manifest);
        }
        if let Some(modules_dir) = &self.modules_dir {
            config.modules_dir.clone_from(modules_dir);
        }
        if let Some(title) = &self.title {
            config.title.clone_from(title);
        }
        if self.no_dev {
            config.include_dev = false;
        }

        tracing::debug!(?config, "effective configuration");
        Ok(generator)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Attaches the user-facing label to a generation failure.
fn describe_failure(error: Error, manifest: &Path) -> anyhow::Error {
    let label = match error {
        Error::Manifest(_) => format!("failed to read or parse {}", manifest.display()),
        _ => "failed to generate license page".to_string(),
    };
    anyhow::Error::new(error).context(label)
}

fn success_message(output: &Path) -> String {
    format!("{} generated successfully.", output.display())
}

fn missing_message(summary: Summary) -> Option<String> {
    (summary.missing > 0).then(|| {
        format!(
            "{} of {} dependencies have no license file",
            summary.missing, summary.dependencies
        )
    })
}
