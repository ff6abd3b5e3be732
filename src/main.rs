//! Generates the UnicodeHexMono font family.

mod args;
mod samples;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use hexmono_lib::generator::{self, GeneratorConfig};
use hexmono_lib::{css, preview, Metrics};

use args::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let metrics = load_metrics(cli.metrics.as_deref())?;
    let config = GeneratorConfig {
        out_dir: cli.out_dir.clone(),
        ..GeneratorConfig::default()
    };

    match cli.command {
        Command::Build(args) => {
            let config = args.configure(config);
            let report = generator::run(&config, &metrics).context("font generation failed")?;
            log::info!(
                "generated {} fonts in {:?}",
                report.fonts.len(),
                config.out_dir
            );
            if !args.no_css {
                css::write_css(&config.out_dir, &report.ranges(), &config.metadata)
                    .context("failed to write stylesheet")?;
            }
        }
        Command::Ascii(args) => {
            let config = args.configure_ascii(config);
            generator::run(&config, &metrics).context("ASCII font generation failed")?;
        }
        Command::Sample(args) => {
            let config = args.configure(config);
            let report = generator::run_sample(&config, &metrics, samples::SAMPLE_CODEPOINTS)
                .context("sample font generation failed")?;
            log::info!("wrote {:?}", report.otf);
            if let Some(woff2) = report.woff2 {
                log::info!("wrote {:?}", woff2);
            }
        }
        Command::Css => rescan_css(&config)?,
        Command::Preview { codepoints } => {
            for cp in codepoints {
                preview::write_preview(&config.out_dir, cp, &metrics)
                    .with_context(|| format!("failed to write preview for U+{:05X}", cp))?;
            }
        }
    }
    Ok(())
}

fn load_metrics(path: Option<&Path>) -> Result<Metrics> {
    match path {
        Some(path) => {
            Metrics::load(path).with_context(|| format!("failed to load metrics from {:?}", path))
        }
        None => Ok(Metrics::default()),
    }
}

fn rescan_css(config: &GeneratorConfig) -> Result<()> {
    let ranges = css::scan_dir(&config.out_dir)
        .with_context(|| format!("failed to scan {:?}", config.out_dir))?;
    css::write_css(&config.out_dir, &ranges, &config.metadata)
        .context("failed to write stylesheet")?;
    Ok(())
}
