//! Preview CLI for the testimonial widget
//!
//! Fetches a campaign through the same loader the runtime uses and writes the
//! result as isolated-mode markup or as the standalone frame document.
//! Logs go to stderr so stdout stays clean for the rendered HTML.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use testimonial_widget::config::{
    ALLOW_FALLBACK_ATTRIBUTE, ANIMATION_ATTRIBUTE, LIMIT_ATTRIBUTE, SHOW_RATING_ATTRIBUTE,
    SORT_ATTRIBUTE, THEME_ATTRIBUTE, TITLE_ATTRIBUTE,
};
use testimonial_widget::error::CAMPAIGN_ATTRIBUTE;
use testimonial_widget::testimonial_feed::{CancelSignal, DataLoader, HttpTestimonialSource};
use testimonial_widget::{
    ConfigParser, ErrorView, RenderEngine, RuntimeOptions, Theme, View, WidgetConfig,
    render_frame_document,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputMode {
    /// Markup as it is written into the isolated root
    Inline,
    /// Standalone document served at the frame URL
    Frame,
}

#[derive(Parser, Debug)]
#[command(name = "testimonial-preview")]
#[command(about = "Render a testimonial campaign the way the embedded widget would")]
struct Cli {
    /// Campaign id (the data-campaign attribute)
    #[arg(long)]
    campaign: String,
    #[arg(long)]
    limit: Option<String>,
    /// newest, oldest or rating
    #[arg(long)]
    sort: Option<String>,
    /// light, dark, minimal or colorful
    #[arg(long)]
    theme: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    show_rating: Option<String>,
    #[arg(long)]
    animation: Option<String>,
    #[arg(long)]
    allow_fallback: Option<String>,
    /// Runtime options JSON file
    #[arg(long)]
    options: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputMode::Inline)]
    mode: OutputMode,
    /// Host page origin the frame document reports its height to
    #[arg(long, default_value = "http://localhost:8080")]
    parent_origin: String,
    /// Write to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl Cli {
    /// The flags as the host element attributes they stand in for.
    fn attributes(&self) -> HashMap<String, String> {
        let pairs = [
            (CAMPAIGN_ATTRIBUTE, Some(&self.campaign)),
            (LIMIT_ATTRIBUTE, self.limit.as_ref()),
            (SORT_ATTRIBUTE, self.sort.as_ref()),
            (THEME_ATTRIBUTE, self.theme.as_ref()),
            (TITLE_ATTRIBUTE, self.title.as_ref()),
            (SHOW_RATING_ATTRIBUTE, self.show_rating.as_ref()),
            (ANIMATION_ATTRIBUTE, self.animation.as_ref()),
            (ALLOW_FALLBACK_ATTRIBUTE, self.allow_fallback.as_ref()),
        ];
        pairs
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v.clone())))
            .collect()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the campaign loaded.
async fn run(cli: Cli) -> Result<bool> {
    let options = match &cli.options {
        Some(path) => RuntimeOptions::from_path(path)?,
        None => RuntimeOptions::default(),
    };
    let config = ConfigParser::parse(&cli.attributes())?;
    let theme = Theme::resolve(config.theme);

    let source = HttpTestimonialSource::with_timeout(&options.api_endpoint, options.request_timeout())?;
    let endpoint = source.endpoint().clone();
    let loader = DataLoader::new(Arc::new(source))
        .with_retry_policy(options.retry_policy())
        .with_timeout(options.request_timeout());

    let cancel = CancelSignal::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling request");
            on_interrupt.cancel();
        }
    });

    tracing::info!(
        "Loading campaign '{}' from {endpoint} (timeout {:?}, up to {} attempts)",
        config.campaign_id,
        loader.timeout(),
        loader.policy().total_attempts()
    );
    let engine = RenderEngine::new(options.version.clone());
    let loaded = loader.load(&config.query(), &cancel).await;

    let (html, ok) = match &loaded {
        Ok(items) => {
            tracing::info!("Loaded {} testimonials", items.len());
            (render(&cli, &engine, &View::Testimonials(items), &config, &theme), true)
        }
        Err(e) => {
            tracing::error!("Loading failed: {e}");
            let view = View::Error(ErrorView {
                message: "Testimonials are unavailable right now.",
                hint: None,
                offer_fallback: false,
            });
            (render(&cli, &engine, &view, &config, &theme), false)
        }
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("cannot write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{html}"),
    }
    Ok(ok)
}

fn render(
    cli: &Cli,
    engine: &RenderEngine,
    view: &View<'_>,
    config: &WidgetConfig,
    theme: &Theme,
) -> String {
    match cli.mode {
        OutputMode::Inline => engine.render(view, Some(config), theme).into_string(),
        OutputMode::Frame => render_frame_document(engine, view, config, theme, &cli.parent_origin),
    }
}
