use anyhow::Context;
use clap::{Parser, ValueEnum};
use pn_client::api::{HttpRelayClient, RelayApi, API_BASE_URL_ENV, DEFAULT_API_BASE_URL};
use pn_client::highlight::{highlight_custom, HighlightedArticle};
use pn_client::render::{share_text, CustomLensView};
use pn_client::{LensCard, LensController};
use pn_core::{CustomLensRequest, LensId};
use pn_inference::{Config, FanoutMode, InferenceConfig, DEFAULT_ANALYSIS_MODEL, DEFAULT_CUSTOM_MODEL};
use pn_web::{create_app, AppState, ServerOptions};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Parses a backend timeout such as `60`, `45s`, `1500ms` or `2m`.
fn parse_timeout(value: &str) -> std::result::Result<Duration, String> {
    let value = value.trim();
    let split = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
    let (amount, unit) = value.split_at(split);
    let amount: u64 = amount
        .parse()
        .map_err(|_| format!("Timeout '{}' must start with a number", value))?;

    let timeout = match unit.trim() {
        "" | "s" => Duration::from_secs(amount),
        "ms" => Duration::from_millis(amount),
        "m" => Duration::from_secs(amount * 60),
        other => return Err(format!("Unknown timeout unit '{}', expected ms, s or m", other)),
    };
    if timeout.is_zero() {
        return Err("Timeout must be greater than zero".to_string());
    }
    Ok(timeout)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Html,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Reads news through five philosophical lenses", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Runs the HTTP relay in front of the language model backend
    Serve {
        #[arg(long, env = "PORT", default_value_t = 3000)]
        port: u16,
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// OpenAI-compatible endpoint, e.g. http://localhost:8080/v1
        #[arg(long, env = "OPENAI_BASE_URL")]
        base_url: Option<String>,
        /// Allowed CORS origin; any origin when unset
        #[arg(long, env = "FRONTEND_URL")]
        frontend_url: Option<String>,
        /// Built frontend to serve for non-API paths
        #[arg(long)]
        static_dir: Option<PathBuf>,
        #[arg(long, default_value = "openai", help = "Backend to use. Available models: openai (default), dummy")]
        model: String,
        #[arg(long, default_value = DEFAULT_ANALYSIS_MODEL)]
        analysis_model: String,
        #[arg(long, default_value = DEFAULT_CUSTOM_MODEL)]
        custom_model: String,
        #[arg(long, default_value = "parallel")]
        fanout: FanoutMode,
        /// Backend request timeout (e.g. 60s, 1500ms, 2m)
        #[arg(long, default_value = "60s", value_parser = parse_timeout)]
        timeout: Duration,
    },
    /// Analyzes an article through a running relay
    Analyze {
        /// File holding the article; use --text for inline text
        file: Option<PathBuf>,
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        /// Highlight the article for one lens
        #[arg(long, conflicts_with = "compare")]
        lens: Option<LensId>,
        /// Highlight the article for several lenses at once
        #[arg(long, value_delimiter = ',')]
        compare: Vec<LensId>,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        #[arg(long, env = API_BASE_URL_ENV, default_value = DEFAULT_API_BASE_URL)]
        server: String,
    },
    /// Builds a custom lens from strong and weak keywords
    Custom {
        file: Option<PathBuf>,
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,
        #[arg(long, value_delimiter = ',')]
        strong: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        weak: Vec<String>,
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        #[arg(long, env = API_BASE_URL_ENV, default_value = DEFAULT_API_BASE_URL)]
        server: String,
    },
}

fn read_article(file: Option<PathBuf>, text: Option<String>) -> anyhow::Result<String> {
    match (file, text) {
        (Some(path), _) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read article from {}", path.display())),
        (None, Some(text)) => Ok(text),
        (None, None) => anyhow::bail!("Provide an article file or --text"),
    }
}

fn render(article: &HighlightedArticle, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => article.plain_text(),
        OutputFormat::Markdown => article.to_markdown(),
        OutputFormat::Html => article.to_html(),
    }
}

fn relay_client(server: &str) -> anyhow::Result<HttpRelayClient> {
    let client = HttpRelayClient::new(
        server,
        Duration::from_secs(pn_client::api::DEFAULT_CLIENT_TIMEOUT_SECS),
    )?;
    info!("🔗 Using relay at {}", client.base_url());
    Ok(client)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            api_key,
            base_url,
            frontend_url,
            static_dir,
            model,
            analysis_model,
            custom_model,
            fanout,
            timeout,
        } => {
            let inference_config = InferenceConfig {
                base_url,
                analysis_model,
                custom_model,
                timeout,
                fanout,
            };
            let config = Config {
                api_key,
                model_name: Some(model),
                inference_config: inference_config.clone(),
            };
            let inference = pn_inference::models::create_model(Some(config)).await?;
            info!("🧠 Inference model initialized successfully (using {})", inference.name());

            let options = ServerOptions {
                frontend_url,
                static_dir,
            };
            let app = create_app(AppState::new(inference, &inference_config), &options);
            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            pn_web::serve(addr, app).await?;
        }
        Commands::Analyze {
            file,
            text,
            lens,
            compare,
            format,
            server,
        } => {
            let article = read_article(file, text)?;
            let mut controller = LensController::new(relay_client(&server)?);
            controller.submit_article(&article).await?;
            info!("✨ Analysis complete");

            if let Some(lens) = lens {
                let view = controller.select_lens(lens)?;
                println!("{}\n", view.card.to_text());
                println!("{}", render(&view.article, format));
            } else if !compare.is_empty() {
                let mut last = None;
                for lens in compare {
                    last = Some(controller.toggle_lens_for_comparison(lens)?);
                }
                if let Some(view) = last {
                    for card in &view.cards {
                        println!("{}\n", card.to_text());
                    }
                    println!("{}", render(&view.article, format));
                }
            } else if let Some(analysis) = &controller.state().analysis {
                for (lens, result) in analysis.iter() {
                    println!("{}\n", LensCard::new(lens, result).to_text());
                }
            }
        }
        Commands::Custom {
            file,
            text,
            strong,
            weak,
            format,
            server,
        } => {
            let article = read_article(file, text)?;
            let client = relay_client(&server)?;
            let request = CustomLensRequest {
                news_text: article.trim().to_string(),
                strong_keywords: strong,
                weak_keywords: weak,
            }
            .with_defaults();

            let lens = client.create_custom_lens(&request).await?;
            info!("🎨 Custom lens created: {}", lens.display_name());
            println!("{}\n", CustomLensView::from(&lens).to_text());
            println!("{}\n", render(&highlight_custom(&request.news_text, &lens), format));
            println!("{}", share_text(Some(&lens)));
        }
    }

    Ok(())
}
