mod args;
mod audio;
mod config;
mod error;
mod graph;
mod images;
mod openai;
mod publish;
mod script;
mod trends;
mod tts;
mod upload;
mod video;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use args::Args;
use config::Config;
use graph::GraphClient;
use images::{IMAGE_COUNT, gen_images};
use openai::OpenAi;
use publish::publish;
use script::script_for;
use trends::{TRENDS_RSS_URL, fetch_trending_topic};
use tts::tts;
use upload::ResumableUploader;
use video::{VideoSettings, build_video};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!("Starting reel pipeline for IG user {}", config.ig_user_id);

    run(&config, args.topic).await
}

async fn run(config: &Config, topic_override: Option<String>) -> anyhow::Result<()> {
    let http = reqwest::Client::builder()
        .user_agent(concat!("autoreel/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let topic = match topic_override {
        Some(topic) => {
            info!("Using topic override → {}", topic);
            topic
        }
        None => fetch_trending_topic(&http, TRENDS_RSS_URL, &config.trends_geo)
            .await
            .context("No trending topic available; pass --topic to choose one")?,
    };

    let openai = OpenAi::new(http.clone(), &config.openai_base, &config.openai_api_key);
    let script = script_for(&openai, &topic)
        .await
        .context("Script generation failed")?;

    let work_dir = tempfile::Builder::new().prefix("autoreel-").tempdir()?;
    info!("Created work directory '{}'", work_dir.path().display());

    let images = gen_images(&openai, &script.hook, IMAGE_COUNT, work_dir.path())
        .await
        .context("Image generation failed")?;
    let narration = tts(&openai, &script.narration, work_dir.path())
        .await
        .context("Narration synthesis failed")?;

    let video = build_video(&images, &narration, work_dir.path(), &VideoSettings::default())
        .context("Video assembly failed")?;

    let graph = GraphClient::from_config(http, config);
    let container_id = ResumableUploader::new(&graph)
        .upload(&video, &script.caption)
        .await
        .context("Resumable upload failed")?;

    let post_id = publish(&graph, &container_id)
        .await
        .with_context(|| format!("Container {} was uploaded but not published", container_id))?;

    info!("Process complete. Post {} is live.", post_id);
    Ok(())
}
