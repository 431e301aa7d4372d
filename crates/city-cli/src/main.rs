use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use city_api::{serve, CityApi, FeedConfig, ServerConfig};
use clap::{Args, Parser, Subcommand};
use contracts::{ApiError, EngineConfig, ExternalReading, ScenarioRequest, DEFAULT_TICK_INTERVAL_MS};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "city-cli",
    version,
    about = "Run the city pulse simulation as a service or inspect it offline"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the REST API and tick stream.
    Serve(ServeArgs),
    /// Print the full city state after some ticks.
    Snapshot(WorldArgs),
    /// Run n ticks and print status and predictions.
    Step {
        n: u64,
        #[arg(long, env = "CITY_SEED")]
        seed: Option<u64>,
    },
    /// Print the dashboard view after some ticks.
    Dashboard(WorldArgs),
    /// Project a what-if scenario against the state after some ticks.
    Scenario {
        /// Traffic increase, in percent.
        traffic: f64,
        /// Rainfall decrease, in percent.
        rainfall: f64,
        /// Energy increase, in percent.
        energy: f64,
        #[command(flatten)]
        world: WorldArgs,
    },
    /// Apply one external reading to a fresh world.
    Ingest {
        #[arg(long, allow_negative_numbers = true)]
        temperature: Option<f64>,
        #[arg(long)]
        humidity: Option<f64>,
        #[arg(long)]
        aqi: Option<f64>,
        #[arg(long)]
        rainfall: Option<f64>,
        #[arg(long, env = "CITY_SEED")]
        seed: Option<u64>,
    },
}

#[derive(Args, Debug)]
struct WorldArgs {
    /// Fixed noise seed; omitted means OS entropy.
    #[arg(long, env = "CITY_SEED")]
    seed: Option<u64>,
    /// Ticks to run before reporting.
    #[arg(long, default_value_t = 0)]
    ticks: u64,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, env = "CITY_ADDR", default_value = "127.0.0.1:3000")]
    addr: SocketAddr,
    #[arg(long, env = "CITY_SEED")]
    seed: Option<u64>,
    #[arg(long, env = "CITY_TICK_MS", default_value_t = DEFAULT_TICK_INTERVAL_MS)]
    tick_ms: u64,
    /// Poll Open-Meteo and splice live readings into the world.
    #[arg(long, env = "CITY_LIVE_FEED")]
    live_feed: bool,
    #[arg(long, default_value_t = city_api::DEFAULT_FEED_INTERVAL_SECS)]
    feed_interval_secs: u64,
    #[arg(long, allow_negative_numbers = true, default_value_t = city_api::DEFAULT_LATITUDE)]
    latitude: f64,
    #[arg(long, allow_negative_numbers = true, default_value_t = city_api::DEFAULT_LONGITUDE)]
    longitude: f64,
}

impl ServeArgs {
    fn into_config(self) -> Result<ServerConfig> {
        if self.tick_ms == 0 {
            bail!("--tick-ms must be at least 1");
        }
        if self.live_feed && self.feed_interval_secs == 0 {
            bail!("--feed-interval-secs must be at least 1");
        }

        let feed = self.live_feed.then(|| FeedConfig {
            latitude: self.latitude,
            longitude: self.longitude,
            interval: Duration::from_secs(self.feed_interval_secs),
            ..FeedConfig::default()
        });

        Ok(ServerConfig {
            addr: self.addr,
            engine: EngineConfig {
                seed: self.seed,
                tick_interval_ms: self.tick_ms,
            },
            feed,
        })
    }
}

impl WorldArgs {
    fn advanced_api(&self) -> CityApi {
        let mut api = offline_api(self.seed);
        api.step(self.ticks);
        api
    }
}

fn offline_api(seed: Option<u64>) -> CityApi {
    CityApi::from_config(EngineConfig {
        seed,
        ..EngineConfig::default()
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn api_failure(err: ApiError) -> anyhow::Error {
    match err.details {
        Some(details) => anyhow::anyhow!("{} ({details})", err.message),
        None => anyhow::anyhow!("{}", err.message),
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => {
            let config = args.into_config()?;
            info!(addr = %config.addr, live_feed = config.feed.is_some(), "starting city api");
            serve(config).await.context("city api server failed")?;
        }
        Command::Snapshot(world) => {
            print_json(&world.advanced_api().snapshot())?;
        }
        Command::Step { n, seed } => {
            let mut api = offline_api(seed);
            api.step(n);
            let status = api.status();
            println!("{}", status.engine);
            print_json(&api.world().predictions())?;
        }
        Command::Dashboard(world) => {
            print_json(&world.advanced_api().dashboard())?;
        }
        Command::Scenario {
            traffic,
            rainfall,
            energy,
            world,
        } => {
            let request = ScenarioRequest {
                traffic_increase: Some(traffic),
                rainfall_decrease: Some(rainfall),
                energy_increase: Some(energy),
            };
            let result = world
                .advanced_api()
                .run_scenario(request)
                .map_err(api_failure)?;
            print_json(&result)?;
        }
        Command::Ingest {
            temperature,
            humidity,
            aqi,
            rainfall,
            seed,
        } => {
            let mut api = offline_api(seed);
            let outcome = api
                .ingest(ExternalReading {
                    temperature,
                    humidity,
                    aqi,
                    rainfall,
                })
                .map_err(api_failure)?;
            print_json(&json!({
                "applied": outcome.applied,
                "environment": api.world().environment(),
                "health": api.world().health(),
            }))?;
        }
    }

    Ok(())
}
