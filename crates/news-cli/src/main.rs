mod render;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ml_client::{MLClient, MLConfig};
use news_analysis::{AnalysisConfig, AnalysisPipeline, AnalysisRequest, AudioSynthesisCoordinator, ReportBuilder};
use news_client::NewsApiClient;
use power_forecast::{LinearPowerModel, PowerForecaster, PowerModel, SolarConditions, SolarConditionsInput};
use report_core::AnalysisError;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "newspulse", author, version, about = "Company news sentiment reports and solar power forecasts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch recent news about a company and print a sentiment report
    Report(ReportArgs),
    /// Predict solar power output from weather readings
    Power(PowerArgs),
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Company name to search for
    company: Option<String>,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Generate a spoken summary as well
    #[arg(long)]
    audio: bool,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Cap on pairwise coverage comparisons
    #[arg(long, env = "MAX_COMPARISONS")]
    max_comparisons: Option<usize>,
}

#[derive(Args, Debug)]
struct PowerArgs {
    /// Distance to solar noon, in radians (0.0 to 1.5)
    #[arg(long)]
    distance: Option<f64>,

    /// Temperature in °F (42 to 78)
    #[arg(long)]
    temperature: Option<f64>,

    /// Wind direction sector (1 to 32)
    #[arg(long)]
    wind_direction: Option<f64>,

    /// Wind speed in mph (1.1 to 22.1)
    #[arg(long)]
    wind_speed: Option<f64>,

    /// Sky cover (0 to 4)
    #[arg(long)]
    sky_cover: Option<f64>,

    /// Relative humidity in percent (0 to 100)
    #[arg(long)]
    humidity: Option<f64>,

    /// Average wind speed over the period (0 to 30)
    #[arg(long)]
    average_wind_speed: Option<f64>,

    /// Average pressure over the period, inHg (29.64 to 30.39)
    #[arg(long)]
    average_pressure: Option<f64>,

    /// Linear model artifact to evaluate locally instead of calling the power service
    #[arg(long, env = "POWER_MODEL_PATH")]
    model_artifact: Option<PathBuf>,

    /// Plant capacity used for the efficiency figure
    #[arg(long, env = "PLANT_CAPACITY_MW")]
    capacity: Option<f64>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Report(args) => run_report(args).await,
        Commands::Power(args) => run_power(args).await,
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", classify(&err).user_message());
            ExitCode::FAILURE
        }
    }
}

/// Errors that did not come from the analysis pipeline are reported as unclassified.
fn classify(err: &anyhow::Error) -> AnalysisError {
    match err.downcast_ref::<AnalysisError>() {
        Some(analysis) => analysis.clone(),
        None => AnalysisError::Unclassified(format!("{:#}", err)),
    }
}

async fn run_report(args: ReportArgs) -> Result<ExitCode> {
    let company = args.company.unwrap_or_default();
    let api_key = args.api_key.unwrap_or_default();

    let mut missing = false;
    if company.trim().is_empty() {
        eprintln!("⚠ Please enter a company name");
        missing = true;
    }
    if api_key.trim().is_empty() {
        eprintln!("⚠ Please enter your NewsAPI key (--api-key or NEWSAPI_KEY)");
        missing = true;
    }
    if missing {
        return Ok(ExitCode::from(2));
    }

    let mut config = AnalysisConfig::from_env()?;
    if let Some(max) = args.max_comparisons {
        config.max_comparisons = max;
    }

    let ml = MLClient::new(MLConfig::default());
    let news = NewsApiClient::new(config.news_api_url.clone(), config.page_size);
    let mut pipeline = AnalysisPipeline::new(Arc::new(news), Arc::new(ml.annotator.clone()))
        .with_builder(ReportBuilder::new(config.max_comparisons));
    if args.audio {
        let audio = AudioSynthesisCoordinator::new(Arc::new(ml.speech.clone()), config.audio_cache_dir.clone())
            .with_summary_chars(config.summary_chars);
        pipeline = pipeline.with_audio(audio);
    }

    let request = AnalysisRequest {
        company,
        api_key: Some(api_key),
        include_audio: args.audio,
    };
    tracing::debug!(audio = args.audio, max_comparisons = config.max_comparisons, "Running report");
    let outcome = pipeline.run(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        print!("{}", render::render_report(&outcome.report));
    }
    if let Some(err) = outcome.audio_error {
        eprintln!("⚠ {}", err.user_message());
    }
    Ok(ExitCode::SUCCESS)
}

/// Flags the user left out, in form order.
fn missing_power_fields(args: &PowerArgs) -> Vec<&'static str> {
    let fields = [
        ("distance", args.distance),
        ("temperature", args.temperature),
        ("wind-direction", args.wind_direction),
        ("wind-speed", args.wind_speed),
        ("sky-cover", args.sky_cover),
        ("humidity", args.humidity),
        ("average-wind-speed", args.average_wind_speed),
        ("average-pressure", args.average_pressure),
    ];
    fields.iter().filter(|(_, v)| v.is_none()).map(|(n, _)| *n).collect()
}

async fn run_power(args: PowerArgs) -> Result<ExitCode> {
    let missing = missing_power_fields(&args);
    if !missing.is_empty() {
        for name in missing {
            eprintln!("⚠ Missing --{}", name);
        }
        return Ok(ExitCode::from(2));
    }

    let input = SolarConditionsInput {
        distance_to_solar_noon: args.distance.unwrap_or_default(),
        temperature: args.temperature.unwrap_or_default(),
        wind_direction: args.wind_direction.unwrap_or_default(),
        wind_speed: args.wind_speed.unwrap_or_default(),
        sky_cover: args.sky_cover.unwrap_or_default(),
        humidity: args.humidity.unwrap_or_default(),
        average_wind_speed: args.average_wind_speed.unwrap_or_default(),
        average_pressure: args.average_pressure.unwrap_or_default(),
    };
    let conditions = match SolarConditions::try_from(input) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("⚠ {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    let model: Arc<dyn PowerModel> = match &args.model_artifact {
        Some(path) => Arc::new(
            LinearPowerModel::load(path)
                .with_context(|| format!("failed to load power model from {}", path.display()))?,
        ),
        None => Arc::new(MLClient::new(MLConfig::default()).power),
    };
    let mut forecaster = PowerForecaster::new(model);
    if let Some(capacity) = args.capacity {
        forecaster = forecaster.with_capacity(capacity);
    }

    tracing::debug!("Forecasting with {} model", forecaster.model_name());
    let prediction = forecaster.forecast(&conditions).await?;
    print!("{}", render::render_prediction(&conditions, &prediction));
    Ok(ExitCode::SUCCESS)
}
