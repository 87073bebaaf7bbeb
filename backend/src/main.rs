//! Predict CLI - serve the prediction API or score files locally
//!
//! ```bash
//! predict serve                          # Start HTTP server (port 8000)
//! predict predict trips.csv -o out.json  # Score a CSV/JSON file
//! predict features trips.csv             # Show rows with derived features
//! ```

use clap::{Parser, Subcommand};
use predict::{
    compute_all, parse_file, predict_records, server::start_server, LinearModel, Predictor,
    ServerConfig,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "predict")]
#[command(about = "Batch predictions from CSV/JSON trip files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on (default: $PORT or 8000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Model definition file (default: $MODEL_PATH or model.json)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Built frontend directory (default: $STATIC_DIR or frontend/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Largest accepted upload in MiB (default: $UPLOAD_LIMIT_MB or 100)
        #[arg(long)]
        upload_limit_mb: Option<usize>,
    },

    /// Score a CSV or JSON file and output the results
    Predict {
        /// Input CSV or JSON file
        input: PathBuf,

        /// Model definition file (default: $MODEL_PATH or model.json)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a file and output rows with derived features
    Features {
        /// Input CSV or JSON file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            port,
            model,
            static_dir,
            upload_limit_mb,
        } => cmd_serve(port, model, static_dir, upload_limit_mb).await,

        Commands::Predict {
            input,
            model,
            output,
        } => cmd_predict(&input, model, output.as_deref()),

        Commands::Features { input, output } => cmd_features(&input, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(
    port: Option<u16>,
    model: Option<PathBuf>,
    static_dir: Option<PathBuf>,
    upload_limit_mb: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()
        .with_port(port)
        .with_model_path(model)
        .with_static_dir(static_dir)
        .with_upload_limit_mb(upload_limit_mb);

    start_server(config).await?;
    Ok(())
}

fn cmd_predict(
    input: &Path,
    model_path: Option<PathBuf>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env().with_model_path(model_path);
    let model = LinearModel::load(&config.model_path)?;

    eprintln!("📄 Processing: {}", input.display());
    let parsed = parse_file(input)?;
    eprintln!("   Format: {}", parsed.format);
    eprintln!("   Rows: {}", parsed.rows.len());

    let result = predict_records(&model, parsed.rows)?;
    eprintln!(
        "\n⚙️  Predicted: {} × {}",
        result.results.len(),
        model.output_name()
    );

    let json = serde_json::to_string_pretty(&serde_json::json!({ "results": result.results }))?;
    write_output(&json, output)?;

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_features(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing: {}", input.display());

    let mut parsed = parse_file(input)?;
    eprintln!("   Format: {}", parsed.format);

    compute_all(&mut parsed.rows)?;
    eprintln!("✅ {} rows enriched", parsed.rows.len());

    let json = serde_json::to_string_pretty(&parsed.rows)?;
    write_output(&json, output)?;

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
