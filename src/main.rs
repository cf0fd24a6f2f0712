use clap::{Parser, Subcommand};
use docfields::dataset::{split_train_validation, Corpus};
use docfields::document::read_boxes;
use docfields::inference::Vocabulary;
use docfields::labeling::LabelAligner;
use docfields::server::{self, AppState};
use docfields::utils::AppConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "docfields")]
#[command(about = "Character-level key field extraction from OCR'd receipts")]
struct Args {
    /// Configuration file; defaults to config/app_config.json when present
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the extraction API
    Serve {
        /// Overrides `host_url` from the configuration
        #[arg(long)]
        addr: Option<String>,
    },
    /// Print the linearized text of an OCR box file, or of every box file in a directory
    Linearize {
        input: PathBuf,
        /// Write `<key>.txt` files here instead of printing
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Align a labelled corpus and write the train/validation split as JSON
    Prepare {
        data_dir: PathBuf,
        #[arg(long, short = 'o', default_value = "data/dataset.json")]
        output: PathBuf,
    },
    /// Run the tagger on one OCR box file and print the extracted fields
    Extract { input: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docfields=info,tower_http=debug".into()),
        )
        .init();

    let config = AppConfig::resolve(args.config.as_deref())?;

    match args.command {
        Command::Serve { addr } => run_server(&config, addr).await?,
        Command::Linearize { input, output } => run_linearize(&input, output.as_deref())?,
        Command::Prepare { data_dir, output } => run_prepare(&config, &data_dir, &output)?,
        Command::Extract { input } => run_extract(&config, &input)?,
    }

    Ok(())
}

fn setup_ort() -> Result<(), Box<dyn std::error::Error>> {
    let dylib_path =
        env::var("ORT_DYLIB_PATH").unwrap_or_else(|_| "/usr/lib/libonnxruntime.so".to_string());

    ort::init_from(dylib_path).commit()?;

    Ok(())
}

async fn run_server(
    config: &AppConfig,
    addr: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = addr.unwrap_or_else(|| config.host_url.to_string());
    let socket_addr: std::net::SocketAddr = addr.parse()?;

    setup_ort()?;
    let extractor = server::initialize_extractor(config)?;

    server::start_server(socket_addr, AppState::new(extractor)).await?;

    Ok(())
}

fn run_linearize(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let texts = if input.is_dir() {
        Corpus::load_unlabelled_dir(input)?.texts()?
    } else {
        let key = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document")
            .to_string();
        [(key, docfields::document::linearize(read_boxes(input)?))]
            .into_iter()
            .collect()
    };

    match output {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            for (key, text) in &texts {
                fs::write(dir.join(format!("{key}.txt")), text)?;
            }
            tracing::info!("Wrote {} linearized documents to {}", texts.len(), dir.display());
        }
        None => {
            for (key, text) in &texts {
                println!("== {key}\n{text}");
            }
        }
    }

    Ok(())
}

fn run_prepare(
    config: &AppConfig,
    data_dir: &Path,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let corpus = Corpus::load_dir(data_dir)?;
    let prepared = corpus.prepare(&LabelAligner::default(), Vocabulary::receipt());

    let dataset =
        split_train_validation(prepared.examples, config.validation_size, config.split_seed);
    dataset.save(output)?;

    Ok(())
}

fn run_extract(config: &AppConfig, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    setup_ort()?;
    let extractor = server::initialize_extractor(config)?;

    let result = extractor.extract(read_boxes(input)?)?;
    println!("{}", serde_json::to_string_pretty(&result.fields)?);

    Ok(())
}
