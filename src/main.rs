use clap::{Args, Parser, Subcommand};
use paramvec::io::{load_description, load_qualities, load_records, load_scores, load_vectors};
use paramvec::{Converter, EncodingConfig, Merger};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Encode hyperparameter records into numeric vectors and back
#[derive(Parser, Debug)]
#[command(name = "paramvec")]
#[command(about = "Encode hyperparameter records into numeric vectors and back", long_about = None)]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one vector per record of the params file
    Encode(Inputs),
    /// Print the records recovered from a vectors file
    Decode {
        #[command(flatten)]
        inputs: Inputs,

        /// Vectors to decode (JSON array of arrays)
        #[arg(long)]
        vectors: PathBuf,
    },
    /// Print the group size of every encoded field
    Layout(Inputs),
    /// Print the merged training set (parameter vectors + task qualities, scores)
    Merge {
        #[command(flatten)]
        inputs: Inputs,

        /// Scores per task
        #[arg(long)]
        scores: PathBuf,

        /// Dataset qualities per task
        #[arg(long)]
        qualities: PathBuf,
    },
}

#[derive(Args, Debug)]
struct Inputs {
    /// Parameter records grouped by task
    #[arg(short, long)]
    params: PathBuf,

    /// Field descriptions (list or OpenML flow document)
    #[arg(short, long)]
    description: PathBuf,

    /// Encoding configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Inputs {
    fn converter(&self) -> anyhow::Result<Converter> {
        let config = self.config()?;
        let batch = load_records(&self.params)?;
        let description = load_description(&self.description)?;
        info!("Loaded {} records, {} field descriptions", batch.len(), description.len());
        Ok(Converter::with_config(&batch, &description, config)?)
    }

    fn config(&self) -> anyhow::Result<EncodingConfig> {
        Ok(match &self.config {
            Some(path) => EncodingConfig::load(path)?,
            None => EncodingConfig::default(),
        })
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Encode(inputs) => {
            let converter = inputs.converter()?;
            let vectors = converter.get_vectors()?;
            info!("Encoded {} vectors of dimension {}", vectors.len(), converter.vector_dim());
            print_json(&vectors)?;
        }
        Command::Decode { inputs, vectors } => {
            let converter = inputs.converter()?;
            let vectors = load_vectors(&vectors)?;
            let mut records = Vec::with_capacity(vectors.len());
            for (i, result) in converter.reconstruct(&vectors).into_iter().enumerate() {
                match result {
                    Ok(record) => records.push(Some(record)),
                    Err(e) => {
                        warn!("Vector {} could not be decoded: {}", i, e);
                        records.push(None);
                    }
                }
            }
            print_json(&records)?;
        }
        Command::Layout(inputs) => {
            let converter = inputs.converter()?;
            print_json(converter.group_sizes())?;
        }
        Command::Merge {
            inputs,
            scores,
            qualities,
        } => {
            let config = inputs.config()?;
            let params = load_records(&inputs.params)?;
            let description = load_description(&inputs.description)?;
            let scores = load_scores(&scores)?;
            let qualities = load_qualities(&qualities)?;

            let merger = Merger::with_config(&params, &description, &scores, &qualities, config)?;
            let set = merger.merge()?;
            info!("Merged {} runs, input dimension {}", set.len(), set.input_dim());
            print_json(&set)?;
        }
    }

    Ok(())
}
