use clap::{Parser, Subcommand};
use imgrelay::handler::{ApiEvent, Handler};
use imgrelay::imaging::ImageData;
use imgrelay::operations::{self, OptionBag};
use imgrelay::storage::S3Store;
use imgrelay::trace::ExecutionTrace;
use imgrelay::{config, logging, output};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "imgrelay")]
#[command(about = "Image transform request handler")]
#[command(long_about = "\
Image transform request handler

Takes one uploaded image and an operation, runs the transform, stores the
original and the result in S3, and answers with a download link and an
execution trace.

Operations:

  resize-image       fit inside width x height (options: width, height, maintainRatio)
  image-to-bw        single-channel grayscale
  create-thumbnail   fit inside size x size (options: size)
  enhance-image      brightness, contrast, saturation factors (1.0 = unchanged)
  image-to-pdf       single-page PDF

Run 'imgrelay gen-config' to generate a documented imgrelay.toml.")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./imgrelay.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Handle one gateway event ({httpMethod, body}) and print the response
    Invoke {
        /// Event JSON file; reads stdin when omitted
        #[arg(long)]
        event: Option<PathBuf>,
    },
    /// Run a single transform on a local file, without storage
    Run {
        /// Operation identifier, e.g. create-thumbnail
        #[arg(long)]
        operation: String,
        /// Source image
        #[arg(long)]
        input: PathBuf,
        /// Where to write the result
        #[arg(long)]
        output: PathBuf,
        /// Options as a JSON object, e.g. '{"size": 128}'
        #[arg(long)]
        options: Option<String>,
    },
    /// Print a stock imgrelay.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init();

    match cli.command {
        Command::Invoke { event } => {
            let service_config = config::load_config(cli.config.as_deref())?;
            let raw = match event {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let event: ApiEvent = serde_json::from_str(&raw)?;
            let store = S3Store::new(&service_config.storage)?;
            let handler = Handler::new(service_config, Arc::new(store));
            let response = handler.handle(&event);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Run {
            operation,
            input,
            output: output_path,
            options,
        } => {
            let service_config = config::load_config(cli.config.as_deref())?;
            let options: OptionBag = match options {
                Some(json) => serde_json::from_str(&json)?,
                None => OptionBag::new(),
            };
            let bytes = std::fs::read(&input)?;
            let file_name = input.file_name().and_then(|n| n.to_str());
            let source = ImageData::new(bytes, file_name);

            let mut trace = ExecutionTrace::new();
            let result = match operations::dispatch(
                &operation,
                &source,
                &options,
                service_config.limits.max_output_pixels,
                &mut trace,
            ) {
                Ok(result) => result,
                Err(e) => {
                    output::print_trace(&trace);
                    return Err(e.into());
                }
            };
            std::fs::write(&output_path, &result.buffer)?;
            output::print_run_output(&operation, &result, &trace, &output_path);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
