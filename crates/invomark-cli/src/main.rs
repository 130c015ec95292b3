mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::annotate::StyleArgs;

#[derive(Parser)]
#[command(
    name = "invomark",
    version,
    about = "Annotate invoice PDFs with an index table and extract invoice values"
)]
struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Box and number every text line, then prepend an index table
    Annotate {
        /// PDF files or directories containing PDFs (default: current directory)
        inputs: Vec<PathBuf>,

        /// Where annotated copies are written
        #[arg(long, value_name = "DIR", default_value = "annotated_documents")]
        output_folder: PathBuf,

        #[command(flatten)]
        style: StyleArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Read configured invoice fields into output.xlsx and output.csv
    Extract {
        /// Directory with the invoice PDFs
        #[arg(long, value_name = "DIR", default_value = ".")]
        pdf_dir: PathBuf,

        /// JSON field configuration keyed by PDF file name
        #[arg(short, long, value_name = "FILE", default_value = "pdf_config.json")]
        config: PathBuf,

        /// Where output.xlsx and output.csv are written
        #[arg(long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "invomark=debug"
    } else {
        "invomark=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Annotate {
            inputs,
            output_folder,
            style,
            output,
        } => commands::annotate::run(inputs, output_folder, &style, &output),
        Commands::Extract {
            pdf_dir,
            config,
            output_dir,
            output,
        } => commands::extract::run(pdf_dir, config, output_dir, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
