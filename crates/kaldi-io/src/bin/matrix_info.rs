//! matrix-info - prints the dimensions and storage kind of a matrix as JSON.

use std::process::ExitCode;

use clap::Parser;
use kaldi_io::summary::summarize_matrix;
use log::error;
use serde_json::json;

#[derive(Parser)]
#[command(name = "matrix-info")]
#[command(about = "Print rows, cols and storage kind of a Kaldi matrix")]
#[command(version)]
struct Cli {
    /// Matrix descriptor, optionally with a range suffix such as `feats.ark:42[0:9]`
    rxfilename: String,
}

fn main() -> ExitCode {
    kaldi_io::util::logging::init();
    let cli = Cli::parse();

    match summarize_matrix(&cli.rxfilename) {
        Ok(summary) => {
            let out = json!({
                "rows": summary.rows,
                "cols": summary.cols,
                "kind": summary.kind.as_str(),
            });
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("failed to read matrix from {}: {err}", cli.rxfilename);
            ExitCode::FAILURE
        }
    }
}
