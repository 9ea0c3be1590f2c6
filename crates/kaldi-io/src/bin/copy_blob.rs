//! copy-blob - converts between blob objects and raw bytes.

use std::process::ExitCode;

use clap::Parser;
use kaldi_io::summary::{unwrap_blob, wrap_blob};
use log::{error, info};

#[derive(Parser)]
#[command(name = "copy-blob")]
#[command(about = "Copy the payload of a blob object to raw bytes, or wrap raw bytes as a blob")]
#[command(version)]
struct Cli {
    /// Input descriptor (a blob object, or raw bytes with --wrap)
    rxfilename: String,

    /// Output descriptor (raw bytes, or a blob object with --wrap)
    wxfilename: String,

    /// Read raw bytes and write them as a blob object
    #[arg(long)]
    wrap: bool,
}

fn main() -> ExitCode {
    kaldi_io::util::logging::init();
    let cli = Cli::parse();

    let result = if cli.wrap {
        wrap_blob(&cli.rxfilename, &cli.wxfilename)
    } else {
        unwrap_blob(&cli.rxfilename, &cli.wxfilename)
    };
    match result {
        Ok(len) => {
            info!("copied {len} bytes from {} to {}", cli.rxfilename, cli.wxfilename);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("failed to copy {} to {}: {err}", cli.rxfilename, cli.wxfilename);
            ExitCode::FAILURE
        }
    }
}
