//! wav-info - prints the header fields of a WAV file as JSON.

use std::process::ExitCode;

use clap::Parser;
use kaldi_io::summary::summarize_wave;
use log::error;
use serde_json::json;

#[derive(Parser)]
#[command(name = "wav-info")]
#[command(about = "Print sample rate, channels, sample count and duration of a WAV file")]
#[command(version)]
struct Cli {
    /// WAV descriptor: a path, `-` for standard input, or a `cmd |` pipe
    rxfilename: String,
}

fn main() -> ExitCode {
    kaldi_io::util::logging::init();
    let cli = Cli::parse();

    match summarize_wave(&cli.rxfilename) {
        Ok(info) => {
            // Streamed files carry no usable sample count.
            let out = json!({
                "samp_freq": info.samp_freq(),
                "num_channels": info.num_channels(),
                "samp_count": info.samp_count(),
                "duration": info.duration(),
                "streamed": info.is_streamed(),
            });
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("failed to read wave header from {}: {err}", cli.rxfilename);
            ExitCode::FAILURE
        }
    }
}
