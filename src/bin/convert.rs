//! glog-convert
//!
//! Converts binary log files to text, in parallel. Outputs that are newer
//! than their input are left alone.

use std::path::PathBuf;
use std::thread;

use clap::Parser;
use crossbeam::channel;
use tracing_subscriber::{fmt, EnvFilter};

use glog::convert::{collect_inputs, convert_file, needs_conversion, to_out_path};

/// Binary log converter
#[derive(Parser, Debug)]
#[command(name = "glog-convert")]
#[command(about = "Convert glog binary logs (.log.bin) to text (.log.txt)")]
#[command(version)]
struct Args {
    /// Disable ANSI colors in the output
    #[arg(long)]
    no_color: bool,

    /// Worker threads (default: available parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Files or directories to convert
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();
    let coloring = !args.no_color;
    let workers = args
        .workers
        .or_else(|| thread::available_parallelism().ok().map(|n| n.get()))
        .unwrap_or(1)
        .max(1);

    let (tx, rx) = channel::bounded::<PathBuf>(workers);

    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let rx = rx.clone();
            thread::spawn(move || {
                for input in rx {
                    process_file(input, coloring);
                }
            })
        })
        .collect();
    drop(rx);

    for input in collect_inputs(&args.paths) {
        if tx.send(input).is_err() {
            break;
        }
    }
    drop(tx);

    for handle in handles {
        if handle.join().is_err() {
            tracing::error!("conversion worker panicked");
        }
    }
}

fn process_file(input: PathBuf, coloring: bool) {
    let output = to_out_path(&input);

    match needs_conversion(&input, &output) {
        Ok(false) => return,
        Ok(true) => {}
        Err(e) => {
            tracing::error!("processing {}: {}", input.display(), e);
            return;
        }
    }

    tracing::info!("processing {} ...", input.display());
    match convert_file(&input, &output, coloring) {
        Ok(stats) if stats.corruptions > 0 => tracing::warn!(
            "processing {} ... done, {} records, {} corrupted regions skipped",
            input.display(),
            stats.records,
            stats.corruptions
        ),
        Ok(stats) => tracing::info!(
            "processing {} ... done, {} records",
            input.display(),
            stats.records
        ),
        Err(e) => tracing::error!("processing {}: {}", input.display(), e),
    }
}
