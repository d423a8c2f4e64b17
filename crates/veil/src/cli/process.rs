//! The `veil process` command: perturb a batch of images.
//!
//! Each image is processed independently; a failure logs the offending
//! filename and abandons that one output without stopping the batch. The
//! command's exit status reflects only whether the loop completed.

use std::path::PathBuf;

use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;

use veil_core::{CategoryToggles, Config, Obfuscator, OutputWriter, Sampler};

/// Arguments for the `process` command.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Image file or directory to process
    #[arg(required = true)]
    pub input: PathBuf,

    /// Directory where perturbed images are written
    #[arg(short, long, default_value = "modified_images")]
    pub output: PathBuf,

    /// Also insert emoji elements
    #[arg(long)]
    pub emoji: bool,

    /// Also insert decorative background elements
    #[arg(long)]
    pub decorative: bool,

    /// Seed the randomness source for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Execute the process command.
pub fn execute(config: Config, args: ProcessArgs) -> anyhow::Result<()> {
    let toggles = CategoryToggles {
        emoji: args.emoji,
        decorative: args.decorative,
    };
    let driver = Obfuscator::from_config(&config, &toggles);

    let files = driver.discover(&args.input);
    if files.is_empty() {
        tracing::warn!("No supported image files found at {:?}", args.input);
        return Ok(());
    }
    tracing::info!("Found {} image(s) to process", files.len());

    let writer = OutputWriter::new(&args.output, config.output.prefix.clone());
    writer.prepare()?;

    let mut sampler: Box<dyn Sampler> = match args.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };

    let progress = create_progress_bar(files.len() as u64);
    let mut succeeded: u64 = 0;
    let mut failed: u64 = 0;
    let start_time = std::time::Instant::now();

    for path in &files {
        match driver.process(path, sampler.as_mut()) {
            Ok(result) => match writer.write(&result) {
                Ok(written) => {
                    succeeded += 1;
                    tracing::debug!("Wrote {:?}", written);
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!("Failed: {:?} - {}", path, e);
                }
            },
            Err(e) => {
                failed += 1;
                tracing::error!("Failed: {:?} - {}", path, e);
            }
        }

        // Update progress bar with rate
        progress.inc(1);
        let elapsed = start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            let rate = (succeeded + failed) as f64 / elapsed;
            progress.set_message(format!("{:.1} img/sec", rate));
        }
    }

    progress.finish_and_clear();
    print_summary(succeeded, failed, start_time.elapsed());

    Ok(())
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after batch processing.
fn print_summary(succeeded: u64, failed: u64, elapsed: std::time::Duration) {
    let total = succeeded + failed;
    let rate = if elapsed.as_secs_f64() > 0.0 {
        succeeded as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", succeeded);
    if failed > 0 {
        eprintln!("    Failed:       {:>8}", failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
}
