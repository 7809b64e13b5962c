// main.rs - CLI entry point

use std::path::Path;
use std::time::Instant;
use ntdiff::cli::Config;
use ntdiff::output::{write_histogram, write_json_summary};
use ntdiff::prelude::*;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let settings = validate_args(&args)?;

    println!("🚀 {}", ntdiff::get_info());

    // Configure thread pool
    if let Some(n) = settings.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        println!("🧵 Threads: {}", n);
    } else {
        let num_threads = rayon::current_num_threads();
        println!("🧵 Threads: {} (auto-detected)", num_threads);
    }

    let total_start = Instant::now();

    println!("🧬 Loading alignment from {}...", settings.alignment);
    let load_start = Instant::now();
    let store = SequenceStore::from_fasta(Path::new(&settings.alignment))?;
    println!(
        "✅ Loaded {} sequences × {} columns in {:.2}s",
        store.len(),
        store.width(),
        load_start.elapsed().as_secs_f64()
    );

    if args.dry_run {
        println!("✅ Dry run completed successfully");
        println!("📊 {} pairwise comparisons would be performed", pair_count(store.len()));
        return Ok(());
    }

    let cancel = CancelToken::on_interrupt()?;
    let summary = DistanceAggregator::new(&store)
        .with_batch_size(settings.batch_size)
        .with_cancel_token(cancel)
        .with_progress(settings.show_progress)
        .aggregate_with_report()?;

    match &summary.statistics {
        PairwiseStatistics::Available(stats) => {
            println!("\n📈 === PAIRWISE DIFFERENCES ===");
            println!("  • Median difference: {:.4}", stats.median_mismatch);
            println!("  • IQR: ({:.4}, {:.4})", stats.lower_quartile, stats.upper_quartile);
            println!("  • Median divergence: {:.4}", stats.median_divergence);
            println!("  • Total valid sites: {}", stats.total_valid_sites);
        }
        PairwiseStatistics::NoData(reason) => {
            println!("⚠️  {}", reason);
        }
    }

    write_summary(&settings.output, &settings.alignment, &summary)?;
    write_raw_differences(&settings.data_output, &summary)?;

    if let Some(path) = &settings.histogram {
        if !write_histogram(path, &summary.raw_distances(), settings.bins)? {
            println!("⚠️  No pairwise differences to plot, histogram not written");
        }
    }

    if let Some(path) = &settings.json {
        write_json_summary(path, &settings.alignment, &summary)?;
    }

    println!("\n🎉 Completed in {:.2}s", total_start.elapsed().as_secs_f64());
    Ok(())
}
