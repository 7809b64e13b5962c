// ancestral_changes.rs - Count trait state changes along an annotated tree

use argh::FromArgs;
use std::path::Path;
use std::time::Instant;
use ntdiff::output::write_events_csv;
use ntdiff::phylo::{parse_tip_date, read_tree_file, ChangeCounter, ChangeLog, UNKNOWN_STATE};

#[derive(FromArgs)]
/// Count ancestral trait changes on a BEAST-annotated tree
struct Args {
    /// newick or NEXUS tree file
    #[argh(positional)]
    tree: String,

    /// events CSV file (default: annotated_tree_events.csv)
    #[argh(option, short = 'o', default = "String::from(\"annotated_tree_events.csv\")")]
    output: String,

    /// trait annotation to follow (default: region)
    #[argh(option, long = "trait", default = "String::from(\"region\")")]
    trait_name: String,

    /// date of the most recent tip, as a decimal year or YYYY-MM-DD
    #[argh(option)]
    last_tip_date: Option<String>,

    /// label used for nodes without the trait (default: UNKNOWN)
    #[argh(option, default = "String::from(UNKNOWN_STATE)")]
    unknown_label: String,
}

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let args: Args = argh::from_env();
    let start = Instant::now();

    println!("🚀 ancestral_changes v{}", ntdiff::VERSION);

    let last_tip = match &args.last_tip_date {
        Some(value) => Some(parse_tip_date(value).map_err(|e| e.to_string())?),
        None => None,
    };

    println!("🌳 Reading tree from {}...", args.tree);
    let tree = read_tree_file(Path::new(&args.tree))?;
    println!("✅ Tree: {}", tree.stats());

    match last_tip {
        Some(date) => println!("📅 Most recent tip: {:.6}", date),
        None => println!("⚠️  No --last-tip-date given, event times are heights from the root"),
    }

    let times = tree.absolute_times(last_tip);
    let log = ChangeCounter::new(&args.trait_name, &args.unknown_label).count(&tree, &times, ChangeLog::new());

    println!("🔄 Total number of state changes: {}", log.len());
    write_events_csv(&args.output, &log.events)?;

    println!("🎉 Completed in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}
