// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs, Debug, Default)]
/// ntdiff - Pairwise nucleotide differences across an alignment
pub struct Args {
    /// path to the FASTA alignment
    #[argh(positional)]
    pub alignment: Option<String>,

    /// summary report file (default: pairwise_nucleotide_diff_results.txt)
    #[argh(option, short = 'o')]
    pub output: Option<String>,

    /// raw pairwise differences file (default: pairwise_differences.txt)
    #[argh(option)]
    pub data_output: Option<String>,

    /// histogram PNG file (default: derived from the summary file name)
    #[argh(option)]
    pub histogram: Option<String>,

    /// do not write a histogram
    #[argh(switch)]
    pub no_histogram: bool,

    /// number of histogram bins (default: 20)
    #[argh(option)]
    pub bins: Option<usize>,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// pairs compared per parallel batch (default: 4096)
    #[argh(option)]
    pub batch_size: Option<usize>,

    /// also write a JSON summary to this file
    #[argh(option)]
    pub json: Option<String>,

    /// load and validate the alignment without comparing
    #[argh(switch)]
    pub dry_run: bool,

    /// hide the progress bar
    #[argh(switch)]
    pub no_progress: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
