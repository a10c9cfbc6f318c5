//! CLI argument parsing for the AMR setup workflow.
//!
//! The CLI only collects options; `config` turns them into a `RunConfig`.
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default name of the checked MDU QC file.
pub const DEFAULT_QC_CHECKLIST: &str = "mdu_qc_checked.csv";
/// Default sample id when a single FASTA file is given.
pub const DEFAULT_PREFIX: &str = "abritamr";

#[derive(Parser, Debug)]
#[command(
    name = "abritamr",
    version,
    about = "Stage samples and run the AMR gene detection workflow",
    after_help = "Examples:\n  abritamr run --contigs assemblies.tab --jobs 8\n  abritamr run --amrfinder-output amrfinder.tab --keep\n  abritamr run --contigs sample.fa --prefix isolate7 --species Salmonella\n  abritamr check --contigs assemblies.tab --json\n  abritamr install-resources --out ~/.local/share/abritamr",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Run(RunArgs),
    Check(CheckArgs),
    InstallResources(InstallResourcesArgs),
}

/// Inputs shared by `run` and `check`.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Tab-delimited file of sample id and assembly path, or a single FASTA file
    #[arg(long, short = 'c', value_name = "FILE")]
    pub contigs: Option<PathBuf>,

    /// Tab-delimited file of sample id and amrfinder output path
    #[arg(long, value_name = "FILE")]
    pub amrfinder_output: Option<PathBuf>,

    /// Sample id used when --contigs is a single FASTA file
    #[arg(long, short = 'x', value_name = "NAME", default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Working directory (default: current directory)
    #[arg(long, short = 'w', value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Directory holding templates/ and utils/ (default: $ABRITAMR_RESOURCES)
    #[arg(long, short = 'r', value_name = "DIR")]
    pub resources: Option<PathBuf>,

    /// Run as part of MDU QC; requires the checked QC file
    #[arg(long, short = 'm')]
    pub mduqc: bool,

    /// Name of the checked MDU QC file
    #[arg(long, short = 'q', value_name = "FILE", default_value = DEFAULT_QC_CHECKLIST)]
    pub qc: PathBuf,

    /// Species for point mutation screening
    #[arg(long, short = 's', value_enum)]
    pub species: Option<Species>,

    /// Number of workflow jobs to run in parallel
    #[arg(
        long,
        short = 'j',
        default_value_t = 16,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub jobs: u32,

    /// Workflow engine command (default: $ABRITAMR_ENGINE or snakemake)
    #[arg(long, value_name = "CMD")]
    pub engine: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Validate inputs, stage samples and run the workflow")]
pub struct RunArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Keep intermediate files and engine logs
    #[arg(long, short = 'k')]
    pub keep: bool,

    /// Emit debug logging
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Validate inputs without staging or running anything")]
pub struct CheckArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Write the bundled workflow templates to a resources directory")]
pub struct InstallResourcesArgs {
    /// Resources directory to populate
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    /// Overwrite existing templates
    #[arg(long)]
    pub force: bool,
}

/// Species with point mutation support in amrfinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Species {
    #[value(name = "Acinetobacter_baumannii")]
    AcinetobacterBaumannii,
    #[value(name = "Campylobacter")]
    Campylobacter,
    #[value(name = "Enterococcus_faecalis")]
    EnterococcusFaecalis,
    #[value(name = "Enterococcus_faecium")]
    EnterococcusFaecium,
    #[value(name = "Escherichia")]
    Escherichia,
    #[value(name = "Klebsiella")]
    Klebsiella,
    #[value(name = "Salmonella")]
    Salmonella,
    #[value(name = "Staphylococcus_aureus")]
    StaphylococcusAureus,
    #[value(name = "Staphylococcus_pseudintermedius")]
    StaphylococcusPseudintermedius,
    #[value(name = "Streptococcus_agalactiae")]
    StreptococcusAgalactiae,
    #[value(name = "Streptococcus_pneumoniae")]
    StreptococcusPneumoniae,
    #[value(name = "Streptococcus_pyogenes")]
    StreptococcusPyogenes,
    #[value(name = "Vibrio_cholerae")]
    VibrioCholerae,
}

impl Species {
    /// Organism name as amrfinder expects it.
    pub fn as_str(self) -> &'static str {
        match self {
            Species::AcinetobacterBaumannii => "Acinetobacter_baumannii",
            Species::Campylobacter => "Campylobacter",
            Species::EnterococcusFaecalis => "Enterococcus_faecalis",
            Species::EnterococcusFaecium => "Enterococcus_faecium",
            Species::Escherichia => "Escherichia",
            Species::Klebsiella => "Klebsiella",
            Species::Salmonella => "Salmonella",
            Species::StaphylococcusAureus => "Staphylococcus_aureus",
            Species::StaphylococcusPseudintermedius => "Staphylococcus_pseudintermedius",
            Species::StreptococcusAgalactiae => "Streptococcus_agalactiae",
            Species::StreptococcusPneumoniae => "Streptococcus_pneumoniae",
            Species::StreptococcusPyogenes => "Streptococcus_pyogenes",
            Species::VibrioCholerae => "Vibrio_cholerae",
        }
    }
}
