use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "wlc",
    version,
    about = "wlc - worm-like chain force-extension relations, from the continuum model and from a cavity-method solution of the discrete chain.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Label the printed results and increase log verbosity (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output and progress display
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Temperature in kelvin. Forces are then read and printed in pN instead of kT/nm.
    #[arg(short = 'T', long, global = true, value_name = "KELVIN")]
    pub temperature: Option<f64>,

    /// Path to a solver configuration file in TOML format
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S convergence.tolerance=1e-8
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Relative extension of the continuum chain at a given force (exact formula).
    #[command(name = "rho_F")]
    RhoF(RhoFArgs),
    /// Force needed for a given relative extension of the continuum chain (exact formula).
    #[command(name = "F_rho")]
    FRho(FRhoArgs),
    /// Relative extension of the discrete chain from the cavity fixed point.
    #[command(name = "cavity_rho_F")]
    CavityRhoF(CavityArgs),
    /// Cavity elongation with its bB and JB derivatives and the correlation length.
    #[command(name = "cavity_rho_F_and_gradient")]
    CavityRhoFAndGradient(CavityArgs),
    /// Fit persistence and contour length to force-extension data.
    #[command(name = "Marko_fit")]
    MarkoFit(FitArgs),
}

#[derive(Args, Debug)]
pub struct RhoFArgs {
    /// Force, in kT/nm (or pN with -T)
    #[arg(value_name = "F", allow_negative_numbers = true)]
    pub force: f64,

    /// Persistence length in nm
    #[arg(value_name = "LPB")]
    pub lpb: f64,
}

#[derive(Args, Debug)]
pub struct FRhoArgs {
    /// Relative extension
    #[arg(value_name = "RHO", allow_negative_numbers = true)]
    pub rho: f64,

    /// Persistence length in nm
    #[arg(value_name = "LPB")]
    pub lpb: f64,
}

#[derive(Args, Debug)]
pub struct CavityArgs {
    /// Reduced force f
    #[arg(value_name = "F", allow_negative_numbers = true)]
    pub force: f64,

    /// Force coupling bB
    #[arg(value_name = "BB", allow_negative_numbers = true)]
    pub bb: f64,

    /// Segment-segment coupling JB
    #[arg(value_name = "JB", allow_negative_numbers = true)]
    pub jb: f64,

    #[command(flatten)]
    pub solver: SolverArgs,
}

/// Overrides of the cavity solver configuration.
#[derive(Args, Debug, Default, Clone)]
pub struct SolverArgs {
    /// Number of cos(theta) quadrature points
    #[arg(long, value_name = "INT")]
    pub n_theta: Option<usize>,

    /// Number of phi quadrature points
    #[arg(long, value_name = "INT")]
    pub n_phi: Option<usize>,

    /// Convergence tolerance on the L1 change of the marginal
    #[arg(long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Maximum number of fixed-point iterations
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,
}

#[derive(Args, Debug)]
pub struct FitArgs {
    /// Data file with columns z [nm], F [kT/nm or pN with -T] and an optional uncertainty
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Initial persistence length in nm
    #[arg(value_name = "LPB")]
    pub lpb: f64,

    /// Initial contour length in nm
    #[arg(value_name = "L")]
    pub contour_length: f64,

    /// Force-extension relation used as the fit model
    #[arg(long, value_enum, value_name = "MODEL")]
    pub model: Option<ModelArg>,

    /// Maximum number of Levenberg-Marquardt iterations
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelArg {
    /// Exact variational relation
    Exact,
    /// Interpolation formula of Marko and Siggia
    #[value(name = "interp", alias = "interpolation")]
    Interp,
}
