use crate::syntax::DEFAULT_MAX_DEPTH;

#[derive(clap::Parser, Debug)]
#[clap(about, long_about = None)]
pub(crate) struct Cli {
    /// What to print for each expression
    #[arg(short, long)]
    #[clap(value_enum, default_value_t = OutputMode::Eval)]
    pub mode: OutputMode,

    /// Reject expressions whose tree is taller than this
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Process a single expression instead of reading lines from stdin
    pub expr: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputMode {
    /// Print `=<value>`
    Eval,
    /// Print the syntax tree
    Tree,
}
