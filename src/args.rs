use clap::Parser;

use engine::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_EXPR_NESTING};

const CMD_NAME: &str = "sres";
const STDIN: &str = "-";

/// Stores our command-line args format.
#[derive(Parser, Debug)]
#[command(name = CMD_NAME, version, about = None, long_about = None)]
pub struct Args {
    /// Serialized value tree (JSON); '-' reads it from stdin
    #[arg(value_name = "TREE", default_value = STDIN)]
    pub tree: String,

    /// Context data (a JSON mapping); defaults to an empty context
    #[arg(short, long, value_name = "FILE")]
    #[arg(env = "STORY_RESOLVER_CONTEXT")]
    pub context: Option<String>,

    /// Maximum nesting depth of the tree
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    #[arg(env = "STORY_RESOLVER_MAX_DEPTH")]
    pub max_depth: usize,

    /// Maximum bracket nesting inside one expression
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_EXPR_NESTING)]
    #[arg(env = "STORY_RESOLVER_MAX_EXPR_NESTING")]
    pub max_expr_nesting: usize,

    /// Retry all-digit path segments as mapping keys
    #[arg(long)]
    pub numeric_key_fallback: bool,

    /// Pretty-print the resolved value
    #[arg(short, long)]
    pub pretty: bool,

    /// Print additional debugging info (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
