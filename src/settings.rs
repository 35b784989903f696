use std::path::PathBuf;

use engine::ResolverConfig;

use crate::args::Args;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("both the tree and the context are set to read from stdin")]
    StdinTwice,
    #[error("max depth must be at least 1")]
    ZeroDepth,
    #[error("file \"{0}\" does not exist")]
    NoSuchFile(PathBuf),
}

/// Where a JSON document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn from_arg(arg: &str) -> Result<Self, Error> {
        if arg == "-" {
            return Ok(Self::Stdin);
        }
        let path = PathBuf::from(arg);
        if path.exists() {
            Ok(Self::File(path))
        } else {
            Err(Error::NoSuchFile(path))
        }
    }
}

/// Settings are like Args, except all the logic has
/// been applied so e.g. defaults are added in.
#[derive(Debug)]
pub struct Settings {
    pub tree: Input,
    /// `None` means an empty context.
    pub context: Option<Input>,
    pub resolver: ResolverConfig,
    pub pretty: bool,
    pub verbose: u8,
}

impl TryFrom<Args> for Settings {
    type Error = anyhow::Error;
    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let tree = Input::from_arg(&args.tree)?;
        let context = args.context.as_deref().map(Input::from_arg).transpose()?;
        if tree == Input::Stdin && context == Some(Input::Stdin) {
            return Err(Error::StdinTwice.into());
        }
        if args.max_depth == 0 {
            return Err(Error::ZeroDepth.into());
        }

        Ok(Self {
            tree,
            context,
            resolver: ResolverConfig {
                max_depth: args.max_depth,
                max_expr_nesting: args.max_expr_nesting,
                numeric_key_fallback: args.numeric_key_fallback,
            },
            pretty: args.pretty,
            verbose: args.verbose,
        })
    }
}
