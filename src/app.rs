use std::io::Read;

use anyhow::{Context as _, Result};
use colored::Colorize;
use serde_json::Value as Json;

use engine::{Context, Resolver, Value, ValueNode};

use crate::settings::{Input, Settings};
use crate::ui::Ui;

/// This struct actually runs the command-line app.
pub struct App {
    /// Interpreted command line settings
    settings: Settings,
    /// User interface
    ui: Ui,
    resolver: Resolver,
}

impl App {
    /// Create a new `App`.
    pub fn new(settings: Settings) -> Self {
        let ui = Ui::new(&settings);
        let resolver = Resolver::new(settings.resolver);
        Self {
            settings,
            ui,
            resolver,
        }
    }

    /// Run the app: resolve the tree and print the result to stdout as JSON.
    pub fn run(mut self) -> Result<()> {
        let value = self.evaluate()?;
        let json = value.to_json();
        let out = if self.settings.pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        };
        println!("{out}");
        Ok(())
    }

    /// Load the tree and context named in the settings, and resolve them.
    pub fn evaluate(&mut self) -> Result<Value> {
        let context = self.load_context()?;
        let tree = self.load_tree()?;

        self.ui.verbose_progress("Resolving tree");
        self.ui.start_timer();
        let value = self
            .resolver
            .resolve(&tree, &context)
            .context("while resolving tree")?;
        self.ui.done();
        self.ui.print_elapsed("Resolving tree");

        if value.is_absent() && self.ui.verbose {
            eprintln!("{}", "Tree resolved to an absent value.".yellow());
        }
        Ok(value)
    }
}

// LOADING //////////////////
impl App {
    fn load_tree(&mut self) -> Result<ValueNode> {
        let json = self
            .read_json(&self.settings.tree)
            .context("while loading tree")?;

        self.ui.verbose_progress("Decoding tree");
        let tree = self.resolver.decode(&json).context("while decoding tree")?;
        self.ui.done();
        log::debug!("decoded tree: {tree:?}");
        Ok(tree)
    }

    fn load_context(&self) -> Result<Context> {
        match &self.settings.context {
            None => {
                log::info!("no context given; using an empty one");
                Ok(Context::default())
            }
            Some(input) => {
                let json = self.read_json(input).context("while loading context")?;
                Ok(Context::try_from(json)?)
            }
        }
    }

    fn read_json(&self, input: &Input) -> Result<Json> {
        let text = match input {
            Input::Stdin => {
                self.ui.verbose_progress("Reading stdin");
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .context("while reading stdin")?;
                text
            }
            Input::File(path) => {
                self.ui.verbose_progress_debug("Reading file", path);
                std::fs::read_to_string(path)
                    .with_context(|| format!("while reading file {path:?}"))?
            }
        };
        self.ui.done();
        Ok(serde_json::from_str(&text)?)
    }
}
