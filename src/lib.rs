extern crate pest;
#[macro_use]
extern crate pest_derive;

pub mod ast;
pub mod cocos;
pub mod logger;
pub mod parser;
pub mod visitor;

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::info;
use ouroboros::self_referencing;

pub use ast::{Ast, AstKind};
pub use cocos::{CoCo, CoCosManager, CocoError};
pub use logger::{Diagnostic, DiagnosticSink, Logger, Severity};
pub use parser::parse_nestml_string;

#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// run the context conditions of a neuron on the rayon thread pool
    pub parallel: bool,
    /// diagnostics at or above this level are forwarded to the `log` facade
    pub logging_level: Severity,
    /// only check the neuron with this name
    pub neuron: Option<String>,
    /// only run these context conditions, all of them when empty
    pub cocos: Vec<String>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            logging_level: Severity::Info,
            neuron: None,
            cocos: Vec::new(),
        }
    }
}

/// A source file together with the tree parsed from it.
#[self_referencing]
pub struct ParsedFile {
    text: String,
    #[borrows(text)]
    #[covariant]
    unit: Ast<'this>,
}

impl ParsedFile {
    fn build(text: String, origin: &str) -> Result<Self> {
        ParsedFileTryBuilder {
            text,
            unit_builder: |text: &String| {
                parse_nestml_string(text).map_err(|e| anyhow!("{}", (*e).with_path(origin)))
            },
        }
        .try_build()
    }

    pub fn from_string(text: String) -> Result<Self> {
        Self::build(text, "<string>")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        Self::build(text, &path.display().to_string())
    }

    pub fn unit(&self) -> &Ast<'_> {
        self.borrow_unit()
    }

    pub fn text(&self) -> &str {
        self.borrow_text()
    }
}

/// Run the context conditions selected by `options` over an already parsed file.
pub fn check_parsed(parsed: &ParsedFile, options: &CheckOptions) -> Result<Logger> {
    let mut manager = CoCosManager::default();
    if !options.cocos.is_empty() {
        manager.retain_named(&options.cocos)?;
    }
    let logger = Logger::new(options.logging_level);
    let unit = parsed.unit();
    match &options.neuron {
        Some(name) => {
            let neuron = unit
                .as_compilation_unit()
                .and_then(|unit| unit.find_neuron(name))
                .ok_or_else(|| anyhow!("neuron {} not found", name))?;
            manager.check_neuron(neuron, &logger, options.parallel)?;
        }
        None => manager.check_compilation_unit(unit, &logger, options.parallel)?,
    }
    info!(
        "{} diagnostics, {} errors",
        logger.len(),
        logger.error_count()
    );
    Ok(logger)
}

/// Parse a `.nestml` file and run the context conditions over it.
pub fn check_file(path: impl AsRef<Path>, options: &CheckOptions) -> Result<Logger> {
    let path = path.as_ref();
    let parsed = ParsedFile::from_path(path)?;
    info!("parsed {}", path.display());
    check_parsed(&parsed, options).with_context(|| format!("while checking {}", path.display()))
}
