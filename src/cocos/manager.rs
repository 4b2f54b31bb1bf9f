use std::sync::{Mutex, PoisonError};

use log::{debug, info};
use rayon::prelude::*;

use crate::ast::Ast;
use crate::logger::{Diagnostic, DiagnosticSink, Severity};

use super::{
    expect_neuron, CoCo, CocoError, CorrectOrderInEquation, EachBlockUnique, OdeVariableDeclared,
    VariableOncePerScope,
};

/// local buffer for one context condition when they run in parallel
impl DiagnosticSink for Mutex<Vec<Diagnostic>> {
    fn log_message(&self, message: String, level: Severity) {
        self.lock().unwrap_or_else(PoisonError::into_inner).push(Diagnostic {
            severity: level,
            message,
        });
    }
}

/// Runs a set of context conditions over neurons, in registration order.
pub struct CoCosManager {
    cocos: Vec<Box<dyn CoCo>>,
}

impl Default for CoCosManager {
    fn default() -> Self {
        let mut manager = Self::new();
        manager.register(Box::new(EachBlockUnique));
        manager.register(Box::new(VariableOncePerScope));
        manager.register(Box::new(OdeVariableDeclared));
        manager.register(Box::new(CorrectOrderInEquation));
        manager
    }
}

impl CoCosManager {
    pub fn new() -> Self {
        Self { cocos: Vec::new() }
    }

    pub fn register(&mut self, coco: Box<dyn CoCo>) {
        self.cocos.push(coco);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.cocos.iter().map(|coco| coco.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.cocos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cocos.is_empty()
    }

    /// keep only the named context conditions, in their registration order
    pub fn retain_named<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), CocoError> {
        let registered = self.names();
        if let Some(unknown) = names
            .iter()
            .find(|name| !registered.iter().any(|known| *known == name.as_ref()))
        {
            return Err(CocoError::UnknownCoco(unknown.as_ref().to_string()));
        }
        self.cocos
            .retain(|coco| names.iter().any(|name| name.as_ref() == coco.name()));
        Ok(())
    }

    /// Run every context condition over one neuron. With `parallel`, each
    /// condition collects into its own buffer and the buffers are forwarded to
    /// `sink` in registration order, so the output matches a sequential run.
    pub fn check_neuron(
        &self,
        node: &Ast<'_>,
        sink: &dyn DiagnosticSink,
        parallel: bool,
    ) -> Result<(), CocoError> {
        let neuron = expect_neuron(node, "CoCosManager")?;
        info!(
            "checking neuron {} with {} context conditions",
            neuron.name,
            self.cocos.len()
        );
        if !parallel {
            for coco in &self.cocos {
                debug!("running {}", coco.name());
                coco.check_coco(node, sink)?;
            }
            return Ok(());
        }

        let buffers = self
            .cocos
            .par_iter()
            .map(|coco| -> Result<Vec<Diagnostic>, CocoError> {
                debug!("running {}", coco.name());
                let buffer: Mutex<Vec<Diagnostic>> = Mutex::new(Vec::new());
                coco.check_coco(node, &buffer)?;
                Ok(buffer.into_inner().unwrap_or_else(PoisonError::into_inner))
            })
            .collect::<Result<Vec<Vec<Diagnostic>>, CocoError>>()?;
        for diagnostic in buffers.into_iter().flatten() {
            sink.log_message(diagnostic.message, diagnostic.severity);
        }
        Ok(())
    }

    /// Run every context condition over each neuron of a compilation unit, in
    /// document order.
    pub fn check_compilation_unit(
        &self,
        node: &Ast<'_>,
        sink: &dyn DiagnosticSink,
        parallel: bool,
    ) -> Result<(), CocoError> {
        let unit = node.as_compilation_unit().ok_or(CocoError::InvalidInput {
            context: "CoCosManager",
            expected: "compilation unit",
            found: node.kind.name(),
        })?;
        for neuron in &unit.neurons {
            self.check_neuron(neuron, sink, parallel)?;
        }
        Ok(())
    }
}
