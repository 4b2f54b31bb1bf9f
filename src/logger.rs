use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{error, info, warn};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown logging level '{0}', expected one of INFO, WARNING, ERROR")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INFO" => Ok(Severity::Info),
            "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Receiver of the diagnostics produced by context conditions.
pub trait DiagnosticSink: Send + Sync {
    fn log_message(&self, message: String, level: Severity);
}

/// Collects every diagnostic in arrival order. Diagnostics at or above
/// `logging_level` are also forwarded to the `log` facade.
#[derive(Debug)]
pub struct Logger {
    logging_level: Severity,
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Severity::Info)
    }
}

impl Logger {
    pub fn new(logging_level: Severity) -> Self {
        Self {
            logging_level,
            diagnostics: Mutex::new(Vec::new()),
        }
    }

    pub fn logging_level(&self) -> Severity {
        self.logging_level
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn has_message_contains(&self, text: &str) -> bool {
        self.lock()
            .iter()
            .any(|diagnostic| diagnostic.message.contains(text))
    }
}

impl DiagnosticSink for Logger {
    fn log_message(&self, message: String, level: Severity) {
        if level >= self.logging_level {
            match level {
                Severity::Error => error!("{}", message),
                Severity::Warning => warn!("{}", message),
                Severity::Info => info!("{}", message),
            }
        }
        self.lock().push(Diagnostic {
            severity: level,
            message,
        });
    }
}
