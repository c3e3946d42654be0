/// Diagnostics reported while rendering a dashboard
///
/// Rendering never fails outright. Anything that stops a node from rendering
/// (unknown type, missing data, a failing handler) becomes a [`Diagnostic`]
/// handed to a [`DiagnosticsSink`].
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use survey_dash_schema::ComponentDescriptor;
use tracing::{error, info, warn};

/// Stable diagnostic codes
pub mod codes {
    pub const UNKNOWN_TYPE: &str = "unknown-type";
    pub const MISSING_DATA: &str = "missing-data";
    pub const INVALID_DATA: &str = "invalid-data";
    pub const INVALID_CONFIG: &str = "invalid-config";
    pub const HANDLER_FAILED: &str = "handler-failed";
    pub const UNRENDERABLE: &str = "unrenderable";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
}

impl Diagnostic {
    fn new(level: DiagnosticLevel, code: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            code: code.to_string(),
            message: message.into(),
            component_type: None,
            data_path: None,
        }
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, code, message)
    }

    pub fn warning(code: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warning, code, message)
    }

    pub fn info(code: &str, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, code, message)
    }

    /// Attach the type/wrapper tag and data path of the offending node
    pub fn for_node(mut self, descriptor: &ComponentDescriptor) -> Self {
        self.component_type = Some(descriptor.label().to_string());
        self.data_path = descriptor.data_path.clone();
        self
    }
}

/// Receiver for render diagnostics. Implementations must not panic or block.
pub trait DiagnosticsSink {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&self, d: &Diagnostic) {
        let component_type = d.component_type.as_deref().unwrap_or("");
        let data_path = d.data_path.as_deref().unwrap_or("");
        match d.level {
            DiagnosticLevel::Error => {
                error!(code = %d.code, component_type, data_path, "{}", d.message)
            }
            DiagnosticLevel::Warning => {
                warn!(code = %d.code, component_type, data_path, "{}", d.message)
            }
            DiagnosticLevel::Info => {
                info!(code = %d.code, component_type, data_path, "{}", d.message)
            }
        }
    }
}

/// Buffers diagnostics in memory, optionally forwarding them to `tracing`
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: RefCell<Vec<Diagnostic>>,
    forward: bool,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect and also log through [`TracingSink`]
    pub fn forwarding() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            forward: true,
        }
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn with_code(&self, code: &str) -> Vec<Diagnostic> {
        self.entries
            .borrow()
            .iter()
            .filter(|d| d.code == code)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl DiagnosticsSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        if self.forward {
            TracingSink.report(diagnostic);
        }
        self.entries.borrow_mut().push(diagnostic.clone());
    }
}
