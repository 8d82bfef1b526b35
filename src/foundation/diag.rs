/// Severity of the short status line attached to an evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    /// A fatal error aborted the evaluation.
    Error,
    /// The evaluation completed but dropped or defaulted some input.
    Warning,
    /// Nothing to report; any prior status should be cleared.
    Info,
}

/// Ordered warning list plus a short (~32 char) status line.
///
/// Warnings accumulate in encounter order and evaluation continues past
/// them. The first warning sets the status line; later warnings only append.
/// A fatal failure always overwrites the status. An empty `Diagnostics`
/// means "clear any previously shown status".
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostics {
    warnings: Vec<String>,
    status: Option<String>,
    fatal: bool,
}

impl Diagnostics {
    /// Empty diagnostics (informational, cleared status).
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a non-fatal warning.
    ///
    /// The status line is only taken from the first warning; subsequent
    /// calls append to the warning list without touching it.
    pub fn warn(&mut self, warning: impl Into<String>, status: impl Into<String>) {
        let warning = warning.into();
        tracing::debug!(warning = %warning, "validation warning");
        self.warnings.push(warning);
        if self.status.is_none() {
            self.status = Some(status.into());
        }
    }

    /// Record a fatal failure. Overwrites any warning-derived status.
    pub fn fail(&mut self, status: impl Into<String>) {
        self.fatal = true;
        self.status = Some(status.into());
    }

    /// Accumulated warnings, in encounter order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Current status line, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Tri-state severity of the evaluation this describes.
    pub fn severity(&self) -> Severity {
        if self.fatal {
            Severity::Error
        } else if self.warnings.is_empty() {
            Severity::Info
        } else {
            Severity::Warning
        }
    }

    /// True when nothing was recorded at all.
    pub fn is_empty(&self) -> bool {
        !self.fatal && self.warnings.is_empty() && self.status.is_none()
    }
}
