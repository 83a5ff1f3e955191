//! Workflow state, export outcomes and the busy-flag guard.

use parking_lot::Mutex;

use crate::documents::{DocumentPayload, DocumentRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// Observable state of one mounted document page.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    pub phase: Phase,
    pub payload: Option<DocumentPayload>,
    pub error_message: Option<String>,
    pub downloading: bool,
    pub emailing: bool,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            payload: None,
            error_message: None,
            downloading: false,
            emailing: false,
        }
    }
}

impl WorkflowState {
    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready && self.payload.is_some()
    }
}

/// How an export action ended. The operator has already been told via the
/// platform; this is for callers and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Printed,
    Downloaded { filename: String },
    Emailed { recipient: String },
    /// The operator declined the email confirmation.
    Declined,
    /// Email dispatch is not live for this kind yet.
    ComingSoon,
    /// The same action is already in flight.
    Busy,
    /// No document is loaded.
    NotReady,
    Failed { message: String },
}

/// Everything the workflow owns, behind one lock.
#[derive(Debug, Default)]
pub(crate) struct Inner {
    pub state: WorkflowState,
    pub raw_loan_id: String,
    pub request: Option<DocumentRequest>,
    pub rendered: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportFlag {
    Downloading,
    Emailing,
}

impl ExportFlag {
    fn slot(self, state: &mut WorkflowState) -> &mut bool {
        match self {
            ExportFlag::Downloading => &mut state.downloading,
            ExportFlag::Emailing => &mut state.emailing,
        }
    }
}

/// Holds an export flag raised; lowers it again when dropped, whichever way
/// the action exits.
pub(crate) struct BusyGuard<'a> {
    inner: &'a Mutex<Inner>,
    flag: ExportFlag,
}

impl<'a> BusyGuard<'a> {
    /// Raise `flag` if a document is loaded and the flag is not already up.
    pub fn claim(inner: &'a Mutex<Inner>, flag: ExportFlag) -> Result<Self, ExportOutcome> {
        let mut guard = inner.lock();
        if !guard.state.is_ready() {
            return Err(ExportOutcome::NotReady);
        }
        let slot = flag.slot(&mut guard.state);
        if *slot {
            return Err(ExportOutcome::Busy);
        }
        *slot = true;
        Ok(Self { inner, flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut guard = self.inner.lock();
        *self.flag.slot(&mut guard.state) = false;
    }
}
