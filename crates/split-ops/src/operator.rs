//! Host-facing wrappers that turn an operation's result into a report.

use serde::{Deserialize, Serialize};
use tracing::error;

use split_kernel::Tolerance;

use crate::bundle::MeshBundle;
use crate::config::SplitConfig;
use crate::repel::{execute_repel, SceneObject};
use crate::split::execute_split;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatorStatus {
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportLevel {
    Info,
    Error,
}

/// Outcome of one operator invocation, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorReport {
    pub status: OperatorStatus,
    pub level: ReportLevel,
    pub message: String,
}

impl OperatorReport {
    pub fn finished(message: impl Into<String>) -> Self {
        Self {
            status: OperatorStatus::Finished,
            level: ReportLevel::Info,
            message: message.into(),
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self {
            status: OperatorStatus::Cancelled,
            level: ReportLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == OperatorStatus::Finished
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Split the mesh along its selected face and report the result.
pub fn run_split_operator(mb: &mut dyn MeshBundle, config: &SplitConfig) -> OperatorReport {
    match execute_split(mb, config) {
        Ok(outcome) => {
            let mut message = format!(
                "Split along plane into {} pieces ({} and {} loop edges)",
                outcome.pieces.len() + 1,
                outcome.loops[0].len(),
                outcome.loops[1].len()
            );
            if !outcome.diagnostics.warnings.is_empty() {
                message.push_str(&format!("; {} warnings", outcome.diagnostics.warnings.len()));
            }
            OperatorReport::finished(message)
        }
        Err(err) => {
            error!(%err, "split cancelled");
            OperatorReport::cancelled(err.to_string())
        }
    }
}

/// Repel the selected objects and report the result.
pub fn run_repel_operator(objects: &mut [SceneObject], tolerance: &Tolerance) -> OperatorReport {
    match execute_repel(objects, tolerance) {
        Ok(outcome) => {
            let mut message = format!(
                "Repelled {} objects by {:.3}",
                outcome.moved.len(),
                outcome.average_radius
            );
            if !outcome.skipped.is_empty() {
                message.push_str(&format!("; left {} at the group center", outcome.skipped.join(", ")));
            }
            OperatorReport::finished(message)
        }
        Err(err) => {
            error!(%err, "repel cancelled");
            OperatorReport::cancelled(err.to_string())
        }
    }
}
