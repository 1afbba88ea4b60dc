use crate::tableau::{Matrix, Tableau};

/// Variables exchanged by one pivot
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct PivotInfo {
    pub row: usize,
    pub col: usize,
    /// Variable entering the basis
    pub entering: String,
    /// Variable leaving the basis
    pub leaving: String,
}

/// Snapshot of the tableau after an iteration
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub table: Matrix,
    /// Basic variable label of each structural row
    pub basis: Vec<String>,
    /// Absent on the initial tableau
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub pivot_info: Option<PivotInfo>,
}

/// Append-only log of tableau snapshots
#[derive(Debug, Default)]
pub struct StepRecorder {
    steps: Vec<Step>,
}

impl StepRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_initial(&mut self, tableau: &Tableau) {
        self.steps.push(Step {
            table: tableau.snapshot(),
            basis: tableau.basis_labels(),
            pivot_info: None,
        });
    }

    pub fn record_pivot(&mut self, tableau: &Tableau, info: PivotInfo) {
        self.steps.push(Step {
            table: tableau.snapshot(),
            basis: tableau.basis_labels(),
            pivot_info: Some(info),
        });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}
