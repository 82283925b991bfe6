use crate::error::{CadastroError, Result};
use crate::model::{ClientRecord, NewClient};
use crate::store::ClientStore;
use tracing::{info, warn};

use super::create;

/// An entry of a batch that was not registered.
#[derive(Debug)]
pub struct BatchFailure {
    /// 1-based position in the input
    pub position: usize,
    /// The CPF as given, for the report
    pub tax_id: String,
    pub error: CadastroError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub created: Vec<ClientRecord>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.created.len() + self.failed.len()
    }
}

/// Registers each client in turn with the same rules as a single create.
///
/// Rejected entries are collected and the batch moves on, so a later entry
/// may reuse a CPF an earlier rejected one carried. A storage failure stops
/// the batch; entries before it stay registered.
pub fn run<S: ClientStore + ?Sized>(
    store: &mut S,
    inputs: Vec<NewClient>,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    for (index, input) in inputs.into_iter().enumerate() {
        let tax_id = input.tax_id.trim().to_string();
        match create::run(store, input) {
            Ok(record) => report.created.push(record),
            Err(error) if error.is_validation() => {
                warn!(position = index + 1, cpf = %tax_id, %error, "batch entry rejected");
                report.failed.push(BatchFailure {
                    position: index + 1,
                    tax_id,
                    error,
                });
            }
            Err(error) => return Err(error),
        }
    }
    info!(
        created = report.created.len(),
        failed = report.failed.len(),
        "batch registered"
    );
    Ok(report)
}
