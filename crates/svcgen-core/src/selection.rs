//! Selection and validation policy over contract matches.

use serde::Serialize;

use crate::contract::{ContractSet, ExtensionContract};
use crate::error::GenerateError;
use crate::matcher::MatchResult;

/// The single (contract, implementation) pair a module provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// The detected contract kind.
    pub contract: ExtensionContract,
    /// Fully-qualified name of its only implementation.
    pub implementation: String,
}

/// Applies the uniqueness rules, in order:
///
/// 1. no implementation of any contract is an error;
/// 2. implementations of more than one contract kind are an error;
/// 3. more than one implementation of the detected contract is an error;
/// 4. otherwise the one implementation is selected.
pub fn select(contracts: &ContractSet, matches: &MatchResult) -> Result<Selection, GenerateError> {
    let mut non_empty = matches.non_empty();
    let Some(found) = non_empty.next() else {
        return Err(GenerateError::NoImplementation {
            contracts: contracts.names(),
        });
    };
    if non_empty.next().is_some() {
        return Err(GenerateError::MultipleContractKinds {
            contracts: contracts.names(),
        });
    }

    match found.implementations.as_slice() {
        [implementation] => Ok(Selection {
            contract: found.contract.clone(),
            implementation: implementation.clone(),
        }),
        implementations => Err(GenerateError::AmbiguousImplementation {
            contract: found.contract.name().to_string(),
            implementations: implementations.to_vec(),
        }),
    }
}
