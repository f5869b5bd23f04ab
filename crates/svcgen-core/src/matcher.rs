//! Matching enumerated classes against extension contracts.

use serde::Serialize;

use crate::contract::{ContractSet, ExtensionContract};
use crate::error::ResolveError;
use crate::resolver::TypeResolver;

/// Implementations found for one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractMatches {
    /// The contract.
    pub contract: ExtensionContract,
    /// Assignable classes in enumeration order.
    pub implementations: Vec<String>,
}

/// Implementations found for every known contract, in contract order.
///
/// Contracts with no implementations are present with an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchResult {
    matches: Vec<ContractMatches>,
}

impl MatchResult {
    /// Per-contract results in contract order.
    pub fn iter(&self) -> std::slice::Iter<'_, ContractMatches> {
        self.matches.iter()
    }

    /// Implementations of `contract`, empty if the contract is unknown.
    pub fn get(&self, contract: &ExtensionContract) -> &[String] {
        self.matches
            .iter()
            .find(|m| &m.contract == contract)
            .map(|m| m.implementations.as_slice())
            .unwrap_or(&[])
    }

    /// Contracts that have at least one implementation.
    pub fn non_empty(&self) -> impl Iterator<Item = &ContractMatches> {
        self.matches.iter().filter(|m| !m.implementations.is_empty())
    }

    /// Returns true if no contract has an implementation.
    pub fn is_empty(&self) -> bool {
        self.non_empty().next().is_none()
    }

    fn push(&mut self, contract: ExtensionContract, implementations: Vec<String>) {
        self.matches.push(ContractMatches {
            contract,
            implementations,
        });
    }
}

/// Finds the candidates assignable to one contract.
///
/// The contract is resolved first, so a classpath without it fails even
/// when there are no candidates. Any candidate that fails to resolve aborts
/// the search.
pub fn find_implementations(
    resolver: &mut TypeResolver,
    contract: &ExtensionContract,
    candidates: &[String],
) -> Result<Vec<String>, ResolveError> {
    resolver.resolve(contract.name())?;

    let mut implementations = Vec::new();
    for candidate in candidates {
        if resolver.is_assignable(candidate, contract.name())? {
            implementations.push(candidate.clone());
        }
    }
    Ok(implementations)
}

/// Runs [`find_implementations`] for every contract in the set.
pub fn match_contracts(
    resolver: &mut TypeResolver,
    contracts: &ContractSet,
    candidates: &[String],
) -> Result<MatchResult, ResolveError> {
    let mut result = MatchResult::default();
    for contract in contracts {
        let implementations = find_implementations(resolver, contract, candidates)?;
        result.push(contract.clone(), implementations);
    }
    Ok(result)
}
