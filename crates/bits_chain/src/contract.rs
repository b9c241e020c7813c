use serde::{Deserialize, Serialize};

/// Published launchpad package.
pub const PACKAGE_ID: &str = "0xbc6f1b953c6d60218e39df93e45929898cc1d463f0473163b5ebbb19f535003a";
/// Shared object holding the token sale state.
pub const POOL_STATE_ID: &str =
    "0xa150222cfd213773d39608e9b4e20f769ef68fa4faac4cd9d740043cfa734853";
/// Shared object holding the staking pool.
pub const STAKE_POOL_ID: &str =
    "0xfa1af904bdaa1cccd91c27c2614dce6981c3b2220912e06de84e40c92aab346b";
pub const TOKEN_TYPE: &str =
    "0xbc6f1b953c6d60218e39df93e45929898cc1d463f0473163b5ebbb19f535003a::bits::BITS";
pub const NATIVE_TYPE: &str = "0x2::sui::SUI";
/// System clock shared object.
pub const CLOCK_OBJECT_ID: &str = "0x6";

/// Move module exposing every launchpad entry point.
pub const LAUNCHPAD_MODULE: &str = "launchpad";
pub const STAKE_INFO_STRUCT: &str = "StakeInfo";

/// Callable entry points of the launchpad module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    BuyTokens,
    StakeTokens,
    UnstakeTokens,
    ClaimRewards,
}

impl EntryPoint {
    pub fn function_name(&self) -> &'static str {
        match self {
            EntryPoint::BuyTokens => "buy_tokens",
            EntryPoint::StakeTokens => "stake_tokens",
            EntryPoint::UnstakeTokens => "unstake_tokens",
            EntryPoint::ClaimRewards => "claim_rewards",
        }
    }
}

/// Identifiers of the deployed launchpad contract.
///
/// [`ContractConfig::default`] returns the compiled-in deployment; other
/// values only exist for tests and local deployments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    pub package_id: String,
    pub pool_state_id: String,
    pub stake_pool_id: String,
    pub token_type: String,
    pub native_type: String,
    pub clock_id: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            package_id: PACKAGE_ID.into(),
            pool_state_id: POOL_STATE_ID.into(),
            stake_pool_id: STAKE_POOL_ID.into(),
            token_type: TOKEN_TYPE.into(),
            native_type: NATIVE_TYPE.into(),
            clock_id: CLOCK_OBJECT_ID.into(),
        }
    }
}

impl ContractConfig {
    /// Fully-qualified move-call target, e.g. `0x..::launchpad::buy_tokens`.
    pub fn target(&self, entry: EntryPoint) -> String {
        format!(
            "{}::{}::{}",
            self.package_id,
            LAUNCHPAD_MODULE,
            entry.function_name()
        )
    }

    /// Struct type of the per-position stake record owned by stakers.
    pub fn stake_info_type(&self) -> String {
        format!(
            "{}::{}::{}",
            self.package_id, LAUNCHPAD_MODULE, STAKE_INFO_STRUCT
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_use_launchpad_module() {
        let contract = ContractConfig::default();
        assert_eq!(
            contract.target(EntryPoint::BuyTokens),
            format!("{PACKAGE_ID}::launchpad::buy_tokens")
        );
        assert!(
            contract
                .target(EntryPoint::ClaimRewards)
                .ends_with("::launchpad::claim_rewards")
        );
    }

    #[test]
    fn stake_info_type_is_package_scoped() {
        let contract = ContractConfig::default();
        assert_eq!(
            contract.stake_info_type(),
            format!("{PACKAGE_ID}::launchpad::StakeInfo")
        );
    }

    #[test]
    fn token_type_lives_in_package() {
        assert!(TOKEN_TYPE.starts_with(PACKAGE_ID));
        assert_eq!(ContractConfig::default().native_type, "0x2::sui::SUI");
    }
}
