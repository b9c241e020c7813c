use std::sync::Arc;

use anyhow::Context;
use bits_chain::{
    Account, ContractConfig, LedgerQuery, RpcConfigStore, SuiRpcClient, TransactionReceipt,
    Wallet, to_minor_units,
};
use bits_core::LaunchConfig;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::countdown::{self, REWARD_WAIT_MS};
use crate::error::LaunchError;
use crate::planner::{self, MIN_PURCHASE_GAS_BALANCE};
use crate::refresh::{self, BalanceSnapshot};
use crate::state::{ActiveTab, DashboardState};

/// Dashboard controller.
///
/// Owns the dashboard state and mediates between it, the wallet and the
/// ledger. Every mutating operation re-queries the ledger once the wallet
/// reports success.
///
/// Operations are not serialized: two overlapping stakes both go to the
/// wallet.
pub struct Launchpad {
    ledger: Arc<dyn LedgerQuery>,
    wallet: Arc<dyn Wallet>,
    contract: ContractConfig,
    clock: Arc<dyn Clock>,
    state: Arc<RwLock<DashboardState>>,
}

impl Launchpad {
    pub fn new(ledger: Arc<dyn LedgerQuery>, wallet: Arc<dyn Wallet>) -> Self {
        Self {
            ledger,
            wallet,
            contract: ContractConfig::default(),
            clock: Arc::new(SystemClock),
            state: Arc::new(RwLock::new(DashboardState::new())),
        }
    }

    /// Build a launchpad that queries the full node selected by `config`.
    pub fn from_config(config: &LaunchConfig, wallet: Arc<dyn Wallet>) -> anyhow::Result<Self> {
        let store = RpcConfigStore::from_config(config)?;
        let rpc = store
            .active_rpc()
            .context("no RPC endpoint for the configured network")?;
        let client = SuiRpcClient::from_rpc_config(rpc)
            .context("failed to build RPC client")?
            .with_page_limit(config.page_limit);
        info!(network = %store.active_network(), url = %rpc.url, "launchpad RPC endpoint selected");
        Ok(Self::new(Arc::new(client), wallet))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Point at a different deployment (local test networks).
    pub fn with_contract(mut self, contract: ContractConfig) -> Self {
        self.contract = contract;
        self
    }

    pub fn contract(&self) -> &ContractConfig {
        &self.contract
    }

    /// Copy of the current dashboard state.
    pub fn snapshot(&self) -> DashboardState {
        self.state.read().clone()
    }

    pub fn set_active_tab(&self, tab: ActiveTab) {
        self.state.write().set_active_tab(tab);
    }

    pub fn set_purchase_amount(&self, amount: f64) {
        self.state.write().purchase_amount = amount;
    }

    pub fn set_stake_amount(&self, amount: f64) {
        self.state.write().stake_amount = amount;
    }

    pub fn is_celebrating(&self) -> bool {
        self.state.read().is_celebrating(self.clock.now_ms())
    }

    /// Recompute the reward countdown once.
    pub fn tick(&self) {
        countdown::tick(&self.state, self.clock.as_ref());
    }

    /// Start the 1-second countdown task. Abort the handle on teardown.
    pub fn spawn_countdown(&self) -> JoinHandle<()> {
        countdown::spawn_ticker(self.state.clone(), self.clock.clone())
    }

    // ── Wallet session ─────────────────────────────────────────────

    /// Connect the wallet, then load balances and stake history.
    pub async fn connect(&self) -> Result<Account, LaunchError> {
        let account = self.wallet.connect().await?;
        info!(address = %account.address, "wallet connected");
        {
            let mut state = self.state.write();
            state.reset_account_data();
            state.account = Some(account.clone());
        }
        self.refresh_all().await;
        Ok(account)
    }

    pub async fn disconnect(&self) {
        if let Err(e) = self.wallet.disconnect().await {
            warn!(error = %e, "wallet disconnect failed");
        }
        let mut state = self.state.write();
        state.account = None;
        state.reset_account_data();
        info!("wallet disconnected");
    }

    /// Follow an account change made inside the wallet itself.
    pub async fn sync_account(&self) {
        let current = self.wallet.account();
        let changed = {
            let mut state = self.state.write();
            if state.account == current {
                false
            } else {
                state.reset_account_data();
                state.account = current.clone();
                true
            }
        };
        if !changed {
            return;
        }
        match current {
            Some(account) => {
                info!(address = %account.address, "wallet account changed");
                self.refresh_all().await;
            }
            None => info!("wallet account gone"),
        }
    }

    // ── Refreshers ─────────────────────────────────────────────────

    /// Re-read token and native balances. A failed query zeroes that balance;
    /// nothing is retried.
    pub async fn refresh_balances(&self) -> BalanceSnapshot {
        let Some(account) = self.wallet.account() else {
            debug!("balance refresh skipped: no account");
            return BalanceSnapshot::default();
        };
        let owner = account.address.as_str();

        let (token, native) = tokio::join!(
            refresh::fetch_balance(self.ledger.as_ref(), owner, &self.contract.token_type),
            refresh::fetch_balance(self.ledger.as_ref(), owner, &self.contract.native_type),
        );
        let snapshot = BalanceSnapshot {
            token: token.unwrap_or_else(|e| {
                error!(error = %e, "error fetching token balance");
                0
            }),
            native: native.unwrap_or_else(|e| {
                error!(error = %e, "error fetching native balance");
                0
            }),
        };

        let mut state = self.state.write();
        state.token_balance_minor = snapshot.token;
        state.native_balance_minor = snapshot.native;
        snapshot
    }

    /// Re-read stake positions. On failure the previous history stays.
    pub async fn refresh_stakes(&self) {
        let Some(account) = self.wallet.account() else {
            debug!("stake refresh skipped: no account");
            return;
        };
        match refresh::fetch_stake_positions(self.ledger.as_ref(), &self.contract, &account.address)
            .await
        {
            Ok(positions) => {
                debug!(count = positions.len(), "stake history refreshed");
                self.state.write().stake_history = positions;
            }
            Err(e) => error!(error = %e, "error fetching stake info"),
        }
    }

    async fn refresh_all(&self) {
        tokio::join!(self.refresh_balances(), self.refresh_stakes());
    }

    /// Whether the account holds enough native coin to pay for a purchase.
    pub async fn has_purchase_gas(&self) -> bool {
        let Some(account) = self.wallet.account() else {
            return false;
        };
        match refresh::fetch_balance(
            self.ledger.as_ref(),
            &account.address,
            &self.contract.native_type,
        )
        .await
        {
            Ok(total) => total >= u128::from(MIN_PURCHASE_GAS_BALANCE),
            Err(e) => {
                error!(error = %e, "error checking native balance");
                false
            }
        }
    }

    // ── Operations ─────────────────────────────────────────────────

    /// Buy tokens for `amount` native units.
    ///
    /// Unlike the other operations, failures are returned to the caller.
    pub async fn purchase(&self, amount: f64) -> Result<TransactionReceipt, LaunchError> {
        let account = self.wallet.account().ok_or(LaunchError::NotConnected)?;
        let amount_minor = positive_minor_units(amount)?;
        debug!(address = %account.address, amount_minor, "building purchase");

        let tx = planner::build_purchase(&self.contract, &account.address, amount_minor)?;
        let receipt = self.wallet.sign_and_execute(&tx).await.map_err(|e| {
            error!(error = %e, "purchase transaction failed");
            LaunchError::from(e)
        })?;
        info!(digest = %receipt.digest, amount_minor, "purchase successful");

        self.state.write().celebrate(self.clock.now_ms());
        self.refresh_balances().await;
        Ok(receipt)
    }

    /// Stake `amount` tokens. Failures are logged only.
    pub async fn stake(&self, amount: f64) {
        if let Err(e) = self.try_stake(amount).await {
            error!(error = %e, amount, "staking failed");
        }
    }

    /// Unstake a position from the current history. Failures are logged only.
    pub async fn unstake(&self, stake_id: &str) {
        if let Err(e) = self.try_unstake(stake_id).await {
            error!(error = %e, stake_id, "unstaking failed");
        }
    }

    /// Claim rewards for a position once the wait is over. Failures are
    /// logged only.
    pub async fn claim_rewards(&self, stake_id: &str) {
        if let Err(e) = self.try_claim(stake_id).await {
            error!(error = %e, stake_id, "claiming rewards failed");
        }
    }

    async fn try_stake(&self, amount: f64) -> Result<TransactionReceipt, LaunchError> {
        let account = self.wallet.account().ok_or(LaunchError::NotConnected)?;
        let amount_minor = positive_minor_units(amount)?;
        let owner = account.address.as_str();

        let gas_coins = self.ledger.get_coins(owner, &self.contract.native_type).await?;
        let token_coins = self.ledger.get_coins(owner, &self.contract.token_type).await?;
        let plan = planner::plan_stake(&self.contract, &gas_coins, &token_coins, amount_minor)?;
        debug!(selection = ?plan.selection, amount_minor, "stake planned");

        let receipt = self.wallet.sign_and_execute(&plan.transaction).await?;
        info!(digest = %receipt.digest, amount_minor, "stake successful");

        {
            let now = self.clock.now_ms();
            let mut state = self.state.write();
            state.last_stake_time_ms = Some(now);
            state.time_remaining_ms = REWARD_WAIT_MS;
            state.celebrate(now);
        }
        self.refresh_all().await;
        Ok(receipt)
    }

    async fn try_unstake(&self, stake_id: &str) -> Result<TransactionReceipt, LaunchError> {
        self.wallet.account().ok_or(LaunchError::NotConnected)?;
        let position = self
            .state
            .read()
            .position(stake_id)
            .cloned()
            .ok_or_else(|| LaunchError::UnknownStake(stake_id.to_string()))?;
        if !position.is_staked() {
            return Err(LaunchError::AlreadyUnstaked(position.id));
        }

        let tx = planner::build_unstake(&self.contract, &position.id, position.amount)?;
        let receipt = self.wallet.sign_and_execute(&tx).await?;
        info!(digest = %receipt.digest, stake_id, "unstaking successful");

        self.state.write().mark_unstaked(stake_id);
        self.refresh_all().await;
        Ok(receipt)
    }

    async fn try_claim(&self, stake_id: &str) -> Result<TransactionReceipt, LaunchError> {
        self.wallet.account().ok_or(LaunchError::NotConnected)?;
        let remaining_ms = {
            let state = self.state.read();
            if state.position(stake_id).is_none() {
                return Err(LaunchError::UnknownStake(stake_id.to_string()));
            }
            state.remaining_ms(self.clock.now_ms())
        };
        if remaining_ms > 0 {
            return Err(LaunchError::RewardsLocked { remaining_ms });
        }

        let tx = planner::build_claim(&self.contract, stake_id)?;
        let receipt = self.wallet.sign_and_execute(&tx).await?;
        info!(digest = %receipt.digest, stake_id, "rewards claimed");

        self.refresh_all().await;
        Ok(receipt)
    }
}

/// Convert a user-entered amount, rejecting anything that is not strictly
/// positive once expressed in minor units.
fn positive_minor_units(amount: f64) -> Result<u64, LaunchError> {
    if amount.is_nan() || amount <= 0.0 {
        return Err(LaunchError::InvalidAmount(amount));
    }
    match to_minor_units(amount)? {
        0 => Err(LaunchError::InvalidAmount(amount)),
        minor => Ok(minor),
    }
}
