//! Database: the reference ledger
//!
//! The Database ties together:
//! - VersionedStore (world state, both partitions, full history)
//! - TransactionCoordinator (snapshots, validation, commit)
//! - Clock (deterministic transaction time)
//! - EventBus (post-commit event delivery)
//! - MagnitConfig (policies and retry settings)
//!
//! Licensing operations run as closures over a `TransactionContext`, which
//! implements `LedgerStub`. A closure error aborts the transaction; a
//! validation conflict at commit is retried by `transaction_with_retry`.

pub mod config;
pub mod transactions;

pub use config::{MagnitConfig, CONFIG_FILE_NAME, DEFAULT_MODEL_COLLECTION};
pub use transactions::RetryConfig;

use std::path::Path;
use std::sync::Arc;

use magnit_concurrency::TransactionContext;
use magnit_core::{MagnitError, MagnitResult, Storage};
use magnit_storage::VersionedStore;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::coordinator::{TransactionCoordinator, TransactionMetrics};
use crate::events::EventBus;

/// In-process ledger
pub struct Database {
    storage: Arc<VersionedStore>,
    coordinator: TransactionCoordinator,
    clock: Arc<dyn Clock>,
    events: EventBus,
    config: MagnitConfig,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("version", &self.storage.current_version())
            .field("config", &self.config)
            .finish()
    }
}

impl Database {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Empty ledger with default configuration and wall-clock time
    pub fn ephemeral() -> Arc<Self> {
        Arc::new(Self::build(MagnitConfig::default(), Arc::new(SystemClock)))
    }

    /// Empty ledger with explicit configuration
    ///
    /// # Errors
    ///
    /// InvalidArgument if the configuration does not validate.
    pub fn with_config(config: MagnitConfig) -> MagnitResult<Arc<Self>> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Empty ledger with explicit configuration and time source
    pub fn with_clock(config: MagnitConfig, clock: Arc<dyn Clock>) -> MagnitResult<Arc<Self>> {
        config.validate()?;
        Ok(Arc::new(Self::build(config, clock)))
    }

    /// Empty ledger configured from `magnit.toml` in `dir`
    ///
    /// Writes the default file first if none exists.
    pub fn open(dir: impl AsRef<Path>) -> MagnitResult<Arc<Self>> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        MagnitConfig::write_default_if_missing(&path)?;
        let config = MagnitConfig::from_file(&path)?;
        info!(
            target: "magnit::db",
            path = %path.display(),
            model_collection = %config.model_collection,
            "Opened ledger"
        );
        Self::with_config(config)
    }

    fn build(config: MagnitConfig, clock: Arc<dyn Clock>) -> Self {
        let storage = Arc::new(VersionedStore::new());
        let coordinator = TransactionCoordinator::new(storage.current_version());
        Self {
            storage,
            coordinator,
            clock,
            events: EventBus::new(),
            config,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Active configuration
    pub fn config(&self) -> &MagnitConfig {
        &self.config
    }

    /// Underlying store
    pub fn storage(&self) -> &Arc<VersionedStore> {
        &self.storage
    }

    /// Post-commit event delivery
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Transaction statistics
    pub fn metrics(&self) -> TransactionMetrics {
        self.coordinator.metrics()
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Begin a transaction for manual control
    ///
    /// Prefer [`Database::transaction`], which commits or aborts for you.
    pub fn begin_transaction(&self) -> TransactionContext {
        self.coordinator
            .start_transaction(&self.storage, self.clock.now())
    }

    /// Commit a manually managed transaction and publish its events
    ///
    /// Publication happens before the commit lock is released, so
    /// subscribers see transactions in commit order.
    pub fn commit_transaction(&self, txn: &mut TransactionContext) -> MagnitResult<u64> {
        let outcome = self
            .coordinator
            .commit_then(txn, &self.storage, |events| self.events.publish(events))?;
        Ok(outcome.version)
    }

    fn run_single_attempt<T>(
        &self,
        txn: &mut TransactionContext,
        result: MagnitResult<T>,
    ) -> MagnitResult<T> {
        match result {
            Ok(value) => {
                self.commit_transaction(txn)?;
                Ok(value)
            }
            Err(e) => {
                self.coordinator.abort(txn, &e);
                Err(e)
            }
        }
    }

    /// Execute a closure as one transaction
    ///
    /// Commits if the closure returns Ok and validation passes. Any closure
    /// error aborts the transaction and is returned unchanged.
    ///
    /// # Example
    /// ```text
    /// let id = db.transaction(|txn| {
    ///     let raw = txn.get_state("AgreementCounterNO")?;
    ///     txn.put_state("AgreementCounterNO", next)?;
    ///     Ok(id)
    /// })?;
    /// ```
    pub fn transaction<F, T>(&self, f: F) -> MagnitResult<T>
    where
        F: FnOnce(&mut TransactionContext) -> MagnitResult<T>,
    {
        let mut txn = self.begin_transaction();
        let result = f(&mut txn);
        self.run_single_attempt(&mut txn, result)
    }

    /// Execute a closure as one transaction, retrying on conflict
    ///
    /// The closure runs on a fresh snapshot each attempt, so it must be `Fn`.
    /// Only retryable errors (validation conflicts) are retried; domain
    /// errors return immediately.
    pub fn transaction_with_retry<F, T>(&self, config: &RetryConfig, f: F) -> MagnitResult<T>
    where
        F: Fn(&mut TransactionContext) -> MagnitResult<T>,
    {
        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            let mut txn = self.begin_transaction();
            let result = f(&mut txn);

            match self.run_single_attempt(&mut txn, result) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < config.max_retries => {
                    debug!(target: "magnit::txn", attempt, error = %e, "Retrying after conflict");
                    last_error = Some(e);
                    std::thread::sleep(config.calculate_delay(attempt));
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            MagnitError::storage("retry loop exited without a result")
        }))
    }

    /// [`Database::transaction_with_retry`] using the configured retry policy
    pub fn execute<F, T>(&self, f: F) -> MagnitResult<T>
    where
        F: Fn(&mut TransactionContext) -> MagnitResult<T>,
    {
        self.transaction_with_retry(&self.config.retry, f)
    }
}
