//! The Executor - single entry point to the licensing ledger.
//!
//! The Executor is a stateless dispatcher that routes commands to the
//! licensing primitives and converts results to outputs. Each command runs
//! as exactly one transaction.

use std::path::Path;
use std::sync::Arc;

use magnit_engine::Database;
use tracing::{debug, warn};

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::handlers::{agreement, counter, model, query};
use crate::{Command, Output, Result};

/// The command executor.
///
/// # Thread Safety
///
/// Executor is `Send + Sync` and can be shared across threads. Concurrent
/// commands are isolated by the database's optimistic transactions.
///
/// # Example
///
/// ```ignore
/// use magnit_executor::{Command, Executor};
///
/// let executor = Executor::new(Database::ephemeral());
///
/// // Positional invocation
/// let id = executor.invoke("createModel", &["resnet".into(), "Org1".into()])?;
///
/// // Typed command
/// let model = executor.execute(Command::GetModel { model_id: "Model1".into() })?;
/// ```
#[derive(Clone)]
pub struct Executor {
    primitives: Arc<Primitives>,
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("database", &self.primitives.db)
            .finish()
    }
}

impl Executor {
    /// Create a new executor over a database.
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            primitives: Arc::new(Primitives::new(db)),
        }
    }

    /// Create an executor over a ledger configured from `dir/magnit.toml`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(convert_result(Database::open(dir))?))
    }

    /// Execute a single command.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        let operation = cmd.operation();
        debug!(target: "magnit::executor", %operation, "Dispatching command");

        let p = self.primitives.as_ref();
        let result = match cmd {
            // Counters
            Command::Init => counter::init(p),
            Command::PeekCounter { category } => counter::peek(p, category),
            Command::SetCounter { category, value } => counter::set(p, category, value),

            // Models
            Command::CreateModel { name, upload_org } => model::create(p, name, upload_org),
            Command::GetModel { model_id } => model::get(p, model_id),

            // Agreements
            Command::CreateAgreement { agreement: new } => agreement::create(p, new),
            Command::GetAgreement { agreement_id } => agreement::get(p, agreement_id),
            Command::ConsumeAgreement { agreement_id } => agreement::consume(p, agreement_id),
            Command::ApproveAgreement {
                agreement_id,
                status,
            } => agreement::approve(p, agreement_id, status),
            Command::DeleteRecord { key } => agreement::delete(p, key),

            // Queries
            Command::ListAll => query::list_all(p),
            Command::ListRange { start, end } => query::list_range(p, start, end),
            Command::ListAgreements => query::list_agreements(p),
            Command::History { key } => query::history(p, key),
        };

        if let Err(e) = &result {
            warn!(target: "magnit::executor", %operation, error = %e, "Command failed");
        }
        result
    }

    /// Parse and execute a positional invocation.
    pub fn invoke(&self, function: &str, args: &[String]) -> Result<Output> {
        let cmd = Command::from_invocation(function, args).map_err(|e| {
            warn!(target: "magnit::executor", function, error = %e, "Rejected invocation");
            e
        })?;
        self.execute(cmd)
    }

    /// [`Executor::invoke`] rendered to the response payload.
    pub fn invoke_payload(&self, function: &str, args: &[String]) -> Result<Vec<u8>> {
        self.invoke(function, args)?.to_payload()
    }

    /// Execute multiple commands sequentially, one transaction each.
    ///
    /// Results are returned in the same order as the commands; a failure
    /// does not stop later commands.
    pub fn execute_many(&self, cmds: Vec<Command>) -> Vec<Result<Output>> {
        cmds.into_iter().map(|cmd| self.execute(cmd)).collect()
    }

    /// The underlying database.
    pub fn database(&self) -> &Arc<Database> {
        &self.primitives.db
    }
}
