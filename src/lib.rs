//! Magnit - licensing ledger core
//!
//! Models are registered privately, agreements grant a participant a bounded
//! number of uses of a model, and every use is counted on a transactional,
//! versioned world state.
//!
//! # Quick Start
//!
//! ```ignore
//! use magnit::{Database, Executor, Output};
//!
//! let executor = Executor::new(Database::ephemeral());
//! executor.invoke("createModel", &["resnet".into(), "Org1".into()])?;
//! executor.invoke("createAgreement", &[
//!     "license".into(), "Model1".into(), "5".into(), "Org1".into(), "Org2".into(),
//!     "".into(), "".into(), "ISSUED".into(), "hash".into(),
//! ])?;
//!
//! // Each call consumes one of the five uses
//! let model = executor.invoke("consumeAgreement", &["Agreement1".into()])?;
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Executor`], which runs each one as a
//! single optimistic transaction. Storage, concurrency and engine internals
//! are not exposed; only the executor API is public.

pub use magnit_executor::*;
