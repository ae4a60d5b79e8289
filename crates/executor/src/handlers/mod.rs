//! Command handlers organized by primitive.
//!
//! | Module | Commands | Primitive |
//! |--------|----------|-----------|
//! | `counter` | 3 | Counters |
//! | `model` | 2 | ModelRegistry |
//! | `agreement` | 5 | AgreementLedger |
//! | `query` | 4 | RecordQuery |

pub mod agreement;
pub mod counter;
pub mod model;
pub mod query;
