//! Query command handlers.

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle ListAll command.
pub fn list_all(p: &Primitives) -> Result<Output> {
    Ok(Output::Records(convert_result(p.query.list_all())?))
}

/// Handle ListRange command.
pub fn list_range(p: &Primitives, start: String, end: String) -> Result<Output> {
    Ok(Output::Records(convert_result(
        p.query.list_range(&start, &end),
    )?))
}

/// Handle ListAgreements command.
pub fn list_agreements(p: &Primitives) -> Result<Output> {
    Ok(Output::Agreements(convert_result(p.query.list_agreements())?))
}

/// Handle History command.
pub fn history(p: &Primitives, key: String) -> Result<Output> {
    Ok(Output::History(convert_result(p.query.history(&key))?))
}
