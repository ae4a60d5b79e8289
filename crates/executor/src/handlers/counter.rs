//! Counter command handlers.

use magnit_core::CounterCategory;

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::output::CounterValue;
use crate::{Output, Result};

/// Handle Init command.
pub fn init(p: &Primitives) -> Result<Output> {
    let values = convert_result(p.counters.init())?;
    Ok(Output::Counters(
        values
            .into_iter()
            .map(|(category, value)| CounterValue { category, value })
            .collect(),
    ))
}

/// Handle PeekCounter command.
pub fn peek(p: &Primitives, category: CounterCategory) -> Result<Output> {
    Ok(Output::Counter(convert_result(p.counters.peek(category))?))
}

/// Handle SetCounter command.
pub fn set(p: &Primitives, category: CounterCategory, value: u64) -> Result<Output> {
    Ok(Output::Counter(convert_result(
        p.counters.set_to(category, value),
    )?))
}
