//! Model command handlers.

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle CreateModel command.
pub fn create(p: &Primitives, name: String, upload_org: String) -> Result<Output> {
    let model = convert_result(p.models.create(&name, &upload_org))?;
    Ok(Output::ModelId(model.model_id))
}

/// Handle GetModel command.
pub fn get(p: &Primitives, model_id: String) -> Result<Output> {
    Ok(Output::Model(convert_result(p.models.get(&model_id))?))
}
