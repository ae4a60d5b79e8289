//! Agreement command handlers.

use magnit_core::NewAgreement;

use crate::bridge::Primitives;
use crate::convert::convert_result;
use crate::{Output, Result};

/// Handle CreateAgreement command.
pub fn create(p: &Primitives, agreement: NewAgreement) -> Result<Output> {
    let agreement = convert_result(p.agreements.create(agreement))?;
    Ok(Output::AgreementId(agreement.agreement_id))
}

/// Handle GetAgreement command.
pub fn get(p: &Primitives, agreement_id: String) -> Result<Output> {
    Ok(Output::Agreement(convert_result(
        p.agreements.get(&agreement_id),
    )?))
}

/// Handle ConsumeAgreement command.
pub fn consume(p: &Primitives, agreement_id: String) -> Result<Output> {
    Ok(Output::Model(convert_result(
        p.agreements.consume(&agreement_id),
    )?))
}

/// Handle ApproveAgreement command.
pub fn approve(p: &Primitives, agreement_id: String, status: String) -> Result<Output> {
    Ok(Output::Agreement(convert_result(
        p.agreements.approve(&agreement_id, &status),
    )?))
}

/// Handle DeleteRecord command.
pub fn delete(p: &Primitives, key: String) -> Result<Output> {
    convert_result(p.agreements.delete_record(&key))?;
    Ok(Output::Unit)
}
