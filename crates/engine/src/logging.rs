//! Tracing subscriber installation
//!
//! Library code only emits `tracing` events. Binaries and tests that want to
//! see them call [`init_logging`] once with the configured level.

use magnit_core::{MagnitError, MagnitResult};
use tracing::Level;

/// Install a global fmt subscriber at `level`
///
/// Idempotent: if a global subscriber is already set, this is a no-op.
///
/// # Errors
///
/// InvalidArgument if `level` is not a tracing level name.
pub fn init_logging(level: &str) -> MagnitResult<()> {
    let level: Level = level
        .parse()
        .map_err(|_| MagnitError::invalid_argument(format!("invalid log level '{}'", level)))?;
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        assert!(init_logging("debug").is_ok());
        assert!(init_logging("info").is_ok());
    }

    #[test]
    fn test_bad_level_rejected() {
        assert!(init_logging("loud").is_err());
    }
}
