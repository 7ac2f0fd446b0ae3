//! System-wide constants for the OpenMart settlement engine.

/// Denominator for basis-point arithmetic: 1 bps = 1/10_000.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Default service fee retained by the engine on every settlement (3%).
pub const DEFAULT_SERVICE_FEE_BPS: u32 = 300;

/// Default price tolerance for tendered amounts and oracle quotes (1%).
pub const DEFAULT_SLIPPAGE_BPS: u32 = 100;

/// Upper bound for both fee knobs. 10_000 bps = 100% of the price.
pub const MAX_FEE_BPS: u32 = 10_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenMart";
