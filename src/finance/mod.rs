//! Income and tax arithmetic used alongside the valuation engine

pub mod cap_rate;
pub mod noi;
pub mod tax_savings;

pub use cap_rate::{calculate_cap_rate, CapRateInput, CapRateQuality, CapRateResult};
pub use noi::{calculate_noi, NoiInput, NoiResult, OperatingExpenses};
pub use tax_savings::{
    calculate_tax_savings, SavingsProjection, TaxRate, TaxRateBasis, TaxSavingsInput,
    TaxSavingsResult, MAX_EFFECTIVE_RATE,
};
