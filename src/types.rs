//! Types for the network fee tracker

use crate::error::{FetchError, PreferenceError};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Networks whose fee data is tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CryptoKind {
    /// Ethereum (EVM gas market)
    Evm,
    /// Bitcoin
    Bitcoin,
    /// Solana
    Solana,
}

impl CryptoKind {
    /// Short label used in logs and error messages
    pub fn label(&self) -> &'static str {
        match self {
            CryptoKind::Evm => "ETH",
            CryptoKind::Bitcoin => "BTC",
            CryptoKind::Solana => "SOL",
        }
    }

    /// Suffix used when rendering in the native unit
    pub fn native_unit(&self) -> &'static str {
        match self {
            CryptoKind::Evm => "gwei",
            CryptoKind::Bitcoin => "sat/vB",
            CryptoKind::Solana => "TPS",
        }
    }

    /// Get all tracked kinds
    pub fn all() -> &'static [CryptoKind] {
        &[CryptoKind::Evm, CryptoKind::Bitcoin, CryptoKind::Solana]
    }
}

impl std::fmt::Display for CryptoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejects negative and non-finite values so no sample carries one.
fn checked(field: &str, value: f64) -> Result<f64, FetchError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(FetchError::decode(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )))
    }
}

/// Ethereum gas price tiers in gwei
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvmGasSample {
    pub safe_gwei: f64,
    pub propose_gwei: f64,
    pub fast_gwei: f64,
    /// Suggested base fee, when the oracle reports one
    pub base_fee_gwei: Option<f64>,
}

impl EvmGasSample {
    pub fn new(safe_gwei: f64, propose_gwei: f64, fast_gwei: f64) -> Result<Self, FetchError> {
        Ok(Self {
            safe_gwei: checked("SafeGasPrice", safe_gwei)?,
            propose_gwei: checked("ProposeGasPrice", propose_gwei)?,
            fast_gwei: checked("FastGasPrice", fast_gwei)?,
            base_fee_gwei: None,
        })
    }

    pub fn with_base_fee(mut self, base_fee_gwei: f64) -> Result<Self, FetchError> {
        self.base_fee_gwei = Some(checked("suggestBaseFee", base_fee_gwei)?);
        Ok(self)
    }
}

/// Bitcoin fee rate tiers in sat/vB
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BitcoinFeeSample {
    pub fastest_sat_vb: f64,
    pub half_hour_sat_vb: f64,
    pub hour_sat_vb: f64,
}

impl BitcoinFeeSample {
    pub fn new(fastest: f64, half_hour: f64, hour: f64) -> Result<Self, FetchError> {
        Ok(Self {
            fastest_sat_vb: checked("fastestFee", fastest)?,
            half_hour_sat_vb: checked("halfHourFee", half_hour)?,
            hour_sat_vb: checked("hourFee", hour)?,
        })
    }
}

/// Solana network throughput
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolanaPerfSample {
    pub transactions_per_second: f64,
}

impl SolanaPerfSample {
    pub fn new(transactions_per_second: f64) -> Result<Self, FetchError> {
        Ok(Self {
            transactions_per_second: checked("transactionsPerSecond", transactions_per_second)?,
        })
    }
}

/// A decoded sample from one source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RawSample {
    Evm(EvmGasSample),
    Bitcoin(BitcoinFeeSample),
    Solana(SolanaPerfSample),
}

impl RawSample {
    /// Which network this sample describes
    pub fn kind(&self) -> CryptoKind {
        match self {
            RawSample::Evm(_) => CryptoKind::Evm,
            RawSample::Bitcoin(_) => CryptoKind::Bitcoin,
            RawSample::Solana(_) => CryptoKind::Solana,
        }
    }

    /// Headline value used for one-line summaries
    pub fn headline(&self) -> f64 {
        match self {
            RawSample::Evm(s) => s.propose_gwei,
            RawSample::Bitcoin(s) => s.half_hour_sat_vb,
            RawSample::Solana(s) => s.transactions_per_second,
        }
    }

    pub fn into_evm(self) -> Option<EvmGasSample> {
        match self {
            RawSample::Evm(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_bitcoin(self) -> Option<BitcoinFeeSample> {
        match self {
            RawSample::Bitcoin(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_solana(self) -> Option<SolanaPerfSample> {
        match self {
            RawSample::Solana(s) => Some(s),
            _ => None,
        }
    }
}

/// One sample from each source, produced only when all three succeed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateSample {
    pub evm: EvmGasSample,
    pub bitcoin: BitcoinFeeSample,
    pub solana: SolanaPerfSample,
}

impl AggregateSample {
    pub(crate) fn new(evm: EvmGasSample, bitcoin: BitcoinFeeSample, solana: SolanaPerfSample) -> Self {
        Self {
            evm,
            bitcoin,
            solana,
        }
    }

    /// Every displayable field as `(label, value, kind)`
    pub fn fields(&self) -> Vec<(&'static str, f64, CryptoKind)> {
        let mut fields = vec![
            ("ETH safe", self.evm.safe_gwei, CryptoKind::Evm),
            ("ETH standard", self.evm.propose_gwei, CryptoKind::Evm),
            ("ETH fast", self.evm.fast_gwei, CryptoKind::Evm),
        ];
        if let Some(base_fee) = self.evm.base_fee_gwei {
            fields.push(("ETH base fee", base_fee, CryptoKind::Evm));
        }
        fields.extend([
            ("BTC fastest", self.bitcoin.fastest_sat_vb, CryptoKind::Bitcoin),
            ("BTC 30 min", self.bitcoin.half_hour_sat_vb, CryptoKind::Bitcoin),
            ("BTC 60 min", self.bitcoin.hour_sat_vb, CryptoKind::Bitcoin),
            ("SOL throughput", self.solana.transactions_per_second, CryptoKind::Solana),
        ]);
        fields
    }

    /// The three per-source samples in fixed order
    pub fn samples(&self) -> [RawSample; 3] {
        [
            RawSample::Evm(self.evm),
            RawSample::Bitcoin(self.bitcoin),
            RawSample::Solana(self.solana),
        ]
    }
}

/// How values are rendered for the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnit {
    /// Network-native units (gwei, sat/vB, TPS)
    #[default]
    Native,
    /// Currency amount
    Fiat,
}

impl std::str::FromStr for DisplayUnit {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" => Ok(DisplayUnit::Native),
            "fiat" => Ok(DisplayUnit::Fiat),
            other => Err(PreferenceError::invalid_value("unit", other)),
        }
    }
}

/// Allowed refresh cadences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RefreshInterval {
    FiveMinutes,
    #[default]
    TenMinutes,
    FifteenMinutes,
    ThirtyMinutes,
}

impl RefreshInterval {
    pub fn minutes(&self) -> u32 {
        match self {
            RefreshInterval::FiveMinutes => 5,
            RefreshInterval::TenMinutes => 10,
            RefreshInterval::FifteenMinutes => 15,
            RefreshInterval::ThirtyMinutes => 30,
        }
    }

    pub fn as_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.minutes()))
    }

    /// Get all allowed intervals
    pub fn all() -> &'static [RefreshInterval] {
        &[
            RefreshInterval::FiveMinutes,
            RefreshInterval::TenMinutes,
            RefreshInterval::FifteenMinutes,
            RefreshInterval::ThirtyMinutes,
        ]
    }
}

impl TryFrom<u32> for RefreshInterval {
    type Error = PreferenceError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        RefreshInterval::all()
            .iter()
            .copied()
            .find(|interval| interval.minutes() == minutes)
            .ok_or_else(|| PreferenceError::invalid_value("refresh_interval_minutes", minutes))
    }
}

impl From<RefreshInterval> for u32 {
    fn from(interval: RefreshInterval) -> Self {
        interval.minutes()
    }
}

/// Result of one aggregation attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// All three sources succeeded
    Success(AggregateSample),
    /// The first source to fail, with its error unchanged
    Failure { source: CryptoKind, error: FetchError },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rejects_negative_and_nan() {
        assert!(matches!(
            EvmGasSample::new(1.0, -2.0, 3.0),
            Err(FetchError::DecodeError(_))
        ));
        assert!(matches!(
            BitcoinFeeSample::new(f64::NAN, 1.0, 1.0),
            Err(FetchError::DecodeError(_))
        ));
        assert!(matches!(
            SolanaPerfSample::new(f64::INFINITY),
            Err(FetchError::DecodeError(_))
        ));
    }

    #[test]
    fn test_refresh_interval_from_minutes() {
        assert_eq!(RefreshInterval::try_from(15).unwrap(), RefreshInterval::FifteenMinutes);
        assert!(RefreshInterval::try_from(7).is_err());
        assert_eq!(RefreshInterval::ThirtyMinutes.as_duration(), Duration::minutes(30));
    }

    #[test]
    fn test_display_unit_parse() {
        assert_eq!(" Fiat ".parse::<DisplayUnit>().unwrap(), DisplayUnit::Fiat);
        assert!("euro".parse::<DisplayUnit>().is_err());
    }

    #[test]
    fn test_aggregate_fields_include_optional_base_fee() {
        let evm = EvmGasSample::new(10.0, 12.0, 15.0).unwrap();
        let bitcoin = BitcoinFeeSample::new(20.0, 12.0, 8.0).unwrap();
        let solana = SolanaPerfSample::new(2800.0).unwrap();

        let without = AggregateSample::new(evm, bitcoin, solana);
        assert_eq!(without.fields().len(), 7);

        let with = AggregateSample::new(evm.with_base_fee(9.5).unwrap(), bitcoin, solana);
        assert_eq!(with.fields().len(), 8);
        assert_eq!(with.samples()[2].kind(), CryptoKind::Solana);
    }
}
