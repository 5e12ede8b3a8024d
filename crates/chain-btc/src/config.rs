use crate::network::BtcNetwork;
use crate::sighash::SighashType;

/// Flat fee deducted from the funding value when none is configured.
pub const DEFAULT_FEE_SAT: u64 = 10_000;

/// Parameters for one spend, passed explicitly to [`crate::sweep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepConfig {
    /// Network the destination address must belong to.
    pub network: BtcNetwork,
    pub fee_sat: u64,
    pub sighash_type: SighashType,
}

impl SweepConfig {
    pub fn new(network: BtcNetwork) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    pub fn with_fee(mut self, fee_sat: u64) -> Self {
        self.fee_sat = fee_sat;
        self
    }

    pub fn with_sighash_type(mut self, sighash_type: SighashType) -> Self {
        self.sighash_type = sighash_type;
        self
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            network: BtcNetwork::Mainnet,
            fee_sat: DEFAULT_FEE_SAT,
            sighash_type: SighashType::All,
        }
    }
}
