//! Infrastructure synergy conditions.
//!
//! The conditions are shared by every domain (income, efficiency,
//! stability, military); only the magnitudes differ per domain.

use crate::config::SynergyValues;
use rust_decimal::Decimal;
use sim_core::InfrastructureKind;
use std::collections::BTreeSet;

/// Which synergy conditions a set of built infrastructure satisfies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SynergyFlags {
    /// Built types beyond the first; 0 when fewer than two are built.
    pub extra_types: u32,
    pub transport: bool,
    pub education: bool,
    pub financial: bool,
    pub complete: bool,
}

impl SynergyFlags {
    pub fn of(built: &BTreeSet<InfrastructureKind>) -> Self {
        use InfrastructureKind::*;
        let n = built.len() as u32;
        Self {
            extra_types: if n >= 2 { n - 1 } else { 0 },
            transport: built.contains(&Roads) && built.contains(&Ports),
            education: built.contains(&Universities) && built.contains(&Hospitals),
            financial: built.contains(&Banks) && n >= 2,
            complete: InfrastructureKind::ALL.iter().all(|k| built.contains(k)),
        }
    }
}

impl SynergyValues {
    /// Sum of all synergy magnitudes whose condition holds.
    pub fn total(&self, flags: SynergyFlags) -> Decimal {
        let mut sum = self.per_extra_type * Decimal::from(flags.extra_types);
        if flags.transport {
            sum += self.transport;
        }
        if flags.education {
            sum += self.education;
        }
        if flags.financial {
            sum += self.financial;
        }
        if flags.complete {
            sum += self.complete;
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InfrastructureKind::*;

    fn set(kinds: &[InfrastructureKind]) -> BTreeSet<InfrastructureKind> {
        kinds.iter().copied().collect()
    }

    #[test]
    fn single_type_has_no_synergy() {
        assert_eq!(SynergyFlags::of(&set(&[Banks])), SynergyFlags::default());
    }

    #[test]
    fn pairs_unlock_named_synergies() {
        let f = SynergyFlags::of(&set(&[Roads, Ports]));
        assert_eq!(f.extra_types, 1);
        assert!(f.transport && !f.education && !f.financial && !f.complete);

        let f = SynergyFlags::of(&set(&[Banks, Hospitals, Universities]));
        assert_eq!(f.extra_types, 2);
        assert!(f.education && f.financial && !f.transport);
    }

    #[test]
    fn complete_set_sums_every_magnitude() {
        let values = SynergyValues {
            per_extra_type: Decimal::new(1, 2),
            transport: Decimal::new(10, 2),
            education: Decimal::new(20, 2),
            financial: Decimal::new(30, 2),
            complete: Decimal::new(40, 2),
        };
        let f = SynergyFlags::of(&set(&InfrastructureKind::ALL));
        assert_eq!(values.total(f), Decimal::new(104, 2));
    }
}
