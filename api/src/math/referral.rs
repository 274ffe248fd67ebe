use steel::*;
use super::bps_of;
use crate::consts::*;
use crate::error::SaleError;

pub const REFERRAL_LEVELS: usize = 3;

/// Basis points of the buyer amount paid to each ancestor level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferralSchedule {
    pub levels_bps: [u16; REFERRAL_LEVELS],
}

impl Default for ReferralSchedule {
    fn default() -> Self {
        Self {
            levels_bps: [REFERRAL_L1_BPS, REFERRAL_L2_BPS, REFERRAL_L3_BPS],
        }
    }
}

impl ReferralSchedule {
    /// Total overhead reserved on top of every purchase.
    pub fn overhead_bps(&self) -> u64 {
        self.levels_bps.iter().map(|bps| *bps as u64).sum()
    }
}

/// Read access to the external parent/child referral graph.
pub trait ReferralGraph {
    fn parent_of(&self, child: &Pubkey) -> Result<Option<Pubkey>, SaleError>;
}

/// Graph with no recorded links. Every share lands on the default wallet
/// unless the candidate itself is valid.
pub struct EmptyGraph;

impl ReferralGraph for EmptyGraph {
    fn parent_of(&self, _child: &Pubkey) -> Result<Option<Pubkey>, SaleError> {
        Ok(None)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferralPayout {
    pub recipient: Pubkey,
    pub amount: u128,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferralPayouts {
    pub levels: [ReferralPayout; REFERRAL_LEVELS],
}

impl ReferralPayouts {
    pub fn total(&self) -> u128 {
        self.levels.iter().map(|p| p.amount).sum()
    }

    /// Everything a purchase of `buyer` units mints: the buyer share plus
    /// every level.
    pub fn minted_with(&self, buyer: u128) -> Result<u128, SaleError> {
        self.levels
            .iter()
            .try_fold(buyer, |acc, p| acc.checked_add(p.amount))
            .ok_or(SaleError::MathOverflow)
    }
}

fn usable(candidate: Option<Pubkey>, buyer: &Pubkey, seen: &[Option<Pubkey>]) -> Option<Pubkey> {
    candidate.filter(|c| *c != Pubkey::default() && c != buyer && !seen.contains(&Some(*c)))
}

/// Walks up to three ancestors starting at the candidate itself. A missing
/// level, the buyer, or an ancestor already in the chain ends it.
pub fn resolve_chain<G: ReferralGraph>(
    graph: &G,
    buyer: &Pubkey,
    candidate: &Pubkey,
) -> Result<[Option<Pubkey>; REFERRAL_LEVELS], SaleError> {
    let mut chain = [None; REFERRAL_LEVELS];
    let mut current = usable(Some(*candidate), buyer, &[]);

    for i in 0..REFERRAL_LEVELS {
        let Some(referrer) = current else {
            break;
        };
        chain[i] = Some(referrer);
        if i + 1 < REFERRAL_LEVELS {
            current = usable(graph.parent_of(&referrer)?, buyer, &chain[..=i]);
        }
    }

    Ok(chain)
}

/// Splits the referral overhead of a purchase between the resolved chain and
/// the default wallet. The last level takes the rounding remainder so the
/// payouts always add up to the overhead reserved in the issuance ledger.
pub fn cascade<G: ReferralGraph>(
    schedule: &ReferralSchedule,
    graph: &G,
    buyer: &Pubkey,
    candidate: &Pubkey,
    default_referral: &Pubkey,
    base: u128,
) -> Result<ReferralPayouts, SaleError> {
    let chain = resolve_chain(graph, buyer, candidate)?;
    let overhead = bps_of(base, schedule.overhead_bps())?;

    let mut levels = [ReferralPayout { recipient: *default_referral, amount: 0 }; REFERRAL_LEVELS];
    let mut paid = 0u128;

    for (i, payout) in levels.iter_mut().enumerate() {
        payout.amount = if i + 1 == REFERRAL_LEVELS {
            overhead.checked_sub(paid).ok_or(SaleError::MathOverflow)?
        } else {
            bps_of(base, schedule.levels_bps[i] as u64)?
        };
        if let Some(referrer) = chain[i] {
            payout.recipient = referrer;
        }
        paid = paid.checked_add(payout.amount).ok_or(SaleError::MathOverflow)?;
    }

    Ok(ReferralPayouts { levels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{bps_of, from_canonical, IssuanceLedger};
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockGraph {
        parents: HashMap<Pubkey, Pubkey>,
    }

    impl MockGraph {
        fn link(mut self, child: Pubkey, parent: Pubkey) -> Self {
            self.parents.insert(child, parent);
            self
        }
    }

    impl ReferralGraph for MockGraph {
        fn parent_of(&self, child: &Pubkey) -> Result<Option<Pubkey>, SaleError> {
            Ok(self.parents.get(child).copied())
        }
    }

    fn keys() -> (Pubkey, Pubkey, Pubkey, Pubkey, Pubkey) {
        (
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        )
    }

    #[test]
    fn test_full_chain_gets_every_level() {
        let (buyer, l1, l2, l3, fallback) = keys();
        let graph = MockGraph::default().link(l1, l2).link(l2, l3).link(l3, buyer);

        let payouts = cascade(&ReferralSchedule::default(), &graph, &buyer, &l1, &fallback, 10_000).unwrap();

        assert_eq!(payouts.levels[0], ReferralPayout { recipient: l1, amount: 500 });
        assert_eq!(payouts.levels[1], ReferralPayout { recipient: l2, amount: 300 });
        assert_eq!(payouts.levels[2], ReferralPayout { recipient: l3, amount: 100 });
    }

    #[test]
    fn test_short_chain_redirects_to_default() {
        let (buyer, l1, _, _, fallback) = keys();
        let graph = MockGraph::default();

        let payouts = cascade(&ReferralSchedule::default(), &graph, &buyer, &l1, &fallback, 10_000).unwrap();

        assert_eq!(payouts.levels[0].recipient, l1);
        assert_eq!(payouts.levels[1].recipient, fallback);
        assert_eq!(payouts.levels[2].recipient, fallback);
        assert_eq!(payouts.total(), 900);
    }

    #[test]
    fn test_zero_or_self_candidate_uses_default() {
        let (buyer, _, _, _, fallback) = keys();

        for candidate in [Pubkey::default(), buyer] {
            let payouts = cascade(&ReferralSchedule::default(), &EmptyGraph, &buyer, &candidate, &fallback, 1_000).unwrap();
            assert!(payouts.levels.iter().all(|p| p.recipient == fallback));
            assert_eq!(payouts.total(), 90);
        }
    }

    #[test]
    fn test_chain_stops_at_the_buyer() {
        let (buyer, l1, _, _, fallback) = keys();
        let graph = MockGraph::default().link(l1, buyer);

        let chain = resolve_chain(&graph, &buyer, &l1).unwrap();
        assert_eq!(chain, [Some(l1), None, None]);

        let payouts = cascade(&ReferralSchedule::default(), &graph, &buyer, &l1, &fallback, 100).unwrap();
        assert_eq!(payouts.levels[1].recipient, fallback);
    }

    #[test]
    fn test_cycle_is_not_paid_twice() {
        let (buyer, l1, l2, _, fallback) = keys();
        let graph = MockGraph::default().link(l1, l2).link(l2, l1);

        let chain = resolve_chain(&graph, &buyer, &l1).unwrap();
        assert_eq!(chain, [Some(l1), Some(l2), None]);

        let payouts = cascade(&ReferralSchedule::default(), &graph, &buyer, &l1, &fallback, 10_000).unwrap();
        assert_eq!(payouts.levels[0], ReferralPayout { recipient: l1, amount: 500 });
        assert_eq!(payouts.levels[1], ReferralPayout { recipient: l2, amount: 300 });
        assert_eq!(payouts.levels[2], ReferralPayout { recipient: fallback, amount: 100 });

        // a self-referencing record stops right away
        let graph = MockGraph::default().link(l1, l1);
        assert_eq!(resolve_chain(&graph, &buyer, &l1).unwrap(), [Some(l1), None, None]);
    }

    #[test]
    fn test_minted_units_match_reserved_capacity() {
        let (buyer, l1, l2, _, fallback) = keys();
        let graph = MockGraph::default().link(l1, l2);
        let schedule = ReferralSchedule::default();

        // 1 USDC at 0.11 on a 9-decimal sale mint
        let buyer_units = 9_090_909_090u128;
        let payouts = cascade(&schedule, &graph, &buyer, &l1, &fallback, buyer_units).unwrap();
        assert_eq!(payouts.levels[0].amount, 454_545_454);
        assert_eq!(payouts.levels[1].amount, 272_727_272);
        assert_eq!(payouts.levels[2].amount, 90_909_092);

        let minted = payouts.minted_with(buyer_units).unwrap();
        assert_eq!(minted, 9_909_090_908);

        let mut ledger = IssuanceLedger::new(0, u128::MAX, schedule.overhead_bps());
        let reserved = ledger.reserve_minted(minted, 9).unwrap();
        assert_eq!(reserved, 9_909_090_908_000_000_000);
        assert_eq!(from_canonical(ledger.total_sold, 9).unwrap(), minted);

        for (base, decimals) in [(1u128, 6u8), (11, 6), (999, 9), (123_456_789, 9), (7, 0), (1_000_000_007, 18)] {
            let mut ledger = IssuanceLedger::new(0, u128::MAX, schedule.overhead_bps());
            let payouts = cascade(&schedule, &graph, &buyer, &l1, &fallback, base).unwrap();
            let paid: u128 = base + payouts.levels.iter().map(|p| p.amount).sum::<u128>();

            ledger.reserve_minted(payouts.minted_with(base).unwrap(), decimals).unwrap();
            assert_eq!(from_canonical(ledger.total_sold, decimals).unwrap(), paid, "base {}", base);
            assert_eq!(paid, base + bps_of(base, schedule.overhead_bps()).unwrap());
        }
    }

    #[test]
    fn test_payouts_conserve_the_reservation() {
        let (buyer, l1, l2, _, fallback) = keys();
        let graph = MockGraph::default().link(l1, l2);
        let schedule = ReferralSchedule::default();
        let ledger = IssuanceLedger::new(0, u128::MAX, schedule.overhead_bps());

        for base in [1u128, 11, 33, 999, 12_345, 1_000_000_000_000_000_007] {
            let payouts = cascade(&schedule, &graph, &buyer, &l1, &fallback, base).unwrap();
            assert_eq!(base + payouts.total(), ledger.reservation(base).unwrap(), "base {}", base);
        }
    }
}
