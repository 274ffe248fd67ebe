use bytemuck::{Pod, Zeroable};
use num_enum::TryFromPrimitive;
use steel::Pubkey;

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, TryFromPrimitive)]
pub enum EventType {
    Unknown = 0,

    BuyEvent,
    PresaleEvent,
}

/// Completed purchase. `amount` is the buyer's sale tokens, `coin_amount`
/// what they paid in the coin's units.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BuyEvent {
    pub account: Pubkey,
    pub referral: Pubkey,
    pub amount: [u8; 8],
    pub coin_amount: [u8; 8],
    pub coin_id: [u8; 2],
    _padding: [u8; 6],
}

impl BuyEvent {
    pub fn new(account: Pubkey, amount: u64, coin_id: u16, coin_amount: u64, referral: Pubkey) -> Self {
        Self {
            account,
            referral,
            amount: amount.to_le_bytes(),
            coin_amount: coin_amount.to_le_bytes(),
            coin_id: coin_id.to_le_bytes(),
            _padding: [0; 6],
        }
    }

    pub fn amount(&self) -> u64 {
        u64::from_le_bytes(self.amount)
    }

    pub fn coin_amount(&self) -> u64 {
        u64::from_le_bytes(self.coin_amount)
    }

    pub fn coin_id(&self) -> u16 {
        u16::from_le_bytes(self.coin_id)
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PresaleEvent {
    pub beneficiary: Pubkey,
    pub amount: [u8; 8],
    pub since: [u8; 8],
}

impl PresaleEvent {
    pub fn new(beneficiary: Pubkey, amount: u64, since: i64) -> Self {
        Self {
            beneficiary,
            amount: amount.to_le_bytes(),
            since: since.to_le_bytes(),
        }
    }
}

crate::event!(EventType, BuyEvent);
crate::event!(EventType, PresaleEvent);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_event_bytes() {
        let account = Pubkey::new_unique();
        let referral = Pubkey::new_unique();
        let event = BuyEvent::new(account, 9_000, 999, 1_000, referral);

        let bytes = event.to_bytes();
        assert_eq!(bytes[0], EventType::BuyEvent as u8);
        assert_eq!(bytes.len(), 1 + std::mem::size_of::<BuyEvent>());

        let decoded = BuyEvent::try_from_bytes(&bytes).unwrap();
        assert_eq!(decoded.account, account);
        assert_eq!(decoded.amount(), 9_000);
        assert_eq!(decoded.coin_id(), 999);
        assert_eq!(decoded.coin_amount(), 1_000);
        assert_eq!(decoded.referral, referral);

        assert!(PresaleEvent::try_from_bytes(&bytes).is_none());
    }
}
