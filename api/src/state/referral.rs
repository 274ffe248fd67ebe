use steel::*;

/// Parent link stored by the external referral program.
/// PDA seeds: ["referral", child], owned by the referral program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferralRecord {
    pub child: Pubkey,
    pub parent: Pubkey,
}

impl ReferralRecord {
    pub const LEN: usize = 8 + 32 + 32;

    pub fn try_from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < Self::LEN {
            return None;
        }
        let child = Pubkey::try_from(&data[8..40]).ok()?;
        let parent = Pubkey::try_from(&data[40..72]).ok()?;
        Some(Self { child, parent })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = vec![0u8; 8];
        data.extend_from_slice(self.child.as_ref());
        data.extend_from_slice(self.parent.as_ref());
        data
    }
}
