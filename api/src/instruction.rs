use steel::*;
use crate::prelude::*;

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, TryFromPrimitive)]
pub enum InstructionType {
    Unknown = 0,

    InitializeSaleIx,
    AddAdminIx,
    SetOracleIx,
    FetchCoinIx,

    BuyIx,
    BuyNativeIx,
    BuySignedIx,
    BuyNativeSignedIx,

    PreviewBuyIx,
    PreviewBuyNativeIx,

    PresaleBulkLoadIx,
}

instruction!(InstructionType, InitializeSaleIx);
instruction!(InstructionType, AddAdminIx);
instruction!(InstructionType, SetOracleIx);
instruction!(InstructionType, FetchCoinIx);
instruction!(InstructionType, BuyIx);
instruction!(InstructionType, BuyNativeIx);
instruction!(InstructionType, BuySignedIx);
instruction!(InstructionType, BuyNativeSignedIx);
instruction!(InstructionType, PreviewBuyIx);
instruction!(InstructionType, PreviewBuyNativeIx);
instruction!(InstructionType, PresaleBulkLoadIx);

#[derive(Debug)]
pub struct ParsedInitializeSaleIx {
    pub cap: u128,
    pub presale_loader: Pubkey,
    pub foundation: Pubkey,
    pub team: Pubkey,
    pub default_referral: Pubkey,
    pub referral_program: Pubkey,
    pub vesting_program: Pubkey,

    pub bump: u8,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct InitializeSaleIx {
    pub cap: [u8; 16],
    pub presale_loader: Pubkey,
    pub foundation: Pubkey,
    pub team: Pubkey,
    pub default_referral: Pubkey,
    pub referral_program: Pubkey,
    pub vesting_program: Pubkey,

    pub bump: u8,
    _padding: [u8; 7],
}

impl InitializeSaleIx {
    pub fn from_struct(parsed: ParsedInitializeSaleIx) -> Self {
        Self {
            cap: parsed.cap.to_le_bytes(),
            presale_loader: parsed.presale_loader,
            foundation: parsed.foundation,
            team: parsed.team,
            default_referral: parsed.default_referral,
            referral_program: parsed.referral_program,
            vesting_program: parsed.vesting_program,

            bump: parsed.bump,
            _padding: [0; 7],
        }
    }

    pub fn to_struct(&self) -> ParsedInitializeSaleIx {
        ParsedInitializeSaleIx {
            cap: u128::from_le_bytes(self.cap),
            presale_loader: self.presale_loader,
            foundation: self.foundation,
            team: self.team,
            default_referral: self.default_referral,
            referral_program: self.referral_program,
            vesting_program: self.vesting_program,

            bump: self.bump,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct AddAdminIx {
    pub admin: Pubkey,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SetOracleIx {
    pub oracle: EthAddress,
}

#[derive(Debug)]
pub struct ParsedFetchCoinIx {
    pub rate: u64,
    pub rate_mode: u8,
    pub bump: u8,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FetchCoinIx {
    pub rate: [u8; 8],
    pub rate_mode: u8,
    pub bump: u8,
}

impl FetchCoinIx {
    pub fn from_struct(parsed: ParsedFetchCoinIx) -> Self {
        Self {
            rate: parsed.rate.to_le_bytes(),
            rate_mode: parsed.rate_mode,
            bump: parsed.bump,
        }
    }

    pub fn to_struct(&self) -> ParsedFetchCoinIx {
        ParsedFetchCoinIx {
            rate: u64::from_le_bytes(self.rate),
            rate_mode: self.rate_mode,
            bump: self.bump,
        }
    }
}

#[derive(Debug)]
pub struct ParsedBuyIx {
    pub amount: u64,
    pub referral: Pubkey,
    pub exact_output: bool,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BuyIx {
    pub amount: [u8; 8],
    pub referral: Pubkey,
    pub exact_output: u8,
}

impl BuyIx {
    pub fn from_struct(parsed: ParsedBuyIx) -> Self {
        Self {
            amount: parsed.amount.to_le_bytes(),
            referral: parsed.referral,
            exact_output: parsed.exact_output as u8,
        }
    }

    pub fn to_struct(&self) -> ParsedBuyIx {
        ParsedBuyIx {
            amount: u64::from_le_bytes(self.amount),
            referral: self.referral,
            exact_output: self.exact_output != 0,
        }
    }
}

#[derive(Debug)]
pub struct ParsedBuyNativeIx {
    pub amount: u64,
    pub value: u64,             // Lamports attached to the purchase
    pub referral: Pubkey,
    pub exact_output: bool,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BuyNativeIx {
    pub amount: [u8; 8],
    pub value: [u8; 8],
    pub referral: Pubkey,
    pub exact_output: u8,
}

impl BuyNativeIx {
    pub fn from_struct(parsed: ParsedBuyNativeIx) -> Self {
        Self {
            amount: parsed.amount.to_le_bytes(),
            value: parsed.value.to_le_bytes(),
            referral: parsed.referral,
            exact_output: parsed.exact_output as u8,
        }
    }

    pub fn to_struct(&self) -> ParsedBuyNativeIx {
        ParsedBuyNativeIx {
            amount: u64::from_le_bytes(self.amount),
            value: u64::from_le_bytes(self.value),
            referral: self.referral,
            exact_output: self.exact_output != 0,
        }
    }
}

/// Oracle signature in `r || s` form plus its recovery byte.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct RawVoucherSignature {
    pub rs: [u8; 64],
    pub v: u8,
}

impl RawVoucherSignature {
    pub fn from_bytes(signature: &[u8; SIGNATURE_LEN]) -> Self {
        let mut rs = [0u8; 64];
        rs.copy_from_slice(&signature[..64]);
        Self { rs, v: signature[64] }
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut signature = [0u8; SIGNATURE_LEN];
        signature[..64].copy_from_slice(&self.rs);
        signature[64] = self.v;
        signature
    }
}

#[derive(Debug)]
pub struct ParsedBuySignedIx {
    pub amount: u64,
    pub referral: Pubkey,
    pub exact_output: bool,
    pub nonce: u64,
    pub signature: [u8; SIGNATURE_LEN],

    pub nonce_bump: u8,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BuySignedIx {
    pub amount: [u8; 8],
    pub referral: Pubkey,
    pub nonce: [u8; 8],
    pub signature: RawVoucherSignature,
    pub exact_output: u8,

    pub nonce_bump: u8,
}

impl BuySignedIx {
    pub fn from_struct(parsed: ParsedBuySignedIx) -> Self {
        Self {
            amount: parsed.amount.to_le_bytes(),
            referral: parsed.referral,
            nonce: parsed.nonce.to_le_bytes(),
            signature: RawVoucherSignature::from_bytes(&parsed.signature),
            exact_output: parsed.exact_output as u8,

            nonce_bump: parsed.nonce_bump,
        }
    }

    pub fn to_struct(&self) -> ParsedBuySignedIx {
        ParsedBuySignedIx {
            amount: u64::from_le_bytes(self.amount),
            referral: self.referral,
            exact_output: self.exact_output != 0,
            nonce: u64::from_le_bytes(self.nonce),
            signature: self.signature.to_bytes(),

            nonce_bump: self.nonce_bump,
        }
    }
}

#[derive(Debug)]
pub struct ParsedBuyNativeSignedIx {
    pub amount: u64,
    pub value: u64,
    pub referral: Pubkey,
    pub exact_output: bool,
    pub nonce: u64,
    pub signature: [u8; SIGNATURE_LEN],

    pub nonce_bump: u8,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BuyNativeSignedIx {
    pub amount: [u8; 8],
    pub value: [u8; 8],
    pub referral: Pubkey,
    pub nonce: [u8; 8],
    pub signature: RawVoucherSignature,
    pub exact_output: u8,

    pub nonce_bump: u8,
}

impl BuyNativeSignedIx {
    pub fn from_struct(parsed: ParsedBuyNativeSignedIx) -> Self {
        Self {
            amount: parsed.amount.to_le_bytes(),
            value: parsed.value.to_le_bytes(),
            referral: parsed.referral,
            nonce: parsed.nonce.to_le_bytes(),
            signature: RawVoucherSignature::from_bytes(&parsed.signature),
            exact_output: parsed.exact_output as u8,

            nonce_bump: parsed.nonce_bump,
        }
    }

    pub fn to_struct(&self) -> ParsedBuyNativeSignedIx {
        ParsedBuyNativeSignedIx {
            amount: u64::from_le_bytes(self.amount),
            value: u64::from_le_bytes(self.value),
            referral: self.referral,
            exact_output: self.exact_output != 0,
            nonce: u64::from_le_bytes(self.nonce),
            signature: self.signature.to_bytes(),

            nonce_bump: self.nonce_bump,
        }
    }
}

#[derive(Debug)]
pub struct ParsedPreviewBuyIx {
    pub amount: u64,
    pub exact_output: bool,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PreviewBuyIx {
    pub amount: [u8; 8],
    pub exact_output: u8,
}

impl PreviewBuyIx {
    pub fn from_struct(parsed: ParsedPreviewBuyIx) -> Self {
        Self {
            amount: parsed.amount.to_le_bytes(),
            exact_output: parsed.exact_output as u8,
        }
    }

    pub fn to_struct(&self) -> ParsedPreviewBuyIx {
        ParsedPreviewBuyIx {
            amount: u64::from_le_bytes(self.amount),
            exact_output: self.exact_output != 0,
        }
    }
}

/// Same layout as [`PreviewBuyIx`]; the native coin account is implied.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PreviewBuyNativeIx {
    pub amount: [u8; 8],
    pub exact_output: u8,
}

impl PreviewBuyNativeIx {
    pub fn from_struct(parsed: ParsedPreviewBuyIx) -> Self {
        Self {
            amount: parsed.amount.to_le_bytes(),
            exact_output: parsed.exact_output as u8,
        }
    }

    pub fn to_struct(&self) -> ParsedPreviewBuyIx {
        ParsedPreviewBuyIx {
            amount: u64::from_le_bytes(self.amount),
            exact_output: self.exact_output != 0,
        }
    }
}

/// Return data of the preview instructions: `(quote, coin_id)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuyPreview {
    pub quote: u64,
    pub coin_id: u16,
}

impl BuyPreview {
    pub const LEN: usize = 10;

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut data = [0u8; Self::LEN];
        data[..8].copy_from_slice(&self.quote.to_le_bytes());
        data[8..].copy_from_slice(&self.coin_id.to_le_bytes());
        data
    }

    pub fn try_from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() != Self::LEN {
            return None;
        }
        Some(Self {
            quote: u64::from_le_bytes(data[..8].try_into().ok()?),
            coin_id: u16::from_le_bytes(data[8..].try_into().ok()?),
        })
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct RawPresaleEntry {
    pub beneficiary: Pubkey,
    pub amount: [u8; 8],
    pub since: [u8; 8],
}

#[derive(Debug)]
pub struct ParsedPresaleBulkLoadIx {
    pub beneficiaries: Vec<Pubkey>,
    pub amounts: Vec<u64>,
    pub since_dates: Vec<i64>,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PresaleBulkLoadIx {
    pub entries: [RawPresaleEntry; MAX_PRESALE_BATCH],
    pub count: u8,
}

impl PresaleBulkLoadIx {
    /// Packs the parallel lists. Lists of different lengths, an empty batch
    /// and batches over `MAX_PRESALE_BATCH` are rejected.
    pub fn from_struct(parsed: ParsedPresaleBulkLoadIx) -> Result<Self, SaleError> {
        let count = parsed.beneficiaries.len();
        if count == 0
            || count > MAX_PRESALE_BATCH
            || parsed.amounts.len() != count
            || parsed.since_dates.len() != count
        {
            return Err(SaleError::InvalidBatch);
        }

        let mut entries = [RawPresaleEntry::default(); MAX_PRESALE_BATCH];
        for (i, entry) in entries.iter_mut().take(count).enumerate() {
            *entry = RawPresaleEntry {
                beneficiary: parsed.beneficiaries[i],
                amount: parsed.amounts[i].to_le_bytes(),
                since: parsed.since_dates[i].to_le_bytes(),
            };
        }

        Ok(Self {
            entries,
            count: count as u8,
        })
    }

    pub fn to_struct(&self) -> Result<ParsedPresaleBulkLoadIx, SaleError> {
        let count = self.count as usize;
        if count == 0 || count > MAX_PRESALE_BATCH {
            return Err(SaleError::InvalidBatch);
        }

        let entries = &self.entries[..count];
        Ok(ParsedPresaleBulkLoadIx {
            beneficiaries: entries.iter().map(|e| e.beneficiary).collect(),
            amounts: entries.iter().map(|e| u64::from_le_bytes(e.amount)).collect(),
            since_dates: entries.iter().map(|e| i64::from_le_bytes(e.since)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presale_lists_must_match() {
        let parsed = ParsedPresaleBulkLoadIx {
            beneficiaries: vec![Pubkey::new_unique(), Pubkey::new_unique()],
            amounts: vec![10],
            since_dates: vec![1_601_424_000, 1_598_918_400],
        };
        assert_eq!(PresaleBulkLoadIx::from_struct(parsed).err(), Some(SaleError::InvalidBatch));

        let oversized = ParsedPresaleBulkLoadIx {
            beneficiaries: vec![Pubkey::new_unique(); MAX_PRESALE_BATCH + 1],
            amounts: vec![1; MAX_PRESALE_BATCH + 1],
            since_dates: vec![0; MAX_PRESALE_BATCH + 1],
        };
        assert_eq!(PresaleBulkLoadIx::from_struct(oversized).err(), Some(SaleError::InvalidBatch));
    }

    #[test]
    fn test_presale_batch_survives_the_wire() {
        let beneficiaries = vec![Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique()];
        let ix = PresaleBulkLoadIx::from_struct(ParsedPresaleBulkLoadIx {
            beneficiaries: beneficiaries.clone(),
            amounts: vec![10_123, 123_987, 124_654],
            since_dates: vec![1_601_424_000, 1_598_918_400, 1_599_004_800],
        })
        .unwrap();

        let bytes = ix.to_bytes();
        assert_eq!(bytes[0], InstructionType::PresaleBulkLoadIx as u8);

        let parsed = PresaleBulkLoadIx::try_from_bytes(&bytes[1..]).unwrap().to_struct().unwrap();
        assert_eq!(parsed.beneficiaries, beneficiaries);
        assert_eq!(parsed.amounts, vec![10_123, 123_987, 124_654]);
        assert_eq!(parsed.since_dates[2], 1_599_004_800);
    }

    #[test]
    fn test_preview_return_data() {
        let preview = BuyPreview { quote: 90, coin_id: NATIVE_COIN_ID };
        assert_eq!(BuyPreview::try_from_bytes(&preview.to_bytes()), Some(preview));
        assert_eq!(BuyPreview::try_from_bytes(&[0u8; 3]), None);
    }
}
