/// Logs a Pod record through `sol_log_data`, prefixed with its one-byte
/// event type.
#[macro_export]
macro_rules! event {
    ($discriminator_name:ident, $struct_name:ident) => {
        impl $struct_name {
            pub fn discriminator() -> u8 {
                $discriminator_name::$struct_name as u8
            }

            pub fn to_bytes(&self) -> Vec<u8> {
                let mut data = vec![Self::discriminator()];
                data.extend_from_slice(bytemuck::bytes_of(self));
                data
            }

            pub fn try_from_bytes(data: &[u8]) -> Option<Self> {
                let (discriminator, body) = data.split_first()?;
                if *discriminator != Self::discriminator()
                    || body.len() != std::mem::size_of::<Self>()
                {
                    return None;
                }
                Some(bytemuck::pod_read_unaligned(body))
            }

            pub fn log(&self) {
                solana_program::log::sol_log_data(&[&self.to_bytes()]);
            }
        }
    };
}
