use super::Privkey;
use rand::{thread_rng, Rng};

/// Random key material, used by test suites and off-chain tooling.
pub struct Generator;

impl Generator {
    pub fn random_privkey() -> Privkey {
        let mut data = [0u8; 32];
        loop {
            thread_rng().fill(&mut data[..]);
            let key = Privkey::from_slice(&data);
            if key.pubkey().is_ok() {
                return key;
            }
        }
    }
}
