/*
 * Responsibility
 * - /contracts 用のダミーデータ生成 (遅延評価の Iterator)
 *
 * Notes
 * - user_id では絞り込まない (デモ用のプレースホルダ)
 * - RNG は外から渡せるようにしてテストでは seed 固定にする
 */
use rand::{Rng, SeedableRng, rngs::StdRng};

const MAX_CONTRACTS: usize = 20;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRecord {
    pub id: usize,
    pub contract_number: String,
    pub country: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContractService;

impl ContractService {
    pub fn new() -> Self {
        Self
    }

    pub fn load_user_contracts(
        &self,
        user_id: Option<&str>,
    ) -> impl Iterator<Item = ContractRecord> + use<> {
        tracing::debug!(user_id = ?user_id, "loading contracts");
        generate_contracts(StdRng::from_entropy())
    }
}

/// Between 0 and 19 records, ids counting up from 0.
pub fn generate_contracts<R: Rng>(mut rng: R) -> impl Iterator<Item = ContractRecord> {
    let count = rng.gen_range(0..MAX_CONTRACTS);
    (0..count).map(move |id| ContractRecord {
        id,
        contract_number: random_alphabetic(&mut rng, 1, 20),
        country: random_alphabetic(&mut rng, 2, 3),
    })
}

fn random_alphabetic<R: Rng>(rng: &mut R, min_len: usize, max_len: usize) -> String {
    let len = rng.gen_range(min_len..=max_len);
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
