//! In-memory transactions and pre-signed games for the test suites.

use byteorder::{ByteOrder, LittleEndian};
use kabletop_crypto::secp::{Message, Privkey};
use kabletop_hash::{blake160, blake2b_256, new_blake2b};
use kabletop_types::bytes::Bytes;
use kabletop_types::constants::SIGNATURE_SIZE;
use kabletop_types::core::UserType;
use kabletop_types::packed::{Args, Challenge, Nfts, Operations, Round, Script, WitnessArgs};
use kabletop_vm::Asm;

use crate::{Source, SyscallError, SyscallResult, TransactionSource};

/// Routes interpreter and verifier diagnostics to the test output.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Code hash of the battle lock itself.
pub const BATTLE_CODE_HASH: [u8; 32] = [0xb7; 32];
/// Code hash of the user-wallet lock payout cells must use.
pub const WALLET_CODE_HASH: [u8; 32] = [0x77; 32];

pub const DEFAULT_FUNDING: u64 = 1000;
pub const DEFAULT_STAKING: u64 = 300;
pub const DEFAULT_BEGIN: u64 = 1000;

pub struct MockCell {
    pub lock: Vec<u8>,
    pub capacity: u64,
    pub data: Vec<u8>,
    pub since: u64,
}

/// A transaction held in plain vectors; index 0 of `inputs` doubles as
/// the input group.
pub struct MockTransaction {
    pub script: Vec<u8>,
    pub inputs: Vec<MockCell>,
    pub outputs: Vec<MockCell>,
    pub cell_deps: Vec<Vec<u8>>,
    pub witnesses: Vec<Vec<u8>>,
    pub tx_hash: [u8; 32],
}

impl MockTransaction {
    fn cell(&self, index: usize, source: Source) -> SyscallResult<&MockCell> {
        let cell = match source {
            Source::Input => self.inputs.get(index),
            Source::Output => self.outputs.get(index),
            Source::GroupInput => {
                if index == 0 {
                    self.inputs.first()
                } else {
                    None
                }
            }
            Source::CellDep => None,
        };
        cell.ok_or(SyscallError::IndexOutOfBound)
    }
}

impl TransactionSource for MockTransaction {
    fn load_script(&self) -> SyscallResult<Bytes> {
        Ok(Bytes::copy_from_slice(&self.script))
    }

    fn load_script_hash(&self) -> SyscallResult<[u8; 32]> {
        Ok(blake2b_256(&self.script))
    }

    fn load_tx_hash(&self) -> SyscallResult<[u8; 32]> {
        Ok(self.tx_hash)
    }

    fn load_cell_lock(&self, index: usize, source: Source) -> SyscallResult<Bytes> {
        Ok(Bytes::copy_from_slice(&self.cell(index, source)?.lock))
    }

    fn load_cell_lock_hash(&self, index: usize, source: Source) -> SyscallResult<[u8; 32]> {
        Ok(blake2b_256(&self.cell(index, source)?.lock))
    }

    fn load_cell_capacity(&self, index: usize, source: Source) -> SyscallResult<u64> {
        Ok(self.cell(index, source)?.capacity)
    }

    fn load_cell_data(&self, index: usize, source: Source) -> SyscallResult<Bytes> {
        if source == Source::CellDep {
            return self
                .cell_deps
                .get(index)
                .map(|data| Bytes::copy_from_slice(data))
                .ok_or(SyscallError::IndexOutOfBound);
        }
        Ok(Bytes::copy_from_slice(&self.cell(index, source)?.data))
    }

    fn load_witness(&self, index: usize, _source: Source) -> SyscallResult<Bytes> {
        self.witnesses
            .get(index)
            .map(|witness| Bytes::copy_from_slice(witness))
            .ok_or(SyscallError::IndexOutOfBound)
    }

    fn load_input_since(&self, index: usize, source: Source) -> SyscallResult<u64> {
        Ok(self.cell(index, source)?.since)
    }

    fn inputs_len(&self) -> usize {
        self.inputs.len()
    }
}

pub fn user1_key() -> Privkey {
    Privkey::from_slice(&[0x11; 32])
}

pub fn user2_key() -> Privkey {
    Privkey::from_slice(&[0x22; 32])
}

pub fn attacker_key() -> Privkey {
    Privkey::from_slice(&[0x33; 32])
}

pub fn pkhash(key: &Privkey) -> [u8; 20] {
    blake160(key.pubkey().expect("pubkey").serialize())
}

/// An operation that deals damage to one player's hit points.
pub fn attack_op(target: UserType, damage: i64) -> Vec<u8> {
    let hp = match target {
        UserType::User1 => "_user1_hp",
        UserType::User2 => "_user2_hp",
    };
    Asm::new()
        .load(hp)
        .push_int(damage)
        .sub()
        .store(hp)
        .finish()
}

/// An operation that declares a winner outright.
pub fn declare_winner_op(winner: i64) -> Vec<u8> {
    Asm::new().push_int(winner).store("_winner").finish()
}

/// Signs the linked-hash chain over the given round payloads. The
/// closure supplies round `i`'s signature given its chain message.
pub fn sign_chain(
    lock_hash: &[u8; 32],
    capacity: u64,
    payloads: &[Vec<u8>],
    mut sig_for: impl FnMut(usize, &[u8; 32]) -> [u8; SIGNATURE_SIZE],
) -> Vec<[u8; SIGNATURE_SIZE]> {
    let mut signatures: Vec<[u8; SIGNATURE_SIZE]> = Vec::with_capacity(payloads.len());
    let mut previous: Option<[u8; 32]> = None;
    for (index, payload) in payloads.iter().enumerate() {
        let mut hasher = new_blake2b();
        match (previous, signatures.last()) {
            (Some(message), Some(signature)) => {
                hasher.update(&message);
                hasher.update(signature);
            }
            _ => {
                hasher.update(lock_hash);
                hasher.update(&capacity.to_le_bytes());
            }
        }
        hasher.update(payload);
        let mut message = [0u8; 32];
        hasher.finalize(&mut message);
        signatures.push(sig_for(index, &message));
        previous = Some(message);
    }
    signatures
}

pub fn sign_message(key: &Privkey, message: &[u8; 32]) -> [u8; SIGNATURE_SIZE] {
    let signature = key
        .sign_recoverable(&Message::from(*message))
        .expect("sign");
    let mut out = [0u8; SIGNATURE_SIZE];
    out.copy_from_slice(&signature.serialize());
    out
}

/// Builds round witnesses: signature in `lock`, payload in `input_type`.
pub fn round_witnesses(payloads: &[Vec<u8>], signatures: &[[u8; SIGNATURE_SIZE]]) -> Vec<Vec<u8>> {
    payloads
        .iter()
        .zip(signatures)
        .map(|(payload, signature)| {
            WitnessArgs::new_builder()
                .lock(signature)
                .input_type(payload)
                .build()
                .as_slice()
                .to_vec()
        })
        .collect()
}

/// A fully signed game ready to be wrapped into spend transactions.
pub struct TestGame {
    pub user1_key: Privkey,
    pub user2_key: Privkey,
    pub staking: u64,
    pub funding: u64,
    pub begin_blocknumber: u64,
    pub deck_size: u8,
    pub signer: UserType,
    pub battle_script: Script,
    pub rounds: Vec<Round>,
    pub signatures: Vec<[u8; SIGNATURE_SIZE]>,
}

impl TestGame {
    /// Builds and countersigns a game from `(author, operations)` round
    /// specs.
    pub fn new(specs: &[(UserType, Vec<Vec<u8>>)]) -> Self {
        let user1_key = user1_key();
        let user2_key = user2_key();
        let deck_size = 2u8;
        let nfts1 = Nfts::from_items(&[[0xa1; 20], [0xa2; 20]]);
        let nfts2 = Nfts::from_items(&[[0xb1; 20], [0xb2; 20]]);
        let args = Args::new_builder()
            .user_staking_ckb(DEFAULT_STAKING)
            .user_deck_size(deck_size)
            .begin_blocknumber(DEFAULT_BEGIN)
            .lock_code_hash(WALLET_CODE_HASH)
            .user1_pkhash(pkhash(&user1_key))
            .user2_pkhash(pkhash(&user2_key))
            .user1_nfts(nfts1)
            .user2_nfts(nfts2)
            .build();
        let battle_script = Script::new_builder()
            .code_hash(BATTLE_CODE_HASH)
            .hash_type(1)
            .args(args.as_slice())
            .build();

        let rounds: Vec<Round> = specs
            .iter()
            .map(|(author, chunks)| {
                Round::new_builder()
                    .user_type(*author)
                    .operations(Operations::from_raw(chunks))
                    .build()
            })
            .collect();

        let lock_hash = blake2b_256(battle_script.as_slice());
        let payloads: Vec<Vec<u8>> = rounds.iter().map(|r| r.as_slice().to_vec()).collect();
        let signatures = sign_chain(&lock_hash, DEFAULT_FUNDING, &payloads, |index, message| {
            // every round is countersigned by the author's opponent
            let key = match specs[index].0.opposite() {
                UserType::User1 => &user1_key,
                UserType::User2 => &user2_key,
            };
            sign_message(key, message)
        });

        TestGame {
            user1_key,
            user2_key,
            staking: DEFAULT_STAKING,
            funding: DEFAULT_FUNDING,
            begin_blocknumber: DEFAULT_BEGIN,
            deck_size,
            signer: UserType::User1,
            battle_script,
            rounds,
            signatures,
        }
    }

    /// Alternating authorship starting from user 1, one no-op round
    /// each, no operations.
    pub fn with_empty_rounds(count: usize) -> Self {
        let specs: Vec<(UserType, Vec<Vec<u8>>)> = (0..count)
            .map(|i| {
                let author = if i % 2 == 0 {
                    UserType::User1
                } else {
                    UserType::User2
                };
                (author, vec![])
            })
            .collect();
        TestGame::new(&specs)
    }

    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.rounds.iter().map(|r| r.as_slice().to_vec()).collect()
    }

    pub fn lock_hash(&self) -> [u8; 32] {
        blake2b_256(self.battle_script.as_slice())
    }

    fn signer_key(&self) -> &Privkey {
        match self.signer {
            UserType::User1 => &self.user1_key,
            UserType::User2 => &self.user2_key,
        }
    }

    /// Wraps the game into a transaction with the given outputs.
    pub fn build_tx(&self, outputs: Vec<MockCell>, input_data: Vec<u8>, since: u64) -> MockTransaction {
        let tx_hash = [0x99; 32];
        let rounds = round_witnesses(&self.payloads(), &self.signatures);
        let mut witnesses = vec![spend_witness(self.signer_key(), &tx_hash, &rounds)];
        witnesses.extend(rounds);
        MockTransaction {
            script: self.battle_script.as_slice().to_vec(),
            inputs: vec![MockCell {
                lock: self.battle_script.as_slice().to_vec(),
                capacity: self.funding,
                data: input_data,
                since,
            }],
            outputs,
            cell_deps: Vec::new(),
            witnesses,
            tx_hash,
        }
    }

    /// A settlement spend paying each player the given capacity.
    pub fn settlement(&self, user1_ckb: u64, user2_ckb: u64) -> MockTransaction {
        self.build_tx(
            vec![
                wallet_cell(pkhash(&self.user1_key), user1_ckb),
                wallet_cell(pkhash(&self.user2_key), user2_ckb),
            ],
            Vec::new(),
            0,
        )
    }

    /// The challenge record mirroring the latest round.
    pub fn output_challenge(&self) -> Challenge {
        let last = self.rounds.len() - 1;
        Challenge::new_builder()
            .round_offset(last as u8)
            .user_type(self.signer)
            .signature(self.signatures[last])
            .round(self.rounds[last].as_slice())
            .build()
    }

    /// A challenge spend posting the given record on the continuation
    /// cell.
    pub fn challenge_tx(&self, challenge: &Challenge) -> MockTransaction {
        self.build_tx(
            vec![MockCell {
                lock: self.battle_script.as_slice().to_vec(),
                capacity: self.funding,
                data: challenge.as_slice().to_vec(),
                since: 0,
            }],
            Vec::new(),
            0,
        )
    }
}

/// The group's first witness: the spend signature over the zeroed-lock
/// sighash, which also absorbs every round witness.
pub fn spend_witness(key: &Privkey, tx_hash: &[u8; 32], round_witnesses: &[Vec<u8>]) -> Vec<u8> {
    let zeroed = WitnessArgs::new_builder()
        .lock(&[0u8; SIGNATURE_SIZE])
        .build();
    let mut hasher = new_blake2b();
    hasher.update(tx_hash);
    absorb(&mut hasher, zeroed.as_slice());
    for witness in round_witnesses {
        absorb(&mut hasher, witness);
    }
    let mut message = [0u8; 32];
    hasher.finalize(&mut message);
    let signature = sign_message(key, &message);
    WitnessArgs::new_builder()
        .lock(&signature)
        .build()
        .as_slice()
        .to_vec()
}

fn absorb(hasher: &mut kabletop_hash::Blake2b, bytes: &[u8]) {
    let mut len_bytes = [0u8; 8];
    LittleEndian::write_u64(&mut len_bytes, bytes.len() as u64);
    hasher.update(&len_bytes);
    hasher.update(bytes);
}

/// Recomputes the spend witness after the round witnesses changed.
pub fn resign_spend(tx: &mut MockTransaction, key: &Privkey) {
    let witness = spend_witness(key, &tx.tx_hash, &tx.witnesses[1..]);
    tx.witnesses[0] = witness;
}

/// A payout cell guarded by the user-wallet lock.
pub fn wallet_cell(pkhash: [u8; 20], capacity: u64) -> MockCell {
    let lock = Script::new_builder()
        .code_hash(WALLET_CODE_HASH)
        .hash_type(1)
        .args(&pkhash)
        .build();
    MockCell {
        lock: lock.as_slice().to_vec(),
        capacity,
        data: Vec::new(),
        since: 0,
    }
}
