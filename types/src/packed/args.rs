//! The battle parameters carried in the cell's lock args.

use bytes::Bytes as OwnedBytes;
use molecule::error::{VerificationError, VerificationResult};

use super::helpers::{self, read_u64_le};
use super::{Nfts, NftsReader};
use crate::constants::{BLAKE160_SIZE, BLAKE2B_BLOCK_SIZE};
use crate::prelude::Reader;

const FIELD_COUNT: usize = 8;

// field indices
const USER_STAKING_CKB: usize = 0;
const USER_DECK_SIZE: usize = 1;
const BEGIN_BLOCKNUMBER: usize = 2;
const LOCK_CODE_HASH: usize = 3;
const USER1_PKHASH: usize = 4;
const USER2_PKHASH: usize = 5;
const USER1_NFTS: usize = 6;
const USER2_NFTS: usize = 7;

/// Immutable battle parameters, decoded once per verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args(OwnedBytes);

#[derive(Debug, Clone, Copy)]
pub struct ArgsReader<'r>(&'r [u8]);

impl<'r> Reader<'r> for ArgsReader<'r> {
    const NAME: &'static str = "Args";

    fn new_unchecked(slice: &'r [u8]) -> Self {
        ArgsReader(slice)
    }

    fn as_slice(&self) -> &'r [u8] {
        self.0
    }

    fn verify(slice: &[u8]) -> VerificationResult<()> {
        helpers::verify_table(Self::NAME, slice, FIELD_COUNT)?;
        let fixed = [
            (USER_STAKING_CKB, 8),
            (USER_DECK_SIZE, 1),
            (BEGIN_BLOCKNUMBER, 8),
            (LOCK_CODE_HASH, BLAKE2B_BLOCK_SIZE),
            (USER1_PKHASH, BLAKE160_SIZE),
            (USER2_PKHASH, BLAKE160_SIZE),
        ];
        for (index, size) in fixed {
            let field = helpers::table_field(slice, index, FIELD_COUNT);
            if field.len() != size {
                return Err(VerificationError::TotalSizeNotMatch(
                    Self::NAME.to_owned(),
                    size,
                    field.len(),
                ));
            }
        }
        NftsReader::verify(helpers::table_field(slice, USER1_NFTS, FIELD_COUNT))?;
        NftsReader::verify(helpers::table_field(slice, USER2_NFTS, FIELD_COUNT))
    }
}

impl<'r> ArgsReader<'r> {
    pub fn user_staking_ckb(&self) -> u64 {
        read_u64_le(helpers::table_field(self.0, USER_STAKING_CKB, FIELD_COUNT))
    }

    pub fn user_deck_size(&self) -> u8 {
        helpers::table_field(self.0, USER_DECK_SIZE, FIELD_COUNT)[0]
    }

    pub fn begin_blocknumber(&self) -> u64 {
        read_u64_le(helpers::table_field(self.0, BEGIN_BLOCKNUMBER, FIELD_COUNT))
    }

    pub fn lock_code_hash(&self) -> &'r [u8] {
        helpers::table_field(self.0, LOCK_CODE_HASH, FIELD_COUNT)
    }

    pub fn user1_pkhash(&self) -> &'r [u8] {
        helpers::table_field(self.0, USER1_PKHASH, FIELD_COUNT)
    }

    pub fn user2_pkhash(&self) -> &'r [u8] {
        helpers::table_field(self.0, USER2_PKHASH, FIELD_COUNT)
    }

    pub fn user1_nfts(&self) -> NftsReader<'r> {
        NftsReader::new_unchecked(helpers::table_field(self.0, USER1_NFTS, FIELD_COUNT))
    }

    pub fn user2_nfts(&self) -> NftsReader<'r> {
        NftsReader::new_unchecked(helpers::table_field(self.0, USER2_NFTS, FIELD_COUNT))
    }
}

impl Args {
    pub fn new_unchecked(data: OwnedBytes) -> Self {
        Args(data)
    }

    pub fn from_slice(slice: &[u8]) -> VerificationResult<Self> {
        ArgsReader::verify(slice)?;
        Ok(Args(OwnedBytes::copy_from_slice(slice)))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn as_bytes(&self) -> OwnedBytes {
        self.0.clone()
    }

    pub fn as_reader(&self) -> ArgsReader<'_> {
        ArgsReader::new_unchecked(&self.0)
    }

    pub fn new_builder() -> ArgsBuilder {
        ArgsBuilder::default()
    }
}

#[derive(Debug, Clone)]
pub struct ArgsBuilder {
    user_staking_ckb: u64,
    user_deck_size: u8,
    begin_blocknumber: u64,
    lock_code_hash: [u8; BLAKE2B_BLOCK_SIZE],
    user1_pkhash: [u8; BLAKE160_SIZE],
    user2_pkhash: [u8; BLAKE160_SIZE],
    user1_nfts: Nfts,
    user2_nfts: Nfts,
}

impl Default for ArgsBuilder {
    fn default() -> Self {
        ArgsBuilder {
            user_staking_ckb: 0,
            user_deck_size: 0,
            begin_blocknumber: 0,
            lock_code_hash: [0u8; BLAKE2B_BLOCK_SIZE],
            user1_pkhash: [0u8; BLAKE160_SIZE],
            user2_pkhash: [0u8; BLAKE160_SIZE],
            user1_nfts: Nfts::from_items(&[]),
            user2_nfts: Nfts::from_items(&[]),
        }
    }
}

impl ArgsBuilder {
    pub fn user_staking_ckb(mut self, value: u64) -> Self {
        self.user_staking_ckb = value;
        self
    }

    pub fn user_deck_size(mut self, value: u8) -> Self {
        self.user_deck_size = value;
        self
    }

    pub fn begin_blocknumber(mut self, value: u64) -> Self {
        self.begin_blocknumber = value;
        self
    }

    pub fn lock_code_hash(mut self, value: [u8; BLAKE2B_BLOCK_SIZE]) -> Self {
        self.lock_code_hash = value;
        self
    }

    pub fn user1_pkhash(mut self, value: [u8; BLAKE160_SIZE]) -> Self {
        self.user1_pkhash = value;
        self
    }

    pub fn user2_pkhash(mut self, value: [u8; BLAKE160_SIZE]) -> Self {
        self.user2_pkhash = value;
        self
    }

    pub fn user1_nfts(mut self, value: Nfts) -> Self {
        self.user1_nfts = value;
        self
    }

    pub fn user2_nfts(mut self, value: Nfts) -> Self {
        self.user2_nfts = value;
        self
    }

    pub fn build(self) -> Args {
        let data = helpers::build_table(&[
            &self.user_staking_ckb.to_le_bytes(),
            &[self.user_deck_size],
            &self.begin_blocknumber.to_le_bytes(),
            &self.lock_code_hash,
            &self.user1_pkhash,
            &self.user2_pkhash,
            self.user1_nfts.as_slice(),
            self.user2_nfts.as_slice(),
        ]);
        Args(data.into())
    }
}
