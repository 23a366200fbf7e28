//! The running-script record: code hash, hash type and lock args.

use bytes::Bytes as OwnedBytes;
use molecule::error::{VerificationError, VerificationResult};

use super::{helpers, Bytes, BytesReader};
use crate::constants::BLAKE2B_BLOCK_SIZE;
use crate::prelude::Reader;

const FIELD_COUNT: usize = 3;

/// A lock or type script reference. The battle parameters travel in
/// `args`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script(OwnedBytes);

#[derive(Debug, Clone, Copy)]
pub struct ScriptReader<'r>(&'r [u8]);

impl<'r> Reader<'r> for ScriptReader<'r> {
    const NAME: &'static str = "Script";

    fn new_unchecked(slice: &'r [u8]) -> Self {
        ScriptReader(slice)
    }

    fn as_slice(&self) -> &'r [u8] {
        self.0
    }

    fn verify(slice: &[u8]) -> VerificationResult<()> {
        helpers::verify_table(Self::NAME, slice, FIELD_COUNT)?;
        let code_hash = helpers::table_field(slice, 0, FIELD_COUNT);
        if code_hash.len() != BLAKE2B_BLOCK_SIZE {
            return Err(VerificationError::TotalSizeNotMatch(
                Self::NAME.to_owned(),
                BLAKE2B_BLOCK_SIZE,
                code_hash.len(),
            ));
        }
        let hash_type = helpers::table_field(slice, 1, FIELD_COUNT);
        if hash_type.len() != 1 {
            return Err(VerificationError::TotalSizeNotMatch(
                Self::NAME.to_owned(),
                1,
                hash_type.len(),
            ));
        }
        BytesReader::verify(helpers::table_field(slice, 2, FIELD_COUNT))
    }
}

impl<'r> ScriptReader<'r> {
    pub fn code_hash(&self) -> &'r [u8] {
        helpers::table_field(self.0, 0, FIELD_COUNT)
    }

    pub fn hash_type(&self) -> u8 {
        helpers::table_field(self.0, 1, FIELD_COUNT)[0]
    }

    pub fn args(&self) -> BytesReader<'r> {
        BytesReader::new_unchecked(helpers::table_field(self.0, 2, FIELD_COUNT))
    }
}

impl Script {
    pub fn new_unchecked(data: OwnedBytes) -> Self {
        Script(data)
    }

    pub fn from_slice(slice: &[u8]) -> VerificationResult<Self> {
        ScriptReader::verify(slice)?;
        Ok(Script(OwnedBytes::copy_from_slice(slice)))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn as_bytes(&self) -> OwnedBytes {
        self.0.clone()
    }

    pub fn as_reader(&self) -> ScriptReader<'_> {
        ScriptReader::new_unchecked(&self.0)
    }

    pub fn new_builder() -> ScriptBuilder {
        ScriptBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    code_hash: [u8; BLAKE2B_BLOCK_SIZE],
    hash_type: u8,
    args: Vec<u8>,
}

impl ScriptBuilder {
    pub fn code_hash(mut self, code_hash: [u8; BLAKE2B_BLOCK_SIZE]) -> Self {
        self.code_hash = code_hash;
        self
    }

    pub fn hash_type(mut self, hash_type: u8) -> Self {
        self.hash_type = hash_type;
        self
    }

    /// Raw args payload; framing is applied here.
    pub fn args(mut self, args: &[u8]) -> Self {
        self.args = args.to_vec();
        self
    }

    pub fn build(self) -> Script {
        let args = Bytes::from_raw(&self.args);
        let data = helpers::build_table(&[
            &self.code_hash,
            &[self.hash_type],
            args.as_slice(),
        ]);
        Script(data.into())
    }
}
