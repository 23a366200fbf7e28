//! The pending-challenge record stored in battle cell data.

use bytes::Bytes as OwnedBytes;
use molecule::error::{VerificationError, VerificationResult};

use super::{helpers, Bytes, BytesReader};
use crate::constants::SIGNATURE_SIZE;
use crate::core::UserType;
use crate::prelude::Reader;

const FIELD_COUNT: usize = 4;

const ROUND_OFFSET: usize = 0;
const USER_TYPE: usize = 1;
const SIGNATURE: usize = 2;
const ROUND: usize = 3;

/// A challenge: the round index it was posted at, the challenger, the
/// round's signature and a verbatim copy of the round bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge(OwnedBytes);

#[derive(Debug, Clone, Copy)]
pub struct ChallengeReader<'r>(&'r [u8]);

impl<'r> Reader<'r> for ChallengeReader<'r> {
    const NAME: &'static str = "Challenge";

    fn new_unchecked(slice: &'r [u8]) -> Self {
        ChallengeReader(slice)
    }

    fn as_slice(&self) -> &'r [u8] {
        self.0
    }

    fn verify(slice: &[u8]) -> VerificationResult<()> {
        helpers::verify_table(Self::NAME, slice, FIELD_COUNT)?;
        for (index, size) in [(ROUND_OFFSET, 1), (USER_TYPE, 1), (SIGNATURE, SIGNATURE_SIZE)] {
            let field = helpers::table_field(slice, index, FIELD_COUNT);
            if field.len() != size {
                return Err(VerificationError::TotalSizeNotMatch(
                    Self::NAME.to_owned(),
                    size,
                    field.len(),
                ));
            }
        }
        BytesReader::verify(helpers::table_field(slice, ROUND, FIELD_COUNT))
    }
}

impl<'r> ChallengeReader<'r> {
    /// Index into the round sequence at which the challenge was posted.
    pub fn round_offset(&self) -> u8 {
        helpers::table_field(self.0, ROUND_OFFSET, FIELD_COUNT)[0]
    }

    /// The challenger's wire byte: 0 when unset.
    pub fn user_type_byte(&self) -> u8 {
        helpers::table_field(self.0, USER_TYPE, FIELD_COUNT)[0]
    }

    pub fn user_type(&self) -> Option<UserType> {
        UserType::from_wire(self.user_type_byte())
    }

    pub fn signature(&self) -> &'r [u8] {
        helpers::table_field(self.0, SIGNATURE, FIELD_COUNT)
    }

    /// The challenged round, verbatim.
    pub fn round(&self) -> BytesReader<'r> {
        BytesReader::new_unchecked(helpers::table_field(self.0, ROUND, FIELD_COUNT))
    }
}

impl Challenge {
    pub fn new_unchecked(data: OwnedBytes) -> Self {
        Challenge(data)
    }

    pub fn from_slice(slice: &[u8]) -> VerificationResult<Self> {
        ChallengeReader::verify(slice)?;
        Ok(Challenge(OwnedBytes::copy_from_slice(slice)))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn as_bytes(&self) -> OwnedBytes {
        self.0.clone()
    }

    pub fn as_reader(&self) -> ChallengeReader<'_> {
        ChallengeReader::new_unchecked(&self.0)
    }

    pub fn new_builder() -> ChallengeBuilder {
        ChallengeBuilder::default()
    }
}

#[derive(Debug, Clone)]
pub struct ChallengeBuilder {
    round_offset: u8,
    user_type: u8,
    signature: [u8; SIGNATURE_SIZE],
    round: Vec<u8>,
}

impl Default for ChallengeBuilder {
    fn default() -> Self {
        ChallengeBuilder {
            round_offset: 0,
            user_type: 0,
            signature: [0u8; SIGNATURE_SIZE],
            round: Vec::new(),
        }
    }
}

impl ChallengeBuilder {
    pub fn round_offset(mut self, value: u8) -> Self {
        self.round_offset = value;
        self
    }

    pub fn user_type(mut self, value: UserType) -> Self {
        self.user_type = value.to_wire();
        self
    }

    pub fn signature(mut self, value: [u8; SIGNATURE_SIZE]) -> Self {
        self.signature = value;
        self
    }

    /// The challenged round's serialized bytes, verbatim.
    pub fn round(mut self, value: &[u8]) -> Self {
        self.round = value.to_vec();
        self
    }

    pub fn build(self) -> Challenge {
        let round = Bytes::from_raw(&self.round);
        let data = helpers::build_table(&[
            &[self.round_offset],
            &[self.user_type],
            &self.signature,
            round.as_slice(),
        ]);
        Challenge(data.into())
    }
}
