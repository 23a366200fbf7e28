//! One turn's worth of scripted operations, authored by one player.

use bytes::Bytes as OwnedBytes;
use molecule::error::{VerificationError, VerificationResult};

use super::{helpers, Bytes, BytesReader};
use crate::core::UserType;
use crate::prelude::Reader;

const FIELD_COUNT: usize = 2;

const USER_TYPE: usize = 0;
const OPERATIONS: usize = 1;

/// An ordered sequence of opaque operation chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operations(OwnedBytes);

#[derive(Debug, Clone, Copy)]
pub struct OperationsReader<'r>(&'r [u8]);

impl<'r> Reader<'r> for OperationsReader<'r> {
    const NAME: &'static str = "Operations";

    fn new_unchecked(slice: &'r [u8]) -> Self {
        OperationsReader(slice)
    }

    fn as_slice(&self) -> &'r [u8] {
        self.0
    }

    fn verify(slice: &[u8]) -> VerificationResult<()> {
        helpers::verify_dynvec(Self::NAME, slice, BytesReader::verify)?;
        Ok(())
    }
}

impl<'r> OperationsReader<'r> {
    pub fn len(&self) -> usize {
        helpers::dynvec_length(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<BytesReader<'r>> {
        if index < self.len() {
            Some(BytesReader::new_unchecked(helpers::dynvec_item(
                self.0, index,
            )))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = BytesReader<'r>> + '_ {
        (0..self.len()).map(move |i| BytesReader::new_unchecked(helpers::dynvec_item(self.0, i)))
    }
}

impl Operations {
    pub fn new_unchecked(data: OwnedBytes) -> Self {
        Operations(data)
    }

    pub fn from_slice(slice: &[u8]) -> VerificationResult<Self> {
        OperationsReader::verify(slice)?;
        Ok(Operations(OwnedBytes::copy_from_slice(slice)))
    }

    /// Frames each raw chunk and assembles the sequence.
    pub fn from_raw(chunks: &[Vec<u8>]) -> Self {
        let framed: Vec<Bytes> = chunks.iter().map(|c| Bytes::from_raw(c)).collect();
        let slices: Vec<&[u8]> = framed.iter().map(|b| b.as_slice()).collect();
        Operations(helpers::build_dynvec(&slices).into())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn as_bytes(&self) -> OwnedBytes {
        self.0.clone()
    }

    pub fn as_reader(&self) -> OperationsReader<'_> {
        OperationsReader::new_unchecked(&self.0)
    }
}

/// A round: who authored it, and the operation chunks it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round(OwnedBytes);

#[derive(Debug, Clone, Copy)]
pub struct RoundReader<'r>(&'r [u8]);

impl<'r> Reader<'r> for RoundReader<'r> {
    const NAME: &'static str = "Round";

    fn new_unchecked(slice: &'r [u8]) -> Self {
        RoundReader(slice)
    }

    fn as_slice(&self) -> &'r [u8] {
        self.0
    }

    fn verify(slice: &[u8]) -> VerificationResult<()> {
        helpers::verify_table(Self::NAME, slice, FIELD_COUNT)?;
        let user_type = helpers::table_field(slice, USER_TYPE, FIELD_COUNT);
        if user_type.len() != 1 {
            return Err(VerificationError::TotalSizeNotMatch(
                Self::NAME.to_owned(),
                1,
                user_type.len(),
            ));
        }
        if UserType::from_wire(user_type[0]).is_none() {
            return Err(VerificationError::UnknownItem(
                Self::NAME.to_owned(),
                2,
                user_type[0] as u32,
            ));
        }
        OperationsReader::verify(helpers::table_field(slice, OPERATIONS, FIELD_COUNT))
    }
}

impl<'r> RoundReader<'r> {
    /// The author of this round. Verified readers always carry a legal
    /// wire value.
    pub fn user_type(&self) -> UserType {
        let byte = helpers::table_field(self.0, USER_TYPE, FIELD_COUNT)[0];
        UserType::from_wire(byte).unwrap_or(UserType::User1)
    }

    pub fn operations(&self) -> OperationsReader<'r> {
        OperationsReader::new_unchecked(helpers::table_field(self.0, OPERATIONS, FIELD_COUNT))
    }
}

impl Round {
    pub fn new_unchecked(data: OwnedBytes) -> Self {
        Round(data)
    }

    pub fn from_slice(slice: &[u8]) -> VerificationResult<Self> {
        RoundReader::verify(slice)?;
        Ok(Round(OwnedBytes::copy_from_slice(slice)))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn as_bytes(&self) -> OwnedBytes {
        self.0.clone()
    }

    pub fn as_reader(&self) -> RoundReader<'_> {
        RoundReader::new_unchecked(&self.0)
    }

    pub fn new_builder() -> RoundBuilder {
        RoundBuilder::default()
    }
}

#[derive(Debug, Clone)]
pub struct RoundBuilder {
    user_type: UserType,
    operations: Operations,
}

impl Default for RoundBuilder {
    fn default() -> Self {
        RoundBuilder {
            user_type: UserType::User1,
            operations: Operations::from_raw(&[]),
        }
    }
}

impl RoundBuilder {
    pub fn user_type(mut self, value: UserType) -> Self {
        self.user_type = value;
        self
    }

    pub fn operations(mut self, value: Operations) -> Self {
        self.operations = value;
        self
    }

    pub fn build(self) -> Round {
        let data = helpers::build_table(&[
            &[self.user_type.to_wire()],
            self.operations.as_slice(),
        ]);
        Round(data.into())
    }
}
