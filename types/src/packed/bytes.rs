//! Byte-string and NFT-sequence records.

use bytes::Bytes as OwnedBytes;
use molecule::error::VerificationResult;

use super::helpers;
use crate::constants::BLAKE160_SIZE;
use crate::prelude::Reader;

/// An opaque byte string: item count followed by the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bytes(OwnedBytes);

#[derive(Debug, Clone, Copy)]
pub struct BytesReader<'r>(&'r [u8]);

impl<'r> Reader<'r> for BytesReader<'r> {
    const NAME: &'static str = "Bytes";

    fn new_unchecked(slice: &'r [u8]) -> Self {
        BytesReader(slice)
    }

    fn as_slice(&self) -> &'r [u8] {
        self.0
    }

    fn verify(slice: &[u8]) -> VerificationResult<()> {
        helpers::verify_fixvec(Self::NAME, slice, 1)
    }
}

impl<'r> BytesReader<'r> {
    /// The payload without the length prefix.
    pub fn raw_data(&self) -> &'r [u8] {
        helpers::fixvec_payload(self.0)
    }

    pub fn len(&self) -> usize {
        helpers::fixvec_length(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Bytes {
    pub fn new_unchecked(data: OwnedBytes) -> Self {
        Bytes(data)
    }

    pub fn from_slice(slice: &[u8]) -> VerificationResult<Self> {
        BytesReader::verify(slice)?;
        Ok(Bytes(OwnedBytes::copy_from_slice(slice)))
    }

    /// Serializes a raw byte string into its framed form.
    pub fn from_raw(raw: &[u8]) -> Self {
        Bytes(helpers::build_fixvec(raw, 1).into())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn as_bytes(&self) -> OwnedBytes {
        self.0.clone()
    }

    pub fn as_reader(&self) -> BytesReader<'_> {
        BytesReader::new_unchecked(&self.0)
    }

    pub fn raw_data(&self) -> &[u8] {
        self.as_reader().raw_data()
    }
}

/// An ordered sequence of 20-byte NFT identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfts(OwnedBytes);

#[derive(Debug, Clone, Copy)]
pub struct NftsReader<'r>(&'r [u8]);

impl<'r> Reader<'r> for NftsReader<'r> {
    const NAME: &'static str = "Nfts";

    fn new_unchecked(slice: &'r [u8]) -> Self {
        NftsReader(slice)
    }

    fn as_slice(&self) -> &'r [u8] {
        self.0
    }

    fn verify(slice: &[u8]) -> VerificationResult<()> {
        helpers::verify_fixvec(Self::NAME, slice, BLAKE160_SIZE)
    }
}

impl<'r> NftsReader<'r> {
    pub fn len(&self) -> usize {
        helpers::fixvec_length(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The 20-byte identifier at `index`.
    pub fn get(&self, index: usize) -> Option<&'r [u8]> {
        if index < self.len() {
            Some(helpers::fixvec_item(self.0, BLAKE160_SIZE, index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'r [u8]> + '_ {
        (0..self.len()).map(move |i| helpers::fixvec_item(self.0, BLAKE160_SIZE, i))
    }
}

impl Nfts {
    pub fn new_unchecked(data: OwnedBytes) -> Self {
        Nfts(data)
    }

    pub fn from_slice(slice: &[u8]) -> VerificationResult<Self> {
        NftsReader::verify(slice)?;
        Ok(Nfts(OwnedBytes::copy_from_slice(slice)))
    }

    pub fn from_items(items: &[[u8; BLAKE160_SIZE]]) -> Self {
        let mut payload = Vec::with_capacity(items.len() * BLAKE160_SIZE);
        for item in items {
            payload.extend_from_slice(item);
        }
        Nfts(helpers::build_fixvec(&payload, BLAKE160_SIZE).into())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn as_bytes(&self) -> OwnedBytes {
        self.0.clone()
    }

    pub fn as_reader(&self) -> NftsReader<'_> {
        NftsReader::new_unchecked(&self.0)
    }
}
