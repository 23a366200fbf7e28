//! The three-slot witness framing.
//!
//! Round witnesses carry the 65-byte signature in `lock` and the
//! serialized round in `input_type`; `output_type` stays empty.

use bytes::Bytes as OwnedBytes;
use molecule::error::VerificationResult;

use super::{helpers, Bytes, BytesReader};
use crate::prelude::Reader;

const FIELD_COUNT: usize = 3;

const LOCK: usize = 0;
const INPUT_TYPE: usize = 1;
const OUTPUT_TYPE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessArgs(OwnedBytes);

#[derive(Debug, Clone, Copy)]
pub struct WitnessArgsReader<'r>(&'r [u8]);

impl<'r> Reader<'r> for WitnessArgsReader<'r> {
    const NAME: &'static str = "WitnessArgs";

    fn new_unchecked(slice: &'r [u8]) -> Self {
        WitnessArgsReader(slice)
    }

    fn as_slice(&self) -> &'r [u8] {
        self.0
    }

    fn verify(slice: &[u8]) -> VerificationResult<()> {
        helpers::verify_table(Self::NAME, slice, FIELD_COUNT)?;
        for index in [LOCK, INPUT_TYPE, OUTPUT_TYPE] {
            let field = helpers::table_field(slice, index, FIELD_COUNT);
            if !field.is_empty() {
                BytesReader::verify(field)?;
            }
        }
        Ok(())
    }
}

impl<'r> WitnessArgsReader<'r> {
    fn optional_field(&self, index: usize) -> Option<BytesReader<'r>> {
        let field = helpers::table_field(self.0, index, FIELD_COUNT);
        if field.is_empty() {
            None
        } else {
            Some(BytesReader::new_unchecked(field))
        }
    }

    pub fn lock(&self) -> Option<BytesReader<'r>> {
        self.optional_field(LOCK)
    }

    pub fn input_type(&self) -> Option<BytesReader<'r>> {
        self.optional_field(INPUT_TYPE)
    }

    pub fn output_type(&self) -> Option<BytesReader<'r>> {
        self.optional_field(OUTPUT_TYPE)
    }
}

impl WitnessArgs {
    pub fn new_unchecked(data: OwnedBytes) -> Self {
        WitnessArgs(data)
    }

    pub fn from_slice(slice: &[u8]) -> VerificationResult<Self> {
        WitnessArgsReader::verify(slice)?;
        Ok(WitnessArgs(OwnedBytes::copy_from_slice(slice)))
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn as_bytes(&self) -> OwnedBytes {
        self.0.clone()
    }

    pub fn as_reader(&self) -> WitnessArgsReader<'_> {
        WitnessArgsReader::new_unchecked(&self.0)
    }

    pub fn new_builder() -> WitnessArgsBuilder {
        WitnessArgsBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WitnessArgsBuilder {
    lock: Option<Vec<u8>>,
    input_type: Option<Vec<u8>>,
    output_type: Option<Vec<u8>>,
}

impl WitnessArgsBuilder {
    pub fn lock(mut self, value: &[u8]) -> Self {
        self.lock = Some(value.to_vec());
        self
    }

    pub fn input_type(mut self, value: &[u8]) -> Self {
        self.input_type = Some(value.to_vec());
        self
    }

    pub fn output_type(mut self, value: &[u8]) -> Self {
        self.output_type = Some(value.to_vec());
        self
    }

    pub fn build(self) -> WitnessArgs {
        let frame = |slot: Option<Vec<u8>>| slot.map(|raw| Bytes::from_raw(&raw));
        let lock = frame(self.lock);
        let input_type = frame(self.input_type);
        let output_type = frame(self.output_type);
        let empty: &[u8] = &[];
        let data = helpers::build_table(&[
            lock.as_ref().map_or(empty, |b| b.as_slice()),
            input_type.as_ref().map_or(empty, |b| b.as_slice()),
            output_type.as_ref().map_or(empty, |b| b.as_slice()),
        ]);
        WitnessArgs(data.into())
    }
}
