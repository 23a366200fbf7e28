//! Frame-walking primitives shared by the packed records.
//!
//! Layouts follow the molecule conventions: a table is a little-endian
//! `u32` total size, one `u32` offset per field, then the fields
//! back-to-back; a fixvec is a `u32` item count followed by fixed-size
//! items; a dynvec is shaped like a table whose "fields" are its items.

use molecule::{
    error::{VerificationError, VerificationResult},
    unpack_number, Number, NUMBER_SIZE,
};

/// Validates a table frame: total size, offset header, field count and
/// offset monotonicity. Field interiors are verified by the caller.
pub(crate) fn verify_table(name: &str, slice: &[u8], field_count: usize) -> VerificationResult<()> {
    let len = slice.len();
    if len < NUMBER_SIZE {
        return Err(VerificationError::HeaderIsBroken(
            name.to_owned(),
            NUMBER_SIZE,
            len,
        ));
    }
    let total = unpack_number(slice) as usize;
    if total != len {
        return Err(VerificationError::TotalSizeNotMatch(
            name.to_owned(),
            total,
            len,
        ));
    }
    if len < NUMBER_SIZE * 2 {
        return Err(VerificationError::HeaderIsBroken(
            name.to_owned(),
            NUMBER_SIZE * 2,
            len,
        ));
    }
    let first = unpack_number(&slice[NUMBER_SIZE..]) as usize;
    if first % NUMBER_SIZE != 0 || first < NUMBER_SIZE * 2 {
        return Err(VerificationError::OffsetsNotMatch(name.to_owned()));
    }
    let actual = first / NUMBER_SIZE - 1;
    if actual != field_count {
        return Err(VerificationError::FieldCountNotMatch(
            name.to_owned(),
            field_count,
            actual,
        ));
    }
    if len < first {
        return Err(VerificationError::HeaderIsBroken(name.to_owned(), first, len));
    }
    let mut prev = first;
    for index in 1..field_count {
        let offset = unpack_number(&slice[NUMBER_SIZE * (1 + index)..]) as usize;
        if offset < prev || offset > total {
            return Err(VerificationError::OffsetsNotMatch(name.to_owned()));
        }
        prev = offset;
    }
    Ok(())
}

/// Field slice of a verified table.
pub(crate) fn table_field<'r>(slice: &'r [u8], index: usize, field_count: usize) -> &'r [u8] {
    let start = unpack_number(&slice[NUMBER_SIZE * (1 + index)..]) as usize;
    let end = if index + 1 == field_count {
        unpack_number(slice) as usize
    } else {
        unpack_number(&slice[NUMBER_SIZE * (2 + index)..]) as usize
    };
    &slice[start..end]
}

/// Validates a fixvec frame against its fixed item size.
pub(crate) fn verify_fixvec(name: &str, slice: &[u8], item_size: usize) -> VerificationResult<()> {
    let len = slice.len();
    if len < NUMBER_SIZE {
        return Err(VerificationError::HeaderIsBroken(
            name.to_owned(),
            NUMBER_SIZE,
            len,
        ));
    }
    let count = unpack_number(slice) as usize;
    let expected = NUMBER_SIZE + count * item_size;
    if expected != len {
        return Err(VerificationError::TotalSizeNotMatch(
            name.to_owned(),
            expected,
            len,
        ));
    }
    Ok(())
}

pub(crate) fn fixvec_length(slice: &[u8]) -> usize {
    unpack_number(slice) as usize
}

pub(crate) fn fixvec_item<'r>(slice: &'r [u8], item_size: usize, index: usize) -> &'r [u8] {
    let start = NUMBER_SIZE + index * item_size;
    &slice[start..start + item_size]
}

pub(crate) fn fixvec_payload<'r>(slice: &'r [u8]) -> &'r [u8] {
    &slice[NUMBER_SIZE..]
}

/// Validates a dynvec frame and every item with the supplied item
/// verifier. Returns the item count.
pub(crate) fn verify_dynvec(
    name: &str,
    slice: &[u8],
    verify_item: impl Fn(&[u8]) -> VerificationResult<()>,
) -> VerificationResult<usize> {
    let len = slice.len();
    if len < NUMBER_SIZE {
        return Err(VerificationError::HeaderIsBroken(
            name.to_owned(),
            NUMBER_SIZE,
            len,
        ));
    }
    let total = unpack_number(slice) as usize;
    if total != len {
        return Err(VerificationError::TotalSizeNotMatch(
            name.to_owned(),
            total,
            len,
        ));
    }
    if total == NUMBER_SIZE {
        return Ok(0);
    }
    if len < NUMBER_SIZE * 2 {
        return Err(VerificationError::HeaderIsBroken(
            name.to_owned(),
            NUMBER_SIZE * 2,
            len,
        ));
    }
    let first = unpack_number(&slice[NUMBER_SIZE..]) as usize;
    if first % NUMBER_SIZE != 0 || first < NUMBER_SIZE * 2 {
        return Err(VerificationError::OffsetsNotMatch(name.to_owned()));
    }
    let count = first / NUMBER_SIZE - 1;
    verify_table(name, slice, count)?;
    for index in 0..count {
        verify_item(dynvec_item(slice, index))?;
    }
    Ok(count)
}

pub(crate) fn dynvec_length(slice: &[u8]) -> usize {
    if slice.len() == NUMBER_SIZE {
        0
    } else {
        unpack_number(&slice[NUMBER_SIZE..]) as usize / NUMBER_SIZE - 1
    }
}

pub(crate) fn dynvec_item<'r>(slice: &'r [u8], index: usize) -> &'r [u8] {
    table_field(slice, index, dynvec_length(slice))
}

/// Serializes a table (or dynvec) from already-serialized parts.
pub(crate) fn build_table(fields: &[&[u8]]) -> Vec<u8> {
    let header = NUMBER_SIZE * (1 + fields.len());
    let total = header + fields.iter().map(|f| f.len()).sum::<usize>();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&pack(total));
    let mut offset = header;
    for field in fields {
        out.extend_from_slice(&pack(offset));
        offset += field.len();
    }
    for field in fields {
        out.extend_from_slice(field);
    }
    out
}

/// Serializes a fixvec from its raw item payload.
pub(crate) fn build_fixvec(payload: &[u8], item_size: usize) -> Vec<u8> {
    debug_assert!(payload.len() % item_size == 0);
    let count = payload.len() / item_size;
    let mut out = Vec::with_capacity(NUMBER_SIZE + payload.len());
    out.extend_from_slice(&pack(count));
    out.extend_from_slice(payload);
    out
}

pub(crate) fn build_dynvec(items: &[&[u8]]) -> Vec<u8> {
    if items.is_empty() {
        pack(NUMBER_SIZE).to_vec()
    } else {
        build_table(items)
    }
}

fn pack(value: usize) -> [u8; NUMBER_SIZE] {
    molecule::pack_number(value as Number)
}

pub(crate) fn read_u64_le(slice: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&slice[..8]);
    u64::from_le_bytes(buf)
}
