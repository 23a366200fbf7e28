//! The input-group sighash and spend-signer recovery.

use byteorder::{ByteOrder, LittleEndian};
use kabletop_crypto::secp::{Message, Signature};
use kabletop_hash::{blake160, new_blake2b};
use kabletop_types::constants::SIGNATURE_SIZE;
use kabletop_types::core::UserType;
use kabletop_types::packed::{ArgsReader, WitnessArgs, WitnessArgsReader};
use kabletop_types::prelude::Reader;

use crate::{ScriptError, Source, SyscallError, TransactionSource};

/// Computes the canonical sighash-all message of the input group: the
/// transaction hash, the group's first witness with its lock slot
/// zeroed, then every witness past the input count (the round block),
/// each length-prefixed. The spend signature therefore commits to the
/// full round history on top of the chain-link digest.
pub(crate) fn input_group_sighash<TS: TransactionSource>(
    source: &TS,
) -> Result<Message, ScriptError> {
    let tx_hash = source.load_tx_hash().map_err(|_| ScriptError::Encoding)?;
    let witness = source
        .load_witness(0, Source::GroupInput)
        .map_err(|_| ScriptError::Encoding)?;
    let reader = WitnessArgsReader::from_slice(&witness).map_err(|_| ScriptError::Encoding)?;
    // the placeholder must occupy the same slot size the signature does
    if reader
        .lock()
        .map(|lock| lock.raw_data().len() != SIGNATURE_SIZE)
        .unwrap_or(true)
    {
        return Err(ScriptError::Encoding);
    }
    let mut zeroed = WitnessArgs::new_builder().lock(&[0u8; SIGNATURE_SIZE]);
    if let Some(input_type) = reader.input_type() {
        zeroed = zeroed.input_type(input_type.raw_data());
    }
    if let Some(output_type) = reader.output_type() {
        zeroed = zeroed.output_type(output_type.raw_data());
    }
    let zeroed = zeroed.build();

    let mut hasher = new_blake2b();
    hasher.update(&tx_hash);
    absorb(&mut hasher, zeroed.as_slice());
    // witnesses with no corresponding input carry the rounds
    let mut index = source.inputs_len();
    loop {
        match source.load_witness(index, Source::Input) {
            Ok(witness) => absorb(&mut hasher, &witness),
            Err(SyscallError::IndexOutOfBound) => break,
            Err(_) => return Err(ScriptError::Encoding),
        }
        index += 1;
    }
    let mut digest = [0u8; 32];
    hasher.finalize(&mut digest);
    Ok(Message::from(digest))
}

fn absorb(hasher: &mut kabletop_hash::Blake2b, bytes: &[u8]) {
    let mut len_bytes = [0u8; 8];
    LittleEndian::write_u64(&mut len_bytes, bytes.len() as u64);
    hasher.update(&len_bytes);
    hasher.update(bytes);
}

/// Recovers the spend signer from the group's first witness and matches
/// the key hash against the two players.
pub(crate) fn recover_signer<TS: TransactionSource>(
    source: &TS,
    args: ArgsReader<'_>,
) -> Result<UserType, ScriptError> {
    let message = input_group_sighash(source)?;
    let witness = source
        .load_witness(0, Source::GroupInput)
        .map_err(|_| ScriptError::Encoding)?;
    let reader = WitnessArgsReader::from_slice(&witness).map_err(|_| ScriptError::Encoding)?;
    let lock = reader.lock().ok_or(ScriptError::Encoding)?;
    let signature = Signature::from_slice(lock.raw_data()).map_err(|_| ScriptError::Encoding)?;
    let pubkey = signature
        .recover(&message)
        .map_err(|_| ScriptError::PubkeyHash)?;
    let pkhash = blake160(pubkey.serialize());
    if pkhash == args.user1_pkhash() {
        Ok(UserType::User1)
    } else if pkhash == args.user2_pkhash() {
        Ok(UserType::User2)
    } else {
        Err(ScriptError::PubkeyHash)
    }
}
