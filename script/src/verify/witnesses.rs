//! The witness chain: load every round, maintain the linked digest and
//! verify the countersignatures of the last two rounds.

use byteorder::{ByteOrder, LittleEndian};
use kabletop_crypto::secp::{Message, Signature};
use kabletop_hash::{blake160, new_blake2b};
use kabletop_logger::debug;
use kabletop_types::constants::{
    MAX_OPERATIONS_PER_ROUND, MAX_ROUND_COUNT, MAX_ROUND_SIZE, SIGNATURE_SIZE,
};
use kabletop_types::core::UserType;
use kabletop_types::packed::{ArgsReader, RoundReader, WitnessArgsReader};
use kabletop_types::prelude::Reader;

use super::RoundData;
use crate::{sign, ScriptError, Source, SyscallError, TransactionSource};

/// Identifies the spend signer, loads the round witnesses and validates
/// the linked-hash signature chain.
///
/// Every round's message commits to the previous round's message and
/// signature, so rewriting any earlier round invalidates all later
/// signatures; public key recovery is expensive, so only the last two
/// rounds, one authored by each player, are verified directly.
pub(crate) fn verify_chain<TS: TransactionSource>(
    source: &TS,
    args: ArgsReader<'_>,
) -> Result<(UserType, Vec<RoundData>), ScriptError> {
    let signer = sign::recover_signer(source, args)?;

    // the block of witnesses past the regular input unlocks
    let offset = source.inputs_len();
    let mut witnesses = Vec::new();
    loop {
        match source.load_witness(offset + witnesses.len(), Source::Input) {
            Ok(witness) => {
                if witness.len() > MAX_ROUND_SIZE {
                    return Err(ScriptError::ExcessiveWitnessBytes);
                }
                witnesses.push(witness);
            }
            Err(SyscallError::IndexOutOfBound) => break,
            Err(_) => return Err(ScriptError::Encoding),
        }
    }
    let round_count = witnesses.len();
    if round_count == 0 || round_count > MAX_ROUND_COUNT {
        return Err(ScriptError::ExcessiveRounds);
    }

    let lock_hash = source
        .load_cell_lock_hash(0, Source::GroupInput)
        .map_err(|_| ScriptError::Encoding)?;
    let capacity = source
        .load_cell_capacity(0, Source::GroupInput)
        .map_err(|_| ScriptError::Encoding)?;

    let mut rounds: Vec<RoundData> = Vec::with_capacity(round_count);
    let mut previous: Option<[u8; 32]> = None;
    for (index, witness) in witnesses.iter().enumerate() {
        let reader = WitnessArgsReader::from_slice(witness).map_err(|_| ScriptError::Encoding)?;
        let lock = reader.lock().ok_or(ScriptError::Encoding)?;
        if lock.raw_data().len() != SIGNATURE_SIZE {
            return Err(ScriptError::Encoding);
        }
        let mut signature = [0u8; SIGNATURE_SIZE];
        signature.copy_from_slice(lock.raw_data());
        let payload = reader
            .input_type()
            .ok_or(ScriptError::Encoding)?
            .raw_data();
        let round = RoundReader::from_slice(payload).map_err(|_| ScriptError::RoundFormat)?;
        if round.operations().len() > MAX_OPERATIONS_PER_ROUND {
            return Err(ScriptError::RoundFormat);
        }

        // the chain starts from the battle cell's identity; every later
        // link commits to the previous message and signature
        let mut hasher = new_blake2b();
        match (previous, rounds.last()) {
            (Some(message), Some(last)) => {
                hasher.update(&message);
                hasher.update(&last.signature);
            }
            _ => {
                hasher.update(&lock_hash);
                hasher.update(&capacity.to_le_bytes());
            }
        }
        hasher.update(payload);
        let mut message = [0u8; 32];
        hasher.finalize(&mut message);

        if index + 2 >= round_count {
            verify_round_signature(args, round.user_type(), &signature, &message)?;
        }

        rounds.push(RoundData {
            payload: payload.to_vec(),
            signature,
            seed: [
                LittleEndian::read_u64(&signature[..8]),
                LittleEndian::read_u64(&signature[8..16]),
            ],
        });
        previous = Some(message);
    }

    if let Some(message) = previous {
        let mut hex = [0u8; 64];
        if faster_hex::hex_encode(&message, &mut hex).is_ok() {
            debug!(
                "witness chain verified: {round_count} rounds, signer = {signer}, tail digest 0x{}",
                String::from_utf8_lossy(&hex)
            );
        }
    }
    Ok((signer, rounds))
}

/// A round must be countersigned by the opponent of its author.
fn verify_round_signature(
    args: ArgsReader<'_>,
    author: UserType,
    signature: &[u8; SIGNATURE_SIZE],
    message: &[u8; 32],
) -> Result<(), ScriptError> {
    let signature = Signature::from_slice(signature).map_err(|_| ScriptError::Encoding)?;
    let message = Message::from(*message);
    let pubkey = signature
        .recover(&message)
        .map_err(|_| ScriptError::WrongUserRound)?;
    let pkhash = blake160(pubkey.serialize());
    let expected = match author.opposite() {
        UserType::User1 => args.user1_pkhash(),
        UserType::User2 => args.user2_pkhash(),
    };
    if pkhash != expected {
        return Err(ScriptError::WrongUserRound);
    }
    Ok(())
}
