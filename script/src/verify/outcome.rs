//! Outcome arbitration: payout split in settlement, shape checks in
//! challenge.

use kabletop_logger::debug;
use kabletop_types::constants::BLAKE160_SIZE;
use kabletop_types::core::UserType;
use kabletop_types::packed::{ArgsReader, Challenge, ScriptReader};
use kabletop_types::prelude::Reader;

use super::RoundData;
use crate::{ScriptError, Source, SyscallError, TransactionSource};

/// Validates a settlement: both players' payout cells exist, a
/// no-winner settlement is only allowed after the opponent defaulted on
/// a challenge, and the split respects the staking bounds.
pub(crate) fn verify_settlement<TS: TransactionSource>(
    source: &TS,
    args: ArgsReader<'_>,
    signer: UserType,
    input_challenge: Option<&Challenge>,
    winner: i64,
) -> Result<(), ScriptError> {
    let (user1_ckb, user2_ckb) = collect_payouts(source, args)?;
    let funding_ckb = source
        .load_cell_capacity(0, Source::GroupInput)
        .map_err(|_| ScriptError::Encoding)?;
    let staking_ckb = args.user_staking_ckb();

    let winner = match winner {
        0 => arbitrate_timeout(source, args, signer, input_challenge)?,
        1 => UserType::User1,
        2 => UserType::User2,
        _ => return Err(ScriptError::WrongOperationCode),
    };

    debug!("winner = {winner}");
    let (winner_ckb, loser_ckb) = match winner {
        UserType::User1 => (user1_ckb, user2_ckb),
        UserType::User2 => (user2_ckb, user1_ckb),
    };
    // the winner may claim at most the loser's stake plus whatever the
    // cell held beyond the two stakes; both players recover theirs
    let spread = i128::from(winner_ckb) - i128::from(loser_ckb);
    let margin = i128::from(funding_ckb) - 2 * i128::from(staking_ckb);
    if spread > margin || u128::from(winner_ckb) + u128::from(loser_ckb) < 2 * u128::from(staking_ckb)
    {
        return Err(ScriptError::ResultFormat);
    }
    Ok(())
}

/// A no-winner settlement is a default-win claim: the pending challenge
/// must come from the opponent, and the input's `since` must reach the
/// quadratic deadline.
fn arbitrate_timeout<TS: TransactionSource>(
    source: &TS,
    args: ArgsReader<'_>,
    signer: UserType,
    input_challenge: Option<&Challenge>,
) -> Result<UserType, ScriptError> {
    let challenge = input_challenge.ok_or(ScriptError::WrongBattleResult)?;
    match challenge.as_reader().user_type() {
        None => return Err(ScriptError::WrongBattleResult),
        Some(challenger) if challenger == signer => {
            return Err(ScriptError::WrongBattleResult)
        }
        Some(_) => {}
    }
    let since = source
        .load_input_since(0, Source::GroupInput)
        .map_err(|_| ScriptError::Encoding)?;
    let rounds_played = u64::from(challenge.as_reader().round_offset()) + 1;
    let n = rounds_played.clamp(5, 30);
    let deadline = args.begin_blocknumber() + n * n;
    if since < deadline {
        debug!("timeout claim at {since}, deadline {deadline}");
        return Err(ScriptError::WrongSince);
    }
    Ok(signer)
}

/// Finds each player's payout cell: an output whose lock uses the
/// user-wallet code hash with the player's key hash leading its args.
/// First match per player wins.
fn collect_payouts<TS: TransactionSource>(
    source: &TS,
    args: ArgsReader<'_>,
) -> Result<(u64, u64), ScriptError> {
    let mut user1_ckb = None;
    let mut user2_ckb = None;
    let mut index = 0;
    loop {
        match source.load_cell_lock(index, Source::Output) {
            Ok(lock) => {
                let script =
                    ScriptReader::from_slice(&lock).map_err(|_| ScriptError::Encoding)?;
                if script.code_hash() == args.lock_code_hash() {
                    let lock_args = script.args().raw_data();
                    if lock_args.len() >= BLAKE160_SIZE {
                        let head = &lock_args[..BLAKE160_SIZE];
                        if head == args.user1_pkhash() && user1_ckb.is_none() {
                            user1_ckb = Some(load_capacity(source, index)?);
                        } else if head == args.user2_pkhash() && user2_ckb.is_none() {
                            user2_ckb = Some(load_capacity(source, index)?);
                        }
                    }
                }
            }
            Err(SyscallError::IndexOutOfBound) => break,
            Err(_) => return Err(ScriptError::Encoding),
        }
        index += 1;
    }
    match (user1_ckb, user2_ckb) {
        (Some(user1_ckb), Some(user2_ckb)) => Ok((user1_ckb, user2_ckb)),
        _ => Err(ScriptError::SettlementFormat),
    }
}

fn load_capacity<TS: TransactionSource>(source: &TS, index: usize) -> Result<u64, ScriptError> {
    source
        .load_cell_capacity(index, Source::Output)
        .map_err(|_| ScriptError::Encoding)
}

/// Validates a challenge: the posted record must mirror the latest
/// round exactly. The winner value and the timelock are not consulted;
/// this spend only persists the newest signed round.
pub(crate) fn verify_challenge(
    rounds: &[RoundData],
    challenge: &Challenge,
) -> Result<(), ScriptError> {
    let last = rounds.last().ok_or(ScriptError::ChallengeFormat)?;
    let reader = challenge.as_reader();
    if usize::from(reader.round_offset()) != rounds.len() - 1 {
        return Err(ScriptError::ChallengeFormat);
    }
    check_last_round_signature(last, reader.signature())
        .map_err(|_| ScriptError::ChallengeFormat)?;
    if reader.round().raw_data() != last.payload.as_slice() {
        return Err(ScriptError::ChallengeFormat);
    }
    Ok(())
}

/// Byte equality against the signature the witness walk already
/// loaded; no cryptographic recomputation happens here.
fn check_last_round_signature(
    last: &RoundData,
    expected: &[u8],
) -> Result<(), ScriptError> {
    if expected != last.signature {
        return Err(ScriptError::WrongRoundSignature);
    }
    Ok(())
}
