//! Settlement / challenge discrimination.

use kabletop_logger::debug;
use kabletop_types::constants::MAX_CHALLENGE_DATA_SIZE;
use kabletop_types::packed::Challenge;

use crate::{ScriptError, Source, SyscallError, TransactionSource};

/// How the battle cell is being spent.
pub(crate) enum Mode {
    /// No continuation cell: the game ends and stakes are split.
    Settlement,
    /// Exactly one continuation cell, carrying the posted challenge.
    Challenge(Challenge),
}

/// Scans the outputs for a continuation cell sharing the battle cell's
/// lock hash and cross-checks any pending challenge left in the input
/// cell's data. Two continuation cells, oversized challenge data or a
/// challenge that fails to advance the game all reject the spend.
pub(crate) fn detect<TS: TransactionSource>(
    source: &TS,
    round_count: usize,
) -> Result<(Mode, Option<Challenge>), ScriptError> {
    let expect_lock_hash = source
        .load_cell_lock_hash(0, Source::GroupInput)
        .map_err(|_| ScriptError::Encoding)?;

    let mut output_challenge: Option<Challenge> = None;
    let mut index = 0;
    loop {
        match source.load_cell_lock_hash(index, Source::Output) {
            Ok(lock_hash) => {
                if lock_hash == expect_lock_hash {
                    if output_challenge.is_some() {
                        return Err(ScriptError::WrongMode);
                    }
                    let data = source
                        .load_cell_data(index, Source::Output)
                        .map_err(|_| ScriptError::WrongMode)?;
                    if data.len() >= MAX_CHALLENGE_DATA_SIZE {
                        return Err(ScriptError::WrongMode);
                    }
                    let challenge =
                        Challenge::from_slice(&data).map_err(|_| ScriptError::WrongMode)?;
                    output_challenge = Some(challenge);
                }
            }
            Err(SyscallError::IndexOutOfBound) => break,
            Err(_) => return Err(ScriptError::WrongMode),
        }
        index += 1;
    }

    // a pending challenge travels in the spent cell's data
    let input_data = source
        .load_cell_data(0, Source::GroupInput)
        .map_err(|_| ScriptError::Encoding)?;
    let input_challenge = if input_data.is_empty() {
        None
    } else {
        if input_data.len() >= MAX_CHALLENGE_DATA_SIZE {
            return Err(ScriptError::WrongMode);
        }
        Some(Challenge::from_slice(&input_data).map_err(|_| ScriptError::WrongMode)?)
    };

    match output_challenge {
        Some(challenge) => {
            // the challenger must advance past the challenged position
            if let Some(pending) = &input_challenge {
                if challenge.as_reader().round_offset() <= pending.as_reader().round_offset() {
                    return Err(ScriptError::WrongMode);
                }
            }
            debug!("mode = challenge");
            Ok((Mode::Challenge(challenge), input_challenge))
        }
        None => {
            // the settler must move past the challenged position
            if let Some(pending) = &input_challenge {
                if round_count <= pending.as_reader().round_offset() as usize {
                    return Err(ScriptError::WrongMode);
                }
            }
            debug!("mode = settlement");
            Ok((Mode::Settlement, input_challenge))
        }
    }
}
