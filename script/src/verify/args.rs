//! Battle-parameter recovery from the running script's lock args.

use kabletop_types::constants::MAX_SCRIPT_SIZE;
use kabletop_types::packed::{Args, ScriptReader};
use kabletop_types::prelude::Reader;

use crate::{ScriptError, TransactionSource};

/// Loads the running script, validates both frames and hands back the
/// owned battle parameters.
///
/// Deck-size agreement between `user_deck_size` and the two nft
/// sequences is not checked here: a lock script never runs while its
/// cell is being created, so that examination belongs to the two game
/// clients off-chain.
pub(crate) fn decode<TS: TransactionSource>(source: &TS) -> Result<Args, ScriptError> {
    let script = source
        .load_script()
        .map_err(|_| ScriptError::ScriptFormat)?;
    if script.len() > MAX_SCRIPT_SIZE {
        return Err(ScriptError::ScriptFormat);
    }
    let reader = ScriptReader::from_slice(&script).map_err(|_| ScriptError::ScriptFormat)?;
    Args::from_slice(reader.args().raw_data()).map_err(|_| ScriptError::ArgsFormat)
}
