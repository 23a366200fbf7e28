//! Deterministic replay of every round's scripted operations.

use kabletop_logger::debug;
use kabletop_types::constants::CELLDEP_CODE_PREFIX;
use kabletop_types::packed::ArgsReader;
use kabletop_vm::{rule_library, Chunk, Vm};

use super::{OperationPolicy, RoundData};
use crate::{ScriptError, Source, SyscallError, TransactionSource};

/// Prepares an interpreter context, executes every round's operations
/// in order and reads back the declared winner.
pub(crate) fn run<TS: TransactionSource>(
    source: &TS,
    args: ArgsReader<'_>,
    rounds: &[RoundData],
    policy: OperationPolicy,
) -> Result<i64, ScriptError> {
    let mut vm = Vm::new();

    let script_hash = source
        .load_script_hash()
        .map_err(|_| ScriptError::Encoding)?;
    vm.seed_from_script_hash(&script_hash);

    // rule library linked into this binary
    load_context_chunk(&mut vm, rule_library())?;

    // modular rule extensions shipped as tagged cell-deps
    let mut index = 0;
    loop {
        match source.load_cell_data(index, Source::CellDep) {
            Ok(data) => {
                if data.starts_with(CELLDEP_CODE_PREFIX) {
                    load_context_chunk(&mut vm, &data[CELLDEP_CODE_PREFIX.len()..])?;
                }
            }
            Err(SyscallError::IndexOutOfBound) => break,
            Err(_) => return Err(ScriptError::WrongContextCode),
        }
        index += 1;
    }

    vm.set_bytes_list("_user1_nfts", args.user1_nfts().iter());
    vm.set_bytes_list("_user2_nfts", args.user2_nfts().iter());

    for (round_index, round) in rounds.iter().enumerate() {
        vm.set_random_seed(round.seed[0], round.seed[1]);
        let reader = round.reader();
        for (op_index, operation) in reader.operations().iter().enumerate() {
            let result = Chunk::load(operation.raw_data()).and_then(|chunk| vm.execute(&chunk));
            if let Err(error) = result {
                debug!("operation [{round_index}-{op_index}] failed: {error}");
                match policy {
                    OperationPolicy::Strict => return Err(ScriptError::WrongOperationCode),
                    OperationPolicy::Lenient => continue,
                }
            }
        }
    }

    // non-integer values read as "no winner yet"
    let winner = vm.global_int("_winner").unwrap_or(0);
    debug!("replay finished, winner = {winner}");
    Ok(winner)
}

fn load_context_chunk(vm: &mut Vm, code: &[u8]) -> Result<(), ScriptError> {
    let chunk = Chunk::load(code).map_err(|_| ScriptError::WrongContextCode)?;
    vm.execute(&chunk)
        .map_err(|_| ScriptError::WrongContextCode)
}
