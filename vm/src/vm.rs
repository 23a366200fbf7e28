//! The interpreter handle.

use std::collections::HashMap;

use kabletop_logger::debug;

use crate::chunk::Instr;
use crate::rng::XorShift128Plus;
use crate::{Chunk, Value, VmError, MAX_STACK, MAX_STEPS};

/// One interpreter context, exclusively owned by its caller.
///
/// Globals live in the handle's root environment and are read and
/// written through typed accessors; nothing here is process-global.
#[derive(Debug)]
pub struct Vm {
    globals: HashMap<String, Value>,
    rng: XorShift128Plus,
    stack: Vec<Value>,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    pub fn new() -> Self {
        let mut globals = HashMap::new();
        globals.insert("_winner".to_owned(), Value::Int(0));
        Vm {
            globals,
            rng: XorShift128Plus::new(0, 0),
            stack: Vec::new(),
        }
    }

    /// Reseeds the PRNG; equal seeds always reproduce equal streams.
    pub fn set_random_seed(&mut self, x: u64, y: u64) {
        self.rng.reseed(x, y);
    }

    /// Derives the initial seed from a 32-byte script hash: the low 7
    /// bits of bytes 0..8 fold into the first seed half, bytes 8..16
    /// into the second. Per-contract determinism, nothing a block
    /// explorer cannot already see.
    pub fn seed_from_script_hash(&mut self, hash: &[u8; 32]) {
        let fold = |slice: &[u8]| {
            slice
                .iter()
                .fold(0u64, |acc, byte| (acc << 8) | u64::from(byte >> 1))
        };
        self.set_random_seed(fold(&hash[..8]), fold(&hash[8..16]));
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    pub fn global_int(&self, name: &str) -> Option<i64> {
        self.globals.get(name).and_then(Value::as_int)
    }

    pub fn set_global(&mut self, name: &str, value: Value) {
        self.globals.insert(name.to_owned(), value);
    }

    /// Installs a list-of-byte-strings global, used for the per-player
    /// NFT sequences.
    pub fn set_bytes_list<'a>(&mut self, name: &str, items: impl IntoIterator<Item = &'a [u8]>) {
        let list = items
            .into_iter()
            .map(|item| Value::Bytes(item.to_vec()))
            .collect();
        self.set_global(name, Value::List(list));
    }

    /// Executes a verified chunk to completion against this context.
    ///
    /// The value stack is cleared on entry; globals persist across
    /// chunks, which is how operations accumulate game state.
    pub fn execute(&mut self, chunk: &Chunk) -> Result<(), VmError> {
        self.stack.clear();
        let mut ip = 0usize;
        let mut steps = 0usize;
        while ip < chunk.instrs.len() {
            steps += 1;
            if steps > MAX_STEPS {
                return Err(VmError::StepLimitExceeded);
            }
            let instr = &chunk.instrs[ip];
            ip += 1;
            match instr {
                Instr::Halt => return Ok(()),
                Instr::PushInt(v) => self.push(Value::Int(*v))?,
                Instr::PushBytes(v) => self.push(Value::Bytes(v.clone()))?,
                Instr::Load(name) => {
                    let value = self
                        .globals
                        .get(name)
                        .cloned()
                        .ok_or_else(|| VmError::UndefinedGlobal(name.clone()))?;
                    self.push(value)?;
                }
                Instr::Store(name) => {
                    let value = self.pop()?;
                    self.globals.insert(name.clone(), value);
                }
                Instr::Add => self.binary_int(|a, b| Ok(a.wrapping_add(b)))?,
                Instr::Sub => self.binary_int(|a, b| Ok(a.wrapping_sub(b)))?,
                Instr::Mul => self.binary_int(|a, b| Ok(a.wrapping_mul(b)))?,
                Instr::Div => self.binary_int(|a, b| {
                    if b == 0 {
                        Err(VmError::DivisionByZero)
                    } else {
                        Ok(a.wrapping_div(b))
                    }
                })?,
                Instr::Mod => self.binary_int(|a, b| {
                    if b == 0 {
                        Err(VmError::DivisionByZero)
                    } else {
                        Ok(a.wrapping_rem(b))
                    }
                })?,
                Instr::Eq => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    self.push(Value::Int(i64::from(a == b)))?;
                }
                Instr::Ne => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    self.push(Value::Int(i64::from(a != b)))?;
                }
                Instr::Lt => self.binary_int(|a, b| Ok(i64::from(a < b)))?,
                Instr::Gt => self.binary_int(|a, b| Ok(i64::from(a > b)))?,
                Instr::Not => {
                    let a = self.pop_int()?;
                    self.push(Value::Int(i64::from(a == 0)))?;
                }
                Instr::Jmp(target) => ip = *target,
                Instr::Jz(target) => {
                    if self.pop_int()? == 0 {
                        ip = *target;
                    }
                }
                Instr::Rand => {
                    let bound = self.pop_int()?;
                    if bound <= 0 {
                        return Err(VmError::RandBoundNotPositive);
                    }
                    let pick = self.rng.next_below(bound as u64) as i64;
                    self.push(Value::Int(pick))?;
                }
                Instr::Seed => {
                    let y = self.pop_int()?;
                    let x = self.pop_int()?;
                    self.rng.reseed(x as u64, y as u64);
                }
                Instr::Len => {
                    let value = self.pop()?;
                    let len = match &value {
                        Value::Bytes(v) => v.len(),
                        Value::List(v) => v.len(),
                        Value::Int(_) => {
                            return Err(VmError::TypeMismatch {
                                expected: "bytes or list",
                            })
                        }
                    };
                    self.push(Value::Int(len as i64))?;
                }
                Instr::Index => {
                    let index = self.pop_int()?;
                    let value = self.pop()?;
                    if index < 0 {
                        return Err(VmError::IndexOutOfRange);
                    }
                    let index = index as usize;
                    let item = match &value {
                        Value::Bytes(v) => v
                            .get(index)
                            .map(|byte| Value::Int(i64::from(*byte)))
                            .ok_or(VmError::IndexOutOfRange)?,
                        Value::List(v) => {
                            v.get(index).cloned().ok_or(VmError::IndexOutOfRange)?
                        }
                        Value::Int(_) => {
                            return Err(VmError::TypeMismatch {
                                expected: "bytes or list",
                            })
                        }
                    };
                    self.push(item)?;
                }
                Instr::Debug => {
                    let value = self.pop()?;
                    debug!("vm: {value}");
                }
                Instr::Pop => {
                    self.pop()?;
                }
                Instr::Dup => {
                    let top = self.stack.last().ok_or(VmError::StackUnderflow)?.clone();
                    self.push(top)?;
                }
                Instr::Swap => {
                    let len = self.stack.len();
                    if len < 2 {
                        return Err(VmError::StackUnderflow);
                    }
                    self.stack.swap(len - 1, len - 2);
                }
            }
        }
        Ok(())
    }

    fn push(&mut self, value: Value) -> Result<(), VmError> {
        if self.stack.len() >= MAX_STACK {
            return Err(VmError::StackOverflow);
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<Value, VmError> {
        self.stack.pop().ok_or(VmError::StackUnderflow)
    }

    fn pop_int(&mut self) -> Result<i64, VmError> {
        self.pop()?
            .as_int()
            .ok_or(VmError::TypeMismatch { expected: "integer" })
    }

    fn binary_int(&mut self, op: impl Fn(i64, i64) -> Result<i64, VmError>) -> Result<(), VmError> {
        let b = self.pop_int()?;
        let a = self.pop_int()?;
        self.push(Value::Int(op(a, b)?))
    }
}
