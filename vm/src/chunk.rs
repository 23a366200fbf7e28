//! Chunk decoding and static verification.

use std::collections::HashMap;

use crate::VmError;

/// Raw opcode bytes, shared with the assembler.
pub(crate) mod opcodes {
    pub const HALT: u8 = 0x00;
    pub const PUSH_INT: u8 = 0x01;
    pub const PUSH_BYTES: u8 = 0x02;
    pub const LOAD: u8 = 0x03;
    pub const STORE: u8 = 0x04;
    pub const ADD: u8 = 0x10;
    pub const SUB: u8 = 0x11;
    pub const MUL: u8 = 0x12;
    pub const DIV: u8 = 0x13;
    pub const MOD: u8 = 0x14;
    pub const EQ: u8 = 0x18;
    pub const NE: u8 = 0x19;
    pub const LT: u8 = 0x1a;
    pub const GT: u8 = 0x1b;
    pub const NOT: u8 = 0x1e;
    pub const JMP: u8 = 0x30;
    pub const JZ: u8 = 0x31;
    pub const RAND: u8 = 0x40;
    pub const SEED: u8 = 0x41;
    pub const LEN: u8 = 0x50;
    pub const INDEX: u8 = 0x51;
    pub const DEBUG: u8 = 0x60;
    pub const POP: u8 = 0x61;
    pub const DUP: u8 = 0x62;
    pub const SWAP: u8 = 0x63;
}

/// A decoded instruction. Jump targets are instruction indices, already
/// validated against the chunk bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Instr {
    Halt,
    PushInt(i64),
    PushBytes(Vec<u8>),
    Load(String),
    Store(String),
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Not,
    Jmp(usize),
    Jz(usize),
    Rand,
    Seed,
    Len,
    Index,
    Debug,
    Pop,
    Dup,
    Swap,
}

/// A verified, executable chunk of bytecode.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub(crate) instrs: Vec<Instr>,
}

impl Chunk {
    /// Decodes and statically verifies a chunk: every opcode must be
    /// known, every operand complete, every jump target on an
    /// instruction boundary.
    pub fn load(code: &[u8]) -> Result<Chunk, VmError> {
        use opcodes::*;

        // raw decode, keeping byte-relative jumps for the second pass
        enum Raw {
            Plain(Instr),
            Jump { cond: bool, target: usize, offset: usize },
        }

        let mut raw = Vec::new();
        let mut index_at = HashMap::new();
        let mut cursor = 0usize;
        while cursor < code.len() {
            let offset = cursor;
            index_at.insert(offset, raw.len());
            let opcode = code[cursor];
            cursor += 1;
            let decoded = match opcode {
                HALT => Raw::Plain(Instr::Halt),
                PUSH_INT => {
                    let operand = take(code, &mut cursor, 8, offset)?;
                    let mut buf = [0u8; 8];
                    buf.copy_from_slice(operand);
                    Raw::Plain(Instr::PushInt(i64::from_le_bytes(buf)))
                }
                PUSH_BYTES => {
                    let len = take(code, &mut cursor, 1, offset)?[0] as usize;
                    let operand = take(code, &mut cursor, len, offset)?;
                    Raw::Plain(Instr::PushBytes(operand.to_vec()))
                }
                LOAD => Raw::Plain(Instr::Load(take_name(code, &mut cursor, offset)?)),
                STORE => Raw::Plain(Instr::Store(take_name(code, &mut cursor, offset)?)),
                ADD => Raw::Plain(Instr::Add),
                SUB => Raw::Plain(Instr::Sub),
                MUL => Raw::Plain(Instr::Mul),
                DIV => Raw::Plain(Instr::Div),
                MOD => Raw::Plain(Instr::Mod),
                EQ => Raw::Plain(Instr::Eq),
                NE => Raw::Plain(Instr::Ne),
                LT => Raw::Plain(Instr::Lt),
                GT => Raw::Plain(Instr::Gt),
                NOT => Raw::Plain(Instr::Not),
                JMP | JZ => {
                    let operand = take(code, &mut cursor, 2, offset)?;
                    let rel = i16::from_le_bytes([operand[0], operand[1]]) as isize;
                    let target = cursor as isize + rel;
                    if target < 0 || target > code.len() as isize {
                        return Err(VmError::InvalidJumpTarget { offset });
                    }
                    Raw::Jump {
                        cond: opcode == JZ,
                        target: target as usize,
                        offset,
                    }
                }
                RAND => Raw::Plain(Instr::Rand),
                SEED => Raw::Plain(Instr::Seed),
                LEN => Raw::Plain(Instr::Len),
                INDEX => Raw::Plain(Instr::Index),
                DEBUG => Raw::Plain(Instr::Debug),
                POP => Raw::Plain(Instr::Pop),
                DUP => Raw::Plain(Instr::Dup),
                SWAP => Raw::Plain(Instr::Swap),
                _ => return Err(VmError::UnknownOpcode { opcode, offset }),
            };
            raw.push(decoded);
        }
        index_at.insert(code.len(), raw.len());

        let instrs = raw
            .into_iter()
            .map(|instr| match instr {
                Raw::Plain(instr) => Ok(instr),
                Raw::Jump {
                    cond,
                    target,
                    offset,
                } => {
                    let index = *index_at
                        .get(&target)
                        .ok_or(VmError::InvalidJumpTarget { offset })?;
                    Ok(if cond {
                        Instr::Jz(index)
                    } else {
                        Instr::Jmp(index)
                    })
                }
            })
            .collect::<Result<Vec<_>, VmError>>()?;
        Ok(Chunk { instrs })
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }
}

fn take<'a>(code: &'a [u8], cursor: &mut usize, len: usize, offset: usize) -> Result<&'a [u8], VmError> {
    if *cursor + len > code.len() {
        return Err(VmError::TruncatedOperand { offset });
    }
    let operand = &code[*cursor..*cursor + len];
    *cursor += len;
    Ok(operand)
}

fn take_name(code: &[u8], cursor: &mut usize, offset: usize) -> Result<String, VmError> {
    let len = take(code, cursor, 1, offset)?[0] as usize;
    let raw = take(code, cursor, len, offset)?;
    String::from_utf8(raw.to_vec()).map_err(|_| VmError::InvalidName { offset })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chunk() {
        let chunk = Chunk::load(&[]).unwrap();
        assert!(chunk.is_empty());
    }

    #[test]
    fn rejects_unknown_opcode() {
        assert!(matches!(
            Chunk::load(&[0xfe]),
            Err(VmError::UnknownOpcode {
                opcode: 0xfe,
                offset: 0
            })
        ));
    }

    #[test]
    fn rejects_truncated_push() {
        let result = Chunk::load(&[opcodes::PUSH_INT, 1, 2, 3]);
        assert!(matches!(result, Err(VmError::TruncatedOperand { offset: 0 })));
    }

    #[test]
    fn rejects_jump_into_operand() {
        // PUSH_INT 0 (9 bytes) then JMP back into the middle of it
        let mut code = vec![opcodes::PUSH_INT];
        code.extend_from_slice(&0i64.to_le_bytes());
        code.push(opcodes::JMP);
        code.extend_from_slice(&(-8i16).to_le_bytes());
        assert!(matches!(
            Chunk::load(&code),
            Err(VmError::InvalidJumpTarget { .. })
        ));
    }

    #[test]
    fn jump_to_end_is_legal() {
        let mut code = vec![opcodes::JMP];
        code.extend_from_slice(&0i16.to_le_bytes());
        let chunk = Chunk::load(&code).unwrap();
        assert_eq!(chunk.len(), 1);
    }

    #[test]
    fn rejects_out_of_range_jump() {
        let mut code = vec![opcodes::JMP];
        code.extend_from_slice(&8i16.to_le_bytes());
        assert!(matches!(
            Chunk::load(&code),
            Err(VmError::InvalidJumpTarget { .. })
        ));
    }

    #[test]
    fn rejects_non_utf8_name() {
        let code = vec![opcodes::LOAD, 2, 0xff, 0xfe];
        assert!(matches!(Chunk::load(&code), Err(VmError::InvalidName { .. })));
    }
}
