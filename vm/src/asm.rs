//! A tiny assembler for building chunks in tests and off-chain tooling.
//!
//! Forward jumps use labels: allocate with [`Asm::label`], reference
//! from `jmp`/`jz`, place with [`Asm::bind`]. `finish` backpatches every
//! reference and fails if a referenced label was never bound or the
//! displacement overflows `i16`.

use crate::chunk::opcodes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(usize);

#[derive(Debug, Default)]
pub struct Asm {
    code: Vec<u8>,
    // (patch offset, label id); displacement is relative to patch end
    fixups: Vec<(usize, usize)>,
    bound: Vec<Option<usize>>,
}

impl Asm {
    pub fn new() -> Self {
        Asm::default()
    }

    pub fn label(&mut self) -> Label {
        self.bound.push(None);
        Label(self.bound.len() - 1)
    }

    pub fn bind(&mut self, label: Label) -> &mut Self {
        self.bound[label.0] = Some(self.code.len());
        self
    }

    pub fn halt(&mut self) -> &mut Self {
        self.code.push(opcodes::HALT);
        self
    }

    pub fn push_int(&mut self, value: i64) -> &mut Self {
        self.code.push(opcodes::PUSH_INT);
        self.code.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn push_bytes(&mut self, value: &[u8]) -> &mut Self {
        assert!(value.len() <= u8::MAX as usize, "operand too long");
        self.code.push(opcodes::PUSH_BYTES);
        self.code.push(value.len() as u8);
        self.code.extend_from_slice(value);
        self
    }

    pub fn load(&mut self, name: &str) -> &mut Self {
        self.name_op(opcodes::LOAD, name)
    }

    pub fn store(&mut self, name: &str) -> &mut Self {
        self.name_op(opcodes::STORE, name)
    }

    pub fn add(&mut self) -> &mut Self {
        self.plain(opcodes::ADD)
    }

    pub fn sub(&mut self) -> &mut Self {
        self.plain(opcodes::SUB)
    }

    pub fn mul(&mut self) -> &mut Self {
        self.plain(opcodes::MUL)
    }

    pub fn div(&mut self) -> &mut Self {
        self.plain(opcodes::DIV)
    }

    pub fn modulo(&mut self) -> &mut Self {
        self.plain(opcodes::MOD)
    }

    pub fn eq(&mut self) -> &mut Self {
        self.plain(opcodes::EQ)
    }

    pub fn ne(&mut self) -> &mut Self {
        self.plain(opcodes::NE)
    }

    pub fn lt(&mut self) -> &mut Self {
        self.plain(opcodes::LT)
    }

    pub fn gt(&mut self) -> &mut Self {
        self.plain(opcodes::GT)
    }

    pub fn not(&mut self) -> &mut Self {
        self.plain(opcodes::NOT)
    }

    pub fn jmp(&mut self, label: Label) -> &mut Self {
        self.jump_op(opcodes::JMP, label)
    }

    pub fn jz(&mut self, label: Label) -> &mut Self {
        self.jump_op(opcodes::JZ, label)
    }

    pub fn rand(&mut self) -> &mut Self {
        self.plain(opcodes::RAND)
    }

    pub fn seed(&mut self) -> &mut Self {
        self.plain(opcodes::SEED)
    }

    pub fn len(&mut self) -> &mut Self {
        self.plain(opcodes::LEN)
    }

    pub fn index(&mut self) -> &mut Self {
        self.plain(opcodes::INDEX)
    }

    pub fn debug(&mut self) -> &mut Self {
        self.plain(opcodes::DEBUG)
    }

    pub fn pop(&mut self) -> &mut Self {
        self.plain(opcodes::POP)
    }

    pub fn dup(&mut self) -> &mut Self {
        self.plain(opcodes::DUP)
    }

    pub fn swap(&mut self) -> &mut Self {
        self.plain(opcodes::SWAP)
    }

    /// Backpatches labels and returns the chunk bytes.
    ///
    /// Panics on an unbound label or an out-of-range displacement;
    /// assembly mistakes are programming errors, not runtime input.
    pub fn finish(&mut self) -> Vec<u8> {
        for (patch, label) in &self.fixups {
            let target = self.bound[*label].expect("unbound label");
            let displacement = target as isize - (*patch as isize + 2);
            let displacement =
                i16::try_from(displacement).expect("jump displacement overflows i16");
            self.code[*patch..*patch + 2].copy_from_slice(&displacement.to_le_bytes());
        }
        std::mem::take(&mut self.code)
    }

    fn plain(&mut self, opcode: u8) -> &mut Self {
        self.code.push(opcode);
        self
    }

    fn name_op(&mut self, opcode: u8, name: &str) -> &mut Self {
        assert!(name.len() <= u8::MAX as usize, "name too long");
        self.code.push(opcode);
        self.code.push(name.len() as u8);
        self.code.extend_from_slice(name.as_bytes());
        self
    }

    fn jump_op(&mut self, opcode: u8, label: Label) -> &mut Self {
        self.code.push(opcode);
        self.fixups.push((self.code.len(), label.0));
        self.code.extend_from_slice(&0i16.to_le_bytes());
        self
    }
}
