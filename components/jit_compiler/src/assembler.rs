//! Minimal x86-64 encoder
//!
//! Covers the handful of instructions the kernel shapes need. Only the
//! eight legacy general purpose registers are encodable, so REX.R/REX.B
//! are never set and every 64-bit instruction carries a plain REX.W.

const REX_W: u8 = 0x48;

/// General purpose 64-bit register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Reg {
    /// Accumulator, return value
    Rax = 0,
    /// Counter
    Rcx = 1,
    /// Data
    Rdx = 2,
    /// Base
    Rbx = 3,
    /// Stack pointer
    Rsp = 4,
    /// Frame pointer
    Rbp = 5,
    /// Second integer argument
    Rsi = 6,
    /// First integer argument
    Rdi = 7,
}

impl Reg {
    fn code(self) -> u8 {
        self as u8
    }
}

/// Position in the code buffer usable as a jump target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(usize);

/// A forward jump waiting for its target
#[derive(Debug)]
#[must_use = "forward jumps must be bound"]
pub struct Fixup {
    /// Offset of the rel32 field
    disp_at: usize,
}

fn modrm_direct(reg: u8, rm: u8) -> u8 {
    0xC0 | (reg << 3) | rm
}

/// Growable machine code buffer
#[derive(Debug, Default, Clone)]
pub struct Assembler {
    code: Vec<u8>,
}

impl Assembler {
    /// Empty buffer
    pub fn new() -> Self {
        Self { code: Vec::new() }
    }

    /// Bytes emitted so far
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Whether nothing was emitted
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Current position
    pub fn label(&self) -> Label {
        Label(self.code.len())
    }

    /// `push rbp; mov rbp, rsp`
    pub fn prologue(&mut self) {
        self.code.push(0x55);
        self.mov(Reg::Rbp, Reg::Rsp);
    }

    /// `pop rbp; ret`
    pub fn epilogue(&mut self) {
        self.code.push(0x5D);
        self.ret();
    }

    /// `ret`
    pub fn ret(&mut self) {
        self.code.push(0xC3);
    }

    /// `mov dst, imm64`
    pub fn mov_imm64(&mut self, dst: Reg, imm: i64) {
        self.code.push(REX_W);
        self.code.push(0xB8 + dst.code());
        self.code.extend_from_slice(&imm.to_le_bytes());
    }

    /// `mov dst, src`
    pub fn mov(&mut self, dst: Reg, src: Reg) {
        self.code
            .extend_from_slice(&[REX_W, 0x89, modrm_direct(src.code(), dst.code())]);
    }

    /// `add dst, src`
    pub fn add(&mut self, dst: Reg, src: Reg) {
        self.code
            .extend_from_slice(&[REX_W, 0x01, modrm_direct(src.code(), dst.code())]);
    }

    /// `sub dst, src`
    pub fn sub(&mut self, dst: Reg, src: Reg) {
        self.code
            .extend_from_slice(&[REX_W, 0x29, modrm_direct(src.code(), dst.code())]);
    }

    /// `imul dst, src`
    pub fn imul(&mut self, dst: Reg, src: Reg) {
        self.code
            .extend_from_slice(&[REX_W, 0x0F, 0xAF, modrm_direct(dst.code(), src.code())]);
    }

    /// `dec reg`
    pub fn dec(&mut self, reg: Reg) {
        self.code
            .extend_from_slice(&[REX_W, 0xFF, modrm_direct(1, reg.code())]);
    }

    /// `test a, b`
    pub fn test(&mut self, a: Reg, b: Reg) {
        self.code
            .extend_from_slice(&[REX_W, 0x85, modrm_direct(b.code(), a.code())]);
    }

    /// `jnz target` to an already bound label
    pub fn jnz(&mut self, target: Label) {
        self.code.extend_from_slice(&[0x0F, 0x85]);
        let end = self.code.len() + 4;
        let rel = target.0 as i64 - end as i64;
        self.code.extend_from_slice(&(rel as i32).to_le_bytes());
    }

    /// `jle` to a label bound later with [`Assembler::bind`]
    pub fn jle_forward(&mut self) -> Fixup {
        self.code.extend_from_slice(&[0x0F, 0x8E]);
        let disp_at = self.code.len();
        self.code.extend_from_slice(&[0; 4]);
        Fixup { disp_at }
    }

    /// Point a forward jump at the current position
    pub fn bind(&mut self, fixup: Fixup) {
        let rel = (self.code.len() - (fixup.disp_at + 4)) as i32;
        self.code[fixup.disp_at..fixup.disp_at + 4].copy_from_slice(&rel.to_le_bytes());
    }

    /// Encoded bytes
    pub fn code(&self) -> &[u8] {
        &self.code
    }

    /// Take the encoded bytes
    pub fn finish(self) -> Vec<u8> {
        self.code
    }
}
