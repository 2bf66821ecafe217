//! Module loader: preamble check and section splitting
//!
//! A module starts uncompiled. Compiling checks the 8-byte preamble and cuts
//! the remaining bytes into `{id, size, payload}` sections. Section payloads
//! are kept opaque.

use std::fmt;

use tracing::{debug, warn};

use crate::error::ModuleError;
use crate::leb128;

/// `\0asm`
pub const MAGIC: [u8; 4] = [0x00, 0x61, 0x73, 0x6D];
/// Supported binary format version
pub const VERSION: u32 = 1;
/// Magic plus version
pub const PREAMBLE_LEN: usize = 8;

/// Known section ids; anything else is kept as `Unknown`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    /// 0
    Custom,
    /// 1
    Type,
    /// 2
    Import,
    /// 3
    Function,
    /// 4
    Table,
    /// 5
    Memory,
    /// 6
    Global,
    /// 7
    Export,
    /// 8
    Start,
    /// 9
    Element,
    /// 10
    Code,
    /// 11
    Data,
    /// Any other id byte
    Unknown(u8),
}

impl SectionId {
    /// Decode an id byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => SectionId::Custom,
            1 => SectionId::Type,
            2 => SectionId::Import,
            3 => SectionId::Function,
            4 => SectionId::Table,
            5 => SectionId::Memory,
            6 => SectionId::Global,
            7 => SectionId::Export,
            8 => SectionId::Start,
            9 => SectionId::Element,
            10 => SectionId::Code,
            11 => SectionId::Data,
            other => SectionId::Unknown(other),
        }
    }

    /// Encode back to the id byte
    pub fn as_byte(self) -> u8 {
        match self {
            SectionId::Custom => 0,
            SectionId::Type => 1,
            SectionId::Import => 2,
            SectionId::Function => 3,
            SectionId::Table => 4,
            SectionId::Memory => 5,
            SectionId::Global => 6,
            SectionId::Export => 7,
            SectionId::Start => 8,
            SectionId::Element => 9,
            SectionId::Code => 10,
            SectionId::Data => 11,
            SectionId::Unknown(byte) => byte,
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionId::Unknown(byte) => write!(f, "unknown({})", byte),
            known => f.write_str(&format!("{:?}", known).to_lowercase()),
        }
    }
}

/// One section: id and raw payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section id
    pub id: SectionId,
    /// Payload bytes
    pub data: Vec<u8>,
}

impl Section {
    /// Payload size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// A module binary and, once compiled, its sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    bytes: Vec<u8>,
    sections: Vec<Section>,
    compiled: bool,
}

impl Module {
    /// Wrap raw bytes; nothing is parsed yet
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            sections: Vec::new(),
            compiled: false,
        }
    }

    /// Compile, reporting only success
    pub fn compile(&mut self) -> bool {
        match self.try_compile() {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "module compilation failed");
                false
            }
        }
    }

    /// Compile, reporting why it failed.
    ///
    /// A no-op once compiled. On failure the module stays uncompiled with no
    /// sections.
    pub fn try_compile(&mut self) -> Result<(), ModuleError> {
        if self.compiled {
            return Ok(());
        }

        check_preamble(&self.bytes)?;
        let sections = parse_sections(&self.bytes[PREAMBLE_LEN..])?;
        debug!(sections = sections.len(), bytes = self.bytes.len(), "parsed module");

        self.sections = sections;
        if !self.validate() {
            self.sections.clear();
            return Err(ModuleError::ValidationFailed);
        }
        self.compiled = true;
        Ok(())
    }

    /// Structural validation of the parsed sections; accepts any well-formed stream
    pub fn validate(&self) -> bool {
        true
    }

    /// Whether compilation succeeded
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Parsed sections in file order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section with the given id
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// The raw module bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn check_preamble(bytes: &[u8]) -> Result<(), ModuleError> {
    if bytes.len() < PREAMBLE_LEN {
        return Err(ModuleError::TooShort(bytes.len()));
    }
    if bytes[..4] != MAGIC {
        return Err(ModuleError::BadMagic);
    }
    let version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    if version != VERSION {
        return Err(ModuleError::BadVersion(version));
    }
    Ok(())
}

fn parse_sections(body: &[u8]) -> Result<Vec<Section>, ModuleError> {
    let mut sections = Vec::new();
    let mut pos = 0;

    while pos < body.len() {
        let id = body[pos];
        pos += 1;
        let declared = leb128::read_u32(body, &mut pos);
        let available = body.len() - pos;
        if declared as usize > available {
            return Err(ModuleError::TruncatedSection {
                id,
                declared,
                available,
            });
        }
        let end = pos + declared as usize;
        sections.push(Section {
            id: SectionId::from_byte(id),
            data: body[pos..end].to_vec(),
        });
        pos = end;
    }

    Ok(sections)
}
