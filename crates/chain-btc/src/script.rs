//! Script construction and parsing.
//!
//! Only the pieces needed for pay-to-public-key-hash spends: a builder that
//! emits minimal data pushes, an instruction parser, and the P2PKH locking
//! and unlocking templates.

use std::fmt;

use crate::address::Address;
use crate::error::BtcError;

pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4C;
pub const OP_PUSHDATA2: u8 = 0x4D;
pub const OP_PUSHDATA4: u8 = 0x4E;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xA9;
pub const OP_CHECKSIG: u8 = 0xAC;

/// Length of a P2PKH locking script.
pub const P2PKH_SCRIPT_LEN: usize = 25;

/// Raw script bytes.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

/// One parsed script element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction<'a> {
    /// A data push (direct or OP_PUSHDATA1/2/4) and its payload.
    Push(&'a [u8]),
    /// Any non-push opcode.
    Op(u8),
}

impl Script {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, BtcError> {
        hex::decode(hex_str)
            .map(Self)
            .map_err(|e| BtcError::SerializationError(format!("invalid script hex: {e}")))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse the script into instructions, failing on a truncated push.
    pub fn instructions(&self) -> Result<Vec<Instruction<'_>>, BtcError> {
        let bytes = &self.0;
        let mut out = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            let op = bytes[pos];
            pos += 1;

            let (len, header) = match op {
                0x01..=0x4B => (op as usize, 0),
                OP_PUSHDATA1 => (read_len(bytes, pos, 1)?, 1),
                OP_PUSHDATA2 => (read_len(bytes, pos, 2)?, 2),
                OP_PUSHDATA4 => (read_len(bytes, pos, 4)?, 4),
                _ => {
                    out.push(Instruction::Op(op));
                    continue;
                }
            };

            pos += header;
            let end = pos.checked_add(len).filter(|&end| end <= bytes.len()).ok_or_else(|| {
                BtcError::SerializationError(format!(
                    "script push of {len} bytes at offset {pos} runs past end ({} bytes)",
                    bytes.len()
                ))
            })?;
            out.push(Instruction::Push(&bytes[pos..end]));
            pos = end;
        }

        Ok(out)
    }

    /// The 20-byte hash if this is a standard P2PKH locking script.
    pub fn p2pkh_hash(&self) -> Option<[u8; 20]> {
        let b = &self.0;
        if b.len() == P2PKH_SCRIPT_LEN
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == 0x14
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
        {
            let mut hash = [0u8; 20];
            hash.copy_from_slice(&b[3..23]);
            Some(hash)
        } else {
            None
        }
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn read_len(bytes: &[u8], pos: usize, width: usize) -> Result<usize, BtcError> {
    let field = bytes.get(pos..pos + width).ok_or_else(|| {
        BtcError::SerializationError(format!("truncated {width}-byte push length at offset {pos}"))
    })?;
    let mut buf = [0u8; 4];
    buf[..width].copy_from_slice(field);
    Ok(u32::from_le_bytes(buf) as usize)
}

/// Incremental script builder.
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    bytes: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_opcode(mut self, op: u8) -> Self {
        self.bytes.push(op);
        self
    }

    /// Push `data` using the smallest encoding: a single length byte below
    /// 76 bytes, then OP_PUSHDATA1/2/4. Empty data pushes OP_0.
    pub fn push_slice(mut self, data: &[u8]) -> Self {
        let len = data.len();
        if len == 0 {
            self.bytes.push(OP_0);
        } else if len < OP_PUSHDATA1 as usize {
            self.bytes.push(len as u8);
        } else if len <= 0xFF {
            self.bytes.push(OP_PUSHDATA1);
            self.bytes.push(len as u8);
        } else if len <= 0xFFFF {
            self.bytes.push(OP_PUSHDATA2);
            self.bytes.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.bytes.push(OP_PUSHDATA4);
            self.bytes.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.bytes.extend_from_slice(data);
        self
    }

    pub fn into_script(self) -> Script {
        Script(self.bytes)
    }
}

/// P2PKH locking script: OP_DUP OP_HASH160 <20-byte hash> OP_EQUALVERIFY OP_CHECKSIG
pub fn pay_to_address_script(address: &Address) -> Script {
    ScriptBuilder::new()
        .push_opcode(OP_DUP)
        .push_opcode(OP_HASH160)
        .push_slice(address.hash160())
        .push_opcode(OP_EQUALVERIFY)
        .push_opcode(OP_CHECKSIG)
        .into_script()
}

/// P2PKH unlocking script: <DER signature || sighash byte> <compressed pubkey>
pub fn signature_script(signature_with_type: &[u8], public_key: &[u8; 33]) -> Script {
    ScriptBuilder::new()
        .push_slice(signature_with_type)
        .push_slice(public_key)
        .into_script()
}

/// Split a P2PKH unlocking script into its signature and public key pushes.
pub fn parse_signature_script(script: &Script) -> Result<(&[u8], &[u8]), BtcError> {
    match script.instructions()?.as_slice() {
        [Instruction::Push(sig), Instruction::Push(pubkey)] if !sig.is_empty() => {
            Ok((sig, pubkey))
        }
        _ => Err(BtcError::SerializationError(
            "unlocking script is not <signature> <pubkey>".into(),
        )),
    }
}
