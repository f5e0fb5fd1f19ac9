//! The ACN variant's process-wide defaults: the one piece of
//! environment-dependent behavior this otherwise pure engine exposes.

use serde::{Deserialize, Serialize};

use crate::acn::ByteOrder;

/// Alignment a generated ACN encoder falls back to when a field does
/// not declare its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcnAlignment {
    None,
    Byte,
    Word,
    DWord,
}

/// Process-wide ACN defaults. A generated per-schema encoder
/// consults this only for fields that do not override alignment or
/// endianness themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcnConfig {
    pub default_alignment: AcnAlignment,
    pub default_byte_order: ByteOrder,
}

impl Default for AcnConfig {
    fn default() -> Self {
        AcnConfig {
            default_alignment: AcnAlignment::None,
            default_byte_order: ByteOrder::Big,
        }
    }
}
