//! Format constants and magic bytes for the AMX frame specification

/// Magic bytes opening every AMX frame
pub const MAGIC: [u8; 4] = *b"AMXF";

/// Current frame format version
pub const VERSION: u8 = 1;

/// Fixed size of the frame header in bytes
pub const HEADER_SIZE: usize = 20;

/// Maximum reasonable column name length in bytes
pub const MAX_NAME_LEN: usize = 4096;

/// Maximum reasonable category string length in bytes
pub const MAX_CATEGORY_LEN: usize = 65536;
