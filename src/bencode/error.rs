use thiserror::Error;

#[derive(Debug, Error)]
pub enum BencodeError {
    #[error("dictionary keys must be string")]
    InvalidKey,

    #[error("dictionary has a key without a value")]
    DanglingKey,

    #[error("value has no bencode representation: {0}")]
    Unrepresentable(&'static str),

    #[error("integer out of range")]
    IntegerOutOfRange,

    #[error("list index out of range: {0}")]
    IndexOutOfRange(usize),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    #[error("invalid string length")]
    InvalidStringLength,

    #[error("unexpected character: {0}")]
    UnexpectedChar(char),

    #[error("dictionary keys not in ascending order")]
    UnsortedKeys,

    #[error("trailing data after value")]
    TrailingData,

    #[error("nesting too deep")]
    NestingTooDeep,

    #[error("invalid info hash length")]
    InvalidInfoHashLength,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
