#![allow(missing_docs)]

pub type AvroliteResult<T> = Result<T, AvroliteErr>;

/// The semantic category of an error, for callers that do not care which
/// exact variant was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A schema violated a builder constraint.
    InvalidSchema,
    /// A datum and a schema, or a writer and a reader schema, do not agree.
    SchemaMismatch,
    /// Bytes on the wire do not decode.
    Malformed,
    /// The underlying byte stream failed.
    Io,
    /// An allocation failed while building a value.
    OutOfMemory,
}

/// Errors returned from avrolite
#[derive(thiserror::Error, Debug)]
pub enum AvroliteErr {
    // Schema build errors
    #[error("Duplicate definition of named schema `{0}`")]
    DuplicateSchema(String),
    #[error("Duplicate field `{0}` in record schema")]
    DuplicateField(String),
    #[error("Duplicate symbol `{0}` in enum schema")]
    DuplicateSymbol(String),
    #[error("Enum schema must declare at least one symbol")]
    EmptyEnum,
    #[error("Unions must not contain immediate union values")]
    NoImmediateUnion,
    #[error("Unions cannot have multiple branches of the same unnamed type")]
    DuplicateBranchInUnion,
    #[error("Union must have at least two branches")]
    UnionTooSmall,
    #[error("Named schema `{0}` must be defined before use")]
    UnresolvedLink(String),
    #[error("Names must be [A-Za-z_] and subsequently contain only [A-Za-z0-9_]")]
    InvalidName,
    #[error("Operation requires a {0} schema node")]
    ExpectedNode(&'static str),

    // Schema JSON front-end errors
    #[error("Failed to parse schema")]
    SchemaParseErr(#[source] std::io::Error),
    #[error("Expected the schema to be one of a json string, object or array")]
    UnknownSchema,
    #[error("Unknown schema, expecting a required `type` field in schema")]
    SchemaParseFailed,
    #[error("Expected record `fields` to be a json array")]
    ExpectedFieldsJsonArray,
    #[error("Record field json schema must be an object")]
    InvalidRecordFieldType,
    #[error("Record field does not have a required `name`")]
    RecordNameNotFound,
    #[error("Record field does not have a required `type`")]
    RecordTypeNotFound,
    #[error("Enum schema must contain a required `symbols` field")]
    EnumSymbolsMissing,
    #[error("Failed to parse symbol from enum's `symbols` field")]
    EnumSymbolParseErr,
    #[error("Fixed schema `size` field missing")]
    FixedSizeNotFound,
    #[error("Fixed schema `size` field must be a non-negative number")]
    FixedSizeNotNumber,
    #[error("Invalid default value for given schema")]
    DefaultValueParse,

    // Validation errors
    #[error("Value does not match schema")]
    SchemaDataMismatch,
    #[error("Mismatch in fixed bytes length: found {found}, expected {expected}")]
    FixedValueLenMismatch { found: usize, expected: usize },
    #[error("Value schema not found in union")]
    NotFoundInUnion,
    #[error("Record field `{0}` has no value and the schema declares no default")]
    MissingField(String),
    #[error("Enum value symbol not present in enum schema `symbols` field")]
    EnumSymbolNotPresent,

    // Resolution errors
    #[error("Schema resolution failed. reader's schema {0} != writer's schema {1}")]
    SchemaResolutionFailed(String, String),
    #[error("Reader's record name does not match writer's record name")]
    RecordNameMismatch,
    #[error("Reader's enum name does not match writer's enum name")]
    EnumNameMismatch,
    #[error("Fixed schema names or sizes do not match")]
    FixedSchemaMismatch,
    #[error("Array items schema does not match")]
    ArrayItemsMismatch,
    #[error("Map values schema does not match")]
    MapValuesMismatch,
    #[error("Could not find symbol `{symbol}` in reader's enum schema")]
    EnumSymbolNotFound { symbol: String },

    // Wire errors
    #[error("Varint spans more than {max} bytes")]
    VarintTooLong { max: usize },
    #[error("Varint value does not fit the target integer width")]
    VarintRange,
    #[error("Expected 0x00 or 0x01 as a byte for boolean value, got {0:#04x}")]
    InvalidBoolean(u8),
    #[error("Negative byte length {0} on the wire")]
    NegativeLength(i64),
    #[error("String value is not valid utf-8")]
    InvalidUtf8,
    #[error("Enum index {idx} out of range, schema has {len} symbols")]
    EnumIndexOutOfRange { idx: i64, len: usize },
    #[error("Union branch index {idx} out of range, union has {len} branches")]
    UnionBranchOutOfRange { idx: i64, len: usize },
    #[error("Unexpected end of stream")]
    UnexpectedEof,

    // Io errors
    #[error("Write failed")]
    EncodeFailed(#[source] std::io::Error),
    #[error("Read failed")]
    DecodeFailed(#[source] std::io::Error),

    // Resource errors
    #[error("Allocation failed while decoding")]
    AllocationFailed,
}

impl AvroliteErr {
    /// Maps this error onto its semantic category.
    pub fn kind(&self) -> ErrorKind {
        use AvroliteErr::*;
        match self {
            DuplicateSchema(_) | DuplicateField(_) | DuplicateSymbol(_) | EmptyEnum
            | NoImmediateUnion | DuplicateBranchInUnion | UnionTooSmall | UnresolvedLink(_)
            | InvalidName | ExpectedNode(_) | SchemaParseErr(_) | UnknownSchema | SchemaParseFailed
            | ExpectedFieldsJsonArray | InvalidRecordFieldType | RecordNameNotFound
            | RecordTypeNotFound | EnumSymbolsMissing | EnumSymbolParseErr | FixedSizeNotFound
            | FixedSizeNotNumber | DefaultValueParse => ErrorKind::InvalidSchema,

            SchemaDataMismatch
            | FixedValueLenMismatch { .. }
            | NotFoundInUnion
            | MissingField(_)
            | EnumSymbolNotPresent
            | SchemaResolutionFailed(_, _)
            | RecordNameMismatch
            | EnumNameMismatch
            | FixedSchemaMismatch
            | ArrayItemsMismatch
            | MapValuesMismatch
            | EnumSymbolNotFound { .. } => ErrorKind::SchemaMismatch,

            VarintTooLong { .. }
            | VarintRange
            | InvalidBoolean(_)
            | NegativeLength(_)
            | InvalidUtf8
            | EnumIndexOutOfRange { .. }
            | UnionBranchOutOfRange { .. }
            | UnexpectedEof => ErrorKind::Malformed,

            EncodeFailed(_) | DecodeFailed(_) => ErrorKind::Io,

            AllocationFailed => ErrorKind::OutOfMemory,
        }
    }
}

// Eof inside a value is a wire error, anything else is an io failure.
pub(crate) fn read_failed(e: std::io::Error) -> AvroliteErr {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        AvroliteErr::UnexpectedEof
    } else {
        AvroliteErr::DecodeFailed(e)
    }
}
