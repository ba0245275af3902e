// Definitions shared across the schema model: the name grammar for named
// types and the record field.

use crate::error::AvroliteErr;
use crate::schema::Variant;
use crate::value::Value;

// Names of named types, record fields and enum symbols all follow the
// grammar [A-Za-z_][A-Za-z0-9_]*.
pub(crate) fn validate_name(name: &str) -> Result<(), AvroliteErr> {
    let mut chars = name.chars();
    let first = chars.next().ok_or(AvroliteErr::InvalidName)?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(AvroliteErr::InvalidName);
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(AvroliteErr::InvalidName)
    }
}

///////////////////////////////////////////////////////////////////////////////
/// Record field definition.
///////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub(crate) struct Field {
    pub(crate) name: String,
    pub(crate) ty: Variant,
    // Consulted by the resolver when the writer's record lacks this field,
    // and by the validator when a datum omits it.
    pub(crate) default: Option<Value>,
}

impl std::cmp::PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.ty == other.ty
    }
}

impl Field {
    pub(crate) fn new(
        name: &str,
        ty: Variant,
        default: Option<Value>,
    ) -> Result<Self, AvroliteErr> {
        validate_name(name)?;
        Ok(Field {
            name: name.to_string(),
            ty,
            default,
        })
    }
}
