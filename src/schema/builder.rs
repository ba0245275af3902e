//! Programmatic schema construction.
//!
//! A [`SchemaNode`] is an unfrozen node tree with one constructor per
//! schema tag. Composite nodes grow through the `append_*` methods;
//! [`Schema::freeze`] turns the finished root into an immutable
//! [`Schema`], registering named types, binding links and enforcing the
//! structural invariants.
//!
//! ```
//! use avrolite::{Schema, SchemaNode};
//!
//! // A linked list of longs, closed through a link node.
//! let mut list = SchemaNode::record("LongList").unwrap();
//! list.append_field("value", SchemaNode::long()).unwrap();
//! let mut next = SchemaNode::union();
//! next.append_branch(SchemaNode::null()).unwrap();
//! next.append_branch(SchemaNode::link("LongList").unwrap()).unwrap();
//! list.append_field("next", next).unwrap();
//!
//! let schema = Schema::freeze(list).unwrap();
//! ```

use crate::error::{AvroliteErr, AvroliteResult};
use crate::schema::common::{validate_name, Field};
use crate::schema::{Registry, Schema, Variant};
use crate::value::Value;
use indexmap::IndexMap;

/// An unfrozen schema node under construction.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    variant: Variant,
}

impl SchemaNode {
    fn from_variant(variant: Variant) -> Self {
        SchemaNode { variant }
    }

    pub(crate) fn variant(&self) -> &Variant {
        &self.variant
    }

    /// The `null` primitive.
    pub fn null() -> Self {
        Self::from_variant(Variant::Null)
    }

    /// The `boolean` primitive.
    pub fn boolean() -> Self {
        Self::from_variant(Variant::Boolean)
    }

    /// The 32-bit `int` primitive.
    pub fn int() -> Self {
        Self::from_variant(Variant::Int)
    }

    /// The 64-bit `long` primitive.
    pub fn long() -> Self {
        Self::from_variant(Variant::Long)
    }

    /// The `float` primitive.
    pub fn float() -> Self {
        Self::from_variant(Variant::Float)
    }

    /// The `double` primitive.
    pub fn double() -> Self {
        Self::from_variant(Variant::Double)
    }

    /// The variable-length `bytes` primitive.
    pub fn bytes() -> Self {
        Self::from_variant(Variant::Bytes)
    }

    /// The `string` primitive.
    pub fn string() -> Self {
        Self::from_variant(Variant::Str)
    }

    /// A record with the given name and no fields yet.
    pub fn record(name: &str) -> AvroliteResult<Self> {
        validate_name(name)?;
        Ok(Self::from_variant(Variant::Record {
            name: name.to_string(),
            fields: IndexMap::new(),
        }))
    }

    /// Appends a field to a record node. Fields keep their append order.
    pub fn append_field(&mut self, name: &str, ty: SchemaNode) -> AvroliteResult<()> {
        self.append_field_imp(name, ty, None)
    }

    /// Appends a field carrying a default value, used when a datum or a
    /// writer's record omits the field.
    pub fn append_field_default(
        &mut self,
        name: &str,
        ty: SchemaNode,
        default: Value,
    ) -> AvroliteResult<()> {
        self.append_field_imp(name, ty, Some(default))
    }

    fn append_field_imp(
        &mut self,
        name: &str,
        ty: SchemaNode,
        default: Option<Value>,
    ) -> AvroliteResult<()> {
        let fields = match &mut self.variant {
            Variant::Record { fields, .. } => fields,
            _ => return Err(AvroliteErr::ExpectedNode("record")),
        };
        if fields.contains_key(name) {
            return Err(AvroliteErr::DuplicateField(name.to_string()));
        }
        let field = Field::new(name, ty.variant, default)?;
        fields.insert(name.to_string(), field);
        Ok(())
    }

    /// An enum with the given name and no symbols yet.
    pub fn enumeration(name: &str) -> AvroliteResult<Self> {
        validate_name(name)?;
        Ok(Self::from_variant(Variant::Enum {
            name: name.to_string(),
            symbols: Vec::new(),
        }))
    }

    /// Appends a symbol to an enum node. Symbols keep their append order.
    pub fn append_symbol(&mut self, symbol: &str) -> AvroliteResult<()> {
        let symbols = match &mut self.variant {
            Variant::Enum { symbols, .. } => symbols,
            _ => return Err(AvroliteErr::ExpectedNode("enum")),
        };
        validate_name(symbol)?;
        if symbols.iter().any(|s| s == symbol) {
            return Err(AvroliteErr::DuplicateSymbol(symbol.to_string()));
        }
        symbols.push(symbol.to_string());
        Ok(())
    }

    /// A fixed-size byte type with the given name and size.
    pub fn fixed(name: &str, size: usize) -> AvroliteResult<Self> {
        validate_name(name)?;
        Ok(Self::from_variant(Variant::Fixed {
            name: name.to_string(),
            size,
        }))
    }

    /// An array of `items`.
    pub fn array(items: SchemaNode) -> Self {
        Self::from_variant(Variant::Array {
            items: Box::new(items.variant),
        })
    }

    /// A map from string keys to `values`.
    pub fn map(values: SchemaNode) -> Self {
        Self::from_variant(Variant::Map {
            values: Box::new(values.variant),
        })
    }

    /// An empty union. Branches are appended with
    /// [`append_branch`](Self::append_branch); a frozen union needs at
    /// least two.
    pub fn union() -> Self {
        Self::from_variant(Variant::Union {
            variants: Vec::new(),
        })
    }

    /// Appends a branch to a union node. Unions may not nest.
    pub fn append_branch(&mut self, branch: SchemaNode) -> AvroliteResult<()> {
        if let Variant::Union { .. } = branch.variant {
            return Err(AvroliteErr::NoImmediateUnion);
        }
        let variants = match &mut self.variant {
            Variant::Union { variants } => variants,
            _ => return Err(AvroliteErr::ExpectedNode("union")),
        };
        variants.push(branch.variant);
        Ok(())
    }

    /// A link to a named type declared earlier in the same schema tree.
    pub fn link(name: &str) -> AvroliteResult<Self> {
        validate_name(name)?;
        Ok(Self::from_variant(Variant::Named(name.to_string())))
    }
}

impl Schema {
    /// Freezes a finished root node into an immutable [`Schema`].
    ///
    /// Freezing walks the tree in preorder, registering each named type on
    /// first declaration and binding every link to an earlier declaration.
    /// Duplicate names, unresolved links, empty enums and under-populated
    /// or ambiguous unions are rejected here.
    pub fn freeze(root: SchemaNode) -> AvroliteResult<Schema> {
        let mut cxt = Registry::new();
        freeze_walk(&root.variant, &mut cxt)?;
        Ok(Schema {
            variant: root.variant,
            cxt,
        })
    }
}

fn declare(name: &str, variant: &Variant, cxt: &mut Registry) -> AvroliteResult<()> {
    if cxt.contains(name) {
        return Err(AvroliteErr::DuplicateSchema(name.to_string()));
    }
    cxt.insert(name.to_string(), variant.clone());
    Ok(())
}

fn freeze_walk(variant: &Variant, cxt: &mut Registry) -> AvroliteResult<()> {
    match variant {
        Variant::Record { name, fields } => {
            // registered before descending so fields may link back to it
            declare(name, variant, cxt)?;
            for field in fields.values() {
                freeze_walk(&field.ty, cxt)?;
            }
            Ok(())
        }
        Variant::Enum { name, symbols } => {
            if symbols.is_empty() {
                return Err(AvroliteErr::EmptyEnum);
            }
            declare(name, variant, cxt)
        }
        Variant::Fixed { name, .. } => declare(name, variant, cxt),
        Variant::Array { items } => freeze_walk(items, cxt),
        Variant::Map { values } => freeze_walk(values, cxt),
        Variant::Union { variants } => {
            if variants.len() < 2 {
                return Err(AvroliteErr::UnionTooSmall);
            }
            for branch in variants {
                freeze_walk(branch, cxt)?;
            }
            // branches must be distinguishable: at most one branch per
            // unnamed tag, named branches distinct by name
            let mut seen = std::collections::HashSet::new();
            for branch in variants {
                if !seen.insert(branch_key(branch, cxt)?) {
                    return Err(AvroliteErr::DuplicateBranchInUnion);
                }
            }
            Ok(())
        }
        Variant::Named(name) => {
            if cxt.contains(name) {
                Ok(())
            } else {
                Err(AvroliteErr::UnresolvedLink(name.clone()))
            }
        }
        _ => Ok(()),
    }
}

fn branch_key(branch: &Variant, cxt: &Registry) -> AvroliteResult<String> {
    Ok(match branch {
        Variant::Null => "null".to_string(),
        Variant::Boolean => "boolean".to_string(),
        Variant::Int => "int".to_string(),
        Variant::Long => "long".to_string(),
        Variant::Float => "float".to_string(),
        Variant::Double => "double".to_string(),
        Variant::Bytes => "bytes".to_string(),
        Variant::Str => "string".to_string(),
        Variant::Array { .. } => "array".to_string(),
        Variant::Map { .. } => "map".to_string(),
        Variant::Record { name, .. } => format!("record:{}", name),
        Variant::Enum { name, .. } => format!("enum:{}", name),
        Variant::Fixed { name, .. } => format!("fixed:{}", name),
        Variant::Named(name) => {
            let target = cxt
                .get(name)
                .ok_or_else(|| AvroliteErr::UnresolvedLink(name.clone()))?;
            branch_key(target, cxt)?
        }
        Variant::Union { .. } => return Err(AvroliteErr::NoImmediateUnion),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn builds_and_freezes_a_recursive_record() {
        let mut list = SchemaNode::record("LongList").unwrap();
        list.append_field("value", SchemaNode::long()).unwrap();
        let mut next = SchemaNode::union();
        next.append_branch(SchemaNode::null()).unwrap();
        next.append_branch(SchemaNode::link("LongList").unwrap())
            .unwrap();
        list.append_field("next", next).unwrap();

        let schema = Schema::freeze(list).unwrap();
        assert!(schema.cxt.contains("LongList"));
    }

    #[test]
    fn duplicate_named_schema_rejected() {
        let mut outer = SchemaNode::record("Pair").unwrap();
        outer
            .append_field("a", SchemaNode::fixed("md5", 16).unwrap())
            .unwrap();
        outer
            .append_field("b", SchemaNode::fixed("md5", 16).unwrap())
            .unwrap();
        let err = Schema::freeze(outer).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSchema);
    }

    #[test]
    fn link_must_be_declared_before_use() {
        let mut rec = SchemaNode::record("Orphan").unwrap();
        rec.append_field("x", SchemaNode::link("Missing").unwrap())
            .unwrap();
        assert!(matches!(
            Schema::freeze(rec),
            Err(AvroliteErr::UnresolvedLink(name)) if name == "Missing"
        ));
    }

    #[test]
    fn union_in_union_rejected_at_append() {
        let mut u = SchemaNode::union();
        let inner = SchemaNode::union();
        assert!(matches!(
            u.append_branch(inner),
            Err(AvroliteErr::NoImmediateUnion)
        ));
    }

    #[test]
    fn union_needs_two_branches() {
        let mut u = SchemaNode::union();
        u.append_branch(SchemaNode::null()).unwrap();
        assert!(matches!(Schema::freeze(u), Err(AvroliteErr::UnionTooSmall)));
    }

    #[test]
    fn union_branches_must_be_distinguishable() {
        let mut u = SchemaNode::union();
        u.append_branch(SchemaNode::array(SchemaNode::int()))
            .unwrap();
        u.append_branch(SchemaNode::array(SchemaNode::string()))
            .unwrap();
        assert!(matches!(
            Schema::freeze(u),
            Err(AvroliteErr::DuplicateBranchInUnion)
        ));
    }

    #[test]
    fn union_of_two_named_records_allowed() {
        let mut a = SchemaNode::record("A").unwrap();
        a.append_field("x", SchemaNode::int()).unwrap();
        let mut b = SchemaNode::record("B").unwrap();
        b.append_field("x", SchemaNode::int()).unwrap();
        let mut u = SchemaNode::union();
        u.append_branch(a).unwrap();
        u.append_branch(b).unwrap();
        assert!(Schema::freeze(u).is_ok());
    }

    #[test]
    fn empty_enum_rejected() {
        let e = SchemaNode::enumeration("Empty").unwrap();
        assert!(matches!(Schema::freeze(e), Err(AvroliteErr::EmptyEnum)));
    }

    #[test]
    fn duplicate_field_rejected() {
        let mut rec = SchemaNode::record("R").unwrap();
        rec.append_field("a", SchemaNode::int()).unwrap();
        let err = rec.append_field("a", SchemaNode::long()).unwrap_err();
        assert!(matches!(err, AvroliteErr::DuplicateField(_)));
    }

    #[test]
    fn duplicate_symbol_rejected() {
        let mut e = SchemaNode::enumeration("Suit").unwrap();
        e.append_symbol("HEARTS").unwrap();
        let err = e.append_symbol("HEARTS").unwrap_err();
        assert!(matches!(err, AvroliteErr::DuplicateSymbol(_)));
    }
}
