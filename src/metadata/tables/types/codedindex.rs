//! # Coded Index Schema
//!
//! Coded indices are a space-efficient encoding used by metadata tables to reference one of
//! several possible tables through a single column. The lower `tag_bits` bits select the
//! target table from an ordered candidate list, the remaining bits hold the 1-based row id:
//!
//! ```text
//! value = (rid << tag_bits) | tag        tag_bits = ceil(log2(candidates))
//! ```
//!
//! [`CodedIndexType::tables`] is the one and only definition of those candidate lists. Both
//! [`CodedIndexType::decode`] (reading) and [`CodedIndexType::encode`] (writing) go through
//! it, so the two directions can never disagree on table order.
//!
//! ## References
//!
//! - [ECMA-335 Standard](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Section II.24.2.6

use strum::{EnumCount, EnumIter};

use crate::{
    metadata::{tables::TableId, token::Token},
    Error, Result,
};

/// Represents all possible coded index types defined in the CLI metadata specification.
///
/// ## Examples
///
/// - `TypeDefOrRef` can reference `TypeDef`, `TypeRef`, or `TypeSpec` tables
/// - `HasSemantics` can reference `Event` or `Property` tables
/// - `HasCustomAttribute` can reference any of 22 different table types
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount)]
#[repr(usize)]
pub enum CodedIndexType {
    /// References `TypeDef`, `TypeRef`, or `TypeSpec` tables.
    TypeDefOrRef,
    /// References `Field`, `Param`, or `Property` tables.
    HasConstant,
    /// References any entity that can have custom attributes attached.
    HasCustomAttribute,
    /// References `Field` or `Param` tables.
    HasFieldMarshal,
    /// References `TypeDef`, `MethodDef`, or `Assembly` tables.
    HasDeclSecurity,
    /// References `TypeDef`, `TypeRef`, `ModuleRef`, `MethodDef`, or `TypeSpec` tables.
    MemberRefParent,
    /// References `Event` or `Property` tables.
    HasSemantics,
    /// References `MethodDef` or `MemberRef` tables.
    MethodDefOrRef,
    /// References `Field` or `MethodDef` tables.
    MemberForwarded,
    /// References `File`, `AssemblyRef`, or `ExportedType` tables.
    Implementation,
    /// References `MethodDef` or `MemberRef` tables through tags 2 and 3.
    ///
    /// Tags 0, 1 and 4 are reserved and never name a table.
    CustomAttributeType,
    /// References `Module`, `ModuleRef`, `AssemblyRef`, or `TypeRef` tables.
    ResolutionScope,
    /// References `TypeDef` or `MethodDef` tables.
    TypeOrMethodDef,
    /// References any entity that can have portable PDB custom debug information attached.
    HasCustomDebugInformation,
}

impl CodedIndexType {
    /// Returns the ordered tag slots of this coded index type.
    ///
    /// The position inside the returned slice is the tag value. Reserved tags are `None`.
    #[must_use]
    pub fn tables(&self) -> &'static [Option<TableId>] {
        match self {
            CodedIndexType::TypeDefOrRef => &[
                Some(TableId::TypeDef),
                Some(TableId::TypeRef),
                Some(TableId::TypeSpec),
            ],
            CodedIndexType::HasConstant => &[
                Some(TableId::Field),
                Some(TableId::Param),
                Some(TableId::Property),
            ],
            CodedIndexType::HasCustomAttribute => &[
                Some(TableId::MethodDef),
                Some(TableId::Field),
                Some(TableId::TypeRef),
                Some(TableId::TypeDef),
                Some(TableId::Param),
                Some(TableId::InterfaceImpl),
                Some(TableId::MemberRef),
                Some(TableId::Module),
                // Labeled 'Permission' in the standard; no such table exists
                Some(TableId::DeclSecurity),
                Some(TableId::Property),
                Some(TableId::Event),
                Some(TableId::StandAloneSig),
                Some(TableId::ModuleRef),
                Some(TableId::TypeSpec),
                Some(TableId::Assembly),
                Some(TableId::AssemblyRef),
                Some(TableId::File),
                Some(TableId::ExportedType),
                Some(TableId::ManifestResource),
                Some(TableId::GenericParam),
                Some(TableId::GenericParamConstraint),
                Some(TableId::MethodSpec),
            ],
            CodedIndexType::HasFieldMarshal => &[Some(TableId::Field), Some(TableId::Param)],
            CodedIndexType::HasDeclSecurity => &[
                Some(TableId::TypeDef),
                Some(TableId::MethodDef),
                Some(TableId::Assembly),
            ],
            CodedIndexType::MemberRefParent => &[
                Some(TableId::TypeDef),
                Some(TableId::TypeRef),
                Some(TableId::ModuleRef),
                Some(TableId::MethodDef),
                Some(TableId::TypeSpec),
            ],
            CodedIndexType::HasSemantics => &[Some(TableId::Event), Some(TableId::Property)],
            CodedIndexType::MethodDefOrRef => &[Some(TableId::MethodDef), Some(TableId::MemberRef)],
            CodedIndexType::MemberForwarded => &[Some(TableId::Field), Some(TableId::MethodDef)],
            CodedIndexType::Implementation => &[
                Some(TableId::File),
                Some(TableId::AssemblyRef),
                Some(TableId::ExportedType),
            ],
            CodedIndexType::CustomAttributeType => &[
                None,
                None,
                Some(TableId::MethodDef),
                Some(TableId::MemberRef),
                None,
            ],
            CodedIndexType::ResolutionScope => &[
                Some(TableId::Module),
                Some(TableId::ModuleRef),
                Some(TableId::AssemblyRef),
                Some(TableId::TypeRef),
            ],
            CodedIndexType::TypeOrMethodDef => &[Some(TableId::TypeDef), Some(TableId::MethodDef)],
            CodedIndexType::HasCustomDebugInformation => &[
                Some(TableId::MethodDef),
                Some(TableId::Field),
                Some(TableId::TypeRef),
                Some(TableId::TypeDef),
                Some(TableId::Param),
                Some(TableId::InterfaceImpl),
                Some(TableId::MemberRef),
                Some(TableId::Module),
                Some(TableId::DeclSecurity),
                Some(TableId::Property),
                Some(TableId::Event),
                Some(TableId::StandAloneSig),
                Some(TableId::ModuleRef),
                Some(TableId::TypeSpec),
                Some(TableId::Assembly),
                Some(TableId::AssemblyRef),
                Some(TableId::File),
                Some(TableId::ExportedType),
                Some(TableId::ManifestResource),
                Some(TableId::GenericParam),
                Some(TableId::GenericParamConstraint),
                Some(TableId::MethodSpec),
                Some(TableId::Document),
                Some(TableId::LocalScope),
                Some(TableId::LocalVariable),
                Some(TableId::LocalConstant),
                Some(TableId::ImportScope),
            ],
        }
    }

    /// Number of low bits that carry the tag, `ceil(log2(tables().len()))`.
    #[must_use]
    pub fn tag_bits(&self) -> u8 {
        let slots = self.tables().len();
        if slots <= 1 {
            return 0;
        }

        // slots - 1 is at most 26, so the bit count always fits into a u8
        #[allow(clippy::cast_possible_truncation)]
        let bits = (usize::BITS - (slots - 1).leading_zeros()) as u8;
        bits
    }

    /// Mask selecting the tag bits of a raw coded index value.
    #[must_use]
    pub fn tag_mask(&self) -> u32 {
        (1u32 << self.tag_bits()) - 1
    }

    /// Returns true if `table` is one of the candidates of this coded index type.
    #[must_use]
    pub fn contains(&self, table: TableId) -> bool {
        self.tables().contains(&Some(table))
    }

    /// Decodes a raw column value into the token it references.
    ///
    /// Returns `Ok(None)` when the row id is 0, which is the null reference.
    ///
    /// # Errors
    /// Returns [`Error::MalformedIndex`] if the tag selects no table, or the row id does not
    /// fit into a token.
    pub fn decode(&self, value: u32) -> Result<Option<Token>> {
        let tag = (value & self.tag_mask()) as usize;
        let rid = value >> self.tag_bits();

        let Some(Some(table)) = self.tables().get(tag).filter(|_| rid <= Token::MAX_ROW) else {
            return Err(Error::MalformedIndex {
                value,
                index_type: *self,
            });
        };

        if rid == 0 {
            return Ok(None);
        }

        Ok(Some(Token::from_parts(*table, rid)))
    }

    /// Encodes a token into a raw column value, the exact inverse of [`CodedIndexType::decode`].
    ///
    /// A null token encodes as 0.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the token's table is not a candidate of this type.
    pub fn encode(&self, token: Token) -> Result<u32> {
        if token.is_null() {
            return Ok(0);
        }

        let tag = token
            .table_id()
            .and_then(|table| self.tables().iter().position(|slot| *slot == Some(table)))
            .ok_or_else(|| {
                Error::InvalidArgument(format!("{} can not be encoded as {:?}", token, self))
            })?;

        // tag < tables().len() <= 27
        #[allow(clippy::cast_possible_truncation)]
        let tag = tag as u32;
        Ok((token.row() << self.tag_bits()) | tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn tag_bits() {
        assert_eq!(CodedIndexType::TypeDefOrRef.tag_bits(), 2);
        assert_eq!(CodedIndexType::HasSemantics.tag_bits(), 1);
        assert_eq!(CodedIndexType::ResolutionScope.tag_bits(), 2);
        assert_eq!(CodedIndexType::MemberRefParent.tag_bits(), 3);
        assert_eq!(CodedIndexType::CustomAttributeType.tag_bits(), 3);
        assert_eq!(CodedIndexType::HasCustomAttribute.tag_bits(), 5);
        assert_eq!(CodedIndexType::HasCustomDebugInformation.tag_bits(), 5);
    }

    #[test]
    fn decode_typedeforref() {
        // tag 0 = TypeDef, rid 192
        let token = CodedIndexType::TypeDefOrRef.decode(0x0300).unwrap();
        assert_eq!(token, Some(Token::new(0x0200_00C0)));

        // tag 1 = TypeRef, rid 1
        let token = CodedIndexType::TypeDefOrRef.decode(0b101).unwrap();
        assert_eq!(token, Some(Token::new(0x0100_0001)));

        // tag 2 = TypeSpec, rid 2
        let token = CodedIndexType::TypeDefOrRef.decode(0b1010).unwrap();
        assert_eq!(token, Some(Token::new(0x1B00_0002)));
    }

    #[test]
    fn decode_null_reference() {
        assert_eq!(CodedIndexType::TypeDefOrRef.decode(0).unwrap(), None);
        assert_eq!(CodedIndexType::TypeDefOrRef.decode(0b01).unwrap(), None);
        assert_eq!(CodedIndexType::HasSemantics.decode(1).unwrap(), None);
    }

    #[test]
    fn decode_tag_out_of_range() {
        // TypeDefOrRef only knows tags 0..=2
        assert!(matches!(
            CodedIndexType::TypeDefOrRef.decode(0b111),
            Err(Error::MalformedIndex {
                value: 0b111,
                index_type: CodedIndexType::TypeDefOrRef
            })
        ));

        // ResolutionScope uses all four tags of its two bits, HasDeclSecurity does not
        assert!(CodedIndexType::ResolutionScope.decode(0b111).is_ok());
        assert!(CodedIndexType::HasDeclSecurity.decode(0b111).is_err());
    }

    #[test]
    fn decode_reserved_slots() {
        let ca = CodedIndexType::CustomAttributeType;
        assert!(ca.decode((1 << 3) | 0).is_err());
        assert!(ca.decode((1 << 3) | 1).is_err());
        assert!(ca.decode((1 << 3) | 4).is_err());
        assert_eq!(
            ca.decode((5 << 3) | 2).unwrap(),
            Some(Token::from_parts(TableId::MethodDef, 5))
        );
        assert_eq!(
            ca.decode((5 << 3) | 3).unwrap(),
            Some(Token::from_parts(TableId::MemberRef, 5))
        );
    }

    #[test]
    fn decode_rid_beyond_token_range() {
        let ty = CodedIndexType::TypeDefOrRef;
        assert_eq!(
            ty.decode(Token::MAX_ROW << 2).unwrap(),
            Some(Token::from_parts(TableId::TypeDef, Token::MAX_ROW))
        );

        // Would wrap to TypeDef 1 and TypeDef 0 if truncated to 24 bits
        for rid in [0x0100_0001u32, 0x0100_0000] {
            assert!(matches!(
                ty.decode(rid << 2),
                Err(Error::MalformedIndex { index_type: CodedIndexType::TypeDefOrRef, .. })
            ));
        }
    }

    #[test]
    fn encode_rejects_foreign_tables() {
        let token = Token::from_parts(TableId::Event, 1);
        assert!(CodedIndexType::TypeDefOrRef.encode(token).is_err());
        assert_eq!(CodedIndexType::TypeDefOrRef.encode(Token::new(0)).unwrap(), 0);
    }

    #[test]
    fn round_trip_every_candidate() {
        for ci_type in CodedIndexType::iter() {
            for table in ci_type.tables().iter().flatten() {
                for rid in [1, 2, 0x7F, 0xFFFF, 0x00FF_FFFF >> 5] {
                    let token = Token::from_parts(*table, rid);
                    let encoded = ci_type.encode(token).unwrap();
                    assert_eq!(ci_type.decode(encoded).unwrap(), Some(token), "{ci_type:?}");
                }
            }
        }
    }
}
