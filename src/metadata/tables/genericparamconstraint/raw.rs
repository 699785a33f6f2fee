use crate::metadata::{
    tables::{MetadataRow, RowDefinition, TableId},
    token::Token,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `GenericParamConstraint` table defines constraints on generic parameters. `TableId` = 0x2C
pub struct GenericParamConstraintRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// an index into the `GenericParam` table, specifying to which generic parameter this row refers
    pub owner: u32,
    /// an index into the `TypeDef`, `TypeRef`, or `TypeSpec` tables, specifying from which class this generic parameter is constrained to derive; or which interface this generic parameter is constrained to implement; more precisely, a `TypeDefOrRef` (§II.24.2.6) coded index
    pub constraint: u32,
}

impl RowDefinition for GenericParamConstraintRaw {
    const TABLE: TableId = TableId::GenericParamConstraint;

    fn from_row(row: &MetadataRow) -> Self {
        GenericParamConstraintRaw {
            rid: row.rid,
            token: row.token,
            owner: row.column(0),
            constraint: row.column(1),
        }
    }

    fn columns(&self) -> Vec<u32> {
        vec![self.owner, self.constraint]
    }
}
