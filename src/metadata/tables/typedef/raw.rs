use crate::metadata::{
    tables::{MetadataRow, RowDefinition, TableId},
    token::Token,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// The `TypeDef` table defines types within the current assembly. `TableId` = 0x02
pub struct TypeDefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// a 4-byte bitmask of type `TypeAttributes`, §II.23.1.15
    pub flags: u32,
    /// an index into the String heap
    pub type_name: u32,
    /// an index into the String heap
    pub type_namespace: u32,
    /// an index into the `TypeDef`, `TypeRef`, or `TypeSpec` table; more precisely, a `TypeDefOrRef` (§II.24.2.6) coded index
    pub extends: u32,
    /// an index into the Field table
    pub field_list: u32,
    /// an index into the `MethodDef` table
    pub method_list: u32,
}

impl RowDefinition for TypeDefRaw {
    const TABLE: TableId = TableId::TypeDef;

    fn from_row(row: &MetadataRow) -> Self {
        TypeDefRaw {
            rid: row.rid,
            token: row.token,
            flags: row.column(0),
            type_name: row.column(1),
            type_namespace: row.column(2),
            extends: row.column(3),
            field_list: row.column(4),
            method_list: row.column(5),
        }
    }

    fn columns(&self) -> Vec<u32> {
        vec![
            self.flags,
            self.type_name,
            self.type_namespace,
            self.extends,
            self.field_list,
            self.method_list,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{MetadataTable, TableInfo};

    #[test]
    fn crafted_short() {
        #[rustfmt::skip]
        let data = vec![
            0x01, 0x00, 0x10, 0x00, // flags
            0x02, 0x00,             // type_name
            0x03, 0x00,             // type_namespace
            0x05, 0x00,             // extends (tag 1 = TypeRef, index 1)
            0x01, 0x00,             // field_list
            0x02, 0x00,             // method_list
        ];

        let info = TableInfo::from_rows(
            &[(TableId::TypeDef, 1), (TableId::TypeRef, 1), (TableId::MethodDef, 2)],
            false,
            false,
            false,
        );
        let mut offset = 0;
        let table = MetadataTable::read(&data, &mut offset, TableId::TypeDef, 1, &info).unwrap();
        let row = TypeDefRaw::from_row(table.get(1).unwrap());

        assert_eq!(
            row,
            TypeDefRaw {
                rid: 1,
                token: Token::new(0x0200_0001),
                flags: 0x0010_0001,
                type_name: 0x02,
                type_namespace: 0x03,
                extends: 0x05,
                field_list: 0x01,
                method_list: 0x02,
            }
        );
        assert_eq!(row.columns(), table.get(1).unwrap().columns.to_vec());
    }
}
