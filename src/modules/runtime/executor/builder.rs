//! SQL++ statement construction
//!
//! Keys and payloads enter statement text only through the helpers in
//! [`crate::sqlpp`].

use asterbench_types::FieldValues;

use crate::sqlpp::{hex_constructor, json_string, quote_literal};

/// Builds statements against one relation
#[derive(Debug, Clone)]
pub struct StatementBuilder {
    scope: String,
    relation: String,
    primary_key: String,
}

impl StatementBuilder {
    pub fn new(
        scope: impl Into<String>,
        relation: impl Into<String>,
        primary_key: impl Into<String>,
    ) -> Self {
        Self {
            scope: scope.into(),
            relation: relation.into(),
            primary_key: primary_key.into(),
        }
    }

    /// Point lookup of one key
    pub fn read(&self, key: &str, fields: &[String]) -> String {
        format!(
            "USE {};SELECT {} FROM {} WHERE {}={};",
            self.scope,
            self.projection(fields),
            self.relation,
            self.primary_key,
            quote_literal(key)
        )
    }

    /// Ordered range scan starting at `start_key`
    pub fn scan(&self, start_key: &str, count: usize, fields: &[String]) -> String {
        format!(
            "USE {};SELECT {} FROM {} WHERE {}>={} ORDER BY {} LIMIT {};",
            self.scope,
            self.projection(fields),
            self.relation,
            self.primary_key,
            quote_literal(start_key),
            self.primary_key,
            count
        )
    }

    pub fn delete(&self, key: &str) -> String {
        format!(
            "USE {};DELETE FROM {} WHERE {}={};",
            self.scope,
            self.relation,
            self.primary_key,
            quote_literal(key)
        )
    }

    /// Object constructor for one record.
    ///
    /// Only fields present in `values` are rendered, in `fields` order.
    pub fn record_literal(&self, key: &str, fields: &[String], values: &FieldValues) -> String {
        let mut members = vec![format!("{}:{}", json_string(&self.primary_key), json_string(key))];
        members.extend(fields.iter().filter_map(|field| {
            values
                .get(field)
                .map(|bytes| format!("{}:{}", json_string(field), hex_constructor(bytes)))
        }));
        format!("{{{}}}", members.join(","))
    }

    /// `INSERT` (or `UPSERT`) of one or more record literals
    pub fn insert(&self, keyword: &str, literals: &[String]) -> String {
        format!(
            "USE {};{} INTO {} ([{}]);",
            self.scope,
            keyword,
            self.relation,
            literals.join(",")
        )
    }

    /// Sub-query re-projecting one stored record with some fields replaced.
    ///
    /// Replaced fields become `hex("..") AS field`; every other field passes
    /// through unchanged, and the key is carried so the upsert lands on the
    /// same record.
    pub fn update_projection(&self, key: &str, fields: &[String], values: &FieldValues) -> String {
        let mut columns = vec![self.primary_key.clone()];
        columns.extend(fields.iter().map(|field| match values.get(field) {
            Some(bytes) => format!("{} AS {}", hex_constructor(bytes), field),
            None => field.clone(),
        }));

        format!(
            "SELECT {} FROM {} WHERE {}={}",
            columns.join(","),
            self.relation,
            self.primary_key,
            quote_literal(key)
        )
    }

    /// `UPSERT` of the union of one or more update projections
    pub fn upsert_projections(&self, projections: &[String]) -> String {
        format!(
            "USE {};UPSERT INTO {} ({});",
            self.scope,
            self.relation,
            projections.join(" UNION ALL ")
        )
    }

    fn projection(&self, fields: &[String]) -> String {
        std::iter::once(self.primary_key.as_str())
            .chain(fields.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> StatementBuilder {
        StatementBuilder::new("ycsb", "usertable", "id")
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_read() {
        let sql = builder().read("user1", &fields(&["field0", "field1"]));
        assert_eq!(sql, "USE ycsb;SELECT id,field0,field1 FROM usertable WHERE id='user1';");

        let sql = builder().read("user1", &[]);
        assert_eq!(sql, "USE ycsb;SELECT id FROM usertable WHERE id='user1';");
    }

    #[test]
    fn test_read_escapes_key() {
        let sql = builder().read("o'neil", &[]);
        assert_eq!(sql, "USE ycsb;SELECT id FROM usertable WHERE id='o''neil';");
    }

    #[test]
    fn test_scan() {
        let sql = builder().scan("user5", 10, &fields(&["field0"]));
        assert_eq!(
            sql,
            "USE ycsb;SELECT id,field0 FROM usertable WHERE id>='user5' ORDER BY id LIMIT 10;"
        );
    }

    #[test]
    fn test_delete() {
        assert_eq!(
            builder().delete("user1"),
            "USE ycsb;DELETE FROM usertable WHERE id='user1';"
        );
    }

    #[test]
    fn test_record_literal_and_insert() {
        let mut values = FieldValues::new();
        values.insert("field1".to_string(), vec![0xca, 0xfe]);
        values.insert("field0".to_string(), b"ab".to_vec());

        let b = builder();
        let literal = b.record_literal("user1", &fields(&["field0", "field1", "field2"]), &values);
        assert_eq!(
            literal,
            "{\"id\":\"user1\",\"field0\":hex(\"6162\"),\"field1\":hex(\"CAFE\")}"
        );

        assert_eq!(
            b.insert("INSERT", &[literal.clone()]),
            format!("USE ycsb;INSERT INTO usertable ([{}]);", literal)
        );
        assert_eq!(
            b.insert("UPSERT", &[literal.clone(), literal.clone()]),
            format!("USE ycsb;UPSERT INTO usertable ([{},{}]);", literal, literal)
        );
    }

    #[test]
    fn test_record_literal_escapes_key() {
        let literal = builder().record_literal("a\"b", &[], &FieldValues::new());
        assert_eq!(literal, "{\"id\":\"a\\\"b\"}");
    }

    #[test]
    fn test_update_projection() {
        let mut values = FieldValues::new();
        values.insert("field1".to_string(), vec![0x01]);

        let b = builder();
        let projection = b.update_projection("user1", &fields(&["field0", "field1"]), &values);
        assert_eq!(
            projection,
            "SELECT id,field0,hex(\"01\") AS field1 FROM usertable WHERE id='user1'"
        );

        assert_eq!(
            b.upsert_projections(&[projection.clone()]),
            format!("USE ycsb;UPSERT INTO usertable ({});", projection)
        );
        assert_eq!(
            b.upsert_projections(&["P1".to_string(), "P2".to_string()]),
            "USE ycsb;UPSERT INTO usertable (P1 UNION ALL P2);"
        );
    }
}
