//! ساخت تدریجی SELECT با شرط‌های اختیاری
//!
//! هر شرط همراه پارامترهای خودش اضافه میشه، پس تعداد `?` و تعداد
//! پارامترها همیشه با هم جورن.

use super::SqlParam;

/// SELECT با WHERE پویا
///
/// ```rust
/// use hospital_catalog::database::{SqlBuilder, SqlParam};
///
/// let (sql, params) = SqlBuilder::new("SELECT id FROM diseases x")
///     .filter("x.body_part = ?", [SqlParam::from("heart")])
///     .order_by("x.id ASC")
///     .build();
///
/// assert_eq!(sql, "SELECT id FROM diseases x WHERE x.body_part = ? ORDER BY x.id ASC");
/// assert_eq!(params.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    base: String,
    conditions: Vec<String>,
    params: Vec<SqlParam>,
    order_by: Option<String>,
    limit: Option<u32>,
}

impl SqlBuilder {
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            conditions: Vec::new(),
            params: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    /// اضافه کردن شرط (با AND به بقیه وصل میشه)
    #[must_use]
    pub fn filter(
        mut self,
        condition: impl Into<String>,
        params: impl IntoIterator<Item = SqlParam>,
    ) -> Self {
        self.conditions.push(condition.into());
        self.params.extend(params);
        self
    }

    /// شرط فقط وقتی مقدار داره
    #[must_use]
    pub fn filter_opt<T>(
        self,
        value: Option<T>,
        condition: &str,
        to_params: impl FnOnce(T) -> Vec<SqlParam>,
    ) -> Self {
        match value {
            Some(v) => self.filter(condition, to_params(v)),
            None => self,
        }
    }

    #[must_use]
    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.order_by = Some(clause.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// SQL نهایی و پارامترها به ترتیب
    #[must_use]
    pub fn build(self) -> (String, Vec<SqlParam>) {
        let mut sql = self.base;
        let mut params = self.params;

        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }

        if let Some(order) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order);
        }

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(SqlParam::Int(i64::from(limit)));
        }

        (sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_conditions_join_with_and() {
        let (sql, params) = SqlBuilder::new("SELECT * FROM t")
            .filter("a = ?", [SqlParam::Int(1)])
            .filter_opt(None::<i64>, "b = ?", |v| vec![SqlParam::Int(v)])
            .filter_opt(Some("x"), "(c LIKE ? OR d LIKE ?)", |v| {
                vec![SqlParam::from(v), SqlParam::from(v)]
            })
            .order_by("id")
            .limit(Some(5))
            .build();

        assert_eq!(
            sql,
            "SELECT * FROM t WHERE a = ? AND (c LIKE ? OR d LIKE ?) ORDER BY id LIMIT ?"
        );
        assert_eq!(sql.matches('?').count(), params.len());
        assert_eq!(params.last(), Some(&SqlParam::Int(5)));
    }

    #[test]
    fn test_no_conditions() {
        let (sql, params) = SqlBuilder::new("SELECT * FROM t").build();
        assert_eq!(sql, "SELECT * FROM t");
        assert!(params.is_empty());
    }
}
