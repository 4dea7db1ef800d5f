//! Filtered query paths for the table-style backend: `resource?column=eq.value`.

use std::fmt;

/// A filtered query against one REST resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    resource: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
}

impl Query {
    pub fn table(resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
            filters: Vec::new(),
            order: None,
        }
    }

    /// Adds a `column=eq.value` filter. Filters are ANDed by the backend.
    pub fn eq(mut self, column: &str, value: impl fmt::Display) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", urlencoding::encode(&value.to_string()))));
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.asc"));
        self
    }

    /// Renders the relative request path, e.g. `question?interview_id=eq.4&order=id.asc`.
    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        let mut params = self
            .filters
            .iter()
            .map(|(column, op)| format!("{column}={op}"))
            .collect::<Vec<_>>();
        if let Some(order) = &self.order {
            params.push(format!("order={order}"));
        }
        if !params.is_empty() {
            write!(f, "?{}", params.join("&"))?;
        }
        Ok(())
    }
}
