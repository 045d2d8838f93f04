//! Filter Engine (C14) data model: operators and parsed criteria
//! (spec.md §4.14).

use serde_json::Value;

use crate::filter::error::FilterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
}

impl Operator {
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        match raw {
            "eq" => Ok(Operator::Eq),
            "ne" => Ok(Operator::Ne),
            "gt" => Ok(Operator::Gt),
            "gte" => Ok(Operator::Gte),
            "lt" => Ok(Operator::Lt),
            "lte" => Ok(Operator::Lte),
            "in" => Ok(Operator::In),
            "nin" => Ok(Operator::Nin),
            other => Err(FilterError::UnknownOperator(other.to_string())),
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte)
    }

    pub fn is_set(self) -> bool {
        matches!(self, Operator::In | Operator::Nin)
    }
}

#[derive(Debug, Clone)]
pub struct Criterion {
    pub path: String,
    pub operator: Operator,
    pub value: Value,
}

/// Parses a JSON-API-style criteria object: `{"path.to.field": {"op":
/// value}, ...}`. Every entry must AND together (spec.md §4.14).
pub fn parse_criteria(raw: &Value) -> Result<Vec<Criterion>, FilterError> {
    let Value::Object(top) = raw else {
        return Err(FilterError::NotAnObject(raw.to_string()));
    };

    let mut criteria = Vec::new();
    for (path, spec) in top {
        let Value::Object(ops) = spec else {
            return Err(FilterError::MalformedCriterion(path.clone()));
        };
        if ops.len() != 1 {
            return Err(FilterError::MalformedCriterion(path.clone()));
        }
        let (op_name, value) = ops.iter().next().unwrap();
        criteria.push(Criterion {
            path: path.clone(),
            operator: Operator::parse(op_name)?,
            value: value.clone(),
        });
    }
    Ok(criteria)
}
