use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("filter criteria must be a JSON object, got '{0}'")]
    NotAnObject(String),

    #[error("filter operator '{0}' is not recognized")]
    UnknownOperator(String),

    #[error("filter criterion for path '{0}' must be an object of {{operator: value}}")]
    MalformedCriterion(String),
}
