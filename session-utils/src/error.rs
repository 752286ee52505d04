#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Grading(String),
    #[error("invalid submission transition: {0}")]
    InvalidTransition(String),
}
