use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid date stamp: {raw}")]
    InvalidStamp { raw: String },

    #[error("Invalid date-range token: {raw}")]
    InvalidWindowToken { raw: String },
}
