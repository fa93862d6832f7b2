use thiserror::Error;

/// Input problems reported inline on a form. Nothing is written when one occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Select a material and enter a quantity.")]
    MissingSelection,

    #[error("Quantity must be a number greater than zero.")]
    InvalidQuantity,

    #[error("Material {0} is no longer in the catalog.")]
    UnknownMaterial(String),

    #[error("Enter a title and add at least one material.")]
    IncompleteQuote,

    #[error("Add materials before generating the document.")]
    EmptyQuote,

    #[error("{0} is required.")]
    MissingField(&'static str),

    #[error("{0} must be a valid number.")]
    InvalidNumber(&'static str),

    #[error("{0} cannot be negative.")]
    Negative(&'static str),
}

/// Failures of the quote save flow.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Quote not found.")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
