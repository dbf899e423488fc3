use thiserror::Error;

/// Why a bid or lifecycle action was refused. Every variant is a semantic,
/// client-recoverable rejection; none represents an internal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Product not found")]
    ProductNotFound,

    #[error("The auction for this product is no longer open")]
    AuctionClosed,

    #[error("You cannot bid on your own product")]
    SelfBidForbidden,

    #[error("Bid amount must be a positive integer")]
    InvalidAmount,

    #[error("Bid amount must not be less than the product's base price")]
    BelowBasePrice,

    #[error("You have already bid on this product")]
    DuplicateBid,

    #[error("This product has already been sold")]
    AlreadySold,

    #[error("The auction for this product is still open")]
    AuctionStillOpen,

    #[error("You are not the owner of this resource")]
    NotOwner,
}
