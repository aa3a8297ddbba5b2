//! Pure data structures: identifiers, cart lines, products and the priced cart view.

pub mod cart;
pub mod product;

pub use cart::*;
pub use product::*;
