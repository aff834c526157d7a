mod ledger;
mod line_item;
mod quantity;
mod seed;

pub use ledger::*;
pub use line_item::*;
pub use quantity::*;
pub use seed::*;
