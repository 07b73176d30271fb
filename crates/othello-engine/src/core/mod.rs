pub use self::{board::*, side::*};

pub(crate) mod board;
pub(crate) mod side;
