mod operation;
mod policy;

pub use operation::*;
pub use policy::*;
