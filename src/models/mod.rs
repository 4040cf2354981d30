pub mod enums;
pub mod filters;
pub mod tender;

pub use enums::*;
pub use filters::*;
pub use tender::*;
