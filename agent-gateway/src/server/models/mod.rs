mod requests;
mod session;

pub use requests::*;
pub use session::*;
