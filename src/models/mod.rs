//! Database records and request payloads.

pub mod category;
pub mod certificate;
pub mod contact;
pub mod product;
pub mod questionnaire;
pub mod stats;
pub mod user;

pub use category::*;
pub use certificate::*;
pub use contact::*;
pub use product::*;
pub use questionnaire::*;
pub use stats::*;
pub use user::*;
