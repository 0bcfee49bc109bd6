pub mod convert;
pub mod envelope;
pub mod error;
pub mod failure;
pub mod identifier;
pub mod value;


pub use convert::{FromValue, IntoValue, Json};
pub use envelope::Envelope;
pub use error::{Result, SimplycallError};
pub use failure::{CallResult, Failure, Fault};
pub use identifier::RouteId;
pub use value::{ArgType, Value};
