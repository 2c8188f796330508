pub mod command;
pub mod crypto;
pub mod error;
pub mod url;
pub mod utils;

pub use command::{dispatch, lookup, Command, Value, COMMANDS, PACKAGE_NAME, PACKAGE_VERSION};
pub use crypto::{password_hash, password_hash_verify, random_bytes, PwhashConfig};
pub use error::{CutilError, DecodeError};
pub use url::{percent_decode, percent_encode, percent_encode_str};
