//! Fixed-arity commands grouped into `url` and `crypto` ensembles.
//!
//! Every command takes raw byte-string arguments and produces a [`Value`].
//! The table is a plain static slice; nothing is registered anywhere.

use std::fmt;

use crate::crypto::{self, PwhashConfig};
use crate::error::{CutilError, Result};
use crate::url;
use crate::utils::log;

pub const PACKAGE_NAME: &str = "example::cutil";
pub const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

const LOG_NAME: &str = "command";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Bytes(Vec<u8>),
    Bool(bool),
}

impl Value {
    /// The value as the host would see it: booleans become `1` / `0`.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Bytes(bytes) => bytes.clone(),
            Value::Bool(true) => b"1".to_vec(),
            Value::Bool(false) => b"0".to_vec(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            Value::Bool(b) => write!(f, "{}", *b as u8),
        }
    }
}

type Handler = fn(&[&[u8]], &PwhashConfig) -> Result<Value>;

pub struct Command {
    pub group: &'static str,
    pub name: &'static str,
    /// Argument names, as shown in the wrong-arity message.
    pub usage: &'static str,
    pub arity: usize,
    run: Handler,
}

impl Command {
    pub fn qualified_name(&self) -> String {
        format!("::{}::{}::{}", PACKAGE_NAME, self.group, self.name)
    }

    pub fn invoke(&self, args: &[&[u8]], config: &PwhashConfig) -> Result<Value> {
        if args.len() != self.arity {
            return Err(CutilError::WrongNumArgs {
                command: self.qualified_name(),
                usage: self.usage,
            });
        }

        log::debug(
            LOG_NAME,
            &format!("{} {} ({} args)", self.group, self.name, args.len()),
        );
        (self.run)(args, config)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("group", &self.group)
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("arity", &self.arity)
            .finish()
    }
}

pub static COMMANDS: &[Command] = &[
    Command {
        group: "url",
        name: "encode",
        usage: "string",
        arity: 1,
        run: url_encode,
    },
    Command {
        group: "url",
        name: "decode",
        usage: "string",
        arity: 1,
        run: url_decode,
    },
    Command {
        group: "crypto",
        name: "pwhash",
        usage: "string",
        arity: 1,
        run: crypto_pwhash,
    },
    Command {
        group: "crypto",
        name: "pwhash_verify",
        usage: "string string",
        arity: 2,
        run: crypto_pwhash_verify,
    },
    Command {
        group: "crypto",
        name: "random_bytes",
        usage: "number of bytes",
        arity: 1,
        run: crypto_random_bytes,
    },
];

pub fn lookup(group: &str, name: &str) -> Option<&'static Command> {
    COMMANDS
        .iter()
        .find(|cmd| cmd.group == group && cmd.name == name)
}

/// Ensemble-style call: `words` is `group name args...`.
pub fn dispatch(words: &[&[u8]], config: &PwhashConfig) -> Result<Value> {
    let (group, name, args) = match words {
        [group, name, args @ ..] => (
            String::from_utf8_lossy(group),
            String::from_utf8_lossy(name),
            args,
        ),
        [group] => return Err(CutilError::UnknownCommand(String::from_utf8_lossy(group).into())),
        [] => return Err(CutilError::UnknownCommand(String::new())),
    };

    let command = lookup(&group, &name)
        .ok_or_else(|| CutilError::UnknownCommand(format!("{} {}", group, name)))?;

    let result = command.invoke(args, config);
    if let Err(e) = &result {
        log::warn(LOG_NAME, &format!("{} {} failed: {}", group, name, e));
    }
    result
}

fn url_encode(args: &[&[u8]], _: &PwhashConfig) -> Result<Value> {
    Ok(Value::Bytes(url::percent_encode(args[0])))
}

fn url_decode(args: &[&[u8]], _: &PwhashConfig) -> Result<Value> {
    Ok(Value::Bytes(url::percent_decode(args[0])?))
}

fn crypto_pwhash(args: &[&[u8]], config: &PwhashConfig) -> Result<Value> {
    let hash = crypto::password_hash(args[0], config)?;
    Ok(Value::Bytes(hash.into_bytes()))
}

fn crypto_pwhash_verify(args: &[&[u8]], _: &PwhashConfig) -> Result<Value> {
    // A hash that isn't even UTF-8 can't be a PHC string.
    let matched = match std::str::from_utf8(args[0]) {
        Ok(hash) => crypto::password_hash_verify(hash, args[1]),
        Err(_) => false,
    };
    Ok(Value::Bool(matched))
}

fn crypto_random_bytes(args: &[&[u8]], _: &PwhashConfig) -> Result<Value> {
    let len = parse_len(args[0])?;
    Ok(Value::Bytes(crypto::random_bytes(len)?))
}

fn parse_len(arg: &[u8]) -> Result<usize> {
    let text = String::from_utf8_lossy(arg);
    let len: i64 = text
        .trim()
        .parse()
        .map_err(|_| CutilError::Argument(format!("expected integer but got \"{}\"", text)))?;

    if len < 0 {
        return Err(CutilError::Argument("size must be >= 0".to_string()));
    }
    usize::try_from(len).map_err(|_| CutilError::Argument(format!("size too large: {}", len)))
}
