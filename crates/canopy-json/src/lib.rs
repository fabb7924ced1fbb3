#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, future_incompatible, unreachable_pub, rust_2018_idioms)]

mod dom;
mod error;
mod lexer;
mod limit;
mod parser;
mod serializer;
mod strings;

pub use crate::dom::{ContainerId, Json, JsonKind, ObjTuple, ParentLink};
pub use crate::error::{DomError, RejectedElement, SerializeError};
pub use crate::lexer::{Lexer, Token, TokenKind};
pub use crate::limit::LimitTracker;
pub use crate::parser::Parser;
