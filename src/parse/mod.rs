pub mod shell;
pub mod tokenize;
pub mod types;

pub use shell::parse_command;
pub use tokenize::tokenize;
pub use types::{
    CallCommand, Command, Direction, Part, PipeCommand, Quoting, Redirections, SequenceCommand,
    Token, Word,
};
