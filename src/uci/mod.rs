//! UCI front-end: command parsing, options and the engine loop

pub mod options;
pub mod parser;
pub mod r#loop;

pub use options::{OptionType, UciOption, UciOptions};
pub use parser::{parse_uci_command, UciCommand};
pub use r#loop::{process_uci_line, run_uci_loop, run_uci_session, UciEngine, UciState};
