//! UCI command parser
//!
//! Tokenizes one input line into a [`UciCommand`]. Unknown tokens inside a
//! known command are skipped; unknown commands are kept for reporting.

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum UciCommand {
    Uci,
    IsReady,
    SetOption {
        name: String,
        value: Option<String>,
    },
    UciNewGame,
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Go {
        depth: Option<usize>,
        infinite: bool,
    },
    Stop,
    Quit,
    /// `d`: print the board
    Display,
    Perft {
        depth: usize,
    },
    Unknown(String),
}

fn parse_setoption(parts: &[&str]) -> UciCommand {
    // setoption name <name> [value <val>]
    let mut name = String::new();
    let mut value: Option<String> = None;
    let mut i = 1usize;
    while i < parts.len() {
        match parts[i] {
            "name" => {
                i += 1;
                let mut words = Vec::new();
                while i < parts.len() && parts[i] != "value" {
                    words.push(parts[i]);
                    i += 1;
                }
                name = words.join(" ");
            }
            "value" => {
                value = Some(parts[i + 1..].join(" "));
                break;
            }
            _ => i += 1,
        }
    }
    UciCommand::SetOption { name, value }
}

fn parse_position(parts: &[&str]) -> UciCommand {
    // position [fen <fenstring> | startpos] [moves <move1> ...]
    let moves_at = parts.iter().position(|&s| s == "moves");
    let moves = moves_at
        .map(|at| parts[at + 1..].iter().map(|m| m.to_string()).collect())
        .unwrap_or_default();
    let fen = match parts.get(1) {
        Some(&"fen") => {
            let end = moves_at.unwrap_or(parts.len());
            Some(parts[2..end.max(2)].join(" "))
        }
        _ => None,
    };
    UciCommand::Position { fen, moves }
}

fn parse_go(parts: &[&str]) -> UciCommand {
    let mut depth = None;
    let mut infinite = false;
    let mut i = 1usize;
    while i < parts.len() {
        match parts[i] {
            "depth" => {
                depth = parts.get(i + 1).and_then(|v| v.parse::<usize>().ok());
                i += 2;
            }
            "infinite" => {
                infinite = true;
                i += 1;
            }
            _ => i += 1,
        }
    }
    UciCommand::Go { depth, infinite }
}

/// Parse a UCI command from a string (simple tokenizer)
pub fn parse_uci_command(line: &str) -> UciCommand {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = parts.first() else {
        return UciCommand::Unknown(String::new());
    };

    match head {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        "d" => UciCommand::Display,
        "setoption" => parse_setoption(&parts),
        "position" => parse_position(&parts),
        "go" => parse_go(&parts),
        "perft" => match parts.get(1).and_then(|v| v.parse::<usize>().ok()) {
            Some(depth) => UciCommand::Perft { depth },
            None => UciCommand::Unknown(line.trim().to_string()),
        },
        other => UciCommand::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_commands() {
        assert_eq!(parse_uci_command("uci"), UciCommand::Uci);
        assert_eq!(parse_uci_command("  isready \n"), UciCommand::IsReady);
        assert_eq!(parse_uci_command("d"), UciCommand::Display);
        assert_eq!(parse_uci_command("perft 3"), UciCommand::Perft { depth: 3 });
        assert_eq!(parse_uci_command("perft"), UciCommand::Unknown("perft".to_string()));
        assert_eq!(parse_uci_command("xyzzy 1"), UciCommand::Unknown("xyzzy".to_string()));
        assert_eq!(parse_uci_command(""), UciCommand::Unknown(String::new()));
    }

    #[test]
    fn setoption_with_spaces() {
        assert_eq!(
            parse_uci_command("setoption name Null Move Pruning value true"),
            UciCommand::SetOption {
                name: "Null Move Pruning".to_string(),
                value: Some("true".to_string())
            }
        );
        assert_eq!(
            parse_uci_command("setoption name Log File value my games.log"),
            UciCommand::SetOption {
                name: "Log File".to_string(),
                value: Some("my games.log".to_string())
            }
        );
        assert_eq!(
            parse_uci_command("setoption name Verbose"),
            UciCommand::SetOption {
                name: "Verbose".to_string(),
                value: None
            }
        );
    }

    #[test]
    fn position_forms() {
        assert_eq!(
            parse_uci_command("position startpos moves e2e4 e7e5"),
            UciCommand::Position {
                fen: None,
                moves: vec!["e2e4".to_string(), "e7e5".to_string()]
            }
        );
        assert_eq!(
            parse_uci_command("position fen 4k3/8/8/8/8/8/8/4K3 w - - 0 1 c1d2"),
            UciCommand::Position {
                fen: Some("4k3/8/8/8/8/8/8/4K3 w - - 0 1 c1d2".to_string()),
                moves: vec![]
            }
        );
        assert_eq!(
            parse_uci_command("position fen 4k3/8/8/8/8/8/8/4K3 w - - 0 1 moves e1e2"),
            UciCommand::Position {
                fen: Some("4k3/8/8/8/8/8/8/4K3 w - - 0 1".to_string()),
                moves: vec!["e1e2".to_string()]
            }
        );
    }

    #[test]
    fn go_limits() {
        assert_eq!(
            parse_uci_command("go depth 6"),
            UciCommand::Go {
                depth: Some(6),
                infinite: false
            }
        );
        assert_eq!(
            parse_uci_command("go wtime 1000 infinite"),
            UciCommand::Go {
                depth: None,
                infinite: true
            }
        );
    }
}
