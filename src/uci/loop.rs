//! UCI event loop and state machine

use super::options::{UciOptions, LOG_FILE, UCI_VARIANT, VERBOSE};
use super::parser::{parse_uci_command, UciCommand};
use crate::moves::Move;
use crate::position::{Position, SEARCH_MAX_DEPTH};
use crate::search::{SearchEvent, SearchJob, SearchOutcome, SearchWorker};
use log::{debug, warn};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// How long the loop waits for input before forwarding search output.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UciState {
    Init,
    Ready,
    Thinking,
}

pub struct UciEngine {
    state: UciState,
    position: Position,
    running: bool,
    options: UciOptions,
    worker: SearchWorker,
    events_tx: Sender<SearchEvent>,
    events_rx: Receiver<SearchEvent>,
    /// The running search was started with `go infinite`
    infinite: bool,
    transcript: Option<File>,
}

impl Default for UciEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn bestmove_line(best: Option<Move>, ponder: Option<Move>) -> String {
    match (best, ponder) {
        (Some(b), Some(p)) => format!("bestmove {} ponder {}", b, p),
        (Some(b), None) => format!("bestmove {}", b),
        (None, _) => "bestmove 0000".to_string(),
    }
}

/// Closing lines of a search; its info lines were streamed already.
fn outcome_lines(outcome: &SearchOutcome) -> Vec<String> {
    let mut res = Vec::new();
    if outcome.best.is_none() {
        res.push("info string position is terminal (checkmate or stalemate)".to_string());
    }
    res.push(bestmove_line(outcome.best, outcome.ponder));
    res
}

impl UciEngine {
    pub fn new() -> Self {
        Self::with_options(UciOptions::default())
    }

    /// Engine starting from preset options, e.g. read from a config file.
    pub fn with_options(options: UciOptions) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        let mut engine = Self {
            state: UciState::Init,
            position: Position::new(options.variant),
            running: true,
            options,
            worker: SearchWorker::new(),
            events_tx,
            events_rx,
            infinite: false,
            transcript: None,
        };
        if let Some(path) = engine.options.log_file.clone() {
            engine.open_transcript(&path);
        }
        engine
    }

    pub fn options(&self) -> &UciOptions {
        &self.options
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn state(&self) -> UciState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn open_transcript(&mut self, path: &str) {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => self.transcript = Some(f),
            Err(e) => {
                warn!("cannot open log file {}: {}", path, e);
                self.transcript = None;
            }
        }
    }

    /// Append a line to the session transcript, if one is open.
    pub fn transcribe(&mut self, prefix: &str, line: &str) {
        if let Some(f) = self.transcript.as_mut() {
            if let Err(e) = writeln!(f, "{} {}", prefix, line) {
                warn!("log file write failed: {}", e);
                self.transcript = None;
            }
        }
    }

    /// Protocol lines for the search events received so far.
    fn drain_events(&mut self) -> Vec<String> {
        let mut res = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                SearchEvent::Info(info) => res.push(info.to_string()),
                SearchEvent::Finished(outcome) => {
                    // the thread exits right after sending this
                    self.worker.wait();
                    self.state = UciState::Ready;
                    res.extend(outcome_lines(&outcome));
                }
            }
        }
        res
    }

    /// Search output produced since the last call, without blocking.
    pub fn poll_output(&mut self) -> Vec<String> {
        let lines = self.drain_events();
        for line in &lines {
            self.transcribe("<<", line);
        }
        lines
    }

    /// Let the running search finish on its own and return its output.
    pub fn wait_for_bestmove(&mut self) -> Vec<String> {
        self.worker.wait();
        self.poll_output()
    }

    /// Output left when input ends: a depth-limited search runs to
    /// completion, an infinite one is stopped.
    pub fn finish_at_end_of_input(&mut self) -> Vec<String> {
        if self.state != UciState::Thinking {
            return self.poll_output();
        }
        if !self.infinite {
            return self.wait_for_bestmove();
        }
        let lines = self.finish_search();
        for line in &lines {
            self.transcribe("<<", line);
        }
        lines
    }

    /// Stop a running search and collect the rest of its report.
    fn finish_search(&mut self) -> Vec<String> {
        self.worker.stop_and_wait();
        let lines = self.drain_events();
        self.state = UciState::Ready;
        lines
    }

    fn set_position(&mut self, fen: Option<String>, moves: &[String]) -> Result<(), String> {
        // Validate everything on a scratch position first
        let mut scratch = Position::new(self.options.variant);
        if let Some(f) = fen {
            scratch.parse_fen(&f).map_err(|e| format!("FEN parse error: {}", e))?;
        }
        for text in moves {
            scratch
                .push_uci(text)
                .map_err(|e| format!("invalid move {}: {}", text, e))?;
        }
        self.position = scratch;
        Ok(())
    }

    fn apply_option(&mut self, name: &str, value: Option<&str>) -> Result<(), String> {
        self.options.set_option(name, value).map_err(|e| e.to_string())?;
        if name.eq_ignore_ascii_case(UCI_VARIANT) {
            if self.position.variant() != self.options.variant {
                self.position = Position::new(self.options.variant);
            }
        } else if name.eq_ignore_ascii_case(VERBOSE) {
            crate::logging::set_verbose(self.options.verbose);
        } else if name.eq_ignore_ascii_case(LOG_FILE) {
            match self.options.log_file.clone() {
                Some(path) => self.open_transcript(&path),
                None => self.transcript = None,
            }
        }
        Ok(())
    }

    fn perft_lines(&mut self, depth: usize) -> Vec<String> {
        let mut res = Vec::new();
        let mut total = 0;
        for (mv, n) in self.position.divide(depth) {
            res.push(format!("{}: {}", mv, n));
            total += n;
        }
        res.push(String::new());
        res.push(format!("Nodes searched: {}", total));
        res
    }

    pub fn handle_command(&mut self, cmd: UciCommand) -> Vec<String> {
        let mut res = Vec::new();
        match cmd {
            UciCommand::Uci => {
                res.push(format!("id name Eightpiece {}", env!("CARGO_PKG_VERSION")));
                res.push("id author the Eightpiece developers".to_string());
                res.extend(UciOptions::uci_lines());
                res.push("uciok".to_string());
                self.state = UciState::Ready;
            }
            UciCommand::IsReady => {
                res.push("readyok".to_string());
            }
            UciCommand::UciNewGame => {
                if self.state == UciState::Thinking {
                    res.extend(self.finish_search());
                }
                self.position = Position::new(self.options.variant);
                self.state = UciState::Ready;
            }
            UciCommand::SetOption { name, value } => {
                if let Err(e) = self.apply_option(&name, value.as_deref()) {
                    warn!("setoption rejected: {}", e);
                    res.push(format!("info string error: {}", e));
                }
            }
            UciCommand::Position { fen, moves } => {
                if self.state == UciState::Thinking {
                    res.extend(self.finish_search());
                }
                if let Err(e) = self.set_position(fen, &moves) {
                    warn!("position rejected: {}", e);
                    res.push(format!("info string {}", e));
                }
                self.state = UciState::Ready;
            }
            UciCommand::Go { depth, infinite } => {
                if self.state == UciState::Thinking {
                    res.extend(self.finish_search());
                }
                let max_depth = if infinite {
                    SEARCH_MAX_DEPTH
                } else {
                    depth.unwrap_or(self.options.default_depth)
                };
                let job = SearchJob {
                    position: self.position.clone(),
                    params: self.options.search_params(max_depth),
                };
                debug!("go depth {} infinite {}", max_depth, infinite);
                // infos and bestmove arrive through poll_output
                self.worker.start(job, self.events_tx.clone());
                self.infinite = infinite;
                self.state = UciState::Thinking;
            }
            UciCommand::Stop => {
                if self.state == UciState::Thinking {
                    res.extend(self.finish_search());
                }
            }
            UciCommand::Quit => {
                self.worker.stop_and_wait();
                self.drain_events();
                self.running = false;
            }
            UciCommand::Display => {
                res.extend(self.position.pretty_print_string().lines().map(str::to_string));
            }
            UciCommand::Perft { depth } => {
                if self.state == UciState::Thinking {
                    res.extend(self.finish_search());
                }
                res.extend(self.perft_lines(depth));
            }
            UciCommand::Unknown(s) => {
                if !s.is_empty() {
                    res.push(format!("info string unknown command: {}", s));
                }
            }
        }
        res
    }
}

/// Run the protocol on stdin/stdout until `quit` or end of input.
pub fn run_uci_loop(options: UciOptions) -> io::Result<()> {
    let stdout = io::stdout();
    run_uci_session(options, io::BufReader::new(io::stdin()), stdout.lock())
}

/// Run the protocol over any line source. Input is read on its own thread,
/// so `stop`, `isready` and `quit` are answered while a search runs.
pub fn run_uci_session<R, W>(options: UciOptions, input: R, mut output: W) -> io::Result<()>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    let (line_tx, line_rx) = mpsc::channel::<io::Result<String>>();
    thread::spawn(move || {
        for line in input.lines() {
            let failed = line.is_err();
            if line_tx.send(line).is_err() || failed {
                break;
            }
        }
    });

    let mut engine = UciEngine::with_options(options);
    while engine.is_running() {
        let mut lines = match line_rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                let line = line?;
                let line = line.trim();
                if line.is_empty() {
                    Vec::new()
                } else {
                    process_uci_line(line, &mut engine)
                }
            }
            Err(RecvTimeoutError::Timeout) => Vec::new(),
            // end of input
            Err(RecvTimeoutError::Disconnected) => break,
        };
        lines.extend(engine.poll_output());
        for r in &lines {
            writeln!(output, "{}", r)?;
        }
        // Always flush so the GUI sees output at once
        output.flush()?;
    }

    if engine.is_running() {
        for r in engine.finish_at_end_of_input() {
            writeln!(output, "{}", r)?;
        }
        output.flush()?;
    }
    Ok(())
}

pub fn process_uci_line(line: &str, engine: &mut UciEngine) -> Vec<String> {
    engine.transcribe(">>", line);
    let cmd = parse_uci_command(line);
    let responses = engine.handle_command(cmd);
    for r in &responses {
        engine.transcribe("<<", r);
    }
    responses
}
