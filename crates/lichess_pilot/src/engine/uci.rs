//! Parsing of UCI engine output.

use tracing::instrument;

/// Engine evaluation from the side to move's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawn advantage.
    Centipawns(i32),
    /// Forced mate in this many moves; negative when being mated.
    Mate(i32),
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Centipawns(cp) => write!(f, "{:+.2}", f64::from(cp) / 100.0),
            Self::Mate(moves) if moves >= 0 => write!(f, "mate in {}", moves),
            Self::Mate(moves) => write!(f, "mated in {}", -moves),
        }
    }
}

/// The parts of an `info` line we keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInfo {
    /// Search depth in plies.
    pub depth: Option<u32>,
    /// Evaluation.
    pub score: Option<Score>,
    /// Principal variation.
    pub pv: Vec<String>,
}

impl SearchInfo {
    /// Number of principal-variation moves quoted in a rationale.
    const PV_PREVIEW: usize = 4;

    /// Human-readable summary of the search.
    #[instrument(skip(self))]
    pub fn rationale(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(depth) = self.depth {
            parts.push(format!("depth {}", depth));
        }
        if let Some(score) = self.score {
            parts.push(format!("eval {}", score));
        }
        if !self.pv.is_empty() {
            let preview: Vec<&str> = self
                .pv
                .iter()
                .take(Self::PV_PREVIEW)
                .map(String::as_str)
                .collect();
            parts.push(format!("line {}", preview.join(" ")));
        }
        (!parts.is_empty()).then(|| format!("Engine search: {}", parts.join(", ")))
    }
}

/// One line of engine output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciLine {
    /// Reply to `uci`.
    UciOk,
    /// Reply to `isready`.
    ReadyOk,
    /// Search result. `None` when the engine has no move (`bestmove (none)`).
    BestMove(Option<String>),
    /// Search progress.
    Info(SearchInfo),
    /// Anything else (`id`, `option`, free text).
    Other,
}

/// Parses a single line of engine output.
#[instrument]
pub fn parse_line(line: &str) -> UciLine {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        Some("uciok") => UciLine::UciOk,
        Some("readyok") => UciLine::ReadyOk,
        Some("bestmove") => {
            let mv = tokens
                .next()
                .filter(|mv| *mv != "(none)" && *mv != "0000")
                .map(str::to_string);
            UciLine::BestMove(mv)
        }
        Some("info") => UciLine::Info(parse_info(tokens)),
        _ => UciLine::Other,
    }
}

fn parse_info<'a>(mut tokens: impl Iterator<Item = &'a str>) -> SearchInfo {
    let mut info = SearchInfo::default();
    while let Some(token) = tokens.next() {
        match token {
            "depth" => info.depth = tokens.next().and_then(|t| t.parse().ok()),
            "score" => {
                let kind = tokens.next();
                let value = tokens.next().and_then(|t| t.parse::<i32>().ok());
                info.score = match (kind, value) {
                    (Some("cp"), Some(cp)) => Some(Score::Centipawns(cp)),
                    (Some("mate"), Some(n)) => Some(Score::Mate(n)),
                    _ => info.score,
                };
            }
            // pv runs to the end of the line
            "pv" => {
                info.pv = tokens.by_ref().map(str::to_string).collect();
            }
            _ => {}
        }
    }
    info
}
