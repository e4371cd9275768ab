/// Built-in bootstrap-token mirrors, tried in order.
const DEFAULT_SOURCES: &[&str] = &[
    "https://token-1.kioskmirrors.net/grant",
    "https://token-2.kioskmirrors.net/grant",
    "https://bootstrap.kioskstore.dev/grant",
];

/// Ordered, rotating set of bootstrap-token endpoints.
///
/// `draw` hands out one source per call and advances circularly, so a
/// source is never drawn twice in a row unless it is the only entry.
/// `reset` rewinds to the first source at the start of a new sequence.
#[derive(Debug, Clone)]
pub struct TokenSourcePool {
    sources: Vec<String>,
    cursor: usize,
}

impl TokenSourcePool {
    /// Pool over the built-in mirror list.
    pub fn new() -> Self {
        Self::from_sources(DEFAULT_SOURCES.iter().map(|s| s.to_string()))
    }

    /// Pool over caller-supplied sources, in the given order.
    pub fn from_sources(sources: impl IntoIterator<Item = String>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Rewind to the first source.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// The source at the cursor; advances circularly. `None` only for an
    /// empty pool.
    pub fn draw(&mut self) -> Option<String> {
        let source = self.sources.get(self.cursor)?.clone();
        self.cursor = (self.cursor + 1) % self.sources.len();
        Some(source)
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

impl Default for TokenSourcePool {
    fn default() -> Self {
        Self::new()
    }
}
