//! Token stream and navigation
//!
//!     The stream owns the tokens of one pass invocation and a cursor. The cursor is the index
//!     of the last token consumed by [TokenStream::advance] (or by a block-copy primitive built
//!     on it); before the first advance there is no cursor. Navigation queries look left or
//!     right of the cursor, skipping the kinds in an [IgnoreList], and never move it.
//!
//! Classification cache
//!
//!     Passes tend to ask the same question several times at one position ("is the previous
//!     significant token `=`?"). When enabled, [TokenStream::token_is] memoizes its answers
//!     keyed by direction, resolved ignore-list and target. An answer is only valid for the
//!     position it was computed at, so the cache is cleared whenever the cursor moves, in
//!     either direction.

use crate::php::token::{Target, Token, TokenKind};
use std::collections::HashMap;

/// Scan direction relative to an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Set of kinds skipped by directional scans.
///
/// Kept sorted and deduplicated so equal sets hash equally regardless of how they were
/// requested.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IgnoreList(Vec<TokenKind>);

impl IgnoreList {
    pub fn new(kinds: &[TokenKind]) -> Self {
        let mut kinds = kinds.to_vec();
        kinds.sort();
        kinds.dedup();
        IgnoreList(kinds)
    }

    pub fn whitespace() -> Self {
        IgnoreList(vec![TokenKind::Whitespace])
    }

    /// Whitespace and comments of both flavours.
    pub fn useful() -> Self {
        IgnoreList::new(&[TokenKind::Whitespace, TokenKind::Comment, TokenKind::DocComment])
    }

    /// An empty request means whitespace only.
    pub fn resolve(kinds: &[TokenKind]) -> Self {
        if kinds.is_empty() {
            IgnoreList::whitespace()
        } else {
            IgnoreList::new(kinds)
        }
    }

    pub fn contains(&self, kind: TokenKind) -> bool {
        self.0.binary_search(&kind).is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    direction: Direction,
    ignore: IgnoreList,
    target: Target,
}

/// Ordered tokens plus the cursor of the pass consuming them.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: Option<usize>,
    next: usize,
    use_cache: bool,
    cache: HashMap<CacheKey, bool>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenStream {
            tokens,
            cursor: None,
            next: 0,
            use_cache: false,
            cache: HashMap::new(),
        }
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    /// Index of the last consumed token.
    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    /// The last consumed token.
    pub fn current(&self) -> Option<&Token> {
        self.cursor.and_then(|idx| self.tokens.get(idx))
    }

    pub fn is_exhausted(&self) -> bool {
        self.next >= self.tokens.len()
    }

    /// Consume the next token, moving the cursor onto it.
    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.next)?.clone();
        self.cursor = Some(self.next);
        self.next += 1;
        self.cache.clear();
        Some(token)
    }

    /// Un-consume the current token so the next [advance](Self::advance) delivers it again.
    pub fn step_back(&mut self) {
        if self.next == 0 {
            return;
        }
        self.next -= 1;
        self.cursor = self.next.checked_sub(1);
        self.cache.clear();
    }

    /// Token at `cursor + offset`. Before the first advance the cursor sits just left of
    /// the stream, so `peek(1)` is the first token.
    pub fn peek(&self, offset: isize) -> Option<&Token> {
        let idx = self.origin() + offset;
        usize::try_from(idx).ok().and_then(|idx| self.tokens.get(idx))
    }

    /// From `from`, step in `direction` past every token whose kind is ignored. Returns the
    /// index of the first token that is not, or `None` if the scan runs off the stream.
    pub fn skip_scan(&self, from: usize, direction: Direction, ignore: &IgnoreList) -> Option<usize> {
        self.scan(from as isize, direction, ignore)
    }

    fn scan(&self, from: isize, direction: Direction, ignore: &IgnoreList) -> Option<usize> {
        let mut pos = from + direction.step();
        while let Ok(idx) = usize::try_from(pos) {
            let token = self.tokens.get(idx)?;
            if !ignore.contains(token.kind) {
                return Some(idx);
            }
            pos += direction.step();
        }
        None
    }

    fn origin(&self) -> isize {
        self.cursor.map_or(-1, |idx| idx as isize)
    }

    /// Does the nearest non-ignored token in `direction` from `idx` match `target`?
    pub fn matches_at(
        &self,
        idx: usize,
        target: &Target,
        direction: Direction,
        ignore: &IgnoreList,
    ) -> bool {
        self.skip_scan(idx, direction, ignore)
            .is_some_and(|found| target.matches(&self.tokens[found]))
    }

    /// Does the nearest non-ignored token in `direction` from the cursor match `target`?
    ///
    /// An empty `ignore` slice skips whitespace only.
    pub fn token_is(&mut self, target: impl Into<Target>, direction: Direction, ignore: &[TokenKind]) -> bool {
        self.classify(target.into(), direction, IgnoreList::resolve(ignore))
    }

    /// [token_is](Self::token_is) skipping whitespace and comments.
    pub fn useful_token_is(&mut self, target: impl Into<Target>, direction: Direction) -> bool {
        self.classify(target.into(), direction, IgnoreList::useful())
    }

    fn classify(&mut self, target: Target, direction: Direction, ignore: IgnoreList) -> bool {
        if !self.use_cache {
            return self.matches_from_cursor(&target, direction, &ignore);
        }

        let key = CacheKey {
            direction,
            ignore,
            target,
        };
        if let Some(hit) = self.cache.get(&key) {
            return *hit;
        }
        let answer = self.matches_from_cursor(&key.target, direction, &key.ignore);
        self.cache.insert(key, answer);
        answer
    }

    fn matches_from_cursor(&self, target: &Target, direction: Direction, ignore: &IgnoreList) -> bool {
        self.scan(self.origin(), direction, ignore)
            .is_some_and(|found| target.matches(&self.tokens[found]))
    }

    /// Number of memoized answers for the current position.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    pub fn left_index(&self, ignore: &[TokenKind]) -> Option<usize> {
        self.scan(self.origin(), Direction::Left, &IgnoreList::resolve(ignore))
    }

    pub fn right_index(&self, ignore: &[TokenKind]) -> Option<usize> {
        self.scan(self.origin(), Direction::Right, &IgnoreList::resolve(ignore))
    }

    pub fn left_useful_index(&self) -> Option<usize> {
        self.scan(self.origin(), Direction::Left, &IgnoreList::useful())
    }

    pub fn left_token(&self, ignore: &[TokenKind]) -> Option<&Token> {
        self.left_index(ignore).map(|idx| &self.tokens[idx])
    }

    pub fn right_token(&self, ignore: &[TokenKind]) -> Option<&Token> {
        self.right_index(ignore).map(|idx| &self.tokens[idx])
    }

    /// Whitespace-skipping neighbours of `idx`.
    pub fn siblings(&self, idx: usize) -> (Option<usize>, Option<usize>) {
        let ignore = IgnoreList::whitespace();
        (
            self.skip_scan(idx, Direction::Left, &ignore),
            self.skip_scan(idx, Direction::Right, &ignore),
        )
    }

    /// Is the token right before the cursor whitespace holding a newline?
    pub fn has_ln_before(&self) -> bool {
        self.peek(-1).is_some_and(is_line_break)
    }

    /// Is the token right after the cursor whitespace holding a newline?
    pub fn has_ln_after(&self) -> bool {
        self.peek(1).is_some_and(is_line_break)
    }

    /// Consume tokens without emitting them until one of `kind` is consumed.
    pub fn walk_until(&mut self, kind: TokenKind) -> Option<Token> {
        while let Some(token) = self.advance() {
            if token.kind == kind {
                return Some(token);
            }
        }
        None
    }
}

fn is_line_break(token: &Token) -> bool {
    token.kind.is_whitespace() && token.has_newline()
}
