use super::core::ParseError;
use super::core::ParseResult;
use super::core::Parser;
use super::cursor::Cursor;
use crate::config::ParseConfig;
use std::fmt;
use std::marker::PhantomData;

/// Always succeeds with `value`, consuming nothing.
#[derive(Clone)]
pub struct Return<O> {
    value: O,
}

impl<O> Return<O> {
    pub const fn new(value: O) -> Self {
        Self { value }
    }
}

impl<O: Clone> Parser<O> for Return<O> {
    fn parse(&self, _cursor: &mut Cursor<'_>, _config: &ParseConfig) -> ParseResult<O> {
        Ok(self.value.clone())
    }
}

/// Always fails with the same error, whatever the output type.
#[derive(Clone)]
pub struct Failure {
    error: ParseError,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ParseError::Fail(message.into()),
        }
    }

    pub fn with_error(error: ParseError) -> Self {
        Self { error }
    }
}

impl<O> Parser<O> for Failure {
    fn parse(&self, _cursor: &mut Cursor<'_>, _config: &ParseConfig) -> ParseResult<O> {
        self.error.clone().repack()
    }
}

/// Runs `first`, discards its value, then runs `second`.
#[derive(Clone)]
pub struct Then<P1, P2, A> {
    first: P1,
    second: P2,
    _phantom: PhantomData<fn() -> A>,
}

impl<P1, P2, A> Then<P1, P2, A> {
    pub const fn new(first: P1, second: P2) -> Self {
        Self {
            first,
            second,
            _phantom: PhantomData,
        }
    }
}

impl<O, A, P1, P2> Parser<O> for Then<P1, P2, A>
where
    P1: Parser<A>,
    P2: Parser<O>,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<O> {
        self.first.parse(cursor, config)?;
        self.second.parse(cursor, config)
    }
}

/// Runs `first`, then the parser built from its value.
#[derive(Clone)]
pub struct Bind<P, F, A> {
    first: P,
    next: F,
    _phantom: PhantomData<fn() -> A>,
}

impl<P, F, A> Bind<P, F, A> {
    pub fn new(first: P, next: F) -> Self {
        Self {
            first,
            next,
            _phantom: PhantomData,
        }
    }
}

impl<O, A, P, F, Q> Parser<O> for Bind<P, F, A>
where
    P: Parser<A>,
    F: Fn(A) -> Q,
    Q: Parser<O>,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<O> {
        let value = self.first.parse(cursor, config)?;
        (self.next)(value).parse(cursor, config)
    }
}

/// Ordered choice with backtracking.
///
/// `first` runs against a copy of the cursor. If it succeeds the copy is
/// committed; if it fails the copy is dropped and `second` starts from the
/// original position.
#[derive(Clone)]
pub struct Or<P1, P2> {
    first: P1,
    second: P2,
}

impl<P1, P2> Or<P1, P2> {
    pub const fn new(first: P1, second: P2) -> Self {
        Self { first, second }
    }
}

impl<O, P1, P2> Parser<O> for Or<P1, P2>
where
    P1: Parser<O>,
    P2: Parser<O>,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<O> {
        let mut attempt = cursor.snapshot();
        match self.first.parse(&mut attempt, config) {
            Ok(value) => {
                cursor.restore(attempt);
                Ok(value)
            }
            Err(e) => {
                tracing::trace!(
                    target: "parser::or",
                    error = %e,
                    position = cursor.position(),
                    "first alternative failed, backtracking"
                );
                self.second.parse(cursor, config)
            }
        }
    }
}

/// Zero or more repetitions. Never fails: the cursor ends just after the
/// last successful repetition.
#[derive(Clone)]
pub struct Many<P> {
    parser: P,
}

impl<P> Many<P> {
    pub const fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<O, P> Parser<Vec<O>> for Many<P>
where
    P: Parser<O>,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<Vec<O>> {
        let mut results = Vec::new();

        loop {
            let mut attempt = cursor.snapshot();
            match self.parser.parse(&mut attempt, config) {
                Ok(value) => {
                    results.push(value);
                    cursor.restore(attempt);
                }
                Err(e) => {
                    tracing::trace!(
                        target: "parser::many",
                        error = %e,
                        position = cursor.position(),
                        items_collected = results.len(),
                        "repetition stopped"
                    );
                    break;
                }
            }
        }

        Ok(results)
    }
}

#[derive(Clone)]
pub struct Many1<P> {
    parser: P,
}

impl<P> Many1<P> {
    pub const fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<O, P> Parser<Vec<O>> for Many1<P>
where
    P: Parser<O>,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<Vec<O>> {
        let first = self.parser.parse(cursor, config)?;
        let mut results = vec![first];
        results.extend(Many::new(&self.parser).parse(cursor, config)?);
        Ok(results)
    }
}

#[derive(Clone)]
pub struct Select<P, F, A> {
    parser: P,
    f: F,
    _phantom: PhantomData<fn() -> A>,
}

impl<P, F, A> Select<P, F, A> {
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<A, B, P, F> Parser<B> for Select<P, F, A>
where
    P: Parser<A>,
    F: Fn(A) -> B,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<B> {
        self.parser.parse(cursor, config).map(&self.f)
    }
}

/// Runs `parser`, then the parser `selector` builds from its value, and
/// combines both values with `projector`.
#[derive(Clone)]
pub struct SelectMany<P, F, G, A, B, Q> {
    parser: P,
    selector: F,
    projector: G,
    _phantom: PhantomData<fn() -> (A, B, Q)>,
}

impl<P, F, G, A, B, Q> SelectMany<P, F, G, A, B, Q>
where
    P: Parser<A>,
    F: Fn(&A) -> Q,
    Q: Parser<B>,
{
    pub fn new(parser: P, selector: F, projector: G) -> Self {
        Self {
            parser,
            selector,
            projector,
            _phantom: PhantomData,
        }
    }
}

impl<A, B, C, P, F, G, Q> Parser<C> for SelectMany<P, F, G, A, B, Q>
where
    P: Parser<A>,
    F: Fn(&A) -> Q,
    Q: Parser<B>,
    G: Fn(A, B) -> C,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<C> {
        let first = self.parser.parse(cursor, config)?;
        let second = (self.selector)(&first).parse(cursor, config)?;
        Ok((self.projector)(first, second))
    }
}

/// Succeeds only when the parsed value satisfies `predicate`.
#[derive(Clone)]
pub struct Where<P, F> {
    parser: P,
    predicate: F,
}

impl<P, F> Where<P, F> {
    pub fn new(parser: P, predicate: F) -> Self {
        Self { parser, predicate }
    }
}

impl<O, P, F> Parser<O> for Where<P, F>
where
    P: Parser<O>,
    F: Fn(&O) -> bool,
    O: fmt::Debug,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<O> {
        let value = self.parser.parse(cursor, config)?;
        if (self.predicate)(&value) {
            Ok(value)
        } else {
            Err(ParseError::Predicate {
                found: format!("{:?}", value),
                position: cursor.position(),
            })
        }
    }
}

/// Runs `parser` and replaces its value with a fixed one.
#[derive(Clone)]
pub struct Replace<P, A, V> {
    parser: P,
    value: V,
    _phantom: PhantomData<fn() -> A>,
}

impl<P, A, V> Replace<P, A, V> {
    pub const fn new(parser: P, value: V) -> Self {
        Self {
            parser,
            value,
            _phantom: PhantomData,
        }
    }
}

impl<A, V, P> Parser<V> for Replace<P, A, V>
where
    P: Parser<A>,
    V: Clone,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<V> {
        self.parser.parse(cursor, config)?;
        Ok(self.value.clone())
    }
}

#[derive(Clone)]
pub struct Optional<P> {
    parser: P,
}

impl<P> Optional<P> {
    pub const fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<O, P> Parser<Option<O>> for Optional<P>
where
    P: Parser<O>,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<Option<O>> {
        let mut attempt = cursor.snapshot();
        match self.parser.parse(&mut attempt, config) {
            Ok(value) => {
                cursor.restore(attempt);
                Ok(Some(value))
            }
            Err(_) => Ok(None),
        }
    }
}

/// Turns the outcome of `parser` into a value. A failure is returned as
/// `Ok(Err(..))` with the cursor left where it was.
#[derive(Clone)]
pub struct Materialize<P> {
    parser: P,
}

impl<P> Materialize<P> {
    pub const fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<O, P> Parser<ParseResult<O>> for Materialize<P>
where
    P: Parser<O>,
{
    fn parse(
        &self,
        cursor: &mut Cursor<'_>,
        config: &ParseConfig,
    ) -> ParseResult<ParseResult<O>> {
        let mut attempt = cursor.snapshot();
        let result = self.parser.parse(&mut attempt, config);
        if result.is_ok() {
            cursor.restore(attempt);
        }
        Ok(result)
    }
}

#[derive(Clone)]
pub struct Between<L, P, R, LO, RO> {
    left: L,
    parser: P,
    right: R,
    _phantom: PhantomData<fn() -> (LO, RO)>,
}

impl<L, P, R, LO, RO> Between<L, P, R, LO, RO> {
    pub const fn new(left: L, parser: P, right: R) -> Self {
        Self {
            left,
            parser,
            right,
            _phantom: PhantomData,
        }
    }
}

impl<O, LO, RO, L, P, R> Parser<O> for Between<L, P, R, LO, RO>
where
    L: Parser<LO>,
    P: Parser<O>,
    R: Parser<RO>,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<O> {
        self.left.parse(cursor, config)?;
        let value = self.parser.parse(cursor, config)?;
        self.right.parse(cursor, config)?;
        Ok(value)
    }
}

#[derive(Clone)]
pub struct WithContext<P, C> {
    parser: P,
    context: C,
}

impl<P, C> WithContext<P, C> {
    pub fn new(parser: P, context: C) -> Self {
        Self { parser, context }
    }
}

impl<O, P, C: ToString> Parser<O> for WithContext<P, C>
where
    P: Parser<O>,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<O> {
        self.parser
            .parse(cursor, config)
            .map_err(|e| e.with_context(self.context.to_string()))
    }
}

/// Builds its parser on every call, for recursive grammars.
#[derive(Clone)]
pub struct Lazy<F> {
    f: F,
}

impl<F> Lazy<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<O, F, P> Parser<O> for Lazy<F>
where
    F: Fn() -> P,
    P: Parser<O>,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<O> {
        (self.f)().parse(cursor, config)
    }
}
