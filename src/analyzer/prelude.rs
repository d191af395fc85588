use super::combinators::*;
use super::core::{BoxedParser, FromFn, ParseResult, Parser, SharedParser};
use super::cursor::Cursor;
use crate::config::ParseConfig;
use std::fmt;
use std::sync::Arc;

pub fn ret<O: Clone>(value: O) -> Return<O> {
    Return::new(value)
}

pub fn fail(message: &str) -> Failure {
    Failure::new(message)
}

pub fn then<P1, P2, A>(first: P1, second: P2) -> Then<P1, P2, A>
where
    P1: Parser<A>,
{
    Then::new(first, second)
}

pub fn bind<P, F, A, Q>(first: P, next: F) -> Bind<P, F, A>
where
    P: Parser<A>,
    F: Fn(A) -> Q,
{
    Bind::new(first, next)
}

pub fn or<P1, P2>(first: P1, second: P2) -> Or<P1, P2> {
    Or::new(first, second)
}

pub fn many<P>(parser: P) -> Many<P> {
    Many::new(parser)
}

pub fn many1<P>(parser: P) -> Many1<P> {
    Many1::new(parser)
}

pub fn select<P, F, A, B>(parser: P, f: F) -> Select<P, F, A>
where
    P: Parser<A>,
    F: Fn(A) -> B,
{
    Select::new(parser, f)
}

pub fn select_many<P, F, G, A, B, C, Q>(
    parser: P,
    selector: F,
    projector: G,
) -> SelectMany<P, F, G, A, B, Q>
where
    P: Parser<A>,
    F: Fn(&A) -> Q,
    Q: Parser<B>,
    G: Fn(A, B) -> C,
{
    SelectMany::new(parser, selector, projector)
}

pub fn filter<P, F, O>(parser: P, predicate: F) -> Where<P, F>
where
    P: Parser<O>,
    F: Fn(&O) -> bool,
    O: fmt::Debug,
{
    Where::new(parser, predicate)
}

pub fn replace<P, A, V: Clone>(parser: P, value: V) -> Replace<P, A, V>
where
    P: Parser<A>,
{
    Replace::new(parser, value)
}

pub fn optional<P>(parser: P) -> Optional<P> {
    Optional::new(parser)
}

pub fn materialize<P>(parser: P) -> Materialize<P> {
    Materialize::new(parser)
}

pub fn between<L, P, R, LO, RO>(left: L, parser: P, right: R) -> Between<L, P, R, LO, RO>
where
    L: Parser<LO>,
    R: Parser<RO>,
{
    Between::new(left, parser, right)
}

pub fn with_context<P, C>(parser: P, c: C) -> WithContext<P, C>
where
    C: ToString,
{
    WithContext::new(parser, c)
}

pub fn lazy<F>(f: F) -> Lazy<F> {
    Lazy::new(f)
}

pub fn from_fn<O, F>(f: F) -> FromFn<F>
where
    F: Fn(&mut Cursor<'_>, &ParseConfig) -> ParseResult<O>,
{
    FromFn::new(f)
}

/// Method-chaining form of the combinators above.
///
/// ```
/// use tokenfold::analyzer::parsers::{END_ARRAY, I32, NULL_TOKEN, START_ARRAY};
/// use tokenfold::analyzer::prelude::*;
///
/// let parser = I32
///     .or(NULL_TOKEN.replace(0))
///     .many()
///     .between(START_ARRAY, END_ARRAY);
/// let result = tokenfold::parse_str(&parser, "[1, null, 3]", &Default::default());
/// assert_eq!(result.unwrap(), vec![1, 0, 3]);
/// ```
pub trait ParserExt<O>: Parser<O> + Sized {
    fn then<P2>(self, second: P2) -> Then<Self, P2, O> {
        Then::new(self, second)
    }

    fn bind<F, Q>(self, next: F) -> Bind<Self, F, O>
    where
        F: Fn(O) -> Q,
    {
        Bind::new(self, next)
    }

    fn or<P2>(self, second: P2) -> Or<Self, P2>
    where
        P2: Parser<O>,
    {
        Or::new(self, second)
    }

    fn many(self) -> Many<Self> {
        Many::new(self)
    }

    fn many1(self) -> Many1<Self> {
        Many1::new(self)
    }

    fn select<F, B>(self, f: F) -> Select<Self, F, O>
    where
        F: Fn(O) -> B,
    {
        Select::new(self, f)
    }

    fn select_many<F, G, Q, B, C>(self, selector: F, projector: G) -> SelectMany<Self, F, G, O, B, Q>
    where
        F: Fn(&O) -> Q,
        Q: Parser<B>,
        G: Fn(O, B) -> C,
    {
        SelectMany::new(self, selector, projector)
    }

    fn filter<F>(self, predicate: F) -> Where<Self, F>
    where
        F: Fn(&O) -> bool,
        O: fmt::Debug,
    {
        Where::new(self, predicate)
    }

    fn replace<V: Clone>(self, value: V) -> Replace<Self, O, V> {
        Replace::new(self, value)
    }

    fn optional(self) -> Optional<Self> {
        Optional::new(self)
    }

    fn materialize(self) -> Materialize<Self> {
        Materialize::new(self)
    }

    fn between<L, R, LO, RO>(self, left: L, right: R) -> Between<L, Self, R, LO, RO>
    where
        L: Parser<LO>,
        R: Parser<RO>,
    {
        Between::new(left, self, right)
    }

    fn context<C: ToString>(self, context: C) -> WithContext<Self, C> {
        WithContext::new(self, context)
    }

    fn boxed(self) -> BoxedParser<O>
    where
        Self: 'static,
    {
        Box::new(self)
    }

    fn shared(self) -> SharedParser<O>
    where
        Self: Send + Sync + 'static,
    {
        Arc::new(self)
    }
}

impl<O, P: Parser<O>> ParserExt<O> for P {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::cursor::TokenBuffer;
    use crate::analyzer::parsers::{END_ARRAY, I32, NULL_TOKEN, START_ARRAY, STRING};
    use crate::tokenizer::Token;
    use pretty_assertions::assert_eq;

    fn tokens(input: &str) -> TokenBuffer {
        crate::tokenize(input, &Default::default()).unwrap()
    }

    #[test]
    fn test_fluent_array() {
        let buffer = tokens("[1, null, 3]");
        let parser = I32
            .or(NULL_TOKEN.replace(0))
            .many()
            .between(START_ARRAY, END_ARRAY);

        let mut cursor = buffer.cursor();
        let result = parser.parse(&mut cursor, &ParseConfig::default());
        assert_eq!(result, Ok(vec![1, 0, 3]));
        assert!(cursor.is_finished());
    }

    #[test]
    fn test_free_functions_match_methods() {
        let buffer = TokenBuffer::from_tokens(vec![
            Token::String("n".to_string()),
            Token::Number("5".to_string()),
        ]);
        let free = select_many(STRING, |_: &String| I32, |s: String, n: i32| format!("{}={}", s, n));
        let fluent = STRING.select_many(|_: &String| I32, |s: String, n: i32| format!("{}={}", s, n));
        let config = ParseConfig::default();

        assert_eq!(free.parse(&mut buffer.cursor(), &config), Ok("n=5".to_string()));
        assert_eq!(fluent.parse(&mut buffer.cursor(), &config), Ok("n=5".to_string()));
    }

    #[test]
    fn test_recursive_with_lazy() {
        fn nested() -> BoxedParser<usize> {
            or(
                lazy(nested).between(START_ARRAY, END_ARRAY).select(|depth: usize| depth + 1),
                ret(0),
            )
            .boxed()
        }

        let buffer = tokens("[[[]]]");
        let mut cursor = buffer.cursor();
        assert_eq!(nested().parse(&mut cursor, &ParseConfig::default()), Ok(3));
    }

    #[test]
    fn test_boxed_selector_branches() {
        let pick = |flag: bool| -> BoxedParser<i32> {
            if flag {
                I32.boxed()
            } else {
                fail("disabled").boxed()
            }
        };
        let buffer = TokenBuffer::from_tokens(vec![Token::Number("1".to_string())]);
        let config = ParseConfig::default();
        assert_eq!(pick(true).parse(&mut buffer.cursor(), &config), Ok(1));
        assert!(pick(false).parse(&mut buffer.cursor(), &config).is_err());
    }

    #[test]
    fn test_filter_and_context() {
        let parser = filter(I32, |n: &i32| n % 2 == 0).context("even number");
        let buffer = TokenBuffer::from_tokens(vec![Token::Number("3".to_string())]);
        let error = parser
            .parse(&mut buffer.cursor(), &ParseConfig::default())
            .unwrap_err();
        assert_eq!(error.to_string(), "even number: Predicate rejected value 3 at position 1");
    }
}
