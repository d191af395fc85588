//! # Object Aggregation Engine
//!
//! Builds one aggregate value out of a JSON object without a hand-written
//! loop. The caller supplies a *selector*: a function from a property name to
//! a parser that reads that property's value and yields an [`Updater`]. The
//! engine reads every property in textual order, collects the updaters and
//! folds them over an initial value left to right.
//!
//! ```
//! use tokenfold::analyzer::object::{parse_object, unknown_property, UpdaterExt};
//! use tokenfold::analyzer::parsers::{I32, STRING};
//! use tokenfold::analyzer::prelude::*;
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct User {
//!     name: String,
//!     age: i32,
//! }
//!
//! let parser = parse_object(
//!     |name: &str| match name {
//!         "name" => STRING.assign(|user: &mut User, v| user.name = v).boxed(),
//!         "age" => I32.assign(|user: &mut User, v| user.age = v).boxed(),
//!         other => unknown_property(other),
//!     },
//!     User::default(),
//! );
//!
//! let user = tokenfold::parse_str(&parser, r#"{"name": "ada", "age": 36}"#, &Default::default());
//! assert_eq!(user.unwrap(), User { name: "ada".into(), age: 36 });
//! ```
//!
//! A property whose parser fails aborts the whole object with
//! [`ParseError::Property`] naming it. That includes names the selector does
//! not handle, when it answers with [`unknown_property`]. To accept and drop
//! a property instead, answer with [`ignore_property`], which still consumes
//! its value.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::combinators::{Between, Bind, Failure, Many, Materialize, Select};
use super::core::{BoxedParser, ParseError, ParseResult, Parser};
use super::cursor::Cursor;
use super::parsers::{skip_value, ParseToken, END_OBJECT, EMPTY_OBJECT, PROPERTY_NAME, START_OBJECT};
use crate::config::ParseConfig;
use crate::tokenizer::TokenKind;

/// A pending change to an aggregate of type `T`.
pub struct Updater<T>(Box<dyn FnOnce(T) -> T>);

impl<T: 'static> Updater<T> {
    pub fn new(f: impl FnOnce(T) -> T + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn identity() -> Self {
        Self::new(|value| value)
    }

    pub fn apply(self, value: T) -> T {
        (self.0)(value)
    }

    /// Applies `self`, then `next`.
    pub fn and_then(self, next: Updater<T>) -> Self {
        Self::new(move |value| next.apply(self.apply(value)))
    }

    /// Applies every updater in order.
    pub fn sequence(updaters: Vec<Updater<T>>) -> Self {
        Self::new(move |initial| {
            updaters
                .into_iter()
                .fold(initial, |value, updater| updater.apply(value))
        })
    }

    /// Lifts a child updater to work on a parent value, using `cast` to
    /// obtain the child before updating it.
    pub fn lift<P: 'static>(self, cast: impl FnOnce(P) -> T + 'static) -> Updater<P>
    where
        T: Into<P>,
    {
        Updater::new(move |parent| self.apply(cast(parent)).into())
    }
}

impl<T> fmt::Debug for Updater<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Updater")
    }
}

/// Turns a value parser into an updater parser.
#[derive(Clone)]
pub struct Update<P, F, V> {
    parser: P,
    f: Arc<F>,
    _phantom: PhantomData<fn() -> V>,
}

impl<P, F, V> Update<P, F, V> {
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f: Arc::new(f),
            _phantom: PhantomData,
        }
    }
}

impl<T, V, P, F> Parser<Updater<T>> for Update<P, F, V>
where
    P: Parser<V>,
    F: Fn(V, T) -> T + 'static,
    T: 'static,
    V: 'static,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<Updater<T>> {
        let value = self.parser.parse(cursor, config)?;
        let f = Arc::clone(&self.f);
        Ok(Updater::new(move |target| (*f)(value, target)))
    }
}

fn keep<V, T: 'static>(_: V) -> Updater<T> {
    Updater::identity()
}

pub trait UpdaterExt<V>: Parser<V> + Sized {
    /// Combines the parsed value with the aggregate.
    fn updater<T, F>(self, f: F) -> Update<Self, F, V>
    where
        F: Fn(V, T) -> T + 'static,
        T: 'static,
        V: 'static,
    {
        Update::new(self, f)
    }

    /// Writes the parsed value into the aggregate in place.
    fn assign<T, F>(self, f: F) -> impl Parser<Updater<T>>
    where
        F: Fn(&mut T, V) + 'static,
        T: 'static,
        V: 'static,
    {
        self.updater(move |value, mut target: T| {
            f(&mut target, value);
            target
        })
    }

    /// Ignores the parsed value and applies `f`.
    fn replace_with<T, F>(self, f: F) -> impl Parser<Updater<T>>
    where
        F: Fn(T) -> T + 'static,
        T: 'static,
        V: 'static,
    {
        self.updater(move |_: V, target| f(target))
    }

    /// Parses the value and leaves the aggregate unchanged.
    fn skip_update<T: 'static>(self) -> Select<Self, fn(V) -> Updater<T>, V> {
        Select::new(self, keep::<V, T>)
    }
}

impl<V, P: Parser<V>> UpdaterExt<V> for P {}

/// One `name: value` step. A failure of the value parser is captured so
/// that repetition stops cleanly while the error is kept.
struct PropertyEntry<'s, F> {
    selector: &'s F,
}

impl<T, F> Parser<ParseResult<Updater<T>>> for PropertyEntry<'_, F>
where
    F: Fn(&str) -> BoxedParser<Updater<T>>,
{
    fn parse(
        &self,
        cursor: &mut Cursor<'_>,
        config: &ParseConfig,
    ) -> ParseResult<ParseResult<Updater<T>>> {
        let name = PROPERTY_NAME.parse(cursor, config)?;
        let outcome = Materialize::new((self.selector)(&name)).parse(cursor, config)?;
        Ok(outcome.map_err(|inner| {
            tracing::debug!(
                target: "parser::object",
                property = %name,
                error = %inner,
                "property failed"
            );
            ParseError::Property {
                name,
                inner: Box::new(inner),
            }
        }))
    }
}

/// Parses an object into a single [`Updater`] that applies its properties
/// in textual order.
pub struct ObjectUpdater<F, T> {
    selector: F,
    started: bool,
    _phantom: PhantomData<fn() -> T>,
}

impl<F, T> ObjectUpdater<F, T> {
    fn new(selector: F, started: bool) -> Self {
        Self {
            selector,
            started,
            _phantom: PhantomData,
        }
    }
}

impl<T, F> Parser<Updater<T>> for ObjectUpdater<F, T>
where
    F: Fn(&str) -> BoxedParser<Updater<T>>,
    T: 'static,
{
    fn parse(&self, cursor: &mut Cursor<'_>, config: &ParseConfig) -> ParseResult<Updater<T>> {
        if !self.started {
            START_OBJECT.parse(cursor, config)?;
        }
        let entries = Many::new(PropertyEntry {
            selector: &self.selector,
        })
        .parse(cursor, config)?;
        let updaters = entries.into_iter().collect::<ParseResult<Vec<_>>>()?;
        END_OBJECT.parse(cursor, config)?;

        tracing::trace!(
            target: "parser::object",
            properties = updaters.len(),
            position = cursor.position(),
            "object collected"
        );
        Ok(Updater::sequence(updaters))
    }
}

pub fn parse_object_updater<T, F>(selector: F) -> ObjectUpdater<F, T>
where
    F: Fn(&str) -> BoxedParser<Updater<T>>,
    T: 'static,
{
    ObjectUpdater::new(selector, false)
}

/// Like [`parse_object_updater`], for an object whose `{` has already been
/// consumed.
pub fn parse_started_object_updater<T, F>(selector: F) -> ObjectUpdater<F, T>
where
    F: Fn(&str) -> BoxedParser<Updater<T>>,
    T: 'static,
{
    ObjectUpdater::new(selector, true)
}

pub fn parse_object<T, F>(selector: F, initial: T) -> impl Parser<T>
where
    F: Fn(&str) -> BoxedParser<Updater<T>>,
    T: Clone + 'static,
{
    Select::new(
        parse_object_updater(selector),
        move |updater: Updater<T>| updater.apply(initial.clone()),
    )
}

pub fn parse_object_default<T, F>(selector: F) -> impl Parser<T>
where
    F: Fn(&str) -> BoxedParser<Updater<T>>,
    T: Default + 'static,
{
    Select::new(parse_object_updater(selector), |updater: Updater<T>| {
        updater.apply(T::default())
    })
}

pub fn parse_started_object<T, F>(selector: F, initial: T) -> impl Parser<T>
where
    F: Fn(&str) -> BoxedParser<Updater<T>>,
    T: Clone + 'static,
{
    Select::new(
        parse_started_object_updater(selector),
        move |updater: Updater<T>| updater.apply(initial.clone()),
    )
}

/// Parses an object with a child selector and yields a parent updater.
///
/// `cast` turns the parent value into the child before the child's
/// properties are applied; the updated child converts back into the parent.
pub fn parse_sub_type<TParent, TChild, F, C>(selector: F, cast: C) -> impl Parser<Updater<TParent>>
where
    F: Fn(&str) -> BoxedParser<Updater<TChild>>,
    C: Fn(TParent) -> TChild + 'static,
    TChild: Into<TParent> + 'static,
    TParent: 'static,
{
    let cast = Arc::new(cast);
    Select::new(
        parse_object_updater(selector),
        move |updater: Updater<TChild>| {
            let cast = Arc::clone(&cast);
            updater.lift(move |parent| (*cast)(parent))
        },
    )
}

/// `{}` as a parent updater that only applies `cast`.
pub fn parse_empty_sub_type<T, C>(cast: C) -> impl Parser<Updater<T>>
where
    C: Fn(T) -> T + 'static,
    T: 'static,
{
    EMPTY_OBJECT.replace_with(cast)
}

/// Runs a parser that produces a selector, then parses an object with it.
pub fn parse_selected_object<T, P, F>(selector_parser: P) -> impl Parser<Updater<T>>
where
    P: Parser<F>,
    F: Fn(&str) -> BoxedParser<Updater<T>>,
    T: 'static,
{
    Bind::new(selector_parser, parse_object_updater::<T, F>)
}

/// `parser` between `{` and `}`.
pub fn object_of<P>(parser: P) -> Between<ParseToken, P, ParseToken, TokenKind, TokenKind> {
    Between::new(START_OBJECT, parser, END_OBJECT)
}

/// The selector answer for a property name that has no handler.
pub fn unknown_property<T>(name: &str) -> BoxedParser<Updater<T>>
where
    T: 'static,
{
    Box::new(Failure::with_error(ParseError::UnknownProperty(
        name.to_string(),
    )))
}

/// The selector answer for a property that is read and discarded.
pub fn ignore_property<T>() -> BoxedParser<Updater<T>>
where
    T: 'static,
{
    Box::new(skip_value().skip_update::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::cursor::TokenBuffer;
    use crate::analyzer::parsers::{BOOL, I32, STRING};
    use crate::analyzer::prelude::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Data {
        foo: String,
        bar: String,
    }

    fn data_selector(name: &str) -> BoxedParser<Updater<Data>> {
        match name {
            "foo" => STRING
                .updater(|foo: String, data: Data| Data { foo, ..data })
                .boxed(),
            "bar" => STRING.assign(|data: &mut Data, bar| data.bar = bar).boxed(),
            other => unknown_property(other),
        }
    }

    fn run<O>(parser: impl Parser<O>, input: &str) -> ParseResult<O> {
        let buffer = crate::tokenize(input, &Default::default()).unwrap();
        let mut cursor = buffer.cursor();
        parser.parse(&mut cursor, &ParseConfig::default())
    }

    #[test]
    fn test_updater_composition() {
        let add = Updater::new(|n: i32| n + 1);
        let double = Updater::new(|n: i32| n * 2);
        assert_eq!(add.and_then(double).apply(3), 8);
        assert_eq!(Updater::<i32>::identity().apply(3), 3);
        assert_eq!(
            Updater::sequence(vec![Updater::new(|n: i32| n * 2), Updater::new(|n| n + 1)]).apply(3),
            7
        );
    }

    #[test]
    fn test_fold_in_textual_order() {
        let parser = parse_object(data_selector, Data::default());
        assert_eq!(
            run(parser, r#"{"foo": "a", "bar": "b"}"#),
            Ok(Data {
                foo: "a".to_string(),
                bar: "b".to_string(),
            })
        );
    }

    #[test]
    fn test_later_property_wins() {
        let parser = parse_object_default(data_selector);
        assert_eq!(
            run(parser, r#"{"foo": "a", "foo": "z"}"#).map(|d| d.foo),
            Ok("z".to_string())
        );
    }

    #[test]
    fn test_empty_object_keeps_initial() {
        let initial = Data {
            foo: "keep".to_string(),
            bar: "me".to_string(),
        };
        let parser = parse_object(data_selector, initial.clone());
        assert_eq!(run(parser, "{}"), Ok(initial));
    }

    #[test]
    fn test_unknown_property_names_property() {
        let parser = parse_object(data_selector, Data::default());
        let error = run(parser, r#"{"foo": "a", "zzz": "c"}"#).unwrap_err();
        assert_eq!(error.property(), Some("zzz"));
        assert_eq!(
            error,
            ParseError::Property {
                name: "zzz".to_string(),
                inner: Box::new(ParseError::UnknownProperty("zzz".to_string())),
            }
        );
        assert!(error.to_string().contains("zzz"));
    }

    #[test]
    fn test_value_failure_names_property() {
        let parser = parse_object(data_selector, Data::default());
        let error = run(parser, r#"{"foo": 1}"#).unwrap_err();
        match error {
            ParseError::Property { name, inner } => {
                assert_eq!(name, "foo");
                assert!(matches!(*inner, ParseError::TokenMismatch { .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_ignore_property() {
        let parser = parse_object_default(|name: &str| match name {
            "foo" => data_selector(name),
            _ => ignore_property(),
        });
        assert_eq!(
            run(parser, r#"{"x": {"deep": [1, 2]}, "foo": "a", "y": null}"#).map(|d| d.foo),
            Ok("a".to_string())
        );
    }

    #[test]
    fn test_started_object() {
        let buffer = crate::tokenize(r#"{"bar": "b"}"#, &Default::default()).unwrap();
        let mut cursor = buffer.cursor();
        cursor.advance();
        let parser = parse_started_object(data_selector, Data::default());
        assert_eq!(
            parser.parse(&mut cursor, &ParseConfig::default()).map(|d| d.bar),
            Ok("b".to_string())
        );
        assert!(cursor.is_finished());
    }

    #[test]
    fn test_missing_end_fails() {
        let buffer = TokenBuffer::from_tokens(vec![
            crate::tokenizer::Token::ObjectStart,
            crate::tokenizer::Token::PropertyName("foo".to_string()),
            crate::tokenizer::Token::String("a".to_string()),
        ]);
        let parser = parse_object_default(data_selector);
        assert!(matches!(
            parser.parse(&mut buffer.cursor(), &ParseConfig::default()),
            Err(ParseError::EndOfStream { .. })
        ));
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Shape {
        Unknown { id: i32 },
        Circle(Circle),
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Circle {
        id: i32,
        radius: i32,
        filled: bool,
    }

    impl From<Circle> for Shape {
        fn from(circle: Circle) -> Self {
            Shape::Circle(circle)
        }
    }

    fn to_circle(shape: Shape) -> Circle {
        match shape {
            Shape::Circle(circle) => circle,
            Shape::Unknown { id } => Circle {
                id,
                ..Circle::default()
            },
        }
    }

    #[test]
    fn test_sub_type() {
        let parser = parse_sub_type(
            |name: &str| match name {
                "radius" => I32.assign(|c: &mut Circle, r| c.radius = r).boxed(),
                "filled" => BOOL.assign(|c: &mut Circle, f| c.filled = f).boxed(),
                other => unknown_property(other),
            },
            to_circle,
        );
        let updater = run(parser, r#"{"radius": 4, "filled": true}"#).unwrap();
        assert_eq!(
            updater.apply(Shape::Unknown { id: 9 }),
            Shape::Circle(Circle {
                id: 9,
                radius: 4,
                filled: true,
            })
        );
    }

    #[test]
    fn test_empty_sub_type() {
        let parser = parse_empty_sub_type(|shape: Shape| Shape::from(to_circle(shape)));
        let updater = run(parser, "{}").unwrap();
        assert_eq!(
            updater.apply(Shape::Unknown { id: 2 }),
            Shape::Circle(Circle {
                id: 2,
                ..Circle::default()
            })
        );
        assert!(run(parse_empty_sub_type(|s: Shape| s), r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn test_selected_object() {
        let selector_parser = STRING.select(|prefix: String| {
            move |name: &str| -> BoxedParser<Updater<Data>> {
                if name.starts_with(prefix.as_str()) {
                    data_selector(&name[prefix.len()..])
                } else {
                    unknown_property(name)
                }
            }
        });
        let parser = parse_selected_object(selector_parser);

        let buffer = TokenBuffer::from_tokens(vec![
            crate::tokenizer::Token::String("x_".to_string()),
            crate::tokenizer::Token::ObjectStart,
            crate::tokenizer::Token::PropertyName("x_foo".to_string()),
            crate::tokenizer::Token::String("a".to_string()),
            crate::tokenizer::Token::ObjectEnd,
        ]);
        let updater = parser
            .parse(&mut buffer.cursor(), &ParseConfig::default())
            .unwrap();
        assert_eq!(updater.apply(Data::default()).foo, "a");
    }

    #[test]
    fn test_object_of() {
        let parser = object_of(crate::analyzer::parsers::parse_string_property("kind"));
        assert_eq!(
            run(parser, r#"{"kind": "circle"}"#),
            Ok(("kind".to_string(), "circle".to_string()))
        );
    }

    #[test]
    fn test_skip_and_replace_updates() {
        let parser = parse_object(
            |name: &str| match name {
                "count" => I32.skip_update().boxed(),
                "reset" => BOOL.replace_with(|_: Data| Data::default()).boxed(),
                other => unknown_property(other),
            },
            Data {
                foo: "x".to_string(),
                bar: String::new(),
            },
        );
        assert_eq!(run(&parser, r#"{"count": 3}"#).map(|d| d.foo), Ok("x".to_string()));
        assert_eq!(run(&parser, r#"{"reset": true}"#).map(|d| d.foo), Ok(String::new()));
    }
}
