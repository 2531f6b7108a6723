//! End-to-end evaluation tests: one expression applied to one binding row.

use oxrdf::vocab::xsd;
use oxrdf::{Literal, NamedNode, Term};
use oxsdatatypes::{DateTime, DayTimeDuration};
use sparexpr::{
    BinaryOperator, Clock, Expression, ExpressionEvaluator, GeneratorFunction, UnaryFunction,
    VariableBindings,
};
use std::sync::Mutex;

const OWL_RATIONAL: &str = "http://www.w3.org/2002/07/owl#rational";
const WKT_LITERAL: &str = "http://www.opengis.net/ont/geosparql#wktLiteral";
const GML_LITERAL: &str = "http://www.opengis.net/ont/geosparql#gmlLiteral";

fn empty_row() -> VariableBindings {
    VariableBindings::new()
}

fn double(value: &str) -> Expression {
    Literal::new_typed_literal(value, xsd::DOUBLE).into()
}

fn rational(value: &str) -> Expression {
    Literal::new_typed_literal(value, NamedNode::new_unchecked(OWL_RATIONAL)).into()
}

fn date_time(value: &str) -> Expression {
    Literal::new_typed_literal(value, xsd::DATE_TIME).into()
}

fn wkt(value: &str) -> Expression {
    Literal::new_typed_literal(value, NamedNode::new_unchecked(WKT_LITERAL)).into()
}

fn unary(function: UnaryFunction, argument: impl Into<Expression>) -> Expression {
    Expression::unary(function, argument.into()).unwrap()
}

fn binary(
    operator: BinaryOperator,
    left: impl Into<Expression>,
    right: impl Into<Expression>,
) -> Expression {
    Expression::binary(operator, left.into(), right.into()).unwrap()
}

#[test]
fn math_promotes_rationals_and_emits_doubles() {
    let a = double("5.1");
    let b = rational("50/2");

    let ceil = unary(UnaryFunction::Ceil, binary(BinaryOperator::Add, a.clone(), b.clone()));
    assert_eq!(
        ceil.apply(&empty_row()),
        Some(Literal::new_typed_literal("31", xsd::DOUBLE).into())
    );

    let round = unary(
        UnaryFunction::Round,
        binary(BinaryOperator::Subtract, a, b),
    );
    assert_eq!(
        round.apply(&empty_row()),
        Some(Literal::new_typed_literal("-20", xsd::DOUBLE).into())
    );
}

#[test]
fn math_over_non_numeric_operands_abstains() {
    assert_eq!(
        unary(UnaryFunction::Ceil, Expression::from("five")).apply(&empty_row()),
        None
    );
    assert_eq!(
        unary(
            UnaryFunction::Ceil,
            Expression::variable("missing").unwrap()
        )
        .apply(&empty_row()),
        None
    );
    // One absent operand silences the whole tree
    assert_eq!(
        binary(
            BinaryOperator::Add,
            double("1"),
            Expression::variable("missing").unwrap()
        )
        .apply(&empty_row()),
        None
    );
}

#[test]
fn date_time_components_are_integers() {
    let instant = date_time("2022-01-15T10:30:00.000Z");

    for (function, expected) in [
        (UnaryFunction::Year, "2022"),
        (UnaryFunction::Month, "1"),
        (UnaryFunction::Day, "15"),
        (UnaryFunction::Hours, "10"),
        (UnaryFunction::Minutes, "30"),
        (UnaryFunction::Seconds, "0"),
    ] {
        assert_eq!(
            unary(function, instant.clone()).apply(&empty_row()),
            Some(Literal::new_typed_literal(expected, xsd::INTEGER).into()),
            "{function:?}"
        );
    }
}

#[test]
fn seconds_truncate_fractions() {
    assert_eq!(
        unary(UnaryFunction::Seconds, date_time("2022-01-15T10:30:05.75Z")).apply(&empty_row()),
        Some(Literal::new_typed_literal("5", xsd::INTEGER).into())
    );
}

#[test]
fn timezone_of_utc_is_the_zero_duration() {
    assert_eq!(
        unary(UnaryFunction::Timezone, date_time("2022-01-15T10:30:00.000Z"))
            .apply(&empty_row()),
        Some(Literal::new_typed_literal("PT0S", xsd::DURATION).into())
    );
    // No timezone, no value
    assert_eq!(
        unary(UnaryFunction::Timezone, date_time("2022-01-15T10:30:00")).apply(&empty_row()),
        None
    );
}

#[test]
fn date_functions_reject_other_datatypes() {
    assert_eq!(
        unary(UnaryFunction::Year, Expression::from("2022")).apply(&empty_row()),
        None
    );
    assert_eq!(
        unary(UnaryFunction::Year, double("2022")).apply(&empty_row()),
        None
    );
}

#[test]
fn geometry_dimension() {
    assert_eq!(
        unary(UnaryFunction::Dimension, wkt("POINT (1 2)")).apply(&empty_row()),
        Some(Literal::new_typed_literal("0", xsd::INTEGER).into())
    );
    assert_eq!(
        unary(UnaryFunction::Dimension, wkt("LINESTRING (0 0, 2 3)")).apply(&empty_row()),
        Some(Literal::new_typed_literal("1", xsd::INTEGER).into())
    );
}

#[test]
fn envelope_of_a_collection_covers_all_members() {
    use geo::{BoundingRect, Geometry, coord};
    use wkt::TryFromWkt;

    let expression = unary(
        UnaryFunction::Envelope,
        wkt("GEOMETRYCOLLECTION (LINESTRING (0 0, 2 3), POINT (5 1))"),
    );
    let Some(Term::Literal(literal)) = expression.apply(&empty_row()) else {
        panic!("the envelope is not a literal");
    };
    assert_eq!(literal.datatype().as_str(), WKT_LITERAL);

    let envelope = Geometry::try_from_wkt_str(literal.value()).unwrap();
    let Geometry::Polygon(polygon) = &envelope else {
        panic!("{envelope:?} is not a polygon");
    };
    let ring = &polygon.exterior().0;
    assert_eq!(ring.len(), 5, "the ring must be closed over 5 coordinates");
    assert_eq!(ring.first(), ring.last());
    assert_eq!(
        envelope.bounding_rect().unwrap(),
        geo::Rect::new(coord! { x: 0., y: 0. }, coord! { x: 5., y: 3. })
    );
}

#[test]
fn gml_operands_are_never_coerced() {
    let gml: Expression = Literal::new_typed_literal(
        "<gml:Point><gml:pos>1 2</gml:pos></gml:Point>",
        NamedNode::new_unchecked(GML_LITERAL),
    )
    .into();
    assert_eq!(unary(UnaryFunction::Dimension, gml.clone()).apply(&empty_row()), None);
    assert_eq!(unary(UnaryFunction::Envelope, gml).apply(&empty_row()), None);
}

#[test]
fn empty_geometries_keep_their_shape() {
    assert_eq!(
        unary(UnaryFunction::IsEmpty, wkt("LINESTRING EMPTY")).apply(&empty_row()),
        Some(Literal::new_typed_literal("true", xsd::BOOLEAN).into())
    );
    let Some(Term::Literal(envelope)) =
        unary(UnaryFunction::Envelope, wkt("LINESTRING EMPTY")).apply(&empty_row())
    else {
        panic!("the envelope is not a literal");
    };
    assert_eq!(envelope.value().trim(), "LINESTRING EMPTY");
}

#[test]
fn geometry_type_is_a_simple_features_class() {
    assert_eq!(
        unary(UnaryFunction::GeometryType, wkt("POINT (1 2)")).apply(&empty_row()),
        Some(NamedNode::new_unchecked("http://www.opengis.net/ont/sf#Point").into())
    );
}

#[test]
fn generators_never_repeat() {
    let row = empty_row();
    for function in [
        GeneratorFunction::Now,
        GeneratorFunction::Uuid,
        GeneratorFunction::StrUuid,
        GeneratorFunction::BNode,
        GeneratorFunction::Rand,
    ] {
        let expression = Expression::Generator(function);
        let first = expression.apply(&row).unwrap();
        let second = expression.apply(&row).unwrap();
        assert_ne!(first, second, "{function:?} repeated {first}");
    }
}

#[test]
fn uuid_generators_have_the_right_shape() {
    let row = empty_row();
    let Some(Term::NamedNode(uuid)) =
        Expression::Generator(GeneratorFunction::Uuid).apply(&row)
    else {
        panic!("UUID() must mint a resource");
    };
    assert!(uuid.as_str().starts_with("urn:uuid:"), "{uuid}");

    let Some(Term::Literal(str_uuid)) =
        Expression::Generator(GeneratorFunction::StrUuid).apply(&row)
    else {
        panic!("STRUUID() must mint a literal");
    };
    assert_eq!(str_uuid.value().len(), 36);

    assert!(matches!(
        Expression::Generator(GeneratorFunction::BNode).apply(&row),
        Some(Term::BlankNode(_))
    ));
}

struct SteppingClock {
    seconds: Mutex<i64>,
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime {
        let mut seconds = self.seconds.lock().unwrap();
        *seconds += 1;
        "2024-01-01T00:00:00Z"
            .parse::<DateTime>()
            .unwrap()
            .checked_add_day_time_duration(DayTimeDuration::new(*seconds))
            .unwrap()
    }
}

#[test]
fn the_time_source_is_injectable() {
    let evaluator = ExpressionEvaluator::with_clock(SteppingClock {
        seconds: Mutex::new(0),
    });
    let now = Expression::Generator(GeneratorFunction::Now);
    assert_eq!(
        evaluator.evaluate(&now, &empty_row()),
        Some(Literal::new_typed_literal("2024-01-01T00:00:01Z", xsd::DATE_TIME).into())
    );
    assert_eq!(
        evaluator.evaluate(&now, &empty_row()),
        Some(Literal::new_typed_literal("2024-01-01T00:00:02Z", xsd::DATE_TIME).into())
    );
}

#[test]
fn variables_round_trip_through_the_row() {
    let row = VariableBindings::new().with(
        "?A",
        "\"5.1\"^^<http://www.w3.org/2001/XMLSchema#double>".to_owned(),
    );
    assert_eq!(
        Expression::variable("?A").unwrap().apply(&row),
        Some(Literal::new_typed_literal("5.1", xsd::DOUBLE).into())
    );
    // Names are case-sensitive
    assert_eq!(Expression::variable("?a").unwrap().apply(&row), None);
}

#[test]
fn constants_ignore_the_row() {
    let row = VariableBindings::new().with("?A", "1".to_owned());
    let term = Term::from(NamedNode::new_unchecked("http://example.com/a"));
    assert_eq!(
        Expression::constant(term.clone()).apply(&row),
        Some(term)
    );
}

#[test]
fn comparisons_stay_boolean() {
    assert_eq!(
        binary(BinaryOperator::Greater, double("5.1"), rational("50/2")).apply(&empty_row()),
        Some(Literal::new_typed_literal("false", xsd::BOOLEAN).into())
    );
    assert_eq!(
        binary(BinaryOperator::LessOrEqual, double("5.1"), rational("50/2"))
            .apply(&empty_row()),
        Some(Literal::new_typed_literal("true", xsd::BOOLEAN).into())
    );
    // Cross-space comparison abstains
    assert_eq!(
        binary(BinaryOperator::Less, double("5.1"), Expression::from("five"))
            .apply(&empty_row()),
        None
    );
}

#[test]
fn connectives_propagate_absence_strictly() {
    let unbound = Expression::variable("missing").unwrap();
    assert_eq!(
        binary(BinaryOperator::Or, Expression::from(true), unbound.clone())
            .apply(&empty_row()),
        None
    );
    assert_eq!(
        binary(BinaryOperator::And, Expression::from(false), unbound).apply(&empty_row()),
        None
    );
    assert_eq!(
        binary(BinaryOperator::Or, Expression::from(false), Expression::from(true))
            .apply(&empty_row()),
        Some(Literal::new_typed_literal("true", xsd::BOOLEAN).into())
    );
}

#[test]
fn string_functions_keep_language_tags() {
    let chat: Expression = Literal::new_language_tagged_literal_unchecked("chat", "fr").into();
    assert_eq!(
        unary(UnaryFunction::UCase, chat.clone()).apply(&empty_row()),
        Some(Literal::new_language_tagged_literal_unchecked("CHAT", "fr").into())
    );
    assert_eq!(
        unary(UnaryFunction::StrLen, chat.clone()).apply(&empty_row()),
        Some(Literal::new_typed_literal("4", xsd::INTEGER).into())
    );
    // Incompatible language tags make the arguments incomparable
    let maison: Expression = Literal::new_language_tagged_literal_unchecked("maison", "en").into();
    assert_eq!(
        binary(BinaryOperator::Contains, chat, maison).apply(&empty_row()),
        None
    );
}

#[test]
fn hashes_are_lowercase_hex() {
    assert_eq!(
        unary(UnaryFunction::Md5, Expression::from("abc")).apply(&empty_row()),
        Some(Literal::new_simple_literal("900150983cd24fb0d6963f7d28e17f72").into())
    );
}

#[test]
fn group_is_transparent_for_evaluation() {
    let sum = binary(BinaryOperator::Add, double("1"), double("2"));
    assert_eq!(
        Expression::group(sum).unwrap().apply(&empty_row()),
        Some(Literal::new_typed_literal("3", xsd::DOUBLE).into())
    );
}
