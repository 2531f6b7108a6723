use crate::vocab::owl;
use oxrdf::vocab::{rdf, xsd};
use oxrdf::{BlankNode, Literal, NamedNode, NamedNodeRef, Term};
use oxsdatatypes::{
    Boolean, Date, DateTime, DayTimeDuration, Decimal, Double, Duration, Float, Integer, Time,
};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A term as understood by the expression evaluator.
///
/// Literals whose datatype denotes a known value space are parsed into that
/// value space; everything else keeps its lexical form in
/// [`OtherTypedLiteral`](ExpressionTerm::OtherTypedLiteral).
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionTerm {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    StringLiteral(String),
    LangStringLiteral { value: String, language: String },
    BooleanLiteral(Boolean),
    IntegerLiteral(Integer),
    DecimalLiteral(Decimal),
    FloatLiteral(Float),
    DoubleLiteral(Double),
    RationalLiteral(Rational),
    DateTimeLiteral(DateTime),
    DateLiteral(Date),
    TimeLiteral(Time),
    DurationLiteral(Duration),
    DayTimeDurationLiteral(DayTimeDuration),
    OtherTypedLiteral { value: String, datatype: NamedNode },
}

impl ExpressionTerm {
    /// Computes the term [effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv).
    pub(crate) fn effective_boolean_value(&self) -> Option<bool> {
        match self {
            Self::BooleanLiteral(value) => Some((*value).into()),
            Self::StringLiteral(value) => Some(!value.is_empty()),
            Self::IntegerLiteral(value) => Some(Boolean::from(*value).into()),
            Self::DecimalLiteral(value) => Some(Boolean::from(*value).into()),
            Self::FloatLiteral(value) => Some(Boolean::from(*value).into()),
            Self::DoubleLiteral(value) => Some(Boolean::from(*value).into()),
            Self::RationalLiteral(value) => Some(value.numerator() != 0),
            _ => None,
        }
    }

    pub(crate) fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::IntegerLiteral(_)
                | Self::DecimalLiteral(_)
                | Self::FloatLiteral(_)
                | Self::DoubleLiteral(_)
                | Self::RationalLiteral(_)
        )
    }

    /// Promotes a numeric value to the `xsd:double` value space.
    pub(crate) fn as_double(&self) -> Option<Double> {
        Some(match self {
            Self::IntegerLiteral(value) => (*value).into(),
            Self::DecimalLiteral(value) => (*value).into(),
            Self::FloatLiteral(value) => (*value).into(),
            Self::DoubleLiteral(value) => *value,
            Self::RationalLiteral(value) => value.as_double(),
            _ => return None,
        })
    }

    /// The datatype of the literal, or `None` for resources and blank nodes.
    pub(crate) fn datatype(&self) -> Option<NamedNodeRef<'_>> {
        Some(match self {
            Self::NamedNode(_) | Self::BlankNode(_) => return None,
            Self::StringLiteral(_) => xsd::STRING,
            Self::LangStringLiteral { .. } => rdf::LANG_STRING,
            Self::BooleanLiteral(_) => xsd::BOOLEAN,
            Self::IntegerLiteral(_) => xsd::INTEGER,
            Self::DecimalLiteral(_) => xsd::DECIMAL,
            Self::FloatLiteral(_) => xsd::FLOAT,
            Self::DoubleLiteral(_) => xsd::DOUBLE,
            Self::RationalLiteral(_) => owl::RATIONAL,
            Self::DateTimeLiteral(_) => xsd::DATE_TIME,
            Self::DateLiteral(_) => xsd::DATE,
            Self::TimeLiteral(_) => xsd::TIME,
            Self::DurationLiteral(_) => xsd::DURATION,
            Self::DayTimeDurationLiteral(_) => xsd::DAY_TIME_DURATION,
            Self::OtherTypedLiteral { datatype, .. } => datatype.as_ref(),
        })
    }
}

impl From<Term> for ExpressionTerm {
    #[inline]
    fn from(term: Term) -> Self {
        match term {
            Term::NamedNode(t) => Self::NamedNode(t),
            Term::BlankNode(t) => Self::BlankNode(t),
            Term::Literal(t) => {
                if let Some(language) = t.language() {
                    Self::LangStringLiteral {
                        value: t.value().into(),
                        language: language.into(),
                    }
                } else {
                    parse_typed_literal(t.value(), t.datatype().as_str()).unwrap_or_else(|| {
                        Self::OtherTypedLiteral {
                            value: t.value().into(),
                            datatype: t.datatype().into_owned(),
                        }
                    })
                }
            }
        }
    }
}

impl From<ExpressionTerm> for Term {
    #[inline]
    fn from(term: ExpressionTerm) -> Self {
        match term {
            ExpressionTerm::NamedNode(t) => t.into(),
            ExpressionTerm::BlankNode(t) => t.into(),
            ExpressionTerm::StringLiteral(value) => Literal::new_simple_literal(value).into(),
            ExpressionTerm::LangStringLiteral { value, language } => {
                Literal::new_language_tagged_literal_unchecked(value, language).into()
            }
            ExpressionTerm::BooleanLiteral(value) => Literal::from(value).into(),
            ExpressionTerm::IntegerLiteral(value) => Literal::from(value).into(),
            ExpressionTerm::DecimalLiteral(value) => Literal::from(value).into(),
            ExpressionTerm::FloatLiteral(value) => Literal::from(value).into(),
            ExpressionTerm::DoubleLiteral(value) => Literal::from(value).into(),
            ExpressionTerm::RationalLiteral(value) => {
                Literal::new_typed_literal(value.to_string(), owl::RATIONAL).into()
            }
            ExpressionTerm::DateTimeLiteral(value) => Literal::from(value).into(),
            ExpressionTerm::DateLiteral(value) => Literal::from(value).into(),
            ExpressionTerm::TimeLiteral(value) => Literal::from(value).into(),
            ExpressionTerm::DurationLiteral(value) => Literal::from(value).into(),
            ExpressionTerm::DayTimeDurationLiteral(value) => Literal::from(value).into(),
            ExpressionTerm::OtherTypedLiteral { value, datatype } => {
                Literal::new_typed_literal(value, datatype).into()
            }
        }
    }
}

impl From<bool> for ExpressionTerm {
    #[inline]
    fn from(value: bool) -> Self {
        Self::BooleanLiteral(value.into())
    }
}

fn parse_typed_literal(value: &str, datatype: &str) -> Option<ExpressionTerm> {
    Some(match datatype {
        "http://www.w3.org/2001/XMLSchema#boolean" => {
            ExpressionTerm::BooleanLiteral(value.parse().ok()?)
        }
        "http://www.w3.org/2001/XMLSchema#string" => ExpressionTerm::StringLiteral(value.into()),
        "http://www.w3.org/2001/XMLSchema#float" => {
            ExpressionTerm::FloatLiteral(value.parse().ok()?)
        }
        "http://www.w3.org/2001/XMLSchema#double" => {
            ExpressionTerm::DoubleLiteral(value.parse().ok()?)
        }
        "http://www.w3.org/2001/XMLSchema#decimal" => {
            ExpressionTerm::DecimalLiteral(value.parse().ok()?)
        }
        "http://www.w3.org/2001/XMLSchema#integer"
        | "http://www.w3.org/2001/XMLSchema#byte"
        | "http://www.w3.org/2001/XMLSchema#short"
        | "http://www.w3.org/2001/XMLSchema#int"
        | "http://www.w3.org/2001/XMLSchema#long"
        | "http://www.w3.org/2001/XMLSchema#unsignedByte"
        | "http://www.w3.org/2001/XMLSchema#unsignedShort"
        | "http://www.w3.org/2001/XMLSchema#unsignedInt"
        | "http://www.w3.org/2001/XMLSchema#unsignedLong"
        | "http://www.w3.org/2001/XMLSchema#positiveInteger"
        | "http://www.w3.org/2001/XMLSchema#negativeInteger"
        | "http://www.w3.org/2001/XMLSchema#nonPositiveInteger"
        | "http://www.w3.org/2001/XMLSchema#nonNegativeInteger" => {
            ExpressionTerm::IntegerLiteral(value.parse().ok()?)
        }
        "http://www.w3.org/2002/07/owl#rational" => {
            ExpressionTerm::RationalLiteral(value.parse().ok()?)
        }
        "http://www.w3.org/2001/XMLSchema#dateTime"
        | "http://www.w3.org/2001/XMLSchema#dateTimeStamp" => {
            ExpressionTerm::DateTimeLiteral(value.parse().ok()?)
        }
        "http://www.w3.org/2001/XMLSchema#date" => ExpressionTerm::DateLiteral(value.parse().ok()?),
        "http://www.w3.org/2001/XMLSchema#time" => ExpressionTerm::TimeLiteral(value.parse().ok()?),
        "http://www.w3.org/2001/XMLSchema#duration"
        | "http://www.w3.org/2001/XMLSchema#yearMonthDuration" => {
            ExpressionTerm::DurationLiteral(value.parse().ok()?)
        }
        "http://www.w3.org/2001/XMLSchema#dayTimeDuration" => {
            ExpressionTerm::DayTimeDurationLiteral(value.parse().ok()?)
        }
        _ => return None,
    })
}

/// Parses the lexical string stored in a binding row into a term.
///
/// IRIs, blank nodes and typed or language-tagged literals use the N-Triples
/// syntax; any other string denotes a plain literal.
pub(crate) fn parse_binding_term(lexical: &str) -> Option<Term> {
    let candidate = lexical.trim();
    if candidate.starts_with('<') || candidate.starts_with('"') || candidate.starts_with("_:") {
        Term::from_str(candidate).ok()
    } else {
        Some(Literal::new_simple_literal(lexical).into())
    }
}

/// Equality operator (`=`)
pub(crate) fn equals(a: &ExpressionTerm, b: &ExpressionTerm) -> Option<bool> {
    match a {
        ExpressionTerm::NamedNode(_)
        | ExpressionTerm::BlankNode(_)
        | ExpressionTerm::LangStringLiteral { .. } => Some(a == b),
        ExpressionTerm::StringLiteral(a_value) => match b {
            ExpressionTerm::StringLiteral(b_value) => Some(a_value == b_value),
            ExpressionTerm::OtherTypedLiteral { .. } => None,
            _ => Some(false),
        },
        ExpressionTerm::BooleanLiteral(a_value) => match b {
            ExpressionTerm::BooleanLiteral(b_value) => Some(a_value == b_value),
            ExpressionTerm::OtherTypedLiteral { .. } => None,
            _ => Some(false),
        },
        ExpressionTerm::IntegerLiteral(_)
        | ExpressionTerm::DecimalLiteral(_)
        | ExpressionTerm::FloatLiteral(_)
        | ExpressionTerm::DoubleLiteral(_)
        | ExpressionTerm::RationalLiteral(_) => {
            if b.is_numeric() {
                numeric_equals(a, b)
            } else if matches!(b, ExpressionTerm::OtherTypedLiteral { .. }) {
                None
            } else {
                Some(false)
            }
        }
        ExpressionTerm::DateTimeLiteral(a_value) => match b {
            ExpressionTerm::DateTimeLiteral(b_value) => Some(a_value == b_value),
            ExpressionTerm::OtherTypedLiteral { .. } => None,
            _ => Some(false),
        },
        ExpressionTerm::DateLiteral(a_value) => match b {
            ExpressionTerm::DateLiteral(b_value) => Some(a_value == b_value),
            ExpressionTerm::OtherTypedLiteral { .. } => None,
            _ => Some(false),
        },
        ExpressionTerm::TimeLiteral(a_value) => match b {
            ExpressionTerm::TimeLiteral(b_value) => Some(a_value == b_value),
            ExpressionTerm::OtherTypedLiteral { .. } => None,
            _ => Some(false),
        },
        ExpressionTerm::DurationLiteral(a_value) => match b {
            ExpressionTerm::DurationLiteral(b_value) => Some(a_value == b_value),
            ExpressionTerm::DayTimeDurationLiteral(b_value) => {
                Some(*a_value == Duration::from(*b_value))
            }
            ExpressionTerm::OtherTypedLiteral { .. } => None,
            _ => Some(false),
        },
        ExpressionTerm::DayTimeDurationLiteral(a_value) => match b {
            ExpressionTerm::DurationLiteral(b_value) => {
                Some(Duration::from(*a_value) == *b_value)
            }
            ExpressionTerm::DayTimeDurationLiteral(b_value) => Some(a_value == b_value),
            ExpressionTerm::OtherTypedLiteral { .. } => None,
            _ => Some(false),
        },
        ExpressionTerm::OtherTypedLiteral { .. } => match b {
            ExpressionTerm::OtherTypedLiteral { .. } => {
                if a == b {
                    Some(true)
                } else {
                    None
                }
            }
            ExpressionTerm::NamedNode(_)
            | ExpressionTerm::BlankNode(_)
            | ExpressionTerm::LangStringLiteral { .. } => Some(false),
            _ => None,
        },
    }
}

fn numeric_equals(a: &ExpressionTerm, b: &ExpressionTerm) -> Option<bool> {
    if let (ExpressionTerm::IntegerLiteral(a_value), ExpressionTerm::IntegerLiteral(b_value)) =
        (a, b)
    {
        return Some(a_value == b_value);
    }
    Some(a.as_double()? == b.as_double()?)
}

/// Comparison for the `<`, `>`, `<=` and `>=` operators
pub(crate) fn partial_cmp(a: &ExpressionTerm, b: &ExpressionTerm) -> Option<Ordering> {
    match (a, b) {
        (ExpressionTerm::StringLiteral(a_value), ExpressionTerm::StringLiteral(b_value)) => {
            a_value.partial_cmp(b_value)
        }
        (
            ExpressionTerm::LangStringLiteral {
                value: a_value,
                language: a_language,
            },
            ExpressionTerm::LangStringLiteral {
                value: b_value,
                language: b_language,
            },
        ) => {
            if a_language == b_language {
                a_value.partial_cmp(b_value)
            } else {
                None
            }
        }
        (ExpressionTerm::BooleanLiteral(a_value), ExpressionTerm::BooleanLiteral(b_value)) => {
            bool::from(*a_value).partial_cmp(&bool::from(*b_value))
        }
        (ExpressionTerm::DateTimeLiteral(a_value), ExpressionTerm::DateTimeLiteral(b_value)) => {
            a_value.partial_cmp(b_value)
        }
        (ExpressionTerm::DateLiteral(a_value), ExpressionTerm::DateLiteral(b_value)) => {
            a_value.partial_cmp(b_value)
        }
        (ExpressionTerm::TimeLiteral(a_value), ExpressionTerm::TimeLiteral(b_value)) => {
            a_value.partial_cmp(b_value)
        }
        (
            ExpressionTerm::DurationLiteral(_) | ExpressionTerm::DayTimeDurationLiteral(_),
            ExpressionTerm::DurationLiteral(_) | ExpressionTerm::DayTimeDurationLiteral(_),
        ) => as_duration(a)?.partial_cmp(&as_duration(b)?),
        _ => {
            if a.is_numeric() && b.is_numeric() {
                a.as_double()?.partial_cmp(&b.as_double()?)
            } else {
                None
            }
        }
    }
}

fn as_duration(term: &ExpressionTerm) -> Option<Duration> {
    match term {
        ExpressionTerm::DurationLiteral(value) => Some(*value),
        ExpressionTerm::DayTimeDurationLiteral(value) => Some((*value).into()),
        _ => None,
    }
}

pub(crate) fn to_string_and_language(term: ExpressionTerm) -> Option<(String, Option<String>)> {
    match term {
        ExpressionTerm::StringLiteral(value) => Some((value, None)),
        ExpressionTerm::LangStringLiteral { value, language } => Some((value, Some(language))),
        _ => None,
    }
}

pub(crate) fn build_plain_literal(value: String, language: Option<String>) -> ExpressionTerm {
    if let Some(language) = language {
        ExpressionTerm::LangStringLiteral { value, language }
    } else {
        ExpressionTerm::StringLiteral(value)
    }
}

pub(crate) fn to_argument_compatible_strings(
    arg1: ExpressionTerm,
    arg2: ExpressionTerm,
) -> Option<(String, String, Option<String>)> {
    let (value1, language1) = to_string_and_language(arg1)?;
    let (value2, language2) = to_string_and_language(arg2)?;
    (language2.is_none() || language1 == language2).then_some((value1, value2, language1))
}

/// A value of the `owl:rational` datatype: an exact fraction of two integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    numerator: i64,
    denominator: i64,
}

impl Rational {
    /// Builds a fraction, refusing a zero denominator.
    pub fn new(numerator: i64, denominator: i64) -> Option<Self> {
        (denominator != 0).then_some(Self {
            numerator,
            denominator,
        })
    }

    #[inline]
    pub fn numerator(self) -> i64 {
        self.numerator
    }

    #[inline]
    pub fn denominator(self) -> i64 {
        self.denominator
    }

    /// Promotes the fraction to the `xsd:double` value space.
    #[expect(clippy::cast_precision_loss)]
    pub fn as_double(self) -> Double {
        (self.numerator as f64 / self.denominator as f64).into()
    }
}

impl FromStr for Rational {
    type Err = ParseRationalError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (numerator, denominator) = input.split_once('/').ok_or(ParseRationalError)?;
        let numerator = numerator.trim().parse().map_err(|_| ParseRationalError)?;
        let denominator = denominator.trim().parse().map_err(|_| ParseRationalError)?;
        Self::new(numerator, denominator).ok_or(ParseRationalError)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// An error when parsing a [`Rational`] lexical form.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("invalid owl:rational lexical form")]
pub struct ParseRationalError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rational_lexical_space() {
        let value = Rational::from_str("50/2").unwrap();
        assert_eq!(value.numerator(), 50);
        assert_eq!(value.denominator(), 2);
        assert_eq!(value.as_double(), Double::from(25.));
        assert_eq!(value.to_string(), "50/2");

        assert!(Rational::from_str(" -1 / 3 ").is_ok());
        assert!(Rational::from_str("1/0").is_err());
        assert!(Rational::from_str("25").is_err());
        assert!(Rational::from_str("a/b").is_err());
    }

    #[test]
    fn typed_literal_parsing() {
        assert_eq!(
            parse_typed_literal("50/2", owl::RATIONAL.as_str()),
            Some(ExpressionTerm::RationalLiteral(
                Rational::new(50, 2).unwrap()
            ))
        );
        assert_eq!(
            parse_typed_literal("5.1", xsd::DOUBLE.as_str()),
            Some(ExpressionTerm::DoubleLiteral(Double::from(5.1)))
        );
        assert_eq!(parse_typed_literal("five", xsd::DOUBLE.as_str()), None);
        assert_eq!(
            parse_typed_literal("5", "http://example.com/datatype"),
            None
        );
    }

    #[test]
    fn numeric_equality_is_cross_representation() {
        let rational = ExpressionTerm::RationalLiteral(Rational::new(1, 2).unwrap());
        let double = ExpressionTerm::DoubleLiteral(Double::from(0.5));
        let integer = ExpressionTerm::IntegerLiteral(Integer::from(2));
        assert_eq!(equals(&rational, &double), Some(true));
        assert_eq!(equals(&rational, &integer), Some(false));
        assert_eq!(
            equals(&rational, &ExpressionTerm::StringLiteral("1/2".into())),
            Some(false)
        );
    }

    #[test]
    fn binding_lexical_forms() {
        assert_eq!(
            parse_binding_term("<http://example.com/a>"),
            Some(NamedNode::new_unchecked("http://example.com/a").into())
        );
        assert_eq!(
            parse_binding_term("\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>"),
            Some(Literal::new_typed_literal("1", xsd::INTEGER).into())
        );
        assert_eq!(
            parse_binding_term("plain text"),
            Some(Literal::new_simple_literal("plain text").into())
        );
        assert_eq!(parse_binding_term("<not an iri"), None);
    }
}
