use crate::expression::{BinaryOperator, Expression, GeneratorFunction, UnaryFunction};
use crate::geo;
use crate::row::BindingRow;
use crate::term::{
    self, ExpressionTerm, build_plain_literal, to_argument_compatible_strings,
    to_string_and_language,
};
use md5::{Digest, Md5};
use oxrdf::{BlankNode, NamedNode, Term};
use oxsdatatypes::{DateTime, DayTimeDuration, Decimal, Integer};
use rand::random;
use regex::RegexBuilder;
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use std::cmp::Ordering;
use std::sync::{Mutex, OnceLock, PoisonError};

const REGEX_SIZE_LIMIT: usize = 1_000_000;

/// Evaluates [`Expression`] trees against binding rows.
///
/// The evaluator is cheap to build and safe to share between threads; its only
/// state backs the generator functions (`NOW()`, `UUID()`, …), which must
/// yield a distinct value on every invocation.
pub struct ExpressionEvaluator {
    clock: Box<dyn Clock>,
}

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::default())
    }

    /// Builds an evaluator with a substituted time source.
    ///
    /// The clock must keep the generator contract: successive calls never
    /// return the same instant.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
        }
    }

    /// Applies an expression to one row of variable bindings.
    ///
    /// Returns `None` when the expression does not evaluate to a value on
    /// this row; this outcome is expected and silent, never an error.
    pub fn evaluate(&self, expression: &Expression, row: &impl BindingRow) -> Option<Term> {
        Some(self.evaluate_expression(expression, row)?.into())
    }

    fn evaluate_expression(
        &self,
        expression: &Expression,
        row: &impl BindingRow,
    ) -> Option<ExpressionTerm> {
        match expression {
            Expression::Constant(term) => Some(term.clone().into()),
            Expression::Variable(variable) => {
                let lexical = row.lexical_value(&variable.to_string())?;
                Some(term::parse_binding_term(lexical)?.into())
            }
            Expression::Generator(function) => Some(self.evaluate_generator(*function)),
            Expression::Group(inner) => self.evaluate_expression(inner, row),
            Expression::Unary(function, argument) => {
                let argument = self.evaluate_expression(argument, row)?;
                evaluate_unary(*function, argument)
            }
            Expression::Binary(operator, left, right) => {
                // Children resolve first: a node only produces a value if all of them do
                let left = self.evaluate_expression(left, row)?;
                let right = self.evaluate_expression(right, row)?;
                evaluate_binary(*operator, left, right)
            }
        }
    }

    fn evaluate_generator(&self, function: GeneratorFunction) -> ExpressionTerm {
        match function {
            GeneratorFunction::Now => ExpressionTerm::DateTimeLiteral(self.clock.now()),
            GeneratorFunction::Uuid => {
                let mut iri = String::with_capacity(45);
                iri.push_str("urn:uuid:");
                write_uuid(&mut iri);
                ExpressionTerm::NamedNode(NamedNode::new_unchecked(iri))
            }
            GeneratorFunction::StrUuid => {
                let mut uuid = String::with_capacity(36);
                write_uuid(&mut uuid);
                ExpressionTerm::StringLiteral(uuid)
            }
            GeneratorFunction::BNode => ExpressionTerm::BlankNode(BlankNode::default()),
            GeneratorFunction::Rand => ExpressionTerm::DoubleLiteral(random::<f64>().into()),
        }
    }
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn shared_evaluator() -> &'static ExpressionEvaluator {
    static EVALUATOR: OnceLock<ExpressionEvaluator> = OnceLock::new();
    EVALUATOR.get_or_init(ExpressionEvaluator::new)
}

/// The time source behind `NOW()`.
pub trait Clock: Send + Sync {
    /// The current instant. Successive calls must never return equal values.
    fn now(&self) -> DateTime;
}

/// Wall-clock time, nudged forward by a nanosecond whenever the system clock
/// has not advanced since the previous call.
#[derive(Default)]
struct SystemClock {
    last: Mutex<Option<DateTime>>,
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        let mut now = DateTime::now();
        let mut last = self
            .last
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = *last {
            if now <= previous {
                if let Some(nudged) = previous.checked_add_day_time_duration(clock_tick()) {
                    now = nudged;
                }
            }
        }
        *last = Some(now);
        now
    }
}

fn clock_tick() -> DayTimeDuration {
    "0.000000001"
        .parse::<Decimal>()
        .map(DayTimeDuration::new)
        .unwrap_or_else(|_| DayTimeDuration::new(1))
}

fn evaluate_unary(function: UnaryFunction, argument: ExpressionTerm) -> Option<ExpressionTerm> {
    Some(match function {
        UnaryFunction::Not => (!argument.effective_boolean_value()?).into(),
        UnaryFunction::Minus => ExpressionTerm::DoubleLiteral(-argument.as_double()?),
        UnaryFunction::Abs => ExpressionTerm::DoubleLiteral(argument.as_double()?.abs()),
        UnaryFunction::Ceil => ExpressionTerm::DoubleLiteral(argument.as_double()?.ceil()),
        UnaryFunction::Floor => ExpressionTerm::DoubleLiteral(argument.as_double()?.floor()),
        UnaryFunction::Round => ExpressionTerm::DoubleLiteral(argument.as_double()?.round()),
        UnaryFunction::Str => ExpressionTerm::StringLiteral(match Term::from(argument) {
            Term::NamedNode(node) => node.into_string(),
            Term::BlankNode(_) => return None,
            Term::Literal(literal) => literal.value().into(),
        }),
        UnaryFunction::Lang => ExpressionTerm::StringLiteral(match argument {
            ExpressionTerm::LangStringLiteral { language, .. } => language,
            ExpressionTerm::NamedNode(_) | ExpressionTerm::BlankNode(_) => return None,
            _ => String::new(),
        }),
        UnaryFunction::Datatype => ExpressionTerm::NamedNode(argument.datatype()?.into_owned()),
        UnaryFunction::StrLen => {
            let (value, _) = to_string_and_language(argument)?;
            ExpressionTerm::IntegerLiteral(i64::try_from(value.chars().count()).ok()?.into())
        }
        UnaryFunction::UCase => {
            let (value, language) = to_string_and_language(argument)?;
            build_plain_literal(value.to_uppercase(), language)
        }
        UnaryFunction::LCase => {
            let (value, language) = to_string_and_language(argument)?;
            build_plain_literal(value.to_lowercase(), language)
        }
        UnaryFunction::EncodeForUri => {
            let (value, _) = to_string_and_language(argument)?;
            let mut result = String::with_capacity(value.len());
            for byte in value.bytes() {
                match byte {
                    b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                        result.push(char::from(byte));
                    }
                    _ => {
                        result.push('%');
                        result.push(hex_digit(byte >> 4).to_ascii_uppercase());
                        result.push(hex_digit(byte & 0x0F).to_ascii_uppercase());
                    }
                }
            }
            ExpressionTerm::StringLiteral(result)
        }
        UnaryFunction::IsIri => matches!(argument, ExpressionTerm::NamedNode(_)).into(),
        UnaryFunction::IsBlank => matches!(argument, ExpressionTerm::BlankNode(_)).into(),
        UnaryFunction::IsLiteral => (!matches!(
            argument,
            ExpressionTerm::NamedNode(_) | ExpressionTerm::BlankNode(_)
        ))
        .into(),
        UnaryFunction::IsNumeric => argument.is_numeric().into(),
        UnaryFunction::Md5 => hash::<Md5>(argument)?,
        UnaryFunction::Sha1 => hash::<Sha1>(argument)?,
        UnaryFunction::Sha256 => hash::<Sha256>(argument)?,
        UnaryFunction::Sha384 => hash::<Sha384>(argument)?,
        UnaryFunction::Sha512 => hash::<Sha512>(argument)?,
        UnaryFunction::Year => ExpressionTerm::IntegerLiteral(
            match argument {
                ExpressionTerm::DateTimeLiteral(date_time) => date_time.year(),
                ExpressionTerm::DateLiteral(date) => date.year(),
                _ => return None,
            }
            .into(),
        ),
        UnaryFunction::Month => ExpressionTerm::IntegerLiteral(
            match argument {
                ExpressionTerm::DateTimeLiteral(date_time) => date_time.month(),
                ExpressionTerm::DateLiteral(date) => date.month(),
                _ => return None,
            }
            .into(),
        ),
        UnaryFunction::Day => ExpressionTerm::IntegerLiteral(
            match argument {
                ExpressionTerm::DateTimeLiteral(date_time) => date_time.day(),
                ExpressionTerm::DateLiteral(date) => date.day(),
                _ => return None,
            }
            .into(),
        ),
        UnaryFunction::Hours => ExpressionTerm::IntegerLiteral(
            match argument {
                ExpressionTerm::DateTimeLiteral(date_time) => date_time.hour(),
                ExpressionTerm::TimeLiteral(time) => time.hour(),
                _ => return None,
            }
            .into(),
        ),
        UnaryFunction::Minutes => ExpressionTerm::IntegerLiteral(
            match argument {
                ExpressionTerm::DateTimeLiteral(date_time) => date_time.minute(),
                ExpressionTerm::TimeLiteral(time) => time.minute(),
                _ => return None,
            }
            .into(),
        ),
        UnaryFunction::Seconds => {
            let seconds = match argument {
                ExpressionTerm::DateTimeLiteral(date_time) => date_time.second(),
                ExpressionTerm::TimeLiteral(time) => time.second(),
                _ => return None,
            };
            ExpressionTerm::IntegerLiteral(Integer::try_from(seconds.checked_floor()?).ok()?)
        }
        UnaryFunction::Timezone => ExpressionTerm::DurationLiteral(
            match argument {
                ExpressionTerm::DateTimeLiteral(date_time) => date_time.timezone(),
                ExpressionTerm::DateLiteral(date) => date.timezone(),
                ExpressionTerm::TimeLiteral(time) => time.timezone(),
                _ => return None,
            }?
            .into(),
        ),
        UnaryFunction::Tz => {
            let timezone_offset = match argument {
                ExpressionTerm::DateTimeLiteral(date_time) => date_time.timezone_offset(),
                ExpressionTerm::DateLiteral(date) => date.timezone_offset(),
                ExpressionTerm::TimeLiteral(time) => time.timezone_offset(),
                _ => return None,
            };
            ExpressionTerm::StringLiteral(
                timezone_offset.map_or_else(String::new, |offset| offset.to_string()),
            )
        }
        UnaryFunction::Dimension => {
            let geometry = geo::parse_geometry_literal(&argument)?;
            ExpressionTerm::IntegerLiteral(geo::dimension(&geometry).into())
        }
        UnaryFunction::Envelope => {
            let geometry = geo::parse_geometry_literal(&argument)?;
            geo::geometry_literal(&geo::envelope(geometry))
        }
        UnaryFunction::GeometryType => {
            let geometry = geo::parse_geometry_literal(&argument)?;
            ExpressionTerm::NamedNode(geo::geometry_type(&geometry).into_owned())
        }
        UnaryFunction::IsEmpty => {
            let geometry = geo::parse_geometry_literal(&argument)?;
            geo::is_empty(&geometry).into()
        }
    })
}

fn evaluate_binary(
    operator: BinaryOperator,
    left: ExpressionTerm,
    right: ExpressionTerm,
) -> Option<ExpressionTerm> {
    Some(match operator {
        BinaryOperator::Or => {
            (left.effective_boolean_value()? || right.effective_boolean_value()?).into()
        }
        BinaryOperator::And => {
            (left.effective_boolean_value()? && right.effective_boolean_value()?).into()
        }
        BinaryOperator::Equal => term::equals(&left, &right)?.into(),
        BinaryOperator::NotEqual => (!term::equals(&left, &right)?).into(),
        BinaryOperator::Less => (term::partial_cmp(&left, &right)? == Ordering::Less).into(),
        BinaryOperator::LessOrEqual => {
            matches!(
                term::partial_cmp(&left, &right)?,
                Ordering::Less | Ordering::Equal
            )
            .into()
        }
        BinaryOperator::Greater => (term::partial_cmp(&left, &right)? == Ordering::Greater).into(),
        BinaryOperator::GreaterOrEqual => {
            matches!(
                term::partial_cmp(&left, &right)?,
                Ordering::Greater | Ordering::Equal
            )
            .into()
        }
        // Operands promote to a common numeric space; results are always doubles
        BinaryOperator::Add => {
            ExpressionTerm::DoubleLiteral(left.as_double()? + right.as_double()?)
        }
        BinaryOperator::Subtract => {
            ExpressionTerm::DoubleLiteral(left.as_double()? - right.as_double()?)
        }
        BinaryOperator::Multiply => {
            ExpressionTerm::DoubleLiteral(left.as_double()? * right.as_double()?)
        }
        BinaryOperator::Divide => {
            ExpressionTerm::DoubleLiteral(left.as_double()? / right.as_double()?)
        }
        BinaryOperator::SameTerm => (left == right).into(),
        BinaryOperator::Contains => {
            let (left, right, _) = to_argument_compatible_strings(left, right)?;
            left.contains(right.as_str()).into()
        }
        BinaryOperator::StrStarts => {
            let (left, right, _) = to_argument_compatible_strings(left, right)?;
            left.starts_with(right.as_str()).into()
        }
        BinaryOperator::StrEnds => {
            let (left, right, _) = to_argument_compatible_strings(left, right)?;
            left.ends_with(right.as_str()).into()
        }
        BinaryOperator::Regex => {
            let (text, _) = to_string_and_language(left)?;
            let ExpressionTerm::StringLiteral(pattern) = right else {
                return None;
            };
            let regex = RegexBuilder::new(&pattern)
                .size_limit(REGEX_SIZE_LIMIT)
                .build()
                .ok()?;
            regex.is_match(&text).into()
        }
    })
}

fn hash<H: Digest>(argument: ExpressionTerm) -> Option<ExpressionTerm> {
    let ExpressionTerm::StringLiteral(input) = argument else {
        return None;
    };
    Some(ExpressionTerm::StringLiteral(hex::encode(
        H::new().chain_update(input.as_str()).finalize(),
    )))
}

fn write_uuid(buffer: &mut String) {
    let mut bytes = random::<u128>().to_be_bytes();
    // Version 4, variant 1
    bytes[6] = (bytes[6] & 0x0F) | 0x40;
    bytes[8] = (bytes[8] & 0x3F) | 0x80;
    for (i, byte) in bytes.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            buffer.push('-');
        }
        buffer.push(hex_digit(byte >> 4));
        buffer.push(hex_digit(byte & 0x0F));
    }
}

fn hex_digit(nibble: u8) -> char {
    char::from(if nibble < 10 {
        b'0' + nibble
    } else {
        b'a' + (nibble - 10)
    })
}
