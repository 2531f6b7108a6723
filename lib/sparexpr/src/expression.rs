use crate::eval::shared_evaluator;
use crate::row::BindingRow;
use crate::serializer::{Namespace, render_expression};
use oxrdf::{BlankNode, Literal, NamedNode, Term, Variable, VariableNameParseError};
use std::fmt;

/// A scalar [SPARQL expression](https://www.w3.org/TR/sparql11-query/#expressions).
///
/// The tree is immutable once built and may be evaluated any number of times
/// against different binding rows, including concurrently.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Expression {
    /// A constant term, unaffected by the binding row.
    Constant(Term),
    /// A variable, resolved against the binding row.
    Variable(Variable),
    /// A zero-argument generator producing a fresh value on every evaluation.
    Generator(GeneratorFunction),
    /// The bare parenthesizing wrapper.
    Group(Box<Expression>),
    Unary(UnaryFunction, Box<Expression>),
    Binary(BinaryOperator, Box<Expression>, Box<Expression>),
}

impl Expression {
    /// Builds a constant leaf from any RDF term.
    pub fn constant(term: impl Into<Term>) -> Self {
        Self::Constant(term.into())
    }

    /// Builds a variable leaf, accepting the name with or without its leading `?`.
    pub fn variable(name: &str) -> Result<Self, QueryConstructionError> {
        let name = name.strip_prefix('?').unwrap_or(name);
        Ok(Self::Variable(Variable::new(name).map_err(|error| {
            QueryConstructionError::InvalidVariableName {
                name: name.into(),
                error,
            }
        })?))
    }

    /// Wraps an expression in bare parentheses.
    pub fn group(
        inner: impl Into<Option<Expression>>,
    ) -> Result<Self, QueryConstructionError> {
        Ok(Self::Group(Box::new(required(inner, "( )", "first")?)))
    }

    /// Builds a unary function call.
    ///
    /// A missing argument is a build-time error, not an evaluation "no value".
    pub fn unary(
        function: UnaryFunction,
        argument: impl Into<Option<Expression>>,
    ) -> Result<Self, QueryConstructionError> {
        Ok(Self::Unary(
            function,
            Box::new(required(argument, function.name(), "first")?),
        ))
    }

    /// Builds a binary operator application.
    ///
    /// Missing operands are build-time errors, not evaluation "no value"s.
    pub fn binary(
        operator: BinaryOperator,
        left: impl Into<Option<Expression>>,
        right: impl Into<Option<Expression>>,
    ) -> Result<Self, QueryConstructionError> {
        Ok(Self::Binary(
            operator,
            Box::new(required(left, operator.name(), "first")?),
            Box::new(required(right, operator.name(), "second")?),
        ))
    }

    /// The first (or only) child expression, if the node has one.
    pub fn left_argument(&self) -> Option<&Expression> {
        match self {
            Self::Group(inner) => Some(inner),
            Self::Unary(_, argument) => Some(argument),
            Self::Binary(_, left, _) => Some(left),
            Self::Constant(_) | Self::Variable(_) | Self::Generator(_) => None,
        }
    }

    /// The second child expression, if the node has one.
    pub fn right_argument(&self) -> Option<&Expression> {
        match self {
            Self::Binary(_, _, right) => Some(right),
            _ => None,
        }
    }

    /// Evaluates the expression against one row of variable bindings.
    ///
    /// `None` is the ordinary "no value" outcome: an unbound variable, a
    /// type mismatch or a malformed lexical form somewhere in the tree.
    pub fn apply(&self, row: &impl BindingRow) -> Option<Term> {
        shared_evaluator().evaluate(self, row)
    }

    /// Renders the expression back to SPARQL syntax.
    ///
    /// IRIs whose head matches one of the given namespaces are compacted to
    /// `prefix:localname`; with an empty list every IRI stays fully qualified.
    pub fn render(&self, namespaces: &[Namespace]) -> String {
        render_expression(self, namespaces)
    }
}

fn required(
    argument: impl Into<Option<Expression>>,
    function: &str,
    position: &'static str,
) -> Result<Expression, QueryConstructionError> {
    argument
        .into()
        .ok_or_else(|| QueryConstructionError::MissingArgument {
            function: function.into(),
            position,
        })
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&[]))
    }
}

impl From<Term> for Expression {
    fn from(term: Term) -> Self {
        Self::Constant(term)
    }
}

impl From<NamedNode> for Expression {
    fn from(node: NamedNode) -> Self {
        Self::Constant(node.into())
    }
}

impl From<BlankNode> for Expression {
    fn from(node: BlankNode) -> Self {
        Self::Constant(node.into())
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Self::Constant(literal.into())
    }
}

impl From<Variable> for Expression {
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

impl From<bool> for Expression {
    fn from(value: bool) -> Self {
        Literal::from(value).into()
    }
}

impl From<i64> for Expression {
    fn from(value: i64) -> Self {
        Literal::from(value).into()
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Literal::from(value).into()
    }
}

impl From<&str> for Expression {
    fn from(value: &str) -> Self {
        Literal::new_simple_literal(value).into()
    }
}

/// A zero-argument function whose result changes on every evaluation.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum GeneratorFunction {
    /// The instant of evaluation, as `xsd:dateTime`.
    Now,
    /// A fresh `urn:uuid:` IRI.
    Uuid,
    /// A fresh UUID string literal.
    StrUuid,
    /// A fresh blank node.
    BNode,
    /// A random `xsd:double` in `[0, 1)`.
    Rand,
}

impl GeneratorFunction {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Now => "NOW",
            Self::Uuid => "UUID",
            Self::StrUuid => "STRUUID",
            Self::BNode => "BNODE",
            Self::Rand => "RAND",
        }
    }
}

impl fmt::Display for GeneratorFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A function of one argument.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum UnaryFunction {
    /// Logical negation of the effective boolean value.
    Not,
    /// Numeric negation.
    Minus,
    Str,
    Lang,
    Datatype,
    StrLen,
    UCase,
    LCase,
    EncodeForUri,
    IsIri,
    IsBlank,
    IsLiteral,
    IsNumeric,
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Abs,
    Ceil,
    Floor,
    Round,
    Year,
    Month,
    Day,
    Hours,
    Minutes,
    Seconds,
    Timezone,
    Tz,
    /// Topological dimension of a geometry literal: 0, 1 or 2.
    Dimension,
    /// Minimum bounding rectangle of a geometry literal.
    Envelope,
    /// Simple Features class IRI of a geometry literal.
    GeometryType,
    IsEmpty,
}

impl UnaryFunction {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Minus => "-",
            Self::Str => "STR",
            Self::Lang => "LANG",
            Self::Datatype => "DATATYPE",
            Self::StrLen => "STRLEN",
            Self::UCase => "UCASE",
            Self::LCase => "LCASE",
            Self::EncodeForUri => "ENCODE_FOR_URI",
            Self::IsIri => "isIRI",
            Self::IsBlank => "isBLANK",
            Self::IsLiteral => "isLITERAL",
            Self::IsNumeric => "isNUMERIC",
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha384 => "SHA384",
            Self::Sha512 => "SHA512",
            Self::Abs => "ABS",
            Self::Ceil => "CEIL",
            Self::Floor => "FLOOR",
            Self::Round => "ROUND",
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Day => "DAY",
            Self::Hours => "HOURS",
            Self::Minutes => "MINUTES",
            Self::Seconds => "SECONDS",
            Self::Timezone => "TIMEZONE",
            Self::Tz => "TZ",
            Self::Dimension => "geof:dimension",
            Self::Envelope => "geof:envelope",
            Self::GeometryType => "geof:geometryType",
            Self::IsEmpty => "geof:isEmpty",
        }
    }
}

impl fmt::Display for UnaryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A function or operator of two arguments.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum BinaryOperator {
    Or,
    And,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    SameTerm,
    Contains,
    StrStarts,
    StrEnds,
    Regex,
}

impl BinaryOperator {
    /// The infix symbol, or `None` for function-call syntax.
    pub(crate) fn symbol(self) -> Option<&'static str> {
        Some(match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::SameTerm | Self::Contains | Self::StrStarts | Self::StrEnds | Self::Regex => {
                return None;
            }
        })
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::SameTerm => "sameTerm",
            Self::Contains => "CONTAINS",
            Self::StrStarts => "STRSTARTS",
            Self::StrEnds => "STRENDS",
            Self::Regex => "REGEX",
            _ => self.symbol().unwrap_or(""),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error raised while building an expression tree.
///
/// This is the fatal, build-time channel: evaluation never reports through it,
/// an unevaluable expression is an ordinary `None` result instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryConstructionError {
    /// A required child expression was not provided.
    #[error("The {position} argument of {function} is missing")]
    MissingArgument {
        function: String,
        position: &'static str,
    },
    /// The given variable name is not a valid SPARQL variable name.
    #[error("Invalid variable name ?{name}")]
    InvalidVariableName {
        name: String,
        #[source]
        error: VariableNameParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_one_requires_a_child() {
        let error = Expression::unary(UnaryFunction::Ceil, None).unwrap_err();
        assert!(matches!(
            error,
            QueryConstructionError::MissingArgument {
                position: "first",
                ..
            }
        ));

        let child = Expression::from(1);
        let node = Expression::unary(UnaryFunction::Ceil, child.clone()).unwrap();
        assert_eq!(node.left_argument(), Some(&child));
        assert_eq!(node.right_argument(), None);
    }

    #[test]
    fn arity_two_requires_both_children() {
        assert!(Expression::binary(BinaryOperator::Add, None, Expression::from(1)).is_err());
        assert!(Expression::binary(BinaryOperator::Add, Expression::from(1), None).is_err());

        let left = Expression::from(1);
        let right = Expression::variable("x").unwrap();
        let node =
            Expression::binary(BinaryOperator::Add, left.clone(), right.clone()).unwrap();
        assert_eq!(node.left_argument(), Some(&left));
        assert_eq!(node.right_argument(), Some(&right));
    }

    #[test]
    fn variable_names_are_validated() {
        assert_eq!(
            Expression::variable("?x").unwrap(),
            Expression::variable("x").unwrap()
        );
        assert!(Expression::variable("").is_err());
    }
}
