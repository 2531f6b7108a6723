use crate::expression::{Expression, UnaryFunction};
use crate::vocab::{geof, owl};
use oxrdf::vocab::xsd;
use oxrdf::{NamedNodeRef, Term};

/// A prefix declaration used by [`Expression::render`] to compact IRIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    prefix: String,
    iri: String,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            iri: iri.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }
}

pub(crate) fn render_expression(expression: &Expression, namespaces: &[Namespace]) -> String {
    let mut buffer = String::new();
    write_expression(expression, namespaces, &mut buffer);
    buffer
}

fn write_expression(expression: &Expression, namespaces: &[Namespace], out: &mut String) {
    match expression {
        Expression::Constant(term) => write_term(term, namespaces, out),
        Expression::Variable(variable) => {
            out.push('?');
            out.push_str(variable.as_str());
        }
        Expression::Generator(function) => {
            out.push_str(function.name());
            out.push_str("()");
        }
        Expression::Group(inner) => {
            out.push('(');
            write_expression(inner, namespaces, out);
            out.push(')');
        }
        Expression::Unary(function, argument) => match function {
            UnaryFunction::Not | UnaryFunction::Minus => {
                out.push_str(function.name());
                write_expression(argument, namespaces, out);
            }
            UnaryFunction::Dimension
            | UnaryFunction::Envelope
            | UnaryFunction::GeometryType
            | UnaryFunction::IsEmpty => {
                write_iri(geo_function_iri(*function).as_str(), namespaces, out);
                out.push('(');
                write_expression(argument, namespaces, out);
                out.push(')');
            }
            _ => {
                out.push_str(function.name());
                out.push('(');
                write_expression(argument, namespaces, out);
                out.push(')');
            }
        },
        Expression::Binary(operator, left, right) => {
            if let Some(symbol) = operator.symbol() {
                out.push('(');
                write_expression(left, namespaces, out);
                out.push(' ');
                out.push_str(symbol);
                out.push(' ');
                write_expression(right, namespaces, out);
                out.push(')');
            } else {
                out.push_str(operator.name());
                out.push('(');
                write_expression(left, namespaces, out);
                out.push_str(", ");
                write_expression(right, namespaces, out);
                out.push(')');
            }
        }
    }
}

fn geo_function_iri(function: UnaryFunction) -> NamedNodeRef<'static> {
    match function {
        UnaryFunction::Dimension => geof::DIMENSION,
        UnaryFunction::Envelope => geof::ENVELOPE,
        UnaryFunction::GeometryType => geof::GEOMETRY_TYPE,
        _ => geof::IS_EMPTY,
    }
}

fn write_term(term: &Term, namespaces: &[Namespace], out: &mut String) {
    match term {
        Term::NamedNode(node) => write_iri(node.as_str(), namespaces, out),
        Term::BlankNode(node) => {
            out.push_str("_:");
            out.push_str(node.as_str());
        }
        Term::Literal(literal) => {
            if let Some(language) = literal.language() {
                write_quoted(literal.value(), out);
                out.push('@');
                out.push_str(&language.to_ascii_uppercase());
            } else if is_numeric_datatype(literal.datatype()) {
                out.push_str(literal.value());
            } else if literal.datatype() == xsd::STRING {
                write_quoted(literal.value(), out);
            } else {
                write_quoted(literal.value(), out);
                out.push_str("^^");
                write_iri(literal.datatype().as_str(), namespaces, out);
            }
        }
    }
}

fn is_numeric_datatype(datatype: NamedNodeRef<'_>) -> bool {
    datatype == xsd::INTEGER
        || datatype == xsd::DECIMAL
        || datatype == xsd::FLOAT
        || datatype == xsd::DOUBLE
        || datatype == owl::RATIONAL
}

fn write_iri(iri: &str, namespaces: &[Namespace], out: &mut String) {
    for namespace in namespaces {
        if let Some(local) = iri.strip_prefix(namespace.iri()) {
            out.push_str(namespace.prefix());
            out.push(':');
            out.push_str(local);
            return;
        }
    }
    out.push('<');
    out.push_str(iri);
    out.push('>');
}

fn write_quoted(value: &str, out: &mut String) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
}
